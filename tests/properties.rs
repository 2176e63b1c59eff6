//! Property tests: engine invariants hold for any seed and preset.

use basketball_sim::logic::percentage;
use basketball_sim::{PersonalFouls, Preset, SimulationInstance, TeamId};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: percentages stay in [0, 1] and are 0 without attempts
    #[test]
    fn prop_percentage_in_unit_range(made in 0u32..500, extra in 0u32..500) {
        let p = percentage(made, made + extra);
        prop_assert!((0.0..=1.0).contains(&p));
        if made + extra == 0 {
            prop_assert_eq!(p, 0.0);
        }
    }

    /// Property: every game finishes with consistent books
    #[test]
    fn prop_game_invariants(seed in any::<u64>(), preset_index in 0usize..4, fouls in any::<bool>()) {
        let preset = Preset::ALL[preset_index];
        let mut sim = SimulationInstance::seeded(preset.rules(), seed).unwrap();
        if fouls {
            sim = sim.with_fouls(PersonalFouls::default());
        }
        let summary = sim.run_to_completion();

        prop_assert_eq!(sim.state().quarter, 5);
        for team in TeamId::ALL {
            let stats = &summary.stats[team];
            prop_assert!(stats.fg_made <= stats.fg_attempts);
            prop_assert!(stats.three_made <= stats.three_attempts);
            prop_assert!(stats.ft_made <= stats.ft_attempts);
            prop_assert_eq!(stats.rebounds, stats.off_rebounds + stats.def_rebounds);

            let pct = &summary.shooting_percentages[team];
            for value in [pct.fg, pct.three, pct.ft] {
                prop_assert!((0.0..=1.0).contains(&value));
            }

            let points: u32 = sim.team(team).players.iter().map(|p| p.points).sum();
            prop_assert_eq!(points, summary.final_score[team]);
        }
        for pair in sim.events().as_slice().windows(2) {
            prop_assert!((pair[0].quarter, pair[0].time) <= (pair[1].quarter, pair[1].time));
        }
    }
}
