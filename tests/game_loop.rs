//! Integration tests for the step loop: full games, determinism, lifecycle.

use basketball_sim::models::MAX_QUARTER_MINUTES;
use basketball_sim::{
    ConfigurationError, EventKind, GameEvent, PerTeam, Preset, RuleSet, SimulationInstance, TeamId,
    TeamStats, Tick,
};
use std::sync::mpsc;

#[test]
fn full_game_runs_four_quarters() {
    let mut sim = SimulationInstance::seeded(RuleSet::default(), 42).unwrap();
    let summary = sim.run_to_completion();

    assert!(sim.is_game_over());
    assert_eq!(sim.state().quarter, 5);
    assert_eq!(summary.final_score, sim.state().score);

    let quarter_ends: Vec<u32> = sim
        .events()
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::QuarterEnd { quarter, .. } => Some(quarter),
            _ => None,
        })
        .collect();
    assert_eq!(quarter_ends, vec![1, 2, 3]);
    assert!(matches!(
        sim.events().last().map(|e| &e.kind),
        Some(EventKind::GameEnd { .. })
    ));
    assert!(summary.final_score.a + summary.final_score.b > 0);
}

#[test]
fn same_seed_same_game() {
    let mut first = SimulationInstance::seeded(Preset::Fiba.rules(), 2024).unwrap();
    let mut second = SimulationInstance::seeded(Preset::Fiba.rules(), 2024).unwrap();
    let mut other = SimulationInstance::seeded(Preset::Fiba.rules(), 7).unwrap();

    // Interleave the instances; none may affect another.
    while !first.is_game_over() {
        first.step_many(3);
        other.step_many(5);
        second.step();
        second.step_many(2);
    }

    assert_eq!(first.events(), second.events());
    assert_eq!(first.teams(), second.teams());
    assert_eq!(first.summary(), second.summary());
    assert_ne!(first.events(), other.events());
}

#[test]
fn made_baskets_hand_the_ball_over() {
    let mut sim = SimulationInstance::seeded(RuleSet::default(), 5).unwrap();
    let mut checked = 0;
    while !sim.is_game_over() {
        let before = sim.events().len();
        if sim.step() != Tick::Possession {
            continue;
        }
        if let Some(last) = sim.events().since(before).last() {
            if let EventKind::MadeShot { team, .. } | EventKind::FastBreakScore { team, .. } = last.kind {
                assert_eq!(sim.state().possession, team.other());
                assert_eq!(sim.state().shot_clock, 24);
                checked += 1;
            }
        }
    }
    assert!(checked > 10);
}

#[test]
fn stats_and_log_agree() {
    for preset in Preset::ALL {
        let mut sim = SimulationInstance::seeded(preset.rules(), 99).unwrap();
        let summary = sim.run_to_completion();

        for team in TeamId::ALL {
            let stats = &summary.stats[team];
            assert!(stats.fg_made <= stats.fg_attempts);
            assert!(stats.three_made <= stats.three_attempts);
            assert!(stats.three_attempts <= stats.fg_attempts);
            assert_eq!(stats.rebounds, stats.off_rebounds + stats.def_rebounds);
            assert_eq!(stats.ft_attempts, 0, "no fouls without a resolver");
            assert_eq!(stats.assists, 0);
            assert_eq!(stats.blocks, 0);

            let logged: u32 = sim
                .events()
                .iter()
                .filter(|e| e.kind.team() == Some(team))
                .map(|e| e.kind.points_scored())
                .sum();
            assert_eq!(logged, summary.final_score[team], "{} {team}", preset.name());
        }
    }
}

#[test]
fn events_stay_in_clock_order() {
    let mut sim = SimulationInstance::seeded(Preset::Ncaa.rules(), 3).unwrap();
    sim.run_to_completion();
    let events = sim.events().as_slice();
    for pair in events.windows(2) {
        assert!((pair[0].quarter, pair[0].time) <= (pair[1].quarter, pair[1].time));
    }
    assert!(events.iter().all(|e| e.shot_clock <= 30));
}

#[test]
fn sink_sees_every_event_in_order() {
    let (tx, rx) = mpsc::channel::<GameEvent>();
    let mut sim = SimulationInstance::seeded(RuleSet::default(), 12)
        .unwrap()
        .with_sink(tx);
    sim.run_to_completion();
    drop(sim.set_sink(None));

    let received: Vec<GameEvent> = rx.iter().collect();
    assert_eq!(received.as_slice(), sim.events().as_slice());
}

#[test]
fn reset_starts_a_fresh_game() {
    let mut sim = SimulationInstance::seeded(RuleSet::default(), 8).unwrap();
    sim.step_many(500);
    sim.reset();

    assert_eq!(sim.state().quarter, 1);
    assert_eq!(sim.state().time, 0);
    assert_eq!(sim.state().score, PerTeam::new(0, 0));
    assert!(sim.events().is_empty());
    for team in TeamId::ALL {
        assert_eq!(sim.team(team).stats, TeamStats::default());
        assert_eq!(sim.team(team).players.len(), 5);
    }
    sim.run_to_completion();
    assert!(sim.is_game_over());
}

#[test]
fn invalid_rules_are_rejected_up_front() {
    let mut rules = RuleSet::default();
    rules.time.quarter_length = 0;
    assert!(SimulationInstance::seeded(rules, 1).is_err());
}

#[test]
fn oversized_quarter_is_rejected_before_the_clock_runs() {
    let mut rules = RuleSet::default();
    rules.time.quarter_length = u32::MAX / 30;
    assert!(matches!(
        SimulationInstance::seeded(rules, 1),
        Err(ConfigurationError::TooLarge { field: "time.quarterLength", .. })
    ));

    rules.time.quarter_length = MAX_QUARTER_MINUTES;
    let mut sim = SimulationInstance::seeded(rules, 1).unwrap();
    assert_eq!(sim.step_many(100), 100);
    assert_eq!(sim.state().quarter, 1);
    assert_eq!(sim.state().time, 100);
}
