//! Integration tests for roster creation: shape, positions, and rating distribution.

use basketball_sim::models::{Position, SkillLevel};
use basketball_sim::{RuleSet, Team, TeamId, TeamStats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rules_with_roster(players: u32) -> RuleSet {
    let mut rules = RuleSet::default();
    rules.team.players_per_team = players;
    rules
}

#[test]
fn create_builds_roster_with_cycling_positions() {
    let rules = rules_with_roster(7);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let team = Team::create(TeamId::B, &rules, &mut rng);

    assert_eq!(team.id, TeamId::B);
    assert_eq!(team.name, "Team B");
    assert_eq!(team.stats, TeamStats::default());
    assert_eq!(team.players.len(), 7);

    let ids: Vec<u32> = team.players.iter().map(|p| p.id).collect();
    assert_eq!(ids, (0..7).collect::<Vec<u32>>());

    let positions: Vec<Position> = team.players.iter().map(|p| p.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::PG,
            Position::SG,
            Position::SF,
            Position::PF,
            Position::C,
            Position::PG,
            Position::SG,
        ]
    );

    for p in &team.players {
        assert_eq!(p.fatigue, 0);
        assert_eq!(p.fouls, 0);
        assert_eq!(p.points, 0);
        assert_eq!(p.rebounds, 0);
        assert_eq!(p.turnovers, 0);
    }
}

#[test]
fn skill_levels_are_drawn_uniformly() {
    let rules = rules_with_roster(3000);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let team = Team::create(TeamId::A, &rules, &mut rng);

    let mut counts = [0usize; 3];
    for p in &team.players {
        let s = p.skills;
        for level in [s.shooting, s.defense, s.ball_handling, s.rebounding, s.speed] {
            let slot = SkillLevel::ALL.iter().position(|l| *l == level).unwrap();
            counts[slot] += 1;
        }
    }

    // 15000 draws: each level near a third.
    let total: usize = counts.iter().sum();
    assert_eq!(total, 15_000);
    for (level, count) in SkillLevel::ALL.iter().zip(counts) {
        let share = count as f64 / total as f64;
        assert!((share - 1.0 / 3.0).abs() < 0.03, "{level:?} share {share:.3}");
    }
}

#[test]
fn same_seed_same_roster() {
    let rules = RuleSet::default();
    let first = Team::create(TeamId::A, &rules, &mut ChaCha8Rng::seed_from_u64(9));
    let second = Team::create(TeamId::A, &rules, &mut ChaCha8Rng::seed_from_u64(9));
    assert_eq!(first, second);
}
