//! Post-game summary: final score, stat blocks, shooting percentages, box scores and the
//! rule-impact classification.

use crate::models::{GameState, PerTeam, PlayerLine, RuleSet, Team, TeamStats};
use serde::{Deserialize, Serialize};

/// Possessions per minute above which the pace reads as faster.
pub const FAST_PACE: f64 = 2.5;
/// Possessions per minute below which the pace reads as slower.
pub const SLOW_PACE: f64 = 1.8;
pub const HIGH_SCORING: f64 = 5.0;
pub const LOW_SCORING: f64 = 3.0;
pub const HIGH_FATIGUE: f64 = 70.0;
pub const LOW_FATIGUE: f64 = 40.0;

/// `made / attempts`, or 0 when nothing was attempted.
pub fn percentage(made: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        0.0
    } else {
        f64::from(made) / f64::from(attempts)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShootingPercentages {
    pub fg: f64,
    pub three: f64,
    pub ft: f64,
}

impl ShootingPercentages {
    pub fn from_stats(stats: &TeamStats) -> Self {
        Self {
            fg: percentage(stats.fg_made, stats.fg_attempts),
            three: percentage(stats.three_made, stats.three_attempts),
            ft: percentage(stats.ft_made, stats.ft_attempts),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Faster,
    Slower,
    Typical,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Higher,
    Lower,
    Typical,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameLength {
    Longer,
    Shorter,
    Typical,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comeback {
    Easier,
    Harder,
    Typical,
}

/// How the active rules shaped the game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RuleImpact {
    pub pace: Pace,
    pub scoring: Level,
    /// Always `Typical`: overtime is not modelled, so every game runs regulation length.
    pub length: GameLength,
    pub fatigue: Level,
    /// Always `Typical`: there is no game-flow analysis behind this classification.
    pub comeback: Comeback,
}

fn classify_level(value: f64, high: f64, low: f64) -> Level {
    if value > high {
        Level::Higher
    } else if value < low {
        Level::Lower
    } else {
        Level::Typical
    }
}

/// Classify pace, scoring and fatigue against fixed thresholds. Field-goal attempts stand in
/// for possessions.
pub fn analyze_rule_impact(rules: &RuleSet, teams: &PerTeam<Team>, state: &GameState) -> RuleImpact {
    let minutes = rules.game_minutes();
    let total_points = f64::from(state.score.a + state.score.b);
    let possessions = f64::from(teams.a.stats.fg_attempts + teams.b.stats.fg_attempts);
    let possessions_per_minute = possessions / minutes;

    let pace = if possessions_per_minute > FAST_PACE {
        Pace::Faster
    } else if possessions_per_minute < SLOW_PACE {
        Pace::Slower
    } else {
        Pace::Typical
    };

    let player_count = teams.a.players.len() + teams.b.players.len();
    let average_fatigue = if player_count == 0 {
        0.0
    } else {
        f64::from(teams.a.total_fatigue() + teams.b.total_fatigue()) / player_count as f64
    };

    RuleImpact {
        pace,
        scoring: classify_level(total_points / minutes, HIGH_SCORING, LOW_SCORING),
        length: GameLength::Typical,
        fatigue: classify_level(average_fatigue, HIGH_FATIGUE, LOW_FATIGUE),
        comeback: Comeback::Typical,
    }
}

/// Everything the results screen shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub final_score: PerTeam<u32>,
    pub stats: PerTeam<TeamStats>,
    pub shooting_percentages: PerTeam<ShootingPercentages>,
    pub box_score: PerTeam<Vec<PlayerLine>>,
    pub rule_impact: RuleImpact,
}

/// Build the summary from current state. Mid-game this reports partial figures; callers wanting
/// final numbers check `GameState::is_game_over` first.
pub fn generate_game_summary(rules: &RuleSet, teams: &PerTeam<Team>, state: &GameState) -> GameSummary {
    GameSummary {
        final_score: state.score,
        stats: teams.map(|t| t.stats),
        shooting_percentages: teams.map(|t| ShootingPercentages::from_stats(&t.stats)),
        box_score: teams.map(|t| t.players.iter().map(|p| p.line()).collect()),
        rule_impact: analyze_rule_impact(rules, teams, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, Skills, SkillLevel, TeamId};

    fn teams_with(fga_a: u32, fga_b: u32, fatigue: u32) -> PerTeam<Team> {
        PerTeam::from_fn(|id| {
            let players = (0..5)
                .map(|i| {
                    let mut p = Player::new(i, Skills::uniform(SkillLevel::Medium));
                    p.fatigue = fatigue;
                    p
                })
                .collect();
            let mut team = Team::with_players(id, players);
            team.stats.fg_attempts = if id == TeamId::A { fga_a } else { fga_b };
            team
        })
    }

    #[test]
    fn percentage_is_zero_without_attempts() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 4), 0.75);
    }

    #[test]
    fn classifies_pace_scoring_and_fatigue() {
        let rules = RuleSet::default(); // 48 minutes
        let mut state = GameState::new(&rules, TeamId::A);

        // 130 attempts / 48 = 2.7 per minute; 260 points / 48 = 5.4 per minute
        state.score = PerTeam::new(130, 130);
        let impact = analyze_rule_impact(&rules, &teams_with(65, 65, 80), &state);
        assert_eq!(impact.pace, Pace::Faster);
        assert_eq!(impact.scoring, Level::Higher);
        assert_eq!(impact.fatigue, Level::Higher);

        // 80 / 48 = 1.67; 100 / 48 = 2.1
        state.score = PerTeam::new(50, 50);
        let impact = analyze_rule_impact(&rules, &teams_with(40, 40, 0), &state);
        assert_eq!(impact.pace, Pace::Slower);
        assert_eq!(impact.scoring, Level::Lower);
        assert_eq!(impact.fatigue, Level::Lower);

        // 100 / 48 = 2.08; 200 / 48 = 4.2
        state.score = PerTeam::new(100, 100);
        let impact = analyze_rule_impact(&rules, &teams_with(50, 50, 55), &state);
        assert_eq!(impact.pace, Pace::Typical);
        assert_eq!(impact.scoring, Level::Typical);
        assert_eq!(impact.fatigue, Level::Typical);
        assert_eq!(impact.length, GameLength::Typical);
        assert_eq!(impact.comeback, Comeback::Typical);
    }
}
