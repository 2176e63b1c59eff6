//! RuleSet: the per-game configuration every other component reads, plus the built-in presets.

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Smallest roster the engine accepts (a pass needs a distinct teammate).
pub const MIN_PLAYERS_PER_TEAM: u32 = 2;
/// Longest quarter whose length in seconds still fits the clock.
pub const MAX_QUARTER_MINUTES: u32 = u32::MAX / 60;

/// Point values for each kind of basket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub three_point_value: u32,
    pub two_point_value: u32,
    pub free_throw_value: u32,
}

/// Game clock settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRules {
    /// Minutes per quarter.
    pub quarter_length: u32,
    /// Seconds per possession.
    pub shot_clock: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRules {
    pub players_per_team: u32,
    pub foul_out_limit: u32,
}

/// Rule toggles. The stock engine only consults `bonus_possession`; the other two are read
/// by the foul and turnover hooks in `logic::fouls`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedRules {
    pub bonus_rule: bool,
    pub three_second_rule: bool,
    pub bonus_possession: bool,
}

/// Full rule set for one simulation run. Shape matches the JSON rule object used by clients.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub scoring: ScoringRules,
    pub time: TimeRules,
    pub team: TeamRules,
    pub advanced: AdvancedRules,
}

impl Default for RuleSet {
    fn default() -> Self {
        Preset::Nba.rules()
    }
}

impl RuleSet {
    /// Parse a TOML rule file and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        let rules: RuleSet = toml::from_str(source)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject rule sets the engine cannot run: every numeric field positive, roster of at least two,
    /// quarter length countable in seconds.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let fields = [
            ("scoring.threePointValue", self.scoring.three_point_value),
            ("scoring.twoPointValue", self.scoring.two_point_value),
            ("scoring.freeThrowValue", self.scoring.free_throw_value),
            ("time.quarterLength", self.time.quarter_length),
            ("time.shotClock", self.time.shot_clock),
            ("team.playersPerTeam", self.team.players_per_team),
            ("team.foulOutLimit", self.team.foul_out_limit),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigurationError::NonPositive { field: *field });
        }
        if self.team.players_per_team < MIN_PLAYERS_PER_TEAM {
            return Err(ConfigurationError::RosterTooSmall {
                players: self.team.players_per_team,
                min: MIN_PLAYERS_PER_TEAM,
            });
        }
        if self.time.quarter_length > MAX_QUARTER_MINUTES {
            return Err(ConfigurationError::TooLarge {
                field: "time.quarterLength",
                value: self.time.quarter_length,
                max: MAX_QUARTER_MINUTES,
            });
        }
        Ok(())
    }

    /// Regulation length in seconds of one quarter.
    pub fn quarter_seconds(&self) -> u32 {
        self.time.quarter_length * 60
    }

    /// Regulation length of the whole game in minutes (four quarters, no overtime).
    pub fn game_minutes(&self) -> f64 {
        f64::from(self.time.quarter_length) * 4.0
    }

    /// Shot clock after an offensive rebound: full with bonus possession, otherwise capped at 14.
    pub fn offensive_rebound_shot_clock(&self) -> u32 {
        if self.advanced.bonus_possession {
            self.time.shot_clock
        } else {
            self.time.shot_clock.min(14)
        }
    }
}

/// Built-in rule presets. User-named presets live outside the engine.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Nba,
    Fiba,
    Ncaa,
    Experimental,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Nba, Preset::Fiba, Preset::Ncaa, Preset::Experimental];

    /// Display name, e.g. "NBA Rules".
    pub fn name(self) -> &'static str {
        match self {
            Preset::Nba => "NBA Rules",
            Preset::Fiba => "FIBA Rules",
            Preset::Ncaa => "NCAA Rules",
            Preset::Experimental => "Experimental Rules",
        }
    }

    /// Look up by display name or short key ("fiba"), ignoring case.
    pub fn from_name(name: &str) -> Result<Self, ConfigurationError> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| {
                p.name().eq_ignore_ascii_case(wanted)
                    || p.name()
                        .split_whitespace()
                        .next()
                        .is_some_and(|key| key.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| ConfigurationError::UnknownPreset(wanted.to_string()))
    }

    pub fn rules(self) -> RuleSet {
        let standard_scoring = ScoringRules {
            three_point_value: 3,
            two_point_value: 2,
            free_throw_value: 1,
        };
        let standard_advanced = AdvancedRules {
            bonus_rule: true,
            three_second_rule: true,
            bonus_possession: false,
        };
        match self {
            Preset::Nba => RuleSet {
                scoring: standard_scoring,
                time: TimeRules { quarter_length: 12, shot_clock: 24 },
                team: TeamRules { players_per_team: 5, foul_out_limit: 6 },
                advanced: standard_advanced,
            },
            Preset::Fiba => RuleSet {
                scoring: standard_scoring,
                time: TimeRules { quarter_length: 10, shot_clock: 24 },
                team: TeamRules { players_per_team: 5, foul_out_limit: 5 },
                advanced: standard_advanced,
            },
            // Two 20-minute halves in real life; modelled as four 20-minute periods.
            Preset::Ncaa => RuleSet {
                scoring: standard_scoring,
                time: TimeRules { quarter_length: 20, shot_clock: 30 },
                team: TeamRules { players_per_team: 5, foul_out_limit: 5 },
                advanced: standard_advanced,
            },
            Preset::Experimental => RuleSet {
                scoring: ScoringRules {
                    three_point_value: 4,
                    ..standard_scoring
                },
                time: TimeRules { quarter_length: 8, shot_clock: 18 },
                team: TeamRules { players_per_team: 4, foul_out_limit: 4 },
                advanced: AdvancedRules {
                    bonus_rule: false,
                    three_second_rule: false,
                    bonus_possession: true,
                },
            },
        }
    }
}
