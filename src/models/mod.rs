//! Data structures for the simulator: rules, players, teams, game state and events.

mod event;
mod game;
mod player;
mod rules;
mod team;

pub use event::{
    EventKind, EventLog, EventSink, FoulKind, GameEvent, ReboundKind, ShotType, TurnoverKind,
};
pub use game::{GameState, FINAL_QUARTER};
pub use player::{Player, PlayerId, PlayerLine, Position, SkillLevel, Skills};
pub use rules::{
    AdvancedRules, Preset, RuleSet, ScoringRules, TeamRules, TimeRules, MAX_QUARTER_MINUTES,
    MIN_PLAYERS_PER_TEAM,
};
pub use team::{PerTeam, Team, TeamId, TeamStats};
