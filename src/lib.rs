//! Basketball rule-set simulator: library with models, the possession engine and analysis.

pub mod error;
pub mod export;
pub mod logic;
pub mod models;

pub use error::ConfigurationError;
pub use export::write_events_csv;
pub use logic::{
    generate_game_summary, FoulResolver, GameSummary, PersonalFouls, Playback,
    PossessionResolver, RuleImpact, SimulationInstance, Tick, TurnoverModel,
};
pub use models::{
    EventKind, EventLog, EventSink, GameEvent, GameState, PerTeam, Player, PlayerId, Preset,
    RuleSet, ShotType, Team, TeamId, TeamStats,
};
