//! Simulation logic: possession resolution, fouls, the step loop and post-game analysis.

mod clock;
mod fouls;
mod possession;
mod summary;

pub use clock::{Playback, SimulationInstance, Tick, BASE_TICK_INTERVAL, MAX_SPEED};
pub use fouls::{
    free_throw_probability, FoulCall, FoulContext, FoulResolver, FoulSpot, PersonalFouls,
    TurnoverModel, BONUS_TEAM_FOULS,
};
pub use possession::{
    defensive_rebound_probability, fast_break_probability, shot_probability, Action, ActionTable,
    PossessionResolver, FAST_BREAK_CHANCE, FAST_BREAK_THREE_RATE, STEAL_SHARE, THREE_POINT_RATE,
};
pub use summary::{
    analyze_rule_impact, generate_game_summary, percentage, Comeback, GameLength, GameSummary,
    Level, Pace, RuleImpact, ShootingPercentages,
};
