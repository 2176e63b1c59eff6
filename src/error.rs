//! Errors raised at the configuration boundary. The tick loop itself never fails.

use thiserror::Error;

/// A rule set or preset request that cannot be handed to the engine.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A numeric rule field was zero.
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    /// Passing needs a distinct teammate, so a side needs at least two players.
    #[error("playersPerTeam must be at least {min} (got {players})")]
    RosterTooSmall { players: u32, min: u32 },

    /// A value too large for the game clock to count.
    #[error("{field} must be at most {max} (got {value})")]
    TooLarge {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid rule file: {0}")]
    Toml(#[from] toml::de::Error),
}
