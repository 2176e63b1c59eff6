//! Player, skill ratings, and the PlayerLine box-score view.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Roster index of a player within their team.
pub type PlayerId = u32;

/// Three-level skill rating.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Low,
    Medium,
    High,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [SkillLevel::Low, SkillLevel::Medium, SkillLevel::High];

    /// Uniform draw over the three levels.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// `high` for High, `-low` for Low, zero otherwise.
    pub fn adjust(self, high: f64, low: f64) -> f64 {
        match self {
            SkillLevel::High => high,
            SkillLevel::Medium => 0.0,
            SkillLevel::Low => -low,
        }
    }
}

/// Court position, assigned by roster index.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
}

impl Position {
    const CYCLE: [Position; 5] = [Position::PG, Position::SG, Position::SF, Position::PF, Position::C];

    /// PG, SG, SF, PF, C, then around again.
    pub fn for_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }
}

/// Skill ratings fixed at creation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skills {
    pub shooting: SkillLevel,
    pub defense: SkillLevel,
    /// Not consulted by the stock resolver; see `logic::fouls::TurnoverModel`.
    pub ball_handling: SkillLevel,
    pub rebounding: SkillLevel,
    pub speed: SkillLevel,
}

impl Skills {
    /// Each rating drawn independently, in field order.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            shooting: SkillLevel::random(rng),
            defense: SkillLevel::random(rng),
            ball_handling: SkillLevel::random(rng),
            rebounding: SkillLevel::random(rng),
            speed: SkillLevel::random(rng),
        }
    }

    pub fn uniform(level: SkillLevel) -> Self {
        Self {
            shooting: level,
            defense: level,
            ball_handling: level,
            rebounding: level,
            speed: level,
        }
    }
}

/// A player on one team. Counters only ever go up.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub position: Position,
    pub skills: Skills,
    /// 0 to 100.
    pub fatigue: u32,
    pub fouls: u32,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
}

impl Player {
    /// Create a player at roster slot `index` with the given ratings. Counters start at zero.
    pub fn new(index: usize, skills: Skills) -> Self {
        Self {
            id: index as PlayerId,
            position: Position::for_index(index),
            skills,
            fatigue: 0,
            fouls: 0,
            points: 0,
            rebounds: 0,
            assists: 0,
            steals: 0,
            blocks: 0,
            turnovers: 0,
        }
    }

    /// Player at roster slot `index` with randomly drawn ratings.
    pub fn random<R: Rng + ?Sized>(index: usize, rng: &mut R) -> Self {
        Self::new(index, Skills::random(rng))
    }

    /// Fatigue as a fraction in [0, 1].
    pub fn fatigue_ratio(&self) -> f64 {
        f64::from(self.fatigue.min(100)) / 100.0
    }

    pub fn is_fouled_out(&self, foul_out_limit: u32) -> bool {
        self.fouls >= foul_out_limit
    }

    /// Box-score line for this player (for summaries / API responses).
    pub fn line(&self) -> PlayerLine {
        PlayerLine::from_player(self)
    }
}

/// Box-score view of a player.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLine {
    pub id: PlayerId,
    pub position: Option<Position>,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u32,
    pub fatigue: u32,
}

impl PlayerLine {
    pub fn from_player(p: &Player) -> Self {
        Self {
            id: p.id,
            position: Some(p.position),
            points: p.points,
            rebounds: p.rebounds,
            assists: p.assists,
            steals: p.steals,
            blocks: p.blocks,
            turnovers: p.turnovers,
            fouls: p.fouls,
            fatigue: p.fatigue,
        }
    }
}
