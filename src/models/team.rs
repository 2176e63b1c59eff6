//! TeamId, the two-slot PerTeam container, TeamStats and Team.

use crate::models::player::{Player, PlayerId};
use crate::models::rules::RuleSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Which side. Exactly two per game.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TeamId {
    A,
    B,
}

impl TeamId {
    pub const ALL: [TeamId; 2] = [TeamId::A, TeamId::B];

    /// The opposing side.
    pub fn other(self) -> Self {
        match self {
            TeamId::A => TeamId::B,
            TeamId::B => TeamId::A,
        }
    }

    /// Default display name ("Team A").
    pub fn display_name(self) -> &'static str {
        match self {
            TeamId::A => "Team A",
            TeamId::B => "Team B",
        }
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamId::A => write!(f, "A"),
            TeamId::B => write!(f, "B"),
        }
    }
}

/// One value per side, indexed by `TeamId`. Serializes as `{"A": .., "B": ..}`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PerTeam<T> {
    #[serde(rename = "A")]
    pub a: T,
    #[serde(rename = "B")]
    pub b: T,
}

impl<T> PerTeam<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Build both slots from a function of the side.
    pub fn from_fn(mut f: impl FnMut(TeamId) -> T) -> Self {
        let a = f(TeamId::A);
        let b = f(TeamId::B);
        Self { a, b }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerTeam<U> {
        PerTeam {
            a: f(&self.a),
            b: f(&self.b),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &T)> {
        [(TeamId::A, &self.a), (TeamId::B, &self.b)].into_iter()
    }
}

impl<T> Index<TeamId> for PerTeam<T> {
    type Output = T;

    fn index(&self, team: TeamId) -> &T {
        match team {
            TeamId::A => &self.a,
            TeamId::B => &self.b,
        }
    }
}

impl<T> IndexMut<TeamId> for PerTeam<T> {
    fn index_mut(&mut self, team: TeamId) -> &mut T {
        match team {
            TeamId::A => &mut self.a,
            TeamId::B => &mut self.b,
        }
    }
}

/// Aggregate team statistics, updated as events happen (never rebuilt from the log).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub fg_attempts: u32,
    pub fg_made: u32,
    pub three_attempts: u32,
    pub three_made: u32,
    pub ft_attempts: u32,
    pub ft_made: u32,
    /// Always `off_rebounds + def_rebounds`.
    pub rebounds: u32,
    pub off_rebounds: u32,
    pub def_rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u32,
    pub fast_breaks: u32,
}

/// A side: identity, roster and running stats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub players: Vec<Player>,
    pub stats: TeamStats,
}

impl Team {
    /// Build `players_per_team` players with random ratings; stats zeroed.
    pub fn create<R: Rng + ?Sized>(id: TeamId, rules: &RuleSet, rng: &mut R) -> Self {
        let players = (0..rules.team.players_per_team as usize)
            .map(|index| Player::random(index, rng))
            .collect();
        Self::with_players(id, players)
    }

    /// Team with a given roster (fixtures, replays).
    pub fn with_players(id: TeamId, players: Vec<Player>) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            players,
            stats: TeamStats::default(),
        }
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id as usize]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id as usize]
    }

    /// Uniform draw over players still in the game. If everyone has fouled out the whole
    /// roster is eligible again.
    pub fn random_player<R: Rng + ?Sized>(&self, rng: &mut R, foul_out_limit: u32) -> PlayerId {
        self.draw(rng, foul_out_limit, None)
    }

    /// Uniform draw over eligible players other than `except`.
    pub fn random_teammate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        except: PlayerId,
        foul_out_limit: u32,
    ) -> PlayerId {
        self.draw(rng, foul_out_limit, Some(except))
    }

    fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        foul_out_limit: u32,
        except: Option<PlayerId>,
    ) -> PlayerId {
        let not_excluded = |p: &&Player| Some(p.id) != except;
        let mut pool: Vec<PlayerId> = self
            .players
            .iter()
            .filter(not_excluded)
            .filter(|p| !p.is_fouled_out(foul_out_limit))
            .map(|p| p.id)
            .collect();
        if pool.is_empty() {
            pool = self.players.iter().filter(not_excluded).map(|p| p.id).collect();
        }
        // Validated rosters have at least two players, so the pool is never empty here.
        pool[rng.gen_range(0..pool.len())]
    }

    /// Sum of player fatigue (the analyzer averages it across both rosters).
    pub fn total_fatigue(&self) -> u32 {
        self.players.iter().map(|p| p.fatigue).sum()
    }
}
