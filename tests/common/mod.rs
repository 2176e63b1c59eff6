//! Shared fixtures: a scripted random source and hand-built rosters.

#![allow(dead_code)]

use basketball_sim::models::{Player, SkillLevel, Skills};
use basketball_sim::{PerTeam, Team};
use rand::RngCore;
use std::collections::VecDeque;

/// Replays a fixed list of raw draws. `roll(x)` makes the next `gen::<f64>()` return `x`;
/// `index(k, n)` makes the next `gen_range(0..n)` return `k`.
pub struct ScriptedRng {
    draws: VecDeque<u64>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self {
            draws: VecDeque::new(),
        }
    }

    pub fn roll(mut self, x: f64) -> Self {
        self.draws.push_back(((x * (1u64 << 53) as f64) as u64) << 11);
        self
    }

    pub fn index(mut self, k: usize, n: usize) -> Self {
        let v = (((4 * k + 1) as u128) << 64) / (4 * n as u128);
        self.draws.push_back(v as u64);
        self
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.draws.pop_front().expect("script ran out of draws")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Two five-man rosters of average players.
pub fn average_teams() -> PerTeam<Team> {
    PerTeam::from_fn(|id| {
        let players = (0..5)
            .map(|i| Player::new(i, Skills::uniform(SkillLevel::Medium)))
            .collect();
        Team::with_players(id, players)
    })
}
