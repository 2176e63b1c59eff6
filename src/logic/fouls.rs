//! Foul and ball-security extension points.
//!
//! With no resolver attached the engine calls no fouls and gives ball handling no weight.
//! `PersonalFouls` is an opt-in resolver that turns on shooting fouls, free throws, the bonus
//! rule and foul-outs.

use crate::models::{FoulKind, Player, RuleSet, ShotType, Team};
use rand::{Rng, RngCore};

/// Team fouls a defense may commit in a quarter before setup fouls send the offense to the line.
pub const BONUS_TEAM_FOULS: u32 = 4;

/// Where in the possession a foul could be called.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FoulSpot {
    /// On a half-court shot attempt of the given type.
    Shot(ShotType),
    /// During a tick where the offense is setting up (no shot, pass or turnover).
    Setup,
}

/// What the resolver sees when deciding on a foul.
#[derive(Clone, Copy, Debug)]
pub struct FoulContext<'a> {
    pub rules: &'a RuleSet,
    /// Ball handler or shooter.
    pub offensive_player: &'a Player,
    /// Player who would be charged.
    pub defender: &'a Player,
    /// Fouls the defense has already committed this quarter.
    pub defense_team_fouls: u32,
}

/// A called foul. `free_throws == 0` means the offense inbounds and keeps the ball.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FoulCall {
    pub kind: FoulKind,
    pub free_throws: u32,
}

/// Decides whether a foul is called. The possession resolver applies the consequences.
pub trait FoulResolver: Send + Sync {
    fn call_foul(
        &mut self,
        spot: FoulSpot,
        context: &FoulContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<FoulCall>;
}

/// Shooting fouls and bonus-rule setup fouls at fixed per-opportunity rates.
#[derive(Clone, Copy, Debug)]
pub struct PersonalFouls {
    /// Chance a half-court shot attempt draws a shooting foul.
    pub shooting_rate: f64,
    /// Chance a setup tick produces a personal foul.
    pub setup_rate: f64,
}

impl Default for PersonalFouls {
    fn default() -> Self {
        Self {
            shooting_rate: 0.12,
            setup_rate: 0.08,
        }
    }
}

impl FoulResolver for PersonalFouls {
    fn call_foul(
        &mut self,
        spot: FoulSpot,
        context: &FoulContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<FoulCall> {
        match spot {
            FoulSpot::Shot(shot_type) => {
                if !rng.gen_bool(self.shooting_rate.clamp(0.0, 1.0)) {
                    return None;
                }
                let free_throws = match shot_type {
                    ShotType::Three => 3,
                    ShotType::Two => 2,
                };
                Some(FoulCall {
                    kind: FoulKind::Shooting,
                    free_throws,
                })
            }
            FoulSpot::Setup => {
                if !rng.gen_bool(self.setup_rate.clamp(0.0, 1.0)) {
                    return None;
                }
                let in_bonus = context.rules.advanced.bonus_rule
                    && context.defense_team_fouls >= BONUS_TEAM_FOULS;
                Some(FoulCall {
                    kind: FoulKind::Personal,
                    free_throws: if in_bonus { 2 } else { 0 },
                })
            }
        }
    }
}

/// Success chance of one free throw for a shooter.
pub fn free_throw_probability(shooter: &Player) -> f64 {
    0.75 + shooter.skills.shooting.adjust(0.10, 0.10)
}

/// Shifts probability from the pass band to the turnover band of the action table
/// (negative values shift it back). Ball-handling ratings and the three-second rule are
/// meant to act here; without a model attached both are inert.
pub trait TurnoverModel: Send + Sync {
    fn turnover_bias(&self, offense: &Team, rules: &RuleSet) -> f64;
}
