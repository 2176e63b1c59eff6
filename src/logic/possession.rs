//! Possession resolver: turns one tick of play into stat, score, possession and log changes.
//!
//! Every decision is its own uniform draw from the injected RNG, and every player pick is an
//! independent uniform draw over the eligible roster.

use crate::logic::fouls::{
    free_throw_probability, FoulCall, FoulContext, FoulResolver, FoulSpot, TurnoverModel,
};
use crate::models::{
    EventKind, EventSink, GameState, PerTeam, Player, PlayerId, ReboundKind, RuleSet, ShotType,
    Team, TeamId, TurnoverKind,
};
use rand::{Rng, RngCore};

/// Share of half-court shots taken from three.
pub const THREE_POINT_RATE: f64 = 0.35;
/// Share of fast-break shots taken from three.
pub const FAST_BREAK_THREE_RATE: f64 = 0.20;
/// Share of turnovers that are steals.
pub const STEAL_SHARE: f64 = 0.60;
/// Chance a turnover turns into a fast break the other way.
pub const FAST_BREAK_CHANCE: f64 = 0.30;
/// Half-court shot probability bounds.
pub const MIN_SHOT_PROBABILITY: f64 = 0.10;
pub const MAX_SHOT_PROBABILITY: f64 = 0.95;

/// What the offense does with one tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Shoot,
    Pass,
    Turnover,
    /// Dribbling or setting up; nothing is logged unless a foul is called.
    Hold,
}

/// Cumulative probability edges for shoot, pass and turnover; the remainder is `Hold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionTable {
    pub shoot: f64,
    pub pass: f64,
    pub turnover: f64,
}

impl ActionTable {
    /// Band for the seconds run off the shot clock since it was last reset.
    pub fn for_elapsed(elapsed: u32) -> Self {
        match elapsed {
            0..=4 => Self { shoot: 0.80, pass: 0.95, turnover: 1.00 },
            5..=14 => Self { shoot: 0.40, pass: 0.80, turnover: 0.90 },
            _ => Self { shoot: 0.20, pass: 0.70, turnover: 0.80 },
        }
    }

    /// Move the pass/turnover edge by `bias`, never past the neighbouring edges.
    pub fn with_turnover_bias(self, bias: f64) -> Self {
        Self {
            pass: (self.pass - bias).clamp(self.shoot, self.turnover),
            ..self
        }
    }

    pub fn pick(&self, roll: f64) -> Action {
        if roll < self.shoot {
            Action::Shoot
        } else if roll < self.pass {
            Action::Pass
        } else if roll < self.turnover {
            Action::Turnover
        } else {
            Action::Hold
        }
    }
}

/// Half-court make probability: league base, shooter and defender ratings, shooter fatigue,
/// clamped to [0.10, 0.95].
pub fn shot_probability(shot_type: ShotType, shooter: &Player, defender: &Player) -> f64 {
    let base = match shot_type {
        ShotType::Three => {
            0.35 + shooter.skills.shooting.adjust(0.10, 0.10)
                - defender.skills.defense.adjust(0.07, 0.05)
        }
        ShotType::Two => {
            0.47 + shooter.skills.shooting.adjust(0.08, 0.08)
                - defender.skills.defense.adjust(0.10, 0.07)
        }
    };
    let fatigued = base - shooter.fatigue_ratio() * 0.15;
    fatigued.clamp(MIN_SHOT_PROBABILITY, MAX_SHOT_PROBABILITY)
}

/// Chance the defense secures a missed shot, from the two players contesting it.
pub fn defensive_rebound_probability(offensive: &Player, defensive: &Player) -> f64 {
    let p = 0.70 - offensive.skills.rebounding.adjust(0.10, 0.10)
        + defensive.skills.rebounding.adjust(0.10, 0.10);
    p.clamp(0.0, 1.0)
}

/// Fast-break make probability. Unopposed, so no defender, fatigue or clamp.
pub fn fast_break_probability(runner: &Player) -> f64 {
    0.65 + runner.skills.shooting.adjust(0.10, 0.08)
}

/// Borrowed view of one game that resolves possessions.
pub struct PossessionResolver<'a, R: RngCore> {
    rules: &'a RuleSet,
    teams: &'a mut PerTeam<Team>,
    state: &'a mut GameState,
    rng: &'a mut R,
    fouls: Option<&'a mut dyn FoulResolver>,
    turnovers: Option<&'a dyn TurnoverModel>,
    sink: Option<&'a mut dyn EventSink>,
}

impl<'a, R: RngCore> PossessionResolver<'a, R> {
    pub fn new(
        rules: &'a RuleSet,
        teams: &'a mut PerTeam<Team>,
        state: &'a mut GameState,
        rng: &'a mut R,
    ) -> Self {
        Self {
            rules,
            teams,
            state,
            rng,
            fouls: None,
            turnovers: None,
            sink: None,
        }
    }

    pub fn with_fouls(mut self, fouls: &'a mut dyn FoulResolver) -> Self {
        self.fouls = Some(fouls);
        self
    }

    pub fn with_turnovers(mut self, model: &'a dyn TurnoverModel) -> Self {
        self.turnovers = Some(model);
        self
    }

    pub fn with_sink(mut self, sink: &'a mut dyn EventSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Resolve one tick for the team in possession. Exactly one action fires.
    pub fn resolve(&mut self) {
        let offense = self.state.possession;
        let elapsed = self.state.shot_clock_elapsed(self.rules);
        let bias = self
            .turnovers
            .map_or(0.0, |model| model.turnover_bias(&self.teams[offense], self.rules));
        let table = ActionTable::for_elapsed(elapsed).with_turnover_bias(bias);
        match table.pick(self.rng.gen()) {
            Action::Shoot => self.attempt_shot(offense),
            Action::Pass => self.pass(offense),
            Action::Turnover => self.turnover(offense),
            Action::Hold => self.setup(offense),
        }
    }

    /// Half-court shot by `offense`. A miss goes to the glass; a make flips possession.
    pub fn attempt_shot(&mut self, offense: TeamId) {
        let defense = offense.other();
        let shot_type = if self.rng.gen::<f64>() < THREE_POINT_RATE {
            ShotType::Three
        } else {
            ShotType::Two
        };
        let shooter = self.pick(offense);
        let defender = self.pick(defense);

        if let Some(call) = self.call_foul(FoulSpot::Shot(shot_type), offense, shooter, defender) {
            self.apply_foul(offense, shooter, defender, call);
            return;
        }

        let probability = shot_probability(
            shot_type,
            self.teams[offense].player(shooter),
            self.teams[defense].player(defender),
        );
        let made = self.rng.gen::<f64>() < probability;
        let points = self.credit_field_goal(offense, shooter, shot_type, made);
        if made {
            self.log(EventKind::MadeShot {
                team: offense,
                player: shooter,
                shot_type,
                points,
            });
            self.give_ball(defense);
        } else {
            self.log(EventKind::MissedShot {
                team: offense,
                player: shooter,
                shot_type,
            });
            self.rebound(offense);
        }
    }

    /// Contest a missed shot by `offense`. Defensive boards flip possession with a full clock;
    /// offensive boards keep it with the offensive-rebound clock.
    pub fn rebound(&mut self, offense: TeamId) {
        let defense = offense.other();
        let offensive_player = self.pick(offense);
        let defensive_player = self.pick(defense);
        let probability = defensive_rebound_probability(
            self.teams[offense].player(offensive_player),
            self.teams[defense].player(defensive_player),
        );

        if self.rng.gen::<f64>() < probability {
            self.credit_rebound(defense, defensive_player, ReboundKind::Defensive);
            self.give_ball(defense);
        } else {
            self.credit_rebound(offense, offensive_player, ReboundKind::Offensive);
            self.state.possession = offense;
            self.state.shot_clock = self.rules.offensive_rebound_shot_clock();
        }
    }

    /// Swing the ball to a different teammate. Only the log changes.
    pub fn pass(&mut self, offense: TeamId) {
        let passer = self.pick(offense);
        let receiver =
            self.teams[offense].random_teammate(&mut *self.rng, passer, self.rules.team.foul_out_limit);
        self.log(EventKind::Pass {
            team: offense,
            from_player: passer,
            to_player: receiver,
        });
    }

    /// Lose the ball, by steal or unforced error; may set up a fast break the other way.
    pub fn turnover(&mut self, offense: TeamId) {
        let defense = offense.other();
        let handler = self.pick(offense);
        let thief = self.pick(defense);

        if self.rng.gen::<f64>() < STEAL_SHARE {
            self.teams[defense].stats.steals += 1;
            self.teams[defense].player_mut(thief).steals += 1;
            self.log(EventKind::Steal {
                offensive_team: offense,
                defensive_team: defense,
                offensive_player: handler,
                defensive_player: thief,
            });
        } else {
            self.log(EventKind::Turnover {
                team: offense,
                player: handler,
                kind: TurnoverKind::Error,
            });
        }

        self.teams[offense].stats.turnovers += 1;
        self.teams[offense].player_mut(handler).turnovers += 1;
        self.give_ball(defense);

        if self.rng.gen::<f64>() < FAST_BREAK_CHANCE {
            self.fast_break(defense);
        }
    }

    /// Transition scoring chance for `team`, which already has the ball.
    pub fn fast_break(&mut self, team: TeamId) {
        let runner = self.pick(team);
        self.teams[team].stats.fast_breaks += 1;
        self.log(EventKind::FastBreak { team, player: runner });

        let probability = fast_break_probability(self.teams[team].player(runner));
        let shot_type = if self.rng.gen::<f64>() < FAST_BREAK_THREE_RATE {
            ShotType::Three
        } else {
            ShotType::Two
        };
        let made = self.rng.gen::<f64>() < probability;
        let points = self.credit_field_goal(team, runner, shot_type, made);
        if made {
            self.log(EventKind::FastBreakScore {
                team,
                player: runner,
                shot_type,
                points,
            });
            self.give_ball(team.other());
        } else {
            self.log(EventKind::FastBreakMiss {
                team,
                player: runner,
                shot_type,
            });
            self.rebound(team);
        }
    }

    /// A setup tick. Only a foul resolver can make something happen here.
    fn setup(&mut self, offense: TeamId) {
        if self.fouls.is_none() {
            return;
        }
        let handler = self.pick(offense);
        let defender = self.pick(offense.other());
        if let Some(call) = self.call_foul(FoulSpot::Setup, offense, handler, defender) {
            self.apply_foul(offense, handler, defender, call);
        }
    }

    fn call_foul(
        &mut self,
        spot: FoulSpot,
        offense: TeamId,
        offensive_player: PlayerId,
        defender: PlayerId,
    ) -> Option<FoulCall> {
        let fouls = self.fouls.as_deref_mut()?;
        let defense = offense.other();
        let context = FoulContext {
            rules: self.rules,
            offensive_player: self.teams[offense].player(offensive_player),
            defender: self.teams[defense].player(defender),
            defense_team_fouls: self.state.fouls[defense],
        };
        fouls.call_foul(spot, &context, &mut *self.rng)
    }

    /// Charge the defender, check for a foul-out, then shoot any free throws.
    fn apply_foul(&mut self, offense: TeamId, fouled: PlayerId, defender: PlayerId, call: FoulCall) {
        let defense = offense.other();
        self.teams[defense].player_mut(defender).fouls += 1;
        self.teams[defense].stats.fouls += 1;
        self.state.fouls[defense] += 1;
        self.log(EventKind::Foul {
            team: defense,
            player: defender,
            fouled_player: fouled,
            kind: call.kind,
            free_throws: call.free_throws,
        });
        if self.teams[defense].player(defender).fouls == self.rules.team.foul_out_limit {
            log::debug!("Team {defense} #{defender} fouled out");
            self.log(EventKind::FoulOut {
                team: defense,
                player: defender,
            });
        }

        if call.free_throws == 0 {
            // Side-out: offense keeps the ball with at least the offensive-rebound clock.
            self.state.shot_clock = self
                .state
                .shot_clock
                .max(self.rules.offensive_rebound_shot_clock());
            return;
        }

        let mut last_made = false;
        for _ in 0..call.free_throws {
            last_made = self.free_throw(offense, fouled);
        }
        if last_made {
            self.give_ball(defense);
        } else {
            self.rebound(offense);
        }
    }

    fn free_throw(&mut self, team: TeamId, shooter: PlayerId) -> bool {
        let probability = free_throw_probability(self.teams[team].player(shooter));
        let made = self.rng.gen::<f64>() < probability;
        let value = self.rules.scoring.free_throw_value;
        let stats = &mut self.teams[team].stats;
        stats.ft_attempts += 1;
        if made {
            stats.ft_made += 1;
            self.teams[team].player_mut(shooter).points += value;
            self.state.score[team] += value;
        }
        self.log(EventKind::FreeThrow {
            team,
            player: shooter,
            made,
            points: if made { value } else { 0 },
        });
        made
    }

    /// Book a field-goal attempt; returns the shot's point value.
    fn credit_field_goal(&mut self, team: TeamId, shooter: PlayerId, shot_type: ShotType, made: bool) -> u32 {
        let points = match shot_type {
            ShotType::Three => self.rules.scoring.three_point_value,
            ShotType::Two => self.rules.scoring.two_point_value,
        };
        let is_three = shot_type == ShotType::Three;
        let stats = &mut self.teams[team].stats;
        stats.fg_attempts += 1;
        if is_three {
            stats.three_attempts += 1;
        }
        if made {
            stats.fg_made += 1;
            if is_three {
                stats.three_made += 1;
            }
            self.teams[team].player_mut(shooter).points += points;
            self.state.score[team] += points;
        }
        points
    }

    fn credit_rebound(&mut self, team: TeamId, player: PlayerId, kind: ReboundKind) {
        let stats = &mut self.teams[team].stats;
        stats.rebounds += 1;
        match kind {
            ReboundKind::Offensive => stats.off_rebounds += 1,
            ReboundKind::Defensive => stats.def_rebounds += 1,
        }
        self.teams[team].player_mut(player).rebounds += 1;
        self.log(EventKind::Rebound { team, player, kind });
    }

    fn give_ball(&mut self, team: TeamId) {
        self.state.possession = team;
        self.state.shot_clock = self.rules.time.shot_clock;
    }

    fn pick(&mut self, team: TeamId) -> PlayerId {
        self.teams[team].random_player(&mut *self.rng, self.rules.team.foul_out_limit)
    }

    fn log(&mut self, kind: EventKind) {
        self.state.record(kind, self.sink.as_deref_mut());
    }
}
