//! Game clock and step loop: `SimulationInstance` owns one game and advances it a second at a time.

use crate::error::ConfigurationError;
use crate::logic::fouls::{FoulResolver, TurnoverModel};
use crate::logic::possession::PossessionResolver;
use crate::logic::summary::{generate_game_summary, GameSummary};
use crate::models::{EventKind, EventLog, EventSink, GameState, PerTeam, RuleSet, Team, TeamId};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wall-clock gap between driver wake-ups at speed 1.
pub const BASE_TICK_INTERVAL: Duration = Duration::from_millis(50);
pub const MAX_SPEED: u32 = 10;

/// What a single tick did.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tick {
    /// The possession resolver ran.
    Possession,
    ShotClockViolation,
    QuarterEnd,
    /// The game is (now) over; further ticks do nothing.
    GameOver,
}

/// Playback cadence for real-time drivers, which wake every `BASE_TICK_INTERVAL`. Speed changes
/// how many ticks run per wake-up, never what happens in them.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    speed: u32,
}

impl Default for Playback {
    fn default() -> Self {
        Self { speed: 1 }
    }
}

impl Playback {
    /// Speed is clamped to 1..=MAX_SPEED.
    pub fn new(speed: u32) -> Self {
        Self {
            speed: speed.clamp(1, MAX_SPEED),
        }
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Simulated seconds to run per wake-up.
    pub fn ticks_per_interval(&self) -> u32 {
        self.speed
    }
}

/// One independent game: rules, both teams, state, random source, optional hooks and sink.
/// Nothing is shared between instances.
pub struct SimulationInstance<R: RngCore = ChaCha8Rng> {
    rules: RuleSet,
    teams: PerTeam<Team>,
    state: GameState,
    rng: R,
    fouls: Option<Box<dyn FoulResolver>>,
    turnovers: Option<Box<dyn TurnoverModel>>,
    sink: Option<Box<dyn EventSink>>,
}

impl SimulationInstance<ChaCha8Rng> {
    /// Instance whose whole game is reproducible from `seed`.
    pub fn seeded(rules: RuleSet, seed: u64) -> Result<Self, ConfigurationError> {
        Self::new(rules, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy(rules: RuleSet) -> Result<Self, ConfigurationError> {
        Self::new(rules, ChaCha8Rng::from_entropy())
    }
}

impl<R: RngCore> SimulationInstance<R> {
    /// Validate the rules, build both rosters and tip off. This is the configuration boundary:
    /// nothing after it can fail.
    pub fn new(rules: RuleSet, mut rng: R) -> Result<Self, ConfigurationError> {
        rules.validate()?;
        let (teams, state) = tip_off(&rules, &mut rng);
        Ok(Self {
            rules,
            teams,
            state,
            rng,
            fouls: None,
            turnovers: None,
            sink: None,
        })
    }

    /// Attach a foul resolver (none by default: no fouls are called).
    pub fn with_fouls(mut self, fouls: impl FoulResolver + 'static) -> Self {
        self.fouls = Some(Box::new(fouls));
        self
    }

    /// Attach a turnover model (none by default: ball handling has no effect).
    pub fn with_turnovers(mut self, model: impl TurnoverModel + 'static) -> Self {
        self.turnovers = Some(Box::new(model));
        self
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Replace the event sink, returning the previous one.
    pub fn set_sink(&mut self, sink: Option<Box<dyn EventSink>>) -> Option<Box<dyn EventSink>> {
        std::mem::replace(&mut self.sink, sink)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn teams(&self) -> &PerTeam<Team> {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> &Team {
        &self.teams[id]
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Advance one simulated second.
    pub fn step(&mut self) -> Tick {
        if self.state.is_game_over() {
            return Tick::GameOver;
        }

        self.state.time += 1;
        self.state.shot_clock = self.state.shot_clock.saturating_sub(1);

        if self.state.time >= self.rules.quarter_seconds() {
            self.end_quarter()
        } else if self.state.shot_clock == 0 {
            self.shot_clock_violation();
            Tick::ShotClockViolation
        } else {
            self.resolve_possession();
            Tick::Possession
        }
    }

    /// Run up to `ticks` steps, stopping at game over. Returns how many ran.
    pub fn step_many(&mut self, ticks: u32) -> u32 {
        let mut ran = 0;
        while ran < ticks && !self.state.is_game_over() {
            self.step();
            ran += 1;
        }
        ran
    }

    /// Step until the final buzzer and summarize.
    pub fn run_to_completion(&mut self) -> GameSummary {
        while !self.state.is_game_over() {
            self.step();
        }
        self.summary()
    }

    /// Summary of the current state; final only once `is_game_over()`.
    pub fn summary(&self) -> GameSummary {
        generate_game_summary(&self.rules, &self.teams, &self.state)
    }

    /// New rosters and a fresh game under the same rules. The random stream continues, so a
    /// reset game differs from the first one.
    pub fn reset(&mut self) {
        let (teams, state) = tip_off(&self.rules, &mut self.rng);
        self.teams = teams;
        self.state = state;
        log::info!("Simulation reset; Team {} has the opening possession", self.state.possession);
    }

    fn end_quarter(&mut self) -> Tick {
        self.state.quarter += 1;
        if self.state.is_game_over() {
            log::info!(
                "Final: Team A {} - {} Team B ({} events)",
                self.state.score.a,
                self.state.score.b,
                self.state.events.len()
            );
            self.record(EventKind::GameEnd {
                score: self.state.score,
            });
            return Tick::GameOver;
        }

        self.state.time = 0;
        self.state.shot_clock = self.rules.time.shot_clock;
        self.state.fouls = PerTeam::default();
        let finished = self.state.quarter - 1;
        log::debug!(
            "End of Q{finished}: Team A {} - {} Team B",
            self.state.score.a,
            self.state.score.b
        );
        self.record(EventKind::QuarterEnd {
            quarter: finished,
            score: self.state.score,
        });
        Tick::QuarterEnd
    }

    fn shot_clock_violation(&mut self) {
        let team = self.state.possession;
        self.record(EventKind::ShotClockViolation { team });
        self.state.change_possession(&self.rules);
    }

    fn resolve_possession(&mut self) {
        let mut resolver =
            PossessionResolver::new(&self.rules, &mut self.teams, &mut self.state, &mut self.rng);
        if let Some(fouls) = self.fouls.as_deref_mut() {
            resolver = resolver.with_fouls(fouls);
        }
        if let Some(model) = self.turnovers.as_deref() {
            resolver = resolver.with_turnovers(model);
        }
        if let Some(sink) = self.sink.as_deref_mut() {
            resolver = resolver.with_sink(sink);
        }
        resolver.resolve();
    }

    fn record(&mut self, kind: EventKind) {
        self.state.record(kind, self.sink.as_deref_mut());
    }
}

/// Build both rosters (A first) and draw the opening possession.
fn tip_off<R: RngCore>(rules: &RuleSet, rng: &mut R) -> (PerTeam<Team>, GameState) {
    let teams = PerTeam::from_fn(|id| Team::create(id, rules, &mut *rng));
    let possession = if rng.gen::<f64>() < 0.5 { TeamId::A } else { TeamId::B };
    (teams, GameState::new(rules, possession))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReboundKind;

    fn nba(seed: u64) -> SimulationInstance {
        SimulationInstance::seeded(RuleSet::default(), seed).unwrap()
    }

    #[test]
    fn expired_shot_clock_forfeits_the_ball() {
        let mut sim = nba(7);
        let holder = sim.state.possession;
        sim.state.shot_clock = 0;
        let before = sim.events().len();

        assert_eq!(sim.step(), Tick::ShotClockViolation);

        let new_events = sim.events().since(before);
        assert_eq!(new_events.len(), 1);
        assert_eq!(new_events[0].kind, EventKind::ShotClockViolation { team: holder });
        assert_eq!(sim.state.possession, holder.other());
        assert_eq!(sim.state.shot_clock, 24);
    }

    #[test]
    fn quarter_break_resets_clocks_and_team_fouls() {
        let mut sim = nba(8);
        sim.state.time = sim.rules.quarter_seconds() - 1;
        sim.state.shot_clock = 3;
        sim.state.fouls = PerTeam::new(4, 2);

        assert_eq!(sim.step(), Tick::QuarterEnd);
        assert_eq!(sim.state.quarter, 2);
        assert_eq!(sim.state.time, 0);
        assert_eq!(sim.state.shot_clock, 24);
        assert_eq!(sim.state.fouls, PerTeam::new(0, 0));
        assert!(matches!(
            sim.events().last().map(|e| &e.kind),
            Some(EventKind::QuarterEnd { quarter: 1, .. })
        ));
    }

    #[test]
    fn fourth_quarter_buzzer_ends_the_game() {
        let mut sim = nba(9);
        sim.state.quarter = 4;
        sim.state.time = sim.rules.quarter_seconds() - 1;

        assert_eq!(sim.step(), Tick::GameOver);
        assert!(sim.is_game_over());
        assert_eq!(sim.state.quarter, 5);
        assert!(matches!(
            sim.events().last().map(|e| &e.kind),
            Some(EventKind::GameEnd { .. })
        ));

        let logged = sim.events().len();
        assert_eq!(sim.step(), Tick::GameOver);
        assert_eq!(sim.events().len(), logged);
    }

    #[test]
    fn offensive_rebound_without_bonus_possession_sets_fourteen() {
        // Run real games and check the clock on the tick after each offensive board.
        let mut sim = nba(10);
        let mut checked = 0;
        while !sim.is_game_over() {
            let before = sim.events().len();
            sim.step();
            let offensive_board = sim
                .events()
                .since(before)
                .last()
                .is_some_and(|e| matches!(e.kind, EventKind::Rebound { kind: ReboundKind::Offensive, .. }));
            if offensive_board {
                assert_eq!(sim.state.shot_clock, 14);
                checked += 1;
            }
        }
        assert!(checked > 0, "expected at least one offensive rebound in a full game");
    }

    #[test]
    fn playback_speed_is_clamped() {
        assert_eq!(Playback::new(0).speed(), 1);
        assert_eq!(Playback::new(4).ticks_per_interval(), 4);
        assert_eq!(Playback::new(99).speed(), MAX_SPEED);
    }

    #[test]
    fn step_many_stops_at_the_buzzer() {
        let mut sim = nba(11);
        let ran = sim.step_many(u32::MAX);
        assert!(sim.is_game_over());
        // Four quarters of 720 seconds, one tick per second.
        assert_eq!(ran, 4 * 720);
    }
}
