//! GameState: clock, score, possession and the event log of one simulation run.

use crate::models::event::{EventKind, EventLog, EventSink, GameEvent};
use crate::models::rules::RuleSet;
use crate::models::team::{PerTeam, TeamId};
use serde::{Deserialize, Serialize};

/// Last regulation quarter; the game is over once `quarter` passes it.
pub const FINAL_QUARTER: u32 = 4;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Seconds elapsed in the current quarter.
    pub time: u32,
    /// 1-based; `FINAL_QUARTER + 1` marks a finished game.
    pub quarter: u32,
    pub possession: TeamId,
    pub score: PerTeam<u32>,
    /// Team fouls in the current quarter (cleared at each break).
    pub fouls: PerTeam<u32>,
    /// Seconds left on the shot clock.
    pub shot_clock: u32,
    pub events: EventLog,
}

impl GameState {
    /// Tip-off state: first quarter, full shot clock, `possession` has the ball.
    pub fn new(rules: &RuleSet, possession: TeamId) -> Self {
        Self {
            time: 0,
            quarter: 1,
            possession,
            score: PerTeam::default(),
            fouls: PerTeam::default(),
            shot_clock: rules.time.shot_clock,
            events: EventLog::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.quarter > FINAL_QUARTER
    }

    /// Seconds run off the shot clock since it was last reset.
    pub fn shot_clock_elapsed(&self, rules: &RuleSet) -> u32 {
        rules.time.shot_clock.saturating_sub(self.shot_clock)
    }

    /// Give the ball to the other side with a fresh shot clock.
    pub fn change_possession(&mut self, rules: &RuleSet) {
        self.possession = self.possession.other();
        self.shot_clock = rules.time.shot_clock;
    }

    /// Stamp `kind` with the current clock, append it, and forward it to `sink`.
    pub fn record(&mut self, kind: EventKind, sink: Option<&mut (dyn EventSink + '_)>) {
        let event = self.events.push(GameEvent {
            time: self.time,
            quarter: self.quarter,
            shot_clock: self.shot_clock,
            kind,
        });
        if let Some(sink) = sink {
            sink.add_event(event);
        }
    }
}
