//! Game events: the typed payloads, the append-only log, and the sink trait visualizers implement.

use crate::models::player::PlayerId;
use crate::models::team::{PerTeam, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Three,
    Two,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReboundKind {
    Offensive,
    Defensive,
}

/// Non-steal turnover flavour. Only unforced errors are modelled.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnoverKind {
    #[default]
    Error,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoulKind {
    /// On a shot attempt.
    Shooting,
    /// Away from the ball or during the half-court setup.
    Personal,
}

/// What happened. Serialized as `{"eventType": "...", "data": {...}}`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", content = "data", rename_all = "camelCase")]
pub enum EventKind {
    #[serde(rename_all = "camelCase")]
    QuarterEnd { quarter: u32, score: PerTeam<u32> },
    #[serde(rename_all = "camelCase")]
    GameEnd { score: PerTeam<u32> },
    #[serde(rename_all = "camelCase")]
    ShotClockViolation { team: TeamId },
    #[serde(rename_all = "camelCase")]
    MadeShot {
        team: TeamId,
        player: PlayerId,
        shot_type: ShotType,
        points: u32,
    },
    #[serde(rename_all = "camelCase")]
    MissedShot {
        team: TeamId,
        player: PlayerId,
        shot_type: ShotType,
    },
    #[serde(rename_all = "camelCase")]
    Rebound {
        team: TeamId,
        player: PlayerId,
        kind: ReboundKind,
    },
    #[serde(rename_all = "camelCase")]
    Pass {
        team: TeamId,
        from_player: PlayerId,
        to_player: PlayerId,
    },
    #[serde(rename_all = "camelCase")]
    Steal {
        offensive_team: TeamId,
        defensive_team: TeamId,
        offensive_player: PlayerId,
        defensive_player: PlayerId,
    },
    #[serde(rename_all = "camelCase")]
    Turnover {
        team: TeamId,
        player: PlayerId,
        kind: TurnoverKind,
    },
    #[serde(rename_all = "camelCase")]
    FastBreak { team: TeamId, player: PlayerId },
    #[serde(rename_all = "camelCase")]
    FastBreakScore {
        team: TeamId,
        player: PlayerId,
        shot_type: ShotType,
        points: u32,
    },
    #[serde(rename_all = "camelCase")]
    FastBreakMiss {
        team: TeamId,
        player: PlayerId,
        shot_type: ShotType,
    },
    /// `team`/`player` committed the foul on `fouled_player` of the other side.
    #[serde(rename_all = "camelCase")]
    Foul {
        team: TeamId,
        player: PlayerId,
        fouled_player: PlayerId,
        kind: FoulKind,
        free_throws: u32,
    },
    #[serde(rename_all = "camelCase")]
    FreeThrow {
        team: TeamId,
        player: PlayerId,
        made: bool,
        points: u32,
    },
    #[serde(rename_all = "camelCase")]
    FoulOut { team: TeamId, player: PlayerId },
}

impl EventKind {
    /// Wire name of the variant ("madeShot", "quarterEnd", ...).
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::QuarterEnd { .. } => "quarterEnd",
            EventKind::GameEnd { .. } => "gameEnd",
            EventKind::ShotClockViolation { .. } => "shotClockViolation",
            EventKind::MadeShot { .. } => "madeShot",
            EventKind::MissedShot { .. } => "missedShot",
            EventKind::Rebound { .. } => "rebound",
            EventKind::Pass { .. } => "pass",
            EventKind::Steal { .. } => "steal",
            EventKind::Turnover { .. } => "turnover",
            EventKind::FastBreak { .. } => "fastBreak",
            EventKind::FastBreakScore { .. } => "fastBreakScore",
            EventKind::FastBreakMiss { .. } => "fastBreakMiss",
            EventKind::Foul { .. } => "foul",
            EventKind::FreeThrow { .. } => "freeThrow",
            EventKind::FoulOut { .. } => "foulOut",
        }
    }

    /// The side the event is about (for steals, the offense that lost the ball).
    pub fn team(&self) -> Option<TeamId> {
        match *self {
            EventKind::QuarterEnd { .. } | EventKind::GameEnd { .. } => None,
            EventKind::Steal { offensive_team, .. } => Some(offensive_team),
            EventKind::ShotClockViolation { team }
            | EventKind::MadeShot { team, .. }
            | EventKind::MissedShot { team, .. }
            | EventKind::Rebound { team, .. }
            | EventKind::Pass { team, .. }
            | EventKind::Turnover { team, .. }
            | EventKind::FastBreak { team, .. }
            | EventKind::FastBreakScore { team, .. }
            | EventKind::FastBreakMiss { team, .. }
            | EventKind::Foul { team, .. }
            | EventKind::FreeThrow { team, .. }
            | EventKind::FoulOut { team, .. } => Some(team),
        }
    }

    /// Points put on the board by this event.
    pub fn points_scored(&self) -> u32 {
        match *self {
            EventKind::MadeShot { points, .. } | EventKind::FastBreakScore { points, .. } => points,
            EventKind::FreeThrow { made: true, points, .. } => points,
            _ => 0,
        }
    }
}

fn shot_name(shot_type: ShotType) -> &'static str {
    match shot_type {
        ShotType::Three => "three",
        ShotType::Two => "two",
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EventKind::QuarterEnd { quarter, score } => {
                write!(f, "End of Q{quarter}: A {} - {} B", score.a, score.b)
            }
            EventKind::GameEnd { score } => write!(f, "Final: A {} - {} B", score.a, score.b),
            EventKind::ShotClockViolation { team } => write!(f, "Team {team} shot clock violation"),
            EventKind::MadeShot { team, player, shot_type, points } => write!(
                f,
                "Team {team} #{player} makes a {} ({points} pts)",
                shot_name(shot_type)
            ),
            EventKind::MissedShot { team, player, shot_type } => {
                write!(f, "Team {team} #{player} misses a {}", shot_name(shot_type))
            }
            EventKind::Rebound { team, player, kind } => {
                let kind = match kind {
                    ReboundKind::Offensive => "offensive",
                    ReboundKind::Defensive => "defensive",
                };
                write!(f, "Team {team} #{player} {kind} rebound")
            }
            EventKind::Pass { team, from_player, to_player } => {
                write!(f, "Team {team} #{from_player} passes to #{to_player}")
            }
            EventKind::Steal {
                offensive_team,
                defensive_team,
                offensive_player,
                defensive_player,
            } => write!(
                f,
                "Team {defensive_team} #{defensive_player} steals from Team {offensive_team} #{offensive_player}"
            ),
            EventKind::Turnover { team, player, .. } => write!(f, "Team {team} #{player} turnover"),
            EventKind::FastBreak { team, player } => write!(f, "Team {team} #{player} on the break"),
            EventKind::FastBreakScore { team, player, shot_type, points } => write!(
                f,
                "Team {team} #{player} finishes the break with a {} ({points} pts)",
                shot_name(shot_type)
            ),
            EventKind::FastBreakMiss { team, player, .. } => {
                write!(f, "Team {team} #{player} misses on the break")
            }
            EventKind::Foul { team, player, fouled_player, free_throws, .. } => write!(
                f,
                "Team {team} #{player} fouls #{fouled_player} ({free_throws} FT)"
            ),
            EventKind::FreeThrow { team, player, made, .. } => {
                let result = if made { "makes" } else { "misses" };
                write!(f, "Team {team} #{player} {result} a free throw")
            }
            EventKind::FoulOut { team, player } => write!(f, "Team {team} #{player} fouls out"),
        }
    }
}

/// A logged event: game clock stamp plus payload.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    /// Seconds elapsed in the quarter.
    pub time: u32,
    pub quarter: u32,
    pub shot_clock: u32,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Q{} {:02}:{:02} [{:>2}] {}",
            self.quarter.min(4),
            self.time / 60,
            self.time % 60,
            self.shot_clock,
            self.kind
        )
    }
}

/// Append-only, chronological event list. Insertion order is time order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append and return the stored event.
    pub fn push(&mut self, event: GameEvent) -> &GameEvent {
        debug_assert!(
            self.events
                .last()
                .map_or(true, |last| (last.quarter, last.time) <= (event.quarter, event.time)),
            "event log must stay in (quarter, time) order"
        );
        self.events.push(event);
        &self.events[self.events.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events from index `start` on (empty when `start` is past the end).
    pub fn since(&self, start: usize) -> &[GameEvent] {
        self.events.get(start..).unwrap_or(&[])
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a GameEvent;
    type IntoIter = std::slice::Iter<'a, GameEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// One-way notification target for logged events (court visualizer, play-by-play printer).
/// It sees every event as it is appended and cannot affect the game.
pub trait EventSink: Send + Sync {
    fn add_event(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn add_event(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}

impl EventSink for std::sync::mpsc::Sender<GameEvent> {
    fn add_event(&mut self, event: &GameEvent) {
        // Fire and forget: a dropped receiver just stops listening.
        let _ = self.send(event.clone());
    }
}
