//! CSV export of the event log (one row per event).

use crate::models::{EventLog, GameEvent};
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct EventRow<'a> {
    quarter: u32,
    time: u32,
    shot_clock: u32,
    event_type: &'a str,
    team: String,
    points: u32,
    description: String,
}

impl<'a> EventRow<'a> {
    fn from_event(event: &'a GameEvent) -> Self {
        Self {
            quarter: event.quarter,
            time: event.time,
            shot_clock: event.shot_clock,
            event_type: event.kind.event_type(),
            team: event.kind.team().map(|t| t.to_string()).unwrap_or_default(),
            points: event.kind.points_scored(),
            description: event.kind.to_string(),
        }
    }
}

/// Write `events` as CSV with a header row.
pub fn write_events_csv<W: Write>(events: &EventLog, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for event in events {
        out.serialize(EventRow::from_event(event))?;
    }
    out.flush()?;
    Ok(())
}
