use std::{cell::RefCell, rc::Rc};

use crate::{
    arena::{action::ActionRecord, round_context::RoundScore},
    core::{FieldState, PerSide, Side},
};

use super::{Historian, HistorianError, MatchEvent};

/// VecHistorian is a historian that will
/// append each event to a vector.
pub struct VecHistorian {
    events: Rc<RefCell<Vec<MatchEvent>>>,
}

impl VecHistorian {
    /// Create a new storage for the historian
    /// that can be introspected later.
    pub fn new_storage() -> Rc<RefCell<Vec<MatchEvent>>> {
        Rc::new(RefCell::new(vec![]))
    }

    /// Create a new VecHistorian with the provided storage
    /// `Rc<RefCell<Vec<MatchEvent>>>`
    pub fn new(events: Rc<RefCell<Vec<MatchEvent>>>) -> Self {
        Self { events }
    }
}

impl Historian for VecHistorian {
    fn record_event(&mut self, event: &MatchEvent) -> Result<(), HistorianError> {
        self.events.try_borrow_mut()?.push(event.clone());
        Ok(())
    }
}

/// Everything that happened in one round, ready for playback.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RoundLog {
    pub round_number: u32,
    pub first_thrower: Side,
    pub start_score: PerSide<u8>,
    pub end_score: PerSide<u8>,
    pub actions: Vec<ActionRecord>,
    pub final_field: FieldState,
    pub winner: Side,
    pub points: u8,
}

/// Group a stream of events into per round logs.
///
/// A round that never finished is left out.
pub fn round_logs(events: &[MatchEvent]) -> Vec<RoundLog> {
    let mut logs = vec![];
    let mut current: Option<RoundLog> = None;

    for event in events {
        match event {
            MatchEvent::RoundStart {
                round_number,
                first_thrower,
                score,
            } => {
                current = Some(RoundLog {
                    round_number: *round_number,
                    first_thrower: *first_thrower,
                    start_score: *score,
                    end_score: *score,
                    actions: vec![],
                    final_field: FieldState::new(),
                    winner: *first_thrower,
                    points: 0,
                });
            }
            MatchEvent::Action(record) => {
                if let Some(log) = current.as_mut() {
                    log.actions.push(record.clone());
                }
            }
            MatchEvent::RoundEnd {
                result: RoundScore { winner, points },
                field,
                score,
                ..
            } => {
                if let Some(mut log) = current.take() {
                    log.winner = *winner;
                    log.points = *points;
                    log.final_field = field.clone();
                    log.end_score = *score;
                    logs.push(log);
                }
            }
            MatchEvent::MatchEnd { .. } => {}
        }
    }
    logs
}
