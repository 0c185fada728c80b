use super::{Historian, HistorianError, MatchEvent};

/// A historian that hands every event to a function. This is
/// useful for testing and debugging.
#[derive(Debug, Clone)]
pub struct FnHistorian<F> {
    func: F,
}

impl<F: Fn(&MatchEvent) -> Result<(), HistorianError>> FnHistorian<F> {
    /// Create a new `FnHistorian` with the provided function
    /// that will be called when an event happens in a simulation.
    pub fn new(f: F) -> Self {
        Self { func: f }
    }
}

impl<F: Fn(&MatchEvent) -> Result<(), HistorianError>> Historian for FnHistorian<F> {
    fn record_event(&mut self, event: &MatchEvent) -> Result<(), HistorianError> {
        (self.func)(event)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use rand::{SeedableRng, rngs::StdRng};

    use crate::{arena::MatchSimulationBuilder, core::PlayerProfile};

    use super::*;

    #[test]
    fn test_can_record_events() {
        let last_event: Rc<RefCell<Option<MatchEvent>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(RefCell::new(0));

        let borrow_count = count.clone();
        let borrow_last_event = last_event.clone();

        let historian = Box::new(FnHistorian::new(move |event: &MatchEvent| {
            *borrow_count.borrow_mut() += 1;
            *borrow_last_event.borrow_mut() = Some(event.clone());
            Ok(())
        }));

        let mut sim = MatchSimulationBuilder::default()
            .profiles(PlayerProfile::default(), PlayerProfile::default())
            .historians(vec![historian])
            .build()
            .unwrap();

        let result = sim.run(&mut StdRng::seed_from_u64(3)).unwrap();

        assert_ne!(0, count.take());
        match last_event.take() {
            Some(MatchEvent::MatchEnd { winner, score, .. }) => {
                assert_eq!(result.winner, winner);
                assert_eq!(result.score, score);
            }
            other => panic!("Expected the match end last, got {other:?}"),
        }
    }

    #[test]
    fn test_fn_historian_can_withstand_error() {
        // A historian that always errors is dropped from the simulation
        // but the match still runs to the end.
        let historian = Box::new(FnHistorian::new(|_: &MatchEvent| {
            Err(HistorianError::UnableToRecordEvent)
        }));

        let result = MatchSimulationBuilder::default()
            .profiles(PlayerProfile::default(), PlayerProfile::default())
            .historians(vec![historian])
            .build()
            .unwrap()
            .run(&mut StdRng::seed_from_u64(4))
            .unwrap();
        assert_eq!(13, result.score[result.winner]);
    }
}
