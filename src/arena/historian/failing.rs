use super::{Historian, HistorianError, MatchEvent};

/// A historian that will always fail to record an event
/// and will return an error.
///
/// This historian is useful for testing the behavior of the simulation
pub struct FailingHistorian;

impl Historian for FailingHistorian {
    fn record_event(&mut self, _event: &MatchEvent) -> Result<(), HistorianError> {
        Err(HistorianError::UnableToRecordEvent)
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use crate::{arena::MatchSimulationBuilder, core::PlayerProfile};

    use super::*;

    #[test]
    #[should_panic]
    fn test_panic_fail_historian() {
        let historian = Box::new(FailingHistorian);

        let mut sim = MatchSimulationBuilder::default()
            .profiles(PlayerProfile::default(), PlayerProfile::default())
            .panic_on_historian_error(true)
            .historians(vec![historian])
            .build()
            .unwrap();

        // This should panic since panic_on_historian_error is set to true
        // and the historian will always fail to record an event
        let _ = sim.run(&mut StdRng::seed_from_u64(1));
    }
}
