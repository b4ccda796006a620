//! Orchestration: location, then fetch, then reduction, as an explicit state
//! machine with stale-cycle discard.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::location::LocationProvider;
use crate::model::{Coordinates, ForecastResult, PipelineState};
use crate::provider::ForecastProvider;
use crate::reduce::reduce_daily;

/// Drives one forecast cycle at a time:
/// `Idle -> AwaitingLocation -> (AwaitingForecast | Failed) -> (Ready | Failed)`.
///
/// `Ready` and `Failed` are terminal for a cycle; a new cycle starts only
/// when a caller invokes [`ForecastPipeline::run_once`] again. Each cycle is
/// tagged with a generation, and transitions from a superseded cycle are
/// discarded, so a late completion never overwrites a newer result.
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    location: Arc<dyn LocationProvider>,
    provider: Arc<dyn ForecastProvider>,
    shared: Arc<Mutex<Shared>>,
}

#[derive(Debug, Default)]
struct Shared {
    state: PipelineState,
    last_coordinates: Option<Coordinates>,
    generation: u64,
}

impl ForecastPipeline {
    pub fn new(location: Arc<dyn LocationProvider>, provider: Arc<dyn ForecastProvider>) -> Self {
        Self {
            location,
            provider,
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PipelineState {
        self.shared.lock().state.clone()
    }

    /// Last successfully acquired coordinates, kept for display even after a
    /// later cycle fails.
    pub fn last_coordinates(&self) -> Option<Coordinates> {
        self.shared.lock().last_coordinates
    }

    /// Run one full cycle and return the state it ended in.
    ///
    /// The forecast fetch never starts before location acquisition has
    /// resolved, and never starts at all when it fails. No partial result is
    /// ever published: the state goes to `Ready` atomically or to `Failed`.
    pub async fn run_once(&self) -> PipelineState {
        let generation = {
            let mut shared = self.shared.lock();
            shared.generation += 1;
            shared.state = PipelineState::AwaitingLocation;
            shared.generation
        };
        tracing::debug!(generation, "forecast cycle started");

        let coordinates = match self.location.current_location().await {
            Ok(coordinates) => coordinates,
            Err(err) => {
                tracing::warn!(generation, error = %err, "location acquisition failed");
                return self.transition(generation, PipelineState::Failed(err));
            }
        };

        if !self.enter_awaiting_forecast(generation, coordinates) {
            tracing::debug!(generation, "cycle superseded before fetch");
            return self.state();
        }

        let outcome = match self.provider.fetch_forecast(coordinates).await {
            Ok(forecast) => {
                let days = reduce_daily(&forecast.samples);
                tracing::info!(
                    generation,
                    city = %forecast.city_name,
                    days = days.len(),
                    "forecast cycle ready"
                );
                PipelineState::Ready(ForecastResult {
                    city_name: forecast.city_name,
                    days,
                })
            }
            Err(err) => {
                tracing::warn!(generation, error = %err, "forecast fetch failed");
                PipelineState::Failed(err)
            }
        };

        self.transition(generation, outcome)
    }

    /// Record the acquired coordinates and move to `AwaitingForecast`, unless
    /// a newer cycle has started in the meantime.
    fn enter_awaiting_forecast(&self, generation: u64, coordinates: Coordinates) -> bool {
        let mut shared = self.shared.lock();
        if shared.generation != generation {
            return false;
        }
        shared.last_coordinates = Some(coordinates);
        shared.state = PipelineState::AwaitingForecast;
        true
    }

    fn transition(&self, generation: u64, next: PipelineState) -> PipelineState {
        let mut shared = self.shared.lock();
        if shared.generation == generation {
            shared.state = next;
        } else {
            tracing::debug!(
                generation,
                current = shared.generation,
                "discarding stale transition"
            );
        }
        shared.state.clone()
    }
}
