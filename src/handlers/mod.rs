pub mod calculate;
pub mod data;
pub mod health;
pub mod metrics_handler;
pub mod options;

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::calculator::TuitionCalculator;

/// Shared state for all tuition routes
#[derive(Clone)]
pub struct AppState {
    /// Swapped atomically when the dataset is reloaded
    pub calculator: Arc<ArcSwap<TuitionCalculator>>,
}

impl AppState {
    pub fn new(calculator: TuitionCalculator) -> Self {
        Self {
            calculator: Arc::new(ArcSwap::from_pointee(calculator)),
        }
    }

    /// Snapshot of the current calculator, held for the duration of a request
    pub fn calculator(&self) -> Arc<TuitionCalculator> {
        self.calculator.load_full()
    }
}
