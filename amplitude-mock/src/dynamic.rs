use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use amplitude_core::{AmplitudeError, IndexSeries, MarketSource, Panel};
use amplitude_types::MarketDetails;

/// Instruction for how a load should behave for a given code.
#[derive(Debug, Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value.
    Return(T),
    /// Fail with the provided error.
    Fail(AmplitudeError),
}

impl<T: Clone> MockBehavior<T> {
    fn run(&self) -> Result<T, AmplitudeError> {
        match self {
            Self::Return(v) => Ok(v.clone()),
            Self::Fail(e) => Err(e.clone()),
        }
    }
}

#[derive(Default)]
struct State {
    index: HashMap<String, MockBehavior<IndexSeries>>,
    components: HashMap<String, MockBehavior<Panel>>,
    calls: HashMap<String, usize>,
}

/// Handle used by tests to script a [`DynamicMockSource`].
#[derive(Clone)]
pub struct MockController {
    state: Arc<Mutex<State>>,
}

impl MockController {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Script the result of `load_index(idx_code)`.
    pub fn set_index(&self, idx_code: impl Into<String>, behavior: MockBehavior<IndexSeries>) {
        self.lock().index.insert(idx_code.into(), behavior);
    }

    /// Script the result of `load_components` for the market label `market`.
    pub fn set_components(&self, market: impl Into<String>, behavior: MockBehavior<Panel>) {
        self.lock().components.insert(market.into(), behavior);
    }

    /// Number of loads seen for `key` (an index code or a market label).
    #[must_use]
    pub fn calls(&self, key: &str) -> usize {
        self.lock().calls.get(key).copied().unwrap_or(0)
    }
}

/// Scriptable mock source. Unscripted codes fail with `NotFound`.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<State>>,
}

impl DynamicMockSource {
    /// Create a source and the controller that scripts it.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Self, MockController) {
        let state = Arc::new(Mutex::new(State::default()));
        (
            Self {
                name,
                state: Arc::clone(&state),
            },
            MockController { state },
        )
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MarketSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn load_index(&self, idx_code: &str) -> Result<IndexSeries, AmplitudeError> {
        let mut state = self.lock();
        *state.calls.entry(idx_code.to_string()).or_default() += 1;
        match state.index.get(idx_code) {
            Some(b) => b.run(),
            None => Err(AmplitudeError::not_found(format!("index {idx_code}"))),
        }
    }

    fn load_components(&self, market: &MarketDetails) -> Result<Panel, AmplitudeError> {
        let mut state = self.lock();
        *state.calls.entry(market.market.clone()).or_default() += 1;
        match state.components.get(&market.market) {
            Some(b) => b.run(),
            None => Err(AmplitudeError::not_found(format!(
                "components of {}",
                market.market
            ))),
        }
    }
}
