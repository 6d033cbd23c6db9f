//! Shared world state for board reconciliation BDD scenarios.

use std::sync::Arc;

use kanwiki::board::{
    adapters::memory::InMemoryTiddlerStore,
    services::{BoardError, BoardSession},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Session type used by the BDD world.
pub type TestSession = BoardSession<InMemoryTiddlerStore, DefaultClock>;

/// Scenario world for board reconciliation behaviour tests.
pub struct BoardWorld {
    pub store: Arc<InMemoryTiddlerStore>,
    pub session: Option<TestSession>,
    pub last_result: Option<Result<(), BoardError>>,
}

impl BoardWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryTiddlerStore::new()),
            session: None,
            last_result: None,
        }
    }

    /// Returns the open session.
    pub fn session(&self) -> Result<&TestSession, eyre::Report> {
        self.session
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no board is open in scenario world"))
    }

    /// Returns the open session mutably.
    pub fn session_mut(&mut self) -> Result<&mut TestSession, eyre::Report> {
        self.session
            .as_mut()
            .ok_or_else(|| eyre::eyre!("no board is open in scenario world"))
    }

    /// Returns the result of the last operation.
    pub fn last_result(&self) -> Result<&Result<(), BoardError>, eyre::Report> {
        self.last_result
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no operation has run in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
