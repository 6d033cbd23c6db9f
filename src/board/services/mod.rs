//! Application services for board loading and reconciliation.

mod assembler;
mod error;
mod locks;
mod outcome;
mod reconcile;
mod session;

pub use assembler::BoardAssembler;
pub use error::{AssemblyStage, BoardError, BoardResult, MoveStep};
pub use locks::{ColumnGuard, ColumnLocks};
pub use outcome::OperationOutcome;
pub use reconcile::{EditCardRequest, EditOutcome, NewCardRequest, ReconciliationService};
pub use session::BoardSession;
