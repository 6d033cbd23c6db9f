//! Domain model for board reconciliation.
//!
//! The board domain models the ordered board → column → card hierarchy, the
//! remote document shape, and the list-field encoding, while keeping all
//! transport concerns outside of the domain boundary.

mod board;
mod card;
mod column;
mod error;
mod ids;
mod tiddler;
pub mod title_list;

pub use board::Board;
pub use card::{Card, CardContent};
pub use column::Column;
pub use error::{BoardDomainError, BoardDomainResult};
pub use ids::{BoardName, CardTitle, ColumnId};
pub use tiddler::{Tiddler, TiddlerField};
