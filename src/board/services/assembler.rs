//! Board assembly from the three remote document kinds.
//!
//! 1. The board-structure document's list field orders the column ids.
//! 2. One tag query returns every column document of the board.
//! 3. One list query per known column returns its card summaries; these run
//!    concurrently and the whole load fails if any of them fails.
//! 4. Each column's own list field orders its cards, which are resolved
//!    against that column's summaries.
//!
//! Column ids without a column document are skipped.

use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

use super::{AssemblyStage, BoardError, BoardResult};
use crate::board::{
    domain::{Board, BoardName, Card, CardTitle, Column, ColumnId, Tiddler, TiddlerField},
    ports::TiddlerStore,
};

/// Loads boards from the document store.
#[derive(Clone)]
pub struct BoardAssembler<S>
where
    S: TiddlerStore,
{
    store: Arc<S>,
}

impl<S> BoardAssembler<S>
where
    S: TiddlerStore,
{
    /// Creates an assembler over a store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Loads and assembles a board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Assembly`] naming the failed stage when a store
    /// request fails, or [`BoardError::Structure`] when the structure
    /// document has no list field.
    pub async fn load(&self, name: &BoardName) -> BoardResult<Board> {
        let columns = self.assemble(name).await?;
        let board = Board::from_columns(name.clone(), columns)?;
        info!(
            board = %name,
            columns = board.columns().len(),
            "board assembled"
        );
        Ok(board)
    }

    /// Fetches and joins the board's columns in structure order.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub async fn assemble(&self, name: &BoardName) -> BoardResult<Vec<Column>> {
        let column_ids = self.fetch_structure(name).await?;

        let column_set = self
            .store
            .query_by_tag(name.as_str())
            .await
            .map_err(|source| BoardError::Assembly {
                stage: AssemblyStage::ColumnSet,
                source,
            })?;
        let details: HashMap<&str, &Tiddler> = column_set
            .iter()
            .map(|tiddler| (tiddler.title.as_str(), tiddler))
            .collect();

        let mut known = HashSet::new();
        let mut present = Vec::with_capacity(column_ids.len());
        for id in &column_ids {
            match details.get(id.as_str()) {
                Some(detail) if known.insert(id) => present.push((id, *detail)),
                Some(_) => warn!(board = %name, column = %id, "duplicate column reference skipped"),
                None => warn!(board = %name, column = %id, "column document missing, skipped"),
            }
        }

        let summaries = try_join_all(present.iter().map(|(id, detail)| async move {
            self.store
                .query_by_list(&detail.title)
                .await
                .map_err(|source| BoardError::Assembly {
                    stage: AssemblyStage::ColumnCards((*id).clone()),
                    source,
                })
        }))
        .await?;

        let mut placed = HashSet::new();
        Ok(present
            .into_iter()
            .zip(summaries)
            .map(|((id, detail), cards)| build_column(id, detail, &cards, &mut placed))
            .collect())
    }

    async fn fetch_structure(&self, name: &BoardName) -> BoardResult<Vec<ColumnId>> {
        let structure = self
            .store
            .get_tiddler(name.as_str())
            .await
            .map_err(|source| BoardError::Assembly {
                stage: AssemblyStage::Structure,
                source,
            })?;
        if structure.field(TiddlerField::List).is_none() {
            return Err(BoardError::Structure {
                title: structure.title,
                field: TiddlerField::List.as_str(),
            });
        }
        Ok(structure
            .list()
            .into_iter()
            .filter_map(|title| ColumnId::new(title).ok())
            .collect())
    }
}

/// Header text: the column's short text without bold markup, else its id.
fn column_header(detail: &Tiddler) -> Option<String> {
    detail
        .short_text()
        .map(|text| text.replace("''", ""))
        .filter(|text| !text.trim().is_empty())
}

fn build_column(
    id: &ColumnId,
    detail: &Tiddler,
    summaries: &[Tiddler],
    placed: &mut HashSet<CardTitle>,
) -> Column {
    let by_title: HashMap<&str, &Tiddler> = summaries
        .iter()
        .map(|summary| (summary.title.as_str(), summary))
        .collect();

    let items = detail
        .list()
        .into_iter()
        .filter_map(|title| CardTitle::new(title).ok())
        .filter(|title| {
            let fresh = placed.insert(title.clone());
            if !fresh {
                warn!(column = %id, card = %title, "card already placed in another column, skipped");
            }
            fresh
        })
        .map(|title| {
            let display = by_title
                .get(title.as_str())
                .and_then(|summary| summary.short_text())
                .map_or_else(|| title.as_str().to_owned(), str::to_owned);
            Card::new(title, display)
        })
        .collect();

    let header = column_header(detail).unwrap_or_else(|| id.as_str().to_owned());
    Column::new(id.clone(), header, items)
}
