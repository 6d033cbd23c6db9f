//! Authoritative in-memory board state.
//!
//! Columns are replaced wholesale on load; a column's cards are replaced
//! wholesale on every mutation. [`Board::replace_items`] is the single point
//! where card sequences change, and it enforces that a card title appears at
//! most once across the whole board.

use super::{BoardDomainError, BoardDomainResult, BoardName, Card, CardTitle, Column, ColumnId};
use serde::Serialize;
use std::collections::HashSet;

/// The ordered columns of one board plus the active-column pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    name: BoardName,
    columns: Vec<Column>,
    current_index: usize,
}

impl Board {
    /// Creates a board without columns.
    #[must_use]
    pub const fn new(name: BoardName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            current_index: 0,
        }
    }

    /// Creates a board from assembled columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateCard`] when a card title appears
    /// more than once across `columns`.
    pub fn from_columns(name: BoardName, columns: Vec<Column>) -> BoardDomainResult<Self> {
        let mut board = Self::new(name);
        board.replace_columns(columns)?;
        Ok(board)
    }

    /// Returns the board name.
    #[must_use]
    pub const fn name(&self) -> &BoardName {
        &self.name
    }

    /// Returns the columns in board order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the active-column pointer.
    #[must_use]
    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    /// Returns the active column, if any.
    #[must_use]
    pub fn current_column(&self) -> Option<&Column> {
        self.columns.get(self.current_index)
    }

    /// Returns a column by id.
    #[must_use]
    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id() == id)
    }

    /// Returns the index of a column.
    #[must_use]
    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|column| column.id() == id)
    }

    /// Returns the column holding a card.
    #[must_use]
    pub fn column_of(&self, title: &CardTitle) -> Option<&Column> {
        self.columns.iter().find(|column| column.contains(title))
    }

    /// Returns a card by title.
    #[must_use]
    pub fn card(&self, title: &CardTitle) -> Option<&Card> {
        self.columns.iter().find_map(|column| column.card(title))
    }

    /// Replaces every column and resets the active pointer to the first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateCard`] when a card title appears
    /// more than once across `columns`; the board is left untouched.
    pub fn replace_columns(&mut self, columns: Vec<Column>) -> BoardDomainResult<()> {
        let mut seen = HashSet::new();
        for title in columns.iter().flat_map(Column::titles) {
            if !seen.insert(title) {
                return Err(BoardDomainError::DuplicateCard(title.clone()));
            }
        }
        self.columns = columns;
        self.current_index = 0;
        Ok(())
    }

    /// Moves the active pointer; out-of-range indices are ignored.
    ///
    /// Returns whether the pointer moved to `index`.
    pub fn set_current_index(&mut self, index: usize) -> bool {
        if index >= self.columns.len() {
            return false;
        }
        self.current_index = index;
        true
    }

    /// Activates the next column, stopping at the last one.
    pub fn next_column(&mut self) -> bool {
        self.set_current_index(self.current_index.saturating_add(1))
    }

    /// Activates the previous column, stopping at the first one.
    pub fn previous_column(&mut self) -> bool {
        self.current_index
            .checked_sub(1)
            .is_some_and(|index| self.set_current_index(index))
    }

    /// Replaces a column's whole card sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownColumn`] for an unknown column or
    /// [`BoardDomainError::DuplicateCard`] when a title in `items` repeats or
    /// is already held by another column. The board is left untouched on
    /// error.
    pub fn replace_items(&mut self, id: &ColumnId, items: Vec<Card>) -> BoardDomainResult<&Column> {
        let index = self
            .column_index(id)
            .ok_or_else(|| BoardDomainError::UnknownColumn(id.clone()))?;

        let elsewhere = self
            .columns
            .iter()
            .filter(|column| column.id() != id)
            .find_map(|column| items.iter().find(|card| column.contains(card.real_title())));
        if let Some(card) = elsewhere {
            return Err(BoardDomainError::DuplicateCard(card.real_title().clone()));
        }

        let column = self
            .columns
            .get_mut(index)
            .ok_or_else(|| BoardDomainError::UnknownColumn(id.clone()))?;
        column.replace_items(items)?;
        Ok(column)
    }

    /// Moves a card within its column from one position to another.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownColumn`] or
    /// [`BoardDomainError::PositionOutOfRange`].
    pub fn reorder_card(&mut self, id: &ColumnId, from: usize, to: usize) -> BoardDomainResult<&Column> {
        let column = self
            .column(id)
            .ok_or_else(|| BoardDomainError::UnknownColumn(id.clone()))?;
        let len = column.len();
        if from >= len || to >= len {
            return Err(BoardDomainError::PositionOutOfRange {
                position: from.max(to),
                len,
            });
        }
        let mut items = column.items().to_vec();
        let card = items.remove(from);
        items.insert(to, card);
        self.replace_items(id, items)
    }

    /// Moves a card into another column at `position`.
    ///
    /// Returns the id of the column the card left.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownCard`],
    /// [`BoardDomainError::UnknownColumn`] or
    /// [`BoardDomainError::PositionOutOfRange`]; the board is left untouched.
    pub fn move_card(
        &mut self,
        title: &CardTitle,
        target: &ColumnId,
        position: usize,
    ) -> BoardDomainResult<ColumnId> {
        let source = self
            .column_of(title)
            .ok_or_else(|| BoardDomainError::UnknownCard(title.clone()))?;
        let source_id = source.id().clone();
        if &source_id == target {
            let from = source
                .position(title)
                .ok_or_else(|| BoardDomainError::UnknownCard(title.clone()))?;
            self.reorder_card(target, from, position)?;
            return Ok(source_id);
        }

        let (source_after, card) = source.without(title)?;
        let target_after = self
            .column(target)
            .ok_or_else(|| BoardDomainError::UnknownColumn(target.clone()))?
            .with_inserted(card, position)?;

        self.replace_items(&source_id, source_after.items().to_vec())?;
        self.replace_items(target, target_after.items().to_vec())?;
        Ok(source_id)
    }

    /// Inserts a new card into a column at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateCard`] when the title is already
    /// on the board, [`BoardDomainError::UnknownColumn`] or
    /// [`BoardDomainError::PositionOutOfRange`].
    pub fn insert_card(&mut self, id: &ColumnId, card: Card, position: usize) -> BoardDomainResult<&Column> {
        let updated = self
            .column(id)
            .ok_or_else(|| BoardDomainError::UnknownColumn(id.clone()))?
            .with_inserted(card, position)?;
        self.replace_items(id, updated.items().to_vec())
    }

    /// Removes a card from whichever column holds it.
    ///
    /// Returns the column id and the removed card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownCard`] when no column holds it.
    pub fn remove_card(&mut self, title: &CardTitle) -> BoardDomainResult<(ColumnId, Card)> {
        let column = self
            .column_of(title)
            .ok_or_else(|| BoardDomainError::UnknownCard(title.clone()))?;
        let id = column.id().clone();
        let (updated, removed) = column.without(title)?;
        self.replace_items(&id, updated.items().to_vec())?;
        Ok((id, removed))
    }

    /// Stores fetched body text on a card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownCard`] when no column holds it.
    pub fn set_card_content(&mut self, title: &CardTitle, content: impl Into<String>) -> BoardDomainResult<()> {
        let column = self
            .column_of(title)
            .ok_or_else(|| BoardDomainError::UnknownCard(title.clone()))?;
        let id = column.id().clone();
        let text = content.into();
        let updated = column.with_card_updated(title, |card| card.set_content(text))?;
        self.replace_items(&id, updated.items().to_vec())?;
        Ok(())
    }
}
