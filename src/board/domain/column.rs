//! Column values: an ordered bucket of cards backed by one store document.

use super::{BoardDomainError, BoardDomainResult, Card, CardTitle, ColumnId, title_list};
use serde::Serialize;

/// A board column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    id: ColumnId,
    header: String,
    items: Vec<Card>,
}

impl Column {
    /// Creates a column; a blank header falls back to the column id.
    #[must_use]
    pub fn new(id: ColumnId, header: impl Into<String>, items: Vec<Card>) -> Self {
        let mut header_text: String = header.into();
        if header_text.trim().is_empty() {
            header_text = id.as_str().to_owned();
        }
        Self {
            id,
            header: header_text,
            items,
        }
    }

    /// Returns the id of the backing document.
    #[must_use]
    pub const fn id(&self) -> &ColumnId {
        &self.id
    }

    /// Returns the display header.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Returns the cards in display order.
    #[must_use]
    pub fn items(&self) -> &[Card] {
        &self.items
    }

    /// Returns the number of cards.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the column has no cards.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the position of a card.
    #[must_use]
    pub fn position(&self, title: &CardTitle) -> Option<usize> {
        self.items
            .iter()
            .position(|card| card.real_title() == title)
    }

    /// Returns a card by title.
    #[must_use]
    pub fn card(&self, title: &CardTitle) -> Option<&Card> {
        self.items.iter().find(|card| card.real_title() == title)
    }

    /// Returns whether the column holds a card.
    #[must_use]
    pub fn contains(&self, title: &CardTitle) -> bool {
        self.position(title).is_some()
    }

    /// Returns the card titles in order.
    pub fn titles(&self) -> impl Iterator<Item = &CardTitle> {
        self.items.iter().map(Card::real_title)
    }

    /// Encodes the card order as the column document's list field.
    #[must_use]
    pub fn list_field(&self) -> String {
        title_list::encode(self.titles())
    }

    /// Replaces the whole card sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateCard`] when `items` holds the
    /// same title twice; the column is left untouched.
    pub fn replace_items(&mut self, items: Vec<Card>) -> BoardDomainResult<()> {
        if let Some(duplicate) = first_duplicate(&items) {
            return Err(BoardDomainError::DuplicateCard(duplicate.clone()));
        }
        self.items = items;
        Ok(())
    }

    /// Returns a copy with `card` inserted at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::DuplicateCard`] when the column already
    /// holds the card or [`BoardDomainError::PositionOutOfRange`] when
    /// `position` exceeds the column length.
    pub fn with_inserted(&self, card: Card, position: usize) -> BoardDomainResult<Self> {
        if self.contains(card.real_title()) {
            return Err(BoardDomainError::DuplicateCard(card.real_title().clone()));
        }
        if position > self.items.len() {
            return Err(BoardDomainError::PositionOutOfRange {
                position,
                len: self.items.len(),
            });
        }
        let mut items = self.items.clone();
        items.insert(position, card);
        let mut updated = self.clone();
        updated.replace_items(items)?;
        Ok(updated)
    }

    /// Returns a copy without the card titled `title`, plus the removed card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownCard`] when the column does not
    /// hold the card.
    pub fn without(&self, title: &CardTitle) -> BoardDomainResult<(Self, Card)> {
        let position = self
            .position(title)
            .ok_or_else(|| BoardDomainError::UnknownCard(title.clone()))?;
        let mut items = self.items.clone();
        let removed = items.remove(position);
        let mut updated = self.clone();
        updated.replace_items(items)?;
        Ok((updated, removed))
    }

    /// Returns a copy with `update` applied to the card titled `title`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::UnknownCard`] when the column does not
    /// hold the card, or [`BoardDomainError::DuplicateCard`] when the update
    /// renames the card onto another card of the column.
    pub fn with_card_updated(
        &self,
        title: &CardTitle,
        update: impl FnOnce(&mut Card),
    ) -> BoardDomainResult<Self> {
        let position = self
            .position(title)
            .ok_or_else(|| BoardDomainError::UnknownCard(title.clone()))?;
        let mut items = self.items.clone();
        if let Some(card) = items.get_mut(position) {
            update(card);
        }
        let mut updated = self.clone();
        updated.replace_items(items)?;
        Ok(updated)
    }
}

fn first_duplicate(items: &[Card]) -> Option<&CardTitle> {
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    items
        .iter()
        .map(Card::real_title)
        .find(|title| !seen.insert(*title))
}
