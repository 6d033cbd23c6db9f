//! Remote persistence of board mutations.
//!
//! Operations take column snapshots that already reflect the local change
//! (or return the updated snapshot for the caller to apply), so the service
//! never owns board state. Every write touching a column's order runs under
//! that column's lock from [`ColumnLocks`].

use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::{BoardError, BoardResult, ColumnLocks, MoveStep};
use crate::board::{
    domain::{BoardDomainError, Card, CardTitle, Column, Tiddler, TiddlerField},
    ports::{TiddlerStore, TiddlerStoreError},
};

/// Request payload for creating a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCardRequest {
    display_title: String,
    content: String,
    real_title: Option<String>,
}

impl NewCardRequest {
    /// Creates a request with a display title and body.
    #[must_use]
    pub fn new(display_title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            display_title: display_title.into(),
            content: content.into(),
            real_title: None,
        }
    }

    /// Uses an explicit store identifier instead of a generated one.
    #[must_use]
    pub fn with_real_title(mut self, real_title: impl Into<String>) -> Self {
        self.real_title = Some(real_title.into());
        self
    }
}

/// Request payload for editing a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCardRequest {
    real_title: CardTitle,
    display_title: String,
    content: String,
}

impl EditCardRequest {
    /// Creates an edit of the card titled `real_title`.
    #[must_use]
    pub fn new(
        real_title: CardTitle,
        display_title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            real_title,
            display_title: display_title.into(),
            content: content.into(),
        }
    }

    /// Returns the card being edited.
    #[must_use]
    pub const fn real_title(&self) -> &CardTitle {
        &self.real_title
    }
}

/// Result of a persisted card edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Column snapshot with the card's local references patched.
    pub column: Column,
    /// Identifier of the card after the edit.
    pub real_title: CardTitle,
    /// Whether the edit moved the card to a new identifier.
    pub renamed: bool,
}

/// Persists reorder, move, create, edit and delete operations.
#[derive(Clone)]
pub struct ReconciliationService<S, C>
where
    S: TiddlerStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    locks: ColumnLocks,
}

impl<S, C> ReconciliationService<S, C>
where
    S: TiddlerStore,
    C: Clock + Send + Sync,
{
    /// Creates a reconciliation service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            locks: ColumnLocks::new(),
        }
    }

    /// Returns the per-column lock registry.
    #[must_use]
    pub const fn locks(&self) -> &ColumnLocks {
        &self.locks
    }

    /// Writes a column's card order to its backing document.
    ///
    /// The document is fetched fresh so concurrently changed fields survive;
    /// only its list field is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Remote`] when the fetch or the write fails.
    pub async fn reorder_within_column(&self, column: &Column) -> BoardResult<()> {
        let _guard = self.locks.lock(column.id()).await;
        self.write_order(column).await?;
        info!(column = %column.id(), cards = column.len(), "column order persisted");
        Ok(())
    }

    /// Persists a card's move from `source` to `target`.
    ///
    /// `source` and `target` must already reflect the move. The card document
    /// is fetched first, then the source order, target order and card tags
    /// are written in that sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when the snapshots do not reflect the
    /// move, [`BoardError::Remote`] when the card cannot be fetched (nothing
    /// has been written yet), or [`BoardError::MoveInterrupted`] naming the
    /// write that failed; earlier writes are not rolled back.
    pub async fn move_between_columns(
        &self,
        source: &Column,
        target: &Column,
        card: &CardTitle,
    ) -> BoardResult<()> {
        if source.contains(card) {
            return Err(BoardDomainError::DuplicateCard(card.clone()).into());
        }
        if !target.contains(card) {
            return Err(BoardDomainError::UnknownCard(card.clone()).into());
        }

        let _guard = self.locks.lock_pair(source.id(), target.id()).await;
        let mut tiddler = self.store.get_tiddler(card.as_str()).await?;

        self.write_order(source)
            .await
            .map_err(|err| interrupted(MoveStep::SourceOrder, err))?;
        self.write_order(target)
            .await
            .map_err(|err| interrupted(MoveStep::TargetOrder, err))?;

        let mut tags: Vec<String> = tiddler
            .tag_list()
            .into_iter()
            .filter(|tag| tag != source.id().as_str())
            .collect();
        if !tags.iter().any(|tag| tag == target.id().as_str()) {
            tags.push(target.id().as_str().to_owned());
        }
        tiddler.set_tags(&tags);
        self.store
            .put_tiddler(&tiddler)
            .await
            .map_err(|err| interrupted(MoveStep::CardTags, err))?;

        info!(
            card = %card,
            from = %source.id(),
            to = %target.id(),
            "card moved between columns"
        );
        Ok(())
    }

    /// Creates a card document and places the card at the top of `column`.
    ///
    /// Returns the column snapshot with the new card inserted; its order has
    /// already been persisted.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Duplicate`] when a document with the card's
    /// identifier exists (no write is issued), [`BoardError::Domain`] for an
    /// empty display title, or [`BoardError::Remote`] when a request fails.
    pub async fn create_card(
        &self,
        column: &Column,
        request: NewCardRequest,
    ) -> BoardResult<Column> {
        let display_title = non_empty_display(&request.display_title)?;
        let now = self.clock.utc();
        let real_title = self.card_title_for(&request)?;

        let card = Card::new(real_title.clone(), display_title).with_content(&request.content);
        let updated = column.with_inserted(card, 0)?;

        let _guard = self.locks.lock(column.id()).await;
        self.ensure_absent(&real_title).await?;

        let timestamp = Tiddler::format_timestamp(now);
        let mut tiddler = Tiddler::new(real_title.as_str());
        tiddler.text = Some(request.content);
        tiddler.content_type = Some(Tiddler::WIKI_TEXT_TYPE.to_owned());
        tiddler
            .extra
            .insert("bag".to_owned(), Value::String("default".to_owned()));
        tiddler.created = Some(timestamp.clone());
        tiddler.modified = Some(timestamp);
        tiddler.set_tags([column.id().as_str()]);
        tiddler.set_field(TiddlerField::ShortText, display_title);
        self.store.put_tiddler(&tiddler).await?;

        self.write_order(&updated).await?;

        info!(card = %real_title, column = %column.id(), "card created");
        Ok(updated)
    }

    /// Returns the identifier a create request will use: the explicit one,
    /// else `New-<unix millis>`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for a blank explicit identifier.
    pub fn card_title_for(&self, request: &NewCardRequest) -> BoardResult<CardTitle> {
        let title = match &request.real_title {
            Some(title) => CardTitle::new(title.as_str())?,
            None => CardTitle::new(format!("New-{}", self.clock.utc().timestamp_millis()))?,
        };
        Ok(title)
    }

    /// Saves a card's display title and body.
    ///
    /// A card without a `shorttext` field uses its identifier as display
    /// title, so changing the title renames it: the document is written under
    /// the new identifier, the old one is deleted, the card is patched in
    /// `column` and the column order is persisted again. Otherwise a single
    /// write suffices.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for an empty display title or a card not
    /// held by `column`, [`BoardError::Duplicate`] when the rename target
    /// already exists, or [`BoardError::Remote`] when a request fails.
    pub async fn edit_card(
        &self,
        column: &Column,
        request: EditCardRequest,
    ) -> BoardResult<EditOutcome> {
        let display_title = non_empty_display(&request.display_title)?;
        let old_title = request.real_title;
        if !column.contains(&old_title) {
            return Err(BoardDomainError::UnknownCard(old_title).into());
        }

        let _guard = self.locks.lock(column.id()).await;
        let mut tiddler = self.store.get_tiddler(old_title.as_str()).await?;
        let current_short = tiddler.short_text().map(str::to_owned);
        let renamed = current_short.is_none() && old_title.as_str() != display_title;
        let new_title = if renamed {
            let candidate = CardTitle::new(display_title)?;
            self.ensure_absent(&candidate).await?;
            candidate
        } else {
            old_title.clone()
        };

        tiddler.title = new_title.as_str().to_owned();
        tiddler.text = Some(request.content.clone());
        tiddler.modified = Some(Tiddler::format_timestamp(self.clock.utc()));
        if current_short.as_deref().is_some_and(|short| short != display_title) {
            tiddler.set_field(TiddlerField::ShortText, display_title);
        }
        self.store.put_tiddler(&tiddler).await?;

        if !renamed {
            let updated = column.with_card_updated(&old_title, |card| {
                card.set_display_title(display_title);
                card.set_content(request.content);
            })?;
            info!(card = %old_title, "card updated");
            return Ok(EditOutcome {
                column: updated,
                real_title: new_title,
                renamed,
            });
        }

        self.store.delete_tiddler(old_title.as_str()).await?;
        let updated = column.with_card_updated(&old_title, |card| {
            card.rename(new_title.clone());
            card.set_content(request.content);
        })?;
        self.write_order(&updated).await?;

        info!(from = %old_title, to = %new_title, "card renamed");
        Ok(EditOutcome {
            column: updated,
            real_title: new_title,
            renamed,
        })
    }

    /// Deletes a card document and drops it from `column`'s persisted order.
    ///
    /// Returns the column snapshot without the card.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when `column` does not hold the card or
    /// [`BoardError::Remote`] when a request fails.
    pub async fn delete_card(&self, column: &Column, card: &CardTitle) -> BoardResult<Column> {
        let (updated, _) = column.without(card)?;

        let _guard = self.locks.lock(column.id()).await;
        self.store.delete_tiddler(card.as_str()).await?;
        self.write_order(&updated).await?;

        info!(card = %card, column = %column.id(), "card deleted");
        Ok(updated)
    }

    /// Fetches a card's body text.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Remote`] when the card cannot be fetched.
    pub async fn fetch_card_content(&self, card: &CardTitle) -> BoardResult<String> {
        let tiddler = self.store.get_tiddler(card.as_str()).await?;
        Ok(tiddler.text.unwrap_or_default())
    }

    async fn write_order(&self, column: &Column) -> Result<(), TiddlerStoreError> {
        let mut tiddler = self.store.get_tiddler(column.id().as_str()).await?;
        tiddler.set_field(TiddlerField::List, column.list_field());
        self.store.put_tiddler(&tiddler).await
    }

    async fn ensure_absent(&self, title: &CardTitle) -> BoardResult<()> {
        match self.store.get_tiddler(title.as_str()).await {
            Ok(_) => {
                warn!(card = %title, "card identifier already taken");
                Err(BoardError::Duplicate(title.clone()))
            }
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn non_empty_display(display_title: &str) -> BoardResult<&str> {
    let trimmed = display_title.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyIdentifier("display title").into());
    }
    Ok(trimmed)
}

const fn interrupted(step: MoveStep, source: TiddlerStoreError) -> BoardError {
    BoardError::MoveInterrupted { step, source }
}

