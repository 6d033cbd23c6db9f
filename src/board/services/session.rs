//! Board session: the explicit context every board operation runs against.
//!
//! The session owns the authoritative [`Board`] and applies each mutation
//! locally before persisting it. A failed write leaves the local change in
//! place; the next reload brings local state back in line with the store.

use mockable::Clock;
use std::sync::Arc;

use super::{
    BoardAssembler, BoardError, BoardResult, EditCardRequest, NewCardRequest,
    ReconciliationService,
};
use crate::board::{
    adapters::http::HttpTiddlerStore,
    domain::{Board, BoardDomainError, BoardName, CardTitle, Column, ColumnId},
    ports::TiddlerStore,
};
use crate::config::{ConfigError, StoreSettings};

/// An open board plus the services that load and persist it.
pub struct BoardSession<S, C>
where
    S: TiddlerStore,
    C: Clock + Send + Sync,
{
    assembler: BoardAssembler<S>,
    reconciler: ReconciliationService<S, C>,
    available_boards: Vec<BoardName>,
    board: Board,
}

impl<S, C> BoardSession<S, C>
where
    S: TiddlerStore,
    C: Clock + Send + Sync,
{
    /// Loads `name` and opens a session on it.
    ///
    /// # Errors
    ///
    /// Returns the assembly error when the board cannot be loaded.
    pub async fn open(
        store: Arc<S>,
        clock: Arc<C>,
        name: BoardName,
    ) -> BoardResult<Self> {
        let assembler = BoardAssembler::new(Arc::clone(&store));
        let reconciler = ReconciliationService::new(store, clock);
        let board = assembler.load(&name).await?;
        Ok(Self {
            assembler,
            reconciler,
            available_boards: vec![name],
            board,
        })
    }

    /// Sets the boards offered for switching.
    #[must_use]
    pub fn with_available_boards(
        mut self,
        boards: impl IntoIterator<Item = BoardName>,
    ) -> Self {
        self.available_boards = boards.into_iter().collect();
        self
    }

    /// Returns the current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the boards offered for switching.
    #[must_use]
    pub fn available_boards(&self) -> &[BoardName] {
        &self.available_boards
    }

    /// Returns the reconciliation service used for persistence.
    #[must_use]
    pub const fn reconciler(&self) -> &ReconciliationService<S, C> {
        &self.reconciler
    }

    /// Reloads the current board from the store.
    ///
    /// # Errors
    ///
    /// Returns the assembly error; the loaded board stays in place.
    pub async fn reload(&mut self) -> BoardResult<()> {
        let name = self.board.name().clone();
        self.switch_board(name).await
    }

    /// Replaces the current board with `name`, resetting the active column.
    ///
    /// # Errors
    ///
    /// Returns the assembly error; the loaded board stays in place.
    pub async fn switch_board(&mut self, name: BoardName) -> BoardResult<()> {
        self.board = self.assembler.load(&name).await?;
        Ok(())
    }

    /// Activates the column at `index`; out-of-range indices are ignored.
    pub fn select_column(&mut self, index: usize) -> bool {
        self.board.set_current_index(index)
    }

    /// Activates the next column.
    pub fn next_column(&mut self) -> bool {
        self.board.next_column()
    }

    /// Activates the previous column.
    pub fn previous_column(&mut self) -> bool {
        self.board.previous_column()
    }

    /// Moves a card within its column and persists the new order.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardError::Domain`] for an invalid position or
    /// column, or the persistence error; the local order is kept either way.
    pub async fn reorder_card(
        &mut self,
        column: &ColumnId,
        from: usize,
        to: usize,
    ) -> BoardResult<()> {
        let snapshot = self.board.reorder_card(column, from, to)?.clone();
        self.reconciler.reorder_within_column(&snapshot).await
    }

    /// Moves a card to the top of another column and persists the move.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardError::Domain`] for an unknown card or column,
    /// or the persistence error; the local move is kept either way.
    pub async fn move_card(&mut self, card: &CardTitle, target: &ColumnId) -> BoardResult<()> {
        let source = self.board.move_card(card, target, 0)?;
        if &source == target {
            return self.reorder_snapshot(target).await;
        }
        let source_snapshot = self.snapshot(&source)?;
        let target_snapshot = self.snapshot(target)?;
        self.reconciler
            .move_between_columns(&source_snapshot, &target_snapshot, card)
            .await
    }

    /// Creates a card at the top of `column`.
    ///
    /// Returns the new card's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Duplicate`] when the identifier is taken on the
    /// board or in the store (no write is issued), or another
    /// [`BoardError`]; the board is unchanged on failure.
    pub async fn create_card(
        &mut self,
        column: &ColumnId,
        request: NewCardRequest,
    ) -> BoardResult<CardTitle> {
        let snapshot = self.snapshot(column)?;
        let created = self.reconciler.card_title_for(&request)?;
        if self.board.card(&created).is_some() {
            return Err(BoardError::Duplicate(created));
        }
        let updated = self
            .reconciler
            .create_card(&snapshot, request.with_real_title(created.as_str()))
            .await?;
        self.board.replace_items(column, updated.items().to_vec())?;
        Ok(created)
    }

    /// Saves a card's display title and body, renaming it when its title is
    /// its identifier.
    ///
    /// Returns the card's identifier after the edit.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardError::Domain`] for an unknown card or empty
    /// title, or the persistence error.
    pub async fn edit_card(
        &mut self,
        card: &CardTitle,
        display_title: &str,
        content: &str,
    ) -> BoardResult<CardTitle> {
        let column = self
            .board
            .column_of(card)
            .ok_or_else(|| BoardDomainError::UnknownCard(card.clone()))?
            .clone();
        let request = EditCardRequest::new(card.clone(), display_title, content);
        let outcome = self.reconciler.edit_card(&column, request).await?;
        self.board
            .replace_items(column.id(), outcome.column.items().to_vec())?;
        Ok(outcome.real_title)
    }

    /// Deletes a card and drops it from its column's persisted order.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardError::Domain`] for an unknown card, or the
    /// persistence error; the card stays on the board when the delete fails.
    pub async fn delete_card(&mut self, card: &CardTitle) -> BoardResult<()> {
        let column = self
            .board
            .column_of(card)
            .ok_or_else(|| BoardDomainError::UnknownCard(card.clone()))?
            .clone();
        let updated = self.reconciler.delete_card(&column, card).await?;
        self.board
            .replace_items(column.id(), updated.items().to_vec())?;
        Ok(())
    }

    /// Fetches a card's body and stores it on the local card.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardError::Domain`] for an unknown card or the fetch
    /// error.
    pub async fn open_card(&mut self, card: &CardTitle) -> BoardResult<String> {
        if self.board.card(card).is_none() {
            return Err(BoardDomainError::UnknownCard(card.clone()).into());
        }
        let content = self.reconciler.fetch_card_content(card).await?;
        self.board.set_card_content(card, content.as_str())?;
        Ok(content)
    }

    fn snapshot(&self, column: &ColumnId) -> BoardResult<Column> {
        self.board
            .column(column)
            .cloned()
            .ok_or_else(|| BoardDomainError::UnknownColumn(column.clone()).into())
    }

    async fn reorder_snapshot(&self, column: &ColumnId) -> BoardResult<()> {
        let snapshot = self.snapshot(column)?;
        self.reconciler.reorder_within_column(&snapshot).await
    }
}

impl<C> BoardSession<HttpTiddlerStore, C>
where
    C: Clock + Send + Sync,
{
    /// Connects to the configured store and opens the first configured board.
    ///
    /// # Errors
    ///
    /// Returns [`super::BoardError::Configuration`] when the base address or
    /// board list is missing or invalid, before any request is made.
    pub async fn connect(settings: &StoreSettings, clock: Arc<C>) -> BoardResult<Self> {
        let store = Arc::new(HttpTiddlerStore::from_settings(settings)?);
        let boards = settings.board_names()?;
        let first = boards
            .first()
            .cloned()
            .ok_or(ConfigError::NoBoards)?;
        Ok(Self::open(store, clock, first).await?.with_available_boards(boards))
    }
}
