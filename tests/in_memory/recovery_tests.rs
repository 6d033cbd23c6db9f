//! Local state after failed writes, and recovery by reloading.

use std::sync::Arc;

use crate::test_helpers::{BOARD, DOING, TODO, board, card, column, seeded_store, stored_list};
use kanwiki::board::{
    adapters::memory::InMemoryTiddlerStore,
    domain::Board,
    ports::{StoreOperation, TiddlerStoreError},
    services::{BoardError, BoardSession, MoveStep},
};
use mockable::DefaultClock;

type TestSession = BoardSession<InMemoryTiddlerStore, DefaultClock>;

async fn open(store: &Arc<InMemoryTiddlerStore>) -> TestSession {
    BoardSession::open(Arc::clone(store), Arc::new(DefaultClock), board(BOARD))
        .await
        .expect("board should open")
}

fn titles<'a>(loaded: &'a Board, id: &str) -> Vec<&'a str> {
    loaded
        .column(&column(id))
        .map(|found| found.titles().map(|title| title.as_str()).collect())
        .unwrap_or_default()
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_reorder_keeps_local_order_until_reload() {
    let store = Arc::new(seeded_store());
    let mut session = open(&store).await;
    store.fail_puts_of(TODO);

    let result = session.reorder_card(&column(TODO), 0, 2).await;

    assert!(matches!(result, Err(BoardError::Remote(_))));
    assert!(matches!(
        result.as_ref().err().and_then(BoardError::store_error),
        Some(TiddlerStoreError::Remote {
            operation: StoreOperation::Put,
            status: 500,
            ..
        })
    ));
    assert_eq!(titles(session.board(), TODO), vec!["C2", "C3", "C1"]);
    assert_eq!(stored_list(&store, TODO), vec!["C1", "C2", "C3"]);

    session.reload().await.expect("reload should succeed");
    assert_eq!(titles(session.board(), TODO), vec!["C1", "C2", "C3"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn interrupted_move_keeps_earlier_writes() {
    let store = Arc::new(seeded_store());
    let mut session = open(&store).await;
    store.fail_puts_of(DOING);

    let result = session.move_card(&card("C1"), &column(DOING)).await;

    assert!(matches!(
        result,
        Err(BoardError::MoveInterrupted {
            step: MoveStep::TargetOrder,
            ..
        })
    ));
    assert_eq!(stored_list(&store, TODO), vec!["C2", "C3"]);
    assert_eq!(stored_list(&store, DOING), vec!["Write report"]);
    assert!(store.snapshot("C1").expect("card exists").has_tag(TODO));

    session.reload().await.expect("reload should succeed");
    assert!(session.board().card(&card("C1")).is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_card_write_leaves_edit_unapplied() {
    let store = Arc::new(seeded_store());
    let mut session = open(&store).await;
    store.fail_puts_of("C2");

    let result = session.edit_card(&card("C2"), "Renamed label", "body").await;

    assert!(matches!(result, Err(BoardError::Remote(_))));
    assert_eq!(
        session
            .board()
            .card(&card("C2"))
            .map(|found| found.display_title()),
        Some("Fix bike")
    );
}
