//! In-memory integration tests for board session operations.

use std::sync::Arc;

use crate::test_helpers::{
    BOARD, DOING, DONE, OTHER_BOARD, TODO, board, card, column, seeded_store, stored_list,
};
use kanwiki::board::{
    adapters::memory::InMemoryTiddlerStore,
    domain::{Board, CardContent, Column},
    ports::TiddlerStore,
    services::{BoardError, BoardSession, NewCardRequest},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestSession = BoardSession<InMemoryTiddlerStore, DefaultClock>;

struct Harness {
    store: Arc<InMemoryTiddlerStore>,
    session: TestSession,
}

#[fixture]
async fn harness() -> Harness {
    let store = Arc::new(seeded_store());
    let session = BoardSession::open(Arc::clone(&store), Arc::new(DefaultClock), board(BOARD))
        .await
        .expect("board should open")
        .with_available_boards([board(BOARD), board(OTHER_BOARD)]);
    Harness { store, session }
}

fn titles<'a>(board: &'a Board, id: &str) -> Vec<&'a str> {
    board
        .column(&column(id))
        .map(|found| found.titles().map(|title| title.as_str()).collect())
        .unwrap_or_default()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_assembles_the_board(#[future] harness: Harness) {
    let Harness { session, .. } = harness.await;
    let loaded = session.board();

    let ids: Vec<&str> = loaded
        .columns()
        .iter()
        .map(|found| found.id().as_str())
        .collect();
    assert_eq!(ids, vec![TODO, DOING, DONE]);
    let headers: Vec<&str> = loaded.columns().iter().map(Column::header).collect();
    assert_eq!(headers, vec!["Todo", "Doing", DONE]);
    assert_eq!(titles(loaded, TODO), vec!["C1", "C2", "C3"]);
    assert_eq!(session.available_boards(), [board(BOARD), board(OTHER_BOARD)]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn switching_boards_resets_active_column(#[future] harness: Harness) {
    let Harness { mut session, .. } = harness.await;
    assert!(session.select_column(2));

    session
        .switch_board(board(OTHER_BOARD))
        .await
        .expect("switch should succeed");

    assert_eq!(session.board().name(), &board(OTHER_BOARD));
    assert_eq!(session.board().current_index(), 0);
    assert_eq!(titles(session.board(), "Inbox"), vec!["W1"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn switching_to_unknown_board_keeps_current_one(#[future] harness: Harness) {
    let Harness { mut session, .. } = harness.await;

    let result = session.switch_board(board("No Such Board")).await;

    assert!(matches!(result, Err(BoardError::Assembly { .. })));
    assert_eq!(session.board().name(), &board(BOARD));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn navigation_moves_between_columns(#[future] harness: Harness) {
    let Harness { mut session, .. } = harness.await;

    assert!(!session.previous_column());
    assert!(session.next_column());
    assert_eq!(
        session.board().current_column().map(Column::id),
        Some(&column(DOING))
    );
    assert!(!session.select_column(7));
    assert_eq!(session.board().current_index(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_updates_board_and_store(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    session
        .reorder_card(&column(TODO), 2, 0)
        .await
        .expect("reorder should succeed");

    assert_eq!(titles(session.board(), TODO), vec!["C3", "C1", "C2"]);
    assert_eq!(stored_list(&store, TODO), vec!["C3", "C1", "C2"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_places_card_on_top_of_target(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    session
        .move_card(&card("C1"), &column(DOING))
        .await
        .expect("move should succeed");

    assert_eq!(titles(session.board(), TODO), vec!["C2", "C3"]);
    assert_eq!(titles(session.board(), DOING), vec!["C1", "Write report"]);
    assert_eq!(stored_list(&store, TODO), vec!["C2", "C3"]);
    assert_eq!(stored_list(&store, DOING), vec!["C1", "Write report"]);
    let moved = store.snapshot("C1").expect("card exists");
    assert!(moved.has_tag(DOING));
    assert!(!moved.has_tag(TODO));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_into_own_column_lifts_card_to_top(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    session
        .move_card(&card("C3"), &column(TODO))
        .await
        .expect("move should succeed");

    assert_eq!(stored_list(&store, TODO), vec!["C3", "C1", "C2"]);
    assert!(store.snapshot("C3").expect("card exists").has_tag(TODO));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_into_empty_column(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    session
        .move_card(&card("Write report"), &column(DONE))
        .await
        .expect("move should succeed");

    assert!(titles(session.board(), DOING).is_empty());
    assert!(stored_list(&store, DOING).is_empty());
    assert_eq!(stored_list(&store, DONE), vec!["Write report"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_adds_card_to_top(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    let created = session
        .create_card(&column(DONE), NewCardRequest::new("Pay rent", "by Friday"))
        .await
        .expect("create should succeed");

    assert_eq!(titles(session.board(), DONE), vec![created.as_str()]);
    let local = session.board().card(&created).expect("card on board");
    assert_eq!(local.display_title(), "Pay rent");
    assert_eq!(local.content(), &CardContent::Loaded("by Friday".to_owned()));
    let stored = store.snapshot(created.as_str()).expect("card stored");
    assert_eq!(stored.short_text(), Some("Pay rent"));
    assert!(stored.has_tag(DONE));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_create_leaves_board_unchanged(#[future] harness: Harness) {
    let Harness { mut session, .. } = harness.await;
    let before = session.board().clone();

    let result = session
        .create_card(
            &column(DONE),
            NewCardRequest::new("Again", "").with_real_title("C1"),
        )
        .await;

    assert!(matches!(result, Err(BoardError::Duplicate(_))));
    assert_eq!(session.board(), &before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_rejects_title_held_by_stale_board(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;
    store
        .delete_tiddler("Write report")
        .await
        .expect("external delete should succeed");
    let before = session.board().clone();

    let result = session
        .create_card(
            &column(DONE),
            NewCardRequest::new("Report again", "").with_real_title("Write report"),
        )
        .await;

    assert!(matches!(result, Err(BoardError::Duplicate(title)) if title == "Write report"));
    assert_eq!(store.put_count(), 0);
    assert!(!store.contains("Write report"));
    assert!(stored_list(&store, DONE).is_empty());
    assert_eq!(session.board(), &before);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_renames_card_without_short_text(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    let renamed = session
        .edit_card(&card("Write report"), "Write yearly report", "draft")
        .await
        .expect("edit should succeed");

    assert_eq!(renamed, card("Write yearly report"));
    assert_eq!(titles(session.board(), DOING), vec!["Write yearly report"]);
    assert!(session.board().card(&card("Write report")).is_none());
    assert!(!store.contains("Write report"));
    assert_eq!(stored_list(&store, DOING), vec!["Write yearly report"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_updates_display_title_in_place(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    let kept = session
        .edit_card(&card("C2"), "Fix bike brakes", "front and back")
        .await
        .expect("edit should succeed");

    assert_eq!(kept, card("C2"));
    let local = session.board().card(&kept).expect("card on board");
    assert_eq!(local.display_title(), "Fix bike brakes");
    assert_eq!(
        store.snapshot("C2").and_then(|doc| doc.text),
        Some("front and back".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_card_everywhere(#[future] harness: Harness) {
    let Harness {
        store,
        mut session,
    } = harness.await;

    session
        .delete_card(&card("C2"))
        .await
        .expect("delete should succeed");

    assert_eq!(titles(session.board(), TODO), vec!["C1", "C3"]);
    assert!(!store.contains("C2"));
    assert_eq!(stored_list(&store, TODO), vec!["C1", "C3"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn open_card_loads_details(#[future] harness: Harness) {
    let Harness { mut session, .. } = harness.await;
    assert_eq!(
        session.board().card(&card("C1")).map(|found| found.content().as_text()),
        Some(CardContent::PLACEHOLDER)
    );

    let details = session
        .open_card(&card("C1"))
        .await
        .expect("fetch should succeed");

    assert_eq!(details, "details of C1");
    assert!(
        session
            .board()
            .card(&card("C1"))
            .is_some_and(|found| found.content().is_loaded())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operations_on_unknown_cards_are_rejected(#[future] harness: Harness) {
    let Harness { mut session, .. } = harness.await;
    let ghost = card("Ghost");

    assert!(matches!(
        session.move_card(&ghost, &column(DONE)).await,
        Err(BoardError::Domain(_))
    ));
    assert!(matches!(
        session.delete_card(&ghost).await,
        Err(BoardError::Domain(_))
    ));
    assert!(matches!(
        session.open_card(&ghost).await,
        Err(BoardError::Domain(_))
    ));
}
