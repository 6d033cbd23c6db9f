//! Then steps for board reconciliation BDD scenarios.

use super::world::BoardWorld;
use eyre::WrapErr;
use kanwiki::board::{
    domain::{ColumnId, title_list},
    services::BoardError,
};
use rstest_bdd_macros::then;

#[then("the operation succeeds")]
fn operation_succeeds(world: &BoardWorld) -> Result<(), eyre::Report> {
    world
        .last_result()?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected failure: {err}"))?;
    Ok(())
}

#[then("the operation fails as a duplicate")]
fn operation_fails_as_duplicate(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if !matches!(result, Err(BoardError::Duplicate(_))) {
        return Err(eyre::eyre!("expected a duplicate error, got {result:?}"));
    }
    Ok(())
}

#[then("the operation fails with a remote error")]
fn operation_fails_remotely(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    let is_remote = result
        .as_ref()
        .err()
        .and_then(BoardError::store_error)
        .is_some();
    if !is_remote {
        return Err(eyre::eyre!("expected a remote error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"column "{column}" shows cards "{cards}""#)]
fn column_shows_cards(world: &BoardWorld, column: String, cards: String) -> Result<(), eyre::Report> {
    let id = ColumnId::new(column).wrap_err("parse column id")?;
    let shown: Vec<String> = world
        .session()?
        .board()
        .column(&id)
        .ok_or_else(|| eyre::eyre!("column {id} is not on the board"))?
        .titles()
        .map(|title| title.as_str().to_owned())
        .collect();
    let expected = title_list::decode(&cards);
    if shown != expected {
        return Err(eyre::eyre!("column {id} shows {shown:?}, expected {expected:?}"));
    }
    Ok(())
}

#[then(r#"column "{column}" has no cards"#)]
fn column_has_no_cards(world: &BoardWorld, column: String) -> Result<(), eyre::Report> {
    let id = ColumnId::new(column).wrap_err("parse column id")?;
    let held = world
        .session()?
        .board()
        .column(&id)
        .ok_or_else(|| eyre::eyre!("column {id} is not on the board"))?
        .len();
    if held != 0 {
        return Err(eyre::eyre!("column {id} holds {held} cards, expected none"));
    }
    Ok(())
}

#[then(r#"the store lists "{cards}" for column "{column}""#)]
fn store_lists_cards(world: &BoardWorld, cards: String, column: String) -> Result<(), eyre::Report> {
    let stored = world
        .store
        .snapshot(&column)
        .ok_or_else(|| eyre::eyre!("column document {column} is missing"))?
        .list();
    let expected = title_list::decode(&cards);
    if stored != expected {
        return Err(eyre::eyre!("store lists {stored:?} for {column}, expected {expected:?}"));
    }
    Ok(())
}

#[then(r#"card "{card}" is tagged "{tag}" in the store"#)]
fn card_is_tagged(world: &BoardWorld, card: String, tag: String) -> Result<(), eyre::Report> {
    let document = world
        .store
        .snapshot(&card)
        .ok_or_else(|| eyre::eyre!("card document {card} is missing"))?;
    if !document.has_tag(&tag) {
        return Err(eyre::eyre!("card {card} has tags {:?}", document.tag_list()));
    }
    Ok(())
}

#[then(r#"the store has no card "{card}""#)]
fn store_has_no_card(world: &BoardWorld, card: String) -> Result<(), eyre::Report> {
    if world.store.contains(&card) {
        return Err(eyre::eyre!("card document {card} still exists"));
    }
    Ok(())
}
