//! Card values held by board columns.

use super::CardTitle;
use serde::Serialize;

/// Body text of a card, fetched lazily when the card is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum CardContent {
    /// The body has not been fetched yet.
    NotLoaded,
    /// The fetched or locally edited body.
    Loaded(String),
}

impl CardContent {
    /// Text shown for a body that has not been fetched.
    pub const PLACEHOLDER: &'static str = "Details not loaded.";

    /// Returns the body, or [`Self::PLACEHOLDER`] when not loaded.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::NotLoaded => Self::PLACEHOLDER,
            Self::Loaded(text) => text,
        }
    }

    /// Returns whether the body has been fetched.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// A task card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    real_title: CardTitle,
    display_title: String,
    content: CardContent,
}

impl Card {
    /// Creates a card whose body has not been fetched.
    #[must_use]
    pub fn new(real_title: CardTitle, display_title: impl Into<String>) -> Self {
        Self {
            real_title,
            display_title: display_title.into(),
            content: CardContent::NotLoaded,
        }
    }

    /// Sets the card body.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = CardContent::Loaded(content.into());
        self
    }

    /// Returns the store identifier.
    #[must_use]
    pub const fn real_title(&self) -> &CardTitle {
        &self.real_title
    }

    /// Returns the label shown on the card face.
    #[must_use]
    pub fn display_title(&self) -> &str {
        &self.display_title
    }

    /// Returns the card body state.
    #[must_use]
    pub const fn content(&self) -> &CardContent {
        &self.content
    }

    /// Moves the card to a new identity; the display title follows it.
    pub(crate) fn rename(&mut self, real_title: CardTitle) {
        self.display_title = real_title.as_str().to_owned();
        self.real_title = real_title;
    }

    pub(crate) fn set_display_title(&mut self, display_title: impl Into<String>) {
        self.display_title = display_title.into();
    }

    pub(crate) fn set_content(&mut self, content: impl Into<String>) {
        self.content = CardContent::Loaded(content.into());
    }
}
