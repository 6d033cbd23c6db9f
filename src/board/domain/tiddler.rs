//! Remote document representation.
//!
//! Single-item reads return custom fields nested under `fields`, while list
//! queries return "skinny" documents with custom fields flattened to the top
//! level and no `text`. [`Tiddler::field`] reads both shapes. Keys the crate
//! does not model are kept in `extra` so a fetch-modify-put cycle preserves
//! them.

use super::title_list;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Custom field names used by the board model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TiddlerField {
    /// Ordered list of titles (column order on a board, card order on a column).
    List,
    /// Short display label of a card or column header.
    ShortText,
}

impl TiddlerField {
    /// Returns the field key used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::ShortText => "shorttext",
        }
    }
}

/// A document in the remote store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiddler {
    /// Unique document title.
    pub title: String,
    /// Body text; absent in list-query results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Tags in list-field encoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Content type of the body text.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Creation timestamp in store format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Modification timestamp in store format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    /// Custom fields of a full document.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
    /// Every other top-level key, including flattened custom fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tiddler {
    /// Content type given to new card documents.
    pub const WIKI_TEXT_TYPE: &'static str = "text/vnd.tiddlywiki";

    /// Creates an empty document with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Looks up a custom field in either document shape.
    ///
    /// Only string values are returned.
    #[must_use]
    pub fn field(&self, field: TiddlerField) -> Option<&str> {
        let key = field.as_str();
        self.fields
            .get(key)
            .or_else(|| self.extra.get(key))
            .and_then(Value::as_str)
    }

    /// Writes a custom field into the nested `fields` object.
    ///
    /// A flattened copy of the same key is dropped so the document carries a
    /// single value.
    pub fn set_field(&mut self, field: TiddlerField, value: impl Into<String>) {
        let key = field.as_str();
        self.extra.remove(key);
        self.fields.insert(key.to_owned(), Value::String(value.into()));
    }

    /// Returns the decoded `list` field, empty when absent.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        title_list::decode_optional(self.field(TiddlerField::List))
    }

    /// Returns the `shorttext` field when present and non-empty.
    #[must_use]
    pub fn short_text(&self) -> Option<&str> {
        self.field(TiddlerField::ShortText)
            .filter(|text| !text.trim().is_empty())
    }

    /// Returns the decoded tags.
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        title_list::decode_optional(self.tags.as_deref())
    }

    /// Replaces the tags with the encoded form of `tags`.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = Some(title_list::encode(tags));
    }

    /// Returns whether the document carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag_list().iter().any(|candidate| candidate == tag)
    }

    /// Formats a timestamp the way the store writes `created`/`modified`.
    #[must_use]
    pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
        timestamp.format("%Y%m%d%H%M%S%3f").to_string()
    }
}
