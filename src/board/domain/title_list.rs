//! Encoding of ordered title sequences in the store's list-field format.
//!
//! A list field is a space-separated sequence of titles. Titles containing
//! whitespace or starting with `[[` are wrapped in `[[` and `]]`. The same grammar is used for the
//! `tags` field of every document.
//!
//! The format has no escape for `]]`, so a title containing that sequence
//! does not survive an encode/decode round trip.

/// Decodes a list field into its ordered titles.
///
/// Whitespace separates bare titles; a `[[...]]` run is captured as one title
/// even when it contains whitespace. A run closes at the first `]]` that is
/// followed by whitespace or the end of input, falling back to the first
/// `]]` at all. A `[[` with no closing `]]` is read as a bare title, and an
/// empty `[[]]` pair is skipped.
#[must_use]
pub fn decode(input: &str) -> Vec<String> {
    let mut titles = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        if let Some((inner, tail)) = rest.strip_prefix("[[").and_then(split_bracket_run) {
            if !inner.is_empty() {
                titles.push(inner.to_owned());
            }
            rest = tail.trim_start();
            continue;
        }

        let (token, tail) = rest
            .split_once(char::is_whitespace)
            .unwrap_or((rest, ""));
        titles.push(token.to_owned());
        rest = tail.trim_start();
    }

    titles
}

/// Splits the text after an opening `[[` into the bracketed title and the
/// remainder after its closing `]]`.
fn split_bracket_run(after_open: &str) -> Option<(&str, &str)> {
    let closes: Vec<(&str, &str)> = after_open
        .char_indices()
        .filter_map(|(index, _)| {
            let inner = after_open.get(..index)?;
            let tail = after_open.get(index..)?.strip_prefix("]]")?;
            Some((inner, tail))
        })
        .collect();
    closes
        .iter()
        .find(|(_, tail)| tail.is_empty() || tail.starts_with(char::is_whitespace))
        .or_else(|| closes.first())
        .copied()
}

/// Decodes an optional list field; an absent field is an empty list.
#[must_use]
pub fn decode_optional(input: Option<&str>) -> Vec<String> {
    input.map(decode).unwrap_or_default()
}

/// Encodes ordered titles into a list field.
#[must_use]
pub fn encode<I, S>(titles: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    titles
        .into_iter()
        .map(|title| quote(title.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quotes a single title for inclusion in a list field.
///
/// Titles containing whitespace or starting with `[[` are bracketed.
#[must_use]
pub fn quote(title: &str) -> String {
    if title.starts_with("[[") || title.chars().any(char::is_whitespace) {
        format!("[[{title}]]")
    } else {
        title.to_owned()
    }
}
