//! Content-type resolution for blocks.
//!
//! A block's `type` string names the [`BlockContent`] variant its `content` holds. This
//! module maps that string onto [`ContentType`] and decodes the content as exactly that
//! variant. It never looks at the content to guess a variant.
//!
//! Resolution runs once, when a [`Block`](crate::model::Block) is deserialized. Failures are
//! local to the block: its content becomes `None` and parsing of the rest of the page goes on.

use std::{fmt, str::FromStr};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::model::BlockContent;

/// The known block content variants, named exactly as the document service names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// `TextBlockContent`: paragraphs and headings.
    Text,
    /// `SectionBlockContent`: references to child blocks.
    Section,
    /// `TodoBlockContent`: checkbox items.
    Todo,
    /// `TextItemsBlockContent`: bulleted lists, numbered lists and quotes.
    TextItems,
    /// `CalloutBlockContent`: highlighted callouts.
    Callout,
}

impl ContentType {
    /// Every known content type.
    pub const ALL: [ContentType; 5] = [
        ContentType::Text,
        ContentType::Section,
        ContentType::Todo,
        ContentType::TextItems,
        ContentType::Callout,
    ];

    /// Returns the discriminator string for this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "TextBlockContent",
            ContentType::Section => "SectionBlockContent",
            ContentType::Todo => "TodoBlockContent",
            ContentType::TextItems => "TextItemsBlockContent",
            ContentType::Callout => "CalloutBlockContent",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ResolveError;

    /// Parses a discriminator. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|content_type| content_type.as_str() == s)
            .ok_or_else(|| ResolveError::UnknownType(s.to_string()))
    }
}

/// Why a block's content could not be resolved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The block's `type` is not a known content type.
    #[error("unknown block content type `{0}`")]
    UnknownType(String),
    /// The content could not be read as the variant its `type` names.
    #[error("content is not a valid {content_type}: {reason}")]
    Malformed {
        content_type: ContentType,
        reason: String,
    },
}

/// Decodes `content` as the variant named by `block_type`.
///
/// # Errors
///
/// Returns [`ResolveError::UnknownType`] if `block_type` is not a known content type, or
/// [`ResolveError::Malformed`] if `content` does not fit the named variant.
///
/// # Example
///
/// ```ignore
/// use pagegate_core::content::resolve;
/// use serde_json::json;
///
/// let content = resolve("TodoBlockContent", json!({ "checked": false }))?;
/// ```
pub fn resolve(block_type: &str, content: Value) -> Result<BlockContent, ResolveError> {
    let content_type: ContentType = block_type.parse()?;

    Ok(match content_type {
        ContentType::Text => BlockContent::Text(decode(content_type, content)?),
        ContentType::Section => BlockContent::Section(decode(content_type, content)?),
        ContentType::Todo => BlockContent::Todo(decode(content_type, content)?),
        ContentType::TextItems => BlockContent::TextItems(decode(content_type, content)?),
        ContentType::Callout => BlockContent::Callout(decode(content_type, content)?),
    })
}

/// Resolves a block's content, turning failure into an unresolved (`None`) content.
pub(crate) fn resolve_block_local(
    block_id: &str,
    block_type: &str,
    content: Value,
) -> Option<BlockContent> {
    match resolve(block_type, content) {
        Ok(content) => Some(content),
        Err(err) => {
            tracing::debug!(block_id, block_type, error = %err, "block content left unresolved");
            None
        }
    }
}

fn decode<T: DeserializeOwned>(content_type: ContentType, content: Value) -> Result<T, ResolveError> {
    serde_json::from_value(content).map_err(|e| ResolveError::Malformed {
        content_type,
        reason: e.to_string(),
    })
}

impl BlockContent {
    /// Returns the content type of this variant.
    pub fn content_type(&self) -> ContentType {
        match self {
            BlockContent::Text(_) => ContentType::Text,
            BlockContent::Section(_) => ContentType::Section,
            BlockContent::Todo(_) => ContentType::Todo,
            BlockContent::TextItems(_) => ContentType::TextItems,
            BlockContent::Callout(_) => ContentType::Callout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_known_type_resolves_to_itself() {
        // `{}` fits every variant except todo, which needs `checked`
        for content_type in ContentType::ALL {
            let content = match content_type {
                ContentType::Todo => json!({ "checked": false }),
                _ => json!({}),
            };

            let resolved = resolve(content_type.as_str(), content).unwrap();
            assert_eq!(resolved.content_type(), content_type);
        }
    }

    #[test]
    fn type_wins_over_content_shape() {
        // looks like a section, but the type says text list
        let resolved = resolve("TextItemsBlockContent", json!({ "blocks": ["a", "b"] })).unwrap();
        assert_eq!(resolved, BlockContent::TextItems(Default::default()));
    }

    #[test]
    fn unknown_and_differently_cased_types_fail() {
        assert_eq!(
            resolve("ImageBlockContent", json!({})),
            Err(ResolveError::UnknownType("ImageBlockContent".into()))
        );
        assert!(matches!(
            resolve("todoblockcontent", json!({ "checked": true })),
            Err(ResolveError::UnknownType(_))
        ));
        assert!(matches!(resolve("", json!({})), Err(ResolveError::UnknownType(_))));
    }

    #[test]
    fn malformed_content_names_the_variant() {
        let err = resolve("TextBlockContent", json!({ "level": "two" })).unwrap_err();
        match err {
            ResolveError::Malformed { content_type, .. } => assert_eq!(content_type, ContentType::Text),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(resolve("SectionBlockContent", json!("not an object")).is_err());
    }

    #[test]
    fn round_trips_through_display() {
        for content_type in ContentType::ALL {
            assert_eq!(content_type.to_string().parse::<ContentType>(), Ok(content_type));
        }
    }
}
