//! The document model exposed by the facade.
//!
//! These types are transient, request-scoped projections of what the document service
//! returns. The model is deliberately permissive: every field the upstream may omit is an
//! `Option`, and omitted fields stay omitted when a value is serialized again. Fields whose
//! shape is not fixed by this schema are carried as opaque [`Value`]s and never inspected.
//!
//! The one place the model is strict is block content. A [`Block`]'s `type` decides which
//! [`BlockContent`] variant its `content` is decoded into, once, at parse time (see
//! [`crate::content`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::content;

/// A single document: metadata, title, properties and an ordered list of content blocks.
///
/// # Example
///
/// ```ignore
/// use pagegate_core::model::Page;
///
/// let page: Page = serde_json::from_str(r#"{
///     "title": "Groceries",
///     "content": [
///         { "id": "b1", "type": "TodoBlockContent", "content": { "checked": true } }
///     ]
/// }"#)?;
///
/// assert_eq!(page.blocks().len(), 1);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The page identifier, when the document service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Timestamps, format and page-level properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    /// The page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The page's property values. Shape depends on the owning collection's schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    /// The page's blocks, in document order.
    ///
    /// A block without a non-empty string `id` and `type` is dropped; its siblings are kept.
    #[serde(
        default,
        deserialize_with = "usable_blocks",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<Vec<Block>>,
}

fn usable_blocks<'de, D>(deserializer: D) -> Result<Option<Vec<Block>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Vec<Value>>::deserialize(deserializer)? else {
        return Ok(None);
    };

    let blocks = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Block>(value) {
            Ok(block) => Some(block),
            Err(err) => {
                tracing::debug!(index, error = %err, "dropping unusable block");
                None
            }
        })
        .collect();

    Ok(Some(blocks))
}

impl Page {
    /// Returns the page's blocks in document order, or an empty slice if it has none.
    pub fn blocks(&self) -> &[Block] {
        self.content.as_deref().unwrap_or_default()
    }

    /// Looks up a block of this page by id.
    ///
    /// Useful for following the weak child references of a [`SectionBlockContent`].
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks().iter().find(|block| block.id == id)
    }
}

/// Metadata of a page or collection.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    /// Last edit time in milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_time: Option<i64>,
    /// Display format. Kept opaque; see [`Metadata::typed_format`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
}

impl Metadata {
    /// Returns the creation time as a UTC date-time.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_time.and_then(DateTime::from_timestamp_millis)
    }

    /// Returns the last edit time as a UTC date-time.
    pub fn last_edited_at(&self) -> Option<DateTime<Utc>> {
        self.last_edited_time.and_then(DateTime::from_timestamp_millis)
    }

    /// Reads the opaque `format` as a typed [`Format`].
    ///
    /// Returns `None` when there is no format or it does not have the `{ cover, font }` shape.
    pub fn typed_format(&self) -> Option<Format> {
        self.format
            .clone()
            .and_then(|format| serde_json::from_value(format).ok())
    }
}

/// The typed shape of [`Metadata::format`] used by some document service versions.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Format {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// One atomic content unit within a page.
///
/// `block_type` is the sole authority for which [`BlockContent`] variant `content` holds.
/// When the type is not a known variant, or the content cannot be read as the variant the
/// type names, `content` is `None` while `id` and `block_type` are kept as-is. This never
/// affects the block's siblings.
///
/// `id` and `type` must be non-empty strings, otherwise the block fails to decode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub id: String,
    /// The discriminator string, exactly as returned by the document service.
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,
}

impl Block {
    /// Creates a block from already-typed content. The block's type is taken from the content.
    pub fn new(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            block_type: content.content_type().as_str().to_string(),
            content: Some(content),
        }
    }

    /// Returns the content type named by this block's `type`, if it is a known one.
    pub fn content_type(&self) -> Option<content::ContentType> {
        self.block_type.parse().ok()
    }
}

/// A block exactly as the document service sends it, before its content is resolved.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    content: Option<Value>,
}

impl TryFrom<RawBlock> for Block {
    type Error = String;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        if raw.id.is_empty() {
            return Err("block `id` must not be empty".to_string());
        }
        if raw.block_type.is_empty() {
            return Err(format!("block `{}` has an empty `type`", raw.id));
        }

        let content = raw
            .content
            .and_then(|value| content::resolve_block_local(&raw.id, &raw.block_type, value));

        Ok(Block {
            id: raw.id,
            block_type: raw.block_type,
            content,
        })
    }
}

/// The content of a block, one variant per known block content type.
///
/// Serialized as the bare variant object: the variant name travels in the surrounding
/// block's `type`, not in the content itself.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum BlockContent {
    Text(TextBlockContent),
    Section(SectionBlockContent),
    Todo(TodoBlockContent),
    TextItems(TextItemsBlockContent),
    Callout(CalloutBlockContent),
}

impl BlockContent {
    /// Returns the styled text runs of this content, if the variant carries any.
    pub fn items(&self) -> Option<&[TextBlockItem]> {
        match self {
            BlockContent::Text(text) => text.items.as_deref(),
            BlockContent::Todo(todo) => todo.items.as_deref(),
            BlockContent::TextItems(list) => list.items.as_deref(),
            BlockContent::Callout(callout) => callout.items.as_deref(),
            BlockContent::Section(_) => None,
        }
    }

    /// Concatenates the `text` of every styled run, ignoring styling.
    pub fn plain_text(&self) -> String {
        self.items()
            .unwrap_or_default()
            .iter()
            .filter_map(|item| item.text.as_deref())
            .collect()
    }
}

/// A paragraph or heading.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TextBlockContent {
    /// Indent or heading level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TextBlockItem>>,
}

/// A grouping of other blocks.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SectionBlockContent {
    /// Ids of the child blocks. These are references, not owned blocks; see [`Page::block`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<String>>,
}

/// A checkbox item.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TodoBlockContent {
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TextBlockItem>>,
}

/// Bulleted list, numbered list or quote.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TextItemsBlockContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TextBlockItem>>,
}

/// A highlighted callout with its own display format.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CalloutBlockContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TextBlockItem>>,
}

/// One styled run of text.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextBlockItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_equation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TextBlockItem {
    /// Creates an unstyled run of text.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// One column of a collection's schema.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,
}

/// A set of pages sharing a schema.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Collection {
    /// The collection's schema. Kept opaque; see [`Collection::properties`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    /// The matching pages, in the order the document service returned them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,
}

impl Collection {
    /// Returns the collection's pages, or an empty slice if it has none.
    pub fn pages(&self) -> &[Page] {
        self.pages.as_deref().unwrap_or_default()
    }

    /// Reads the opaque schema as a list of typed [`Property`] columns.
    ///
    /// Accepts either an array of properties or a mapping whose values are properties
    /// (in key order). Returns `None` if there is no schema or any column fails to decode.
    pub fn properties(&self) -> Option<Vec<Property>> {
        let columns: Vec<&Value> = match self.schema.as_ref()? {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            _ => return None,
        };

        columns
            .into_iter()
            .map(|column| serde_json::from_value(column.clone()))
            .collect::<Result<Vec<Property>, _>>()
            .ok()
    }
}
