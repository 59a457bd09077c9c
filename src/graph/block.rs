//! Block tree nodes

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Structured reference to a page or block as it appears in block metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PageHandle {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
}

impl PageHandle {
    fn is_empty(&self) -> bool {
        self.id.is_none() && self.uuid.is_none() && self.name.is_none()
    }
}

/// A block's `parent` or `page` field.
///
/// The API sends these as a bare string, a number, or an object carrying some
/// mix of `id`, `uuid` and `name`. They are normalized once, at decode time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BlockLink {
    #[default]
    None,
    ById(String),
    ByReference(PageHandle),
}

impl BlockLink {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) if !s.trim().is_empty() => Self::ById(s.trim().to_string()),
            Value::Number(n) => Self::ById(n.to_string()),
            Value::Object(map) => {
                let text = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                };
                let handle = PageHandle {
                    id: map.get("id").and_then(Value::as_i64),
                    uuid: text("uuid"),
                    name: text("originalName").or_else(|| text("name")),
                };
                if handle.is_empty() {
                    Self::None
                } else {
                    Self::ByReference(handle)
                }
            }
            _ => Self::None,
        }
    }

    /// Best identifier to address the linked entity through the API.
    pub fn identifier(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::ById(id) => Some(id.clone()),
            Self::ByReference(handle) => handle
                .uuid
                .clone()
                .or_else(|| handle.name.clone())
                .or_else(|| handle.id.map(|id| id.to_string())),
        }
    }
}

/// One node of a page's content tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub uuid: Option<String>,
    /// Raw block text; empty or absent content is skipped by every text pass
    pub content: Option<String>,
    pub children: Vec<Block>,
    pub parent: BlockLink,
    pub page: BlockLink,
}

impl Block {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// A block with no content of its own, only children.
    pub fn container(children: Vec<Block>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    /// Content if it carries any non-whitespace text.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    uuid: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    children: Option<Vec<RawChild>>,
    #[serde(default)]
    parent: Option<Value>,
    #[serde(default)]
    page: Option<Value>,
}

/// Collapsed children arrive as `["uuid", "..."]` stubs rather than blocks.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawChild {
    Stub(Vec<Value>),
    Block(Block),
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawBlock::deserialize(deserializer)?;
        let children = raw
            .children
            .unwrap_or_default()
            .into_iter()
            .filter_map(|child| match child {
                RawChild::Block(block) => Some(block),
                RawChild::Stub(_) => None,
            })
            .collect();
        Ok(Block {
            uuid: raw.uuid,
            content: raw.content,
            children,
            parent: raw.parent.as_ref().map(BlockLink::from_value).unwrap_or_default(),
            page: raw.page.as_ref().map(BlockLink::from_value).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn link_shapes_normalize_to_one_variant() {
        assert_eq!(BlockLink::from_value(&json!(null)), BlockLink::None);
        assert_eq!(BlockLink::from_value(&json!("")), BlockLink::None);
        assert_eq!(
            BlockLink::from_value(&json!("abc")),
            BlockLink::ById("abc".to_string())
        );
        assert_eq!(BlockLink::from_value(&json!(42)), BlockLink::ById("42".to_string()));
        assert_eq!(BlockLink::from_value(&json!({})), BlockLink::None);

        let link = BlockLink::from_value(&json!({ "id": 7, "uuid": "u-1" }));
        assert_eq!(
            link,
            BlockLink::ByReference(PageHandle {
                id: Some(7),
                uuid: Some("u-1".to_string()),
                name: None,
            })
        );
        assert_eq!(link.identifier().as_deref(), Some("u-1"));

        let by_id = BlockLink::from_value(&json!({ "id": 7 }));
        assert_eq!(by_id.identifier().as_deref(), Some("7"));
    }

    #[test]
    fn text_ignores_whitespace_only_content() {
        assert_eq!(Block::new("  ").text(), None);
        assert_eq!(Block::container(vec![]).text(), None);
        assert_eq!(Block::new("hello").text(), Some("hello"));
    }
}
