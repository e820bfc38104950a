use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Attribute keys used by the bundled genealogy data.
pub mod attrs {
    pub const GENERATION: &str = "đời";
    pub const ROLE: &str = "vai_tro";
    pub const REAL_NAME: &str = "ten_that";
    /// `;`-separated list of titles held during a lifetime.
    pub const TITLES: &str = "chuc_vu";
    pub const BIRTH: &str = "nam_sinh";
    pub const DEATH: &str = "nam_mat";
    pub const ANNIVERSARY: &str = "ngay_ky";
    pub const ROLE_SECONDARY: &str = "vai_tro_1";
    pub const SPOUSE: &str = "hon_the";
    pub const SPOUSE_SECONDARY: &str = "hon_the_1";
    pub const BIRTH_SECONDARY: &str = "nam_sinh_1";
    pub const DEATH_SECONDARY: &str = "nam_mat_1";
    pub const ANNIVERSARY_SECONDARY: &str = "ngay_ky_1";
    pub const SPOUSE_LATER: &str = "hon_tu";
}

/// Label shown by the placeholder tree when a search matches nothing.
pub const NOT_FOUND_LABEL: &str = "Không tìm thấy nhánh phù hợp";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("tree data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tree root has an empty name")]
    EmptyRoot,
}

/// One person in the genealogy together with their descendants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "string_map"
    )]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Entity>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Entity>) -> Self {
        self.children = children;
        self
    }

    /// Parse the bundled JSON document.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let root: Entity = serde_json::from_str(text)?;
        if root.name.trim().is_empty() {
            return Err(LoadError::EmptyRoot);
        }
        tracing::debug!(nodes = root.count(), "tree data loaded");
        Ok(root)
    }

    /// Single-node tree displayed when a search finds nothing.
    pub fn not_found() -> Self {
        Self::new(NOT_FOUND_LABEL)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Generation number, when present and numeric.
    pub fn generation(&self) -> Option<u32> {
        self.attr(attrs::GENERATION)?.parse().ok()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of entities in this subtree, self included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Entity::count).sum::<usize>()
    }

    /// Depth of the subtree; a single node has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Entity::depth).max().unwrap_or(0)
    }

    /// Pre-order walk over every entity in the subtree.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Entity)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }
}

// Source data stores years as either strings or bare numbers.
fn string_map<'de, D>(de: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(de)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| {
            let s = match v {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((k, s))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_as_strings() {
        let e = Entity::from_json(
            r#"{"name":"Trịnh Bá A","attributes":{"đời":3,"nam_sinh":"1901","ghi_chu":null},
               "children":[{"name":"B"}]}"#,
        )
        .unwrap();
        assert_eq!(e.generation(), Some(3));
        assert_eq!(e.attr(attrs::BIRTH), Some("1901"));
        assert!(!e.attributes.contains_key("ghi_chu"));
        assert_eq!(e.count(), 2);
        assert_eq!(e.depth(), 2);
    }

    #[test]
    fn missing_attributes_and_children_default() {
        let e = Entity::from_json(r#"{"name":"Solo"}"#).unwrap();
        assert!(e.attributes.is_empty());
        assert!(e.is_leaf());
        assert_eq!(e.generation(), None);
    }

    #[test]
    fn rejects_blank_root() {
        assert!(matches!(
            Entity::from_json(r#"{"name":"  "}"#),
            Err(LoadError::EmptyRoot)
        ));
        assert!(matches!(Entity::from_json("{"), Err(LoadError::Json(_))));
    }

    #[test]
    fn blank_attribute_is_absent() {
        let e = Entity::new("x").with_attr(attrs::ROLE, "   ");
        assert_eq!(e.attr(attrs::ROLE), None);
    }
}
