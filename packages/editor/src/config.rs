use serde::{Deserialize, Serialize};

use crate::mutations::FieldKind;

/// Editor behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Base names for keys created by `AddField`
    #[serde(default)]
    pub placeholder_keys: PlaceholderKeys,

    /// Maximum number of undo levels (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderKeys {
    #[serde(default = "default_field_key")]
    pub field: String,

    #[serde(default = "default_array_key")]
    pub array: String,

    #[serde(default = "default_section_key")]
    pub section: String,
}

fn default_undo_levels() -> usize {
    100
}

fn default_field_key() -> String {
    "new_field".to_string()
}

fn default_array_key() -> String {
    "new_array".to_string()
}

fn default_section_key() -> String {
    "new_section".to_string()
}

impl EditorConfig {
    /// Base key name for a new entry of `kind`
    pub fn placeholder_for(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Field => &self.placeholder_keys.field,
            FieldKind::Array => &self.placeholder_keys.array,
            FieldKind::Section => &self.placeholder_keys.section,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            placeholder_keys: PlaceholderKeys::default(),
            undo_levels: default_undo_levels(),
        }
    }
}

impl Default for PlaceholderKeys {
    fn default() -> Self {
        Self {
            field: default_field_key(),
            array: default_array_key(),
            section: default_section_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "placeholderKeys": { "field": "untitled" },
            "undoLevels": 5
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.placeholder_for(FieldKind::Field), "untitled");
        assert_eq!(config.placeholder_for(FieldKind::Array), "new_array");
        assert_eq!(config.undo_levels, 5);
    }

    #[test]
    fn test_default_config() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.placeholder_for(FieldKind::Section), "new_section");
        assert_eq!(config.undo_levels, 100);
    }
}
