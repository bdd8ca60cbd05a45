//! The widget configuration.
//!
//! This is the options payload the host pushes to the widget (and which can
//! also be loaded from a file for standalone runs): the field mapping plus
//! the taxonomy knobs a deployment may tune.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fields::FieldMap;
use crate::persistence::{read_json_file, write_json_file};

fn default_terminal_labels() -> Vec<String> {
    vec!["Done".to_string(), "Dropped".to_string()]
}

fn default_celebrate_labels() -> Vec<String> {
    vec!["Done".to_string()]
}

/// Configuration for one widget instance.
///
/// # Examples
///
/// ```
/// use kanri_config::{FieldMap, WidgetConfig};
///
/// let config = WidgetConfig::new(FieldMap::named("Tasks"));
/// assert!(!config.read_only);
/// assert!(config.is_terminal_label("Done"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// The deployment's field mapping.
    pub fields: FieldMap,

    /// User-editable column taxonomy override, as a raw JSON/JSON5 blob.
    ///
    /// Kept as text because it is edited by hand inside the host; the
    /// taxonomy resolver parses it and falls back softly when malformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns_json: Option<String>,

    /// Status labels that represent finished/closed work.
    ///
    /// Marks terminal entries in schema-derived and default taxonomies;
    /// override blobs carry their own flags.
    #[serde(default = "default_terminal_labels")]
    pub terminal_labels: Vec<String>,

    /// Status labels whose columns trigger a celebration on entry.
    #[serde(default = "default_celebrate_labels")]
    pub celebrate_labels: Vec<String>,

    /// When set, the board renders without any mutation affordances.
    #[serde(default)]
    pub read_only: bool,
}

impl WidgetConfig {
    /// Creates a configuration around a field mapping with default knobs.
    #[must_use]
    pub fn new(fields: FieldMap) -> Self {
        Self {
            fields,
            columns_json: None,
            terminal_labels: default_terminal_labels(),
            celebrate_labels: default_celebrate_labels(),
            read_only: false,
        }
    }

    /// Loads a configuration from a JSON or JSON5 file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// field mapping is incomplete.
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config: Self = read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        write_json_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the field mapping's first missing entry, if any. The columns
    /// blob is deliberately not validated here: it fails soft at resolution
    /// time so a typo can never take the board down.
    pub fn validate(&self) -> Result<()> {
        self.fields.validate()
    }

    /// Returns `true` if `label` names a terminal status.
    #[must_use]
    pub fn is_terminal_label(&self, label: &str) -> bool {
        self.terminal_labels.iter().any(|l| l == label)
    }

    /// Returns `true` if entering `label` should trigger a celebration.
    #[must_use]
    pub fn is_celebrate_label(&self, label: &str) -> bool {
        self.celebrate_labels.iter().any(|l| l == label)
    }
}
