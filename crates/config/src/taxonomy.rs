//! Column taxonomy resolution.
//!
//! The board partitions tasks into columns along one grouping dimension at a
//! time. The status dimension's taxonomy comes from (in precedence order) a
//! user-edited JSON override, the host schema's choice list, or built-in
//! defaults; the priority dimension is always the fixed three-value scale.
//! Resolution is a pure function of its inputs and re-runs whenever the
//! schema, the dimension, or the configuration changes.

use serde::{Deserialize, Serialize};
use tracing::warn;

use kanri_protocol::Priority;

use crate::config::WidgetConfig;
use crate::schema::Schema;

/// The field used to partition tasks into columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupDimension {
    /// Group by the status field (the default board).
    #[default]
    Status,
    /// Group by the priority field (the focus board).
    Priority,
}

/// Deterministic palette cycled over choice positions that have no explicit
/// color.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#7c2d12", "#ef4444", "#3b82f6", "#f59e0b", "#10b981", "#8b5cf6",
];

/// Labels of the built-in default status taxonomy, in order.
const DEFAULT_STATUS_LABELS: [&str; 6] = [
    "Not Started",
    "To Do",
    "In Progress",
    "Waiting",
    "Done",
    "Dropped",
];

/// Built-in type list used when the schema exposes no choice list for the
/// type column.
pub const DEFAULT_TYPES: [&str; 7] = [
    "Build",
    "Meeting",
    "Presentation",
    "Training",
    "Research",
    "Outreach",
    "Review",
];

/// One column of the board: a status or priority value with its display
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// The stored field value this column collects.
    pub id: String,
    /// Display label (equal to `id` for every current source).
    pub label: String,
    /// Display color (hex).
    pub color: String,
    /// 1-based sort order.
    pub order: u32,
    /// Whether this column represents finished/closed work.
    pub terminal: bool,
    /// Whether entering this column triggers a celebration.
    pub celebrate: bool,
}

/// The ordered set of columns for the active grouping dimension, plus the
/// fallback column for tasks whose field value is absent or unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    columns: Vec<Column>,
    fallback: String,
}

impl Taxonomy {
    /// Builds a taxonomy from columns, sorting by `order`.
    ///
    /// `fallback` names the column absent/unrecognized values map to; when
    /// it does not match any column, the first column is used instead.
    #[must_use]
    pub fn new(mut columns: Vec<Column>, fallback: impl Into<String>) -> Self {
        columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.label.cmp(&b.label)));
        let fallback = fallback.into();
        let fallback = if columns.iter().any(|c| c.id == fallback) {
            fallback
        } else {
            columns.first().map(|c| c.id.clone()).unwrap_or_default()
        };
        Self { columns, fallback }
    }

    /// The columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by its stored value.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// The column id that absent or unrecognized values map to.
    ///
    /// Every visible task maps to exactly one column through this fallback,
    /// so the taxonomy always partitions the task set.
    #[must_use]
    pub fn fallback_id(&self) -> &str {
        &self.fallback
    }

    /// Returns `true` if `id` names a terminal column.
    #[must_use]
    pub fn is_terminal(&self, id: &str) -> bool {
        self.get(id).is_some_and(|c| c.terminal)
    }

    /// The ids of all terminal columns.
    #[must_use]
    pub fn terminal_ids(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.terminal)
            .map(|c| c.id.as_str())
            .collect()
    }

    /// The fixed priority taxonomy: High, Medium, Low.
    #[must_use]
    pub fn priority() -> Self {
        let columns = Priority::all()
            .into_iter()
            .map(|p| Column {
                id: p.label().to_string(),
                label: p.label().to_string(),
                color: p.color().to_string(),
                order: p.rank(),
                terminal: false,
                celebrate: false,
            })
            .collect();
        Self::new(columns, Priority::default().label())
    }
}

/// One entry of the user-editable columns override blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Stored value and display label.
    pub label: String,
    /// Display color; defaults to the palette cycle.
    #[serde(default)]
    pub color: Option<String>,
    /// Sort order; defaults to blob position.
    #[serde(default)]
    pub order: Option<u32>,
    /// Terminal flag.
    #[serde(default)]
    pub terminal: bool,
    /// Celebration flag.
    #[serde(default)]
    pub celebrate: bool,
}

/// Resolves the effective taxonomy for the given dimension.
///
/// For [`GroupDimension::Priority`] this is always the fixed scale. For
/// [`GroupDimension::Status`] the precedence is: well-formed user override
/// blob, then schema choice list, then built-in defaults. A malformed blob
/// is logged and skipped, never fatal.
///
/// # Examples
///
/// ```
/// use kanri_config::{FieldMap, GroupDimension, WidgetConfig, resolve_taxonomy};
///
/// let config = WidgetConfig::new(FieldMap::named("Tasks"));
/// let taxonomy = resolve_taxonomy(GroupDimension::Status, None, &config);
///
/// // No schema and no override: the built-in six-column default.
/// assert_eq!(taxonomy.columns().len(), 6);
/// assert_eq!(taxonomy.fallback_id(), "To Do");
/// assert!(taxonomy.is_terminal("Done"));
/// ```
#[must_use]
pub fn resolve_taxonomy(
    dimension: GroupDimension,
    schema: Option<&Schema>,
    config: &WidgetConfig,
) -> Taxonomy {
    match dimension {
        GroupDimension::Priority => Taxonomy::priority(),
        GroupDimension::Status => resolve_status_taxonomy(schema, config),
    }
}

fn resolve_status_taxonomy(schema: Option<&Schema>, config: &WidgetConfig) -> Taxonomy {
    if let Some(blob) = config.columns_json.as_deref()
        && let Some(taxonomy) = taxonomy_from_override(blob)
    {
        return taxonomy;
    }

    if let Some(choices) =
        schema.and_then(|s| s.choices(&config.fields.table, &config.fields.status))
    {
        let columns = choices
            .choices
            .iter()
            .enumerate()
            .map(|(i, label)| Column {
                id: label.clone(),
                label: label.clone(),
                color: choices
                    .color_at(i)
                    .unwrap_or(DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()])
                    .to_string(),
                order: i as u32 + 1,
                terminal: config.is_terminal_label(label),
                celebrate: config.is_celebrate_label(label),
            })
            .collect::<Vec<_>>();
        let fallback = columns.first().map(|c| c.id.clone()).unwrap_or_default();
        return Taxonomy::new(columns, fallback);
    }

    default_status_taxonomy(config)
}

fn taxonomy_from_override(blob: &str) -> Option<Taxonomy> {
    let specs: Vec<ColumnSpec> = match serde_json5::from_str(blob) {
        Ok(specs) => specs,
        Err(error) => {
            warn!(%error, "malformed columns override; falling back");
            return None;
        }
    };
    if specs.is_empty() {
        warn!("empty columns override; falling back");
        return None;
    }

    let columns = specs
        .into_iter()
        .enumerate()
        .map(|(i, spec)| Column {
            id: spec.label.clone(),
            label: spec.label,
            color: spec
                .color
                .unwrap_or_else(|| DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()].to_string()),
            order: spec.order.unwrap_or(i as u32 + 1),
            terminal: spec.terminal,
            celebrate: spec.celebrate,
        })
        .collect::<Vec<_>>();
    let fallback = columns.first().map(|c| c.id.clone()).unwrap_or_default();
    Some(Taxonomy::new(columns, fallback))
}

fn default_status_taxonomy(config: &WidgetConfig) -> Taxonomy {
    let columns = DEFAULT_STATUS_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| Column {
            id: (*label).to_string(),
            label: (*label).to_string(),
            color: DEFAULT_PALETTE[i % DEFAULT_PALETTE.len()].to_string(),
            order: i as u32 + 1,
            terminal: config.is_terminal_label(label),
            celebrate: config.is_celebrate_label(label),
        })
        .collect();
    Taxonomy::new(columns, "To Do")
}

/// Resolves the effective type list: the schema's choice list for the type
/// column when present, else the built-in defaults.
#[must_use]
pub fn resolve_types(schema: Option<&Schema>, config: &WidgetConfig) -> Vec<String> {
    schema
        .and_then(|s| s.choices(&config.fields.table, &config.fields.kind))
        .map(|choices| choices.choices.clone())
        .unwrap_or_else(|| DEFAULT_TYPES.iter().map(|t| (*t).to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldMap;
    use serde_json::json;

    fn config() -> WidgetConfig {
        WidgetConfig::new(FieldMap {
            status: "Status".to_string(),
            kind: "Kind".to_string(),
            ..FieldMap::named("Tasks")
        })
    }

    fn schema_with_choices() -> Schema {
        serde_json::from_value(json!({
            "tables": {
                "Tasks": {
                    "columns": [
                        {
                            "id": "Status",
                            "widgetOptions": {
                                "choices": ["Idea", "Doing", "Done"],
                                "choiceColors": ["#101010"],
                            },
                        },
                        {
                            "id": "Kind",
                            "widgetOptions": {"choices": ["Chore", "Feature"]},
                        },
                    ],
                },
            },
        }))
        .expect("schema should parse")
    }

    #[test]
    fn priority_taxonomy_is_fixed() {
        let taxonomy = resolve_taxonomy(GroupDimension::Priority, Some(&schema_with_choices()), &config());
        let labels: Vec<_> = taxonomy.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["High", "Medium", "Low"]);
        assert_eq!(taxonomy.fallback_id(), "Low");
        assert!(taxonomy.terminal_ids().is_empty());
    }

    #[test]
    fn schema_choices_build_the_status_taxonomy() {
        let taxonomy = resolve_taxonomy(GroupDimension::Status, Some(&schema_with_choices()), &config());

        let labels: Vec<_> = taxonomy.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Idea", "Doing", "Done"]);

        // Explicit color at position 0, palette cycle afterwards.
        assert_eq!(taxonomy.get("Idea").unwrap().color, "#101010");
        assert_eq!(taxonomy.get("Doing").unwrap().color, DEFAULT_PALETTE[1]);

        // Terminal/celebration flags come from the configured labels.
        assert!(taxonomy.is_terminal("Done"));
        assert!(taxonomy.get("Done").unwrap().celebrate);
        assert!(!taxonomy.is_terminal("Doing"));

        // Fallback is the first choice.
        assert_eq!(taxonomy.fallback_id(), "Idea");
    }

    #[test]
    fn no_schema_falls_back_to_defaults() {
        let taxonomy = resolve_taxonomy(GroupDimension::Status, None, &config());
        assert_eq!(taxonomy.columns().len(), 6);
        assert_eq!(taxonomy.fallback_id(), "To Do");
        assert_eq!(taxonomy.terminal_ids(), vec!["Done", "Dropped"]);
        assert!(taxonomy.get("Done").unwrap().celebrate);
        assert!(!taxonomy.get("Dropped").unwrap().celebrate);
    }

    #[test]
    fn well_formed_override_takes_precedence() {
        let mut config = config();
        config.columns_json = Some(
            r##"[
                {label: "Inbox"},
                {label: "Active", color: "#123456"},
                {label: "Shipped", terminal: true, celebrate: true},
            ]"##
            .to_string(),
        );

        let taxonomy = resolve_taxonomy(GroupDimension::Status, Some(&schema_with_choices()), &config);
        let labels: Vec<_> = taxonomy.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Inbox", "Active", "Shipped"]);
        assert_eq!(taxonomy.get("Active").unwrap().color, "#123456");
        assert!(taxonomy.is_terminal("Shipped"));
        assert_eq!(taxonomy.fallback_id(), "Inbox");
    }

    #[test]
    fn malformed_override_fails_soft() {
        let mut config = config();
        config.columns_json = Some("not valid json at all {{{".to_string());

        let taxonomy = resolve_taxonomy(GroupDimension::Status, Some(&schema_with_choices()), &config);
        // Falls through to the schema-derived taxonomy.
        assert_eq!(taxonomy.columns().len(), 3);
        assert_eq!(taxonomy.fallback_id(), "Idea");
    }

    #[test]
    fn empty_override_fails_soft() {
        let mut config = config();
        config.columns_json = Some("[]".to_string());

        let taxonomy = resolve_taxonomy(GroupDimension::Status, None, &config);
        assert_eq!(taxonomy.columns().len(), 6);
    }

    #[test]
    fn explicit_order_wins_over_position() {
        let mut config = config();
        config.columns_json =
            Some(r#"[{label: "B", order: 2}, {label: "A", order: 1}]"#.to_string());

        let taxonomy = resolve_taxonomy(GroupDimension::Status, None, &config);
        let labels: Vec<_> = taxonomy.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B"]);
        // Fallback tracked the first blob entry, which sorted second.
        assert_eq!(taxonomy.fallback_id(), "B");
    }

    #[test]
    fn resolution_is_idempotent() {
        let schema = schema_with_choices();
        let config = config();
        let first = resolve_taxonomy(GroupDimension::Status, Some(&schema), &config);
        let second = resolve_taxonomy(GroupDimension::Status, Some(&schema), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn types_from_schema_else_defaults() {
        assert_eq!(
            resolve_types(Some(&schema_with_choices()), &config()),
            vec!["Chore", "Feature"]
        );
        assert_eq!(resolve_types(None, &config()).len(), DEFAULT_TYPES.len());
    }

    #[test]
    fn group_dimension_serialization() {
        assert_eq!(
            serde_json::to_string(&GroupDimension::Priority).unwrap(),
            r#""priority""#
        );
        assert_eq!(GroupDimension::default(), GroupDimension::Status);
    }
}
