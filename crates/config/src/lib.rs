//! Configuration for the kanri widget engine.
//!
//! This crate covers everything a deployment configures or persists:
//!
//! - [`fields`]: the explicit field-name mapping onto host tables
//! - [`schema`]: the host document schema the resolver reads choices from
//! - [`taxonomy`]: column taxonomy and type-list resolution
//! - [`config`]: the widget options payload
//! - [`persistence`]: the client-local session store
//! - [`error`]: configuration error types
//!
//! # Examples
//!
//! Resolving a taxonomy from defaults and persisting a session entry:
//!
//! ```
//! use kanri_config::{FieldMap, GroupDimension, WidgetConfig, resolve_taxonomy};
//!
//! let config = WidgetConfig::new(FieldMap::named("Tasks"));
//! let taxonomy = resolve_taxonomy(GroupDimension::Status, None, &config);
//! assert!(taxonomy.get("In Progress").is_some());
//! ```

pub mod config;
pub mod error;
pub mod fields;
pub mod persistence;
pub mod schema;
pub mod taxonomy;

// Re-export primary types at crate root for convenience
pub use config::WidgetConfig;
pub use error::{ConfigError, Result};
pub use fields::FieldMap;
pub use persistence::{COLLAPSED_KEY, FILTERS_KEY, GROUP_BY_KEY, SessionStore};
pub use schema::{ChoiceOptions, ColumnSchema, Schema, TableSchema};
pub use taxonomy::{
    Column, ColumnSpec, DEFAULT_PALETTE, DEFAULT_TYPES, GroupDimension, Taxonomy, resolve_taxonomy,
    resolve_types,
};
