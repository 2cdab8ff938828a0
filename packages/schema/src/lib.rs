//! # formsync schema
//!
//! Everything the editor needs from a schema without interpreting it:
//! loading (with an explicit, injectable cache), validation through the
//! [`Validator`] seam, the field tree used to seed defaults, and the persisted
//! choice of which schema to use.

pub mod cache;
pub mod document;
pub mod error;
pub mod fields;
pub mod loader;
pub mod provider;
pub mod settings;
pub mod validation;

pub use cache::SchemaCache;
pub use document::SchemaDocument;
pub use error::{SchemaLoadError, SchemaResult, SettingsError};
pub use fields::{default_values, walk_field, FieldKind, FieldNode, FieldVisitor, PrimitiveType};
#[cfg(feature = "remote")]
pub use loader::HttpLoader;
pub use loader::{DefaultLoader, FileLoader, MemoryLoader, SchemaLoader};
pub use provider::SchemaProvider;
pub use settings::{
    FileSettingsStore, MemorySettingsStore, SchemaSelection, SchemaSource, SettingsStore,
};
pub use validation::{JsonSchemaValidator, Severity, ValidationError, ValidationReport, Validator};
