//! Validator seam and the JSON-Schema backed adapter

use crate::document::SchemaDocument;
use formsync_codec::{FieldPath, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// A schema violation at a path
///
/// Validators leave `line`/`column` empty; the editor fills in `line` from
/// the current text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: FieldPath,
    pub message: String,
    pub code: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl ValidationError {
    pub fn new(path: FieldPath, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code: code.into(),
            severity: Severity::Error,
            line: None,
            column: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub success: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }

    /// Success is derived: only `Error` severity fails a report
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        let success = errors.iter().all(|e| e.severity != Severity::Error);
        Self { success, errors }
    }
}

/// Checks a value tree against a schema
pub trait Validator {
    fn validate(&self, schema: &SchemaDocument, data: &Value) -> ValidationReport;
}

/// [`Validator`] backed by the `jsonschema` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for JsonSchemaValidator {
    fn validate(&self, schema: &SchemaDocument, data: &Value) -> ValidationReport {
        let validator = match jsonschema::validator_for(&schema.root) {
            Ok(validator) => validator,
            Err(err) => {
                debug!(url = %schema.url, error = %err, "Schema does not compile");
                return ValidationReport::from_errors(vec![ValidationError::new(
                    FieldPath::root(),
                    format!("Invalid schema: {}", err),
                    "schema",
                )]);
            }
        };

        let errors: Vec<ValidationError> = validator
            .iter_errors(data)
            .map(|err| {
                let schema_path = err.schema_path.to_string();
                let code = schema_path.rsplit('/').next().unwrap_or_default().to_string();
                ValidationError::new(
                    FieldPath::from_pointer(&err.instance_path.to_string()),
                    err.to_string(),
                    code,
                )
            })
            .collect();

        debug!(url = %schema.url, errors = errors.len(), "Validated");
        ValidationReport::from_errors(errors)
    }
}
