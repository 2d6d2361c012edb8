//! Identifier validation, quoting and constraint naming.

use std::sync::OnceLock;

use crate::error::{DbiError, DbiResult};

/// Returns `true` if `name` matches `^[a-zA-Z_][a-zA-Z0-9_]*$`.
pub fn is_valid_identifier(name: &str) -> bool {
    static IDENT_RE: OnceLock<regex::Regex> = OnceLock::new();
    IDENT_RE
        .get_or_init(|| {
            regex::Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$")
                .expect("invalid built-in identifier regex")
        })
        .is_match(name)
}

/// Validate a column name, returning it on success.
pub fn validate_identifier(name: &str) -> DbiResult<&str> {
    if is_valid_identifier(name) {
        Ok(name)
    } else {
        Err(DbiError::invalid_identifier(name))
    }
}

/// Wrap a single token in backticks.
///
/// Embedded backticks are not escaped: tokens are trusted identifiers.
pub fn quote(token: &str) -> String {
    let mut out = String::with_capacity(token.len() + 2);
    out.push('`');
    out.push_str(token);
    out.push('`');
    out
}

/// Quote each name and join with `, `.
pub(crate) fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A constraint identifier: a derived default plus an optional override.
///
/// The default never changes after construction, so dropping a constraint by
/// its default name always matches the name it was added under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintName {
    default: String,
    custom: Option<String>,
}

impl ConstraintName {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            custom: None,
        }
    }

    /// Override the derived name. An empty override is ignored.
    pub fn set(&mut self, custom: impl Into<String>) {
        let custom = custom.into();
        self.custom = if custom.is_empty() { None } else { Some(custom) };
    }

    pub fn as_str(&self) -> &str {
        self.custom.as_deref().unwrap_or(&self.default)
    }

    /// Replace the derived name, keeping any override.
    pub(crate) fn set_default(&mut self, default: impl Into<String>) {
        self.default = default.into();
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    pub fn is_custom(&self) -> bool {
        self.custom.is_some()
    }
}

/// Convert an input into an ordered list of column names.
///
/// Lets single-column and composite constraints share one entry point.
pub trait IntoColumns {
    fn into_columns(self) -> Vec<String>;
}

impl IntoColumns for &str {
    fn into_columns(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoColumns for String {
    fn into_columns(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoColumns for &String {
    fn into_columns(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoColumns for Vec<&str> {
    fn into_columns(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoColumns for Vec<String> {
    fn into_columns(self) -> Vec<String> {
        self
    }
}

impl IntoColumns for &[&str] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> IntoColumns for [&str; N] {
    fn into_columns(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

/// Reject empty column lists and empty names.
pub(crate) fn require_columns(
    definition: &'static str,
    columns: Vec<String>,
) -> DbiResult<Vec<String>> {
    if columns.is_empty() || columns.iter().any(String::is_empty) {
        return Err(DbiError::missing_field(definition, "column"));
    }
    Ok(columns)
}

/// Reject an empty required field.
pub(crate) fn require(
    definition: &'static str,
    field: &'static str,
    value: impl Into<String>,
) -> DbiResult<String> {
    let value = value.into();
    if value.is_empty() {
        return Err(DbiError::missing_field(definition, field));
    }
    Ok(value)
}
