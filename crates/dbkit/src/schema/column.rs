use std::fmt;

use super::ident::{quote, validate_identifier};
use crate::error::{DbiError, DbiResult};
use crate::statement::Raw;

/// A column `DEFAULT` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    /// Emitted unescaped inside parentheses: `DEFAULT (JSON_ARRAY())`.
    Expression(String),
    /// Single-quoted with embedded quotes doubled.
    Text(String),
    /// `DEFAULT NULL`.
    Null,
    /// Emitted unquoted, e.g. numeric or boolean literals.
    Literal(String),
}

impl ColumnDefault {
    fn to_sql(&self) -> String {
        match self {
            ColumnDefault::Expression(expr) => format!("DEFAULT ({expr})"),
            ColumnDefault::Text(text) => format!("DEFAULT '{}'", text.replace('\'', "''")),
            ColumnDefault::Null => "DEFAULT NULL".to_string(),
            ColumnDefault::Literal(lit) => format!("DEFAULT {lit}"),
        }
    }
}

impl From<Raw> for ColumnDefault {
    fn from(raw: Raw) -> Self {
        ColumnDefault::Expression(raw.value().to_string())
    }
}

impl From<&str> for ColumnDefault {
    fn from(v: &str) -> Self {
        ColumnDefault::Text(v.to_string())
    }
}

impl From<String> for ColumnDefault {
    fn from(v: String) -> Self {
        ColumnDefault::Text(v)
    }
}

impl From<bool> for ColumnDefault {
    fn from(v: bool) -> Self {
        ColumnDefault::Literal(String::from(if v { "1" } else { "0" }))
    }
}

impl<T: Into<ColumnDefault>> From<Option<T>> for ColumnDefault {
    fn from(v: Option<T>) -> Self {
        v.map_or(ColumnDefault::Null, Into::into)
    }
}

macro_rules! impl_literal_default {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ColumnDefault {
                fn from(v: $t) -> Self {
                    ColumnDefault::Literal(v.to_string())
                }
            }
        )*
    };
}

impl_literal_default!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// One column of a `CREATE TABLE`, `ADD` or `CHANGE` fragment.
///
/// Renders as:
///
/// ```text
/// `name` [`new_name`] TYPE[(length)] NULL|NOT NULL [DEFAULT ..] [AUTO_INCREMENT] [PRIMARY KEY]
/// ```
///
/// The `` `new_name` `` part is only present for columns created in alter mode
/// (and repeats `name` unless [`rename`](Self::rename) was called). Columns are
/// `NOT NULL` unless [`null`](Self::null) is called.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    is_alter: bool,
    name: String,
    new_name: Option<String>,
    column_type: String,
    length: Option<String>,
    generate: Option<String>,
    nullable: bool,
    default: Option<ColumnDefault>,
    auto_increment: bool,
    primary_key: bool,
}

impl ColumnDefinition {
    /// Column for `CREATE TABLE` or `ADD`.
    pub fn new(name: &str) -> DbiResult<Self> {
        Self::with_mode(name, false)
    }

    /// Column for `CHANGE`: renders both the old and new name.
    pub fn alter(name: &str) -> DbiResult<Self> {
        Self::with_mode(name, true)
    }

    fn with_mode(name: &str, is_alter: bool) -> DbiResult<Self> {
        let name = validate_identifier(name)?.to_string();
        Ok(Self {
            is_alter,
            name,
            new_name: None,
            column_type: String::new(),
            length: None,
            generate: None,
            nullable: false,
            default: None,
            auto_increment: false,
            primary_key: false,
        })
    }

    /// Set the SQL type. Rendered uppercased.
    pub fn column_type(&mut self, column_type: &str) -> DbiResult<&mut Self> {
        if column_type.is_empty() {
            return Err(DbiError::EmptyColumnType {
                column: self.name.clone(),
            });
        }
        self.column_type = column_type.to_string();
        Ok(self)
    }

    /// Rename the column and set its type in one call (alter mode).
    pub fn rename(
        &mut self,
        new_name: &str,
        column_type: &str,
        length: Option<u32>,
    ) -> DbiResult<&mut Self> {
        let new_name = validate_identifier(new_name)?.to_string();
        if column_type.is_empty() {
            return Err(DbiError::EmptyColumnType { column: new_name });
        }
        self.new_name = Some(new_name);
        self.column_type = column_type.to_string();
        if let Some(length) = length.filter(|l| *l > 0) {
            self.length = Some(length.to_string());
        }
        Ok(self)
    }

    /// Type length or precision, e.g. `255` or `"10,2"`.
    pub fn length(&mut self, length: impl fmt::Display) -> &mut Self {
        self.length = Some(length.to_string());
        self
    }

    pub fn primary_key(&mut self, auto_increment: bool) -> &mut Self {
        self.auto_increment = auto_increment;
        self.primary_key = true;
        self
    }

    pub fn auto_increment(&mut self) -> &mut Self {
        self.auto_increment = true;
        self
    }

    pub fn null(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    pub fn not_null(&mut self) -> &mut Self {
        self.nullable = false;
        self
    }

    /// Set the default value.
    ///
    /// Pass a [`Raw`] for expressions such as `JSON_ARRAY()`; strings are
    /// quoted, numbers and booleans are emitted as-is, `None` is `NULL`.
    pub fn default(&mut self, value: impl Into<ColumnDefault>) -> &mut Self {
        self.default = Some(value.into());
        self
    }

    /// Make this a generated column: `GENERATED ALWAYS as (expr)`.
    ///
    /// Nullability, default and key clauses are not rendered for generated
    /// columns.
    pub fn generate(&mut self, expression: impl Into<String>) -> &mut Self {
        let expression = expression.into();
        self.generate = if expression.is_empty() {
            None
        } else {
            Some(expression)
        };
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_alter(&self) -> bool {
        self.is_alter
    }

    pub fn to_sql(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(6);

        let mut head = quote(&self.name);
        if self.is_alter {
            head.push(' ');
            head.push_str(&quote(self.new_name.as_deref().unwrap_or(&self.name)));
        }
        parts.push(head);

        if !self.column_type.is_empty() {
            let mut ty = self.column_type.to_uppercase();
            if let Some(length) = &self.length {
                ty.push('(');
                ty.push_str(length);
                ty.push(')');
            }
            parts.push(ty);
        }

        if let Some(expr) = &self.generate {
            parts.push(format!("GENERATED ALWAYS as ({expr})"));
            return parts.join(" ");
        }

        parts.push(String::from(if self.nullable { "NULL" } else { "NOT NULL" }));

        if let Some(default) = &self.default {
            parts.push(default.to_sql());
        }
        if self.auto_increment {
            parts.push("AUTO_INCREMENT".to_string());
        }
        if self.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }

        parts.join(" ")
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
