//! SQL fragments paired with their bound parameters.
//!
//! A [`Statement`] is either a trusted [`Raw`] fragment supplied by the caller or
//! a fragment computed by a builder: a quoted column reference (never
//! parameterized) or a single `?` placeholder bound to a [`Value`].

use crate::value::Value;

/// A caller-supplied SQL fragment emitted verbatim.
///
/// The text is **not** quoted or escaped. Bindings are appended to the parameter
/// list in order, so the text should contain exactly one `?` per binding.
///
/// # Example
/// ```
/// use dbkit::Raw;
///
/// let raw = Raw::with_bindings("CONCAT(?, ' ', ?)", ["John", "Doe"]);
/// assert_eq!(raw.value(), "CONCAT(?, ' ', ?)");
/// assert_eq!(raw.bindings().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    value: String,
    bindings: Vec<Value>,
}

impl Raw {
    /// Create a raw fragment without bindings.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            bindings: Vec::new(),
        }
    }

    /// Create a raw fragment with positional bindings.
    pub fn with_bindings<V>(value: impl Into<String>, bindings: impl IntoIterator<Item = V>) -> Self
    where
        V: Into<Value>,
    {
        Self {
            value: value.into(),
            bindings: bindings.into_iter().map(Into::into).collect(),
        }
    }

    /// The SQL text, emitted verbatim.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Values for the `?` placeholders in [`value`](Self::value), in order.
    pub fn bindings(&self) -> &[Value] {
        &self.bindings
    }
}

/// A rendered fragment and its ordered bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Trusted caller-supplied fragment.
    Raw(Raw),
    /// Quoted (and usually table-prefixed) identifier.
    Column(String),
    /// A single `?` placeholder.
    Param(Value),
}

impl Statement {
    /// The SQL text of this fragment.
    pub fn text(&self) -> &str {
        match self {
            Statement::Raw(raw) => raw.value(),
            Statement::Column(text) => text,
            Statement::Param(_) => "?",
        }
    }

    /// The values bound by this fragment, in placeholder order.
    pub fn bindings(&self) -> &[Value] {
        match self {
            Statement::Raw(raw) => raw.bindings(),
            Statement::Column(_) => &[],
            Statement::Param(value) => std::slice::from_ref(value),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Statement::Raw(_))
    }
}

impl From<Raw> for Statement {
    fn from(raw: Raw) -> Self {
        Statement::Raw(raw)
    }
}

/// Builder input naming a column (or any other identifier position).
///
/// Plain names are quoted and table-prefixed; [`Raw`] passes through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Name(String),
    Raw(Raw),
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::Name(name.to_string())
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::Name(name)
    }
}

impl From<&String> for Field {
    fn from(name: &String) -> Self {
        Field::Name(name.clone())
    }
}

impl From<Raw> for Field {
    fn from(raw: Raw) -> Self {
        Field::Raw(raw)
    }
}

/// Builder input in value position.
///
/// Plain values become a bound `?`; [`Raw`] passes through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Raw(Raw),
}

impl From<Raw> for Operand {
    fn from(raw: Raw) -> Self {
        Operand::Raw(raw)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        Operand::Value(value.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        Operand::Value(value.into())
    }
}

macro_rules! impl_operand_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_operand_from_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    &str,
    String,
    &String,
    Vec<u8>,
    serde_json::Value,
    chrono::NaiveDateTime,
    uuid::Uuid,
);
