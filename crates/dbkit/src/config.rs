//! DDL rendering options.

/// How generated timestamp columns store "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// `INT UNSIGNED` columns maintained with `UNIX_TIMESTAMP()`.
    #[default]
    Unix,
    /// `TIMESTAMP` columns maintained with `CURRENT_TIMESTAMP`.
    DateTime,
}

impl TimestampFormat {
    /// Column type used for the generated timestamp columns.
    pub fn column_type(self) -> &'static str {
        match self {
            TimestampFormat::Unix => "INT UNSIGNED NOT NULL",
            TimestampFormat::DateTime => "TIMESTAMP NOT NULL",
        }
    }

    /// Expression assigned by the maintenance triggers.
    pub fn now_expression(self) -> &'static str {
        match self {
            TimestampFormat::Unix => "UNIX_TIMESTAMP()",
            TimestampFormat::DateTime => "CURRENT_TIMESTAMP",
        }
    }
}

pub const DEFAULT_COLLATION: &str = "utf8_unicode_ci";

/// Options for `CREATE TABLE` rendering.
///
/// By default only the collation is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Rendered as `COLLATE '<collation>'`.
    pub collation: String,
    /// Rendered as `DEFAULT CHARSET=<charset>` when set.
    pub charset: Option<String>,
    /// Rendered as `ENGINE=<engine>` when set.
    pub engine: Option<String>,
    /// Format used by `TableBuilder::timestamps()`.
    pub timestamp_format: TimestampFormat,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            collation: DEFAULT_COLLATION.to_string(),
            charset: None,
            engine: None,
            timestamp_format: TimestampFormat::default(),
        }
    }
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = collation.into();
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    /// Set the format `timestamps()` falls back to.
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Trailing table options, e.g. ` ENGINE=InnoDB COLLATE 'utf8_unicode_ci'`.
    pub(crate) fn render_suffix(&self) -> String {
        let mut out = String::new();
        if let Some(engine) = &self.engine {
            out.push_str(" ENGINE=");
            out.push_str(engine);
        }
        if let Some(charset) = &self.charset {
            out.push_str(" DEFAULT CHARSET=");
            out.push_str(charset);
        }
        out.push_str(" COLLATE '");
        out.push_str(&self.collation);
        out.push('\'');
        out
    }
}
