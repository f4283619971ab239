//! Declared-type lookup deciding which columns are emitted as bare JSON numbers.

use std::collections::HashMap;

/// SQL engine whose declared type names seed a [`NumericTypes`] table.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Dialect {
    #[default]
    MySql,
    Postgres,
    Sqlite,
    SqlServer,
}

const MYSQL: &[&str] = &[
    "INT",
    "TINYINT",
    "SMALLINT",
    "FLOAT",
    "DOUBLE",
    "INTEGER",
    "MEDIUMINT",
    "BIGINT",
    "DECIMAL",
    "NUMERIC",
    "BIT",
];

const POSTGRES: &[&str] = &[
    "SMALLINT",
    "INTEGER",
    "INT",
    "BIGINT",
    "INT2",
    "INT4",
    "INT8",
    "SMALLSERIAL",
    "SERIAL",
    "BIGSERIAL",
    "SERIAL2",
    "SERIAL4",
    "SERIAL8",
    "DECIMAL",
    "NUMERIC",
    "REAL",
    "FLOAT4",
    "FLOAT8",
    "DOUBLE PRECISION",
];

const SQLITE: &[&str] = &[
    "INT",
    "INTEGER",
    "TINYINT",
    "SMALLINT",
    "MEDIUMINT",
    "BIGINT",
    "UNSIGNED BIG INT",
    "INT2",
    "INT8",
    "REAL",
    "DOUBLE",
    "DOUBLE PRECISION",
    "FLOAT",
    "NUMERIC",
    "DECIMAL",
];

const SQLSERVER: &[&str] = &[
    "BIGINT",
    "INT",
    "SMALLINT",
    "TINYINT",
    "BIT",
    "DECIMAL",
    "NUMERIC",
    "MONEY",
    "SMALLMONEY",
    "FLOAT",
    "REAL",
];

impl Dialect {
    fn numeric_names(self) -> &'static [&'static str] {
        match self {
            Self::MySql => MYSQL,
            Self::Postgres => POSTGRES,
            Self::Sqlite => SQLITE,
            Self::SqlServer => SQLSERVER,
        }
    }
}

/// Mapping from declared type name to "emit unquoted".
///
/// Names are matched after normalisation: surrounding whitespace is trimmed,
/// case is ignored, a `(precision, scale)` suffix is dropped and trailing
/// `UNSIGNED`/`SIGNED`/`ZEROFILL` modifiers are stripped. Names missing from
/// the table are not numeric.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumericTypes {
    names: HashMap<String, bool>,
}

impl NumericTypes {
    /// An empty table: every declared type is treated as non-numeric.
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    /// The preset table for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> Self {
        let mut table = Self::empty();
        for name in dialect.numeric_names() {
            table.register(name);
        }
        table
    }

    /// Marks `decltype` as numeric.
    pub fn register(&mut self, decltype: &str) -> &mut Self {
        self.set(decltype, true)
    }

    /// Marks `decltype` as non-numeric, overriding any preset entry.
    pub fn unregister(&mut self, decltype: &str) -> &mut Self {
        self.set(decltype, false)
    }

    pub fn set(&mut self, decltype: &str, numeric: bool) -> &mut Self {
        self.names.insert(normalize_decltype(decltype), numeric);
        self
    }

    pub fn is_numeric(&self, decltype: &str) -> bool {
        self.names
            .get(&normalize_decltype(decltype))
            .copied()
            .unwrap_or(false)
    }
}

impl Default for NumericTypes {
    fn default() -> Self {
        Self::for_dialect(Dialect::default())
    }
}

impl From<Dialect> for NumericTypes {
    fn from(dialect: Dialect) -> Self {
        Self::for_dialect(dialect)
    }
}

/// Canonical form used for table lookups: `" decimal(10, 2) unsigned"` -> `"DECIMAL"`.
pub(crate) fn normalize_decltype(decltype: &str) -> String {
    let base = decltype
        .split_once('(')
        .map_or(decltype, |(base, _)| base);
    let mut words: Vec<&str> = base.split_whitespace().collect();
    while words.last().is_some_and(|word| {
        ["UNSIGNED", "SIGNED", "ZEROFILL"]
            .iter()
            .any(|modifier| word.eq_ignore_ascii_case(modifier))
    }) {
        words.pop();
    }
    words.join(" ").to_ascii_uppercase()
}

/// Declared types whose values are JSON documents rather than text.
pub(crate) fn is_json_decltype(decltype: &str) -> bool {
    matches!(normalize_decltype(decltype).as_str(), "JSON" | "JSONB")
}
