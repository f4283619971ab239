use crate::Dialect;

/// How absent cells appear in row objects.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AbsentCells {
    /// Absent cells contribute no key at all.
    #[default]
    Omit,
    /// SQL NULL becomes `null` and zero-length cells become `""`.
    Null,
}

/// Configures encoding behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodeOptions {
    /// Selects the preset declared-type table for numeric columns.
    pub dialect: Dialect,
    /// Treatment of NULL and zero-length cells.
    pub absent: AbsentCells,
    /// Whether non-numeric cells that already parse as JSON are embedded verbatim.
    pub probe_json: bool,
    /// Deadline applied by async encoding when the caller supplies none.
    pub timeout_ms: Option<u64>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::MySql,
            absent: AbsentCells::Omit,
            probe_json: true,
            timeout_ms: None,
        }
    }
}
