/// Raw value of one column within one row.
///
/// Cells carry the driver's textual wire encoding untouched; the encoder
/// only asks whether a cell is absent, already JSON, or needs quoting.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    /// SQL NULL.
    #[default]
    Null,
    /// Raw bytes as delivered by the driver. May be zero-length.
    Bytes(Vec<u8>),
}

impl Cell {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Bytes(value.into().into_bytes())
    }

    /// Absent cells (NULL or zero-length) are omitted from row objects.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bytes(bytes) => bytes.is_empty(),
        }
    }

    /// Returns the raw bytes, or `None` for SQL NULL.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Null => None,
            Self::Bytes(bytes) => Some(bytes),
        }
    }
}

impl From<Option<Vec<u8>>> for Cell {
    fn from(value: Option<Vec<u8>>) -> Self {
        value.map_or(Self::Null, Self::Bytes)
    }
}

impl From<Vec<u8>> for Cell {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Cell {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::text(value.to_string())
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::Cell;

    #[test]
    fn helper_constructors() {
        assert_eq!(Cell::null(), Cell::Null);
        assert_eq!(Cell::text("abc"), Cell::Bytes(b"abc".to_vec()));
        assert_eq!(Cell::from(7i64), Cell::Bytes(b"7".to_vec()));
        assert_eq!(Cell::from(1.25), Cell::Bytes(b"1.25".to_vec()));
        assert_eq!(Cell::from(None::<Vec<u8>>), Cell::Null);
    }

    #[test]
    fn null_and_empty_are_absent() {
        assert!(Cell::Null.is_absent());
        assert!(Cell::text("").is_absent());
        assert!(!Cell::text(" ").is_absent());
        assert_eq!(Cell::Null.as_bytes(), None);
        assert_eq!(Cell::text("").as_bytes(), Some(&b""[..]));
    }
}
