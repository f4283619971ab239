/// Column description reported by a result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Col {
    pub name: String,
    /// Declared SQL type name (`INT`, `VARCHAR(32)`, ...), when the driver reports one.
    pub decltype: Option<String>,
}

impl Col {
    /// Creates a column without a declared type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decltype: None,
        }
    }

    /// Creates a column with a declared SQL type.
    pub fn typed(name: impl Into<String>, decltype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decltype: Some(decltype.into()),
        }
    }
}

impl From<&str> for Col {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Col {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl<N: Into<String>, T: Into<String>> From<(N, T)> for Col {
    fn from((name, decltype): (N, T)) -> Self {
        Self::typed(name, decltype)
    }
}
