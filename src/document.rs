use std::{fmt, ops::Deref, str::Utf8Error, sync::Arc};

/// A complete JSON array of row objects.
///
/// Immutable once built; clones share the same bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedDocument(Arc<[u8]>);

impl EncodedDocument {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Views the document as text.
    ///
    /// Fails only when a cell carried bytes that are not UTF-8.
    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.0)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl Deref for EncodedDocument {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for EncodedDocument {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EncodedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EncodedDocument")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl fmt::Display for EncodedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl From<EncodedDocument> for Vec<u8> {
    fn from(document: EncodedDocument) -> Self {
        document.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::EncodedDocument;

    #[test]
    fn clones_share_bytes() {
        let doc = EncodedDocument::new(br#"[{"a":1}]"#.to_vec());
        let copy = doc.clone();
        assert_eq!(doc.as_bytes().as_ptr(), copy.as_bytes().as_ptr());
        assert_eq!(copy.to_str().expect("must be utf-8"), r#"[{"a":1}]"#);
        assert_eq!(doc.len(), 9);
        assert_eq!(format!("{doc}"), r#"[{"a":1}]"#);
    }

    #[test]
    fn non_utf8_is_reported() {
        let doc = EncodedDocument::new(b"[{\"a\":\"\xff\"}]".to_vec());
        assert!(doc.to_str().is_err());
        assert!(format!("{doc:?}").starts_with("EncodedDocument("));
    }
}
