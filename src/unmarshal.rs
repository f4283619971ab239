//! Typed decoding of encoded result sets.
//!
//! Row objects omit absent cells, so fields that may be NULL should be
//! `Option<_>` (or carry `#[serde(default)]`) in the target type. Any
//! shape mismatch surfaces as [`RowJsonError::Decode`].

use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    AsyncResultSet, Cancellation, CancellationSignal, EncodedDocument, Encoder, Result, ResultSet,
    RowJsonError,
};

/// Decodes an already encoded document.
pub fn decode_document<T: DeserializeOwned>(document: &EncodedDocument) -> Result<T> {
    serde_json::from_slice(document.as_bytes()).map_err(RowJsonError::Decode)
}

impl Encoder {
    /// Encodes `rows` and decodes the document into `T`.
    ///
    /// Encoding errors are returned unchanged.
    pub fn unmarshal<T, R, C>(&self, rows: &mut R, cancel: &C) -> Result<T>
    where
        T: DeserializeOwned,
        R: ResultSet + ?Sized,
        C: CancellationSignal + ?Sized,
    {
        let document = self.encode(rows, cancel)?;
        decode_document(&document)
    }

    /// Like [`Encoder::unmarshal`], decoding in place into an existing
    /// container so its allocations can be reused.
    ///
    /// Decoding is not atomic. Encoding errors leave `target` untouched, but
    /// on [`RowJsonError::Decode`] it may be partially populated: a `Vec`
    /// target keeps the elements overwritten before the failing row and its
    /// old contents after it. Use [`Encoder::unmarshal`] when the previous
    /// value must survive a failed decode.
    pub fn unmarshal_into<T, R, C>(&self, rows: &mut R, cancel: &C, target: &mut T) -> Result<()>
    where
        T: DeserializeOwned,
        R: ResultSet + ?Sized,
        C: CancellationSignal + ?Sized,
    {
        let document = self.encode(rows, cancel)?;
        let mut de = serde_json::Deserializer::from_slice(document.as_bytes());
        <T as Deserialize>::deserialize_in_place(&mut de, target)?;
        de.end()?;
        Ok(())
    }

    /// Async counterpart of [`Encoder::unmarshal`].
    pub async fn unmarshal_async<T, R>(&self, rows: &mut R, cancel: &Cancellation) -> Result<T>
    where
        T: DeserializeOwned,
        R: AsyncResultSet + ?Sized,
    {
        let document = self.encode_async(rows, cancel).await?;
        decode_document(&document)
    }
}

/// Encodes `rows` with a default [`Encoder`] and decodes the result into `T`.
pub fn unmarshal<T, R, C>(rows: &mut R, cancel: &C) -> Result<T>
where
    T: DeserializeOwned,
    R: ResultSet + ?Sized,
    C: CancellationSignal + ?Sized,
{
    Encoder::new().unmarshal(rows, cancel)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{decode_document, unmarshal};
    use crate::{Cell, Col, Encoder, MemoryResultSet, RowJsonError};

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: i64,
        name: Option<String>,
    }

    fn users() -> MemoryResultSet {
        MemoryResultSet::new(
            [Col::typed("id", "INT"), Col::typed("name", "VARCHAR")],
            vec![
                vec![Cell::text("7"), Cell::text("Alice")],
                vec![Cell::text("8"), Cell::Null],
            ],
        )
    }

    #[test]
    fn absent_cells_decode_as_none() {
        let decoded: Vec<User> = unmarshal(&mut users(), &()).expect("must decode");
        assert_eq!(
            decoded,
            vec![
                User {
                    id: 7,
                    name: Some("Alice".to_owned())
                },
                User { id: 8, name: None },
            ]
        );
    }

    #[test]
    fn shape_mismatch_is_decode_error() {
        let err = unmarshal::<User, _, _>(&mut users(), &()).expect_err("array is not a struct");
        assert!(matches!(err, RowJsonError::Decode(_)));

        let mut rows = MemoryResultSet::new(
            [Col::typed("id", "VARCHAR")],
            vec![vec![Cell::text("seven")]],
        );
        let err = unmarshal::<Vec<User>, _, _>(&mut rows, &()).expect_err("id must be numeric");
        assert!(matches!(err, RowJsonError::Decode(_)));
    }

    #[test]
    fn unmarshal_into_leaves_target_alone_on_encode_error() {
        let mut target = vec![User { id: 1, name: None }];
        let mut closed = users();
        crate::ResultSet::close(&mut closed);

        let err = Encoder::new()
            .unmarshal_into(&mut closed, &(), &mut target)
            .expect_err("closed result set");
        assert!(matches!(err, RowJsonError::EmptyResultSet));
        assert_eq!(target, vec![User { id: 1, name: None }]);

        Encoder::new()
            .unmarshal_into(&mut users(), &(), &mut target)
            .expect("must decode");
        assert_eq!(
            target,
            vec![
                User {
                    id: 7,
                    name: Some("Alice".to_owned())
                },
                User { id: 8, name: None },
            ]
        );
    }

    #[test]
    fn unmarshal_into_partially_populates_on_decode_error() {
        let mut target = vec![User { id: 1, name: None }, User { id: 2, name: None }];
        let mut rows = MemoryResultSet::new(
            [Col::new("id"), Col::typed("name", "VARCHAR")],
            vec![
                vec![Cell::text("7"), Cell::text("Alice")],
                vec![Cell::text("seven"), Cell::text("Bob")],
            ],
        );

        let err = Encoder::new()
            .unmarshal_into(&mut rows, &(), &mut target)
            .expect_err("second id is not a number");
        assert!(matches!(err, RowJsonError::Decode(_)));
        assert_eq!(
            target,
            vec![
                User {
                    id: 7,
                    name: Some("Alice".to_owned())
                },
                User { id: 2, name: None },
            ]
        );
    }

    #[test]
    fn unmarshal_into_shrinks_longer_target() {
        let mut target: Vec<User> = (0..5).map(|id| User { id, name: None }).collect();
        Encoder::new()
            .unmarshal_into(&mut users(), &(), &mut target)
            .expect("must decode");
        assert_eq!(target.len(), 2);
        assert_eq!(target[1], User { id: 8, name: None });
    }

    #[test]
    fn decode_document_into_json_values() {
        let doc = Encoder::new()
            .encode(&mut users(), &())
            .expect("must encode");
        let value: serde_json::Value = decode_document(&doc).expect("must decode");
        assert_eq!(value[0]["id"], 7);
        assert!(value[1].get("name").is_none());
    }
}
