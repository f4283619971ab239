//! `rowjson` turns SQL result sets into JSON arrays of row objects.
//!
//! Rows are written straight into a byte buffer, without an intermediate
//! value tree:
//! - [`Encoder::encode`] for driver cursors implementing [`ResultSet`]
//! - [`Encoder::encode_async`] for cursors whose fetches suspend ([`AsyncResultSet`])
//! - [`Encoder::unmarshal`] to decode the rows into a `serde` type
//!
//! Absent cells (SQL NULL or zero-length) are left out of their row object,
//! columns with a numeric declared type are written as bare numbers, and
//! cells that already hold JSON are embedded as-is.

mod cancel;
mod cell;
mod document;
mod encoder;
mod error;
mod escape;
mod numeric;
mod options;
mod probe;
mod result_set;
mod stream;
mod types;
mod unmarshal;

pub use cancel::{Cancellation, CancellationSignal};
pub use cell::Cell;
pub use document::EncodedDocument;
pub use encoder::{encode, DocumentBuilder, Encoder};
pub use error::{BoxError, RowJsonError};
pub use numeric::{Dialect, NumericTypes};
pub use options::{AbsentCells, EncodeOptions};
pub use probe::{JsonProbe, NoProbe, StrictJson};
pub use result_set::{AsyncResultSet, MemoryResultSet, ResultSet};
pub use stream::encode_async;
pub use types::Col;
pub use unmarshal::{decode_document, unmarshal};

pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, RowJsonError>;
