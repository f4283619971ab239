use std::sync::Arc;

use crate::{
    cancel::{ensure_active, CancellationSignal},
    escape::{write_embedded, write_quoted},
    numeric::is_json_decltype,
    probe::{is_json_number, is_structured, JsonProbe, NoProbe, StrictJson},
    result_set::zip_columns,
    AbsentCells, Cell, Col, EncodeOptions, EncodedDocument, NumericTypes, Result, ResultSet,
    RowJsonError,
};

/// How a column's cells are emitted, decided once from its declared type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ColumnKind {
    /// Declared numeric: valid JSON numbers go out bare.
    Numeric,
    /// No declared type, or a JSON type: anything that parses as JSON goes out verbatim.
    Untyped,
    /// Declared non-numeric: only objects, arrays and string literals go out verbatim.
    Text,
}

#[derive(Clone, Debug)]
struct ColumnPlan {
    /// `"name":` with the name already escaped.
    key: Vec<u8>,
    kind: ColumnKind,
}

/// Turns result sets into [`EncodedDocument`]s.
///
/// An encoder holds only configuration and can be shared between threads;
/// each call owns its own output buffer.
#[derive(Clone)]
pub struct Encoder {
    numeric: NumericTypes,
    probe: Arc<dyn JsonProbe + Send + Sync>,
    absent: AbsentCells,
    pub(crate) timeout_ms: Option<u64>,
}

impl std::fmt::Debug for Encoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encoder")
            .field("numeric", &self.numeric)
            .field("absent", &self.absent)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    /// Encoder with [`EncodeOptions::default`].
    pub fn new() -> Self {
        Self {
            numeric: NumericTypes::default(),
            probe: Arc::new(StrictJson),
            absent: AbsentCells::Omit,
            timeout_ms: None,
        }
    }

    /// Applies options, replacing the numeric table and probe they imply.
    pub fn with_options(mut self, opts: EncodeOptions) -> Self {
        self.numeric = NumericTypes::for_dialect(opts.dialect);
        self.probe = if opts.probe_json {
            Arc::new(StrictJson)
        } else {
            Arc::new(NoProbe)
        };
        self.absent = opts.absent;
        self.timeout_ms = opts.timeout_ms;
        self
    }

    pub fn with_numeric_types(mut self, numeric: NumericTypes) -> Self {
        self.numeric = numeric;
        self
    }

    /// Replaces the "already JSON" check used for non-numeric cells.
    pub fn with_probe<P>(mut self, probe: P) -> Self
    where
        P: JsonProbe + Send + Sync + 'static,
    {
        self.probe = Arc::new(probe);
        self
    }

    pub fn numeric_types(&self) -> &NumericTypes {
        &self.numeric
    }

    /// Starts a document for rows shaped by `cols`.
    pub fn builder(&self, cols: &[Col]) -> DocumentBuilder {
        let columns = cols
            .iter()
            .map(|col| {
                let mut key = Vec::with_capacity(col.name.len() + 3);
                write_quoted(&mut key, col.name.as_bytes());
                key.push(b':');
                ColumnPlan {
                    key,
                    kind: self.column_kind(col.decltype.as_deref()),
                }
            })
            .collect();

        DocumentBuilder {
            buf: vec![b'['],
            columns,
            rows: 0,
            absent: self.absent,
            probe: Arc::clone(&self.probe),
        }
    }

    fn column_kind(&self, decltype: Option<&str>) -> ColumnKind {
        match decltype {
            None => ColumnKind::Untyped,
            Some(decltype) if self.numeric.is_numeric(decltype) => ColumnKind::Numeric,
            Some(decltype) if is_json_decltype(decltype) => ColumnKind::Untyped,
            Some(_) => ColumnKind::Text,
        }
    }

    /// Encodes every row of `rows` into one JSON array.
    ///
    /// `rows` is closed before returning, whatever the outcome. Any failure
    /// discards the rows encoded so far.
    pub fn encode<R, C>(&self, rows: &mut R, cancel: &C) -> Result<EncodedDocument>
    where
        R: ResultSet + ?Sized,
        C: CancellationSignal + ?Sized,
    {
        if rows.is_closed() {
            return Err(RowJsonError::EmptyResultSet);
        }

        let result = self.encode_rows(rows, cancel);
        rows.close();
        result
    }

    fn encode_rows<R, C>(&self, rows: &mut R, cancel: &C) -> Result<EncodedDocument>
    where
        R: ResultSet + ?Sized,
        C: CancellationSignal + ?Sized,
    {
        let cols = rows
            .column_names()
            .and_then(|names| zip_columns(names, rows.column_decltypes()?))
            .map_err(RowJsonError::Metadata)?;

        let mut builder = self.builder(&cols);
        let mut cells = vec![Cell::Null; cols.len()];

        loop {
            ensure_active(cancel)?;
            if !rows.next().map_err(row_read_error)? {
                break;
            }
            rows.scan_raw_cells(&mut cells).map_err(row_read_error)?;
            ensure_active(cancel)?;
            builder.push_row(&cells)?;
        }

        ensure_active(cancel)?;
        #[cfg(feature = "tracing")]
        let encoded_rows = builder.rows();
        let document = builder.finish();
        ensure_active(cancel)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("encoded {} rows into {} bytes", encoded_rows, document.len());

        Ok(document)
    }
}

pub(crate) fn row_read_error(err: crate::error::BoxError) -> RowJsonError {
    #[cfg(feature = "tracing")]
    tracing::warn!("row read failed: {}", err);

    RowJsonError::RowRead(err)
}

/// Incremental JSON array assembly, one row at a time.
///
/// Rows may be pushed across any number of calls; the finished document is
/// the same as if they had been pushed in one go.
#[derive(Clone)]
pub struct DocumentBuilder {
    buf: Vec<u8>,
    columns: Vec<ColumnPlan>,
    rows: usize,
    absent: AbsentCells,
    probe: Arc<dyn JsonProbe + Send + Sync>,
}

impl std::fmt::Debug for DocumentBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("bytes", &self.buf.len())
            .finish_non_exhaustive()
    }
}

impl DocumentBuilder {
    /// Number of rows pushed so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Appends one row object. `cells` must hold exactly one cell per column.
    pub fn push_row(&mut self, cells: &[Cell]) -> Result<()> {
        if cells.len() != self.columns.len() {
            return Err(RowJsonError::RowRead(
                format!(
                    "row {} has {} cells, expected {}",
                    self.rows,
                    cells.len(),
                    self.columns.len()
                )
                .into(),
            ));
        }

        let Self {
            buf,
            columns,
            rows,
            absent,
            probe,
        } = self;

        if *rows > 0 {
            buf.push(b',');
        }
        buf.push(b'{');

        let mut first = true;
        for (column, cell) in columns.iter().zip(cells) {
            let bytes = match (cell, *absent) {
                (Cell::Null, AbsentCells::Omit) => continue,
                (Cell::Bytes(bytes), AbsentCells::Omit) if bytes.is_empty() => continue,
                (Cell::Null, AbsentCells::Null) => None,
                (Cell::Bytes(bytes), _) => Some(bytes.as_slice()),
            };

            if !first {
                buf.push(b',');
            }
            first = false;
            buf.extend_from_slice(&column.key);

            match bytes {
                None => buf.extend_from_slice(b"null"),
                Some(bytes) => write_value(buf, &**probe, column.kind, bytes),
            }
        }

        buf.push(b'}');
        *rows += 1;
        Ok(())
    }

    /// Closes the array.
    pub fn finish(mut self) -> EncodedDocument {
        self.buf.push(b']');
        EncodedDocument::new(self.buf)
    }
}

fn write_value(buf: &mut Vec<u8>, probe: &dyn JsonProbe, kind: ColumnKind, bytes: &[u8]) {
    let verbatim = match kind {
        ColumnKind::Numeric => is_json_number(bytes),
        ColumnKind::Untyped => probe.looks_like_json(bytes),
        ColumnKind::Text => is_structured(bytes) && probe.looks_like_json(bytes),
    };

    if verbatim {
        write_embedded(buf, bytes);
    } else {
        write_quoted(buf, bytes);
    }
}

/// Encodes `rows` with a default [`Encoder`].
pub fn encode<R, C>(rows: &mut R, cancel: &C) -> Result<EncodedDocument>
where
    R: ResultSet + ?Sized,
    C: CancellationSignal + ?Sized,
{
    Encoder::new().encode(rows, cancel)
}
