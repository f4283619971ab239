use std::future::Future;

use crate::{error::BoxError, Cell, Col};

/// A row-streamed, column-described query result consumed by the encoder.
///
/// Implementations wrap a driver cursor. Cells must be scanned in their raw
/// textual wire encoding, with SQL NULL reported as [`Cell::Null`].
pub trait ResultSet {
    /// Column names, in result order. Names need not be unique.
    fn column_names(&self) -> Result<Vec<String>, BoxError>;

    /// Declared SQL type per column, aligned with [`ResultSet::column_names`].
    fn column_decltypes(&self) -> Result<Option<Vec<Option<String>>>, BoxError> {
        Ok(None)
    }

    /// Advances to the next row. `Ok(false)` once the rows are exhausted.
    fn next(&mut self) -> Result<bool, BoxError>;

    /// Copies the current row into `cells`, one per column.
    fn scan_raw_cells(&mut self, cells: &mut [Cell]) -> Result<(), BoxError>;

    /// `true` when the result set can no longer be read.
    fn is_closed(&self) -> bool {
        false
    }

    fn close(&mut self) {}
}

/// Async counterpart of [`ResultSet`]: row fetches may suspend on I/O.
pub trait AsyncResultSet: Send {
    fn column_names(&self) -> Result<Vec<String>, BoxError>;

    fn column_decltypes(&self) -> Result<Option<Vec<Option<String>>>, BoxError> {
        Ok(None)
    }

    fn next(&mut self) -> impl Future<Output = Result<bool, BoxError>> + Send;

    fn scan_raw_cells(&mut self, cells: &mut [Cell]) -> Result<(), BoxError>;

    fn is_closed(&self) -> bool {
        false
    }

    fn close(&mut self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Joins column names with their declared types.
pub(crate) fn zip_columns(
    names: Vec<String>,
    decltypes: Option<Vec<Option<String>>>,
) -> Result<Vec<Col>, BoxError> {
    let Some(decltypes) = decltypes else {
        return Ok(names.into_iter().map(Col::new).collect());
    };

    if decltypes.len() != names.len() {
        return Err(format!(
            "column type count mismatch: {} names, {} declared types",
            names.len(),
            decltypes.len()
        )
        .into());
    }

    Ok(names
        .into_iter()
        .zip(decltypes)
        .map(|(name, decltype)| Col { name, decltype })
        .collect())
}

/// Result set over rows held in memory.
///
/// Useful for replaying canned results and for feeding rows that were
/// already fetched by other means.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryResultSet {
    cols: Vec<Col>,
    rows: Vec<Vec<Cell>>,
    /// Index of the current row plus one; zero before the first `next`.
    position: usize,
    closed: bool,
}

impl MemoryResultSet {
    pub fn new<I, C>(cols: I, rows: Vec<Vec<Cell>>) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Col>,
    {
        Self {
            cols: cols.into_iter().map(Into::into).collect(),
            rows,
            position: 0,
            closed: false,
        }
    }

    pub fn cols(&self) -> &[Col] {
        &self.cols
    }

    fn names(&self) -> Vec<String> {
        self.cols.iter().map(|col| col.name.clone()).collect()
    }

    fn decltypes(&self) -> Option<Vec<Option<String>>> {
        self.cols
            .iter()
            .any(|col| col.decltype.is_some())
            .then(|| self.cols.iter().map(|col| col.decltype.clone()).collect())
    }

    fn advance(&mut self) -> Result<bool, BoxError> {
        if self.closed {
            return Err("result set is closed".into());
        }
        if self.position >= self.rows.len() {
            return Ok(false);
        }
        self.position += 1;
        Ok(true)
    }

    fn scan(&self, cells: &mut [Cell]) -> Result<(), BoxError> {
        let row = self
            .position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .ok_or("scan called without a current row")?;

        if row.len() != cells.len() {
            return Err(format!(
                "row {} has {} cells, expected {}",
                self.position - 1,
                row.len(),
                cells.len()
            )
            .into());
        }

        cells.clone_from_slice(row);
        Ok(())
    }
}

impl ResultSet for MemoryResultSet {
    fn column_names(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.names())
    }

    fn column_decltypes(&self) -> Result<Option<Vec<Option<String>>>, BoxError> {
        Ok(self.decltypes())
    }

    fn next(&mut self) -> Result<bool, BoxError> {
        self.advance()
    }

    fn scan_raw_cells(&mut self, cells: &mut [Cell]) -> Result<(), BoxError> {
        self.scan(cells)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

impl AsyncResultSet for MemoryResultSet {
    fn column_names(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.names())
    }

    fn column_decltypes(&self) -> Result<Option<Vec<Option<String>>>, BoxError> {
        Ok(self.decltypes())
    }

    async fn next(&mut self) -> Result<bool, BoxError> {
        self.advance()
    }

    fn scan_raw_cells(&mut self, cells: &mut [Cell]) -> Result<(), BoxError> {
        self.scan(cells)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{zip_columns, MemoryResultSet, ResultSet};
    use crate::{Cell, Col};

    #[test]
    fn zip_columns_without_types() {
        let cols = zip_columns(vec!["a".to_owned(), "b".to_owned()], None)
            .expect("must zip");
        assert_eq!(cols, vec![Col::new("a"), Col::new("b")]);
    }

    #[test]
    fn zip_columns_rejects_mismatched_types() {
        let err = zip_columns(vec!["a".to_owned()], Some(vec![None, None]))
            .expect_err("must fail");
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn memory_rows_iterate_in_order() {
        let mut rows = MemoryResultSet::new(
            [("id", "INT")],
            vec![vec![Cell::text("1")], vec![Cell::text("2")]],
        );
        let mut cells = vec![Cell::Null];

        assert!(ResultSet::scan_raw_cells(&mut rows, &mut cells).is_err());

        assert!(ResultSet::next(&mut rows).expect("must advance"));
        ResultSet::scan_raw_cells(&mut rows, &mut cells).expect("must scan");
        assert_eq!(cells, vec![Cell::text("1")]);

        assert!(ResultSet::next(&mut rows).expect("must advance"));
        ResultSet::scan_raw_cells(&mut rows, &mut cells).expect("must scan");
        assert_eq!(cells, vec![Cell::text("2")]);

        assert!(!ResultSet::next(&mut rows).expect("must report end"));
    }

    #[test]
    fn memory_rows_report_decltypes_only_when_present() {
        let untyped = MemoryResultSet::new(["a"], vec![]);
        assert_eq!(ResultSet::column_decltypes(&untyped).expect("ok"), None);

        let typed = MemoryResultSet::new([Col::typed("a", "INT"), Col::new("b")], vec![]);
        assert_eq!(
            ResultSet::column_decltypes(&typed).expect("ok"),
            Some(vec![Some("INT".to_owned()), None])
        );
    }

    #[test]
    fn closed_memory_rows_refuse_to_advance() {
        let mut rows = MemoryResultSet::new(["a"], vec![vec![Cell::text("x")]]);
        ResultSet::close(&mut rows);
        assert!(ResultSet::is_closed(&rows));
        assert!(ResultSet::next(&mut rows).is_err());
    }
}
