//! Async encoding that can abandon a stuck row fetch.

use std::time::Duration;

use crate::{
    cancel::{ensure_active, CancellationSignal},
    encoder::row_read_error,
    result_set::zip_columns,
    AsyncResultSet, Cancellation, Cell, EncodedDocument, Encoder, Result, RowJsonError,
};

impl Encoder {
    /// Encodes every row of `rows`, racing each fetch against `cancel`.
    ///
    /// When `cancel` carries no deadline and the encoder was configured with
    /// `timeout_ms`, that timeout starts now. `rows` is closed before
    /// returning, whatever the outcome.
    pub async fn encode_async<R>(
        &self,
        rows: &mut R,
        cancel: &Cancellation,
    ) -> Result<EncodedDocument>
    where
        R: AsyncResultSet + ?Sized,
    {
        if rows.is_closed() {
            return Err(RowJsonError::EmptyResultSet);
        }

        let cancel = self.effective_cancellation(cancel);
        let result = self.encode_stream(rows, &cancel).await;
        rows.close().await;
        result
    }

    fn effective_cancellation(&self, cancel: &Cancellation) -> Cancellation {
        match (cancel.deadline(), self.timeout_ms) {
            (None, Some(timeout_ms)) => cancel
                .clone()
                .with_timeout(Duration::from_millis(timeout_ms)),
            _ => cancel.clone(),
        }
    }

    async fn encode_stream<R>(
        &self,
        rows: &mut R,
        cancel: &Cancellation,
    ) -> Result<EncodedDocument>
    where
        R: AsyncResultSet + ?Sized,
    {
        let cols = rows
            .column_names()
            .and_then(|names| zip_columns(names, rows.column_decltypes()?))
            .map_err(RowJsonError::Metadata)?;

        let mut builder = self.builder(&cols);
        let mut cells = vec![Cell::Null; cols.len()];

        loop {
            ensure_active(cancel)?;

            let advanced = tokio::select! {
                biased;
                () = cancel.fired() => Err(RowJsonError::Cancelled { cause: cancel.cause() }),
                advanced = rows.next() => advanced.map_err(row_read_error),
            }?;
            if !advanced {
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
        tracing::debug!(
            "encoded {} streamed rows into {} bytes",
            encoded_rows,
            document.len()
        );

        Ok(document)
    }
}

/// Encodes `rows` with a default [`Encoder`], racing each fetch against `cancel`.
pub async fn encode_async<R>(rows: &mut R, cancel: &Cancellation) -> Result<EncodedDocument>
where
    R: AsyncResultSet + ?Sized,
{
    Encoder::new().encode_async(rows, cancel).await
}
