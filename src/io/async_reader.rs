//! Asynchronous CSV reader with batch interface
//!
//! Reads command records from a command file in batches for the async
//! processing strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of CommandRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::CommandRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous command file reader
///
/// Maintains streaming behavior: at most one batch is held in memory.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    ///
    /// # Arguments
    ///
    /// * `reader` - Async reader providing CSV data
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
        }
    }

    /// Read a batch of command records
    ///
    /// Reads until `batch_size` valid records are collected or the file ends.
    /// Invalid rows are logged with their line number and skipped.
    ///
    /// # Returns
    ///
    /// The converted records in file order. Empty once the file is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<CommandRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            let Some(row) = records.next().await else {
                break;
            };
            self.line_num += 1;

            match row {
                Ok(csv_record) => match convert_csv_record(csv_record) {
                    Ok(command_record) => batch.push(command_record),
                    Err(e) => {
                        tracing::warn!(line = self.line_num, "Skipping invalid record: {}", e)
                    }
                },
                Err(e) => tracing::warn!(line = self.line_num, "CSV parse error: {}", e),
            }
        }

        batch
    }
}
