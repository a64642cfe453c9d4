//! The streaming transcoder: pull one record, encode it, push it to the
//! sink, repeat. This is where the constant-memory property lives — one
//! record and one reusable line buffer in flight, never the whole input.

use crate::encode::{encode_text_line, encode_typed, TextFormat};
use crate::error::{LoadError, TranscodeError};
use crate::progress::make_row_progress;
use crate::schema::TableSchema;
use crate::sink::BulkSink;
use crate::util::init_tracing_once;
use anyhow::Result;
use serde_json::Value;

/// What to do when a single record fails to transcode (bad date, missing
/// field, unreadable source item). Sink failures are exempt: a broken
/// channel always aborts the whole load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole transcode on the first bad record. The default: a
    /// partially-loaded table with inconsistent row semantics is worse
    /// than a hard failure.
    #[default]
    Strict,
    /// Skip the bad record, log it with `tracing::warn!`, keep going.
    Lenient,
}

/// Which sink mode rows are produced in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowMode {
    /// Delimited, escaped text lines (`BulkSink::write_line`).
    Text,
    /// Typed row tuples (`BulkSink::write_row`); framing and escaping are
    /// the protocol's problem in this mode.
    Typed,
}

/// Totals for one completed load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TranscodeSummary {
    pub rows_written: u64,
    pub records_skipped: u64,
}

/// The record-to-wire bulk loader. Configure with the builder methods, then
/// run [`BulkLoader::load`] with any lazy record sequence and any sink.
///
/// ```no_run
/// use rowcopy::{BulkLoader, JsonlSource, LineSink, TableSchema};
///
/// # fn main() -> anyhow::Result<()> {
/// let records = JsonlSource::open_zst("beers.jsonl.zst".as_ref())?;
/// let mut sink = LineSink::new(std::fs::File::create("copy_payload.txt")?);
/// let summary = BulkLoader::new(TableSchema::staging_beers())
///     .progress(true)
///     .load(records, &mut sink)?;
/// println!("loaded {} rows", summary.rows_written);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct BulkLoader {
    schema: TableSchema,
    mode: RowMode,
    fmt: TextFormat,
    policy: ErrorPolicy,
    progress: bool,
    progress_label: Option<String>,
}

impl BulkLoader {
    /// Text mode, `|` delimiter, `\N` null marker, strict policy.
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            mode: RowMode::Text,
            fmt: TextFormat::default(),
            policy: ErrorPolicy::Strict,
            progress: false,
            progress_label: None,
        }
    }

    // -------- Builder methods --------
    pub fn text_mode(mut self) -> Self { self.mode = RowMode::Text; self }
    pub fn typed_mode(mut self) -> Self { self.mode = RowMode::Typed; self }
    pub fn delimiter(mut self, byte: u8) -> Self { self.fmt.delimiter = byte; self }
    pub fn null_marker(mut self, marker: impl Into<String>) -> Self { self.fmt.null_marker = marker.into(); self }
    pub fn policy(mut self, policy: ErrorPolicy) -> Self { self.policy = policy; self }
    pub fn lenient(self) -> Self { self.policy(ErrorPolicy::Lenient) }
    pub fn progress(mut self, yes: bool) -> Self { self.progress = yes; self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.progress_label = Some(label.into()); self }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Stream `records` into `sink`. Single-threaded pull-then-push: the
    /// next record is not pulled until the previous row has been handed to
    /// the sink, so output row order always equals input order and blocking
    /// (source I/O, sink backpressure) propagates synchronously.
    ///
    /// On abort the error carries the 0-based index of the offending record.
    pub fn load<I, S>(&self, records: I, sink: &mut S) -> Result<TranscodeSummary, LoadError>
    where
        I: IntoIterator<Item = Result<Value>>,
        S: BulkSink,
    {
        init_tracing_once();
        let pb = if self.progress {
            Some(make_row_progress(self.progress_label.as_deref()))
        } else {
            None
        };

        let mut summary = TranscodeSummary::default();
        let mut line = String::with_capacity(1024);
        let mut index: u64 = 0;

        for item in records {
            // Outer Err: record-level failure, subject to the policy.
            // Inner Err: sink failure, always fatal.
            let outcome: Result<std::io::Result<()>, TranscodeError> = match item {
                Err(e) => Err(TranscodeError::Source(e)),
                Ok(record) => match self.mode {
                    RowMode::Text => encode_text_line(&record, &self.schema, &self.fmt, &mut line)
                        .map(|()| sink.write_line(&line)),
                    RowMode::Typed => {
                        encode_typed(&record, &self.schema).map(|row| sink.write_row(&row))
                    }
                },
            };

            match outcome {
                Ok(Ok(())) => {
                    summary.rows_written += 1;
                    if let Some(pb) = &pb {
                        pb.inc(1);
                    }
                }
                Ok(Err(io_err)) => {
                    if let Some(pb) = &pb {
                        pb.abandon();
                    }
                    return Err(LoadError::at(index, TranscodeError::SinkWrite(io_err)));
                }
                Err(kind) => match self.policy {
                    ErrorPolicy::Strict => {
                        if let Some(pb) = &pb {
                            pb.abandon();
                        }
                        return Err(LoadError::at(index, kind));
                    }
                    ErrorPolicy::Lenient => {
                        tracing::warn!(index, error = %kind, "skipping record");
                        summary.records_skipped += 1;
                    }
                },
            }
            index += 1;
        }

        sink.finish()
            .map_err(|e| LoadError::at(index, TranscodeError::SinkWrite(e)))?;
        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }
        Ok(summary)
    }

    /// Convenience for sources that cannot fail per item.
    pub fn load_values<I, S>(&self, records: I, sink: &mut S) -> Result<TranscodeSummary, LoadError>
    where
        I: IntoIterator<Item = Value>,
        S: BulkSink,
    {
        self.load(records.into_iter().map(Ok), sink)
    }
}
