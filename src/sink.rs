//! The bulk-sink boundary: where encoded rows leave the transcoder.
//!
//! A [`BulkSink`] receives rows in schema order, one at a time, over exactly
//! one of two modes: raw text lines (already delimited and escaped) or typed
//! row tuples. The concrete protocol behind it — a `COPY FROM STDIN` channel,
//! a spool file, a test buffer — owns durability and rollback; an uncommitted
//! bulk load on the destination side is simply discarded on failure, so the
//! transcoder never attempts its own rollback.

use crate::encode::EncodedRow;
use crate::schema::TableSchema;
use std::io::{self, BufWriter, Write};

fn unsupported(mode: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, format!("sink does not accept {mode}"))
}

/// Destination boundary for one transcode call. The handle is exclusively
/// owned by the transcoder for the duration of the call; implementations may
/// buffer internally and must surface protocol failures as `io::Error`.
///
/// A sink implements whichever of the two write modes it supports; the
/// defaults reject the other with `ErrorKind::Unsupported`.
pub trait BulkSink {
    /// Accept one complete, newline-terminated text row.
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let _ = line;
        Err(unsupported("text lines"))
    }

    /// Accept one typed row tuple in schema column order.
    fn write_row(&mut self, row: &EncodedRow) -> io::Result<()> {
        let _ = row;
        Err(unsupported("typed rows"))
    }

    /// Flush and complete the load. Called once, after the last row.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Text-mode sink over any [`Write`]: streams rows into a buffered writer,
/// e.g. the stdin pipe of a `COPY ... FROM STDIN (FORMAT CSV, DELIMITER '|',
/// NULL '\N')` channel or a spool file fed to one later.
pub struct LineSink<W: Write> {
    w: BufWriter<W>,
}

impl<W: Write> LineSink<W> {
    /// Wrap `inner` with the default write buffer (256 KiB, same tuning the
    /// streaming reader side uses).
    pub fn new(inner: W) -> Self {
        Self::with_capacity(inner, 256 * 1024)
    }

    pub fn with_capacity(inner: W, buf_bytes: usize) -> Self {
        Self { w: BufWriter::with_capacity(buf_bytes.max(8 * 1024), inner) }
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.w.into_inner().map_err(|e| e.into_error())
    }
}

impl<W: Write> BulkSink for LineSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.w.write_all(line.as_bytes())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.w.flush()
    }
}

/// In-memory sink accepting both modes; used by tests and dry runs to
/// inspect exactly what would cross the protocol boundary.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: Vec<String>,
    pub rows: Vec<EncodedRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BulkSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn write_row(&mut self, row: &EncodedRow) -> io::Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

/// Typed-mode sink that validates each row's arity against the schema before
/// handing it to a row callback. Useful as the adapter shim in front of a
/// driver that exposes a `write_row`-style bulk API.
pub struct RowSink<F: FnMut(&EncodedRow) -> io::Result<()>> {
    arity: usize,
    on_row: F,
}

impl<F: FnMut(&EncodedRow) -> io::Result<()>> RowSink<F> {
    pub fn new(schema: &TableSchema, on_row: F) -> Self {
        Self { arity: schema.len(), on_row }
    }
}

impl<F: FnMut(&EncodedRow) -> io::Result<()>> BulkSink for RowSink<F> {
    fn write_row(&mut self, row: &EncodedRow) -> io::Result<()> {
        if row.len() != self.arity {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("row has {} values, schema declares {}", row.len(), self.arity),
            ));
        }
        (self.on_row)(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NormalizedValue;
    use crate::schema::{Column, ColumnType};

    #[test]
    fn line_sink_round_trips_bytes() {
        let mut sink = LineSink::new(Vec::new());
        sink.write_line("a|b\n").unwrap();
        sink.write_line("c|d\n").unwrap();
        sink.finish().unwrap();
        let bytes = sink.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a|b\nc|d\n");
    }

    #[test]
    fn line_sink_rejects_typed_rows() {
        let mut sink = LineSink::new(Vec::new());
        let err = sink.write_row(&vec![NormalizedValue::Null]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[test]
    fn row_sink_checks_arity() {
        let schema = TableSchema::new("t", vec![Column::new("a", ColumnType::Integer)]);
        let mut seen = 0u32;
        let mut sink = RowSink::new(&schema, |_| {
            seen += 1;
            Ok(())
        });
        sink.write_row(&vec![NormalizedValue::Integer(1)]).unwrap();
        assert!(sink.write_row(&vec![]).is_err());
        drop(sink);
        assert_eq!(seen, 1);
    }
}
