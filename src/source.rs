//! Record sources: lazy, single-pass NDJSON readers over plain or
//! zstd-compressed files. One line parsed at a time; the full input is never
//! resident. Pagination, retry, and caching live on the producing side —
//! the transcoder only sees the iterator.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use zstd::stream::read::Decoder;

/// Lazy NDJSON record source. Yields one parsed record per non-empty line;
/// I/O and parse failures come through as `Err` items so the caller's error
/// policy decides what happens to them.
pub struct JsonlSource {
    rdr: BufReader<Box<dyn Read>>,
    buf: String,
    line_no: u64,
}

impl JsonlSource {
    /// Open a plain NDJSON file with the default 256 KiB read buffer.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_cfg(path, 256 * 1024)
    }

    pub fn open_cfg(path: &Path, read_buf_bytes: usize) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        Ok(Self::from_reader(Box::new(file), read_buf_bytes))
    }

    /// Open a zstd-compressed NDJSON file. `window_log_max(31)` is requested
    /// up front so very large frames don't fail with a window error.
    pub fn open_zst(path: &Path) -> Result<Self> {
        Self::open_zst_cfg(path, 256 * 1024)
    }

    pub fn open_zst_cfg(path: &Path, read_buf_bytes: usize) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let mut decoder =
            Decoder::new(file).with_context(|| format!("zstd decoder {}", path.display()))?;
        decoder.window_log_max(31)?;
        Ok(Self::from_reader(Box::new(decoder), read_buf_bytes))
    }

    fn from_reader(inner: Box<dyn Read>, read_buf_bytes: usize) -> Self {
        Self {
            rdr: BufReader::with_capacity(read_buf_bytes.max(8 * 1024), inner),
            buf: String::with_capacity(16 * 1024),
            line_no: 0,
        }
    }
}

impl Iterator for JsonlSource {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.rdr.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buf.trim_end_matches(['\n', '\r']);
                    if line.trim().is_empty() {
                        continue;
                    }
                    let parsed = serde_json::from_str(line)
                        .with_context(|| format!("parse record on line {}", self.line_no));
                    return Some(parsed);
                }
                Err(e) => {
                    return Some(
                        Err(e).with_context(|| format!("read line {}", self.line_no + 1)),
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn plain_jsonl_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        std::fs::write(&path, "{\"id\":1}\n\n  \n{\"id\":2}\r\n").unwrap();

        let vals: Result<Vec<Value>> = JsonlSource::open(&path).unwrap().collect();
        assert_eq!(vals.unwrap(), vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn bad_json_surfaces_as_err_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        std::fs::write(&path, "{\"id\":1}\nnot json\n{\"id\":3}\n").unwrap();

        let items: Vec<Result<Value>> = JsonlSource::open(&path).unwrap().collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
        assert!(items[2].is_ok(), "source keeps going after a bad line");
    }

    #[test]
    fn zstd_jsonl_streams() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl.zst");
        let f = File::create(&path).unwrap();
        let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
        writeln!(&mut enc, "{}", json!({"id": 1, "name": "a"})).unwrap();
        writeln!(&mut enc, "{}", json!({"id": 2, "name": "b"})).unwrap();
        enc.finish().unwrap();

        let vals: Result<Vec<Value>> = JsonlSource::open_zst(&path).unwrap().collect();
        assert_eq!(vals.unwrap().len(), 2);
    }
}
