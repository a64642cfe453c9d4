mod date;
mod encode;
mod error;
mod normalize;
mod progress;
mod schema;
mod sink;
mod source;
mod transcode;
mod util;

pub use crate::date::parse_loose_date;
pub use crate::encode::{encode_text_line, encode_typed, EncodedRow, TextFormat};
pub use crate::error::{LoadError, TranscodeError};
pub use crate::normalize::{normalize, NormalizedValue};
pub use crate::schema::{Column, ColumnType, TableSchema};
pub use crate::sink::{BulkSink, LineSink, MemorySink, RowSink};
pub use crate::source::JsonlSource;
pub use crate::transcode::{BulkLoader, ErrorPolicy, RowMode, TranscodeSummary};

// Expose progress and tracing helpers so binaries can reuse them.
pub use crate::progress::make_row_progress;
pub use crate::util::init_tracing_once;
