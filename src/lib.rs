pub mod codebook;
pub mod dataset;
pub mod error;
pub mod summary;

pub use codebook::{Codebook, ColumnSpec, DatasetKind};
pub use dataset::RawDataset;
pub use error::SummaryError;
pub use summary::{summarise, summarise_kind, GroupSummary, SummaryData};
