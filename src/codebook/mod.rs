pub mod load;
pub mod registry;
pub mod types;

pub use registry::DatasetKind;
pub use types::{CodeMap, Codebook, ColumnSpec, FilterSpec, GroupBySpec};
