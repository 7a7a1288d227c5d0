pub mod result_set;

pub use result_set::{NULL_MARKER, QueryResult};
pub(crate) use result_set::RawRowSet;
