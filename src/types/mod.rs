pub mod candidate;
pub mod response;

pub use candidate::{RankedResult, ResultSet};
pub use response::{ExportRequest, SubmitResponse};
