pub mod contingency;
pub mod split;

pub use contingency::ContingencyTable;
pub use split::{TrainTestSplit, stratified_split, stratum_quota};
