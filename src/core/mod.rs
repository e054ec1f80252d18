pub mod aggregator;
pub mod fallback;
pub mod merge;

pub use aggregator::{isolate, ProfileAggregator};
pub use fallback::synthesize;
pub use merge::{merge, merge_all};
