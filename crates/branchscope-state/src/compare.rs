//! Branch comparison engine: divergence cache, comparison-branch inference, and
//! generation-tagged merge analysis.

mod cache;
mod inference;
mod merge_status;

pub use cache::{
    CacheLookup, ComparisonCache, ComparisonKey, DivergenceRequestId, DivergenceWaiter,
};
pub use inference::{Inference, infer};
pub use merge_status::{MergeGeneration, MergeStatusComputer, compute_merge_status};
