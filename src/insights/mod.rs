pub mod aggregator;
pub mod error;
pub mod summary;
pub mod threshold;

/// Name of the grouped-mean column produced by the profile functions.
pub const MEAN: &str = "mean";
