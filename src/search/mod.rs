pub mod optimizer;

pub use optimizer::{BestConfig, GuidanceParams, ParameterSearch, RocketParams, SearchRanges};
