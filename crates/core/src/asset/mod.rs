//! Fixed asset master records.

pub mod types;

pub use types::{AssetCategory, DepreciationMethod, FixedAsset, validate_rate};
