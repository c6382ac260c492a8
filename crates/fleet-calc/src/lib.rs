//! # Fleet Calculation Engine
//!
//! 裝載計算引擎：區域分組、車輛評分、訂單組合搜尋、隔艙裝載

pub mod combination;
pub mod filling;
pub mod scoring;
pub mod zoning;

// Re-export 主要類型
pub use combination::{CombinationSearch, OrderCombination, Pick};
pub use filling::{CompartmentFiller, FillOutcome};
pub use scoring::{RankedTruck, TruckScore, TruckScorer};
pub use zoning::{ProductGroup, ProductVolume, ZoneAggregator, ZoneAnalysis, ZoneGroup};
