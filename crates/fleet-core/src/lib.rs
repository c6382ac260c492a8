//! # Fleet Core
//!
//! 核心資料模型與類型定義（訂單、油罐車、隔艙、裝載計劃、優化參數）

pub mod config;
pub mod order;
pub mod plan;
pub mod product;
pub mod truck;

// Re-export 主要類型
pub use config::{OptimizerConfig, ScoringRules};
pub use order::{Order, OrderStatus};
pub use plan::{CompartmentPlan, LoadingPlan};
pub use product::ProductId;
pub use truck::{Compartment, OrderLoad, Truck, TruckStatus};

/// 百分比基數
pub const PERCENT: rust_decimal::Decimal = rust_decimal::Decimal::ONE_HUNDRED;

/// 計算百分比，分母為零時回傳 0（不視為錯誤）
pub fn percentage(part: rust_decimal::Decimal, whole: rust_decimal::Decimal) -> rust_decimal::Decimal {
    if whole <= rust_decimal::Decimal::ZERO {
        return rust_decimal::Decimal::ZERO;
    }
    part / whole * PERCENT
}

/// 車隊優化錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("無效的油品代碼: {0:?}")]
    InvalidProduct(String),

    #[error("無效的數量: {0}")]
    InvalidQuantity(String),

    #[error("無效的優化參數: {0}")]
    InvalidConfig(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FleetError>;
