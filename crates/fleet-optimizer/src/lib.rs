//! # Fleet Optimizer
//!
//! 車隊調度：區域派車方案與整體裝載流程

pub mod orchestrator;
pub mod planner;

// Re-export 主要類型
pub use orchestrator::{optimize_fleet, FleetOptimizer};
pub use planner::{AllocationPlan, AllocationPlanner};

use fleet_core::{Order, Truck};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// 優化結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    /// 裝載後的車隊快照
    pub trucks: Vec<Truck>,

    /// 仍有剩餘量的訂單（維持輸入順序）
    pub remaining_orders: Vec<Order>,

    /// 已裝載車輛的整體裝載率（%）
    pub fill_rate: Decimal,

    /// 本次裝載的總油量
    pub total_volume_moved: Decimal,

    /// 各區域派出的車數
    pub utilization_by_zone: BTreeMap<String, usize>,

    /// 各區域執行摘要（依處理順序）
    pub zone_reports: Vec<ZoneReport>,

    /// 警告信息
    pub warnings: Vec<OptimizationWarning>,
}

impl OptimizationResult {
    /// 已裝載的車輛
    pub fn loaded_trucks(&self) -> impl Iterator<Item = &Truck> {
        self.trucks.iter().filter(|t| t.is_loaded())
    }

    /// 剩餘未裝載的油量
    pub fn remaining_volume(&self) -> Decimal {
        self.remaining_orders
            .iter()
            .map(Order::remaining_quantity)
            .sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// 單一區域的執行摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneReport {
    pub zone: String,
    /// 處理前的需求量
    pub demand: Decimal,
    pub loaded_volume: Decimal,
    /// 通過門檻的派車方案數
    pub plans_generated: usize,
    pub trucks_dispatched: usize,
}

impl ZoneReport {
    pub fn unmet_volume(&self) -> Decimal {
        (self.demand - self.loaded_volume).max(Decimal::ZERO)
    }
}

/// 優化警告（不中斷流程）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizationWarning {
    /// 區域有需求但沒有任何車輛通過門檻
    NoPlanForZone { zone: String, demand: Decimal },

    /// 區域處理完仍有需求未裝載
    UnmetDemand { zone: String, remaining: Decimal },
}

impl OptimizationWarning {
    pub fn zone(&self) -> &str {
        match self {
            Self::NoPlanForZone { zone, .. } | Self::UnmetDemand { zone, .. } => zone,
        }
    }
}

impl std::fmt::Display for OptimizationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPlanForZone { zone, demand } => {
                write!(f, "區域 {} 需求 {} 沒有可行的派車方案", zone, demand)
            }
            Self::UnmetDemand { zone, remaining } => {
                write!(f, "區域 {} 仍有 {} 未裝載", zone, remaining)
            }
        }
    }
}
