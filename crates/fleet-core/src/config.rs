//! 優化參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{FleetError, Result};

/// 車輛與區域匹配的評分規則
///
/// 分數為經驗值，保留為可覆寫的具名常數。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// 隔艙剛好裝滿
    pub exact_fill_points: i32,
    /// 隔艙裝到 near_full_ratio 以上
    pub near_full_points: i32,
    /// 隔艙裝到 mostly_full_ratio 以上
    pub mostly_full_points: i32,
    /// 其他
    pub base_points: i32,

    pub near_full_ratio: Decimal,
    pub mostly_full_ratio: Decimal,

    /// 整車預估裝載率加分門檻（%）與分數
    pub excellent_fill_rate: Decimal,
    pub excellent_fill_bonus: i32,
    pub good_fill_rate: Decimal,
    pub good_fill_bonus: i32,
    pub fair_fill_rate: Decimal,
    pub fair_fill_bonus: i32,

    /// 車輛總容量超過區域需求 oversize_ratio 倍時扣分
    pub oversize_ratio: Decimal,
    pub oversize_penalty: i32,
}

impl ScoringRules {
    pub const EXACT_FILL_POINTS: i32 = 20;
    pub const NEAR_FULL_POINTS: i32 = 15;
    pub const MOSTLY_FULL_POINTS: i32 = 10;
    pub const BASE_POINTS: i32 = 5;
    pub const EXCELLENT_FILL_BONUS: i32 = 30;
    pub const GOOD_FILL_BONUS: i32 = 20;
    pub const FAIR_FILL_BONUS: i32 = 10;
    pub const OVERSIZE_PENALTY: i32 = 20;
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            exact_fill_points: Self::EXACT_FILL_POINTS,
            near_full_points: Self::NEAR_FULL_POINTS,
            mostly_full_points: Self::MOSTLY_FULL_POINTS,
            base_points: Self::BASE_POINTS,
            near_full_ratio: Decimal::new(90, 2),
            mostly_full_ratio: Decimal::new(80, 2),
            excellent_fill_rate: Decimal::from(95),
            excellent_fill_bonus: Self::EXCELLENT_FILL_BONUS,
            good_fill_rate: Decimal::from(85),
            good_fill_bonus: Self::GOOD_FILL_BONUS,
            fair_fill_rate: Decimal::from(75),
            fair_fill_bonus: Self::FAIR_FILL_BONUS,
            oversize_ratio: Decimal::new(15, 1),
            oversize_penalty: Self::OVERSIZE_PENALTY,
        }
    }
}

/// 車隊優化配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 單車裝載的最大輪數
    pub max_passes: usize,

    /// 組合搜尋的訂單數上限（效能界限，非業務規則）
    pub max_combination_size: usize,

    /// 每個區域評分後保留的候選車數
    pub max_trucks_per_zone: usize,

    /// 預估裝載率低於此值（%）的方案不派車
    pub min_plan_fill_rate: Decimal,

    /// 評分規則
    pub scoring: ScoringRules,
}

impl OptimizerConfig {
    pub const DEFAULT_MAX_PASSES: usize = 3;
    pub const DEFAULT_MAX_COMBINATION_SIZE: usize = 4;
    pub const DEFAULT_MAX_TRUCKS_PER_ZONE: usize = 10;
    pub const DEFAULT_MIN_PLAN_FILL_RATE: i64 = 50;

    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 JSON 載入並驗證；缺少的欄位使用預設值
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置最大輪數
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    /// 建構器模式：設置組合搜尋上限
    pub fn with_max_combination_size(mut self, size: usize) -> Self {
        self.max_combination_size = size;
        self
    }

    /// 建構器模式：設置每區候選車數
    pub fn with_max_trucks_per_zone(mut self, trucks: usize) -> Self {
        self.max_trucks_per_zone = trucks;
        self
    }

    /// 建構器模式：設置派車門檻（%）
    pub fn with_min_plan_fill_rate(mut self, rate: Decimal) -> Self {
        self.min_plan_fill_rate = rate;
        self
    }

    /// 建構器模式：設置評分規則
    pub fn with_scoring(mut self, scoring: ScoringRules) -> Self {
        self.scoring = scoring;
        self
    }

    /// 檢查配置是否合理
    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(FleetError::InvalidConfig("max_passes 必須大於 0".to_string()));
        }
        if self.max_combination_size == 0 {
            return Err(FleetError::InvalidConfig(
                "max_combination_size 必須大於 0".to_string(),
            ));
        }
        if self.max_trucks_per_zone == 0 {
            return Err(FleetError::InvalidConfig(
                "max_trucks_per_zone 必須大於 0".to_string(),
            ));
        }
        if self.min_plan_fill_rate < Decimal::ZERO || self.min_plan_fill_rate > Decimal::ONE_HUNDRED {
            return Err(FleetError::InvalidConfig(format!(
                "min_plan_fill_rate 必須介於 0 到 100: {}",
                self.min_plan_fill_rate
            )));
        }
        if self.scoring.oversize_ratio <= Decimal::ZERO {
            return Err(FleetError::InvalidConfig(format!(
                "oversize_ratio 必須大於 0: {}",
                self.scoring.oversize_ratio
            )));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_passes: Self::DEFAULT_MAX_PASSES,
            max_combination_size: Self::DEFAULT_MAX_COMBINATION_SIZE,
            max_trucks_per_zone: Self::DEFAULT_MAX_TRUCKS_PER_ZONE,
            min_plan_fill_rate: Decimal::from(Self::DEFAULT_MIN_PLAN_FILL_RATE),
            scoring: ScoringRules::default(),
        }
    }
}
