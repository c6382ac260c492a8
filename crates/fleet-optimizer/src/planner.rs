//! 區域派車方案
//!
//! 依評分挑出候選車，逐台模擬裝載（不修改任何狀態），
//! 預估裝載率達門檻的車輛才列入方案。方案只是建議，實際裝載由隔艙裝載器決定。

use fleet_calc::{RankedTruck, TruckScorer, ZoneAnalysis};
use fleet_core::{percentage, OptimizerConfig, Order, Truck};
use rust_decimal::Decimal;
use uuid::Uuid;

/// 單台車的派車方案
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    /// 在車隊中的位置
    pub truck_index: usize,
    pub truck_id: Uuid,
    pub zone: String,
    /// 評分器預估的裝載率（%）
    pub expected_fill_rate: Decimal,
    /// 模擬裝載率（%）
    pub simulated_fill_rate: Decimal,
    /// 模擬中選用的訂單
    pub planned_order_ids: Vec<Uuid>,
}

/// 派車方案規劃器
#[derive(Debug, Clone)]
pub struct AllocationPlanner {
    scorer: TruckScorer,
    max_trucks: usize,
    min_fill_rate: Decimal,
}

impl AllocationPlanner {
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            scorer: TruckScorer::new(config.scoring.clone()),
            max_trucks: config.max_trucks_per_zone,
            min_fill_rate: config.min_plan_fill_rate,
        }
    }

    /// 為區域產生派車方案（依評分高低排列）
    pub fn plan_zone_allocation(&self, analysis: &ZoneAnalysis, trucks: &[Truck]) -> Vec<AllocationPlan> {
        if !analysis.orders.iter().any(Order::has_remaining) {
            return Vec::new();
        }

        let candidates = self
            .scorer
            .find_best_trucks_for_zone(trucks, analysis, self.max_trucks);

        let mut plans = Vec::new();
        for candidate in candidates {
            let Some(truck) = trucks.get(candidate.index) else {
                continue;
            };
            let plan = Self::simulate(truck, &candidate, analysis);

            if plan.simulated_fill_rate >= self.min_fill_rate {
                tracing::debug!(
                    "區域 {} 方案: 車輛 {} 分數 {} 預估 {}% 模擬 {}%",
                    analysis.zone,
                    truck.license_plate,
                    candidate.score.score,
                    plan.expected_fill_rate.round_dp(1),
                    plan.simulated_fill_rate.round_dp(1)
                );
                plans.push(plan);
            } else {
                tracing::debug!(
                    "區域 {} 捨棄車輛 {}: 模擬裝載率 {}% 未達門檻",
                    analysis.zone,
                    truck.license_plate,
                    plan.simulated_fill_rate.round_dp(1)
                );
            }
        }

        plans
    }

    /// 依相容油品順序模擬裝載整車容量
    fn simulate(truck: &Truck, candidate: &RankedTruck, analysis: &ZoneAnalysis) -> AllocationPlan {
        let capacity = candidate.score.total_capacity;
        let mut planned = Decimal::ZERO;
        let mut planned_order_ids = Vec::new();

        'products: for product in &candidate.score.compatible_products {
            for order in analysis
                .orders
                .iter()
                .filter(|o| &o.product == product && o.has_remaining())
            {
                if planned >= capacity {
                    break 'products;
                }
                let take = order.remaining_quantity().min(capacity - planned);
                if take > Decimal::ZERO {
                    planned += take;
                    planned_order_ids.push(order.id);
                }
            }
        }

        AllocationPlan {
            truck_index: candidate.index,
            truck_id: truck.id,
            zone: analysis.zone.clone(),
            expected_fill_rate: candidate.score.expected_fill_rate,
            simulated_fill_rate: percentage(planned, capacity),
            planned_order_ids,
        }
    }
}

impl Default for AllocationPlanner {
    fn default() -> Self {
        Self::new(&OptimizerConfig::default())
    }
}
