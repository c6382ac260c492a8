//! 車隊優化主流程
//!
//! 複製輸入後依區域需求由大到小逐區處理：分析、規劃、裝載。
//! 呼叫端的車隊與訂單不會被修改。

use chrono::NaiveDate;
use fleet_calc::{CompartmentFiller, ZoneAggregator, ZoneGroup};
use fleet_core::{percentage, LoadingPlan, OptimizerConfig, Order, Result, Truck};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::planner::AllocationPlanner;
use crate::{OptimizationResult, OptimizationWarning, ZoneReport};

/// 車隊優化器
#[derive(Debug, Clone)]
pub struct FleetOptimizer {
    config: OptimizerConfig,
    planner: AllocationPlanner,
    filler: CompartmentFiller,
}

/// 執行期間的容量統計（只計入有裝載的車輛）
#[derive(Debug, Default)]
struct CapacityTally {
    total_capacity: Decimal,
    used_capacity: Decimal,
}

impl FleetOptimizer {
    /// 創建優化器（不驗證配置，數值界限由各元件自行夾住）
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            planner: AllocationPlanner::new(&config),
            filler: CompartmentFiller::from_config(&config),
            config,
        }
    }

    /// 驗證配置後創建優化器
    pub fn try_new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// 執行一次完整的車隊裝載優化
    pub fn optimize(&self, trucks: &[Truck], orders: &[Order]) -> OptimizationResult {
        let start_time = std::time::Instant::now();

        let mut trucks = trucks.to_vec();
        let eligible: Vec<Order> = orders.iter().filter(|o| o.is_eligible()).cloned().collect();

        tracing::info!(
            "開始車隊優化：車輛 {} 台，訂單 {} 筆（可排車 {} 筆）",
            trucks.len(),
            orders.len(),
            eligible.len()
        );

        let input_positions: HashMap<Uuid, usize> = eligible
            .iter()
            .enumerate()
            .map(|(pos, order)| (order.id, pos))
            .collect();

        let mut zones = ZoneAggregator::group_orders_by_zone(eligible);
        let mut tally = CapacityTally::default();
        let mut zone_reports = Vec::with_capacity(zones.len());
        let mut warnings = Vec::new();

        for group in zones.iter_mut() {
            let report = self.process_zone(group, &mut trucks, &mut tally, &mut warnings);
            zone_reports.push(report);
        }

        let mut remaining_orders: Vec<Order> = zones
            .into_iter()
            .flat_map(|g| g.orders)
            .filter(Order::has_remaining)
            .collect();
        remaining_orders.sort_by_key(|o| input_positions.get(&o.id).copied().unwrap_or(usize::MAX));

        let mut utilization_by_zone: BTreeMap<String, usize> = BTreeMap::new();
        for zone in trucks.iter().filter_map(Truck::assigned_zone) {
            *utilization_by_zone.entry(zone.to_string()).or_insert(0) += 1;
        }

        let fill_rate = percentage(tally.used_capacity, tally.total_capacity);

        tracing::info!("車隊優化完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "裝載 {}，整體裝載率 {}%，剩餘訂單 {} 筆",
            tally.used_capacity,
            fill_rate.round_dp(2),
            remaining_orders.len()
        );

        OptimizationResult {
            trucks,
            remaining_orders,
            fill_rate,
            total_volume_moved: tally.used_capacity,
            utilization_by_zone,
            zone_reports,
            warnings,
        }
    }

    /// 處理單一區域：分析、規劃、依方案順序裝車
    fn process_zone(
        &self,
        group: &mut ZoneGroup,
        trucks: &mut [Truck],
        tally: &mut CapacityTally,
        warnings: &mut Vec<OptimizationWarning>,
    ) -> ZoneReport {
        let demand = group.remaining_volume();
        let analysis = ZoneAggregator::analyze_zone(&group.zone, &group.orders);
        let plans = self.planner.plan_zone_allocation(&analysis, trucks);

        tracing::info!(
            "處理區域 {}：需求 {}，派車方案 {} 個",
            group.zone,
            demand,
            plans.len()
        );

        let mut loaded_volume = Decimal::ZERO;
        let mut trucks_dispatched = 0;

        for plan in &plans {
            if !group.has_remaining() {
                break;
            }
            let Some(truck) = trucks.get_mut(plan.truck_index) else {
                continue;
            };

            let outcome = self
                .filler
                .fill_truck_completely(truck, &mut group.orders, None);
            if !outcome.filled {
                tracing::debug!("車輛 {} 未裝入任何訂單", truck.license_plate);
                continue;
            }

            tally.total_capacity += truck.total_capacity();
            tally.used_capacity += truck.total_load();
            loaded_volume += outcome.loaded_volume;
            trucks_dispatched += 1;

            tracing::debug!(
                "車輛 {} 裝載 {}（{}%），輪數 {}",
                truck.license_plate,
                outcome.loaded_volume,
                outcome.fill_percentage.round_dp(1),
                outcome.passes
            );
        }

        let remaining = group.remaining_volume();
        if plans.is_empty() && demand > Decimal::ZERO {
            tracing::warn!("區域 {} 需求 {} 沒有可行的派車方案", group.zone, demand);
            warnings.push(OptimizationWarning::NoPlanForZone {
                zone: group.zone.clone(),
                demand,
            });
        } else if remaining > Decimal::ZERO {
            tracing::warn!("區域 {} 仍有 {} 未裝載", group.zone, remaining);
            warnings.push(OptimizationWarning::UnmetDemand {
                zone: group.zone.clone(),
                remaining,
            });
        }

        ZoneReport {
            zone: group.zone.clone(),
            demand,
            loaded_volume,
            plans_generated: plans.len(),
            trucks_dispatched,
        }
    }

    /// 產生已裝載車輛的裝載計劃，交由儲存層確認
    pub fn loading_plans(result: &OptimizationResult, plan_date: NaiveDate) -> Vec<LoadingPlan> {
        result
            .trucks
            .iter()
            .filter_map(|truck| LoadingPlan::from_truck(truck, plan_date))
            .collect()
    }
}

impl Default for FleetOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

/// 以預設配置執行車隊優化
pub fn optimize_fleet(trucks: &[Truck], orders: &[Order]) -> OptimizationResult {
    FleetOptimizer::default().optimize(trucks, orders)
}
