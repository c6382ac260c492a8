//! 單車多輪裝載
//!
//! 每輪依序處理未滿的隔艙：已鎖定油品的隔艙只補同油品，空隔艙在各油品的最佳組合中
//! 選填充率最高者並鎖定。第一張裝上車的訂單決定整車的配送區域。
//! 前面隔艙消耗共用訂單後，後面的隔艙可能出現新的最佳組合，因此重跑數輪直到沒有進展。

use fleet_core::{percentage, Compartment, OptimizerConfig, Order, ProductId, Truck};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::combination::{CombinationSearch, OrderCombination};
use crate::zoning::ZoneAggregator;

/// 單車裝載結果
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    /// 本次是否裝入任何油量
    pub filled: bool,
    /// 車輛鎖定的區域
    pub zone: Option<String>,
    /// 本次裝入量佔整車容量的比例（%）
    pub fill_percentage: Decimal,
    /// 本次裝入量
    pub loaded_volume: Decimal,
    /// 實際執行的輪數
    pub passes: usize,
}

/// 隔艙裝載器
#[derive(Debug, Clone, Copy)]
pub struct CompartmentFiller {
    search: CombinationSearch,
    max_passes: usize,
}

impl CompartmentFiller {
    pub const DEFAULT_MAX_PASSES: usize = 3;

    pub fn new(search: CombinationSearch, max_passes: usize) -> Self {
        Self {
            search,
            max_passes: max_passes.max(1),
        }
    }

    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::new(
            CombinationSearch::new(config.max_combination_size),
            config.max_passes,
        )
    }

    /// 對單車執行多輪裝載，直接扣減 `orders` 的剩餘量
    ///
    /// `assigned_zone` 為預先指定的區域；車輛已鎖定區域時以車輛為準。
    pub fn fill_truck_completely(
        &self,
        truck: &mut Truck,
        orders: &mut [Order],
        assigned_zone: Option<&str>,
    ) -> FillOutcome {
        let total_capacity = truck.total_capacity();
        let mut zone: Option<String> = truck
            .assigned_zone()
            .or(assigned_zone)
            .map(str::to_string);

        let positions: HashMap<Uuid, usize> = orders
            .iter()
            .enumerate()
            .map(|(pos, order)| (order.id, pos))
            .collect();

        let mut loaded_volume = Decimal::ZERO;
        let mut passes = 0;

        for pass in 0..self.max_passes {
            passes = pass + 1;
            let mut progress = false;

            for index in 0..truck.compartments().len() {
                let Some((product, combination)) = self.plan_compartment(
                    &truck.compartments()[index],
                    orders,
                    zone.as_deref(),
                ) else {
                    continue;
                };

                let loaded = Self::apply_combination(
                    &mut truck.compartments_mut()[index],
                    &product,
                    &combination,
                    orders,
                    &positions,
                    &mut zone,
                );

                if loaded > Decimal::ZERO {
                    if let Some(locked) = zone.as_deref() {
                        truck.lock_zone(locked);
                    }
                    loaded_volume += loaded;
                    progress = true;

                    tracing::debug!(
                        "車輛 {} 第 {} 輪: 隔艙 {} 裝入 {} {}",
                        truck.license_plate,
                        passes,
                        index,
                        loaded,
                        product
                    );
                }
            }

            if !progress {
                break;
            }
        }

        let fill_percentage = percentage(loaded_volume, total_capacity);

        FillOutcome {
            filled: loaded_volume > Decimal::ZERO,
            zone,
            fill_percentage,
            loaded_volume,
            passes,
        }
    }

    /// 決定隔艙本輪要裝的油品與組合
    fn plan_compartment(
        &self,
        compartment: &Compartment,
        orders: &[Order],
        zone: Option<&str>,
    ) -> Option<(ProductId, OrderCombination)> {
        if compartment.is_full() {
            return None;
        }

        let eligible: Vec<&Order> = orders
            .iter()
            .filter(|o| o.has_remaining() && zone.map_or(true, |z| o.zone == z))
            .collect();
        if eligible.is_empty() {
            return None;
        }

        let (product, combination) = match compartment.product_id() {
            Some(locked) => {
                let combination = self.search.find_optimal_combination(
                    eligible.iter().copied(),
                    compartment.remaining_space(),
                    locked,
                );
                (locked.clone(), combination)
            }
            None => self.choose_product(&eligible, compartment.capacity())?,
        };

        if combination.is_empty() {
            return None;
        }
        Some((product, combination))
    }

    /// 空隔艙選油品：各油品組按需求量由大到小比較，同填充率取先出現者
    fn choose_product(
        &self,
        eligible: &[&Order],
        capacity: Decimal,
    ) -> Option<(ProductId, OrderCombination)> {
        let groups = ZoneAggregator::group_orders_by_product(eligible.iter().copied());

        let mut best: Option<(ProductId, OrderCombination)> = None;
        for group in groups {
            let combination = self.search.find_optimal_combination(
                group.orders.iter().copied(),
                capacity,
                &group.product,
            );
            let complete = combination.total_volume == capacity;

            let better = best
                .as_ref()
                .map_or(true, |(_, current)| combination.fill_percentage > current.fill_percentage);
            if better {
                best = Some((group.product, combination));
            }

            if complete {
                break;
            }
        }

        best
    }

    /// 套用組合：扣減訂單剩餘量並裝入隔艙，回傳裝入量
    ///
    /// 區域尚未鎖定時，第一張裝入的訂單決定區域，其他區域的訂單跳過。
    fn apply_combination(
        compartment: &mut Compartment,
        product: &ProductId,
        combination: &OrderCombination,
        orders: &mut [Order],
        positions: &HashMap<Uuid, usize>,
        zone: &mut Option<String>,
    ) -> Decimal {
        if !compartment.lock_product(product) {
            return Decimal::ZERO;
        }

        let mut loaded = Decimal::ZERO;
        for pick in &combination.picks {
            let space_left = compartment.remaining_space();
            if space_left <= Decimal::ZERO {
                break;
            }

            let Some(&pos) = positions.get(&pick.order_id) else {
                continue;
            };
            let order = &mut orders[pos];
            if zone.as_deref().is_some_and(|z| order.zone != z) {
                continue;
            }

            let taken = order.consume(space_left);
            if taken.is_zero() {
                continue;
            }
            loaded += compartment.load(order.id, taken);

            if zone.is_none() {
                *zone = Some(order.zone.clone());
            }
        }

        loaded
    }
}

impl Default for CompartmentFiller {
    fn default() -> Self {
        Self::new(CombinationSearch::default(), Self::DEFAULT_MAX_PASSES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::TruckStatus;

    fn product(code: &str) -> ProductId {
        ProductId::new(code).unwrap()
    }

    fn order(zone: &str, code: &str, quantity: i64) -> Order {
        Order::new(zone, product(code), Decimal::from(quantity))
    }

    fn truck(capacities: &[i64]) -> Truck {
        let capacities: Vec<Decimal> = capacities.iter().copied().map(Decimal::from).collect();
        Truck::with_capacities("TEST", &capacities)
    }

    #[test]
    fn test_single_order_fills_single_compartment() {
        let mut truck = truck(&[10000]);
        let mut orders = vec![order("Z1", "DIESEL", 10000)];

        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert!(outcome.filled);
        assert_eq!(outcome.zone.as_deref(), Some("Z1"));
        assert_eq!(outcome.fill_percentage, Decimal::from(100));
        assert_eq!(truck.status, TruckStatus::Optimized);
        assert_eq!(truck.assigned_zone(), Some("Z1"));
        assert_eq!(truck.compartments()[0].product_id(), Some(&product("DIESEL")));
        assert_eq!(orders[0].remaining_quantity(), Decimal::ZERO);
    }

    #[test]
    fn test_large_order_split_across_compartments() {
        let mut truck = truck(&[5000, 5000, 4000]);
        let mut orders = vec![order("Z1", "DIESEL", 12000)];

        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert_eq!(outcome.loaded_volume, Decimal::from(12000));
        let loads: Vec<Decimal> = truck.compartments().iter().map(|c| c.current_load()).collect();
        assert_eq!(
            loads,
            vec![Decimal::from(5000), Decimal::from(5000), Decimal::from(2000)]
        );
        assert_eq!(orders[0].remaining_quantity(), Decimal::ZERO);
        for compartment in truck.compartments() {
            assert_eq!(compartment.order_ids().collect::<Vec<_>>(), vec![orders[0].id]);
        }
    }

    #[test]
    fn test_equal_fill_prefers_larger_demand_product() {
        let mut truck = truck(&[5000]);
        let mut orders = vec![
            order("Z1", "SP95", 4800),
            order("Z1", "SP95", 1500),
            order("Z1", "DIESEL", 3000),
            order("Z1", "DIESEL", 2000),
        ];

        CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        // 兩種油品都能裝滿：SP95 以 4800 + 200 達 100%，需求量較大排在前面
        assert_eq!(truck.compartments()[0].product_id(), Some(&product("SP95")));
        assert_eq!(truck.compartments()[0].current_load(), Decimal::from(5000));
        assert_eq!(orders[2].remaining_quantity(), Decimal::from(3000));
    }

    #[test]
    fn test_higher_fill_product_wins_over_larger_demand() {
        let mut truck = truck(&[5000]);
        let search = CombinationSearch::new(1);
        let filler = CompartmentFiller::new(search, 1);
        // 限制一張訂單：SP95 總量大但單張只有 3000；DIESEL 單張 4500
        let mut orders = vec![
            order("Z1", "SP95", 3000),
            order("Z1", "SP95", 3000),
            order("Z1", "DIESEL", 4500),
        ];

        filler.fill_truck_completely(&mut truck, &mut orders, None);

        assert_eq!(truck.compartments()[0].product_id(), Some(&product("DIESEL")));
        assert_eq!(truck.compartments()[0].current_load(), Decimal::from(4500));
    }

    #[test]
    fn test_locked_product_only_takes_same_product() {
        let mut truck = truck(&[5000]);
        let diesel = product("DIESEL");
        let first = order("Z1", "DIESEL", 2000);
        truck.lock_zone("Z1");
        truck.compartments_mut()[0].lock_product(&diesel);
        truck.compartments_mut()[0].load(first.id, Decimal::from(2000));

        let mut orders = vec![order("Z1", "SP95", 3000), order("Z1", "DIESEL", 1000)];
        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert_eq!(outcome.loaded_volume, Decimal::from(1000));
        assert_eq!(truck.compartments()[0].current_load(), Decimal::from(3000));
        assert_eq!(truck.compartments()[0].product_id(), Some(&diesel));
        assert_eq!(orders[0].remaining_quantity(), Decimal::from(3000));
    }

    #[test]
    fn test_zone_locked_by_first_order() {
        let mut truck = truck(&[5000, 5000]);
        let mut orders = vec![
            order("NORTH", "DIESEL", 5000),
            order("SOUTH", "SP95", 5000),
        ];

        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert_eq!(outcome.zone.as_deref(), Some("NORTH"));
        assert_eq!(outcome.fill_percentage, Decimal::from(50));
        assert_eq!(orders[1].remaining_quantity(), Decimal::from(5000));
        assert!(truck.compartments()[1].is_empty());
        assert_eq!(truck.compartments()[1].product_id(), None);
    }

    #[test]
    fn test_mixed_zone_combination_keeps_first_zone() {
        let mut truck = truck(&[5000]);
        let mut orders = vec![order("NORTH", "DIESEL", 3000), order("SOUTH", "DIESEL", 2000)];

        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert_eq!(outcome.zone.as_deref(), Some("NORTH"));
        assert_eq!(truck.compartments()[0].current_load(), Decimal::from(3000));
        assert_eq!(orders[1].remaining_quantity(), Decimal::from(2000));
    }

    #[test]
    fn test_preassigned_zone_filters_orders() {
        let mut truck = truck(&[5000]);
        let mut orders = vec![order("NORTH", "DIESEL", 5000), order("SOUTH", "DIESEL", 4000)];

        let outcome =
            CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, Some("SOUTH"));

        assert_eq!(outcome.zone.as_deref(), Some("SOUTH"));
        assert_eq!(truck.assigned_zone(), Some("SOUTH"));
        assert_eq!(outcome.loaded_volume, Decimal::from(4000));
        assert_eq!(orders[0].remaining_quantity(), Decimal::from(5000));
    }

    #[test]
    fn test_no_orders_leaves_truck_idle() {
        let mut truck = truck(&[5000]);
        let mut orders: Vec<Order> = Vec::new();

        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert!(!outcome.filled);
        assert_eq!(outcome.zone, None);
        assert_eq!(outcome.fill_percentage, Decimal::ZERO);
        assert_eq!(outcome.passes, 1);
        assert!(truck.is_idle());
    }

    #[test]
    fn test_truck_without_capacity() {
        let mut truck = truck(&[]);
        let mut orders = vec![order("Z1", "DIESEL", 1000)];

        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert!(!outcome.filled);
        assert_eq!(outcome.fill_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_second_pass_tops_up_partial_compartment() {
        // 第一輪：隔艙 0 裝 DIESEL 4 張共 4000（上限 4 張），隔艙 1 裝剩下的 DIESEL
        // 第二輪：隔艙 0 已鎖定 DIESEL，但已無剩餘 DIESEL 可補
        let mut truck = truck(&[6000, 2000]);
        let mut orders: Vec<Order> = (0..5).map(|_| order("Z1", "DIESEL", 1000)).collect();

        let outcome = CompartmentFiller::default().fill_truck_completely(&mut truck, &mut orders, None);

        assert_eq!(truck.compartments()[0].current_load(), Decimal::from(4000));
        assert_eq!(truck.compartments()[1].current_load(), Decimal::from(1000));
        assert_eq!(outcome.loaded_volume, Decimal::from(5000));
        assert_eq!(outcome.passes, 2);
        assert!(orders.iter().all(|o| !o.has_remaining()));
    }

    #[test]
    fn test_pass_limit_bounds_iterations() {
        let mut truck = truck(&[10000]);
        let filler = CompartmentFiller::new(CombinationSearch::new(1), 2);
        let mut orders: Vec<Order> = (0..5).map(|_| order("Z1", "DIESEL", 1000)).collect();

        let outcome = filler.fill_truck_completely(&mut truck, &mut orders, None);

        // 每輪只能取一張訂單，兩輪後停止
        assert_eq!(outcome.passes, 2);
        assert_eq!(outcome.loaded_volume, Decimal::from(2000));
        assert_eq!(truck.compartments()[0].order_ids().count(), 2);
    }
}
