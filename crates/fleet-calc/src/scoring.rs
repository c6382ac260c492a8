//! 車輛與區域匹配評分

use fleet_core::{percentage, ProductId, ScoringRules, Truck};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::zoning::ZoneAnalysis;

/// 車輛評分結果
#[derive(Debug, Clone, PartialEq)]
pub struct TruckScore {
    pub truck_id: Uuid,
    pub score: i32,
    /// 模擬裝載率（%）
    pub expected_fill_rate: Decimal,
    /// 與隔艙配對的油品（依配對順序）
    pub compatible_products: Vec<ProductId>,
    pub total_capacity: Decimal,
}

/// 附帶車隊索引的評分
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTruck {
    /// 在傳入車隊中的位置
    pub index: usize,
    pub score: TruckScore,
}

/// 車輛評分器
///
/// 隔艙由大到小與油品需求由大到小逐一配對，只是簡單的匹配啟發式，不做搜尋。
#[derive(Debug, Clone, Default)]
pub struct TruckScorer {
    rules: ScoringRules,
}

impl TruckScorer {
    pub fn new(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// 評估車輛對區域的適配度（不修改任何狀態）
    pub fn score_truck_for_zone(&self, truck: &Truck, analysis: &ZoneAnalysis) -> TruckScore {
        let total_capacity = truck.total_capacity();
        let compartment_sizes = truck.capacities_descending();
        let products = analysis.products_by_volume();

        let mut score = 0;
        let mut simulated_fill = Decimal::ZERO;
        let mut compatible_products = Vec::new();

        for (size, product) in compartment_sizes.iter().zip(products.iter()) {
            let fill = (*size).min(product.volume);
            simulated_fill += fill;
            compatible_products.push(product.product.clone());
            score += self.compartment_points(fill, *size);
        }

        let expected_fill_rate = percentage(simulated_fill, total_capacity);
        score += self.fill_rate_bonus(expected_fill_rate);

        if total_capacity > analysis.total_volume * self.rules.oversize_ratio {
            score -= self.rules.oversize_penalty;
        }

        TruckScore {
            truck_id: truck.id,
            score,
            expected_fill_rate,
            compatible_products,
            total_capacity,
        }
    }

    /// 選出區域的候選車輛：只考慮閒置車，分數由高到低，最多 max_trucks 台
    pub fn find_best_trucks_for_zone(
        &self,
        trucks: &[Truck],
        analysis: &ZoneAnalysis,
        max_trucks: usize,
    ) -> Vec<RankedTruck> {
        let mut ranked: Vec<RankedTruck> = trucks
            .iter()
            .enumerate()
            .filter(|(_, truck)| truck.is_idle())
            .map(|(index, truck)| RankedTruck {
                index,
                score: self.score_truck_for_zone(truck, analysis),
            })
            .collect();

        // 同分維持車隊順序
        ranked.sort_by(|a, b| b.score.score.cmp(&a.score.score));
        ranked.truncate(max_trucks);

        tracing::debug!(
            "區域 {} 候選車輛: {} 台",
            analysis.zone,
            ranked.len()
        );

        ranked
    }

    fn compartment_points(&self, fill: Decimal, capacity: Decimal) -> i32 {
        if fill == capacity {
            self.rules.exact_fill_points
        } else if fill >= capacity * self.rules.near_full_ratio {
            self.rules.near_full_points
        } else if fill >= capacity * self.rules.mostly_full_ratio {
            self.rules.mostly_full_points
        } else {
            self.rules.base_points
        }
    }

    fn fill_rate_bonus(&self, fill_rate: Decimal) -> i32 {
        if fill_rate >= self.rules.excellent_fill_rate {
            self.rules.excellent_fill_bonus
        } else if fill_rate >= self.rules.good_fill_rate {
            self.rules.good_fill_bonus
        } else if fill_rate >= self.rules.fair_fill_rate {
            self.rules.fair_fill_bonus
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoning::ZoneAggregator;
    use fleet_core::{Order, TruckStatus};
    use rstest::rstest;

    fn order(product: &str, quantity: i64) -> Order {
        Order::new("Z1", ProductId::new(product).unwrap(), Decimal::from(quantity))
    }

    fn truck(capacities: &[i64]) -> Truck {
        let capacities: Vec<Decimal> = capacities.iter().copied().map(Decimal::from).collect();
        Truck::with_capacities("TEST", &capacities)
    }

    fn analysis(orders: &[Order]) -> ZoneAnalysis {
        ZoneAggregator::analyze_zone("Z1", orders)
    }

    #[rstest]
    #[case(5000, 5000, 20)]
    #[case(4600, 5000, 15)]
    #[case(4500, 5000, 15)]
    #[case(4000, 5000, 10)]
    #[case(3999, 5000, 5)]
    fn test_compartment_points(#[case] fill: i64, #[case] capacity: i64, #[case] expected: i32) {
        let scorer = TruckScorer::default();
        assert_eq!(
            scorer.compartment_points(Decimal::from(fill), Decimal::from(capacity)),
            expected
        );
    }

    #[rstest]
    #[case(100, 30)]
    #[case(95, 30)]
    #[case(90, 20)]
    #[case(85, 20)]
    #[case(80, 10)]
    #[case(75, 10)]
    #[case(74, 0)]
    fn test_fill_rate_bonus(#[case] rate: i64, #[case] expected: i32) {
        let scorer = TruckScorer::default();
        assert_eq!(scorer.fill_rate_bonus(Decimal::from(rate)), expected);
    }

    #[test]
    fn test_largest_compartment_pairs_with_largest_product() {
        let orders = vec![order("SP95", 3000), order("DIESEL", 10000)];
        let score = TruckScorer::default().score_truck_for_zone(&truck(&[3000, 10000]), &analysis(&orders));

        // 兩個隔艙都剛好裝滿：20 + 20，裝載率 100% 加 30
        assert_eq!(score.score, 70);
        assert_eq!(score.expected_fill_rate, Decimal::from(100));
        let products: Vec<&str> = score.compatible_products.iter().map(|p| p.as_str()).collect();
        assert_eq!(products, vec!["DIESEL", "SP95"]);
    }

    #[test]
    fn test_more_compartments_than_products() {
        let orders = vec![order("DIESEL", 4000)];
        let score = TruckScorer::default().score_truck_for_zone(&truck(&[5000, 3000]), &analysis(&orders));

        // 5000 隔艙裝 4000（80%）得 10 分；整車 50% 無加分；8000 > 6000 扣 20
        assert_eq!(score.score, -10);
        assert_eq!(score.expected_fill_rate, Decimal::from(50));
        assert_eq!(score.compatible_products.len(), 1);
    }

    #[test]
    fn test_oversize_penalty_ranks_smaller_truck_first() {
        let orders = vec![order("DIESEL", 1000)];
        let analysis = analysis(&orders);
        let big = truck(&[5000]);
        let small = truck(&[1000]);
        let scorer = TruckScorer::default();

        let big_score = scorer.score_truck_for_zone(&big, &analysis);
        let small_score = scorer.score_truck_for_zone(&small, &analysis);

        // 大車：1000/5000 得 5 分，20% 無加分，5000 > 1500 扣 20
        assert_eq!(big_score.score, -15);
        assert_eq!(small_score.score, 50);

        let ranked = scorer.find_best_trucks_for_zone(&[big, small], &analysis, 10);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].index, 0);
    }

    #[test]
    fn test_find_best_trucks_skips_busy_and_caps_count() {
        let orders = vec![order("DIESEL", 20000)];
        let analysis = analysis(&orders);
        let trucks = vec![
            truck(&[5000]).with_status(TruckStatus::InTransit),
            truck(&[5000]),
            truck(&[5000]),
            truck(&[5000]).with_status(TruckStatus::Optimized),
            truck(&[5000]),
        ];

        let ranked = TruckScorer::default().find_best_trucks_for_zone(&trucks, &analysis, 2);

        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(ranked[0].score.truck_id, trucks[1].id);
    }

    #[test]
    fn test_truck_without_compartments() {
        let orders = vec![order("DIESEL", 1000)];
        let score = TruckScorer::default().score_truck_for_zone(&truck(&[]), &analysis(&orders));

        assert_eq!(score.score, 0);
        assert_eq!(score.expected_fill_rate, Decimal::ZERO);
    }
}
