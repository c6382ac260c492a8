//! 區域與油品分組

use fleet_core::{Order, ProductId};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// 區域訂單組（擁有該區訂單，供裝載時原地扣減）
#[derive(Debug, Clone)]
pub struct ZoneGroup {
    pub zone: String,
    pub orders: Vec<Order>,
    /// 剩餘量合計
    pub total_volume: Decimal,
}

impl ZoneGroup {
    /// 重新計算剩餘需求
    pub fn remaining_volume(&self) -> Decimal {
        self.orders.iter().map(Order::remaining_quantity).sum()
    }

    pub fn has_remaining(&self) -> bool {
        self.orders.iter().any(Order::has_remaining)
    }
}

/// 油品訂單組
#[derive(Debug, Clone)]
pub struct ProductGroup<'a> {
    pub product: ProductId,
    pub orders: Vec<&'a Order>,
    pub total_volume: Decimal,
}

/// 油品需求量
#[derive(Debug, Clone, PartialEq)]
pub struct ProductVolume {
    pub product: ProductId,
    pub volume: Decimal,
}

/// 區域分析結果
#[derive(Debug, Clone)]
pub struct ZoneAnalysis {
    pub zone: String,
    pub total_volume: Decimal,
    /// 油品需求（依首次出現順序）
    pub product_breakdown: Vec<ProductVolume>,
    /// 該區仍有剩餘量的訂單快照
    pub orders: Vec<Order>,
}

impl ZoneAnalysis {
    /// 油品需求由大到小（同量維持首次出現順序）
    pub fn products_by_volume(&self) -> Vec<ProductVolume> {
        let mut products = self.product_breakdown.clone();
        products.sort_by(|a, b| b.volume.cmp(&a.volume));
        products
    }

    pub fn volume_of(&self, product: &ProductId) -> Decimal {
        self.product_breakdown
            .iter()
            .find(|p| &p.product == product)
            .map(|p| p.volume)
            .unwrap_or(Decimal::ZERO)
    }
}

/// 分組計算器
pub struct ZoneAggregator;

impl ZoneAggregator {
    /// 按區域分組，需求量大的區域優先
    pub fn group_orders_by_zone(orders: Vec<Order>) -> Vec<ZoneGroup> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<ZoneGroup> = Vec::new();

        for order in orders {
            let slot = match index.get(&order.zone) {
                Some(&slot) => slot,
                None => {
                    index.insert(order.zone.clone(), groups.len());
                    groups.push(ZoneGroup {
                        zone: order.zone.clone(),
                        orders: Vec::new(),
                        total_volume: Decimal::ZERO,
                    });
                    groups.len() - 1
                }
            };
            groups[slot].total_volume += order.remaining_quantity();
            groups[slot].orders.push(order);
        }

        // sort_by 為穩定排序，同量區域維持首次出現順序
        groups.sort_by(|a, b| b.total_volume.cmp(&a.total_volume));
        groups
    }

    /// 按油品分組，需求量大的油品優先
    pub fn group_orders_by_product<'a, I>(orders: I) -> Vec<ProductGroup<'a>>
    where
        I: IntoIterator<Item = &'a Order>,
    {
        let mut index: HashMap<&'a ProductId, usize> = HashMap::new();
        let mut groups: Vec<ProductGroup<'a>> = Vec::new();

        for order in orders {
            let slot = *index.entry(&order.product).or_insert_with(|| {
                groups.push(ProductGroup {
                    product: order.product.clone(),
                    orders: Vec::new(),
                    total_volume: Decimal::ZERO,
                });
                groups.len() - 1
            });
            groups[slot].total_volume += order.remaining_quantity();
            groups[slot].orders.push(order);
        }

        groups.sort_by(|a, b| b.total_volume.cmp(&a.total_volume));
        groups
    }

    /// 分析單一區域的油品分佈
    pub fn analyze_zone(zone: &str, orders: &[Order]) -> ZoneAnalysis {
        let zone_orders: Vec<Order> = orders
            .iter()
            .filter(|o| o.zone == zone && o.has_remaining())
            .cloned()
            .collect();

        let mut product_breakdown: Vec<ProductVolume> = Vec::new();
        for order in &zone_orders {
            match product_breakdown.iter_mut().find(|p| p.product == order.product) {
                Some(entry) => entry.volume += order.remaining_quantity(),
                None => product_breakdown.push(ProductVolume {
                    product: order.product.clone(),
                    volume: order.remaining_quantity(),
                }),
            }
        }

        let total_volume = zone_orders.iter().map(Order::remaining_quantity).sum();

        tracing::debug!(
            "區域 {} 分析: 訂單 {} 筆, 需求 {}, 油品 {} 種",
            zone,
            zone_orders.len(),
            total_volume,
            product_breakdown.len()
        );

        ZoneAnalysis {
            zone: zone.to_string(),
            total_volume,
            product_breakdown,
            orders: zone_orders,
        }
    }
}
