//! 油罐車與隔艙模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{percentage, FleetError, ProductId, Result};

/// 車輛狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TruckStatus {
    /// 閒置（唯一可接受新分配的狀態）
    Idle,
    /// 已產生裝載方案
    Optimized,
    /// 運送中（由外部驗證流程設定）
    InTransit,
}

/// 單一訂單在隔艙中的裝載量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLoad {
    pub order_id: Uuid,
    pub volume: Decimal,
}

/// 隔艙
///
/// 一個隔艙同時只裝一種油品；油品一旦鎖定即不可更改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    /// 隔艙ID
    pub id: Uuid,

    /// 容量（建車時固定）
    capacity: Decimal,

    /// 目前裝載量
    current_load: Decimal,

    /// 鎖定的油品
    product_id: Option<ProductId>,

    /// 各訂單的裝載量（每張訂單一筆）
    loads: Vec<OrderLoad>,
}

impl Compartment {
    /// 創建空隔艙，負容量視為 0
    pub fn new(capacity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            capacity: capacity.max(Decimal::ZERO),
            current_load: Decimal::ZERO,
            product_id: None,
            loads: Vec::new(),
        }
    }

    /// 創建空隔艙，負容量回傳錯誤
    pub fn try_new(capacity: Decimal) -> Result<Self> {
        if capacity < Decimal::ZERO {
            return Err(FleetError::InvalidQuantity(format!(
                "隔艙容量不可為負: {}",
                capacity
            )));
        }
        Ok(Self::new(capacity))
    }

    pub fn capacity(&self) -> Decimal {
        self.capacity
    }

    pub fn current_load(&self) -> Decimal {
        self.current_load
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    /// 剩餘空間
    pub fn remaining_space(&self) -> Decimal {
        self.capacity - self.current_load
    }

    pub fn is_full(&self) -> bool {
        self.current_load >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.current_load.is_zero()
    }

    /// 鎖定油品
    ///
    /// 尚未鎖定時設定並回傳 true；已鎖定為同一油品時回傳 true；其他油品回傳 false。
    pub fn lock_product(&mut self, product: &ProductId) -> bool {
        match &self.product_id {
            Some(locked) => locked == product,
            None => {
                self.product_id = Some(product.clone());
                true
            }
        }
    }

    /// 裝入訂單油量，回傳實際裝入量（不超過剩餘空間）
    ///
    /// 必須先鎖定油品；同一張訂單重複裝入時累加在同一筆記錄上。
    pub fn load(&mut self, order_id: Uuid, volume: Decimal) -> Decimal {
        if self.product_id.is_none() {
            return Decimal::ZERO;
        }

        let added = volume.max(Decimal::ZERO).min(self.remaining_space());
        if added.is_zero() {
            return Decimal::ZERO;
        }

        self.current_load += added;
        match self.loads.iter_mut().find(|l| l.order_id == order_id) {
            Some(existing) => existing.volume += added,
            None => self.loads.push(OrderLoad {
                order_id,
                volume: added,
            }),
        }
        added
    }

    /// 貢獻油量的訂單ID（不重複）
    pub fn order_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.loads.iter().map(|l| l.order_id)
    }

    pub fn loads(&self) -> &[OrderLoad] {
        &self.loads
    }

    /// 指定訂單在此隔艙的裝載量
    pub fn load_of(&self, order_id: Uuid) -> Decimal {
        self.loads
            .iter()
            .filter(|l| l.order_id == order_id)
            .map(|l| l.volume)
            .sum()
    }

    /// 裝載率（%）
    pub fn fill_rate(&self) -> Decimal {
        percentage(self.current_load, self.capacity)
    }
}

/// 油罐車
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Truck {
    /// 車輛ID
    pub id: Uuid,

    /// 車牌
    pub license_plate: String,

    /// 隔艙（順序有意義）
    compartments: Vec<Compartment>,

    /// 車輛狀態
    pub status: TruckStatus,

    /// 鎖定的配送區域
    assigned_zone: Option<String>,
}

impl Truck {
    /// 創建閒置車輛
    pub fn new(license_plate: impl Into<String>, compartments: Vec<Compartment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            license_plate: license_plate.into(),
            compartments,
            status: TruckStatus::Idle,
            assigned_zone: None,
        }
    }

    /// 依隔艙容量清單建車
    pub fn with_capacities(license_plate: impl Into<String>, capacities: &[Decimal]) -> Self {
        let compartments = capacities.iter().copied().map(Compartment::new).collect();
        Self::new(license_plate, compartments)
    }

    /// 依隔艙容量清單建車，任一容量為負時回傳錯誤
    pub fn try_with_capacities(license_plate: impl Into<String>, capacities: &[Decimal]) -> Result<Self> {
        let compartments = capacities
            .iter()
            .copied()
            .map(Compartment::try_new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(license_plate, compartments))
    }

    /// 建構器模式：設置車輛ID（來自儲存層）
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// 建構器模式：設置狀態
    pub fn with_status(mut self, status: TruckStatus) -> Self {
        self.status = status;
        self
    }

    pub fn compartments(&self) -> &[Compartment] {
        &self.compartments
    }

    pub fn compartments_mut(&mut self) -> &mut [Compartment] {
        &mut self.compartments
    }

    pub fn assigned_zone(&self) -> Option<&str> {
        self.assigned_zone.as_deref()
    }

    /// 鎖定配送區域並標記為已優化
    ///
    /// 尚未鎖定時設定並回傳 true；已鎖定為同一區域時回傳 true；其他區域回傳 false。
    pub fn lock_zone(&mut self, zone: &str) -> bool {
        match &self.assigned_zone {
            Some(locked) => locked == zone,
            None => {
                self.assigned_zone = Some(zone.to_string());
                if self.status == TruckStatus::Idle {
                    self.status = TruckStatus::Optimized;
                }
                true
            }
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == TruckStatus::Idle
    }

    /// 總容量
    pub fn total_capacity(&self) -> Decimal {
        self.compartments.iter().map(|c| c.capacity).sum()
    }

    /// 總裝載量
    pub fn total_load(&self) -> Decimal {
        self.compartments.iter().map(|c| c.current_load).sum()
    }

    /// 整車裝載率（%）
    pub fn fill_rate(&self) -> Decimal {
        percentage(self.total_load(), self.total_capacity())
    }

    pub fn is_loaded(&self) -> bool {
        self.total_load() > Decimal::ZERO
    }

    /// 隔艙容量由大到小排序
    pub fn capacities_descending(&self) -> Vec<Decimal> {
        let mut sizes: Vec<Decimal> = self.compartments.iter().map(|c| c.capacity).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(code: &str) -> ProductId {
        ProductId::new(code).unwrap()
    }

    #[test]
    fn test_create_truck() {
        let truck = Truck::with_capacities(
            "AB-123-CD",
            &[Decimal::from(5000), Decimal::from(10000), Decimal::from(3000)],
        );

        assert!(truck.is_idle());
        assert_eq!(truck.assigned_zone(), None);
        assert_eq!(truck.total_capacity(), Decimal::from(18000));
        assert_eq!(truck.fill_rate(), Decimal::ZERO);
        assert_eq!(
            truck.capacities_descending(),
            vec![Decimal::from(10000), Decimal::from(5000), Decimal::from(3000)]
        );
    }

    #[test]
    fn test_try_with_capacities_rejects_negative() {
        let result = Truck::try_with_capacities("AB-123-CD", &[Decimal::from(5000), Decimal::from(-1)]);
        assert!(matches!(result, Err(FleetError::InvalidQuantity(_))));
    }

    #[test]
    fn test_product_lock_in() {
        let mut compartment = Compartment::new(Decimal::from(5000));
        let diesel = product("DIESEL");

        assert!(compartment.lock_product(&diesel));
        assert!(compartment.lock_product(&diesel));
        assert!(!compartment.lock_product(&product("SP95")));
        assert_eq!(compartment.product_id(), Some(&diesel));
    }

    #[test]
    fn test_load_requires_product() {
        let mut compartment = Compartment::new(Decimal::from(5000));
        assert_eq!(compartment.load(Uuid::new_v4(), Decimal::from(100)), Decimal::ZERO);
        assert!(compartment.is_empty());
        assert_eq!(compartment.order_ids().count(), 0);
    }

    #[test]
    fn test_load_is_capped_and_idempotent_per_order() {
        let mut compartment = Compartment::new(Decimal::from(5000));
        compartment.lock_product(&product("DIESEL"));
        let order_id = Uuid::new_v4();

        assert_eq!(compartment.load(order_id, Decimal::from(3000)), Decimal::from(3000));
        assert_eq!(compartment.load(order_id, Decimal::from(4000)), Decimal::from(2000));

        assert!(compartment.is_full());
        assert_eq!(compartment.current_load(), Decimal::from(5000));
        assert_eq!(compartment.order_ids().count(), 1);
        assert_eq!(compartment.load_of(order_id), Decimal::from(5000));
        assert_eq!(compartment.fill_rate(), Decimal::from(100));
    }

    #[test]
    fn test_zone_lock_in() {
        let mut truck = Truck::with_capacities("AB-123-CD", &[Decimal::from(5000)]);

        assert!(truck.lock_zone("Z1"));
        assert_eq!(truck.status, TruckStatus::Optimized);
        assert!(truck.lock_zone("Z1"));
        assert!(!truck.lock_zone("Z2"));
        assert_eq!(truck.assigned_zone(), Some("Z1"));
    }
}
