//! 裝載計劃（交給外部驗證與儲存流程的資料）

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ProductId, Result, Truck};

/// 單一隔艙的裝載內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompartmentPlan {
    /// 隔艙ID
    pub compartment_id: Uuid,

    /// 隔艙容量
    pub capacity: Decimal,

    /// 油品（空隔艙為 None）
    pub product: Option<ProductId>,

    /// 裝載量
    pub load: Decimal,

    /// 貢獻油量的訂單
    pub orders: Vec<Uuid>,
}

/// 整車裝載計劃
///
/// 操作員驗證後由儲存層整包保存，並將 [`LoadingPlan::order_ids`] 標記為已裝載。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadingPlan {
    pub truck_id: Uuid,
    pub license_plate: String,
    pub zone: String,
    pub plan_date: NaiveDate,
    pub total_volume: Decimal,
    /// 裝載率（%）
    pub fill_rate: Decimal,
    pub compartments: Vec<CompartmentPlan>,
}

impl LoadingPlan {
    /// 由已優化的車輛產生裝載計劃，未裝載或未鎖定區域的車輛回傳 None
    pub fn from_truck(truck: &Truck, plan_date: NaiveDate) -> Option<Self> {
        let zone = truck.assigned_zone()?;
        if !truck.is_loaded() {
            return None;
        }

        let compartments = truck
            .compartments()
            .iter()
            .map(|c| CompartmentPlan {
                compartment_id: c.id,
                capacity: c.capacity(),
                product: c.product_id().cloned(),
                load: c.current_load(),
                orders: c.order_ids().collect(),
            })
            .collect();

        Some(Self {
            truck_id: truck.id,
            license_plate: truck.license_plate.clone(),
            zone: zone.to_string(),
            plan_date,
            total_volume: truck.total_load(),
            fill_rate: truck.fill_rate(),
            compartments,
        })
    }

    /// 需標記為已裝載的訂單（不重複，依隔艙順序）
    pub fn order_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::new();
        for id in self.compartments.iter().flat_map(|c| c.orders.iter()) {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }

    /// 序列化為 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 由 JSON 還原
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
