//! 配送訂單模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FleetError, ProductId, Result};

/// 訂單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 待付款
    Pending,
    /// 已付款（唯一可排車的狀態）
    Paid,
    /// 已排程
    Scheduled,
    /// 已送達
    Delivered,
}

/// 配送訂單
///
/// `quantity` 建立後不變；`remaining_quantity` 只能透過 [`Order::consume`] 遞減，
/// 永遠維持 `0 <= remaining_quantity <= quantity`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// 訂單ID
    pub id: Uuid,

    /// 外部訂單編號
    pub order_number: Option<String>,

    /// 配送區域（不透明的分組鍵）
    pub zone: String,

    /// 油品
    pub product: ProductId,

    /// 原始訂購量
    quantity: Decimal,

    /// 尚未裝載量
    remaining_quantity: Decimal,

    /// 訂單狀態
    pub status: OrderStatus,

    /// 優先級（1-5，5最高）
    pub priority: u8,
}

impl Order {
    /// 創建新的已付款訂單，負數量視為 0
    pub fn new(zone: impl Into<String>, product: ProductId, quantity: Decimal) -> Self {
        let quantity = quantity.max(Decimal::ZERO);
        Self {
            id: Uuid::new_v4(),
            order_number: None,
            zone: zone.into(),
            product,
            quantity,
            remaining_quantity: quantity,
            status: OrderStatus::Paid,
            priority: 3,
        }
    }

    /// 創建新的訂單，負數量回傳錯誤
    pub fn try_new(zone: impl Into<String>, product: ProductId, quantity: Decimal) -> Result<Self> {
        if quantity < Decimal::ZERO {
            return Err(FleetError::InvalidQuantity(format!(
                "訂單數量不可為負: {}",
                quantity
            )));
        }
        Ok(Self::new(zone, product, quantity))
    }

    /// 建構器模式：設置訂單ID（來自儲存層）
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// 建構器模式：設置外部訂單編號
    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    /// 建構器模式：設置狀態
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// 建構器模式：設置優先級
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(1, 5);
        self
    }

    /// 建構器模式：設置已部分裝載的剩餘量（限制在 0..=quantity）
    pub fn with_remaining_quantity(mut self, remaining: Decimal) -> Self {
        self.remaining_quantity = remaining.max(Decimal::ZERO).min(self.quantity);
        self
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn remaining_quantity(&self) -> Decimal {
        self.remaining_quantity
    }

    /// 已裝載量
    pub fn loaded_quantity(&self) -> Decimal {
        self.quantity - self.remaining_quantity
    }

    /// 扣減剩餘量，回傳實際扣減的數量（不超過剩餘量，負數視為 0）
    pub fn consume(&mut self, requested: Decimal) -> Decimal {
        let taken = requested.max(Decimal::ZERO).min(self.remaining_quantity);
        self.remaining_quantity -= taken;
        taken
    }

    /// 是否還有未裝載量
    pub fn has_remaining(&self) -> bool {
        self.remaining_quantity > Decimal::ZERO
    }

    /// 是否可參與排車：已付款且仍有剩餘量
    pub fn is_eligible(&self) -> bool {
        self.status == OrderStatus::Paid && self.has_remaining()
    }
}
