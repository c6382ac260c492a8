//! 油品代碼

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{FleetError, Result};

/// 油品代碼
///
/// 油品清單來自外部匯入資料，執行期才會知道有哪些油品，因此不使用封閉的 enum。
/// 優化器只做原樣比對；大小寫與空白的正規化在匯入端呼叫 [`ProductId::canonicalize`]。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// 創建油品代碼（不可為空白）
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(FleetError::InvalidProduct(raw));
        }
        Ok(Self(raw))
    }

    /// 匯入端的正規化：去頭尾空白、轉大寫、空白與連字號合併為底線
    ///
    /// # 範例
    /// ```
    /// # use fleet_core::ProductId;
    /// let product = ProductId::canonicalize(" heating  oil ").unwrap();
    /// assert_eq!(product.as_str(), "HEATING_OIL");
    /// ```
    pub fn canonicalize(raw: &str) -> Result<Self> {
        let canonical = raw
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .map(str::to_uppercase)
            .collect::<Vec<_>>()
            .join("_");

        if canonical.is_empty() {
            return Err(FleetError::InvalidProduct(raw.to_string()));
        }
        Ok(Self(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProductId {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = FleetError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(product: ProductId) -> Self {
        product.0
    }
}
