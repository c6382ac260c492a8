//! 訂單組合搜尋
//!
//! 在單一油品的訂單中，找出最能填滿指定容量、且不超過容量的訂單子集。
//! 子集大小上限是效能界限：窮舉成本為 `O(n choose k)`，k 越小越能保證執行時間。

use fleet_core::{percentage, Order, ProductId};
use rust_decimal::Decimal;
use uuid::Uuid;

/// 組合中的單張訂單與其貢獻量
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub order_id: Uuid,
    /// 貢獻量，最後一張可能只取部分
    pub volume: Decimal,
}

/// 訂單組合
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCombination {
    pub picks: Vec<Pick>,
    pub total_volume: Decimal,
    /// 填充率（%）
    pub fill_percentage: Decimal,
}

impl OrderCombination {
    /// 空組合
    pub fn empty() -> Self {
        Self {
            picks: Vec::new(),
            total_volume: Decimal::ZERO,
            fill_percentage: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn order_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.picks.iter().map(|p| p.order_id)
    }

    fn from_picks(picks: Vec<Pick>, total_volume: Decimal, capacity: Decimal) -> Self {
        Self {
            picks,
            total_volume,
            fill_percentage: percentage(total_volume, capacity),
        }
    }
}

/// 候選訂單（ID, 剩餘量）
#[derive(Debug, Clone, Copy)]
struct Candidate {
    order_id: Uuid,
    remaining: Decimal,
}

/// 有界回溯的組合搜尋
#[derive(Debug, Clone, Copy)]
pub struct CombinationSearch {
    max_size: usize,
}

impl CombinationSearch {
    pub const DEFAULT_MAX_SIZE: usize = 4;

    /// `max_size` 為組合的訂單數上限，0 視為 1
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size: max_size.max(1),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// 找出指定油品的最佳填充組合
    ///
    /// 只考慮該油品且仍有剩餘量的訂單。任一訂單剩餘量大於等於容量時直接取該單
    /// （填充率 100%，只取容量部分）；否則依剩餘量由大到小，從 1 張到 `max_size`
    /// 張逐一窮舉，找到 100% 即停止。
    pub fn find_optimal_combination<'a, I>(
        &self,
        orders: I,
        capacity: Decimal,
        product: &ProductId,
    ) -> OrderCombination
    where
        I: IntoIterator<Item = &'a Order>,
    {
        if capacity <= Decimal::ZERO {
            return OrderCombination::empty();
        }

        let mut candidates: Vec<Candidate> = orders
            .into_iter()
            .filter(|o| &o.product == product && o.has_remaining())
            .map(|o| Candidate {
                order_id: o.id,
                remaining: o.remaining_quantity(),
            })
            .collect();

        if candidates.is_empty() {
            return OrderCombination::empty();
        }

        // 單張訂單即可裝滿（超出部分留在訂單上）
        if let Some(single) = candidates.iter().find(|c| c.remaining >= capacity) {
            return OrderCombination::from_picks(
                vec![Pick {
                    order_id: single.order_id,
                    volume: capacity,
                }],
                capacity,
                capacity,
            );
        }

        // 穩定排序，同量維持輸入順序
        candidates.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let largest_size = self.max_size.min(candidates.len());
        let mut best = OrderCombination::empty();

        for size in 1..=largest_size {
            let mut search = SizedSearch::new(&candidates, capacity, size);
            search.run();

            if let Some((picks, volume)) = search.best {
                if volume > best.total_volume {
                    best = OrderCombination::from_picks(picks, volume, capacity);
                }
            }

            if best.total_volume == capacity {
                break;
            }
        }

        tracing::trace!(
            "組合搜尋 {}: 容量 {}, 候選 {} 筆, 最佳 {} ({} 張)",
            product,
            capacity,
            candidates.len(),
            best.total_volume,
            best.picks.len()
        );

        best
    }
}

impl Default for CombinationSearch {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SIZE)
    }
}

/// 固定大小的子集回溯
struct SizedSearch<'c> {
    candidates: &'c [Candidate],
    capacity: Decimal,
    size: usize,
    current: Vec<Pick>,
    best: Option<(Vec<Pick>, Decimal)>,
}

impl<'c> SizedSearch<'c> {
    fn new(candidates: &'c [Candidate], capacity: Decimal, size: usize) -> Self {
        Self {
            candidates,
            capacity,
            size,
            current: Vec::with_capacity(size),
            best: None,
        }
    }

    fn run(&mut self) {
        self.search(0, Decimal::ZERO);
    }

    fn best_volume(&self) -> Decimal {
        self.best.as_ref().map(|(_, v)| *v).unwrap_or(Decimal::ZERO)
    }

    fn is_complete(&self) -> bool {
        self.best_volume() == self.capacity
    }

    fn search(&mut self, start: usize, volume: Decimal) {
        let slots = self.size - self.current.len();
        if slots == 0 {
            if volume > self.best_volume() {
                self.best = Some((self.current.clone(), volume));
            }
            return;
        }

        for i in start..self.candidates.len() {
            if self.is_complete() || self.candidates.len() - i < slots {
                return;
            }

            // 候選已排序，往後的上界只會更小；無法嚴格勝過目前最佳時剪枝
            let upper: Decimal = self.candidates[i..i + slots]
                .iter()
                .map(|c| c.remaining)
                .sum();
            if (volume + upper).min(self.capacity) <= self.best_volume() {
                return;
            }

            let candidate = self.candidates[i];
            let taken = candidate.remaining.min(self.capacity - volume);
            if taken <= Decimal::ZERO {
                return;
            }

            self.current.push(Pick {
                order_id: candidate.order_id,
                volume: taken,
            });
            self.search(i + 1, volume + taken);
            self.current.pop();
        }
    }
}
