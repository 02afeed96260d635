//! 庫存快照模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 分倉庫存量（Bin）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevels {
    /// 實際庫存
    pub actual_qty: Decimal,

    /// 已訂購量
    pub ordered_qty: Decimal,

    /// 預計庫存
    pub projected_qty: Decimal,
}

impl StockLevels {
    /// 創建新的分倉庫存量
    pub fn new(actual_qty: Decimal, ordered_qty: Decimal, projected_qty: Decimal) -> Self {
        Self {
            actual_qty,
            ordered_qty,
            projected_qty,
        }
    }
}

/// 庫存快照：(品項, 倉庫) → 分倉庫存量
///
/// 報表執行開始時一次載入全部倉庫的分倉資料（不過濾倉庫），
/// 之後僅讀取與就地扣減，不新增也不刪除。負值與零值照實保存。
#[derive(Debug, Clone, Default)]
pub struct StockSnapshot {
    bins: HashMap<(String, String), StockLevels>,
}

impl StockSnapshot {
    /// 從分倉列建立快照
    pub fn new(rows: Vec<(String, String, StockLevels)>) -> Self {
        let mut bins = HashMap::new();
        for (item_code, warehouse, levels) in rows {
            bins.entry((item_code, warehouse)).or_insert(levels);
        }
        Self { bins }
    }

    /// 查找分倉庫存
    pub fn lookup(&self, item_code: &str, warehouse: &str) -> Option<&StockLevels> {
        self.bins
            .get(&(item_code.to_string(), warehouse.to_string()))
    }

    /// 扣減實際庫存
    ///
    /// 呼叫端保證 `amount` 不超過該分倉當前的 actual_qty
    /// （分配引擎以 min(需求, 可用) 計算後才呼叫）。
    pub fn consume(&mut self, item_code: &str, warehouse: &str, amount: Decimal) {
        if let Some(levels) = self
            .bins
            .get_mut(&(item_code.to_string(), warehouse.to_string()))
        {
            levels.actual_qty -= amount;
        }
    }

    /// 迭代全部分倉資料（供上層倉庫彙總使用）
    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &StockLevels)> {
        self.bins.iter()
    }

    /// 快照中出現過的全部倉庫
    pub fn warehouses(&self) -> impl Iterator<Item = &str> {
        self.bins.keys().map(|(_, warehouse)| warehouse.as_str())
    }

    /// 分倉筆數
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// 是否為空
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}
