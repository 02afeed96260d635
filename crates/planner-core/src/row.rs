//! 報表輸出列與欄位定義

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ProcurementDetail, StockLevels};

/// 表頭欄位區段：每筆需求表頭只掛在其第一列輸出上
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSection {
    /// 單號
    pub name: String,

    /// 目標品項代碼
    pub item_code: String,

    /// 目標品項名稱
    pub item_name: String,

    /// 需求數量
    pub order_qty: Decimal,

    /// 目標倉庫現有可撥數量（成品庫存，收集時已扣減）
    pub available_qty: Decimal,

    /// 排序日期（開工日 / 交貨日 / 需求日）
    pub order_date: Option<NaiveDate>,

    /// 訂單總額（銷售訂單）
    pub total_amount: Option<Decimal>,
}

/// 報表輸出列：每個分配決策產生一列，加入後不再修改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRow {
    /// 表頭欄位（僅該表頭的第一列攜帶）
    pub header: Option<HeaderSection>,

    /// 原物料代碼
    pub item_code: String,

    /// 原物料名稱
    pub item_name: String,

    /// 需求數量
    pub required_qty: Decimal,

    /// 本列自倉庫撥出的數量
    pub allotted_qty: Decimal,

    /// 分配後剩餘數量
    pub remaining_qty: Decimal,

    /// 本列對應的倉庫
    pub warehouse: String,

    /// 命中的分倉庫存（扣減前的快照值）
    pub stock: Option<StockLevels>,

    /// 命中的 (品項, 倉庫) 採購在途明細
    pub purchase: Option<ProcurementDetail>,

    /// 各彙總根的庫存欄位
    pub rollup: BTreeMap<String, Decimal>,

    /// 品項在途總量
    pub pipeline_qty: Decimal,

    /// 缺口 = 需求 − Σ彙總根 − 在途總量（負值照實保留）
    pub balance: Decimal,

    /// 品項最早到貨日
    pub arrival_date: Option<NaiveDate>,
}

impl OutputRow {
    /// 創建新的輸出列（豐富化欄位由後續階段填入）
    pub fn new(
        item_code: String,
        item_name: String,
        required_qty: Decimal,
        allotted_qty: Decimal,
        remaining_qty: Decimal,
        warehouse: String,
    ) -> Self {
        Self {
            header: None,
            item_code,
            item_name,
            required_qty,
            allotted_qty,
            remaining_qty,
            warehouse,
            stock: None,
            purchase: None,
            rollup: BTreeMap::new(),
            pipeline_qty: Decimal::ZERO,
            balance: Decimal::ZERO,
            arrival_date: None,
        }
    }

    /// 建構器模式：設置表頭區段
    pub fn with_header(mut self, header: HeaderSection) -> Self {
        self.header = Some(header);
        self
    }

    /// 建構器模式：設置命中的分倉庫存
    pub fn with_stock(mut self, stock: StockLevels) -> Self {
        self.stock = Some(stock);
        self
    }

    /// 建構器模式：設置採購在途明細
    pub fn with_purchase(mut self, purchase: ProcurementDetail) -> Self {
        self.purchase = Some(purchase);
        self
    }
}

/// 欄位型別標記
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Link,
    Data,
    Float,
    Currency,
    Date,
}

/// 報表欄位定義
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// 顯示標籤
    pub label: String,

    /// 欄位鍵
    pub fieldname: String,

    /// 型別標記
    pub column_type: ColumnType,

    /// 顯示寬度
    pub width: u32,

    /// 連結目標（Link 型別）
    pub options: Option<String>,
}

impl Column {
    /// 創建新的欄位定義
    pub fn new(
        label: impl Into<String>,
        fieldname: impl Into<String>,
        column_type: ColumnType,
        width: u32,
    ) -> Self {
        Self {
            label: label.into(),
            fieldname: fieldname.into(),
            column_type,
            width,
            options: None,
        }
    }

    /// 建構器模式：設置連結目標
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }
}

/// 將標籤轉為欄位鍵：小寫、連續非英數字元合併為單一底線
pub fn scrub(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_was_sep = false;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep && !out.is_empty() {
            out.push('_');
            last_was_sep = true;
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_fieldnames() {
        assert_eq!(scrub("Stores - C_qty"), "stores_c_qty");
        assert_eq!(scrub("All Warehouses - AITS"), "all_warehouses_aits");
        assert_eq!(scrub("WH-B1"), "wh_b1");
    }

    #[test]
    fn test_new_row_has_no_header() {
        let row = OutputRow::new(
            "RM-100".to_string(),
            "Steel".to_string(),
            Decimal::from(80),
            Decimal::from(50),
            Decimal::from(30),
            "WH-A".to_string(),
        );

        assert!(row.header.is_none());
        assert!(row.rollup.is_empty());
        assert_eq!(row.balance, Decimal::ZERO);
    }
}
