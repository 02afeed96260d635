//! 報表篩選條件

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{OrderKind, PlannerError, Result, SortOrder};

/// 報表篩選條件
///
/// 上游以 JSON 傳入（對應報表 UI 的 filter 欄位），
/// 也可在程式內直接建構。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFilters {
    /// 需求來源單別
    pub based_on: OrderKind,

    /// 排序方式
    #[serde(default)]
    pub order_by: Option<SortOrder>,

    /// 公司別
    #[serde(default)]
    pub company: Option<String>,

    /// 限定單號清單（空表示不限定）
    #[serde(default)]
    pub docnames: Vec<String>,

    /// 採購交易日期起
    #[serde(default)]
    pub from_date: Option<NaiveDate>,

    /// 採購交易日期迄
    #[serde(default)]
    pub to_date: Option<NaiveDate>,

    /// 原物料倉庫範圍（設定時以其全部下層倉庫為分配候選）
    #[serde(default)]
    pub raw_material_warehouse: Option<String>,

    /// BOM 展開時是否含子裝配件原物料
    #[serde(default)]
    pub include_subassembly_raw_materials: bool,

    /// 物料需求草稿的需求日
    #[serde(default)]
    pub schedule_date: Option<NaiveDate>,
}

impl ReportFilters {
    /// 創建指定單別的預設篩選條件
    pub fn new(based_on: OrderKind) -> Self {
        Self {
            based_on,
            order_by: None,
            company: None,
            docnames: Vec::new(),
            from_date: None,
            to_date: None,
            raw_material_warehouse: None,
            include_subassembly_raw_materials: false,
            schedule_date: None,
        }
    }

    /// 建構器模式：設置排序方式
    pub fn with_order_by(mut self, order_by: SortOrder) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// 建構器模式：設置公司別
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// 建構器模式：限定單號
    pub fn with_docnames(mut self, docnames: Vec<String>) -> Self {
        self.docnames = docnames;
        self
    }

    /// 建構器模式：設置原物料倉庫範圍
    pub fn with_raw_material_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.raw_material_warehouse = Some(warehouse.into());
        self
    }

    /// 建構器模式：BOM 展開含子裝配件
    pub fn with_subassembly_raw_materials(mut self) -> Self {
        self.include_subassembly_raw_materials = true;
        self
    }

    /// 從 JSON 字串解析篩選條件
    pub fn from_json(payload: &str) -> Result<Self> {
        serde_json::from_str(payload).map_err(|e| PlannerError::InvalidFilters(e.to_string()))
    }
}
