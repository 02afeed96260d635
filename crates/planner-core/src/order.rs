//! 訂單與需求模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 需求來源單別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// 生產工單
    WorkOrder,
    /// 銷售訂單
    SalesOrder,
    /// 物料需求單
    MaterialRequest,
}

/// 報表排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// 計劃開工日（工單）
    PlannedStartDate,
    /// 交貨日（銷售訂單）
    DeliveryDate,
    /// 需求日（物料需求單）
    RequiredDate,
    /// 訂單總額，由大到小（銷售訂單）
    TotalAmount,
}

/// 工單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    NotStarted,
    InProcess,
    Completed,
    Stopped,
    Closed,
}

impl WorkOrderStatus {
    /// 檢查是否為終結狀態（不再產生需求）
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Closed)
    }
}

/// 工單用料明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderItem {
    /// 原物料代碼
    pub item_code: String,

    /// 原物料名稱
    pub item_name: String,

    /// 來源倉庫
    pub source_warehouse: Option<String>,

    /// 需求數量（絕對值）
    pub required_qty: Decimal,
}

/// 生產工單（外部系統提供的開放單據）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    /// 單號
    pub name: String,

    /// 生產品項
    pub production_item: String,

    /// 品項名稱
    pub item_name: String,

    /// 生產數量
    pub qty: Decimal,

    /// 成品倉庫
    pub fg_warehouse: String,

    /// 計劃開工日
    pub planned_start_date: Option<NaiveDate>,

    /// BOM 編號
    pub bom_no: Option<String>,

    /// 工單狀態
    pub status: WorkOrderStatus,

    /// 是否已提交（docstatus = 1）
    pub submitted: bool,

    /// 用料明細
    pub required_items: Vec<WorkOrderItem>,
}

/// 銷售訂單明細行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderLine {
    /// 訂單單號
    pub order_name: String,

    /// 品項代碼
    pub item_code: String,

    /// 品項名稱
    pub item_name: String,

    /// 指定 BOM（若無則使用品項預設 BOM）
    pub bom_no: Option<String>,

    /// 庫存單位數量
    pub stock_qty: Decimal,

    /// 已投產數量
    pub produced_qty: Decimal,

    /// 目標倉庫
    pub warehouse: String,

    /// 交貨日
    pub delivery_date: Option<NaiveDate>,

    /// 訂單總額
    pub base_grand_total: Decimal,

    /// 已交貨百分比
    pub per_delivered: Decimal,

    /// 訂單狀態
    pub status: String,

    /// 是否已提交
    pub submitted: bool,
}

impl SalesOrderLine {
    /// 檢查是否為開放明細行
    pub fn is_open(&self) -> bool {
        self.submitted
            && self.stock_qty > self.produced_qty
            && self.per_delivered < Decimal::from(100)
            && self.status != "Completed"
            && self.status != "Closed"
    }
}

/// 物料需求單明細行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequestLine {
    /// 需求單單號
    pub request_name: String,

    /// 品項代碼
    pub item_code: String,

    /// 品項名稱
    pub item_name: String,

    /// 指定 BOM
    pub bom_no: Option<String>,

    /// 庫存單位數量
    pub stock_qty: Decimal,

    /// 目標倉庫
    pub warehouse: String,

    /// 需求日
    pub schedule_date: Option<NaiveDate>,

    /// 已下單百分比
    pub per_ordered: Decimal,

    /// 需求類型（僅 Manufacture 納入報表）
    pub request_type: String,

    /// 是否已停止
    pub stopped: bool,

    /// 是否已提交
    pub submitted: bool,
}

impl MaterialRequestLine {
    /// 檢查是否為開放明細行
    pub fn is_open(&self) -> bool {
        self.submitted
            && !self.stopped
            && self.per_ordered < Decimal::from(100)
            && self.request_type == "Manufacture"
    }
}

/// 需求表頭：一筆需要原物料的開放單據行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandHeader {
    /// 執行期內部ID
    pub id: Uuid,

    /// 來源單別
    pub kind: OrderKind,

    /// 單號
    pub name: String,

    /// 目標品項代碼
    pub item_code: String,

    /// 目標品項名稱
    pub item_name: String,

    /// 目標倉庫
    pub warehouse: String,

    /// 需求數量
    pub order_qty: Decimal,

    /// 排序日期（開工日 / 交貨日 / 需求日）
    pub order_date: Option<NaiveDate>,

    /// 訂單總額（銷售訂單）
    pub total_amount: Option<Decimal>,

    /// BOM 編號（收集時若缺則以品項預設 BOM 補上）
    pub bom_no: Option<String>,
}

impl DemandHeader {
    /// 創建新的需求表頭
    pub fn new(
        kind: OrderKind,
        name: String,
        item_code: String,
        item_name: String,
        warehouse: String,
        order_qty: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name,
            item_code,
            item_name,
            warehouse,
            order_qty,
            order_date: None,
            total_amount: None,
            bom_no: None,
        }
    }

    /// 建構器模式：設置排序日期
    pub fn with_order_date(mut self, date: NaiveDate) -> Self {
        self.order_date = Some(date);
        self
    }

    /// 建構器模式：設置訂單總額
    pub fn with_total_amount(mut self, amount: Decimal) -> Self {
        self.total_amount = Some(amount);
        self
    }

    /// 建構器模式：設置 BOM 編號
    pub fn with_bom_no(mut self, bom_no: String) -> Self {
        self.bom_no = Some(bom_no);
        self
    }

    /// 原物料索引鍵：工單用單號，其餘用 BOM 編號
    pub fn requirement_key(&self) -> Option<&str> {
        match self.kind {
            OrderKind::WorkOrder => Some(&self.name),
            _ => self.bom_no.as_deref(),
        }
    }
}

/// 需求數量表示方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequirementQty {
    /// 絕對需求數量（工單用料）
    Absolute(Decimal),
    /// 單位用量比例（BOM 展開，乘以表頭數量）
    PerUnit(Decimal),
}

/// 原物料需求：滿足一筆需求表頭所需的單一原物料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMaterialRequirement {
    /// 所屬索引鍵（工單單號或 BOM 編號）
    pub owner_key: String,

    /// 原物料代碼
    pub item_code: String,

    /// 原物料名稱
    pub item_name: String,

    /// 需求數量
    pub qty: RequirementQty,

    /// 指定來源倉庫（工單用料）
    pub source_warehouse: Option<String>,
}

impl RawMaterialRequirement {
    /// 解析本需求於指定表頭數量下的需求量
    pub fn required_for(&self, order_qty: Decimal) -> Decimal {
        match self.qty {
            RequirementQty::Absolute(qty) => qty,
            RequirementQty::PerUnit(ratio) => ratio * order_qty,
        }
    }
}
