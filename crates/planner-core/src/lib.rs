//! # Planner Core
//!
//! 生產計劃報表的核心資料模型與類型定義

pub mod bom;
pub mod filters;
pub mod order;
pub mod procurement;
pub mod row;
pub mod stock;
pub mod warehouse;

// Re-export 主要類型
pub use bom::{Bom, BomCatalog, BomExplosionItem, BomItem};
pub use filters::ReportFilters;
pub use order::{
    DemandHeader, MaterialRequestLine, OrderKind, RawMaterialRequirement, RequirementQty,
    SalesOrderLine, SortOrder, WorkOrder, WorkOrderItem, WorkOrderStatus,
};
pub use procurement::{ProcurementDetail, ProcurementPipeline, PurchaseOrderLine};
pub use row::{scrub, Column, ColumnType, HeaderSection, OutputRow};
pub use stock::{StockLevels, StockSnapshot};
pub use warehouse::{WarehouseHierarchy, WarehouseNode};

/// 計劃報表錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("BOM 批量數量為零: {0}")]
    ZeroBomQuantity(String),

    #[error("無效的篩選條件: {0}")]
    InvalidFilters(String),

    #[error("計算錯誤: {0}")]
    CalculationError(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
