//! # Planner
//!
//! 生產計劃報表引擎：彙整各 crate 的公開介面。
//!
//! - [`planner_core`]：資料模型（需求表頭、分倉庫存、採購在途、倉庫階層、輸出列）
//! - [`planner_report`]：計算流程（收集、分配、彙總豐富化、草稿建議）

pub use planner_core::{
    Bom, BomCatalog, BomExplosionItem, BomItem, Column, ColumnType, DemandHeader, HeaderSection,
    MaterialRequestLine, OrderKind, OutputRow, PlannerError, ProcurementDetail,
    ProcurementPipeline, PurchaseOrderLine, RawMaterialRequirement, ReportFilters,
    RequirementQty, Result, SalesOrderLine, SortOrder, StockLevels, StockSnapshot,
    WarehouseHierarchy, WarehouseNode, WorkOrder, WorkOrderItem, WorkOrderStatus,
};
pub use planner_report::{
    MaterialRequestItem, MaterialRequestProposer, ProductionPlanReport, ReportOutput,
    ReportSources,
};
