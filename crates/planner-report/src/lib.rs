//! # Planner Report
//!
//! 生產計劃報表計算引擎：
//! 收集開放單據 → 展開原物料需求 → 跨倉庫分配庫存 →
//! 上層倉庫彙總與在途量豐富化 → 產出平面報表列。

pub mod allocation;
pub mod collector;
pub mod columns;
pub mod enrichment;
pub mod proposer;
pub mod report;

// Re-export 主要類型
pub use allocation::AllocationEngine;
pub use collector::{CollectedDemand, DemandCollector};
pub use enrichment::RollupTable;
pub use proposer::{MaterialRequestItem, MaterialRequestProposer};
pub use report::{ProductionPlanReport, ReportSources};

use planner_core::{Column, OutputRow};

/// 報表計算結果
#[derive(Debug, Clone)]
pub struct ReportOutput {
    /// 欄位定義（依單別與排序方式而異，結尾為各彙總根欄位、在途量與缺口）
    pub columns: Vec<Column>,

    /// 報表列
    pub rows: Vec<OutputRow>,
}

impl ReportOutput {
    /// 創建空的計算結果
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}
