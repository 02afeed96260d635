//! 報表主流程

use std::collections::HashMap;

use planner_core::{
    BomCatalog, MaterialRequestLine, ProcurementPipeline, PurchaseOrderLine, ReportFilters,
    Result, SalesOrderLine, StockLevels, StockSnapshot, WarehouseHierarchy, WarehouseNode,
    WorkOrder,
};

use crate::{
    allocation::AllocationEngine, collector::DemandCollector, columns::build_columns,
    enrichment, enrichment::RollupTable, ReportOutput,
};

/// 外部協作者提供的完整輸入資料集
///
/// engine 本身不碰儲存層：單據、BOM、分倉、採購明細與
/// 倉庫目錄都由呼叫端預先載入。
#[derive(Debug, Clone, Default)]
pub struct ReportSources {
    /// 生產工單
    pub work_orders: Vec<WorkOrder>,

    /// 銷售訂單明細行
    pub sales_order_lines: Vec<SalesOrderLine>,

    /// 物料需求單明細行
    pub material_request_lines: Vec<MaterialRequestLine>,

    /// BOM 目錄（含品項預設 BOM）
    pub bom_catalog: BomCatalog,

    /// 全部分倉列 (品項, 倉庫, 庫存量)，不過濾倉庫
    pub stock_bins: Vec<(String, String, StockLevels)>,

    /// 採購訂單明細行
    pub purchase_order_lines: Vec<PurchaseOrderLine>,

    /// 完整倉庫目錄（全部倉庫，不限於單據觸及者）
    pub warehouse_catalog: Vec<WarehouseNode>,

    /// 品項預設倉庫（呼叫端已依公司別篩選）
    pub default_warehouses: HashMap<String, String>,
}

/// 生產計劃報表
///
/// 回答：一組開放單據需要哪些原物料、庫存可供多少、
/// 採購在途多少、每個品項與倉庫群的淨缺口為何。
pub struct ProductionPlanReport {
    filters: ReportFilters,
}

impl ProductionPlanReport {
    /// 創建新的報表計算
    pub fn new(filters: ReportFilters) -> Self {
        Self { filters }
    }

    /// 執行報表：收集 → 分配 → 彙總豐富化 → 欄位定義
    pub fn execute(&self, sources: &ReportSources) -> Result<ReportOutput> {
        tracing::info!(
            "開始生產計劃報表：工單 {} 筆，銷售明細 {} 筆，需求明細 {} 筆，分倉 {} 筆",
            sources.work_orders.len(),
            sources.sales_order_lines.len(),
            sources.material_request_lines.len(),
            sources.stock_bins.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 收集開放單據與原物料需求
        tracing::debug!("Step 1: 需求收集");
        let collected = DemandCollector::collect(&self.filters, sources)?;
        tracing::debug!("需求表頭: {} 筆", collected.headers.len());

        // Step 2: 建立執行期索引
        tracing::debug!("Step 2: 建立倉庫階層 / 庫存快照 / 採購在途索引");
        let hierarchy = WarehouseHierarchy::build(&sources.warehouse_catalog);
        let mut snapshot = StockSnapshot::new(sources.stock_bins.clone());
        let pipeline = ProcurementPipeline::build(
            &sources.purchase_order_lines,
            self.filters.company.as_deref(),
            self.filters.from_date,
            self.filters.to_date,
        );
        tracing::debug!("彙總根: {:?}", hierarchy.roots());

        // Step 3: 逐表頭分配庫存
        tracing::debug!("Step 3: 庫存分配");
        let mut rows = Vec::new();
        {
            let mut engine = AllocationEngine::new(
                &hierarchy,
                &mut snapshot,
                &pipeline,
                &sources.default_warehouses,
                self.filters.raw_material_warehouse.as_deref(),
            );

            for header in &collected.headers {
                let Some(key) = header.requirement_key() else {
                    continue;
                };
                let Some(requirements) = collected.raw_materials_for(key) else {
                    // 無原物料需求列（如 BOM 不存在）：整筆不產生輸出
                    continue;
                };
                engine.allocate(header, requirements, &mut rows);
            }
        }

        // Step 4: 彙總與豐富化（以扣減後的快照計算，每品項一次）
        tracing::debug!("Step 4: 上層倉庫彙總與豐富化");
        let rollup = RollupTable::build(&snapshot, &hierarchy);
        enrichment::enrich_rows(&mut rows, &rollup, &pipeline);

        // Step 5: 欄位定義
        tracing::debug!("Step 5: 欄位定義");
        let columns = build_columns(&self.filters, hierarchy.roots());

        tracing::info!(
            "報表完成：{} 列，耗時 {:?}",
            rows.len(),
            start_time.elapsed()
        );

        Ok(ReportOutput { columns, rows })
    }
}
