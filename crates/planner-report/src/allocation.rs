//! 庫存分配引擎
//!
//! 逐筆需求表頭依序處理其原物料需求列，沿倉庫候選清單
//! 貪婪撥料並就地扣減庫存快照，每個分配決策產生一列輸出。

use std::collections::HashMap;

use rust_decimal::Decimal;

use planner_core::{
    DemandHeader, HeaderSection, OrderKind, OutputRow, ProcurementPipeline,
    RawMaterialRequirement, StockSnapshot, WarehouseHierarchy,
};

/// 原物料倉庫範圍：範圍倉庫本身與其全部下層倉庫
#[derive(Debug, Clone)]
struct ScopeWarehouses {
    name: String,
    candidates: Vec<String>,
}

/// 單一需求列的分配狀態
#[derive(Debug, Clone)]
struct AllocationState {
    required_qty: Decimal,
    remaining_qty: Decimal,
}

impl AllocationState {
    fn new(required_qty: Decimal) -> Self {
        Self {
            required_qty,
            remaining_qty: required_qty,
        }
    }

    /// 撥出數量，扣減剩餘。remaining_qty 只減不增。
    fn allot(&mut self, qty: Decimal) {
        self.remaining_qty -= qty;
    }
}

/// 庫存分配引擎
pub struct AllocationEngine<'a> {
    hierarchy: &'a WarehouseHierarchy,
    snapshot: &'a mut StockSnapshot,
    pipeline: &'a ProcurementPipeline,
    default_warehouses: &'a HashMap<String, String>,
    scope: Option<ScopeWarehouses>,
}

impl<'a> AllocationEngine<'a> {
    /// 創建新的分配引擎
    ///
    /// * `raw_material_warehouse` - 設定時，所有需求列的候選倉庫
    ///   一律為該範圍的下層倉庫（最高優先，覆蓋其他規則）
    pub fn new(
        hierarchy: &'a WarehouseHierarchy,
        snapshot: &'a mut StockSnapshot,
        pipeline: &'a ProcurementPipeline,
        default_warehouses: &'a HashMap<String, String>,
        raw_material_warehouse: Option<&str>,
    ) -> Self {
        let scope = raw_material_warehouse.map(|name| ScopeWarehouses {
            name: name.to_string(),
            candidates: hierarchy.descendants(name),
        });

        Self {
            hierarchy,
            snapshot,
            pipeline,
            default_warehouses,
            scope,
        }
    }

    /// 處理一筆需求表頭：分配其全部原物料需求列並追加輸出列
    pub fn allocate(
        &mut self,
        header: &DemandHeader,
        requirements: &[RawMaterialRequirement],
        rows: &mut Vec<OutputRow>,
    ) {
        let section = self.build_header_section(header);
        let mut header_emitted = false;

        for rm in requirements {
            let mut state = AllocationState::new(rm.required_for(header.order_qty));
            let candidates = self.candidate_warehouses(header, rm);

            for (index, warehouse) in candidates.iter().enumerate() {
                if state.remaining_qty <= Decimal::ZERO {
                    break;
                }

                // 扣減前的分倉快照值掛到輸出列上
                let stock_before = self.snapshot.lookup(&rm.item_code, warehouse).cloned();

                let mut allotted = Decimal::ZERO;
                if let Some(stock) = &stock_before {
                    if stock.actual_qty > Decimal::ZERO {
                        allotted = state.remaining_qty.min(stock.actual_qty);
                        state.allot(allotted);
                        self.snapshot.consume(&rm.item_code, warehouse, allotted);
                    }
                }

                // 範圍掃描時略過中間的空列，但保證每列需求至少產生一列
                let is_last = index == candidates.len() - 1;
                let emit = self.scope.is_none() || allotted > Decimal::ZERO || is_last;
                if !emit {
                    continue;
                }

                let mut row = OutputRow::new(
                    rm.item_code.clone(),
                    rm.item_name.clone(),
                    state.required_qty,
                    allotted,
                    state.remaining_qty,
                    warehouse.clone(),
                );
                if let Some(stock) = stock_before {
                    row = row.with_stock(stock);
                }
                if let Some(detail) = self.pipeline.detail(&rm.item_code, warehouse) {
                    row = row.with_purchase(detail.clone());
                }
                if !header_emitted {
                    row = row.with_header(section.clone());
                    header_emitted = true;
                }
                rows.push(row);
            }

            // 範圍倉庫下有部分撥料時，補一列未滿足餘量歸屬範圍倉庫本身
            if let Some(scope) = &self.scope {
                if state.remaining_qty > Decimal::ZERO
                    && state.remaining_qty != state.required_qty
                {
                    let mut row = OutputRow::new(
                        rm.item_code.clone(),
                        rm.item_name.clone(),
                        state.remaining_qty,
                        Decimal::ZERO,
                        state.remaining_qty,
                        scope.name.clone(),
                    );
                    if !header_emitted {
                        row = row.with_header(section.clone());
                        header_emitted = true;
                    }
                    rows.push(row);
                }
            }
        }
    }

    /// 建立表頭區段，並自目標倉庫撥出成品現貨
    fn build_header_section(&mut self, header: &DemandHeader) -> HeaderSection {
        let mut available_qty = Decimal::ZERO;
        if let Some(stock) = self.snapshot.lookup(&header.item_code, &header.warehouse) {
            if stock.actual_qty > Decimal::ZERO {
                available_qty = header.order_qty.min(stock.actual_qty);
            }
        }
        if available_qty > Decimal::ZERO {
            self.snapshot
                .consume(&header.item_code, &header.warehouse, available_qty);
        }

        HeaderSection {
            name: header.name.clone(),
            item_code: header.item_code.clone(),
            item_name: header.item_name.clone(),
            order_qty: header.order_qty,
            available_qty,
            order_date: header.order_date,
            total_amount: header.total_amount,
        }
    }

    /// 倉庫候選清單規則表，由上而下取第一條成立者：
    /// 1. 原物料倉庫範圍 → 其下層倉庫
    /// 2. 工單且需求列指定來源倉庫 → 該倉庫
    /// 3. 品項設有預設倉庫 → 該倉庫
    /// 4. 需求表頭的目標倉庫
    fn candidate_warehouses(
        &self,
        header: &DemandHeader,
        rm: &RawMaterialRequirement,
    ) -> Vec<String> {
        if let Some(scope) = &self.scope {
            return scope.candidates.clone();
        }

        if header.kind == OrderKind::WorkOrder {
            if let Some(warehouse) = rm.source_warehouse.as_deref().filter(|w| !w.is_empty()) {
                return vec![warehouse.to_string()];
            }
        }

        if let Some(default) = self.default_warehouses.get(&rm.item_code) {
            return vec![default.clone()];
        }

        vec![header.warehouse.clone()]
    }

    /// 全部彙總根（供欄位建構使用）
    pub fn roots(&self) -> &[String] {
        self.hierarchy.roots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{RequirementQty, StockLevels, WarehouseNode};

    fn hierarchy() -> WarehouseHierarchy {
        WarehouseHierarchy::build(&[
            WarehouseNode::new("Stores - C", None),
            WarehouseNode::new("WH-A", Some("Stores - C")),
            WarehouseNode::new("WH-B1", Some("Stores - C")),
            WarehouseNode::new("WH-B2", Some("Stores - C")),
        ])
    }

    fn snapshot(bins: Vec<(&str, &str, i64)>) -> StockSnapshot {
        StockSnapshot::new(
            bins.into_iter()
                .map(|(item, wh, qty)| {
                    (
                        item.to_string(),
                        wh.to_string(),
                        StockLevels::new(Decimal::from(qty), Decimal::ZERO, Decimal::from(qty)),
                    )
                })
                .collect(),
        )
    }

    fn header(warehouse: &str, order_qty: i64) -> DemandHeader {
        DemandHeader::new(
            OrderKind::MaterialRequest,
            "MR-0001".to_string(),
            "FG-001".to_string(),
            "Finished Good".to_string(),
            warehouse.to_string(),
            Decimal::from(order_qty),
        )
        .with_bom_no("BOM-FG-001".to_string())
    }

    fn requirement(item: &str, per_unit: i64) -> RawMaterialRequirement {
        RawMaterialRequirement {
            owner_key: "BOM-FG-001".to_string(),
            item_code: item.to_string(),
            item_name: item.to_string(),
            qty: RequirementQty::PerUnit(Decimal::from(per_unit)),
            source_warehouse: None,
        }
    }

    #[test]
    fn test_partial_allocation_single_candidate() {
        // RM-100 於 WH-A 有 50，需求 80：一列，撥 50 剩 30，無補列
        let h = hierarchy();
        let mut snap = snapshot(vec![("RM-100", "WH-A", 50)]);
        let pipeline = ProcurementPipeline::default();
        let mut defaults = HashMap::new();
        defaults.insert("RM-100".to_string(), "WH-A".to_string());

        let mut engine = AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, None);
        let mut rows = Vec::new();
        engine.allocate(&header("WH-A", 80), &[requirement("RM-100", 1)], &mut rows);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].required_qty, Decimal::from(80));
        assert_eq!(rows[0].allotted_qty, Decimal::from(50));
        assert_eq!(rows[0].remaining_qty, Decimal::from(30));
        assert_eq!(rows[0].warehouse, "WH-A");

        // 快照已扣減
        assert_eq!(
            snap.lookup("RM-100", "WH-A").unwrap().actual_qty,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_scope_scan_with_fallback_row() {
        // 範圍下層 [WH-B1=20, WH-B2=0]，需求 50：
        // WH-B1 撥 20、WH-B2 以末位候選身份產生空列、補範圍餘量列 30
        let h = hierarchy();
        let mut snap = snapshot(vec![
            ("RM-200", "WH-B1", 20),
            ("RM-200", "WH-B2", 0),
        ]);
        let pipeline = ProcurementPipeline::default();
        let defaults = HashMap::new();

        let mut engine =
            AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, Some("Stores - C"));
        let mut rows = Vec::new();
        engine.allocate(&header("WH-B1", 50), &[requirement("RM-200", 1)], &mut rows);

        assert_eq!(rows.len(), 3);

        let picked = &rows[0];
        assert_eq!(picked.warehouse, "WH-B1");
        assert_eq!(picked.allotted_qty, Decimal::from(20));
        assert_eq!(picked.remaining_qty, Decimal::from(30));

        let last = &rows[1];
        assert_eq!(last.warehouse, "WH-B2");
        assert_eq!(last.allotted_qty, Decimal::ZERO);

        let fallback = &rows[2];
        assert_eq!(fallback.warehouse, "Stores - C");
        assert_eq!(fallback.required_qty, Decimal::from(30));
        assert_eq!(fallback.allotted_qty, Decimal::ZERO);
    }

    #[test]
    fn test_no_fallback_when_nothing_allotted() {
        // remaining == required 時不補列
        let h = hierarchy();
        let mut snap = snapshot(vec![]);
        let pipeline = ProcurementPipeline::default();
        let defaults = HashMap::new();

        let mut engine =
            AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, Some("Stores - C"));
        let mut rows = Vec::new();
        engine.allocate(&header("WH-B1", 50), &[requirement("RM-200", 1)], &mut rows);

        // 僅末位候選產生一列
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].allotted_qty, Decimal::ZERO);
        assert_eq!(rows[0].remaining_qty, Decimal::from(50));
    }

    #[test]
    fn test_header_fields_only_on_first_row() {
        let h = hierarchy();
        let mut snap = snapshot(vec![
            ("RM-100", "WH-A", 100),
            ("RM-200", "WH-A", 100),
        ]);
        let pipeline = ProcurementPipeline::default();
        let mut defaults = HashMap::new();
        defaults.insert("RM-100".to_string(), "WH-A".to_string());
        defaults.insert("RM-200".to_string(), "WH-A".to_string());

        let mut engine = AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, None);
        let mut rows = Vec::new();
        engine.allocate(
            &header("WH-A", 10),
            &[requirement("RM-100", 1), requirement("RM-200", 2)],
            &mut rows,
        );

        assert_eq!(rows.len(), 2);
        assert!(rows[0].header.is_some());
        assert!(rows[1].header.is_none());
    }

    #[test]
    fn test_conservation_across_candidates() {
        // 兩個候選倉庫都有料：總撥出不得超過需求
        let h = hierarchy();
        let mut snap = snapshot(vec![
            ("RM-300", "WH-B1", 30),
            ("RM-300", "WH-B2", 30),
        ]);
        let pipeline = ProcurementPipeline::default();
        let defaults = HashMap::new();

        let mut engine =
            AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, Some("Stores - C"));
        let mut rows = Vec::new();
        engine.allocate(&header("WH-B1", 50), &[requirement("RM-300", 1)], &mut rows);

        let total: Decimal = rows.iter().map(|r| r.allotted_qty).sum();
        assert_eq!(total, Decimal::from(50));
        assert_eq!(rows.last().unwrap().remaining_qty, Decimal::ZERO);
        // 需求已滿足，不補範圍餘量列
        assert!(rows.iter().all(|r| r.warehouse != "Stores - C"));
    }

    #[test]
    fn test_work_order_source_warehouse_takes_priority() {
        let h = hierarchy();
        let mut snap = snapshot(vec![("RM-100", "WH-B2", 10)]);
        let pipeline = ProcurementPipeline::default();
        let mut defaults = HashMap::new();
        defaults.insert("RM-100".to_string(), "WH-A".to_string());

        let engine = AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, None);
        let wo_header = DemandHeader::new(
            OrderKind::WorkOrder,
            "WO-0001".to_string(),
            "FG-001".to_string(),
            "Finished Good".to_string(),
            "FG - C".to_string(),
            Decimal::from(5),
        );
        let rm = RawMaterialRequirement {
            owner_key: "WO-0001".to_string(),
            item_code: "RM-100".to_string(),
            item_name: "RM-100".to_string(),
            qty: RequirementQty::Absolute(Decimal::from(5)),
            source_warehouse: Some("WH-B2".to_string()),
        };

        // 用料列倉庫優先於品項預設倉庫
        assert_eq!(engine.candidate_warehouses(&wo_header, &rm), vec!["WH-B2"]);
    }

    #[test]
    fn test_candidate_falls_back_to_header_warehouse() {
        let h = hierarchy();
        let mut snap = snapshot(vec![]);
        let pipeline = ProcurementPipeline::default();
        let defaults = HashMap::new();

        let engine = AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, None);
        let rm = requirement("RM-999", 1);

        assert_eq!(
            engine.candidate_warehouses(&header("WH-B1", 5), &rm),
            vec!["WH-B1"]
        );
    }

    #[test]
    fn test_header_available_qty_consumes_stock() {
        let h = hierarchy();
        let mut snap = snapshot(vec![("FG-001", "WH-A", 3)]);
        let pipeline = ProcurementPipeline::default();
        let defaults = HashMap::new();

        let mut engine = AllocationEngine::new(&h, &mut snap, &pipeline, &defaults, None);
        let mut rows = Vec::new();
        engine.allocate(&header("WH-A", 10), &[requirement("RM-100", 1)], &mut rows);

        let section = rows[0].header.as_ref().unwrap();
        assert_eq!(section.available_qty, Decimal::from(3));
        assert_eq!(
            snap.lookup("FG-001", "WH-A").unwrap().actual_qty,
            Decimal::ZERO
        );
    }
}
