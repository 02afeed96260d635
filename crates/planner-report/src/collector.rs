//! 需求收集：將三種異質單據來源正規化為需求表頭序列

use std::collections::HashMap;

use planner_core::{
    DemandHeader, OrderKind, RawMaterialRequirement, ReportFilters, RequirementQty, Result,
    SortOrder,
};

use crate::report::ReportSources;

/// 收集結果：表頭序列與原物料需求索引
#[derive(Debug, Clone, Default)]
pub struct CollectedDemand {
    /// 需求表頭（已依篩選條件排序）
    pub headers: Vec<DemandHeader>,

    /// 索引鍵（工單單號或 BOM 編號）→ 原物料需求列
    pub raw_materials: HashMap<String, Vec<RawMaterialRequirement>>,
}

impl CollectedDemand {
    /// 指定索引鍵的原物料需求列
    pub fn raw_materials_for(&self, key: &str) -> Option<&[RawMaterialRequirement]> {
        self.raw_materials.get(key).map(Vec::as_slice)
    }
}

/// 需求收集器
pub struct DemandCollector;

impl DemandCollector {
    /// 收集開放單據並建立原物料需求索引
    ///
    /// 只納入已提交且非終結狀態的單據；找不到 BOM 的單據
    /// 不建立需求列，下游自然不產生任何輸出列。
    pub fn collect(filters: &ReportFilters, sources: &ReportSources) -> Result<CollectedDemand> {
        match filters.based_on {
            OrderKind::WorkOrder => Self::collect_work_orders(filters, sources),
            OrderKind::SalesOrder => Self::collect_sales_orders(filters, sources),
            OrderKind::MaterialRequest => Self::collect_material_requests(filters, sources),
        }
    }

    fn collect_work_orders(
        filters: &ReportFilters,
        sources: &ReportSources,
    ) -> Result<CollectedDemand> {
        let mut orders: Vec<_> = sources
            .work_orders
            .iter()
            .filter(|wo| wo.submitted && !wo.status.is_terminal())
            .filter(|wo| filters.docnames.is_empty() || filters.docnames.contains(&wo.name))
            .collect();

        if filters.order_by == Some(SortOrder::PlannedStartDate) {
            orders.sort_by_key(|wo| wo.planned_start_date);
        }

        let mut collected = CollectedDemand::default();
        for wo in orders {
            let mut header = DemandHeader::new(
                OrderKind::WorkOrder,
                wo.name.clone(),
                wo.production_item.clone(),
                wo.item_name.clone(),
                wo.fg_warehouse.clone(),
                wo.qty,
            );
            if let Some(date) = wo.planned_start_date {
                header = header.with_order_date(date);
            }
            if let Some(bom_no) = &wo.bom_no {
                header = header.with_bom_no(bom_no.clone());
            }
            collected.headers.push(header);

            // 工單用料為絕對數量，僅取有來源倉庫者
            let rows: Vec<_> = wo
                .required_items
                .iter()
                .filter(|d| d.source_warehouse.as_deref().is_some_and(|w| !w.is_empty()))
                .map(|d| RawMaterialRequirement {
                    owner_key: wo.name.clone(),
                    item_code: d.item_code.clone(),
                    item_name: d.item_name.clone(),
                    qty: RequirementQty::Absolute(d.required_qty),
                    source_warehouse: d.source_warehouse.clone(),
                })
                .collect();

            if !rows.is_empty() {
                collected.raw_materials.insert(wo.name.clone(), rows);
            }
        }

        Ok(collected)
    }

    fn collect_sales_orders(
        filters: &ReportFilters,
        sources: &ReportSources,
    ) -> Result<CollectedDemand> {
        let mut lines: Vec<_> = sources
            .sales_order_lines
            .iter()
            .filter(|line| line.is_open())
            .filter(|line| {
                filters.docnames.is_empty() || filters.docnames.contains(&line.order_name)
            })
            .collect();

        match filters.order_by {
            Some(SortOrder::TotalAmount) => {
                lines.sort_by(|a, b| b.base_grand_total.cmp(&a.base_grand_total));
            }
            Some(SortOrder::DeliveryDate) => lines.sort_by_key(|line| line.delivery_date),
            _ => {}
        }

        let mut collected = CollectedDemand::default();
        for line in lines {
            let Some(bom_no) = sources
                .bom_catalog
                .resolve(line.bom_no.as_deref(), &line.item_code)
            else {
                // 無 BOM 可展開，整筆略過
                continue;
            };

            let mut header = DemandHeader::new(
                OrderKind::SalesOrder,
                line.order_name.clone(),
                line.item_code.clone(),
                line.item_name.clone(),
                line.warehouse.clone(),
                line.stock_qty,
            )
            .with_total_amount(line.base_grand_total)
            .with_bom_no(bom_no.clone());
            if let Some(date) = line.delivery_date {
                header = header.with_order_date(date);
            }
            collected.headers.push(header);

            Self::explode_bom(filters, sources, &bom_no, &mut collected)?;
        }

        Ok(collected)
    }

    fn collect_material_requests(
        filters: &ReportFilters,
        sources: &ReportSources,
    ) -> Result<CollectedDemand> {
        let mut lines: Vec<_> = sources
            .material_request_lines
            .iter()
            .filter(|line| line.is_open())
            .filter(|line| {
                filters.docnames.is_empty() || filters.docnames.contains(&line.request_name)
            })
            .collect();

        if filters.order_by == Some(SortOrder::RequiredDate) {
            lines.sort_by_key(|line| line.schedule_date);
        }

        let mut collected = CollectedDemand::default();
        for line in lines {
            let Some(bom_no) = sources
                .bom_catalog
                .resolve(line.bom_no.as_deref(), &line.item_code)
            else {
                continue;
            };

            let mut header = DemandHeader::new(
                OrderKind::MaterialRequest,
                line.request_name.clone(),
                line.item_code.clone(),
                line.item_name.clone(),
                line.warehouse.clone(),
                line.stock_qty,
            )
            .with_bom_no(bom_no.clone());
            if let Some(date) = line.schedule_date {
                header = header.with_order_date(date);
            }
            collected.headers.push(header);

            Self::explode_bom(filters, sources, &bom_no, &mut collected)?;
        }

        Ok(collected)
    }

    /// 展開 BOM 為單位用量需求列；同一 BOM 只展開一次
    fn explode_bom(
        filters: &ReportFilters,
        sources: &ReportSources,
        bom_no: &str,
        collected: &mut CollectedDemand,
    ) -> Result<()> {
        if collected.raw_materials.contains_key(bom_no) {
            return Ok(());
        }

        // 目錄中查不到（或未提交）的 BOM：該單據不產生任何輸出列
        let Some(bom) = sources.bom_catalog.get(bom_no) else {
            return Ok(());
        };

        let rows: Vec<_> = bom
            .per_unit_requirements(filters.include_subassembly_raw_materials)?
            .into_iter()
            .map(|(item_code, item_name, qty)| RawMaterialRequirement {
                owner_key: bom_no.to_string(),
                item_code,
                item_name,
                qty,
                source_warehouse: None,
            })
            .collect();

        if !rows.is_empty() {
            collected.raw_materials.insert(bom_no.to_string(), rows);
        }

        Ok(())
    }
}
