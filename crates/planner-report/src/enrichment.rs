//! 上層倉庫彙總與輸出列豐富化

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use planner_core::{OutputRow, ProcurementPipeline, StockSnapshot, WarehouseHierarchy};

/// 彙總表：品項 → 彙總根 → 實際庫存合計
///
/// 分配完成後以「扣減後」的快照建立一次，整個執行期共用，
/// 因此同品項的所有輸出列回報相同的彙總數字。
/// 零與負值照實保留。
#[derive(Debug, Clone)]
pub struct RollupTable {
    table: HashMap<String, BTreeMap<String, Decimal>>,
    roots: Vec<String>,
}

impl RollupTable {
    /// 從庫存快照與倉庫階層建立彙總表
    pub fn build(snapshot: &StockSnapshot, hierarchy: &WarehouseHierarchy) -> Self {
        let mut table: HashMap<String, BTreeMap<String, Decimal>> = HashMap::new();

        for ((item_code, warehouse), levels) in snapshot.iter() {
            let root = hierarchy.resolve_root(warehouse).to_string();
            *table
                .entry(item_code.clone())
                .or_default()
                .entry(root)
                .or_default() += levels.actual_qty;
        }

        Self {
            table,
            roots: hierarchy.roots().to_vec(),
        }
    }

    /// 品項於每個彙總根的庫存欄位；無庫存的根補 0
    pub fn columns_for(&self, item_code: &str) -> BTreeMap<String, Decimal> {
        let mut columns: BTreeMap<String, Decimal> = self
            .roots
            .iter()
            .map(|root| (root.clone(), Decimal::ZERO))
            .collect();

        if let Some(sums) = self.table.get(item_code) {
            for (root, qty) in sums {
                columns.insert(root.clone(), *qty);
            }
        }

        columns
    }

    /// 全部彙總根（字典序）
    pub fn roots(&self) -> &[String] {
        &self.roots
    }
}

/// 對每一列輸出掛上彙總欄位、在途總量、缺口與最早到貨日
pub fn enrich_rows(rows: &mut [OutputRow], rollup: &RollupTable, pipeline: &ProcurementPipeline) {
    for row in rows {
        row.rollup = rollup.columns_for(&row.item_code);
        row.pipeline_qty = pipeline.pipeline_qty(&row.item_code);

        let rollup_total: Decimal = row.rollup.values().copied().sum();
        row.balance = row.required_qty - rollup_total - row.pipeline_qty;

        row.arrival_date = pipeline.earliest_arrival(&row.item_code);
    }
}
