//! 物料需求草稿建議
//!
//! 報表輸出的下游消費者：將缺口為正的列彙總為
//! 每品項一筆的物料需求草稿明細。

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use planner_core::{ReportFilters, Result};

use crate::{report::ProductionPlanReport, report::ReportSources, ReportOutput};

/// 物料需求草稿明細行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRequestItem {
    /// 品項代碼
    pub item_code: String,

    /// 建議數量（缺口合計）
    pub qty: Decimal,

    /// 建議來源倉庫
    pub warehouse: Option<String>,

    /// 需求日
    pub schedule_date: NaiveDate,
}

/// 物料需求建議器
pub struct MaterialRequestProposer;

impl MaterialRequestProposer {
    /// 由報表輸出建議草稿明細
    ///
    /// 每列缺口 > 0 者累計至品項合計；倉庫取該品項所有列中
    /// 彙總欄位值最高的正值根（同分取先見者），
    /// 若無正值欄位則回退該列自身的倉庫。
    pub fn propose(
        output: &ReportOutput,
        schedule_date: Option<NaiveDate>,
    ) -> Vec<MaterialRequestItem> {
        let schedule_date =
            schedule_date.unwrap_or_else(|| chrono::Local::now().date_naive());

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut best: HashMap<String, (Option<String>, Decimal)> = HashMap::new();

        for row in &output.rows {
            if row.balance <= Decimal::ZERO {
                continue;
            }

            *totals.entry(row.item_code.clone()).or_default() += row.balance;

            // 本列最佳倉庫：彙總欄位最高正值；嚴格大於才更新，保留先見者
            let mut picked: Option<&str> = None;
            let mut picked_score = Decimal::from(-1);
            for (root, qty) in &row.rollup {
                if *qty > Decimal::ZERO && *qty > picked_score {
                    picked = Some(root);
                    picked_score = *qty;
                }
            }
            let picked = picked
                .map(str::to_string)
                .or_else(|| Some(row.warehouse.clone()));

            let current_best = best.get(&row.item_code).map(|(_, score)| *score);
            if current_best.map_or(true, |score| picked_score > score) {
                best.insert(row.item_code.clone(), (picked, picked_score));
            }
        }

        totals
            .into_iter()
            .filter(|(_, qty)| *qty > Decimal::ZERO)
            .map(|(item_code, qty)| {
                let warehouse = best
                    .get(&item_code)
                    .and_then(|(warehouse, _)| warehouse.clone());
                MaterialRequestItem {
                    item_code,
                    qty,
                    warehouse,
                    schedule_date,
                }
            })
            .collect()
    }

    /// 以篩選條件重跑報表並建議草稿明細
    ///
    /// 單號限定在此無意義（草稿涵蓋全部開放單據），一律清除。
    pub fn propose_from_filters(
        mut filters: ReportFilters,
        sources: &ReportSources,
    ) -> Result<Vec<MaterialRequestItem>> {
        filters.docnames.clear();
        let schedule_date = filters.schedule_date;
        let output = ProductionPlanReport::new(filters).execute(sources)?;
        Ok(Self::propose(&output, schedule_date))
    }
}
