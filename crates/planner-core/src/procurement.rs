//! 採購在途模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 採購訂單明細行（外部系統提供）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    /// 品項代碼
    pub item_code: String,

    /// 收貨倉庫
    pub warehouse: String,

    /// 訂購數量
    pub qty: Decimal,

    /// 已收貨數量
    pub received_qty: Decimal,

    /// 預計到貨日
    pub schedule_date: Option<NaiveDate>,

    /// 交易日期
    pub transaction_date: NaiveDate,

    /// 公司別
    pub company: Option<String>,

    /// 是否已提交
    pub submitted: bool,
}

impl PurchaseOrderLine {
    /// 未到貨數量
    pub fn outstanding_qty(&self) -> Decimal {
        self.qty - self.received_qty
    }
}

/// 每 (品項, 倉庫) 的在途明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementDetail {
    /// 最早到貨日
    pub arrival_date: Option<NaiveDate>,

    /// 未到貨數量
    pub arrival_qty: Decimal,
}

/// 採購在途索引：執行期開始時彙總一次，之後唯讀
#[derive(Debug, Clone, Default)]
pub struct ProcurementPipeline {
    totals: HashMap<String, Decimal>,
    details: HashMap<(String, String), ProcurementDetail>,
}

impl ProcurementPipeline {
    /// 從已提交的採購明細行彙總
    ///
    /// 公司別與交易日期區間只篩選每品項在途總量；
    /// 分倉到貨明細涵蓋全部已提交明細行。
    pub fn build(
        lines: &[PurchaseOrderLine],
        company: Option<&str>,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> Self {
        let mut totals: HashMap<String, Decimal> = HashMap::new();
        let mut details: HashMap<(String, String), ProcurementDetail> = HashMap::new();

        for line in lines {
            if !line.submitted {
                continue;
            }

            let outstanding = line.outstanding_qty();

            let detail = details
                .entry((line.item_code.clone(), line.warehouse.clone()))
                .or_insert(ProcurementDetail {
                    arrival_date: None,
                    arrival_qty: Decimal::ZERO,
                });
            detail.arrival_qty += outstanding;
            detail.arrival_date = match (detail.arrival_date, line.schedule_date) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };

            if let Some(company) = company {
                if line.company.as_deref() != Some(company) {
                    continue;
                }
            }
            if let Some(from_date) = from_date {
                if line.transaction_date < from_date {
                    continue;
                }
            }
            if let Some(to_date) = to_date {
                if line.transaction_date > to_date {
                    continue;
                }
            }

            *totals.entry(line.item_code.clone()).or_default() += outstanding;
        }

        Self { totals, details }
    }

    /// 品項的在途總量
    pub fn pipeline_qty(&self, item_code: &str) -> Decimal {
        self.totals.get(item_code).copied().unwrap_or_default()
    }

    /// (品項, 倉庫) 的在途明細
    pub fn detail(&self, item_code: &str, warehouse: &str) -> Option<&ProcurementDetail> {
        self.details
            .get(&(item_code.to_string(), warehouse.to_string()))
    }

    /// 品項跨倉庫的最早到貨日
    pub fn earliest_arrival(&self, item_code: &str) -> Option<NaiveDate> {
        self.details
            .iter()
            .filter(|((item, _), _)| item == item_code)
            .filter_map(|(_, detail)| detail.arrival_date)
            .min()
    }
}
