//! BOM 模型與目錄

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{PlannerError, RequirementQty, Result};

/// BOM 直接用料行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomItem {
    /// 原物料代碼
    pub item_code: String,

    /// 原物料名稱
    pub item_name: String,

    /// 一個批量所需數量
    pub qty: Decimal,
}

/// BOM 全展開用料行（含子裝配件展開）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomExplosionItem {
    /// 原物料代碼
    pub item_code: String,

    /// 原物料名稱
    pub item_name: String,

    /// 每單位成品耗用量
    pub qty_consumed_per_unit: Decimal,
}

/// BOM（物料清單）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bom {
    /// BOM 編號
    pub name: String,

    /// 批量數量（直接用料行的分母）
    pub quantity: Decimal,

    /// 是否已提交
    pub submitted: bool,

    /// 直接用料行
    pub items: Vec<BomItem>,

    /// 全展開用料行
    pub exploded_items: Vec<BomExplosionItem>,
}

impl Bom {
    /// 解析用料行為單位用量比例
    ///
    /// * `include_subassembly` - true 時使用全展開行（qty_consumed_per_unit），
    ///   false 時使用直接用料行（qty / 批量數量）
    ///
    /// 批量數量為零時回傳錯誤，不得默默視為零比例。
    pub fn per_unit_requirements(
        &self,
        include_subassembly: bool,
    ) -> Result<Vec<(String, String, RequirementQty)>> {
        if include_subassembly {
            return Ok(self
                .exploded_items
                .iter()
                .map(|d| {
                    (
                        d.item_code.clone(),
                        d.item_name.clone(),
                        RequirementQty::PerUnit(d.qty_consumed_per_unit),
                    )
                })
                .collect());
        }

        if self.quantity.is_zero() {
            return Err(PlannerError::ZeroBomQuantity(self.name.clone()));
        }

        Ok(self
            .items
            .iter()
            .map(|d| {
                (
                    d.item_code.clone(),
                    d.item_name.clone(),
                    RequirementQty::PerUnit(d.qty / self.quantity),
                )
            })
            .collect())
    }
}

/// BOM 目錄：依編號查找，並提供品項預設 BOM
#[derive(Debug, Clone, Default)]
pub struct BomCatalog {
    boms: HashMap<String, Bom>,
    default_boms: HashMap<String, String>,
}

impl BomCatalog {
    /// 創建新的 BOM 目錄
    pub fn new(boms: Vec<Bom>, default_boms: HashMap<String, String>) -> Self {
        let boms = boms.into_iter().map(|bom| (bom.name.clone(), bom)).collect();
        Self { boms, default_boms }
    }

    /// 依編號查找已提交的 BOM
    pub fn get(&self, bom_no: &str) -> Option<&Bom> {
        self.boms.get(bom_no).filter(|bom| bom.submitted)
    }

    /// 品項預設 BOM 編號
    pub fn default_bom(&self, item_code: &str) -> Option<&str> {
        self.default_boms.get(item_code).map(String::as_str)
    }

    /// 解析單據指定 BOM，缺漏時回退品項預設 BOM
    pub fn resolve(&self, bom_no: Option<&str>, item_code: &str) -> Option<String> {
        bom_no
            .map(str::to_string)
            .or_else(|| self.default_bom(item_code).map(str::to_string))
    }
}
