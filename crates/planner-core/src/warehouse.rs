//! 倉庫階層索引

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// 倉庫節點（完整倉庫目錄的一列）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseNode {
    /// 倉庫名稱
    pub name: String,

    /// 上層倉庫名稱（無上層者為彙總根）
    pub parent: Option<String>,
}

impl WarehouseNode {
    /// 創建新的倉庫節點
    pub fn new(name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            parent: parent.map(str::to_string),
        }
    }
}

/// 倉庫階層索引：從完整倉庫目錄建立一次，執行期內不可變
///
/// 目錄必須涵蓋全部倉庫（不限於當前單據觸及者），
/// 使每個彙總根即使無庫存也會出現在報表欄位中。
#[derive(Debug, Clone, Default)]
pub struct WarehouseHierarchy {
    parents: HashMap<String, Option<String>>,
    children: HashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl WarehouseHierarchy {
    /// 從倉庫目錄建立階層索引
    pub fn build(catalog: &[WarehouseNode]) -> Self {
        let mut parents: HashMap<String, Option<String>> = HashMap::new();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();

        for node in catalog {
            parents.insert(node.name.clone(), node.parent.clone());
            if let Some(parent) = &node.parent {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.name.clone());
            }
        }

        let hierarchy = Self {
            parents,
            children,
            roots: Vec::new(),
        };

        // 彙總根 = 每個節點向上走到頂的結果，字典序排序
        let roots: BTreeSet<String> = catalog
            .iter()
            .map(|node| hierarchy.resolve_root(&node.name).to_string())
            .collect();

        Self {
            roots: roots.into_iter().collect(),
            ..hierarchy
        }
    }

    /// 解析倉庫的最上層祖先；未知倉庫以自身為根
    ///
    /// 上層鏈步數以目錄大小為上限，異常目錄形成循環時
    /// 走到上限即停，不會無窮迴圈。
    pub fn resolve_root<'a>(&'a self, warehouse: &'a str) -> &'a str {
        let mut current = warehouse;
        let mut hops = 0;
        while let Some(Some(parent)) = self.parents.get(current) {
            if hops >= self.parents.len() {
                break;
            }
            current = parent;
            hops += 1;
        }
        current
    }

    /// 全部彙總根（字典序）
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// 指定倉庫及其全部下層倉庫（先序走訪）
    pub fn descendants(&self, warehouse: &str) -> Vec<String> {
        let mut result = vec![warehouse.to_string()];
        let mut queue = vec![warehouse.to_string()];

        while let Some(current) = queue.pop() {
            if let Some(children) = self.children.get(&current) {
                for child in children {
                    result.push(child.clone());
                    queue.push(child.clone());
                }
            }
        }

        result
    }
}
