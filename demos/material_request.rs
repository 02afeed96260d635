//! 物料需求草稿建議示例
//!
//! 以 JSON 篩選條件重跑報表，將缺口彙總為草稿明細。

use std::collections::HashMap;

use planner::{
    Bom, BomCatalog, BomItem, MaterialRequestLine, MaterialRequestProposer, ReportFilters,
    ReportSources, StockLevels, WarehouseNode,
};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== 物料需求草稿建議示例 ===\n");

    // 上游以 JSON 傳入篩選條件；docnames 由建議器自行清除
    let filters = ReportFilters::from_json(
        r#"{
            "based_on": "MaterialRequest",
            "docnames": ["MR-00042"],
            "schedule_date": "2026-09-20"
        }"#,
    )?;

    let bom = Bom {
        name: "BOM-BIKE-001".to_string(),
        quantity: Decimal::from(1),
        submitted: true,
        items: vec![BomItem {
            item_code: "STEEL-001".to_string(),
            item_name: "Steel Frame Stock".to_string(),
            qty: Decimal::from(2),
        }],
        exploded_items: vec![],
    };
    let mut default_boms = HashMap::new();
    default_boms.insert("BIKE-001".to_string(), "BOM-BIKE-001".to_string());

    let sources = ReportSources {
        material_request_lines: vec![MaterialRequestLine {
            request_name: "MR-00042".to_string(),
            item_code: "BIKE-001".to_string(),
            item_name: "City Bike".to_string(),
            bom_no: None,
            stock_qty: Decimal::from(10),
            warehouse: "Stores - C".to_string(),
            schedule_date: None,
            per_ordered: Decimal::ZERO,
            request_type: "Manufacture".to_string(),
            stopped: false,
            submitted: true,
        }],
        bom_catalog: BomCatalog::new(vec![bom], default_boms),
        stock_bins: vec![(
            "STEEL-001".to_string(),
            "Stores - C".to_string(),
            StockLevels::new(Decimal::from(6), Decimal::ZERO, Decimal::from(6)),
        )],
        warehouse_catalog: vec![
            WarehouseNode::new("All Warehouses - C", None),
            WarehouseNode::new("Stores - C", Some("All Warehouses - C")),
        ],
        ..ReportSources::default()
    };

    let items = MaterialRequestProposer::propose_from_filters(filters, &sources)?;

    println!("建議草稿明細:");
    println!("{}", serde_json::to_string_pretty(&items)?);

    Ok(())
}
