//! 生產計劃報表示例
//!
//! 一張物料需求單需要 10 台成品，BOM 每台耗 2 份鋼材；
//! 庫存不足、部分在途，觀察報表的分配與缺口欄位。

use std::collections::HashMap;

use chrono::NaiveDate;
use planner::{
    Bom, BomCatalog, BomItem, MaterialRequestLine, OrderKind, ProductionPlanReport,
    PurchaseOrderLine, ReportFilters, ReportSources, StockLevels, WarehouseNode,
};
use rust_decimal::Decimal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== 生產計劃報表示例 ===\n");

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
            schedule_date: NaiveDate::from_ymd_opt(2026, 9, 15),
            per_ordered: Decimal::ZERO,
            request_type: "Manufacture".to_string(),
            stopped: false,
            submitted: true,
        }],
        bom_catalog: BomCatalog::new(vec![bom], default_boms),
        stock_bins: vec![(
            "STEEL-001".to_string(),
            "Stores - C".to_string(),
            StockLevels::new(Decimal::from(12), Decimal::from(8), Decimal::from(20)),
        )],
        purchase_order_lines: vec![PurchaseOrderLine {
            item_code: "STEEL-001".to_string(),
            warehouse: "Stores - C".to_string(),
            qty: Decimal::from(8),
            received_qty: Decimal::ZERO,
            schedule_date: NaiveDate::from_ymd_opt(2026, 9, 10),
            transaction_date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            company: None,
            submitted: true,
        }],
        warehouse_catalog: vec![
            WarehouseNode::new("All Warehouses - C", None),
            WarehouseNode::new("Stores - C", Some("All Warehouses - C")),
        ],
        ..ReportSources::default()
    };

    let filters = ReportFilters::new(OrderKind::MaterialRequest);
    let output = ProductionPlanReport::new(filters).execute(&sources)?;

    println!("欄位:");
    for column in &output.columns {
        println!("  - {} ({})", column.label, column.fieldname);
    }

    println!("\n報表列:");
    for row in &output.rows {
        if let Some(header) = &row.header {
            println!("  單據 {}: {} × {}", header.name, header.item_code, header.order_qty);
        }
        println!(
            "    {} @ {}: 需求 {}, 撥出 {}, 剩餘 {}, 在途 {}, 缺口 {}",
            row.item_code,
            row.warehouse,
            row.required_qty,
            row.allotted_qty,
            row.remaining_qty,
            row.pipeline_qty,
            row.balance
        );
    }

    Ok(())
}
