//! 報表欄位建構

use planner_core::{scrub, Column, ColumnType, OrderKind, ReportFilters, SortOrder};

/// 單別對應的單據名稱（ID 欄位的連結目標）
fn doctype_name(kind: OrderKind) -> &'static str {
    match kind {
        OrderKind::WorkOrder => "Work Order",
        OrderKind::SalesOrder => "Sales Order",
        OrderKind::MaterialRequest => "Material Request",
    }
}

/// 依篩選條件與彙總根建構欄位定義
///
/// 欄位順序：表頭欄位、單別相關的日期或金額欄位、原物料欄位、
/// 每個彙總根一欄、在途量（POQty）、缺口（BalanceQty）。
pub fn build_columns(filters: &ReportFilters, roots: &[String]) -> Vec<Column> {
    let based_on = filters.based_on;

    let mut columns = vec![
        Column::new("ID", "name", ColumnType::Link, 100).with_options(doctype_name(based_on)),
        Column::new("Item Code", "production_item", ColumnType::Link, 120).with_options("Item"),
        Column::new("Item Name", "production_item_name", ColumnType::Data, 130),
        Column::new("Order Qty", "qty_to_manufacture", ColumnType::Float, 100),
        Column::new("Available", "available_qty", ColumnType::Float, 100),
    ];

    match (based_on, filters.order_by) {
        (OrderKind::SalesOrder, Some(SortOrder::TotalAmount)) => {
            columns.push(Column::new(
                "Total Amount",
                "base_grand_total",
                ColumnType::Currency,
                120,
            ));
        }
        (OrderKind::SalesOrder, _) => {
            columns.push(Column::new(
                "Delivery Date",
                "delivery_date",
                ColumnType::Date,
                120,
            ));
        }
        (OrderKind::MaterialRequest, _) => {
            columns.push(Column::new(
                "Required Date",
                "schedule_date",
                ColumnType::Date,
                120,
            ));
        }
        (OrderKind::WorkOrder, _) => {
            columns.push(Column::new(
                "Planned Start Date",
                "planned_start_date",
                ColumnType::Date,
                120,
            ));
        }
    }

    columns.push(Column::new("Raw Material Code", "item_code", ColumnType::Link, 120).with_options("Item"));
    columns.push(Column::new(
        "Raw Material Name",
        "raw_material_name",
        ColumnType::Data,
        130,
    ));
    columns.push(Column::new("Required Qty", "required_qty", ColumnType::Float, 100));

    // 每個彙總根一欄，即使該根目前無任何庫存
    for root in roots {
        columns.push(Column::new(
            root.clone(),
            scrub(&format!("{root}_qty")),
            ColumnType::Float,
            100,
        ));
    }

    columns.push(Column::new("POQty", "arrival_qty", ColumnType::Float, 100));
    columns.push(Column::new("BalanceQty", "balance_po_qty", ColumnType::Float, 120));

    columns
}
