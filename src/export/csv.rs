//! CSV export
//!
//! One record per item, in list order, followed by the budget totals.
//! Amounts are plain decimals with `.` so spreadsheets read them as numbers.

use std::io::Write;

use crate::error::BudgetResult;
use crate::models::{Money, Percentage, Quantity};
use crate::reports::{BudgetSheet, ExecutionReport, SheetRow};

const SHEET_HEADER: [&str; 11] = [
    "code",
    "level",
    "description",
    "unit",
    "quantity",
    "unitMaterialCost",
    "unitLaborCost",
    "totalMaterial",
    "totalLabor",
    "totalItem",
    "groupTotal",
];

fn money(value: Option<Money>) -> String {
    value.map(|m| m.format_plain()).unwrap_or_default()
}

fn quantity(value: Option<Quantity>) -> String {
    value.map(|q| q.to_string()).unwrap_or_default()
}

fn percentage(value: Option<Percentage>) -> String {
    value
        .map(|p| p.to_string().trim_end_matches('%').to_string())
        .unwrap_or_default()
}

fn sheet_fields(row: &SheetRow) -> Vec<String> {
    vec![
        row.code.clone(),
        row.level.to_string(),
        row.description.clone(),
        row.unit.clone().unwrap_or_default(),
        quantity(row.quantity),
        money(row.unit_material_cost),
        money(row.unit_labor_cost),
        money(row.total_material),
        money(row.total_labor),
        money(row.total_item),
        money(row.group_total),
    ]
}

/// Column of `totalItem`
const TOTAL_COLUMN: usize = 9;

/// A totals record: label under `description`, value under `totalItem`
fn totals_record(label: &str, value: String, width: usize) -> Vec<String> {
    let mut record = vec![String::new(); width];
    record[2] = label.to_string();
    record[TOTAL_COLUMN] = value;
    record
}

/// Write a budget sheet as CSV
pub fn export_sheet_csv<W: Write>(sheet: &BudgetSheet, writer: W) -> BudgetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let width = SHEET_HEADER.len();

    csv.write_record(SHEET_HEADER)?;
    for row in &sheet.rows {
        csv.write_record(sheet_fields(row))?;
    }

    csv.write_record(totals_record(
        "subtotal",
        sheet.totals.subtotal.format_plain(),
        width,
    ))?;
    csv.write_record(totals_record(
        "administrativeFeeAmount",
        sheet.totals.administrative_fee_amount.format_plain(),
        width,
    ))?;
    csv.write_record(totals_record(
        "grandTotal",
        sheet.totals.grand_total.format_plain(),
        width,
    ))?;

    csv.flush()?;
    Ok(())
}

/// Write an execution report as CSV
pub fn export_execution_csv<W: Write>(report: &ExecutionReport, writer: W) -> BudgetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let width = SHEET_HEADER.len() + 2;

    let mut header: Vec<&str> = SHEET_HEADER.to_vec();
    header.extend(["realized", "percentExecuted"]);
    csv.write_record(&header)?;

    for row in &report.rows {
        let mut fields = sheet_fields(&row.line);
        fields.push(row.realized.format_plain());
        fields.push(percentage(row.percent_executed));
        csv.write_record(fields)?;
    }

    let mut aggregate = totals_record("total", report.totals.subtotal.format_plain(), width);
    aggregate[width - 2] = report.realized.format_plain();
    aggregate[width - 1] = percentage(report.percent_executed);
    csv.write_record(aggregate)?;

    csv.flush()?;
    Ok(())
}
