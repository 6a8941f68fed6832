use tabled::{Table, Tabled, settings::Style};

use crate::violation::Violation;

#[derive(Tabled)]
pub struct ViolationRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Plate")]
    pub plate: String,
    #[tabled(rename = "Vehicle")]
    pub vehicle: String,
    #[tabled(rename = "Violation")]
    pub violation: String,
    #[tabled(rename = "Fine")]
    pub fine: String,
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Violation> for ViolationRow {
    fn from(v: &Violation) -> Self {
        Self {
            id: v.id,
            plate: v.plate_number.clone(),
            vehicle: v.vehicle_type.to_string(),
            violation: v.violation_type.to_string(),
            fine: format!("${:.2}", v.fine_amount),
            date: v.date_time.clone(),
            status: v.status.to_string(),
        }
    }
}

/// Render a list of violations as a terminal table
pub fn violations_table(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return String::new();
    }

    let rows: Vec<ViolationRow> = violations.iter().map(Into::into).collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render label/value pairs as a two-column table
pub fn stats_table(stats: &[(&str, String)]) -> String {
    if stats.is_empty() {
        return String::new();
    }

    let rows: Vec<StatRow> = stats
        .iter()
        .map(|(label, value)| StatRow {
            metric: label.to_string(),
            value: value.clone(),
        })
        .collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}
