// ppe-report-service/src/aggregator.rs
//
// Shapes raw domain entities (as returned by the equipment API) into the
// normalized, statistics-enriched payloads the renderer consumes. All domain
// math lives here; the renderer only computes presentation percentages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AssignmentRow, CategorySlice, InventoryReport, MaintenanceReport, MaintenanceRow, UsageReport,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceCategory {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Available,
    Issued,
    Maintenance,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceItem {
    pub category_id: u32,
    pub name: String,
    pub quantity: u32,
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Completed,
    Overdue,
}

impl AssignmentStatus {
    fn label(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => "Đang sử dụng",
            AssignmentStatus::Completed => "Hoàn thành",
            AssignmentStatus::Overdue => "Quá hạn",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub user_name: String,
    pub item_name: String,
    pub quantity: u32,
    pub start_date: NaiveDate,
    pub status: AssignmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Completed,
    Pending,
    Overdue,
}

impl MaintenanceStatus {
    fn label(&self) -> &'static str {
        match self {
            MaintenanceStatus::Completed => "Hoàn thành",
            MaintenanceStatus::Pending => "Chờ xử lý",
            MaintenanceStatus::Overdue => "Quá hạn",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceEntry {
    pub item_name: String,
    pub maintenance_type: String,
    pub maintenance_date: NaiveDate,
    pub status: MaintenanceStatus,
    #[serde(default)]
    pub notes: String,
}

const ROW_DATE_FORMAT: &str = "%d/%m/%Y";

pub struct ReportAggregator;

impl ReportAggregator {
    /// Inventory payload: per-category totals plus the device status buckets.
    ///
    /// Guarantees `remaining_quantity = total_quantity - issued_quantity` on
    /// every slice; the renderer trusts these numbers as given.
    pub fn build_inventory(
        categories: &[DeviceCategory],
        items: &[DeviceItem],
    ) -> InventoryReport {
        let mut slices = Vec::with_capacity(categories.len());
        for category in categories {
            let mut total_quantity = 0u32;
            let mut issued_quantity = 0u32;
            for item in items.iter().filter(|i| i.category_id == category.id) {
                total_quantity += item.quantity;
                if item.status == DeviceStatus::Issued {
                    issued_quantity += item.quantity;
                }
            }
            slices.push(CategorySlice {
                name: category.name.clone(),
                total_quantity,
                issued_quantity,
                remaining_quantity: total_quantity.saturating_sub(issued_quantity),
            });
        }

        let bucket = |status: DeviceStatus| {
            items
                .iter()
                .filter(|i| i.status == status)
                .map(|i| i.quantity)
                .sum::<u32>()
        };

        let report = InventoryReport {
            total_categories: categories.len() as u32,
            total_devices: items.iter().map(|i| i.quantity).sum(),
            available_devices: bucket(DeviceStatus::Available),
            issued_devices: bucket(DeviceStatus::Issued),
            maintenance_count: bucket(DeviceStatus::Maintenance),
            expired_count: bucket(DeviceStatus::Expired),
            categories: slices,
        };

        debug!(
            total_devices = report.total_devices,
            categories = report.categories.len(),
            "Aggregated inventory report payload"
        );
        report
    }

    /// Usage payload: the three status buckets over the assignment list.
    pub fn build_usage(assignments: &[AssignmentRecord]) -> UsageReport {
        let count = |status: AssignmentStatus| {
            assignments.iter().filter(|a| a.status == status).count() as u32
        };

        let rows = assignments
            .iter()
            .map(|a| AssignmentRow {
                user_name: a.user_name.clone(),
                item_name: a.item_name.clone(),
                quantity: a.quantity,
                start_date: a.start_date.format(ROW_DATE_FORMAT).to_string(),
                status: a.status.label().to_string(),
            })
            .collect();

        UsageReport {
            total_assignments: assignments.len() as u32,
            active_assignments: count(AssignmentStatus::Active),
            completed_assignments: count(AssignmentStatus::Completed),
            overdue_assignments: count(AssignmentStatus::Overdue),
            assignments: rows,
        }
    }

    /// Maintenance payload: status buckets over the maintenance history.
    pub fn build_maintenance(entries: &[MaintenanceEntry]) -> MaintenanceReport {
        let count = |status: MaintenanceStatus| {
            entries.iter().filter(|e| e.status == status).count() as u32
        };

        let rows = entries
            .iter()
            .map(|e| MaintenanceRow {
                item_name: e.item_name.clone(),
                maintenance_type: e.maintenance_type.clone(),
                maintenance_date: e.maintenance_date.format(ROW_DATE_FORMAT).to_string(),
                status: e.status.label().to_string(),
                notes: e.notes.clone(),
            })
            .collect();

        MaintenanceReport {
            total_maintenance: entries.len() as u32,
            completed_maintenance: count(MaintenanceStatus::Completed),
            pending_maintenance: count(MaintenanceStatus::Pending),
            overdue_maintenance: count(MaintenanceStatus::Overdue),
            maintenance_records: rows,
        }
    }
}
