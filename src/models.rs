// ppe-report-service/src/models.rs

use serde::{Deserialize, Serialize};

/// Selects the layout and statistics computation for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Inventory,
    Usage,
    Maintenance,
    #[serde(other)]
    Unknown,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Inventory => "inventory",
            ReportType::Usage => "usage",
            ReportType::Maintenance => "maintenance",
            ReportType::Unknown => "unknown",
        }
    }
}

/// Inbound request for one report generation. Ephemeral, one-shot.
///
/// `report_data` stays untyped until decoded against `report_type`, the same
/// way the web client hands the generator a plain JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub report_data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySlice {
    pub name: String,
    pub total_quantity: u32,
    pub issued_quantity: u32,
    pub remaining_quantity: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryReport {
    pub total_categories: u32,
    pub total_devices: u32,
    pub available_devices: u32,
    pub issued_devices: u32,
    pub maintenance_count: u32,
    pub expired_count: u32,
    pub categories: Vec<CategorySlice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignmentRow {
    pub user_name: String,
    pub item_name: String,
    pub quantity: u32,
    pub start_date: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageReport {
    pub total_assignments: u32,
    pub active_assignments: u32,
    pub completed_assignments: u32,
    pub overdue_assignments: u32,
    pub assignments: Vec<AssignmentRow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceRow {
    pub item_name: String,
    pub maintenance_type: String,
    pub maintenance_date: String,
    pub status: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceReport {
    pub total_maintenance: u32,
    pub completed_maintenance: u32,
    pub pending_maintenance: u32,
    pub overdue_maintenance: u32,
    pub maintenance_records: Vec<MaintenanceRow>,
}

/// Normalized payload handed to the renderer. Shape follows the report type.
#[derive(Debug, Clone)]
pub enum ReportPayload {
    Inventory(InventoryReport),
    Usage(UsageReport),
    Maintenance(MaintenanceReport),
    Empty,
}

impl ReportPayload {
    /// Decode the raw request data against the report type.
    ///
    /// Missing numeric fields become 0 and missing lists become empty via the
    /// struct defaults; a payload whose shape does not match at all degrades
    /// to the zeroed payload for that type instead of failing the call.
    pub fn from_value(report_type: ReportType, data: &serde_json::Value) -> Self {
        // Derived Deserialize also accepts JSON sequences positionally, which
        // would turn an array payload into fabricated field values. Only an
        // object can carry report fields; anything else gets the zeroed shape.
        match report_type {
            ReportType::Inventory => ReportPayload::Inventory(Self::decode(data)),
            ReportType::Usage => ReportPayload::Usage(Self::decode(data)),
            ReportType::Maintenance => ReportPayload::Maintenance(Self::decode(data)),
            ReportType::Unknown => ReportPayload::Empty,
        }
    }

    fn decode<T: Default + serde::de::DeserializeOwned>(data: &serde_json::Value) -> T {
        if !data.is_object() {
            return T::default();
        }
        serde_json::from_value(data.clone()).unwrap_or_default()
    }
}

/// Integer percentage with the division-by-zero guard used across the whole
/// pipeline: `total == 0` always yields 0. Half-up rounding.
pub fn percentage(part: u32, total: u32) -> u32 {
    if total > 0 {
        ((part as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn percentage_guards_zero_total() {
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(40, 100), 40);
    }

    #[test]
    fn report_type_deserializes_unknown_values() {
        let t: ReportType = serde_json::from_value(json!("inventory")).unwrap();
        assert_eq!(t, ReportType::Inventory);
        let t: ReportType = serde_json::from_value(json!("quarterly")).unwrap();
        assert_eq!(t, ReportType::Unknown);
    }

    #[test]
    fn payload_defaults_missing_fields() {
        let data = json!({ "total_devices": 12 });
        match ReportPayload::from_value(ReportType::Inventory, &data) {
            ReportPayload::Inventory(inv) => {
                assert_eq!(inv.total_devices, 12);
                assert_eq!(inv.available_devices, 0);
                assert!(inv.categories.is_empty());
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn payload_degrades_on_shape_mismatch() {
        // An array must not decode positionally into the struct fields.
        let data = json!([1, 2, 3]);
        match ReportPayload::from_value(ReportType::Usage, &data) {
            ReportPayload::Usage(usage) => {
                assert_eq!(usage.total_assignments, 0);
                assert!(usage.assignments.is_empty());
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn payload_degrades_on_non_object_values() {
        for data in [json!(null), json!(7), json!("inventory"), json!([5])] {
            match ReportPayload::from_value(ReportType::Inventory, &data) {
                ReportPayload::Inventory(inv) => {
                    assert_eq!(inv.total_devices, 0);
                    assert!(inv.categories.is_empty());
                }
                other => panic!("unexpected payload: {other:?}"),
            }
        }
    }
}
