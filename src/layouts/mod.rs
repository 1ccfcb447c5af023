// ppe-report-service/src/layouts/mod.rs

mod inventory;
mod maintenance;
mod usage;

use crate::document::Block;
use crate::models::{ReportPayload, ReportType};

pub use inventory::InventoryLayout;
pub use maintenance::MaintenanceLayout;
pub use usage::UsageLayout;

/// Detail tables show at most this many rows.
pub const DETAIL_ROW_CAP: usize = 20;

pub(crate) const ROW_CAP_FOOTNOTE: &str = "* Chỉ hiển thị 20 bản ghi đầu tiên";
pub(crate) const NO_DATA_PLACEHOLDER: &str = "Không có dữ liệu báo cáo";

/// One report body variant. Adding a report type means adding one
/// implementation here; the shared header/footer never changes.
pub trait ReportLayout: Send + Sync {
    fn render_summary(&self, payload: &ReportPayload) -> Vec<Block>;
    fn render_charts(&self, payload: &ReportPayload) -> Vec<Block>;
    fn render_table(&self, payload: &ReportPayload) -> Vec<Block>;

    fn render_body(&self, payload: &ReportPayload) -> Vec<Block> {
        let mut blocks = self.render_summary(payload);
        blocks.extend(self.render_charts(payload));
        blocks.extend(self.render_table(payload));
        blocks
    }
}

/// Body for unrecognized report types: a single placeholder under the
/// generic header.
pub struct FallbackLayout;

impl ReportLayout for FallbackLayout {
    fn render_summary(&self, _payload: &ReportPayload) -> Vec<Block> {
        vec![Block::Placeholder(NO_DATA_PLACEHOLDER.to_string())]
    }

    fn render_charts(&self, _payload: &ReportPayload) -> Vec<Block> {
        Vec::new()
    }

    fn render_table(&self, _payload: &ReportPayload) -> Vec<Block> {
        Vec::new()
    }
}

pub fn create_layout(report_type: ReportType) -> Box<dyn ReportLayout> {
    match report_type {
        ReportType::Inventory => Box::new(InventoryLayout),
        ReportType::Usage => Box::new(UsageLayout),
        ReportType::Maintenance => Box::new(MaintenanceLayout),
        ReportType::Unknown => Box::new(FallbackLayout),
    }
}

/// Cap a detail list at [`DETAIL_ROW_CAP`], attaching the footnote only when
/// rows were actually dropped.
pub(crate) fn cap_rows(rows: Vec<Vec<String>>) -> (Vec<Vec<String>>, Option<String>) {
    if rows.len() > DETAIL_ROW_CAP {
        (
            rows.into_iter().take(DETAIL_ROW_CAP).collect(),
            Some(ROW_CAP_FOOTNOTE.to_string()),
        )
    } else {
        (rows, None)
    }
}
