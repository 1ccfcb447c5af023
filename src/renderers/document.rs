// ppe-report-service/src/renderers/document.rs

use chrono::{Datelike, NaiveDate};
use tracing::info;

use crate::document::{Document, Footer};
use crate::layouts::create_layout;
use crate::models::{ReportPayload, ReportType};

const INVENTORY_TITLE: &str = "BÁO CÁO TỒN KHO THIẾT BỊ BẢO HỘ LAO ĐỘNG";
const USAGE_TITLE: &str = "BÁO CÁO PHÂN CÔNG THIẾT BỊ BẢO HỘ LAO ĐỘNG";
const MAINTENANCE_TITLE: &str = "BÁO CÁO BẢO TRÌ THIẾT BỊ BẢO HỘ LAO ĐỘNG";
const FALLBACK_TITLE: &str = "BÁO CÁO THIẾT BỊ BẢO HỘ LAO ĐỘNG";

const ORGANIZATION_LINE: &str = "Hệ thống quản lý thiết bị bảo hộ lao động";

pub struct DocumentRenderer;

impl DocumentRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Produce the fixed-width document tree for one report.
    ///
    /// Pure apart from the caller-supplied generation date; identical inputs
    /// always yield an identical tree.
    pub fn render(
        &self,
        payload: &ReportPayload,
        report_type: ReportType,
        generated_on: NaiveDate,
    ) -> Document {
        let layout = create_layout(report_type);
        let blocks = layout.render_body(payload);

        let document = Document {
            title: report_title(report_type).to_string(),
            subtitle: format!("Ngày tạo: {}", long_date(generated_on)),
            blocks,
            footer: Footer {
                organization: ORGANIZATION_LINE.to_string(),
                // Visual-only; the real page split happens over the raster.
                page_label: "Trang 1/1".to_string(),
            },
        };

        info!(
            report_type = report_type.as_str(),
            blocks = document.blocks.len(),
            "Rendered report document"
        );
        document
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn report_title(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Inventory => INVENTORY_TITLE,
        ReportType::Usage => USAGE_TITLE,
        ReportType::Maintenance => MAINTENANCE_TITLE,
        ReportType::Unknown => FALLBACK_TITLE,
    }
}

/// Vietnamese long date form, e.g. "ngày 1 tháng 6 năm 2024".
fn long_date(date: NaiveDate) -> String {
    format!(
        "ngày {} tháng {} năm {}",
        date.day(),
        date.month(),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;
    use crate::models::InventoryReport;

    fn some_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn title_mapping_is_exact() {
        assert_eq!(
            report_title(ReportType::Inventory),
            "BÁO CÁO TỒN KHO THIẾT BỊ BẢO HỘ LAO ĐỘNG"
        );
        assert_eq!(
            report_title(ReportType::Usage),
            "BÁO CÁO PHÂN CÔNG THIẾT BỊ BẢO HỘ LAO ĐỘNG"
        );
        assert_eq!(
            report_title(ReportType::Maintenance),
            "BÁO CÁO BẢO TRÌ THIẾT BỊ BẢO HỘ LAO ĐỘNG"
        );
        assert_eq!(
            report_title(ReportType::Unknown),
            "BÁO CÁO THIẾT BỊ BẢO HỘ LAO ĐỘNG"
        );
    }

    #[test]
    fn subtitle_uses_long_date_form() {
        let doc = DocumentRenderer::new().render(
            &ReportPayload::Inventory(InventoryReport::default()),
            ReportType::Inventory,
            some_date(),
        );
        assert_eq!(doc.subtitle, "Ngày tạo: ngày 1 tháng 6 năm 2024");
    }

    #[test]
    fn unknown_type_renders_placeholder_under_fallback_title() {
        let doc = DocumentRenderer::new().render(
            &ReportPayload::Empty,
            ReportType::Unknown,
            some_date(),
        );
        assert_eq!(doc.title, FALLBACK_TITLE);
        assert_eq!(doc.blocks.len(), 1);
        assert!(matches!(doc.blocks[0], Block::Placeholder(_)));
    }

    #[test]
    fn footer_is_static() {
        let doc = DocumentRenderer::new().render(
            &ReportPayload::Inventory(InventoryReport::default()),
            ReportType::Inventory,
            some_date(),
        );
        assert_eq!(doc.footer.page_label, "Trang 1/1");
        assert_eq!(doc.footer.organization, ORGANIZATION_LINE);
    }
}
