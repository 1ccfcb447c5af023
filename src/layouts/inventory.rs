// ppe-report-service/src/layouts/inventory.rs

use crate::document::{BarRow, Block, StatCard, SummaryCell, TableBlock, Tint, TrendCard};
use crate::layouts::{ReportLayout, NO_DATA_PLACEHOLDER};
use crate::models::{percentage, InventoryReport, ReportPayload};

pub struct InventoryLayout;

impl InventoryLayout {
    fn report<'a>(payload: &'a ReportPayload) -> Option<&'a InventoryReport> {
        match payload {
            ReportPayload::Inventory(report) => Some(report),
            _ => None,
        }
    }
}

impl ReportLayout for InventoryLayout {
    fn render_summary(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return vec![Block::Placeholder(NO_DATA_PLACEHOLDER.to_string())];
        };

        vec![
            Block::Heading("Tổng quan tồn kho".to_string()),
            Block::SummaryGrid(vec![
                SummaryCell {
                    label: "Tổng danh mục".to_string(),
                    value: report.total_categories.to_string(),
                },
                SummaryCell {
                    label: "Tổng thiết bị".to_string(),
                    value: report.total_devices.to_string(),
                },
                SummaryCell {
                    label: "Sẵn sàng cấp phát".to_string(),
                    value: report.available_devices.to_string(),
                },
                SummaryCell {
                    label: "Đã cấp phát".to_string(),
                    value: report.issued_devices.to_string(),
                },
            ]),
        ]
    }

    fn render_charts(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return Vec::new();
        };
        let total = report.total_devices;

        // One proportional bar per category. The fill tracks the issued share
        // of the whole fleet; the label carries the category's raw total.
        let bars = report
            .categories
            .iter()
            .map(|slice| {
                let pct = percentage(slice.issued_quantity, total);
                BarRow {
                    label: slice.name.clone(),
                    value_label: format!("{} ({}%)", slice.total_quantity, pct),
                    percent: pct,
                    tint: Tint::Blue,
                }
            })
            .collect::<Vec<_>>();

        let status_cards = Block::StatCards(vec![
            StatCard {
                label: "Sẵn sàng".to_string(),
                count: report.available_devices.to_string(),
                percent: percentage(report.available_devices, total),
                tint: Tint::Green,
            },
            StatCard {
                label: "Đã cấp phát".to_string(),
                count: report.issued_devices.to_string(),
                percent: percentage(report.issued_devices, total),
                tint: Tint::Blue,
            },
            StatCard {
                label: "Cần bảo trì".to_string(),
                count: report.maintenance_count.to_string(),
                percent: percentage(report.maintenance_count, total),
                tint: Tint::Amber,
            },
            StatCard {
                label: "Hết hạn".to_string(),
                count: report.expired_count.to_string(),
                percent: percentage(report.expired_count, total),
                tint: Tint::Red,
            },
        ]);

        let utilization = ratio(report.issued_devices, total);
        let utilization_tier = if utilization > 0.8 {
            "Cao"
        } else if utilization > 0.5 {
            "Trung bình"
        } else {
            "Thấp"
        };

        let efficiency = ratio(report.available_devices, total);
        let efficiency_tier = if efficiency > 0.3 { "Tốt" } else { "Cần cải thiện" };

        let trends = Block::TrendCards(vec![
            TrendCard {
                label: "Tỷ lệ sử dụng".to_string(),
                percent: percentage(report.issued_devices, total),
                classification: utilization_tier.to_string(),
                tint: Tint::Blue,
            },
            TrendCard {
                label: "Hiệu quả quản lý".to_string(),
                percent: percentage(report.available_devices, total),
                classification: efficiency_tier.to_string(),
                tint: Tint::Green,
            },
        ]);

        vec![
            Block::Heading("Phân bố theo danh mục".to_string()),
            Block::BarChart(bars),
            Block::Heading("Trạng thái thiết bị".to_string()),
            status_cards,
            Block::Heading("Chỉ số xu hướng".to_string()),
            trends,
        ]
    }

    fn render_table(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return Vec::new();
        };

        // Inventory detail is never truncated.
        let rows = report
            .categories
            .iter()
            .map(|slice| {
                vec![
                    slice.name.clone(),
                    slice.total_quantity.to_string(),
                    slice.issued_quantity.to_string(),
                    slice.remaining_quantity.to_string(),
                ]
            })
            .collect();

        vec![
            Block::Heading("Chi tiết theo danh mục".to_string()),
            Block::Table(TableBlock {
                headers: vec![
                    "Danh mục".to_string(),
                    "Tổng số".to_string(),
                    "Đã cấp phát".to_string(),
                    "Còn lại".to_string(),
                ],
                widths: vec![0.40, 0.20, 0.20, 0.20],
                rows,
                footnote: None,
            }),
        ]
    }
}

fn ratio(part: u32, total: u32) -> f64 {
    if total > 0 {
        part as f64 / total as f64
    } else {
        0.0
    }
}
