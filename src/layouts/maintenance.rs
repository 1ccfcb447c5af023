// ppe-report-service/src/layouts/maintenance.rs

use crate::document::{BarRow, Block, StatCard, SummaryCell, TableBlock, Tint};
use crate::layouts::{cap_rows, ReportLayout, NO_DATA_PLACEHOLDER};
use crate::models::{percentage, MaintenanceReport, ReportPayload};

/// Fixed demonstration proportions for the type-breakdown bars. These are
/// deliberately not derived from the payload; the dashboard has always shown
/// this static split and downstream consumers pin it in regression tests.
pub(crate) const TYPE_BREAKDOWN: [(&str, u32); 3] = [
    ("Bảo trì định kỳ", 60),
    ("Sửa chữa", 25),
    ("Thay thế", 15),
];

pub struct MaintenanceLayout;

impl MaintenanceLayout {
    fn report<'a>(payload: &'a ReportPayload) -> Option<&'a MaintenanceReport> {
        match payload {
            ReportPayload::Maintenance(report) => Some(report),
            _ => None,
        }
    }
}

impl ReportLayout for MaintenanceLayout {
    fn render_summary(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return vec![Block::Placeholder(NO_DATA_PLACEHOLDER.to_string())];
        };

        vec![
            Block::Heading("Tổng quan bảo trì".to_string()),
            Block::SummaryGrid(vec![
                SummaryCell {
                    label: "Tổng bảo trì".to_string(),
                    value: report.total_maintenance.to_string(),
                },
                SummaryCell {
                    label: "Hoàn thành".to_string(),
                    value: report.completed_maintenance.to_string(),
                },
                SummaryCell {
                    label: "Đang chờ".to_string(),
                    value: report.pending_maintenance.to_string(),
                },
                SummaryCell {
                    label: "Quá hạn".to_string(),
                    value: report.overdue_maintenance.to_string(),
                },
            ]),
        ]
    }

    fn render_charts(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return Vec::new();
        };
        let total = report.total_maintenance;

        let breakdown = Block::BarChart(
            TYPE_BREAKDOWN
                .iter()
                .map(|(label, pct)| BarRow {
                    label: (*label).to_string(),
                    value_label: format!("{pct}%"),
                    percent: *pct,
                    tint: Tint::Blue,
                })
                .collect(),
        );

        let status_cards = Block::StatCards(vec![
            StatCard {
                label: "Hoàn thành".to_string(),
                count: report.completed_maintenance.to_string(),
                percent: percentage(report.completed_maintenance, total),
                tint: Tint::Green,
            },
            StatCard {
                label: "Đang chờ".to_string(),
                count: report.pending_maintenance.to_string(),
                percent: percentage(report.pending_maintenance, total),
                tint: Tint::Amber,
            },
            StatCard {
                label: "Quá hạn".to_string(),
                count: report.overdue_maintenance.to_string(),
                percent: percentage(report.overdue_maintenance, total),
                tint: Tint::Red,
            },
        ]);

        vec![
            Block::Heading("Phân bố theo loại bảo trì".to_string()),
            breakdown,
            Block::Heading("Trạng thái bảo trì".to_string()),
            status_cards,
        ]
    }

    fn render_table(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return Vec::new();
        };

        let rows = report
            .maintenance_records
            .iter()
            .map(|r| {
                vec![
                    r.item_name.clone(),
                    r.maintenance_type.clone(),
                    r.maintenance_date.clone(),
                    r.status.clone(),
                    r.notes.clone(),
                ]
            })
            .collect();
        let (rows, footnote) = cap_rows(rows);

        vec![
            Block::Heading("Chi tiết bảo trì".to_string()),
            Block::Table(TableBlock {
                headers: vec![
                    "Thiết bị".to_string(),
                    "Loại bảo trì".to_string(),
                    "Ngày bảo trì".to_string(),
                    "Trạng thái".to_string(),
                    "Ghi chú".to_string(),
                ],
                widths: vec![0.22, 0.20, 0.16, 0.16, 0.26],
                rows,
                footnote,
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MaintenanceRow;

    fn rows(n: usize) -> Vec<MaintenanceRow> {
        (0..n)
            .map(|i| MaintenanceRow {
                item_name: format!("Thiết bị {i}"),
                maintenance_type: "Sửa chữa".to_string(),
                maintenance_date: "15/05/2024".to_string(),
                status: "Chờ xử lý".to_string(),
                notes: String::new(),
            })
            .collect()
    }

    fn breakdown_for(report: MaintenanceReport) -> Vec<BarRow> {
        let charts = MaintenanceLayout.render_charts(&ReportPayload::Maintenance(report));
        charts
            .into_iter()
            .find_map(|b| match b {
                Block::BarChart(bars) => Some(bars),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn type_breakdown_is_fixed_regardless_of_records() {
        for record_count in [0usize, 3, 40] {
            let report = MaintenanceReport {
                total_maintenance: record_count as u32,
                maintenance_records: rows(record_count),
                ..Default::default()
            };
            let bars = breakdown_for(report);
            let percents: Vec<u32> = bars.iter().map(|b| b.percent).collect();
            assert_eq!(percents, vec![60, 25, 15]);
        }
    }

    #[test]
    fn detail_table_caps_at_twenty_rows() {
        let report = MaintenanceReport {
            total_maintenance: 33,
            maintenance_records: rows(33),
            ..Default::default()
        };
        let blocks = MaintenanceLayout.render_table(&ReportPayload::Maintenance(report));
        let table = blocks
            .into_iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.rows.len(), 20);
        assert!(table.footnote.is_some());
    }

    #[test]
    fn status_cards_guard_zero_total() {
        let charts =
            MaintenanceLayout.render_charts(&ReportPayload::Maintenance(Default::default()));
        let cards = charts
            .into_iter()
            .find_map(|b| match b {
                Block::StatCards(cards) => Some(cards),
                _ => None,
            })
            .unwrap();
        cards.iter().for_each(|c| assert_eq!(c.percent, 0));
    }
}
