// ppe-report-service/src/layouts/usage.rs

use crate::document::{BarRow, Block, StatCard, SummaryCell, TableBlock, Tint};
use crate::layouts::{cap_rows, ReportLayout, NO_DATA_PLACEHOLDER};
use crate::models::{percentage, ReportPayload, UsageReport};

pub struct UsageLayout;

impl UsageLayout {
    fn report<'a>(payload: &'a ReportPayload) -> Option<&'a UsageReport> {
        match payload {
            ReportPayload::Usage(report) => Some(report),
            _ => None,
        }
    }
}

impl ReportLayout for UsageLayout {
    fn render_summary(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return vec![Block::Placeholder(NO_DATA_PLACEHOLDER.to_string())];
        };

        vec![
            Block::Heading("Tổng quan phân công".to_string()),
            Block::SummaryGrid(vec![
                SummaryCell {
                    label: "Tổng phân công".to_string(),
                    value: report.total_assignments.to_string(),
                },
                SummaryCell {
                    label: "Đang sử dụng".to_string(),
                    value: report.active_assignments.to_string(),
                },
                SummaryCell {
                    label: "Đã hoàn thành".to_string(),
                    value: report.completed_assignments.to_string(),
                },
                SummaryCell {
                    label: "Quá hạn".to_string(),
                    value: report.overdue_assignments.to_string(),
                },
            ]),
        ]
    }

    fn render_charts(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return Vec::new();
        };
        let total = report.total_assignments;

        let segments = Block::StatCards(vec![
            StatCard {
                label: "Đang sử dụng".to_string(),
                count: report.active_assignments.to_string(),
                percent: percentage(report.active_assignments, total),
                tint: Tint::Blue,
            },
            StatCard {
                label: "Hoàn thành".to_string(),
                count: report.completed_assignments.to_string(),
                percent: percentage(report.completed_assignments, total),
                tint: Tint::Green,
            },
            StatCard {
                label: "Quá hạn".to_string(),
                count: report.overdue_assignments.to_string(),
                percent: percentage(report.overdue_assignments, total),
                tint: Tint::Red,
            },
        ]);

        let performance = Block::BarChart(vec![
            BarRow {
                label: "Tỷ lệ hoàn thành".to_string(),
                value_label: format!("{}%", percentage(report.completed_assignments, total)),
                percent: percentage(report.completed_assignments, total),
                tint: Tint::Green,
            },
            BarRow {
                label: "Tỷ lệ quá hạn".to_string(),
                value_label: format!("{}%", percentage(report.overdue_assignments, total)),
                percent: percentage(report.overdue_assignments, total),
                tint: Tint::Red,
            },
        ]);

        vec![
            Block::Heading("Phân bố trạng thái".to_string()),
            segments,
            Block::Heading("Hiệu suất sử dụng".to_string()),
            performance,
        ]
    }

    fn render_table(&self, payload: &ReportPayload) -> Vec<Block> {
        let Some(report) = Self::report(payload) else {
            return Vec::new();
        };

        let rows = report
            .assignments
            .iter()
            .map(|a| {
                vec![
                    a.user_name.clone(),
                    a.item_name.clone(),
                    a.quantity.to_string(),
                    a.start_date.clone(),
                    a.status.clone(),
                ]
            })
            .collect();
        let (rows, footnote) = cap_rows(rows);

        vec![
            Block::Heading("Chi tiết phân công".to_string()),
            Block::Table(TableBlock {
                headers: vec![
                    "Người dùng".to_string(),
                    "Thiết bị".to_string(),
                    "Số lượng".to_string(),
                    "Ngày bắt đầu".to_string(),
                    "Trạng thái".to_string(),
                ],
                widths: vec![0.26, 0.26, 0.12, 0.18, 0.18],
                rows,
                footnote,
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssignmentRow;

    fn rows(n: usize) -> Vec<AssignmentRow> {
        (0..n)
            .map(|i| AssignmentRow {
                user_name: format!("Người dùng {i}"),
                item_name: "Mũ bảo hộ".to_string(),
                quantity: 1,
                start_date: "01/06/2024".to_string(),
                status: "Đang sử dụng".to_string(),
            })
            .collect()
    }

    fn table_for(report: UsageReport) -> TableBlock {
        let blocks = UsageLayout.render_table(&ReportPayload::Usage(report));
        blocks
            .into_iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn detail_table_caps_at_twenty_rows_with_footnote() {
        let report = UsageReport {
            total_assignments: 25,
            assignments: rows(25),
            ..Default::default()
        };
        let table = table_for(report);
        assert_eq!(table.rows.len(), 20);
        assert!(table.footnote.is_some());
    }

    #[test]
    fn short_detail_table_keeps_all_rows_without_footnote() {
        let report = UsageReport {
            total_assignments: 20,
            assignments: rows(20),
            ..Default::default()
        };
        let table = table_for(report);
        assert_eq!(table.rows.len(), 20);
        assert!(table.footnote.is_none());
    }

    #[test]
    fn zero_assignments_yield_zero_percentages() {
        let charts = UsageLayout.render_charts(&ReportPayload::Usage(UsageReport::default()));
        for block in &charts {
            match block {
                Block::StatCards(cards) => cards.iter().for_each(|c| assert_eq!(c.percent, 0)),
                Block::BarChart(bars) => bars.iter().for_each(|b| assert_eq!(b.percent, 0)),
                _ => {}
            }
        }
    }

    #[test]
    fn segment_percentages_cover_the_buckets() {
        let report = UsageReport {
            total_assignments: 8,
            active_assignments: 4,
            completed_assignments: 3,
            overdue_assignments: 1,
            assignments: rows(8),
        };
        let charts = UsageLayout.render_charts(&ReportPayload::Usage(report));
        let cards = charts
            .iter()
            .find_map(|b| match b {
                Block::StatCards(cards) => Some(cards),
                _ => None,
            })
            .unwrap();
        assert_eq!(cards[0].percent, 50);
        assert_eq!(cards[1].percent, 38); // 37.5 rounds half-up
        assert_eq!(cards[2].percent, 13); // 12.5 rounds half-up
    }
}
