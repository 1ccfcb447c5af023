// ppe-report-service/src/document.rs
//
// The in-memory visual tree produced by the document renderer: fixed A4
// width, unbounded height, pure data. The offscreen host owns it for the
// duration of one generation call and the rasterizer walks it exactly once.

/// Accent tint used by cards and proportional bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Blue,
    Green,
    Amber,
    Red,
    Gray,
}

#[derive(Debug, Clone)]
pub struct SummaryCell {
    pub label: String,
    pub value: String,
}

/// One percentage-width indicator row: label on the left, raw value label on
/// the right, filled track sized by `percent` (clamped to 0..=100 at draw).
#[derive(Debug, Clone)]
pub struct BarRow {
    pub label: String,
    pub value_label: String,
    pub percent: u32,
    pub tint: Tint,
}

#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: String,
    pub count: String,
    pub percent: u32,
    pub tint: Tint,
}

#[derive(Debug, Clone)]
pub struct TrendCard {
    pub label: String,
    pub percent: u32,
    pub classification: String,
    pub tint: Tint,
}

#[derive(Debug, Clone)]
pub struct TableBlock {
    pub headers: Vec<String>,
    /// Column width fractions; must sum to ~1.0 and match `headers` length.
    pub widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
    pub footnote: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Block {
    Heading(String),
    SummaryGrid(Vec<SummaryCell>),
    BarChart(Vec<BarRow>),
    StatCards(Vec<StatCard>),
    TrendCards(Vec<TrendCard>),
    Table(TableBlock),
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct Footer {
    pub organization: String,
    pub page_label: String,
}

/// A complete rendered report document, ready for the offscreen host.
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub subtitle: String,
    pub blocks: Vec<Block>,
    pub footer: Footer,
}
