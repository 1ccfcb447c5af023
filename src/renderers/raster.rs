// ppe-report-service/src/renderers/raster.rs
//
// Converts a mounted surface into a single RGBA bitmap. A4 geometry at
// 96 DPI (794x1123 logical px) captured at a fixed device-pixel scale with a
// white background fill; content taller than one page simply grows the
// bitmap. Pagination happens later, over the finished raster.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use rusttype::{point, Font, Scale};
use tracing::{debug, info};

use crate::document::{Block, Document, TableBlock, Tint};
use crate::error::{ReportError, Result};
use crate::offscreen::Surface;

/// A4 portrait at 96 DPI, before device scaling.
pub const A4_WIDTH_PX: u32 = 794;
pub const A4_HEIGHT_PX: u32 = 1123;
/// Device-pixel capture scale.
pub const DEFAULT_SCALE: u32 = 2;

const MARGIN: u32 = 40;
const CONTENT_WIDTH: u32 = A4_WIDTH_PX - 2 * MARGIN;
const BLOCK_GAP: u32 = 16;

const HEADER_HEIGHT: u32 = 70;
const HEADING_HEIGHT: u32 = 30;
const SUMMARY_ROW_HEIGHT: u32 = 76;
const BAR_ROW_HEIGHT: u32 = 34;
const CARD_ROW_HEIGHT: u32 = 84;
const TABLE_HEADER_HEIGHT: u32 = 30;
const TABLE_ROW_HEIGHT: u32 = 26;
const FOOTNOTE_HEIGHT: u32 = 20;
const PLACEHOLDER_HEIGHT: u32 = 80;
const FOOTER_HEIGHT: u32 = 56;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TEXT: Rgba<u8> = Rgba([31, 41, 55, 255]);
const MUTED: Rgba<u8> = Rgba([107, 114, 128, 255]);
const BORDER: Rgba<u8> = Rgba([209, 213, 219, 255]);
const TRACK: Rgba<u8> = Rgba([229, 231, 235, 255]);
const HEADER_FILL: Rgba<u8> = Rgba([243, 244, 246, 255]);

fn tint_color(tint: Tint) -> Rgba<u8> {
    match tint {
        Tint::Blue => Rgba([59, 130, 246, 255]),
        Tint::Green => Rgba([16, 185, 129, 255]),
        Tint::Amber => Rgba([245, 158, 11, 255]),
        Tint::Red => Rgba([239, 68, 68, 255]),
        Tint::Gray => MUTED,
    }
}

/// Font paths probed when no explicit path is configured.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Load the glyph font from an explicit path or the first hit on the search
/// list. The report text is Vietnamese, so the defaults favor faces with
/// full diacritic coverage.
pub fn resolve_font(explicit_path: Option<&str>) -> Result<Font<'static>> {
    if let Some(path) = explicit_path {
        let bytes = std::fs::read(path)
            .map_err(|e| ReportError::FontError(format!("cannot read font {path}: {e}")))?;
        return Font::try_from_vec(bytes)
            .ok_or_else(|| ReportError::FontError(format!("invalid font file: {path}")));
    }

    for path in FONT_SEARCH_PATHS {
        if let Ok(bytes) = std::fs::read(path) {
            if let Some(font) = Font::try_from_vec(bytes) {
                debug!(path, "Resolved raster font");
                return Ok(font);
            }
        }
    }

    Err(ReportError::FontError(
        "no usable TrueType font found on this system".to_string(),
    ))
}

/// Full-height pixel buffer produced from one surface; consumed exactly once
/// by the paginator.
pub struct RasterBitmap {
    pub image: RgbaImage,
}

impl RasterBitmap {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Logical content height of a document at A4 width, in unscaled pixels.
/// Never less than one full page.
pub fn measure_height(document: &Document) -> u32 {
    let mut height = MARGIN + HEADER_HEIGHT;
    for block in &document.blocks {
        height += block_height(block) + BLOCK_GAP;
    }
    height += BLOCK_GAP + FOOTER_HEIGHT + MARGIN;
    height.max(A4_HEIGHT_PX)
}

fn block_height(block: &Block) -> u32 {
    match block {
        Block::Heading(_) => HEADING_HEIGHT,
        Block::SummaryGrid(cells) => {
            let rows = (cells.len() as u32 + 1) / 2;
            rows * SUMMARY_ROW_HEIGHT
        }
        Block::BarChart(bars) => bars.len() as u32 * BAR_ROW_HEIGHT,
        Block::StatCards(_) | Block::TrendCards(_) => CARD_ROW_HEIGHT,
        Block::Table(table) => {
            let footnote = if table.footnote.is_some() {
                FOOTNOTE_HEIGHT
            } else {
                0
            };
            TABLE_HEADER_HEIGHT + table.rows.len() as u32 * TABLE_ROW_HEIGHT + footnote
        }
        Block::Placeholder(_) => PLACEHOLDER_HEIGHT,
    }
}

pub struct Rasterizer {
    font: Font<'static>,
}

impl Rasterizer {
    pub fn new(font: Font<'static>) -> Self {
        Self { font }
    }

    /// Capture the surface into a single bitmap at its device scale.
    pub fn rasterize(&self, surface: &Surface) -> Result<RasterBitmap> {
        let scale = surface.scale.max(1);
        let width = surface
            .width_px
            .checked_mul(scale)
            .ok_or_else(|| ReportError::RasterError("surface width overflow".to_string()))?;
        let height = surface
            .height_px
            .checked_mul(scale)
            .ok_or_else(|| ReportError::RasterError("surface height overflow".to_string()))?;

        let mut canvas = Canvas {
            image: RgbaImage::from_pixel(width, height, WHITE),
            scale,
            font: &self.font,
        };
        self.draw_document(&mut canvas, surface.document(), surface.height_px);

        info!(
            width,
            height,
            scale,
            "Captured surface into raster bitmap"
        );
        Ok(RasterBitmap { image: canvas.image })
    }

    fn draw_document(&self, canvas: &mut Canvas<'_>, document: &Document, page_height: u32) {
        let mut y = MARGIN;

        // Header
        canvas.text_centered(A4_WIDTH_PX / 2, y, 20, TEXT, &document.title);
        canvas.text_centered(A4_WIDTH_PX / 2, y + 30, 11, MUTED, &document.subtitle);
        canvas.hline(MARGIN, A4_WIDTH_PX - MARGIN, y + 52, TEXT);
        y += HEADER_HEIGHT + BLOCK_GAP;

        for block in &document.blocks {
            self.draw_block(canvas, block, y);
            y += block_height(block) + BLOCK_GAP;
        }

        // Footer pinned to the bottom of the logical page.
        let footer_y = page_height - MARGIN - FOOTER_HEIGHT;
        canvas.hline(MARGIN, A4_WIDTH_PX - MARGIN, footer_y, BORDER);
        canvas.text_centered(
            A4_WIDTH_PX / 2,
            footer_y + 12,
            10,
            TEXT,
            &document.footer.organization,
        );
        canvas.text_centered(
            A4_WIDTH_PX / 2,
            footer_y + 32,
            9,
            MUTED,
            &document.footer.page_label,
        );
    }

    fn draw_block(&self, canvas: &mut Canvas<'_>, block: &Block, y: u32) {
        match block {
            Block::Heading(text) => {
                canvas.text(MARGIN, y + 6, 14, TEXT, text);
            }
            Block::SummaryGrid(cells) => {
                let cell_w = (CONTENT_WIDTH - 12) / 2;
                for (i, cell) in cells.iter().enumerate() {
                    let col = (i % 2) as u32;
                    let row = (i / 2) as u32;
                    let x = MARGIN + col * (cell_w + 12);
                    let cy = y + row * SUMMARY_ROW_HEIGHT;
                    canvas.stroke_rect(x, cy, cell_w, 64, BORDER);
                    canvas.text_centered(x + cell_w / 2, cy + 12, 18, TEXT, &cell.value);
                    canvas.text_centered(x + cell_w / 2, cy + 42, 10, MUTED, &cell.label);
                }
            }
            Block::BarChart(bars) => {
                for (i, bar) in bars.iter().enumerate() {
                    let by = y + i as u32 * BAR_ROW_HEIGHT;
                    canvas.text(MARGIN, by, 10, TEXT, &bar.label);
                    canvas.text_right(A4_WIDTH_PX - MARGIN, by, 10, MUTED, &bar.value_label);
                    canvas.fill_rect(MARGIN, by + 18, CONTENT_WIDTH, 8, TRACK);
                    let fill = CONTENT_WIDTH * bar.percent.min(100) / 100;
                    if fill > 0 {
                        canvas.fill_rect(MARGIN, by + 18, fill, 8, tint_color(bar.tint));
                    }
                }
            }
            Block::StatCards(cards) => {
                let n = cards.len().max(1) as u32;
                let card_w = (CONTENT_WIDTH - 12 * (n - 1)) / n;
                for (i, card) in cards.iter().enumerate() {
                    let x = MARGIN + i as u32 * (card_w + 12);
                    canvas.stroke_rect(x, y, card_w, 72, tint_color(card.tint));
                    canvas.text_centered(x + card_w / 2, y + 8, 16, TEXT, &card.count);
                    canvas.text_centered(
                        x + card_w / 2,
                        y + 34,
                        11,
                        tint_color(card.tint),
                        &format!("{}%", card.percent),
                    );
                    canvas.text_centered(x + card_w / 2, y + 52, 9, MUTED, &card.label);
                }
            }
            Block::TrendCards(cards) => {
                let n = cards.len().max(1) as u32;
                let card_w = (CONTENT_WIDTH - 12 * (n - 1)) / n;
                for (i, card) in cards.iter().enumerate() {
                    let x = MARGIN + i as u32 * (card_w + 12);
                    canvas.stroke_rect(x, y, card_w, 72, BORDER);
                    canvas.text(x + 10, y + 8, 10, MUTED, &card.label);
                    canvas.text(
                        x + 10,
                        y + 28,
                        16,
                        tint_color(card.tint),
                        &format!("{}%", card.percent),
                    );
                    canvas.text_right(x + card_w - 10, y + 32, 10, TEXT, &card.classification);
                }
            }
            Block::Table(table) => self.draw_table(canvas, table, y),
            Block::Placeholder(text) => {
                canvas.stroke_rect(MARGIN, y, CONTENT_WIDTH, 72, BORDER);
                canvas.text_centered(A4_WIDTH_PX / 2, y + 28, 12, MUTED, text);
            }
        }
    }

    fn draw_table(&self, canvas: &mut Canvas<'_>, table: &TableBlock, y: u32) {
        let col_widths: Vec<u32> = table
            .widths
            .iter()
            .map(|w| (CONTENT_WIDTH as f32 * w) as u32)
            .collect();

        // Header row
        canvas.fill_rect(MARGIN, y, CONTENT_WIDTH, TABLE_HEADER_HEIGHT, HEADER_FILL);
        canvas.stroke_rect(MARGIN, y, CONTENT_WIDTH, TABLE_HEADER_HEIGHT, BORDER);
        let mut x = MARGIN;
        for (header, w) in table.headers.iter().zip(&col_widths) {
            canvas.text(x + 6, y + 8, 10, TEXT, &canvas.fit(header, 10, w.saturating_sub(12)));
            x += w;
        }

        // Body rows
        let mut ry = y + TABLE_HEADER_HEIGHT;
        for row in &table.rows {
            canvas.stroke_rect(MARGIN, ry, CONTENT_WIDTH, TABLE_ROW_HEIGHT, BORDER);
            let mut x = MARGIN;
            for (cell, w) in row.iter().zip(&col_widths) {
                canvas.text(x + 6, ry + 7, 9, TEXT, &canvas.fit(cell, 9, w.saturating_sub(12)));
                x += w;
            }
            ry += TABLE_ROW_HEIGHT;
        }

        // Column separators across header and body
        let mut x = MARGIN;
        for w in &col_widths[..col_widths.len().saturating_sub(1)] {
            x += w;
            canvas.vline(x, y, ry, BORDER);
        }

        if let Some(footnote) = &table.footnote {
            canvas.text(MARGIN, ry + 5, 9, MUTED, footnote);
        }
    }
}

/// Drawing surface in logical coordinates; every primitive multiplies by the
/// device scale at the edge.
struct Canvas<'f> {
    image: RgbaImage,
    scale: u32,
    font: &'f Font<'static>,
}

impl Canvas<'_> {
    fn px(&self, v: u32) -> u32 {
        v * self.scale
    }

    fn font_scale(&self, size: u32) -> Scale {
        Scale::uniform((size * self.scale) as f32)
    }

    fn text(&mut self, x: u32, y: u32, size: u32, color: Rgba<u8>, text: &str) {
        let (px, py) = (self.px(x) as i32, self.px(y) as i32);
        let scale = self.font_scale(size);
        let font = self.font;
        draw_text_mut(&mut self.image, color, px, py, scale, font, text);
    }

    fn text_centered(&mut self, cx: u32, y: u32, size: u32, color: Rgba<u8>, text: &str) {
        let width = self.text_width(text, size);
        let px = (self.px(cx) as f32 - width / 2.0).max(0.0) as i32;
        let py = self.px(y) as i32;
        let scale = self.font_scale(size);
        let font = self.font;
        draw_text_mut(&mut self.image, color, px, py, scale, font, text);
    }

    fn text_right(&mut self, right_x: u32, y: u32, size: u32, color: Rgba<u8>, text: &str) {
        let width = self.text_width(text, size);
        let px = (self.px(right_x) as f32 - width).max(0.0) as i32;
        let py = self.px(y) as i32;
        let scale = self.font_scale(size);
        let font = self.font;
        draw_text_mut(&mut self.image, color, px, py, scale, font, text);
    }

    /// Rendered width in device pixels.
    fn text_width(&self, text: &str, size: u32) -> f32 {
        let scale = self.font_scale(size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Ellipsize `text` to fit `max_width` logical pixels.
    fn fit(&self, text: &str, size: u32, max_width: u32) -> String {
        let max = self.px(max_width) as f32;
        if self.text_width(text, size) <= max {
            return text.to_string();
        }
        let mut chars: Vec<char> = text.chars().collect();
        while !chars.is_empty() {
            chars.pop();
            let candidate: String = chars.iter().collect::<String>() + "…";
            if self.text_width(&candidate, size) <= max {
                return candidate;
            }
        }
        "…".to_string()
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        if w == 0 || h == 0 {
            return;
        }
        let rect = Rect::at(self.px(x) as i32, self.px(y) as i32)
            .of_size(self.px(w), self.px(h));
        draw_filled_rect_mut(&mut self.image, rect, color);
    }

    fn stroke_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        if w == 0 || h == 0 {
            return;
        }
        let rect = Rect::at(self.px(x) as i32, self.px(y) as i32)
            .of_size(self.px(w), self.px(h));
        draw_hollow_rect_mut(&mut self.image, rect, color);
    }

    fn hline(&mut self, x0: u32, x1: u32, y: u32, color: Rgba<u8>) {
        let (x0, x1, y) = (self.px(x0) as f32, self.px(x1) as f32, self.px(y) as f32);
        draw_line_segment_mut(&mut self.image, (x0, y), (x1, y), color);
    }

    fn vline(&mut self, x: u32, y0: u32, y1: u32, color: Rgba<u8>) {
        let (x, y0, y1) = (self.px(x) as f32, self.px(y0) as f32, self.px(y1) as f32);
        draw_line_segment_mut(&mut self.image, (x, y0), (x, y1), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Footer, SummaryCell, TableBlock};

    fn empty_doc() -> Document {
        Document {
            title: "BÁO CÁO".to_string(),
            subtitle: "Ngày tạo: ngày 1 tháng 6 năm 2024".to_string(),
            blocks: Vec::new(),
            footer: Footer {
                organization: "Tổ chức".to_string(),
                page_label: "Trang 1/1".to_string(),
            },
        }
    }

    fn table_doc(rows: usize) -> Document {
        let mut doc = empty_doc();
        doc.blocks.push(Block::Table(TableBlock {
            headers: vec!["A".to_string(), "B".to_string()],
            widths: vec![0.5, 0.5],
            rows: (0..rows)
                .map(|i| vec![i.to_string(), i.to_string()])
                .collect(),
            footnote: None,
        }));
        doc
    }

    #[test]
    fn measure_clamps_to_one_full_page() {
        assert_eq!(measure_height(&empty_doc()), A4_HEIGHT_PX);
    }

    #[test]
    fn measure_grows_with_table_rows() {
        let short = measure_height(&table_doc(5));
        let long = measure_height(&table_doc(200));
        assert!(long > short);
        assert_eq!(
            measure_height(&table_doc(200)),
            long,
            "measurement must be deterministic"
        );
        // 200 rows cannot fit a single page
        assert!(long > A4_HEIGHT_PX);
    }

    #[test]
    fn summary_grid_height_rounds_rows_up() {
        let cells = |n: usize| {
            Block::SummaryGrid(
                (0..n)
                    .map(|i| SummaryCell {
                        label: format!("c{i}"),
                        value: i.to_string(),
                    })
                    .collect(),
            )
        };
        assert_eq!(block_height(&cells(4)), 2 * SUMMARY_ROW_HEIGHT);
        assert_eq!(block_height(&cells(3)), 2 * SUMMARY_ROW_HEIGHT);
        assert_eq!(block_height(&cells(2)), SUMMARY_ROW_HEIGHT);
    }

    #[test]
    fn resolve_font_rejects_bad_explicit_path() {
        let err = resolve_font(Some("/nonexistent/font.ttf")).unwrap_err();
        assert!(matches!(err, ReportError::FontError(_)));
    }

    #[test]
    fn rasterize_draws_text_and_rules_onto_white_canvas() {
        let font = match resolve_font(None) {
            Ok(font) => font,
            Err(_) => {
                eprintln!("skipping: no system font available");
                return;
            }
        };

        let surface = Surface::from_document(table_doc(3), 1);
        let bitmap = Rasterizer::new(font).rasterize(&surface).unwrap();
        assert_eq!(bitmap.width(), A4_WIDTH_PX);
        assert_eq!(bitmap.height(), A4_HEIGHT_PX);

        // Title, header rule and table borders must leave non-white pixels.
        let inked = bitmap.image.pixels().filter(|p| p.0 != WHITE.0).count();
        assert!(inked > 0, "nothing was drawn onto the canvas");
    }
}
