// ppe-report-service/src/renderers/mod.rs

mod document;
pub mod pdf;
pub mod raster;

pub use document::{report_title, DocumentRenderer};
pub use pdf::{default_filename, PdfAssembler};
pub use raster::{resolve_font, RasterBitmap, Rasterizer};
