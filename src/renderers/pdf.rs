// ppe-report-service/src/renderers/pdf.rs
//
// Slices the raster bitmap into A4-height bands and assembles the multi-page
// PDF. The full-height image is embedded once per page, shifted upward by
// one band each time; every page clips to its own bounds, so each shows the
// next slice of the same tall raster.

use chrono::NaiveDate;
use printpdf::{ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px};
use std::io::BufWriter;
use tracing::info;

use crate::error::{ReportError, Result};
use crate::models::ReportType;
use crate::renderers::raster::RasterBitmap;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Usable band height per page, 2 mm short of the physical page as a safety
/// margin against edge clipping.
pub const USABLE_PAGE_HEIGHT_MM: f32 = 295.0;

const MM_PER_INCH: f32 = 25.4;

/// Default output filename: `bao_cao_<reportType>_<YYYY-MM-DD>.pdf`.
pub fn default_filename(report_type: ReportType, date: NaiveDate) -> String {
    format!(
        "bao_cao_{}_{}.pdf",
        report_type.as_str(),
        date.format("%Y-%m-%d")
    )
}

/// Top-based vertical offsets (mm) of the full image on each page. One entry
/// per page: 0 on the first page, then shifted up by one band per page.
pub fn page_offsets(image_height_mm: f32) -> Vec<f32> {
    let mut offsets = vec![0.0];
    let mut height_left = image_height_mm - USABLE_PAGE_HEIGHT_MM;
    while height_left > 0.0 {
        offsets.push(height_left - image_height_mm);
        height_left -= USABLE_PAGE_HEIGHT_MM;
    }
    offsets
}

pub struct PdfAssembler;

impl PdfAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble the paginated PDF from one raster bitmap.
    pub fn assemble(&self, bitmap: &RasterBitmap, title: &str) -> Result<Vec<u8>> {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(ReportError::PdfError("empty raster bitmap".to_string()));
        }

        // Scale-to-fit-width: the raster always spans the full 210 mm.
        let image_height_mm =
            bitmap.height() as f32 * PAGE_WIDTH_MM / bitmap.width() as f32;
        let offsets = page_offsets(image_height_mm);
        let dpi = bitmap.width() as f32 / (PAGE_WIDTH_MM / MM_PER_INCH);

        // The raster is drawn over an opaque white fill, so alpha can be
        // dropped without compositing.
        let rgb_data: Vec<u8> = bitmap
            .image
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();

        let (doc, first_page, first_layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );

        for (index, top_offset) in offsets.iter().enumerate() {
            let layer = if index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                doc.get_page(page).get_layer(layer)
            };

            let image = Image::from(ImageXObject {
                width: Px(bitmap.width() as usize),
                height: Px(bitmap.height() as usize),
                color_space: ColorSpace::Rgb,
                bits_per_component: ColorBits::Bit8,
                interpolate: false,
                image_data: rgb_data.clone(),
                image_filter: None,
                clipping_bbox: None,
                smask: None,
            });

            // Convert the top-based offset to printpdf's bottom-left origin.
            let translate_y = PAGE_HEIGHT_MM - top_offset - image_height_mm;
            image.add_to_layer(
                layer,
                ImageTransform {
                    translate_x: Some(Mm(0.0)),
                    translate_y: Some(Mm(translate_y)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
        }

        let mut writer = BufWriter::new(Vec::<u8>::new());
        doc.save(&mut writer)
            .map_err(|e| ReportError::PdfError(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::PdfError(e.to_string()))?;

        info!(
            pages = offsets.len(),
            image_height_mm,
            size_kb = bytes.len() / 1024,
            "Assembled report PDF"
        );
        Ok(bytes)
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}
