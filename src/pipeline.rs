// ppe-report-service/src/pipeline.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::Settings;
use crate::document::Document;
use crate::error::Result;
use crate::models::{ReportPayload, ReportRequest};
use crate::offscreen::{OffscreenHost, Surface};
use crate::renderers::{
    default_filename, DocumentRenderer, PdfAssembler, RasterBitmap, Rasterizer,
};

/// Orchestrates: shape payload → render document → offscreen capture →
/// paginate → save. One generation per call; nothing persists across calls.
pub struct ReportPipeline {
    settings: Settings,
}

/// Anything that can yield the raster bitmap the paginator consumes. The two
/// entry points differ only in how they produce it.
#[async_trait]
trait RasterSource: Send + Sync {
    async fn capture(&self, rasterizer: &Rasterizer) -> Result<RasterBitmap>;
}

/// Full pipeline source: mounts the document offscreen, waits for layout to
/// settle, captures, and releases the surface on every exit path.
struct OffscreenRender {
    document: Document,
    scale: u32,
    settle_delay: Duration,
}

#[async_trait]
impl RasterSource for OffscreenRender {
    async fn capture(&self, rasterizer: &Rasterizer) -> Result<RasterBitmap> {
        let mut host = OffscreenHost::new(self.scale, self.settle_delay);
        host.mount(self.document.clone())?;
        let captured = async {
            host.settle().await?;
            host.capture(rasterizer)
        }
        .await;
        // Unconditional detach; a capture error must not leak the surface.
        host.release();
        captured
    }
}

/// Direct source for a caller-supplied, already-laid-out surface.
struct ExistingSurface {
    surface: Surface,
}

#[async_trait]
impl RasterSource for ExistingSurface {
    async fn capture(&self, rasterizer: &Rasterizer) -> Result<RasterBitmap> {
        rasterizer.rasterize(&self.surface)
    }
}

impl ReportPipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Full generation: request in, saved PDF path out. Any internal failure
    /// surfaces as the single generic generation error after logging.
    #[instrument(skip(self, request), fields(report_type = request.report_type.as_str()))]
    pub async fn generate_report(&self, request: ReportRequest) -> Result<PathBuf> {
        let generation_id = Uuid::new_v4();
        info!(%generation_id, "Starting report generation");

        let result = self.run_full(request).await;
        match result {
            Ok(path) => {
                info!(%generation_id, path = %path.display(), "Report generation completed");
                Ok(path)
            }
            Err(e) => {
                error!(%generation_id, error = %e, "Report generation failed");
                Err(e.into_generation_failed())
            }
        }
    }

    /// Capture an already-rendered surface directly, skipping the document
    /// renderer and offscreen host. Same pagination and failure contract.
    #[instrument(skip(self, surface))]
    pub async fn generate_from_surface(
        &self,
        surface: Surface,
        filename: &str,
    ) -> Result<PathBuf> {
        let generation_id = Uuid::new_v4();
        info!(%generation_id, filename, "Starting capture of existing surface");

        let result = async {
            let rasterizer = self.rasterizer()?;
            let source = ExistingSurface { surface };
            let bitmap = source.capture(&rasterizer).await?;
            self.paginate_and_save(&bitmap, filename).await
        }
        .await;

        match result {
            Ok(path) => {
                info!(%generation_id, path = %path.display(), "Surface capture completed");
                Ok(path)
            }
            Err(e) => {
                error!(%generation_id, error = %e, "Surface capture failed");
                Err(e.into_generation_failed())
            }
        }
    }

    async fn run_full(&self, request: ReportRequest) -> Result<PathBuf> {
        let generated_on = Local::now().date_naive();
        let payload = ReportPayload::from_value(request.report_type, &request.report_data);
        let document =
            DocumentRenderer::new().render(&payload, request.report_type, generated_on);

        let rasterizer = self.rasterizer()?;
        let source = OffscreenRender {
            document,
            scale: self.settings.raster.scale,
            settle_delay: Duration::from_millis(self.settings.raster.settle_delay_ms),
        };
        let bitmap = source.capture(&rasterizer).await?;

        let filename = request
            .filename
            .unwrap_or_else(|| default_filename(request.report_type, generated_on));
        self.paginate_and_save(&bitmap, &filename).await
    }

    fn rasterizer(&self) -> Result<Rasterizer> {
        let font = crate::renderers::resolve_font(self.settings.raster.font_path.as_deref())?;
        Ok(Rasterizer::new(font))
    }

    async fn paginate_and_save(&self, bitmap: &RasterBitmap, filename: &str) -> Result<PathBuf> {
        let bytes = PdfAssembler::new().assemble(bitmap, filename)?;

        let dir = Path::new(&self.settings.output.dir);
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(filename);
        tokio::fs::write(&path, &bytes).await?;

        info!(
            path = %path.display(),
            size_kb = bytes.len() / 1024,
            "Saved report PDF"
        );
        Ok(path)
    }
}
