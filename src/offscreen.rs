// ppe-report-service/src/offscreen.rs
//
// Detached render host for one generation call. The document tree is
// mounted into an invisible A4-width surface, allowed to settle, captured
// once, then released. Release is unconditional on every exit path; a
// process-wide attachment count makes leak checks possible from tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{ReportError, Result};
use crate::renderers::raster::{measure_height, RasterBitmap, Rasterizer, A4_WIDTH_PX};

static ATTACHED_SURFACES: AtomicUsize = AtomicUsize::new(0);

/// A detached, fixed-width render surface holding one document.
#[derive(Debug)]
pub struct Surface {
    pub width_px: u32,
    pub height_px: u32,
    pub scale: u32,
    document: Document,
}

impl Surface {
    /// Build a standalone surface from an already-rendered document, for the
    /// direct-capture entry point that bypasses the offscreen host.
    pub fn from_document(document: Document, scale: u32) -> Self {
        let height_px = measure_height(&document);
        Self {
            width_px: A4_WIDTH_PX,
            height_px,
            scale,
            document,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Idle,
    Mounted,
    Settled,
    Captured,
    Released,
}

impl HostState {
    fn name(&self) -> &'static str {
        match self {
            HostState::Idle => "idle",
            HostState::Mounted => "mounted",
            HostState::Settled => "settled",
            HostState::Captured => "captured",
            HostState::Released => "released",
        }
    }
}

/// One-shot offscreen render host. Construct a fresh host per generation;
/// hosts are never shared between concurrent calls.
pub struct OffscreenHost {
    state: HostState,
    surface: Option<Surface>,
    scale: u32,
    settle_delay: Duration,
}

impl OffscreenHost {
    pub fn new(scale: u32, settle_delay: Duration) -> Self {
        Self {
            state: HostState::Idle,
            surface: None,
            scale,
            settle_delay,
        }
    }

    /// Number of offscreen surfaces currently attached, process-wide.
    pub fn attached_surfaces() -> usize {
        ATTACHED_SURFACES.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> HostState {
        self.state
    }

    fn expect_state(&self, expected: HostState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ReportError::InvalidHostState {
                expected: expected.name(),
                actual: self.state.name(),
            })
        }
    }

    /// Attach the document to a detached surface. `Idle -> Mounted`.
    pub fn mount(&mut self, document: Document) -> Result<()> {
        self.expect_state(HostState::Idle)?;
        self.surface = Some(Surface {
            width_px: A4_WIDTH_PX,
            height_px: 0, // sized at settle
            scale: self.scale,
            document,
        });
        ATTACHED_SURFACES.fetch_add(1, Ordering::SeqCst);
        self.state = HostState::Mounted;
        debug!("Offscreen surface mounted");
        Ok(())
    }

    /// Wait for layout to complete. `Mounted -> Settled`.
    ///
    /// The measure pass itself is the layout-complete signal; the optional
    /// configured delay exists only to mimic environments without one.
    pub async fn settle(&mut self) -> Result<()> {
        self.expect_state(HostState::Mounted)?;
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| ReportError::RasterError("surface missing after mount".to_string()))?;
        surface.height_px = measure_height(&surface.document);

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        self.state = HostState::Settled;
        debug!(height_px = self.surface.as_ref().map(|s| s.height_px), "Offscreen surface settled");
        Ok(())
    }

    /// Capture the settled surface. `Settled -> Captured`.
    pub fn capture(&mut self, rasterizer: &Rasterizer) -> Result<RasterBitmap> {
        self.expect_state(HostState::Settled)?;
        let surface = self
            .surface
            .as_ref()
            .ok_or_else(|| ReportError::RasterError("surface missing at capture".to_string()))?;
        let bitmap = rasterizer.rasterize(surface)?;
        self.state = HostState::Captured;
        Ok(bitmap)
    }

    /// Detach the surface. Idempotent; valid from any state.
    pub fn release(&mut self) {
        if self.surface.take().is_some() {
            ATTACHED_SURFACES.fetch_sub(1, Ordering::SeqCst);
        }
        if self.state != HostState::Released {
            if self.state != HostState::Captured && self.state != HostState::Idle {
                warn!(state = self.state.name(), "Releasing offscreen host before capture");
            }
            self.state = HostState::Released;
        }
    }
}

impl Drop for OffscreenHost {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Footer;

    // Serializes tests that observe the process-wide attachment counter.
    static COUNTER_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn doc() -> Document {
        Document {
            title: "BÁO CÁO".to_string(),
            subtitle: "Ngày tạo".to_string(),
            blocks: Vec::new(),
            footer: Footer {
                organization: "Tổ chức".to_string(),
                page_label: "Trang 1/1".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn lifecycle_transitions_in_order() {
        let _guard = COUNTER_LOCK.lock().unwrap();
        let before = OffscreenHost::attached_surfaces();
        let mut host = OffscreenHost::new(2, Duration::ZERO);
        assert_eq!(host.state(), HostState::Idle);

        host.mount(doc()).unwrap();
        assert_eq!(host.state(), HostState::Mounted);
        assert_eq!(OffscreenHost::attached_surfaces(), before + 1);

        host.settle().await.unwrap();
        assert_eq!(host.state(), HostState::Settled);

        host.release();
        assert_eq!(host.state(), HostState::Released);
        assert_eq!(OffscreenHost::attached_surfaces(), before);
    }

    #[tokio::test]
    async fn out_of_order_calls_are_rejected() {
        let mut host = OffscreenHost::new(2, Duration::ZERO);
        assert!(matches!(
            host.settle().await,
            Err(ReportError::InvalidHostState { .. })
        ));

        host.mount(doc()).unwrap();
        assert!(matches!(
            host.mount(doc()),
            Err(ReportError::InvalidHostState { .. })
        ));
    }

    #[test]
    fn drop_detaches_the_surface() {
        let _guard = COUNTER_LOCK.lock().unwrap();
        let before = OffscreenHost::attached_surfaces();
        {
            let mut host = OffscreenHost::new(2, Duration::ZERO);
            host.mount(doc()).unwrap();
            assert_eq!(OffscreenHost::attached_surfaces(), before + 1);
        }
        assert_eq!(OffscreenHost::attached_surfaces(), before);
    }

    #[test]
    fn release_is_idempotent() {
        let _guard = COUNTER_LOCK.lock().unwrap();
        let before = OffscreenHost::attached_surfaces();
        let mut host = OffscreenHost::new(2, Duration::ZERO);
        host.mount(doc()).unwrap();
        host.release();
        host.release();
        assert_eq!(OffscreenHost::attached_surfaces(), before);
    }

    #[test]
    fn standalone_surface_measures_on_construction() {
        let surface = Surface::from_document(doc(), 2);
        assert_eq!(surface.width_px, A4_WIDTH_PX);
        assert!(surface.height_px >= 1123);
    }
}
