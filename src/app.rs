//! Annotator controller.
//!
//! Owns the session, the OCR dispatcher and the export registry, and is the
//! single place where input events turn into state changes. Hosts feed it
//! screen-space pointer events and call [`Annotator::poll_ocr`] once per frame.

use std::path::Path;

use thiserror::Error;

use crate::config::AppConfig;
use crate::format::{
    ExportData, ExportResult, ExportScope, FormatError, FormatRegistry, write_export,
};
use crate::model::{PageId, PageSource, Point, RegionId};
use crate::ocr::{OcrDispatcher, OcrEngine, Ticket};
use crate::state::Session;
use crate::zoom_math;

// ============================================================================
// Image loading
// ============================================================================

/// Encoded image bytes as received from an upload.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    /// File name of the image
    pub name: String,
    /// Raw encoded bytes (PNG, JPEG, ...)
    pub data: Vec<u8>,
}

impl LoadedImage {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Decode into a page source.
    pub fn decode(&self) -> Result<PageSource, LoadError> {
        let image = image::load_from_memory(&self.data).map_err(|e| LoadError::Decode {
            name: self.name.clone(),
            source: e,
        })?;
        log::debug!(
            "Decoded {}: {}x{}",
            self.name,
            image.width(),
            image.height()
        );
        Ok(PageSource::new(self.name.clone(), image))
    }
}

/// Failure to turn one upload into a page.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Bytes are not a supported image
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// File could not be read
    #[error("Failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read an image file from disk, keeping only its file name.
pub fn read_image_file(path: &Path) -> Result<LoadedImage, LoadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let data = std::fs::read(path).map_err(|e| LoadError::Read {
        name: name.clone(),
        source: e,
    })?;
    Ok(LoadedImage::new(name, data))
}

// ============================================================================
// Controller
// ============================================================================

/// Controller wiring the session to recognition and export.
pub struct Annotator<E: OcrEngine> {
    session: Session,
    ocr: OcrDispatcher<E>,
    formats: FormatRegistry,
    config: AppConfig,
}

impl<E: OcrEngine> Annotator<E> {
    /// Create a controller from configuration and a recognition engine.
    pub fn new(config: AppConfig, engine: E) -> Self {
        let session = Session::new()
            .with_default_scale(config.preferences.default_zoom)
            .with_ocr_enabled(config.ocr.enabled);
        let ocr = OcrDispatcher::new(engine, config.ocr.language.clone())
            .with_drop_stale(config.ocr.drop_stale_completions);

        Self {
            session,
            ocr,
            formats: FormatRegistry::new(),
            config,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn ocr(&self) -> &OcrDispatcher<E> {
        &self.ocr
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.ocr.engine_mut()
    }

    pub fn formats(&self) -> &FormatRegistry {
        &self.formats
    }

    // ------------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------------

    /// Decode uploads and append them as pages.
    ///
    /// Images that fail to decode are skipped; their errors are returned so
    /// the host can report them.
    pub fn load_images(&mut self, images: Vec<LoadedImage>) -> (Vec<PageId>, Vec<LoadError>) {
        let mut sources = Vec::with_capacity(images.len());
        let mut errors = Vec::new();

        for image in &images {
            match image.decode() {
                Ok(source) => sources.push(source),
                Err(e) => {
                    log::warn!("Skipping upload: {}", e);
                    errors.push(e);
                }
            }
        }

        (self.add_pages(sources), errors)
    }

    /// Append already decoded pages.
    pub fn add_pages(&mut self, sources: Vec<PageSource>) -> Vec<PageId> {
        let ids = self.session.add_pages(sources);
        if !ids.is_empty() {
            log::info!(
                "Loaded {} pages ({} total)",
                ids.len(),
                self.session.page_count()
            );
        }
        ids
    }

    pub fn set_page(&mut self, index: usize) {
        self.session.set_current_page_index(index);
    }

    pub fn next_page(&mut self) {
        self.session.next_page();
    }

    pub fn previous_page(&mut self) {
        self.session.previous_page();
    }

    // ------------------------------------------------------------------------
    // Pointer input (screen space)
    // ------------------------------------------------------------------------

    fn to_image(&self, screen: Point, surface_origin: Point) -> Point {
        zoom_math::to_image_space(screen, surface_origin, self.session.scale())
    }

    pub fn pointer_down(&mut self, screen: Point, surface_origin: Point) {
        let point = self.to_image(screen, surface_origin);
        self.session.pointer_down(point);
    }

    pub fn pointer_move(&mut self, screen: Point, surface_origin: Point) {
        let point = self.to_image(screen, surface_origin);
        self.session.pointer_move(point);
    }

    /// Release the pointer. A newly committed region is sent to OCR when
    /// recognition is enabled.
    pub fn pointer_up(&mut self) -> Option<RegionId> {
        let committed = self.session.pointer_up();
        if let Some(id) = committed {
            self.auto_ocr(id);
        }
        committed
    }

    pub fn pointer_leave(&mut self) -> Option<RegionId> {
        let committed = self.session.pointer_leave();
        if let Some(id) = committed {
            self.auto_ocr(id);
        }
        committed
    }

    fn auto_ocr(&mut self, id: RegionId) {
        if self.session.is_ocr_enabled() {
            self.rerun_ocr(id);
        }
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    pub fn delete_region(&mut self, id: RegionId) -> bool {
        self.session.delete_rect(id)
    }

    pub fn set_text(&mut self, id: RegionId, text: impl Into<String>) -> bool {
        self.session.set_text(id, text)
    }

    pub fn select(&mut self, id: Option<RegionId>) -> bool {
        self.session.select(id)
    }

    pub fn zoom_in(&mut self) {
        self.session.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.session.zoom_out();
    }

    pub fn set_zoom(&mut self, scale: f32) {
        self.session.set_scale(scale);
    }

    pub fn set_zoom_from_slider(&mut self, scale: f32) {
        self.session.set_scale_from_slider(scale);
    }

    pub fn set_ocr_enabled(&mut self, enabled: bool) {
        log::info!("Automatic OCR {}", if enabled { "enabled" } else { "disabled" });
        self.session.set_ocr_enabled(enabled);
    }

    // ------------------------------------------------------------------------
    // OCR
    // ------------------------------------------------------------------------

    /// Recognize a region on the current page again, regardless of the
    /// automatic OCR toggle.
    pub fn rerun_ocr(&mut self, id: RegionId) -> Option<Ticket> {
        let page_id = self.session.current_page()?.id();
        self.ocr.dispatch(&mut self.session, page_id, id)
    }

    /// Apply any finished recognitions. Returns how many were applied.
    pub fn poll_ocr(&mut self) -> usize {
        self.ocr.poll(&mut self.session)
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    /// Encode annotations with the given format and scope.
    pub fn export(&self, format_id: &str, scope: ExportScope) -> Result<String, FormatError> {
        let format = self.formats.require(format_id)?;
        let data = ExportData::from_session(&self.session, scope)?;
        format.encode(&data)
    }

    /// Export using the configured default format and scope.
    pub fn export_default(&self) -> Result<String, FormatError> {
        self.export(&self.config.export.default_format, self.config.export.scope)
    }

    /// Encode annotations and write them into `dir` under the suggested
    /// file name.
    pub fn export_to_dir(
        &self,
        format_id: &str,
        scope: ExportScope,
        dir: &Path,
    ) -> Result<ExportResult, FormatError> {
        let format = self.formats.require(format_id)?;
        let data = ExportData::from_session(&self.session, scope)?;
        let path = dir.join(data.suggested_file_name(format.extension()));
        write_export(format, &data, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;
    use crate::ocr::{EngineState, OcrCompletion, OcrError, OcrJob};
    use image::{DynamicImage, ImageFormat};
    use std::collections::VecDeque;
    use std::io::Cursor;

    /// Ready engine that answers every job with its crop size.
    #[derive(Default)]
    struct EchoEngine {
        done: VecDeque<OcrCompletion>,
        submitted: usize,
    }

    impl OcrEngine for EchoEngine {
        fn state(&self) -> EngineState {
            EngineState::Ready
        }

        fn submit(&mut self, job: OcrJob) -> Result<(), OcrError> {
            self.submitted += 1;
            let text = format!(" {}x{} ", job.image.width(), job.image.height());
            self.done.push_back(job.complete(Ok(text)));
            Ok(())
        }

        fn try_recv(&mut self) -> Option<OcrCompletion> {
            self.done.pop_front()
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::new_rgba8(width, height)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn annotator(config: AppConfig) -> Annotator<EchoEngine> {
        let mut app = Annotator::new(config, EchoEngine::default());
        let (ids, errors) = app.load_images(vec![
            LoadedImage::new("one.png", png(400, 300)),
            LoadedImage::new("two.png", png(400, 300)),
        ]);
        assert_eq!(ids.len(), 2);
        assert!(errors.is_empty());
        app
    }

    fn drag(app: &mut Annotator<EchoEngine>, from: Point, to: Point) -> Option<RegionId> {
        app.pointer_down(from, Point::default());
        app.pointer_move(to, Point::default());
        app.pointer_up()
    }

    #[test]
    fn test_bad_upload_is_skipped() {
        let mut app = Annotator::new(AppConfig::default(), EchoEngine::default());
        let (ids, errors) = app.load_images(vec![
            LoadedImage::new("broken.png", vec![1, 2, 3]),
            LoadedImage::new("ok.png", png(10, 10)),
        ]);
        assert_eq!(ids.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("broken.png"));
        assert_eq!(app.session().pages()[0].name(), "ok.png");
    }

    #[test]
    fn test_commit_triggers_ocr_when_enabled() {
        let mut app = annotator(AppConfig::default());
        let id = drag(&mut app, Point::new(10.0, 10.0), Point::new(110.0, 60.0)).unwrap();
        assert!(app.session().current_regions()[0].is_ocr_running);

        assert_eq!(app.poll_ocr(), 1);
        let region = app.session().current_page().unwrap().region(id).unwrap();
        assert_eq!(region.text, "100x50");
        assert!(!region.is_ocr_running);
    }

    #[test]
    fn test_commit_skips_ocr_when_disabled() {
        let mut app = annotator(AppConfig::default());
        app.set_ocr_enabled(false);
        let id = drag(&mut app, Point::new(10.0, 10.0), Point::new(110.0, 60.0)).unwrap();
        assert_eq!(app.engine_mut().submitted, 0);

        // Explicit re-run ignores the toggle
        assert!(app.rerun_ocr(id).is_some());
        app.poll_ocr();
        assert_eq!(app.session().current_regions()[0].text, "100x50");
    }

    #[test]
    fn test_screen_points_map_through_zoom() {
        let mut app = annotator(AppConfig::default());
        app.set_zoom(2.0);
        let origin = Point::new(5.0, 5.0);

        app.pointer_down(Point::new(25.0, 25.0), origin);
        app.pointer_move(Point::new(225.0, 125.0), origin);
        app.pointer_leave();

        assert_eq!(
            app.session().current_regions()[0].rect,
            Rect::new(10.0, 10.0, 100.0, 50.0)
        );
    }

    #[test]
    fn test_export_uses_configured_defaults() {
        let mut config = AppConfig::default();
        config.ocr.enabled = false;
        config.export.default_format = "json".to_string();
        config.export.scope = ExportScope::CurrentPage;
        let mut app = annotator(config);

        app.next_page();
        let id = drag(&mut app, Point::new(10.0, 10.0), Point::new(110.0, 60.0)).unwrap();
        app.set_text(id, "Hi");

        let json: serde_json::Value = serde_json::from_str(&app.export_default().unwrap()).unwrap();
        assert_eq!(json["pages"].as_array().unwrap().len(), 1);
        assert_eq!(json["pages"][0]["page_index"], 2);
        assert_eq!(json["pages"][0]["annotations"][0]["text"], "Hi");
    }

    #[test]
    fn test_export_errors() {
        let app = Annotator::new(AppConfig::default(), EchoEngine::default());
        assert!(matches!(
            app.export("csv", ExportScope::AllPages),
            Err(FormatError::NothingToExport)
        ));

        let app = annotator(AppConfig::default());
        assert!(matches!(
            app.export("xml", ExportScope::AllPages),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_export_to_dir_uses_suggested_name() {
        let mut app = annotator(AppConfig::default());
        app.set_page(1);
        let dir = tempfile::tempdir().unwrap();

        let result = app
            .export_to_dir("csv", ExportScope::CurrentPage, dir.path())
            .unwrap();
        assert_eq!(result.path, dir.path().join("page_2_annotations.csv"));
        assert_eq!(result.pages_exported, 1);
        assert_eq!(
            std::fs::read_to_string(&result.path).unwrap(),
            "rect_id,x,y,width,height,text\n"
        );
    }
}
