//! Off-screen rasterization of product drawings to PNG.
//!
//! Every call builds the drawing, serializes it to SVG, parses it with usvg
//! and renders it onto a pixel buffer of exactly the requested size. The
//! drawing is scaled uniformly to fit and centred, so its aspect ratio is
//! preserved and the remaining margin shows the background.
//!
//! # Example
//!
//! ```no_run
//! use infissi_renderer::{ProductConfig, Rasterizer};
//!
//! let config = ProductConfig::from_json(r#"{"kind":"window","width":1200,"height":1500}"#).unwrap();
//! let image = Rasterizer::new().rasterize(&config, 640, 640).unwrap();
//! assert_eq!((image.width, image.height), (640, 640));
//! ```

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{self, Pixmap, Transform};
use resvg::usvg::{self, Options, Tree, fontdb};
use tracing::debug;

use crate::config::MAX_RASTER_SIDE;
use crate::drawing::Drawing;
use crate::error::{RasterError, RasterResult};
use crate::geometry::Color;
use crate::product::{ProductConfig, ProductDrawing};

// ============================================================================
// RasterImage
// ============================================================================

/// A PNG produced from one drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl RasterImage {
    /// The image as a `data:image/png;base64,...` URI, ready to embed in a
    /// document or store as a preview.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

// ============================================================================
// OffscreenSurface
// ============================================================================

/// Scoped pixel buffer for one rasterization.
///
/// The buffer is released when the guard is dropped, on success and on every
/// error path alike.
struct OffscreenSurface {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl OffscreenSurface {
    fn mount(width: u32, height: u32) -> Self {
        debug!(width, height, "mounting off-screen surface");
        Self {
            width,
            height,
            pixmap: None,
        }
    }

    fn allocate(&mut self) -> RasterResult<&mut Pixmap> {
        let unavailable = RasterError::SurfaceUnavailable {
            width: self.width,
            height: self.height,
        };
        if self.width > MAX_RASTER_SIDE || self.height > MAX_RASTER_SIDE {
            return Err(unavailable);
        }
        match Pixmap::new(self.width, self.height) {
            Some(pixmap) => Ok(self.pixmap.insert(pixmap)),
            None => Err(unavailable),
        }
    }
}

impl Drop for OffscreenSurface {
    fn drop(&mut self) {
        debug!(
            width = self.width,
            height = self.height,
            allocated = self.pixmap.is_some(),
            "releasing off-screen surface"
        );
    }
}

// ============================================================================
// Rasterizer
// ============================================================================

/// Renders drawings to PNG.
///
/// The rasterizer holds only immutable, shared resources (the font database
/// and the background colour), so one instance can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct Rasterizer {
    fontdb: Arc<fontdb::Database>,
    background: Option<Color>,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    /// Creates a rasterizer with the system fonts and a white background.
    pub fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "loaded system fonts");
        Self::with_fontdb(Arc::new(db))
    }

    /// Creates a rasterizer sharing an existing font database.
    pub fn with_fontdb(fontdb: Arc<fontdb::Database>) -> Self {
        Self {
            fontdb,
            background: Some(Color::new(255, 255, 255)),
        }
    }

    /// Sets the background colour; `None` leaves it transparent.
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// Draws `config` and rasterizes it to a `width` × `height` PNG.
    pub fn rasterize(&self, config: &ProductConfig, width: u32, height: u32) -> RasterResult<RasterImage> {
        debug!(kind = config.kind().as_str(), width, height, "rasterizing product");
        self.rasterize_drawing(&config.draw(), width, height)
    }

    /// Rasterizes an already built drawing.
    pub fn rasterize_drawing(&self, drawing: &Drawing, width: u32, height: u32) -> RasterResult<RasterImage> {
        let mut surface = OffscreenSurface::mount(width, height);

        if drawing.is_empty() {
            return Err(RasterError::DrawingNotGenerated("drawing has no elements"));
        }
        if !drawing.is_renderable() {
            return Err(RasterError::DrawingNotGenerated("drawing has a degenerate view box"));
        }

        let svg = drawing.to_svg();
        let options = Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Options::default()
        };
        let tree = Tree::from_str(&svg, &options).map_err(|e| RasterError::DecodeFailed(e.to_string()))?;

        let pixmap = surface.allocate()?;
        if let Some(bg) = self.background {
            pixmap.fill(tiny_skia::Color::from_rgba8(bg.red, bg.green, bg.blue, 255));
        }
        resvg::render(&tree, fit_transform(tree.size(), width, height), &mut pixmap.as_mut());

        let image = pixmap_to_rgba_image(pixmap);
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        debug!(width, height, bytes = png.len(), "encoded PNG");

        Ok(RasterImage { width, height, png })
    }

    /// Rasterizes several configurations at the same pixel size.
    ///
    /// Runs in parallel with the `rayon` feature. Results keep the input order
    /// and one failure does not affect the others.
    pub fn rasterize_batch(&self, configs: &[ProductConfig], width: u32, height: u32) -> Vec<RasterResult<RasterImage>> {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            configs.par_iter().map(|c| self.rasterize(c, width, height)).collect()
        }
        #[cfg(not(feature = "rayon"))]
        {
            configs.iter().map(|c| self.rasterize(c, width, height)).collect()
        }
    }
}

/// Uniform scale that fits `size` into the target, centred.
fn fit_transform(size: usvg::Size, width: u32, height: u32) -> Transform {
    let (w, h) = (width as f32, height as f32);
    let scale = (w / size.width()).min(h / size.height());
    let tx = (w - size.width() * scale) / 2.0;
    let ty = (h - size.height() * scale) / 2.0;
    Transform::from_row(scale, 0.0, 0.0, scale, tx, ty)
}

fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia stores premultiplied alpha
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

// ============================================================================
// Convenience
// ============================================================================

fn shared() -> &'static Rasterizer {
    static SHARED: OnceLock<Rasterizer> = OnceLock::new();
    SHARED.get_or_init(Rasterizer::new)
}

/// SVG markup for live preview; no rasterization involved.
pub fn render_svg(config: &ProductConfig) -> String {
    config.draw().to_svg()
}

/// Rasterizes with a process-wide default [`Rasterizer`].
pub fn rasterize(config: &ProductConfig, width: u32, height: u32) -> RasterResult<RasterImage> {
    shared().rasterize(config, width, height)
}
