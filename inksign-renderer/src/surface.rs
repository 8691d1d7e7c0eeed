//! Raster signature surface backed by a tiny-skia pixmap.

use base64::Engine;
use inksign_core::{Rgba, StrokePoint, StrokeStyle, Surface};
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{RenderError, RenderResult};

/// An encoded snapshot of the signature surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SignatureImage {
    /// The PNG as a `data:` URL.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }
}

/// Signature surface drawing into an in-memory pixmap.
#[derive(Debug, Default)]
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
}

impl PixmapSurface {
    /// Create an unallocated surface. [`inksign_core::StrokeCapture`] sizes it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing pixmap, if allocated.
    #[must_use]
    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    /// Whether every pixel equals `color`.
    #[must_use]
    pub fn is_uniform(&self, color: Rgba) -> bool {
        let Some(pixmap) = &self.pixmap else {
            return true;
        };
        let [r, g, b, a] = color.0;
        pixmap.pixels().iter().all(|p| {
            let c = p.demultiply();
            (c.red(), c.green(), c.blue(), c.alpha()) == (r, g, b, a)
        })
    }

    /// Encode the current bitmap as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface was never allocated or encoding fails.
    pub fn snapshot(&self) -> RenderResult<SignatureImage> {
        let pixmap = self
            .pixmap
            .as_ref()
            .ok_or(RenderError::Allocation { width: 0, height: 0 })?;
        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("signature PNG: {e}")))?;
        Ok(SignatureImage {
            png,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }
}

fn to_color(color: Rgba) -> Color {
    let [r, g, b, a] = color.0;
    Color::from_rgba8(r, g, b, a)
}

impl Surface for PixmapSurface {
    fn reallocate(&mut self, width: u32, height: u32, background: Rgba) {
        match Pixmap::new(width.max(1), height.max(1)) {
            Some(mut pixmap) => {
                pixmap.fill(to_color(background));
                self.pixmap = Some(pixmap);
            }
            None => {
                tracing::error!("{}", RenderError::Allocation { width, height });
                self.pixmap = None;
            }
        }
    }

    fn fill(&mut self, color: Rgba) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(to_color(color));
        }
    }

    fn stroke_segment(&mut self, from: StrokePoint, to: StrokePoint, style: &StrokeStyle) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };

        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint::default();
        let [r, g, b, a] = style.color.0;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    fn size(&self) -> (u32, u32) {
        self.pixmap
            .as_ref()
            .map_or((0, 0), |p| (p.width(), p.height()))
    }
}
