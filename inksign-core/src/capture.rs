//! Freehand stroke capture.
//!
//! [`StrokeCapture`] turns normalized input into connected line segments on a
//! [`Surface`] and remembers whether anything has been drawn since the last
//! clear. Points are never retained beyond the current pen position.

use crate::event::{
    EventDisposition, InputEvent, PointerAction, StrokePoint, SurfaceBounds, TouchPhase,
};

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Opaque colour from RGB components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }
}

/// Pen parameters used for every segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Line width in pixels.
    pub width: f32,
    /// Ink colour.
    pub color: Rgba,
    /// Colour the surface is cleared to.
    pub background: Rgba,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: Rgba::rgb(0x2c, 0x3e, 0x50),
            background: Rgba::WHITE,
        }
    }
}

/// A drawable bitmap that strokes can be painted onto.
pub trait Surface {
    /// Replace the bitmap with a new one of the given size, filled with `background`.
    fn reallocate(&mut self, width: u32, height: u32, background: Rgba);

    /// Fill the whole bitmap with one colour.
    fn fill(&mut self, color: Rgba);

    /// Paint a straight round-capped segment.
    fn stroke_segment(&mut self, from: StrokePoint, to: StrokePoint, style: &StrokeStyle);

    /// Current bitmap size in pixels.
    fn size(&self) -> (u32, u32);
}

/// Capture state for one signature surface.
#[derive(Debug)]
pub struct StrokeCapture<S> {
    surface: S,
    style: StrokeStyle,
    bounds: SurfaceBounds,
    drawing: bool,
    last: StrokePoint,
    has_mark: bool,
}

impl<S: Surface> StrokeCapture<S> {
    /// Create capture state over `surface`, sized and blanked to `bounds`.
    pub fn new(surface: S, bounds: SurfaceBounds) -> Self {
        Self::with_style(surface, bounds, StrokeStyle::default())
    }

    /// Create capture state with a custom pen.
    pub fn with_style(mut surface: S, bounds: SurfaceBounds, style: StrokeStyle) -> Self {
        let (w, h) = bounds.pixel_size();
        surface.reallocate(w, h, style.background);
        Self {
            surface,
            style,
            bounds,
            drawing: false,
            last: StrokePoint::default(),
            has_mark: false,
        }
    }

    /// Put the pen down at `point`.
    pub fn begin(&mut self, point: StrokePoint) {
        self.drawing = true;
        self.last = point;
        self.has_mark = true;
    }

    /// Draw from the current pen position to `point` if the pen is down.
    pub fn extend(&mut self, point: StrokePoint) {
        if !self.drawing {
            return;
        }
        self.surface.stroke_segment(self.last, point, &self.style);
        self.last = point;
    }

    /// Lift the pen.
    pub fn end(&mut self) {
        self.drawing = false;
    }

    /// Blank the surface and forget that anything was drawn.
    pub fn clear(&mut self) {
        self.surface.fill(self.style.background);
        self.has_mark = false;
        tracing::debug!("Signature cleared");
    }

    /// The surface was moved or resized on screen.
    ///
    /// A size change reallocates the bitmap blank, discarding whatever was
    /// drawn. The mark flag is not touched.
    pub fn resize(&mut self, bounds: SurfaceBounds) {
        let old = self.bounds.pixel_size();
        self.bounds = bounds;
        let (w, h) = bounds.pixel_size();
        if (w, h) != old || self.surface.size() != (w, h) {
            tracing::debug!("Signature surface resized to {w}x{h}");
            self.surface.reallocate(w, h, self.style.background);
        }
    }

    /// Route a raw input event to begin/extend/end.
    ///
    /// Mouse and touch share this handler; only the primary touch contact is
    /// used. Touch events ask the host to suppress scrolling and zooming.
    pub fn handle_event(&mut self, event: &InputEvent) -> EventDisposition {
        match event {
            InputEvent::Pointer {
                action,
                client_x,
                client_y,
            } => {
                let point = self.bounds.to_local(*client_x, *client_y);
                match action {
                    PointerAction::Down => self.begin(point),
                    PointerAction::Move => self.extend(point),
                    PointerAction::Up | PointerAction::Leave => self.end(),
                }
                EventDisposition::Default
            }
            InputEvent::Touch(touch) => {
                let primary = touch
                    .primary_touch()
                    .map(|t| self.bounds.to_local(t.client_x, t.client_y));
                match (touch.phase, primary) {
                    (TouchPhase::Start, Some(point)) => self.begin(point),
                    (TouchPhase::Move, Some(point)) => self.extend(point),
                    (TouchPhase::End | TouchPhase::Cancel, _) => self.end(),
                    (TouchPhase::Start | TouchPhase::Move, None) => {
                        tracing::debug!("Touch {:?} without contacts ignored", touch.phase);
                    }
                }
                EventDisposition::PreventDefault
            }
        }
    }

    /// Whether anything has been drawn since creation or the last clear.
    #[must_use]
    pub fn has_mark(&self) -> bool {
        self.has_mark
    }

    /// Whether the pen is currently down.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Current screen placement.
    #[must_use]
    pub fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    /// Pen parameters.
    #[must_use]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// The underlying surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }
}
