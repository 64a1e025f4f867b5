//! Wheel rendering system
//!
//! Draws the prize wheel with tiny-skia. Layout calculation (slice angles,
//! colours, label anchors, hub and pointer geometry) is separated from
//! rasterization so the geometry can be tested without pixels.
//!
//! Labels need a TrueType/OpenType font loaded through ab_glyph. Without
//! one the wheel is drawn unlabelled.

use std::f32::consts::FRAC_PI_2;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

use crate::config::WheelConfig;
use crate::domain::geometry;
use crate::platform::Renderer;

/// Slice colours, reused cyclically
pub const PALETTE: [[u8; 3]; 16] = [
    [0xFF, 0x6B, 0x9D],
    [0xC3, 0x71, 0xF6],
    [0xFF, 0xA9, 0x4D],
    [0xFF, 0xD9, 0x3D],
    [0x6B, 0xCF, 0x7F],
    [0x4D, 0x96, 0xFF],
    [0xFF, 0x57, 0x57],
    [0xFF, 0xA8, 0xE4],
    [0xA8, 0xE6, 0xCF],
    [0xFF, 0xD7, 0x00],
    [0xFF, 0x8C, 0x94],
    [0xB4, 0xA7, 0xD6],
    [0xFF, 0xB6, 0xB9],
    [0xC7, 0xCE, 0xEA],
    [0xFF, 0xDA, 0xC1],
    [0xB5, 0xEA, 0xD7],
];

pub const PLACEHOLDER_TEXT: &str = "Add names to start!";

/// Reference radius the remaining measurements are given for
const REFERENCE_RADIUS: f32 = 280.0;
const HUB_RADIUS: f32 = 60.0;
const HUB_STROKE: f32 = 5.0;
const BORDER_WIDTH: f32 = 3.0;
const LABEL_INSET: f32 = 20.0;
const LABEL_BASELINE: f32 = 10.0;
const LABEL_SIZE: f32 = 18.0;
const PLACEHOLDER_SIZE: f32 = 24.0;
const POINTER_DEPTH: f32 = 30.0;
const POINTER_HALF_WIDTH: f32 = 16.0;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: u32, height: u32 },

    #[error("Failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a usable font")]
    InvalidFont { path: PathBuf },

    #[error("Nothing has been drawn yet")]
    NothingDrawn,

    #[error("Failed to encode PNG: {0}")]
    Encode(String),
}

pub fn palette_color(index: usize) -> Color {
    let [r, g, b] = PALETTE[index % PALETTE.len()];
    Color::from_rgba8(r, g, b, 255)
}

/// One wheel slice, angles in radians clockwise from the pointer
#[derive(Debug, Clone)]
pub struct SliceLayout {
    pub start_angle: f32,
    pub end_angle: f32,
    pub color: Color,
    pub label: String,
}

impl SliceLayout {
    /// Angle labels are rotated to
    pub fn label_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Pre-calculated geometry for one wheel image
#[derive(Debug, Clone)]
pub struct WheelLayout {
    pub canvas_size: u32,
    pub center: (f32, f32),
    pub radius: f32,
    /// Empty when the placeholder is shown
    pub slices: Vec<SliceLayout>,
    pub hub_radius: f32,
    /// Pointer triangle: tip toward the centre, then the two base corners
    pub pointer: [(f32, f32); 3],
    /// Multiplier from reference measurements to this radius
    pub scale: f32,
}

impl WheelLayout {
    /// Layout for `entries` at absolute wheel `rotation`
    ///
    /// An empty entry list yields the placeholder layout.
    pub fn for_entries(entries: &[String], rotation: f64, canvas_size: u32, radius: f32) -> Self {
        let mut layout = Self::placeholder(canvas_size, radius);
        if entries.is_empty() {
            return layout;
        }

        // Reduced in f64 so the f32 angles stay precise after many spins
        let base = geometry::normalize(rotation);
        let slice = geometry::slice_angle(entries.len());
        layout.slices = entries
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let start = base + slice * index as f64;
                SliceLayout {
                    start_angle: start as f32,
                    end_angle: (start + slice) as f32,
                    color: palette_color(index),
                    label: label.clone(),
                }
            })
            .collect();
        layout
    }

    /// Layout of the empty wheel
    pub fn placeholder(canvas_size: u32, radius: f32) -> Self {
        let half = canvas_size as f32 / 2.0;
        let scale = radius / REFERENCE_RADIUS;
        let rim = half + radius;

        Self {
            canvas_size,
            center: (half, half),
            radius,
            slices: Vec::new(),
            hub_radius: HUB_RADIUS * scale,
            pointer: [
                (rim - POINTER_DEPTH * scale * 0.4, half),
                (rim + POINTER_DEPTH * scale * 0.6, half - POINTER_HALF_WIDTH * scale),
                (rim + POINTER_DEPTH * scale * 0.6, half + POINTER_HALF_WIDTH * scale),
            ],
            scale,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.slices.is_empty()
    }
}

/// A label rasterized into its own pixmap
struct LabelBitmap {
    pixmap: Pixmap,
    ascent: f32,
}

/// Wheel renderer using tiny-skia, with optional ab_glyph labels
pub struct WheelRenderer {
    font: Option<FontVec>,
}

impl std::fmt::Debug for WheelRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WheelRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl WheelRenderer {
    /// Create a renderer that draws no labels
    pub fn new() -> Self {
        Self { font: None }
    }

    pub fn with_font(font: FontVec) -> Self {
        Self { font: Some(font) }
    }

    /// Loads a font file for labels
    pub fn from_font_file(path: &Path) -> Result<Self, RendererError> {
        let data = std::fs::read(path).map_err(|source| RendererError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| RendererError::InvalidFont {
            path: path.to_path_buf(),
        })?;
        Ok(Self::with_font(font))
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Render a wheel layout to a new pixmap
    pub fn render_layout(&self, layout: &WheelLayout) -> Result<Pixmap, RendererError> {
        let size = layout.canvas_size;
        let mut pixmap = Pixmap::new(size, size).ok_or(RendererError::PixmapCreationFailed {
            width: size,
            height: size,
        })?;
        pixmap.fill(Color::TRANSPARENT);

        if layout.is_placeholder() {
            self.render_placeholder(&mut pixmap, layout);
        } else {
            self.render_slices(&mut pixmap, layout);
            render_hub(&mut pixmap, layout);
        }
        render_pointer(&mut pixmap, layout);

        Ok(pixmap)
    }

    fn render_slices(&self, pixmap: &mut Pixmap, layout: &WheelLayout) {
        let (cx, cy) = layout.center;
        let border = stroke(BORDER_WIDTH * layout.scale);
        let white = paint(Color::WHITE);

        for slice in &layout.slices {
            let Some(path) = slice_path(layout, slice) else {
                continue;
            };
            pixmap.fill_path(&path, &paint(slice.color), FillRule::Winding, Transform::identity(), None);
            pixmap.stroke_path(&path, &white, &border, Transform::identity(), None);
        }

        let Some(font) = &self.font else {
            return;
        };
        let size = LABEL_SIZE * layout.scale;
        for slice in &layout.slices {
            let Some(label) = rasterize(font, &slice.label, size, ColorU8::from_rgba(255, 255, 255, 255))
            else {
                continue;
            };
            let shadow = rasterize(font, &slice.label, size, ColorU8::from_rgba(0, 0, 0, 128));

            // Right-aligned against the rim, baseline slightly below the radius line
            let right = layout.radius - LABEL_INSET * layout.scale;
            let x = right - label.pixmap.width() as f32;
            let y = LABEL_BASELINE * layout.scale - label.ascent;
            let transform =
                Transform::from_translate(cx, cy).pre_concat(Transform::from_rotate(slice.label_angle().to_degrees()));

            if let Some(shadow) = shadow {
                draw_label(pixmap, &shadow, x + 1.0, y + 1.0, transform);
            }
            draw_label(pixmap, &label, x, y, transform);
        }
    }

    fn render_placeholder(&self, pixmap: &mut Pixmap, layout: &WheelLayout) {
        let (cx, cy) = layout.center;
        let mut builder = PathBuilder::new();
        builder.push_circle(cx, cy, layout.radius);
        if let Some(path) = builder.finish() {
            pixmap.fill_path(
                &path,
                &paint(Color::from_rgba8(255, 255, 255, 26)),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
            pixmap.stroke_path(
                &path,
                &paint(Color::from_rgba8(255, 255, 255, 77)),
                &stroke(BORDER_WIDTH * layout.scale),
                Transform::identity(),
                None,
            );
        }

        let Some(font) = &self.font else {
            return;
        };
        let size = PLACEHOLDER_SIZE * layout.scale;
        if let Some(label) = rasterize(font, PLACEHOLDER_TEXT, size, ColorU8::from_rgba(255, 255, 255, 255)) {
            let x = cx - label.pixmap.width() as f32 / 2.0;
            let y = cy - label.ascent;
            draw_label(pixmap, &label, x, y, Transform::identity());
        }
    }
}

impl Default for WheelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint
}

fn stroke(width: f32) -> Stroke {
    Stroke {
        width,
        ..Stroke::default()
    }
}

/// Pie slice outline: centre, rim arc in cubic segments, back to centre
fn slice_path(layout: &WheelLayout, slice: &SliceLayout) -> Option<tiny_skia::Path> {
    let (cx, cy) = layout.center;
    let r = layout.radius;
    let sweep = slice.end_angle - slice.start_angle;
    let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / pieces as f32;
    // Control distance for a circular arc approximated by one cubic
    let k = 4.0 / 3.0 * (step / 4.0).tan() * r;

    let mut builder = PathBuilder::new();
    builder.move_to(cx, cy);
    let (sin, cos) = slice.start_angle.sin_cos();
    builder.line_to(cx + r * cos, cy + r * sin);

    for piece in 0..pieces {
        let a0 = slice.start_angle + step * piece as f32;
        let a1 = a0 + step;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        builder.cubic_to(
            cx + r * c0 - k * s0,
            cy + r * s0 + k * c0,
            cx + r * c1 + k * s1,
            cy + r * s1 - k * c1,
            cx + r * c1,
            cy + r * s1,
        );
    }
    builder.close();
    builder.finish()
}

fn render_hub(pixmap: &mut Pixmap, layout: &WheelLayout) {
    let (cx, cy) = layout.center;
    let mut builder = PathBuilder::new();
    builder.push_circle(cx, cy, layout.hub_radius);
    let Some(path) = builder.finish() else {
        return;
    };
    pixmap.fill_path(&path, &paint(Color::WHITE), FillRule::Winding, Transform::identity(), None);
    pixmap.stroke_path(
        &path,
        &paint(palette_color(0)),
        &stroke(HUB_STROKE * layout.scale),
        Transform::identity(),
        None,
    );
}

fn render_pointer(pixmap: &mut Pixmap, layout: &WheelLayout) {
    let [tip, upper, lower] = layout.pointer;
    let mut builder = PathBuilder::new();
    builder.move_to(tip.0, tip.1);
    builder.line_to(upper.0, upper.1);
    builder.line_to(lower.0, lower.1);
    builder.close();
    if let Some(path) = builder.finish() {
        pixmap.fill_path(&path, &paint(Color::WHITE), FillRule::Winding, Transform::identity(), None);
        pixmap.stroke_path(
            &path,
            &paint(palette_color(0)),
            &stroke(2.0 * layout.scale),
            Transform::identity(),
            None,
        );
    }
}

/// Rasterizes `text` on one line into a tightly sized pixmap
fn rasterize(font: &FontVec, text: &str, px: f32, color: ColorU8) -> Option<LabelBitmap> {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let ascent = scaled.ascent();

    let mut caret = 0.0f32;
    let mut previous = None;
    let mut glyphs = Vec::with_capacity(text.len());
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(scale, point(caret, ascent)));
        caret += scaled.h_advance(id);
        previous = Some(id);
    }

    let width = caret.ceil().max(1.0) as u32;
    let height = (ascent - scaled.descent()).ceil().max(1.0) as u32;
    let mut coverage = vec![0.0f32; (width * height) as usize];

    for glyph in glyphs {
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|x, y, c| {
            let px = bounds.min.x as i32 + x as i32;
            let py = bounds.min.y as i32 + y as i32;
            if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                return;
            }
            let cell = &mut coverage[(py as u32 * width + px as u32) as usize];
            *cell = cell.max(c);
        });
    }

    let mut pixmap = Pixmap::new(width, height)?;
    for (pixel, &cov) in pixmap.pixels_mut().iter_mut().zip(&coverage) {
        let alpha = (cov.clamp(0.0, 1.0) * f32::from(color.alpha())).round() as u8;
        *pixel = ColorU8::from_rgba(color.red(), color.green(), color.blue(), alpha).premultiply();
    }

    Some(LabelBitmap { pixmap, ascent })
}

fn draw_label(target: &mut Pixmap, label: &LabelBitmap, x: f32, y: f32, transform: Transform) {
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(
        x.round() as i32,
        y.round() as i32,
        label.pixmap.as_ref(),
        &paint,
        transform,
        None,
    );
}

/// `Renderer` that keeps the latest frame as a pixmap
#[derive(Debug)]
pub struct PixmapRenderer {
    renderer: WheelRenderer,
    canvas_size: u32,
    radius: f32,
    frame: Option<Pixmap>,
    frames_drawn: usize,
}

impl PixmapRenderer {
    pub fn new(renderer: WheelRenderer, canvas_size: u32, radius: f32) -> Self {
        Self {
            renderer,
            canvas_size,
            radius,
            frame: None,
            frames_drawn: 0,
        }
    }

    /// Builds a renderer from the canvas settings, loading the font if one is configured
    pub fn from_config(config: &WheelConfig) -> Result<Self, RendererError> {
        let renderer = match &config.font_path {
            Some(path) => WheelRenderer::from_font_file(path)?,
            None => WheelRenderer::new(),
        };
        Ok(Self::new(renderer, config.canvas_size, config.wheel_radius))
    }

    /// Most recent frame
    pub fn frame(&self) -> Option<&Pixmap> {
        self.frame.as_ref()
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }

    /// Writes the most recent frame as PNG
    pub fn save_png(&self, path: &Path) -> Result<(), RendererError> {
        let frame = self.frame.as_ref().ok_or(RendererError::NothingDrawn)?;
        frame
            .save_png(path)
            .map_err(|e| RendererError::Encode(e.to_string()))
    }

    fn draw(&mut self, layout: &WheelLayout) {
        match self.renderer.render_layout(layout) {
            Ok(pixmap) => {
                self.frame = Some(pixmap);
                self.frames_drawn += 1;
            }
            Err(e) => tracing::warn!(error = %e, "wheel frame dropped"),
        }
    }
}

impl Renderer for PixmapRenderer {
    fn draw_wheel(&mut self, entries: &[String], rotation: f64) {
        let layout = WheelLayout::for_entries(entries, rotation, self.canvas_size, self.radius);
        self.draw(&layout);
    }

    fn draw_placeholder(&mut self) {
        let layout = WheelLayout::placeholder(self.canvas_size, self.radius);
        self.draw(&layout);
    }

    fn show_winner(&mut self, winner: &str) {
        tracing::debug!(%winner, "winner frame ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;
    use std::f64::consts::PI;

    /// Angle in `[0, TAU)` for a point relative to the centre, y down
    fn angle_of(dx: f32, dy: f32) -> f32 {
        dy.atan2(dx).rem_euclid(TAU)
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let c = pixmap.pixel(x, y).unwrap().demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    }

    fn opaque(index: usize) -> [u8; 4] {
        let [r, g, b] = PALETTE[index];
        [r, g, b, 255]
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(16), palette_color(0));
        assert_eq!(palette_color(17), palette_color(1));
    }

    #[test]
    fn layout_has_one_slice_per_entry() {
        let layout = WheelLayout::for_entries(&names(&["a", "b", "c"]), 0.0, 600, 280.0);

        assert_eq!(layout.slices.len(), 3);
        assert_eq!(layout.center, (300.0, 300.0));
        assert!((layout.slices[0].end_angle - layout.slices[1].start_angle).abs() < 1e-6);
        let covered = layout.slices[2].end_angle - layout.slices[0].start_angle;
        assert!((covered - TAU).abs() < 1e-5);
    }

    #[test]
    fn label_angle_is_slice_midpoint() {
        let layout = WheelLayout::for_entries(&names(&["a", "b", "c", "d"]), 1.0, 600, 280.0);
        for (i, slice) in layout.slices.iter().enumerate() {
            let expected = 1.0 + geometry::slice_midpoint(i, 4);
            assert!((f64::from(slice.label_angle()) - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn accumulated_rotation_keeps_slice_angles() {
        let entries = names(&["a", "b", "c"]);
        let reference = WheelLayout::for_entries(&entries, 1.0, 600, 280.0);
        let spun = WheelLayout::for_entries(&entries, 1.0 + std::f64::consts::TAU * 1000.0, 600, 280.0);

        for (a, b) in reference.slices.iter().zip(&spun.slices) {
            assert!((a.start_angle - b.start_angle).abs() < 1e-5);
            assert!((a.end_angle - b.end_angle).abs() < 1e-5);
        }
        assert!(spun.slices[0].start_angle < TAU);
    }

    #[test]
    fn empty_entries_give_placeholder() {
        let layout = WheelLayout::for_entries(&[], 0.0, 600, 280.0);
        assert!(layout.is_placeholder());
    }

    #[test]
    fn measurements_scale_with_radius() {
        let layout = WheelLayout::placeholder(300, 140.0);
        assert!((layout.scale - 0.5).abs() < 1e-6);
        assert!((layout.hub_radius - 30.0).abs() < 1e-6);
    }

    #[test]
    fn pointer_sits_at_angle_zero() {
        let layout = WheelLayout::placeholder(600, 280.0);
        let [tip, upper, lower] = layout.pointer;
        assert_eq!(tip.1, 300.0);
        assert!(tip.0 < 300.0 + 280.0);
        assert!(upper.1 < 300.0 && lower.1 > 300.0);
        assert!(angle_of(tip.0 - 300.0, tip.1 - 300.0).abs() < 1e-6);
    }

    #[test]
    fn renders_canvas_sized_pixmap() {
        let layout = WheelLayout::for_entries(&names(&["a"]), 0.0, 600, 280.0);
        let pixmap = WheelRenderer::new().render_layout(&layout).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (600, 600));
    }

    #[test]
    fn slices_are_painted_clockwise_from_pointer() {
        let layout = WheelLayout::for_entries(&names(&["a", "b"]), 0.0, 600, 280.0);
        let pixmap = WheelRenderer::new().render_layout(&layout).unwrap();

        // Slice 0 covers the lower half, slice 1 the upper half
        assert_eq!(rgba(&pixmap, 300, 500), opaque(0));
        assert_eq!(rgba(&pixmap, 300, 100), opaque(1));
        // Hub and empty corner
        assert_eq!(rgba(&pixmap, 300, 300), [255, 255, 255, 255]);
        assert_eq!(rgba(&pixmap, 5, 5)[3], 0);
    }

    #[test]
    fn rotation_moves_slices() {
        let layout = WheelLayout::for_entries(&names(&["a", "b"]), PI, 600, 280.0);
        let pixmap = WheelRenderer::new().render_layout(&layout).unwrap();

        assert_eq!(rgba(&pixmap, 300, 100), opaque(0));
        assert_eq!(rgba(&pixmap, 300, 500), opaque(1));
    }

    #[test]
    fn placeholder_is_translucent() {
        let layout = WheelLayout::placeholder(600, 280.0);
        let pixmap = WheelRenderer::new().render_layout(&layout).unwrap();

        let alpha = rgba(&pixmap, 300, 400)[3];
        assert!(alpha > 0 && alpha < 255);
    }

    #[test]
    fn pixmap_renderer_keeps_latest_frame() {
        let mut renderer = PixmapRenderer::new(WheelRenderer::new(), 200, 90.0);
        assert!(renderer.frame().is_none());

        renderer.draw_placeholder();
        renderer.draw_wheel(&names(&["a", "b", "c"]), 0.5);

        assert_eq!(renderer.frames_drawn(), 2);
        assert_eq!(renderer.frame().unwrap().width(), 200);
    }

    #[test]
    fn save_png_needs_a_frame() {
        let renderer = PixmapRenderer::new(WheelRenderer::new(), 200, 90.0);
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            renderer.save_png(&dir.path().join("wheel.png")),
            Err(RendererError::NothingDrawn)
        ));
    }

    #[test]
    fn save_png_writes_file() {
        let mut renderer = PixmapRenderer::new(WheelRenderer::new(), 200, 90.0);
        renderer.draw_wheel(&names(&["a", "b"]), 0.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wheel.png");
        renderer.save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn missing_font_file_is_reported() {
        let err = WheelRenderer::from_font_file(Path::new("/definitely/missing.ttf")).unwrap_err();
        assert!(matches!(err, RendererError::FontRead { .. }));
    }

    #[test]
    fn garbage_font_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(
            WheelRenderer::from_font_file(&path),
            Err(RendererError::InvalidFont { .. })
        ));
    }
}
