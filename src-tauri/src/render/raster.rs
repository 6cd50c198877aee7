//! Software rasteriser for the export image.
//!
//! Reproduces what the overlay shows: the frozen background scaled by the
//! zoom factor, then every stroke and shape on top. Each item is rendered to
//! a coverage mask first and blended once, so a translucent highlighter does
//! not darken where its own segments overlap.

use crate::sketch::{Canvas, Color, Point, Rect, Shape, ShapeKind, Stroke};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Upper bound on ellipse tessellation.
const MAX_ELLIPSE_SEGMENTS: usize = 512;

/// Renders the window contents at the background's size.
pub fn compose(background: &RgbaImage, canvas: &Canvas, zoom: f32) -> RgbaImage {
    let start = std::time::Instant::now();
    let (width, height) = background.dimensions();
    let mut out = scaled_background(background, zoom);

    for stroke in canvas.strokes() {
        draw_stroke(&mut out, stroke, zoom);
    }
    for shape in canvas.shapes() {
        draw_shape(&mut out, shape, zoom);
    }

    log::info!(
        "[EXPORT] Composed {}x{} ({} strokes, {} shapes, zoom {:.1}x) in {}ms",
        width,
        height,
        canvas.strokes().len(),
        canvas.shapes().len(),
        zoom,
        start.elapsed().as_millis()
    );
    out
}

/// Background scaled about the top-left corner, cropped or padded with
/// transparency to the original size.
///
/// Only the part of the source that stays on screen is resized, so zooming
/// in never allocates more than roughly one output frame.
fn scaled_background(background: &RgbaImage, zoom: f32) -> RgbaImage {
    let (width, height) = background.dimensions();
    if (zoom - 1.0).abs() < f32::EPSILON {
        return background.clone();
    }

    let region = VisibleRegion::new(width, height, zoom);
    let source = imageops::crop_imm(background, 0, 0, region.src_w, region.src_h).to_image();
    let scaled = imageops::resize(&source, region.dst_w, region.dst_h, FilterType::Triangle);

    let mut out = RgbaImage::new(width, height);
    imageops::replace(&mut out, &scaled, 0, 0);
    out
}

/// Source rectangle (anchored at the origin) that remains visible at `zoom`,
/// and the size it is scaled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibleRegion {
    src_w: u32,
    src_h: u32,
    dst_w: u32,
    dst_h: u32,
}

impl VisibleRegion {
    fn new(width: u32, height: u32, zoom: f32) -> Self {
        let visible = |len: u32| ((len as f32 / zoom).ceil() as u32).clamp(1, len.max(1));
        let (src_w, src_h) = (visible(width), visible(height));
        let scaled = |len: u32| ((len as f32 * zoom).round() as u32).max(1);
        Self {
            src_w,
            src_h,
            dst_w: scaled(src_w),
            dst_h: scaled(src_h),
        }
    }
}

pub fn draw_stroke(image: &mut RgbaImage, stroke: &Stroke, zoom: f32) {
    let points: Vec<(f32, f32)> = stroke.points.iter().map(|p| p.scaled(zoom)).collect();
    draw_polyline(image, &points, stroke.width as f32, stroke.color);
}

pub fn draw_shape(image: &mut RgbaImage, shape: &Shape, zoom: f32) {
    let points = match shape.kind {
        ShapeKind::Line => vec![shape.start.scaled(zoom), shape.end.scaled(zoom)],
        ShapeKind::Rectangle => rectangle_outline(shape.bounds(), zoom),
        ShapeKind::Circle => ellipse_outline(shape.bounds(), zoom),
    };
    draw_polyline(image, &points, shape.width as f32, shape.color);
}

fn rectangle_outline(rect: Rect, zoom: f32) -> Vec<(f32, f32)> {
    let corners = [
        Point::new(rect.left, rect.top),
        Point::new(rect.right, rect.top),
        Point::new(rect.right, rect.bottom),
        Point::new(rect.left, rect.bottom),
        Point::new(rect.left, rect.top),
    ];
    corners.iter().map(|p| p.scaled(zoom)).collect()
}

/// Closed polyline approximating the ellipse inscribed in `rect`.
fn ellipse_outline(rect: Rect, zoom: f32) -> Vec<(f32, f32)> {
    let rx = rect.width() as f32 * zoom / 2.0;
    let ry = rect.height() as f32 * zoom / 2.0;
    let cx = rect.left as f32 * zoom + rx;
    let cy = rect.top as f32 * zoom + ry;

    // Roughly one segment per 4px of circumference.
    let circumference = std::f32::consts::TAU * ((rx * rx + ry * ry) / 2.0).sqrt();
    let segments = ((circumference / 4.0).ceil() as usize).clamp(16, MAX_ELLIPSE_SEGMENTS);

    (0..=segments)
        .map(|i| {
            let t = std::f32::consts::TAU * i as f32 / segments as f32;
            (cx + rx * t.cos(), cy + ry * t.sin())
        })
        .collect()
}

/// Anti-aliased coverage for one item, limited to its bounding box.
struct Mask {
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl Mask {
    /// Mask covering the polyline's bounds, clipped to the image. `None` if
    /// the item lies entirely off-image.
    fn for_points(points: &[(f32, f32)], pad: f32, image_w: u32, image_h: u32) -> Option<Self> {
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for &(x, y) in points {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let x0 = (min_x - pad).floor().max(0.0);
        let y0 = (min_y - pad).floor().max(0.0);
        let x1 = (max_x + pad).ceil().min(image_w as f32);
        let y1 = (max_y + pad).ceil().min(image_h as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        let (width, height) = ((x1 - x0) as u32, (y1 - y0) as u32);
        Some(Self {
            x0: x0 as u32,
            y0: y0 as u32,
            width,
            height,
            coverage: vec![0.0; (width * height) as usize],
        })
    }

    /// Accumulates a round-capped segment using max coverage.
    fn add_segment(&mut self, a: (f32, f32), b: (f32, f32), half_width: f32) {
        let reach = half_width + 1.0;
        let sx0 = ((a.0.min(b.0) - reach).floor() as i64 - i64::from(self.x0)).max(0);
        let sy0 = ((a.1.min(b.1) - reach).floor() as i64 - i64::from(self.y0)).max(0);
        let sx1 = ((a.0.max(b.0) + reach).ceil() as i64 - i64::from(self.x0)).min(i64::from(self.width));
        let sy1 = ((a.1.max(b.1) + reach).ceil() as i64 - i64::from(self.y0)).min(i64::from(self.height));

        for my in sy0..sy1 {
            for mx in sx0..sx1 {
                let px = (mx + i64::from(self.x0)) as f32 + 0.5;
                let py = (my + i64::from(self.y0)) as f32 + 0.5;
                let d = distance_to_segment((px, py), a, b);
                let cov = (half_width + 0.5 - d).clamp(0.0, 1.0);
                if cov > 0.0 {
                    let idx = (my as u32 * self.width + mx as u32) as usize;
                    if cov > self.coverage[idx] {
                        self.coverage[idx] = cov;
                    }
                }
            }
        }
    }

    fn blend_into(&self, image: &mut RgbaImage, color: Color) {
        for my in 0..self.height {
            for mx in 0..self.width {
                let cov = self.coverage[(my * self.width + mx) as usize];
                if cov > 0.0 {
                    let pixel = image.get_pixel_mut(self.x0 + mx, self.y0 + my);
                    blend_over(pixel, color, cov);
                }
            }
        }
    }
}

/// Strokes `points` with round caps and joins. A single point renders as a dot.
pub fn draw_polyline(image: &mut RgbaImage, points: &[(f32, f32)], width: f32, color: Color) {
    if points.is_empty() || color.a == 0 {
        return;
    }

    let half_width = (width / 2.0).max(0.5);
    let Some(mut mask) = Mask::for_points(points, half_width + 1.0, image.width(), image.height())
    else {
        return;
    };

    if points.len() == 1 {
        mask.add_segment(points[0], points[0], half_width);
    } else {
        for pair in points.windows(2) {
            mask.add_segment(pair[0], pair[1], half_width);
        }
    }

    mask.blend_into(image, color);
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (apx - t * abx, apy - t * aby);
    (dx * dx + dy * dy).sqrt()
}

/// Source-over with straight alpha.
fn blend_over(dst: &mut Rgba<u8>, color: Color, coverage: f32) {
    let sa = f32::from(color.a) / 255.0 * coverage;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }

    let mix = |s: u8, d: u8| {
        let c = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}
