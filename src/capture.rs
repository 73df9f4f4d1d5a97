//! Capture/rasterizer: converts one face's authoring-resolution geometry
//! into a bitmap at the target print resolution.
//!
//! Capture never sees the responsive display scale; it rasterizes the
//! unscaled geometry at a single uniform factor derived from the physical
//! print target.

use crate::error::AppError;
use crate::layout::{Content, Face, FaceSide, HAlign, ImageFit, Rect, Rgb, TextSpan};
use image::{imageops, imageops::FilterType, RgbImage, RgbaImage};
use log::debug;
use rusttype::{point, Font, Scale};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Physical print target
// ============================================================================

pub const MM_PER_INCH: f32 = 25.4;

/// Target pixel count for a physical dimension at a given density.
pub fn target_pixels(mm: f32, dpi: f32) -> u32 {
    (mm / MM_PER_INCH * dpi).round() as u32
}

/// The physical page the bitmaps are destined for. Defaults to CR80 card
/// stock (85.6mm x 54mm, landscape) at 300 DPI — these constants are a
/// compatibility contract with physical card printers and cutters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintSpec {
    pub width_mm: f32,
    pub height_mm: f32,
    pub dpi: f32,
}

impl Default for PrintSpec {
    fn default() -> Self {
        PrintSpec { width_mm: 85.6, height_mm: 54.0, dpi: 300.0 }
    }
}

impl PrintSpec {
    pub fn target_width_px(&self) -> u32 {
        target_pixels(self.width_mm, self.dpi)
    }

    pub fn target_height_px(&self) -> u32 {
        target_pixels(self.height_mm, self.dpi)
    }

    /// Capture scale: minimum of the per-axis ratios, preserving aspect.
    pub fn capture_scale(&self, face: &Face) -> f32 {
        let sx = self.target_width_px() as f32 / face.width;
        let sy = self.target_height_px() as f32 / face.height;
        sx.min(sy)
    }
}

/// One captured face, in insertion order within an export run.
#[derive(Debug, Clone)]
pub struct CapturedFace {
    pub side: FaceSide,
    pub bitmap: RgbImage,
}

// ============================================================================
// Font discovery
// ============================================================================

const FONT_CANDIDATES: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation2/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation2/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ),
    ("/Library/Fonts/Arial.ttf", "/Library/Fonts/Arial Bold.ttf"),
];

// ============================================================================
// Capture engine
// ============================================================================

/// Holds the rasterization resources for an export run. Acquired lazily on
/// the first export and reused afterwards.
#[derive(Debug)]
pub struct CaptureEngine {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl CaptureEngine {
    /// Locate a usable TrueType font (regular, plus a bold face when one
    /// sits next to it). `IDCARD_FONT` / `IDCARD_FONT_BOLD` override the
    /// built-in search list.
    pub fn find_system_font() -> Option<(PathBuf, Option<PathBuf>)> {
        if let Ok(path) = env::var("IDCARD_FONT") {
            let regular = PathBuf::from(path);
            if regular.is_file() {
                let bold = env::var("IDCARD_FONT_BOLD")
                    .map(PathBuf::from)
                    .ok()
                    .filter(|p| p.is_file());
                return Some((regular, bold));
            }
        }
        for (regular, bold) in FONT_CANDIDATES {
            let regular = Path::new(regular);
            if regular.is_file() {
                let bold = Path::new(bold);
                let bold = bold.is_file().then(|| bold.to_path_buf());
                return Some((regular.to_path_buf(), bold));
            }
        }
        None
    }

    /// Acquire the engine. With an explicit path, that font serves both
    /// weights; otherwise the system search list is consulted.
    pub fn acquire(explicit: Option<&Path>) -> Result<Self, AppError> {
        let (regular_path, bold_path) = match explicit {
            Some(p) => (p.to_path_buf(), None),
            None => Self::find_system_font().ok_or_else(|| {
                AppError::CaptureFailure(
                    "no usable TrueType font found; pass --font or set IDCARD_FONT".into(),
                )
            })?,
        };
        debug!("capture engine font: {}", regular_path.display());
        let regular = load_font(&regular_path)?;
        let bold = match bold_path {
            Some(p) => load_font(&p)?,
            None => regular.clone(),
        };
        Ok(CaptureEngine { regular, bold })
    }

    /// Rasterize one face at the print target.
    ///
    /// Every image payload in the face is decoded before the first pixel is
    /// written, so a face is never captured with half its images missing.
    /// A decode failure aborts the capture.
    pub fn capture(&self, face: &Face, print: &PrintSpec) -> Result<CapturedFace, AppError> {
        let s = print.capture_scale(face);
        let width = (face.width * s).round() as u32;
        let height = (face.height * s).round() as u32;
        debug!(
            "capturing {} face at {}x{} (scale {:.4})",
            face.side, width, height, s
        );

        let mut decoded: Vec<Option<RgbaImage>> = Vec::with_capacity(face.elements.len());
        for element in &face.elements {
            match &element.content {
                Content::Image { asset, .. } => decoded.push(Some(asset.decode()?.to_rgba8())),
                _ => decoded.push(None),
            }
        }

        // White background, never transparent.
        let mut canvas = RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]));

        for (element, pixels) in face.elements.iter().zip(&decoded) {
            match &element.content {
                Content::Fill { color } => fill_rect(&mut canvas, &element.rect, s, *color),
                Content::Border { color, thickness } => {
                    stroke_rect(&mut canvas, &element.rect, s, *color, *thickness)
                }
                Content::Text(span) => self.draw_span(&mut canvas, &element.rect, span, s),
                Content::Image { fit, opacity, .. } => {
                    // Decoded above; absence here is a logic error, not a
                    // user error.
                    if let Some(img) = pixels {
                        draw_image(&mut canvas, &element.rect, s, img, *fit, *opacity);
                    }
                }
                Content::Placeholder { label } => {
                    let span = TextSpan {
                        text: label.clone(),
                        size: 9.0,
                        bold: false,
                        color: Rgb(148, 163, 184),
                        align: HAlign::Center,
                        wrap: false,
                    };
                    self.draw_span(&mut canvas, &element.rect, &span, s);
                }
            }
        }

        Ok(CapturedFace { side: face.side, bitmap: canvas })
    }

    fn font_for(&self, span: &TextSpan) -> &Font<'static> {
        if span.bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    fn draw_span(&self, canvas: &mut RgbImage, rect: &Rect, span: &TextSpan, s: f32) {
        if span.text.trim().is_empty() {
            return;
        }
        let font = self.font_for(span);
        let scale = Scale::uniform(span.size * s);
        let v = font.v_metrics(scale);
        let rx = rect.x * s;
        let ry = rect.y * s;
        let rw = rect.w * s;
        let rh = rect.h * s;

        if span.wrap {
            let line_height = span.size * 1.4 * s;
            let mut lines = Vec::new();
            for paragraph in span.text.split('\n') {
                lines.extend(wrap_words(font, paragraph, scale, rw));
            }
            for (i, line) in lines.iter().enumerate() {
                let baseline = ry + v.ascent + i as f32 * line_height;
                self.draw_line(canvas, font, line, scale, rx, rw, baseline, span);
            }
        } else {
            // Single line, vertically centred in its rect.
            let text_height = v.ascent - v.descent;
            let baseline = ry + (rh - text_height) / 2.0 + v.ascent;
            self.draw_line(canvas, font, &span.text, scale, rx, rw, baseline, span);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &self,
        canvas: &mut RgbImage,
        font: &Font<'static>,
        line: &str,
        scale: Scale,
        rx: f32,
        rw: f32,
        baseline: f32,
        span: &TextSpan,
    ) {
        let x = match span.align {
            HAlign::Left => rx,
            HAlign::Center => rx + (rw - text_width(font, line, scale)).max(0.0) / 2.0,
        };
        for glyph in font.layout(line, scale, point(x, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, coverage| {
                    let px = gx as i64 + bb.min.x as i64;
                    let py = gy as i64 + bb.min.y as i64;
                    blend(canvas, px, py, span.color, coverage);
                });
            }
        }
    }
}

fn load_font(path: &Path) -> Result<Font<'static>, AppError> {
    let data = fs::read(path)
        .map_err(|e| AppError::CaptureFailure(format!("cannot read font {}: {}", path.display(), e)))?;
    Font::try_from_vec(data)
        .ok_or_else(|| AppError::CaptureFailure(format!("invalid font file: {}", path.display())))
}

fn text_width(font: &Font<'_>, text: &str, scale: Scale) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn wrap_words(font: &Font<'_>, text: &str, scale: Scale, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && text_width(font, &candidate, scale) > max_width {
            lines.push(current);
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// ============================================================================
// Pixel helpers
// ============================================================================

fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb, alpha: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = alpha.clamp(0.0, 1.0);
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let Rgb(r, g, b) = color;
    dst.0 = [
        (r as f32 * alpha + dst.0[0] as f32 * (1.0 - alpha)) as u8,
        (g as f32 * alpha + dst.0[1] as f32 * (1.0 - alpha)) as u8,
        (b as f32 * alpha + dst.0[2] as f32 * (1.0 - alpha)) as u8,
    ];
}

fn scaled_bounds(rect: &Rect, s: f32) -> (i64, i64, i64, i64) {
    let x0 = (rect.x * s).round() as i64;
    let y0 = (rect.y * s).round() as i64;
    let x1 = ((rect.x + rect.w) * s).round() as i64;
    let y1 = ((rect.y + rect.h) * s).round() as i64;
    (x0, y0, x1, y1)
}

fn fill_rect(canvas: &mut RgbImage, rect: &Rect, s: f32, color: Rgb) {
    let (x0, y0, x1, y1) = scaled_bounds(rect, s);
    for y in y0..y1 {
        for x in x0..x1 {
            blend(canvas, x, y, color, 1.0);
        }
    }
}

fn stroke_rect(canvas: &mut RgbImage, rect: &Rect, s: f32, color: Rgb, thickness: f32) {
    let (x0, y0, x1, y1) = scaled_bounds(rect, s);
    let t = ((thickness * s).round() as i64).max(1);
    for y in y0..y1 {
        for x in x0..x1 {
            let edge = x < x0 + t || x >= x1 - t || y < y0 + t || y >= y1 - t;
            if edge {
                blend(canvas, x, y, color, 1.0);
            }
        }
    }
}

fn draw_image(
    canvas: &mut RgbImage,
    rect: &Rect,
    s: f32,
    img: &RgbaImage,
    fit: ImageFit,
    opacity: f32,
) {
    let (x0, y0, x1, y1) = scaled_bounds(rect, s);
    let dw = (x1 - x0).max(0) as u32;
    let dh = (y1 - y0).max(0) as u32;
    if dw == 0 || dh == 0 {
        return;
    }
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 {
        return;
    }
    let ratio_w = dw as f32 / iw as f32;
    let ratio_h = dh as f32 / ih as f32;
    let ratio = match fit {
        ImageFit::Cover => ratio_w.max(ratio_h),
        ImageFit::Contain => ratio_w.min(ratio_h),
    };
    let rw = ((iw as f32 * ratio).round() as u32).max(1);
    let rh = ((ih as f32 * ratio).round() as u32).max(1);
    let resized = imageops::resize(img, rw, rh, FilterType::Triangle);

    // Centre the scaled image on the slot; Cover overflow is clipped to
    // the slot bounds below.
    let dx = x0 + (dw as i64 - rw as i64) / 2;
    let dy = y0 + (dh as i64 - rh as i64) / 2;

    for (ix, iy, pixel) in resized.enumerate_pixels() {
        let tx = dx + ix as i64;
        let ty = dy + iy as i64;
        if tx < x0 || tx >= x1 || ty < y0 || ty >= y1 {
            continue;
        }
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0 * opacity;
        if alpha > 0.0 {
            blend(canvas, tx, ty, Rgb(r, g, b), alpha);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
