//! Layout renderer: a pure, deterministic mapping from a record to the two
//! fixed-geometry card faces.
//!
//! Faces are authored at a fixed 480x300 pixel geometry (top-left origin).
//! On-screen display scales this geometry uniformly; capture rasterizes it
//! at print resolution. Neither path re-flows content.

use crate::record::{EmployeeRecord, ImageAsset};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Authoring resolution of one card face.
pub const CARD_WIDTH: f32 = 480.0;
pub const CARD_HEIGHT: f32 = 300.0;

/// Header geometry.
const HEADER_HEIGHT: f32 = 65.0;
const LOGO_BOX_WIDTH: f32 = 70.0;
const LOGO_SIZE: f32 = 45.0;

/// Front details grid.
const LABEL_COL_WIDTH: f32 = 80.0;
const COLON_COL_WIDTH: f32 = 8.0;
const DETAIL_ROW_HEIGHT: f32 = 18.0;
const DETAIL_ROW_PITCH: f32 = 22.0;

/// Back face grid.
const BACK_LABEL_WIDTH: f32 = 110.0;
const BACK_MARGIN_X: f32 = 40.0;

/// Photo slot, sized to span the NAME..HRMS ID rows.
const PHOTO_W: f32 = 92.0;
const PHOTO_H: f32 = 128.0;

const WATERMARK_SIZE: f32 = 160.0;
const WATERMARK_OPACITY: f32 = 0.12;

/// Header/authority fallbacks.
pub const ORG_TITLE: &str = "GOVERNMENT OF ANDHRA PRADESH";
pub const DEPARTMENT_FALLBACK: &str = "Department Name";
pub const CARD_TITLE: &str = "IDENTITY CARD";
pub const NO_PHOTO_PLACEHOLDER: &str = "No Photo";
pub const SIGNATURE_CAPTION: &str = "Signature of the Employee";
pub const AUTHORITY_FALLBACK: [&str; 2] = ["Joint Director of Agriculture", "SPSR Nellore Dt."];

// Palette (matches the reference card).
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
const GREEN_STRIP: Rgb = Rgb(21, 128, 61);
const GREEN_BORDER: Rgb = Rgb(22, 101, 52);
const GREEN_LIGHT: Rgb = Rgb(134, 239, 172);
const LABEL_RED: Rgb = Rgb(190, 18, 60);
const CAPTION_SLATE: Rgb = Rgb(71, 85, 105);
const MUTED_SLATE: Rgb = Rgb(148, 163, 184);

// ============================================================================
// Geometry tree
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceSide {
    Front,
    Back,
}

impl fmt::Display for FaceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceSide::Front => f.write_str("front"),
            FaceSide::Back => f.write_str("back"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
}

/// How an image payload occupies its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// Scale to fill, centre-cropping overflow (photos).
    Cover,
    /// Scale to fit entirely, letterboxed (signatures, logos).
    Contain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub color: Rgb,
    pub align: HAlign,
    /// Word-wrap within the element rect (free-form paragraph fields only).
    pub wrap: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Fill { color: Rgb },
    Border { color: Rgb, thickness: f32 },
    Text(TextSpan),
    Image { asset: ImageAsset, fit: ImageFit, opacity: f32 },
    Placeholder { label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub rect: Rect,
    pub content: Content,
}

/// One printable side of the card: an ordered tree of positioned elements
/// at authoring resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub side: FaceSide,
    pub width: f32,
    pub height: f32,
    pub elements: Vec<Element>,
}

// ============================================================================
// Builders
// ============================================================================

fn fill(rect: Rect, color: Rgb) -> Element {
    Element { rect, content: Content::Fill { color } }
}

fn border(rect: Rect, color: Rgb) -> Element {
    Element { rect, content: Content::Border { color, thickness: 1.0 } }
}

fn text(rect: Rect, span: TextSpan) -> Element {
    Element { rect, content: Content::Text(span) }
}

fn span(text: impl Into<String>, size: f32, bold: bool, color: Rgb, align: HAlign) -> TextSpan {
    TextSpan { text: text.into(), size, bold, color, align, wrap: false }
}

fn image(rect: Rect, asset: &ImageAsset, fit: ImageFit, opacity: f32) -> Element {
    Element {
        rect,
        content: Content::Image { asset: asset.clone(), fit, opacity },
    }
}

fn watermark(logo: Option<&ImageAsset>, center_y: f32) -> Option<Element> {
    logo.map(|asset| {
        image(
            Rect::new(
                (CARD_WIDTH - WATERMARK_SIZE) / 2.0,
                center_y - WATERMARK_SIZE / 2.0,
                WATERMARK_SIZE,
                WATERMARK_SIZE,
            ),
            asset,
            ImageFit::Contain,
            WATERMARK_OPACITY,
        )
    })
}

fn value_text(value: Option<&str>) -> String {
    value.unwrap_or("").trim().to_uppercase()
}

/// Render both faces in fixed order: front, then back.
pub fn render_faces(record: &EmployeeRecord, logo: Option<&ImageAsset>) -> Vec<Face> {
    vec![front_face(record, logo), back_face(record, logo)]
}

/// Front face: header, title, photo, details grid, signature block and
/// authority caption. Missing fields render as empty or placeholder
/// content, never as an error.
pub fn front_face(record: &EmployeeRecord, logo: Option<&ImageAsset>) -> Face {
    let mut elements = Vec::new();

    // Card background and outer border.
    elements.push(fill(Rect::new(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT), WHITE));
    elements.push(border(Rect::new(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT), MUTED_SLATE));

    // Header: white logo box, green title strip, dividing rules.
    elements.push(fill(
        Rect::new(LOGO_BOX_WIDTH, 0.0, CARD_WIDTH - LOGO_BOX_WIDTH, HEADER_HEIGHT),
        GREEN_STRIP,
    ));
    elements.push(fill(
        Rect::new(LOGO_BOX_WIDTH - 1.0, 0.0, 1.0, HEADER_HEIGHT),
        GREEN_BORDER,
    ));
    elements.push(fill(Rect::new(0.0, HEADER_HEIGHT, CARD_WIDTH, 1.0), GREEN_BORDER));

    if let Some(asset) = logo {
        elements.push(image(
            Rect::new((LOGO_BOX_WIDTH - LOGO_SIZE) / 2.0, (HEADER_HEIGHT - LOGO_SIZE) / 2.0, LOGO_SIZE, LOGO_SIZE),
            asset,
            ImageFit::Contain,
            1.0,
        ));
    }

    let strip_x = LOGO_BOX_WIDTH + 10.0;
    let strip_w = CARD_WIDTH - LOGO_BOX_WIDTH - 20.0;
    elements.push(text(
        Rect::new(strip_x, 14.0, strip_w, 18.0),
        span(ORG_TITLE, 14.0, true, WHITE, HAlign::Center),
    ));
    let department = record
        .department
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEPARTMENT_FALLBACK);
    elements.push(text(
        Rect::new(strip_x, 36.0, strip_w, 16.0),
        span(department.to_uppercase(), 12.0, true, GREEN_LIGHT, HAlign::Center),
    ));

    // Watermark goes in before the body text so later elements composite
    // on top of it.
    if let Some(el) = watermark(logo, 180.0) {
        elements.push(el);
    }

    // Title.
    elements.push(text(
        Rect::new(10.0, 71.0, CARD_WIDTH - 20.0, 16.0),
        span(CARD_TITLE, 14.0, true, BLACK, HAlign::Center),
    ));

    // Photo slot spans the details rows.
    let photo_rect = Rect::new(14.0, 93.0, PHOTO_W, PHOTO_H);
    elements.push(border(photo_rect, WHITE));
    match &record.photo {
        Some(asset) if !asset.is_blank() => {
            elements.push(image(photo_rect, asset, ImageFit::Cover, 1.0));
        }
        _ => elements.push(Element {
            rect: photo_rect,
            content: Content::Placeholder { label: NO_PHOTO_PLACEHOLDER.to_string() },
        }),
    }

    // Details grid: fixed label column so colons and values align.
    let label_x = 120.0;
    let colon_x = label_x + LABEL_COL_WIDTH;
    let value_x = colon_x + COLON_COL_WIDTH;
    let value_w = CARD_WIDTH - value_x - 10.0;

    // The office row shows the location on one line; the literal line
    // breaks belong to the authority caption below.
    let office_single_line = record.office_lines().join(" ");
    let rows: [(&str, String); 5] = [
        ("NAME", record.full_name().to_uppercase()),
        ("DESIGNATION", value_text(record.designation.as_deref())),
        ("CFMS ID", value_text(record.cfms_id.as_deref())),
        ("HRMS ID", value_text(record.hrms_id.as_deref())),
        ("OFFICE", office_single_line.trim().to_uppercase()),
    ];
    for (i, (label, value)) in rows.into_iter().enumerate() {
        let y = 93.0 + i as f32 * DETAIL_ROW_PITCH;
        elements.push(text(
            Rect::new(label_x, y, LABEL_COL_WIDTH, DETAIL_ROW_HEIGHT),
            span(label, 10.0, true, LABEL_RED, HAlign::Left),
        ));
        elements.push(text(
            Rect::new(colon_x, y, COLON_COL_WIDTH, DETAIL_ROW_HEIGHT),
            span(":", 11.0, true, BLACK, HAlign::Center),
        ));
        elements.push(text(
            Rect::new(value_x, y, value_w, DETAIL_ROW_HEIGHT),
            span(value, 11.0, true, BLACK, HAlign::Left),
        ));
    }

    // Employee signature block, bottom-left. Blank when absent.
    if let Some(asset) = record.signature.as_ref().filter(|a| !a.is_blank()) {
        elements.push(image(
            Rect::new(16.0, 248.0, PHOTO_W, 28.0),
            asset,
            ImageFit::Contain,
            1.0,
        ));
    }
    elements.push(text(
        Rect::new(16.0, 278.0, PHOTO_W, 10.0),
        span(SIGNATURE_CAPTION, 9.0, false, CAPTION_SLATE, HAlign::Center),
    ));

    // Authority caption, bottom-right: office text split on literal line
    // breaks, original order, one element per line; default caption when
    // the office text is absent.
    let office_lines = record.office_lines();
    let lines: Vec<&str> = if office_lines.iter().all(|l| l.trim().is_empty()) {
        AUTHORITY_FALLBACK.to_vec()
    } else {
        office_lines
    };
    let caption_w = 120.0;
    let caption_x = CARD_WIDTH - 16.0 - caption_w;
    let start_y = 288.0 - 10.0 * lines.len() as f32;
    for (i, line) in lines.iter().enumerate() {
        elements.push(text(
            Rect::new(caption_x, start_y + 10.0 * i as f32, caption_w, 10.0),
            span(*line, 9.0, false, CAPTION_SLATE, HAlign::Center),
        ));
    }

    Face { side: FaceSide::Front, width: CARD_WIDTH, height: CARD_HEIGHT, elements }
}

/// Back face: address, identifier, contact and blood-group rows, plus the
/// watermark.
pub fn back_face(record: &EmployeeRecord, logo: Option<&ImageAsset>) -> Face {
    let mut elements = Vec::new();

    elements.push(fill(Rect::new(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT), WHITE));
    elements.push(border(Rect::new(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT), MUTED_SLATE));

    if let Some(el) = watermark(logo, CARD_HEIGHT / 2.0) {
        elements.push(el);
    }

    let value_x = BACK_MARGIN_X + BACK_LABEL_WIDTH;
    let value_w = CARD_WIDTH - value_x - BACK_MARGIN_X;
    let blood = record
        .blood_group
        .map(|g| g.to_string())
        .unwrap_or_default();

    // (label, value, y, height, wrap). The address keeps its original
    // casing; everything else is upper-cased.
    let address = record.address.as_deref().unwrap_or("").trim().to_string();
    let rows: [(&str, String, f32, f32, bool); 4] = [
        ("ADDRESS", address, 77.0, 40.0, true),
        ("AADHAAR NO", value_text(record.aadhaar_number.as_deref()), 132.0, DETAIL_ROW_HEIGHT, false),
        ("CELL NUMBER", value_text(record.mobile_number.as_deref()), 167.0, DETAIL_ROW_HEIGHT, false),
        ("BLOOD GROUP", blood, 202.0, DETAIL_ROW_HEIGHT, false),
    ];
    for (label, value, y, h, wrap) in rows {
        elements.push(text(
            Rect::new(BACK_MARGIN_X, y, BACK_LABEL_WIDTH, h),
            span(label, 10.0, true, LABEL_RED, HAlign::Left),
        ));
        let mut value_span = span(format!(": {}", value), 11.0, true, BLACK, HAlign::Left);
        value_span.wrap = wrap;
        elements.push(text(Rect::new(value_x, y, value_w, h), value_span));
    }

    Face { side: FaceSide::Back, width: CARD_WIDTH, height: CARD_HEIGHT, elements }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BloodGroup, EmployeeRecord, ImageAsset};

    const TINY_PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn record() -> EmployeeRecord {
        EmployeeRecord {
            first_name: Some("Ravi".into()),
            last_name: Some("Kumar".into()),
            blood_group: Some(BloodGroup::BPositive),
            department: Some("Agriculture Department".into()),
            designation: Some("Agriculture Officer".into()),
            office_location: Some("Joint Director\nSPSR Nellore Dt.".into()),
            cfms_id: Some("123456".into()),
            hrms_id: Some("654321".into()),
            address: Some("12-3-45 Main Road, Nellore".into()),
            mobile_number: Some("9876543210".into()),
            photo: Some(ImageAsset::new(TINY_PNG_DATA_URI)),
            signature: Some(ImageAsset::new(TINY_PNG_DATA_URI)),
            ..Default::default()
        }
    }

    fn texts(face: &Face) -> Vec<&TextSpan> {
        face.elements
            .iter()
            .filter_map(|e| match &e.content {
                Content::Text(span) => Some(span),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn rendering_is_deterministic() {
        let rec = record();
        let a = render_faces(&rec, None);
        let b = render_faces(&rec, None);
        assert_eq!(a, b);
    }

    #[test]
    fn faces_come_front_then_back() {
        let faces = render_faces(&record(), None);
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].side, FaceSide::Front);
        assert_eq!(faces[1].side, FaceSide::Back);
    }

    #[test]
    fn office_lines_render_literally_in_order() {
        let face = front_face(&record(), None);
        let spans = texts(&face);
        let joint = spans.iter().position(|s| s.text == "Joint Director").unwrap();
        let nellore = spans.iter().position(|s| s.text == "SPSR Nellore Dt.").unwrap();
        assert!(joint < nellore, "caption lines out of order");
        // Not merged into one span.
        assert!(!spans.iter().any(|s| s.text.contains("Joint Director\n")));
    }

    #[test]
    fn authority_caption_falls_back_when_office_absent() {
        let mut rec = record();
        rec.office_location = None;
        let face = front_face(&rec, None);
        let spans = texts(&face);
        for line in AUTHORITY_FALLBACK {
            assert!(spans.iter().any(|s| s.text == line), "missing {}", line);
        }
    }

    #[test]
    fn missing_photo_renders_placeholder() {
        let mut rec = record();
        rec.photo = None;
        let face = front_face(&rec, None);
        let placeholder = face.elements.iter().any(|e| {
            matches!(&e.content, Content::Placeholder { label } if label == NO_PHOTO_PLACEHOLDER)
        });
        assert!(placeholder);
        assert!(!face
            .elements
            .iter()
            .any(|e| matches!(&e.content, Content::Image { fit: ImageFit::Cover, .. })));
    }

    #[test]
    fn present_photo_fills_its_slot() {
        let face = front_face(&record(), None);
        assert!(face
            .elements
            .iter()
            .any(|e| matches!(&e.content, Content::Image { fit: ImageFit::Cover, .. })));
    }

    #[test]
    fn detail_labels_share_a_fixed_column() {
        let face = front_face(&record(), None);
        let label_rects: Vec<Rect> = face
            .elements
            .iter()
            .filter_map(|e| match &e.content {
                Content::Text(s) if s.color == Rgb(190, 18, 60) => Some(e.rect),
                _ => None,
            })
            .collect();
        assert!(label_rects.len() >= 5);
        assert!(label_rects.iter().all(|r| r.x == label_rects[0].x));
        assert!(label_rects.iter().all(|r| r.w == label_rects[0].w));
    }

    #[test]
    fn values_are_upper_cased() {
        let face = front_face(&record(), None);
        let spans = texts(&face);
        assert!(spans.iter().any(|s| s.text == "RAVI KUMAR"));
        assert!(spans.iter().any(|s| s.text == "AGRICULTURE OFFICER"));
    }

    #[test]
    fn address_keeps_original_casing() {
        let face = back_face(&record(), None);
        let spans = texts(&face);
        assert!(spans.iter().any(|s| s.text == ": 12-3-45 Main Road, Nellore"));
    }

    #[test]
    fn back_face_carries_identifier_contact_and_blood_rows() {
        let face = back_face(&record(), None);
        let spans = texts(&face);
        for label in ["ADDRESS", "AADHAAR NO", "CELL NUMBER", "BLOOD GROUP"] {
            assert!(spans.iter().any(|s| s.text == label), "missing {}", label);
        }
        assert!(spans.iter().any(|s| s.text == ": B+"));
        assert!(spans.iter().any(|s| s.text == ": 9876543210"));
    }

    #[test]
    fn watermark_present_only_with_logo() {
        let logo = ImageAsset::new(TINY_PNG_DATA_URI);
        let with = back_face(&record(), Some(&logo));
        let without = back_face(&record(), None);
        let is_watermark =
            |e: &Element| matches!(&e.content, Content::Image { opacity, .. } if *opacity < 1.0);
        assert!(with.elements.iter().any(is_watermark));
        assert!(!without.elements.iter().any(is_watermark));
    }

    #[test]
    fn empty_record_still_renders_both_faces() {
        let rec = EmployeeRecord::default();
        let faces = render_faces(&rec, None);
        assert_eq!(faces.len(), 2);
        let spans = texts(&faces[0]);
        // Department falls back rather than erroring.
        assert!(spans.iter().any(|s| s.text == DEPARTMENT_FALLBACK.to_uppercase()));
    }
}
