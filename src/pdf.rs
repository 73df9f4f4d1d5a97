//! PDF assembler: composes captured face bitmaps into a multi-page
//! document sized to the physical card format.
//!
//! One landscape page per face, in capture order; each bitmap is embedded
//! at the page origin and stretched to exactly fill the page. No vector
//! content — the pages are rasterized images.

use crate::capture::{CapturedFace, PrintSpec, MM_PER_INCH};
use crate::error::AppError;
use log::debug;
use printpdf::*;
use std::io::BufWriter;

const DOC_TITLE: &str = "Employee ID Card";

/// Assemble the captured faces into an in-memory PDF.
pub fn assemble(captures: &[CapturedFace], print: &PrintSpec) -> Result<Vec<u8>, AppError> {
    let first = captures
        .first()
        .ok_or_else(|| AppError::AssemblyFailure("no captured faces to assemble".into()))?;

    let (doc, page1, layer1) = PdfDocument::new(
        DOC_TITLE,
        Mm(print.width_mm),
        Mm(print.height_mm),
        "Layer 1",
    );

    embed_bitmap(&doc.get_page(page1).get_layer(layer1), first, print);
    for capture in &captures[1..] {
        let (page, layer) = doc.add_page(Mm(print.width_mm), Mm(print.height_mm), "Layer 1");
        embed_bitmap(&doc.get_page(page).get_layer(layer), capture, print);
    }
    debug!("assembled {} page(s)", captures.len());

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| AppError::AssemblyFailure(e.to_string()))?;
    writer
        .into_inner()
        .map_err(|e| AppError::AssemblyFailure(e.to_string()))
}

/// Embed one face bitmap so it fills the page edge to edge: the DPI is
/// derived from the width axis, and the height axis gets a residual
/// stretch so neither letterboxing nor margins appear.
fn embed_bitmap(layer: &PdfLayerReference, capture: &CapturedFace, print: &PrintSpec) {
    let (width_px, height_px) = capture.bitmap.dimensions();
    let raw_pixels = capture.bitmap.clone().into_raw();

    let pdf_image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: raw_pixels,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    // DPI that makes the bitmap width span the page width exactly.
    let dpi = width_px as f32 / (print.width_mm / MM_PER_INCH);
    let natural_height_mm = height_px as f32 / dpi * MM_PER_INCH;
    let stretch_y = print.height_mm / natural_height_mm;

    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(0.0)),
            dpi: Some(dpi),
            scale_y: Some(stretch_y),
            ..Default::default()
        },
    );
}
