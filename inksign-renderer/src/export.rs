//! Contract export: rasterized page image and PDF.
//!
//! The document is laid out as SVG, rasterized with resvg/tiny-skia at the
//! configured upscale, then embedded in a single PDF page scaled to fit.

use std::fmt::Write;

use inksign_core::ContractDocument;

use crate::error::{RenderError, RenderResult};
use crate::surface::SignatureImage;

/// Label of the submit control drawn while controls are visible.
pub const SUBMIT_LABEL: &str = "Submit Signed Contract";

const MM_PER_INCH: f32 = 25.4;

/// Configuration for contract export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Upscale factor applied when rasterizing (default: 2.0).
    pub scale: f32,
    /// Layout width in CSS pixels (default: 794, A4 at 96 dpi).
    pub page_width: f32,
    /// Outer margin in CSS pixels.
    pub margin: f32,
    /// Background color as RGBA bytes.
    pub background: [u8; 4],
    /// PDF page size in millimetres (default: A4 portrait).
    pub page_size_mm: (f32, f32),
    /// Resolution the raster is tagged with inside the PDF.
    pub image_dpi: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            page_width: 794.0,
            margin: 48.0,
            background: [255, 255, 255, 255],
            page_size_mm: (210.0, 297.0),
            image_dpi: 300.0,
        }
    }
}

/// A rasterized contract page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// PNG bytes.
    pub png: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Output of a successful render.
#[derive(Debug, Clone)]
pub struct RenderedContract {
    /// The rasterized page.
    pub image: RasterImage,
    /// The generated PDF.
    pub pdf: Vec<u8>,
}

/// Where the raster lands on the PDF page, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    /// Left edge.
    pub x: f32,
    /// Top edge, measured down from the top of the page.
    pub y: f32,
    /// Placed width.
    pub width: f32,
    /// Placed height.
    pub height: f32,
}

/// Scale an image to fit the page, preserving aspect ratio, centred
/// horizontally and anchored to the top.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn fit_to_page(
    image_width: u32,
    image_height: u32,
    page_width: f32,
    page_height: f32,
) -> PagePlacement {
    let (w, h) = (image_width.max(1) as f32, image_height.max(1) as f32);
    let ratio = (page_width / w).min(page_height / h);
    let width = w * ratio;
    let height = h * ratio;
    PagePlacement {
        x: (page_width - width) / 2.0,
        y: 0.0,
        width,
        height,
    }
}

/// Turns a contract document into a page image and PDF.
pub trait ContractRenderer {
    /// Render `document` with `signature` in its signature block.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or PDF composition fails.
    fn render(
        &self,
        document: &ContractDocument,
        signature: &SignatureImage,
    ) -> RenderResult<RenderedContract>;
}

/// The resvg + printpdf contract renderer.
#[derive(Debug, Clone, Default)]
pub struct DocumentExporter {
    config: ExportConfig,
}

impl DocumentExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Export configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Lay the document out as an SVG string.
    ///
    /// Interactive-only regions are included only while
    /// [`ContractDocument::controls_visible`] is set.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_svg(&self, document: &ContractDocument, signature: &SignatureImage) -> String {
        let margin = self.config.margin;
        let mut body = String::with_capacity(4096);

        let y = layout_terms(&mut body, document, margin);
        let y = self.layout_signature(&mut body, document, signature, y);
        let y = layout_signer(&mut body, document, margin, y);

        let page_h = (y + margin).ceil();
        let page_w = self.config.page_width;
        let scale = self.config.scale;
        let out_w = (page_w * scale).round() as u32;
        let out_h = (page_h * scale).round() as u32;
        let bg = &self.config.background;

        let mut svg = String::with_capacity(body.len() + 512);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {page_w} {page_h}\">",
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"rgba({},{},{},{})\"/>",
            bg[0],
            bg[1],
            bg[2],
            f32::from(bg[3]) / 255.0,
        );
        svg.push_str(&body);
        svg.push_str("</svg>");
        svg
    }

    /// Signature image, its frame and the Clear control. Returns the next y.
    #[allow(clippy::cast_precision_loss)]
    fn layout_signature(
        &self,
        body: &mut String,
        document: &ContractDocument,
        signature: &SignatureImage,
        mut y: f32,
    ) -> f32 {
        let margin = self.config.margin;
        let content_w = (self.config.page_width - margin * 2.0).max(1.0);

        y += 36.0;
        text(body, margin, y, 18.0, "bold", "Client Signature");
        y += 12.0;

        let sig_w = (signature.width as f32).min(content_w);
        let sig_h = signature.height as f32 * sig_w / (signature.width.max(1) as f32);
        let data_url = signature.data_url();
        let _ = write!(
            body,
            "<image x=\"{margin}\" y=\"{y}\" width=\"{sig_w}\" height=\"{sig_h}\" preserveAspectRatio=\"none\" href=\"{data_url}\"/>",
        );
        let _ = write!(
            body,
            "<rect x=\"{margin}\" y=\"{y}\" width=\"{sig_w}\" height=\"{sig_h}\" fill=\"none\" stroke=\"#bdc3c7\" stroke-width=\"1\"/>",
        );
        y += sig_h;

        if document.controls_visible() {
            y += 8.0;
            button(body, margin, y, 80.0, "Clear");
            y += 32.0;
        }
        y
    }

    /// Rasterize the document to PNG at the configured upscale.
    ///
    /// # Errors
    ///
    /// Returns an error if the SVG cannot be parsed, the bitmap cannot be
    /// allocated or PNG encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rasterize(
        &self,
        document: &ContractDocument,
        signature: &SignatureImage,
    ) -> RenderResult<RasterImage> {
        let svg_string = self.render_to_svg(document, signature);

        let mut opt = usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();
        let tree = usvg::Tree::from_str(&svg_string, &opt)
            .map_err(|e| RenderError::Rasterize(format!("SVG parsing failed: {e}")))?;

        let px_w = (tree.size().width() as u32).max(1);
        let px_h = (tree.size().height() as u32).max(1);

        let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h).ok_or(RenderError::Allocation {
            width: px_w,
            height: px_h,
        })?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let png = pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))?;

        tracing::debug!("Rasterized contract at {px_w}x{px_h}");
        Ok(RasterImage {
            png,
            width: px_w,
            height: px_h,
        })
    }

    /// Embed a raster in a single-page PDF, scaled to fit.
    ///
    /// # Errors
    ///
    /// Returns an error if the PNG cannot be decoded or the PDF cannot be saved.
    #[allow(clippy::cast_precision_loss)]
    pub fn compose_pdf(&self, title: &str, raster: &RasterImage) -> RenderResult<Vec<u8>> {
        let (page_w, page_h) = self.config.page_size_mm;
        let (doc, page1, layer1) = printpdf::PdfDocument::new(
            title,
            printpdf::Mm(page_w),
            printpdf::Mm(page_h),
            "Layer 1",
        );
        let current_layer = doc.get_page(page1).get_layer(layer1);

        // Decode PNG using printpdf's bundled image crate for compatibility
        let dynamic_image = printpdf::image_crate::load_from_memory(&raster.png)
            .map_err(|e| RenderError::Pdf(format!("Failed to decode PNG for PDF: {e}")))?;
        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

        let placement = fit_to_page(raster.width, raster.height, page_w, page_h);
        let dpi = self.config.image_dpi;
        let natural_w = raster.width as f32 / dpi * MM_PER_INCH;
        let natural_h = raster.height as f32 / dpi * MM_PER_INCH;

        // PDF origin is bottom-left.
        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(placement.x)),
            translate_y: Some(printpdf::Mm(page_h - placement.y - placement.height)),
            scale_x: Some(placement.width / natural_w),
            scale_y: Some(placement.height / natural_h),
            dpi: Some(dpi),
            ..Default::default()
        };
        pdf_image.add_to_layer(current_layer, transform);

        doc.save_to_bytes()
            .map_err(|e| RenderError::Pdf(format!("PDF save failed: {e}")))
    }
}

impl ContractRenderer for DocumentExporter {
    fn render(
        &self,
        document: &ContractDocument,
        signature: &SignatureImage,
    ) -> RenderResult<RenderedContract> {
        let image = self.rasterize(document, signature)?;
        let pdf = self.compose_pdf(&document.title, &image)?;
        Ok(RenderedContract { image, pdf })
    }
}

/// Title, placeholder sections and services. Returns the next y.
fn layout_terms(body: &mut String, document: &ContractDocument, margin: f32) -> f32 {
    let mut y = margin + 30.0;
    text(body, margin, y, 26.0, "bold", &document.title);
    y += 24.0;

    for section in document.sections() {
        y += 28.0;
        text(body, margin, y, 18.0, "bold", &section.heading);
        for placeholder in &section.placeholders {
            y += 22.0;
            let line = format!("{}: {}", placeholder.label, placeholder.text);
            text(body, margin, y, 14.0, "normal", &line);
        }
    }

    y += 28.0;
    text(body, margin, y, 18.0, "bold", "Selected Services");
    for service in document.services() {
        y += 22.0;
        let line = format!("\u{2022} {service}");
        text(body, margin + 12.0, y, 14.0, "normal", &line);
    }
    y
}

/// Printed name, dates and the submit control. Returns the next y.
fn layout_signer(body: &mut String, document: &ContractDocument, margin: f32, mut y: f32) -> f32 {
    let date = document
        .contract_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let lines = [
        format!("Print Name: {}", document.signer_name().trim()),
        format!("Date: {date}"),
        format!("Provider Date: {}", document.provider_date()),
    ];

    y += 2.0;
    for line in &lines {
        y += 22.0;
        text(body, margin, y, 14.0, "normal", line);
    }

    if document.controls_visible() {
        y += 24.0;
        button(body, margin, y, 220.0, SUBMIT_LABEL);
        y += 36.0;
    }
    y
}

fn text(svg: &mut String, x: f32, y: f32, size: f32, weight: &str, content: &str) {
    let escaped = escape_xml(content);
    let _ = write!(
        svg,
        "<text x=\"{x}\" y=\"{y}\" font-size=\"{size}\" font-weight=\"{weight}\" fill=\"#2c3e50\" font-family=\"sans-serif\">{escaped}</text>",
    );
}

fn button(svg: &mut String, x: f32, y: f32, width: f32, label: &str) {
    let escaped = escape_xml(label);
    let _ = write!(
        svg,
        "<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"28\" rx=\"4\" fill=\"#3498db\"/>",
    );
    let tx = x + width / 2.0;
    let ty = y + 19.0;
    let _ = write!(
        svg,
        "<text x=\"{tx}\" y=\"{ty}\" font-size=\"13\" fill=\"#ffffff\" text-anchor=\"middle\" font-family=\"sans-serif\">{escaped}</text>",
    );
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn document() -> ContractDocument {
        let mut doc = ContractDocument::master_service_agreement(
            NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date"),
        );
        doc.set_signer_name("Grace Hopper");
        doc
    }

    fn blank_signature() -> SignatureImage {
        let mut pixmap = tiny_skia::Pixmap::new(60, 20).expect("pixmap");
        pixmap.fill(tiny_skia::Color::WHITE);
        SignatureImage {
            png: pixmap.encode_png().expect("png"),
            width: 60,
            height: 20,
        }
    }

    fn small_exporter() -> DocumentExporter {
        DocumentExporter::new(ExportConfig {
            scale: 0.5,
            ..ExportConfig::default()
        })
    }

    #[test]
    fn test_svg_contains_fields_and_signer() {
        let svg = DocumentExporter::with_defaults().render_to_svg(&document(), &blank_signature());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Payment Terms: [PAYMENT TERMS]"));
        assert!(svg.contains("Print Name: Grace Hopper"));
        assert!(svg.contains("Date: 2026-04-30"));
        assert!(svg.contains("Provider Date: 30/04/2026"));
        assert!(svg.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_svg_scale_factor() {
        let svg = DocumentExporter::with_defaults().render_to_svg(&document(), &blank_signature());
        assert!(svg.contains("width=\"1588\""));
        assert!(svg.contains("viewBox=\"0 0 794 "));
    }

    #[test]
    fn test_hidden_controls_not_drawn() {
        let exporter = DocumentExporter::with_defaults();
        let mut doc = document();
        assert!(exporter
            .render_to_svg(&doc, &blank_signature())
            .contains(SUBMIT_LABEL));

        doc.set_controls_visible(false);
        let svg = exporter.render_to_svg(&doc, &blank_signature());
        assert!(!svg.contains(SUBMIT_LABEL));
        assert!(!svg.contains(">Clear<"));
    }

    #[test]
    fn test_layout_order() {
        let svg = DocumentExporter::with_defaults().render_to_svg(&document(), &blank_signature());
        let at = |needle: &str| svg.find(needle).expect(needle);
        assert!(at("Master Service Agreement") < at("Payment Terms"));
        assert!(at("Payment Terms") < at("Selected Services"));
        assert!(at("Selected Services") < at("Client Signature"));
        assert!(at("Client Signature") < at("<image"));
        assert!(at("<image") < at(">Clear<"));
        assert!(at(">Clear<") < at("Print Name: Grace Hopper"));
        assert!(at("Provider Date:") < at(SUBMIT_LABEL));
    }

    #[test]
    fn test_xml_escaping() {
        let mut doc = document();
        doc.set_field_text("clientCompanyName", "Smith & <Sons>")
            .expect("known field");
        let svg = DocumentExporter::with_defaults().render_to_svg(&doc, &blank_signature());
        assert!(svg.contains("Smith &amp; &lt;Sons&gt;"));
    }

    #[test]
    fn test_rasterize_produces_png() {
        let raster = small_exporter()
            .rasterize(&document(), &blank_signature())
            .expect("rasterize");
        assert_eq!(raster.width, 397);
        assert_eq!(&raster.png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_render_produces_pdf() {
        let rendered = small_exporter()
            .render(&document(), &blank_signature())
            .expect("render");
        assert!(rendered.pdf.len() > 5);
        assert_eq!(&rendered.pdf[0..5], b"%PDF-");
    }

    #[test]
    fn test_fit_tall_image_is_centered() {
        let p = fit_to_page(100, 400, 210.0, 297.0);
        assert!((p.height - 297.0).abs() < 1e-3);
        assert!((p.width - 74.25).abs() < 1e-3);
        assert!((p.x - (210.0 - 74.25) / 2.0).abs() < 1e-3);
        assert!(p.y.abs() < f32::EPSILON);
    }

    #[test]
    fn test_fit_wide_image_fills_width() {
        let p = fit_to_page(2000, 1000, 210.0, 297.0);
        assert!((p.width - 210.0).abs() < 1e-3);
        assert!((p.height - 105.0).abs() < 1e-3);
        assert!(p.x.abs() < 1e-3);
    }
}
