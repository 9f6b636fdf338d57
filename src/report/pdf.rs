use printpdf::image::RawImage;
use printpdf::ops::Op;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{
    BuiltinFont, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, TextItem, TextMatrix,
    XObjectId,
};

use crate::error::ExportError;

// ---------------------------------------------------------------------------
// PDF document builders
// ---------------------------------------------------------------------------

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_MM: f32 = 10.0;
/// Charts span the printable width, left-aligned at the margin.
const IMAGE_WIDTH_MM: f32 = 190.0;
const FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT_PT: f32 = 18.0;
/// Word-wrap width for 12 pt Helvetica across the printable area.
const WRAP_COLUMNS: usize = 90;

const SUMMARY_HEADING: &str = "Relay Fault Summary:";

/// One successfully rasterized chart, tagged with its 0-based chart index
/// so pages keep the original chart order even when some charts failed.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub chart_index: usize,
    pub png: Vec<u8>,
}

/// One page per chart image, in chart-index order. Charts whose
/// rasterization failed are simply absent.
pub fn charts_pdf(images: &[ChartImage]) -> Result<Vec<u8>, ExportError> {
    let mut doc = PdfDocument::new("Charts");
    for image in images {
        let page = image_page(&mut doc, image)?;
        doc.pages.push(page);
    }
    Ok(finish(doc))
}

/// A single page: fixed heading, then one paragraph per conclusion in
/// chart-index order, prefixed with the 1-based chart index.
pub fn conclusions_pdf(conclusions: &[(usize, String)]) -> Result<Vec<u8>, ExportError> {
    let mut doc = PdfDocument::new("Conclusions");
    doc.pages.push(summary_page(conclusions));
    Ok(finish(doc))
}

/// Chart pages followed by the conclusions page.
pub fn full_report_pdf(
    images: &[ChartImage],
    conclusions: &[(usize, String)],
) -> Result<Vec<u8>, ExportError> {
    let mut doc = PdfDocument::new("Full Report");
    for image in images {
        let page = image_page(&mut doc, image)?;
        doc.pages.push(page);
    }
    doc.pages.push(summary_page(conclusions));
    Ok(finish(doc))
}

fn finish(doc: PdfDocument) -> Vec<u8> {
    let mut warnings = Vec::new();
    doc.save(&PdfSaveOptions::default(), &mut warnings)
}

// ---------------------------------------------------------------------------
// Page assembly
// ---------------------------------------------------------------------------

fn image_page(doc: &mut PdfDocument, image: &ChartImage) -> Result<PdfPage, ExportError> {
    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(&image.png, &mut warnings).map_err(|e| {
        ExportError::Pdf(format!(
            "failed to decode chart {} image: {e}",
            image.chart_index + 1
        ))
    })?;
    let (img_w, img_h) = (raw.width as f32, raw.height as f32);

    let xobj_id = XObjectId::new();
    doc.resources
        .xobjects
        .map
        .insert(xobj_id.clone(), XObject::Image(raw));

    let page_h_pt = PAGE_HEIGHT.into_pt().0;
    let x_pt = Mm(MARGIN_MM).into_pt().0;
    let w_pt = Mm(IMAGE_WIDTH_MM).into_pt().0;
    let h_pt = w_pt * img_h / img_w;
    let y_pt = page_h_pt - Mm(MARGIN_MM).into_pt().0 - h_pt;

    let transform = XObjectTransform {
        translate_x: Some(Pt(x_pt)),
        translate_y: Some(Pt(y_pt)),
        scale_x: Some(w_pt / img_w),
        scale_y: Some(h_pt / img_h),
        rotate: None,
        dpi: Some(72.0),
    };

    let ops = vec![Op::UseXobject {
        id: xobj_id,
        transform,
    }];
    Ok(PdfPage::new(PAGE_WIDTH, PAGE_HEIGHT, ops))
}

fn summary_page(conclusions: &[(usize, String)]) -> PdfPage {
    let page_h_pt = PAGE_HEIGHT.into_pt().0;
    let x_pt = Mm(MARGIN_MM).into_pt().0;
    let mut cursor_y = page_h_pt - Mm(MARGIN_MM).into_pt().0 - FONT_SIZE;

    let mut ops = vec![
        Op::StartTextSection,
        Op::SetFillColor {
            col: printpdf::color::Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(FONT_SIZE),
            font: BuiltinFont::Helvetica,
        },
    ];

    write_line(&mut ops, x_pt, cursor_y, SUMMARY_HEADING.to_string());
    cursor_y -= LINE_HEIGHT_PT;

    for (chart_index, text) in conclusions {
        let paragraph = sanitize_latin1(&format!("Chart {}: {}", chart_index + 1, text));
        for line in wrap_text(&paragraph, WRAP_COLUMNS) {
            write_line(&mut ops, x_pt, cursor_y, line);
            cursor_y -= LINE_HEIGHT_PT;
        }
    }

    ops.push(Op::EndTextSection);
    PdfPage::new(PAGE_WIDTH, PAGE_HEIGHT, ops)
}

fn write_line(ops: &mut Vec<Op>, x: f32, y: f32, text: String) {
    ops.push(Op::SetTextMatrix {
        matrix: TextMatrix::Translate(Pt(x), Pt(y)),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text)],
        font: BuiltinFont::Helvetica,
    });
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Substitute characters outside Latin-1 instead of failing: the built-in
/// PDF fonts cannot encode them.
pub(crate) fn sanitize_latin1(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 256 { c } else { '?' })
        .collect()
}

/// Greedy word wrap at `max` columns. Words longer than a line stand alone.
fn wrap_text(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
