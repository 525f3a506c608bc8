use std::io::BufWriter;

use printpdf::{BuiltinFont, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::blocks::Block;
use super::ReportError;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 20.0;
const TOP_Y: f32 = 280.0;
/// Second table column x position.
const VALUE_X: f32 = 70.0;

/// Render an ordered block list to A4 PDF bytes. Walks a y cursor down the
/// page and breaks to a fresh page when a block would cross the bottom
/// margin.
pub fn render_blocks(title: &str, blocks: &[Block]) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Font(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Font(e.to_string()))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = Mm(TOP_Y);

    for block in blocks {
        match block {
            Block::Title(text) => {
                ensure_room(&doc, &mut layer, &mut y, 12.0);
                layer.use_text(text, 18.0, Mm(MARGIN_LEFT), y, &bold);
                y -= Mm(12.0);
            }
            Block::Heading(text) => {
                ensure_room(&doc, &mut layer, &mut y, 8.0);
                layer.use_text(text, 13.0, Mm(MARGIN_LEFT), y, &bold);
                y -= Mm(8.0);
            }
            Block::Table(rows) => {
                for (key, value) in rows {
                    let lines = wrap_text(value, 70);
                    ensure_room(&doc, &mut layer, &mut y, 5.5 * lines.len() as f32);
                    layer.use_text(key, 10.0, Mm(MARGIN_LEFT), y, &bold);
                    for line in lines {
                        layer.use_text(&line, 10.0, Mm(VALUE_X), y, &font);
                        y -= Mm(5.5);
                    }
                }
            }
            Block::Paragraph(text) => {
                for line in wrap_text(text, 90) {
                    ensure_room(&doc, &mut layer, &mut y, 5.0);
                    layer.use_text(&line, 10.0, Mm(MARGIN_LEFT), y, &font);
                    y -= Mm(5.0);
                }
                y -= Mm(4.0);
            }
            Block::Footer(text) => {
                for line in wrap_text(text, 100) {
                    ensure_room(&doc, &mut layer, &mut y, 3.5);
                    layer.use_text(&line, 8.0, Mm(MARGIN_LEFT), y, &font);
                    y -= Mm(3.5);
                }
            }
            Block::Spacer(mm) => {
                y -= Mm(*mm);
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Write(e.to_string()))?;
    buf.into_inner()
        .map_err(|e| ReportError::Write(e.to_string()))
}

/// Start a new page when fewer than `needed` millimetres remain above the
/// bottom margin.
fn ensure_room(
    doc: &PdfDocumentReference,
    layer: &mut PdfLayerReference,
    y: &mut Mm,
    needed: f32,
) {
    if y.0 - needed < MARGIN_BOTTOM {
        let (page, new_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        *layer = doc.get_page(page).get_layer(new_layer);
        *y = Mm(TOP_Y);
    }
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
