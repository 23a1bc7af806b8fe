//! Document engines: turn a [`PrintDocument`] into document bytes.
//!
//! `AppState` holds an `Arc<dyn DocumentEngine>`; the default is [`PdfEngine`].

use async_trait::async_trait;
use bytes::Bytes;
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb,
};
use thiserror::Error;
use tracing::debug;

use crate::layout::font_metrics::FontWeight;
use crate::layout::print::{PrintDocument, PrintNode};
use crate::templates::Color;

const LAYER_NAME: &str = "Layer 1";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("render task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A document-generation backend. Implementations either return the whole
/// artifact or an error; there is no partial output.
#[async_trait]
pub trait DocumentEngine: Send + Sync {
    async fn render(&self, document: &PrintDocument) -> Result<Bytes, EngineError>;

    fn content_type(&self) -> &'static str;
}

/// Renders with `printpdf` using the built-in Helvetica faces.
#[derive(Debug, Clone, Default)]
pub struct PdfEngine;

#[async_trait]
impl DocumentEngine for PdfEngine {
    async fn render(&self, document: &PrintDocument) -> Result<Bytes, EngineError> {
        // PDF assembly is CPU-bound; keep it off the async workers.
        let document = document.clone();
        let bytes = tokio::task::spawn_blocking(move || draw(&document)).await??;
        debug!(bytes = bytes.len(), "PDF rendered");
        Ok(Bytes::from(bytes))
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}

fn draw(document: &PrintDocument) -> Result<Vec<u8>, EngineError> {
    let page_height = document.page.height_pt;
    let width = mm(document.page.width_pt);
    let height = mm(page_height);

    let (doc, first_page, first_layer) =
        PdfDocument::new(document.title.as_str(), width, height, LAYER_NAME);
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| EngineError::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| EngineError::Render(e.to_string()))?;

    for (index, page) in document.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };

        for node in page.sections.iter().flat_map(|s| &s.nodes) {
            draw_node(&layer, node, page_height, &regular, &bold);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| EngineError::Render(e.to_string()))
}

/// Print coordinates are top-left based; PDF user space is bottom-left.
fn draw_node(
    layer: &PdfLayerReference,
    node: &PrintNode,
    page_height: f32,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    match node {
        PrintNode::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            layer.set_fill_color(pdf_color(*fill));
            layer.add_rect(Rect::new(
                mm(*x),
                mm(page_height - (y + height)),
                mm(x + width),
                mm(page_height - y),
            ));
        }
        PrintNode::Text {
            x,
            y,
            text,
            size_pt,
            weight,
            color,
        } => {
            let font = match weight {
                FontWeight::Regular => regular,
                FontWeight::Bold => bold,
            };
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size_pt, mm(*x), mm(page_height - y), font);
        }
    }
}

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn pdf_color(color: Color) -> PdfColor {
    let (r, g, b) = color.unit_rgb();
    PdfColor::Rgb(Rgb::new(r, g, b, None))
}
