//! PDF surface backed by `printpdf` and the standard Helvetica fonts.

use std::io::{BufWriter, Cursor};

use genpdf::style::{Color, Style};
use genpdf::{Mm, Size};
use log::debug;
use printpdf::indices::{PdfLayerIndex, PdfPageIndex};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point, Rgb,
};

use super::{Cell, RenderBackend};
use crate::error::RenderError;
use crate::fonts;
use crate::layout::mm_to_f64;

const LAYER_NAME: &str = "Layer 1";
const BORDER_THICKNESS_PT: f64 = 0.57;
const TEXT_COLOR: Color = Color::Rgb(0, 0, 0);

struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    bold_italic: IndirectFontRef,
}

impl FontSet {
    fn load(document: &PdfDocumentReference) -> Result<Self, RenderError> {
        let load = |font: BuiltinFont| {
            document
                .add_builtin_font(font)
                .map_err(|err| RenderError::backend(format!("failed to add built-in font: {}", err)))
        };
        Ok(Self {
            regular: load(BuiltinFont::Helvetica)?,
            bold: load(BuiltinFont::HelveticaBold)?,
            italic: load(BuiltinFont::HelveticaOblique)?,
            bold_italic: load(BuiltinFont::HelveticaBoldOblique)?,
        })
    }

    fn for_style(&self, style: &Style) -> &IndirectFontRef {
        match fonts::builtin_font(style) {
            BuiltinFont::HelveticaBold => &self.bold,
            BuiltinFont::HelveticaOblique => &self.italic,
            BuiltinFont::HelveticaBoldOblique => &self.bold_italic,
            _ => &self.regular,
        }
    }
}

struct OpenDocument {
    document: PdfDocumentReference,
    fonts: FontSet,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    page_height: Mm,
}

impl OpenDocument {
    fn layer(&self) -> PdfLayerReference {
        self.document.get_page(self.page).get_layer(self.layer)
    }
}

/// Renders cells into a PDF document using the built-in Helvetica family.
pub struct PdfBackend {
    title: String,
    open: Option<OpenDocument>,
}

impl PdfBackend {
    /// Creates a backend whose document carries `title` in its metadata.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            open: None,
        }
    }

    fn current(&self) -> Result<&OpenDocument, RenderError> {
        self.open
            .as_ref()
            .ok_or_else(|| RenderError::backend("no page has been started"))
    }
}

fn pdf_mm(value: Mm) -> printpdf::Mm {
    value.into()
}

fn pdf_color(color: Color) -> printpdf::Color {
    let rgb = |r: u8, g: u8, b: u8| {
        printpdf::Color::Rgb(Rgb::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            None,
        ))
    };
    match color {
        Color::Rgb(r, g, b) => rgb(r, g, b),
        Color::Greyscale(v) => rgb(v, v, v),
        Color::Cmyk(c, m, y, k) => {
            let channel = |x: u8| 255.0 * (1.0 - f64::from(x) / 255.0) * (1.0 - f64::from(k) / 255.0);
            rgb(
                channel(c).round() as u8,
                channel(m).round() as u8,
                channel(y).round() as u8,
            )
        }
    }
}

fn rectangle(cell: &Cell, page_height: Mm, fill: bool) -> Line {
    let left = pdf_mm(cell.origin.x);
    let right = pdf_mm(cell.origin.x + cell.size.width);
    let top = pdf_mm(page_height - cell.origin.y);
    let bottom = pdf_mm(page_height - cell.origin.y - cell.size.height);

    Line {
        points: vec![
            (Point::new(left, top), false),
            (Point::new(right, top), false),
            (Point::new(right, bottom), false),
            (Point::new(left, bottom), false),
        ],
        is_closed: true,
        has_fill: fill,
        has_stroke: !fill,
        is_clipping_path: false,
    }
}

impl RenderBackend for PdfBackend {
    fn begin_page(&mut self, size: Size) -> Result<(), RenderError> {
        let width = pdf_mm(size.width);
        let height = pdf_mm(size.height);

        match self.open.as_mut() {
            Some(open) => {
                let (page, layer) = open.document.add_page(width, height, LAYER_NAME);
                open.page = page;
                open.layer = layer;
                open.page_height = size.height;
            }
            None => {
                let (document, page, layer) =
                    PdfDocument::new(self.title.as_str(), width, height, LAYER_NAME);
                let fonts = FontSet::load(&document)?;
                self.open = Some(OpenDocument {
                    document,
                    fonts,
                    page,
                    layer,
                    page_height: size.height,
                });
            }
        }
        Ok(())
    }

    fn draw_cell(&mut self, cell: &Cell) -> Result<(), RenderError> {
        let open = self.current()?;
        let layer = open.layer();

        if let Some(fill) = cell.fill {
            layer.set_fill_color(pdf_color(fill));
            layer.add_shape(rectangle(cell, open.page_height, true));
        }

        if cell.border {
            layer.set_outline_color(pdf_color(TEXT_COLOR));
            layer.set_outline_thickness(BORDER_THICKNESS_PT);
            layer.add_shape(rectangle(cell, open.page_height, false));
        }

        if cell.text.is_empty() {
            return Ok(());
        }

        let text = fonts::encodable_text(&cell.text);
        let width = fonts::text_width(&text, &cell.style);
        let x = cell.origin.x + cell.text_offset(width);
        let font_mm = fonts::font_size_mm(&cell.style);
        let baseline = mm_to_f64(cell.origin.y) + mm_to_f64(cell.size.height) / 2.0 + 0.3 * font_mm;
        let y = mm_to_f64(open.page_height) - baseline;

        layer.set_fill_color(pdf_color(cell.style.color().unwrap_or(TEXT_COLOR)));
        layer.use_text(
            text.into_owned(),
            f64::from(cell.style.font_size()),
            pdf_mm(x),
            printpdf::Mm(y),
            open.fonts.for_style(&cell.style),
        );
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        let open = self
            .open
            .take()
            .ok_or_else(|| RenderError::backend("cannot serialize a document without pages"))?;

        let mut writer = BufWriter::new(Cursor::new(Vec::new()));
        open.document
            .save(&mut writer)
            .map_err(|err| RenderError::backend(format!("failed to serialize PDF: {}", err)))?;
        let bytes = writer
            .into_inner()
            .map_err(|err| RenderError::backend(format!("failed to flush PDF buffer: {}", err)))?
            .into_inner();

        debug!("serialized PDF '{}' ({} bytes)", self.title, bytes.len());
        Ok(bytes)
    }
}
