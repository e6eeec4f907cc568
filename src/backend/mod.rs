//! Drawing surfaces the layout engine renders onto.
//!
//! The layout engine only ever talks to a [`RenderBackend`]: it opens pages, places [`Cell`]s at
//! absolute positions and finally asks the backend for the serialized document. Positions are
//! measured in millimetres from the top-left corner of the page.

use genpdf::style::{Color, Style};
use genpdf::{Alignment, Mm, Position, Size};

use crate::error::RenderError;

mod pdf;
mod recording;

pub use pdf::PdfBackend;
pub use recording::{DrawOp, RecordingBackend};

/// Horizontal padding between a cell border and its text.
pub const CELL_PADDING_MM: f64 = 1.0;

/// A rectangular text box, the only drawing primitive the layout engine emits.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Top-left corner on the page.
    pub origin: Position,
    /// Width and height of the box.
    pub size: Size,
    /// Single line of text; may be empty for purely decorative cells.
    pub text: String,
    /// Font attributes of the text.
    pub style: Style,
    /// Horizontal alignment of the text inside the box.
    pub alignment: Alignment,
    /// Whether the four edges are stroked.
    pub border: bool,
    /// Background colour, painted before the text.
    pub fill: Option<Color>,
}

impl Cell {
    /// Creates an unbordered, unfilled, left-aligned cell.
    pub fn new(origin: Position, size: Size, text: impl Into<String>, style: Style) -> Self {
        Self {
            origin,
            size,
            text: text.into(),
            style,
            alignment: Alignment::Left,
            border: false,
            fill: None,
        }
    }

    /// Sets the alignment and returns the updated cell.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the border flag and returns the updated cell.
    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Sets the fill colour and returns the updated cell.
    pub fn with_fill(mut self, fill: Option<Color>) -> Self {
        self.fill = fill;
        self
    }

    /// Horizontal offset of the text from the cell origin for the given text width.
    pub fn text_offset(&self, text_width: Mm) -> Mm {
        let padding = crate::layout::mm_from_f64(CELL_PADDING_MM);
        match self.alignment {
            Alignment::Left => padding,
            Alignment::Center => (self.size.width - text_width) / 2.0,
            Alignment::Right => self.size.width - padding - text_width,
        }
    }
}

/// An abstract drawing surface. One instance renders exactly one document.
pub trait RenderBackend {
    /// Starts a new page of the given size; subsequent cells land on it.
    fn begin_page(&mut self, size: Size) -> Result<(), RenderError>;

    /// Paints a cell on the current page.
    fn draw_cell(&mut self, cell: &Cell) -> Result<(), RenderError>;

    /// Serializes everything drawn so far into the output artifact.
    fn finish(&mut self) -> Result<Vec<u8>, RenderError>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn begin_page(&mut self, size: Size) -> Result<(), RenderError> {
        (**self).begin_page(size)
    }

    fn draw_cell(&mut self, cell: &Cell) -> Result<(), RenderError> {
        (**self).draw_cell(cell)
    }

    fn finish(&mut self) -> Result<Vec<u8>, RenderError> {
        (**self).finish()
    }
}
