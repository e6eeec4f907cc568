//! Page layout on top of a [`RenderBackend`].
//!
//! All placement state lives in an explicit [`LayoutContext`] that callers thread through every
//! call: the cursor, the page geometry and the current page number. [`Canvas`] turns cell specs
//! into absolutely positioned [`Cell`]s, and [`PageFlow`] adds page breaking on top, invoking a
//! [`PageDecorator`] whenever a page is opened or closed.

use genpdf::style::{Color, Style};
use genpdf::{Alignment, Mm, Position, Size};
use log::debug;

use crate::backend::{Cell, RenderBackend, CELL_PADDING_MM};
use crate::error::RenderError;
use crate::fonts;

const EPSILON_MM: f64 = 1e-6;

/// Converts a raw millimetre value into the layout unit.
pub fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Converts a layout length back into raw millimetres.
pub fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Distances between the page edges and the content area.
///
/// The bottom edge is the page-break threshold; the footer band lives inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageMargins {
    /// Top edge to the first header line.
    pub top: Mm,
    /// Right edge to the end of every row.
    pub right: Mm,
    /// Bottom edge to the lowest point content may reach.
    pub bottom: Mm,
    /// Left edge to the start of every row.
    pub left: Mm,
}

impl PageMargins {
    /// Creates margins from top, right, bottom and left values.
    pub fn trbl(
        top: impl Into<Mm>,
        right: impl Into<Mm>,
        bottom: impl Into<Mm>,
        left: impl Into<Mm>,
    ) -> Self {
        Self {
            top: top.into(),
            right: right.into(),
            bottom: bottom.into(),
            left: left.into(),
        }
    }
}

/// Cursor and geometry of the page currently being filled.
///
/// The origin is the top-left page corner; `y` grows downwards.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext {
    page_size: Size,
    margins: PageMargins,
    cursor: Position,
    page_number: usize,
    content_top: Mm,
}

impl LayoutContext {
    /// Creates a context for pages of `page_size` with the given margins. No page is open yet.
    pub fn new(page_size: Size, margins: PageMargins) -> Self {
        Self {
            page_size,
            margins,
            cursor: Position::new(margins.left, margins.top),
            page_number: 0,
            content_top: margins.top,
        }
    }

    /// Page dimensions.
    pub fn page_size(&self) -> Size {
        self.page_size
    }

    /// Page margins; the bottom margin is the page-break threshold.
    pub fn margins(&self) -> PageMargins {
        self.margins
    }

    /// Current placement position.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// One-based number of the open page, 0 before the first page.
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Left edge of the content area.
    pub fn content_left(&self) -> Mm {
        self.margins.left
    }

    /// Width between the left and right margins.
    pub fn content_width(&self) -> Mm {
        self.page_size.width - self.margins.left - self.margins.right
    }

    /// Lowest y coordinate content may reach before a page break.
    pub fn printable_bottom(&self) -> Mm {
        self.page_size.height - self.margins.bottom
    }

    /// Height left between the cursor and the printable bottom.
    pub fn remaining_height(&self) -> Mm {
        self.printable_bottom() - self.cursor.y
    }

    /// Whether a block of `height` fits below the cursor on this page.
    pub fn fits(&self, height: Mm) -> bool {
        mm_to_f64(self.cursor.y + height) <= mm_to_f64(self.printable_bottom()) + EPSILON_MM
    }

    /// Whether nothing but page decoration has been placed on this page.
    pub fn at_content_top(&self) -> bool {
        mm_to_f64(self.cursor.y) <= mm_to_f64(self.content_top) + EPSILON_MM
    }

    /// Moves down by `dy` and returns to the left margin.
    pub fn advance(&mut self, dy: Mm) {
        self.cursor.y += dy;
        self.cursor.x = self.margins.left;
    }

    /// Jumps to an absolute vertical position at the left margin. Meant for page decoration.
    pub fn move_to_y(&mut self, y: Mm) {
        self.cursor = Position::new(self.margins.left, y);
    }

    fn start_page(&mut self) {
        self.page_number += 1;
        self.cursor = Position::new(self.margins.left, self.margins.top);
        self.content_top = self.margins.top;
    }

    fn mark_content_top(&mut self) {
        self.content_top = self.cursor.y;
    }
}

/// Width, text and decoration of one cell in a row.
#[derive(Clone, Debug)]
pub struct CellSpec {
    width: Mm,
    text: String,
    alignment: Alignment,
    border: bool,
    fill: Option<Color>,
    style: Option<Style>,
}

impl CellSpec {
    /// Creates an unbordered, left-aligned cell spec.
    pub fn new(width: Mm, text: impl Into<String>) -> Self {
        Self {
            width,
            text: text.into(),
            alignment: Alignment::Left,
            border: false,
            fill: None,
            style: None,
        }
    }

    /// Sets the alignment and returns the updated spec.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Enables the border and returns the updated spec.
    pub fn bordered(mut self) -> Self {
        self.border = true;
        self
    }

    /// Sets a background fill and returns the updated spec.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Overrides the row style for this cell and returns the updated spec.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

/// Places cells at the context cursor. Performs no page breaking.
pub struct Canvas<'a> {
    backend: &'a mut dyn RenderBackend,
}

impl<'a> Canvas<'a> {
    /// Wraps a backend.
    pub fn new(backend: &'a mut dyn RenderBackend) -> Self {
        Self { backend }
    }

    fn begin_page(&mut self, ctx: &mut LayoutContext) -> Result<(), RenderError> {
        ctx.start_page();
        self.backend.begin_page(ctx.page_size())
    }

    /// Draws `cells` left to right from the cursor, then moves down by `height`.
    ///
    /// Cells without their own style use `style`. Text the built-in fonts cannot encode is
    /// substituted before it reaches the backend.
    pub fn row(
        &mut self,
        ctx: &mut LayoutContext,
        cells: &[CellSpec],
        height: Mm,
        style: Style,
    ) -> Result<(), RenderError> {
        let mut x = ctx.cursor().x;
        let y = ctx.cursor().y;
        for spec in cells {
            let cell = Cell::new(
                Position::new(x, y),
                Size::new(spec.width, height),
                fonts::encodable_text(&spec.text).into_owned(),
                spec.style.unwrap_or(style),
            )
            .with_alignment(spec.alignment)
            .with_border(spec.border)
            .with_fill(spec.fill);
            self.backend.draw_cell(&cell)?;
            x += spec.width;
        }
        ctx.advance(height);
        Ok(())
    }

    /// Draws a single full-width line of text.
    pub fn line(
        &mut self,
        ctx: &mut LayoutContext,
        text: &str,
        style: Style,
        alignment: Alignment,
        height: Mm,
    ) -> Result<(), RenderError> {
        let spec = CellSpec::new(ctx.content_width(), text).with_alignment(alignment);
        self.row(ctx, &[spec], height, style)
    }
}

/// Page lifecycle hooks used to draw repeating bands such as headers and footers.
pub trait PageDecorator {
    /// Called right after a page is opened, with the cursor at the top margin.
    fn page_start(
        &mut self,
        canvas: &mut Canvas<'_>,
        ctx: &mut LayoutContext,
    ) -> Result<(), RenderError>;

    /// Called before the page is left, either for a page break or at the end of the document.
    fn page_end(&mut self, canvas: &mut Canvas<'_>, ctx: &mut LayoutContext)
        -> Result<(), RenderError>;
}

/// A table column: header text, relative width and body alignment.
#[derive(Clone, Debug)]
pub struct Column {
    title: String,
    weight: usize,
    alignment: Alignment,
}

impl Column {
    /// Creates a column taking `weight` parts of the table width.
    pub fn new(title: impl Into<String>, weight: usize, alignment: Alignment) -> Self {
        Self {
            title: title.into(),
            weight,
            alignment,
        }
    }
}

/// Column layout and styling of a bordered table with a shaded header row.
#[derive(Clone, Debug)]
pub struct TableLayout {
    columns: Vec<Column>,
    row_height: Mm,
    header_style: Style,
    body_style: Style,
    header_fill: Color,
}

impl TableLayout {
    /// Creates a table layout with 10 mm rows, a bold 10 pt header and a regular 10 pt body.
    pub fn new(columns: Vec<Column>) -> Self {
        let body_style = Style::new().with_font_size(10);
        let mut header_style = body_style;
        header_style.set_bold();
        Self {
            columns,
            row_height: mm_from_f64(10.0),
            header_style,
            body_style,
            header_fill: Color::Rgb(230, 230, 230),
        }
    }

    /// Column widths for a table spanning `total`. The last column absorbs rounding.
    pub fn widths(&self, total: Mm) -> Vec<Mm> {
        let weights: usize = self.columns.iter().map(|column| column.weight).sum();
        if weights == 0 {
            return vec![mm_from_f64(0.0); self.columns.len()];
        }

        let total = mm_to_f64(total);
        let mut used = 0.0;
        let last = self.columns.len().saturating_sub(1);
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let width = if idx == last {
                    total - used
                } else {
                    total * column.weight as f64 / weights as f64
                };
                used += width;
                mm_from_f64(width)
            })
            .collect()
    }

    fn header_cells(&self, widths: &[Mm]) -> Vec<CellSpec> {
        self.columns
            .iter()
            .zip(widths)
            .map(|(column, width)| {
                CellSpec::new(*width, column.title.clone())
                    .with_alignment(Alignment::Center)
                    .bordered()
                    .with_fill(self.header_fill)
            })
            .collect()
    }

    fn body_cells(&self, widths: &[Mm], row: &[String]) -> Vec<CellSpec> {
        debug_assert_eq!(row.len(), self.columns.len());
        self.columns
            .iter()
            .zip(widths)
            .zip(row)
            .map(|((column, width), text)| {
                CellSpec::new(*width, text.clone())
                    .with_alignment(column.alignment)
                    .bordered()
            })
            .collect()
    }
}

/// Breaks `text` into lines no wider than `max_width` in `style`.
///
/// Explicit newlines start a new line; words wider than a whole line are split between
/// characters. Runs of whitespace collapse to a single space.
pub fn wrap_text(text: &str, style: &Style, max_width: Mm) -> Vec<String> {
    let limit = mm_to_f64(max_width) + EPSILON_MM;
    let fits = |candidate: &str| mm_to_f64(fonts::text_width(candidate, style)) <= limit;
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{} {}", current, word)
            };
            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            for ch in word.chars() {
                current.push(ch);
                if !fits(&current) && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        lines.push(current);
    }

    while lines.last().map_or(false, |line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Layout engine: places content in reading order and breaks pages when it runs out of room.
pub struct PageFlow<'a> {
    canvas: Canvas<'a>,
    decorator: &'a mut dyn PageDecorator,
    page_open: bool,
}

impl<'a> PageFlow<'a> {
    /// Creates a flow drawing onto `backend` and decorating pages with `decorator`.
    pub fn new(backend: &'a mut dyn RenderBackend, decorator: &'a mut dyn PageDecorator) -> Self {
        Self {
            canvas: Canvas::new(backend),
            decorator,
            page_open: false,
        }
    }

    /// Opens a new page and runs the decorator's start hook.
    pub fn open_page(&mut self, ctx: &mut LayoutContext) -> Result<(), RenderError> {
        self.canvas.begin_page(ctx)?;
        self.page_open = true;
        self.decorator.page_start(&mut self.canvas, ctx)?;
        ctx.mark_content_top();
        debug!(
            "opened page {} with {:.1} mm of content height",
            ctx.page_number(),
            mm_to_f64(ctx.remaining_height())
        );
        Ok(())
    }

    /// Runs the decorator's end hook on the open page, if any.
    pub fn close_page(&mut self, ctx: &mut LayoutContext) -> Result<(), RenderError> {
        if !self.page_open {
            return Ok(());
        }
        self.page_open = false;
        self.decorator.page_end(&mut self.canvas, ctx)
    }

    /// Makes sure a block of `height` fits, breaking the page if needed.
    ///
    /// Returns whether a new page was started. Fails if the block cannot fit even on an empty page.
    pub fn ensure_space(
        &mut self,
        ctx: &mut LayoutContext,
        height: Mm,
    ) -> Result<bool, RenderError> {
        if !self.page_open {
            self.open_page(ctx)?;
        }
        if ctx.fits(height) {
            return Ok(false);
        }
        if !ctx.at_content_top() {
            debug!(
                "page {} full at y={:.1} mm, breaking",
                ctx.page_number(),
                mm_to_f64(ctx.cursor().y)
            );
            self.close_page(ctx)?;
            self.open_page(ctx)?;
            if ctx.fits(height) {
                return Ok(true);
            }
        }
        Err(RenderError::layout(format!(
            "a block of {:.1} mm does not fit on an empty page ({:.1} mm available)",
            mm_to_f64(height),
            mm_to_f64(ctx.remaining_height())
        )))
    }

    /// Adds vertical space without drawing.
    pub fn gap(&mut self, ctx: &mut LayoutContext, height: Mm) {
        ctx.advance(height);
    }

    /// Places a row of cells, breaking the page first if it does not fit.
    pub fn row(
        &mut self,
        ctx: &mut LayoutContext,
        cells: &[CellSpec],
        height: Mm,
        style: Style,
    ) -> Result<(), RenderError> {
        self.ensure_space(ctx, height)?;
        self.canvas.row(ctx, cells, height, style)
    }

    /// Places one full-width line of text.
    pub fn line(
        &mut self,
        ctx: &mut LayoutContext,
        text: &str,
        style: Style,
        alignment: Alignment,
        height: Mm,
    ) -> Result<(), RenderError> {
        self.ensure_space(ctx, height)?;
        self.canvas.line(ctx, text, style, alignment, height)
    }

    /// Places wrapped free text, one `line_height` per line.
    pub fn paragraph(
        &mut self,
        ctx: &mut LayoutContext,
        text: &str,
        style: Style,
        line_height: Mm,
    ) -> Result<(), RenderError> {
        let padding = mm_from_f64(2.0 * CELL_PADDING_MM);
        for line in wrap_text(text, &style, ctx.content_width() - padding) {
            self.line(ctx, &line, style, Alignment::Left, line_height)?;
        }
        Ok(())
    }

    /// Places a table, repeating the header row at the top of every continuation page.
    ///
    /// The header is never left alone at the bottom of a page.
    pub fn table(
        &mut self,
        ctx: &mut LayoutContext,
        layout: &TableLayout,
        rows: &[Vec<String>],
    ) -> Result<(), RenderError> {
        let widths = layout.widths(ctx.content_width());
        let header = layout.header_cells(&widths);
        let row_height = layout.row_height;

        let leading = if rows.is_empty() {
            row_height
        } else {
            row_height + row_height
        };
        self.ensure_space(ctx, leading)?;
        self.canvas.row(ctx, &header, row_height, layout.header_style)?;

        for row in rows {
            if self.ensure_space(ctx, row_height)? {
                debug!("table continues on page {}", ctx.page_number());
                self.ensure_space(ctx, row_height + row_height)?;
                self.canvas.row(ctx, &header, row_height, layout.header_style)?;
            }
            let cells = layout.body_cells(&widths, row);
            self.canvas.row(ctx, &cells, row_height, layout.body_style)?;
        }
        Ok(())
    }

    /// Closes the last page and returns the number of pages produced.
    pub fn finish(mut self, ctx: &mut LayoutContext) -> Result<usize, RenderError> {
        if !self.page_open && ctx.page_number() == 0 {
            self.open_page(ctx)?;
        }
        self.close_page(ctx)?;
        Ok(ctx.page_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use genpdf::PaperSize;

    struct Bands;

    impl PageDecorator for Bands {
        fn page_start(
            &mut self,
            canvas: &mut Canvas<'_>,
            ctx: &mut LayoutContext,
        ) -> Result<(), RenderError> {
            canvas.line(ctx, "HEAD", Style::new(), Alignment::Center, mm_from_f64(10.0))
        }

        fn page_end(
            &mut self,
            canvas: &mut Canvas<'_>,
            ctx: &mut LayoutContext,
        ) -> Result<(), RenderError> {
            let y = ctx.page_size().height - mm_from_f64(15.0);
            ctx.move_to_y(y);
            let label = format!("Page {}", ctx.page_number());
            canvas.line(ctx, &label, Style::new(), Alignment::Center, mm_from_f64(10.0))
        }
    }

    fn a4_context() -> LayoutContext {
        LayoutContext::new(PaperSize::A4.into(), PageMargins::trbl(10, 10, 20, 10))
    }

    fn columns() -> TableLayout {
        TableLayout::new(vec![
            Column::new("Description", 40, Alignment::Left),
            Column::new("Quantity", 15, Alignment::Center),
            Column::new("Unit Price", 20, Alignment::Right),
            Column::new("Total", 25, Alignment::Right),
        ])
    }

    #[test]
    fn context_geometry() {
        let mut ctx = a4_context();
        assert!((mm_to_f64(ctx.content_width()) - 190.0).abs() < 1e-9);
        assert!((mm_to_f64(ctx.printable_bottom()) - 277.0).abs() < 1e-9);
        ctx.start_page();
        ctx.advance(mm_from_f64(267.0));
        assert!(ctx.fits(mm_from_f64(0.0)));
        assert!(!ctx.fits(mm_from_f64(0.5)));
    }

    #[test]
    fn widths_follow_weights_and_fill_content() {
        let widths = columns().widths(mm_from_f64(190.0));
        let raw: Vec<f64> = widths.iter().map(|w| mm_to_f64(*w)).collect();
        assert!((raw[0] - 76.0).abs() < 1e-9);
        assert!((raw[1] - 28.5).abs() < 1e-9);
        assert!((raw[2] - 38.0).abs() < 1e-9);
        assert!((raw.iter().sum::<f64>() - 190.0).abs() < 1e-9);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let style = Style::new().with_font_size(10);
        let text = "The quick brown fox jumps over the lazy dog";
        let lines = wrap_text(text, &style, mm_from_f64(30.0));
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), text);
        for line in &lines {
            assert!(mm_to_f64(fonts::text_width(line, &style)) <= 30.0 + 1e-6);
        }
    }

    #[test]
    fn splits_overlong_words_and_keeps_newlines() {
        let style = Style::new().with_font_size(10);
        let lines = wrap_text("AAAAAAAAAAAAAAAAAAAA\nok", &style, mm_from_f64(10.0));
        assert!(lines.len() > 2);
        assert_eq!(lines.last().map(String::as_str), Some("ok"));
        assert_eq!(lines[..lines.len() - 1].concat(), "AAAAAAAAAAAAAAAAAAAA");
    }

    #[test]
    fn table_repeats_header_after_page_break() {
        let mut backend = RecordingBackend::new();
        let mut bands = Bands;
        let mut ctx = a4_context();
        let rows: Vec<Vec<String>> = (0..40)
            .map(|i| vec![format!("item {}", i), "1".into(), "$1.00".into(), "$1.00".into()])
            .collect();

        let mut flow = PageFlow::new(&mut backend, &mut bands);
        flow.table(&mut ctx, &columns(), &rows).expect("table fits on pages");
        let pages = flow.finish(&mut ctx).expect("closes");

        assert_eq!(pages, 2);
        let second = backend.lines_on_page(2);
        assert_eq!(second[0], ["HEAD"]);
        assert_eq!(second[1], ["Description", "Quantity", "Unit Price", "Total"]);
        assert_eq!(second.last().unwrap(), &["Page 2"]);
        let body_rows = backend
            .texts()
            .iter()
            .filter(|text| text.starts_with("item "))
            .count();
        assert_eq!(body_rows, 40);
    }

    #[test]
    fn oversized_block_is_a_layout_error() {
        let mut backend = RecordingBackend::new();
        let mut bands = Bands;
        let mut ctx = a4_context();
        let mut flow = PageFlow::new(&mut backend, &mut bands);
        let err = flow
            .line(&mut ctx, "tall", Style::new(), Alignment::Left, mm_from_f64(400.0))
            .unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)));
    }

    #[test]
    fn finish_without_content_still_emits_a_page() {
        let mut backend = RecordingBackend::new();
        let mut bands = Bands;
        let mut ctx = a4_context();
        let flow = PageFlow::new(&mut backend, &mut bands);
        assert_eq!(flow.finish(&mut ctx).unwrap(), 1);
        assert_eq!(backend.lines_on_page(1), vec![vec!["HEAD"], vec!["Page 1"]]);
    }
}
