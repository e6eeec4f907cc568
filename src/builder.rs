//! Document construction for invoice scenarios.
//!
//! [`DocumentBuilder`] holds page geometry and cosmetic settings and lays out one scenario per
//! render call in a fixed block order: header band, vendor, metadata, annotation, line-item
//! table, totals and footer band.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use genpdf::style::Style;
use genpdf::{Alignment, PaperSize, Size};
use log::debug;

use crate::backend::{PdfBackend, RenderBackend};
use crate::currency::format_amount;
use crate::error::RenderError;
use crate::layout::{
    mm_from_f64, mm_to_f64, Canvas, CellSpec, Column, LayoutContext, PageDecorator, PageFlow,
    PageMargins, TableLayout,
};
use crate::line_items::LineItemTable;
use crate::scenario::Scenario;

/// Title printed in the header band unless overridden.
pub const DEFAULT_TITLE: &str = "INVOICE";

/// Label in front of the declared total.
pub const TOTAL_LABEL: &str = "Total Amount";

/// Label in front of the computed subtotal.
pub const SUBTOTAL_LABEL: &str = "Subtotal";

/// Address lines printed under the vendor name unless overridden.
pub const DEFAULT_VENDOR_ADDRESS: [&str; 2] = ["123 Business Road", "City, State, 12345"];

/// Distance of the footer band from the bottom page edge.
const FOOTER_OFFSET_MM: f64 = 15.0;
const BAND_HEIGHT_MM: f64 = 10.0;
const HEADER_GAP_MM: f64 = 10.0;
const ADDRESS_LINE_MM: f64 = 5.0;
const BLOCK_GAP_MM: f64 = 10.0;
const METADATA_ROW_MM: f64 = 8.0;
const METADATA_LABEL_MM: f64 = 40.0;
const METADATA_VALUE_MM: f64 = 60.0;
const ANNOTATION_LINE_MM: f64 = 8.0;
const SMALL_GAP_MM: f64 = 5.0;
const TOTALS_ROW_MM: f64 = 10.0;

type FooterFactory = dyn Fn(usize) -> String + Send + Sync;

fn style(size: u8) -> Style {
    Style::new().with_font_size(size)
}

fn bold(size: u8) -> Style {
    let mut style = style(size);
    style.set_bold();
    style
}

fn italic(size: u8) -> Style {
    let mut style = style(size);
    style.set_italic();
    style
}

fn line_item_columns() -> TableLayout {
    TableLayout::new(vec![
        Column::new("Description", 40, Alignment::Left),
        Column::new("Quantity", 15, Alignment::Center),
        Column::new("Unit Price", 20, Alignment::Right),
        Column::new("Total", 25, Alignment::Right),
    ])
}

/// Output of a render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedInvoice {
    /// Serialized document as produced by the backend.
    pub bytes: Vec<u8>,
    /// Number of pages laid out.
    pub page_count: usize,
}

/// Default page decorator: a centered title at the top and a footer line near the bottom of
/// every page.
#[derive(Clone)]
pub struct BandDecorator {
    title: String,
    footer: Arc<FooterFactory>,
}

impl BandDecorator {
    /// Creates a decorator printing `title` in the header and `footer(page)` in the footer band.
    pub fn new<F>(title: impl Into<String>, footer: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            footer: Arc::new(footer),
        }
    }
}

impl fmt::Debug for BandDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BandDecorator")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl PageDecorator for BandDecorator {
    fn page_start(
        &mut self,
        canvas: &mut Canvas<'_>,
        ctx: &mut LayoutContext,
    ) -> Result<(), RenderError> {
        canvas.line(
            ctx,
            &self.title,
            bold(15),
            Alignment::Center,
            mm_from_f64(BAND_HEIGHT_MM),
        )?;
        ctx.advance(mm_from_f64(HEADER_GAP_MM));
        Ok(())
    }

    fn page_end(
        &mut self,
        canvas: &mut Canvas<'_>,
        ctx: &mut LayoutContext,
    ) -> Result<(), RenderError> {
        let top = ctx.page_size().height - mm_from_f64(FOOTER_OFFSET_MM);
        if top < ctx.printable_bottom() {
            return Err(RenderError::layout(format!(
                "footer band at {:.1} mm overlaps the content area ending at {:.1} mm",
                mm_to_f64(top),
                mm_to_f64(ctx.printable_bottom())
            )));
        }
        ctx.move_to_y(top);
        let text = (self.footer)(ctx.page_number());
        canvas.line(
            ctx,
            &text,
            italic(8),
            Alignment::Center,
            mm_from_f64(BAND_HEIGHT_MM),
        )
    }
}

/// Lays out invoice scenarios onto a [`RenderBackend`].
///
/// A builder is immutable while rendering and can be shared between threads; every render call
/// starts from a fresh [`LayoutContext`].
#[derive(Clone)]
pub struct DocumentBuilder {
    paper_size: Size,
    margins: PageMargins,
    title: String,
    vendor_address: Vec<String>,
    footer: Arc<FooterFactory>,
    subtotal_line: bool,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4.into(),
            margins: PageMargins::trbl(10, 10, 20, 10),
            title: DEFAULT_TITLE.to_owned(),
            vendor_address: DEFAULT_VENDOR_ADDRESS
                .iter()
                .map(|line| (*line).to_owned())
                .collect(),
            footer: Arc::new(|page| format!("Page {}", page)),
            subtotal_line: false,
        }
    }
}

impl fmt::Debug for DocumentBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentBuilder")
            .field("paper_size", &self.paper_size)
            .field("margins", &self.margins)
            .field("title", &self.title)
            .field("vendor_address", &self.vendor_address)
            .field("subtotal_line", &self.subtotal_line)
            .finish_non_exhaustive()
    }
}

impl DocumentBuilder {
    /// Creates a builder with A4 pages and the default bands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the paper size used for every page.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = paper_size.into();
        self
    }

    /// Sets the page margins. The bottom margin is where pages break.
    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the header title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the address lines printed below the vendor name.
    pub fn with_vendor_address<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vendor_address = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Configures the footer text for each one-based page number.
    pub fn with_footer<F>(mut self, footer: F) -> Self
    where
        F: Fn(usize) -> String + Send + Sync + 'static,
    {
        self.footer = Arc::new(footer);
        self
    }

    /// Prints the computed subtotal above the declared total.
    pub fn with_subtotal_line(mut self, enabled: bool) -> Self {
        self.subtotal_line = enabled;
        self
    }

    /// The decorator used by [`render`](Self::render).
    pub fn decorator(&self) -> BandDecorator {
        BandDecorator {
            title: self.title.clone(),
            footer: Arc::clone(&self.footer),
        }
    }

    /// Renders `scenario` onto `backend` with the default bands.
    pub fn render<B: RenderBackend>(
        &self,
        scenario: &Scenario,
        backend: B,
    ) -> Result<RenderedInvoice, RenderError> {
        let mut decorator = self.decorator();
        self.render_with_decorator(scenario, backend, &mut decorator)
    }

    /// Renders `scenario` onto `backend`, decorating pages with `decorator`.
    pub fn render_with_decorator<B: RenderBackend>(
        &self,
        scenario: &Scenario,
        mut backend: B,
        decorator: &mut dyn PageDecorator,
    ) -> Result<RenderedInvoice, RenderError> {
        let mut ctx = LayoutContext::new(self.paper_size, self.margins);
        let page_count = {
            let mut flow = PageFlow::new(&mut backend, decorator);
            self.lay_out(scenario, &mut flow, &mut ctx)?;
            flow.finish(&mut ctx)?
        };
        let bytes = backend.finish()?;

        debug!(
            "rendered invoice {} on {} page(s)",
            scenario.invoice_data().number(),
            page_count
        );
        Ok(RenderedInvoice { bytes, page_count })
    }

    /// Renders `scenario` to PDF bytes.
    pub fn render_pdf(&self, scenario: &Scenario) -> Result<RenderedInvoice, RenderError> {
        let title = format!("{} {}", self.title, scenario.invoice_data().number());
        self.render(scenario, PdfBackend::new(title))
    }

    /// Renders `scenario` to PDF and writes it to `path`.
    ///
    /// The document is rendered completely before anything touches the file system. The bytes are
    /// written to a temporary file next to `path` and renamed into place, so a failed call never
    /// leaves a partial document behind.
    pub fn render_to_path(
        &self,
        scenario: &Scenario,
        path: impl AsRef<Path>,
    ) -> Result<RenderedInvoice, RenderError> {
        let path = path.as_ref();
        let rendered = self.render_pdf(scenario)?;

        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file =
            tempfile::NamedTempFile::new_in(directory).map_err(|err| RenderError::io(path, err))?;
        file.write_all(&rendered.bytes)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|err| RenderError::io(path, err))?;
        file.persist(path)
            .map_err(|err| RenderError::io(path, err.error))?;

        debug!("wrote {} bytes to {}", rendered.bytes.len(), path.display());
        Ok(rendered)
    }

    fn lay_out(
        &self,
        scenario: &Scenario,
        flow: &mut PageFlow<'_>,
        ctx: &mut LayoutContext,
    ) -> Result<(), RenderError> {
        let table = LineItemTable::from_scenario(scenario);
        if !table.discrepancy().is_zero() {
            debug!(
                "invoice {}: declared total differs from line items by {}",
                scenario.invoice_data().number(),
                table.discrepancy()
            );
        }

        self.vendor_block(scenario, flow, ctx)?;
        flow.gap(ctx, mm_from_f64(BLOCK_GAP_MM));
        self.metadata_block(scenario, flow, ctx)?;
        flow.gap(ctx, mm_from_f64(BLOCK_GAP_MM));

        if let Some(annotation) = scenario.annotation_text() {
            flow.paragraph(ctx, annotation, italic(10), mm_from_f64(ANNOTATION_LINE_MM))?;
            flow.gap(ctx, mm_from_f64(SMALL_GAP_MM));
        }

        let columns = line_item_columns();
        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| {
                vec![
                    row.description.clone(),
                    row.quantity.to_string(),
                    row.unit_price_display.clone(),
                    row.line_total_display.clone(),
                ]
            })
            .collect();
        flow.table(ctx, &columns, &rows)?;
        flow.gap(ctx, mm_from_f64(SMALL_GAP_MM));

        let widths = columns.widths(ctx.content_width());
        let (amount_width, label_widths) = match widths.split_last() {
            Some((last, rest)) => (*last, rest.iter().fold(mm_from_f64(0.0), |sum, w| sum + *w)),
            None => (ctx.content_width(), mm_from_f64(0.0)),
        };
        if self.subtotal_line {
            flow.row(
                ctx,
                &[
                    CellSpec::new(label_widths, SUBTOTAL_LABEL).with_alignment(Alignment::Right),
                    CellSpec::new(amount_width, table.subtotal_display())
                        .with_alignment(Alignment::Right)
                        .bordered(),
                ],
                mm_from_f64(TOTALS_ROW_MM),
                style(10),
            )?;
        }
        let declared = format_amount(
            scenario.invoice_data().total(),
            scenario.invoice_data().currency(),
        );
        flow.row(
            ctx,
            &[
                CellSpec::new(label_widths, TOTAL_LABEL).with_alignment(Alignment::Right),
                CellSpec::new(amount_width, declared)
                    .with_alignment(Alignment::Right)
                    .bordered(),
            ],
            mm_from_f64(TOTALS_ROW_MM),
            bold(12),
        )
    }

    fn vendor_block(
        &self,
        scenario: &Scenario,
        flow: &mut PageFlow<'_>,
        ctx: &mut LayoutContext,
    ) -> Result<(), RenderError> {
        flow.line(
            ctx,
            scenario.vendor(),
            bold(12),
            Alignment::Left,
            mm_from_f64(BAND_HEIGHT_MM),
        )?;
        for line in &self.vendor_address {
            flow.line(ctx, line, style(10), Alignment::Left, mm_from_f64(ADDRESS_LINE_MM))?;
        }
        Ok(())
    }

    fn metadata_block(
        &self,
        scenario: &Scenario,
        flow: &mut PageFlow<'_>,
        ctx: &mut LayoutContext,
    ) -> Result<(), RenderError> {
        let mut entries = vec![
            ("Invoice #:", scenario.invoice_data().number()),
            ("PO Reference:", scenario.po_reference_display()),
        ];
        if let Some(date) = scenario.date_line() {
            entries.push(("Date:", date));
        }

        for (label, value) in entries {
            flow.row(
                ctx,
                &[
                    CellSpec::new(mm_from_f64(METADATA_LABEL_MM), label).with_style(bold(10)),
                    CellSpec::new(mm_from_f64(METADATA_VALUE_MM), value),
                ],
                mm_from_f64(METADATA_ROW_MM),
                style(10),
            )?;
        }
        Ok(())
    }
}
