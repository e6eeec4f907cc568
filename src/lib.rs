//! Deterministic invoice fixture rendering.
//!
//! A [`Scenario`] describes one invoice: vendor, invoice number, currency, declared total,
//! line items and an optional annotation. [`DocumentBuilder`] lays it out as a paginated
//! document and hands the drawing primitives to a [`backend::RenderBackend`], by default a PDF
//! writer. The same scenario always produces the same document apart from PDF timestamps and
//! identifiers.
//!
//! ```no_run
//! let json = r#"{
//!     "vendor": "Acme Corp",
//!     "invoiceData": { "number": "INV-1", "currency": "USD", "total": "30.00" },
//!     "primaryLineItem": { "description": "Widget", "quantity": 3, "unitPrice": "10.00" }
//! }"#;
//! invoice_fixture::render_json_to_path(json, "INV-1.pdf")?;
//! # Ok::<(), invoice_fixture::FixtureError>(())
//! ```

pub mod backend;
pub mod builder;
pub mod currency;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod line_items;
pub mod scenario;

use std::path::Path;

pub use builder::{DocumentBuilder, RenderedInvoice};
pub use error::{FixtureError, ParseError, RenderError, ValidationError};
pub use layout::PageMargins;
pub use line_items::{LineItemTable, LineRow};
pub use scenario::{InvoiceData, LineItem, Scenario, ScenarioBuilder};

/// Renders `scenario` to PDF bytes with the default document settings.
pub fn render_scenario(scenario: &Scenario) -> Result<RenderedInvoice, RenderError> {
    DocumentBuilder::new().render_pdf(scenario)
}

/// Parses a JSON scenario and writes it as a PDF to `path` with the default document settings.
pub fn render_json_to_path(
    json: &str,
    path: impl AsRef<Path>,
) -> Result<RenderedInvoice, FixtureError> {
    let scenario = Scenario::from_json_str(json)?;
    Ok(DocumentBuilder::new().render_to_path(&scenario, path)?)
}
