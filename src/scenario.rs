//! Typed, validated representation of one invoice scenario.
//!
//! Scenarios arrive as loosely-typed JSON documents. Every optional field is resolved to its
//! documented default exactly once, here, and every required field is checked with an error that
//! names its path. Both the camelCase keys of the fixture schema and the snake_case keys used by
//! older fixture generators are accepted.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::currency::DEFAULT_CURRENCY;
use crate::error::{FixtureError, ParseError, ValidationError};

/// Vendor name used when a scenario does not provide one.
pub const DEFAULT_VENDOR: &str = "Unknown Vendor";

/// Invoice number used when a scenario does not provide one.
pub const DEFAULT_INVOICE_NUMBER: &str = "INV-000";

/// Text rendered in place of a missing purchase-order reference.
pub const MISSING_PO_REFERENCE: &str = "N/A";

/// Annotation substring that triggers the legacy date line.
pub const LEGACY_DATE_MARKER: &str = "Date:";

/// Date printed by the legacy trigger.
pub const LEGACY_DATE_FALLBACK: &str = "2024-01-01";

/// A single billable row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    description: String,
    quantity: u32,
    unit_price: Decimal,
}

impl LineItem {
    /// Creates a line item, rejecting negative unit prices.
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, ValidationError> {
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(ValidationError::new("unitPrice", "must not be negative"));
        }
        Ok(Self {
            description: description.into(),
            quantity,
            unit_price,
        })
    }

    /// Free-text description shown in the first column.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of units billed.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one unit in the scenario currency.
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `quantity × unitPrice`, or `None` when the product leaves the decimal range.
    pub fn checked_line_total(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.unit_price)
    }
}

/// Identification and declared total of the invoice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InvoiceData {
    number: String,
    currency: String,
    total: Decimal,
}

impl Default for InvoiceData {
    fn default() -> Self {
        Self {
            number: DEFAULT_INVOICE_NUMBER.to_owned(),
            currency: DEFAULT_CURRENCY.to_owned(),
            total: Decimal::ZERO,
        }
    }
}

impl InvoiceData {
    /// Invoice number printed in the metadata block.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Upper-case currency code governing every amount on the document.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Declared total. Never reconciled with the computed subtotal.
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// One invoice record ready to be rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    vendor: String,
    invoice_data: InvoiceData,
    #[serde(skip_serializing_if = "Option::is_none")]
    po_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_line_item: Option<LineItem>,
    extra_line_items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_override: Option<String>,
}

impl Scenario {
    /// Starts a builder with every field at its default.
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::default()
    }

    /// Parses and validates a JSON payload.
    pub fn from_json_str(input: &str) -> Result<Self, FixtureError> {
        let value: Value = serde_json::from_str(input).map_err(ParseError::from)?;
        Ok(Self::from_value(&value)?)
    }

    /// Parses and validates a JSON payload given as raw bytes.
    pub fn from_json_slice(input: &[u8]) -> Result<Self, FixtureError> {
        let value: Value = serde_json::from_slice(input).map_err(ParseError::from)?;
        Ok(Self::from_value(&value)?)
    }

    /// Validates an already-parsed JSON document.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let root = value
            .as_object()
            .ok_or_else(|| ValidationError::new("$", "expected a JSON object"))?;
        log_unknown_keys(root);
        let raw: RawScenario = decode_object(value, "$")?;

        let mut builder = Scenario::builder();
        if let Some(vendor) = string_field(raw.vendor.as_ref(), "vendor")? {
            builder = builder.vendor(vendor);
        }
        if let Some(data) = &raw.invoice_data {
            builder.invoice_data = parse_invoice_data(data)?;
        }
        builder.po_reference = match string_field(raw.po_reference.as_ref(), "poReference")? {
            Some(reference) => Some(reference),
            None => match &raw.po_data {
                Some(po_data) => {
                    let po_data: RawPoData = decode_object(po_data, "po_data")?;
                    string_field(po_data.number.as_ref(), "po_data.number")?
                }
                None => None,
            },
        };
        if let Some(item) = &raw.primary_line_item {
            builder.primary_line_item = Some(parse_line_item(item, "primaryLineItem")?);
        }
        if let Some(items) = &raw.extra_line_items {
            let items = items
                .as_array()
                .ok_or_else(|| ValidationError::new("extraLineItems", "expected an array"))?;
            for (idx, item) in items.iter().enumerate() {
                let path = format!("extraLineItems[{}]", idx);
                builder.extra_line_items.push(parse_line_item(item, &path)?);
            }
        }
        builder.annotation_text = string_field(raw.annotation_text.as_ref(), "annotationText")?;
        builder.date_override = string_field(raw.date_override.as_ref(), "dateOverride")?;

        builder.build()
    }

    /// Vendor display name.
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Invoice number, currency and declared total.
    pub fn invoice_data(&self) -> &InvoiceData {
        &self.invoice_data
    }

    /// Purchase-order reference, if the scenario carries one.
    pub fn po_reference(&self) -> Option<&str> {
        self.po_reference.as_deref()
    }

    /// Purchase-order reference as printed, `N/A` when absent.
    pub fn po_reference_display(&self) -> &str {
        self.po_reference().unwrap_or(MISSING_PO_REFERENCE)
    }

    /// The optional primary line item.
    pub fn primary_line_item(&self) -> Option<&LineItem> {
        self.primary_line_item.as_ref()
    }

    /// Additional line items in listed order.
    pub fn extra_line_items(&self) -> &[LineItem] {
        &self.extra_line_items
    }

    /// All line items in render order: the primary item first, then the extras.
    pub fn line_items(&self) -> impl Iterator<Item = &LineItem> + '_ {
        self.primary_line_item
            .iter()
            .chain(self.extra_line_items.iter())
    }

    /// Non-empty annotation text.
    pub fn annotation_text(&self) -> Option<&str> {
        self.annotation_text.as_deref()
    }

    /// Explicit date for the metadata block.
    pub fn date_override(&self) -> Option<&str> {
        self.date_override.as_deref()
    }

    /// Value of the metadata `Date:` line, or `None` when no date line is rendered.
    ///
    /// An explicit override always wins. Without one, an annotation containing `Date:` still
    /// produces a date line, always printing `2024-01-01` whatever follows the marker.
    pub fn date_line(&self) -> Option<&str> {
        if let Some(date) = self.date_override() {
            return Some(date);
        }

        self.annotation_text()
            .filter(|text| text.contains(LEGACY_DATE_MARKER))
            .map(|_| LEGACY_DATE_FALLBACK)
    }
}

/// Programmatic constructor for [`Scenario`] values.
///
/// `build` applies the same checks as the JSON entry points.
#[derive(Clone, Debug, Default)]
pub struct ScenarioBuilder {
    vendor: Option<String>,
    invoice_data: InvoiceData,
    po_reference: Option<String>,
    primary_line_item: Option<LineItem>,
    extra_line_items: Vec<LineItem>,
    annotation_text: Option<String>,
    date_override: Option<String>,
}

impl ScenarioBuilder {
    /// Sets the vendor display name.
    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    /// Sets the invoice number.
    pub fn invoice_number(mut self, number: impl Into<String>) -> Self {
        self.invoice_data.number = number.into();
        self
    }

    /// Sets the currency code.
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.invoice_data.currency = code.into();
        self
    }

    /// Sets the declared total.
    pub fn total(mut self, total: Decimal) -> Self {
        self.invoice_data.total = total;
        self
    }

    /// Sets the purchase-order reference.
    pub fn po_reference(mut self, reference: impl Into<String>) -> Self {
        self.po_reference = Some(reference.into());
        self
    }

    /// Sets the primary line item.
    pub fn primary_line_item(mut self, item: LineItem) -> Self {
        self.primary_line_item = Some(item);
        self
    }

    /// Appends an extra line item.
    pub fn extra_line_item(mut self, item: LineItem) -> Self {
        self.extra_line_items.push(item);
        self
    }

    /// Appends several extra line items, keeping their order.
    pub fn extra_line_items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = LineItem>,
    {
        self.extra_line_items.extend(items);
        self
    }

    /// Sets the annotation text.
    pub fn annotation_text(mut self, text: impl Into<String>) -> Self {
        self.annotation_text = Some(text.into());
        self
    }

    /// Sets an explicit date for the metadata block.
    pub fn date_override(mut self, date: impl Into<String>) -> Self {
        self.date_override = Some(date.into());
        self
    }

    /// Validates the collected fields and produces the scenario.
    pub fn build(self) -> Result<Scenario, ValidationError> {
        let mut invoice_data = self.invoice_data;
        invoice_data.currency = invoice_data.currency.trim().to_ascii_uppercase();
        if invoice_data.currency.is_empty() {
            return Err(ValidationError::new(
                "invoiceData.currency",
                "currency code must not be empty",
            ));
        }

        let mut subtotal = Decimal::ZERO;
        let items = self
            .primary_line_item
            .iter()
            .map(|item| (item, "primaryLineItem".to_owned()))
            .chain(
                self.extra_line_items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| (item, format!("extraLineItems[{}]", idx))),
            );
        for (item, path) in items {
            if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
                return Err(ValidationError::new(
                    format!("{}.unitPrice", path),
                    "must not be negative",
                ));
            }
            let line_total = item.checked_line_total().ok_or_else(|| {
                ValidationError::new(path.clone(), "line total exceeds the decimal range")
            })?;
            subtotal = subtotal.checked_add(line_total).ok_or_else(|| {
                ValidationError::new(path, "subtotal exceeds the decimal range")
            })?;
        }
        if invoice_data.total.checked_sub(subtotal).is_none() {
            return Err(ValidationError::new(
                "invoiceData.total",
                "difference to the line-item subtotal exceeds the decimal range",
            ));
        }

        Ok(Scenario {
            vendor: self.vendor.unwrap_or_else(|| DEFAULT_VENDOR.to_owned()),
            invoice_data,
            po_reference: self.po_reference,
            primary_line_item: self.primary_line_item,
            extra_line_items: self.extra_line_items,
            annotation_text: self.annotation_text.filter(|text| !text.trim().is_empty()),
            date_override: self
                .date_override
                .map(|date| date.trim().to_owned())
                .filter(|date| !date.is_empty()),
        })
    }
}

const KNOWN_KEYS: &[&str] = &[
    "vendor",
    "invoiceData",
    "invoice_data",
    "poReference",
    "po_reference",
    "po_data",
    "primaryLineItem",
    "line_item",
    "extraLineItems",
    "extra_inv_lines",
    "annotationText",
    "text_content",
    "dateOverride",
    "date_override",
];

fn log_unknown_keys(root: &Map<String, Value>) {
    for key in root.keys().filter(|key| !KNOWN_KEYS.contains(&key.as_str())) {
        debug!("ignoring unknown scenario key `{}`", key);
    }
}

/// Wire shape of a scenario: the camelCase keys plus the snake_case aliases written by older
/// fixture generators. Values stay untyped so validation can name the offending field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScenario {
    vendor: Option<Value>,
    #[serde(alias = "invoice_data")]
    invoice_data: Option<Value>,
    #[serde(alias = "po_reference")]
    po_reference: Option<Value>,
    #[serde(rename = "po_data")]
    po_data: Option<Value>,
    #[serde(alias = "line_item")]
    primary_line_item: Option<Value>,
    #[serde(alias = "extra_inv_lines")]
    extra_line_items: Option<Value>,
    #[serde(alias = "text_content")]
    annotation_text: Option<Value>,
    #[serde(alias = "date_override")]
    date_override: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawInvoiceData {
    number: Option<Value>,
    currency: Option<Value>,
    total: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawPoData {
    number: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLineItem {
    #[serde(alias = "desc")]
    description: Option<Value>,
    #[serde(alias = "qty")]
    quantity: Option<Value>,
    #[serde(alias = "unit_price")]
    unit_price: Option<Value>,
}

fn decode_object<'de, T>(value: &'de Value, path: &str) -> Result<T, ValidationError>
where
    T: Deserialize<'de>,
{
    if !value.is_object() {
        return Err(ValidationError::new(path, "expected an object"));
    }
    T::deserialize(value).map_err(|err| ValidationError::new(path, err.to_string()))
}

fn string_field(value: Option<&Value>, path: &str) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(ValidationError::new(path, "expected a string")),
    }
}

fn decimal_value(value: &Value, path: &str) -> Result<Decimal, ValidationError> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_owned(),
        _ => return Err(ValidationError::new(path, "expected a number")),
    };
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| ValidationError::new(path, format!("`{}` is not a representable amount", text)))
}

fn parse_invoice_data(value: &Value) -> Result<InvoiceData, ValidationError> {
    let raw: RawInvoiceData = decode_object(value, "invoiceData")?;
    let mut data = InvoiceData::default();
    if let Some(number) = string_field(raw.number.as_ref(), "invoiceData.number")? {
        data.number = number;
    }
    if let Some(currency) = string_field(raw.currency.as_ref(), "invoiceData.currency")? {
        data.currency = currency;
    }
    if let Some(total) = &raw.total {
        data.total = decimal_value(total, "invoiceData.total")?;
    }
    Ok(data)
}

fn parse_line_item(value: &Value, path: &str) -> Result<LineItem, ValidationError> {
    let raw: RawLineItem = decode_object(value, path)?;

    let description_path = format!("{}.description", path);
    let description = string_field(raw.description.as_ref(), &description_path)?
        .ok_or_else(|| ValidationError::missing(&description_path))?;

    let quantity_path = format!("{}.quantity", path);
    let quantity = raw
        .quantity
        .as_ref()
        .ok_or_else(|| ValidationError::missing(&quantity_path))?;
    let quantity = match quantity.as_u64() {
        Some(quantity) => u32::try_from(quantity).map_err(|_| {
            ValidationError::new(&quantity_path, "quantity exceeds the supported range")
        })?,
        None => {
            return Err(ValidationError::new(
                quantity_path,
                "expected a non-negative integer",
            ))
        }
    };

    let price_path = format!("{}.unitPrice", path);
    let unit_price = raw
        .unit_price
        .as_ref()
        .ok_or_else(|| ValidationError::missing(&price_path))?;
    let unit_price = decimal_value(unit_price, &price_path)?;

    LineItem::new(description, quantity, unit_price)
        .map_err(|err| ValidationError::new(price_path, err.reason()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn empty_object_resolves_defaults() {
        let scenario = Scenario::from_value(&json!({})).expect("defaults apply");
        assert_eq!(scenario.vendor(), "Unknown Vendor");
        assert_eq!(scenario.invoice_data().number(), "INV-000");
        assert_eq!(scenario.invoice_data().currency(), "USD");
        assert_eq!(scenario.invoice_data().total(), Decimal::ZERO);
        assert_eq!(scenario.po_reference_display(), "N/A");
        assert_eq!(scenario.line_items().count(), 0);
        assert!(scenario.annotation_text().is_none());
        assert!(scenario.date_line().is_none());
    }

    #[test]
    fn parses_full_scenario_in_order() {
        let scenario = Scenario::from_value(&json!({
            "vendor": "Acme Corp",
            "invoiceData": {"number": "INV-1", "currency": "eur", "total": 30.5},
            "poReference": "4500001005",
            "primaryLineItem": {"description": "Widget", "quantity": 3, "unitPrice": 10.0},
            "extraLineItems": [
                {"description": "Zeta", "quantity": 1, "unitPrice": 0.5},
                {"description": "Alpha", "quantity": 0, "unitPrice": 2},
                {"description": "Zeta", "quantity": 1, "unitPrice": 0.5}
            ],
            "annotationText": "FINAL"
        }))
        .expect("valid scenario");

        assert_eq!(scenario.invoice_data().currency(), "EUR");
        assert_eq!(scenario.invoice_data().total(), dec!(30.5));
        assert_eq!(scenario.po_reference_display(), "4500001005");
        let names: Vec<_> = scenario.line_items().map(LineItem::description).collect();
        assert_eq!(names, ["Widget", "Zeta", "Alpha", "Zeta"]);
    }

    #[test]
    fn accepts_legacy_snake_case_keys() {
        let legacy = Scenario::from_value(&json!({
            "filename": "S1.pdf",
            "vendor": "TechGap Solutions",
            "invoice_data": {"number": "INV-S1", "currency": "USD", "total": 849.99},
            "po_data": {"number": "4500001005"},
            "line_item": {"desc": "Falcon", "qty": 1, "unit_price": 849.99},
            "extra_inv_lines": [{"desc": "Death Star", "qty": 2, "unit_price": 10}],
            "text_content": "CREDIT MEMO"
        }))
        .expect("legacy keys parse");

        let modern = Scenario::builder()
            .vendor("TechGap Solutions")
            .invoice_number("INV-S1")
            .total(dec!(849.99))
            .po_reference("4500001005")
            .primary_line_item(LineItem::new("Falcon", 1, dec!(849.99)).unwrap())
            .extra_line_item(LineItem::new("Death Star", 2, dec!(10)).unwrap())
            .annotation_text("CREDIT MEMO")
            .build()
            .expect("builder succeeds");

        assert_eq!(legacy, modern);
    }

    #[test]
    fn missing_quantity_names_field_path() {
        let err = Scenario::from_value(&json!({
            "extraLineItems": [
                {"description": "ok", "quantity": 1, "unitPrice": 1},
                {"description": "broken", "unitPrice": 1}
            ]
        }))
        .unwrap_err();
        assert_eq!(err.field(), "extraLineItems[1].quantity");
    }

    #[test]
    fn rejects_invalid_values() {
        let negative_price = Scenario::from_value(&json!({
            "primaryLineItem": {"description": "x", "quantity": 1, "unitPrice": -1}
        }))
        .unwrap_err();
        assert_eq!(negative_price.field(), "primaryLineItem.unitPrice");

        let fractional_quantity = Scenario::from_value(&json!({
            "primaryLineItem": {"description": "x", "quantity": 1.5, "unitPrice": 1}
        }))
        .unwrap_err();
        assert_eq!(fractional_quantity.field(), "primaryLineItem.quantity");

        let wrong_type = Scenario::from_value(&json!({"vendor": 7})).unwrap_err();
        assert_eq!(wrong_type.field(), "vendor");

        let text_total =
            Scenario::from_value(&json!({"invoiceData": {"total": "twelve"}})).unwrap_err();
        assert_eq!(text_total.field(), "invoiceData.total");

        let bool_total = Scenario::from_value(&json!({"invoiceData": {"total": true}})).unwrap_err();
        assert_eq!(bool_total.field(), "invoiceData.total");

        let empty_currency =
            Scenario::from_value(&json!({"invoiceData": {"currency": "  "}})).unwrap_err();
        assert_eq!(empty_currency.field(), "invoiceData.currency");

        let not_object = Scenario::from_value(&json!([1, 2])).unwrap_err();
        assert_eq!(not_object.field(), "$");
    }

    #[test]
    fn amounts_may_be_decimal_strings() {
        let scenario = Scenario::from_value(&json!({
            "invoiceData": {"total": "1234.50"},
            "primaryLineItem": {"description": "x", "quantity": 1, "unitPrice": " 0.10 "}
        }))
        .unwrap();
        assert_eq!(scenario.invoice_data().total(), dec!(1234.50));
        assert_eq!(scenario.primary_line_item().unwrap().unit_price(), dec!(0.10));
    }

    #[test]
    fn rejects_total_too_far_from_subtotal() {
        let err = Scenario::from_json_str(
            r#"{
                "invoiceData": {"total": "-79228162514264337593543950335"},
                "primaryLineItem": {
                    "description": "x",
                    "quantity": 1,
                    "unitPrice": "79228162514264337593543950335"
                }
            }"#,
        )
        .unwrap_err();
        match err {
            FixtureError::Validation(err) => assert_eq!(err.field(), "invoiceData.total"),
            other => panic!("unexpected error: {}", other),
        }

        let credit = Scenario::builder()
            .total(Decimal::MIN)
            .build()
            .expect("no line items leaves the total unconstrained");
        assert_eq!(credit.invoice_data().total(), Decimal::MIN);
    }

    #[test]
    fn canonical_and_legacy_key_together_is_rejected() {
        let err = Scenario::from_value(&json!({
            "annotationText": "FINAL",
            "text_content": "DRAFT"
        }))
        .unwrap_err();
        assert_eq!(err.field(), "$");
        assert!(err.reason().contains("duplicate field"));
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let scenario = Scenario::from_value(&json!({
            "vendor": null,
            "poReference": null,
            "invoiceData": {"total": null}
        }))
        .expect("nulls are absent fields");
        assert_eq!(scenario.vendor(), DEFAULT_VENDOR);
        assert_eq!(scenario.po_reference(), None);
        assert_eq!(scenario.invoice_data().total(), Decimal::ZERO);
    }

    #[test]
    fn negative_declared_total_is_allowed() {
        let scenario =
            Scenario::from_value(&json!({"invoiceData": {"total": -120.25}})).expect("credit memo");
        assert_eq!(scenario.invoice_data().total(), dec!(-120.25));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Scenario::from_json_str("{\"vendor\": ").unwrap_err();
        assert!(matches!(err, FixtureError::Parse(_)));

        let err = Scenario::from_json_str("{\"vendor\": 1}").unwrap_err();
        assert!(matches!(err, FixtureError::Validation(_)));
    }

    #[test]
    fn date_line_prefers_explicit_override() {
        let scenario = Scenario::builder()
            .annotation_text("Date: 2023-12-31")
            .date_override("2025-02-01")
            .build()
            .unwrap();
        assert_eq!(scenario.date_line(), Some("2025-02-01"));
    }

    #[test]
    fn date_line_uses_legacy_marker() {
        let with_token = Scenario::builder()
            .annotation_text("Backdated. Invoice Date: 2023-05-01")
            .build()
            .unwrap();
        assert_eq!(with_token.date_line(), Some(LEGACY_DATE_FALLBACK));

        let bare = Scenario::builder().annotation_text("Date:").build().unwrap();
        assert_eq!(bare.date_line(), Some(LEGACY_DATE_FALLBACK));

        let lower = Scenario::builder().annotation_text("date: soon").build().unwrap();
        assert!(lower.date_line().is_none());
    }

    #[test]
    fn blank_annotation_is_dropped() {
        let scenario = Scenario::builder().annotation_text("   ").build().unwrap();
        assert!(scenario.annotation_text().is_none());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let scenario = Scenario::builder()
            .vendor("Acme Corp")
            .primary_line_item(LineItem::new("Widget", 3, dec!(10.00)).unwrap())
            .build()
            .unwrap();
        let value = serde_json::to_value(&scenario).expect("serializes");
        assert_eq!(value["vendor"], "Acme Corp");
        assert_eq!(value["primaryLineItem"]["quantity"], 3);
        assert!(value.get("poReference").is_none());
    }
}
