//! Per-row and aggregate figures for the itemized table.

use rust_decimal::Decimal;

use crate::currency::format_amount;
use crate::scenario::{LineItem, Scenario};

/// One rendered table row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineRow {
    /// Description column text.
    pub description: String,
    /// Units billed.
    pub quantity: u32,
    /// Unit price as given.
    pub unit_price: Decimal,
    /// Unit price formatted in the document currency.
    pub unit_price_display: String,
    /// Exact `quantity × unit_price`.
    pub line_total: Decimal,
    /// Line total formatted in the document currency.
    pub line_total_display: String,
}

impl LineRow {
    fn from_item(item: &LineItem, currency: &str) -> Self {
        // Range checked when the scenario was built.
        let line_total = Decimal::from(item.quantity()) * item.unit_price();
        Self {
            description: item.description().to_owned(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            unit_price_display: format_amount(item.unit_price(), currency),
            line_total,
            line_total_display: format_amount(line_total, currency),
        }
    }
}

/// Processed rows in render order plus the arithmetic subtotal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItemTable {
    rows: Vec<LineRow>,
    subtotal: Decimal,
    declared_total: Decimal,
    currency: String,
}

impl LineItemTable {
    /// Derives the table for `scenario`, keeping the primary item first and extras in order.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let currency = scenario.invoice_data().currency();
        let rows: Vec<LineRow> = scenario
            .line_items()
            .map(|item| LineRow::from_item(item, currency))
            .collect();
        let subtotal = rows.iter().map(|row| row.line_total).sum();

        Self {
            rows,
            subtotal,
            declared_total: scenario.invoice_data().total(),
            currency: currency.to_owned(),
        }
    }

    /// Rows in render order. Empty when the scenario has no line items.
    pub fn rows(&self) -> &[LineRow] {
        &self.rows
    }

    /// Sum of every line total. Never substituted for the declared total.
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Subtotal formatted in the document currency.
    pub fn subtotal_display(&self) -> String {
        format_amount(self.subtotal, &self.currency)
    }

    /// `declared − subtotal`; non-zero for fixtures that exercise discrepancy detection.
    ///
    /// Scenario validation guarantees the difference is representable.
    pub fn discrepancy(&self) -> Decimal {
        self.declared_total - self.subtotal
    }

    /// Currency code of every amount in the table.
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn item(description: &str, quantity: u32, unit_price: Decimal) -> LineItem {
        LineItem::new(description, quantity, unit_price).expect("valid line item")
    }

    #[test]
    fn computes_rows_and_subtotal() {
        let scenario = Scenario::builder()
            .currency("USD")
            .total(dec!(100))
            .primary_line_item(item("Widget", 3, dec!(10.00)))
            .extra_line_item(item("Gadget", 2, dec!(1249.995)))
            .build()
            .unwrap();

        let table = LineItemTable::from_scenario(&scenario);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0].line_total, dec!(30.00));
        assert_eq!(table.rows()[0].unit_price_display, "$10.00");
        assert_eq!(table.rows()[0].line_total_display, "$30.00");
        assert_eq!(table.rows()[1].line_total, dec!(2499.990));
        assert_eq!(table.rows()[1].unit_price_display, "$1,250.00");
        assert_eq!(table.rows()[1].line_total_display, "$2,499.99");
        assert_eq!(table.subtotal(), dec!(2529.99));
        assert_eq!(table.discrepancy(), dec!(-2429.99));
    }

    #[test]
    fn empty_scenario_has_no_rows() {
        let scenario = Scenario::builder().build().unwrap();
        let table = LineItemTable::from_scenario(&scenario);
        assert!(table.rows().is_empty());
        assert_eq!(table.subtotal(), Decimal::ZERO);
        assert_eq!(table.subtotal_display(), "$0.00");
    }

    #[test]
    fn zero_quantity_yields_zero_total() {
        let scenario = Scenario::builder()
            .currency("EUR")
            .extra_line_item(item("Sample", 0, dec!(99.99)))
            .build()
            .unwrap();
        let table = LineItemTable::from_scenario(&scenario);
        assert_eq!(table.rows()[0].line_total, Decimal::ZERO);
        assert_eq!(table.rows()[0].line_total_display, "0.00 EUR");
    }

    #[test]
    fn keeps_duplicates_in_input_order() {
        let scenario = Scenario::builder()
            .extra_line_items([
                item("b", 1, dec!(1)),
                item("a", 1, dec!(1)),
                item("b", 1, dec!(1)),
            ])
            .primary_line_item(item("first", 1, dec!(1)))
            .build()
            .unwrap();
        let table = LineItemTable::from_scenario(&scenario);
        let order: Vec<_> = table.rows().iter().map(|row| row.description.as_str()).collect();
        assert_eq!(order, ["first", "b", "a", "b"]);
    }
}
