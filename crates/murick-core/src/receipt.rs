//! # Receipt
//!
//! Builds the customer receipt for a single sale and renders it as
//! fixed-width text for thermal or plain printers.
//!
//! ```text
//!        Murick Battery Shop
//!            Owner Name
//!           0300-1234567
//!          Main Road, Multan
//! --------------------------------
//! Date:     Monday, 15 January 2024
//! Time:                 10:30:00 AM
//! Invoice #:              #55440ABC
//! Served by:                  owner
//! --------------------------------
//! ITEMS PURCHASED
//! AGS 55Ah N50
//! Qty: 1 × Rs 10,000.00  Rs 10,000.00
//! ...
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{BatterySku, SaleRecord, ShopConfig, UNKNOWN_LABEL};

/// Narrowest supported paper, in characters.
pub const MIN_PAPER_WIDTH: usize = 32;
/// Widest supported paper, in characters.
pub const MAX_PAPER_WIDTH: usize = 80;

pub const FOOTER_LINES: [&str; 5] = [
    "Thank you for your business!",
    "Please keep this receipt for warranty claims",
    "Exchange policy: 7 days with receipt",
    "Warranty terms apply as per manufacturer",
    "Powered by Murick Battery Management System",
];

/// Everything printed on a receipt, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub header: Vec<String>,
    pub date: String,
    pub time: String,
    pub invoice_number: String,
    /// `None` for walk-in customers.
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub served_by: String,
    pub item_label: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Money,
    pub warranty_months: Option<u32>,
    #[ts(as = "Option<String>")]
    pub warranty_until: Option<DateTime<Utc>>,
}

impl Receipt {
    /// `sku` is the SKU the sale references, if it still exists.
    pub fn build(sale: &SaleRecord, sku: Option<&BatterySku>, shop: &ShopConfig) -> Self {
        let header = [
            Some(shop.shop_name.as_str()),
            Some(shop.proprietor_name.as_str()),
            Some(shop.contact_number.as_str()),
            Some(shop.address.as_str()),
            shop.email.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

        let item_label = match sku {
            Some(sku) => sku.label(),
            None => sale
                .snapshot_label()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        };

        Self {
            header,
            date: sale.sale_date.format("%A, %-d %B %Y").to_string(),
            time: sale.sale_date.format("%I:%M:%S %p").to_string(),
            invoice_number: sale.invoice_number(),
            customer_name: (!sale.is_walk_in()).then(|| sale.customer_name.clone()),
            customer_phone: sale.customer_phone.clone(),
            served_by: sale.sold_by.clone(),
            item_label,
            quantity: sale.quantity_sold,
            unit_price: sale.unit_price,
            total: sale.total_amount,
            warranty_months: sku.map(|s| s.warranty_months).filter(|m| *m > 0),
            warranty_until: sale.warranty_end_date,
        }
    }

    /// Renders the receipt at `width` characters per line (clamped to the
    /// supported paper range).
    pub fn render(&self, width: usize) -> String {
        let width = width.clamp(MIN_PAPER_WIDTH, MAX_PAPER_WIDTH);
        let rule = "-".repeat(width);
        let mut out: Vec<String> = Vec::new();

        for line in &self.header {
            out.push(center(line, width));
        }
        out.push(rule.clone());

        out.push(row("Date:", &self.date, width));
        out.push(row("Time:", &self.time, width));
        out.push(row("Invoice #:", &self.invoice_number, width));
        if let Some(name) = &self.customer_name {
            out.push(row("Customer:", name, width));
        }
        if let Some(phone) = &self.customer_phone {
            out.push(row("Phone:", phone, width));
        }
        if !self.served_by.is_empty() {
            out.push(row("Served by:", &self.served_by, width));
        }
        out.push(rule.clone());

        out.push("ITEMS PURCHASED".to_string());
        out.push(self.item_label.clone());
        out.push(row(
            &format!("Qty: {} × {}", self.quantity, self.unit_price),
            &self.total.to_string(),
            width,
        ));
        if let Some(months) = self.warranty_months {
            out.push(format!("Warranty: {} months", months));
        }
        if let Some(until) = self.warranty_until {
            out.push(format!("Warranty valid until: {}", until.format("%d/%m/%Y")));
        }
        out.push(rule.clone());

        out.push(row("Subtotal:", &self.total.to_string(), width));
        out.push(row("TOTAL:", &self.total.to_string(), width));
        out.push(rule);

        for line in FOOTER_LINES {
            out.push(center(line, width));
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

fn row(label: &str, value: &str, width: usize) -> String {
    let used = label.chars().count() + value.chars().count();
    let gap = width.saturating_sub(used).max(1);
    format!("{}{}{}", label, " ".repeat(gap), value)
}
