//! Loosely-typed request bodies.
//!
//! Mutations arrive as whatever the UI layer posts. Each draft deserializes
//! with defaults, then `validate` turns it into a fully-typed record — the
//! only path into the projector. Date fields are strings here so drafts
//! accept both `DD/MM/YYYY` and ISO forms, same as the mirror decode path.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::codec;
use crate::error::CoreError;
use crate::ids::RecordId;
use crate::record::{
    DeliveryMethod, InventoryCategory, InventoryItem, Order, OrderStatus, PaymentStatus,
    Transaction, TransactionKind, TransactionStatus,
};

fn require(field: &str, value: &str) -> Result<String, CoreError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(CoreError::InvalidData(format!("{field} is required")));
    }
    Ok(v.to_string())
}

/// Decode an optional date string; a present-but-unparseable value is a
/// validation error, unlike the fail-soft mirror decode.
fn parse_date(field: &str, value: &Option<String>) -> Result<Option<DateTime<Utc>>, CoreError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => codec::decode_date(s)
            .map(Some)
            .ok_or_else(|| CoreError::InvalidData(format!("{field}: unrecognized date {s:?}"))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionDraft {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub payment_method: Option<String>,
    pub cost_center: Option<String>,
    pub beneficiary: String,
    pub status: TransactionStatus,
    pub observation: String,
    pub payment_date: Option<String>,
    pub receipt_image: Option<Vec<u8>>,
}

impl TransactionDraft {
    pub fn validate(self, id: RecordId) -> Result<Transaction, CoreError> {
        Ok(Transaction {
            id,
            date: parse_date("date", &self.date)?.unwrap_or_else(Utc::now),
            kind: self.kind,
            category: require("category", &self.category)?,
            description: require("description", &self.description)?,
            amount: self.amount,
            payment_method: self.payment_method.unwrap_or_else(|| "Pix".to_string()),
            cost_center: self.cost_center.unwrap_or_else(|| "Geral".to_string()),
            beneficiary: self.beneficiary.trim().to_string(),
            status: self.status,
            observation: self.observation.trim().to_string(),
            payment_date: parse_date("paymentDate", &self.payment_date)?,
            receipt_image: self.receipt_image,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryItemDraft {
    pub sku: String,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub min_quantity: Option<f64>,
    pub category: InventoryCategory,
    pub cost_price: f64,
    pub supplier: String,
    pub observation: String,
    pub validity: Option<String>,
}

impl InventoryItemDraft {
    /// Movement date is always stamped to now: both creates and stock
    /// updates count as a movement.
    pub fn validate(self, id: RecordId) -> Result<InventoryItem, CoreError> {
        Ok(InventoryItem {
            id,
            sku: require("sku", &self.sku)?,
            name: require("name", &self.name)?,
            quantity: self.quantity,
            unit: self.unit.unwrap_or_else(|| "un".to_string()),
            min_quantity: self.min_quantity.unwrap_or(5.0),
            category: self.category,
            cost_price: self.cost_price,
            supplier: self.supplier.trim().to_string(),
            observation: self.observation.trim().to_string(),
            last_movement: Utc::now(),
            validity: parse_date("validity", &self.validity)?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderDraft {
    pub order_date: Option<String>,
    pub delivery_date: Option<String>,
    pub customer_name: String,
    pub description: String,
    pub total_value: f64,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub delivery_method: DeliveryMethod,
    pub address: String,
    pub contact: String,
    pub observation: String,
}

impl OrderDraft {
    pub fn validate(self, id: RecordId) -> Result<Order, CoreError> {
        let delivery_date = parse_date("deliveryDate", &self.delivery_date)?
            .ok_or_else(|| CoreError::InvalidData("deliveryDate is required".to_string()))?;
        Ok(Order {
            id,
            order_date: parse_date("orderDate", &self.order_date)?.unwrap_or_else(Utc::now),
            delivery_date,
            customer_name: require("customerName", &self.customer_name)?,
            description: require("description", &self.description)?,
            total_value: self.total_value,
            payment_status: self.payment_status,
            status: self.status,
            delivery_method: self.delivery_method,
            address: self.address.trim().to_string(),
            contact: self.contact.trim().to_string(),
            observation: self.observation.trim().to_string(),
        })
    }
}
