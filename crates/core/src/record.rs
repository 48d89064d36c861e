use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;

use crate::codec;
use crate::error::CoreError;
use crate::ids::RecordId;
use crate::schema::{self, ColumnSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Finance,
    Inventory,
    Orders,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Inventory => "inventory",
            Self::Orders => "orders",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A domain record that mirrors into one external table.
///
/// `project` and `from_cells` are the two halves of the row representation
/// and must agree with `schema()` on column order and width. `from_cells` is
/// total: every cell decode falls back to a documented default, because the
/// mirror is hand-editable and a malformed cell must never abort a bulk
/// import.
pub trait SheetRecord: Serialize + DeserializeOwned {
    const ENTITY: EntityKind;

    /// Active column layout (the newest schema version).
    fn schema() -> &'static ColumnSchema;

    fn id(&self) -> RecordId;

    /// Ordered cells for the mirror row, identifier first.
    fn project(&self) -> Vec<String>;

    /// Decode one mirror row. A non-UUID identifier cell mints a fresh id.
    fn from_cells(cells: &[String]) -> Self;

    fn to_msgpack(&self) -> Result<Vec<u8>, CoreError> {
        rmp_serde::to_vec(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    fn from_msgpack(bytes: &[u8]) -> Result<Self, CoreError> {
        rmp_serde::from_slice(bytes).map_err(|e| CoreError::Serialization(e.to_string()))
    }
}

// ============================================================================
// Enumerated states (PT-BR literals, matching what operators type into the
// mirror). Decode never errors: blank or unrecognized cells take the default.
// ============================================================================

macro_rules! cell_enum {
    ($name:ident { $default:ident => $default_lit:literal, $($variant:ident => $literal:literal),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = $default_lit)]
            $default,
            $(#[serde(rename = $literal)] $variant),*
        }

        impl $name {
            pub const ALL: &'static [Self] = &[Self::$default, $(Self::$variant),*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    Self::$default => $default_lit,
                    $(Self::$variant => $literal),*
                }
            }

            pub fn parse_or_default(cell: &str) -> Self {
                match cell.trim() {
                    $($literal => Self::$variant,)*
                    _ => Self::default(),
                }
            }
        }
    };
}

cell_enum!(TransactionKind {
    Despesa => "Despesa",
    Receita => "Receita",
});

cell_enum!(TransactionStatus {
    Pago => "Pago",
    Pendente => "Pendente",
    Agendado => "Agendado",
});

cell_enum!(InventoryCategory {
    Diversos => "Diversos",
    Receita => "Receita",
    Embalagens => "Embalagens",
    Limpeza => "Limpeza",
});

cell_enum!(PaymentStatus {
    Pendente => "Pendente",
    Sinal50 => "Sinal 50% Pago",
    PagoIntegral => "Pago Integral",
});

cell_enum!(OrderStatus {
    Pendente => "Pendente",
    EmProducao => "Em Produção",
    Pronto => "Pronto",
    Entregue => "Entregue",
    Cancelado => "Cancelado",
});

cell_enum!(DeliveryMethod {
    Retirada => "Retirada",
    Entrega => "Entrega",
});

// ============================================================================
// Finance
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub payment_method: String,
    pub cost_center: String,
    pub beneficiary: String,
    pub status: TransactionStatus,
    pub observation: String,
    pub payment_date: Option<DateTime<Utc>>,
    /// Receipt image bytes. Primary-store only: the mirror carries a
    /// presence flag, never the attachment, so this field does not survive
    /// an import.
    pub receipt_image: Option<Vec<u8>>,
}

impl SheetRecord for Transaction {
    const ENTITY: EntityKind = EntityKind::Finance;

    fn schema() -> &'static ColumnSchema {
        &schema::FINANCE_V3
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn project(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            codec::encode_date(self.date),
            self.kind.as_str().to_string(),
            self.category.clone(),
            self.description.clone(),
            codec::encode_number(self.amount),
            self.payment_method.clone(),
            self.cost_center.clone(),
            self.beneficiary.clone(),
            self.status.as_str().to_string(),
            self.observation.clone(),
            codec::encode_opt_date(self.payment_date),
            codec::encode_attachment(self.receipt_image.is_some()),
        ]
    }

    fn from_cells(cells: &[String]) -> Self {
        Self {
            id: RecordId::parse(codec::cell(cells, 0)).unwrap_or_default(),
            date: codec::decode_date(codec::cell(cells, 1)).unwrap_or_else(Utc::now),
            kind: TransactionKind::parse_or_default(codec::cell(cells, 2)),
            category: codec::text_or(cells, 3, "Geral"),
            description: codec::text_or(cells, 4, "Sem descrição"),
            amount: codec::decode_number(codec::cell(cells, 5)),
            payment_method: codec::text_or(cells, 6, "Pix"),
            cost_center: codec::text_or(cells, 7, "Geral"),
            beneficiary: codec::cell(cells, 8).trim().to_string(),
            status: TransactionStatus::parse_or_default(codec::cell(cells, 9)),
            observation: codec::cell(cells, 10).trim().to_string(),
            payment_date: codec::decode_date(codec::cell(cells, 11)),
            receipt_image: None,
        }
    }
}

// ============================================================================
// Inventory
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: RecordId,
    pub sku: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub min_quantity: f64,
    pub category: InventoryCategory,
    pub cost_price: f64,
    pub supplier: String,
    pub observation: String,
    pub last_movement: DateTime<Utc>,
    pub validity: Option<DateTime<Utc>>,
}

impl SheetRecord for InventoryItem {
    const ENTITY: EntityKind = EntityKind::Inventory;

    fn schema() -> &'static ColumnSchema {
        &schema::INVENTORY_V2
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn project(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.sku.clone(),
            self.name.clone(),
            codec::encode_number(self.quantity),
            self.unit.clone(),
            codec::encode_number(self.min_quantity),
            self.category.as_str().to_string(),
            codec::encode_number(self.cost_price),
            self.supplier.clone(),
            self.observation.clone(),
            codec::encode_date(self.last_movement),
            codec::encode_opt_date(self.validity),
        ]
    }

    fn from_cells(cells: &[String]) -> Self {
        Self {
            id: RecordId::parse(codec::cell(cells, 0)).unwrap_or_default(),
            sku: codec::text_or(cells, 1, "SEM-COD"),
            name: codec::text_or(cells, 2, "Sem nome"),
            quantity: codec::decode_number(codec::cell(cells, 3)),
            unit: codec::text_or(cells, 4, "un"),
            // Blank minimum falls back to the restock default of 5.
            min_quantity: codec::cell(cells, 5).trim().parse().unwrap_or(5.0),
            category: InventoryCategory::parse_or_default(codec::cell(cells, 6)),
            cost_price: codec::decode_number(codec::cell(cells, 7)),
            supplier: codec::cell(cells, 8).trim().to_string(),
            observation: codec::cell(cells, 9).trim().to_string(),
            last_movement: codec::decode_date(codec::cell(cells, 10)).unwrap_or_else(Utc::now),
            validity: codec::decode_date(codec::cell(cells, 11)),
        }
    }
}

// ============================================================================
// Orders
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: RecordId,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub customer_name: String,
    pub description: String,
    pub total_value: f64,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub delivery_method: DeliveryMethod,
    /// Delivery address, primary-store only (not mirrored).
    pub address: String,
    pub contact: String,
    pub observation: String,
}

impl SheetRecord for Order {
    const ENTITY: EntityKind = EntityKind::Orders;

    fn schema() -> &'static ColumnSchema {
        &schema::ORDERS_V2
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn project(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            codec::encode_datetime(self.order_date),
            codec::encode_datetime(self.delivery_date),
            self.customer_name.clone(),
            self.description.clone(),
            codec::encode_number(self.total_value),
            self.payment_status.as_str().to_string(),
            self.status.as_str().to_string(),
            self.delivery_method.as_str().to_string(),
            self.contact.clone(),
            self.observation.clone(),
        ]
    }

    fn from_cells(cells: &[String]) -> Self {
        Self {
            id: RecordId::parse(codec::cell(cells, 0)).unwrap_or_default(),
            order_date: codec::decode_date(codec::cell(cells, 1)).unwrap_or_else(Utc::now),
            delivery_date: codec::decode_date(codec::cell(cells, 2)).unwrap_or_else(Utc::now),
            customer_name: codec::text_or(cells, 3, "Sem nome"),
            description: codec::cell(cells, 4).trim().to_string(),
            total_value: codec::decode_number(codec::cell(cells, 5)),
            payment_status: PaymentStatus::parse_or_default(codec::cell(cells, 6)),
            status: OrderStatus::parse_or_default(codec::cell(cells, 7)),
            delivery_method: DeliveryMethod::parse_or_default(codec::cell(cells, 8)),
            address: String::new(),
            contact: codec::cell(cells, 9).trim().to_string(),
            observation: codec::cell(cells, 10).trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_transaction() -> Transaction {
        Transaction {
            id: RecordId::new(),
            date: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            kind: TransactionKind::Despesa,
            category: "Insumos".into(),
            description: "Farinha".into(),
            amount: 45.9,
            payment_method: "Pix".into(),
            cost_center: "Geral".into(),
            beneficiary: "Moinho Sul".into(),
            status: TransactionStatus::Pago,
            observation: String::new(),
            payment_date: None,
            receipt_image: Some(vec![0xFF, 0xD8]),
        }
    }

    fn sample_item() -> InventoryItem {
        InventoryItem {
            id: RecordId::new(),
            sku: "FAR-01".into(),
            name: "Farinha de trigo".into(),
            quantity: 12.0,
            unit: "kg".into(),
            min_quantity: 5.0,
            category: InventoryCategory::Receita,
            cost_price: 4.5,
            supplier: "Moinho Sul".into(),
            observation: String::new(),
            last_movement: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            validity: Some(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()),
        }
    }

    fn sample_order() -> Order {
        Order {
            id: RecordId::new(),
            order_date: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            delivery_date: Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap(),
            customer_name: "Ana".into(),
            description: "Bolo 2kg".into(),
            total_value: 180.0,
            payment_status: PaymentStatus::Sinal50,
            status: OrderStatus::EmProducao,
            delivery_method: DeliveryMethod::Entrega,
            address: "Rua das Flores 12".into(),
            contact: "(32) 99999-0000".into(),
            observation: "Sem lactose".into(),
        }
    }

    #[test]
    fn projection_width_matches_active_schema() {
        assert_eq!(sample_transaction().project().len(), Transaction::schema().width());
        assert_eq!(sample_item().project().len(), InventoryItem::schema().width());
        assert_eq!(sample_order().project().len(), Order::schema().width());
    }

    #[test]
    fn transaction_row_roundtrip() {
        let tx = sample_transaction();
        let back = Transaction::from_cells(&tx.project());
        assert_eq!(back.id, tx.id);
        assert_eq!(back.date, tx.date);
        assert_eq!(back.kind, tx.kind);
        assert_eq!(back.category, tx.category);
        assert_eq!(back.amount, tx.amount);
        assert_eq!(back.status, tx.status);
        // Attachment is one-way: only the flag crosses the mirror.
        assert_eq!(back.receipt_image, None);
    }

    #[test]
    fn inventory_row_roundtrip() {
        let item = sample_item();
        let back = InventoryItem::from_cells(&item.project());
        assert_eq!(back, item);
    }

    #[test]
    fn order_row_roundtrip_drops_address() {
        let order = sample_order();
        let back = Order::from_cells(&order.project());
        assert_eq!(back.id, order.id);
        assert_eq!(back.order_date, order.order_date);
        assert_eq!(back.delivery_date, order.delivery_date);
        assert_eq!(back.payment_status, order.payment_status);
        assert_eq!(back.status, order.status);
        assert_eq!(back.address, "");
    }

    #[test]
    fn enum_literals_roundtrip() {
        for kind in TransactionKind::ALL {
            assert_eq!(TransactionKind::parse_or_default(kind.as_str()), *kind);
        }
        for status in TransactionStatus::ALL {
            assert_eq!(TransactionStatus::parse_or_default(status.as_str()), *status);
        }
        for cat in InventoryCategory::ALL {
            assert_eq!(InventoryCategory::parse_or_default(cat.as_str()), *cat);
        }
        for ps in PaymentStatus::ALL {
            assert_eq!(PaymentStatus::parse_or_default(ps.as_str()), *ps);
        }
        for st in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse_or_default(st.as_str()), *st);
        }
        for dm in DeliveryMethod::ALL {
            assert_eq!(DeliveryMethod::parse_or_default(dm.as_str()), *dm);
        }
    }

    #[test]
    fn enum_decode_is_fail_soft() {
        assert_eq!(TransactionKind::parse_or_default(""), TransactionKind::Despesa);
        assert_eq!(TransactionKind::parse_or_default("despesa?"), TransactionKind::Despesa);
        assert_eq!(TransactionStatus::parse_or_default("???"), TransactionStatus::Pago);
        assert_eq!(OrderStatus::parse_or_default(""), OrderStatus::Pendente);
        assert_eq!(InventoryCategory::parse_or_default("Outro"), InventoryCategory::Diversos);
    }

    #[test]
    fn from_cells_fills_defaults_on_blank_row() {
        let id = RecordId::new();
        let mut cells = vec![id.to_string()];
        cells.resize(Transaction::schema().width(), String::new());
        let tx = Transaction::from_cells(&cells);
        assert_eq!(tx.id, id);
        assert_eq!(tx.category, "Geral");
        assert_eq!(tx.description, "Sem descrição");
        assert_eq!(tx.amount, 0.0);
        assert_eq!(tx.payment_method, "Pix");
        assert_eq!(tx.payment_date, None);
    }

    #[test]
    fn from_cells_tolerates_older_schema_rows() {
        // A v1 finance row has 11 cells; the active schema reads the two
        // newer columns as blank.
        let tx = sample_transaction();
        let mut cells = tx.project();
        cells.truncate(crate::schema::FINANCE_V1.width());
        let back = Transaction::from_cells(&cells);
        assert_eq!(back.id, tx.id);
        assert_eq!(back.amount, tx.amount);
        assert_eq!(back.payment_date, None);
    }

    #[test]
    fn from_cells_mints_id_for_foreign_rows() {
        let mut cells = sample_transaction().project();
        cells[0] = "linha digitada à mão".into();
        let a = Transaction::from_cells(&cells);
        let b = Transaction::from_cells(&cells);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn msgpack_roundtrip() {
        let tx = sample_transaction();
        let bytes = tx.to_msgpack().unwrap();
        assert_eq!(Transaction::from_msgpack(&bytes).unwrap(), tx);

        let order = sample_order();
        let bytes = order.to_msgpack().unwrap();
        assert_eq!(Order::from_msgpack(&bytes).unwrap(), order);
    }
}
