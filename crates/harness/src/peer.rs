use folha_core::draft::{InventoryItemDraft, OrderDraft, TransactionDraft};
use folha_core::schema::{FINANCE_V3, INVENTORY_V2, ORDERS_V2};
use folha_engine::SyncEngine;
use folha_sheets::{MemoryWorkbook, RangeSpec, SheetError, SheetStore};
use folha_storage::{SqliteStorage, StorageError};

/// One engine over an in-memory primary store and an in-memory mirror with
/// the three tabs pre-seeded with header rows.
pub struct TestPeer {
    pub engine: SyncEngine<MemoryWorkbook>,
}

impl TestPeer {
    pub fn new() -> Result<Self, StorageError> {
        let storage = SqliteStorage::open_in_memory()?;
        let mut sheets = MemoryWorkbook::new();
        for schema in [&FINANCE_V3, &INVENTORY_V2, &ORDERS_V2] {
            sheets.seed(schema.sheet, [schema.headers()]);
        }
        Ok(Self {
            engine: SyncEngine::new(storage, sheets),
        })
    }

    /// Raw rows of one mirror tab, header included.
    pub fn tab(&self, sheet: &str) -> &[Vec<String>] {
        self.engine.sheets().tab(sheet)
    }

    /// A minimal valid expense for a given date string (either accepted
    /// date form).
    pub fn expense(description: &str, amount: f64, date: &str) -> TransactionDraft {
        TransactionDraft {
            date: Some(date.to_string()),
            category: "Insumos".into(),
            description: description.to_string(),
            amount,
            ..Default::default()
        }
    }

    pub fn item(sku: &str, name: &str, quantity: f64) -> InventoryItemDraft {
        InventoryItemDraft {
            sku: sku.to_string(),
            name: name.to_string(),
            quantity,
            ..Default::default()
        }
    }

    pub fn order(customer: &str, total: f64, delivery_date: &str) -> OrderDraft {
        OrderDraft {
            customer_name: customer.to_string(),
            description: "Encomenda".into(),
            total_value: total,
            delivery_date: Some(delivery_date.to_string()),
            ..Default::default()
        }
    }
}

/// Mirror adapter where every operation fails, for exercising the
/// best-effort propagation contract.
#[derive(Debug, Default)]
pub struct FailingWorkbook;

impl FailingWorkbook {
    fn refuse<T>(&self) -> Result<T, SheetError> {
        Err(SheetError::Unavailable("quota exceeded".to_string()))
    }
}

impl SheetStore for FailingWorkbook {
    fn read_range(&self, _range: &RangeSpec) -> Result<Vec<Vec<String>>, SheetError> {
        self.refuse()
    }

    fn append_row(&mut self, _range: &RangeSpec, _cells: &[String]) -> Result<(), SheetError> {
        self.refuse()
    }

    fn update_row_at(
        &mut self,
        _range: &RangeSpec,
        _position: u32,
        _cells: &[String],
    ) -> Result<(), SheetError> {
        self.refuse()
    }

    fn clear_row_at(&mut self, _range: &RangeSpec, _position: u32) -> Result<(), SheetError> {
        self.refuse()
    }
}
