pub mod error;
pub mod locator;
pub mod propagator;
pub mod reconciler;

pub use error::EngineError;
pub use reconciler::{ImportOptions, ImportReport};

use folha_core::draft::{InventoryItemDraft, OrderDraft, TransactionDraft};
use folha_core::{InventoryItem, Order, RecordId, SheetRecord, Transaction};
use folha_sheets::SheetStore;
use folha_storage::{SqliteStorage, Storage};

/// The reconciliation engine: a primary document store plus one injected
/// mirror adapter. The primary store is authoritative — every command
/// commits there first and only then pushes the change to the mirror,
/// best-effort.
pub struct SyncEngine<S: SheetStore> {
    storage: SqliteStorage,
    sheets: S,
}

impl<S: SheetStore> SyncEngine<S> {
    pub fn new(storage: SqliteStorage, sheets: S) -> Self {
        Self { storage, sheets }
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn sheets(&self) -> &S {
        &self.sheets
    }

    pub fn sheets_mut(&mut self) -> &mut S {
        &mut self.sheets
    }

    // ========================================================================
    // Generic record plumbing
    // ========================================================================

    fn create_record<R: SheetRecord>(&mut self, record: R) -> Result<R, EngineError> {
        let body = record.to_msgpack()?;
        self.storage.create(R::ENTITY, record.id(), &body)?;
        // Committed; mirror push is best-effort from here on.
        propagator::propagate_create(&mut self.sheets, &record);
        Ok(record)
    }

    fn update_record<R: SheetRecord>(&mut self, record: R) -> Result<Option<R>, EngineError> {
        let body = record.to_msgpack()?;
        if !self.storage.update(R::ENTITY, record.id(), &body)? {
            return Ok(None);
        }
        propagator::propagate_update(&mut self.sheets, &record);
        Ok(Some(record))
    }

    fn delete_record<R: SheetRecord>(&mut self, id: RecordId) -> Result<bool, EngineError> {
        if !self.storage.delete(R::ENTITY, id)? {
            return Ok(false);
        }
        propagator::propagate_delete::<R, S>(&mut self.sheets, id);
        Ok(true)
    }

    fn get_record<R: SheetRecord>(&self, id: RecordId) -> Result<Option<R>, EngineError> {
        match self.storage.get(R::ENTITY, id)? {
            Some(raw) => Ok(Some(R::from_msgpack(&raw.body)?)),
            None => Ok(None),
        }
    }

    fn list_records<R: SheetRecord>(&self) -> Result<Vec<R>, EngineError> {
        let mut out = Vec::new();
        for raw in self.storage.find(R::ENTITY)? {
            out.push(R::from_msgpack(&raw.body)?);
        }
        Ok(out)
    }

    // ========================================================================
    // Finance
    // ========================================================================

    pub fn create_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, EngineError> {
        let record = draft.validate(RecordId::new())?;
        self.create_record(record)
    }

    pub fn update_transaction(
        &mut self,
        id: RecordId,
        draft: TransactionDraft,
    ) -> Result<Option<Transaction>, EngineError> {
        let record = draft.validate(id)?;
        self.update_record(record)
    }

    pub fn delete_transaction(&mut self, id: RecordId) -> Result<bool, EngineError> {
        self.delete_record::<Transaction>(id)
    }

    pub fn get_transaction(&self, id: RecordId) -> Result<Option<Transaction>, EngineError> {
        self.get_record(id)
    }

    /// Most recent first.
    pub fn list_transactions(&self) -> Result<Vec<Transaction>, EngineError> {
        let mut txs = self.list_records::<Transaction>()?;
        txs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(txs)
    }

    // ========================================================================
    // Inventory
    // ========================================================================

    pub fn create_item(&mut self, draft: InventoryItemDraft) -> Result<InventoryItem, EngineError> {
        let record = draft.validate(RecordId::new())?;
        self.create_record(record)
    }

    pub fn update_item(
        &mut self,
        id: RecordId,
        draft: InventoryItemDraft,
    ) -> Result<Option<InventoryItem>, EngineError> {
        let record = draft.validate(id)?;
        self.update_record(record)
    }

    pub fn delete_item(&mut self, id: RecordId) -> Result<bool, EngineError> {
        self.delete_record::<InventoryItem>(id)
    }

    pub fn get_item(&self, id: RecordId) -> Result<Option<InventoryItem>, EngineError> {
        self.get_record(id)
    }

    /// Category, then name.
    pub fn list_items(&self) -> Result<Vec<InventoryItem>, EngineError> {
        let mut items = self.list_records::<InventoryItem>()?;
        items.sort_by(|a, b| {
            a.category
                .as_str()
                .cmp(b.category.as_str())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(items)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    pub fn create_order(&mut self, draft: OrderDraft) -> Result<Order, EngineError> {
        let record = draft.validate(RecordId::new())?;
        self.create_record(record)
    }

    pub fn update_order(
        &mut self,
        id: RecordId,
        draft: OrderDraft,
    ) -> Result<Option<Order>, EngineError> {
        let record = draft.validate(id)?;
        self.update_record(record)
    }

    pub fn delete_order(&mut self, id: RecordId) -> Result<bool, EngineError> {
        self.delete_record::<Order>(id)
    }

    pub fn get_order(&self, id: RecordId) -> Result<Option<Order>, EngineError> {
        self.get_record(id)
    }

    /// Most recent first.
    pub fn list_orders(&self) -> Result<Vec<Order>, EngineError> {
        let mut orders = self.list_records::<Order>()?;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    // ========================================================================
    // Bulk reconciliation (explicit operator actions)
    // ========================================================================

    /// Mirror → primary for one entity. See `reconciler::import` for the
    /// failure policy and the `delete_missing` sharp edge.
    pub fn import<R: SheetRecord>(&mut self, options: ImportOptions) -> Result<ImportReport, EngineError> {
        reconciler::import::<R, S>(&mut self.storage, &self.sheets, options)
    }

    /// Primary → mirror rebuild for one entity.
    pub fn reseed<R: SheetRecord>(&mut self) -> Result<u64, EngineError> {
        reconciler::reseed::<R, S>(&self.storage, &mut self.sheets)
    }
}
