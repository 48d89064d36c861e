use folha_core::{EntityKind, RecordId};

use crate::error::StorageError;

/// One stored document: an identifier plus an opaque msgpack body. Typed
/// encode/decode lives with the record types; the store never inspects the
/// body.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub id: RecordId,
    pub body: Vec<u8>,
}

/// Identifier-keyed document operations of the primary store. The primary
/// store is authoritative: every mutation here commits before any mirror
/// propagation runs.
pub trait Storage {
    /// Insert a new record. Fails on id collision.
    fn create(
        &mut self,
        entity: EntityKind,
        id: RecordId,
        body: &[u8],
    ) -> Result<(), StorageError>;

    /// Overwrite an existing record. Returns false when the id is unknown.
    fn update(
        &mut self,
        entity: EntityKind,
        id: RecordId,
        body: &[u8],
    ) -> Result<bool, StorageError>;

    /// Insert-or-overwrite. Returns true when a new record was inserted.
    fn upsert(
        &mut self,
        entity: EntityKind,
        id: RecordId,
        body: &[u8],
    ) -> Result<bool, StorageError>;

    fn get(&self, entity: EntityKind, id: RecordId) -> Result<Option<RawRecord>, StorageError>;

    fn find(&self, entity: EntityKind) -> Result<Vec<RawRecord>, StorageError>;

    fn ids(&self, entity: EntityKind) -> Result<Vec<RecordId>, StorageError>;

    /// Returns false when the id is unknown.
    fn delete(&mut self, entity: EntityKind, id: RecordId) -> Result<bool, StorageError>;

    /// Drop every record of one entity. Returns the number removed.
    fn delete_all(&mut self, entity: EntityKind) -> Result<u64, StorageError>;

    fn count(&self, entity: EntityKind) -> Result<u64, StorageError>;
}
