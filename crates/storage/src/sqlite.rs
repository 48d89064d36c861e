use rusqlite::Connection;

use folha_core::{EntityKind, RecordId};

use crate::error::StorageError;
use crate::traits::{RawRecord, Storage};

fn to_id(v: Vec<u8>) -> Result<RecordId, StorageError> {
    let bytes: [u8; 16] = v
        .try_into()
        .map_err(|_| StorageError::Serialization("invalid record_id length".to_string()))?;
    Ok(RecordId::from_bytes(bytes))
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Storage for SqliteStorage {
    fn create(
        &mut self,
        entity: EntityKind,
        id: RecordId,
        body: &[u8],
    ) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO records (entity, record_id, body) VALUES (?1, ?2, ?3)",
            rusqlite::params![entity.as_str(), id.as_bytes().as_slice(), body],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::RecordCollision {
                    record_id: id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Sqlite(e)),
        }
    }

    fn update(
        &mut self,
        entity: EntityKind,
        id: RecordId,
        body: &[u8],
    ) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "UPDATE records
             SET body = ?3, updated_at = CAST(unixepoch('now','subsec') * 1000 AS INTEGER)
             WHERE entity = ?1 AND record_id = ?2",
            rusqlite::params![entity.as_str(), id.as_bytes().as_slice(), body],
        )?;
        Ok(changed > 0)
    }

    fn upsert(
        &mut self,
        entity: EntityKind,
        id: RecordId,
        body: &[u8],
    ) -> Result<bool, StorageError> {
        if self.update(entity, id, body)? {
            return Ok(false);
        }
        self.create(entity, id, body)?;
        Ok(true)
    }

    fn get(&self, entity: EntityKind, id: RecordId) -> Result<Option<RawRecord>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM records WHERE entity = ?1 AND record_id = ?2")?;
        let mut rows = stmt.query(rusqlite::params![
            entity.as_str(),
            id.as_bytes().as_slice()
        ])?;
        match rows.next()? {
            Some(row) => Ok(Some(RawRecord {
                id,
                body: row.get(0)?,
            })),
            None => Ok(None),
        }
    }

    fn find(&self, entity: EntityKind) -> Result<Vec<RawRecord>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT record_id, body FROM records WHERE entity = ?1 ORDER BY record_id")?;
        let rows = stmt.query_map(rusqlite::params![entity.as_str()], |row| {
            Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id_bytes, body) = row?;
            out.push(RawRecord {
                id: to_id(id_bytes)?,
                body,
            });
        }
        Ok(out)
    }

    fn ids(&self, entity: EntityKind) -> Result<Vec<RecordId>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT record_id FROM records WHERE entity = ?1")?;
        let rows = stmt.query_map(rusqlite::params![entity.as_str()], |row| {
            row.get::<_, Vec<u8>>(0)
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(to_id(row?)?);
        }
        Ok(out)
    }

    fn delete(&mut self, entity: EntityKind, id: RecordId) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM records WHERE entity = ?1 AND record_id = ?2",
            rusqlite::params![entity.as_str(), id.as_bytes().as_slice()],
        )?;
        Ok(changed > 0)
    }

    fn delete_all(&mut self, entity: EntityKind) -> Result<u64, StorageError> {
        let changed = self.conn.execute(
            "DELETE FROM records WHERE entity = ?1",
            rusqlite::params![entity.as_str()],
        )?;
        Ok(changed as u64)
    }

    fn count(&self, entity: EntityKind) -> Result<u64, StorageError> {
        let n: u64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE entity = ?1",
            rusqlite::params![entity.as_str()],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
