pub mod codec;
pub mod draft;
pub mod error;
pub mod ids;
pub mod record;
pub mod schema;

pub use error::CoreError;
pub use ids::RecordId;
pub use record::{EntityKind, InventoryItem, Order, SheetRecord, Transaction};
pub use schema::ColumnSchema;
