pub mod csvwb;
pub mod error;
pub mod memory;
pub mod range;
pub mod traits;

pub use csvwb::{CsvWorkbook, WorkbookConfig};
pub use error::SheetError;
pub use memory::MemoryWorkbook;
pub use range::RangeSpec;
pub use traits::SheetStore;
