pub mod peer;

pub use peer::{FailingWorkbook, TestPeer};
