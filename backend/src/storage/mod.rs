//! Storage layer: repository traits plus the file-based implementation.
//!
//! The domain layer only ever sees the traits; the derivation engine
//! itself never touches storage at all.

pub mod cache;
pub mod csv;
pub mod traits;

pub use csv::CsvConnection;
pub use traits::{ActivityStorage, BabyStorage, Connection};
