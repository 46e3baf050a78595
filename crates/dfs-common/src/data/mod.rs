//! Weekly salary, ranking and projection files.

pub mod assemble;
pub mod records;
pub mod slate;
pub mod store;

pub use assemble::assemble_projections;
pub use records::{RankingRow, SalaryRow};
pub use slate::Slate;
pub use store::{DataStore, DataStoreError};
