//! Command implementations.

pub mod cases;
pub mod catalog;
pub mod diagnose;
pub mod export;
pub mod import;
pub mod stats;

pub use self::cases::execute_cases;
pub use self::catalog::{execute_disease, execute_diseases, execute_questions};
pub use self::diagnose::execute_diagnose;
pub use self::export::execute_export;
pub use self::import::execute_import;
pub use self::stats::execute_stats;
