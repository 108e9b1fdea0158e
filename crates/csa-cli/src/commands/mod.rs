//! Command implementations.

pub mod extract;
pub mod fields;
pub mod generate;
pub mod placeholders;
pub mod run;

pub use self::extract::{build_extractor, execute_extract};
pub use self::fields::execute_fields;
pub use self::generate::execute_generate;
pub use self::placeholders::execute_placeholders;
pub use self::run::execute_run;
