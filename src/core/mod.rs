pub mod builder;
pub mod category;
pub mod config;
pub mod describe;
pub mod error;
pub mod mileage;
pub mod package;
pub mod rounding;
pub mod rows;
pub mod validate;

// Flat public surface for domain types and functions.
pub use builder::{build_package, BuildOptions};
pub use category::{map_category, CategoryMapping, ExpenseCategory};
pub use config::{BuilderConfig, PACKAGE_CURRENCY, SCHEMA_VERSION};
pub use error::BuildError;
pub use mileage::MileageRateTable;
pub use package::TaxExportPackage;
pub use rounding::round_cents;
pub use rows::{read_input, ExportInput};
pub use validate::{validate_rows, ValidationReport};
