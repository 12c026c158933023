//! Bar providers and the symbol universe.

pub mod csv_import;
pub mod memory;
pub mod provider;
pub mod synthetic;
pub mod universe;

pub use csv_import::CsvDirProvider;
pub use memory::InMemoryProvider;
pub use provider::{BarProvider, DataError, DataSource};
pub use synthetic::SyntheticProvider;
pub use universe::{Universe, UniverseError};
