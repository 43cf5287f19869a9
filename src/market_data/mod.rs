pub mod csv_dir;
pub mod memory;
pub mod membership;
pub mod provider;
pub mod universe;
pub mod yahoo;

pub use csv_dir::CsvDirectoryProvider;
pub use memory::InMemoryProvider;
pub use membership::IndexMembership;
pub use provider::HistoricalDataProvider;
pub use universe::Universe;
pub use yahoo::YahooChartProvider;
