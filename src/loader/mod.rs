pub mod cache;
pub mod csv_loader;

pub use cache::LoadCache;
pub use csv_loader::load_csv;
