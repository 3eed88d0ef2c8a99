pub mod aggregator;
pub mod cleaner;
pub mod derived;
pub mod frame;
pub mod insights;
pub mod recommender;
pub mod stats;

pub use aggregator::*;
pub use cleaner::*;
pub use derived::*;
pub use insights::*;
pub use recommender::*;
