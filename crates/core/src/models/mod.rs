pub mod analytics;
pub mod asset;
pub mod chart;
pub mod frame;
pub mod log;
pub mod portfolio;
pub mod price;
pub mod report;
pub mod settings;
pub mod snapshot;
pub mod trend;
