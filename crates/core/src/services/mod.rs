pub mod alignment_service;
pub mod analytics_service;
pub mod chart_service;
pub mod price_service;
pub mod trend_service;
