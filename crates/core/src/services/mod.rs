pub mod chart_service;
pub mod holdings_service;
pub mod metrics_service;
