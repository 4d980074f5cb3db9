pub mod analytics;
pub mod chart;
pub mod form;
pub mod holding;
pub mod settings;
