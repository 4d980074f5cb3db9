pub mod traits;

// Remote store implementations
pub mod rest;
