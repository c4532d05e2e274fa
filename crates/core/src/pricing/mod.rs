pub mod engine;
pub mod resolution;
