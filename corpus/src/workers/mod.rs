pub mod base;
pub mod classifier;
pub mod crawler;
