pub mod app;
pub mod core;
pub mod report;
pub mod scanner;
