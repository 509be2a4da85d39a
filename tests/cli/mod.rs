//! CLI Integration Test Modules

pub mod argument_parsing;
pub mod end_to_end;
pub mod toml_config;
