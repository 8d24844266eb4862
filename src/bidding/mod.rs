pub mod commands;
pub mod rule;
