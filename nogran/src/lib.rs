pub mod commands;
pub mod database;
