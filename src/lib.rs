// ABOUTME: Library root for warehouse-sync
// ABOUTME: Exposes the sync engine, database boundaries, and CLI command handlers

pub mod commands;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod source;
pub mod state;
pub mod sync;
pub mod utils;
pub mod weblog;
