/*
 * Responsibility
 * - crate module tree
 * - the binary (main.rs) and integration tests build on these modules
 */
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
