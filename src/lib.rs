//! Codex platform - customer, visitor, door-access, IoT and document-analysis backend.
//!
//! The HTTP API lives in [`server`]; persistence in [`repository`]; the
//! extract, analyze and persist pipeline in [`services`].

pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod services;
