//! Shared test helpers.
#![allow(dead_code)]

pub mod gcs_server;
pub mod memory_store;
