pub mod config;
pub mod logging;

pub mod archive;
pub mod auth;
pub mod checksum;
pub mod cleanup;
pub mod download;
pub mod packs;
pub mod pipeline;
pub mod retry;
pub mod scope;
pub mod select;
pub mod store;
pub mod version;
