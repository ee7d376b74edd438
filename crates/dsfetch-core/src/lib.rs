//! Checksum-verified dataset fetching and a data-module loader harness.

pub mod checksum;
pub mod config;
pub mod data_module;
pub mod fetch;
pub mod harness;
pub mod logging;
pub mod metadata;
