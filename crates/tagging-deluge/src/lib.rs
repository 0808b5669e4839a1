#![doc = include_str!("../README.md")]

pub mod client;
pub mod error;
pub mod rpc;

pub use client::{DelugeClient, DelugeConfig, PLUGIN_NAME};
pub use error::{DelugeError, Result};
