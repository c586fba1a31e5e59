//! dotpick: a local-first account picker for Polkadot/Kusama
//!
//! The library holds everything except terminal setup: address
//! canonicalization, option buckets, the option resolver, persistence
//! and the picker state driven by `main.rs`.

pub mod app;
pub mod chains;
pub mod config;
pub mod domain;
pub mod store;
pub mod ui;
