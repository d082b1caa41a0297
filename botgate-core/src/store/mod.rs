// File: src/store/mod.rs

pub mod usage_store;

pub use usage_store::{AdmitOutcome, UsageStore};
