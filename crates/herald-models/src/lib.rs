//! Core data models for Herald.
//!
//! This crate provides the value types shared by the publisher and
//! subscriber crates.

pub mod name;

pub use name::EventName;
