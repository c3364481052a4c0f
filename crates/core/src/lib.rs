//! Driftwood Core - Shared types library.
//!
//! This crate provides common types used by the storefront:
//! - [`types::id`] - Newtype wrappers for type-safe entity IDs
//! - [`types::email`] - Validated email addresses for checkout
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This
//! keeps it lightweight and allows it to be used anywhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
