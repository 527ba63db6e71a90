//! Byte sources and the bounded views carved out of them.
//!
//! - [`source`]: the minimal source contract, its adapters and shared handle
//! - [`view`]: fixed-size windows with their own cursor, materialized or streaming

pub mod source;
pub mod view;
