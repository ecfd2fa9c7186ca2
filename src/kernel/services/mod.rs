//! Services layer (ports + adapters).
//!
//! - `ports`: pure contracts/types used across the app (kernel-facing).
//! - `adapters`: in-memory and on-disk implementations.

pub mod adapters;
pub mod ports;
