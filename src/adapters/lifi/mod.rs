//! LI.FI routing adapter: quote, transfer status, and chain listing.

pub mod client;

pub use client::{LifiClient, LifiConfig, TransferStatus};
