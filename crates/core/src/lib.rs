//! `inventrobil-core` - domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no HTTP).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_by_id, position_of};
pub use error::{DomainError, DomainResult};
pub use id::{BillingRecordId, ProductId};
