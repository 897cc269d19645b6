//! Domain types shared across the Kolo banking services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod limits;
pub mod nuban;
pub mod pagination;
