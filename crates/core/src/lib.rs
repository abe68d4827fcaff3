//! Core business logic for promptvault-rs.
//!
//! The vote transition engine and the trending ranker live in
//! [`services::vote`] and [`services::trending`]. The listing policies they
//! rely on are in [`visibility`] and [`pagination`].

pub mod pagination;
pub mod services;
pub mod visibility;

pub use pagination::{Page, PageRequest, PaginationPolicy};
pub use services::*;
