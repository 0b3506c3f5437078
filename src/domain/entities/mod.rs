//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A short code mapped to a destination
//! - [`LinkStats`] - Click statistics for one link
//! - [`Page`] - One page of an owner's links
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewShortLink`).

pub mod link;
pub mod page;
pub mod stats;

pub use link::{NewShortLink, ShortLink};
pub use page::Page;
pub use stats::{ClickSource, LinkStats};
