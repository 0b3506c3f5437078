//! Domain layer containing business entities and click accounting.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_worker`] - Bounded background click accounting
//!
//! # Click Processing Flow
//!
//! 1. A successful resolve hands a [`click_event::ClickEvent`] to the
//!    [`click_worker::ClickDispatcher`] without waiting
//! 2. [`click_worker::run_click_worker`] drains the queue with capped concurrency
//! 3. Each click bumps the cache counter (with expiry), then the durable
//!    counter under its own deadline

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
