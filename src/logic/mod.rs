//! Logic modules — derives calculator state from catalog data.
//!
//! The logic layer answers "what may the customer still pick" and "does this
//! pick have a price" for a product's valid combinations.
//!
//! # Modules
//!
//! - `resolver` — Availability, priceability and auto-correction of selections

pub mod resolver;
