//! printquote Library
//!
//! Resolves which print options (size, paper, color, quantity) stay
//! selectable for a product, whether the current selection has a price, and
//! how to auto-correct a selection onto the product's valid combinations.

pub mod catalog;
pub mod catalog_file;
pub mod cli;
pub mod error;
pub mod logic;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use catalog::{CatalogSource, CombinationRow, ProductCatalog, ProductOptions};
pub use catalog_file::CatalogFile;
pub use error::QuoteError;
pub use session::{CalculatorSession, LoadTicket};
pub use types::{Attribute, AttributeValue, Combination, QuoteRequest, Selection};

// Combination resolver
pub use logic::resolver::{
    AvailabilityView, MAX_RECONCILE_PASSES, Reconciled, availability, available_values,
    is_priceable, reconcile,
};
