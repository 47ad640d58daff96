//! Calculator Session
//!
//! Owns the state a price calculator keeps between user inputs: the catalog
//! of the currently selected product and the current selection. After every
//! catalog load and every user input the session re-derives the selection
//! with [`reconcile`] and applies it.
//!
//! # Design Principles
//!
//! - **Explicit derive-and-apply**: No implicit dependency tracking, each input calls `reconcile`
//! - **No Global State**: The selection lives in the session and is passed to the resolver by value
//! - **Stale loads rejected**: A catalog delivered for a superseded load is refused
//!
//! # Load Flow
//!
//! ```text
//! begin_load("flyer")  -> ticket #1   (old catalog and selection discarded)
//! begin_load("poster") -> ticket #2
//! finish_load(#1, ..)  -> Err(StaleCatalog)
//! finish_load(#2, ..)  -> seeded + reconciled selection
//! ```

use tracing::{debug, info, warn};

use crate::catalog::{CatalogSource, ProductCatalog};
use crate::error::{QuoteError, Result};
use crate::logic::resolver::{
    AvailabilityView, Reconciled, availability, available_values, is_priceable, reconcile,
};
use crate::types::{Attribute, AttributeValue, Combination, QuoteRequest, Selection};

/// Handle for one catalog load; only the most recent ticket is honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    product_code: String,
    id: u64,
}

impl LoadTicket {
    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Calculator state for one customer view.
///
/// # Example
///
/// ```
/// use printquote::catalog::ProductCatalog;
/// use printquote::session::CalculatorSession;
/// use printquote::types::{Attribute, Combination};
///
/// let catalog = ProductCatalog::new(
///     "flyer",
///     "Flyer",
///     vec![
///         Combination::new("A6", "130g", "1+0", 100),
///         Combination::new("A5", "130g", "1+0", 100),
///     ],
/// );
///
/// let mut session = CalculatorSession::new();
/// session.load(catalog);
/// assert!(session.is_priceable());
///
/// session.select(Attribute::Size, "A5");
/// assert_eq!(session.selection().size.as_deref(), Some("A5"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalculatorSession {
    /// Product most recently requested
    product_code: Option<String>,

    /// Catalog of that product, once delivered
    catalog: Option<ProductCatalog>,

    /// Current selection
    selection: Selection,

    /// Id of the most recent load ticket
    load_counter: u64,
}

impl CalculatorSession {
    /// Create an empty session with no product loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Product most recently requested, loaded or not
    pub fn product_code(&self) -> Option<&str> {
        self.product_code.as_deref()
    }

    /// Catalog of the current product, if it has arrived
    pub fn catalog(&self) -> Option<&ProductCatalog> {
        self.catalog.as_ref()
    }

    /// True between `begin_load` and the matching `finish_load`
    pub fn is_loading(&self) -> bool {
        self.product_code.is_some() && self.catalog.is_none()
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Combinations of the current product (empty while nothing is loaded)
    pub fn combinations(&self) -> &[Combination] {
        self.catalog
            .as_ref()
            .map(ProductCatalog::combinations)
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------------------
    // Product loading
    // ------------------------------------------------------------------------

    /// Start loading a product.
    ///
    /// The previous catalog and selection are discarded immediately; any
    /// ticket handed out before this one becomes stale.
    pub fn begin_load(&mut self, product_code: impl Into<String>) -> LoadTicket {
        let product_code = product_code.into();
        self.load_counter += 1;
        self.product_code = Some(product_code.clone());
        self.catalog = None;
        self.selection = Selection::new();

        debug!(product = %product_code, ticket = self.load_counter, "Catalog load started");
        LoadTicket {
            product_code,
            id: self.load_counter,
        }
    }

    /// Deliver the catalog for a load started with [`begin_load`](Self::begin_load).
    ///
    /// # Errors
    ///
    /// - `StaleCatalog` if a newer load has been started since `ticket`
    /// - `Catalog` if the catalog belongs to a different product than the ticket
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        catalog: ProductCatalog,
    ) -> Result<Reconciled> {
        if ticket.id != self.load_counter {
            warn!(
                product = %ticket.product_code,
                ticket = ticket.id,
                current = self.load_counter,
                "Discarding stale catalog"
            );
            return Err(QuoteError::StaleCatalog {
                product: ticket.product_code,
                ticket: ticket.id,
                current: self.load_counter,
            });
        }
        if catalog.product_code != ticket.product_code {
            return Err(QuoteError::catalog(format!(
                "expected catalog for '{}', got '{}'",
                ticket.product_code, catalog.product_code
            )));
        }

        Ok(self.install(catalog))
    }

    /// Load a catalog that is already at hand, superseding any pending load.
    pub fn load(&mut self, catalog: ProductCatalog) -> Reconciled {
        self.begin_load(catalog.product_code.clone());
        self.install(catalog)
    }

    /// Fetch a product from `source` and load it.
    pub fn load_from<S: CatalogSource + ?Sized>(
        &mut self,
        source: &S,
        product_code: &str,
    ) -> Result<Reconciled> {
        let ticket = self.begin_load(product_code);
        let catalog = source.fetch(product_code)?;
        self.finish_load(ticket, catalog)
    }

    fn install(&mut self, catalog: ProductCatalog) -> Reconciled {
        let seeded = catalog.seed_selection();
        let outcome = reconcile(catalog.combinations(), &seeded);

        info!(
            product = %catalog.product_code,
            combinations = catalog.combinations.len(),
            selection = %outcome.selection,
            "Catalog loaded"
        );

        self.selection = outcome.selection.clone();
        self.catalog = Some(catalog);
        outcome
    }

    // ------------------------------------------------------------------------
    // User input
    // ------------------------------------------------------------------------

    /// Apply a user choice, then auto-correct the rest of the selection.
    ///
    /// The returned outcome's `changed` flag reports whether auto-correction
    /// touched anything beyond the user's own input.
    pub fn select(&mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Reconciled {
        self.selection.set(attribute, value.into());
        self.apply()
    }

    /// Apply raw text input (e.g. a quantity typed as `"250"`).
    pub fn select_text(&mut self, attribute: Attribute, raw: &str) -> Reconciled {
        self.selection.set_text(attribute, raw);
        self.apply()
    }

    /// Replace the whole selection, then auto-correct it
    pub fn replace_selection(&mut self, selection: Selection) -> Reconciled {
        self.selection = selection;
        self.apply()
    }

    fn apply(&mut self) -> Reconciled {
        let outcome = reconcile(self.combinations(), &self.selection);
        if outcome.changed {
            debug!(selection = %outcome.selection, "Selection auto-corrected");
        }
        self.selection = outcome.selection.clone();
        outcome
    }

    // ------------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------------

    /// Selectable values of one attribute given the other three
    pub fn available_values(&self, attribute: Attribute) -> Vec<AttributeValue> {
        available_values(self.combinations(), &self.selection, attribute)
    }

    /// Selectable values of all four attributes
    pub fn availability(&self) -> AvailabilityView {
        availability(self.combinations(), &self.selection)
    }

    /// Whether a price exists for the current selection
    pub fn is_priceable(&self) -> bool {
        is_priceable(self.combinations(), &self.selection)
    }

    /// Build the price request for the current selection.
    ///
    /// # Errors
    ///
    /// `NotPriceable` if no combination matches the selection exactly.
    pub fn quote_request(&self, lamination: bool) -> Result<QuoteRequest> {
        if !self.is_priceable() {
            return Err(QuoteError::not_priceable(self.selection.to_string()));
        }
        let combination = self
            .selection
            .to_combination()
            .ok_or_else(|| QuoteError::not_priceable(self.selection.to_string()))?;
        Ok(QuoteRequest::from_combination(&combination, lamination))
    }
}
