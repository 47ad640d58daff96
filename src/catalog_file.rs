//! Catalog document handling for loading and saving calculator options.
//!
//! The document is the calculator-options response of the shop backend:
//! `{"products": [{"product_code", "label", "options", "valid_combinations"}]}`.
//! Rows are normalized on load (see [`crate::catalog`]).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::catalog::{CatalogSource, ProductCatalog};
use crate::error::QuoteError;

/// All product catalogs served by one calculator-options document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub products: Vec<ProductCatalog>,
}

impl CatalogFile {
    pub fn new(products: Vec<ProductCatalog>) -> Self {
        Self { products }
    }

    /// Parse a catalog document from JSON text
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the catalog document to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize catalog to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write catalog to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load a catalog document from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

        let catalog = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse catalog JSON in {:?}", path.as_ref()))?;
        info!(
            path = ?path.as_ref(),
            products = catalog.products.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Look up one product by its code
    pub fn product(&self, product_code: &str) -> Option<&ProductCatalog> {
        self.products.iter().find(|p| p.product_code == product_code)
    }

    /// Validate the catalog document.
    ///
    /// Hard errors: no products, blank or duplicate product codes.
    /// Products without combinations and repeated rows are only logged;
    /// the resolver handles both.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.products.is_empty() {
            return Err(QuoteError::validation("catalog must contain at least one product"));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            let code = product.product_code.trim();
            if code.is_empty() {
                return Err(QuoteError::validation("product code must be specified"));
            }
            if !seen.insert(code) {
                return Err(QuoteError::validation(format!(
                    "duplicate product code: {}",
                    code
                )));
            }

            if product.is_empty() {
                warn!(product = code, "Product has no valid combinations");
            }

            let distinct: HashSet<_> = product.combinations.iter().collect();
            if distinct.len() != product.combinations.len() {
                warn!(
                    product = code,
                    duplicates = product.combinations.len() - distinct.len(),
                    "Product lists repeated combinations"
                );
            }
        }

        Ok(())
    }
}

impl CatalogSource for CatalogFile {
    fn fetch(&self, product_code: &str) -> crate::error::Result<ProductCatalog> {
        self.product(product_code)
            .cloned()
            .ok_or_else(|| QuoteError::unknown_product(product_code))
    }

    fn product_codes(&self) -> Vec<String> {
        self.products.iter().map(|p| p.product_code.clone()).collect()
    }
}
