//! Product catalogs and their wire normalization
//!
//! The shop backend sends one entry per product with its option lists and
//! the valid combinations. Rows have been seen both as `{size, paper, color,
//! quantity}` and `{size, paper, color, qty}`, with quantities as numbers or
//! text and `color` sometimes absent. Everything is folded into the canonical
//! [`Combination`] here so the resolver only ever sees one shape.
//!
//! # Normalization Rules
//!
//! | Input                          | Result |
//! |--------------------------------|--------|
//! | `qty` / `quantity`             | `Combination::quantity` |
//! | quantity `"100"` / `100.0`     | `100` |
//! | missing or null `color`        | `""` (product without a color axis) |
//! | missing size/paper, bad quantity | row skipped, logged |
//! | missing/null `valid_combinations` | empty catalog |

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::types::{Attribute, AttributeValue, Combination, RawQuantity, Selection};

// ============================================================================
// Wire shapes
// ============================================================================

/// One catalog row as received from the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombinationRow {
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    paper: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default, alias = "qty", deserialize_with = "deserialize_raw_quantity")]
    quantity: Option<u32>,
}

fn deserialize_raw_quantity<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawQuantity>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.normalize()))
}

fn deserialize_quantities<'de, D>(deserializer: D) -> std::result::Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawQuantity>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .iter()
        .filter_map(RawQuantity::normalize)
        .collect())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl CombinationRow {
    /// Canonical form of this row, or `None` if it cannot denote a price.
    pub fn normalize(&self) -> Option<Combination> {
        Some(Combination {
            size: non_blank(&self.size)?,
            paper: non_blank(&self.paper)?,
            color: self
                .color
                .as_deref()
                .map(|c| c.trim().to_string())
                .unwrap_or_default(),
            quantity: self.quantity?,
        })
    }
}

/// Normalize wire rows, dropping the ones that cannot be priced.
///
/// Returns the canonical rows in catalog order and the number skipped.
pub fn normalize_rows(product_code: &str, rows: &[CombinationRow]) -> (Vec<Combination>, usize) {
    let mut combinations = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for (index, row) in rows.iter().enumerate() {
        match row.normalize() {
            Some(combination) => combinations.push(combination),
            None => {
                skipped += 1;
                warn!(product = product_code, index, ?row, "Skipping malformed catalog row");
            }
        }
    }

    (combinations, skipped)
}

/// Option lists advertised for a product; their first values seed a fresh selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptions {
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(default)]
    pub paper: Vec<String>,
    #[serde(default)]
    pub color: Vec<String>,
    #[serde(default, alias = "quantity", deserialize_with = "deserialize_quantities")]
    pub qty: Vec<u32>,
}

impl ProductOptions {
    fn first(&self, attribute: Attribute) -> Option<AttributeValue> {
        match attribute {
            Attribute::Size => self.size.first().map(|s| s.as_str().into()),
            Attribute::Paper => self.paper.first().map(|s| s.as_str().into()),
            Attribute::Color => self.color.first().map(|s| s.as_str().into()),
            Attribute::Quantity => self.qty.first().map(|q| (*q).into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProductEntry {
    product_code: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    options: Option<ProductOptions>,
    #[serde(default)]
    valid_combinations: Option<Vec<CombinationRow>>,
}

// ============================================================================
// Canonical catalog
// ============================================================================

/// Immutable snapshot of one product's valid combinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProductEntry")]
pub struct ProductCatalog {
    pub product_code: String,
    pub label: String,
    pub options: ProductOptions,
    #[serde(rename = "valid_combinations")]
    pub combinations: Vec<Combination>,
}

impl From<ProductEntry> for ProductCatalog {
    fn from(entry: ProductEntry) -> Self {
        let rows = entry.valid_combinations.unwrap_or_default();
        let (combinations, _) = normalize_rows(&entry.product_code, &rows);
        Self {
            product_code: entry.product_code,
            label: entry.label,
            options: entry.options.unwrap_or_default(),
            combinations,
        }
    }
}

impl ProductCatalog {
    pub fn new(
        product_code: impl Into<String>,
        label: impl Into<String>,
        combinations: Vec<Combination>,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            label: label.into(),
            options: ProductOptions::default(),
            combinations,
        }
    }

    /// Attach advertised option lists
    pub fn with_options(mut self, options: ProductOptions) -> Self {
        self.options = options;
        self
    }

    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Default selection for a freshly loaded product.
    ///
    /// Each attribute takes the first advertised option, falling back to the
    /// first row's value. An empty catalog with no options yields an unset
    /// selection. The result is not yet reconciled.
    pub fn seed_selection(&self) -> Selection {
        let mut selection = Selection::new();
        for attribute in Attribute::ORDER {
            let seed = self
                .options
                .first(attribute)
                .or_else(|| self.combinations.first().map(|row| row.value(attribute)));
            if let Some(value) = seed {
                selection.set(attribute, value);
            }
        }
        selection
    }
}

/// Source of product catalogs, e.g. a file on disk or the shop backend.
pub trait CatalogSource {
    /// Fetch the catalog for one product
    fn fetch(&self, product_code: &str) -> Result<ProductCatalog>;

    /// Product codes this source can serve, in source order
    fn product_codes(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accepts_qty_and_quantity() {
        let a: CombinationRow =
            serde_json::from_str(r#"{"size":"A6","paper":"130g","color":"1+0","qty":100}"#)
                .unwrap();
        let b: CombinationRow =
            serde_json::from_str(r#"{"size":"A6","paper":"130g","color":"1+0","quantity":"100"}"#)
                .unwrap();
        assert_eq!(a.normalize(), b.normalize());
        assert_eq!(a.normalize(), Some(Combination::new("A6", "130g", "1+0", 100)));
    }

    #[test]
    fn test_row_missing_color_normalizes_to_empty() {
        let row: CombinationRow =
            serde_json::from_str(r#"{"size":"A3","paper":"200g","qty":50}"#).unwrap();
        assert_eq!(row.normalize(), Some(Combination::new("A3", "200g", "", 50)));
    }

    #[test]
    fn test_row_without_quantity_is_rejected() {
        let row: CombinationRow =
            serde_json::from_str(r#"{"size":"A3","paper":"200g","color":"4+0","qty":"sok"}"#)
                .unwrap();
        assert_eq!(row.normalize(), None);

        let row: CombinationRow = serde_json::from_str(r#"{"paper":"200g","qty":50}"#).unwrap();
        assert_eq!(row.normalize(), None);
    }

    #[test]
    fn test_normalize_rows_counts_skipped() {
        let rows: Vec<CombinationRow> = serde_json::from_str(
            r#"[
                {"size":"A6","paper":"130g","color":"1+0","qty":100},
                {"size":"","paper":"130g","color":"1+0","qty":100},
                {"size":"A5","paper":"130g","color":"1+0","qty":250}
            ]"#,
        )
        .unwrap();
        let (combinations, skipped) = normalize_rows("flyer", &rows);
        assert_eq!(skipped, 1);
        assert_eq!(combinations.len(), 2);
        assert_eq!(combinations[1].size, "A5");
    }

    #[test]
    fn test_product_catalog_null_combinations_is_empty() {
        let catalog: ProductCatalog =
            serde_json::from_str(r#"{"product_code":"flyer","valid_combinations":null}"#).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.seed_selection(), Selection::new());
    }

    #[test]
    fn test_options_accept_text_quantities() {
        let options: ProductOptions =
            serde_json::from_str(r#"{"size":["A6"],"qty":["100", 250, "x"]}"#).unwrap();
        assert_eq!(options.qty, vec![100, 250]);
        assert!(options.paper.is_empty());
    }

    #[test]
    fn test_seed_prefers_options_then_first_row() {
        let catalog = ProductCatalog::new(
            "flyer",
            "Szórólap",
            vec![
                Combination::new("A5", "170g", "4+4", 500),
                Combination::new("A6", "130g", "1+0", 100),
            ],
        )
        .with_options(ProductOptions {
            size: vec!["A6".to_string()],
            ..Default::default()
        });

        let seed = catalog.seed_selection();
        assert_eq!(seed.size.as_deref(), Some("A6"));
        assert_eq!(seed.paper.as_deref(), Some("170g"));
        assert_eq!(seed.color.as_deref(), Some("4+4"));
        assert_eq!(seed.quantity, Some(500));
    }

    #[test]
    fn test_catalog_serializes_in_wire_shape() {
        let catalog = ProductCatalog::new(
            "flyer",
            "Szórólap",
            vec![Combination::new("A6", "130g", "1+0", 100)],
        );
        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("valid_combinations"));

        let back: ProductCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
