//! Canonical data model for the price calculator
//!
//! Every catalog row and every user selection is expressed in these types
//! before it reaches the resolver. Wire-level naming differences (`qty` vs
//! `quantity`, quantities sent as text) are absorbed here and in
//! [`crate::catalog`], never inside [`crate::logic::resolver`].

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// One of the four selectable axes of a printed product.
///
/// Declaration order is the fixed correction order used by
/// [`crate::logic::resolver::reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Attribute {
    #[strum(serialize = "size")]
    Size,
    #[strum(serialize = "paper")]
    Paper,
    #[strum(serialize = "color")]
    Color,
    #[strum(to_string = "quantity", serialize = "qty")]
    Quantity,
}

impl Attribute {
    /// Correction order: size, paper, color, quantity.
    pub const ORDER: [Attribute; 4] = [
        Attribute::Size,
        Attribute::Paper,
        Attribute::Color,
        Attribute::Quantity,
    ];

    /// Position of this attribute in [`Attribute::ORDER`]
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Size => 0,
            Self::Paper => 1,
            Self::Color => 2,
            Self::Quantity => 3,
        }
    }

    /// The three attributes other than `self`, in correction order
    pub fn others(self) -> impl Iterator<Item = Attribute> {
        Self::ORDER.into_iter().filter(move |a| *a != self)
    }

    /// The attributes that precede `self` in correction order
    pub fn preceding(self) -> impl Iterator<Item = Attribute> {
        Self::ORDER.into_iter().take(self.index())
    }
}

/// A single value on some attribute axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Quantity(u32),
    Text(String),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Quantity(_) => None,
        }
    }

    pub fn as_quantity(&self) -> Option<u32> {
        match self {
            Self::Quantity(q) => Some(*q),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Quantity(q) => write!(f, "{}", q),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for AttributeValue {
    fn from(value: u32) -> Self {
        Self::Quantity(value)
    }
}

/// One row of a product catalog: a 4-tuple for which a price exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Combination {
    pub size: String,
    pub paper: String,
    pub color: String,
    pub quantity: u32,
}

impl Combination {
    pub fn new(
        size: impl Into<String>,
        paper: impl Into<String>,
        color: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            size: size.into(),
            paper: paper.into(),
            color: color.into(),
            quantity,
        }
    }

    /// Owned value of one attribute of this row
    pub fn value(&self, attribute: Attribute) -> AttributeValue {
        match attribute {
            Attribute::Size => AttributeValue::Text(self.size.clone()),
            Attribute::Paper => AttributeValue::Text(self.paper.clone()),
            Attribute::Color => AttributeValue::Text(self.color.clone()),
            Attribute::Quantity => AttributeValue::Quantity(self.quantity),
        }
    }

    /// True if the selection leaves `attribute` unset or holds this row's value.
    pub fn agrees_with(&self, selection: &Selection, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Size => selection.size.as_deref().is_none_or(|v| v == self.size),
            Attribute::Paper => selection.paper.as_deref().is_none_or(|v| v == self.paper),
            Attribute::Color => selection.color.as_deref().is_none_or(|v| v == self.color),
            Attribute::Quantity => selection.quantity.is_none_or(|q| q == self.quantity),
        }
    }

    /// True if every attribute of the selection is set and equal to this row.
    pub fn matches_exactly(&self, selection: &Selection) -> bool {
        selection.size.as_deref() == Some(self.size.as_str())
            && selection.paper.as_deref() == Some(self.paper.as_str())
            && selection.color.as_deref() == Some(self.color.as_str())
            && selection.quantity == Some(self.quantity)
    }
}

/// The user's current choice for each attribute.
///
/// `None` means unset, which the resolver treats as unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub paper: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, alias = "qty", deserialize_with = "deserialize_quantity")]
    pub quantity: Option<u32>,
}

impl Selection {
    /// Create an empty selection with every attribute unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding exactly the values of `combination`
    pub fn from_combination(combination: &Combination) -> Self {
        Self {
            size: Some(combination.size.clone()),
            paper: Some(combination.paper.clone()),
            color: Some(combination.color.clone()),
            quantity: Some(combination.quantity),
        }
    }

    /// Builder-style setter
    pub fn with(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.set(attribute, value.into());
        self
    }

    /// Current value of `attribute`, if set
    pub fn get(&self, attribute: Attribute) -> Option<AttributeValue> {
        match attribute {
            Attribute::Size => self.size.clone().map(AttributeValue::Text),
            Attribute::Paper => self.paper.clone().map(AttributeValue::Text),
            Attribute::Color => self.color.clone().map(AttributeValue::Text),
            Attribute::Quantity => self.quantity.map(AttributeValue::Quantity),
        }
    }

    pub fn is_set(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Size => self.size.is_some(),
            Attribute::Paper => self.paper.is_some(),
            Attribute::Color => self.color.is_some(),
            Attribute::Quantity => self.quantity.is_some(),
        }
    }

    /// True if all four attributes hold a value
    pub fn is_complete(&self) -> bool {
        Attribute::ORDER.iter().all(|a| self.is_set(*a))
    }

    /// Whether the current value of `attribute` equals `value`
    pub fn holds(&self, attribute: Attribute, value: &AttributeValue) -> bool {
        match (attribute, value) {
            (Attribute::Size, AttributeValue::Text(v)) => self.size.as_deref() == Some(v.as_str()),
            (Attribute::Paper, AttributeValue::Text(v)) => {
                self.paper.as_deref() == Some(v.as_str())
            }
            (Attribute::Color, AttributeValue::Text(v)) => {
                self.color.as_deref() == Some(v.as_str())
            }
            (Attribute::Quantity, AttributeValue::Quantity(q)) => self.quantity == Some(*q),
            (Attribute::Quantity, AttributeValue::Text(t)) => {
                parse_quantity(t).is_some_and(|q| self.quantity == Some(q))
            }
            // A number never names a size, paper or color
            (_, AttributeValue::Quantity(_)) => false,
        }
    }

    /// Set `attribute` to `value`, coercing across text and number.
    ///
    /// A quantity that cannot be read as a whole number leaves the attribute
    /// unset rather than failing.
    pub fn set(&mut self, attribute: Attribute, value: AttributeValue) {
        match attribute {
            Attribute::Size => self.size = Some(value.to_string()),
            Attribute::Paper => self.paper = Some(value.to_string()),
            Attribute::Color => self.color = Some(value.to_string()),
            Attribute::Quantity => {
                self.quantity = match value {
                    AttributeValue::Quantity(q) => Some(q),
                    AttributeValue::Text(t) => parse_quantity(&t),
                }
            }
        }
    }

    /// Set `attribute` from raw user input text.
    pub fn set_text(&mut self, attribute: Attribute, raw: &str) {
        self.set(attribute, AttributeValue::Text(raw.to_string()));
    }

    pub fn clear(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::Size => self.size = None,
            Attribute::Paper => self.paper = None,
            Attribute::Color => self.color = None,
            Attribute::Quantity => self.quantity = None,
        }
    }

    /// The exact combination this selection denotes, if every slot is set
    pub fn to_combination(&self) -> Option<Combination> {
        Some(Combination {
            size: self.size.clone()?,
            paper: self.paper.clone()?,
            color: self.color.clone()?,
            quantity: self.quantity?,
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for attribute in Attribute::ORDER {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            match self.get(attribute) {
                Some(value) => write!(f, "{}={}", attribute, value)?,
                None => write!(f, "{}=<unset>", attribute)?,
            }
        }
        Ok(())
    }
}

/// Payload of a price request, built only from a priceable selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub size: String,
    pub paper: String,
    pub color: String,
    pub qty: u32,
    pub lamination: bool,
}

impl QuoteRequest {
    pub fn from_combination(combination: &Combination, lamination: bool) -> Self {
        Self {
            size: combination.size.clone(),
            paper: combination.paper.clone(),
            color: combination.color.clone(),
            qty: combination.quantity,
            lamination,
        }
    }
}

// ============================================================================
// Quantity coercion
// ============================================================================

/// Read a quantity from user or wire text.
///
/// Accepts surrounding whitespace and integral decimals (`"100"`, `" 250 "`,
/// `"500.0"`). Anything else yields `None`.
pub fn parse_quantity(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<u32>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(quantity_from_f64))
}

pub(crate) fn quantity_from_f64(n: f64) -> Option<u32> {
    if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

/// Quantity as it may appear on the wire: number, text, or something else.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawQuantity {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl RawQuantity {
    pub(crate) fn normalize(&self) -> Option<u32> {
        match self {
            Self::Number(n) => quantity_from_f64(*n),
            Self::Text(t) => parse_quantity(t),
            Self::Other(_) => None,
        }
    }
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawQuantity>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.normalize()))
}
