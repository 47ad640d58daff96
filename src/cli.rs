use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{Attribute, Selection};

/// printquote - print-shop calculator option resolver
#[derive(Parser)]
#[command(name = "printquote")]
#[command(about = "Inspect calculator catalogs and resolve print option selections")]
#[command(version)]
pub struct Cli {
    /// Verbose mode: log resolver corrections and session transitions.
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the products of a catalog file
    Products {
        /// Path to the catalog JSON file
        catalog: PathBuf,
    },
    /// Load a product, apply choices one by one, and show what stays selectable
    Options {
        #[command(flatten)]
        target: ProductArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether an exact selection has a price (exit status 1 if not)
    Check {
        #[command(flatten)]
        target: ProductArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Auto-correct a selection onto the product's valid combinations
    Reconcile {
        #[command(flatten)]
        target: ProductArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a catalog file
    Validate {
        /// Path to the catalog JSON file to validate
        catalog: PathBuf,
    },
}

/// Which catalog file and product to work on
#[derive(Args, Debug, Clone)]
pub struct ProductArgs {
    /// Path to the catalog JSON file
    #[arg(short, long)]
    pub catalog: PathBuf,
    /// Product code (e.g., flyer)
    #[arg(short, long)]
    pub product: String,
}

/// Attribute values given on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Size (e.g., A5)
    #[arg(long)]
    pub size: Option<String>,
    /// Paper (e.g., 130g)
    #[arg(long)]
    pub paper: Option<String>,
    /// Color mode (e.g., 4+0)
    #[arg(long)]
    pub color: Option<String>,
    /// Quantity; text that is not a whole number is treated as unset
    #[arg(long, alias = "qty")]
    pub quantity: Option<String>,
}

impl SelectionArgs {
    /// Given values in correction order
    pub fn inputs(&self) -> Vec<(Attribute, &str)> {
        [
            (Attribute::Size, self.size.as_deref()),
            (Attribute::Paper, self.paper.as_deref()),
            (Attribute::Color, self.color.as_deref()),
            (Attribute::Quantity, self.quantity.as_deref()),
        ]
        .into_iter()
        .filter_map(|(attribute, value)| value.map(|v| (attribute, v)))
        .collect()
    }

    /// Literal selection; attributes not given stay unset
    pub fn to_selection(&self) -> Selection {
        let mut selection = Selection::new();
        for (attribute, raw) in self.inputs() {
            selection.set_text(attribute, raw);
        }
        selection
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
