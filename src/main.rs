//! printquote - Main entry point
//!
//! Command-line front end for the calculator's combination resolver.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use printquote::catalog::CatalogSource;
use printquote::catalog_file::CatalogFile;
use printquote::cli::{Cli, Commands, ProductArgs, SelectionArgs};
use printquote::logic::resolver::{AvailabilityView, availability, is_priceable, reconcile};
use printquote::session::CalculatorSession;
use printquote::types::{Attribute, Selection};

/// Initialize the tracing subscriber; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// What the `options`, `check` and `reconcile` commands report
#[derive(Debug, Serialize)]
struct SelectionReport<'a> {
    product: &'a str,
    selection: &'a Selection,
    availability: AvailabilityView,
    priceable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<bool>,
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Products { catalog } => {
            let file = CatalogFile::load_from_file(&catalog)?;
            for product in &file.products {
                println!(
                    "{}\t{}\t{} combinations",
                    product.product_code,
                    product.label,
                    product.combinations.len()
                );
            }
        }
        Commands::Validate { catalog } => {
            info!("Validating catalog file: {:?}", catalog);
            let result = CatalogFile::load_from_file(&catalog)
                .and_then(|file| file.validate().context("Catalog contents are invalid"));
            match result {
                Ok(()) => {
                    info!("Catalog validation successful");
                    println!("✓ Catalog file is valid: {:?}", catalog);
                }
                Err(e) => {
                    error!("Catalog validation failed: {:#}", e);
                    eprintln!("✗ Catalog validation failed: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Options {
            target,
            selection,
            json,
        } => run_options(&target, &selection, json)?,
        Commands::Check {
            target,
            selection,
            json,
        } => {
            if !run_check(&target, &selection, json)? {
                std::process::exit(1);
            }
        }
        Commands::Reconcile {
            target,
            selection,
            json,
        } => run_reconcile(&target, &selection, json)?,
    }

    Ok(())
}

/// Load the product and replay each given value as a user input
fn run_options(target: &ProductArgs, inputs: &SelectionArgs, json: bool) -> Result<()> {
    let file = CatalogFile::load_from_file(&target.catalog)?;
    let mut session = CalculatorSession::new();
    session
        .load_from(&file, &target.product)
        .with_context(|| format!("Failed to load product '{}'", target.product))?;

    for (attribute, raw) in inputs.inputs() {
        let outcome = session.select_text(attribute, raw);
        if outcome.changed {
            info!(%attribute, input = raw, selection = %outcome.selection, "Input auto-corrected");
        }
    }

    let report = SelectionReport {
        product: &target.product,
        selection: session.selection(),
        availability: session.availability(),
        priceable: session.is_priceable(),
        changed: None,
    };
    print_report(&report, json)
}

/// Report whether the literal selection is priceable
fn run_check(target: &ProductArgs, inputs: &SelectionArgs, json: bool) -> Result<bool> {
    let file = CatalogFile::load_from_file(&target.catalog)?;
    let product = file.fetch(&target.product)?;
    let selection = inputs.to_selection();

    let report = SelectionReport {
        product: &target.product,
        selection: &selection,
        availability: availability(product.combinations(), &selection),
        priceable: is_priceable(product.combinations(), &selection),
        changed: None,
    };
    print_report(&report, json)?;
    Ok(report.priceable)
}

/// Reconcile the literal selection against the product's combinations
fn run_reconcile(target: &ProductArgs, inputs: &SelectionArgs, json: bool) -> Result<()> {
    let file = CatalogFile::load_from_file(&target.catalog)?;
    let product = file.fetch(&target.product)?;
    let outcome = reconcile(product.combinations(), &inputs.to_selection());

    let report = SelectionReport {
        product: &target.product,
        selection: &outcome.selection,
        availability: availability(product.combinations(), &outcome.selection),
        priceable: is_priceable(product.combinations(), &outcome.selection),
        changed: Some(outcome.changed),
    };
    print_report(&report, json)
}

fn print_report(report: &SelectionReport<'_>, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    println!("Product:   {}", report.product);
    println!("Selection: {}", report.selection);
    for attribute in Attribute::ORDER {
        let values: Vec<String> = report
            .availability
            .values(attribute)
            .iter()
            .map(|v| match v.to_string() {
                s if s.is_empty() => "<none>".to_string(),
                s => s,
            })
            .collect();
        println!("  {:<9} {}", format!("{}:", attribute), values.join(", "));
    }
    if let Some(changed) = report.changed {
        println!("Changed:   {}", if changed { "yes" } else { "no" });
    }
    if report.priceable {
        println!("✓ A price exists for this selection");
    } else {
        println!("✗ No price for this selection");
    }
    Ok(())
}
