//! Veggie Order CLI - browse the catalog, fill the cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! veggie catalog --category "Leafy Greens"
//! veggie catalog --search tomato
//! veggie categories
//!
//! # Cart
//! veggie cart add 001 500 --unit g
//! veggie cart step 001 -0.1
//! veggie cart show
//!
//! # Place the order (fields default to the saved profile)
//! veggie checkout --name "Asha" --phone 9876543210 --address "12 Market Road"
//!
//! # Past orders
//! veggie orders
//! ```
//!
//! # Environment Variables
//!
//! See `veggie_order_storefront::config`. Logs go to stderr; set `RUST_LOG`
//! to change the level and `VEGGIE_LOG_FORMAT=json` for JSON lines.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use veggie_order_core::Unit;
use veggie_order_storefront::AppState;
use veggie_order_storefront::config::StorefrontConfig;

mod commands;

use commands::{CheckoutArgs, CliError};

#[derive(Parser)]
#[command(name = "veggie")]
#[command(author, version, about = "Veggie Order Magic storefront")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available items
    Catalog {
        /// Only items in this category ("All" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Only items whose name, description or category match
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List categories
    Categories,
    /// Show or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place the order in the cart
    Checkout {
        /// Customer name (default: saved profile)
        #[arg(long)]
        name: Option<String>,

        /// Phone number (default: saved profile)
        #[arg(long)]
        phone: Option<String>,

        /// Delivery address (default: saved profile)
        #[arg(long)]
        address: Option<String>,

        /// Delivery instructions
        #[arg(long)]
        note: Option<String>,
    },
    /// Show the saved delivery details
    Profile,
    /// List past orders
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents
    Show,
    /// Add an item
    Add {
        /// Catalog item id
        id: String,

        /// Quantity in `unit`
        quantity: Decimal,

        /// Unit (`kg`, `g`, `piece`; default: the item's unit)
        #[arg(short, long)]
        unit: Option<Unit>,
    },
    /// Set the quantity of an item (below 0.1 removes it)
    Set {
        /// Catalog item id
        id: String,

        /// New quantity in the item's unit
        #[arg(allow_hyphen_values = true)]
        quantity: Decimal,
    },
    /// Change the quantity of an item by a signed amount
    Step {
        /// Catalog item id
        id: String,

        /// Amount to add, e.g. 0.1 or -0.1
        #[arg(allow_hyphen_values = true)]
        delta: Decimal,
    },
    /// Remove an item
    Remove {
        /// Catalog item id
        id: String,
    },
    /// Remove every item
    Clear,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,veggie_order_storefront=info,veggie_order_cli=info".into());

    let json = std::env::var("VEGGIE_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env().map_err(veggie_order_storefront::AppError::from)?;
    let mut state = AppState::open(config)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Catalog { category, search } => {
            commands::catalog::list(&state, category.as_deref(), search.as_deref(), &mut out)?;
        }
        Commands::Categories => commands::catalog::categories(&state, &mut out)?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state, &mut out)?,
            CartAction::Add { id, quantity, unit } => {
                commands::cart::add(&mut state, &id, quantity, unit, &mut out)?;
            }
            CartAction::Set { id, quantity } => {
                commands::cart::set(&mut state, &id, quantity, &mut out)?;
            }
            CartAction::Step { id, delta } => {
                commands::cart::step(&mut state, &id, delta, &mut out)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&mut state, &id, &mut out)?,
            CartAction::Clear => commands::cart::clear(&mut state, &mut out)?,
        },
        Commands::Checkout {
            name,
            phone,
            address,
            note,
        } => {
            let args = CheckoutArgs {
                name,
                phone,
                address,
                note,
            };
            let launcher = commands::checkout::StdoutLauncher;
            commands::checkout::place_order(&mut state, args, &launcher, &mut out)?;
        }
        Commands::Profile => commands::account::profile(&state, &mut out)?,
        Commands::Orders => commands::account::orders(&state, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

/// Log internal failures and tell the customer what went wrong.
fn report(error: &CliError) {
    let message = match error {
        CliError::App(e) => {
            if e.is_internal() {
                tracing::error!(error = %e, "Command failed");
            }
            e.user_message()
        }
        CliError::Io(e) => {
            tracing::error!(error = %e, "Failed to write output");
            return;
        }
    };

    let _ = writeln!(std::io::stderr().lock(), "{message}");
}
