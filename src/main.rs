use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::MarketSettings;
use core_types::SecurityClass;
use ledger::Security;
use market::Market;

/// The entry point for the sample stock exchange.
fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment and defaults still apply.
    dotenvy::dotenv().ok();
    configuration::init_tracing();

    let settings = configuration::load_settings().context("Failed to load market settings")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => handle_demo(&settings),
        Commands::Quote(args) => handle_quote(args, &settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Dividend, P/E and All Share Index calculations over a sample market.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register the sample securities, simulate trades and print the market report.
    Demo,
    /// Print the dividend yield and P/E ratio of one sample security at a given price.
    Quote(QuoteArgs),
}

#[derive(Parser)]
struct QuoteArgs {
    /// The symbol to quote (e.g., "POP").
    #[arg(long)]
    symbol: String,

    /// The price to evaluate the metrics at.
    #[arg(long)]
    price: f64,
}

// ==============================================================================
// Sample Market
// ==============================================================================

/// (symbol, class, last dividend, fixed dividend, par value)
const SAMPLE_SECURITIES: [(&str, SecurityClass, f64, Option<f64>, f64); 5] = [
    ("TEA", SecurityClass::Common, 0.0, None, 100.0),
    ("POP", SecurityClass::Common, 8.0, None, 100.0),
    ("ALE", SecurityClass::Common, 23.0, None, 60.0),
    ("GIN", SecurityClass::Preferred, 8.0, Some(0.02), 100.0),
    ("JOE", SecurityClass::Common, 13.0, None, 250.0),
];

fn sample_market(settings: &MarketSettings) -> anyhow::Result<Market> {
    let market = Market::new();
    for (symbol, class, last_dividend, fixed_dividend, par_value) in SAMPLE_SECURITIES {
        let security =
            Security::with_settings(symbol, class, last_dividend, fixed_dividend, par_value, settings)?;
        market.add_security(security)?;
    }
    Ok(market)
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_demo(settings: &MarketSettings) -> anyhow::Result<()> {
    let market = sample_market(settings)?;

    match market.get_security("GIN") {
        Some(gin) => {
            gin.record_trade(100, true, 150.0)?;
            gin.record_trade(200, false, 155.0)?;
        }
        None => tracing::error!("GIN security not found"),
    }
    if let Some(pop) = market.get_security("POP") {
        pop.record_trade(50, true, 102.5)?;
    }

    let now = Utc::now();
    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Class", "Last Price", "Dividend Yield", "P/E", "VWAP"]);

    for (symbol, vwap) in market.security_vwaps(now, settings.trade_window) {
        let Some(security) = market.get_security(&symbol) else {
            continue;
        };
        let (dividend_yield, pe_ratio) = if vwap > 0.0 {
            (
                format!("{:.4}", security.dividend_yield(vwap)?),
                security
                    .pe_ratio(vwap)
                    .map(|pe| format!("{:.2}", pe))
                    .unwrap_or_else(|_| "n/a".to_string()),
            )
        } else {
            ("n/a".to_string(), "n/a".to_string())
        };
        let last_price = security
            .last_trade()
            .map(|t| format!("{:.2}", t.price))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            symbol,
            security.class().to_string(),
            last_price,
            dividend_yield,
            pe_ratio,
            format!("{:.2}", vwap),
        ]);
    }

    println!("{table}");
    println!(
        "GBCE All Share Index: {:.2}",
        market.all_share_index(now, settings.trade_window)
    );
    Ok(())
}

fn handle_quote(args: QuoteArgs, settings: &MarketSettings) -> anyhow::Result<()> {
    let market = sample_market(settings)?;
    let security = market
        .get_security(&args.symbol)
        .with_context(|| format!("Unknown symbol: {}", args.symbol))?;

    println!("{} ({})", security.symbol(), security.class());
    println!("Dividend Yield: {:.4}", security.dividend_yield(args.price)?);
    match security.pe_ratio(args.price) {
        Ok(pe) => println!("P/E Ratio: {:.2}", pe),
        Err(e) => println!("P/E Ratio: n/a ({})", e),
    }
    Ok(())
}
