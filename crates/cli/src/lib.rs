pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use shopfront_db::DEMO_SESSION;

#[derive(Debug, Parser)]
#[command(
    name = "shopfront",
    about = "Shopfront recommendations CLI",
    long_about = "Operate the Shopfront recommendation engine: personalized picks, \
                  similar-product lookups, trending lists, migrations, and readiness checks.",
    after_help = "Examples:\n  shopfront recommend --session demo-shopper\n  shopfront similar 3 --limit 5\n  shopfront doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Personalized recommendations for a shopper session")]
    Recommend {
        #[arg(long, default_value = DEMO_SESSION, help = "Shopper session id")]
        session: String,
        #[arg(long, help = "Maximum number of picks (defaults to configured limit)")]
        limit: Option<usize>,
    },
    #[command(about = "Products similar to one product, recording the view in session history")]
    Similar {
        #[arg(help = "Source product id")]
        product_id: i64,
        #[arg(long, default_value = DEMO_SESSION, help = "Shopper session id")]
        session: String,
        #[arg(long, help = "Maximum number of picks (defaults to configured limit)")]
        limit: Option<usize>,
    },
    #[command(about = "Catalog-wide trending products")]
    Trending {
        #[arg(long, help = "Maximum number of picks (defaults to configured limit)")]
        limit: Option<usize>,
        #[arg(long, value_delimiter = ',', help = "Product ids to leave out")]
        exclude: Vec<i64>,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo storefront dataset")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate configuration and database connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { session, limit } => commands::recommend::run(&session, limit),
        Command::Similar { product_id, session, limit } => {
            commands::similar::run(product_id, &session, limit)
        }
        Command::Trending { limit, exclude } => commands::trending::run(limit, &exclude),
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
