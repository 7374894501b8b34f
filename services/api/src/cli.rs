use crate::commands::{
    run_eligibility, run_quote, run_tax_credits, run_tiers, EligibilityArgs, QuoteArgs,
    TaxCreditArgs, TiersArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use solar_economics::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Solar Economics Engine",
    about = "Size, price, and finance residential solar from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Size a system and price all four financing options
    Quote(QuoteArgs),
    /// List the financing structures offered for a state and credit score
    Eligibility(EligibilityArgs),
    /// Resolve federal and state tax credits for a system cost
    TaxCredits(TaxCreditArgs),
    /// Compare conservative, standard, and aggressive system designs
    Tiers(TiersArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Quote(args) => run_quote(args),
        Command::Eligibility(args) => run_eligibility(args),
        Command::TaxCredits(args) => run_tax_credits(args),
        Command::Tiers(args) => run_tiers(args),
    }
}
