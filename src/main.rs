use clap::{Parser, Subcommand};

mod cmd;
mod core;
mod utils;

#[derive(Parser, Debug)]
#[command(
    name = "taxpack",
    version,
    about = "Build tax-ready export packages from raw income, expense and mileage rows"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the tax export package and print it as JSON
    Build(cmd::build::BuildCommand),
    /// Check raw rows for blocking errors and warnings
    Validate(cmd::validate::ValidateCommand),
    /// Display Schedule C totals and rollups
    Summary(cmd::summary::SummaryCommand),
    /// Export package row-level detail as CSV
    Rows(cmd::rows::RowsCommand),
    /// Show the standard mileage rate table
    Rates(cmd::rates::RatesCommand),
    /// Print the expected input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Build(command) => command.exec(),
        Command::Validate(command) => command.exec(),
        Command::Summary(command) => command.exec(),
        Command::Rows(command) => command.exec(),
        Command::Rates(command) => command.exec(),
        Command::Schema(command) => command.exec(),
    }
}
