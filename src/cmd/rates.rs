//! Rates command - the standard mileage rate table

use crate::core::config::BuilderConfig;
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct RatesCommand {
    /// Output as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl RatesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = BuilderConfig::default();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&config.mileage_rates)?);
            return Ok(());
        }

        let rows: Vec<RateRow> = config
            .mileage_rates
            .entries()
            .iter()
            .map(|(year, rate)| RateRow {
                year: *year,
                rate: format!("${}/mile", rate),
            })
            .collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{}", table);
        println!();
        println!("Years beyond the table use the most recent published rate.");
        Ok(())
    }
}

#[derive(Tabled)]
struct RateRow {
    #[tabled(rename = "Tax Year")]
    year: i32,
    #[tabled(rename = "Standard Rate")]
    rate: String,
}
