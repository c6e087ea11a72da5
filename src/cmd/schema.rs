//! Schema command - print expected input formats

use crate::core::rows::ExportInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the input snapshot
    JsonSchema,
    /// A minimal example snapshot
    Example,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(ExportInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::Example => println!("{}", EXAMPLE_INPUT.trim()),
        }
        Ok(())
    }
}

const EXAMPLE_INPUT: &str = r#"
{
  "owner": "user-1",
  "gigs": [
    {
      "id": "gig-1",
      "date": "2024-03-01",
      "source": "Rideshare",
      "payer": "payer-1",
      "title": "Friday night shift",
      "city": "Austin",
      "base_amount": 180.50,
      "tips": 22.00,
      "fees": 12.40,
      "paid": true
    }
  ],
  "expenses": [
    {
      "id": "exp-1",
      "date": "2024-03-02",
      "category": "Meals & Entertainment",
      "amount": 48.00,
      "receipt_url": "https://receipts.example/exp-1.pdf"
    }
  ],
  "mileage": [
    {
      "id": "trip-1",
      "date": "2024-03-01",
      "miles": 88.4,
      "purpose": "Passenger trips",
      "origin": "Home",
      "destination": "Downtown"
    }
  ],
  "invoices": [
    {
      "id": "inv-1",
      "client": "Acme Co",
      "number": "2024-007",
      "payments": [
        {"id": "pay-1", "date": "2024-05-01", "amount": 1500.00}
      ]
    }
  ],
  "subcontractor_payments": [
    {"id": "sub-1", "date": "2024-06-01", "payee": "Sound Tech", "amount": 250.00}
  ],
  "payers": [
    {"id": "payer-1", "name": "Big Venue LLC", "tax_id": "12-3456789"}
  ]
}
"#;
