//! Grocery CLI commands.
//!
//! The list is the aggregate of every ingredient in the day's plan.
//! Export requires a saved plan, matching the in-app gating.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use nutrifit_core::PlanSession;

use super::OutputFormat;

#[derive(Args)]
pub struct GroceryCommand {
    #[command(subcommand)]
    pub command: GrocerySubcommand,
}

#[derive(Subcommand)]
pub enum GrocerySubcommand {
    /// Show the aggregated grocery list for the day's plan
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Write the grocery list as CSV (requires a saved plan)
    Export {
        /// Output file, defaults to grocery-<date>.csv
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl GroceryCommand {
    pub async fn run(&self, session: &PlanSession) -> Result<(), Box<dyn std::error::Error>> {
        session.refresh(false).await?;

        match &self.command {
            GrocerySubcommand::List { format } => {
                let items = session.grocery_list();

                match format {
                    OutputFormat::Json => {
                        let output = serde_json::json!({
                            "date": session.date().to_string(),
                            "items": items,
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        println!("Grocery list - {}", session.date());
                        println!("{}", "=".repeat(44));

                        if items.is_empty() {
                            println!("No items. Generate a plan first.");
                        } else {
                            for item in &items {
                                println!("[ ] {}", item);
                            }
                            println!("{}", "-".repeat(44));
                            println!("{} item(s)", items.len());
                        }
                    }
                }
                Ok(())
            }

            GrocerySubcommand::Export { output } => {
                let csv = session.export_grocery_csv()?;
                let path = output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(format!("grocery-{}.csv", session.date())));

                std::fs::write(&path, &csv)?;
                let rows = csv.lines().count().saturating_sub(1);
                println!("Exported {} item(s) to {}", rows, path.display());
                Ok(())
            }
        }
    }
}
