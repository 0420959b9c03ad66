//! Meal CLI commands: log planned slots as eaten, review the day.

use clap::{Args, Subcommand};

use nutrifit_core::PlanSession;

use super::OutputFormat;

#[derive(Args)]
pub struct MealCommand {
    #[command(subcommand)]
    pub command: MealSubcommand,
}

#[derive(Subcommand)]
pub enum MealSubcommand {
    /// Log a planned slot as eaten (requires a saved plan)
    Log {
        /// Slot label or meal type (e.g. "breakfast", "snack")
        meal_type: String,

        /// Slot position within its category (0-based); required to
        /// disambiguate when several slots share a label
        #[arg(long, short)]
        slot: Option<usize>,
    },

    /// Show today's logged meals with reconciled totals
    Day {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl MealCommand {
    pub async fn run(&self, session: &PlanSession) -> Result<(), Box<dyn std::error::Error>> {
        session.refresh(false).await?;

        match &self.command {
            MealSubcommand::Log { meal_type, slot } => {
                session.log_meal(meal_type, *slot).await?;
                println!("Logged {} for {}.", meal_type, session.date());
                Ok(())
            }

            MealSubcommand::Day { format } => {
                let logged = session.logged_meals();

                match format {
                    OutputFormat::Json => {
                        let output = serde_json::json!({
                            "date": session.date().to_string(),
                            "logs": logged,
                            "totals": session.day_totals(),
                            "water_ml": session.water_ml(),
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => {
                        println!("Logged meals - {}", session.date());
                        println!("{}", "=".repeat(44));

                        if logged.is_empty() {
                            println!("Nothing logged yet.");
                        } else {
                            for entry in &logged {
                                println!("  {}", entry);
                            }
                            println!("{}", "-".repeat(44));
                            println!("Consumed: {}", session.day_totals());
                            println!(
                                "Water: {} / {} ml",
                                session.water_ml(),
                                session.water_goal_ml()
                            );
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
