//! Plan CLI commands.
//!
//! The nutrition screen's lifecycle actions: show the day, refresh or
//! regenerate the plan, and save it to unlock logging and grocery export.

use clap::{Args, Subcommand};

use nutrifit_core::{PlanSession, PlanState};

use super::OutputFormat;

#[derive(Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand)]
pub enum PlanSubcommand {
    /// Show the day's slots, macros, and water goal
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Reload the plan from the server
    Refresh {
        /// Skip caches and fetch fresh content
        #[arg(long)]
        force: bool,
    },

    /// Regenerate the plan. The new content is unconfirmed, so a
    /// previously saved plan goes back to generated.
    Regenerate,

    /// Show the recipe (ingredients and steps) for a planned slot
    Recipe {
        /// Slot label or meal type (e.g. "lunch", "snack")
        label: String,

        /// Slot position within its category (0-based)
        #[arg(long, short)]
        slot: Option<usize>,
    },

    /// Save the plan, unlocking meal logging and grocery export
    Save,
}

impl PlanCommand {
    pub async fn run(&self, session: &PlanSession) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PlanSubcommand::Show { format } => {
                session.refresh(false).await?;
                print_day(session, format)?;
                Ok(())
            }

            PlanSubcommand::Refresh { force } => {
                let state = session.refresh(*force).await?;
                println!("Plan refreshed for {} (state: {})", session.date(), state);
                Ok(())
            }

            PlanSubcommand::Regenerate => {
                let state = session.regenerate().await?;
                if state == PlanState::Generated {
                    println!(
                        "Plan regenerated for {}. Review it and save to confirm.",
                        session.date()
                    );
                } else {
                    println!("Plan regenerated for {} (state: {})", session.date(), state);
                }
                Ok(())
            }

            PlanSubcommand::Recipe { label, slot } => {
                session.refresh(false).await?;
                let target = session.swap_target(label, *slot)?;
                let slots = session.slots();

                match slots.get(&target.key).and_then(|s| s.planned.as_ref()) {
                    Some(entry) => print!("{}", entry),
                    None => println!("No planned entry in {}.", target.key),
                }
                Ok(())
            }

            PlanSubcommand::Save => {
                session.refresh(false).await?;
                session.save().await?;
                println!(
                    "Plan saved for {}. Meal logging and grocery export are now available.",
                    session.date()
                );
                Ok(())
            }
        }
    }
}

fn print_day(
    session: &PlanSession,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let slots = session.slots();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "date": session.date().to_string(),
                "state": session.plan_state(),
                "meals": slots.meals,
                "snacks": slots.snacks,
                "plan_macros": session.plan_macros(),
                "water_goal_ml": session.water_goal_ml(),
                "suggestions": session.suggestions(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("Meal plan - {} ({})", session.date(), session.plan_state());
            println!("{}", "=".repeat(60));

            if slots.meals.is_empty() && slots.snacks.is_empty() {
                println!("No plan yet. Run 'nutrifit plan refresh' to generate one.");
                return Ok(());
            }

            for slot in slots.iter() {
                let swap_hint = if slot.can_swap() { "" } else { "  (logged only)" };
                println!("{}{}", slot, swap_hint);
            }

            println!("{}", "-".repeat(60));
            println!("Planned: {}", session.plan_macros());
            println!("Water goal: {} ml", session.water_goal_ml());

            let suggestions = session.suggestions();
            if !suggestions.is_empty() {
                println!("\nSuggestions:");
                for suggestion in &suggestions {
                    println!("  - {}", suggestion);
                }
            }

            if session.plan_state() == PlanState::Generated {
                println!("\nRun 'nutrifit plan save' to confirm this plan.");
            }
        }
    }
    Ok(())
}
