//! Swap CLI commands.
//!
//! Slots are addressed by label plus position (`--slot`), because two
//! snack slots share the same label. The engine records the resolved
//! position and applies the swap against it, never against the label.

use clap::{Args, Subcommand};

use nutrifit_core::PlanSession;

#[derive(Args)]
pub struct SwapCommand {
    #[command(subcommand)]
    pub command: SwapSubcommand,
}

#[derive(Subcommand)]
pub enum SwapSubcommand {
    /// List alternatives for a slot
    Suggest {
        /// Slot label or meal type (e.g. "lunch", "snack")
        label: String,

        /// Slot position within its category (0-based); required to
        /// disambiguate when several slots share a label
        #[arg(long, short)]
        slot: Option<usize>,

        /// How many alternatives to request (max 3)
        #[arg(long, default_value_t = 3)]
        count: usize,

        /// Target calories for the replacement
        #[arg(long)]
        calories: Option<f64>,
    },

    /// Replace the slot's content with the named alternative
    Apply {
        /// Slot label or meal type
        label: String,

        /// Title of the alternative to swap in
        title: String,

        /// Slot position within its category (0-based)
        #[arg(long, short)]
        slot: Option<usize>,
    },
}

impl SwapCommand {
    pub async fn run(&self, session: &PlanSession) -> Result<(), Box<dyn std::error::Error>> {
        session.refresh(false).await?;

        match &self.command {
            SwapSubcommand::Suggest {
                label,
                slot,
                count,
                calories,
            } => {
                let target = session.swap_target(label, *slot)?;
                let alternatives = session.suggest_swaps(&target, *count, *calories).await?;

                println!(
                    "Alternatives for {} \"{}\" ({}):",
                    target.meal_type, target.current_title, target.key
                );
                for (i, alternative) in alternatives.iter().enumerate() {
                    match &alternative.details {
                        Some(entry) => println!(
                            "  {}. {} ({} kcal, P {}g / C {}g / F {}g)",
                            i + 1,
                            alternative.title,
                            entry.calories.round() as i64,
                            entry.protein_g.round() as i64,
                            entry.carbs_g.round() as i64,
                            entry.fats_g.round() as i64
                        ),
                        None => println!("  {}. {}", i + 1, alternative.title),
                    }
                }
                println!(
                    "\nApply one with: nutrifit swap apply {} \"<title>\" --slot {}",
                    label, target.key.index
                );
                Ok(())
            }

            SwapSubcommand::Apply { label, title, slot } => {
                let target = session.swap_target(label, *slot)?;

                // Re-fetch suggestions so the detailed alternative object
                // can ride along; a bare title wrapper is the fallback.
                let alternatives = session
                    .suggest_swaps(&target, nutrifit_core::MAX_ALTERNATIVES, None)
                    .await
                    .unwrap_or_default();

                let state = session.apply_swap(&target, &alternatives, title).await?;

                let slots = session.slots();
                let new_title = slots
                    .get(&target.key)
                    .map(|slot| slot.title.clone())
                    .unwrap_or_else(|| title.clone());
                println!(
                    "Swapped {} to \"{}\" (plan state: {})",
                    target.key, new_title, state
                );
                Ok(())
            }
        }
    }
}
