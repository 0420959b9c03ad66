pub mod config_cmd;
pub mod grocery;
pub mod meal;
pub mod plan;
pub mod swap;

pub use config_cmd::ConfigCommand;
pub use grocery::GroceryCommand;
pub use meal::MealCommand;
pub use plan::PlanCommand;
pub use swap::SwapCommand;

use clap::ValueEnum;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
