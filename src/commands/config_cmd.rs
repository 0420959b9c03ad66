use clap::{Args, Subcommand};
use std::fs;

use crate::config::Config;

use super::OutputFormat;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("cache_ttl_secs: {}", config.cache_ttl_secs.value);
                        println!("  source: {}", config.cache_ttl_secs.source);
                        println!();

                        println!("service.server_url: {}", display_or_unset(&config.service.server_url));
                        println!(
                            "service.api_key: {}",
                            if config.service.api_key.is_some() {
                                "(set)"
                            } else {
                                "(not set)"
                            }
                        );
                        println!();

                        let profile = &config.profile;
                        println!("profile.diet_type: {}", profile.diet_type);
                        println!("profile.meals_per_day: {}", profile.meals_per_day);
                        println!("profile.snacks_per_day: {}", profile.snacks_per_day);
                        println!(
                            "profile.cooking_time_preference: {}",
                            profile.cooking_time_preference
                        );
                        if !profile.allergies.is_empty() {
                            println!("profile.allergies: {}", profile.allergies.join(", "));
                        }
                        if !profile.favorite_cuisines.is_empty() {
                            println!(
                                "profile.favorite_cuisines: {}",
                                profile.favorite_cuisines.join(", ")
                            );
                        }
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = Config::default_config_path();

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'nutrifit config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let default_config = r#"# nutrifit configuration

# Remote nutrition service
service:
  # server_url: https://api.example.com/nutrition
  # api_key: your-api-key

# How long plan responses may be served from the local cache (seconds)
cache_ttl_secs: 300

# Nutrition profile from onboarding
profile:
  diet_type: balanced
  allergies: []
  favorite_cuisines: []
  meals_per_day: 3
  snacks_per_day: 2
  cooking_time_preference: any
"#;

                fs::write(&config_path, default_config)?;
                println!("Created config file: {}", config_path.display());
                println!("Edit it to point at your nutrition service.");
                Ok(())
            }
        }
    }
}

fn display_or_unset(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(not set)")
}
