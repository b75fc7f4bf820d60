use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trainer_voice::{
    configuration::get_configuration, logging::setup_tracing, registry::ConfigurationRegistry,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Settings file. Defaults to configuration/settings with dev overrides
    #[clap(long)]
    config: Option<PathBuf>,
    /// Sets the level of verbosity
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Log as json
    #[clap(long)]
    json_logs: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current configuration without the API key
    Dump {
        /// Replace the configured API key before dumping
        #[clap(long)]
        api_key: Option<String>,
    },
    /// Print the voice used by a persona
    Voice {
        persona: String,
        /// Use the fallback voice for unknown personas
        #[clap(long)]
        fallback: bool,
    },
    /// Print the synthesis request body for a persona line
    Request { persona: String, text: String },
    /// Check the conversation assistant settings
    Check,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.verbose, args.json_logs);

    let app_config = get_configuration(args.config).context("Failed to load configuration")?;
    let mut registry = ConfigurationRegistry::from_app_config(&app_config)?;

    match args.command {
        Command::Dump { api_key } => {
            if let Some(api_key) = api_key {
                registry.set_api_key(api_key);
            }
            registry.debug_dump();
            println!("{}", serde_json::to_string_pretty(&registry.debug_report())?);
        }
        Command::Voice { persona, fallback } => {
            let profile = if fallback {
                registry.lookup_voice_profile_or_fallback(&persona)
            } else {
                registry.lookup_voice_profile(&persona)
            };
            let profile = profile.with_context(|| format!("unknown persona {}", persona))?;
            println!("{}", serde_json::to_string_pretty(profile)?);
        }
        Command::Request { persona, text } => {
            let request = registry
                .synthesis_request(&persona, &text)
                .with_context(|| format!("unknown persona {}", persona))?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::Check => {
            if !app_config.assistant.check_environment() {
                anyhow::bail!("Assistant configuration is incomplete");
            }
        }
    }

    Ok(())
}
