pub mod commands;
pub mod parser;


pub use parser::{Cli, Commands};

use crate::config::{ConfigManager, Environment, Settings};
use crate::core::SandboxClient;
use crate::utils::validate_box_name;
use anyhow::{Context, Result};

/// Everything a subcommand needs besides its own arguments.
pub struct CommandContext {
    pub settings: Settings,
    pub default_box: Option<String>,
    pub install_dir: Option<std::path::PathBuf>,
}

impl CommandContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let settings = ConfigManager::load_or_default().context("Failed to load sbiectl settings")?;
        Ok(Self {
            settings,
            default_box: cli.default_box.clone(),
            install_dir: cli.install_dir.clone(),
        })
    }

    pub fn client(&self) -> Result<SandboxClient> {
        let config = self
            .settings
            .to_client_config(self.default_box.clone(), self.install_dir.clone());
        SandboxClient::with_environment(config, &Environment::from_process())
            .context("Failed to initialise Sandboxie client")
    }
}

pub fn execute_command(cli: Cli) -> Result<()> {
    if let Some(name) = &cli.default_box {
        validate_box_name(name)?;
    }
    validate_args(&cli.command)?;

    // Completion output must work without settings or a Sandboxie install.
    if let Commands::Completion(args) = &cli.command {
        return commands::completion::execute(args);
    }

    let ctx = CommandContext::from_cli(&cli)?;

    match cli.command {
        Commands::Start(args) => commands::start::execute(&ctx, args),
        Commands::Create(args) => commands::sandbox::create(&ctx, args),
        Commands::Destroy(args) => commands::sandbox::destroy(&ctx, args),
        Commands::Reload => commands::control::reload(&ctx),
        Commands::Terminate(args) => commands::control::terminate(&ctx, args),
        Commands::Ps(args) => commands::ps::execute(&ctx, args),
        Commands::DeleteContents(args) => commands::control::delete_contents(&ctx, args),
        Commands::Boxes(args) => commands::sandbox::list(&ctx, args),
        Commands::Show(args) => commands::sandbox::show(&ctx, args),
        Commands::Config(args) => commands::config::execute(&ctx, args),
        Commands::Completion(args) => commands::completion::execute(&args),
    }
}

/// Checks box names given on the command line before settings are loaded or
/// the engine is touched.
pub fn validate_args(command: &Commands) -> Result<()> {
    match command {
        Commands::Start(args) => args.validate()?,
        Commands::Create(args) => args.validate()?,
        Commands::Destroy(args) => args.validate()?,
        Commands::Terminate(args) => validate_optional_box(args.box_name.as_deref())?,
        Commands::Ps(args) => validate_optional_box(args.box_name.as_deref())?,
        Commands::DeleteContents(args) => args.validate()?,
        Commands::Reload
        | Commands::Boxes(_)
        | Commands::Show(_)
        | Commands::Config(_)
        | Commands::Completion(_) => {}
    }
    Ok(())
}

fn validate_optional_box(name: Option<&str>) -> crate::utils::Result<()> {
    match name {
        Some(name) => validate_box_name(name),
        None => Ok(()),
    }
}
