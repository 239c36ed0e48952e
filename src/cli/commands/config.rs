use crate::cli::parser::{ConfigArgs, ConfigCommands};
use crate::cli::CommandContext;
use crate::config::{resolve_install_dir, ConfigManager, Environment, Settings};
use anyhow::{bail, Context, Result};

pub fn execute(ctx: &CommandContext, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => execute_path(ctx),
        ConfigCommands::Show => execute_show(ctx),
        ConfigCommands::Init { force } => execute_init(force),
    }
}

fn execute_path(ctx: &CommandContext) -> Result<()> {
    println!("settings:     {}", ConfigManager::get_settings_path().display());

    let config = ctx
        .settings
        .to_client_config(ctx.default_box.clone(), ctx.install_dir.clone());
    let env = Environment::from_process();
    let install_dir = resolve_install_dir(&env, config.install_dir.as_deref());
    println!("install dir:  {}", install_dir.display());

    match ctx.client() {
        Ok(client) => {
            println!("Sandboxie.ini: {}", client.config_path().display());
            println!("launcher:     {}", client.launcher_path().display());
        }
        Err(e) => println!("Sandboxie.ini: not found ({e:#})"),
    }
    Ok(())
}

fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = ctx
        .settings
        .to_client_config(ctx.default_box.clone(), ctx.install_dir.clone());
    let effective = Settings {
        default_box: Some(config.default_box),
        install_dir: Some(resolve_install_dir(
            &Environment::from_process(),
            config.install_dir.as_deref(),
        )),
        launch: config.flags,
    };
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}

fn execute_init(force: bool) -> Result<()> {
    let path = ConfigManager::get_settings_path();
    if path.exists() && !force {
        bail!(
            "Settings file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    ConfigManager::save_to_path(&Settings::starter(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}
