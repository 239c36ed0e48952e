use crate::core::launcher::LaunchFlags;
use crate::utils::{validate_box_name, Result, SbieError};
use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sbiectl")]
#[command(about = "Manage Sandboxie sandboxes and sandboxed processes")]
#[command(version)]
pub struct Cli {
    /// Sandboxie installation directory (defaults to $SANDBOXIE_INSTALL_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Sandbox used when a command does not name one
    #[arg(long, global = true, value_name = "BOX")]
    pub default_box: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a program inside a sandbox
    Start(StartArgs),
    /// Create a sandbox, or replace the options of an existing one
    Create(CreateArgs),
    /// Remove a sandbox from the configuration
    Destroy(BoxArg),
    /// Make the engine reload its configuration
    Reload,
    /// Terminate sandboxed processes
    Terminate(TerminateArgs),
    /// List process ids running in a sandbox
    #[command(alias = "ls")]
    Ps(PsArgs),
    /// Delete the contents of a sandbox
    DeleteContents(OptionalBoxArg),
    /// List sandboxes defined in the configuration
    Boxes(JsonArg),
    /// Show the options of one sandbox
    Show(ShowArgs),
    /// Inspect or initialise sbiectl settings
    Config(ConfigArgs),
    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Sandbox to run in (defaults to the default box)
    #[arg(long = "box", short = 'b', value_name = "BOX")]
    pub box_name: Option<String>,

    /// Wait for the program to exit
    #[arg(long, short = 'w')]
    pub wait: bool,

    /// Let the launcher show its error pop-ups
    #[arg(long)]
    pub no_silent: bool,

    /// Allow the engine's control UI to start
    #[arg(long)]
    pub allow_control: bool,

    /// Run with administrator rights
    #[arg(long)]
    pub elevate: bool,

    /// Run outside the sandbox even if the program is forced
    #[arg(long)]
    pub dfp: bool,

    /// Program and arguments to run
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl StartArgs {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.box_name {
            validate_box_name(name)?;
        }
        if self.command.iter().all(|part| part.trim().is_empty()) {
            return Err(SbieError::validation("Command cannot be empty"));
        }
        Ok(())
    }

    /// Per-invocation flags layered over the configured ones.
    pub fn flags(&self, base: &LaunchFlags) -> LaunchFlags {
        LaunchFlags {
            silent: base.silent && !self.no_silent,
            wait: base.wait || self.wait,
            nosbiectrl: base.nosbiectrl && !self.allow_control,
            elevate: base.elevate || self.elevate,
            disable_forced: base.disable_forced || self.dfp,
        }
    }

    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the sandbox
    pub name: String,

    /// Sandbox option as KEY=VALUE (repeatable)
    #[arg(long = "option", short = 'o', value_name = "KEY=VALUE", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Skip the default `Enabled=y` option
    #[arg(long)]
    pub no_enable: bool,
}

impl CreateArgs {
    pub fn validate(&self) -> Result<()> {
        validate_box_name(&self.name)
    }

    /// Options to write, with `Enabled=y` first unless disabled or given.
    pub fn profile_options(&self) -> Vec<(String, String)> {
        let mut options = Vec::with_capacity(self.options.len() + 1);
        if !self.no_enable && !self.options.iter().any(|(k, _)| k == "Enabled") {
            options.push(("Enabled".to_string(), "y".to_string()));
        }
        options.extend(self.options.iter().cloned());
        options
    }
}

fn parse_option(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[derive(Args, Debug)]
pub struct BoxArg {
    /// Name of the sandbox
    pub name: String,
}

impl BoxArg {
    pub fn validate(&self) -> Result<()> {
        validate_box_name(&self.name)
    }
}

#[derive(Args, Debug)]
pub struct OptionalBoxArg {
    /// Sandbox to act on (defaults to the default box)
    #[arg(long = "box", short = 'b', value_name = "BOX")]
    pub box_name: Option<String>,
}

impl OptionalBoxArg {
    pub fn validate(&self) -> Result<()> {
        match &self.box_name {
            Some(name) => validate_box_name(name),
            None => Ok(()),
        }
    }
}

#[derive(Args, Debug)]
pub struct TerminateArgs {
    /// Sandbox whose processes to terminate (defaults to the default box)
    #[arg(long = "box", short = 'b', value_name = "BOX", conflicts_with = "all")]
    pub box_name: Option<String>,

    /// Terminate processes in every sandbox
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct PsArgs {
    /// Sandbox to inspect (defaults to the default box)
    #[arg(long = "box", short = 'b', value_name = "BOX")]
    pub box_name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct JsonArg {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Name of the sandbox
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the settings file and resolved Sandboxie paths
    Path,
    /// Print effective settings as JSON
    Show,
    /// Write a starter settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completion for
    #[arg(value_enum)]
    pub shell: Shell,
}
