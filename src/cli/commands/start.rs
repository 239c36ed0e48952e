use crate::cli::parser::StartArgs;
use crate::cli::CommandContext;
use crate::core::launcher::{LaunchFlags, LaunchRequest};
use anyhow::{Context, Result};

pub fn execute(ctx: &CommandContext, args: StartArgs) -> Result<()> {
    let client = ctx.client()?;
    let request = build_request(&args, &ctx.settings.launch);

    let output = client
        .start(&request)
        .with_context(|| format!("Failed to start '{}'", args.command_line()))?;

    let text = output.text().trim_end();
    if !text.is_empty() {
        println!("{text}");
    }
    Ok(())
}

fn build_request(args: &StartArgs, base: &LaunchFlags) -> LaunchRequest {
    LaunchRequest::command(args.command_line())
        .in_box_opt(args.box_name.as_deref())
        .with_flags(args.flags(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::parser::{Cli, Commands};
    use clap::Parser;

    fn start_args(argv: &[&str]) -> StartArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Start(args) => args,
            other => panic!("expected Start, got {other:?}"),
        }
    }

    #[test]
    fn test_request_uses_default_flags() {
        let args = start_args(&["sbiectl", "start", "notepad.exe"]);
        let request = build_request(&args, &LaunchFlags::default());
        assert_eq!(request, LaunchRequest::command("notepad.exe"));
    }

    #[test]
    fn test_request_with_flags_and_box() {
        let args = start_args(&[
            "sbiectl", "start", "--box", "foo", "--wait", "--no-silent", "--elevate", "ping", "-n", "5",
            "localhost",
        ]);
        let request = build_request(&args, &LaunchFlags::default());
        assert_eq!(request.command.as_deref(), Some("ping -n 5 localhost"));
        assert_eq!(request.box_name.as_deref(), Some("foo"));
        assert!(request.flags.wait);
        assert!(!request.flags.silent);
        assert!(request.flags.elevate);
        assert!(request.flags.nosbiectrl);
        assert!(!request.control.any());
    }

    #[test]
    fn test_settings_flags_are_the_base() {
        let args = start_args(&["sbiectl", "start", "x.exe"]);
        let base = LaunchFlags {
            silent: false,
            disable_forced: true,
            ..LaunchFlags::default()
        };
        let request = build_request(&args, &base);
        assert!(!request.flags.silent);
        assert!(request.flags.disable_forced);
    }
}
