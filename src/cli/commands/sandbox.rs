use crate::cli::parser::{BoxArg, CreateArgs, JsonArg, ShowArgs};
use crate::cli::CommandContext;
use crate::core::SandboxProfile;
use anyhow::{anyhow, Context, Result};

pub fn create(ctx: &CommandContext, args: CreateArgs) -> Result<()> {
    let client = ctx.client()?;
    client
        .create_sandbox(&args.name, args.profile_options())
        .with_context(|| format!("Failed to create sandbox '{}'", args.name))?;
    println!("✅ Sandbox '{}' created", args.name);
    Ok(())
}

pub fn destroy(ctx: &CommandContext, args: BoxArg) -> Result<()> {
    let client = ctx.client()?;
    client
        .destroy_sandbox(&args.name)
        .with_context(|| format!("Failed to destroy sandbox '{}'", args.name))?;
    println!("✅ Sandbox '{}' destroyed", args.name);
    Ok(())
}

pub fn list(ctx: &CommandContext, args: JsonArg) -> Result<()> {
    let config = ctx.client()?.config()?;
    let boxes: Vec<&SandboxProfile> = config.boxes().collect();

    if args.json {
        let names: Vec<&str> = boxes.iter().map(|b| b.name()).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if boxes.is_empty() {
        println!("No sandboxes defined");
        return Ok(());
    }
    for profile in boxes {
        println!("{}", describe(profile));
    }
    Ok(())
}

pub fn show(ctx: &CommandContext, args: ShowArgs) -> Result<()> {
    let config = ctx.client()?.config()?;
    let profile = config
        .profile(&args.name)
        .ok_or_else(|| anyhow!("Sandbox '{}' is not defined", args.name))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&profile_json(profile))?);
    } else {
        println!("[{}]", profile.name());
        for (key, value) in profile.options() {
            println!("{key}={value}");
        }
    }
    Ok(())
}

fn describe(profile: &SandboxProfile) -> String {
    match profile.get("Enabled") {
        Some(enabled) => format!("{} (Enabled={enabled})", profile.name()),
        None => profile.name().to_string(),
    }
}

fn profile_json(profile: &SandboxProfile) -> serde_json::Value {
    let options: serde_json::Map<String, serde_json::Value> = profile
        .options()
        .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
        .collect();
    serde_json::json!({ "name": profile.name(), "options": options })
}
