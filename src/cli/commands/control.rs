use crate::cli::parser::{OptionalBoxArg, TerminateArgs};
use crate::cli::CommandContext;
use anyhow::{Context, Result};

pub fn reload(ctx: &CommandContext) -> Result<()> {
    ctx.client()?
        .reload_config()
        .context("Failed to reload Sandboxie configuration")?;
    println!("✅ Sandboxie configuration reloaded");
    Ok(())
}

pub fn terminate(ctx: &CommandContext, args: TerminateArgs) -> Result<()> {
    let client = ctx.client()?;

    if args.all {
        client
            .terminate_all_processes()
            .context("Failed to terminate sandboxed processes")?;
        println!("✅ Terminated processes in all sandboxes");
        return Ok(());
    }

    let target = args.box_name.as_deref().unwrap_or(client.default_box()).to_string();
    client
        .terminate_processes(args.box_name.as_deref())
        .with_context(|| format!("Failed to terminate processes in '{target}'"))?;
    println!("✅ Terminated processes in '{target}'");
    Ok(())
}

pub fn delete_contents(ctx: &CommandContext, args: OptionalBoxArg) -> Result<()> {
    let client = ctx.client()?;
    let target = args.box_name.as_deref().unwrap_or(client.default_box()).to_string();
    client
        .delete_contents(args.box_name.as_deref())
        .with_context(|| format!("Failed to delete contents of '{target}'"))?;
    println!("✅ Deleted contents of '{target}'");
    Ok(())
}
