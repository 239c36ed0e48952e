use crate::cli::parser::PsArgs;
use crate::cli::CommandContext;
use anyhow::{Context, Result};

pub fn execute(ctx: &CommandContext, args: PsArgs) -> Result<()> {
    let client = ctx.client()?;
    let target = args.box_name.as_deref().unwrap_or(client.default_box()).to_string();
    let pids = client
        .running_processes(args.box_name.as_deref())
        .and_then(|pids| pids.collect::<crate::utils::Result<Vec<u32>>>())
        .with_context(|| format!("Failed to list processes in '{target}'"))?;

    println!("{}", format_pids(&target, &pids, args.json)?);
    Ok(())
}

fn format_pids(target: &str, pids: &[u32], json: bool) -> Result<String> {
    if json {
        let value = serde_json::json!({ "box": target, "pids": pids });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    if pids.is_empty() {
        return Ok(format!("No processes running in '{target}'"));
    }
    Ok(pids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_plain() {
        assert_eq!(format_pids("foo", &[13, 2705], false).unwrap(), "13\n2705");
        assert!(format_pids("foo", &[], false).unwrap().contains("No processes"));
    }

    #[test]
    fn test_format_json() {
        let out = format_pids("foo", &[13, 14], true).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["box"], "foo");
        assert_eq!(json["pids"], serde_json::json!([13, 14]));
    }
}
