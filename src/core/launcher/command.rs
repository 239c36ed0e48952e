use super::request::LaunchRequest;
use std::fmt;
use std::path::{Path, PathBuf};

/// Command token used for `/listpids`.
///
/// The launcher is not a console program, so its output only reaches a pipe
/// when it is asked to hand it on.
pub const LISTPIDS_PASSTHROUGH: &str = "| more";

pub const FLAG_SILENT: &str = "/silent";
pub const FLAG_WAIT: &str = "/wait";
pub const FLAG_NOSBIECTRL: &str = "/nosbiectrl";
pub const FLAG_ELEVATE: &str = "/elevate";
pub const FLAG_DFP: &str = "/dfp";
pub const FLAG_RELOAD: &str = "/reload";
pub const FLAG_TERMINATE: &str = "/terminate";
pub const FLAG_TERMINATE_ALL: &str = "/terminate_all";
pub const FLAG_LISTPIDS: &str = "/listpids";

/// A fully built launcher command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherCommand {
    pub program: PathBuf,
    /// `/box:` first, then the option flags, then any control flags.
    pub options: Vec<String>,
    /// Always present, possibly empty.
    pub command: String,
}

impl LauncherCommand {
    /// Every token in order, program first.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.options.len() + 2);
        tokens.push(self.program.to_string_lossy().into_owned());
        tokens.extend(self.options.iter().cloned());
        tokens.push(self.command.clone());
        tokens
    }

    /// Arguments after the program.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.options
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.command.as_str()))
    }

    pub fn has_option(&self, flag: &str) -> bool {
        self.options.iter().any(|o| o == flag)
    }
}

impl fmt::Display for LauncherCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.program.display())?;
        for option in &self.options {
            write!(f, " {option}")?;
        }
        if !self.command.is_empty() {
            write!(f, " {}", self.command)?;
        }
        Ok(())
    }
}

/// Maps a request onto the launcher's argument syntax.
///
/// Control flags are dropped entirely whenever the request carries a command;
/// with no command, each requested control flag is emitted in a fixed order
/// and the engine resolves any precedence between them. The builder never
/// invents a command except for `/listpids`.
pub fn build_command(launcher: &Path, default_box: &str, request: &LaunchRequest) -> LauncherCommand {
    let box_name = request.box_name.as_deref().unwrap_or(default_box);
    let flags = &request.flags;

    let mut options = vec![format!("/box:{box_name}")];
    let switches = [
        (flags.silent, FLAG_SILENT),
        (flags.wait, FLAG_WAIT),
        (flags.nosbiectrl, FLAG_NOSBIECTRL),
        (flags.elevate, FLAG_ELEVATE),
        (flags.disable_forced, FLAG_DFP),
    ];
    options.extend(switches.iter().filter(|(on, _)| *on).map(|(_, f)| f.to_string()));

    let command = match &request.command {
        Some(command) => command.clone(),
        None => {
            let control = &request.control;
            let controls = [
                (control.reload, FLAG_RELOAD),
                (control.terminate, FLAG_TERMINATE),
                (control.terminate_all, FLAG_TERMINATE_ALL),
                (control.list_pids, FLAG_LISTPIDS),
            ];
            options.extend(controls.iter().filter(|(on, _)| *on).map(|(_, f)| f.to_string()));

            if control.list_pids {
                LISTPIDS_PASSTHROUGH.to_string()
            } else {
                String::new()
            }
        }
    };

    LauncherCommand {
        program: launcher.to_path_buf(),
        options,
        command,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::launcher::request::{ControlFlags, LaunchFlags};
    use std::collections::HashSet;

    const CONTROL_FLAGS: [&str; 4] = [FLAG_RELOAD, FLAG_TERMINATE, FLAG_TERMINATE_ALL, FLAG_LISTPIDS];

    fn build(request: &LaunchRequest) -> LauncherCommand {
        build_command(Path::new("sbie/Start.exe"), "DefaultBox", request)
    }

    fn option_set(command: &LauncherCommand) -> HashSet<&str> {
        command.options.iter().map(String::as_str).collect()
    }

    fn default_options(box_name: &str) -> HashSet<String> {
        [format!("/box:{box_name}"), "/silent".into(), "/nosbiectrl".into()]
            .into_iter()
            .collect()
    }

    fn all_control_combinations() -> impl Iterator<Item = ControlFlags> {
        (0u8..16).map(|bits| ControlFlags {
            reload: bits & 1 != 0,
            terminate: bits & 2 != 0,
            terminate_all: bits & 4 != 0,
            list_pids: bits & 8 != 0,
        })
    }

    #[test]
    fn test_default_flags_canonical_order() {
        let command = build(&LaunchRequest::command("test.exe"));
        assert_eq!(
            command.tokens(),
            vec!["sbie/Start.exe", "/box:DefaultBox", "/silent", "/nosbiectrl", "test.exe"]
        );
    }

    #[test]
    fn test_all_flags_canonical_order() {
        let request = LaunchRequest::control()
            .wait(true)
            .elevate(true)
            .disable_forced(true)
            .reload(true)
            .terminate(true)
            .terminate_all(true)
            .list_pids(true);
        assert_eq!(
            build(&request).tokens(),
            vec![
                "sbie/Start.exe",
                "/box:DefaultBox",
                "/silent",
                "/wait",
                "/nosbiectrl",
                "/elevate",
                "/dfp",
                "/reload",
                "/terminate",
                "/terminate_all",
                "/listpids",
                "| more",
            ]
        );
    }

    #[test]
    fn test_command_with_spaces_is_one_token() {
        let command = build(&LaunchRequest::command("ping www.google.com -c 5"));
        assert_eq!(command.command, "ping www.google.com -c 5");
        assert_eq!(command.tokens().len(), 5);
    }

    #[test]
    fn test_box_overrides_default() {
        let command = build_command(
            Path::new("Start.exe"),
            "somebox",
            &LaunchRequest::command("test.exe").in_box("anotherbox"),
        );
        let expected = default_options("anotherbox");
        let actual: HashSet<String> = command.options.iter().cloned().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_custom_default_box() {
        let command = build_command(Path::new("Start.exe"), "somebox", &LaunchRequest::command("test.exe"));
        assert_eq!(command.options[0], "/box:somebox");
    }

    #[test]
    fn test_individual_flags() {
        let cases: [(LaunchRequest, &str, bool); 6] = [
            (LaunchRequest::command("t").silent(false), FLAG_SILENT, false),
            (LaunchRequest::command("t").wait(true), FLAG_WAIT, true),
            (LaunchRequest::command("t").nosbiectrl(false), FLAG_NOSBIECTRL, false),
            (LaunchRequest::command("t").elevate(true), FLAG_ELEVATE, true),
            (LaunchRequest::command("t").disable_forced(true), FLAG_DFP, true),
            (LaunchRequest::command("t").elevate(false), FLAG_ELEVATE, false),
        ];
        for (request, flag, present) in cases {
            assert_eq!(build(&request).has_option(flag), present, "{flag} for {request:?}");
        }
    }

    #[test]
    fn test_control_flags_suppressed_with_command() {
        for control in all_control_combinations() {
            let request = LaunchRequest {
                command: Some("test.exe".to_string()),
                control,
                ..LaunchRequest::default()
            };
            let command = build(&request);
            for flag in CONTROL_FLAGS {
                assert!(!command.has_option(flag), "{flag} leaked for {control:?}");
            }
            assert_eq!(command.command, "test.exe");
            let expected = default_options("DefaultBox");
            let actual: HashSet<String> = command.options.iter().cloned().collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_control_flags_emitted_without_command() {
        for control in all_control_combinations() {
            let request = LaunchRequest {
                control,
                ..LaunchRequest::default()
            };
            let command = build(&request);
            let options = option_set(&command);

            assert_eq!(options.contains(FLAG_RELOAD), control.reload);
            assert_eq!(options.contains(FLAG_TERMINATE), control.terminate);
            assert_eq!(options.contains(FLAG_TERMINATE_ALL), control.terminate_all);
            assert_eq!(options.contains(FLAG_LISTPIDS), control.list_pids);

            if control.list_pids {
                assert_eq!(command.command, LISTPIDS_PASSTHROUGH);
            } else {
                assert!(command.command.is_empty(), "fabricated command for {control:?}");
            }
        }
    }

    #[test]
    fn test_plain_control_request_has_empty_command() {
        let command = build(&LaunchRequest::control());
        assert_eq!(command.command, "");
        assert_eq!(command.tokens().last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_flags_from_struct() {
        let flags = LaunchFlags {
            silent: false,
            wait: true,
            nosbiectrl: false,
            elevate: false,
            disable_forced: false,
        };
        let command = build(&LaunchRequest::command("x").with_flags(flags));
        assert_eq!(command.options, vec!["/box:DefaultBox", "/wait"]);
    }

    #[test]
    fn test_building_is_repeatable() {
        let request = LaunchRequest::control().reload(true);
        assert_eq!(build(&request), build(&request));
    }

    #[test]
    fn test_display() {
        let command = build(&LaunchRequest::control().reload(true));
        assert_eq!(
            command.to_string(),
            "\"sbie/Start.exe\" /box:DefaultBox /silent /nosbiectrl /reload"
        );
    }
}
