use serde::{Deserialize, Serialize};

/// Flags that apply to every launcher invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchFlags {
    /// `/silent`: suppress some of the launcher's pop-up errors.
    pub silent: bool,
    /// `/wait`: block until the started program exits.
    pub wait: bool,
    /// `/nosbiectrl`: do not bring up the engine's control UI.
    pub nosbiectrl: bool,
    /// `/elevate`: run with administrator rights under UAC.
    pub elevate: bool,
    /// `/dfp`: run outside the sandbox even if the program is forced.
    pub disable_forced: bool,
}

impl Default for LaunchFlags {
    fn default() -> Self {
        Self {
            silent: true,
            wait: false,
            nosbiectrl: true,
            elevate: false,
            disable_forced: false,
        }
    }
}

/// Flags that only mean something when no command is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlFlags {
    pub reload: bool,
    pub terminate: bool,
    pub terminate_all: bool,
    pub list_pids: bool,
}

impl ControlFlags {
    pub fn any(&self) -> bool {
        self.reload || self.terminate || self.terminate_all || self.list_pids
    }
}

/// One invocation of the launcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    /// Program to run inside the sandbox; `None` for a control operation.
    pub command: Option<String>,
    /// Target sandbox; `None` means the client's default box.
    pub box_name: Option<String>,
    pub flags: LaunchFlags,
    pub control: ControlFlags,
}

impl LaunchRequest {
    /// Runs `command` in the default box with default flags.
    pub fn command(command: impl Into<String>) -> Self {
        Self {
            command: Some(command.into()),
            ..Self::default()
        }
    }

    /// A command-less request; pair with one of the control setters.
    pub fn control() -> Self {
        Self::default()
    }

    pub fn in_box(mut self, name: impl Into<String>) -> Self {
        self.box_name = Some(name.into());
        self
    }

    /// Same as [`Self::in_box`] but keeps the default box for `None`.
    pub fn in_box_opt(mut self, name: Option<&str>) -> Self {
        self.box_name = name.map(str::to_string);
        self
    }

    pub fn with_flags(mut self, flags: LaunchFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn silent(mut self, on: bool) -> Self {
        self.flags.silent = on;
        self
    }

    pub fn wait(mut self, on: bool) -> Self {
        self.flags.wait = on;
        self
    }

    pub fn nosbiectrl(mut self, on: bool) -> Self {
        self.flags.nosbiectrl = on;
        self
    }

    pub fn elevate(mut self, on: bool) -> Self {
        self.flags.elevate = on;
        self
    }

    pub fn disable_forced(mut self, on: bool) -> Self {
        self.flags.disable_forced = on;
        self
    }

    pub fn reload(mut self, on: bool) -> Self {
        self.control.reload = on;
        self
    }

    pub fn terminate(mut self, on: bool) -> Self {
        self.control.terminate = on;
        self
    }

    pub fn terminate_all(mut self, on: bool) -> Self {
        self.control.terminate_all = on;
        self
    }

    pub fn list_pids(mut self, on: bool) -> Self {
        self.control.list_pids = on;
        self
    }

    /// Whether the launcher will print pids for this request.
    pub fn wants_pids(&self) -> bool {
        self.command.is_none() && self.control.list_pids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_flags() {
        let flags = LaunchFlags::default();
        assert!(flags.silent);
        assert!(!flags.wait);
        assert!(flags.nosbiectrl);
        assert!(!flags.elevate);
        assert!(!flags.disable_forced);
    }

    #[test]
    fn test_builder_sets_fields() {
        let request = LaunchRequest::command("notepad.exe")
            .in_box("foo")
            .wait(true)
            .silent(false);
        assert_eq!(request.command.as_deref(), Some("notepad.exe"));
        assert_eq!(request.box_name.as_deref(), Some("foo"));
        assert!(request.flags.wait);
        assert!(!request.flags.silent);
        assert!(!request.control.any());
    }

    #[test]
    fn test_wants_pids_only_without_command() {
        assert!(LaunchRequest::control().list_pids(true).wants_pids());
        assert!(!LaunchRequest::command("x").list_pids(true).wants_pids());
        assert!(!LaunchRequest::control().wants_pids());
    }
}
