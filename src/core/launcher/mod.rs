//! Command-line protocol of the engine's launcher (`Start.exe`).

pub mod command;
pub mod output;
pub mod request;
pub mod runner;

pub use command::{build_command, LauncherCommand, LISTPIDS_PASSTHROUGH};
pub use output::{parse_pids, LaunchOutput, PidList};
pub use request::{ControlFlags, LaunchFlags, LaunchRequest};
pub use runner::{CommandRunner, ProcessOutput, SystemRunner};
