pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

pub use config::{resolve_install_dir, ClientConfig, Environment};
pub use core::launcher::{ControlFlags, LaunchFlags, LaunchOutput, LaunchRequest, PidList};
pub use core::{Config, ConfigStore, SandboxClient, SandboxProfile};
pub use utils::{InvocationError, Result, SbieError};
