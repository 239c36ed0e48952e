use super::ini::Config;
use super::launcher::{
    build_command, CommandRunner, LaunchOutput, LaunchRequest, LauncherCommand, PidList,
    SystemRunner,
};
use super::store::ConfigStore;
use crate::config::{resolve_install_dir, ClientConfig, Environment, LAUNCHER_FILE_NAME};
use crate::utils::{InvocationError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Command the launcher understands as "empty this sandbox".
pub const DELETE_SANDBOX_COMMAND: &str = "delete_sandbox_silent";

/// Entry point for managing sandboxes and the processes running in them.
///
/// Profile edits go through [`ConfigStore`]; everything else is one
/// synchronous launcher invocation. The client keeps no state between calls
/// beyond what it resolved at construction.
pub struct SandboxClient<R: CommandRunner = SystemRunner> {
    install_dir: PathBuf,
    config: ClientConfig,
    store: ConfigStore,
    runner: R,
}

impl SandboxClient<SystemRunner> {
    /// Builds a client from the process environment.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_environment(config, &Environment::from_process())
    }

    pub fn with_environment(config: ClientConfig, env: &Environment) -> Result<Self> {
        Self::with_runner(config, env, SystemRunner)
    }
}

impl<R: CommandRunner> SandboxClient<R> {
    /// Fails with [`crate::SbieError::ConfigNotFound`] when neither search
    /// location holds a config file.
    pub fn with_runner(config: ClientConfig, env: &Environment, runner: R) -> Result<Self> {
        let install_dir = resolve_install_dir(env, config.install_dir.as_deref());
        let store = ConfigStore::discover(env, &install_dir)?;
        debug!(
            config = %store.path().display(),
            install_dir = %install_dir.display(),
            "sandbox client ready"
        );
        Ok(Self {
            install_dir,
            config,
            store,
            runner,
        })
    }

    pub fn default_box(&self) -> &str {
        &self.config.default_box
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn config_path(&self) -> &Path {
        self.store.path()
    }

    pub fn launcher_path(&self) -> PathBuf {
        self.install_dir.join(LAUNCHER_FILE_NAME)
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Freshly read profile file.
    pub fn config(&self) -> Result<Config> {
        self.store.read()
    }

    /// Creates `name` or replaces its options, then reloads the engine.
    ///
    /// The two steps are not atomic: if the reload fails, the file already
    /// holds the new profile and only the reload needs retrying. A name or
    /// option that would not read back as written fails with
    /// [`crate::SbieError::Validation`] before anything is written.
    pub fn create_sandbox<I, K, V>(&self, name: &str, options: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.store.modify(|config| -> Result<()> {
            config.insert(name, options)?;
            Ok(())
        })?;
        info!(sandbox = name, "sandbox profile written");
        self.reload_config()
    }

    /// Removes `name` and reloads the engine. Removing a profile that does
    /// not exist is not an error.
    pub fn destroy_sandbox(&self, name: &str) -> Result<()> {
        let removed = self
            .store
            .modify(|config| -> Result<bool> { Ok(config.remove(name).is_some()) })?;
        if removed {
            info!(sandbox = name, "sandbox profile removed");
        } else {
            debug!(sandbox = name, "sandbox profile already absent");
        }
        self.reload_config()
    }

    /// The command line `request` maps to, without running it.
    pub fn command_for(&self, request: &LaunchRequest) -> LauncherCommand {
        build_command(&self.launcher_path(), &self.config.default_box, request)
    }

    /// Runs the launcher for `request` and returns what it printed.
    ///
    /// A non-zero exit or a launcher that cannot be started is an
    /// [`InvocationError`]; nothing is retried.
    pub fn start(&self, request: &LaunchRequest) -> Result<LaunchOutput> {
        let command = self.command_for(request);
        debug!(command = %command, "invoking launcher");

        let output = self
            .runner
            .run(&command)
            .map_err(|source| InvocationError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        if !output.success {
            return Err(InvocationError::ExitStatus {
                program: command.program,
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            }
            .into());
        }

        Ok(LaunchOutput::new(output.stdout))
    }

    /// Runs `command` in `box_name` (or the default box) with the client's
    /// configured flags.
    pub fn run(&self, command: &str, box_name: Option<&str>) -> Result<LaunchOutput> {
        self.start(&self.request(Some(command), box_name))
    }

    pub fn reload_config(&self) -> Result<()> {
        info!("reloading sandbox configuration");
        self.start(&self.request(None, None).reload(true))?;
        Ok(())
    }

    /// Empties the contents of `box_name`, or of the default box for `None`.
    pub fn delete_contents(&self, box_name: Option<&str>) -> Result<()> {
        self.start(&self.request(Some(DELETE_SANDBOX_COMMAND), box_name))?;
        Ok(())
    }

    pub fn terminate_processes(&self, box_name: Option<&str>) -> Result<()> {
        self.start(&self.request(None, box_name).terminate(true))?;
        Ok(())
    }

    pub fn terminate_all_processes(&self) -> Result<()> {
        self.start(&self.request(None, None).terminate_all(true))?;
        Ok(())
    }

    /// Process ids running in `box_name`, parsed lazily from the launcher's
    /// output.
    pub fn running_processes(&self, box_name: Option<&str>) -> Result<PidList> {
        let request = self.request(None, box_name).list_pids(true).wait(true);
        Ok(self.start(&request)?.into_pids())
    }

    fn request(&self, command: Option<&str>, box_name: Option<&str>) -> LaunchRequest {
        LaunchRequest {
            command: command.map(str::to_string),
            ..LaunchRequest::default()
        }
        .in_box_opt(box_name)
        .with_flags(self.config.flags.clone())
    }
}
