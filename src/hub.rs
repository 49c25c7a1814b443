use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result};
use log::Level;

use crate::editor::LocalInstall;

const HEADLESS_ARG: &str = "--headless";

/// What a hub install command reported back. The hub can exit 0 while still
/// printing an error, so callers get both the flag and the raw output to
/// pattern-match on.
#[derive(Debug)]
pub struct InstallOutcome {
    pub success: bool,
    pub output: String,
}

impl InstallOutcome {
    fn failed() -> Self {
        Self {
            success: false,
            output: String::new(),
        }
    }
}

struct HubProcessOutput {
    output: String,
    exit_code: i32,
}

/// Client for the external hub executable. All hub invocations run headless
/// and block until the hub exits.
pub struct Hub {
    hub_path: PathBuf,
}

impl Hub {
    pub fn new(hub_path: impl Into<PathBuf>) -> Self {
        Self {
            hub_path: hub_path.into(),
        }
    }

    /// Validate that the configured hub path is an existing file. Checked
    /// before any subprocess call.
    pub fn path_exists(&self) -> bool {
        let exists = self.hub_path.is_file();
        log::debug!("Hub file exists: {}", exists);
        exists
    }

    /// Find the installed editor matching `version` exactly, if any.
    pub fn get_install(&self, version: &str) -> Result<Option<LocalInstall>> {
        let install = self
            .list_installed()?
            .into_iter()
            .find(|install| install.version == version);
        if install.is_none() {
            log::debug!("Could not find a matching Unity install for version '{}'", version);
        }
        Ok(install)
    }

    /// Get all installed editor versions registered in the hub.
    ///
    /// A non-zero hub exit yields an empty list rather than an error; lines
    /// that don't match the expected `version, installed at path` shape are
    /// skipped.
    pub fn list_installed(&self) -> Result<Vec<LocalInstall>> {
        let result = self.run_headless(&["editors", "-i"], Level::Debug)?;
        if result.exit_code != 0 {
            return Ok(Vec::new());
        }
        Ok(parse_editor_list(&result.output))
    }

    /// Install the specified editor version. The changeset can be left out
    /// when the version is recent enough for the hub to resolve on its own.
    pub fn install(&self, version: &str, changeset: Option<&str>) -> Result<InstallOutcome> {
        if version.trim().is_empty() {
            return Ok(InstallOutcome::failed());
        }

        let mut command = vec!["install", "--version", version];
        if let Some(changeset) = changeset.filter(|c| !c.trim().is_empty()) {
            command.push("--changeset");
            command.push(changeset);
        }

        log::info!("Starting with installing");
        let result = self.run_headless(&command, Level::Info)?;
        Ok(Self::install_outcome(result))
    }

    /// Install a module into an already-installed editor version.
    pub fn install_module(
        &self,
        version: &str,
        module: &str,
        install_child_modules: bool,
    ) -> Result<InstallOutcome> {
        if version.trim().is_empty() || module.trim().is_empty() {
            return Ok(InstallOutcome::failed());
        }

        let mut command = vec!["install-modules", "--version", version, "--module", module];
        if install_child_modules {
            command.push("--childModules");
        }

        log::info!("Starting with installing modules");
        let result = self.run_headless(&command, Level::Info)?;
        Ok(Self::install_outcome(result))
    }

    fn install_outcome(result: HubProcessOutput) -> InstallOutcome {
        if result.exit_code != 0 {
            return InstallOutcome {
                success: false,
                output: result.output,
            };
        }
        InstallOutcome {
            success: !result.output.contains("Error:"),
            output: result.output,
        }
    }

    /// Run the hub with the passed arguments, prepending the headless flag.
    ///
    /// Stdout and stderr are drained line-by-line while the hub runs so that
    /// long installs stream their progress instead of buffering until exit.
    /// Each stdout line is echoed at `echo_level`, stderr lines at error.
    fn run_headless(&self, command: &[&str], echo_level: Level) -> Result<HubProcessOutput> {
        log::debug!("Starting hub process with arguments '{} {}'", HEADLESS_ARG, command.join(" "));

        let mut child = Command::new(&self.hub_path)
            .arg(HEADLESS_ARG)
            .args(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start hub process at {:?}", self.hub_path))?;

        let stderr = child.stderr.take().context("hub process has no stderr pipe")?;
        let stderr_reader = thread::spawn(move || {
            let mut collected = String::new();
            for line in BufReader::new(stderr).lines() {
                let Ok(line) = line else { break };
                log::error!("{}", line);
                collected.push_str(&line);
                collected.push('\n');
            }
            collected
        });

        let stdout = child.stdout.take().context("hub process has no stdout pipe")?;
        let mut output = String::new();
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            log::log!(echo_level, "{}", line);
            output.push_str(&line);
            output.push('\n');
        }

        let status = child.wait().context("failed to wait for hub process")?;
        let error = stderr_reader.join().unwrap_or_default();

        if !error.is_empty() {
            log::error!(
                "Running '{:?} {} {}' produced the following error output:",
                self.hub_path,
                HEADLESS_ARG,
                command.join(" ")
            );
            log::error!("{}", error.trim_end());
        }

        let exit_code = status.code().unwrap_or(-1);
        log::debug!("Exit code: {}", exit_code);

        Ok(HubProcessOutput { output, exit_code })
    }
}

/// Parse the hub's `editors -i` output. Expected line shape:
/// `2021.3.4f1 , installed at /path/to/Editor/Unity`. Anything else (banner
/// text, blank lines) is skipped.
fn parse_editor_list(output: &str) -> Vec<LocalInstall> {
    let mut installs = Vec::new();
    for line in output.lines() {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 {
            continue;
        }
        let version = fields[0].trim().to_string();
        let path = fields[1].replace("installed at", "");
        let path = path.trim();
        installs.push(LocalInstall::new(PathBuf::from(path), version));
    }
    installs
}
