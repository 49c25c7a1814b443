use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::args::LaunchArguments;
use crate::modules::{self, InstallModule};

/// One locally installed editor as reported by the hub.
#[derive(Debug, Clone, Serialize)]
pub struct LocalInstall {
    pub executable_path: PathBuf,
    /// Installation root, two levels up from the executable.
    pub root: PathBuf,
    pub version: String,
}

impl LocalInstall {
    pub fn new(executable_path: PathBuf, version: String) -> Self {
        let root = executable_path
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            executable_path,
            root,
            version,
        }
    }

    /// The modules installed into this editor, read from the `modules.json`
    /// beside the installation. Best effort: unavailable metadata (missing
    /// file, slow disk) yields `None`.
    pub fn modules(&self) -> Option<Vec<InstallModule>> {
        modules::read_modules(&self.root)
    }

    /// Launch this editor install.
    ///
    /// With `wait_for_exit` the editor's output is streamed to the console
    /// and the editor's own exit code is returned once it finishes. Without
    /// it the editor is started detached and 0 is returned immediately, so
    /// the editor window outlives the launcher process.
    pub fn launch(&self, arguments: &LaunchArguments) -> Result<i32> {
        log::info!(
            "Launching Unity '{}' with the following arguments: '{}'",
            self.version,
            arguments
        );

        let mut command = Command::new(&self.executable_path);
        command.args(arguments.to_args());

        // Batch-mode launches shouldn't pop up a window.
        #[cfg(windows)]
        if arguments.batch_mode {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        if !arguments.wait_for_exit {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .with_context(|| {
                    format!("failed to start editor at {:?}", self.executable_path)
                })?;
            return Ok(0);
        }

        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start editor at {:?}", self.executable_path))?;

        log::info!("Unity output:");

        let stderr = child.stderr.take().context("editor process has no stderr pipe")?;
        let stderr_reader = thread::spawn(move || {
            for line in BufReader::new(stderr).lines() {
                let Ok(line) = line else { break };
                eprintln!("{}", line);
            }
        });

        let stdout = child.stdout.take().context("editor process has no stdout pipe")?;
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            println!("{}", line);
        }

        let status = child.wait().context("failed to wait for editor process")?;
        let _ = stderr_reader.join();

        let exit_code = status.code().unwrap_or(-1);
        log::debug!("Unity has finished with exit code {}", exit_code);
        Ok(exit_code)
    }
}
