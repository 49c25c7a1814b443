use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::args::LaunchArguments;
use crate::cli::{InstallArgs, LaunchArgs, ListArgs, OutputFormat};
use crate::editor::LocalInstall;
use crate::hub::Hub;
use crate::modules::InstallModule;
use crate::project::Project;

const INSTALL_SOURCE_SCHEME: &str = "unityhub://";

/// Handle the `list` verb.
pub fn handle_list(args: ListArgs) -> Result<i32> {
    let hub = Hub::new(args.hub.hub_path);
    if !hub.path_exists() {
        log::error!("Unity hub was not found");
        return Ok(1);
    }

    let installs = hub.list_installed()?;
    match args.format {
        OutputFormat::Text => {
            println!("Installed Unity versions:");
            for install in &installs {
                println!("  - {} ({})", install.version, install.executable_path.display());
                if args.modules {
                    for module in install.modules().unwrap_or_default() {
                        println!(
                            "      {} ({})",
                            module.id.as_deref().unwrap_or("?"),
                            module.name.as_deref().unwrap_or("?")
                        );
                    }
                }
            }
        }
        OutputFormat::Json => {
            let reports = build_reports(&installs, args.modules);
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Yaml => {
            let reports = build_reports(&installs, args.modules);
            println!("{}", serde_yaml::to_string(&reports)?);
        }
    }
    Ok(0)
}

#[derive(Serialize)]
struct InstallReport {
    version: String,
    executable_path: PathBuf,
    root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    modules: Option<Vec<InstallModule>>,
}

fn build_reports(installs: &[LocalInstall], include_modules: bool) -> Vec<InstallReport> {
    installs
        .iter()
        .map(|install| InstallReport {
            version: install.version.clone(),
            executable_path: install.executable_path.clone(),
            root: install.root.clone(),
            modules: if include_modules { install.modules() } else { None },
        })
        .collect()
}

/// Handle the `launch` verb. The editor's exit code becomes our own when
/// waiting for it, otherwise 0 on a successful detached start.
pub fn handle_launch(args: LaunchArgs) -> Result<i32> {
    let project = Project::new(&args.project_path);
    log::info!("Attempting to launch Unity with project {:?}", args.project_path);
    if !project.is_valid() {
        log::error!("The passed project doesn't seem like a valid Unity project.");
        return Ok(1);
    }

    let hub = Hub::new(&args.hub.hub_path);
    if !hub.path_exists() {
        log::error!("Unity hub was not found");
        return Ok(1);
    }

    let Some(version) = project.version() else {
        log::error!("Could not read a Unity version out of the project's version file");
        return Ok(1);
    };

    let mut install = hub.get_install(version)?;
    if install.is_none() {
        if !args.install_if_needed {
            log::error!("Unity version '{}' doesn't seem to be installed", version);
            log::info!("You can use the '--install-if-needed' option to automatically install it");
            return Ok(1);
        }

        log::info!("Unity version is not yet installed, doing that next");
        if !install_version(&hub, version, project.changeset())? {
            log::error!("Failed to install, not opening project");
            return Ok(1);
        }

        install = hub.get_install(version)?;
    }

    let Some(install) = install else {
        log::error!("Unity version '{}' is still not installed", version);
        return Ok(1);
    };

    let mut arguments = LaunchArguments::from_cli(&project, &args);
    if args.headless {
        arguments = arguments.headless();
    }
    install.launch(&arguments)
}

/// Handle the `install` verb.
pub fn handle_install(args: InstallArgs) -> Result<i32> {
    let hub = Hub::new(args.hub.hub_path);
    if !hub.path_exists() {
        log::error!("Unity hub was not found");
        return Ok(1);
    }

    let (version, changeset) = match &args.install_source {
        Some(uri) => match parse_install_source(uri) {
            Some((version, changeset)) => {
                log::debug!("Uri parsed version: {}, changeset: {}", version, changeset);
                (version, Some(changeset))
            }
            None => {
                log::error!("The passed install source is not in a valid format");
                return Ok(1);
            }
        },
        // The arg group guarantees a version when no install source is given.
        None => (args.version.clone().unwrap_or_default(), args.changeset.clone()),
    };

    log::debug!("Checking if version is already installed");
    let existing = hub.get_install(&version)?;
    if existing.is_some() && args.modules.is_empty() {
        log::error!("Unity version '{}' seems to be installed already", version);
        return Ok(1);
    }

    if existing.is_none() {
        log::debug!("Version is not yet installed");
        if !install_version(&hub, &version, changeset.as_deref())? {
            return Ok(1);
        }
    }

    for module in &args.modules {
        log::info!("Installing module '{}' into Unity '{}'", module, version);
        let outcome = hub.install_module(&version, module, args.install_child_modules)?;
        if !outcome.success {
            log::error!("Failed to install module '{}'", module);
            return Ok(1);
        }
    }

    Ok(0)
}

/// Run a hub install and report how it went. Shared by `install` and by
/// `launch --install-if-needed`.
fn install_version(hub: &Hub, version: &str, changeset: Option<&str>) -> Result<bool> {
    let outcome = hub.install(version, changeset)?;
    if outcome.success {
        log::info!("Installation was successful");
    } else {
        log::error!("Installation failed");
    }

    if outcome.output.contains("No editor version matched") && changeset.is_none() {
        log::info!("You might also need to pass the '--changeset' option");
    }

    Ok(outcome.success)
}

/// Split an install-source URI like `unityhub://2020.1.6f1/fc477ca6df10` into
/// its version and changeset. Anything but exactly two segments after the
/// scheme is unparseable.
fn parse_install_source(uri: &str) -> Option<(String, String)> {
    let rest = uri.strip_prefix(INSTALL_SOURCE_SCHEME)?;
    let segments: Vec<&str> = rest.split('/').collect();
    if segments.len() != 2 {
        return None;
    }
    Some((segments[0].to_string(), segments[1].to_string()))
}
