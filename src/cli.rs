use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "unityctl command-line interface",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::List(args) => args.hub.verbose,
            Commands::Launch(args) => args.hub.verbose,
            Commands::Install(args) => args.hub.verbose,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List all installed Unity editors
    List(ListArgs),
    /// Launch a Unity project with the matching editor version
    Launch(LaunchArgs),
    /// Install a new Unity editor version
    Install(InstallArgs),
}

/// Flags shared by every verb
#[derive(Debug, Args)]
pub struct HubArgs {
    /// Path to the hub executable
    #[arg(long = "hub-path")]
    pub hub_path: PathBuf,
    /// Enable more logging
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub hub: HubArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Include each editor's installed modules (best effort)
    #[arg(long)]
    pub modules: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Debug, Args)]
pub struct LaunchArgs {
    #[command(flatten)]
    pub hub: HubArgs,
    /// Path to the project that should be opened
    #[arg(long = "project")]
    pub project_path: PathBuf,
    /// Wait for the Unity process to exit before continuing
    #[arg(long)]
    pub wait_for_exit: bool,
    /// Install the correct Unity version if it's not installed yet
    #[arg(long)]
    pub install_if_needed: bool,
    /// Shortcut for batch-mode, quit, no-graphics and silent-crashes
    #[arg(long)]
    pub headless: bool,
    /// https://docs.unity3d.com/Manual/CommandLineArguments.html
    #[arg(long)]
    pub batch_mode: bool,
    /// https://docs.unity3d.com/Manual/CommandLineArguments.html
    #[arg(long)]
    pub build_target: Option<String>,
    /// https://docs.unity3d.com/Manual/CommandLineArguments.html
    #[arg(long)]
    pub execute_method: Option<String>,
    /// https://docs.unity3d.com/Manual/CommandLineArguments.html
    #[arg(long)]
    pub no_graphics: bool,
    /// Ignored if '--wait-for-exit' is passed
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    #[arg(long)]
    pub silent_crashes: bool,
    /// https://docs.unity3d.com/Manual/CommandLineArguments.html
    #[arg(long)]
    pub quit: bool,
}

#[derive(Debug, Args)]
#[command(group = ArgGroup::new("source").required(true).args(["install_source", "version"]))]
pub struct InstallArgs {
    #[command(flatten)]
    pub hub: HubArgs,
    /// Hub URI, for example 'unityhub://2020.1.6f1/fc477ca6df10'
    #[arg(long = "install-source")]
    pub install_source: Option<String>,
    /// Version string, for example '2020.1.6f1'
    #[arg(long)]
    pub version: Option<String>,
    /// Changeset for the version, might be required if the version is not the
    /// latest minor version
    #[arg(long)]
    pub changeset: Option<String>,
    /// Module to install into the version, can be passed multiple times
    #[arg(long = "module")]
    pub modules: Vec<String>,
    /// Also install child modules of the requested modules
    #[arg(long)]
    pub install_child_modules: bool,
}
