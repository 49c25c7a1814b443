use std::fmt;
use std::path::PathBuf;

use crate::cli::LaunchArgs;
use crate::project::Project;

/// Everything the editor is started with. One value type serves both the
/// process argv and the logged command-line string; the clause order is fixed
/// and identical for both renderings.
#[derive(Debug, Clone, Default)]
pub struct LaunchArguments {
    pub project_path: PathBuf,
    pub wait_for_exit: bool,
    pub batch_mode: bool,
    pub build_target: Option<String>,
    pub execute_method: Option<String>,
    pub no_graphics: bool,
    pub log_file: Option<PathBuf>,
    pub silent_crashes: bool,
    pub quit: bool,
}

impl LaunchArguments {
    /// Copy the launch-related CLI flags over, field by field. Keep the test
    /// below in sync when adding an option here.
    pub fn from_cli(project: &Project, args: &LaunchArgs) -> Self {
        Self {
            project_path: project.path().to_path_buf(),
            wait_for_exit: args.wait_for_exit,
            batch_mode: args.batch_mode,
            build_target: args.build_target.clone(),
            execute_method: args.execute_method.clone(),
            no_graphics: args.no_graphics,
            log_file: args.log_file.clone(),
            silent_crashes: args.silent_crashes,
            quit: args.quit,
        }
    }

    /// Shortcut that flips on everything a CI run wants.
    pub fn headless(mut self) -> Self {
        self.batch_mode = true;
        self.quit = true;
        self.no_graphics = true;
        self.silent_crashes = true;
        self
    }

    /// The argv handed to the editor process. Same clauses, same order as the
    /// Display rendering, minus the shell quoting.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-projectPath".to_string(),
            self.project_path.to_string_lossy().into_owned(),
        ];

        if self.batch_mode {
            args.push("-batchmode".to_string());
        }
        if let Some(build_target) = &self.build_target {
            args.push("-buildtarget".to_string());
            args.push(build_target.clone());
        }
        if let Some(execute_method) = &self.execute_method {
            args.push("-executemethod".to_string());
            args.push(execute_method.clone());
        }
        if self.no_graphics {
            args.push("-nographics".to_string());
        }
        // Captured-output mode always streams the editor log to stdout, even
        // when an explicit log file was requested.
        if self.wait_for_exit {
            args.push("-logFile".to_string());
            args.push("-".to_string());
        } else if let Some(log_file) = &self.log_file {
            args.push("-logFile".to_string());
            args.push(log_file.to_string_lossy().into_owned());
        }
        if self.silent_crashes {
            args.push("-silent-crashes".to_string());
        }
        if self.quit {
            args.push("-quit".to_string());
        }

        args
    }
}

impl fmt::Display for LaunchArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-projectPath \"{}\"", self.project_path.display())?;

        if self.batch_mode {
            write!(f, " -batchmode")?;
        }
        if let Some(build_target) = &self.build_target {
            write!(f, " -buildtarget {}", build_target)?;
        }
        if let Some(execute_method) = &self.execute_method {
            write!(f, " -executemethod {}", execute_method)?;
        }
        if self.no_graphics {
            write!(f, " -nographics")?;
        }
        if self.wait_for_exit {
            write!(f, " -logFile -")?;
        } else if let Some(log_file) = &self.log_file {
            write!(f, " -logFile \"{}\"", log_file.display())?;
        }
        if self.silent_crashes {
            write!(f, " -silent-crashes")?;
        }
        if self.quit {
            write!(f, " -quit")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_arguments() -> LaunchArguments {
        LaunchArguments {
            project_path: PathBuf::from("/projects/game"),
            wait_for_exit: false,
            batch_mode: true,
            build_target: Some("Android".to_string()),
            execute_method: Some("Builder.Build".to_string()),
            no_graphics: true,
            log_file: Some(PathBuf::from("out.log")),
            silent_crashes: true,
            quit: true,
        }
    }

    #[test]
    fn renders_every_clause_in_fixed_order() {
        let rendered = full_arguments().to_string();
        assert_eq!(
            rendered,
            "-projectPath \"/projects/game\" -batchmode -buildtarget Android \
             -executemethod Builder.Build -nographics -logFile \"out.log\" \
             -silent-crashes -quit"
        );
    }

    #[test]
    fn waiting_for_exit_overrides_the_log_file() {
        let mut arguments = full_arguments();
        arguments.wait_for_exit = true;

        let rendered = arguments.to_string();
        assert!(rendered.contains("-logFile -"));
        assert!(!rendered.contains("out.log"));

        let args = arguments.to_args();
        let position = args.iter().position(|a| a == "-logFile").unwrap();
        assert_eq!(args[position + 1], "-");
    }

    #[test]
    fn minimal_arguments_render_only_the_project_path() {
        let arguments = LaunchArguments {
            project_path: PathBuf::from("/projects/game"),
            ..Default::default()
        };
        assert_eq!(arguments.to_string(), "-projectPath \"/projects/game\"");
        assert_eq!(arguments.to_args(), vec!["-projectPath", "/projects/game"]);
    }

    #[test]
    fn argv_matches_the_rendered_clause_order() {
        let rendered = full_arguments().to_string().replace('"', "");
        let joined = full_arguments().to_args().join(" ");
        assert_eq!(rendered, joined);
    }

    #[test]
    fn from_cli_copies_every_launch_option() {
        let cli = LaunchArgs {
            hub: crate::cli::HubArgs {
                hub_path: PathBuf::from("/hub"),
                verbose: false,
            },
            project_path: PathBuf::from("/projects/game"),
            wait_for_exit: true,
            install_if_needed: true,
            headless: false,
            batch_mode: true,
            build_target: Some("WebGL".to_string()),
            execute_method: Some("Builder.Build".to_string()),
            no_graphics: true,
            log_file: Some(PathBuf::from("editor.log")),
            silent_crashes: true,
            quit: true,
        };
        let project = Project::new("/projects/game");

        let arguments = LaunchArguments::from_cli(&project, &cli);
        assert_eq!(arguments.project_path, PathBuf::from("/projects/game"));
        assert!(arguments.wait_for_exit);
        assert!(arguments.batch_mode);
        assert_eq!(arguments.build_target.as_deref(), Some("WebGL"));
        assert_eq!(arguments.execute_method.as_deref(), Some("Builder.Build"));
        assert!(arguments.no_graphics);
        assert_eq!(arguments.log_file, Some(PathBuf::from("editor.log")));
        assert!(arguments.silent_crashes);
        assert!(arguments.quit);
    }

    #[test]
    fn headless_enables_the_four_ci_flags() {
        let arguments = LaunchArguments {
            project_path: PathBuf::from("/projects/game"),
            ..Default::default()
        }
        .headless();
        assert!(arguments.batch_mode);
        assert!(arguments.quit);
        assert!(arguments.no_graphics);
        assert!(arguments.silent_crashes);
        assert!(!arguments.wait_for_exit);
    }
}
