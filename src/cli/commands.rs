//! Command dispatch for the one-shot subcommands and the shell

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::EditorService;
use crate::application::{ApplicationError, IoResultExt, OutlineExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::shell::Shell;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::Material;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = cli
        .project_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let settings = Settings::load(project_dir.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        Some(Commands::New { file, force }) => cmd_new(&container, file, *force),
        Some(Commands::Preview { file }) => cmd_preview(&container, file),
        Some(Commands::Check { file }) => cmd_check(&container, file),
        Some(Commands::Outline { file }) => cmd_outline(&container, file),
        Some(Commands::Shell { file }) => cmd_shell(&container, file.as_deref()),
        Some(Commands::Config { command }) => {
            cmd_config(&container, command, project_dir.as_deref())
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

/// Import `file` into a fresh editor; fails without side effects.
fn load(container: &ServiceContainer, file: &Path) -> CliResult<EditorService> {
    let mut editor = container.editor(Material::empty());
    editor.import_file(file)?;
    Ok(editor)
}

#[instrument(skip(container))]
fn cmd_new(container: &ServiceContainer, file: &Path, force: bool) -> CliResult<()> {
    let editor = container.editor(Material::seeded());
    editor.export_file(file, force)?;
    output::action("Created", &file.display());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_preview(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let editor = load(container, file)?;
    output::info(&editor.preview()?);
    Ok(())
}

#[instrument(skip(container))]
fn cmd_check(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let editor = load(container, file)?;
    let (topics, sub_topics, scenes) = editor.material().counts();
    output::success(&format!("{} is a valid material", file.display()));
    output::detail(&format!("topics:    {}", topics));
    output::detail(&format!("subtopics: {}", sub_topics));
    output::detail(&format!("scenes:    {}", scenes));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_outline(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let editor = load(container, file)?;
    output::info(&editor.material().to_outline().to_string().trim_end());
    Ok(())
}

#[instrument(skip(container))]
fn cmd_shell(container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let document = file
        .map(Path::to_path_buf)
        .or_else(|| container.settings.document.clone());

    let mut editor = container.editor(container.initial_material());
    if let Some(path) = &document {
        debug!("shell: importing {}", path.display());
        editor.import_file(path)?;
    }

    let stdin = io::stdin();
    let prompt = stdin
        .is_terminal()
        .then(|| container.settings.prompt.clone());
    if prompt.is_some() {
        output::header("materialtree shell (type `help` for commands, `quit` to leave)");
    }

    let mut shell = Shell::new(&mut editor, prompt);
    shell.run(stdin.lock(), &mut io::stdout())?;
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    project_dir: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Init { global } => {
            let path = config_target(*global, project_dir)?;
            if container.fs.exists(&path) {
                return Err(ApplicationError::AlreadyExists(path).into());
            }
            container
                .fs
                .ensure_parent(&path)
                .with_path_context("create config directory", &path)?;
            container
                .fs
                .write(&path, &Settings::template())
                .with_path_context("write config", &path)?;
            output::action("Created", &path.display());
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(unavailable)".to_string());
            output::detail(&format!("global: {}", global));
            if let Some(dir) = project_dir {
                output::detail(&format!("local:  {}", local_config_path(dir).display()));
            }
        }
    }
    Ok(())
}

fn config_target(global: bool, project_dir: Option<&Path>) -> CliResult<PathBuf> {
    if global {
        global_config_path().ok_or_else(|| {
            CliError::InvalidArgs("cannot determine global config directory".to_string())
        })
    } else {
        project_dir
            .map(local_config_path)
            .ok_or_else(|| CliError::InvalidArgs("no project directory".to_string()))
    }
}
