//! Command dispatch

use std::collections::HashSet;
use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::{
    ApplicationError, ApplicationResult, EditorSession, IoResultExt, ScriptRunner, ScriptSink,
};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, RenderConfig, Settings};
use crate::domain::{Forest, NodeId};
use crate::infrastructure::{codec, InfraError};
use crate::tree_traits::{RenderView, TreeNodeConvert};

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run {
            script,
            import,
            export,
        }) => _run(settings, script.as_deref(), import.as_deref(), *export),
        Some(Commands::Show { file, all, ids }) => _show(settings, file, *all, *ids),
        Some(Commands::Validate { file }) => _validate(file),
        Some(Commands::Config { command }) => _config(cli, settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "tocedit", &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `tocedit --help`".to_string(),
        )),
    }
}

/// Prints `show` as a tree and `export` as JSON on stdout.
struct StdoutSink<'a> {
    render: &'a RenderConfig,
}

impl ScriptSink for StdoutSink<'_> {
    fn show(&mut self, session: &EditorSession) -> ApplicationResult<()> {
        let view = RenderView::new(session.expanded(), self.render);
        output::info(&session.forest().to_tree_string(&view));
        Ok(())
    }

    fn export(&mut self, session: &EditorSession) -> ApplicationResult<()> {
        let json = codec::encode(session.forest()).map_err(|e| ApplicationError::OperationFailed {
            context: "export forest".to_string(),
            source: Box::new(e),
        })?;
        output::info(&json);
        Ok(())
    }
}

#[instrument(skip(settings))]
fn _run(
    settings: &Settings,
    script: Option<&Path>,
    import: Option<&Path>,
    export: bool,
) -> CliResult<()> {
    let forest = match import {
        Some(path) => codec::import(path)?,
        None => Forest::new(),
    };
    debug!("starting with {} nodes", forest.node_count());

    let text = match script {
        Some(path) => std::fs::read_to_string(path).with_path_context("read script", path)?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| InfraError::io("read script from stdin", e))?;
            text
        }
    };

    let ids = settings.id_generator(&forest);
    let mut session = EditorSession::new(forest, ids, settings.session_options());
    let mut sink = StdoutSink {
        render: &settings.render,
    };
    let report = ScriptRunner::new().run(&mut session, &text, &mut sink)?;

    if export {
        sink.export(&session)?;
    }
    output::success(&format!(
        "{} applied, {} unchanged, {} rejected ({} nodes)",
        report.applied,
        report.unchanged,
        report.rejected,
        session.forest().node_count()
    ));
    if report.rejected > 0 {
        output::warning(&format!("{} move(s) rejected", report.rejected));
    }
    Ok(())
}

#[instrument(skip(settings))]
fn _show(settings: &Settings, file: &Path, all: bool, ids: bool) -> CliResult<()> {
    let forest = codec::import(file)?;
    let expanded: HashSet<NodeId> = if all {
        forest
            .iter()
            .filter(|node| !node.is_leaf())
            .map(|node| node.id.clone())
            .collect()
    } else {
        forest.roots().iter().map(|node| node.id.clone()).collect()
    };
    let mut render = settings.render.clone();
    render.show_ids |= ids;

    let view = RenderView::new(&expanded, &render);
    output::info(&forest.to_tree_string(&view));
    Ok(())
}

#[instrument]
fn _validate(file: &Path) -> CliResult<()> {
    let forest = codec::import(file)?;
    output::success(&format!("{} is valid", file.display()));
    output::action("nodes", &forest.node_count());
    output::action("roots", &forest.roots().len());
    output::action("depth", &forest.depth());
    output::action("leaves", &forest.leaf_nodes().len());
    Ok(())
}

fn _config(cli: &Cli, settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files (lowest to highest precedence)");
            match global_config_path() {
                Some(path) => config_path_line("global", &path),
                None => output::detail("global: <no config directory>"),
            }
            let dir = match &cli.dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()
                    .map_err(|e| InfraError::io("resolve current directory", e))?,
            };
            config_path_line("local", &local_config_path(&dir));
        }
        ConfigCommands::Template => {
            output::info(&Settings::template());
        }
    }
    Ok(())
}

fn config_path_line(label: &str, path: &Path) {
    let msg = format!("{}: {}", label, path.display());
    if path.exists() {
        output::success_detail(&msg);
    } else {
        output::failure(&msg);
    }
}
