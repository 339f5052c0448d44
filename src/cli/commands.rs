//! Command handlers

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{
    load_forest, load_script, render_forest, replay, DocumentFormat, DragController, Move,
};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, OutputFormat, Settings};
use crate::domain::{
    DropPosition, DropRejection, DropTarget, KindFilter, LayerForest, NodeId, PointerSample, Rect,
};
use crate::tree_traits::TreeNodeConvert;

/// Execute the CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::InvalidArgs("no command given, see --help".to_string()));
    };

    match command {
        Commands::Config { command } => return cmd_config(cli, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let settings = load_settings(cli)?;
    let format = cli.format.unwrap_or(settings.output.format);
    debug!("output format: {}", format);

    match command {
        Commands::Show { file } => {
            let forest = load_forest(file)?;
            print_forest(&forest, format)
        }
        Commands::Move {
            file,
            dragged,
            target,
            position,
        } => cmd_move(
            file,
            &settings,
            dragged,
            DropTarget::parse(target),
            *position,
            format,
        ),
        Commands::Promote { file, id } => cmd_move(
            file,
            &settings,
            id,
            DropTarget::MainLevel,
            DropPosition::After,
            format,
        ),
        Commands::Append { file, id, group } => cmd_append(file, &settings, id, group, format),
        Commands::Replay { file, script } => cmd_replay(file, script, &settings, format),
        Commands::Order { file } => {
            let forest = load_forest(file)?;
            for id in forest.order() {
                output::plain(&id);
            }
            Ok(())
        }
        Commands::Filter { file, name, kind } => cmd_filter(file, name.as_deref(), *kind, format),
        Commands::Stats { file } => cmd_stats(file),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(path))?,
        None => Settings::load()?,
    };
    Ok(settings)
}

fn print_forest(forest: &LayerForest, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Tree => output::plain(&forest.to_tree_string()),
        OutputFormat::Json => output::plain(&render_forest(forest, DocumentFormat::Json)?),
        OutputFormat::Toml => output::plain(&render_forest(forest, DocumentFormat::Toml)?),
    }
    Ok(())
}

// Machine-readable formats get the document only.
fn report_move(moved: &Move, format: OutputFormat) {
    if format == OutputFormat::Tree {
        output::moved(moved);
    }
}

/// Pointer sample that classifies as `position` on a row of a group.
fn synthetic_pointer(position: DropPosition, settings: &Settings) -> PointerSample {
    let row = Rect::new(0.0, 0.0, 100.0, 100.0);
    let relative_y = match position {
        DropPosition::Before => 0.0,
        DropPosition::After => 1.0,
        DropPosition::Inside => {
            (settings.engine.inside_band_lower + settings.engine.inside_band_upper) / 2.0
        }
    };
    PointerSample::new(row, row.right(), relative_y * row.height)
}

/// One drag gesture driven through the controller: begin, hover, drop.
#[instrument(level = "debug", skip(settings, format))]
fn cmd_move(
    file: &Path,
    settings: &Settings,
    dragged: &str,
    target: DropTarget,
    position: DropPosition,
    format: OutputFormat,
) -> CliResult<()> {
    let forest = load_forest(file)?;
    let mut controller = DragController::from_settings(forest, &settings.engine)?;

    controller.begin_drag(NodeId::from(dragged));
    match &target {
        DropTarget::MainLevel => {
            controller.hover_main_level();
        }
        DropTarget::Node(id) => {
            let update = controller.hover(id, &synthetic_pointer(position, settings));
            let classified = update.session.drop_position();
            if update.session.drop_target().is_some() && classified != position {
                controller.end_drag();
                return Err(DropRejection::UnsupportedInsertTarget(id.clone()).into());
            }
        }
    }

    let moved = controller.drop_on(&target)?;
    report_move(&moved, format);
    print_forest(controller.forest(), format)
}

#[instrument(level = "debug", skip(settings, format))]
fn cmd_append(
    file: &Path,
    settings: &Settings,
    id: &str,
    group: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let forest = load_forest(file)?;
    let mut controller = DragController::from_settings(forest, &settings.engine)?;
    controller.begin_drag(NodeId::from(id));
    let moved = controller.drop_at_end(&NodeId::from(group))?;
    report_move(&moved, format);
    print_forest(controller.forest(), format)
}

#[instrument(level = "debug", skip(settings, format))]
fn cmd_replay(
    file: &Path,
    script: &Path,
    settings: &Settings,
    format: OutputFormat,
) -> CliResult<()> {
    let forest = load_forest(file)?;
    let script = load_script(script)?;
    let mut controller = DragController::from_settings(forest, &settings.engine)?;

    let reports = replay(&mut controller, &script);
    if format == OutputFormat::Tree {
        reports.iter().for_each(output::step);
        output::header("Result");
    }
    print_forest(controller.forest(), format)
}

fn cmd_filter(
    file: &Path,
    name: Option<&str>,
    kind: KindFilter,
    format: OutputFormat,
) -> CliResult<()> {
    let mut forest = load_forest(file)?.filter_by_kind(kind);
    if let Some(term) = name {
        forest = forest.filter_by_name(term);
    }
    print_forest(&forest, format)
}

fn cmd_stats(file: &Path) -> CliResult<()> {
    let forest = load_forest(file)?;
    let visible = forest.visible_layers().iter().map(|node| &node.id).join(", ");
    output::stat("layers", &forest.count_layers());
    output::stat("groups", &forest.count_groups());
    output::stat("depth", &forest.depth());
    output::stat("visible", &visible);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::plain(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::plain(&Settings::template()),
        ConfigCommands::Path => {
            let path = cli.config.clone().or_else(global_config_path);
            match path {
                Some(path) if path.exists() => output::plain(&path.display()),
                Some(path) => output::plain(&format!("{} (not found)", path.display())),
                None => output::warning("no config directory available"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classify;
    use crate::domain::InsideBand;

    #[test]
    fn given_requested_position_when_building_pointer_then_group_classifies_the_same() {
        let settings = Settings::default();
        let band = InsideBand::default();
        for position in [DropPosition::Before, DropPosition::After, DropPosition::Inside] {
            let pointer = synthetic_pointer(position, &settings);
            assert_eq!(classify(&pointer, true, &band), position);
        }
    }
}
