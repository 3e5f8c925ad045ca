//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use serde::Serialize;
use termtree::Tree;
use tracing::{debug, instrument, warn};

use crate::application::services::{Extraction, ExtractionRequest};
use crate::cli::args::{Cli, Commands, ConfigCommands, InputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{AttributeTable, Node, RegionMap, Tier};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Extract {
            inputs,
            output,
            grouped,
        }) => cmd_extract(cli, inputs, output.as_deref(), *grouped),
        Some(Commands::Regions { inputs }) => cmd_regions(cli, inputs),
        Some(Commands::Summary { inputs }) => cmd_summary(cli, inputs),
        Some(Commands::Tree { inputs, title }) => cmd_tree(cli, inputs, title.as_deref()),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "titloc", &mut io::stdout());
            Ok(())
        }
        None => Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e).into()),
    }
}

fn container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.mod_dir.as_deref())?;
    debug!(mod_dir = %settings.mod_dir.display(), "settings loaded");
    Ok(ServiceContainer::new(settings))
}

/// Configured layout, overridden by whatever inputs were given explicitly.
fn build_request(container: &ServiceContainer, inputs: &InputArgs) -> ExtractionRequest {
    let mut request = container.default_request();
    if !inputs.titles.is_empty() {
        request.title_paths = inputs.titles.clone();
    }
    if !inputs.regions.is_empty() {
        request.region_paths = inputs.regions.clone();
    }
    if !inputs.cultures.is_empty() {
        request.culture_paths = inputs.cultures.clone();
    } else if !container.fs.is_dir(&container.settings.cultures_path()) {
        warn!(
            "no culture directory at {}, extracting without culture names",
            container.settings.cultures_path().display()
        );
        request.culture_paths.clear();
    }
    request.attribute_keys.extend(inputs.keys.iter().cloned());
    request
}

fn run_extraction(cli: &Cli, inputs: &InputArgs) -> CliResult<(ServiceContainer, Extraction)> {
    let container = container(cli)?;
    let request = build_request(&container, inputs);
    let extraction = container.extraction_service().extract(&request)?;
    Ok((container, extraction))
}

#[derive(Serialize)]
struct FlatReport<'a> {
    regions: &'a RegionMap,
    attributes: &'a AttributeTable,
}

#[instrument(skip(cli, inputs))]
fn cmd_extract(cli: &Cli, inputs: &InputArgs, output: Option<&Path>, grouped: bool) -> CliResult<()> {
    let (container, extraction) = run_extraction(cli, inputs)?;

    let rendered = if grouped {
        serde_json::to_string_pretty(&extraction.grouped_attributes())
    } else {
        serde_json::to_string_pretty(&FlatReport {
            regions: &extraction.regions,
            attributes: &extraction.attributes,
        })
    };
    let json = rendered.map_err(InfraError::from)?;

    match output {
        Some(path) => {
            container
                .fs
                .ensure_parent(path)
                .and_then(|_| container.fs.write(path, &json))
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!(
                "{} titles in {} regions → {}",
                extraction.attributes.len(),
                extraction.groups.len(),
                path.display()
            ));
        }
        None => output::info(&json),
    }
    Ok(())
}

#[instrument(skip(cli, inputs))]
fn cmd_regions(cli: &Cli, inputs: &InputArgs) -> CliResult<()> {
    let (container, extraction) = run_extraction(cli, inputs)?;
    for code in extraction.attributes.titles() {
        output::title_region(
            code,
            extraction.regions.get(code),
            &container.settings.titular_label,
        );
    }
    Ok(())
}

#[instrument(skip(cli, inputs))]
fn cmd_summary(cli: &Cli, inputs: &InputArgs) -> CliResult<()> {
    let (_, extraction) = run_extraction(cli, inputs)?;
    let width = extraction
        .groups
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(0);

    output::header(&format!(
        "{} titles, {} attribute keys ({} cultures)",
        extraction.attributes.len(),
        extraction.keys.len(),
        extraction.keys.cultures().count()
    ));
    for (label, titles) in &extraction.groups {
        output::count_row(label, titles.len(), width);
    }
    Ok(())
}

#[instrument(skip(cli, inputs))]
fn cmd_tree(cli: &Cli, inputs: &InputArgs, title: Option<&str>) -> CliResult<()> {
    let container = container(cli)?;
    let request = build_request(&container, inputs);
    let mut service = container.extraction_service();
    let extraction = service.extract(&request)?;
    // Parsed during extraction; served from the loader cache.
    let files = service.title_files(&request)?;
    let titular = container.settings.titular_label.as_str();

    match title {
        Some(code) => {
            let node = files
                .iter()
                .find_map(|file| find_title(&file.nodes, code))
                .ok_or_else(|| CliError::InvalidArgs(format!("unknown title: {code}")))?;
            let tier = Tier::of(code)
                .ok_or_else(|| CliError::InvalidArgs(format!("not a title code: {code}")))?;
            output::info(&title_tree(node, tier, &extraction.regions, titular));
        }
        None => {
            for file in &files {
                let leaves = file.nodes.iter().filter_map(|node| {
                    Tier::of(&node.key).map(|tier| title_tree(node, tier, &extraction.regions, titular))
                });
                output::info(&Tree::new(file.name.clone()).with_leaves(leaves));
            }
        }
    }
    Ok(())
}

/// Last definition of `code` anywhere below `nodes`.
fn find_title<'a>(nodes: &'a [Node], code: &str) -> Option<&'a Node> {
    nodes.iter().rev().find_map(|node| {
        if node.key == code {
            Some(node)
        } else if Tier::of(&node.key).is_some() {
            find_title(node.children(), code)
        } else {
            None
        }
    })
}

fn title_tree(node: &Node, tier: Tier, regions: &RegionMap, titular: &str) -> Tree<String> {
    let label = format!(
        "{} ({}) {}",
        node.key,
        tier,
        regions.get(&node.key).unwrap_or(titular)
    );
    let leaves = node.children().iter().filter_map(|child| {
        Tier::of(&child.key).map(|child_tier| title_tree(child, child_tier, regions, titular))
    });
    Tree::new(label).with_leaves(leaves)
}

#[instrument(skip(cli))]
fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(cli.mod_dir.as_deref())?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &describe_path(&path)),
                None => output::warning("no global config directory on this platform"),
            }
            let mod_dir = cli.mod_dir.clone().unwrap_or_else(|| ".".into());
            output::action("local", &describe_path(&local_config_path(&mod_dir)));
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory on this platform".to_string())
                })?
            } else {
                local_config_path(&cli.mod_dir.clone().unwrap_or_else(|| ".".into()))
            };
            init_config(&RealFileSystem, &path)?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}

/// Write the config template to `path`, refusing to overwrite.
fn init_config(fs: &dyn FileSystem, path: &Path) -> CliResult<()> {
    if fs.exists(path) {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            path.display()
        )));
    }
    fs.ensure_parent(path)
        .and_then(|_| fs.write(path, &Settings::template()))
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    Ok(())
}

fn describe_path(path: &Path) -> String {
    let state = if path.exists() { "exists" } else { "not found" };
    format!("{} ({})", path.display(), state)
}
