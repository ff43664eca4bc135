//! # treedict
//!
//! A CLI for looking at nested result data as a tree or as tables, and for
//! exporting those tables to HTML and CSV.
//!
//! ## Overview
//!
//! treedict is built on top of treedictlib. It reads a JSON document whose
//! nested objects form the key levels, builds a tuple-keyed tree from it and
//! flattens that tree into two-level tables.
//!
//! ## Usage
//!
//! ```bash
//! # Directory-like view of the tree
//! treedict tree results.json
//!
//! # All tables as aligned text, or as JSON
//! treedict tables results.json
//! treedict tables results.json --output json
//!
//! # HTML page of tables (default) or a collapsible tree
//! treedict html results.json --dir reports --file results.html
//! treedict html results.json --tree --template my_page.html
//!
//! # One CSV per table
//! treedict csv results.json --dir csv
//!
//! # Read from stdin
//! cat results.json | treedict tables -
//! ```

mod render;

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use outstanding::cli::{App, CommandContext, HandlerResult, Output, RunResult};
use outstanding::Theme;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use treedictlib::output::{tables_to_html_file, to_csv_files, tree_to_html_file, HtmlTemplate};
use treedictlib::{sort_by_name, ExportOptions, FlattenOptions, TreeMap};

use render::{PATHS_TEMPLATE, TABLES_TEMPLATE, TREE_TEMPLATE};

fn input_arg() -> Arg {
    Arg::new("input")
        .help("JSON file with nested objects ('-' reads stdin)")
        .required(true)
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("treedict")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("View nested result data as trees and tables, export to HTML and CSV")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log progress to stderr (-vv for debug output)"),
        )
        .arg(
            Arg::new("separator")
                .long("separator")
                .global(true)
                .default_value("|")
                .help("Separator between prefix labels in table names"),
        )
        .arg(
            Arg::new("title-prefix")
                .long("title-prefix")
                .global(true)
                .default_value("Table: ")
                .help("Text placed before every table name"),
        )
        .arg(
            Arg::new("properties-name")
                .long("properties-name")
                .global(true)
                .default_value("Properties")
                .help("Name of the table holding top-level values"),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the tree in a directory-like layout")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("tables")
                .about("Print every table the tree flattens into")
                .arg(input_arg()),
        )
        .subcommand(
            Command::new("html")
                .about("Write an HTML page of tables, or of the tree with --tree")
                .arg(input_arg())
                .arg(
                    Arg::new("dir")
                        .short('d')
                        .long("dir")
                        .help("Output directory (created if missing)"),
                )
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .help("Output file name [default: tables.html, or tree.html with --tree]"),
                )
                .arg(
                    Arg::new("tree")
                        .long("tree")
                        .action(ArgAction::SetTrue)
                        .help("Render the tree as collapsible panels instead of tables"),
                )
                .arg(
                    Arg::new("template")
                        .short('t')
                        .long("template")
                        .help("Page template containing a #SPLIT# marker"),
                ),
        )
        .subcommand(
            Command::new("csv")
                .about("Write one CSV file per table")
                .arg(input_arg())
                .arg(
                    Arg::new("dir")
                        .short('d')
                        .long("dir")
                        .default_value(".")
                        .help("Output directory (created if missing)"),
                )
                .arg(
                    Arg::new("max-name-len")
                        .long("max-name-len")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("200")
                        .help("Shorten table names longer than this in file names"),
                ),
        )
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence over -v.
fn init_logging(matches: &ArgMatches) {
    let level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("treedictlib={level},treedict={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

/// Extract table naming options from matches
fn extract_flatten_options(matches: &ArgMatches) -> FlattenOptions {
    let mut options = FlattenOptions::new();
    if let Some(separator) = matches.get_one::<String>("separator") {
        options = options.with_separator(separator);
    }
    if let Some(prefix) = matches.get_one::<String>("title-prefix") {
        options = options.with_title_prefix(prefix);
    }
    if let Some(name) = matches.get_one::<String>("properties-name") {
        options = options.with_properties_name(name);
    }
    options
}

/// Read the input document and build the tree
fn load_tree(matches: &ArgMatches) -> anyhow::Result<TreeMap> {
    init_logging(matches);

    let input = matches
        .get_one::<String>("input")
        .map(|s| s.as_str())
        .unwrap_or("-");

    let json = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| anyhow::anyhow!("failed to read '{input}': {e}"))?
    };

    let tree = TreeMap::from_json_str(&json)?;
    debug!(entries = tree.len(), depth = tree.max_depth(), "loaded input");
    Ok(tree)
}

/// Handler for tree command
fn tree_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let tree = load_tree(matches)?;

    // For JSON mode, return the stored entries
    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(render::tree_entries(&tree))?));
    }

    Ok(Output::Render(serde_json::to_value(render::tree_context(&tree))?))
}

/// Handler for tables command
fn tables_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let tree = load_tree(matches)?;
    let mut tables = tree.to_tables_with(&extract_flatten_options(matches))?;
    sort_by_name(&mut tables);

    // For JSON mode, return raw tables
    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(&tables)?));
    }

    Ok(Output::Render(serde_json::to_value(render::tables_context(&tables))?))
}

/// Handler for html command
fn html_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let tree = load_tree(matches)?;
    let as_tree = matches.get_flag("tree");
    let dir = matches.get_one::<String>("dir").map(Path::new);

    let template = match matches.get_one::<String>("template") {
        Some(path) => HtmlTemplate::from_file(path)
            .map_err(|e| anyhow::anyhow!("failed to load template '{path}': {e}"))?,
        None if as_tree => HtmlTemplate::accordion(),
        None => HtmlTemplate::tables(),
    };

    let path = if as_tree {
        let filename = matches
            .get_one::<String>("file")
            .map(|s| s.as_str())
            .unwrap_or("tree.html");
        tree_to_html_file(&tree, dir, filename, &template)?
    } else {
        let filename = matches
            .get_one::<String>("file")
            .map(|s| s.as_str())
            .unwrap_or("tables.html");
        let options = extract_flatten_options(matches);
        tables_to_html_file(&tree, dir, filename, &template, &options)?
    };

    written_paths(&[path], ctx)
}

/// Handler for csv command
fn csv_handler(matches: &ArgMatches, ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    let tree = load_tree(matches)?;
    let dir = matches
        .get_one::<String>("dir")
        .map(|s| s.as_str())
        .unwrap_or(".");
    let max_name_len = matches
        .get_one::<usize>("max-name-len")
        .copied()
        .unwrap_or(200);

    let options = ExportOptions::new()
        .with_flatten(extract_flatten_options(matches))
        .with_max_name_len(max_name_len);

    let paths = to_csv_files(&tree, Path::new(dir), &options)?;
    written_paths(&paths, ctx)
}

/// Report written files, one per line or as a JSON list
fn written_paths(paths: &[PathBuf], ctx: &CommandContext) -> HandlerResult<serde_json::Value> {
    if ctx.output_mode.is_structured() {
        return Ok(Output::Render(serde_json::to_value(paths)?));
    }
    Ok(Output::Render(serde_json::to_value(render::paths_context(paths))?))
}

fn main() -> ExitCode {
    let cmd = build_command();

    let result = App::builder()
        .theme(Theme::new())
        .command("tree", tree_handler, TREE_TEMPLATE)
        .command("tables", tables_handler, TABLES_TEMPLATE)
        .command("html", html_handler, PATHS_TEMPLATE)
        .command("csv", csv_handler, PATHS_TEMPLATE)
        .run_to_string(cmd, std::env::args());

    match result {
        RunResult::Handled(output) => {
            if output.starts_with("Error:") {
                eprintln!("{}", output);
                return ExitCode::FAILURE;
            }
            print!("{}", output);
            ExitCode::SUCCESS
        }
        RunResult::Binary(_, _) => ExitCode::SUCCESS,
        RunResult::NoMatch(_) => {
            eprintln!("Error: no command given, see --help");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outstanding::OutputMode;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_flatten_options_from_flags() {
        let matches = build_command().get_matches_from([
            "treedict",
            "tables",
            "in.json",
            "--separator",
            "/",
            "--title-prefix",
            "",
            "--properties-name",
            "Scalars",
        ]);
        let (_, sub) = matches.subcommand().unwrap();
        let options = extract_flatten_options(sub);
        assert_eq!(options.separator, "/");
        assert_eq!(options.title_prefix, "");
        assert_eq!(options.properties_name, "Scalars");
    }

    fn context(output_mode: OutputMode) -> CommandContext {
        CommandContext {
            output_mode,
            command_path: vec![],
        }
    }

    fn tables_matches(input: &Path) -> ArgMatches {
        let matches =
            build_command().get_matches_from(["treedict", "tables", input.to_str().unwrap()]);
        matches.subcommand_matches("tables").unwrap().clone()
    }

    #[test]
    fn test_tables_handler_output_modes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        std::fs::write(&input, r#"{"host": "ci", "r1": {"cpu": {"mean": 1}}}"#).unwrap();
        let matches = tables_matches(&input);

        let Ok(Output::Render(json)) = tables_handler(&matches, &context(OutputMode::Json)) else {
            panic!("expected rendered output");
        };
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Properties", "Table: r1"]);

        let Ok(Output::Render(text)) = tables_handler(&matches, &context(OutputMode::Text)) else {
            panic!("expected rendered output");
        };
        assert_eq!(text["tables"].as_array().unwrap().len(), 2);
        assert_eq!(text["tables"][1]["rows"], serde_json::json!(["cpu     1"]));
    }

    #[test]
    fn test_tables_handler_empty_tree_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        std::fs::write(&input, "{}").unwrap();

        let result = tables_handler(&tables_matches(&input), &context(OutputMode::Text));
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("empty tree"));
    }

    #[test]
    fn test_flatten_option_defaults() {
        let matches = build_command().get_matches_from(["treedict", "tree", "in.json"]);
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(extract_flatten_options(sub), FlattenOptions::default());
    }
}
