//! Command-line interface for drybones
//! Reads, checks and edits .dry interlinear text files.
//!
//! Usage:
//!   dry read `<path>` [--format `<format>`] [--line `<designation>`]  - Show lines aligned for the terminal
//!   dry check `<path>`...                                          - Parse files and report problems
//!   dry map `<path>` --mapping `<Old:New,...>` [--overwrite]         - Relabel rows
//!   dry merge `<file1>` `<rows1>` `<file2>` `<rows2>` [-o `<out>`]        - Combine rows from two files
//!   dry search `<query>` [`<path>`...] [--label `<label>`] [--regex]     - Search row contents
//!   dry wrap `<label>` [`<input>`] [--text-name `<name>`] [-o `<out>`]   - Wrap plain text into line groups
//!   dry texts                                                    - List the texts of the current project
//!   dry project create `<name>` | show | delete `<name>` [--yes]     - Manage projects
//!   dry accent table | convert-string [`<text>`] | convert-file `<path>` - Normalize accents
//!   dry config                                                   - Print the effective configuration

use clap::{Arg, ArgAction, ArgMatches, Command};
use drybones::config::{self, DryConfig};
use drybones::editing::{self, FileEditSession, MergeSpec, SessionOptions};
use drybones::formats::{serialize_lines, FormatRegistry};
use drybones::parsing::{parse_file, read_file, ParseOptions};
use drybones::project::{create_project, delete_project, find_project_root, Project};
use drybones::rendering::terminal::{page, target_width};
use drybones::rendering::RenderOptions;
use drybones::search::{search_lines, Query};
use drybones::{DryError, LinesAndResidues, PreconditionError};
use std::io::{BufRead, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let matches = Command::new("dry")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for reading and editing interlinear .dry files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("read")
                .about("Show the lines of a file aligned for the terminal")
                .arg(path_arg("Path to the .dry file, or a text name in the current project"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'pretty', 'dry', 'json')")
                        .default_value("pretty"),
                )
                .arg(
                    Arg::new("line")
                        .long("line")
                        .short('l')
                        .help("Only show the line with this designation"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .help("Target width in columns (default: terminal width)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("no-pager")
                        .long("no-pager")
                        .help("Print directly instead of through $PAGER")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse files and report format problems")
                .arg(
                    Arg::new("paths")
                        .help("Files to check")
                        .required(true)
                        .num_args(1..),
                ),
        )
        .subcommand(
            Command::new("map")
                .about("Relabel rows")
                .arg(path_arg("Path to the .dry file"))
                .arg(
                    Arg::new("mapping")
                        .long("mapping")
                        .short('m')
                        .help("Comma-joined Old:New pairs, e.g. 'TargetLang:Baseline,ContactLang:Translation'")
                        .required(true),
                )
                .arg(overwrite_arg()),
        )
        .subcommand(
            Command::new("merge")
                .about("Merge lines from two files, choosing which rows come from which file")
                .arg(Arg::new("first").help("First file").required(true).index(1))
                .arg(
                    Arg::new("first-rows")
                        .help("Rows to take from the first file, e.g. 'Baseline:BaselineRaw'")
                        .required(true)
                        .index(2),
                )
                .arg(Arg::new("second").help("Second file").required(true).index(3))
                .arg(
                    Arg::new("second-rows")
                        .help("Rows to take from the second file, e.g. '*'")
                        .required(true)
                        .index(4),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write here instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("Search row contents using string or regex match")
                .arg(Arg::new("query").help("Text to find").required(true).index(1))
                .arg(
                    Arg::new("paths")
                        .help("Files to search (default: every text in the current project)")
                        .num_args(0..)
                        .index(2),
                )
                .arg(
                    Arg::new("label")
                        .long("label")
                        .short('l')
                        .help("Only search rows with this label"),
                )
                .arg(
                    Arg::new("regex")
                        .long("regex")
                        .short('r')
                        .help("Treat the query as a regular expression")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("wrap")
                .about("Wrap plain text lines in line group delimiters")
                .arg(Arg::new("label").help("Row label for the text").required(true).index(1))
                .arg(Arg::new("input").help("Input file (default: stdin)").index(2))
                .arg(
                    Arg::new("text-name")
                        .long("text-name")
                        .short('t')
                        .help("Prefix designations with this text name"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write here instead of stdout"),
                ),
        )
        .subcommand(Command::new("texts").about("List the texts of the current project"))
        .subcommand(
            Command::new("project")
                .about("Create, show or delete projects")
                .subcommand_required(true)
                .subcommand(
                    Command::new("create")
                        .about("Create a project directory under the current directory")
                        .arg(Arg::new("name").help("Project name").required(true).index(1)),
                )
                .subcommand(Command::new("show").about("Show the project containing the current directory"))
                .subcommand(
                    Command::new("delete")
                        .about("Remove a project's marker directory; its .dry files are kept")
                        .arg(Arg::new("name").help("Project name").required(true).index(1))
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .short('y')
                                .help("Do not ask for confirmation")
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(
            Command::new("accent")
                .about("Deal with accent marks (diacritics)")
                .subcommand_required(true)
                .subcommand(Command::new("table").about("List the project's accent equivalences"))
                .subcommand(
                    Command::new("convert-string")
                        .about("Normalize accents in a string (default: each line of stdin)")
                        .arg(Arg::new("input").help("Text to convert").index(1))
                        .arg(to_base_arg()),
                )
                .subcommand(
                    Command::new("convert-file")
                        .about("Normalize accents in every row of a file")
                        .arg(path_arg("Path to the .dry file, or a text name in the current project"))
                        .arg(overwrite_arg())
                        .arg(to_base_arg()),
                ),
        )
        .subcommand(Command::new("config").about("Print the effective configuration"))
        .get_matches();

    if let Err(e) = run(&matches) {
        if e.is_internal() {
            eprintln!("Internal error: {e}");
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("DRYBONES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn path_arg(help: &'static str) -> Arg {
    Arg::new("path").help(help).required(true).index(1)
}

fn to_base_arg() -> Arg {
    Arg::new("to-base")
        .long("to-base")
        .help("Strip accents down to the base spelling instead of the preferred one")
        .action(ArgAction::SetTrue)
}

fn overwrite_arg() -> Arg {
    Arg::new("overwrite")
        .long("overwrite")
        .short('w')
        .help("Overwrite the input file instead of writing <name>_dryout.dry")
        .action(ArgAction::SetTrue)
}

/// Value of an argument clap already requires.
fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn run(matches: &ArgMatches) -> Result<(), DryError> {
    let config = config::load()?;
    match matches.subcommand() {
        Some(("read", read_matches)) => handle_read_command(read_matches, &config),
        Some(("check", check_matches)) => {
            let paths: Vec<&String> = check_matches.get_many::<String>("paths").into_iter().flatten().collect();
            handle_check_command(&paths)
        }
        Some(("map", map_matches)) => handle_map_command(
            required(map_matches, "path"),
            required(map_matches, "mapping"),
            map_matches.get_flag("overwrite"),
            &config,
        ),
        Some(("merge", merge_matches)) => handle_merge_command(merge_matches),
        Some(("search", search_matches)) => handle_search_command(search_matches, &config),
        Some(("wrap", wrap_matches)) => handle_wrap_command(wrap_matches),
        Some(("texts", _)) => handle_texts_command(&config),
        Some(("project", project_matches)) => match project_matches.subcommand() {
            Some(("create", create_matches)) => {
                handle_project_create_command(required(create_matches, "name"), &config)
            }
            Some(("show", _)) => handle_project_show_command(&config),
            Some(("delete", delete_matches)) => handle_project_delete_command(
                required(delete_matches, "name"),
                delete_matches.get_flag("yes"),
                &config,
            ),
            _ => unreachable!(),
        },
        Some(("accent", accent_matches)) => match accent_matches.subcommand() {
            Some(("table", _)) => handle_accent_table_command(&config),
            Some(("convert-string", convert_matches)) => handle_accent_string_command(convert_matches, &config),
            Some(("convert-file", convert_matches)) => handle_accent_file_command(convert_matches, &config),
            _ => unreachable!(),
        },
        Some(("config", _)) => handle_config_command(&config),
        _ => unreachable!(),
    }
}

/// A path on disk, or failing that, a text name in the current project.
fn resolve_path(path_or_name: &str, config: &DryConfig) -> Result<PathBuf, DryError> {
    let path = PathBuf::from(path_or_name);
    if path.exists() {
        return Ok(path);
    }
    current_project(config)?.resolve_text(path_or_name)
}

fn current_project(config: &DryConfig) -> Result<Project, DryError> {
    let cwd = std::env::current_dir().map_err(|e| DryError::io(".", e))?;
    let root = find_project_root(&cwd, &config.project).ok_or_else(|| {
        DryError::Project(format!("no drybones project found at or above {}", cwd.display()))
    })?;
    Project::load(root, &config.project)
}

fn report_advisories(document: &LinesAndResidues) {
    for advisory in &document.advisories {
        eprintln!("Warning: {advisory}");
    }
}

fn handle_read_command(matches: &ArgMatches, config: &DryConfig) -> Result<(), DryError> {
    let path = resolve_path(required(matches, "path"), config)?;
    let mut document = parse_file(&path, ParseOptions::default())?;
    report_advisories(&document);

    if let Some(designation) = matches.get_one::<String>("line") {
        document.lines.retain(|parsed| parsed.line.designation().as_str() == designation);
        document.residues = Default::default();
        if document.is_empty() {
            return Err(PreconditionError::UnknownDesignation(designation.clone()).into());
        }
    }

    let width = match matches.get_one::<usize>("width") {
        Some(width) => *width,
        None => target_width(config.display.right_margin, config.display.fallback_width),
    };
    let registry = FormatRegistry::with_render_options(RenderOptions::from_config(&config.display, width));
    let format = required(matches, "format");
    if !registry.has(format) {
        eprintln!("Available formats: {}", registry.list_formats().join(", "));
    }
    let mut output = registry.serialize(&document, format)?;
    // The dry format is the file itself, byte for byte; views end in one newline.
    if format != "dry" {
        output.truncate(output.trim_end_matches('\n').len());
        output.push('\n');
    }

    let use_pager = config.display.use_pager && !matches.get_flag("no-pager") && document.len() > 1;
    page(&output, use_pager)
}

fn handle_check_command(paths: &[&String]) -> Result<(), DryError> {
    let mut failed = 0;
    for path in paths {
        match parse_file(Path::new(path.as_str()), ParseOptions::default()) {
            Ok(document) => {
                report_advisories(&document);
                println!("{path}: {} lines", document.len());
            }
            Err(e) => {
                failed += 1;
                eprintln!("{path}: {e}");
            }
        }
    }
    if failed > 0 {
        return Err(DryError::CheckFailed {
            failed,
            total: paths.len(),
        });
    }
    Ok(())
}

fn handle_map_command(path: &str, mapping: &str, overwrite: bool, config: &DryConfig) -> Result<(), DryError> {
    let mapping = editing::parse_mapping(mapping)?;
    let path = resolve_path(path, config)?;
    let mut session =
        FileEditSession::open_with(&path, overwrite, SessionOptions::from_config(&config.editing))?;
    report_advisories(session.document());

    let changed = editing::relabel_session(&mut session, &mapping)?;
    let report = session.finish()?;
    if let Some(advisory) = &report.advisory {
        eprintln!("Warning: {advisory}");
    }
    println!("Relabeled {changed} rows; wrote {}", report.written_to.display());
    Ok(())
}

fn handle_merge_command(matches: &ArgMatches) -> Result<(), DryError> {
    let first = parse_file(Path::new(required(matches, "first")), ParseOptions::default())?;
    let second = parse_file(Path::new(required(matches, "second")), ParseOptions::default())?;
    let first_spec = MergeSpec::parse(required(matches, "first-rows"))?;
    let second_spec = MergeSpec::parse(required(matches, "second-rows"))?;

    let merged = editing::merge(&first, &first_spec, &second, &second_spec)?;
    let text = merged.to_text()?;
    write_or_print(matches.get_one::<String>("output"), &text)
}

fn handle_search_command(matches: &ArgMatches, config: &DryConfig) -> Result<(), DryError> {
    let query_text = required(matches, "query");
    let query = if matches.get_flag("regex") {
        Query::regex(query_text)?
    } else {
        Query::literal(query_text)
    };
    let label = matches.get_one::<String>("label").map(String::as_str);

    let paths: Vec<PathBuf> = match matches.get_many::<String>("paths") {
        Some(paths) => paths.map(PathBuf::from).collect(),
        None => current_project(config)?.texts()?.into_values().collect(),
    };

    let mut total = 0;
    for path in &paths {
        let document = parse_file(path, ParseOptions::default())?;
        for hit in search_lines(document.iter_lines(), &query, label) {
            total += 1;
            println!(
                "{}: [{}] {}: {}",
                path.display(),
                hit.designation,
                hit.label,
                hit.row_text
            );
        }
    }
    eprintln!("{total} matches");
    Ok(())
}

fn handle_wrap_command(matches: &ArgMatches) -> Result<(), DryError> {
    let text = match matches.get_one::<String>("input") {
        Some(input) => read_file(Path::new(input))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| DryError::io("<stdin>", e))?;
            text
        }
    };
    let text_name = matches.get_one::<String>("text-name").map(String::as_str);
    let lines = editing::wrap_text(&text, required(matches, "label"), text_name)?;
    write_or_print(matches.get_one::<String>("output"), &serialize_lines(&lines))
}

fn handle_texts_command(config: &DryConfig) -> Result<(), DryError> {
    let project = current_project(config)?;
    for (name, path) in project.texts()? {
        println!("{name}\t{}", path.display());
    }
    Ok(())
}

fn handle_project_create_command(name: &str, config: &DryConfig) -> Result<(), DryError> {
    let cwd = std::env::current_dir().map_err(|e| DryError::io(".", e))?;
    let project = create_project(&cwd, name, &config.project)?;
    eprintln!("Created new project {:?} at {}", project.name(), project.root().display());
    Ok(())
}

fn handle_project_show_command(config: &DryConfig) -> Result<(), DryError> {
    let project = current_project(config)?;
    println!("Project {:?} at {}", project.name(), project.root().display());
    Ok(())
}

fn handle_project_delete_command(name: &str, yes: bool, config: &DryConfig) -> Result<(), DryError> {
    let cwd = std::env::current_dir().map_err(|e| DryError::io(".", e))?;
    if !yes {
        eprintln!(
            "Deleting project {name:?} removes its {} directory; the .dry files stay. Type 'yes' to continue:",
            config.project.directory_name
        );
        let mut answer = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(|e| DryError::io("<stdin>", e))?;
        if answer.trim() != "yes" {
            eprintln!("Aborting.");
            return Ok(());
        }
    }
    let removed = delete_project(&cwd, name, &config.project)?;
    eprintln!("Deleted {}", removed.display());
    Ok(())
}

fn handle_accent_table_command(config: &DryConfig) -> Result<(), DryError> {
    let table = current_project(config)?.diacritics()?;
    print!("{table}");
    Ok(())
}

fn handle_accent_string_command(matches: &ArgMatches, config: &DryConfig) -> Result<(), DryError> {
    let table = current_project(config)?.diacritics()?;
    let to_base = matches.get_flag("to-base");
    if let Some(input) = matches.get_one::<String>("input") {
        println!("{}", table.translate(input, to_base));
        return Ok(());
    }
    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(|e| DryError::io("<stdin>", e))?;
        println!("{}", table.translate(&line, to_base));
    }
    Ok(())
}

fn handle_accent_file_command(matches: &ArgMatches, config: &DryConfig) -> Result<(), DryError> {
    let table = current_project(config)?.diacritics()?;
    let path = resolve_path(required(matches, "path"), config)?;
    let mut session = FileEditSession::open_with(
        &path,
        matches.get_flag("overwrite"),
        SessionOptions::from_config(&config.editing),
    )?;
    report_advisories(session.document());

    let changed = editing::convert_session(&mut session, &table, matches.get_flag("to-base"))?;
    let report = session.finish()?;
    if let Some(advisory) = &report.advisory {
        eprintln!("Warning: {advisory}");
    }
    println!("Converted {changed} lines; wrote {}", report.written_to.display());
    Ok(())
}

fn handle_config_command(config: &DryConfig) -> Result<(), DryError> {
    let yaml = serde_yaml::to_string(config).map_err(|e| DryError::Project(e.to_string()))?;
    print!("{yaml}");
    Ok(())
}

fn write_or_print(output: Option<&String>, text: &str) -> Result<(), DryError> {
    match output {
        Some(path) => {
            let path = Path::new(path);
            if path.exists() {
                return Err(PreconditionError::OutputExists(path.to_path_buf()).into());
            }
            std::fs::write(path, text).map_err(|e| DryError::io(path, e))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
