//! Command-line interface for ftlgen
//! This binary turns form definitions into FreeMarker-style export templates.
//!
//! Usage:
//!   ftlgen fields `<form>` [--search `<term>`] [--json] [--summary]   - Inspect extracted fields
//!   ftlgen generate `<form>` [--select `<id>`]... [--filter `<expr>`]... - Emit CSV templates
//!   ftlgen payload `<form>` `<sample>` [--map `<path=field>`]...          - Emit a payload template
//!   ftlgen formats                                                       - List template formats

mod session;

use clap::{Arg, ArgAction, ArgMatches, Command};
use ftlgen_babel::formats::csv::CsvFormat;
use ftlgen_babel::{
    ExportSession, FormatRegistry, Operator, PayloadMapping, TemplateDocument, TemplateMode,
};
use ftlgen_config::{FtlgenConfig, Loader};
use ftlgen_parser::form::{build_catalog, describe_structure, FieldCatalog, FormLoader, RootShape};
use ftlgen_parser::payload::parse_payload;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is not given.
const LOCAL_CONFIG: &str = "ftlgen.toml";

fn build_cli() -> Command {
    Command::new("ftlgen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate FreeMarker export templates from form definitions")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log extraction and rendering details to stderr"),
        )
        .subcommand(
            Command::new("fields")
                .about("List the fields extracted from a form definition")
                .arg(Arg::new("form").help("Form definition (JSON)").required(true).index(1))
                .arg(
                    Arg::new("search")
                        .long("search")
                        .short('s')
                        .help("Only show fields whose name, page or section contains TERM"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print fields as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("summary")
                        .long("summary")
                        .help("Print field, page and section counts")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate CSV export templates")
                .arg(Arg::new("form").help("Form definition (JSON)").required(true).index(1))
                .arg(
                    Arg::new("select")
                        .long("select")
                        .help("Field id to export (repeatable, column order)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Export every field")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .help("Filter '[and|or] <field> <operator> [value]' (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("session")
                        .long("session")
                        .help("Saved session (JSON, or YAML by extension)"),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .value_parser(["auto", "single", "split"])
                        .help("Template mode (default from configuration)"),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .short('o')
                        .help("Write templates into DIR instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("payload")
                .about("Generate a JSON payload template from a sample document")
                .arg(Arg::new("form").help("Form definition (JSON)").required(true).index(1))
                .arg(Arg::new("sample").help("Sample payload (JSON)").required(true).index(2))
                .arg(
                    Arg::new("map")
                        .long("map")
                        .short('m')
                        .help("Bind a sample leaf to a field: PATH=FIELD (repeatable)")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("list")
                        .long("list")
                        .help("List the sample's leaf paths instead of rendering")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .short('o')
                        .help("Write the template into DIR instead of stdout"),
                ),
        )
        .subcommand(Command::new("formats").about("List available template formats"))
}

fn main() {
    let matches = build_cli().get_matches();

    init_tracing(matches.get_count("verbose"));

    if let Err(err) = run(&matches) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), String> {
    let config = load_config(matches.get_one::<String>("config"))?;

    match matches.subcommand() {
        Some(("fields", sub)) => handle_fields_command(sub, &config),
        Some(("generate", sub)) => handle_generate_command(sub, &config),
        Some(("payload", sub)) => handle_payload_command(sub, &config),
        Some(("formats", _)) => {
            handle_formats_command();
            Ok(())
        }
        _ => Err("No command given; see --help".to_string()),
    }
}

fn load_config(path: Option<&String>) -> Result<FtlgenConfig, String> {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    loader
        .build()
        .map_err(|e| format!("Invalid configuration: {}", e))
}

fn load_catalog(matches: &ArgMatches, config: &FtlgenConfig) -> Result<FieldCatalog, String> {
    let path = required(matches, "form")?;
    FormLoader::from_path(path)
        .and_then(|loader| loader.catalog(&config.extract_options()))
        .map_err(|e| format!("Cannot load form definition {}: {}", path, e))
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a String, String> {
    matches
        .get_one::<String>(name)
        .ok_or_else(|| format!("Missing argument <{}>", name))
}

fn values<'a>(matches: &'a ArgMatches, name: &str) -> impl Iterator<Item = &'a String> {
    matches
        .get_many::<String>(name)
        .into_iter()
        .flatten()
}

/// Handle the fields command
fn handle_fields_command(matches: &ArgMatches, config: &FtlgenConfig) -> Result<(), String> {
    let path = required(matches, "form")?;
    let doc = FormLoader::from_path(path)
        .and_then(|loader| loader.parse())
        .map_err(|e| format!("Cannot load form definition {}: {}", path, e))?;
    let layout = RootShape::detect(&doc).description();
    let catalog = build_catalog(&doc, &config.extract_options());

    if catalog.is_empty() {
        println!("No fields found (layout: {}). Top-level structure:", layout);
        for (key, kind) in describe_structure(&doc) {
            println!("  {}: {}", if key.is_empty() { "(root)" } else { key.as_str() }, kind);
        }
        return Ok(());
    }

    if matches.get_flag("summary") {
        let summary = catalog.summary();
        println!("Layout:             {}", layout);
        println!("Fields:             {}", summary.fields);
        println!("Pages:              {}", summary.pages);
        println!("Sections:           {}", summary.sections);
        println!("Repeating sections: {}", summary.repeating_sections);
        return Ok(());
    }

    let term = matches.get_one::<String>("search").map(String::as_str).unwrap_or("");
    let fields = catalog.search(term);

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&fields)
            .map_err(|e| format!("JSON serialization failed: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    println!("ID\tNAME\tTYPE\tPAGE\tSECTION\tSCOPE");
    for field in fields {
        let scope = match &field.repeating_section {
            Some(section) => format!("repeat:{}", section),
            None => "record".to_string(),
        };
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            field.identifier(),
            field.name,
            field.field_type,
            field.page,
            field.section,
            scope
        );
    }
    Ok(())
}

/// Handle the generate command
fn handle_generate_command(matches: &ArgMatches, config: &FtlgenConfig) -> Result<(), String> {
    let catalog = load_catalog(matches, config)?;

    let mut export = match matches.get_one::<String>("session") {
        Some(path) => {
            let saved = session::load_session(Path::new(path))?;
            let mut export = saved.session;
            if !saved.has_mode {
                export.mode = config.templates.mode;
            }
            export
        }
        None => ExportSession {
            mode: config.templates.mode,
            ..ExportSession::default()
        },
    };

    if matches.get_flag("all") {
        export.select_all(&catalog);
    }
    for id in values(matches, "select") {
        export.select(id.as_str());
    }
    for text in values(matches, "filter") {
        export.add_filter(session::parse_filter(text)?);
    }
    if let Some(mode) = matches.get_one::<String>("mode") {
        export.mode = match mode.as_str() {
            "single" => TemplateMode::Single,
            "split" => TemplateMode::Split,
            _ => TemplateMode::Auto,
        };
    }

    if export.selected_fields(&catalog).is_empty() {
        return Err("No fields selected; use --select, --all or --session".to_string());
    }

    let documents = FormatRegistry::with_defaults()
        .render(&catalog, &export, "csv")
        .map_err(|e| e.to_string())?;

    eprintln!(
        "{} columns selected, {} filters applied, {} template(s)",
        export.selected_fields(&catalog).len(),
        export.applied_filters(&catalog),
        if CsvFormat::is_split(&catalog, &export) { 2 } else { 1 }
    );

    emit(&documents, matches.get_one::<String>("out-dir"), config)
}

/// Handle the payload command
fn handle_payload_command(matches: &ArgMatches, config: &FtlgenConfig) -> Result<(), String> {
    let catalog = load_catalog(matches, config)?;

    let sample_path = required(matches, "sample")?;
    let sample = fs::read_to_string(sample_path)
        .map_err(|e| format!("Cannot read sample payload {}: {}", sample_path, e))?;
    let leaves = parse_payload(&sample, &config.sample_options()).map_err(|e| e.to_string())?;

    if matches.get_flag("list") {
        println!("PATH\tTYPE\tEXAMPLE\tMAPPABLE");
        for leaf in &leaves {
            println!(
                "{}\t{}\t{}\t{}",
                leaf.path,
                leaf.kind.as_str(),
                leaf.example,
                leaf.mappable
            );
        }
        return Ok(());
    }

    let mut mapping = PayloadMapping::new(leaves);
    for text in values(matches, "map") {
        let (path, field) = session::parse_binding(text)?;
        if mapping.leaf(&path).is_none() {
            return Err(format!("Sample payload has no leaf '{}'", path));
        }
        mapping.bind(path, field);
    }

    let export = ExportSession {
        payload: Some(mapping),
        ..ExportSession::default()
    };
    let documents = FormatRegistry::with_defaults()
        .render(&catalog, &export, "payload")
        .map_err(|e| e.to_string())?;

    emit(&documents, matches.get_one::<String>("out-dir"), config)
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available template formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!("  {}", name);
            println!("    {}", format.description());
            println!();
        }
    }
    println!("Filter operators:\n");
    for operator in Operator::ALL {
        println!("  {:<14}{}", operator.as_str(), operator.label());
    }
}

/// Print documents, or write them into `out_dir` under their configured names.
fn emit(
    documents: &[TemplateDocument],
    out_dir: Option<&String>,
    config: &FtlgenConfig,
) -> Result<(), String> {
    match out_dir {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            fs::create_dir_all(&dir)
                .map_err(|e| format!("Cannot create {}: {}", dir.display(), e))?;
            for document in documents {
                let path = dir.join(config.file_name(document.role));
                fs::write(&path, &document.contents)
                    .map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
                tracing::debug!(path = %path.display(), "wrote template");
                println!("{}", path.display());
            }
        }
        None if documents.len() == 1 => print!("{}", documents[0].contents),
        None => {
            for document in documents {
                println!("--- {} ---", config.file_name(document.role));
                print!("{}", document.contents);
            }
        }
    }
    Ok(())
}
