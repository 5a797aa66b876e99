//! Directive Registry CLI
//!
//! Command-line interface for inspecting directive usage in schema documents.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};

use directive_registry::{
    build_schema, builtin_types, lint, load_document_auto, load_json_str, resolve_field,
    roles_at, roles_of, DirectiveRegistry, FileStatus, NodeKind, RegistryConfig, Role,
    SchemaNode, Severity,
};

#[derive(Parser)]
#[command(name = "directive-registry")]
#[command(about = "Discover, classify and check schema directive handlers")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./directive-registry.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered directives and the roles they fulfil
    Catalog {
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the directives bound to every node of a schema document
    Inspect {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Apply manipulator directives and print the resulting document
    Build {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Resolve one field of a value through its directives
    Resolve {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Field to resolve, as Type.field
        #[arg(long)]
        field: String,

        /// Parent value as JSON
        #[arg(long, default_value = "{}")]
        root: String,

        /// Field arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Lint schema documents for directive errors
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = registry_from(cli.config.as_deref()).and_then(|registry| match cli.command {
        Commands::Catalog { json } => run_catalog(&registry, json),
        Commands::Inspect { schema, pretty } => run_inspect(&registry, &schema, pretty),
        Commands::Build {
            schema,
            output,
            pretty,
        } => run_build(&registry, &schema, output, pretty),
        Commands::Resolve {
            schema,
            field,
            root,
            args,
        } => run_resolve(&registry, &schema, &field, &root, &args),
        Commands::Lint {
            path,
            format,
            strict,
        } => run_lint(&registry, &path, &format, strict, cli.quiet),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

/// Install a stderr subscriber; `DIRECTIVE_REGISTRY_LOG` overrides the level.
fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DIRECTIVE_REGISTRY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn registry_from(config_path: Option<&Path>) -> Result<DirectiveRegistry, u8> {
    let config = RegistryConfig::load(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;
    Ok(DirectiveRegistry::from_config(&config, &builtin_types()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

#[derive(Serialize)]
struct CatalogEntry<'a> {
    name: &'a str,
    roles: Vec<Role>,
    required_arguments: &'a [&'static str],
}

fn run_catalog(registry: &DirectiveRegistry, json: bool) -> Result<(), u8> {
    let catalog = registry.catalog();
    let entries: Vec<CatalogEntry<'_>> = catalog
        .names()
        .into_iter()
        .filter_map(|name| {
            catalog.representative(name).map(|handler| CatalogEntry {
                name,
                roles: roles_of(handler),
                required_arguments: handler.required_arguments(),
            })
        })
        .collect();

    if json {
        println!("{}", to_json(&entries, true)?);
        return Ok(());
    }

    for entry in &entries {
        let roles: Vec<&str> = entry.roles.iter().map(Role::as_str).collect();
        println!("@{:<16} {}", entry.name, roles.join(", "));
    }
    Ok(())
}

#[derive(Serialize)]
struct InspectedNode {
    coordinate: String,
    kind: NodeKind,
    directives: Vec<InspectedDirective>,
}

#[derive(Serialize)]
struct InspectedDirective {
    name: String,
    roles: Vec<Role>,
}

fn run_inspect(registry: &DirectiveRegistry, schema: &str, pretty: bool) -> Result<(), u8> {
    let document = load_document_auto(schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let mut nodes = Vec::new();
    for node in document.nodes() {
        let bound = registry.directives_of(&node).map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;
        if bound.is_empty() {
            continue;
        }
        // Surface resolver conflicts the same way a schema build would.
        let checked = match node.kind() {
            NodeKind::Type => registry.node_resolver(&node).map(|_| ()),
            NodeKind::Field => registry.field_resolver(&node).map(|_| ()),
            NodeKind::Argument => Ok(()),
        };
        checked.map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

        nodes.push(InspectedNode {
            coordinate: node.coordinate(),
            kind: node.kind(),
            directives: bound
                .iter()
                .map(|d| InspectedDirective {
                    name: d.name().to_string(),
                    roles: roles_at(d.as_ref(), node.kind()),
                })
                .collect(),
        });
    }

    println!("{}", to_json(&nodes, pretty)?);
    Ok(())
}

fn run_build(
    registry: &DirectiveRegistry,
    schema: &str,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let document = load_document_auto(schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let built = build_schema(&document, registry).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = to_json(&built, pretty)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_resolve(
    registry: &DirectiveRegistry,
    schema: &str,
    field: &str,
    root: &str,
    args: &str,
) -> Result<(), u8> {
    let Some((type_name, field_name)) = field.split_once('.') else {
        eprintln!("Error: --field must be Type.field, got \"{}\"", field);
        return Err(2);
    };

    let document = load_document_auto(schema).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let root = load_json_str(root).map_err(|e| {
        eprintln!("Error parsing --root: {}", e);
        2u8
    })?;
    let arguments: Map<String, Value> = match load_json_str(args) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            eprintln!("Error parsing --args: expected a JSON object");
            return Err(2);
        }
        Err(e) => {
            eprintln!("Error parsing --args: {}", e);
            return Err(2);
        }
    };

    let value = resolve_field(registry, &document, type_name, field_name, &root, arguments)
        .map_err(|e| {
            eprintln!("Error: {}", e);
            e.exit_code() as u8
        })?;

    println!("{}", value);
    Ok(())
}

fn run_lint(
    registry: &DirectiveRegistry,
    path: &Path,
    format: &str,
    strict: bool,
    quiet: bool,
) -> Result<(), u8> {
    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, registry, strict);

    if format == "json" {
        println!("{}", to_json(&result, true)?);
    } else {
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
