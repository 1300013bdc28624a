//! cartograph CLI.
//!
//! Loads an OpenAPI/Swagger document from a file or URL and inspects it:
//! summary counts, every `$ref` it contains, the target of a single
//! reference, and reference cycles.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use cartograph_resolver::Resolver;
use cartograph_spec::{load_with, LoadOptions, OpenApiSpec, Source};
use cartograph_telemetry::{
    init_logging, log_circular_reference, log_reference_resolved, log_resolution_failed,
    log_spec_loaded, LogFormat, TelemetryConfig,
};

#[derive(Parser, Debug)]
#[command(
    name = "cartograph",
    about = "Inspect OpenAPI documents and resolve their $ref pointers",
    version
)]
struct Cli {
    /// Log level filter (RUST_LOG takes precedence).
    #[arg(long, global = true, env = "CARTOGRAPH_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Log output format (pretty or json).
    #[arg(
        long,
        global = true,
        env = "CARTOGRAPH_LOG_FORMAT",
        default_value = "pretty",
        value_parser = parse_log_format
    )]
    log_format: LogFormat,

    /// Timeout in seconds when loading a document from a URL.
    #[arg(long, global = true, env = "CARTOGRAPH_HTTP_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cartograph version.
    Version,

    /// Summarize a document: title, version, paths, operations and components.
    Inspect {
        /// Document file path or http(s) URL.
        source: String,
    },

    /// List every $ref in a document, in document order.
    Refs {
        /// Document file path or http(s) URL.
        source: String,

        /// List each distinct reference once.
        #[arg(long)]
        unique: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },

    /// Print the target of a reference such as `#/components/schemas/Pet`.
    Resolve {
        /// Document file path or http(s) URL.
        source: String,

        /// The reference to resolve.
        reference: String,

        /// Return the immediate target without following chains or nested references.
        #[arg(long)]
        no_follow: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = TreeFormat::Json)]
        format: TreeFormat,
    },

    /// Check every local reference for cycles. Exits 1 if any is circular.
    Cycles {
        /// Document file path or http(s) URL.
        source: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ListFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum TreeFormat {
    Json,
    Yaml,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format '{}' (expected pretty or json)", s))
}

/// Result of `cartograph cycles`.
#[derive(Serialize, Default)]
struct CycleReport {
    checked: usize,
    circular: Vec<String>,
    failed: Vec<FailedReference>,
}

#[derive(Serialize)]
struct FailedReference {
    reference: String,
    code: &'static str,
    message: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = TelemetryConfig::new()
        .with_log_level(&cli.log_level)
        .with_log_format(cli.log_format);
    if let Err(e) = init_logging(&config) {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    let options = LoadOptions::default().with_timeout(Duration::from_secs(cli.timeout));

    let result = match cli.command {
        Command::Version => {
            println!("cartograph {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { source } => run_inspect(&source, &options),
        Command::Refs {
            source,
            unique,
            format,
        } => run_refs(&source, unique, format, &options),
        Command::Resolve {
            source,
            reference,
            no_follow,
            format,
        } => run_resolve(&source, &reference, !no_follow, format, &options),
        Command::Cycles { source, format } => run_cycles(&source, format, &options),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn load_spec(input: &str, options: &LoadOptions) -> anyhow::Result<OpenApiSpec> {
    let spec = load_with(&Source::detect(input), options)
        .with_context(|| format!("failed to load {}", input))?;
    log_spec_loaded!(
        source = %input,
        version = %spec.version,
        operations = spec.operations().count(),
        "Spec loaded"
    );
    Ok(spec)
}

/// Run the inspect command.
fn run_inspect(input: &str, options: &LoadOptions) -> anyhow::Result<ExitCode> {
    let spec = load_spec(input, options)?;

    println!("{:<12} {}", "title:", spec.title().unwrap_or("Untitled"));
    println!(
        "{:<12} {}",
        "version:",
        spec.info.as_ref().map_or("-", |info| info.version.as_str())
    );
    println!("{:<12} {}", "openapi:", spec.version);
    println!("{:<12} {}", "paths:", spec.paths.len());
    println!("{:<12} {}", "operations:", spec.operations().count());
    println!("{:<12} {}", "webhooks:", spec.webhooks.len());
    println!("components:");
    for (kind, count) in spec.components.counts() {
        println!("  {:<17} {}", format!("{}:", kind), count);
    }

    Ok(ExitCode::SUCCESS)
}

/// Run the refs command.
fn run_refs(
    input: &str,
    unique: bool,
    format: ListFormat,
    options: &LoadOptions,
) -> anyhow::Result<ExitCode> {
    let spec = load_spec(input, options)?;
    let resolver = Resolver::new(&spec);

    let refs: Vec<String> = if unique {
        resolver.get_unique_references(None).into_keys().collect()
    } else {
        resolver
            .get_all_references(None)
            .into_iter()
            .map(|reference| reference.ref_location)
            .collect()
    };

    match format {
        ListFormat::Text => {
            for reference in &refs {
                println!("{}", reference);
            }
        }
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&refs)?),
    }

    Ok(ExitCode::SUCCESS)
}

/// Run the resolve command.
fn run_resolve(
    input: &str,
    reference: &str,
    follow: bool,
    format: TreeFormat,
    options: &LoadOptions,
) -> anyhow::Result<ExitCode> {
    let spec = load_spec(input, options)?;
    let resolver = Resolver::new(&spec);

    let resolved = resolver
        .resolve(reference, follow)
        .with_context(|| format!("failed to resolve {}", reference))?;
    log_reference_resolved!(
        reference = %reference,
        kind = resolved.kind(),
        follow,
        "Reference resolved"
    );

    let tree = resolved.to_raw();
    match format {
        TreeFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
        TreeFormat::Yaml => print!("{}", serde_yaml::to_string(&tree)?),
    }

    Ok(ExitCode::SUCCESS)
}

/// Run the cycles command.
fn run_cycles(input: &str, format: ListFormat, options: &LoadOptions) -> anyhow::Result<ExitCode> {
    let spec = load_spec(input, options)?;
    let resolver = Resolver::new(&spec);
    let mut report = CycleReport::default();

    for (location, reference) in resolver.get_unique_references(None) {
        if !reference.is_local() {
            tracing::debug!(reference = %location, "Skipping external reference");
            continue;
        }
        report.checked += 1;

        match resolver.is_circular(&reference) {
            Ok(false) => {}
            Ok(true) => {
                log_circular_reference!(reference = %location, "Circular reference");
                report.circular.push(location);
            }
            Err(e) => {
                log_resolution_failed!(reference = %location, code = e.code(), error = %e, "Resolution failed");
                report.failed.push(FailedReference {
                    reference: location,
                    code: e.code(),
                    message: e.to_string(),
                });
            }
        }
    }

    match format {
        ListFormat::Text => {
            for reference in &report.circular {
                println!("circular: {}", reference);
            }
            for failed in &report.failed {
                println!("failed:   {} ({})", failed.reference, failed.message);
            }
            println!(
                "checked {} reference(s): {} circular, {} failed",
                report.checked,
                report.circular.len(),
                report.failed.len()
            );
        }
        ListFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.circular.is_empty() && report.failed.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
