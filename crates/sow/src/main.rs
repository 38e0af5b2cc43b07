#![forbid(unsafe_code)]

mod list;

use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;

use sowkit_core::config::{Config, CONFIG_FILE};
use sowkit_core::model::{catalog_from_json, Catalog, DiagnosticResult, Sow};
use sowkit_core::types::{DiagnosticType, Status};
use sowkit_engine::ingest::{parse_diagnostic_markdown, render_markdown, template};
use sowkit_engine::scoring::{health_summary, sort_by_priority};
use sowkit_engine::sections::{generate_sow, link_section_items, sow_totals};
use sowkit_engine::state::{load_json, save_json};
use sowkit_engine::sync::{resync, SnapshotDrift};

#[derive(Parser)]
#[command(
    name = "sow",
    version,
    about = "Score diagnostics, import markdown, generate and sync statements of work."
)]
struct Cli {
    /// Debug logging on stderr (RUST_LOG still applies).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Write workspace defaults (.sowkit/config.json).
    Init,

    /// List the built-in diagnostic types.
    Types,

    /// Start a diagnostic for a customer from the type's seed checks.
    New {
        /// Customer identifier.
        customer: String,

        /// Diagnostic type: gtm, clay, cpq.
        #[arg(long = "type")]
        diagnostic_type: Option<String>,

        /// Diagnostic id (default: <customer>-<type>).
        #[arg(long)]
        id: Option<String>,

        /// Write to file instead of stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the markdown import template.
    Template {
        #[arg(long = "type")]
        diagnostic_type: Option<String>,
    },

    /// Parse a markdown diagnostic into records.
    Import {
        /// Markdown file (or "-" for stdin).
        #[arg(default_value = "-")]
        file: String,

        #[arg(long = "type")]
        diagnostic_type: Option<String>,

        /// Customer for a new diagnostic (default: the file stem).
        #[arg(long)]
        customer: Option<String>,

        /// Replace the processes and tools of this diagnostic file.
        #[arg(long)]
        into: Option<String>,

        /// Fail when the import produced warnings.
        #[arg(long)]
        strict: bool,

        /// Print the raw parse result (records and warnings) as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Render a diagnostic back to markdown.
    Export {
        /// Diagnostic .json file.
        file: String,
    },

    /// Edit one process in place.
    Set {
        /// Diagnostic .json file.
        file: String,

        /// Process name.
        process: String,

        /// New status: healthy, careful, warning, unable.
        #[arg(long)]
        status: Option<String>,

        /// Flag or unflag the process for the engagement.
        #[arg(long)]
        priority: Option<bool>,
    },

    /// Status counts, health score, and rating.
    Score {
        file: String,

        #[arg(long)]
        json: bool,
    },

    /// Processes bucketed by priority tier.
    Tiers {
        file: String,

        #[arg(long)]
        json: bool,
    },

    /// Build a SOW from a diagnostic and the service catalog.
    Generate {
        /// Diagnostic .json file.
        diagnostic: String,

        /// Service catalog .json (default: config `catalog`).
        #[arg(long)]
        catalog: Option<String>,

        #[arg(long)]
        title: Option<String>,

        /// SOW id (default: sow-<customer>-<type>).
        #[arg(long)]
        id: Option<String>,

        #[arg(short, long)]
        output: Option<String>,
    },

    /// Compare a SOW's snapshot with the current diagnostic.
    Sync {
        sow: String,
        diagnostic: String,

        #[arg(long)]
        json: bool,

        /// Exit non-zero when there is drift.
        #[arg(long)]
        check: bool,
    },

    /// Replace a SOW's snapshot with the current diagnostic.
    Resync { sow: String, diagnostic: String },

    /// Hours and amount across a SOW's sections.
    Totals {
        sow: String,

        #[arg(long)]
        json: bool,
    },

    /// Validate diagnostic and SOW documents against the schemas.
    Validate {
        #[arg(required = true)]
        files: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Summarize diagnostic files in a directory as a table.
    List {
        #[arg(default_value = ".")]
        dir: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = Config::load_workspace();

    match cli.cmd {
        Cmd::Init => cmd_init(),

        Cmd::Types => cmd_types(),

        Cmd::New {
            customer,
            diagnostic_type,
            id,
            output,
        } => cmd_new(
            &customer,
            resolve_type(diagnostic_type.as_deref(), &config)?,
            id.as_deref(),
            output.as_deref(),
        ),

        Cmd::Template { diagnostic_type } => {
            print!("{}", template(resolve_type(diagnostic_type.as_deref(), &config)?));
            Ok(())
        }

        Cmd::Import {
            file,
            diagnostic_type,
            customer,
            into,
            strict,
            json,
        } => cmd_import(
            &file,
            diagnostic_type.as_deref(),
            customer.as_deref(),
            into.as_deref(),
            strict || config.strict_import,
            json,
            &config,
        ),

        Cmd::Export { file } => cmd_export(&file),

        Cmd::Set {
            file,
            process,
            status,
            priority,
        } => cmd_set(&file, &process, status.as_deref(), priority),

        Cmd::Score { file, json } => cmd_score(&file, json),

        Cmd::Tiers { file, json } => cmd_tiers(&file, json),

        Cmd::Generate {
            diagnostic,
            catalog,
            title,
            id,
            output,
        } => cmd_generate(
            &diagnostic,
            catalog.as_deref().or(config.catalog.as_deref()),
            title.as_deref(),
            id.as_deref(),
            output.as_deref(),
        ),

        Cmd::Sync {
            sow,
            diagnostic,
            json,
            check,
        } => cmd_sync(&sow, &diagnostic, json, check),

        Cmd::Resync { sow, diagnostic } => cmd_resync(&sow, &diagnostic),

        Cmd::Totals { sow, json } => cmd_totals(&sow, json),

        Cmd::Validate { files, json } => cmd_validate(&files, json),

        Cmd::List { dir } => cmd_list(&dir),
    }
}

fn resolve_type(flag: Option<&str>, config: &Config) -> Result<DiagnosticType> {
    match flag {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(config.diagnostic_type),
    }
}

fn read_text(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file).with_context(|| format!("cannot read {file}"))
    }
}

fn load_diagnostic(file: &str) -> Result<DiagnosticResult> {
    load_json(Path::new(file))
}

fn load_sow(file: &str) -> Result<Sow> {
    load_json(Path::new(file))
}

fn load_catalog(path: Option<&str>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::new());
    };
    let content = std::fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
    catalog_from_json(&content).with_context(|| format!("{path}: invalid catalog"))
}

/// Pretty JSON to stdout, or to `output` with a status line on stderr.
fn emit<T: serde::Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            save_json(Path::new(path), value)?;
            eprintln!("wrote {path}");
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn cmd_init() -> Result<()> {
    if Path::new(CONFIG_FILE).exists() {
        eprintln!("{CONFIG_FILE} already exists");
        return Ok(());
    }
    Config::default().write_to(Path::new("."))?;
    eprintln!("created {CONFIG_FILE}");
    Ok(())
}

fn cmd_types() -> Result<()> {
    for (name, desc) in sowkit_core::seed::list_types() {
        println!("  {name:<6} {desc}");
    }
    Ok(())
}

fn cmd_new(
    customer: &str,
    diagnostic_type: DiagnosticType,
    id: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    let id = id
        .map(str::to_string)
        .unwrap_or_else(|| format!("{customer}-{diagnostic_type}"));
    let mut diagnostic = DiagnosticResult::new(id, customer, diagnostic_type, Utc::now());
    diagnostic.processes = sowkit_core::seed::processes(diagnostic_type);
    emit(&diagnostic, output)
}

fn cmd_import(
    file: &str,
    type_flag: Option<&str>,
    customer: Option<&str>,
    into: Option<&str>,
    strict: bool,
    json_out: bool,
    config: &Config,
) -> Result<()> {
    let existing = match into {
        Some(path) if Path::new(path).exists() => Some(load_diagnostic(path)?),
        _ => None,
    };

    let diagnostic_type = match (&existing, type_flag) {
        (Some(d), Some(raw)) => {
            let requested: DiagnosticType = raw.parse()?;
            if requested != d.diagnostic_type {
                bail!(
                    "--type {requested} does not match {} ({})",
                    into.unwrap_or_default(),
                    d.diagnostic_type
                );
            }
            requested
        }
        (Some(d), None) => d.diagnostic_type,
        (None, flag) => resolve_type(flag, config)?,
    };

    let text = read_text(file)?;
    let parsed = parse_diagnostic_markdown(&text, diagnostic_type);
    for warning in &parsed.warnings {
        eprintln!("  warn  {warning}");
    }
    if strict && parsed.has_warnings() {
        bail!("import of {file} produced {} warning(s)", parsed.warnings.len());
    }

    if json_out {
        println!("{}", serde_json::to_string_pretty(&parsed)?);
        return Ok(());
    }

    let now = Utc::now();
    let (process_count, tool_count) = (parsed.processes.len(), parsed.tools.len());
    let diagnostic = match existing {
        Some(mut d) => {
            d.apply_import(parsed.processes, parsed.tools, now);
            d
        }
        None => {
            let customer = match customer {
                Some(c) => c.to_string(),
                None => Path::new(file)
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .filter(|s| !s.is_empty() && s != "-")
                    .context("--customer is required when importing from stdin")?,
            };
            let id = format!("{customer}-{diagnostic_type}");
            let mut d = DiagnosticResult::new(id, customer, diagnostic_type, now);
            d.apply_import(parsed.processes, parsed.tools, now);
            d
        }
    };

    eprintln!("  imported {process_count} process(es), {tool_count} tool(s)");
    emit(&diagnostic, into)
}

fn cmd_export(file: &str) -> Result<()> {
    let d = load_diagnostic(file)?;
    print!("{}", render_markdown(d.diagnostic_type, &d.processes, &d.tools));
    Ok(())
}

fn cmd_set(file: &str, process: &str, status: Option<&str>, priority: Option<bool>) -> Result<()> {
    if status.is_none() && priority.is_none() {
        bail!("nothing to change: pass --status and/or --priority");
    }
    let mut d = load_diagnostic(file)?;
    let now = Utc::now();
    if let Some(raw) = status {
        let parsed = Status::parse(raw);
        if !parsed.is_canonical() {
            bail!(
                "invalid status \"{raw}\". valid: {}",
                Status::CANONICAL.join(", ")
            );
        }
        d.set_status(process, parsed, now)?;
    }
    if let Some(flag) = priority {
        d.set_priority(process, flag, now)?;
    }
    save_json(Path::new(file), &d)?;
    eprintln!("  updated {process} in {file}");
    Ok(())
}

fn cmd_score(file: &str, json_out: bool) -> Result<()> {
    let d = load_diagnostic(file)?;
    let summary = health_summary(&d.processes);

    if json_out {
        let out = json!({
            "customerId": d.customer_id,
            "diagnosticType": d.diagnostic_type,
            "counts": summary.counts,
            "score": summary.score,
            "rating": summary.rating,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let c = summary.counts;
        println!("{} {} diagnostic", d.customer_id, d.diagnostic_type.label());
        println!(
            "  healthy {}  careful {}  warning {}  unable {}",
            c.healthy, c.careful, c.warning, c.unable
        );
        println!("  score {} ({})", summary.score, summary.rating);
    }
    Ok(())
}

fn cmd_tiers(file: &str, json_out: bool) -> Result<()> {
    let d = load_diagnostic(file)?;
    let tiers = sort_by_priority(&d.processes);

    if json_out {
        println!("{}", serde_json::to_string_pretty(&tiers)?);
        return Ok(());
    }
    for (tier, bucket) in tiers.iter() {
        if bucket.is_empty() {
            continue;
        }
        println!("{tier} ({})", bucket.len());
        for p in bucket {
            let flag = if p.add_to_engagement { " *" } else { "" };
            println!("  - {} [{}]{flag}", p.name, p.status);
        }
    }
    Ok(())
}

fn cmd_generate(
    diagnostic_file: &str,
    catalog_path: Option<&str>,
    title: Option<&str>,
    id: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    let d = load_diagnostic(diagnostic_file)?;
    let catalog = load_catalog(catalog_path)?;

    let title = title
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} Remediation: {}", d.diagnostic_type.label(), d.customer_id));
    let id = id
        .map(str::to_string)
        .unwrap_or_else(|| format!("sow-{}-{}", d.customer_id, d.diagnostic_type));

    let sow = generate_sow(&id, &title, &d, &catalog, Utc::now());
    if sow.sections.is_empty() {
        eprintln!("  no actionable processes in {diagnostic_file}; SOW has no sections");
    }
    emit(&sow, output)
}

fn cmd_sync(sow_file: &str, diagnostic_file: &str, json_out: bool, check: bool) -> Result<()> {
    let sow = load_sow(sow_file)?;
    let d = load_diagnostic(diagnostic_file)?;
    ensure_same_subject(&sow, &d)?;

    let Some(report) = sow.sync_report(&d.processes) else {
        bail!("{sow_file} has no diagnostic snapshot; run `sow resync` to take one");
    };

    if json_out {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !report.has_changes {
        println!("in sync");
    } else {
        for p in &report.added {
            println!("  + {} [{}]", p.name, p.status);
        }
        for name in &report.removed {
            println!("  - {name}");
        }
        for change in &report.status_changed {
            println!(
                "  ~ {}: {} -> {}",
                change.name, change.previous_status, change.current_status
            );
        }
        for section in &sow.sections {
            let links = link_section_items(section, &d.processes);
            if !links.missing.is_empty() {
                println!(
                    "  section \"{}\" references missing: {}",
                    section.title,
                    links.missing.join(", ")
                );
            }
        }
        println!("{} change(s)", report.total_changes);
    }

    if check && report.has_changes {
        bail!("{sow_file} is out of sync ({} change(s))", report.total_changes);
    }
    Ok(())
}

fn cmd_resync(sow_file: &str, diagnostic_file: &str) -> Result<()> {
    let mut sow = load_sow(sow_file)?;
    let d = load_diagnostic(diagnostic_file)?;
    ensure_same_subject(&sow, &d)?;

    resync(&mut sow, &d.processes, Utc::now());
    save_json(Path::new(sow_file), &sow)?;
    eprintln!("  resynced {sow_file} ({} process(es))", d.processes.len());
    Ok(())
}

fn cmd_totals(sow_file: &str, json_out: bool) -> Result<()> {
    let sow = load_sow(sow_file)?;
    let totals = sow_totals(&sow.sections);

    if json_out {
        println!("{}", serde_json::to_string_pretty(&totals)?);
        return Ok(());
    }
    let w_title = sow
        .sections
        .iter()
        .map(|s| s.title.len())
        .max()
        .unwrap_or(7)
        .max(7);
    println!("{:<w_title$}  {:>5}  {:>5}  {:>9}", "SECTION", "HOURS", "RATE", "AMOUNT");
    for s in &sow.sections {
        println!(
            "{:<w_title$}  {:>5}  {:>5}  {:>9}",
            s.title,
            opt(s.hours),
            opt(s.rate),
            opt(s.amount())
        );
    }
    println!("{:<w_title$}  {:>5}  {:>5}  {:>9}", "TOTAL", totals.hours, "", totals.amount);
    if totals.unpriced_sections > 0 {
        eprintln!("  {} section(s) without hours or rate", totals.unpriced_sections);
    }
    Ok(())
}

fn cmd_validate(files: &[String], json_out: bool) -> Result<()> {
    let reports = sowkit_core::schema::check_files(files)?;
    let failed = reports.iter().filter(|r| !r.pass).count();

    if json_out {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            if report.pass {
                eprintln!("  ok  {} ({})", report.file, report.kind);
            } else {
                eprintln!("  FAIL {} ({})", report.file, report.kind);
            }
            for e in &report.errors {
                eprintln!("    {} {}", e.path.as_deref().unwrap_or(""), e.message);
            }
        }
        eprintln!("\n{} passed, {failed} failed", reports.len() - failed);
    }

    if failed > 0 {
        bail!("{failed} file(s) failed validation");
    }
    Ok(())
}

fn cmd_list(dir: &str) -> Result<()> {
    let rows = list::scan_dir(dir)?;
    list::print_table(&rows);
    Ok(())
}

fn ensure_same_subject(sow: &Sow, d: &DiagnosticResult) -> Result<()> {
    if sow.customer_id != d.customer_id {
        bail!(
            "SOW is for customer {} but the diagnostic is for {}",
            sow.customer_id,
            d.customer_id
        );
    }
    if let Some(t) = sow.diagnostic_type {
        if t != d.diagnostic_type {
            bail!("SOW was generated from a {t} diagnostic, not {}", d.diagnostic_type);
        }
    }
    Ok(())
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
