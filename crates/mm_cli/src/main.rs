// crates/mm_cli/src/main.rs
//
// Load → compare → write comparison.json → optional report rendering.
// Exit codes are stable; scripts depend on them.

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    /// Bad flags, schema failures, invalid snapshot, empty candidate.
    pub const VALIDATION: i32 = 2;
    /// Nothing to aggregate over.
    pub const INSUFFICIENT: i32 = 3;
    pub const IO: i32 = 4;
    /// Result assembly or rendering failed.
    pub const BUILD: i32 = 5;
}

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use log::{error, info, warn, LevelFilter};

use args::{parse_and_validate as parse_cli, Args};
use mm_core::entities::{DeckComparisonResult, MetaSnapshot};
use mm_io::{canonical_json, loader};
use mm_pipeline::{compare, validate_snapshot, PipelineError, Severity};
use mm_report::{build_model, ReportError, ReportModel};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    Validation(String),
    Insufficient(String),
    Io(String),
    Build(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Insufficient(m) => write!(f, "{m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Build(m) => write!(f, "build: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("mm: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_logging(&args);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!("{e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr logger; default level warn. RUST_LOG, when set, overrides the flags.
fn init_logging(args: &Args) {
    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .try_init();
}

fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Insufficient(_) => INSUFFICIENT,
        MainError::Io(_) => IO,
        MainError::Build(_) => BUILD,
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        e @ (PipelineError::InvalidSnapshot { .. }
        | PipelineError::InvalidInput { .. }
        | PipelineError::UnresolvableCandidate) => MainError::Validation(e.to_string()),
        PipelineError::InsufficientData(m) => MainError::Insufficient(format!("insufficient data: {m}")),
        PipelineError::Io(m) => MainError::Io(m),
        PipelineError::Build(m) => MainError::Build(m),
    }
}

fn map_report_err(e: ReportError) -> MainError {
    MainError::Build(format!("report: {e}"))
}

/// Load everything and run the snapshot checks; print every issue to stdout.
/// Nothing is written to disk.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let loaded = loader::load_all(&args.snapshot, &args.candidate, args.params.as_deref())
        .map_err(|e| map_pipeline_err(e.into()))?;

    let report = validate_snapshot(&loaded.snapshot, &loaded.params);
    for i in &report.issues {
        let sev = match i.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("{sev}\t{}\t{}\t{}", i.code, i.where_, i.message);
    }
    if !report.pass {
        let n = report.errors().count();
        return Err(MainError::Validation(format!("{n} snapshot error(s)")));
    }
    if !args.quiet {
        println!("ok\t{} archetypes, {} warning(s)", loaded.snapshot.decks.len(), report.warnings().count());
    }
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let mut loaded = loader::load_all(&args.snapshot, &args.candidate, args.params.as_deref())
        .map_err(|e| map_pipeline_err(e.into()))?;
    if let Some(n) = args.workers {
        loaded.params.max_workers = n as usize;
    }

    let result = compare(&loaded.snapshot, &loaded.candidate, &loaded.params).map_err(map_pipeline_err)?;

    write_artifacts(&args.out, &result)?;
    maybe_render_reports(args, &result, &loaded.snapshot)?;

    info!("artifacts written to {}", args.out.display());
    if !args.quiet {
        println!("{}", result.id);
    }
    Ok(())
}

fn write_artifacts(out_dir: &Path, result: &DeckComparisonResult) -> Result<(), MainError> {
    fs::create_dir_all(out_dir).map_err(|e| MainError::Io(format!("mkdir {}: {e}", out_dir.display())))?;
    let path = out_dir.join("comparison.json");
    canonical_json::write_canonical_file(result, &path)
        .map_err(|e| MainError::Io(format!("write comparison.json: {e}")))
}

fn maybe_render_reports(args: &Args, result: &DeckComparisonResult, snapshot: &MetaSnapshot) -> Result<(), MainError> {
    if args.render.is_empty() {
        return Ok(());
    }
    let model = build_model(result, Some(snapshot)).map_err(map_report_err)?;
    for fmt in &args.render {
        match fmt.as_str() {
            "json" => render_json_report(&model, &args.out)?,
            "html" => render_html_report(&model, &args.out)?,
            other => warn!("unknown renderer '{other}' skipped"),
        }
    }
    Ok(())
}

fn render_json_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let text = mm_report::render_json(model).map_err(map_report_err)?;
        canonical_json::write_atomic(&out_dir.join("report.json"), text.as_bytes())
            .map_err(|e| MainError::Io(format!("write report.json: {e}")))
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Build("json renderer not enabled (build with feature `report-json`)".into()))
    }
}

fn render_html_report(model: &ReportModel, out_dir: &Path) -> Result<(), MainError> {
    #[cfg(feature = "report-html")]
    {
        let html = mm_report::render_html(model);
        canonical_json::write_atomic(&out_dir.join("report.html"), html.as_bytes())
            .map_err(|e| MainError::Io(format!("write report.html: {e}")))
    }
    #[cfg(not(feature = "report-html"))]
    {
        let _ = (model, out_dir);
        Err(MainError::Build("html renderer not enabled (build with feature `report-html`)".into()))
    }
}
