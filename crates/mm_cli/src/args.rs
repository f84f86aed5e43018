// crates/mm_cli/src/args.rs
//
// Offline CLI argument surface.
// - No networked paths (reject any scheme:// like http/https/file)
// - Required: --snapshot, --candidate; optional --params (defaults otherwise)
// - Output: --out dir, --render [json|html]*
// - --validate-only loads and validates the snapshot without comparing

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::{ArgAction, Parser};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "mm",
    disable_help_subcommand = true,
    about = "Compare a deck against a meta snapshot, offline and deterministically"
)]
pub struct Args {
    /// MetaSnapshot JSON path.
    #[arg(long)]
    pub snapshot: PathBuf,
    /// CandidateDeck JSON path.
    #[arg(long)]
    pub candidate: PathBuf,
    /// Params JSON path (omitted keys take their defaults).
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Worker cap for per-opponent estimation (overrides params.max_workers).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=256))]
    pub workers: Option<u32>,

    /// Output directory (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,
    /// Renderer(s) to emit. Choose up to 2 (json, html). Omit to skip rendering.
    #[arg(long, value_parser = ["json", "html"], num_args = 0..=2)]
    pub render: Vec<String>,

    /// Validate inputs only (load + schema + snapshot checks); writes nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// Only log errors.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
    /// More log output (-v info, -vv debug). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Flag problems clap cannot see. Messages are matched by tests.
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            CliError::NotFound(p) => write!(f, "file not found: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs. clap itself exits with code 2 on bad flags.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let mut args = Args::parse();
    check(&args)?;
    args.snapshot = normalize_path(&args.snapshot);
    args.candidate = normalize_path(&args.candidate);
    args.params = args.params.take().map(|p| normalize_path(&p));
    args.out = normalize_path(&args.out);
    Ok(args)
}

fn check(a: &Args) -> Result<(), CliError> {
    paths(a).try_for_each(ensure_local_path)?;
    ensure_file(&a.snapshot, "--snapshot")?;
    ensure_file(&a.candidate, "--candidate")?;
    if let Some(p) = &a.params {
        ensure_file(p, "--params")?;
    }
    Ok(())
}

/// `http:`/`https:`/`file:` prefixes and anything with `://` are refused.
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    let Some(s) = p.to_str() else { return Ok(()) };
    let lower = s.trim().to_ascii_lowercase();
    let remote = mm_io::looks_like_url_strict(&lower)
        || ["http:", "https:", "file:"].iter().any(|pre| lower.starts_with(pre));
    if remote {
        return Err(CliError::NonLocalPath(s.to_string()));
    }
    Ok(())
}

/// Every path flag, --out included.
fn paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        Some(args.snapshot.as_path()),
        Some(args.candidate.as_path()),
        args.params.as_deref(),
        Some(args.out.as_path()),
    ]
    .into_iter()
    .flatten()
}

fn ensure_file(p: &Path, flag: &'static str) -> Result<(), CliError> {
    match fs::metadata(p) {
        Ok(m) if m.is_file() => Ok(()),
        _ => Err(CliError::NotFound(format!("{flag} {}", p.display()))),
    }
}

/// Absolute form of `p`. A path that does not exist yet (a fresh --out) is
/// joined onto the working directory instead of canonicalized.
fn normalize_path(p: &Path) -> PathBuf {
    if let Ok(abs) = fs::canonicalize(p) {
        return abs;
    }
    match env::current_dir() {
        Ok(cwd) if p.is_relative() => cwd.join(p),
        _ => p.to_path_buf(),
    }
}
