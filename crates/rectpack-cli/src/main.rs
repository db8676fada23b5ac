use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use rectpack_core::config::{BinSelection, PackingMode, SkylineHeuristic, SortOrder};
use rectpack_core::{Enclose, Packer, PackerConfig, enclosure_to_json, to_json, write_json};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "rectpack",
    about = "Pack rectangles into bins or find a minimal enclosing rectangle",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack the job's rectangles into the job's bins
    Pack(PackArgs),
    /// Find the smallest rectangle enclosing the job's rectangles
    Enclose(EncloseArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    /// Job file (.json, .yaml or .yml)
    #[arg(help_heading = "Input/Output")]
    job: PathBuf,
    /// Write the JSON result here instead of stdout
    #[arg(short, long, help_heading = "Input/Output")]
    output: Option<PathBuf>,

    /// Packing mode: online | offline
    #[arg(long, default_value = "offline", help_heading = "Packing")]
    mode: String,
    /// Bin selection: bnf | bff | bbf | global
    #[arg(long, default_value = "bbf", help_heading = "Packing")]
    bin_selection: String,
    /// Skyline heuristic: bl | mwf | mwfl
    #[arg(long, default_value = "bl", help_heading = "Packing")]
    heuristic: String,
    /// Reuse space trapped below the skyline
    #[arg(long, default_value_t = false, help_heading = "Packing")]
    waste: bool,
    /// Sort order: area|peri|diff|sside|lside|ratio|none
    #[arg(long, default_value = "area", help_heading = "Packing")]
    sort: String,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = true, action=ArgAction::Set, help_heading = "Packing")]
    allow_rotation: bool,

    /// Print the merged configuration (after CLI/job file) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
}

#[derive(Parser, Debug, Clone)]
struct EncloseArgs {
    /// Job file (.json, .yaml or .yml); only `rects` is used
    job: PathBuf,
    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Upper bound for the container width
    #[arg(long)]
    max_width: Option<u32>,
    /// Upper bound for the container height
    #[arg(long)]
    max_height: Option<u32>,
    /// Allow rotation (90deg)
    #[arg(long, default_value_t = true, action=ArgAction::Set)]
    allow_rotation: bool,
    /// Evaluate candidates in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Enclose(args) => run_enclose(args),
    }
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let job = load_job(&cli.job)?;

    let base = PackerConfig {
        mode: parse_or_bail::<PackingMode>(&cli.mode, "packing mode")?,
        bin_selection: parse_or_bail::<BinSelection>(&cli.bin_selection, "bin selection")?,
        heuristic: parse_or_bail::<SkylineHeuristic>(&cli.heuristic, "skyline heuristic")?,
        waste_management: cli.waste,
        sort_order: parse_or_bail::<SortOrder>(&cli.sort, "sort order")?,
        allow_rotation: cli.allow_rotation,
    };
    // Job file settings override the command line en bloc.
    let cfg = match job.config {
        Some(overrides) => overrides.into_packer_config(base)?,
        None => base,
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let mut packer: Packer<String> = Packer::new(cfg)?;
    for b in &job.bins {
        packer.add_bin(b.width, b.height, b.count);
    }
    for (i, r) in job.rects.iter().enumerate() {
        let id = r.id.clone().unwrap_or_else(|| i.to_string());
        packer.add_rect(r.width, r.height, Some(id));
    }
    packer.pack();
    packer
        .validate_packing()
        .context("packing produced an invalid layout")?;

    let stats = packer.stats();
    let missing = job.rects.len().saturating_sub(stats.num_rects);
    if missing > 0 {
        warn!(missing, "some rectangles did not fit any bin");
    }
    info!("{}", stats.summary());

    write_output(cli.output.as_deref(), &to_json(&packer))
}

fn run_enclose(cli: &EncloseArgs) -> anyhow::Result<()> {
    let job = load_job(&cli.job)?;
    let mut enclose = Enclose::new()
        .max_width(cli.max_width)
        .max_height(cli.max_height)
        .rotation(cli.allow_rotation)
        .parallel(cli.parallel);
    for r in &job.rects {
        enclose.add_rect(r.width, r.height);
    }
    info!(count = enclose.len(), "loaded rectangles");

    let Some(found) = enclose.generate() else {
        anyhow::bail!("no enclosing rectangle satisfies the given limits");
    };
    info!(
        width = found.width,
        height = found.height,
        area = found.area(),
        "enclosure found"
    );
    write_output(cli.output.as_deref(), &enclosure_to_json(&found))
}

fn write_output(path: Option<&Path>, value: &serde_json::Value) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            let file = fs::File::create(p).with_context(|| format!("create {}", p.display()))?;
            write_json(value, std::io::BufWriter::new(file))
                .with_context(|| format!("write {}", p.display()))?;
            info!(path = %p.display(), "wrote result");
        }
        None => write_json(value, std::io::stdout().lock())?,
    }
    Ok(())
}

fn load_job(path: &Path) -> anyhow::Result<JobFile> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read job {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);
    let job: JobFile = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    Ok(job)
}

fn parse_or_bail<T: std::str::FromStr>(s: &str, what: &str) -> anyhow::Result<T> {
    match s.parse::<T>() {
        Ok(v) => Ok(v),
        Err(_) => anyhow::bail!("unknown {}: {}", what, s),
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug, Deserialize)]
struct BinSpec {
    width: u32,
    height: u32,
    #[serde(default = "one")]
    count: usize,
}

fn one() -> usize {
    1
}

#[derive(Debug, Deserialize)]
struct RectSpec {
    width: u32,
    height: u32,
    id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct JobFile {
    #[serde(default)]
    bins: Vec<BinSpec>,
    #[serde(default)]
    rects: Vec<RectSpec>,
    config: Option<JobConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct JobConfig {
    mode: Option<String>,
    bin_selection: Option<String>,
    heuristic: Option<String>,
    waste_management: Option<bool>,
    sort_order: Option<String>,
    allow_rotation: Option<bool>,
}

impl JobConfig {
    /// Unknown names bail the same way command-line flags do.
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.mode {
            cfg.mode = parse_or_bail(&v, "packing mode")?;
        }
        if let Some(v) = self.bin_selection {
            cfg.bin_selection = parse_or_bail(&v, "bin selection")?;
        }
        if let Some(v) = self.heuristic {
            cfg.heuristic = parse_or_bail(&v, "skyline heuristic")?;
        }
        if let Some(v) = self.waste_management {
            cfg.waste_management = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_or_bail(&v, "sort order")?;
        }
        if let Some(v) = self.allow_rotation {
            cfg.allow_rotation = v;
        }
        Ok(cfg)
    }
}
