//! CLI binary for glyphgrid.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use glyphgrid::{
    compose, load_template, process, write_image_atomic, ArtifactWriter, ExtractionConfig,
    Padding, PlacementTable, SkipReason,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract glyphs only (written to sheet_intermediate_outputs/)
  glyphgrid sheet.png

  # Extract and place onto the template page
  glyphgrid sheet.png --template template.png -o page.png

  # Save debug images of every stage
  glyphgrid sheet.png --template template.png --artifacts debug/

  # A 6x8 sheet with its own margins and placement table
  glyphgrid --rows 6 --cols 8 --padding 30,40,40,30 \
      --template blank.png --placements layout.json sheet.png

  # Machine-readable run summary
  glyphgrid --json sheet.png > stats.json

OUTPUT FILES:
  letter_{N}.png        one transparent glyph per occupied cell, N = 0, 1, ...
                        in row-major order over non-blank cells
  {stem}_processed_grid_{unix-time}.png
                        composited page, when --template is given without -o
  edges_resized.png, contours_resized.png, output_with_rectangles.png
                        stage images, when --artifacts is given

PLACEMENT TABLE FORMAT:
  {"0": [335, 675], "1": [540, 675], ...}
  Keys are glyph indices ("letter_0" is accepted too); values are the
  target center (x, y) on the template. Without --placements the built-in
  88-entry layout of the standard 10x9 sheet is used.
"#;

/// Extract hand-drawn glyphs from a scanned grid sheet.
#[derive(Parser, Debug)]
#[command(
    name = "glyphgrid",
    version,
    about = "Extract hand-drawn glyphs from a scanned grid sheet",
    long_about = "Detect the ink in every cell of a scanned glyph sheet, crop one transparent \
image per glyph, and optionally place the glyphs onto a template page using a table of \
target centers.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Scanned grid sheet (PNG or JPEG).
    input: PathBuf,

    /// Template page to composite the glyphs onto.
    #[arg(short, long, env = "GLYPHGRID_TEMPLATE")]
    template: Option<PathBuf>,

    /// JSON placement table (glyph index -> target center).
    #[arg(short, long, env = "GLYPHGRID_PLACEMENTS")]
    placements: Option<PathBuf>,

    /// Composited page path. Default: {stem}_processed_grid_{unix-time}.png next to INPUT.
    #[arg(short, long, env = "GLYPHGRID_OUTPUT")]
    output: Option<PathBuf>,

    /// Directory for letter_{N}.png files.
    #[arg(long, env = "GLYPHGRID_GLYPH_DIR")]
    glyph_dir: Option<PathBuf>,

    /// Write stage images into this directory.
    #[arg(long, env = "GLYPHGRID_ARTIFACTS")]
    artifacts: Option<PathBuf>,

    /// Grid rows.
    #[arg(long, env = "GLYPHGRID_ROWS", default_value_t = 10)]
    rows: usize,

    /// Grid columns.
    #[arg(long, env = "GLYPHGRID_COLS", default_value_t = 9)]
    cols: usize,

    /// Page margins as TOP,LEFT,RIGHT,BOTTOM pixels.
    #[arg(long, env = "GLYPHGRID_PADDING", default_value = "50,80,120,40",
          value_parser = parse_padding)]
    padding: Padding,

    /// Canny low hysteresis threshold.
    #[arg(long, env = "GLYPHGRID_CANNY_LOW", default_value_t = 50.0)]
    canny_low: f32,

    /// Canny high hysteresis threshold.
    #[arg(long, env = "GLYPHGRID_CANNY_HIGH", default_value_t = 150.0)]
    canny_high: f32,

    /// Alpha cutoff: computed alpha below this becomes fully transparent.
    #[arg(long, env = "GLYPHGRID_THRESHOLD", default_value_t = 200)]
    threshold: u8,

    /// Border added around each glyph, in pixels.
    #[arg(long, env = "GLYPHGRID_BORDER", default_value_t = 20)]
    border: u32,

    /// Drop contours farther than this many pixels from every cell center.
    #[arg(long, env = "GLYPHGRID_MAX_DISTANCE")]
    max_distance: Option<f64>,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "GLYPHGRID_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "GLYPHGRID_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "GLYPHGRID_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // Load the template before extraction so a bad path fails fast.
    let template = match cli.template {
        Some(ref path) => Some(load_template(path).context("Failed to load template")?),
        None => None,
    };
    let loaded;
    let table = match cli.placements {
        Some(ref path) => {
            loaded = PlacementTable::from_json_file(path).context("Failed to load placements")?;
            &loaded
        }
        None => PlacementTable::bundled(),
    };

    // ── Extract ──────────────────────────────────────────────────────────
    let output = process(&cli.input, &config).context("Extraction failed")?;

    let glyph_paths = match glyph_dir(&cli) {
        Some(dir) => output
            .save_glyphs(&dir)
            .with_context(|| format!("Failed to save glyphs to {}", dir.display()))?,
        None => Vec::new(),
    };

    // ── Compose ──────────────────────────────────────────────────────────
    let mut composed = None;
    if let Some(ref template) = template {
        let report = compose(template, &output, table, &config);
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&cli.input));
        write_image_atomic(&report.canvas, &path).context("Failed to write composited page")?;
        composed = Some((path, report));
    }

    // ── Summary ──────────────────────────────────────────────────────────
    if cli.json {
        let skipped: Vec<&SkipReason> = output
            .skipped
            .iter()
            .chain(composed.iter().flat_map(|(_, r)| r.skipped.iter()))
            .collect();
        let summary = serde_json::json!({
            "input": cli.input,
            "stats": output.stats,
            "glyph_files": glyph_paths,
            "output_path": composed.as_ref().map(|(p, _)| p),
            "placed": composed.as_ref().map(|(_, r)| r.placed.len()),
            "skipped": skipped,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {} glyphs  {}/{} cells occupied  {}ms",
            if stats.glyphs > 0 { green("✔") } else { cyan("⚠") },
            bold(&stats.glyphs.to_string()),
            stats.occupied_cells,
            stats.occupied_cells + stats.empty_cells,
            stats.duration_ms,
        );
        eprintln!(
            "   {} contours  /  {} rejected  /  {} degenerate",
            dim(&stats.contours.to_string()),
            dim(&stats.rejected_contours.to_string()),
            dim(&stats.degenerate_shapes.to_string()),
        );
        if let Some(dir) = glyph_paths.first().and_then(|p| p.parent()) {
            eprintln!("   glyphs  →  {}", bold(&dir.display().to_string()));
        }
        if let Some((path, report)) = &composed {
            eprintln!(
                "   placed {}/{}  →  {}",
                report.placed.len(),
                output.glyphs.len(),
                bold(&path.display().to_string()),
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    let mut config = ExtractionConfig::builder()
        .grid(cli.rows, cli.cols)
        .padding(cli.padding)
        .canny_thresholds(cli.canny_low, cli.canny_high)
        .transparency_threshold(cli.threshold)
        .border_width(cli.border)
        .max_assign_distance(cli.max_distance)
        .build()
        .context("Invalid configuration")?;

    if let Some(ref dir) = cli.artifacts {
        config.observer = Some(Arc::new(ArtifactWriter::new(dir, config.artifact_size)));
    }
    Ok(config)
}

/// Where glyph files go: `--glyph-dir`, else the intermediate-outputs folder
/// next to the input when artifacts are requested or there is no template.
fn glyph_dir(cli: &Cli) -> Option<PathBuf> {
    if let Some(ref dir) = cli.glyph_dir {
        return Some(dir.clone());
    }
    if cli.artifacts.is_some() || cli.template.is_none() {
        return Some(sibling(&cli.input, &format!("{}_intermediate_outputs", stem(&cli.input))));
    }
    None
}

fn default_output_path(input: &Path) -> PathBuf {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    sibling(input, &format!("{}_processed_grid_{}.png", stem(input), secs))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "grid".to_string())
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent()
        .map(|p| p.join(name))
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Parse `--padding` as four comma-separated pixel counts.
fn parse_padding(s: &str) -> std::result::Result<Padding, String> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .map_err(|_| format!("Invalid padding value: '{}'", p.trim()))
        })
        .collect::<std::result::Result<_, _>>()?;

    match parts.as_slice() {
        [top, left, right, bottom] => Ok(Padding::new(*top, *left, *right, *bottom)),
        [all] => Ok(Padding::uniform(*all)),
        _ => Err(format!(
            "Expected TOP,LEFT,RIGHT,BOTTOM or a single value, got {} values",
            parts.len()
        )),
    }
}
