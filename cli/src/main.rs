//! svg2laser CLI - prepare SVG drawings for laser cutters

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use svg2laser::convert::{format_from_path, DEFAULT_FORMAT, INKSCAPE_PATH_ENV};
use svg2laser::{inspect_file, rewrite_file, Error, JsonFormat, Length, RewriteOptions, Svg2Laser};

const OUTPUT_SUFFIX: &str = "-for-laser";

#[derive(Parser)]
#[command(name = "svg2laser")]
#[command(version)]
#[command(about = "Rewrite SVG stroke widths to laser-cutter hairlines", long_about = None)]
struct Cli {
    /// Input SVG file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(flatten)]
    rewrite: RewriteArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone)]
struct RewriteArgs {
    /// Physical stroke width, e.g. 0.001in or 0.0254mm
    #[arg(long, value_name = "LEN", value_parser = parse_length, default_value = "0.001in")]
    stroke_width: Length,

    /// Attribute to rewrite
    #[arg(long, value_name = "NAME", default_value = svg2laser::rewrite::DEFAULT_TARGET_ATTRIBUTE)]
    attribute: String,
}

impl RewriteArgs {
    fn options(&self) -> RewriteOptions {
        RewriteOptions::new()
            .with_stroke_width(self.stroke_width)
            .with_target_attribute(self.attribute.clone())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite stroke widths and write a new SVG
    Rewrite {
        /// Input SVG file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <FILE>-for-laser.svg)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        rewrite: RewriteArgs,
    },

    /// Show declared dimensions and the resolved resolution
    Info {
        /// Input SVG file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        rewrite: RewriteArgs,
    },

    /// Rewrite stroke widths, then export through Inkscape
    Convert {
        /// Input SVG file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to <FILE>.<FORMAT>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Export format (pdf, png, ps, eps, emf, wmf, svg)
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<String>,

        /// Inkscape executable
        #[arg(long, value_name = "PATH", env = INKSCAPE_PATH_ENV)]
        inkscape: Option<String>,

        #[command(flatten)]
        rewrite: RewriteArgs,
    },

    /// Show version information
    Version,
}

fn parse_length(raw: &str) -> Result<Length, String> {
    raw.parse::<Length>()
        .map_err(|_| format!("'{raw}' is not a length in 'in' or 'mm' (e.g. 0.001in)"))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Rewrite {
            input,
            output,
            rewrite,
        }) => cmd_rewrite(&input, output.as_deref(), &rewrite),
        Some(Commands::Info {
            input,
            json,
            rewrite,
        }) => cmd_info(&input, json, &rewrite),
        Some(Commands::Convert {
            input,
            output,
            format,
            inkscape,
            rewrite,
        }) => cmd_convert(
            &input,
            output.as_deref(),
            format.as_deref(),
            inkscape,
            &rewrite,
        ),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: rewrite if input is provided
            if let Some(input) = cli.input {
                cmd_rewrite(&input, cli.output.as_deref(), &cli.rewrite)
            } else {
                println!("{}", "Usage: svg2laser <FILE> [-o OUTPUT]".yellow());
                println!("       svg2laser --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(exit_code(&e));
    }
}

/// Process exit status for each failure kind.
fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Parse(_) => 2,
        Error::UnexpectedRoot { .. } => 3,
        Error::InvalidLength { .. } | Error::InvalidBounds(_) => 4,
        Error::AnisotropicResolution { .. } => 5,
        Error::ConverterSpawn { .. } | Error::ConverterFailed { .. } => 6,
        _ => 1,
    }
}

/// `drawing.svg` becomes `drawing-for-laser.svg` next to the input.
fn default_output_path(input: &Path) -> PathBuf {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    let base = name.strip_suffix(".svg").unwrap_or(&*name);
    input.with_file_name(format!("{}{}.svg", base, OUTPUT_SUFFIX))
}

fn cmd_rewrite(input: &Path, output: Option<&Path>, args: &RewriteArgs) -> svg2laser::Result<()> {
    let result = rewrite_file(input, &args.options())?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    log::debug!("writing {} bytes to {}", result.content.len(), output.display());
    fs::write(&output, &result.content)?;

    let report = &result.report;
    println!(
        "{} {} {} at {} px/in",
        "Rewrote".green(),
        report.rewritten,
        args.attribute,
        report.scale.pixels_per_inch
    );
    println!(
        "  {} {} = {}",
        "├─".dimmed(),
        args.stroke_width,
        report.value.bold()
    );
    println!("  {} {}", "└─".dimmed(), output.display());

    Ok(())
}

fn cmd_info(input: &Path, json: bool, args: &RewriteArgs) -> svg2laser::Result<()> {
    let info = inspect_file(input, &args.options())?;

    if json {
        println!("{}", svg2laser::to_json(&info, JsonFormat::Pretty)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Root".bold(), info.root_tag);
    println!("{}: {}", "Width".bold(), info.declared.width);
    println!("{}: {}", "Height".bold(), info.declared.height);
    println!("{}: {}", "viewBox".bold(), info.declared.view_box);

    println!();
    println!("{}", "Resolution".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Pixels per inch".bold(), info.scale.pixels_per_inch);
    println!("{}: {:.6}", "Horizontal".bold(), info.scale.width_ppi);
    println!("{}: {:.6}", "Vertical".bold(), info.scale.height_ppi);
    println!("{}: {}", "Elements".bold(), info.element_count);
    println!(
        "{}: {} ({} -> {})",
        args.attribute.bold(),
        info.matching_elements,
        args.stroke_width,
        info.value
    );

    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    format: Option<&str>,
    inkscape: Option<String>,
    args: &RewriteArgs,
) -> svg2laser::Result<()> {
    let format = format
        .map(str::to_string)
        .or_else(|| output.and_then(format_from_path))
        .unwrap_or_else(|| DEFAULT_FORMAT.to_string());
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension(&format));

    let mut builder = Svg2Laser::new()
        .with_stroke_width(args.stroke_width)
        .with_target_attribute(args.attribute.clone())
        .with_format(format.clone());
    if let Some(program) = inkscape {
        builder = builder.with_inkscape(program);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("Exporting {}...", format.to_uppercase()));

    let result = builder.convert_file(input);
    pb.finish_and_clear();
    let result = result?;

    fs::write(&output, &result.content)?;

    if let Some(report) = &result.report {
        println!(
            "{} {} {} at {} px/in",
            "Rewrote".green(),
            report.rewritten,
            args.attribute,
            report.scale.pixels_per_inch
        );
    }
    if !result.diagnostics.is_empty() {
        println!("{} {}", "Converter:".yellow(), result.diagnostics.dimmed());
    }
    println!(
        "{} {} ({} bytes)",
        "Saved to".green(),
        output.display(),
        result.content_len()
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "svg2laser".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("SVG stroke-width rewriter for laser cutters");
    println!();
    println!("Converter: inkscape (override with {})", INKSCAPE_PATH_ENV);
    println!("License: MIT");
}
