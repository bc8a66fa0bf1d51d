//! relayout CLI - page-layout reconstruction tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use relayout::source::list_page_streams;
use relayout::{
    render, Document, JsonFormat, JsonPageSource, LayoutEngine, LayoutOptions, PageSource,
    RenderOptions,
};

#[derive(Parser)]
#[command(name = "relayout")]
#[command(version)]
#[command(about = "Rebuild sections, paragraphs and tables from positioned page blocks", long_about = None)]
struct Cli {
    /// Layout options file (JSON); unspecified keys use defaults
    #[arg(long, global = true, value_name = "FILE", env = "RELAYOUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct a document and write it as JSON
    Extract {
        /// Input page stream (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Write only the ordered section list, without metadata
        #[arg(long)]
        sections: bool,
    },

    /// Reconstruct a document and write it as Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input page stream (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prefix for image paths
        #[arg(long, default_value = "")]
        image_prefix: String,
    },

    /// Reconstruct a document and write it as an HTML fragment
    Html {
        /// Input page stream (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Prefix for image paths
        #[arg(long, default_value = "")]
        image_prefix: String,

        /// Omit inline style attributes
        #[arg(long)]
        no_styles: bool,
    },

    /// Reconstruct every page stream in a directory in parallel
    Batch {
        /// Directory of page streams (*.json)
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Show document structure statistics
    Info {
        /// Input page stream (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Markdown
    Markdown,
    /// HTML fragment
    Html,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
        }
    }

    fn render(self, doc: &Document, options: &RenderOptions) -> relayout::Result<String> {
        match self {
            OutputFormat::Json => render::to_json(doc, JsonFormat::Pretty),
            OutputFormat::Markdown => render::to_markdown(doc, options),
            OutputFormat::Html => render::to_html(doc, options),
        }
    }
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            compact,
            sections,
        } => cmd_extract(
            &input,
            output.as_deref(),
            compact,
            sections,
            cli.config.as_deref(),
        ),
        Commands::Markdown {
            input,
            output,
            image_prefix,
        } => {
            let options = RenderOptions::new().with_image_prefix(image_prefix);
            cmd_render(
                &input,
                output.as_deref(),
                OutputFormat::Markdown,
                &options,
                cli.config.as_deref(),
            )
        }
        Commands::Html {
            input,
            output,
            image_prefix,
            no_styles,
        } => {
            let options = RenderOptions::new()
                .with_image_prefix(image_prefix)
                .with_inline_styles(!no_styles);
            cmd_render(
                &input,
                output.as_deref(),
                OutputFormat::Html,
                &options,
                cli.config.as_deref(),
            )
        }
        Commands::Batch {
            input,
            output,
            format,
        } => cmd_batch(&input, output.as_deref(), format, cli.config.as_deref()),
        Commands::Info { input } => cmd_info(&input, cli.config.as_deref()),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_engine(config: Option<&Path>) -> CliResult<LayoutEngine> {
    let options = match config {
        Some(path) => {
            log::info!("Loading layout options from {}", path.display());
            LayoutOptions::load(path)?
        }
        None => LayoutOptions::default(),
    };
    Ok(LayoutEngine::new(options)?)
}

fn extract_one(input: &Path, config: Option<&Path>) -> CliResult<Document> {
    let engine = load_engine(config)?;
    let mut source = JsonPageSource::open(input)?;
    Ok(engine.extract(&mut source)?)
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    sections: bool,
    config: Option<&Path>,
) -> CliResult<()> {
    let doc = extract_one(input, config)?;
    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = if sections {
        render::to_sections_json(&doc, format)?
    } else {
        render::to_json(&doc, format)?
    };
    write_or_print(output, &json)
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    options: &RenderOptions,
    config: Option<&Path>,
) -> CliResult<()> {
    let doc = extract_one(input, config)?;
    let content = format.render(&doc, options)?;
    write_or_print(output, &content)
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    config: Option<&Path>,
) -> CliResult<()> {
    let engine = load_engine(config)?;
    let paths = list_page_streams(input)?;
    if paths.is_empty() {
        println!("{} no page streams in {}", "Nothing to do:".yellow(), input.display());
        return Ok(());
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("relayout_output"));
    fs::create_dir_all(&output_dir)?;

    let total = paths.len();
    let mut failed = 0usize;

    // Streams that cannot even be decoded count as failed documents.
    let mut opened = Vec::with_capacity(total);
    let mut sources = Vec::with_capacity(total);
    for path in &paths {
        match JsonPageSource::open(path) {
            Ok(source) => {
                opened.push(path.clone());
                sources.push(source);
            }
            Err(e) => {
                eprintln!("{} {}: {}", "Failed".red(), path.display(), e);
                failed += 1;
            }
        }
    }

    let pb = ProgressBar::new(sources.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let results = engine.extract_batch_with(sources, |id, _| {
        pb.set_message(id.to_string());
        pb.inc(1);
    });
    pb.finish_and_clear();

    // Outputs are named after the input files; document ids come from
    // untrusted stream contents and never reach the filesystem.
    let names = output_names(&opened, format);
    let render_options = RenderOptions::new();
    for ((path, name), result) in opened.iter().zip(&names).zip(results) {
        let written = match result {
            Ok(doc) => write_batch_output(&doc, &output_dir.join(name), format, &render_options),
            Err(e) => Err(e.into()),
        };
        match written {
            Ok(out) => println!("{} {}", "Wrote".green(), out.display()),
            Err(e) => {
                eprintln!("{} {}: {}", "Failed".red(), path.display(), e);
                failed += 1;
            }
        }
    }

    let succeeded = total - failed;
    println!(
        "\n{} {} of {} documents",
        "Done!".green().bold(),
        succeeded,
        total
    );
    if succeeded == 0 {
        return Err(format!("all {} documents failed", total).into());
    }
    Ok(())
}

/// Output file names for a batch, one per input, unique within the batch.
///
/// The name is the input's file stem with the format's extension. Stems
/// that collide (`a.json` and `a.JSON`) get a numeric suffix.
fn output_names(inputs: &[PathBuf], format: OutputFormat) -> Vec<String> {
    let mut used = HashSet::new();
    inputs
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("document_{}", i + 1));
            let mut name = format!("{}.{}", stem, format.extension());
            let mut n = 2;
            while !used.insert(name.to_lowercase()) {
                name = format!("{}-{}.{}", stem, n, format.extension());
                n += 1;
            }
            name
        })
        .collect()
}

fn write_batch_output(
    doc: &Document,
    path: &Path,
    format: OutputFormat,
    options: &RenderOptions,
) -> CliResult<PathBuf> {
    let content = format.render(doc, options)?;
    fs::write(path, content)?;
    Ok(path.to_path_buf())
}

fn cmd_info(input: &Path, config: Option<&Path>) -> CliResult<()> {
    let doc = extract_one(input, config)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref source) = doc.metadata.source {
        println!("{}: {}", "Document".bold(), source);
    }
    println!("{}: {}", "Pages".bold(), doc.metadata.page_count);
    println!("{}: {}", "Pages skipped".bold(), doc.metadata.pages_skipped);

    println!();
    println!("{}", "Structure".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Sections".bold(), doc.section_count());
    println!("{}: {}", "Tables".bold(), doc.table_count());
    println!("{}: {}", "Images".bold(), doc.image_count());
    for section in &doc.sections {
        println!(
            "  {} {} ({} items)",
            "├─".dimmed(),
            section.title,
            section.content.len()
        );
    }

    let text = doc.plain_text();
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "relayout".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Page-layout reconstruction tool");
    println!();
    println!("License: MIT");
}
