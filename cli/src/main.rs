//! hwp2md CLI - HWPX document conversion tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use hwp2md::{
    detect_format_from_path, parse_file_with_options, CleanupPreset, Hwp2md, HwpxParser,
    JsonFormat, ParseOptions, RenderOptions, TableFallback,
};

#[derive(Parser)]
#[command(name = "hwp2md")]
#[command(author = "roboco-io")]
#[command(version)]
#[command(about = "Convert HWPX documents to Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input HWPX file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Text cleanup preset
    #[arg(long, value_enum)]
    cleanup: Option<CleanupLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert HWPX to all formats (Markdown, text, JSON) plus images
    Convert {
        /// Input HWPX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,
    },

    /// Convert HWPX to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input HWPX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Table rendering mode
        #[arg(long, value_enum, default_value = "markdown")]
        table_mode: TableMode,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        /// Extract images into this directory and link them
        #[arg(long, value_name = "DIR")]
        images: Option<PathBuf>,

        /// Ignore header styles (no headings or quotes)
        #[arg(long)]
        no_styles: bool,
    },

    /// Convert HWPX to plain text
    Text {
        /// Input HWPX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Text cleanup preset
        #[arg(long, value_enum)]
        cleanup: Option<CleanupLevel>,
    },

    /// Convert HWPX to JSON
    Json {
        /// Input HWPX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Include image blocks
        #[arg(long)]
        images: bool,
    },

    /// Show document information
    Info {
        /// Input HWPX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Extract embedded images from HWPX
    Extract {
        /// Input HWPX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Unicode normalization and whitespace only
    Minimal,
    /// Also removes vendor glyphs and extra blank lines
    Standard,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableMode {
    /// Standard Markdown tables
    Markdown,
    /// HTML tables when cells are merged
    Html,
}

impl From<TableMode> for TableFallback {
    fn from(mode: TableMode) -> Self {
        match mode {
            TableMode::Markdown => TableFallback::Markdown,
            TableMode::Html => TableFallback::Html,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            cleanup,
        }) => cmd_convert(&input, output.as_deref(), cleanup),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            table_mode,
            cleanup,
            max_heading,
            images,
            no_styles,
        }) => cmd_markdown(
            &input,
            output.as_deref(),
            MarkdownArgs {
                frontmatter,
                table_mode,
                cleanup,
                max_heading,
                images,
                no_styles,
            },
        ),
        Some(Commands::Text {
            input,
            output,
            cleanup,
        }) => cmd_text(&input, output.as_deref(), cleanup),
        Some(Commands::Json {
            input,
            output,
            compact,
            images,
        }) => cmd_json(&input, output.as_deref(), compact, images),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Extract { input, output }) => cmd_extract(&input, output.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), cli.cleanup)
            } else {
                println!("{}", "Usage: hwp2md <FILE> [-o OUTPUT]".yellow());
                println!("       hwp2md --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(input: &Path, output: Option<&Path>, cleanup: Option<CleanupLevel>) -> CliResult {
    let output_dir = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });
    let images_dir = output_dir.join("images");
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing HWPX...");
    let mut builder = Hwp2md::new()
        .with_images(true)
        .with_image_dir(&images_dir)
        .with_image_prefix("images/")
        .with_frontmatter();
    if let Some(level) = cleanup {
        builder = builder.with_cleanup(level.into());
    }
    let result = builder.parse(input)?;
    pb.inc(1);

    pb.set_message("Generating Markdown...");
    let markdown = result.to_markdown()?;
    fs::write(output_dir.join("extract.md"), &markdown)?;
    pb.inc(1);

    pb.set_message("Generating text...");
    let text = result.to_text()?;
    fs::write(output_dir.join("extract.txt"), &text)?;
    pb.inc(1);

    pb.set_message("Generating JSON...");
    let json = result.to_json(JsonFormat::Pretty)?;
    fs::write(output_dir.join("content.json"), &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} extract.md", "├─".dimmed());
    println!("  {} extract.txt", "├─".dimmed());
    println!("  {} content.json", "├─".dimmed());
    println!(
        "  {} images/ ({} files)",
        "└─".dimmed(),
        result.images.len()
    );

    Ok(())
}

struct MarkdownArgs {
    frontmatter: bool,
    table_mode: TableMode,
    cleanup: Option<CleanupLevel>,
    max_heading: u8,
    images: Option<PathBuf>,
    no_styles: bool,
}

fn cmd_markdown(input: &Path, output: Option<&Path>, args: MarkdownArgs) -> CliResult {
    let options = ParseOptions::new()
        .with_images(args.images.is_some())
        .with_styles(!args.no_styles);
    let doc = parse_file_with_options(input, options)?;

    let mut render_options = RenderOptions::new()
        .with_frontmatter(args.frontmatter)
        .with_table_fallback(args.table_mode.into())
        .with_max_heading(args.max_heading);

    if let Some(ref dir) = args.images {
        let count = HwpxParser::open(input)?.extract_images(dir)?.len();
        log::debug!("wrote {count} images to {}", dir.display());
        let prefix = format!("{}/", dir.display());
        render_options = render_options.with_image_dir(dir).with_image_prefix(prefix);
    }

    if let Some(level) = args.cleanup {
        render_options = render_options.with_cleanup_preset(level.into());
    }

    let markdown = hwp2md::render::to_markdown(&doc, &render_options)?;
    write_or_print(output, &markdown)
}

fn cmd_text(input: &Path, output: Option<&Path>, cleanup: Option<CleanupLevel>) -> CliResult {
    let doc = hwp2md::parse_file(input)?;

    let mut render_options = RenderOptions::new();
    if let Some(level) = cleanup {
        render_options = render_options.with_cleanup_preset(level.into());
    }

    let text = hwp2md::render::to_text(&doc, &render_options)?;
    write_or_print(output, &text)
}

fn cmd_json(input: &Path, output: Option<&Path>, compact: bool, images: bool) -> CliResult {
    let options = ParseOptions::new().with_images(images);
    let doc = parse_file_with_options(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = hwp2md::render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let format = detect_format_from_path(input)?;
    let result = Hwp2md::new().with_images(true).parse(input)?;
    let doc = result.document();
    let meta = &doc.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Sections".bold(), meta.section_count);

    let fields = [
        ("Title", &meta.title),
        ("Author", &meta.author),
        ("Subject", &meta.subject),
        ("Keywords", &meta.keywords),
        ("Language", &meta.language),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("{}: {}", label.bold(), value);
        }
    }
    if let Some(ref created) = meta.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = meta.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    let stats = result.to_markdown_with_stats()?.stats;

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_extract(input: &Path, output: Option<&Path>) -> CliResult {
    let output_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut parser = HwpxParser::open(input)?;
    let images = parser.extract_images(&output_dir)?;

    for image in &images {
        println!("{} {}", "Extracted".green(), image.path);
    }

    println!(
        "\n{} {} images extracted",
        "Done!".green().bold(),
        images.len()
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "hwp2md".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("HWPX document conversion tool");
    println!();
    println!("License: MIT");
}
