//! infissi-render - CLI tool to draw product configurations and quote previews.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use infissi_renderer::{ProductConfig, QuoteState, Rasterizer, format_size};

/// Draw window and door configurations as SVG or PNG.
#[derive(Parser, Debug)]
#[command(name = "infissi-render")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one product configuration
    Render {
        /// Configuration JSON file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (defaults to the input with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; guessed from the output extension when omitted
        #[arg(short, long)]
        format: Option<Format>,

        /// PNG width in pixels
        #[arg(long, default_value = "640")]
        width: u32,

        /// PNG height in pixels
        #[arg(long, default_value = "640")]
        height: u32,
    },

    /// Rasterize every item of a quote to PNG
    Quote {
        /// Quote JSON file path
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the item previews
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        #[arg(long, default_value = "640")]
        width: u32,

        #[arg(long, default_value = "640")]
        height: u32,
    },

    /// Print the JSON schema of a configuration, or of a whole quote
    Schema {
        /// Emit the quote schema instead of the single configuration one
        #[arg(long)]
        quote: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Png,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
        }
    }

    fn guess(path: Option<&Path>) -> Self {
        match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Format::Svg,
            _ => Format::Png,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match args.command {
        Command::Render {
            input,
            output,
            format,
            width,
            height,
        } => render(&input, output, format, width, height),
        Command::Quote {
            input,
            out_dir,
            width,
            height,
        } => quote(&input, &out_dir, width, height),
        Command::Schema { quote } => schema(quote),
    }
}

fn render(input: &Path, output: Option<PathBuf>, format: Option<Format>, width: u32, height: u32) -> Result<()> {
    let json = std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let config =
        ProductConfig::from_json(&json).with_context(|| format!("Failed to parse {}", input.display()))?;
    let drawing = config.render();
    info!(
        "Drawing {} {} from {}",
        config.kind().label(),
        format_size(drawing.content_width, drawing.content_height),
        input.display()
    );

    let format = format.unwrap_or_else(|| Format::guess(output.as_deref()));
    let output_path = output.unwrap_or_else(|| input.with_extension(format.extension()));

    let bytes = match format {
        Format::Svg => drawing.to_svg().into_bytes(),
        Format::Png => {
            Rasterizer::new()
                .rasterize_drawing(&drawing, width, height)
                .with_context(|| format!("Failed to rasterize {}", input.display()))?
                .png
        }
    };

    std::fs::write(&output_path, bytes).with_context(|| format!("Failed to write {}", output_path.display()))?;
    info!("Generated: {}", output_path.display());
    Ok(())
}

fn quote(input: &Path, out_dir: &Path, width: u32, height: u32) -> Result<()> {
    let json = std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let state = QuoteState::from_json(&json).with_context(|| format!("Failed to parse {}", input.display()))?;
    info!("Rasterizing {} item(s)", state.items.len());

    std::fs::create_dir_all(out_dir).with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut failed = 0;
    for (id, result) in state.previews(&Rasterizer::new(), width, height) {
        match result {
            Ok(image) => {
                let path = out_dir.join(format!("item-{id}.png"));
                std::fs::write(&path, &image.png).with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Generated: {}", path.display());
            }
            Err(err) => {
                error!("Item {}: {}", id, err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} item(s) could not be rasterized");
    }
    Ok(())
}

#[cfg(feature = "jsonschema")]
fn schema(quote: bool) -> Result<()> {
    let schema = if quote {
        schemars::schema_for!(QuoteState)
    } else {
        schemars::schema_for!(ProductConfig)
    };
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(not(feature = "jsonschema"))]
fn schema(_quote: bool) -> Result<()> {
    anyhow::bail!("schema export requires the `jsonschema` feature")
}
