use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use pidviz::index::DescriptorIndex;
use pidviz::model::{BlockCollection, ElementPositions, LineSegment};
use pidviz::parser::{ConfigParser, FsSource, ParseOptions};
use pidviz::svg::{DiagramComposer, RenderConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Annotate P&ID drawings from control configs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse all .lua configuration sources in a directory into one merged JSON artifact
    Parse {
        /// Directory containing .lua configuration sources
        #[arg(value_name = "CONFIG_DIR")]
        config_dir: Utf8PathBuf,
        /// Output JSON file
        #[arg(short, long, default_value = "parsed_config.json")]
        output: Utf8PathBuf,
        /// Skip unreadable sources with a warning instead of aborting
        #[arg(long)]
        ignore_unreadable: bool,
    },
    /// Render the annotated SVG from geometry artifacts and a merged config
    Render {
        /// JSON object: element name → array of {page, x, y} positions
        #[arg(value_name = "POSITIONS_JSON")]
        positions: Utf8PathBuf,
        /// JSON array of {page, x1, y1, x2, y2} line segments
        #[arg(value_name = "LINES_JSON")]
        lines: Utf8PathBuf,
        /// Merged configuration JSON (output of the parse subcommand)
        #[arg(value_name = "CONFIG_JSON")]
        config: Utf8PathBuf,
        /// Output SVG file
        #[arg(short, long, default_value = "controls_overview.svg")]
        output: Utf8PathBuf,
        /// Directory with one <type>.svg icon per element type
        #[arg(long, default_value = "assets")]
        assets: Utf8PathBuf,
        /// Element names to exclude from the diagram (repeatable)
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,
        /// Offset added to every x coordinate
        #[arg(long, default_value_t = 200.0)]
        offset_x: f64,
        /// Offset added to every y coordinate
        #[arg(long, default_value_t = 200.0)]
        offset_y: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Parse {
            config_dir,
            output,
            ignore_unreadable,
        } => {
            let options = ParseOptions { ignore_unreadable };
            let mut parser = ConfigParser::with_options(FsSource, options);
            let blocks = parser.parse_dir(&config_dir)?;
            let json = serde_json::to_string_pretty(&blocks)?;
            std::fs::write(output.as_std_path(), json)
                .with_context(|| format!("Write {}", output))?;
            println!("Parsed {} unique blocks into {}", blocks.len(), output);
        }
        Command::Render {
            positions,
            lines,
            config,
            output,
            assets,
            exclude,
            offset_x,
            offset_y,
        } => {
            let positions: ElementPositions = read_json(&positions)?;
            let lines: Vec<LineSegment> = read_json(&lines)?;
            let blocks: BlockCollection = read_json(&config)?;

            let index = DescriptorIndex::build(&blocks);
            let render_config = RenderConfig {
                offset_x,
                offset_y,
                assets_dir: assets,
                exclude: exclude.into_iter().collect(),
                ..RenderConfig::default()
            };
            let composer = DiagramComposer::new(render_config);
            let content = composer.compose(&index, &positions, &lines);
            std::fs::write(output.as_std_path(), content)
                .with_context(|| format!("Write {}", output))?;
            println!(
                "Rendered {} elements and {} line segments to {}",
                positions.len(),
                lines.len(),
                output
            );
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Utf8PathBuf) -> Result<T> {
    let text = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse JSON {}", path))
}
