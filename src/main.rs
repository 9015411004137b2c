use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::{Context, Result};
use bridge_kit::a2ui::{
    resolve, A2uiHost, ComponentCatalog, ComponentKind, DataModel, Processor, ProcessorConfig,
    StreamFormat, SurfaceSnapshot, TreeNode,
};
use clap::{Parser, ValueEnum};

/// Replay a recorded A2UI message stream and print the resulting surfaces.
#[derive(Parser)]
#[command(name = "a2ui-bridge", version, about)]
struct Cli {
    /// Recorded stream, or `-` for stdin
    input: PathBuf,

    /// Framing of the input
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Processor configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Try to repair malformed JSON documents
    #[arg(long)]
    repair: bool,

    /// Only print this surface (the configured default surface when no id is given)
    #[arg(long, value_name = "ID")]
    surface: Option<Option<String>>,

    /// Log every processed message
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Json,
    Jsonl,
    Sse,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<ProcessorConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ProcessorConfig::default(),
    };
    config.repair_json |= cli.repair;

    let input = read_input(&cli.input)?;
    let format = match cli.format {
        Format::Auto => StreamFormat::detect(&input),
        Format::Json => StreamFormat::Json,
        Format::Jsonl => StreamFormat::Jsonl,
        Format::Sse => StreamFormat::Sse,
    };
    log::info!("Replaying {} as {:?}", cli.input.display(), format);

    let processor = Processor::new(ComponentCatalog::with_standard_catalog(), config);
    let processor = match format {
        // Whole documents go straight to the processor so repair can apply.
        StreamFormat::Json => {
            let mut processor = processor;
            let applied = processor
                .process_json(&input)
                .context("decoding JSON document")?;
            log::info!("Applied {} message(s)", applied);
            processor
        }
        StreamFormat::Jsonl | StreamFormat::Sse => {
            let events = A2uiHost::spawn_reader(Cursor::new(input.into_bytes()), format);
            let (actions, _) = mpsc::channel();
            let mut host = A2uiHost::new(processor, events, actions);
            let applied = host.run_to_end();
            log::info!("Applied {} message(s)", applied);
            host.into_processor()
        }
    };

    let surface_ids = selected_surfaces(&processor, cli.surface.as_ref());

    if surface_ids.is_empty() {
        println!("(no surfaces)");
    }
    for surface_id in surface_ids {
        match processor.current_snapshot(&surface_id) {
            Some(snapshot) => print_surface(&snapshot)?,
            None => println!("surface '{}': absent", surface_id),
        }
    }
    Ok(())
}

/// Surfaces to print: the requested one, the configured default for a bare
/// `--surface`, otherwise all of them in creation order.
fn selected_surfaces(processor: &Processor, surface: Option<&Option<String>>) -> Vec<String> {
    match surface {
        Some(Some(id)) => vec![id.clone()],
        Some(None) => vec![processor.config().default_surface_id.clone()],
        None => processor.surface_ids().map(str::to_string).collect(),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_surface(snapshot: &SurfaceSnapshot) -> Result<()> {
    println!(
        "surface '{}' (version {}, {} component(s), root {})",
        snapshot.surface_id(),
        snapshot.version(),
        snapshot.components().len(),
        snapshot.root().unwrap_or("<unset>")
    );

    match snapshot.tree() {
        Some(tree) => print_node(&tree, snapshot.data_model(), 1),
        None => println!("  <no tree>"),
    }

    if !snapshot.data_model().is_empty() {
        let data = serde_json::to_string_pretty(&snapshot.data_model().to_json())?;
        println!("  data: {}", data.replace('\n', "\n  "));
    }
    Ok(())
}

fn print_node(node: &TreeNode<'_>, model: &DataModel, depth: usize) {
    let label = match node.kind() {
        ComponentKind::Text(text) => Some(&text.text),
        ComponentKind::Badge(badge) => Some(&badge.text),
        ComponentKind::Icon(icon) => Some(&icon.name),
        ComponentKind::Image(image) => Some(&image.url),
        ComponentKind::Link(link) => link.text.as_ref(),
        ComponentKind::Label(label) => label.text.as_ref(),
        ComponentKind::TableCell(cell) => cell.text.as_ref(),
        _ => None,
    }
    .map(|value| match resolve(value, model) {
        Some(literal) => format!(" {:?}", literal.to_string()),
        None => " <unresolved>".to_string(),
    })
    .unwrap_or_default();

    println!(
        "{}{}#{}{}",
        "  ".repeat(depth),
        node.kind().type_name(),
        node.id(),
        label
    );
    for child in &node.children {
        print_node(child, model, depth + 1);
    }
}
