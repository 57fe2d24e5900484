use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use scx_core::sections::Trigger;
use scx_core::{BodyLayout, Compression, ImageCodec, Scenario};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a short summary of a scenario.
    Info {
        #[arg(value_name = "FILE.SCX")]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the whole decoded scenario as JSON.
    Dump {
        #[arg(value_name = "FILE.SCX")]
        path: PathBuf,
    },
    /// Print where each section sits in the decompressed body.
    Layout {
        #[arg(value_name = "FILE.SCX")]
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List triggers with their condition and effect kinds.
    Triggers {
        #[arg(value_name = "FILE.SCX")]
        path: PathBuf,
    },
    /// Decode and re-encode a scenario.
    Rewrite {
        #[arg(value_name = "FILE.SCX")]
        path: PathBuf,
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
        /// Deflate level, 0-9.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
        level: Option<u32>,
    },
    /// Export the embedded background bitmap as a .bmp file.
    Bitmap {
        #[arg(value_name = "FILE.SCX")]
        path: PathBuf,
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Info { path, json } => {
            let (scenario, _) = open_scenario(&path);
            if json {
                print_json(&JsonValue::Object(info_json(&scenario)));
            } else {
                for (key, value) in info_pairs(&scenario) {
                    println!("{key}={value}");
                }
            }
        }
        Command::Dump { path } => {
            let (scenario, _) = open_scenario(&path);
            let json = serde_json::to_value(&scenario).unwrap_or_else(|e| {
                eprintln!("Error converting scenario to JSON: {e}");
                process::exit(1);
            });
            print_json(&json);
        }
        Command::Layout { path, json } => {
            let (_, layout) = open_scenario(&path);
            if json {
                print_json(&layout_json(&layout));
            } else {
                print_layout(&layout);
            }
        }
        Command::Triggers { path } => {
            let (scenario, _) = open_scenario(&path);
            for (index, trigger) in scenario.triggers.triggers.iter().enumerate() {
                print_trigger(index, trigger);
            }
        }
        Command::Rewrite {
            path,
            output,
            level,
        } => {
            let (scenario, _) = open_scenario(&path);
            let level = level.map(Compression::new).unwrap_or_default();
            let bytes = scenario.encode_with(level).unwrap_or_else(|e| {
                eprintln!("Error encoding scenario: {e}");
                process::exit(1);
            });
            write_output(&output, &bytes);
            println!("Wrote {} bytes to {}", bytes.len(), output.display());
        }
        Command::Bitmap { path, output } => {
            let (scenario, _) = open_scenario(&path);
            let Some(bitmap) = scenario.bitmap() else {
                eprintln!("No embedded bitmap in {}", path.display());
                process::exit(1);
            };
            let bytes = bitmap.to_bmp_file().unwrap_or_else(|e| {
                eprintln!("Error encoding bitmap: {e}");
                process::exit(1);
            });
            write_output(&output, &bytes);
            println!(
                "Wrote {}x{} bitmap to {}",
                bitmap.width(),
                bitmap.height(),
                output.display()
            );
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_scenario(path: &Path) -> (Scenario, BodyLayout) {
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });
    debug!(path = %path.display(), len = bytes.len(), "read scenario file");

    Scenario::decode_with_layout(&bytes).unwrap_or_else(|e| {
        eprintln!("Error parsing scenario file: {}", path.display());
        eprintln!("  {}", e);
        process::exit(1);
    })
}

fn write_output(path: &Path, bytes: &[u8]) {
    fs::write(path, bytes).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", path.display());
        process::exit(1);
    });
}

fn print_json(json: &JsonValue) {
    let rendered = serde_json::to_string_pretty(json).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn bitmap_size(scenario: &Scenario) -> Option<(i32, i32)> {
    scenario.bitmap().map(|b| (b.width(), b.height()))
}

fn info_pairs(scenario: &Scenario) -> Vec<(&'static str, String)> {
    let mut out = vec![
        ("instructions", scenario.instructions.clone()),
        ("timestamp", scenario.last_save_timestamp.to_string()),
        ("players", scenario.player_count.to_string()),
        (
            "map",
            format!("{}x{}", scenario.map.width, scenario.map.height),
        ),
        ("triggers", scenario.triggers.len().to_string()),
        ("units", scenario.units.unit_count().to_string()),
        (
            "included_files",
            scenario.included_files.file_count().to_string(),
        ),
    ];
    out.push((
        "bitmap",
        match bitmap_size(scenario) {
            Some((w, h)) => format!("{w}x{h}"),
            None => "none".to_string(),
        },
    ));
    out
}

fn info_json(scenario: &Scenario) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert(
        "instructions".to_string(),
        JsonValue::String(scenario.instructions.clone()),
    );
    out.insert(
        "timestamp".to_string(),
        JsonValue::from(scenario.last_save_timestamp),
    );
    out.insert("players".to_string(), JsonValue::from(scenario.player_count));

    let mut map = JsonMap::new();
    map.insert("width".to_string(), JsonValue::from(scenario.map.width));
    map.insert("height".to_string(), JsonValue::from(scenario.map.height));
    out.insert("map".to_string(), JsonValue::Object(map));

    out.insert(
        "triggers".to_string(),
        JsonValue::from(scenario.triggers.len()),
    );
    out.insert(
        "units".to_string(),
        JsonValue::from(scenario.units.unit_count()),
    );
    out.insert(
        "included_files".to_string(),
        JsonValue::from(scenario.included_files.file_count()),
    );
    out.insert(
        "bitmap".to_string(),
        match bitmap_size(scenario) {
            Some((w, h)) => {
                let mut bitmap = JsonMap::new();
                bitmap.insert("width".to_string(), JsonValue::from(w));
                bitmap.insert("height".to_string(), JsonValue::from(h));
                JsonValue::Object(bitmap)
            }
            None => JsonValue::Null,
        },
    );
    out
}

fn layout_json(layout: &BodyLayout) -> JsonValue {
    let sections = layout
        .sections
        .iter()
        .map(|s| {
            let mut section = JsonMap::new();
            section.insert("id".to_string(), JsonValue::String(s.id.to_string()));
            section.insert("start".to_string(), JsonValue::from(s.range.start));
            section.insert("end".to_string(), JsonValue::from(s.range.end));
            section.insert("len".to_string(), JsonValue::from(s.range.len()));
            JsonValue::Object(section)
        })
        .collect();

    let mut out = JsonMap::new();
    out.insert(
        "prologue_len".to_string(),
        JsonValue::from(layout.prologue_len),
    );
    out.insert(
        "compressed_len".to_string(),
        JsonValue::from(layout.compressed_len),
    );
    out.insert("body_len".to_string(), JsonValue::from(layout.body_len));
    out.insert(
        "validation_ok".to_string(),
        JsonValue::Bool(layout.validate().is_ok()),
    );
    out.insert("sections".to_string(), JsonValue::Array(sections));
    JsonValue::Object(out)
}

fn print_layout(layout: &BodyLayout) {
    println!(
        "prologue {} bytes, compressed {} bytes, body {} bytes",
        layout.prologue_len, layout.compressed_len, layout.body_len
    );
    for section in &layout.sections {
        println!(
            "  {:<26} {:>10} ({} bytes)",
            section.id,
            section.range.to_string(),
            section.range.len()
        );
    }
}

fn print_trigger(index: usize, trigger: &Trigger) {
    println!("{index}: {trigger}");
    for condition in &trigger.conditions {
        println!("  if   {}", condition.kind());
    }
    for effect in &trigger.effects {
        println!("  then {}", effect.kind());
    }
}
