//! excalidoc command-line entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use excalidoc::config::AppConfig;
use excalidoc::format::{EncodeOptions, ExcalidrawFile, FormatGeneration, dangling_references};
use excalidoc::store::{DocumentStore, StoreError};

#[derive(Parser, Debug, Clone)]
#[command(name = "excalidoc", version, about = "Inspect and convert Excalidraw documents")]
struct Cli {
    /// Asset directory (default: from config, else the working directory)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Configuration file (default: the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// List documents in the asset directory.
    List,

    /// Decode a document and print a summary.
    Check {
        /// Document path.
        file: PathBuf,
    },

    /// Re-encode a document in the given generation.
    Convert {
        /// Document path.
        file: PathBuf,

        /// Target generation: v1|current
        #[arg(long, default_value = "current", value_parser = parse_generation)]
        to: FormatGeneration,

        /// Output path (default: overwrite the input).
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write compact JSON instead of pretty-printed.
        #[arg(long)]
        compact: bool,
    },

    /// Create an empty untitled document.
    New,

    /// Copy an external document into the asset directory.
    Import {
        /// Source document path.
        file: PathBuf,
    },
}

fn parse_generation(name: &str) -> Result<FormatGeneration, String> {
    FormatGeneration::parse(name).ok_or_else(|| format!("unknown generation '{name}'"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load_from_default_path(),
    }
    .unwrap_or_default();

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();
    log::debug!(
        "Log level {} from configuration",
        config.preferences.log_level.name()
    );

    let root = cli
        .dir
        .clone()
        .unwrap_or_else(|| config.preferences.asset_dir());
    let store = DocumentStore::new(root).with_options(config.preferences.encode_options());

    match run(cli.command, &store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, store: &DocumentStore) -> Result<(), StoreError> {
    match command {
        Command::List => {
            for path in store.list_documents()? {
                println!("{}", display_name(store, &path));
            }
        }
        Command::Check { file } => check(store, &file)?,
        Command::Convert {
            file,
            to,
            output,
            compact,
        } => {
            let document = store.load(&file)?;
            let target = output.unwrap_or_else(|| file.clone());
            let options = EncodeOptions::new().generation(to).pretty(!compact);
            store.write_document(&target, &document.to_vec(&options)?)?;
            println!(
                "{} ({}) -> {} ({})",
                file.display(),
                document.generation(),
                target.display(),
                to
            );
        }
        Command::New => {
            let path = store.new_file()?;
            println!("{}", path.display());
        }
        Command::Import { file } => {
            let path = store.import_file(&file)?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn check(store: &DocumentStore, file: &Path) -> Result<(), StoreError> {
    let document = store.load(file)?;

    println!("{}", file.display());
    println!(
        "  type: {}",
        document.kind.as_deref().unwrap_or("(none)")
    );
    if let Some(version) = document.version {
        println!("  version: {version}");
    }
    println!("  format: {}", document.generation());
    println!(
        "  elements: {} ({} deleted)",
        document.elements.len(),
        document.elements.iter().filter(|e| e.is_deleted()).count()
    );
    for (element_type, count) in document.count_by_type() {
        println!("    {element_type}: {count}");
    }

    let dangling = dangling_references(&document.elements);
    for reference in &dangling {
        println!("  warning: {reference}");
    }
    if !document.is_version_supported() {
        println!("  warning: file version is newer than supported");
    }
    Ok(())
}

fn display_name(store: &DocumentStore, path: &Path) -> String {
    path.strip_prefix(store.root())
        .unwrap_or(path)
        .display()
        .to_string()
}
