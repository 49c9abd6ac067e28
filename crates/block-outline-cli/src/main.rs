use anyhow::{Context, Result, bail};
use block_outline_config::{Config, OutlineSettings};
use block_outline_engine::{Note, Outline, ParseOptions, io};
use clap::Parser;
use relative_path::RelativePathBuf;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "block-outline",
    version,
    about = "Map markdown blocks to line ranges"
)]
struct Args {
    /// Markdown file or notes directory (defaults to the configured notes_path)
    path: Option<PathBuf>,

    /// Config file to read instead of ~/.config/block-outline/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number given to the first line
    #[arg(long)]
    start_index: Option<usize>,

    /// Key list items by their longest words instead of a counter
    #[arg(long)]
    line_keys: bool,

    /// How many words a line-derived list key keeps
    #[arg(long)]
    word_len: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?
            .with_context(|| format!("config file not found: {}", path.display()))?,
        None => Config::load()
            .context("loading config")?
            .unwrap_or_default(),
    };

    let options = parse_options(&config.outline, &args);
    log::debug!("parse options: {options:?}");

    let Some(target) = args.path.clone().or(config.notes_path) else {
        bail!(
            "no path given and no notes_path configured in {}\nUsage: block-outline [OPTIONS] [PATH]",
            Config::config_path().display()
        );
    };

    let output = if target.is_dir() {
        let notes = io::outline_notes_dir(&target, &options)
            .with_context(|| format!("outlining {}", target.display()))?;
        match args.format {
            OutputFormat::Text => render_notes_text(&notes),
            OutputFormat::Json => render_notes_json(&notes)?,
        }
    } else {
        let note = load_single(&target, &options)?;
        match args.format {
            OutputFormat::Text => render_text(note.outline()),
            OutputFormat::Json => serde_json::to_string_pretty(note.outline())?,
        }
    };

    print!("{output}");
    if args.format == OutputFormat::Json {
        println!();
    }
    Ok(())
}

/// Config settings with command-line overrides applied.
fn parse_options(settings: &OutlineSettings, args: &Args) -> ParseOptions {
    ParseOptions::new()
        .with_start_index(args.start_index.unwrap_or_else(|| settings.start_index()))
        .with_line_keys(args.line_keys || settings.line_keys)
        .with_list_key_word_len(args.word_len.unwrap_or_else(|| settings.list_key_word_len()))
}

fn load_single(path: &Path, options: &ParseOptions) -> Result<Note> {
    let file_name = path
        .file_name()
        .with_context(|| format!("not a file path: {}", path.display()))?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let relative = RelativePathBuf::from(file_name.to_string_lossy().as_ref());
    Note::load(&relative, root, options).with_context(|| format!("reading {}", path.display()))
}

fn render_text(outline: &Outline) -> String {
    let mut out = String::new();
    for block in &outline.blocks {
        let _ = writeln!(
            out,
            "{}  [{}, {}]",
            block.key, block.range.start, block.range.end
        );
    }
    if !outline.task_lines.is_empty() {
        let _ = writeln!(out, "tasks: {}", join_numbers(&outline.task_lines));
    }
    if let Some(incomplete) = &outline.tasks.incomplete {
        let _ = writeln!(out, "incomplete: {}", join_numbers(&incomplete.all));
        if !incomplete.top.is_empty() {
            let _ = writeln!(out, "incomplete (top): {}", join_numbers(&incomplete.top));
        }
    }
    for range in &outline.codeblock_ranges {
        let _ = writeln!(out, "code  [{}, {}]", range.start, range.end);
    }
    out
}

fn render_notes_text(notes: &[Note]) -> String {
    let mut out = String::new();
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "== {} ==", note.relative_path());
        out.push_str(&render_text(note.outline()));
    }
    out
}

fn render_notes_json(notes: &[Note]) -> Result<String> {
    let by_path: BTreeMap<&str, &Outline> = notes
        .iter()
        .map(|note| (note.relative_path().as_str(), note.outline()))
        .collect();
    Ok(serde_json::to_string_pretty(&by_path)?)
}

fn join_numbers(numbers: &[usize]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
