//! ankifast: CLI tool to export flashcard notes to Anki

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

use ankifast_core::{
    ExportOptions, Exporter, FileNaming, MarkdownRenderer, TEMPLATE, cards_to_json, count_markers,
    insert_template, line_offset, parse,
};
use config::{CONFIG_FILE_NAME, Config};

#[derive(Parser, Debug)]
#[command(name = "ankifast")]
#[command(about = "Export flashcard notes to Anki")]
#[command(version)]
#[command(after_help = "Examples:
  ankifast export notes.md                # Export to export-to-anki-notes.md.txt
  ankifast export notes.md --lines 10:40  # Export a selection of lines
  ankifast export vault/ -r -j4           # Export every note, 4 parallel jobs
  ankifast template notes.md --line 12    # Insert an empty card before line 12
  ankifast init                           # Write _ankifast.toml")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the cards of a note, or of every note in a directory
    Export(ExportArgs),
    /// Insert an empty card template into a note
    Template(TemplateArgs),
    /// Write a sample configuration file
    Init(InitArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Input note file or directory
    input: PathBuf,

    /// Export only these lines of the note (1-based, inclusive)
    #[arg(short, long, value_name = "START:END", value_parser = parse_line_range)]
    lines: Option<LineRange>,

    /// Directory to write export files to (defaults to the note's directory)
    #[arg(long, value_name = "DIR")]
    vault: Option<PathBuf>,

    /// Configuration file (defaults to _ankifast.toml next to the input)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep $...$ math as plain text
    #[arg(long)]
    no_latex: bool,

    /// Print the parsed cards as JSON instead of writing an export file
    #[arg(long)]
    dump_cards: bool,

    /// Number of parallel jobs (defaults to number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,
}

#[derive(Args, Debug)]
struct TemplateArgs {
    /// Note to insert the template into (prints the template when omitted)
    file: Option<PathBuf>,

    /// Insert before this line (1-based; defaults to the end of the note)
    #[arg(long, value_name = "N", requires = "file")]
    line: Option<NonZeroUsize>,
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Output file (defaults to _ankifast.toml, or stdout with --schema)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the JSON schema of the configuration file instead
    #[arg(long)]
    schema: bool,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

/// Inclusive, 1-based range of lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    /// The text covered by the range, including the final line break
    fn select(self, document: &str) -> &str {
        let start = line_offset(document, self.start - 1);
        let end = line_offset(document, self.end);
        &document[start..end]
    }
}

/// The selected text of `document`, if any
///
/// An empty selection counts as no selection, so the whole note is used.
fn selection(document: &str, lines: Option<LineRange>) -> Option<&str> {
    lines
        .map(|range| range.select(document))
        .filter(|text| !text.is_empty())
}

fn parse_line_range(s: &str) -> std::result::Result<LineRange, String> {
    let (start, end) = s.split_once(':').unwrap_or((s, s));
    let parse_line = |v: &str| {
        v.trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| format!("invalid line number: {v:?}"))
    };
    let range = LineRange {
        start: parse_line(start)?,
        end: parse_line(end)?,
    };
    if range.end < range.start {
        return Err(format!("range ends before it starts: {s}"));
    }
    Ok(range)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Export(args) => run_export(&args, cli.quiet),
        Command::Template(args) => run_template(&args, cli.quiet),
        Command::Init(args) => run_init(&args, cli.quiet),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Settings shared by every file of an export run
struct ExportSettings {
    naming: FileNaming,
    options: ExportOptions,
    vault: Option<PathBuf>,
}

impl ExportSettings {
    /// Command-line flags override the configuration file
    fn resolve(args: &ExportArgs, config: &Config) -> Self {
        let mut options = config.export_options();
        if args.no_latex {
            options.latex = false;
        }
        Self {
            naming: config.file_naming(),
            options,
            vault: args
                .vault
                .clone()
                .or_else(|| config.output.vault_root.clone()),
        }
    }

    /// Directory the export of `input` is written to
    fn output_dir(&self, input: &Path) -> PathBuf {
        match &self.vault {
            Some(dir) => dir.clone(),
            None => note_dir(input).to_path_buf(),
        }
    }

    /// Path of the export file of `input`
    fn output_path(&self, input: &Path, selection: Option<&str>) -> Result<PathBuf> {
        let document_name = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("Not a file: {}", input.display()))?;
        let file_name = self.naming.file_name(&document_name, selection);
        Ok(self.output_dir(input).join(file_name))
    }
}

/// Outcome of exporting a single note
struct ExportReport {
    file_name: String,
    path: PathBuf,
    selection: bool,
}

impl ExportReport {
    fn message(&self) -> String {
        let what = if self.selection { "selection" } else { "content" };
        format!("Exported {} to {} file.", what, self.file_name)
    }
}

fn note_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None => Ok(Config::load_from_dir(dir)?.unwrap_or_default()),
    }
}

fn run_export(args: &ExportArgs, quiet: bool) -> Result<()> {
    if args.input.is_dir() {
        if args.lines.is_some() || args.dump_cards {
            anyhow::bail!("--lines and --dump-cards require a single note");
        }
        return export_directory(args, quiet);
    }

    if !args.input.is_file() {
        anyhow::bail!("active file not found: {}", args.input.display());
    }

    let config = load_config(args.config.as_deref(), note_dir(&args.input))?;
    let settings = ExportSettings::resolve(args, &config);

    if args.dump_cards {
        return dump_cards(&args.input, args.lines);
    }

    let exporter = Exporter::with_options(MarkdownRenderer::new(), settings.options);
    let report = export_file(&args.input, args.lines, &settings, &exporter)?;

    if !quiet {
        println!("{}", report.message());
    }
    tracing::debug!("Wrote {}", report.path.display());

    Ok(())
}

/// Export a single note
fn export_file(
    input: &Path,
    lines: Option<LineRange>,
    settings: &ExportSettings,
    exporter: &Exporter<MarkdownRenderer>,
) -> Result<ExportReport> {
    let document = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;

    let selection = selection(&document, lines);
    let text = selection.unwrap_or(&document);

    let counts = count_markers(text);
    tracing::debug!(
        "{}: {} content headers, {} questions headers",
        input.display(),
        counts.content,
        counts.questions
    );

    let export = exporter.export(text)?;
    tracing::debug!(
        "{}: {} cards, {} rows",
        input.display(),
        export.cards,
        export.rows
    );

    let path = settings.output_path(input, selection)?;
    if let Some(output_dir) = path.parent() {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;
    }
    fs::write(&path, &export.body)
        .with_context(|| format!("Failed to write: {}", path.display()))?;

    Ok(ExportReport {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path,
        selection: selection.is_some(),
    })
}

/// Print the parsed cards of a note as JSON
fn dump_cards(input: &Path, lines: Option<LineRange>) -> Result<()> {
    let document = fs::read_to_string(input)
        .with_context(|| format!("Failed to read: {}", input.display()))?;
    let text = selection(&document, lines).unwrap_or(&document);

    let cards = parse(text)?;
    println!("{}", cards_to_json(&cards).context("Failed to serialize cards")?);
    Ok(())
}

/// Export every note of a directory
fn export_directory(args: &ExportArgs, quiet: bool) -> Result<()> {
    let input = &args.input;
    let config = load_config(args.config.as_deref(), input)?;
    let settings = ExportSettings::resolve(args, &config);

    let files = collect_note_files(input, args.recursive)?;

    if files.is_empty() {
        if !quiet {
            eprintln!("No .md files found in {}", input.display());
        }
        return Ok(());
    }

    tracing::debug!("Found {} notes", files.len());

    // Configure thread pool if jobs specified
    if let Some(n) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let shared = shared_export_files(&files, &settings)?;
    for (path, count) in &shared {
        tracing::warn!("{} notes export to {}", count, path.display());
    }

    let exporter = Exporter::with_options(MarkdownRenderer::new(), settings.options);

    let success = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let errors: Vec<_> = files
        .par_iter()
        .filter_map(|file| {
            let result = ensure_unshared(file, &settings, &shared)
                .and_then(|()| export_file(file, None, &settings, &exporter));
            match result {
                Ok(report) => {
                    success.fetch_add(1, Ordering::Relaxed);
                    if !quiet {
                        println!("{}", report.message());
                    }
                    None
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("Failed to export {}: {}", file.display(), e);
                    Some((file.clone(), e))
                }
            }
        })
        .collect();

    // Report errors
    for (file, e) in &errors {
        eprintln!("Error exporting {}: {}", file.display(), e);
    }

    let success_count = success.load(Ordering::Relaxed);
    let failed_count = failed.load(Ordering::Relaxed);

    if !quiet {
        eprintln!("Exported {} notes, {} failed", success_count, failed_count);
    }

    if failed_count > 0 {
        anyhow::bail!("{} notes failed to export", failed_count);
    }

    Ok(())
}

/// Export files that more than one note of the run would write, with the
/// number of notes writing each
fn shared_export_files(
    files: &[PathBuf],
    settings: &ExportSettings,
) -> Result<HashMap<PathBuf, usize>> {
    let mut writers: HashMap<PathBuf, usize> = HashMap::new();
    for file in files {
        *writers.entry(settings.output_path(file, None)?).or_default() += 1;
    }
    writers.retain(|_, count| *count > 1);
    Ok(writers)
}

/// Refuse to export a note whose export file another note also writes
fn ensure_unshared(
    file: &Path,
    settings: &ExportSettings,
    shared: &HashMap<PathBuf, usize>,
) -> Result<()> {
    let path = settings.output_path(file, None)?;
    if let Some(count) = shared.get(&path) {
        anyhow::bail!(
            "{} is the export file of {} notes; use distinct note names or drop --vault",
            path.display(),
            count
        );
    }
    Ok(())
}

/// Collect all .md files in a directory
fn collect_note_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext.eq_ignore_ascii_case("md") {
                    files.push(path);
                }
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_note_files(&path, recursive)?);
        }
    }

    files.sort();
    Ok(files)
}

fn run_template(args: &TemplateArgs, quiet: bool) -> Result<()> {
    let Some(path) = &args.file else {
        println!("{TEMPLATE}");
        return Ok(());
    };

    if !path.is_file() {
        anyhow::bail!("active file not found: {}", path.display());
    }

    let mut document =
        fs::read_to_string(path).with_context(|| format!("Failed to read: {}", path.display()))?;

    let mut at = match args.line {
        Some(line) => line_offset(&document, line.get() - 1),
        None => document.len(),
    };
    // Appending keeps the template off the last line of the note
    if at == document.len() && !document.is_empty() && !document.ends_with('\n') {
        document.push('\n');
        at = document.len();
    }

    let mut inserted = insert_template(&document, at..at)?;
    if at < document.len() {
        // The following line keeps its own line
        inserted.text.insert(at + TEMPLATE.len(), '\n');
    }

    fs::write(path, &inserted.text)
        .with_context(|| format!("Failed to write: {}", path.display()))?;

    if !quiet {
        println!(
            "{}:{}",
            inserted.cursor.line + 1,
            inserted.cursor.column + 1
        );
    }
    Ok(())
}

fn run_init(args: &InitArgs, quiet: bool) -> Result<()> {
    let (content, default_path) = if args.schema {
        (Config::json_schema_string()?, None)
    } else {
        (
            Config::sample().to_toml_with_schema()?,
            Some(PathBuf::from(CONFIG_FILE_NAME)),
        )
    };

    let Some(path) = args.output.clone().or(default_path) else {
        println!("{content}");
        return Ok(());
    };

    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    fs::write(&path, &content).with_context(|| format!("Failed to write: {}", path.display()))?;

    if !quiet {
        println!("{}", path.display());
    }
    Ok(())
}
