//! articlemark: render markdown articles in the terminal

mod config;
mod display;
mod themes;

use std::io::{self, IsTerminal, Read, Write};
use std::ops::Range;
use std::path::PathBuf;

use anyhow::{Context, Result};
use articlemark_core::{clear, parse, search, SearchResult};
use clap::{ArgAction, Parser};
use ratatui::style::Style;
use ratatui::text::Span;
use tracing_subscriber::EnvFilter;

use config::Config;
use themes::{Theme, THEME_REGISTRY};

/// Width used when neither the arguments, the config nor the terminal say
const DEFAULT_WIDTH: usize = 80;

#[derive(Parser, Debug)]
#[command(name = "articlemark")]
#[command(version, about = "Render markdown articles in the terminal", long_about = None)]
struct Args {
    /// Markdown files to render; standard input when none, or for "-"
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Print the text with all markup removed
    #[arg(long, conflicts_with_all = ["tree", "search"])]
    plain: bool,

    /// Print the parsed element tree as JSON
    #[arg(long, conflicts_with = "search")]
    tree: bool,

    /// Print the lines of the plain text containing QUERY
    #[arg(long, short = 's', value_name = "QUERY")]
    search: Option<String>,

    /// Match QUERY case-sensitively
    #[arg(long, requires = "search")]
    case_sensitive: bool,

    /// Wrap width in cells
    #[arg(long, short = 'w')]
    width: Option<usize>,

    /// Built-in theme name
    #[arg(long, short = 't')]
    theme: Option<String>,

    /// Configuration file to use instead of the default one
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Don't emit OSC 8 hyperlinks
    #[arg(long)]
    no_hyperlinks: bool,

    /// List the built-in themes and exit
    #[arg(long)]
    list_themes: bool,

    /// More logging on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// One input article
struct Source {
    name: String,
    text: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.list_themes {
        for theme in THEME_REGISTRY.all() {
            println!("{:<10} {}", theme.name, theme.display_name);
        }
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(theme) = &args.theme {
        config.theme = theme.clone();
    }
    if args.no_hyperlinks {
        config.hyperlinks = false;
    }

    let sources = read_sources(&args.paths)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.tree {
        for source in &sources {
            let markdown = parse(&source.text)
                .with_context(|| format!("Failed to parse {}", source.name))?;
            let json = serde_json::to_string_pretty(&markdown)
                .context("Failed to serialize element tree")?;
            writeln!(out, "{json}")?;
        }
        return Ok(());
    }

    if args.plain {
        for source in &sources {
            let plain = clear(Some(&source.text))
                .with_context(|| format!("Failed to parse {}", source.name))?
                .unwrap_or_default();
            writeln!(out, "{plain}")?;
        }
        return Ok(());
    }

    let theme = config.resolve_theme();

    if let Some(query) = &args.search {
        let mut total = 0;
        for source in &sources {
            let result = search(&source.text, query, !args.case_sensitive)
                .with_context(|| format!("Failed to parse {}", source.name))?;
            total += result.hits.len();
            print_hits(&mut out, source, &result, &theme, sources.len() > 1)?;
        }
        tracing::info!(query = %query, hits = total, "Search finished");
        return Ok(());
    }

    let width = args
        .width
        .or(config.wrap_width)
        .or_else(terminal_width)
        .unwrap_or(DEFAULT_WIDTH);
    let hyperlinks = config.hyperlinks && io::stdout().is_terminal();
    tracing::debug!(width, hyperlinks, theme = %theme.name, "Rendering");

    for (idx, source) in sources.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        let article = display::render_article(&source.text, &theme, width)
            .with_context(|| format!("Failed to render {}", source.name))?;
        display::print_article(&mut out, &article, hyperlinks)?;
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn terminal_width() -> Option<usize> {
    crossterm::terminal::size()
        .ok()
        .map(|(cols, _)| usize::from(cols))
        .filter(|cols| *cols > 0)
}

fn read_sources(paths: &[PathBuf]) -> Result<Vec<Source>> {
    if paths.is_empty() {
        return Ok(vec![read_stdin()?]);
    }

    let mut sources = Vec::with_capacity(paths.len());
    let mut stdin_read = false;
    for path in paths {
        if path.as_os_str() == "-" {
            // Standard input can only be read once
            if !stdin_read {
                sources.push(read_stdin()?);
                stdin_read = true;
            }
            continue;
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        sources.push(Source {
            name: path.display().to_string(),
            text,
        });
    }
    Ok(sources)
}

fn read_stdin() -> Result<Source> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read standard input")?;
    Ok(Source {
        name: "<stdin>".to_string(),
        text,
    })
}

/// Print every line holding a hit, hits highlighted, prefixed by line number
fn print_hits(
    out: &mut impl Write,
    source: &Source,
    result: &SearchResult,
    theme: &Theme,
    with_name: bool,
) -> Result<()> {
    for (number, bounds, hits) in hit_lines(result) {
        let relative: Vec<Range<usize>> = hits
            .iter()
            .map(|hit| hit.start - bounds.start..hit.end.min(bounds.end) - bounds.start)
            .collect();
        let mut line = display::highlight(&result.plain[bounds], &relative, theme);
        let label = if with_name {
            format!("{}:{number}: ", source.name)
        } else {
            format!("{number}: ")
        };
        line.spans
            .insert(0, Span::styled(label, Style::default().fg(theme.dim_color)));
        display::print_line(out, &line, &[])?;
    }
    Ok(())
}

/// Hits grouped by the line they start on
fn hit_lines(result: &SearchResult) -> Vec<(usize, Range<usize>, Vec<Range<usize>>)> {
    let mut lines: Vec<(usize, Range<usize>, Vec<Range<usize>>)> = Vec::new();
    for hit in &result.hits {
        let bounds = result.line_bounds(hit);
        match lines.last_mut() {
            Some((_, last, hits)) if *last == bounds => hits.push(hit.clone()),
            _ => {
                let (number, _) = result.line_of(hit);
                lines.push((number, bounds, vec![hit.clone()]));
            }
        }
    }
    lines
}
