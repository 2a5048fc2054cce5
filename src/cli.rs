use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glob::Pattern;

use crate::diff::Granularity;
use crate::theme::Theme;
use crate::utils::parse_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GranularityArg {
    Word,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    /// Colors when stdout is a terminal, plain text otherwise
    Auto,
    Color,
    Html,
    Plain,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Unified diff with word-level highlighting", long_about = None)]
pub struct Args {
    /// Old file or directory
    pub old: PathBuf,

    /// New file or directory
    pub new: PathBuf,

    /// Output NUM lines of unified context
    #[arg(short = 'U', long = "unified", value_name = "NUM", default_value_t = 3)]
    pub context: usize,

    /// Highlight changes inside lines (word) or only whole lines (line)
    #[arg(short, long, value_enum, default_value_t = GranularityArg::Word)]
    pub granularity: GranularityArg,

    /// Output markup
    #[arg(short, long, value_enum, default_value_t = ThemeArg::Auto)]
    pub theme: ThemeArg,

    /// Glob patterns to ignore in directory mode (can be repeated or comma separated)
    #[arg(short, long, value_delimiter = ',', num_args = 1..)]
    pub ignore: Vec<String>,

    /// Normalize EOL (CRLF/LF) before text comparison
    #[arg(short = 'E', long)]
    pub normalize_eol: bool,

    /// Max size (in bytes) for text diff per file (e.g., 5MB, 102400)
    #[arg(short = 'S', long, default_value = "5MB")]
    pub max_text_size: String,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub struct Options {
    pub context: usize,
    pub granularity: Granularity,
    pub theme: Theme,
    pub normalize_eol: bool,
    pub max_text_size: u64,
    pub ignore_patterns: Vec<Pattern>,
}

fn resolve_theme(choice: ThemeArg) -> Theme {
    match choice {
        ThemeArg::Auto if std::io::stdout().is_terminal() => Theme::ansi(),
        ThemeArg::Auto | ThemeArg::Plain => Theme::plain(),
        ThemeArg::Color => Theme::ansi(),
        ThemeArg::Html => Theme::html(),
    }
}

pub fn build_options(args: &Args) -> Result<Options> {
    let patterns = args
        .ignore
        .iter()
        .map(|s| Pattern::new(s).with_context(|| format!("Invalid glob pattern: {s}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(Options {
        context: args.context,
        granularity: match args.granularity {
            GranularityArg::Word => Granularity::Word,
            GranularityArg::Line => Granularity::Line,
        },
        theme: resolve_theme(args.theme),
        normalize_eol: args.normalize_eol,
        max_text_size: parse_size(&args.max_text_size),
        ignore_patterns: patterns,
    })
}
