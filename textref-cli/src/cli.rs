//! CLI definition for the textref command-line interface.
//!
//! This module only depends on `clap` and `std`.

use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Output format for `textref display`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The stored value as JSON
    Array,
    /// Separator-delimited editable string
    String,
    /// HTML unordered list
    List,
    /// Inline HTML
    Inline,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Array => write!(f, "array"),
            OutputFormat::String => write!(f, "string"),
            OutputFormat::List => write!(f, "list"),
            OutputFormat::Inline => write!(f, "inline"),
        }
    }
}

/// textref - parse and render text reference fields
///
/// Converts between "Title [42]; Other Title" strings and stored
/// {text, reference_id} lists, resolving names against a YAML catalog.
#[derive(Parser, Debug)]
#[command(name = "textref")]
#[command(version)]
#[command(about = "Parse and render text reference fields")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub field: FieldArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Catalog and field settings shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// YAML catalog file (`entities: [{id, name, type, permalink}]`)
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Field configuration file (yaml, toml or json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Catalog type references must belong to
    #[arg(long, global = true)]
    pub post_type: Option<String>,

    /// Allow more than one entry
    #[arg(long, global = true)]
    pub multiple: bool,

    /// Keep a single entry, even if config or environment allow more
    #[arg(long, global = true, conflicts_with = "multiple")]
    pub no_multiple: bool,

    /// Separator between entries
    #[arg(long, global = true)]
    pub separator: Option<String>,

    /// CSS class for generated links
    #[arg(long, global = true)]
    pub link_class: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse edited text into the stored value (printed as JSON)
    Save {
        /// Text to parse; read from stdin when omitted
        text: Option<String>,
        /// Treat the input as JSON (a string or an already stored value)
        #[arg(long)]
        json: bool,
    },
    /// Render a stored value for display
    Display {
        /// Stored value as JSON; read from stdin when omitted
        value: Option<String>,
        /// Output format, defaults to the configured return format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
    /// Render a stored value as the editable string
    Edit {
        /// Stored value as JSON; read from stdin when omitted
        value: Option<String>,
    },
}
