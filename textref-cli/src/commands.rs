//! Command handlers. Each returns the text to print on stdout.

use std::io::{self, IsTerminal, Read};

use textref_field::{
    on_display, on_edit_render, on_save, ConfigLoader, FieldConfig, FieldInput, MemoryCatalog,
    Rendered, ReturnFormat, Value,
};
use tracing::debug;

use crate::cli::{Cli, Commands, FieldArgs, OutputFormat};
use crate::error::Result;

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<String> {
    let config = load_config(&cli.field)?;
    let catalog = load_catalog(&cli.field)?;

    match cli.command {
        Commands::Save { text, json } => {
            let raw = input_or_stdin(text)?;
            let input = if json {
                serde_json::from_str::<FieldInput>(&raw)?
            } else {
                FieldInput::Text(raw)
            };
            let value = on_save(input, &config, &catalog);
            Ok(serde_json::to_string_pretty(&value)?)
        }
        Commands::Display { value, format } => {
            let stored = parse_stored(&input_or_stdin(value)?)?;
            let config = match format {
                Some(format) => config.with_return_format(return_format(format)),
                None => config,
            };
            match on_display(&stored, &config, &catalog) {
                Rendered::Entries(value) => Ok(serde_json::to_string_pretty(&value)?),
                Rendered::Text(text) => Ok(text),
            }
        }
        Commands::Edit { value } => {
            let stored = parse_stored(&input_or_stdin(value)?)?;
            Ok(on_edit_render(&stored, &config))
        }
    }
}

/// Field settings: config file, then `TEXTREF_` variables, then flags.
pub fn load_config(args: &FieldArgs) -> Result<FieldConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    if let Some(post_type) = &args.post_type {
        loader = loader.with_override("post_type", post_type.as_str());
    }
    if args.multiple {
        loader = loader.with_override("multiple", true);
    } else if args.no_multiple {
        loader = loader.with_override("multiple", false);
    }
    if let Some(separator) = &args.separator {
        loader = loader.with_override("separator", separator.as_str());
    }
    if let Some(link_class) = &args.link_class {
        loader = loader.with_override("link_class", link_class.as_str());
    }
    Ok(loader.load()?)
}

/// The catalog file, or an empty catalog when none is given.
pub fn load_catalog(args: &FieldArgs) -> Result<MemoryCatalog> {
    match &args.catalog {
        Some(path) => {
            debug!("Loading catalog: {}", path.display());
            Ok(MemoryCatalog::from_yaml_file(path)?)
        }
        None => Ok(MemoryCatalog::new()),
    }
}

fn return_format(format: OutputFormat) -> ReturnFormat {
    match format {
        OutputFormat::Array => ReturnFormat::Array,
        OutputFormat::String => ReturnFormat::String,
        OutputFormat::List => ReturnFormat::List,
        OutputFormat::Inline => ReturnFormat::Inline,
    }
}

/// Stored values arrive as JSON; blank input is an empty value.
fn parse_stored(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::new());
    }
    Ok(serde_json::from_str(raw)?)
}

fn input_or_stdin(arg: Option<String>) -> Result<String> {
    if let Some(arg) = arg {
        return Ok(arg);
    }
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches(['\n', '\r']).to_string())
}
