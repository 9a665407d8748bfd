//! `mdextra convert` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use mdextra::{Extensions, Highlighter, MarkdownExtra};
use mdextra_config::{CliSettings, Config};
use mdextra_renderer::Converter;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Markdown input file (default: stdin; `-` also reads stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdextra.toml).
    #[arg(short, long, env = "MDEXTRA_CONFIG")]
    config: Option<PathBuf>,

    /// Comma-separated constructs to enable, or `all` (overrides config).
    #[arg(long)]
    extensions: Option<Extensions>,

    /// CSS class for generated tables (overrides config).
    #[arg(long)]
    table_class: Option<String>,

    /// Code block class convention: none, prettify or highlight.js (overrides config).
    #[arg(long)]
    highlighter: Option<Highlighter>,

    /// Do not sanitize cell, term and definition content.
    #[arg(long)]
    no_sanitize_nested: bool,

    /// Sanitize the converted document itself.
    #[arg(long)]
    sanitize_output: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Using configuration file");
        }

        let markdown = read_input(self.input.as_deref())?;
        if markdown.trim().is_empty() {
            output.warning("Input is empty");
        }

        let html = convert(&markdown, &config)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, &html)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                stdout.flush()?;
            }
        }

        if self.verbose {
            output.info(&format!("Converted {} bytes of markdown", markdown.len()));
        }
        Ok(())
    }

    /// Flags that override configuration file values.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            extensions: self.extensions.clone(),
            table_class: self.table_class.clone(),
            highlighter: self.highlighter,
            sanitize_nested: self.no_sanitize_nested.then_some(false),
            sanitize_output: self.sanitize_output.then_some(true),
        }
    }
}

/// Read markdown from `path`, or from stdin when no path (or `-`) is given.
fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => {
            if !path.is_file() {
                return Err(CliError::Validation(format!(
                    "Input file not found: {}",
                    path.display()
                )));
            }
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut markdown = String::new();
            std::io::stdin().read_to_string(&mut markdown)?;
            Ok(markdown)
        }
    }
}

/// Convert `markdown` with a host converter built from `config`.
fn convert(markdown: &str, config: &Config) -> Result<String, CliError> {
    let mut converter = if config.converter.sanitize {
        Converter::sanitizing()
    } else {
        Converter::new()
    };
    MarkdownExtra::init(&mut converter, config.extra_resolved.clone());

    Ok(converter.make_html(markdown)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use mdextra::Construct;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ConvertArgs,
    }

    fn parse(args: &[&str]) -> ConvertArgs {
        TestCli::try_parse_from(std::iter::once("convert").chain(args.iter().copied()))
            .unwrap()
            .args
    }

    #[test]
    fn test_no_flags_override_nothing() {
        let settings = parse(&[]).cli_settings();

        assert!(settings.extensions.is_none());
        assert!(settings.table_class.is_none());
        assert!(settings.highlighter.is_none());
        assert_eq!(settings.sanitize_nested, None);
        assert_eq!(settings.sanitize_output, None);
    }

    #[test]
    fn test_flags_become_settings() {
        let settings = parse(&[
            "--extensions",
            "tables, fenced_code",
            "--table-class",
            "wmd-table",
            "--highlighter",
            "highlight.js",
            "--no-sanitize-nested",
            "--sanitize-output",
        ])
        .cli_settings();

        assert_eq!(
            settings.extensions,
            Some(Extensions::only([Construct::Tables, Construct::FencedCode]))
        );
        assert_eq!(settings.table_class.as_deref(), Some("wmd-table"));
        assert_eq!(settings.highlighter, Some(Highlighter::HighlightJs));
        assert_eq!(settings.sanitize_nested, Some(false));
        assert_eq!(settings.sanitize_output, Some(true));
    }

    #[test]
    fn test_convert_uses_resolved_options() {
        let mut config = Config::default();
        config.extra_resolved = config.extra_resolved.clone().with_table_class("wmd-table");

        let html = convert("a | b\n--|--\n1 | 2", &config).unwrap();

        assert!(html.starts_with("<table class=\"wmd-table\">"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_convert_sanitizing_host() {
        let mut config = Config::default();
        config.converter.sanitize = true;

        let html = convert("<script>alert(1)</script>\n\n```js\nx\n```", &config).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<pre><code class="js">x</code></pre>"#));
    }

    #[test]
    fn test_missing_input_file() {
        let err = read_input(Some(Path::new("/nonexistent/input.md"))).unwrap_err();
        assert!(err.to_string().contains("Input file not found"));
    }
}
