use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use kubesql_log::LogHandle;
use kubesql_parser::parse;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, path::PathBuf};
use tracing::debug;

mod config;
mod output;

use config::Config;
use output::{render, OutputFormat};

const DEFAULT_LOG_LEVEL: &str = "warn";

const EXAMPLES: &str = "\
EXAMPLES:
    # Parse a simple SELECT query and output as JSON
    kubesql \"SELECT name, namespace FROM pods WHERE status='Running'\"

    # Parse a query with aliases and output as YAML
    kubesql --format yaml \"SELECT metadata.name AS pod_name, status.phase AS status FROM pods\"

    # Parse a complex query with ORDER BY and LIMIT
    kubesql \"SELECT * FROM deployments ORDER BY creationTimestamp DESC LIMIT 5\"

SUPPORTED SQL FEATURES:
    - SELECT with field selection and aliases
    - FROM with Kubernetes resource types
    - WHERE with TSL filter conditions
    - ORDER BY with ASC/DESC sorting
    - LIMIT for result count restriction

Without a query, an interactive shell is started.";

/// KubeSQL parser command-line tool.
#[derive(Parser)]
#[command(
    name = "kubesql",
    author,
    version,
    about = "Parse KubeSQL queries and output the result as JSON or YAML",
    after_help = EXAMPLES
)]
struct Cli {
    /// KubeSQL query; multiple arguments are joined with spaces.
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    query: Vec<String>,

    /// Read the query from a file.
    #[arg(short = 'f', long = "file", conflicts_with = "query")]
    file: Option<PathBuf>,

    /// Output format [default: json].
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[command(flatten)]
    opts: Options,
}

#[derive(Args, Default)]
struct Options {
    /// Path to configuration file (default: $HOME/.kubesqlrc).
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Log parser internals to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json")]
    log_json: bool,
}

impl Cli {
    /// The query given on the command line or in `--file`, if any.
    fn query_text(&self) -> Result<Option<String>> {
        if let Some(file) = &self.file {
            let text = fs::read_to_string(file)
                .with_context(|| format!("read query file {}", file.display()))?;
            return Ok(Some(text));
        }
        if self.query.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.query.join(" ")))
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.opts.config.as_deref())?;
    let level = if cli.opts.verbose {
        "debug"
    } else {
        config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    };
    let log = kubesql_log::init(level, cli.opts.log_json)?;

    let format = cli.format.or(config.format).unwrap_or_default();
    debug!(?format, "output format selected");

    match cli.query_text()? {
        Some(sql) => {
            print!("{}", execute(&sql, format)?);
            Ok(())
        }
        None => interactive_shell(format, &log),
    }
}

/// Parse a single query and render it in `format`.
fn execute(sql: &str, format: OutputFormat) -> Result<String> {
    let query = parse(sql).context("parsing query")?;
    render(&query, format)
}

/// One line of shell input.
#[derive(Debug, PartialEq)]
enum ShellInput<'a> {
    Quit,
    Blank,
    Format(&'a str),
    Log(&'a str),
    Query(&'a str),
}

fn classify(line: &str) -> ShellInput<'_> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed == "\\q" {
        return ShellInput::Quit;
    }
    if let Some(arg) = trimmed.strip_prefix("\\format") {
        return ShellInput::Format(arg.trim());
    }
    if let Some(arg) = trimmed.strip_prefix("\\log") {
        return ShellInput::Log(arg.trim());
    }
    let sql = trimmed.trim_end_matches(';').trim_end();
    if sql.is_empty() {
        ShellInput::Blank
    } else {
        ShellInput::Query(sql)
    }
}

/// Interactive readline shell.
fn interactive_shell(mut format: OutputFormat, log: &LogHandle) -> Result<()> {
    let mut rl = DefaultEditor::new().context("init line editor")?;
    let prompt = "kubesql> ";

    loop {
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("read line"),
        };
        match classify(&line) {
            ShellInput::Quit => break,
            ShellInput::Blank => continue,
            ShellInput::Format(name) => match OutputFormat::from_str(name, true) {
                Ok(f) => format = f,
                Err(e) => eprintln!("Error: {e}"),
            },
            ShellInput::Log(directive) => {
                if let Err(e) = kubesql_log::set_level(log, directive) {
                    eprintln!("Error: {e:#}");
                }
            }
            ShellInput::Query(sql) => {
                rl.add_history_entry(sql)?;
                match execute(sql, format) {
                    Ok(out) => print!("{out}"),
                    Err(e) => eprintln!("Error: {e:#}"),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn query_words_are_joined() {
        let cli = Cli::try_parse_from(["kubesql", "SELECT", "name", "FROM", "pods", "LIMIT", "-5"]).unwrap();
        assert_eq!(cli.query_text().unwrap().as_deref(), Some("SELECT name FROM pods LIMIT -5"));
        assert_eq!(cli.format, None);
    }

    #[test]
    fn format_flag() {
        let cli = Cli::try_parse_from(["kubesql", "--format", "yaml", "FROM pods"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Yaml));
        assert!(Cli::try_parse_from(["kubesql", "--format", "xml", "FROM pods"]).is_err());
    }

    #[test]
    fn no_query_means_shell() {
        let cli = Cli::try_parse_from(["kubesql"]).unwrap();
        assert_eq!(cli.query_text().unwrap(), None);
    }

    #[test]
    fn execute_reports_clause_errors() {
        let err = execute("SELECT a FROM pods LIMIT abc", OutputFormat::Json).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "parsing query: error parsing LIMIT clause: invalid LIMIT value: abc"
        );
        let err = execute("SELECT a", OutputFormat::Json).unwrap_err();
        assert_eq!(format!("{err:#}"), "parsing query: FROM clause is mandatory");
    }

    #[test]
    fn execute_renders() {
        let out = execute("SELECT name FROM pods", OutputFormat::Yaml).unwrap();
        assert!(out.contains("From: pods"));
    }

    #[test]
    fn shell_lines() {
        assert_eq!(classify("  exit "), ShellInput::Quit);
        assert_eq!(classify("\\q"), ShellInput::Quit);
        assert_eq!(classify("   "), ShellInput::Blank);
        assert_eq!(classify(";"), ShellInput::Blank);
        assert_eq!(classify("\\format yaml"), ShellInput::Format("yaml"));
        assert_eq!(classify("\\log debug"), ShellInput::Log("debug"));
        assert_eq!(classify("SELECT a FROM pods;"), ShellInput::Query("SELECT a FROM pods"));
    }
}
