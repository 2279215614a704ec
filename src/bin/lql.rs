//! Command-line interface for lql
//! Edit LQL programs in an interactive console and run them through the remote
//! compilation pipeline.
//!
//! Usage:
//!   lql edit [`<path>`]                      - Open the interactive console
//!   lql run `<path>` [--format `<format>`]   - Run once and print every phase
//!   lql tokens `<path>`                      - Show the client-side classification
//!   lql samples [`<name>`]                   - List or print the bundled programs
//!
//! Global options: `--config <file>` layers a configuration file over the
//! defaults (and `./lql.toml`), `--endpoint <url>` overrides `service.endpoint`.
mod console;

use clap::{Arg, ArgAction, ArgMatches, Command};
use console::app::App;
use lql::lql::client::{HttpCompilerService, TransportError};
use lql::lql::config::{ConfigError, Loader, LqlConfig, PROJECT_FILE};
use lql::lql::controller::{ConsoleState, RunController, RunOutcome};
use lql::lql::grammar::{classify, TokenCategory};
use lql::lql::logging::{self, LoggingError};
use lql::lql::samples::Samples;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("no sample named '{0}' (try `lql samples`)")]
    UnknownSample(String),
}

fn main() {
    let matches = Command::new("lql")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive console for the List Query Language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("endpoint")
                .long("endpoint")
                .global(true)
                .value_name("URL")
                .help("Base address of the compilation service"),
        )
        .subcommand(
            Command::new("edit")
                .about("Open the interactive console")
                .arg(
                    Arg::new("path")
                        .help("LQL file to edit (starts from the default program if omitted)")
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Run a program once and print the output of every phase")
                .arg(
                    Arg::new("path")
                        .help("LQL file to run, '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_parser(["json", "yaml"])
                        .help("Serialization for structured artifacts"),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Classify a program with the editor's tag grammar")
                .arg(
                    Arg::new("path")
                        .help("LQL file to classify, '-' for stdin")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("whitespace")
                        .long("whitespace")
                        .action(ArgAction::SetTrue)
                        .help("Include whitespace spans"),
                ),
        )
        .subcommand(
            Command::new("samples")
                .about("List the bundled sample programs, or print one")
                .arg(Arg::new("name").help("Sample to print").index(1)),
        )
        .get_matches();

    let code = match dispatch(&matches) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    std::process::exit(code);
}

fn dispatch(matches: &ArgMatches) -> Result<i32, CliError> {
    match matches.subcommand() {
        Some(("edit", edit_matches)) => {
            let config = load_config(edit_matches)?;
            logging::init(&config.logging, true)?;
            handle_edit_command(edit_matches.get_one::<String>("path"), &config)?;
            Ok(0)
        }
        Some(("run", run_matches)) => {
            let config = load_config(run_matches)?;
            logging::init(&config.logging, false)?;
            let path = required(run_matches, "path");
            handle_run_command(path, &config)
        }
        Some(("tokens", tokens_matches)) => {
            let path = required(tokens_matches, "path");
            handle_tokens_command(path, tokens_matches.get_flag("whitespace"))?;
            Ok(0)
        }
        Some(("samples", samples_matches)) => {
            handle_samples_command(samples_matches.get_one::<String>("name"))?;
            Ok(0)
        }
        _ => unreachable!(),
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Defaults, then `./lql.toml`, then `--config`, then flags
fn load_config(matches: &ArgMatches) -> Result<LqlConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(PROJECT_FILE);
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        loader = loader.set_override("service.endpoint", endpoint.as_str())?;
    }
    if let Ok(Some(format)) = matches.try_get_one::<String>("format") {
        loader = loader.set_override("display.artifact_format", format.as_str())?;
    }
    Ok(loader.build()?)
}

fn read_source(path: &str) -> Result<String, CliError> {
    let read = if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map(|_| source)
    } else {
        std::fs::read_to_string(path)
    };
    read.map_err(|source| CliError::Read {
        path: PathBuf::from(path),
        source,
    })
}

fn controller(config: &LqlConfig) -> Result<RunController<HttpCompilerService>, CliError> {
    let service = HttpCompilerService::new(&config.service.endpoint, config.service.timeout())?;
    Ok(RunController::with_format(
        service,
        config.display.artifact_format,
    ))
}

/// Handle the edit command
fn handle_edit_command(path: Option<&String>, config: &LqlConfig) -> Result<(), CliError> {
    let tab_width = config.editor.tab_width;
    let app = match path {
        Some(path) if Path::new(path).exists() => {
            let source = read_source(path)?;
            App::with_file(PathBuf::from(path), &source, tab_width)
        }
        Some(path) => App::with_file(PathBuf::from(path), "", tab_width),
        None => App::with_default_program(tab_width),
    };

    let runtime = Runtime::new()?;
    let controller = Arc::new(controller(config)?);
    console::console_main::run_console(app, controller, &runtime)?;
    Ok(())
}

/// Handle the run command
fn handle_run_command(path: &str, config: &LqlConfig) -> Result<i32, CliError> {
    let source = read_source(path)?;
    let controller = controller(config)?;
    let runtime = Runtime::new()?;

    let outcome = runtime.block_on(controller.run(&source));
    print!("{}", report(&controller.snapshot()));

    match outcome {
        RunOutcome::Failed(_) => Ok(1),
        RunOutcome::Settled | RunOutcome::Superseded => Ok(0),
    }
}

/// Plain-text rendering of every phase panel, followed by the banner if any
fn report(state: &ConsoleState) -> String {
    let mut out = String::new();
    for (phase, text) in state.phases.iter() {
        out.push_str(&format!("== {} ({}) ==\n", phase.title(), phase.description()));
        if text.is_empty() {
            out.push_str("(no output)\n");
        } else {
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push('\n');
    }
    if let Some(banner) = state.error_banner() {
        out.push_str(&banner);
        out.push('\n');
    }
    out
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, whitespace: bool) -> Result<(), CliError> {
    let source = read_source(path)?;
    for tagged in classify(&source) {
        if whitespace || tagged.category != TokenCategory::Whitespace {
            println!("{}", tagged);
        }
    }
    Ok(())
}

/// Handle the samples command
fn handle_samples_command(name: Option<&String>) -> Result<(), CliError> {
    match name {
        Some(name) => {
            let sample =
                Samples::get(name).ok_or_else(|| CliError::UnknownSample(name.clone()))?;
            print!("{}", sample.source);
        }
        None => {
            println!("Bundled sample programs:\n");
            for sample in Samples::all() {
                let summary = sample
                    .source
                    .lines()
                    .next()
                    .and_then(|line| line.strip_prefix('@'))
                    .map(str::trim)
                    .unwrap_or_default();
                println!("  {:<14}{}", sample.name, summary);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lql::lql::normalize::Normalized;
    use lql::lql::phase::Phase;

    #[test]
    fn test_report_of_transport_failure() {
        let normalized = Normalized::transport_failure("connection refused");
        let state = ConsoleState {
            phases: normalized.model,
            failing_phase: normalized.failing_phase,
            ..ConsoleState::default()
        };

        let report = report(&state);
        assert!(report.starts_with("== Lexer Output (Tokenization results) ==\n(no output)\n"));
        assert!(report.contains("== Final Code Output (Compiled result) ==\nError: connection refused\n"));
        assert!(report.ends_with("ERROR in execution PHASE\n"));
    }

    #[test]
    fn test_report_of_success_has_no_banner() {
        let mut state = ConsoleState::default();
        state.phases.set(Phase::Execution, "[1, 2]\n");
        let report = report(&state);
        assert!(report.contains("[1, 2]\n\n"));
        assert!(!report.contains("ERROR"));
    }

    #[test]
    fn test_config_flags_override_defaults() {
        let matches = Command::new("lql")
            .arg(Arg::new("config").long("config"))
            .arg(Arg::new("endpoint").long("endpoint"))
            .arg(Arg::new("format").long("format"))
            .get_matches_from(["lql", "--endpoint", "http://svc:1", "--format", "yaml"]);
        let config = load_config(&matches).unwrap();
        assert_eq!(config.service.endpoint, "http://svc:1");
        assert_eq!(config.display.artifact_format.to_string(), "yaml");
    }
}
