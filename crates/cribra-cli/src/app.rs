//! CribraApp application framework.
//!
//! Wires parsed CLI arguments to the engine: load records and spec files,
//! compile once, execute, and render JSON to stdout. Handlers return the
//! rendered output so they stay directly testable; [`CribraApp::run`] is
//! the thin printing shell around them.

use serde::Serialize;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use cribra_core::{Error, Result};
use cribra_engine::{compile, diagnose, explain, filter, rank, RankOptions, ScoreReducer};
use cribra_spec::{validate, Spec};

use crate::cli::{CliArgs, Command, ConfigAction, ConfigCommand};
use crate::config::CribraConfig;

// ============================================================================
// CribraApp
// ============================================================================

/// The CLI application: configuration plus command handlers.
pub struct CribraApp {
    config: CribraConfig,
    version: String,
}

impl CribraApp {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = CribraConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create with an explicit configuration.
    pub fn new(config: CribraConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &CribraConfig {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on
    /// verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // Ignore error if a subscriber is already set (e.g. in tests).
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }

    /// Run the CLI with the given arguments.
    pub fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(Command::Filter { records, spec }) => {
                println!("{}", self.handle_filter(&records, &spec)?);
                Ok(())
            }
            Some(Command::Rank {
                records,
                spec,
                top_k,
                limit,
                offset,
                reducer,
            }) => {
                println!(
                    "{}",
                    self.handle_rank(&records, &spec, top_k, limit, offset, &reducer)?
                );
                Ok(())
            }
            Some(Command::Explain {
                records,
                spec,
                index,
            }) => {
                println!("{}", self.handle_explain(&records, &spec, index)?);
                Ok(())
            }
            Some(Command::Validate { spec }) => {
                let (rendered, ok) = self.handle_validate(&spec)?;
                println!("{rendered}");
                if ok {
                    Ok(())
                } else {
                    Err(Error::invalid_data("spec failed validation"))
                }
            }
            Some(Command::Config(config_cmd)) => self.handle_config(&args.config, config_cmd),
            Some(Command::Version) => {
                println!("cribra {}", self.version);
                Ok(())
            }
            None => {
                println!("cribra {} — use --help for usage", self.version);
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------------

    /// Filter records through a spec; renders the admitted records.
    pub fn handle_filter(&self, records_path: &str, spec_path: &str) -> Result<String> {
        let records = load_records(records_path)?;
        let exec = compile(&load_spec(spec_path)?);
        self.render(&filter(records, &exec))
    }

    /// Rank records through a spec; renders items with scores and parts.
    pub fn handle_rank(
        &self,
        records_path: &str,
        spec_path: &str,
        top_k: Option<usize>,
        limit: Option<usize>,
        offset: Option<usize>,
        reducer: &str,
    ) -> Result<String> {
        let records = load_records(records_path)?;
        let exec = compile(&load_spec(spec_path)?);

        let mut options = RankOptions::default().with_reducer(parse_reducer(reducer)?);
        options.top_k = top_k.or(self.config.rank.top_k);
        options.limit = limit.or(self.config.rank.limit);
        options.offset = offset;

        self.render(&rank(records, &exec, &options))
    }

    /// Explain one record's outcome clause by clause.
    pub fn handle_explain(
        &self,
        records_path: &str,
        spec_path: &str,
        index: usize,
    ) -> Result<String> {
        let records = load_records(records_path)?;
        let exec = compile(&load_spec(spec_path)?);
        let item = records
            .get(index)
            .ok_or_else(|| Error::not_found(format!("record index {index}")))?;
        self.render(&explain(item, &exec))
    }

    /// Validate a spec file; renders the report plus strict diagnostics.
    ///
    /// The boolean is the structural verdict — the caller decides the
    /// exit status.
    pub fn handle_validate(&self, spec_path: &str) -> Result<(String, bool)> {
        let raw = load_raw(spec_path)?;
        let report = validate(&raw);

        // Strict diagnostics only make sense over a parseable tree.
        let warnings = if report.ok {
            serde_json::from_value::<Spec>(raw)
                .map(|spec| diagnose(&spec))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let rendered = self.render(&json!({
            "ok": report.ok,
            "errors": report.errors,
            "warnings": warnings,
        }))?;
        Ok((rendered, report.ok))
    }

    /// Dispatch config subcommands.
    fn handle_config(&self, config_flag: &Option<String>, command: ConfigCommand) -> Result<()> {
        match command.command {
            ConfigAction::Path => {
                match CribraConfig::resolve_config_path(config_flag.as_deref()) {
                    Some(path) => println!("{}", path.display()),
                    None => println!("(no config path resolved)"),
                }
                Ok(())
            }
            ConfigAction::Show => {
                println!("{}", self.config.to_toml_string()?);
                Ok(())
            }
        }
    }

    /// Render a value as JSON, pretty or compact per configuration.
    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.config.output.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(rendered)
    }
}

// ============================================================================
// File loading
// ============================================================================

fn load_raw(path: &str) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn load_records(path: &str) -> Result<Vec<Value>> {
    load_raw(path)?
        .as_array()
        .cloned()
        .ok_or_else(|| Error::invalid_data("records file must contain a JSON array"))
}

fn load_spec(path: &str) -> Result<Spec> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn parse_reducer(name: &str) -> Result<ScoreReducer> {
    match name {
        "sum" => Ok(ScoreReducer::Sum),
        "min" => Ok(ScoreReducer::Min),
        "max" => Ok(ScoreReducer::Max),
        other => Err(Error::invalid_data(format!("unknown reducer `{other}`"))),
    }
}

// ============================================================================
// Tests
// ============================================================================
