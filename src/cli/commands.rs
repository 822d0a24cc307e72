use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::RouterConfig;
use crate::error::ConfigError;
use crate::hot_reload::watch_routes;
use crate::registry::{ActionRegistry, AnyAction, StaticRegistry};
use crate::router::{RouteTable, Router};

/// Lines of context printed on each side of a failing declaration.
const CONTEXT_RADIUS: usize = 2;

/// Command-line interface for route files
#[derive(Parser, Debug)]
#[command(name = "routetable")]
#[command(about = "Check, match and reverse-route a route file", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Where routes come from and how actions are validated.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RouteSource {
    /// Route file
    #[arg(short, long, env = "ROUTETABLE_ROUTES", default_value = "conf/routes")]
    pub routes: PathBuf,

    /// Prefix prepended to every declared path
    #[arg(long, env = "ROUTETABLE_APP_ROOT", default_value = "")]
    pub app_root: String,

    /// Known actions, one Controller.Method per line
    #[arg(long)]
    pub actions: Option<PathBuf>,
}

impl RouteSource {
    fn config(&self) -> RouterConfig {
        RouterConfig::from_env()
            .with_routes_path(&self.routes)
            .with_app_root(&self.app_root)
    }

    fn registry(&self) -> Result<Arc<dyn ActionRegistry>> {
        match &self.actions {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read actions file {}", path.display()))?;
                Ok(Arc::new(StaticRegistry::parse(&content)))
            }
            None => Ok(Arc::new(AnyAction)),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse the route file and build its table
    Check {
        #[command(flatten)]
        source: RouteSource,

        /// Print the declared routes
        #[arg(long, default_value_t = false)]
        dump: bool,
    },
    /// Show the action a request resolves to
    Match {
        #[command(flatten)]
        source: RouteSource,

        /// Request method, e.g. GET
        method: String,

        /// Request path, e.g. /app/123
        path: String,

        /// Value of the X-HTTP-Method-Override header
        #[arg(long = "override")]
        override_verb: Option<String>,

        /// Print the match as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Generate the URL for an action
    Reverse {
        #[command(flatten)]
        source: RouteSource,

        /// Controller.Method
        action: String,

        /// Route argument as name=value (repeatable)
        #[arg(short, long = "arg", value_parser = parse_arg)]
        args: Vec<(String, String)>,

        /// Print the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Keep the route file loaded and rebuild on every change
    Watch {
        #[command(flatten)]
        source: RouteSource,
    },
}

fn parse_arg(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got {s:?}"))
}

/// Print a configuration error with the declarations around it.
fn report(err: ConfigError) -> anyhow::Error {
    for (n, line) in err.context_lines(CONTEXT_RADIUS) {
        let marker = if Some(n) == err.line { ">" } else { " " };
        eprintln!("{marker} {n:>4} | {line}");
    }
    anyhow::Error::new(err)
}

fn load_table(source: &RouteSource) -> Result<RouteTable> {
    let registry = source.registry()?;
    RouteTable::load(&source.config(), registry.as_ref()).map_err(report)
}

/// Run a parsed command line.
pub fn run_cli(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &mut out)
}

pub(crate) fn execute(command: &Commands, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Check { source, dump } => {
            let table = load_table(source)?;
            writeln!(
                out,
                "{}: {} routes OK",
                source.routes.display(),
                table.len()
            )?;
            if *dump {
                table.dump_routes(out)?;
            }
            Ok(())
        }
        Commands::Match {
            source,
            method,
            path,
            override_verb,
            json,
        } => {
            let config = source.config();
            let registry = source.registry()?;
            let table = RouteTable::load(&config, registry.as_ref()).map_err(report)?;
            let router = Router::with_table(table, config, registry);
            let found = router.route(method, path, override_verb.as_deref());
            match found {
                Some(m) if *json => writeln!(out, "{}", serde_json::to_string_pretty(&m)?)?,
                Some(m) if m.is_not_found() => writeln!(out, "404 (declared)")?,
                Some(m) => {
                    writeln!(out, "{}", m.action)?;
                    let mut params: Vec<_> = m.params.iter().collect();
                    params.sort();
                    for (name, values) in params {
                        writeln!(out, "  {name} = {}", values.join(", "))?;
                    }
                    if !m.fixed_params.is_empty() {
                        writeln!(out, "  fixed = {}", m.fixed_params.join(", "))?;
                    }
                }
                None if *json => writeln!(out, "null")?,
                None => writeln!(out, "no route")?,
            }
            Ok(())
        }
        Commands::Reverse {
            source,
            action,
            args,
            json,
        } => {
            let table = load_table(source)?;
            let args: HashMap<String, String> = args.iter().cloned().collect();
            let def = table
                .reverse(action, &args)
                .with_context(|| format!("No route generates {action}"))?;
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&def)?)?;
            } else {
                writeln!(out, "{} {def}", def.method)?;
            }
            Ok(())
        }
        Commands::Watch { source } => {
            let router = Arc::new(
                Router::load(source.config(), source.registry()?).map_err(report)?,
            );
            let _watcher = watch_routes(Arc::clone(&router), |result| {
                if let Err(err) = result {
                    drop(report(err));
                }
            })?;
            info!(
                routes_count = router.table().len(),
                "Watching for route changes, Ctrl-C to stop"
            );
            loop {
                std::thread::park();
            }
        }
    }
}
