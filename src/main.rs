mod debug_report;

use clap::Parser;
use paddock::{
    CatalogSnapshot, FilterEngine, FilterSession, Mode, Options, Selection, parse_search_spec, parse_selection_spec,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ModeArg {
    Normal,
    Event,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Normal => Mode::Normal,
            ModeArg::Event => Mode::Event,
        }
    }
}

/// Resolve facet visibility for a catalog snapshot and a selection.
#[derive(Debug, Parser)]
#[command(name = "paddock", version, about)]
struct Cli {
    /// Catalog snapshot (JSON) with catalogs and relationships.
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    #[arg(long, value_enum, default_value_t = ModeArg::Normal)]
    mode: ModeArg,

    /// Checked values, e.g. `car_class=5,6` or `category=oval`. Repeatable.
    #[arg(long = "select", value_name = "FACET=VALUES")]
    selections: Vec<String>,

    /// Column search text, e.g. `track=spa`. Repeatable.
    #[arg(long = "search", value_name = "FACET=TEXT")]
    searches: Vec<String>,

    /// Print the settled selection as JSON instead of the report.
    #[arg(long)]
    json: bool,

    /// Force ANSI color output.
    #[arg(long, overrides_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long, overrides_with = "color")]
    no_color: bool,
}

impl Cli {
    fn color(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            io::stdout().is_terminal()
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let selection = match parse_selections(&cli.selections) {
        Ok(selection) => selection,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    let searches = match cli.searches.iter().map(|spec| parse_search_spec(spec)).collect::<Result<Vec<_>, _>>() {
        Ok(searches) => searches,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    let snapshot = match CatalogSnapshot::from_path(&cli.catalog) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(1);
        }
    };

    let mode = Mode::from(cli.mode);
    let engine = FilterEngine::from_relationships(&snapshot.relationships, mode);
    let session = FilterSession::with_options(engine, selection, Options { trace: true });

    if cli.json {
        match serde_json::to_string_pretty(&session.values()) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::from(1);
            }
        }
        return ExitCode::SUCCESS;
    }

    debug_report::print_run(&session, &snapshot.catalogs, &searches, cli.color());
    ExitCode::SUCCESS
}

fn parse_selections(specs: &[String]) -> Result<Selection, paddock::SelectionSpecError> {
    let mut selection = Selection::new();
    for spec in specs {
        selection.extend(parse_selection_spec(spec)?);
    }
    Ok(selection)
}
