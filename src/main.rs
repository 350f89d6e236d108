use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use moviedb_knot::api::FixtureApi;
use moviedb_knot::config::Config;
use moviedb_knot::logging::init_tracing;
use moviedb_knot::logic::{AppEvent, AppStore, DispatchableEvent, ScreenState, State, Store};

/// Drive the movie store from the terminal.
#[derive(Debug, Parser)]
#[command(name = "moviedb-knot", version)]
struct Args {
    /// Config file (default: platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON fixture served as the movie API. Overrides `api.fixture`.
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Artificial API latency in milliseconds. Overrides `api.latency_ms`.
    #[arg(long)]
    latency_ms: Option<u64>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Dispatch(DispatchableEvent),
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("warn");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    let Some(fixture) = args.fixture.or(config.api.fixture.clone()) else {
        bail!("no movie fixture configured; pass --fixture or set api.fixture");
    };
    let latency = Duration::from_millis(args.latency_ms.unwrap_or(config.api.latency_ms));
    let api = FixtureApi::from_path(&fixture)?.with_latency(latency);

    let store = Arc::new(AppStore::new(Arc::new(api), &config.knot));
    let mut states = store.state();
    let mut events = store.events();
    store.connect()?;

    let printer = tokio::spawn(async move {
        while let Ok(state) = states.recv().await {
            println!("{}", summarize(&state));
        }
    });

    let finisher = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if event == AppEvent::FinishApp {
                    store.shutdown();
                    break;
                }
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = store.closed() => break,
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Dispatch(event)) => {
                if let Err(err) = store.dispatch(event) {
                    eprintln!("{err}");
                }
            }
            Err(message) => eprintln!("{message}"),
        }
    }

    store.shutdown();
    finisher.abort();
    let _ = printer.await;
    store.closed().await?;
    Ok(())
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };
    let argument = words.next();
    let command = match (verb, argument) {
        ("more", None) => Command::Dispatch(DispatchableEvent::LoadMore),
        ("retry", None) => Command::Dispatch(DispatchableEvent::Retry),
        ("back", None) => Command::Dispatch(DispatchableEvent::Back),
        ("quit", None) => Command::Quit,
        ("year", None) => Command::Dispatch(DispatchableEvent::SetYearFilter(None)),
        ("year", Some(year)) => {
            let year = year
                .parse()
                .map_err(|_| format!("invalid year '{year}'"))?;
            Command::Dispatch(DispatchableEvent::SetYearFilter(Some(year)))
        }
        ("open", Some(id)) => {
            let id = id.parse().map_err(|_| format!("invalid movie id '{id}'"))?;
            Command::Dispatch(DispatchableEvent::OpenMovie(id))
        }
        _ => return Err(format!("unknown command '{}'", line.trim())),
    };
    Ok(command)
}

fn summarize(state: &State) -> String {
    let depth = state.screens.len();
    let screen = match state.active_screen() {
        Some(ScreenState::Discover(screen)) => format!(
            "discover page={} movies={} year={} loading={} error={}",
            screen.page,
            screen.movies.len(),
            screen
                .year_filter
                .map_or_else(|| "any".to_string(), |year| year.to_string()),
            screen.is_loading,
            screen.show_error
        ),
        Some(ScreenState::MovieDetails(screen)) => format!(
            "details id={} title={} loading={} error={}",
            screen.movie_id,
            screen
                .details
                .as_ref()
                .map_or("-", |details| details.title.as_str()),
            screen.is_loading,
            screen.show_error
        ),
        None => "no screen".to_string(),
    };
    format!("[{depth}] {screen}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year_with_and_without_value() {
        assert_eq!(
            parse_command("year 2020"),
            Ok(Command::Dispatch(DispatchableEvent::SetYearFilter(Some(2020))))
        );
        assert_eq!(
            parse_command("year"),
            Ok(Command::Dispatch(DispatchableEvent::SetYearFilter(None)))
        );
    }

    #[test]
    fn parse_open_requires_numeric_id() {
        assert_eq!(
            parse_command("open 603"),
            Ok(Command::Dispatch(DispatchableEvent::OpenMovie(603)))
        );
        assert!(parse_command("open matrix").is_err());
        assert!(parse_command("open").is_err());
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert!(parse_command("").is_err());
        assert!(parse_command("dance").is_err());
        assert_eq!(parse_command("  quit "), Ok(Command::Quit));
    }

    #[test]
    fn summarize_initial_state() {
        assert_eq!(
            summarize(&State::initial()),
            "[1] discover page=0 movies=0 year=any loading=true error=false"
        );
    }
}
