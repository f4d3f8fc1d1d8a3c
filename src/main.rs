//! Dictator main entry point
//!
//! Reads text from a file or stdin, speaks it, and prints the word being
//! spoken each time the highlight moves.

use dictator::speech::Backend;
use dictator::state::config::Config;
use dictator::state::State;
use dictator::text::SegmentTable;
use dictator::{DictatorError, Result};
use log::{debug, error, info};
use std::io::{self, Read};
use std::ops::Range;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

/// How often engine events are drained
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Upper bound on speaking time per word at normal rate
const MAX_WORD_TIME: Duration = Duration::from_secs(2);

const USAGE: &str = "\
Usage: dictator [OPTIONS] [FILE]

Reads FILE (or stdin) aloud and prints each word as it is spoken.

Options:
  -d, --debug             Write debug log to dictator.log
  -c, --config PATH       Configuration file (default ~/.dictator.cfg)
  -n, --dry-run           Use the silent backend
  -s, --segments          Print the segment table as JSON and exit
      --select START:END  Read only characters START..END
      --voices            List available voices and exit
  -h, --help              Show this help";

/// Command line options
#[derive(Debug, Default)]
struct Options {
    debug: bool,
    config: Option<PathBuf>,
    dry_run: bool,
    segments: bool,
    select: Option<Range<usize>>,
    voices: bool,
    file: Option<PathBuf>,
}

fn parse_range(value: &str) -> Result<Range<usize>> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| DictatorError::Selection(format!("expected START:END, got '{}'", value)))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|e| DictatorError::Selection(format!("'{}': {}", s, e)))
    };
    Ok(parse(start)?..parse(end)?)
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-d" | "--debug" => options.debug = true,
            "-n" | "--dry-run" => options.dry_run = true,
            "-s" | "--segments" => options.segments = true,
            "--voices" => options.voices = true,
            "-c" | "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                options.config = Some(PathBuf::from(path));
            }
            "--select" => {
                let range = args.next().ok_or("--select needs START:END")?;
                options.select = Some(parse_range(&range)?);
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unknown option '{}'\n\n{}", other, USAGE).into());
            }
            other => options.file = Some(PathBuf::from(other)),
        }
    }

    Ok(options)
}

fn main() {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    // Initialize logger
    if options.debug {
        // Debug mode: write to dictator.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("dictator.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open dictator.log for debug logging: {}", e);
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "Dictator version {} starting (debug mode, logging to dictator.log)",
            dictator::VERSION
        );
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Error)
            .parse_default_env()
            .init();
    }

    if let Err(e) = run(options) {
        error!("Fatal error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            debug!("Reading {:?}", path);
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            debug!("Reading stdin");
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run(options: Options) -> Result<()> {
    let mut config = match &options.config {
        Some(path) => Config::load_from(path.clone())?,
        None => Config::load()?,
    };
    info!("Configuration loaded from {:?}", config.path());

    if options.dry_run {
        config.set("speech", "backend", &Backend::Silent.to_string());
    }

    let mut state = State::new(config)?;

    if options.voices {
        for voice in state.voices()? {
            println!("{}\t{}\t{}", voice.id, voice.name, voice.language);
        }
        return Ok(());
    }

    let text = read_input(options.file.as_ref())?;
    state.set_text(text)?;
    if let Some(range) = options.select {
        state.select(range)?;
    }

    if options.segments {
        println!("{}", serde_json::to_string_pretty(state.segments())?);
        return Ok(());
    }

    read_aloud(&mut state)
}

/// Longest time the engine may take to speak every word of `table`
fn speaking_time_limit(table: &SegmentTable, rate: f32) -> Duration {
    let words = table.iter().filter(|s| s.is_speakable()).count() as u32;
    MAX_WORD_TIME.mul_f32(1.0 / rate) * words.max(1)
}

/// Speak the active text and print the highlighted word on every change
fn read_aloud(state: &mut State) -> Result<()> {
    let limit = speaking_time_limit(state.segments(), state.config.rate());
    let deadline = Instant::now() + limit;

    state.speak()?;
    if !state.is_pending() {
        info!("Nothing to read");
        return Ok(());
    }

    loop {
        for change in state.pump_events() {
            if let Some(segment) = change.current.and_then(|idx| state.segments().get(idx)) {
                println!("{}", segment.text);
            }
        }

        if !state.is_pending() {
            info!("Finished reading");
            return Ok(());
        }

        if Instant::now() >= deadline {
            info!("Engine never reported the end of speech, stopping");
            state.stop()?;
            return Ok(());
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}
