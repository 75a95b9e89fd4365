// Entry point: program main
// Parses arguments, loads options and configuration, and runs the TUI

use autosuggest::config::SuggestConfig;
use autosuggest::error::Result;
use autosuggest::option::load_options;
use autosuggest::ui::{Launch, Outcome, run};
use std::env;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "AUTOSUGGEST_LOG";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    options: Option<PathBuf>,
    config: Option<PathBuf>,
    default_key: Option<String>,
    template: Option<String>,
    lazy: bool,
    verbose: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> std::result::Result<Args, String> {
    let mut out = Args::default();
    let mut it = args.iter();
    while let Some(a) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match a.as_str() {
            "-h" | "--help" => out.help = true,
            "--lazy" => out.lazy = true,
            "-v" | "--verbose" => out.verbose = true,
            "--config" => out.config = Some(PathBuf::from(value("--config")?)),
            "--default" => out.default_key = Some(value("--default")?),
            "--template" => out.template = Some(value("--template")?),
            s if s.starts_with('-') => return Err(format!("unknown flag: {s}")),
            s => {
                if out.options.is_some() {
                    return Err(format!("unexpected argument: {s}"));
                }
                out.options = Some(PathBuf::from(s));
            }
        }
    }
    if out.options.is_none() && !out.help {
        return Err("missing <options.json>".to_string());
    }
    Ok(out)
}

fn print_help() {
    println!("autosuggest - pick a value from a list of suggestions");
    println!();
    println!("Usage:");
    println!("  autosuggest <options.json> [options]");
    println!();
    println!("Options:");
    println!("  --config <file>     Widget configuration (JSON, camelCase keys).");
    println!("  --default <key>     Key of the option preselected as default.");
    println!("  --template <fmt>    Item format using {{key}}, {{label}} and {{input}}.");
    println!("  --lazy              Query options as you type instead of up front.");
    println!("  --verbose           Log at debug level to stderr (see {LOG_ENV}).");
    println!("  --help              Show this help message.");
    println!();
    println!("Keys:");
    println!("  ↑/↓ move, Enter apply, Tab commit, Esc close (quit when closed),");
    println!("  Ctrl-U clear, Ctrl-O leave field, Ctrl-L click field, Ctrl-C quit.");
    println!();
    println!("The options file holds an array of strings or {{\"key\", \"label\", \"searchStr\"}} objects.");
    println!("On Enter the applied key is printed; free text is printed as custom:<text>.");
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_launch(args: &Args) -> Result<Launch> {
    let path = args.options.clone().unwrap_or_default();
    let options = load_options(&path)?;
    let mut config = match &args.config {
        Some(p) => SuggestConfig::from_path(p)?,
        None => SuggestConfig::default(),
    };
    if args.lazy {
        config.lazy = true;
    }
    config.validate()?;
    tracing::debug!(options = options.len(), lazy = config.lazy, "launching");
    Ok(Launch {
        options,
        config,
        default_key: args.default_key.clone(),
        template: args.template.clone(),
    })
}

#[tokio::main]
async fn main() {
    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("try --help");
            process::exit(2);
        }
    };
    if args.help {
        print_help();
        return;
    }
    init_logging(args.verbose);

    let launch = match load_launch(&args) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };
    match run(launch).await {
        Ok(Outcome::Committed(value)) => println!("{value}"),
        Ok(Outcome::Cancelled) => process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    }
}
