use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scicalc::calculator::{AngleMode, CalcResult, copy_result, evaluate_expression};
use scicalc::config::Config;
use scicalc::session::{Key, Session};

/// Scientific calculator: evaluates calculator notation like `sin(90)+5!`.
#[derive(Parser, Debug)]
#[command(name = "scicalc", version, about)]
struct Cli {
    /// Expression to evaluate. Without one, reads key presses and expressions from stdin.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    expression: Vec<String>,

    /// Angle mode for trigonometric functions (deg or rad).
    #[arg(short, long)]
    angle: Option<AngleMode>,

    /// Value of `Ans` for a one-shot evaluation.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    ans: f64,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Copy successful results to the clipboard.
    #[arg(long)]
    copy: bool,

    /// Path to the config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Output options after merging config and flags.
struct Output {
    json: bool,
    copy: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref());
    let angle_mode = cli.angle.unwrap_or(config.angle_mode);
    let output = Output {
        json: cli.json || config.json,
        copy: cli.copy || config.copy_to_clipboard,
    };

    if cli.expression.is_empty() {
        info!(%angle_mode, "starting interactive session");
        return run_session(angle_mode, &output);
    }

    let expression = cli.expression.join(" ");
    let result = evaluate_expression(&expression, cli.ans, angle_mode);
    report(&result, &output)?;

    if !result.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Feed stdin lines into a session, one key or expression per line.
fn run_session(angle_mode: AngleMode, output: &Output) -> Result<()> {
    let mut session = Session::new(angle_mode);
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let key: Key = match line.parse() {
            Ok(key) => key,
            Err(_) => continue,
        };

        // Plain text is a whole expression: insert it and evaluate.
        let outcome = if key.is_command() {
            session.press(key)
        } else {
            session.press(key);
            session.press(Key::Equals)
        };

        match outcome {
            Some(result) => report(&result, output)?,
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", session.state().display)?;
            }
        }
    }

    Ok(())
}

fn report(result: &CalcResult, output: &Output) -> Result<()> {
    let mut stdout = io::stdout().lock();

    if output.json {
        let json = serde_json::to_string(result).context("Failed to serialize result")?;
        writeln!(stdout, "{json}")?;
    } else {
        match result.error() {
            None => writeln!(stdout, "{}", result.display())?,
            Some(error) => {
                writeln!(stdout, "{}", result.display())?;
                eprintln!("{}: {}", result.expression(), error);
            }
        }
    }

    if output.copy
        && result.is_success()
        && let Err(e) = copy_result(result)
    {
        warn!("{}", e);
    }

    Ok(())
}
