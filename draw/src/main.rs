//! Live prize draw CLI.
//!
//! Loads prizes, rigging, and an optional roster file from `draw.toml`, then
//! either runs an interactive operator console or draws every slot headlessly.
//! Nothing is persisted between runs except the exported winner list.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use draw::autodraw::{RunStop, SpinPlan, run_all};
use draw::console::Console;
use draw::core::export::EmptyExportWarning;
use draw::exit_codes;
use draw::io::config::{DEFAULT_CONFIG_PATH, DrawConfig, load_config, write_config};
use draw::io::cues::{AudioCues, TerminalCues};
use draw::io::export::export_winners;
use draw::io::import::read_roster_file;
use draw::logging;
use draw::setup::{build_session, draw_rng};
use tracing::warn;

#[derive(Parser)]
#[command(name = "draw", version, about = "Live prize draw with designated winners")]
struct Cli {
    /// Config file (created by `draw init`).
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `draw.toml` if missing.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Parse a roster spreadsheet and print the participants it yields.
    Preview {
        /// `.xlsx`, `.xls`, or `.csv` file.
        file: PathBuf,
        /// Print participants as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Interactive operator console (reads commands from stdin).
    Session,
    /// Draw every remaining slot in catalog order, then export winners.
    Run {
        /// Override the configured export path.
        #[arg(long)]
        export: Option<PathBuf>,
        /// Skip writing the winner list.
        #[arg(long)]
        no_export: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Preview { file, json } => cmd_preview(&file, json),
        Command::Session => cmd_session(&cli.config),
        Command::Run { export, no_export } => {
            let export = if no_export { None } else { Some(export) };
            cmd_run(&cli.config, export)
        }
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if config_path.exists() && !force {
        println!("init: {} exists (use --force to overwrite)", config_path.display());
        return Ok(exit_codes::OK);
    }
    write_config(config_path, &DrawConfig::default())
        .with_context(|| format!("write {}", config_path.display()))?;
    println!("init: wrote {}", config_path.display());
    Ok(exit_codes::OK)
}

fn cmd_preview(file: &Path, json: bool) -> Result<i32> {
    let participants = read_roster_file(file)?;
    if json {
        let payload = serde_json::to_string_pretty(&participants).context("serialize json")?;
        println!("{payload}");
    } else {
        println!("preview: {} participants", participants.len());
        for p in &participants {
            println!(
                "{}\t{}\t{}",
                p.id,
                p.name,
                p.department.as_deref().unwrap_or("")
            );
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_session(config_path: &Path) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let mut rng = draw_rng(&cfg);
    let mut session = build_session(&cfg, &mut rng)?;
    let mut console = Console {
        session: &mut session,
        draw_rng: rng,
        frame_rng: rand::thread_rng(),
        cues: TerminalCues::new(load_cues(&cfg), io::stderr()),
        export_path: cfg.export_path.clone(),
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    console.run(stdin.lock(), &mut stdout)?;
    Ok(exit_codes::OK)
}

/// `export`: `None` skips exporting, `Some(None)` uses the configured path.
fn cmd_run(config_path: &Path, export: Option<Option<PathBuf>>) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let mut rng = draw_rng(&cfg);
    let mut session = build_session(&cfg, &mut rng)?;
    let mut cues = TerminalCues::new(load_cues(&cfg), io::stdout());
    let plan = SpinPlan {
        duration: cfg.spin_duration(),
        refresh: cfg.tick_interval(),
    };
    let animate = !plan.duration.is_zero();

    let outcome = run_all(
        &mut session,
        &mut rng,
        &mut rand::thread_rng(),
        &mut cues,
        plan,
        |frame| {
            if animate {
                let mut stdout = io::stdout();
                if let Err(err) = write!(stdout, "\r  ~ {:<24}\r", frame.name)
                    .and_then(|()| stdout.flush())
                {
                    warn!(error = %err, "spin frame output failed");
                }
            }
        },
    )?;

    let mut code = exit_codes::OK;
    match &outcome.stop {
        RunStop::Complete => println!("run: draws={} stop=complete", outcome.draws),
        RunStop::Exhausted {
            prize_id,
            remaining,
        } => {
            println!(
                "run: draws={} stop=exhausted prize={} remaining={}",
                outcome.draws, prize_id, remaining
            );
            code = exit_codes::EXHAUSTED;
        }
    }

    if let Some(path) = export {
        let path = path.unwrap_or_else(|| cfg.export_path.clone());
        match export_winners(&session, &path) {
            Ok(rows) => println!("export: rows={} path={}", rows, path.display()),
            Err(err) if err.downcast_ref::<EmptyExportWarning>().is_some() => {
                eprintln!("warning: {}", err);
                if code == exit_codes::OK {
                    code = exit_codes::NOTHING_TO_EXPORT;
                }
            }
            Err(err) => return Err(err),
        }
    }
    Ok(code)
}

fn load_cues(cfg: &DrawConfig) -> AudioCues {
    let (cues, missing) = AudioCues::load(&cfg.audio);
    for dependency in missing {
        warn!(cue = %dependency.cue, path = %dependency.path.display(), "audio cue unavailable");
        eprintln!("warning: {}", dependency);
    }
    cues
}
