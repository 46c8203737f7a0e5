/// Entry point: config, logging, terminal setup, one game session.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;

use config::GameConfig;
use sim::session::Session;
use ui::input::TerminalInput;
use ui::renderer::Renderer;

fn main() {
    let config = GameConfig::load();
    init_logging(&config);

    let mut session = match Session::new(&config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Game setup failed: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        // Raw mode may already be on
        let _ = renderer.cleanup();
        std::process::exit(1);
    }

    let result = session.run(TerminalInput::new(), &mut renderer);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(report) => {
            log::info!("exit: {:?} at level {} with {} points", report.outcome, report.level, report.score);
            println!();
            println!("Thanks for playing Coin Collector!");
        }
        Err(e) => {
            log::error!("game error: {e}");
            eprintln!("Game error: {e}");
            std::process::exit(1);
        }
    }
}

/// The terminal belongs to the renderer, so logs only go to a file.
/// Without `log_file` logging stays off unless `RUST_LOG` points elsewhere.
fn init_logging(config: &GameConfig) {
    let general = &config.general;
    let env = env_logger::Env::default().default_filter_or(general.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    match &general.log_file {
        Some(path) => match File::create(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Warning: cannot open log file {}: {e}", path.display());
                return;
            }
        },
        None if std::env::var_os("RUST_LOG").is_none() => return,
        None => {}
    }

    if let Err(e) = builder.try_init() {
        eprintln!("Warning: logger init failed: {e}");
    }
}
