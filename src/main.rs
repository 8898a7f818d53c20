mod app;
mod msg;

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use app::App;
use fugo_toolbox::model::config::AppConfig;
use msg::Msg;

fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging to file (never stdout)
    let log_dir = directories::ProjectDirs::from("", "", "fugo")
        .map(|d| d.data_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("fugo"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, &config.logging.file_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    tracing::info!("{} starting", config.general.app_name);

    let result = run(config);
    if let Err(e) = &result {
        tracing::error!("fugo error: {e:?}");
    }

    tracing::info!("fugo stopped");
    result
}

fn run(config: AppConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel::<Msg>();
    let mut app = App::new(config)?;

    // Input thread: reads stdin lines and forwards them as Msg
    let tx_input = tx.clone();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let msg = match line {
                Ok(line) => Msg::Command(line),
                Err(err) => {
                    tracing::warn!("failed to read input: {err}");
                    break;
                }
            };
            if tx_input.send(msg).is_err() {
                return;
            }
        }
        let _ = tx_input.send(Msg::InputClosed);
    });

    let mut stdout = io::stdout();
    writeln!(stdout, "{} (type `help` for commands)", app.config.general.app_name)?;
    render(&mut app, &mut stdout)?;

    // ── Main event loop ──
    loop {
        // Batch-drain all pending messages
        let first = rx.recv()?;
        app.update(first)?;

        while let Ok(msg) = rx.try_recv() {
            app.update(msg)?;
        }

        if app.should_quit {
            // Run deactivation hooks before exit
            app.update(Msg::CloseAllTools)?;
            render(&mut app, &mut stdout)?;
            break;
        }

        render(&mut app, &mut stdout)?;
    }

    Ok(())
}

fn render(app: &mut App, out: &mut impl Write) -> Result<()> {
    for line in app.take_output() {
        writeln!(out, "{line}")?;
    }
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}
