use anyhow::{Context, Result};
use runtime_console_config::{AppConfig, paths};
use runtime_console_core::LogConsole;
use std::time::Duration;

mod demo;
mod logger;
mod render;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load();
    let mut console = LogConsole::new(config.console.clone()).context("Invalid console config")?;

    let log_file = logger::init(console.handle(), config.level_filter())?;
    log::info!("Starting runtime-console, file log at {}", log_file.display());

    let workers = demo::spawn_workers(demo::Workload::default());
    let frame_interval = Duration::from_millis(config.frame_interval_ms);

    run_frames(&mut console, &workers, frame_interval);

    for worker in workers {
        if worker.join().is_err() {
            log::error!("Worker thread panicked");
        }
    }
    // Pick up whatever the workers logged after the last frame
    let report = console.tick();
    print_rows(&render::appended_rows(&console, &report));

    console.set_collapsed(true);
    println!("\n--- collapsed ({} unique) ---", console.registry_len());
    print_rows(&render::all_rows(&console));
    println!("{}", render::format_totals(console.totals()));

    let export_path = paths::export_file_path(&config.export_dir()?, chrono::Local::now());
    std::fs::write(&export_path, console.export_all())
        .with_context(|| format!("Failed to write export {}", export_path.display()))?;
    println!("Exported {} entries to {}", console.history_len(), export_path.display());

    log::info!("Exiting runtime-console");
    log::logger().flush();
    Ok(())
}

/// Tick once per frame until every worker has finished
fn run_frames(
    console: &mut LogConsole,
    workers: &[std::thread::JoinHandle<()>],
    frame_interval: Duration,
) {
    while !workers.iter().all(|worker| worker.is_finished()) {
        let report = console.tick();
        if report.display_changed {
            print_rows(&render::appended_rows(console, &report));
        }
        if report.evicted > 0 {
            log::debug!("Frame {} evicted {} entries", console.frame(), report.evicted);
        }
        std::thread::sleep(frame_interval);
    }
}

fn print_rows(rows: &[String]) {
    for row in rows {
        println!("{row}");
    }
}
