use colored::Colorize;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use magnetic_spike_monitor::config::{load_config, save_config, Config};
use magnetic_spike_monitor::display::console::{spawn_keyboard_toggle, ConsoleDisplay};
use magnetic_spike_monitor::display::ModeSwitch;
use magnetic_spike_monitor::local::monitor::Monitor;
use magnetic_spike_monitor::outputs::create_output;
use magnetic_spike_monitor::processing::signal_processor::{SignalProcessor, SignalProcessorConfig};
use magnetic_spike_monitor::scheduler::Ticker;
use magnetic_spike_monitor::sensors::create_sensor;

const USAGE: &str = "Usage:\n  main run [config.yaml]\n  main init-config <path>";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let result = if args.len() > 1 {
        match args[1].as_str() {
            "run" => run(args.get(2).map(String::as_str)),
            "init-config" => init_config(args.get(2).map(String::as_str)),
            other => Err(format!(
                "Invalid argument '{}', please use 'run' or 'init-config'\n{}",
                other, USAGE
            )
            .into()),
        }
    } else {
        Err(format!("Please specify 'run' or 'init-config' as argument\n{}", USAGE).into())
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_config(path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let path = path.ok_or_else(|| format!("init-config needs an output path\n{}", USAGE))?;
    save_config(&Config::default(), path)?;
    println!("Wrote default configuration to {}", path);
    Ok(())
}

fn run(config_path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => {
            tracing::info!(path, "Loading configuration");
            load_config(path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    let mode = ModeSwitch::new(config.processor.mode);
    let processor = SignalProcessor::new(SignalProcessorConfig::from(&config));
    let sensor = create_sensor(&config.sensor)?;
    let output = create_output(&config.output)?;
    let ticker = Ticker::from_millis(config.scheduler.tick_period_ms);

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    #[cfg(feature = "visualization")]
    {
        if config.visualization.enabled {
            return run_with_window(&config, processor, sensor, output, ticker, mode, running);
        }
    }

    let display = ConsoleDisplay::stdout(mode.clone());
    spawn_keyboard_toggle(mode);
    println!("{}", "Type 'm' + Enter to toggle magnitude-only detection".cyan());

    let mut monitor = Monitor::new(processor, sensor, output, Box::new(display));
    monitor.run(&ticker, &running);
    Ok(())
}

#[cfg(feature = "visualization")]
fn run_with_window(
    config: &Config,
    processor: SignalProcessor,
    sensor: Box<dyn magnetic_spike_monitor::sensors::SensorSource>,
    output: Box<dyn magnetic_spike_monitor::outputs::OutputSink>,
    ticker: Ticker,
    mode: ModeSwitch,
    running: Arc<AtomicBool>,
) -> Result<(), Box<dyn Error>> {
    use magnetic_spike_monitor::visualization::plotter::create_shared_plotter;
    use magnetic_spike_monitor::visualization::window::VisualizationWindow;
    use magnetic_spike_monitor::visualization::PlotterDisplay;

    let plotter = create_shared_plotter();
    let display = PlotterDisplay::new(Arc::clone(&plotter), mode.clone());
    let mut monitor = Monitor::new(processor, sensor, output, Box::new(display));

    // Sampling runs beside the window; the window owns the main thread
    let loop_running = Arc::clone(&running);
    let sampler = std::thread::spawn(move || monitor.run(&ticker, &loop_running));

    let window_result = VisualizationWindow::run(
        plotter,
        config.visualization.clone(),
        mode,
        Arc::clone(&running),
    );
    running.store(false, Ordering::SeqCst);

    if sampler.join().is_err() {
        tracing::error!("Sampling thread panicked");
    }
    window_result.map_err(|e| format!("Visualization window error: {}", e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_config_without_path_is_an_error() {
        let err = init_config(None).unwrap_err();
        assert!(err.to_string().contains("needs an output path"));
    }

    #[test]
    fn init_config_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.yaml");
        let path = path.to_str().unwrap();

        init_config(Some(path)).unwrap();
        assert_eq!(load_config(path).unwrap(), Config::default());
    }
}
