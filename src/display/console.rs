use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::thread;

use super::{sensor_error_line, DisplayPayload, DisplaySink, ModeSwitch};
use crate::processing::detectors::DetectionMode;
use crate::processing::history::History;

/// Prints one colored status line per tick.
pub struct ConsoleDisplay<W: Write> {
    out: W,
    mode: ModeSwitch,
}

impl ConsoleDisplay<io::Stdout> {
    pub fn stdout(mode: ModeSwitch) -> Self {
        Self::new(io::stdout(), mode)
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, mode: ModeSwitch) -> Self {
        Self { out, mode }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: String) {
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        if let Err(e) = writeln!(self.out, "{} {}", timestamp.to_string().dimmed(), line) {
            tracing::warn!(error = %e, "Failed to write status line");
        }
    }
}

impl<W: Write + Send> DisplaySink for ConsoleDisplay<W> {
    fn render(&mut self, payload: &DisplayPayload, _history: &History) {
        let status = payload.status_line();
        let line = if payload.triggered {
            status.red().bold().to_string()
        } else if payload.spike_active {
            status.yellow().to_string()
        } else {
            status.normal().to_string()
        };
        self.write_line(line);
    }

    fn show_error(&mut self, message: &str) {
        let line = sensor_error_line(message).truecolor(255, 165, 0).to_string();
        self.write_line(line);
    }

    fn mode(&self) -> DetectionMode {
        self.mode.mode()
    }
}

/// Lets the operator flip the detection mode by typing `m` + Enter.
pub fn spawn_keyboard_toggle(mode: ModeSwitch) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) if line.trim().eq_ignore_ascii_case("m") => {
                    let mode = mode.toggle();
                    println!("{}", format!("Detection mode: {}", mode).cyan());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "Stopped reading keyboard input");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(triggered: bool) -> DisplayPayload {
        DisplayPayload {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            magnitude: 3.7,
            spike_count: 0,
            triggered,
            spike_active: triggered,
            mode: DetectionMode::Vector,
        }
    }

    #[test]
    fn writes_status_and_error_lines() {
        colored::control::set_override(false);
        let mut display = ConsoleDisplay::new(Vec::new(), ModeSwitch::default());
        let history = History::new(4);

        display.render(&payload(false), &history);
        display.render(&payload(true), &history);
        display.show_error("no ack");

        let text = String::from_utf8(display.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("X: 1.0 Y: 2.0 Z: 3.0 | |B|: 3.7 uT | Spikes: 0"));
        assert!(lines[1].contains("Motion Detected!"));
        assert!(lines[2].ends_with("Error reading sensor: no ack"));
    }

    #[test]
    fn boxed_display_moves_to_sampling_thread() {
        let display: Box<dyn DisplaySink> =
            Box::new(ConsoleDisplay::new(Vec::new(), ModeSwitch::default()));
        let mode = thread::spawn(move || display.mode()).join().unwrap();
        assert_eq!(mode, DetectionMode::Vector);
    }

    #[test]
    fn reads_mode_from_switch() {
        let switch = ModeSwitch::new(DetectionMode::MagnitudeOnly);
        let display = ConsoleDisplay::new(Vec::new(), switch.clone());
        assert_eq!(display.mode(), DetectionMode::MagnitudeOnly);

        switch.set_magnitude_only(false);
        assert_eq!(display.mode(), DetectionMode::Vector);
    }
}
