//! Progress reporting while the provider is working

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use workshop_application::TurnObserver;

/// Shows a spinner for each provider call
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn begin(&self, prefix: String, message: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn finish(&self, message: Option<String>) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            match message {
                Some(message) => pb.finish_with_message(message),
                None => pb.finish_and_clear(),
            }
        }
    }

    /// Remove any spinner still on screen, e.g. after an interrupt.
    pub fn clear(&self) {
        self.finish(None);
    }

    #[cfg(test)]
    fn is_active(&self) -> bool {
        self.spinner.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnObserver for ProgressReporter {
    fn on_turn_start(&self, speaker: &str, turn: u64) {
        self.begin(format!("Turn {}", turn), &format!("{} is thinking...", speaker));
    }

    fn on_turn_complete(&self, speaker: &str, _turn: u64, success: bool) {
        let status = if success {
            format!("{} {}", "v".green(), speaker)
        } else {
            format!("{} {} (failed)", "x".red(), speaker)
        };
        self.finish(Some(status));
    }

    fn on_auxiliary_call(&self, purpose: &str) {
        let message = match purpose {
            "selection" => "Choosing the next speaker...",
            "compliance" => "Checking persona compliance...",
            "summary" => "Summarizing the transcript...",
            other => other,
        };
        self.begin("Provider".to_string(), message);
    }

    fn on_auxiliary_complete(&self, _purpose: &str) {
        self.finish(None);
    }
}
