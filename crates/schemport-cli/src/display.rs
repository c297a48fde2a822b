use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use schemport_convert::ProgressDisplay;

const BAR_TEMPLATE: &str =
    "{msg}: {percent:>3}%|{wide_bar:.cyan/blue}| {human_pos}/{human_len} [{elapsed_precise}<{eta_precise}]";

/// Terminal progress bar counting converted blocks.
pub struct BarDisplay {
    bar: ProgressBar,
}

impl BarDisplay {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message("Blocks processed");
        Self { bar }
    }

    /// A bar that never draws, for `--no-progress`.
    pub fn hidden() -> Self {
        let display = Self::new();
        display.bar.set_draw_target(ProgressDrawTarget::hidden());
        display
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl Default for BarDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressDisplay for BarDisplay {
    fn set_total(&mut self, total: u64) {
        self.bar.set_length(total);
    }

    fn advance(&mut self, delta: u64) {
        self.bar.inc(delta);
    }

    fn finish(&mut self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses() {
        assert!(ProgressStyle::with_template(BAR_TEMPLATE).is_ok());
    }

    #[test]
    fn test_hidden_display_counts() {
        let mut display = BarDisplay::hidden();
        display.set_total(10);
        display.advance(3);
        display.advance(4);
        display.finish();
        assert_eq!(display.position(), 7);
    }
}
