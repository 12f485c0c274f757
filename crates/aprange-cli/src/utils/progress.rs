use aprange::engine::progress::{Progress, ProgressCallback};
use indicatif::{HumanCount, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::fmt::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const TICK_MS: u64 = 100;
const QUANT_TEMPLATE: &str =
    "{msg} [{bar:30.cyan/blue}] {human_pos}/{human_len} masses  {rate}  ranged {ranged}";

/// Progress bar for the `quant` command, fed by ranging workflow events.
///
/// Throughput comes from the bar's own state; the ranged total is accumulated from
/// `TaskAdvance` events and shared with the style so it renders beside the rate.
#[derive(Clone)]
pub struct QuantProgress {
    bar: ProgressBar,
    ranged: Arc<AtomicU64>,
}

impl QuantProgress {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Tracks state without drawing, for quiet runs.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let ranged = Arc::new(AtomicU64::new(0));
        let bar =
            ProgressBar::with_draw_target(Some(0), target).with_style(quant_style(ranged.clone()));
        Self { bar, ranged }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let bar = self.bar.clone();
        let ranged = self.ranged.clone();

        Box::new(move |progress: Progress| match progress {
            Progress::PhaseStart { name } => {
                ranged.store(0, Ordering::Relaxed);
                bar.reset();
                bar.set_message(name);
            }
            Progress::TaskStart { total_steps } => {
                bar.set_length(total_steps);
                bar.set_position(0);
                bar.enable_steady_tick(Duration::from_millis(TICK_MS));
            }
            Progress::TaskAdvance { steps, ranged: hits } => {
                ranged.fetch_add(hits, Ordering::Relaxed);
                bar.inc(steps);
            }
            Progress::TaskFinish => {
                bar.disable_steady_tick();
                if let Some(len) = bar.length() {
                    bar.set_position(len);
                }
            }
            Progress::Message(msg) => bar.println(format!("  {msg}")),
            Progress::PhaseFinish => {
                bar.finish_with_message(format!(
                    "✓ {} of {} ranged",
                    HumanCount(ranged.load(Ordering::Relaxed)),
                    HumanCount(bar.position())
                ));
            }
        })
    }
}

impl Default for QuantProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn quant_style(ranged: Arc<AtomicU64>) -> ProgressStyle {
    ProgressStyle::with_template(QUANT_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("rate", |state: &ProgressState, w: &mut dyn Write| {
            let _ = w.write_str(&format_rate(state.per_sec()));
        })
        .with_key("ranged", move |_: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{}", HumanCount(ranged.load(Ordering::Relaxed)));
        })
        .progress_chars("=> ")
}

fn format_rate(per_sec: f64) -> String {
    if !per_sec.is_finite() || per_sec <= 0.0 {
        return "- masses/s".to_string();
    }
    if per_sec >= 1e6 {
        format!("{:.1}M masses/s", per_sec / 1e6)
    } else if per_sec >= 1e3 {
        format!("{:.1}k masses/s", per_sec / 1e3)
    } else {
        format!("{:.0} masses/s", per_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aprange::core::models::collection::RangeCollection;
    use aprange::core::models::range::Range;
    use aprange::engine::config::RangingConfigBuilder;
    use aprange::engine::progress::ProgressReporter;
    use aprange::workflows::ranging;

    impl QuantProgress {
        fn ranged(&self) -> u64 {
            self.ranged.load(Ordering::Relaxed)
        }
    }

    #[test]
    fn callback_accumulates_position_and_ranged_hits() {
        let progress = QuantProgress::hidden();
        let callback = progress.get_callback();

        callback(Progress::PhaseStart { name: "Ranging" });
        callback(Progress::TaskStart {
            total_steps: 25_000,
        });
        callback(Progress::TaskAdvance {
            steps: 10_000,
            ranged: 7_200,
        });
        assert_eq!(progress.bar.position(), 10_000);
        assert_eq!(progress.ranged(), 7_200);

        callback(Progress::TaskAdvance {
            steps: 15_000,
            ranged: 9_000,
        });
        callback(Progress::TaskFinish);
        callback(Progress::PhaseFinish);

        assert_eq!(progress.bar.position(), 25_000);
        assert_eq!(progress.ranged(), 16_200);
        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.message(), "✓ 16,200 of 25,000 ranged");
    }

    #[test]
    fn phase_start_resets_the_ranged_total() {
        let progress = QuantProgress::hidden();
        let callback = progress.get_callback();

        callback(Progress::TaskAdvance { steps: 5, ranged: 5 });
        callback(Progress::PhaseStart { name: "Ranging" });
        assert_eq!(progress.ranged(), 0);
        assert_eq!(progress.bar.position(), 0);
        assert_eq!(progress.bar.message(), "Ranging");
    }

    #[test]
    fn ranged_total_matches_the_workflow_result() {
        let collection = RangeCollection::from_ranges(vec![
            Range::new("Fe", (27.9, 28.1)).unwrap(),
            Range::new("Cr", (25.9, 26.1)).unwrap(),
        ])
        .unwrap();
        let config = RangingConfigBuilder::new()
            .mass_window(20.0, 40.0)
            .build()
            .unwrap();
        let masses = [26.0, 28.0, 28.05, 30.0, 55.0, 12.0];

        let progress = QuantProgress::hidden();
        let reporter = ProgressReporter::with_callback(progress.get_callback());
        let result = ranging::run(&masses, &collection, &config, &reporter).unwrap();

        assert_eq!(result.ranged, 3);
        assert_eq!(progress.ranged(), 3);
        assert_eq!(progress.bar.position(), masses.len() as u64);
        assert_eq!(progress.bar.message(), "✓ 3 of 6 ranged");
    }

    #[test]
    fn format_rate_scales_to_readable_units() {
        assert_eq!(format_rate(0.0), "- masses/s");
        assert_eq!(format_rate(f64::INFINITY), "- masses/s");
        assert_eq!(format_rate(512.4), "512 masses/s");
        assert_eq!(format_rate(45_300.0), "45.3k masses/s");
        assert_eq!(format_rate(3_100_000.0), "3.1M masses/s");
    }
}
