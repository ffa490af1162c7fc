use burn::train::renderer::{MetricState, MetricsRenderer, TrainingProgress};
use derive_new::new;

/// Writes training progress to the log when the terminal dashboard is disabled
#[derive(new)]
pub struct Simple {}

fn log_metric(split: &str, state: MetricState) {
    match state {
        MetricState::Generic(entry) | MetricState::Numeric(entry, _) => {
            log::trace!("{split} {}: {}", entry.name, entry.formatted)
        }
    }
}

fn log_progress(split: &str, item: TrainingProgress) {
    log::debug!(
        "{split} epoch {}/{} iteration {} ({}/{} items)",
        item.epoch,
        item.epoch_total,
        item.iteration,
        item.progress.items_processed,
        item.progress.items_total
    );
}

impl MetricsRenderer for Simple {
    fn update_train(&mut self, state: MetricState) {
        log_metric("train", state);
    }

    fn update_valid(&mut self, state: MetricState) {
        log_metric("valid", state);
    }

    fn render_train(&mut self, item: TrainingProgress) {
        log_progress("train", item);
    }

    fn render_valid(&mut self, item: TrainingProgress) {
        log_progress("valid", item);
    }
}
