use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use netpharm::engine::progress::{Progress, ProgressCallback};
use netpharm::engine::state::{ItemTally, Stage};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Terminal view of one pipeline stage at a time.
///
/// The bar's prefix names the running stage. Items the stage recovered from are
/// counted until the stage's summary arrives, which prints the tally together with
/// the skip count and resets the counter for the next stage.
struct StageDisplay {
    bar: ProgressBar,
    stage: Option<&'static str>,
    skipped: u64,
    outcome: Option<ItemTally>,
}

impl StageDisplay {
    fn new(bar: ProgressBar) -> Self {
        Self {
            bar,
            stage: None,
            skipped: 0,
            outcome: None,
        }
    }

    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => self.begin(name),
            Progress::PhaseFinish => self.close(),
            Progress::TaskStart { total_steps } => self.plan(total_steps),
            Progress::TaskIncrement => self.bar.inc(1),
            Progress::TaskFinish => self.bar.set_position(self.bar.length().unwrap_or(0)),
            Progress::ItemSkipped { item, reason } => self.skip(&item, &reason),
            Progress::StageSummary { stage, tally } => self.summarize(stage, tally),
            Progress::Message(msg) => self.bar.println(format!("  {}", msg)),
        }
    }

    fn begin(&mut self, name: &'static str) {
        self.stage = Some(name);
        self.skipped = 0;
        self.outcome = None;
        self.bar.reset();
        self.bar.set_length(0);
        self.bar.set_style(spinner_style());
        self.bar.set_prefix(name);
        self.bar.set_message("");
        self.bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    }

    fn plan(&mut self, total_steps: u64) {
        self.bar.disable_steady_tick();
        self.bar.set_style(bar_style());
        self.bar.set_length(total_steps);
        self.bar.set_position(0);
    }

    fn skip(&mut self, item: &str, reason: &str) {
        self.skipped += 1;
        self.bar.set_message(format!("{} skipped", self.skipped));
        self.bar.println(format!("  ⚠ skipped {}: {}", item, reason));
    }

    fn summarize(&mut self, stage: Stage, tally: ItemTally) {
        self.bar.println(summary_line(stage, &tally, self.skipped));
        self.outcome = Some(tally);
        self.skipped = 0;
    }

    fn close(&mut self) {
        let label = self.stage.take().unwrap_or("Stage");
        let mark = match self.outcome.take() {
            Some(tally) if tally.failed > 0 => "⚠",
            _ => "✓",
        };
        self.bar.disable_steady_tick();
        self.bar.set_style(spinner_style());
        self.bar.finish_with_message(format!("{} done", mark));
        self.bar.set_prefix(label);
    }
}

fn summary_line(stage: Stage, tally: &ItemTally, skipped: u64) -> String {
    match skipped {
        0 => format!("  {}: {}", stage, tally),
        n => format!("  {}: {}, {} skipped", stage, tally, n),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg}")
        .expect("static spinner template")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:<22.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("static bar template")
        .progress_chars("##-")
}

/// Renders pipeline progress events on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    display: Arc<Mutex<StageDisplay>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        Self {
            display: Arc::new(Mutex::new(StageDisplay::new(bar))),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let display = self.display.clone();
        Box::new(move |event: Progress| match display.lock() {
            Ok(mut display) => display.apply(event),
            Err(_) => warn!("Progress display mutex was poisoned; dropping event."),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
