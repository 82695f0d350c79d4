//! Progress reporting: a small sink trait so the pipeline runs headless,
//! plus an `indicatif`-backed terminal implementation.

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

/// Receives per-stage progress: `begin(label, total)`, any number of `inc(delta)`, then `finish(msg)`.
pub trait ProgressSink {
    fn begin(&self, label: &str, total: u64);
    fn inc(&self, delta: u64);
    fn finish(&self, msg: &str);
}

/// Discards all progress events.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn begin(&self, _label: &str, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: &str) {}
}

fn count_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         it/s: {per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}"
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Count-style progress bar (items processed out of total), with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(count_style());
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Terminal sink: one count bar per stage. A new `begin` finishes any bar still open.
#[derive(Default)]
pub struct TerminalProgress {
    current: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for TerminalProgress {
    fn begin(&self, label: &str, total: u64) {
        let mut slot = self.current.lock();
        if let Some(prev) = slot.take() {
            prev.finish();
        }
        *slot = Some(make_count_progress(total, label));
    }

    #[inline]
    fn inc(&self, delta: u64) {
        if let Some(pb) = self.current.lock().as_ref() {
            pb.inc(delta);
        }
    }

    fn finish(&self, msg: &str) {
        if let Some(pb) = self.current.lock().take() {
            pb.finish_with_message(msg.to_string());
        }
    }
}

/// Drives a sink through one stage; finishes the stage on `finish` or drop.
/// Use `ProgressScope::count(sink, label, total)` then `inc_items(..)`.
pub struct ProgressScope<'a> {
    sink: &'a dyn ProgressSink,
    done: bool,
}

impl<'a> ProgressScope<'a> {
    pub fn count<T: AsRef<str>>(sink: &'a dyn ProgressSink, label: T, total: u64) -> Self {
        sink.begin(label.as_ref(), total);
        Self { sink, done: false }
    }

    #[inline]
    pub fn inc_items(&self, delta: u64) {
        self.sink.inc(delta);
    }

    pub fn finish<T: AsRef<str>>(mut self, msg: T) {
        self.sink.finish(msg.as_ref());
        self.done = true;
    }
}

impl Drop for ProgressScope<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.sink.finish("");
        }
    }
}
