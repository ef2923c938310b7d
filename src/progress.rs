// src/progress.rs
/// Lightweight progress reporting for a run.
/// The CLI implements this to print a line per race; tests record calls.
pub trait Progress {
    /// Called once discovery is done, with the number of candidate races.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One race page handled; `appended` when it produced a fragment.
    fn race_done(&mut self, _name: &str, _appended: bool) {}

    /// One race page skipped because of a recoverable error.
    fn race_failed(&mut self, _name: &str, _reason: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
