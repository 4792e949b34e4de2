// src/progress.rs
/// Lightweight progress reporting for a catalog run.
/// The binaries print to the console; library callers may pass `None`.
pub trait Progress {
    /// Called at the start with the total number of lookup rows (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Non-fatal degradation worth a human look.
    fn warn(&mut self, _msg: &str) {}

    /// Called when one device record is emitted.
    fn item_done(&mut self, _name: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Prints status and warnings to stdout/stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn warn(&mut self, msg: &str) {
        eprintln!("Warning: {msg}");
    }

    fn item_done(&mut self, _name: &str) {
        self.done += 1;
    }

    fn finish(&mut self) {
        if self.total > 0 {
            println!("Emitted {} records from {} lookup rows", self.done, self.total);
        }
    }
}
