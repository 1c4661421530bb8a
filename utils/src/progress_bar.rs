use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

const BAR_LENGTH: usize = 40;

pub struct ProgressBar {
    last_progress: AtomicUsize,
    counter: AtomicUsize,
    total_count: usize,
    start: Instant,
}

impl ProgressBar {
    pub fn new(total_count: usize) -> Self {
        let ret = Self {
            total_count,
            last_progress: AtomicUsize::new(0),
            counter: AtomicUsize::new(0),
            start: Instant::now(),
        };
        ret.show_progress(0);
        ret
    }

    pub fn tic(&self) {
        let c = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let progress = (100. * (c as f32) / self.total_count as f32).round() as usize;
        let lp = self.last_progress.load(Ordering::Relaxed);
        if progress > lp && progress - lp >= 100 / BAR_LENGTH {
            self.last_progress.store(progress, Ordering::Relaxed);
            self.show_progress(progress);
        }
    }

    fn show_progress(&self, progress: usize) {
        let filled_length = (BAR_LENGTH * progress) / 100;
        let filled = "=".repeat(filled_length);
        let empty = " ".repeat(BAR_LENGTH - filled_length);
        eprint!("\r[{}{}] {}%", filled, empty, progress);
        let _ = std::io::stderr().flush();
    }

    pub fn done(&self) {
        eprintln!(
            "\nProcess done after {} seconds",
            self.start.elapsed().as_secs()
        );
    }
}
