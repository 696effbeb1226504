use std::time::Instant;

use lorepatch::data::{FileReport, FileStatus};

pub struct ProgressIndicator {
    total: usize,
    written: usize,
    unchanged: usize,
    failed: usize,
    applied: usize,
    skipped: usize,
    start_time: Instant,
}

impl ProgressIndicator {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            written: 0,
            unchanged: 0,
            failed: 0,
            applied: 0,
            skipped: 0,
            start_time: Instant::now(),
        }
    }

    pub fn complete_item(&mut self, report: &FileReport) {
        println!(
            "[{}/{}] {}",
            self.written + self.unchanged + self.failed + 1,
            self.total,
            report
        );
        match report.status {
            FileStatus::Written => self.written += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::WriteFailed(_) => self.failed += 1,
        }
        self.applied += report.applied;
        self.skipped += report.failures.len();
    }

    pub fn finish(&self) {
        let elapsed = self.start_time.elapsed();
        println!("\n{}", "=".repeat(60));
        println!("Summary:");
        println!("  Files:      {}", self.total);
        println!("  Written:    {}", self.written);
        println!("  Unchanged:  {}", self.unchanged);
        println!("  Failed:     {}", self.failed);
        println!("  Directives: {} applied, {} skipped", self.applied, self.skipped);
        println!("  Duration:   {:.2}s", elapsed.as_secs_f64());
        println!("{}", "=".repeat(60));
    }
}
