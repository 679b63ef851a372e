//! Final report output
//!
//! The engine's contract ends at exposing the completed visited set; this
//! module turns it into the printed result listing.

use std::time::Duration;

/// Outcome of a completed crawl run
#[derive(Debug)]
pub struct CrawlReport {
    /// Every admitted URL, sorted
    pub visited: Vec<String>,
    /// Pages fetched with a 2xx response
    pub fetched: u64,
    /// URLs denied by robots.txt
    pub denied: u64,
    /// URLs whose fetch failed
    pub failed: u64,
    /// Wall time for the whole run
    pub elapsed: Duration,
}

/// Prints the sorted URL listing and summary counts
pub fn print_report(report: &CrawlReport) {
    println!("Results:");
    for url in &report.visited {
        println!("{}", url);
    }
    println!("Found: {} URLs", report.visited.len());
    if report.denied > 0 || report.failed > 0 {
        println!(
            "({} fetched, {} denied by robots.txt, {} failed)",
            report.fetched, report.denied, report.failed
        );
    }
    println!("Done in {:.2}s", report.elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_holds_sorted_listing() {
        let report = CrawlReport {
            visited: vec![
                "https://example.com/".to_string(),
                "https://example.com/a".to_string(),
            ],
            fetched: 2,
            denied: 0,
            failed: 0,
            elapsed: Duration::from_millis(120),
        };
        assert_eq!(report.visited.len(), 2);
        print_report(&report);
    }
}
