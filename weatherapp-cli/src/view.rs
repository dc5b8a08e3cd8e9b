use weatherapp_core::{DisplayReport, Notice, ReportView, WeatherReport};

/// Prints each applied report to stdout and notices to stderr.
#[derive(Debug, Default)]
pub struct TerminalView;

impl ReportView for TerminalView {
    fn apply(&self, report: &WeatherReport) {
        println!("\n{}\n", DisplayReport::new(report));
    }

    fn notify(&self, notice: Notice) {
        eprintln!("\n{} {}\n", notice.title, notice.message);
    }
}
