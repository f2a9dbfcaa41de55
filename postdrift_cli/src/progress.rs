//! Spinner shown while the two fetches run.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use postdrift_lib::{run_analysis, AnalysisResult, DriftError, HistoryPeriod, MarketDataSource};

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run one analysis with a spinner on stderr. The spinner is cleared before
/// returning so the report starts on a clean line.
pub async fn analyze_with_spinner<S: MarketDataSource>(
    source: &S,
    ticker: &str,
    period: HistoryPeriod,
) -> Result<AnalysisResult, DriftError> {
    let pb = spinner("Fetching and analyzing data...");
    let result = run_analysis(source, ticker, period).await;
    pb.finish_and_clear();
    result
}
