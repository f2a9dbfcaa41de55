use anyhow::Result;
use postdrift_lib::{
    AlignedObservation, AnalysisResult, DriftError, Interpretation, SkipCounts,
    StrategySuggestion, DISCLAIMER,
};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown values fall back to the table view.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "csv" => Self::Csv,
            "markdown" | "md" => Self::Markdown,
            _ => Self::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct ObservationRow {
    #[tabled(rename = "Earnings Date")]
    #[serde(rename = "Earnings Date")]
    earnings_date: String,
    #[tabled(rename = "Pre-Earnings Date")]
    #[serde(rename = "Pre-Earnings Date")]
    pre_date: String,
    #[tabled(rename = "Post-Earnings Date")]
    #[serde(rename = "Post-Earnings Date")]
    post_date: String,
    #[tabled(rename = "Gap %")]
    #[serde(rename = "Gap %")]
    gap_pct: String,
    #[tabled(rename = "Intraday %")]
    #[serde(rename = "Intraday %")]
    intraday_pct: String,
}

/// JSON shape of a full report.
#[derive(Serialize)]
struct ReportJson<'a> {
    ticker: &'a str,
    /// `null` when the correlation is undefined.
    correlation: Option<f64>,
    same_direction_pct: f64,
    interpretation: Interpretation,
    interpretation_text: &'static str,
    strategy: StrategySuggestion,
    strategy_points: &'static [&'static str],
    disclaimer: &'static str,
    skipped: SkipCounts,
    observations: &'a [AlignedObservation],
}

// -- Row builders --

fn build_observation_rows(observations: &[AlignedObservation]) -> Vec<ObservationRow> {
    observations
        .iter()
        .map(|o| ObservationRow {
            earnings_date: o.earnings_date.to_string(),
            pre_date: o.pre_date.to_string(),
            post_date: o.post_date.to_string(),
            gap_pct: format!("{:.2}", o.gap_pct),
            intraday_pct: format!("{:.2}", o.intraday_pct),
        })
        .collect()
}

fn build_report_json(result: &AnalysisResult) -> ReportJson<'_> {
    let interpretation = result.interpretation();
    let strategy = result.strategy();
    ReportJson {
        ticker: &result.ticker,
        correlation: Some(result.correlation).filter(|c| c.is_finite()),
        same_direction_pct: result.same_direction_pct,
        interpretation,
        interpretation_text: interpretation.message(),
        strategy,
        strategy_points: strategy.points(),
        disclaimer: DISCLAIMER,
        skipped: result.skipped,
        observations: &result.observations,
    }
}

/// Correlation to two decimals; an undefined value renders as `NaN`.
fn format_correlation(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn skipped_note(skipped: &SkipCounts) -> Option<String> {
    if skipped.total() == 0 {
        return None;
    }
    Some(format!(
        "{} earnings events skipped ({} without a prior trading day, {} without a following trading day, {} with unusable prices)",
        skipped.total(),
        skipped.no_prior_bar,
        skipped.no_next_bar,
        skipped.computation
    ))
}

// -- Plain text --

fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Results for {}\n", result.ticker));
    out.push_str(&format!(
        "Correlation (Gap % vs Intraday %): {}\n",
        format_correlation(result.correlation)
    ));
    out.push_str(&format!(
        "Same Direction %: {:.2}%\n",
        result.same_direction_pct
    ));

    out.push_str("\nInterpretation\n");
    out.push_str(result.interpretation().message());
    out.push('\n');

    out.push_str("\nTrading Strategy\n");
    out.push_str(DISCLAIMER);
    out.push('\n');
    for point in result.strategy().points() {
        out.push_str(&format!("- {}\n", point));
    }

    out.push_str("\nDetailed Data\n");
    out.push_str(&Table::new(build_observation_rows(&result.observations)).to_string());
    out.push('\n');

    if let Some(note) = skipped_note(&result.skipped) {
        out.push_str(&format!("\n{}\n", note));
    }
    out
}

// -- Markdown --

fn render_markdown(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("## Results for {}\n\n", result.ticker));
    out.push_str(&format!(
        "- **Correlation (Gap % vs Intraday %)**: {}\n",
        format_correlation(result.correlation)
    ));
    out.push_str(&format!(
        "- **Same Direction %**: {:.2}%\n",
        result.same_direction_pct
    ));

    out.push_str("\n### Interpretation\n\n");
    out.push_str(result.interpretation().message());
    out.push('\n');

    out.push_str("\n### Trading Strategy\n\n");
    out.push_str(&format!("**{}**\n\n", DISCLAIMER));
    for point in result.strategy().points() {
        out.push_str(&format!("- {}\n", point));
    }

    out.push_str("\n### Detailed Data\n\n");
    let mut table = Table::new(build_observation_rows(&result.observations));
    table.with(Style::markdown());
    out.push_str(&table.to_string());
    out.push('\n');

    if let Some(note) = skipped_note(&result.skipped) {
        out.push_str(&format!("\n_{}_\n", note));
    }
    out
}

// -- CSV --

fn observations_csv<W: std::io::Write>(
    observations: &[AlignedObservation],
    writer: W,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in build_observation_rows(observations) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- Entry points --

pub fn print_report(result: &AnalysisResult, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print!("{}", render_text(result)),
        OutputFormat::Markdown => print!("{}", render_markdown(result)),
        OutputFormat::Json => print_json(&build_report_json(result)),
        OutputFormat::Csv => observations_csv(&result.observations, std::io::stdout())?,
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

pub fn print_error(err: &DriftError) {
    eprintln!("Error: {}", err);
}

/// Print either the report or the error message. Returns whether the
/// analysis succeeded.
pub fn print_outcome(
    outcome: &Result<AnalysisResult, DriftError>,
    format: &OutputFormat,
) -> Result<bool> {
    match outcome {
        Ok(result) => {
            print_report(result, format)?;
            Ok(true)
        }
        Err(e) => {
            print_error(e);
            Ok(false)
        }
    }
}
