//! Interactive prompt loop used when no ticker is passed on the command line.
//!
//! Failures are printed and the prompt repeats; only `q`, `quit` or end of
//! input leave the loop.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use postdrift_lib::{HistoryPeriod, MarketDataSource};

use crate::output::{self, OutputFormat};
use crate::progress::analyze_with_spinner;

pub const DEFAULT_TICKER: &str = "MSFT";

const PROMPT: &str = "Enter Stock Ticker (e.g., MSFT, NVDA, AAPL) [MSFT]: ";

#[derive(Debug, PartialEq)]
pub enum PromptInput {
    Ticker(String),
    Quit,
}

/// Interpret one line typed at the prompt. A blank line selects the default.
pub fn parse_prompt_line(line: &str) -> PromptInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return PromptInput::Ticker(DEFAULT_TICKER.to_string());
    }
    match trimmed.to_lowercase().as_str() {
        "q" | "quit" | "exit" => PromptInput::Quit,
        _ => PromptInput::Ticker(trimmed.to_string()),
    }
}

pub async fn run<S: MarketDataSource>(
    source: &S,
    period: HistoryPeriod,
    format: &OutputFormat,
) -> Result<()> {
    eprintln!("Post-Earnings Drift Analyzer");
    eprintln!(
        "Checks whether the overnight gap after earnings correlates with the intraday move that follows."
    );
    eprintln!("Note: For educational purposes only, not financial advice. Type 'q' to quit.");

    let stdin = io::stdin();
    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let ticker = match parse_prompt_line(&line) {
            PromptInput::Quit => break,
            PromptInput::Ticker(ticker) => ticker,
        };

        let outcome = analyze_with_spinner(source, &ticker, period).await;
        output::print_outcome(&outcome, format)?;
        println!();
    }

    Ok(())
}
