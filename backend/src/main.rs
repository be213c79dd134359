//! Lighthouse CLI - per-date outlet performance summaries
//!
//! # Main Commands
//!
//! ```bash
//! lighthouse serve                                  # Start HTTP server (port 5000)
//! lighthouse summary --file sheet.csv               # Print records grouped by date
//! lighthouse ask 2024-01-01 "Who has the best LCP?" # Ask about one date
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! lighthouse blocks --file sheet.csv   # Show the outlet blocks found in the header
//! lighthouse outlets                   # Show the outlet catalog
//! ```

use clap::{Args, Parser, Subcommand};
use lighthouse::{
    ai::{format_records_block, system_prompt, user_prompt},
    sanitized, summarize_source, AiClient, AnswerGenerator, Settings, SummaryReport,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lighthouse")]
#[command(about = "Group Lighthouse spreadsheet results by date and outlet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to read the table and the catalog from. Flags win over the environment.
#[derive(Args, Clone, Debug)]
struct SourceArgs {
    /// Published CSV URL (default: $SOURCE_URL)
    #[arg(long)]
    url: Option<String>,

    /// Local CSV file (default: $SOURCE_FILE)
    #[arg(long)]
    file: Option<PathBuf>,

    /// JSON array of outlet names (default: $OUTLETS_FILE or built-in list)
    #[arg(long)]
    outlets: Option<PathBuf>,
}

impl SourceArgs {
    fn settings(&self) -> Result<Settings, Box<dyn std::error::Error>> {
        let flags = Settings {
            source_url: self.url.clone(),
            source_file: self.file.clone(),
            outlets_file: self.outlets.clone(),
            ..Settings::default()
        };
        let mut merged = flags.or(Settings::from_env()?);
        if self.file.is_some() && self.url.is_none() {
            merged.source_url = None;
        }
        Ok(merged)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Port to listen on (default: $PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// CORS origin of the dashboard (default: $ALLOWED_ORIGIN)
        #[arg(long)]
        origin: Option<String>,
    },

    /// Print records grouped by date as JSON
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        /// Only print this date
        #[arg(short, long)]
        date: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the outlet blocks located in the header row
    Blocks {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Answer a question about one date
    Ask {
        /// Date key as it appears in the sheet
        date: String,

        /// Question about that date
        question: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the outlet catalog
    Outlets {
        /// JSON array of outlet names (default: $OUTLETS_FILE or built-in list)
        #[arg(long)]
        outlets: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { source, port, origin } => cmd_serve(&source, port, origin).await,
        Commands::Summary { source, date, output } => {
            cmd_summary(&source, date.as_deref(), output.as_deref()).await
        }
        Commands::Blocks { source } => cmd_blocks(&source).await,
        Commands::Ask { date, question, source } => cmd_ask(&source, &date, &question).await,
        Commands::Outlets { outlets } => cmd_outlets(outlets),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    source: &SourceArgs,
    port: Option<u16>,
    origin: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = source.settings()?;
    if port.is_some() {
        settings.port = port;
    }
    if origin.is_some() {
        settings.allowed_origin = origin;
    }

    let config = settings.into_server_config()?;
    lighthouse::server::start_server(config).await
}

async fn load_report(source: &SourceArgs) -> Result<SummaryReport, Box<dyn std::error::Error>> {
    let settings = source.settings()?;
    let table_source = settings.source()?;
    let catalog = settings.catalog()?;

    eprintln!("📄 Source: {}", table_source);
    let report = summarize_source(&table_source, &catalog).await?;
    eprintln!(
        "✅ {} records over {} dates ({} rows, {} blocks)",
        report.record_count,
        report.groups.len(),
        report.row_count,
        report.blocks.len()
    );
    Ok(report)
}

async fn cmd_summary(
    source: &SourceArgs,
    date: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = load_report(source).await?;
    let json = render_summary(&report, date)?;
    write_output(&json, output)
}

/// Pretty JSON of every date, or of one date's records.
fn render_summary(
    report: &SummaryReport,
    date: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    let json = match date {
        Some(date) => {
            let records = report
                .groups
                .get(date.trim())
                .ok_or_else(|| format!("No data for date {}", date))?;
            serde_json::to_string_pretty(&sanitized(records))?
        }
        None => serde_json::to_string_pretty(&sanitized(&report.groups))?,
    };
    Ok(json)
}

async fn cmd_blocks(source: &SourceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let report = load_report(source).await?;

    if report.blocks.is_empty() {
        eprintln!("📋 No catalog outlet found in the header row.");
        return Ok(());
    }

    eprintln!("📋 Outlet blocks ({}):\n", report.blocks.len());
    for block in &report.blocks {
        println!("  📊 {} (column {})", block.outlet, block.column);
        println!("     Date: {}, Type: {}", block.date_column, block.type_column);
        let metrics: Vec<String> = block
            .metric_columns()
            .map(|(metric, column)| format!("{}={}", metric.label(), column))
            .collect();
        println!("     Metrics: {}", metrics.join(", "));
    }

    Ok(())
}

async fn cmd_ask(
    source: &SourceArgs,
    date: &str,
    question: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = load_report(source).await?;
    let date = date.trim();

    let records = report
        .groups
        .get(date)
        .ok_or_else(|| format!("No data for date {}", date))?;

    let client = AiClient::from_env()?;
    eprintln!("🤖 Asking about {} records...", records.len());

    let block = format_records_block(records);
    let answer = client
        .generate(&system_prompt(), &user_prompt(date, question, &block))
        .await?;

    println!("{}", answer);
    Ok(())
}

fn cmd_outlets(outlets: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings {
        outlets_file: outlets,
        ..Settings::default()
    }
    .or(Settings::from_env()?);
    let catalog = settings.catalog()?;

    eprintln!("📋 Outlet catalog ({}):\n", catalog.len());
    for (i, outlet) in catalog.iter().enumerate() {
        println!("  [{:2}] {}", i + 1, outlet);
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => write_data(&mut io::stdout().lock(), content)?,
    }
    Ok(())
}

/// Data output only; status messages go to stderr.
fn write_data(out: &mut impl Write, content: &str) -> io::Result<()> {
    writeln!(out, "{}", content)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighthouse::{summarize_text, OutletCatalog};

    const SHEET: &str = "\
Date1,Type1,Heraldo,Score,CLS,LCP,SI,TBT,FCP
2024-01-01,Mobile,https://x,90,0.01,1.2,2.0,50,0.9
2024-01-02,Desktop,https://x,95,,0.8,1.1,10,0.5
";

    #[test]
    fn test_summary_output_is_pure_json() {
        // the pipeline logs while summarizing; none of it may reach the data stream
        let report = summarize_text(SHEET, &OutletCatalog::default()).unwrap();
        let json = render_summary(&report, None).unwrap();

        let mut out = Vec::new();
        write_data(&mut out, &json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["2024-01-01"][0]["Outlet"], "Heraldo");
        assert!(value["2024-01-02"][0]["CLS"].is_null());
    }

    #[test]
    fn test_summary_single_date() {
        let report = summarize_text(SHEET, &OutletCatalog::default()).unwrap();
        let json = render_summary(&report, Some(" 2024-01-02 ")).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert!(render_summary(&report, Some("2030-01-01")).is_err());
    }
}
