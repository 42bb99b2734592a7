// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sqlx::sqlite::SqlitePool;
use std::env;
use std::path::{Path, PathBuf};

use riskscore_rs::benchmark::{compare, narrative, ComparisonVerdict};
use riskscore_rs::chart::write_trend_chart;
use riskscore_rs::commentary::{CommentaryMetrics, GeminiClient};
use riskscore_rs::config::Config;
use riskscore_rs::models::PeerGroup;
use riskscore_rs::report::RiskReport;
use riskscore_rs::scoring::WeightSet;
use riskscore_rs::session::DashboardSession;
use riskscore_rs::{db, import, logging, repository, web};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Weights 0-100 for the composite score
#[derive(Debug, Args)]
struct WeightArgs {
    #[arg(long, default_value_t = 25)]
    liquidity: u32,
    #[arg(long, default_value_t = 25)]
    stability: u32,
    #[arg(long, default_value_t = 25)]
    profitability: u32,
    #[arg(long, default_value_t = 25)]
    activity: u32,
}

impl WeightArgs {
    fn to_weights(&self) -> Result<WeightSet> {
        Ok(WeightSet::new(
            self.liquidity,
            self.stability,
            self.profitability,
            self.activity,
        )?)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Json,
    Csv,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Composite risk score for a company's latest period
    Score {
        code: String,
        #[command(flatten)]
        weights: WeightArgs,
        /// Also request AI commentary (needs GEMINI_API_KEY)
        #[arg(long)]
        commentary: bool,
    },
    /// Chronological ratio history
    Series { code: String },
    /// Compare the latest period against the peer average
    Compare {
        code: String,
        /// Group peers by region instead of industry
        #[arg(long)]
        region: bool,
    },
    /// Search companies by name or code
    Search {
        term: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Export a risk report
    Report {
        code: String,
        #[arg(long, value_enum, default_value = "json")]
        format: ReportFormat,
        #[command(flatten)]
        weights: WeightArgs,
        /// Include AI commentary in the report
        #[arg(long)]
        commentary: bool,
    },
    /// Generate the SVG trend chart
    Chart { code: String },
    /// Import company_info*.csv and finance_data*.csv files from a directory
    Import { dir: PathBuf },
    /// List the companies with the lowest debt ratio
    Leaders {
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Start the web server
    Serve {
        /// Port to bind to
        #[arg(long, default_value = "3000")]
        port: u16,
    },
}

async fn load_session(pool: &SqlitePool, code: &str) -> DashboardSession {
    let company = repository::load_company(pool, code).await;
    let series = repository::load_series(pool, code).await;
    if series.is_fallback() {
        println!("⚠️  No financial records for {}, showing sample data", code);
    }
    DashboardSession::from_series(company, series)
}

async fn commentary_for(config: &Config, session: &DashboardSession) -> String {
    let client = GeminiClient::from_env(&config.commentary);
    let metrics = CommentaryMetrics::from(session.latest());
    client.analyze(&session.company().company_name, &metrics).await
}

fn print_snapshot(session: &DashboardSession) {
    let snapshot = session.snapshot();
    println!(
        "{} ({}) - period {}",
        snapshot.company.company_name, snapshot.company.stock_code, snapshot.period
    );
    println!(
        "Composite score: {} [{:?}] {}",
        snapshot.score, snapshot.band, snapshot.verdict_message
    );
    for card in &snapshot.metrics {
        println!(
            "  {:<26} {:>10}  sub-score {:>5.1}  weight {:>3}",
            card.label, card.display, card.sub_score, card.weight
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::default();

    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data.db".to_string());
    let pool = db::create_db_pool(&db_url).await?;

    match cli.command {
        Some(Commands::Score {
            code,
            weights,
            commentary,
        }) => {
            let session = load_session(&pool, &code)
                .await
                .with_weights(weights.to_weights()?);
            print_snapshot(&session);
            if commentary {
                println!("\n{}", commentary_for(&config, &session).await);
            }
        }
        Some(Commands::Series { code }) => {
            let series = repository::load_series(&pool, &code).await;
            println!(
                "{:<10} {:>14} {:>12} {:>8} {:>12}",
                "Period", "Current (%)", "Debt (%)", "ROE (%)", "Coverage (x)"
            );
            for point in series.chart_points() {
                println!(
                    "{:<10} {:>14.1} {:>12.1} {:>8.1} {:>12.1}",
                    point.name, point.liquidity, point.stability, point.profitability, point.activity
                );
            }
        }
        Some(Commands::Compare { code, region }) => {
            let session = load_session(&pool, &code).await;
            let group = PeerGroup::for_company(session.company(), region);
            let aggregate = repository::load_benchmark(&pool, group.as_ref()).await;
            let comparison = compare(session.latest(), &aggregate);

            println!(
                "{} vs {}{}",
                session.company().company_name,
                comparison.label,
                if comparison.authoritative { "" } else { " (demo figures)" }
            );
            for m in &comparison.metrics {
                let mark = match m.verdict {
                    ComparisonVerdict::Favorable => "✅",
                    ComparisonVerdict::Unfavorable => "❌",
                };
                println!(
                    "  {} {:<26} {:>8.1} vs {:>8.1} ({:+.1})",
                    mark,
                    m.kind.ratio_name(),
                    m.company,
                    m.peer,
                    m.delta
                );
            }
            println!();
            for line in narrative(&comparison) {
                println!("{}", line);
            }
        }
        Some(Commands::Search { term, limit }) => {
            let limit = limit.unwrap_or(config.search_limit);
            let companies = repository::search_companies(&pool, &term, limit).await?;
            if companies.is_empty() {
                println!("No companies match '{}'", term);
            }
            for company in companies {
                println!(
                    "{}: {} [{}]",
                    company.stock_code,
                    company.company_name,
                    company.industry.as_deref().unwrap_or("-")
                );
            }
        }
        Some(Commands::Report {
            code,
            format,
            weights,
            commentary,
        }) => {
            let session = load_session(&pool, &code)
                .await
                .with_weights(weights.to_weights()?);
            let mut report = RiskReport::from_session(&session);
            if commentary {
                report = report.with_commentary(commentary_for(&config, &session).await);
            }
            let output_dir = Path::new(&config.output_dir);
            let path = match format {
                ReportFormat::Json => report.write_json(output_dir)?,
                ReportFormat::Csv => report.write_csv(output_dir)?,
            };
            println!("✅ Report written to {}", path.display());
        }
        Some(Commands::Chart { code }) => {
            let session = load_session(&pool, &code).await;
            let title = format!("{} financial ratio trend", session.company().company_name);
            let path = write_trend_chart(session.series(), &title, Path::new(&config.output_dir))?;
            println!("✅ Generated trend chart: {}", path.display());
        }
        Some(Commands::Import { dir }) => {
            let summary = import::import_directory(&pool, &dir).await?;
            println!(
                "✅ Imported {} companies and {} statements ({} skipped)",
                summary.companies, summary.statements, summary.skipped
            );
        }
        Some(Commands::Leaders { limit }) => {
            let leaders = repository::low_leverage_leaders(&pool, limit).await?;
            for (i, entry) in leaders.iter().enumerate() {
                println!(
                    "{:>3}. {:<24} {:<10} {:>8.1}%  ({})",
                    i + 1,
                    entry.company_name,
                    entry.stock_code,
                    entry.debt_to_equity_ratio,
                    entry.period
                );
            }
        }
        Some(Commands::Serve { port }) => {
            let state = web::AppState::new(pool, config);
            web::server::start_server(state, port).await?;
        }
        None => {
            println!("No command specified. Use --help for usage information.");
        }
    }

    Ok(())
}
