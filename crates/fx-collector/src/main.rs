//! Standalone FX rate collector CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fx_collector::{modules, CollectorConfig, JsonLinesSink, RateSink, StdoutSink};
use fx_core::{init_logging, LogConfig};
use fx_scraper::ScrapeOrchestrator;

#[derive(Parser)]
#[command(name = "fx-collector")]
#[command(about = "Bank FX Rate Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error). 설정 파일보다 우선
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 환율 수집 후 저장
    Run {
        /// 특정 기관만 수집 (쉼표로 구분, 예: "bot,ctbc")
        #[arg(long)]
        institutions: Option<String>,

        /// JSON Lines 출력 경로 (미지정 시 설정값, 그것도 없으면 stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// 수집 가능한 기관 목록 출력
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 설정 로드
    let config = CollectorConfig::load(&cli.config)?;

    // 로깅 초기화
    let mut log_config = LogConfig::from(&config.logging);
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    init_logging(log_config)?;

    tracing::info!(config = %cli.config.display(), "FX Rate Collector 시작");

    let orchestrator = ScrapeOrchestrator::with_defaults(&config.scraper)?;

    match cli.command {
        Commands::Run {
            institutions,
            output,
        } => {
            let config = config
                .with_institutions(institutions.as_deref())
                .with_output(output);

            let sink: Box<dyn RateSink> = match &config.output_path {
                Some(path) => Box::new(JsonLinesSink::new(path)),
                None => Box::new(StdoutSink),
            };

            let stats = modules::collect_rates(&orchestrator, &config, sink.as_ref()).await?;
            stats.log_summary("환율 수집");
        }
        Commands::List => {
            for id in orchestrator.institutions() {
                let name = orchestrator.institution_name(id).unwrap_or_default();
                println!("{:<8} {}", id, name);
            }
        }
    }

    tracing::info!("FX Rate Collector 종료");

    Ok(())
}
