use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::*;

use ad_report_generator::config_manager::ConfigManager;
use ad_report_generator::input_reader::read_input_text;
use ad_report_generator::weekly_data_parser::parse_manual_metrics;
use ad_report_generator::{analyze_daily, analyze_weekly, report_exporter, weekly_report_exporter};

#[derive(Parser)]
#[command(name = "ad-report", about = "네이버/구글 광고 성과 리포트 생성기", version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = "config.ini")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 일간 성과 리포트 생성
    Daily {
        /// 광고 관리 화면에서 복사한 일간 데이터 파일
        input: PathBuf,

        /// 리포트 파일 대신 분석 결과를 JSON으로 출력
        #[arg(long)]
        json: bool,

        /// 설정의 output_dir 대신 사용할 출력 디렉토리
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// 주간 운영내역 생성
    Weekly(WeeklyArgs),
}

#[derive(Args)]
struct WeeklyArgs {
    /// 네이버 키워드/캠페인 보고서 파일
    #[arg(long)]
    naver: PathBuf,

    /// 구글 키워드 실적 보고서 파일
    #[arg(long)]
    google: PathBuf,

    /// GA 전환수 (수기 입력)
    #[arg(long, default_value = "")]
    ga_conversions: String,

    /// 실문의 건수 (수기 입력)
    #[arg(long, default_value = "")]
    inquiries: String,

    /// 퍼포먼스 맥스 광고비 (수기 입력)
    #[arg(long, default_value = "")]
    pmax_spend: String,

    /// 지지난주 실적 한 줄이 담긴 파일
    #[arg(long)]
    prev_week: Option<PathBuf>,

    /// 설정의 output_dir 대신 사용할 출력 디렉토리
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_manager = ConfigManager::new(cli.config.clone())?;

    match cli.command {
        Commands::Daily { input, json, output_dir } => {
            run_daily(&config_manager, &input, json, output_dir)
        }
        Commands::Weekly(args) => run_weekly(&config_manager, args),
    }
}

fn run_daily(
    config_manager: &ConfigManager,
    input: &Path,
    json: bool,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let text = read_input_text(input)?;
    let analysis = analyze_daily(&text)?;

    info!(
        "일간 데이터 {}행 분석 완료 (키워드 {}개, 인사이트 {}개)",
        analysis.raw_data.len(),
        analysis.keywords.len(),
        analysis.insights.len()
    );

    if json {
        let bundle = serde_json::json!({
            "요약지표": analysis.metrics,
            "키워드분석": analysis.keywords,
            "매체비교": analysis.platforms,
            "인사이트": analysis.insights,
        });
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let bytes = report_exporter::generate_daily_report(
        &analysis.raw_data,
        &analysis.metrics,
        &analysis.keywords,
        &analysis.platforms,
        &analysis.insights,
        &config_manager.config.report.daily_title,
        today,
    )?;

    let filename = report_exporter::daily_report_filename(today);
    write_report(config_manager, output_dir, &filename, &bytes)
}

fn run_weekly(config_manager: &ConfigManager, args: WeeklyArgs) -> Result<()> {
    let naver_text = read_input_text(&args.naver)?;
    let google_text = read_input_text(&args.google)?;
    let metrics = parse_manual_metrics(&args.ga_conversions, &args.inquiries, &args.pmax_spend);

    let prev_week_text = match &args.prev_week {
        Some(path) => Some(read_input_text(path)?),
        None => None,
    };

    let today = chrono::Local::now().date_naive();
    let analysis = analyze_weekly(
        &naver_text,
        &google_text,
        &metrics,
        prev_week_text.as_deref(),
        today,
    )?;

    info!(
        "주간 집계 완료: {} 노출 {} / 클릭 {}",
        analysis.last_week_range,
        analysis.report.overall.impressions,
        analysis.report.overall.clicks
    );

    let bytes = weekly_report_exporter::generate_weekly_report(
        &analysis.report,
        analysis.prev_week.as_ref(),
        &analysis.last_week_range,
        &analysis.prev_week_range,
        &config_manager.config.weekly,
    )?;

    let filename = weekly_report_exporter::weekly_report_filename(&analysis.last_week_range);
    write_report(config_manager, args.output_dir, &filename, &bytes)
}

fn write_report(
    config_manager: &ConfigManager,
    output_dir: Option<PathBuf>,
    filename: &str,
    bytes: &[u8],
) -> Result<()> {
    let dir = output_dir.unwrap_or_else(|| config_manager.output_dir());
    fs::create_dir_all(&dir)
        .with_context(|| format!("출력 디렉토리를 만들 수 없습니다: {}", dir.display()))?;

    let path = dir.join(filename);
    fs::write(&path, bytes)
        .with_context(|| format!("리포트를 저장할 수 없습니다: {}", path.display()))?;

    info!("리포트 저장 완료: {}", path.display());
    println!("{}", path.display());
    Ok(())
}
