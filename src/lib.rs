// 광고 성과 분석 리포트 생성기
//
// 네이버/구글 광고 관리 화면에서 복사한 텍스트를 파싱해서
// 일간 성과 리포트와 주간 운영내역을 만든다.

pub mod ad_data_parser;
pub mod analytics_engine;
pub mod config_manager;
pub mod input_reader;
pub mod insight_generator;
pub mod report_exporter;
pub mod weekly_analytics_engine;
pub mod weekly_data_parser;
pub mod weekly_report_exporter;

use anyhow::Result;
use chrono::NaiveDate;

pub use ad_data_parser::{parse_ad_data, AdRecord};
pub use analytics_engine::{
    analyze_keyword_performance, calculate_summary_metrics, compare_platforms,
    KeywordPerformance, PlatformComparison, SummaryMetrics,
};
pub use config_manager::{AppConfig, ConfigManager};
pub use insight_generator::{generate_insights, Insight};
pub use weekly_analytics_engine::{generate_weekly_summary, WeeklyReport};
pub use weekly_data_parser::{ManualMetrics, PrevWeekRow};

/// 일간 데이터 분석 결과 묶음
pub struct DailyAnalysis {
    pub raw_data: Vec<AdRecord>,
    pub metrics: SummaryMetrics,
    pub keywords: Vec<KeywordPerformance>,
    pub platforms: Vec<PlatformComparison>,
    pub insights: Vec<Insight>,
}

/// 일간 데이터 파싱부터 인사이트 생성까지 한 번에 수행
pub fn analyze_daily(text: &str) -> Result<DailyAnalysis> {
    let raw_data = ad_data_parser::parse_ad_data(text)?;
    let metrics = analytics_engine::calculate_summary_metrics(&raw_data);
    let keywords = analytics_engine::analyze_keyword_performance(&raw_data);
    let platforms = analytics_engine::compare_platforms(&raw_data);
    let insights = insight_generator::generate_insights(&metrics, &keywords, &platforms);

    Ok(DailyAnalysis { raw_data, metrics, keywords, platforms, insights })
}

/// 주간 데이터 분석 결과 묶음
pub struct WeeklyAnalysis {
    pub report: WeeklyReport,
    pub prev_week: Option<PrevWeekRow>,
    pub last_week_range: String,
    pub prev_week_range: String,
}

/// 주간 데이터 파싱과 집계, 주차 계산까지 한 번에 수행
///
/// `reference` 날짜 기준으로 지난주 월~금 범위를 계산한다.
pub fn analyze_weekly(
    naver_text: &str,
    google_text: &str,
    metrics: &ManualMetrics,
    prev_week_text: Option<&str>,
    reference: NaiveDate,
) -> Result<WeeklyAnalysis> {
    let naver_data = weekly_data_parser::parse_naver_weekly(naver_text)?;
    let google_data = weekly_data_parser::parse_google_weekly(google_text)?;
    let report = weekly_analytics_engine::generate_weekly_summary(&naver_data, &google_data, metrics);

    let prev_week = prev_week_text.and_then(weekly_data_parser::parse_prev_week_row);

    let (last_start, last_end) = weekly_data_parser::calculate_week_range(reference);
    let (prev_start, prev_end) = weekly_data_parser::calculate_previous_week_range(reference);

    Ok(WeeklyAnalysis {
        report,
        prev_week,
        last_week_range: format!("{}~{}", last_start, last_end),
        prev_week_range: format!("{}~{}", prev_start, prev_end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad_data_parser::SAMPLE_DAILY_DATA;

    #[test]
    fn daily_pipeline_runs_end_to_end() {
        let analysis = analyze_daily(SAMPLE_DAILY_DATA).unwrap();
        assert_eq!(analysis.raw_data.len(), 3);
        assert_eq!(analysis.metrics.total_ad_spend, 29117.0);
        assert_eq!(analysis.keywords.len(), 3);
        assert_eq!(analysis.platforms.len(), 2);
        assert!(!analysis.insights.is_empty());
    }

    #[test]
    fn weekly_pipeline_computes_week_ranges() {
        let naver = "캠페인\t광고그룹\t키워드\t일별\t노출수\t클릭수\t평균클릭비용\t총비용\t평균노출순위
MO_TOP10_지피티\tTOP10_MO\t챗GPT강의\t2026.01.05.\t854\t2\t830\t1660\t3.1";
        let google = "키워드 실적
캠페인\t광고그룹\t검색 키워드\t일\t통화 코드\t키워드 최대 CPC\t노출수\t클릭수\t비용\t평균 CPC
MO_TOP 10_지피티\tTOP10_MO\tAI활용교육\t2026-01-05\tKRW\t10000\t24\t1\t979\t979";
        let metrics = ManualMetrics { ga_conversions: 3, real_inquiries: 2, pmax_spend: 48733.0 };

        // 2026-01-12 월요일 기준 → 지난주 01.05~01.09, 지지난주 12.29~01.02
        let reference = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        let analysis = analyze_weekly(naver, google, &metrics, None, reference).unwrap();

        assert_eq!(analysis.last_week_range, "01.05~01.09");
        assert_eq!(analysis.prev_week_range, "12.29~01.02");
        assert_eq!(analysis.report.overall.clicks, 3);
        assert!(analysis.prev_week.is_none());
    }
}
