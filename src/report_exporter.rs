use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};

use crate::ad_data_parser::AdRecord;
use crate::analytics_engine::{KeywordPerformance, PlatformComparison, SummaryMetrics};
use crate::insight_generator::{format_thousands, Insight, InsightLevel};

// Excel UTF-8 인식용 BOM
const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 일간 리포트 파일명: ChatGPT교육_광고리포트_YYYY-MM-DD.csv
pub fn daily_report_filename(date: NaiveDate) -> String {
    format!("ChatGPT교육_광고리포트_{}.csv", date.format("%Y-%m-%d"))
}

fn format_month_day(date: NaiveDate) -> String {
    format!("{:02}월 {:02}일", date.month(), date.day())
}

fn platform_evaluation(platform: &PlatformComparison) -> &'static str {
    if platform.avg_cpc > 1000.0 {
        "CPC 효율성, CTR 높음"
    } else if platform.ctr < 0.1 {
        "CPC 우수, CTR 개선 필요"
    } else {
        "안정적"
    }
}

/// 5개 섹션으로 구성된 일간 리포트 생성
///
/// ① 주요 지표 + 인사이트 ② 일일 광고 성과 분석 ③ 키워드별 상세 분석
/// ④ Google vs Naver 매체 비교 ⑤ 개선 제안 및 액션 플랜
pub fn generate_daily_report(
    raw_data: &[AdRecord],
    metrics: &SummaryMetrics,
    keywords: &[KeywordPerformance],
    platforms: &[PlatformComparison],
    insights: &[Insight],
    title: &str,
    reference_date: NaiveDate,
) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut buffer);

        write_summary_section(&mut writer, metrics, insights, title, reference_date)?;
        write_daily_performance_section(&mut writer, raw_data)?;
        write_keyword_analysis_section(&mut writer, keywords)?;
        write_platform_comparison_section(&mut writer, platforms)?;
        write_action_plan_section(&mut writer, insights)?;

        writer.flush()?;
    }
    Ok(buffer)
}

fn write_summary_section<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    metrics: &SummaryMetrics,
    insights: &[Insight],
    title: &str,
    reference_date: NaiveDate,
) -> Result<()> {
    writer.write_record([title])?;
    writer.write_record([format!("보고 기준일: {}", reference_date.format("%Y-%m-%d"))])?;
    writer.write_record([""])?;
    writer.write_record(["📊 주요 지표"])?;

    // 당일 열은 어제 날짜, 전일 열은 그저께 날짜로 표기
    let yesterday = reference_date - Duration::days(1);
    let day_before = reference_date - Duration::days(2);
    writer.write_record([
        "구분".to_string(),
        format_month_day(yesterday),
        format_month_day(day_before),
        "증감".to_string(),
        "최근 7일".to_string(),
        "이전 7일".to_string(),
        "증감율".to_string(),
        "당월".to_string(),
    ])?;

    writer.write_record([
        "광고비".to_string(),
        format_thousands(metrics.total_ad_spend),
        format_thousands(metrics.prev_day_ad_spend),
        format!("{:.1}%", metrics.ad_spend_change),
        format_thousands(metrics.last7_days_ad_spend),
        format_thousands(metrics.prev7_days_ad_spend),
        format!("{:.1}%", metrics.ad_spend_7day_change),
        format_thousands(metrics.current_month_ad_spend),
    ])?;
    writer.write_record([
        "CPC".to_string(),
        format_thousands(metrics.avg_cpc),
        format_thousands(metrics.prev_day_avg_cpc),
        format!("{:.1}%", metrics.cpc_change),
        format_thousands(metrics.last7_days_avg_cpc),
        format_thousands(metrics.prev7_days_avg_cpc),
        format!("{:.1}%", metrics.cpc_7day_change),
        format_thousands(metrics.current_month_avg_cpc),
    ])?;
    writer.write_record([
        "클릭수".to_string(),
        metrics.total_clicks.to_string(),
        metrics.prev_day_clicks.to_string(),
        String::new(),
        metrics.last7_days_clicks.to_string(),
        metrics.prev7_days_clicks.to_string(),
        String::new(),
        metrics.current_month_clicks.to_string(),
    ])?;
    writer.write_record(["CTR".to_string(), format!("{:.2}%", metrics.avg_ctr)])?;
    writer.write_record(["노출수".to_string(), metrics.total_impressions.to_string()])?;

    writer.write_record([""])?;
    writer.write_record(["💡 주요 인사이트"])?;
    for insight in insights.iter().take(5) {
        writer.write_record(["✓", insight.reason.as_str()])?;
    }
    Ok(())
}

fn write_daily_performance_section<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    data: &[AdRecord],
) -> Result<()> {
    writer.write_record([""])?;
    writer.write_record(["일일 광고 성과 분석"])?;
    writer.write_record(["매체", "키워드", "당일 광고비", "당일 CPC", "노출수", "클릭수"])?;

    for record in data {
        writer.write_record([
            record.platform.clone(),
            record.keyword.clone(),
            format_thousands(record.today_spend),
            format_thousands(record.today_cpc),
            record.impressions.to_string(),
            record.clicks.to_string(),
        ])?;
    }
    Ok(())
}

fn write_keyword_analysis_section<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    keywords: &[KeywordPerformance],
) -> Result<()> {
    writer.write_record([""])?;
    writer.write_record(["키워드별 상세 분석"])?;
    writer.write_record([
        "순위",
        "매체",
        "키워드",
        "최근7일 광고비",
        "이전7일 광고비",
        "증감",
        "최근7일 CPC",
        "CTR",
        "성과",
    ])?;

    // 성과점수 상위 12개만
    for (index, keyword) in keywords.iter().take(12).enumerate() {
        let change = keyword.record.last7_spend - keyword.record.prev7_spend;
        let change_label = if change > 0.0 {
            format!("+{}", format_thousands(change))
        } else {
            format_thousands(change)
        };

        writer.write_record([
            (index + 1).to_string(),
            keyword.record.platform.clone(),
            keyword.record.keyword.clone(),
            format_thousands(keyword.record.last7_spend),
            format_thousands(keyword.record.prev7_spend),
            change_label,
            format_thousands(keyword.record.last7_cpc),
            format!("{:.2}%", keyword.record.ctr),
            keyword.trend.to_string(),
        ])?;
    }

    writer.write_record([""])?;
    writer.write_record([""])?;
    writer.write_record(["📊 성과 판단 기준"])?;
    writer.write_record(["🆕 신규:", "조건 1: 이전 7일 광고비가 0원이고, 최근 7일 광고비가 0원 초과"])?;
    writer.write_record(["", "조건 2: 이전 7일 광고비가 있지만 증감률이 -10% ~ +10% 사이 (유지)"])?;
    writer.write_record(["📈 증가:", "이전 7일 광고비 대비 +10% 초과 증가"])?;
    writer.write_record(["📉 감소:", "이전 7일 광고비 대비 -10% 미만 감소"])?;
    writer.write_record(["⏸️ 중단:", "최근 7일 광고비가 0원"])?;
    Ok(())
}

fn write_platform_comparison_section<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    platforms: &[PlatformComparison],
) -> Result<()> {
    writer.write_record([""])?;
    writer.write_record(["Google vs Naver 매체 비교"])?;
    writer.write_record(["매체", "최근7일 광고비", "점유율", "평균 CPC", "CTR", "클릭수", "평가"])?;

    for platform in platforms {
        writer.write_record([
            platform.platform.clone(),
            format_thousands(platform.ad_spend),
            format!("{:.1}%", platform.share),
            format_thousands(platform.avg_cpc),
            format!("{:.2}%", platform.ctr),
            platform.clicks.to_string(),
            platform_evaluation(platform).to_string(),
        ])?;
    }
    Ok(())
}

fn write_action_plan_section<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    insights: &[Insight],
) -> Result<()> {
    writer.write_record([""])?;
    writer.write_record(["개선 제안 및 액션 플랜"])?;

    let groups = [
        (InsightLevel::Urgent, "🔴 즉시 조치 필요"),
        (InsightLevel::Opportunity, "🟡 적극적 기회"),
        (InsightLevel::Positive, "🟢 긍정적 지표 (유지 전략)"),
    ];

    for (level, section_title) in groups {
        let grouped: Vec<&Insight> = insights.iter().filter(|i| i.level == level).collect();
        if grouped.is_empty() {
            continue;
        }

        writer.write_record([""])?;
        writer.write_record([section_title])?;
        writer.write_record(["No", "이유", "제안 액션", "기간", "우선순위"])?;
        for (index, insight) in grouped.iter().enumerate() {
            writer.write_record([
                (index + 1).to_string(),
                insight.reason.clone(),
                insight.action.clone(),
                insight.horizon.clone(),
                insight.priority.to_string(),
            ])?;
        }
    }
    Ok(())
}
