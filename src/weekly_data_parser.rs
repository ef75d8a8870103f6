use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use log::*;

use crate::ad_data_parser::clean_number;

/// 네이버 키워드 보고서 한 행 (캠페인/광고그룹/키워드/일별)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NaverWeeklyRecord {
    #[serde(rename = "캠페인")]
    pub campaign: String,
    #[serde(rename = "광고그룹")]
    pub ad_group: String,
    #[serde(rename = "키워드")]
    pub keyword: String,
    #[serde(rename = "일별")]
    pub date: String, // 2025.12.08.
    #[serde(rename = "노출수")]
    pub impressions: u64,
    #[serde(rename = "클릭수")]
    pub clicks: u64,
    #[serde(rename = "평균클릭비용")]
    pub avg_click_cost: f64,
    #[serde(rename = "총비용")]
    pub total_cost: f64,
    #[serde(rename = "평균노출순위")]
    pub avg_rank: f64,
}

/// 구글 Ads 키워드 실적 한 행
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoogleWeeklyRecord {
    #[serde(rename = "캠페인")]
    pub campaign: String,
    #[serde(rename = "광고그룹")]
    pub ad_group: String,
    #[serde(rename = "검색키워드")]
    pub search_keyword: String,
    #[serde(rename = "일")]
    pub date: String, // 2026-01-05
    #[serde(rename = "통화코드")]
    pub currency_code: String,
    #[serde(rename = "키워드최대CPC")]
    pub keyword_max_cpc: f64,
    #[serde(rename = "노출수")]
    pub impressions: u64,
    #[serde(rename = "클릭수")]
    pub clicks: u64,
    #[serde(rename = "비용")]
    pub cost: f64,
    #[serde(rename = "평균CPC")]
    pub avg_cpc: f64,
}

/// 수기 입력 지표 (GA 데이터 및 퍼맥스 광고비)
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ManualMetrics {
    #[serde(rename = "GA전환수")]
    pub ga_conversions: u64,
    #[serde(rename = "실문의건수")]
    pub real_inquiries: u64,
    #[serde(rename = "퍼맥스광고비")]
    pub pmax_spend: f64,
}

/// 지지난주 실적 한 줄 입력 (탭 구분 9개 필드, 첫 필드는 날짜 라벨)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PrevWeekRow {
    pub date_range: String,
    pub impressions: u64,
    pub clicks: u64,
    pub cpc: f64,
    pub ad_spend: f64,
    pub ga_conversions: u64,
    pub real_inquiries: u64,
    pub cpa: f64,
    pub pmax_spend: f64,
}

fn is_summary_row(first_field: &str) -> bool {
    !first_field.is_empty() && (first_field.contains("합계") || first_field == "-")
}

fn count_field(values: &[&str], index: usize) -> u64 {
    values
        .get(index)
        .map(|v| clean_number(v).max(0.0) as u64)
        .unwrap_or(0)
}

fn number_field(values: &[&str], index: usize) -> f64 {
    values.get(index).map(|v| clean_number(v)).unwrap_or(0.0)
}

/// 네이버 주간 데이터 파싱 (탭 구분)
pub fn parse_naver_weekly(text: &str) -> Result<Vec<NaverWeeklyRecord>> {
    if text.trim().is_empty() {
        return Err(anyhow!("네이버 데이터가 비어있습니다."));
    }

    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.len() < 2 {
        return Err(anyhow!("최소 2줄(헤더 + 데이터)이 필요합니다."));
    }

    // 보고서 제목 줄이 있으면 두 줄, 헤더만 있으면 한 줄 건너뛰기
    let mut start_index = 0;
    if lines[0].contains("키워드 보고서") {
        start_index = 2;
    } else if lines[0].contains("캠페인") {
        start_index = 1;
    }

    let mut data = Vec::new();

    for (i, raw_line) in lines.iter().enumerate().skip(start_index) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split('\t').map(|v| v.trim()).collect();

        if is_summary_row(values[0]) {
            continue;
        }
        if values.len() < 8 {
            warn!("네이버 행 {} 파싱 실패: 필드 수 부족 ({}개)", i + 1, values.len());
            continue;
        }

        data.push(NaverWeeklyRecord {
            campaign: values.first().unwrap_or(&"").to_string(),
            ad_group: values.get(1).unwrap_or(&"").to_string(),
            keyword: values.get(2).filter(|v| !v.is_empty()).unwrap_or(&"-").to_string(),
            date: values.get(3).unwrap_or(&"").to_string(),
            impressions: count_field(&values, 4),
            clicks: count_field(&values, 5),
            avg_click_cost: number_field(&values, 6),
            total_cost: number_field(&values, 7),
            avg_rank: number_field(&values, 8),
        });
    }

    if data.is_empty() {
        return Err(anyhow!("파싱된 네이버 데이터가 없습니다."));
    }

    Ok(data)
}

/// 구글 주간 데이터 파싱 (탭 구분)
///
/// 구글 Ads 내보내기는 제목/날짜 줄 뒤에 헤더가 오므로 앞쪽 5줄 안에서
/// "캠페인"이 들어간 헤더 줄을 찾아 그 다음부터 데이터로 처리한다.
pub fn parse_google_weekly(text: &str) -> Result<Vec<GoogleWeeklyRecord>> {
    if text.trim().is_empty() {
        return Err(anyhow!("구글 데이터가 비어있습니다."));
    }

    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.len() < 3 {
        return Err(anyhow!("최소 3줄(제목 + 날짜 + 헤더 + 데이터)이 필요합니다."));
    }

    let mut start_index = 0;
    for (i, line) in lines.iter().take(5).enumerate() {
        if line.contains("캠페인") {
            start_index = i + 1;
            break;
        }
    }

    let mut data = Vec::new();

    for (i, raw_line) in lines.iter().enumerate().skip(start_index) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split('\t').map(|v| v.trim()).collect();

        if is_summary_row(values[0]) {
            continue;
        }
        if values.len() < 10 {
            warn!("구글 행 {} 파싱 실패: 필드 수 부족 ({}개)", i + 1, values.len());
            continue;
        }

        data.push(GoogleWeeklyRecord {
            campaign: values.first().unwrap_or(&"").to_string(),
            ad_group: values.get(1).unwrap_or(&"").to_string(),
            search_keyword: values.get(2).unwrap_or(&"").to_string(),
            date: values.get(3).unwrap_or(&"").to_string(),
            currency_code: values.get(4).filter(|v| !v.is_empty()).unwrap_or(&"KRW").to_string(),
            keyword_max_cpc: number_field(&values, 5),
            impressions: count_field(&values, 6),
            clicks: count_field(&values, 7),
            cost: number_field(&values, 8),
            avg_cpc: number_field(&values, 9),
        });
    }

    if data.is_empty() {
        return Err(anyhow!("파싱된 구글 데이터가 없습니다."));
    }

    Ok(data)
}

/// 수기 지표 파싱 (빈 값/숫자가 아닌 값은 0)
pub fn parse_manual_metrics(ga_conversions: &str, real_inquiries: &str, pmax_spend: &str) -> ManualMetrics {
    ManualMetrics {
        ga_conversions: ga_conversions.trim().parse::<u64>().unwrap_or(0),
        real_inquiries: real_inquiries.trim().parse::<u64>().unwrap_or(0),
        pmax_spend: pmax_spend.trim().parse::<u64>().unwrap_or(0) as f64,
    }
}

/// 지지난주 실적 한 줄 파싱 (입력이 비어 있으면 None)
pub fn parse_prev_week_row(text: &str) -> Option<PrevWeekRow> {
    let line = text.trim().lines().next()?.trim();
    if line.is_empty() {
        return None;
    }

    let values: Vec<&str> = line.split('\t').map(|v| v.trim()).collect();

    Some(PrevWeekRow {
        date_range: values.first().unwrap_or(&"").to_string(),
        impressions: count_field(&values, 1),
        clicks: count_field(&values, 2),
        cpc: number_field(&values, 3),
        ad_spend: number_field(&values, 4),
        ga_conversions: count_field(&values, 5),
        real_inquiries: count_field(&values, 6),
        cpa: number_field(&values, 7),
        pmax_spend: number_field(&values, 8),
    })
}

fn format_month_day(date: NaiveDate) -> String {
    format!("{:02}.{:02}", date.month(), date.day())
}

// 기준일로부터 지난주 금요일을 찾는다 (일요일이면 -2일, 토요일이면 -1일, 평일이면 요일+2일)
fn last_friday_of_previous_week(reference: NaiveDate) -> NaiveDate {
    let day = reference.weekday().num_days_from_sunday();
    let days_to_subtract = match day {
        0 => 2,
        6 => 1,
        _ => day + 2,
    };
    reference - Duration::days(days_to_subtract as i64)
}

/// 지난주 월~금 날짜 범위 계산 ("MM.DD" 시작/끝)
pub fn calculate_week_range(reference: NaiveDate) -> (String, String) {
    let last_friday = last_friday_of_previous_week(reference);
    let last_monday = last_friday - Duration::days(4);
    (format_month_day(last_monday), format_month_day(last_friday))
}

/// 지지난주 월~금 날짜 범위 계산
pub fn calculate_previous_week_range(reference: NaiveDate) -> (String, String) {
    let last_friday = last_friday_of_previous_week(reference);
    let last_monday = last_friday - Duration::days(4);

    let prev_friday = last_monday - Duration::days(3);
    let prev_monday = prev_friday - Duration::days(4);
    (format_month_day(prev_monday), format_month_day(prev_friday))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAVER_SAMPLE: &str = "캠페인\t광고그룹\t키워드\t일별\t노출수\t클릭수\t평균클릭비용(VAT포함,원)\t총비용(VAT포함,원)\t평균노출순위
MO_TOP10_지피티\tTOP10_MO\t-\t2025.12.08.\t1097\t3\t704\t2112\t2.9
MO_TOP10_지피티\tTOP10_MO\t챗GPT강의\t2025.12.09.\t854\t2\t830\t1660\t3.1";

    const GOOGLE_SAMPLE: &str = "키워드 실적 보고서
2026-01-05 ~ 2026-01-09
캠페인\t광고그룹\t검색 키워드\t일\t통화 코드\t키워드 최대 CPC\t노출수\t클릭수\t비용\t평균 CPC
MO_TOP 10_지피티\tTOP10_MO\tAI활용교육\t2026-01-05\tKRW\t10000\t24\t1\t979\t979
PC_TOP 10_지피티\tTOP10_PC\t챗GPT교육\t2026-01-06\tKRW\t8000\t130\t4\t5200\t1300";

    #[test]
    fn parses_naver_weekly_with_header() {
        let data = parse_naver_weekly(NAVER_SAMPLE).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].keyword, "-");
        assert_eq!(data[0].impressions, 1097);
        assert_eq!(data[0].total_cost, 2112.0);
        assert_eq!(data[1].avg_click_cost, 830.0);
    }

    #[test]
    fn skips_naver_report_title_line() {
        let text = format!("네이버 키워드 보고서\n{}", NAVER_SAMPLE);
        let data = parse_naver_weekly(&text).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn parses_google_weekly_after_header_scan() {
        let data = parse_google_weekly(GOOGLE_SAMPLE).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].search_keyword, "AI활용교육");
        assert_eq!(data[0].currency_code, "KRW");
        assert_eq!(data[1].cost, 5200.0);
    }

    #[test]
    fn google_minimum_three_lines() {
        let err = parse_google_weekly("캠페인\t광고그룹\n데이터한줄").unwrap_err();
        assert!(err.to_string().contains("최소 3줄"));
    }

    #[test]
    fn naver_minimum_two_lines() {
        let err = parse_naver_weekly("캠페인 헤더 한 줄").unwrap_err();
        assert!(err.to_string().contains("최소 2줄"));
    }

    #[test]
    fn short_rows_are_skipped_not_fatal() {
        let text = format!("{}\n짧은행\t데이터", NAVER_SAMPLE);
        let data = parse_naver_weekly(&text).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn summary_rows_are_excluded() {
        let text = format!("{}\n합계\t\t\t\t1951\t5\t\t3772\t", NAVER_SAMPLE);
        let data = parse_naver_weekly(&text).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn manual_metrics_default_to_zero() {
        let metrics = parse_manual_metrics("", "abc", "-5");
        assert_eq!(metrics, ManualMetrics::default());

        let metrics = parse_manual_metrics("3", "2", "48733");
        assert_eq!(metrics.ga_conversions, 3);
        assert_eq!(metrics.real_inquiries, 2);
        assert_eq!(metrics.pmax_spend, 48733.0);
    }

    #[test]
    fn prev_week_row_parsing() {
        assert_eq!(parse_prev_week_row("  \n"), None);

        let row = parse_prev_week_row("12.22~12.26\t5,120\t18\t905\t16,290\t1\t0\t16,290\t0").unwrap();
        assert_eq!(row.date_range, "12.22~12.26");
        assert_eq!(row.impressions, 5120);
        assert_eq!(row.clicks, 18);
        assert_eq!(row.ad_spend, 16290.0);
        assert_eq!(row.cpa, 16290.0);
        assert_eq!(row.pmax_spend, 0.0);
    }

    #[test]
    fn week_range_from_midweek_reference() {
        // 2026-01-14는 수요일 → 지난주 금요일 2026-01-09, 월요일 2026-01-05
        let reference = NaiveDate::from_ymd_opt(2026, 1, 14).unwrap();
        assert_eq!(calculate_week_range(reference), ("01.05".to_string(), "01.09".to_string()));
        assert_eq!(
            calculate_previous_week_range(reference),
            ("12.29".to_string(), "01.02".to_string())
        );
    }

    #[test]
    fn week_range_from_weekend_reference() {
        // 일요일 기준: 금요일은 이틀 전
        let sunday = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        assert_eq!(calculate_week_range(sunday), ("01.05".to_string(), "01.09".to_string()));

        // 토요일 기준: 금요일은 하루 전
        let saturday = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(calculate_week_range(saturday), ("01.05".to_string(), "01.09".to_string()));
    }
}
