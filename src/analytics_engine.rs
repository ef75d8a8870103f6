use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ad_data_parser::{calculate_change_rate, AdRecord};

/// 주요 지표 요약
///
/// 전일/7일/월간 클릭수는 원본 데이터에 해당 구간의 클릭수 컬럼이 없어
/// 항상 0으로 남는다 (계산하지 않고 "데이터 없음"으로 문서화된 값).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SummaryMetrics {
    // 당일 지표
    pub total_ad_spend: f64,
    pub avg_cpc: f64,
    pub total_clicks: u64,
    pub avg_ctr: f64,
    pub total_impressions: u64,

    // 전일 지표
    pub prev_day_ad_spend: f64,
    pub prev_day_avg_cpc: f64,
    pub prev_day_clicks: u64,

    // 최근 7일 지표
    pub last7_days_ad_spend: f64,
    pub last7_days_avg_cpc: f64,
    pub last7_days_clicks: u64,

    // 이전 7일 지표
    pub prev7_days_ad_spend: f64,
    pub prev7_days_avg_cpc: f64,
    pub prev7_days_clicks: u64,

    // 당월 지표
    pub current_month_ad_spend: f64,
    pub current_month_avg_cpc: f64,
    pub current_month_clicks: u64,

    // 전월 지표
    pub prev_month_ad_spend: f64,
    pub prev_month_avg_cpc: f64,
    pub prev_month_clicks: u64,

    // 증감률 (당일 vs 전일)
    pub ad_spend_change: f64,
    pub cpc_change: f64,
    pub clicks_change: f64,

    // 7일 증감률
    pub ad_spend_7day_change: f64,
    pub cpc_7day_change: f64,
}

/// 키워드 증감 상태
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum KeywordTrend {
    #[serde(rename = "증가")]
    Increase,
    #[serde(rename = "감소")]
    Decrease,
    #[serde(rename = "신규")]
    New,
    #[serde(rename = "중단")]
    Stopped,
}

impl fmt::Display for KeywordTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KeywordTrend::Increase => "증가",
            KeywordTrend::Decrease => "감소",
            KeywordTrend::New => "신규",
            KeywordTrend::Stopped => "중단",
        };
        write!(f, "{}", label)
    }
}

/// 성과 점수와 증감 상태가 붙은 키워드 행
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KeywordPerformance {
    #[serde(flatten)]
    pub record: AdRecord,
    #[serde(rename = "성과점수")]
    pub score: f64,
    #[serde(rename = "증감")]
    pub trend: KeywordTrend,
}

/// 매체별 비교 (최근 7일 기준)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlatformComparison {
    pub platform: String,
    pub ad_spend: f64,
    pub avg_cpc: f64,
    pub ctr: f64,
    pub clicks: u64,
    pub impressions: u64,
    #[serde(rename = "점유율")]
    pub share: f64,
}

// 양수 CPC만 평균 (0은 "데이터 없음"이라 평균을 끌어내리지 않게 제외)
fn average_positive_cpc<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    let positive: Vec<f64> = values.copied().filter(|cpc| *cpc > 0.0).collect();
    if positive.is_empty() {
        0.0
    } else {
        positive.iter().sum::<f64>() / positive.len() as f64
    }
}

/// 주요 지표 요약 계산
///
/// 빈 입력은 전부 0인 지표를 돌려준다 (다운스트림 렌더링은 계속 동작해야 한다).
pub fn calculate_summary_metrics(data: &[AdRecord]) -> SummaryMetrics {
    if data.is_empty() {
        return SummaryMetrics::default();
    }

    // 당일 지표
    let total_ad_spend: f64 = data.iter().map(|row| row.today_spend).sum();
    let total_clicks: u64 = data.iter().map(|row| row.clicks).sum();
    let total_impressions: u64 = data.iter().map(|row| row.impressions).sum();
    let avg_cpc = average_positive_cpc(data.iter().map(|row| &row.today_cpc));

    // 전일 지표
    let prev_day_ad_spend: f64 = data.iter().map(|row| row.prev_day_spend).sum();
    let prev_day_avg_cpc = average_positive_cpc(data.iter().map(|row| &row.prev_day_cpc));

    // 최근 7일 지표
    let last7_days_ad_spend: f64 = data.iter().map(|row| row.last7_spend).sum();
    let last7_days_avg_cpc = average_positive_cpc(data.iter().map(|row| &row.last7_cpc));

    // 이전 7일 지표
    let prev7_days_ad_spend: f64 = data.iter().map(|row| row.prev7_spend).sum();
    let prev7_days_avg_cpc = average_positive_cpc(data.iter().map(|row| &row.prev7_cpc));

    // 당월 지표
    let current_month_ad_spend: f64 = data.iter().map(|row| row.current_month_spend).sum();
    let current_month_avg_cpc =
        average_positive_cpc(data.iter().map(|row| &row.current_month_cpc));

    // 전월 지표
    let prev_month_ad_spend: f64 = data.iter().map(|row| row.prev_month_spend).sum();
    let prev_month_avg_cpc = average_positive_cpc(data.iter().map(|row| &row.prev_month_cpc));

    // CTR = 클릭수 / 노출수 × 100
    let avg_ctr = if total_impressions > 0 {
        total_clicks as f64 / total_impressions as f64 * 100.0
    } else {
        0.0
    };

    SummaryMetrics {
        total_ad_spend,
        avg_cpc,
        total_clicks,
        avg_ctr,
        total_impressions,
        prev_day_ad_spend,
        prev_day_avg_cpc,
        prev_day_clicks: 0,
        last7_days_ad_spend,
        last7_days_avg_cpc,
        last7_days_clicks: 0,
        prev7_days_ad_spend,
        prev7_days_avg_cpc,
        prev7_days_clicks: 0,
        current_month_ad_spend,
        current_month_avg_cpc,
        current_month_clicks: 0,
        prev_month_ad_spend,
        prev_month_avg_cpc,
        prev_month_clicks: 0,
        ad_spend_change: calculate_change_rate(total_ad_spend, prev_day_ad_spend),
        cpc_change: calculate_change_rate(avg_cpc, prev_day_avg_cpc),
        clicks_change: 0.0,
        ad_spend_7day_change: calculate_change_rate(last7_days_ad_spend, prev7_days_ad_spend),
        cpc_7day_change: calculate_change_rate(last7_days_avg_cpc, prev7_days_avg_cpc),
    }
}

/// 키워드별 성과 분석 (성과 점수 높은 순으로 정렬)
///
/// 증감 판정은 원본 도구의 동작을 그대로 유지한다: 이전 7일 광고비가 0이면서
/// 최근 광고비가 있는 경우와 ±10% 이내 변동 모두 "신규"로 분류된다.
pub fn analyze_keyword_performance(data: &[AdRecord]) -> Vec<KeywordPerformance> {
    let mut keywords: Vec<KeywordPerformance> = data
        .iter()
        .map(|row| {
            // 성과 점수: CTR이 높고 CPC가 낮을수록 좋음
            let cpc_score = if row.today_cpc > 0.0 { 1000.0 / row.today_cpc } else { 0.0 };
            let ctr_score = row.ctr * 10.0;
            let score = cpc_score + ctr_score;

            let mut trend = KeywordTrend::New;
            if row.prev7_spend > 0.0 {
                let change_rate = calculate_change_rate(row.last7_spend, row.prev7_spend);
                if change_rate > 10.0 {
                    trend = KeywordTrend::Increase;
                } else if change_rate < -10.0 {
                    trend = KeywordTrend::Decrease;
                } else {
                    trend = KeywordTrend::New;
                }
            } else if row.last7_spend == 0.0 {
                trend = KeywordTrend::Stopped;
            }

            KeywordPerformance {
                record: row.clone(),
                score,
                trend,
            }
        })
        .collect();

    keywords.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    keywords
}

/// 매체별 비교 분석 (Google vs Naver)
///
/// 점유율 분모는 전체 레코드의 최근 7일 광고비 합이므로 버킷별 점유율의
/// 합은 100%가 된다.
pub fn compare_platforms(data: &[AdRecord]) -> Vec<PlatformComparison> {
    let mut platform_groups: HashMap<String, Vec<&AdRecord>> = HashMap::new();
    for row in data {
        let platform = if row.platform.is_empty() {
            "Unknown".to_string()
        } else {
            row.platform.clone()
        };
        platform_groups.entry(platform).or_default().push(row);
    }

    let total_ad_spend: f64 = data.iter().map(|row| row.last7_spend).sum();

    let mut comparisons: Vec<PlatformComparison> = platform_groups
        .into_iter()
        .map(|(platform, rows)| {
            let ad_spend: f64 = rows.iter().map(|row| row.last7_spend).sum();
            let clicks: u64 = rows.iter().map(|row| row.clicks).sum();
            let impressions: u64 = rows.iter().map(|row| row.impressions).sum();
            let avg_cpc = average_positive_cpc(rows.iter().map(|row| &row.last7_cpc));

            let ctr = if impressions > 0 {
                clicks as f64 / impressions as f64 * 100.0
            } else {
                0.0
            };
            let share = if total_ad_spend > 0.0 {
                ad_spend / total_ad_spend * 100.0
            } else {
                0.0
            };

            PlatformComparison {
                platform,
                ad_spend,
                avg_cpc,
                ctr,
                clicks,
                impressions,
                share,
            }
        })
        .collect();

    comparisons.sort_by(|a, b| {
        b.ad_spend
            .partial_cmp(&a.ad_spend)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    comparisons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ad_data_parser::{parse_ad_data, SAMPLE_DAILY_DATA};

    fn sample_records() -> Vec<AdRecord> {
        parse_ad_data(SAMPLE_DAILY_DATA).unwrap()
    }

    #[test]
    fn summary_metrics_for_sample_data() {
        let metrics = calculate_summary_metrics(&sample_records());
        assert_eq!(metrics.total_ad_spend, 29117.0);
        assert_eq!(metrics.total_clicks, 26);
        assert_eq!(metrics.total_impressions, 6415);
        assert!((metrics.avg_ctr - 26.0 / 6415.0 * 100.0).abs() < 1e-9);
        assert!((metrics.avg_ctr - 0.4053).abs() < 0.001);
    }

    #[test]
    fn empty_input_yields_all_zero_metrics() {
        let metrics = calculate_summary_metrics(&[]);
        assert_eq!(metrics, SummaryMetrics::default());
    }

    #[test]
    fn cpc_average_excludes_zero_entries() {
        let mut records = sample_records();
        records[0].today_cpc = 0.0;
        let metrics = calculate_summary_metrics(&records);
        // 0인 행은 평균에서 빠진다
        assert!((metrics.avg_cpc - (1042.0 + 1246.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn cpc_average_is_zero_when_no_positive_values() {
        let mut records = sample_records();
        for record in &mut records {
            record.today_cpc = 0.0;
        }
        let metrics = calculate_summary_metrics(&records);
        assert_eq!(metrics.avg_cpc, 0.0);
    }

    #[test]
    fn keywords_sorted_by_score_descending() {
        let keywords = analyze_keyword_performance(&sample_records());
        assert_eq!(keywords.len(), 3);
        assert!(keywords[0].score >= keywords[1].score);
        assert!(keywords[1].score >= keywords[2].score);
        // CTR 10%인 챗GPT교육이 최상위
        assert_eq!(keywords[0].record.keyword, "챗GPT교육");
    }

    #[test]
    fn trend_boundary_is_strictly_greater_than_ten_percent() {
        let mut record = sample_records()[0].clone();
        record.prev7_spend = 100.0;
        record.last7_spend = 110.0; // 정확히 +10%
        let keywords = analyze_keyword_performance(&[record]);
        assert_eq!(keywords[0].trend, KeywordTrend::New);
    }

    #[test]
    fn trend_classification() {
        let base = sample_records()[0].clone();

        let mut increase = base.clone();
        increase.prev7_spend = 100.0;
        increase.last7_spend = 120.0;
        assert_eq!(analyze_keyword_performance(&[increase])[0].trend, KeywordTrend::Increase);

        let mut decrease = base.clone();
        decrease.prev7_spend = 100.0;
        decrease.last7_spend = 50.0;
        assert_eq!(analyze_keyword_performance(&[decrease])[0].trend, KeywordTrend::Decrease);

        let mut stopped = base.clone();
        stopped.prev7_spend = 0.0;
        stopped.last7_spend = 0.0;
        assert_eq!(analyze_keyword_performance(&[stopped])[0].trend, KeywordTrend::Stopped);

        // 이전 7일이 0인데 최근 지출이 있으면 증가가 아니라 신규 (원본 동작 유지)
        let mut fresh = base;
        fresh.prev7_spend = 0.0;
        fresh.last7_spend = 5000.0;
        assert_eq!(analyze_keyword_performance(&[fresh])[0].trend, KeywordTrend::New);
    }

    #[test]
    fn platform_shares_sum_to_one_hundred() {
        let platforms = compare_platforms(&sample_records());
        assert_eq!(platforms.len(), 2);
        let share_sum: f64 = platforms.iter().map(|p| p.share).sum();
        assert!((share_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn platforms_sorted_by_spend_descending() {
        let platforms = compare_platforms(&sample_records());
        // Google 7일 광고비 73,650+18,639 > Naver 26,598
        assert_eq!(platforms[0].platform, "Google");
        assert_eq!(platforms[0].ad_spend, 92289.0);
        assert_eq!(platforms[1].platform, "Naver");
        assert_eq!(platforms[1].ad_spend, 26598.0);
    }

    #[test]
    fn missing_platform_goes_to_unknown_bucket() {
        let mut records = sample_records();
        records[1].platform = String::new();
        let platforms = compare_platforms(&records);
        assert!(platforms.iter().any(|p| p.platform == "Unknown"));
    }
}
