use std::fmt;

use serde::{Deserialize, Serialize};

use crate::weekly_data_parser::{GoogleWeeklyRecord, ManualMetrics, NaverWeeklyRecord};

/// 주간 요약 구분
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyScope {
    #[serde(rename = "전체")]
    Overall,
    #[serde(rename = "Naver")]
    Naver,
    #[serde(rename = "Google")]
    Google,
}

impl fmt::Display for WeeklyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeeklyScope::Overall => "전체",
            WeeklyScope::Naver => "Naver",
            WeeklyScope::Google => "Google",
        };
        write!(f, "{}", label)
    }
}

/// 구분(전체/네이버/구글)별 주간 집계
///
/// GA전환수/실문의건수/CPA는 전체에만 채워진다 (매체별로 분배하지 않음).
/// 퍼맥스광고비는 구글 계정에서만 집행되므로 구글/전체에만 들어간다.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeeklySummary {
    #[serde(rename = "매체")]
    pub scope: WeeklyScope,
    #[serde(rename = "노출수")]
    pub impressions: u64,
    #[serde(rename = "클릭수")]
    pub clicks: u64,
    #[serde(rename = "CPC")]
    pub cpc: f64,
    #[serde(rename = "광고비")]
    pub ad_spend: f64,
    #[serde(rename = "GA전환수")]
    pub ga_conversions: u64,
    #[serde(rename = "실문의건수")]
    pub real_inquiries: u64,
    #[serde(rename = "CPA")]
    pub cpa: f64,
    #[serde(rename = "퍼맥스광고비")]
    pub pmax_spend: f64,
}

/// 전체/네이버/구글 세 구분의 주간 요약
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeeklyReport {
    #[serde(rename = "전체")]
    pub overall: WeeklySummary,
    #[serde(rename = "네이버")]
    pub naver: WeeklySummary,
    #[serde(rename = "구글")]
    pub google: WeeklySummary,
}

fn rounded_cpc(ad_spend: f64, clicks: u64) -> f64 {
    if clicks > 0 {
        (ad_spend / clicks as f64).round()
    } else {
        0.0
    }
}

/// 네이버 주간 데이터 집계
pub fn aggregate_naver_weekly(data: &[NaverWeeklyRecord]) -> WeeklySummary {
    let impressions: u64 = data.iter().map(|row| row.impressions).sum();
    let clicks: u64 = data.iter().map(|row| row.clicks).sum();
    let ad_spend: f64 = data.iter().map(|row| row.total_cost).sum();

    WeeklySummary {
        scope: WeeklyScope::Naver,
        impressions,
        clicks,
        cpc: rounded_cpc(ad_spend, clicks),
        ad_spend,
        ga_conversions: 0,
        real_inquiries: 0,
        cpa: 0.0,
        pmax_spend: 0.0,
    }
}

/// 구글 주간 데이터 집계
pub fn aggregate_google_weekly(data: &[GoogleWeeklyRecord], pmax_spend: f64) -> WeeklySummary {
    let impressions: u64 = data.iter().map(|row| row.impressions).sum();
    let clicks: u64 = data.iter().map(|row| row.clicks).sum();
    let ad_spend: f64 = data.iter().map(|row| row.cost).sum();

    WeeklySummary {
        scope: WeeklyScope::Google,
        impressions,
        clicks,
        cpc: rounded_cpc(ad_spend, clicks),
        ad_spend,
        ga_conversions: 0,
        real_inquiries: 0,
        cpa: 0.0,
        pmax_spend,
    }
}

/// CPA = 광고비 / (GA전환수 + 실문의건수), 전환이 없으면 0
pub fn calculate_cpa(ad_spend: f64, ga_conversions: u64, real_inquiries: u64) -> f64 {
    let total_conversions = ga_conversions + real_inquiries;
    if total_conversions == 0 {
        return 0.0;
    }
    (ad_spend / total_conversions as f64).round()
}

/// 전체 주간 요약 생성
pub fn generate_weekly_summary(
    naver_data: &[NaverWeeklyRecord],
    google_data: &[GoogleWeeklyRecord],
    metrics: &ManualMetrics,
) -> WeeklyReport {
    let naver = aggregate_naver_weekly(naver_data);
    let google = aggregate_google_weekly(google_data, metrics.pmax_spend);

    let impressions = naver.impressions + google.impressions;
    let clicks = naver.clicks + google.clicks;
    let ad_spend = naver.ad_spend + google.ad_spend;

    let overall = WeeklySummary {
        scope: WeeklyScope::Overall,
        impressions,
        clicks,
        cpc: rounded_cpc(ad_spend, clicks),
        ad_spend,
        ga_conversions: metrics.ga_conversions,
        real_inquiries: metrics.real_inquiries,
        cpa: calculate_cpa(ad_spend, metrics.ga_conversions, metrics.real_inquiries),
        pmax_spend: metrics.pmax_spend,
    };

    WeeklyReport { overall, naver, google }
}
