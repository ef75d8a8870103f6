use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analytics_engine::{KeywordPerformance, KeywordTrend, PlatformComparison, SummaryMetrics};

/// 인사이트 단계
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum InsightLevel {
    #[serde(rename = "즉시조치")]
    Urgent,
    #[serde(rename = "적극적기회")]
    Opportunity,
    #[serde(rename = "긍정적지표")]
    Positive,
}

impl fmt::Display for InsightLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsightLevel::Urgent => "즉시조치",
            InsightLevel::Opportunity => "적극적기회",
            InsightLevel::Positive => "긍정적지표",
        };
        write!(f, "{}", label)
    }
}

/// 우선순위
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum InsightPriority {
    #[serde(rename = "높음")]
    High,
    #[serde(rename = "중간")]
    Medium,
    #[serde(rename = "낮음")]
    Low,
}

impl fmt::Display for InsightPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsightPriority::High => "높음",
            InsightPriority::Medium => "중간",
            InsightPriority::Low => "낮음",
        };
        write!(f, "{}", label)
    }
}

/// 자동 생성된 인사이트 하나
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Insight {
    pub level: InsightLevel,
    #[serde(rename = "이유")]
    pub reason: String,
    #[serde(rename = "제안액션")]
    pub action: String,
    #[serde(rename = "기간")]
    pub horizon: String,
    #[serde(rename = "우선순위")]
    pub priority: InsightPriority,
}

/// 반올림 후 천단위 쉼표를 넣은 문자열 (₩ 표기용)
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// 데이터 분석을 통해 인사이트 자동 생성
///
/// 규칙은 아래 고정 순서대로 평가되며 각 규칙은 독립적으로 0개 또는 1개의
/// 인사이트를 추가한다. 중복 제거나 우선순위 재정렬은 하지 않는다.
pub fn generate_insights(
    metrics: &SummaryMetrics,
    keywords: &[KeywordPerformance],
    platforms: &[PlatformComparison],
) -> Vec<Insight> {
    let mut insights = Vec::new();

    // 1. 즉시 조치 필요 항목
    // CPC 급등
    if metrics.cpc_change > 50.0 {
        insights.push(Insight {
            level: InsightLevel::Urgent,
            reason: format!(
                "당일 CPC ₩{}로 전일 대비 {:.1}% 급등",
                format_thousands(metrics.avg_cpc),
                metrics.cpc_change
            ),
            action: "입찰가 조정 또는 품질평가수 확인".to_string(),
            horizon: "즉시".to_string(),
            priority: InsightPriority::High,
        });
    }

    // CTR 급락 (데이터가 전혀 없는 0은 저조로 치지 않음)
    if metrics.avg_ctr > 0.0 && metrics.avg_ctr < 0.2 {
        insights.push(Insight {
            level: InsightLevel::Urgent,
            reason: format!("전반적 CTR {:.2}% 저조", metrics.avg_ctr),
            action: "광고 문구 및 타겟 전략 재검토".to_string(),
            horizon: "1주일 이내".to_string(),
            priority: InsightPriority::High,
        });
    }

    // 특정 키워드 CTR 급락 (첫 번째 해당 키워드만)
    if let Some(low_ctr) = keywords.iter().find(|k| k.record.ctr < 0.15 && k.record.clicks > 5) {
        insights.push(Insight {
            level: InsightLevel::Urgent,
            reason: format!("{} CTR {:.2}% 저조", low_ctr.record.keyword, low_ctr.record.ctr),
            action: "광고 문구 및 랜딩 재검토".to_string(),
            horizon: "즉시".to_string(),
            priority: InsightPriority::High,
        });
    }

    // 2. 적극적 기회
    // 신규 키워드 성과 모니터링
    let new_keywords: Vec<&KeywordPerformance> = keywords
        .iter()
        .filter(|k| k.trend == KeywordTrend::New && k.record.clicks > 0)
        .collect();
    if let Some(first_new) = new_keywords.first() {
        insights.push(Insight {
            level: InsightLevel::Opportunity,
            reason: format!("신규 키워드 성과 모니터링 ({}개)", new_keywords.len()),
            action: format!("'{}' 등 신규 키워드 추적", first_new.record.keyword),
            horizon: "2주".to_string(),
            priority: InsightPriority::Medium,
        });
    }

    // 매체 집중도
    if platforms.len() >= 2 {
        let top_platform = &platforms[0];
        if top_platform.share > 75.0 {
            insights.push(Insight {
                level: InsightLevel::Opportunity,
                reason: format!("{} 매체 집중도 {:.0}%", top_platform.platform, top_platform.share),
                action: format!("{} 확장 기회 탐색", platforms[1].platform),
                horizon: "1개월".to_string(),
                priority: InsightPriority::Medium,
            });
        }
    }

    // Performance Max 캠페인
    let has_perf_max = keywords.iter().any(|k| {
        let campaign = k.record.campaign.to_lowercase();
        campaign.contains("performance max") || campaign.contains("pmax")
    });
    if has_perf_max {
        insights.push(Insight {
            level: InsightLevel::Opportunity,
            reason: "Performance Max 캠페인 데이터 분석".to_string(),
            action: "전환 추적 설정 및 성과 분석 재구축".to_string(),
            horizon: "2주".to_string(),
            priority: InsightPriority::Medium,
        });
    }

    // 3. 긍정적 지표
    // 주간 광고비 감소
    if metrics.ad_spend_7day_change < -20.0 {
        insights.push(Insight {
            level: InsightLevel::Positive,
            reason: format!(
                "주간 광고비 {:.1}% 감소 - 효율성 개선 중",
                metrics.ad_spend_7day_change.abs()
            ),
            action: "현재 전략 유지".to_string(),
            horizon: "-".to_string(),
            priority: InsightPriority::Low,
        });
    }

    // 우수한 CPC 수준
    if metrics.avg_cpc < 1000.0 && metrics.avg_cpc > 0.0 {
        insights.push(Insight {
            level: InsightLevel::Positive,
            reason: format!(
                "평균 CPC ₩{} - 경쟁적 수준 유지",
                format_thousands(metrics.avg_cpc)
            ),
            action: "CPC 수준 유지".to_string(),
            horizon: "-".to_string(),
            priority: InsightPriority::Low,
        });
    }

    // 상위 키워드 우수 성과 (성과 점수 상위 3개 중 첫 번째 해당 키워드)
    if let Some(top_kw) = keywords
        .iter()
        .take(3)
        .find(|k| k.record.ctr > 1.0 || k.record.clicks > 10)
    {
        insights.push(Insight {
            level: InsightLevel::Positive,
            reason: format!(
                "'{}' 키워드 - {}에서 가장 높은 성과",
                top_kw.record.keyword, top_kw.record.platform
            ),
            action: "예산 배분 최적화".to_string(),
            horizon: "-".to_string(),
            priority: InsightPriority::Low,
        });
    }

    // Google 매체 점유율
    if let Some(google_platform) = platforms
        .iter()
        .find(|p| p.platform.to_lowercase().contains("google"))
    {
        if google_platform.share > 60.0 {
            insights.push(Insight {
                level: InsightLevel::Positive,
                reason: format!(
                    "Google 평균 CPC ₩{} - 경쟁적 있는 CPC 수준 유지",
                    format_thousands(google_platform.avg_cpc)
                ),
                action: "현재 수준 유지".to_string(),
                horizon: "-".to_string(),
                priority: InsightPriority::Low,
            });
        }
    }

    insights
}
