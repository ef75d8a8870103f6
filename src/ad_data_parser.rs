use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use log::*;

lazy_static! {
    // 천단위 구분 쉼표 및 내부 공백 제거용
    static ref NUMBER_CLEANUP_REGEX: Regex = Regex::new(r"[,\s]").unwrap();
}

/// 일일 리포트 한 행 (매체 × 키워드 조합)
///
/// 퍼센트 컬럼(CVR, CTR)은 파싱 시점에 숫자로 변환해서 보관하고,
/// "1.23%" 형태의 문자열은 렌더링 단계에서만 만든다.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AdRecord {
    #[serde(rename = "매체")]
    pub platform: String,
    #[serde(rename = "키워드")]
    pub keyword: String,
    #[serde(rename = "당일광고비")]
    pub today_spend: f64,
    #[serde(rename = "전일광고비")]
    pub prev_day_spend: f64,
    #[serde(rename = "최근7일광고비")]
    pub last7_spend: f64,
    #[serde(rename = "이전7일광고비")]
    pub prev7_spend: f64,
    #[serde(rename = "당월광고비")]
    pub current_month_spend: f64,
    #[serde(rename = "전월광고비")]
    pub prev_month_spend: f64,
    #[serde(rename = "당일CPC")]
    pub today_cpc: f64,
    #[serde(rename = "전일CPC")]
    pub prev_day_cpc: f64,
    #[serde(rename = "최근7일CPC")]
    pub last7_cpc: f64,
    #[serde(rename = "이전7일CPC")]
    pub prev7_cpc: f64,
    #[serde(rename = "당월CPC")]
    pub current_month_cpc: f64,
    #[serde(rename = "전월CPC")]
    pub prev_month_cpc: f64,
    #[serde(rename = "CVR")]
    pub cvr: f64,
    #[serde(rename = "캠페인")]
    pub campaign: String,
    #[serde(rename = "광고그룹")]
    pub ad_group: String,
    #[serde(rename = "노출수")]
    pub impressions: u64,
    #[serde(rename = "클릭수")]
    pub clicks: u64,
    #[serde(rename = "CTR")]
    pub ctr: f64,
}

/// 텍스트를 숫자로 변환 (쉼표 제거, 파싱 실패 시 0)
pub fn clean_number(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return 0.0;
    }
    let cleaned = NUMBER_CLEANUP_REGEX.replace_all(trimmed, "");
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// "1.23%" 형태의 퍼센트 문자열을 숫자로 변환
pub fn clean_percent(value: &str) -> f64 {
    clean_number(value.trim().trim_end_matches('%'))
}

fn text_field(values: &[&str], index: usize) -> String {
    values.get(index).map(|v| v.to_string()).unwrap_or_default()
}

fn number_field(values: &[&str], index: usize) -> f64 {
    values.get(index).map(|v| clean_number(v)).unwrap_or(0.0)
}

fn percent_field(values: &[&str], index: usize) -> f64 {
    values.get(index).map(|v| clean_percent(v)).unwrap_or(0.0)
}

fn count_field(values: &[&str], index: usize) -> u64 {
    number_field(values, index).max(0.0) as u64
}

/// 탭 또는 쉼표로 구분된 일일 광고 데이터를 파싱
pub fn parse_ad_data(text: &str) -> Result<Vec<AdRecord>> {
    if text.trim().is_empty() {
        return Err(anyhow!("데이터가 비어있습니다."));
    }

    let lines: Vec<&str> = text.trim().lines().collect();
    if lines.len() < 2 {
        return Err(anyhow!("최소 2줄(헤더 + 데이터)이 필요합니다."));
    }

    // 구분자 감지 (탭 우선, 없으면 쉼표)
    let delimiter = if lines[0].contains('\t') { '\t' } else { ',' };

    let mut data = Vec::new();

    // 헤더를 건너뛰고 데이터 행 처리
    for (i, raw_line) in lines.iter().enumerate().skip(1) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let values: Vec<&str> = line.split(delimiter).map(|v| v.trim()).collect();

        // "종합합계", "필터합계" 같은 합계 행은 건너뛰기
        if !values[0].is_empty() && (values[0].contains("합계") || values[0] == "-") {
            continue;
        }

        // 최소한의 데이터가 있는지 확인
        if values.len() < 5 {
            warn!("행 {} 파싱 실패: 필드 수 부족 ({}개)", i + 1, values.len());
            continue;
        }

        data.push(AdRecord {
            platform: text_field(&values, 0),
            keyword: text_field(&values, 1),
            today_spend: number_field(&values, 2),
            prev_day_spend: number_field(&values, 3),
            last7_spend: number_field(&values, 4),
            prev7_spend: number_field(&values, 5),
            current_month_spend: number_field(&values, 6),
            prev_month_spend: number_field(&values, 7),
            today_cpc: number_field(&values, 8),
            prev_day_cpc: number_field(&values, 9),
            last7_cpc: number_field(&values, 10),
            prev7_cpc: number_field(&values, 11),
            current_month_cpc: number_field(&values, 12),
            prev_month_cpc: number_field(&values, 13),
            cvr: percent_field(&values, 14),
            campaign: text_field(&values, 15),
            ad_group: text_field(&values, 16),
            impressions: count_field(&values, 17),
            clicks: count_field(&values, 18),
            ctr: percent_field(&values, 19),
        });
    }

    if data.is_empty() {
        return Err(anyhow!("파싱된 데이터가 없습니다. 데이터 형식을 확인해주세요."));
    }

    Ok(data)
}

/// 퍼센트 변화율 계산
///
/// 이전 값이 0이면 현재 값이 있을 때 +100%, 없으면 0%로 취급한다.
pub fn calculate_change_rate(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    (current - previous) / previous * 100.0
}

// 원본 입력 폼에 내장되어 있던 3행짜리 샘플 데이터 (테스트 공용)
#[cfg(test)]
pub(crate) const SAMPLE_DAILY_DATA: &str = "매체\t키워드(소재)\t당일(광고비)\t전일(광고비)\t최근 7일(광고비)\t이전 7일(광고비)\t당월(광고비)\t전월(광고비)\t당일(CPC)\t전일(CPC)\t최근 7일(CPC)\t이전 7일(CPC)\t당월(CPC)\t전월(CPC)\tCVR\t캠페인\t광고그룹\t노출수\t클릭수\tCTR
Google\tCHATGPT강의\t16,058\t17,335\t73,650\t99,037\t33,393\t582,955\t973\t1,083\t877\t812\t1,077\t700\t0.00%\tMO_TOP 10_지피티\tTOP10_MO\t1,570\t15\t0.96%
Naver\t챗GPT강의\t10,318\t6,160\t26,598\t23,320\t16,478\t173,437\t1,042\t1,232\t1,108\t686\t1,177\t458\t0.00%\tMO_TOP10_지피티\tTOP10_MO\t4,825\t9\t0.19%
Google\t챗GPT교육\t2,741\t1,420\t18,639\t27,972\t4,161\t102,227\t1,246\t1,420\t1,331\t1,216\t1,387\t1,175\t0.00%\tPC_TOP 10_지피티\tTOP10_PC\t20\t2\t10.00%";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_number_strips_thousands_separators() {
        assert_eq!(clean_number("12,345"), 12345.0);
        assert_eq!(clean_number("1,234,567.89"), 1234567.89);
    }

    #[test]
    fn clean_number_defaults_to_zero() {
        assert_eq!(clean_number("-"), 0.0);
        assert_eq!(clean_number(""), 0.0);
        assert_eq!(clean_number("abc"), 0.0);
    }

    #[test]
    fn clean_percent_parses_formatted_percent() {
        assert_eq!(clean_percent("1.23%"), 1.23);
        assert_eq!(clean_percent("10.00%"), 10.0);
        assert_eq!(clean_percent("-"), 0.0);
    }

    #[test]
    fn change_rate_edge_cases() {
        assert_eq!(calculate_change_rate(0.0, 0.0), 0.0);
        assert_eq!(calculate_change_rate(100.0, 0.0), 100.0);
        assert_eq!(calculate_change_rate(50.0, 100.0), -50.0);
    }

    #[test]
    fn parses_sample_daily_data() {
        let data = parse_ad_data(SAMPLE_DAILY_DATA).unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0].platform, "Google");
        assert_eq!(data[0].keyword, "CHATGPT강의");
        assert_eq!(data[0].today_spend, 16058.0);
        assert_eq!(data[0].impressions, 1570);
        assert_eq!(data[0].clicks, 15);
        assert_eq!(data[0].ctr, 0.96);
        assert_eq!(data[2].ctr, 10.0);
    }

    #[test]
    fn detects_comma_delimiter() {
        let text = "매체,키워드,당일,전일,7일,이전7일\nGoogle,키워드A,100,200,300,400";
        let data = parse_ad_data(text).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].today_spend, 100.0);
        assert_eq!(data[0].prev7_spend, 400.0);
        // 없는 컬럼은 전부 0
        assert_eq!(data[0].clicks, 0);
        assert_eq!(data[0].ctr, 0.0);
    }

    #[test]
    fn excludes_summary_rows() {
        let text = format!("{}\n종합합계\t\t29,117\t24,915\t118,887\t150,329", SAMPLE_DAILY_DATA);
        let data = parse_ad_data(&text).unwrap();
        assert_eq!(data.len(), 3);
        assert!(data.iter().all(|r| !r.platform.contains("합계")));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_ad_data("").is_err());
        assert!(parse_ad_data("   \n  ").is_err());
    }

    #[test]
    fn rejects_header_only_input() {
        let err = parse_ad_data("매체\t키워드\t당일\t전일\t7일").unwrap_err();
        assert!(err.to_string().contains("최소 2줄"));
    }

    #[test]
    fn rejects_input_with_no_surviving_rows() {
        let err = parse_ad_data("매체\t키워드\t당일\t전일\t7일\n종합합계\t-\t100\t200\t300").unwrap_err();
        assert!(err.to_string().contains("파싱된 데이터가 없습니다"));
    }
}
