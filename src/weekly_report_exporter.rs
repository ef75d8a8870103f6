use anyhow::Result;

use crate::config_manager::WeeklyConfig;
use crate::insight_generator::format_thousands;
use crate::weekly_analytics_engine::{WeeklyReport, WeeklySummary};
use crate::weekly_data_parser::PrevWeekRow;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 주간 리포트 파일명: 지피티코리아_주간광고운영내역_MM.DD-MM.DD.csv
pub fn weekly_report_filename(last_week_range: &str) -> String {
    format!("지피티코리아_주간광고운영내역_{}.csv", last_week_range.replace('~', "-"))
}

/// 전체/네이버/구글 세 섹션으로 구성된 주간 운영내역 생성
///
/// GA전환수/실문의건수/CPA/퍼맥스광고비 열은 전체 섹션에만 보여준다.
/// 지지난주 실적이 입력된 경우 전체 섹션의 지지난주 행에 채워 넣는다.
pub fn generate_weekly_report(
    report: &WeeklyReport,
    prev_week: Option<&PrevWeekRow>,
    last_week_range: &str,
    prev_week_range: &str,
    config: &WeeklyConfig,
) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(&mut buffer);

        writer.write_record([config.title.as_str()])?;
        writer.write_record([config.subtitle.as_str()])?;
        writer.write_record([""])?;
        writer.write_record(["운영이슈"])?;
        writer.write_record([config.issue_note.as_str()])?;
        writer.write_record([""])?;

        write_section(
            &mut writer,
            "1. 전체",
            &report.overall,
            last_week_range,
            prev_week_range,
            prev_week,
            true,
        )?;
        writer.write_record([""])?;
        write_section(
            &mut writer,
            "2. 네이버",
            &report.naver,
            last_week_range,
            prev_week_range,
            None,
            false,
        )?;
        writer.write_record([""])?;
        write_section(
            &mut writer,
            "3. 구글",
            &report.google,
            last_week_range,
            prev_week_range,
            None,
            false,
        )?;

        writer.flush()?;
    }
    Ok(buffer)
}

fn write_section<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    title: &str,
    summary: &WeeklySummary,
    last_week_range: &str,
    prev_week_range: &str,
    prev_week: Option<&PrevWeekRow>,
    show_all_columns: bool,
) -> Result<()> {
    writer.write_record([title])?;

    if show_all_columns {
        writer.write_record([
            "주", "노출", "클릭", "CPC", "광고비", "GA전환수", "실문의건수", "CPA", "퍼맥스광고비",
        ])?;
    } else {
        writer.write_record([
            "주", "노출", "클릭", "CPC", "광고비", "GA전환수", "실문의건수", "CPA",
        ])?;
    }

    // 지난주 데이터 행
    let mut last_week_values = vec![
        last_week_range.to_string(),
        format_thousands(summary.impressions as f64),
        format_thousands(summary.clicks as f64),
        format_thousands(summary.cpc),
        format_thousands(summary.ad_spend),
    ];
    if show_all_columns {
        last_week_values.push(summary.ga_conversions.to_string());
        last_week_values.push(summary.real_inquiries.to_string());
        last_week_values.push(format_thousands(summary.cpa));
        last_week_values.push(format_thousands(summary.pmax_spend));
    } else {
        last_week_values.extend([String::new(), String::new(), String::new()]);
    }
    writer.write_record(&last_week_values)?;

    // 지지난주 데이터 행
    let column_count = if show_all_columns { 9 } else { 8 };
    let prev_week_values = match prev_week {
        Some(prev) => {
            let label = if prev.date_range.is_empty() {
                prev_week_range.to_string()
            } else {
                prev.date_range.clone()
            };
            vec![
                label,
                format_thousands(prev.impressions as f64),
                format_thousands(prev.clicks as f64),
                format_thousands(prev.cpc),
                format_thousands(prev.ad_spend),
                prev.ga_conversions.to_string(),
                prev.real_inquiries.to_string(),
                format_thousands(prev.cpa),
                format_thousands(prev.pmax_spend),
            ]
        }
        None => {
            let mut values = vec![prev_week_range.to_string()];
            values.resize(column_count, String::new());
            values
        }
    };
    writer.write_record(&prev_week_values)?;

    // 전주 비교 행 (수기 작성용 공백)
    let mut comparison_values = vec!["전주 비교".to_string()];
    comparison_values.resize(column_count, String::new());
    writer.write_record(&comparison_values)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weekly_analytics_engine::generate_weekly_summary;
    use crate::weekly_data_parser::{
        parse_google_weekly, parse_manual_metrics, parse_naver_weekly, parse_prev_week_row,
    };

    fn sample_report() -> WeeklyReport {
        let naver = parse_naver_weekly(
            "캠페인\t광고그룹\t키워드\t일별\t노출수\t클릭수\t평균클릭비용\t총비용\t평균노출순위
MO_TOP10_지피티\tTOP10_MO\t챗GPT강의\t2026.01.05.\t854\t2\t830\t1660\t3.1",
        )
        .unwrap();
        let google = parse_google_weekly(
            "키워드 실적
캠페인\t광고그룹\t검색 키워드\t일\t통화 코드\t키워드 최대 CPC\t노출수\t클릭수\t비용\t평균 CPC
MO_TOP 10_지피티\tTOP10_MO\tAI활용교육\t2026-01-05\tKRW\t10000\t24\t1\t979\t979",
        )
        .unwrap();
        let metrics = parse_manual_metrics("3", "2", "48733");
        generate_weekly_summary(&naver, &google, &metrics)
    }

    fn render(prev_week: Option<&PrevWeekRow>) -> String {
        let config = WeeklyConfig {
            title: "지피티코리아 주간 광고운영내역".to_string(),
            subtitle: "네이버 건매수, 구글 건매수".to_string(),
            issue_note: "- 일광고비 7만원 이하 운영 (PC 1,300 / 모바일 1,800)".to_string(),
        };
        let bytes = generate_weekly_report(
            &sample_report(),
            prev_week,
            "01.05~01.09",
            "12.29~01.02",
            &config,
        )
        .unwrap();
        assert_eq!(&bytes[..3], &UTF8_BOM);
        String::from_utf8(bytes[3..].to_vec()).unwrap()
    }

    #[test]
    fn report_contains_three_sections() {
        let text = render(None);
        assert!(text.contains("1. 전체"));
        assert!(text.contains("2. 네이버"));
        assert!(text.contains("3. 구글"));
        assert!(text.contains("운영이슈"));
        assert!(text.contains("퍼맥스광고비"));
        assert!(text.contains("전주 비교"));
    }

    #[test]
    fn prev_week_row_fills_overall_section() {
        let prev = parse_prev_week_row("12.29~01.02\t5000\t20\t900\t18000\t4\t1\t3600\t40000").unwrap();
        let text = render(Some(&prev));
        assert!(text.contains("18,000"));
        assert!(text.contains("3,600"));
    }

    #[test]
    fn prev_week_row_defaults_to_date_only() {
        let text = render(None);
        let prev_lines: Vec<&str> = text
            .lines()
            .filter(|line| line.starts_with("12.29~01.02"))
            .collect();
        assert_eq!(prev_lines.len(), 3);
        for line in prev_lines {
            assert_eq!(line.trim_end_matches(','), "12.29~01.02");
        }
    }

    #[test]
    fn filename_replaces_tilde() {
        assert_eq!(
            weekly_report_filename("01.05~01.09"),
            "지피티코리아_주간광고운영내역_01.05-01.09.csv"
        );
    }
}
