use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::UTF_16LE;
use log::*;

/// 붙여넣기 대신 파일로 전달된 원본 텍스트를 읽는다.
///
/// 네이버/구글 보고서 다운로드 파일은 UTF-16LE(BOM 포함)로 저장되는 경우가 있어
/// BOM을 보고 인코딩을 판별한다. 그 외에는 UTF-8로 취급한다.
pub fn read_input_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("입력 파일을 읽을 수 없습니다: {}", path.display()))?;

    let text = if bytes.starts_with(&[0xFF, 0xFE]) {
        debug!("UTF-16LE BOM 감지: {}", path.display());
        let (decoded, _, had_errors) = UTF_16LE.decode(&bytes[2..]);
        if had_errors {
            warn!("UTF-16LE 디코딩 중 일부 문자가 대체되었습니다: {}", path.display());
        }
        decoded.into_owned()
    } else if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(&bytes[3..]).into_owned()
    } else {
        String::from_utf8_lossy(&bytes).into_owned()
    };

    Ok(text.trim_start_matches('\u{feff}').to_string())
}
