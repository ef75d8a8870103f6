use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use configparser::ini::Ini;
use serde::{Deserialize, Serialize};
use log::*;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub report: ReportConfig,
    pub weekly: WeeklyConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportConfig {
    pub output_dir: String,
    pub daily_title: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WeeklyConfig {
    pub title: String,
    pub subtitle: String,
    pub issue_note: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            report: ReportConfig {
                output_dir: String::from("reports"),
                daily_title: String::from("ChatGPT 교육 광고 - 주간 성과 리포트"),
            },
            weekly: WeeklyConfig {
                title: String::from("지피티코리아 주간 광고운영내역"),
                subtitle: String::from("네이버 건매수, 구글 건매수"),
                issue_note: String::from("- 일광고비 7만원 이하 운영 (PC 1,300 / 모바일 1,800)"),
            },
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
    pub config: AppConfig,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Result<Self> {
        let mut manager = ConfigManager {
            config_path,
            config: AppConfig::default(),
        };

        if manager.config_path.exists() {
            manager.load()?;
        } else {
            manager.create_default()?;
            manager.save()?;
        }

        Ok(manager)
    }

    pub fn load(&mut self) -> Result<()> {
        let config_str = fs::read_to_string(&self.config_path)?;
        let mut config_ini = Ini::new();
        config_ini
            .read(config_str)
            .map_err(|e| anyhow!("Failed to read config string: {}", e))?;

        let mut app_config = AppConfig::default();

        if let Some(output_dir) = config_ini.get("report", "output_dir") {
            app_config.report.output_dir = output_dir;
        }
        if let Some(daily_title) = config_ini.get("report", "daily_title") {
            app_config.report.daily_title = daily_title;
        }

        if let Some(title) = config_ini.get("weekly", "title") {
            app_config.weekly.title = title;
        }
        if let Some(subtitle) = config_ini.get("weekly", "subtitle") {
            app_config.weekly.subtitle = subtitle;
        }
        if let Some(issue_note) = config_ini.get("weekly", "issue_note") {
            app_config.weekly.issue_note = issue_note;
        }

        self.config = app_config;
        self.validate()?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let mut config_ini = Ini::new();

        config_ini.set("report", "output_dir", Some(self.config.report.output_dir.clone()));
        config_ini.set("report", "daily_title", Some(self.config.report.daily_title.clone()));

        config_ini.set("weekly", "title", Some(self.config.weekly.title.clone()));
        config_ini.set("weekly", "subtitle", Some(self.config.weekly.subtitle.clone()));
        config_ini.set("weekly", "issue_note", Some(self.config.weekly.issue_note.clone()));

        config_ini
            .write(&self.config_path)
            .map_err(|e| anyhow!("Failed to write config to file: {}", e))?;
        Ok(())
    }

    pub fn create_default(&mut self) -> Result<()> {
        self.config = AppConfig::default();
        info!(
            "{} 파일이 생성되었습니다. 리포트 제목과 출력 경로를 필요에 맞게 수정하세요.",
            self.config_path.display()
        );
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.config.report.output_dir.trim().is_empty() {
            warn!(
                "{}의 output_dir 값이 비어있어 현재 디렉토리에 리포트를 저장합니다.",
                self.config_path.display()
            );
        }
        Ok(())
    }

    pub fn output_dir(&self) -> PathBuf {
        let trimmed = self.config.report.output_dir.trim();
        if trimmed.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(trimmed)
        }
    }
}
