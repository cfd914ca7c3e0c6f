//! 游戏设置模块
//!
//! 提供设置数据结构和 JSON 持久化

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tictactoe_ai::Difficulty;

use crate::log::DEFAULT_LOG_FILE;

/// 游戏设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// AI 难度
    pub difficulty: Difficulty,
    /// 人类玩家名
    pub human_name: String,
    /// 是否将游戏日志写入文件
    pub log_to_file: bool,
    /// 日志文件路径
    pub log_file: PathBuf,
    /// 退出时自动保存未结束的棋局
    pub autosave: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            human_name: "玩家".to_string(),
            log_to_file: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            autosave: false,
        }
    }
}

impl GameSettings {
    /// 获取设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("tictactoe");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 从指定文件加载设置，失败时使用默认设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("已加载设置: {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("设置文件格式无效: {}，使用默认设置", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("无法读取设置文件: {}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 保存设置到默认位置
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("无法获取配置目录")?;
        self.save_to(&path)
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content).with_context(|| format!("写入设置文件失败: {:?}", path))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GameSettings::default();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.log_file, PathBuf::from("output.log"));
        assert!(!settings.log_to_file);
        assert!(!settings.autosave);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let settings = GameSettings {
            difficulty: Difficulty::Easy,
            human_name: "小明".to_string(),
            log_to_file: true,
            autosave: true,
            ..Default::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(GameSettings::load_from(&path), settings);
    }

    #[test]
    fn test_missing_or_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(GameSettings::load_from(&path), GameSettings::default());

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(GameSettings::load_from(&path), GameSettings::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "autosave": true }"#).unwrap();

        let settings = GameSettings::load_from(&path);
        assert!(settings.autosave);
        assert_eq!(settings.human_name, "玩家");
    }
}
