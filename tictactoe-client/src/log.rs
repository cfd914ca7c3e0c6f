//! 游戏日志服务
//!
//! 由宿主程序显式创建并以引用传给需要记录日志的组件。
//! 每条日志按追加顺序保存在内存中，同时转发给 `tracing`，可选写入日志文件。

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// 游戏事件使用的日志名
pub const GAME_LOGGER: &str = "GAME";

/// 默认日志文件名
pub const DEFAULT_LOG_FILE: &str = "output.log";

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// 级别名称
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// 日志条目
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// 记录时间
    pub timestamp: DateTime<Local>,
    /// 时间文本 `HH:MM:SS.mmm`
    pub timestamp_string: String,
    /// 级别
    pub level: LogLevel,
    /// 日志名（可选）
    pub logger_name: Option<String>,
    /// 原始消息
    pub message: String,
    /// 完整文本 `[时间] [级别] [日志名] 消息`
    pub full_text: String,
}

impl LogEntry {
    fn new(level: LogLevel, logger_name: Option<&str>, message: String) -> Self {
        let timestamp = Local::now();
        let timestamp_string = timestamp.format("%H:%M:%S%.3f").to_string();

        let mut full_text = format!("[{}] [{}] ", timestamp_string, level.name());
        if let Some(name) = logger_name {
            full_text.push_str(&format!("[{}] ", name));
        }
        full_text.push_str(&message);

        Self {
            timestamp,
            timestamp_string,
            level,
            logger_name: logger_name.map(str::to_string),
            message,
            full_text,
        }
    }
}

/// 游戏日志
#[derive(Debug, Default)]
pub struct GameLog {
    entries: Vec<LogEntry>,
    output_file: Option<File>,
}

impl GameLog {
    /// 创建仅保存在内存中的日志
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建同时追加写入文件的日志
    pub fn with_file(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("无法打开日志文件: {:?}", path))?;

        Ok(Self {
            entries: Vec::new(),
            output_file: Some(file),
        })
    }

    /// 写入一条日志
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.push(LogEntry::new(level, None, message.into()));
    }

    /// 写入一条带日志名的日志
    pub fn log_named(&mut self, logger: &str, level: LogLevel, message: impl Into<String>) {
        self.push(LogEntry::new(level, Some(logger), message.into()));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// 游戏事件（INFO）
    pub fn game_info(&mut self, message: impl Into<String>) {
        self.log_named(GAME_LOGGER, LogLevel::Info, message);
    }

    /// 游戏事件（WARN）
    pub fn game_warn(&mut self, message: impl Into<String>) {
        self.log_named(GAME_LOGGER, LogLevel::Warn, message);
    }

    /// 游戏事件（ERROR）
    pub fn game_error(&mut self, message: impl Into<String>) {
        self.log_named(GAME_LOGGER, LogLevel::Error, message);
    }

    fn push(&mut self, entry: LogEntry) {
        let logger = entry.logger_name.as_deref().unwrap_or("-");
        match entry.level {
            LogLevel::Info => tracing::info!(logger, "{}", entry.message),
            LogLevel::Warn => tracing::warn!(logger, "{}", entry.message),
            LogLevel::Error => tracing::error!(logger, "{}", entry.message),
        }

        if let Some(file) = self.output_file.as_mut() {
            if let Err(e) = writeln!(file, "{}", entry.full_text) {
                // 写失败后不再尝试写文件，内存日志继续工作
                tracing::warn!("写入日志文件失败: {}", e);
                self.output_file = None;
            }
        }

        self.entries.push(entry);
    }

    /// 按记录顺序遍历
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.entries.iter()
    }

    /// 全部日志
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// 最近的 n 条日志（按记录顺序）
    pub fn recent(&self, n: usize) -> &[LogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空内存中的日志（不影响日志文件）
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 是否正在写入日志文件
    pub fn has_file(&self) -> bool {
        self.output_file.is_some()
    }
}

impl<'a> IntoIterator for &'a GameLog {
    type Item = &'a LogEntry;
    type IntoIter = std::slice::Iter<'a, LogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
