//! CLI 配置
//!
//! 日志配置：全局级别加上按阶段覆盖

use frame_config::Phase;
use tracing::Level;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub lexer: Option<Level>,
    pub reader: Option<Level>,
    pub store: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            lexer: None,
            reader: None,
            store: None,
        }
    }
}

impl LogConfig {
    pub fn new(global: Level) -> Self {
        Self {
            global,
            ..Self::default()
        }
    }

    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> Level {
        match phase {
            Phase::Lexer => self.lexer.unwrap_or(self.global),
            Phase::Reader => self.reader.unwrap_or(self.global),
            Phase::Store => self.store.unwrap_or(self.global),
        }
    }

    /// 应用 `phase=level` 形式的覆盖，如 `reader=trace`
    pub fn apply_override(&mut self, directive: &str) -> Result<(), String> {
        let (phase, level) = directive
            .split_once('=')
            .ok_or_else(|| format!("expected PHASE=LEVEL, got '{directive}'"))?;
        let level: Level = level
            .parse()
            .map_err(|_| format!("unknown log level '{level}'"))?;
        let slot = match phase {
            "lexer" => &mut self.lexer,
            "reader" => &mut self.reader,
            "store" => &mut self.store,
            other => return Err(format!("unknown phase '{other}'")),
        };
        *slot = Some(level);
        Ok(())
    }
}
