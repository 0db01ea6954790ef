use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AppResult, ConfigError};
use crate::models::{Difficulty, Marks};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端服务地址
    pub backend_base_url: String,
    /// 单次请求的截止时间（秒）
    pub request_timeout_secs: u64,
    /// 导出 PDF 的目录
    pub output_dir: PathBuf,
    /// 导出 PDF 的文件名
    pub export_file_name: String,
    // --- 表单初始值 ---
    pub default_num_questions: u32,
    pub default_marks: Marks,
    pub default_difficulty: Difficulty,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 120,
            output_dir: PathBuf::from("."),
            export_file_name: "ai_generated_questions.pdf".to_string(),
            default_num_questions: 5,
            default_marks: Marks::One,
            default_difficulty: Difficulty::Medium,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 先读取 TOML 配置文件（如果提供），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })?;
        Self::parse_toml(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Self::parse_toml(content, "<inline>")
    }

    fn parse_toml(content: &str, origin: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::TomlParseFailed {
            path: origin.to_string(),
            source: Box::new(e),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_num_questions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "default_num_questions".to_string(),
                value: "0".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            backend_base_url: std::env::var("QUIZ_BACKEND_URL").unwrap_or(self.backend_base_url),
            request_timeout_secs: std::env::var("QUIZ_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).filter(|v| *v > 0).unwrap_or(self.request_timeout_secs),
            output_dir: std::env::var("QUIZ_OUTPUT_DIR").map(PathBuf::from).unwrap_or(self.output_dir),
            export_file_name: std::env::var("QUIZ_EXPORT_FILE").unwrap_or(self.export_file_name),
            default_num_questions: std::env::var("QUIZ_DEFAULT_COUNT").ok().and_then(|v| v.parse().ok()).filter(|v| *v > 0).unwrap_or(self.default_num_questions),
            default_marks: std::env::var("QUIZ_DEFAULT_MARKS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.default_marks),
            default_difficulty: std::env::var("QUIZ_DEFAULT_DIFFICULTY").ok().and_then(|v| v.parse().ok()).unwrap_or(self.default_difficulty),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 导出文件的完整路径
    pub fn export_path(&self) -> PathBuf {
        self.output_dir.join(&self.export_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form_initial_values() {
        let config = Config::default();
        assert_eq!(config.backend_base_url, "http://localhost:8000");
        assert_eq!(config.default_num_questions, 5);
        assert_eq!(config.default_marks, Marks::One);
        assert_eq!(config.default_difficulty, Difficulty::Medium);
        assert_eq!(
            config.export_path(),
            PathBuf::from("./ai_generated_questions.pdf")
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            backend_base_url = "http://10.0.0.2:9000"
            default_marks = 3
            default_difficulty = "hard"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend_base_url, "http://10.0.0.2:9000");
        assert_eq!(config.default_marks, Marks::Three);
        assert_eq!(config.default_difficulty, Difficulty::Hard);
        assert_eq!(config.request_timeout_secs, 120);
    }

    #[test]
    fn test_invalid_toml_values_are_rejected() {
        assert!(Config::from_toml_str("default_marks = 4").is_err());
        assert!(Config::from_toml_str("default_num_questions = 0").is_err());
        assert!(Config::from_toml_str("request_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_toml_file(Path::new("/nonexistent/quiz.toml")).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Config(ConfigError::FileReadFailed { .. })
        ));
    }
}
