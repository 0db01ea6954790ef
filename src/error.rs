use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 后端 API 调用错误
    Api(ApiError),
    /// 文件操作错误
    File(FileError),
    /// 导出 PDF 错误
    Export(ExportError),
    /// 用户输入错误
    Input(InputError),
    /// 配置错误
    Config(ConfigError),
    /// 终端输入输出错误
    Io(std::io::Error),
    /// 其他错误
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Api(e) => write!(f, "API错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Export(e) => write!(f, "导出错误: {}", e),
            AppError::Input(e) => write!(f, "输入错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Io(e) => write!(f, "输入输出错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Api(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Export(e) => Some(e),
            AppError::Input(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Io(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 后端 API 调用错误
#[derive(Debug)]
pub enum ApiError {
    /// 网络请求失败（连接失败、DNS 等）
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求超过截止时间
    Timeout { endpoint: String, timeout_secs: u64 },
    /// 非 2xx 响应
    BadResponse {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// 后端以 `{"error": ...}` 报告失败
    BackendRejected { endpoint: String, message: String },
    /// 响应 JSON 解析失败或缺少字段
    JsonParseFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 答案数量与题目数量不一致
    AnswerCountMismatch { questions: usize, answers: usize },
    /// 响应到达时对应的题目已被重新生成
    StaleResponse { endpoint: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "API请求失败 ({}): {}", endpoint, source)
            }
            ApiError::Timeout {
                endpoint,
                timeout_secs,
            } => {
                write!(f, "API请求超时 ({}), 超过 {} 秒", endpoint, timeout_secs)
            }
            ApiError::BadResponse {
                endpoint,
                status,
                body,
            } => {
                write!(
                    f,
                    "API返回错误响应 ({}): status={}, body={:?}",
                    endpoint, status, body
                )
            }
            ApiError::BackendRejected { endpoint, message } => {
                write!(f, "后端拒绝请求 ({}): {}", endpoint, message)
            }
            ApiError::JsonParseFailed { endpoint, source } => {
                write!(f, "JSON解析失败 ({}): {}", endpoint, source)
            }
            ApiError::AnswerCountMismatch { questions, answers } => {
                write!(
                    f,
                    "答案数量 {} 与题目数量 {} 不一致",
                    answers, questions
                )
            }
            ApiError::StaleResponse { endpoint } => {
                write!(f, "响应已过期，题目已重新生成 ({})", endpoint)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound { path: String },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            FileError::NotFound { .. } => None,
        }
    }
}

/// 导出 PDF 错误
#[derive(Debug)]
pub enum ExportError {
    /// PDF 内容流编码或文档序列化失败
    PdfBuildFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::PdfBuildFailed { source } => write!(f, "生成PDF失败: {}", source),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::PdfBuildFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 用户输入错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// 题目数量不是正整数
    InvalidQuestionCount { value: String },
    /// 分值不在 {1, 2, 3, 5} 中
    InvalidMarks { value: String },
    /// 难度不在 {easy, medium, hard} 中
    InvalidDifficulty { value: String },
    /// 未知命令
    UnknownCommand { command: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::InvalidQuestionCount { value } => {
                write!(f, "题目数量必须是正整数: '{}'", value)
            }
            InputError::InvalidMarks { value } => {
                write!(f, "分值必须是 1, 2, 3 或 5: '{}'", value)
            }
            InputError::InvalidDifficulty { value } => {
                write!(f, "难度必须是 easy, medium 或 hard: '{}'", value)
            }
            InputError::UnknownCommand { command } => write!(f, "未知命令: '{}'", command),
        }
    }
}

impl std::error::Error for InputError {}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件读取失败
    FileReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 配置文件解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 配置值非法
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileReadFailed { path, source } => {
                write!(f, "读取配置文件失败 ({}): {}", path, source)
            }
            ConfigError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "配置项 {} 的值 '{}' 非法", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileReadFailed { source, .. }
            | ConfigError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        AppError::Api(err)
    }
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        AppError::Input(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Export(ExportError::PdfBuildFailed {
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 将 reqwest 错误归类为超时或普通请求失败
    pub fn from_reqwest(
        endpoint: impl Into<String>,
        timeout_secs: u64,
        err: reqwest::Error,
    ) -> Self {
        let endpoint = endpoint.into();
        if err.is_timeout() {
            AppError::Api(ApiError::Timeout {
                endpoint,
                timeout_secs,
            })
        } else {
            AppError::Api(ApiError::RequestFailed {
                endpoint,
                source: Box::new(err),
            })
        }
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 是否为网络层面的失败（传输失败、超时、非 2xx）
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Api(
                ApiError::RequestFailed { .. }
                    | ApiError::Timeout { .. }
                    | ApiError::BadResponse { .. }
            )
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_message_contains_value() {
        let err = AppError::from(InputError::InvalidQuestionCount {
            value: "abc".to_string(),
        });
        assert!(err.to_string().contains("abc"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_transport_classification() {
        let timeout = AppError::Api(ApiError::Timeout {
            endpoint: "/questions".to_string(),
            timeout_secs: 5,
        });
        let bad = AppError::Api(ApiError::BadResponse {
            endpoint: "/answer".to_string(),
            status: 500,
            body: String::new(),
        });
        let rejected = AppError::Api(ApiError::BackendRejected {
            endpoint: "/answer".to_string(),
            message: "PDF not found".to_string(),
        });

        assert!(timeout.is_transport());
        assert!(bad.is_transport());
        assert!(!rejected.is_transport());
    }

    #[test]
    fn test_io_error_is_not_a_file_error() {
        let err = AppError::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "stdout closed",
        ));
        assert!(matches!(err, AppError::Io(_)));
        assert_eq!(err.to_string(), "输入输出错误: stdout closed");
    }

    #[test]
    fn test_mismatch_message() {
        let err = ApiError::AnswerCountMismatch {
            questions: 3,
            answers: 2,
        };
        assert_eq!(err.to_string(), "答案数量 2 与题目数量 3 不一致");
    }
}
