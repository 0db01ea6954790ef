//! 题目生成后端客户端
//!
//! 封装所有与后端 `/upload`、`/questions`、`/answer` 的调用逻辑

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::{AnswerRequest, AnswersResponse, QuestionRequest, QuestionsResponse};
use crate::utils::logging::log_request;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const QUESTIONS_ENDPOINT: &str = "/questions";
pub const ANSWER_ENDPOINT: &str = "/answer";

/// 后端能力
///
/// 会话只依赖这三个调用，测试中可以替换为内存实现
pub trait QuestionBackend {
    /// 上传文档，成功时返回后端的提示信息（如果有）
    fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = AppResult<Option<String>>> + Send;

    fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> impl Future<Output = AppResult<Vec<String>>> + Send;

    fn generate_answers(
        &self,
        request: &AnswerRequest,
    ) -> impl Future<Output = AppResult<Vec<String>>> + Send;
}

/// 后端 HTTP 客户端
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    timeout_secs: u64,
}

impl BackendClient {
    /// 创建新的后端客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_base_url(&config.backend_base_url, config.request_timeout_secs)
    }

    /// 使用自定义地址创建客户端
    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Other(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// 发送请求并解析响应
    ///
    /// 非 2xx、`{"error": ...}` 响应体以及字段缺失都会变成对应的 `ApiError`
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let body = self.send_raw(endpoint, request).await?;
        parse_body(endpoint, &body)
    }

    /// 发送请求，只检查传输与状态码，返回原始响应体
    async fn send_raw(&self, endpoint: &str, request: RequestBuilder) -> AppResult<String> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::from_reqwest(endpoint, self.timeout_secs, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::from_reqwest(endpoint, self.timeout_secs, e))?;

        debug!("{} 响应状态: {}, 长度: {}", endpoint, status, body.len());

        if !status.is_success() {
            warn!("{} 返回非成功状态 {}", endpoint, status);
            return Err(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(body)
    }
}

/// 解析后端响应体
fn parse_body<T: DeserializeOwned>(endpoint: &str, body: &str) -> AppResult<T> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| AppError::json_parse_failed(endpoint, e))?;

    if let Some(message) = value.get("error") {
        let message = message
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| message.to_string());
        return Err(ApiError::BackendRejected {
            endpoint: endpoint.to_string(),
            message,
        }
        .into());
    }

    serde_json::from_value(value).map_err(|e| AppError::json_parse_failed(endpoint, e))
}

/// 解析上传响应体
///
/// 任何 2xx 都算成功：空响应体或非 JSON 响应体都接受，
/// 只有带 `error` 字段的 JSON 视为后端拒绝
fn parse_upload_body(body: &str) -> AppResult<Option<String>> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        debug!("{} 响应体不是 JSON，忽略", UPLOAD_ENDPOINT);
        return Ok(None);
    };

    if let Some(message) = value.get("error") {
        let message = message
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| message.to_string());
        return Err(ApiError::BackendRejected {
            endpoint: UPLOAD_ENDPOINT.to_string(),
            message,
        }
        .into());
    }

    Ok(value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string))
}

impl QuestionBackend for BackendClient {
    async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AppResult<Option<String>> {
        log_request(
            UPLOAD_ENDPOINT,
            &format!("{} ({} 字节)", file_name, bytes.len()),
        );

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| AppError::from_reqwest(UPLOAD_ENDPOINT, self.timeout_secs, e))?;
        let form = Form::new().part("file", part);

        let request = self.http.post(self.url(UPLOAD_ENDPOINT)).multipart(form);
        let body = self.send_raw(UPLOAD_ENDPOINT, request).await?;

        parse_upload_body(&body)
    }

    async fn generate_questions(&self, request: &QuestionRequest) -> AppResult<Vec<String>> {
        log_request(
            QUESTIONS_ENDPOINT,
            &format!(
                "topic={} num_questions={} marks={} difficulty={}",
                request.topic, request.num_questions, request.marks, request.difficulty
            ),
        );

        let builder = self.http.post(self.url(QUESTIONS_ENDPOINT)).json(request);
        let response: QuestionsResponse = self.send(QUESTIONS_ENDPOINT, builder).await?;

        Ok(response.questions)
    }

    async fn generate_answers(&self, request: &AnswerRequest) -> AppResult<Vec<String>> {
        log_request(
            ANSWER_ENDPOINT,
            &format!("{} 道题, marks={}", request.questions.len(), request.marks),
        );

        let builder = self.http.post(self.url(ANSWER_ENDPOINT)).json(request);
        let response: AnswersResponse = self.send(ANSWER_ENDPOINT, builder).await?;

        Ok(response.answers)
    }
}
