//! 测试用的本地后端
//!
//! 与真实后端相同的三个接口，记录收到的请求体

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 后端对某个接口的预设行为
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    /// 指定状态码与原始文本响应体
    Text(StatusCode, &'static str),
    Delay(Duration, Value),
}

#[derive(Clone)]
pub struct MockBackend {
    pub questions_reply: Arc<Mutex<Reply>>,
    pub answer_reply: Arc<Mutex<Reply>>,
    pub upload_reply: Arc<Mutex<Reply>>,
    pub question_bodies: Arc<Mutex<Vec<Value>>>,
    pub answer_bodies: Arc<Mutex<Vec<Value>>>,
    /// (content-type, body)
    pub uploads: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            questions_reply: Arc::new(Mutex::new(Reply::Json(json!({ "questions": [] })))),
            answer_reply: Arc::new(Mutex::new(Reply::Json(json!({ "answers": [] })))),
            upload_reply: Arc::new(Mutex::new(Reply::Json(
                json!({ "message": "PDF uploaded successfully" }),
            ))),
            question_bodies: Arc::default(),
            answer_bodies: Arc::default(),
            uploads: Arc::default(),
        }
    }
}

impl MockBackend {
    pub fn questions(self, reply: Reply) -> Self {
        *self.questions_reply.lock().unwrap() = reply;
        self
    }

    pub fn answers(self, reply: Reply) -> Self {
        *self.answer_reply.lock().unwrap() = reply;
        self
    }

    pub fn upload(self, reply: Reply) -> Self {
        *self.upload_reply.lock().unwrap() = reply;
        self
    }

    /// 在随机端口启动，返回 base url
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/questions", post(questions))
            .route("/answer", post(answer))
            .route("/upload", post(upload))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }
}

async fn respond(reply: Reply) -> Response {
    match reply {
        Reply::Json(value) => Json(value).into_response(),
        Reply::Status(status) => (status, "backend failure").into_response(),
        Reply::Text(status, body) => (status, body).into_response(),
        Reply::Delay(delay, value) => {
            tokio::time::sleep(delay).await;
            Json(value).into_response()
        }
    }
}

async fn questions(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Response {
    mock.question_bodies.lock().unwrap().push(body);
    let reply = mock.questions_reply.lock().unwrap().clone();
    respond(reply).await
}

async fn answer(State(mock): State<MockBackend>, Json(body): Json<Value>) -> Response {
    mock.answer_bodies.lock().unwrap().push(body);
    let reply = mock.answer_reply.lock().unwrap().clone();
    respond(reply).await
}

async fn upload(State(mock): State<MockBackend>, headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    mock.uploads
        .lock()
        .unwrap()
        .push((content_type, body.to_vec()));
    let reply = mock.upload_reply.lock().unwrap().clone();
    respond(reply).await
}

/// 一个未被监听的本地地址
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
