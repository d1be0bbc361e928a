//! In-process stand-in for the Gemini and VEO REST endpoints.

#![allow(dead_code)]

use std::{
    collections::VecDeque,
    io::Cursor,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};

pub const API_KEY: &str = "test-key";
pub const OPERATION: &str = "operations/op-1";
pub const VIDEO_BYTES: &[u8] = b"\x00\x00\x00\x18ftypmp42 fake clip";

/// A canned reply for one image request.
#[derive(Debug, Clone)]
pub enum ImageReply {
    Png(u32, u32),
    Status(u16, &'static str),
    TextOnly,
}

#[derive(Default)]
pub struct MockState {
    /// Replies for generateContent, in order; the last one repeats.
    pub image_replies: Mutex<VecDeque<ImageReply>>,
    /// Polls answered with `done: false` before the operation completes.
    pub pending_polls: Mutex<u32>,
    /// Whether the finished operation points at a download URI instead of inline bytes.
    pub video_by_uri: Mutex<bool>,
    pub base_url: Mutex<String>,
    pub requests: Mutex<Vec<Recorded>>,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
    pub body: Option<Value>,
}

impl MockState {
    pub fn hits(&self, suffix: &str) -> Vec<Recorded> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path.ends_with(suffix))
            .cloned()
            .collect()
    }
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Starts the mock on an ephemeral local port.
pub async fn start(state: MockState) -> MockServer {
    let state = Arc::new(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    *state.base_url.lock().unwrap() = base_url.clone();

    let app = Router::new().fallback(handle).with_state(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    MockServer { base_url, state }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([30, 60, 90]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let api_key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        api_key: api_key.clone(),
        body: serde_json::from_slice(&body).ok(),
    });

    if api_key.as_deref() != Some(API_KEY) {
        return error(401, "API key not valid");
    }

    if method == Method::POST && path.ends_with(":generateContent") {
        image_reply(&state)
    } else if method == Method::POST && path.ends_with(":predictLongRunning") {
        Json(json!({ "name": OPERATION })).into_response()
    } else if method == Method::GET && path == format!("/v1beta/{OPERATION}") {
        operation_reply(&state)
    } else if method == Method::GET && path == "/download/clip.mp4" {
        VIDEO_BYTES.into_response()
    } else {
        error(404, "not found")
    }
}

fn image_reply(state: &MockState) -> Response {
    let reply = {
        let mut replies = state.image_replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        }
    };
    match reply.unwrap_or(ImageReply::Png(64, 36)) {
        ImageReply::Png(w, h) => Json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Here is the edited frame." },
                        { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(png(w, h)) } }
                    ]
                }
            }]
        }))
        .into_response(),
        ImageReply::Status(status, message) => error(status, message),
        ImageReply::TextOnly => Json(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": "I can't do that." }] } }],
            "promptFeedback": { "blockReason": "OTHER" }
        }))
        .into_response(),
    }
}

fn operation_reply(state: &MockState) -> Response {
    {
        let mut pending = state.pending_polls.lock().unwrap();
        if *pending > 0 {
            *pending -= 1;
            return Json(json!({ "name": OPERATION, "done": false })).into_response();
        }
    }
    let video = if *state.video_by_uri.lock().unwrap() {
        let base = state.base_url.lock().unwrap().clone();
        json!({ "uri": format!("{base}/download/clip.mp4") })
    } else {
        json!({ "bytesBase64Encoded": STANDARD.encode(VIDEO_BYTES) })
    };
    Json(json!({
        "name": OPERATION,
        "done": true,
        "response": {
            "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
            "generateVideoResponse": { "generatedSamples": [{ "video": video }] }
        }
    }))
    .into_response()
}

fn error(status: u16, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": { "code": status.as_u16(), "message": message, "status": "MOCK" }
        })),
    )
        .into_response()
}
