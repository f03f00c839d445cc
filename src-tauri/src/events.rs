use serde::Serialize;
use tauri::{AppHandle, Emitter};

use qc_core::domain::error::{AppError, ErrorCode};

/// イベント名定数
pub const HISTORY_CHANGED: &str = "history_changed";
pub const ERROR: &str = "error";

/// 統一イベント送信関数
pub fn emit_event<S: Serialize + Clone>(app: &AppHandle, event_name: &str, payload: S) {
    if let Err(e) = app.emit(event_name, payload) {
        log::error!("イベント送信失敗 [{event_name}]: {e}");
    }
}

/// 履歴の変更種別
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryChange {
    Inserted,
    Updated,
    Deleted,
}

/// history_changed ペイロード
#[derive(Debug, Clone, Serialize)]
pub struct HistoryChangedPayload {
    pub id: i64,
    pub change: HistoryChange,
    pub timestamp: String,
}

/// error ペイロード
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ErrorPayload {
    pub fn from_error(err: &AppError, id: Option<i64>) -> Self {
        Self {
            code: err.code,
            message: err.message.clone(),
            recoverable: err.recoverable,
            id,
        }
    }
}

pub fn emit_history_changed(app: &AppHandle, id: i64, change: HistoryChange) {
    emit_event(
        app,
        HISTORY_CHANGED,
        HistoryChangedPayload {
            id,
            change,
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
    );
}
