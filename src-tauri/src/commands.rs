use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tauri::{AppHandle, State};

use qc_core::domain::draft::QrDraft;
use qc_core::domain::error::AppError;
use qc_core::domain::settings::AppSettings;
use qc_core::domain::types::{HistoryItem, HistoryKind};
use qc_core::usecase::app_service::AppService;

use crate::events::{self, emit_history_changed, ErrorPayload, HistoryChange, ERROR};

/// コマンドエラー型（Tauri の Result で使用）
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    App(#[from] AppError),
}

impl serde::Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

type CmdResult<T> = Result<T, CommandError>;

// --- Scan / Create ---

#[tauri::command]
pub fn scan_qr(app: AppHandle, service: State<'_, AppService>, raw: String) -> CmdResult<HistoryItem> {
    finish_scan(&app, service.scan(&raw))
}

/// ギャラリー画像の取り込み。`image` は base64（data URL でも可）
#[tauri::command]
pub fn scan_qr_image(
    app: AppHandle,
    service: State<'_, AppService>,
    image: String,
) -> CmdResult<HistoryItem> {
    let encoded = match image.split_once(";base64,") {
        Some((_, data)) => data,
        None => image.as_str(),
    };
    let result = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AppError::validation(format!("画像データが不正: {e}")))
        .and_then(|bytes| service.scan_image(&bytes));
    finish_scan(&app, result)
}

/// スキャン結果をイベントで通知する（失敗時は error イベント）
fn finish_scan(app: &AppHandle, result: Result<HistoryItem, AppError>) -> CmdResult<HistoryItem> {
    match result {
        Ok(item) => {
            emit_history_changed(app, item.id, HistoryChange::Inserted);
            Ok(item)
        }
        Err(e) => {
            events::emit_event(app, ERROR, ErrorPayload::from_error(&e, None));
            Err(e.into())
        }
    }
}

#[tauri::command]
pub fn create_qr(
    app: AppHandle,
    service: State<'_, AppService>,
    draft: QrDraft,
) -> CmdResult<HistoryItem> {
    let item = service.create(draft)?;
    emit_history_changed(&app, item.id, HistoryChange::Inserted);
    Ok(item)
}

// --- History ---

/// kind 省略時は設定の既定タブ
#[tauri::command]
pub fn get_history(
    service: State<'_, AppService>,
    kind: Option<HistoryKind>,
) -> CmdResult<Vec<HistoryItem>> {
    let kind = match kind {
        Some(kind) => kind,
        None => service.get_settings()?.default_history_tab,
    };
    Ok(service.history(kind)?)
}

#[tauri::command]
pub fn get_qr(service: State<'_, AppService>, id: i64) -> CmdResult<HistoryItem> {
    Ok(service.get_item(id)?)
}

#[tauri::command]
pub fn rename_qr(
    app: AppHandle,
    service: State<'_, AppService>,
    id: i64,
    title: String,
) -> CmdResult<HistoryItem> {
    let item = service.rename(id, &title)?;
    emit_history_changed(&app, id, HistoryChange::Updated);
    Ok(item)
}

#[tauri::command]
pub fn set_favourite(
    app: AppHandle,
    service: State<'_, AppService>,
    id: i64,
    is_favourite: bool,
) -> CmdResult<HistoryItem> {
    let item = service.set_favourite(id, is_favourite)?;
    emit_history_changed(&app, id, HistoryChange::Updated);
    Ok(item)
}

#[tauri::command]
pub fn toggle_favourite(app: AppHandle, service: State<'_, AppService>, id: i64) -> CmdResult<bool> {
    let is_favourite = service.toggle_favourite(id)?;
    emit_history_changed(&app, id, HistoryChange::Updated);
    Ok(is_favourite)
}

#[tauri::command]
pub fn delete_qr(app: AppHandle, service: State<'_, AppService>, id: i64) -> CmdResult<()> {
    service.delete(id)?;
    emit_history_changed(&app, id, HistoryChange::Deleted);
    Ok(())
}

// --- Image ---

/// `<img src>` にそのまま渡せる data URL
#[tauri::command]
pub fn render_qr_png(service: State<'_, AppService>, id: i64) -> CmdResult<String> {
    let png = service.render_png(id)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[tauri::command]
pub fn render_qr_svg(service: State<'_, AppService>, id: i64) -> CmdResult<String> {
    Ok(service.render_svg(id)?)
}

#[tauri::command]
pub fn export_qr_image(service: State<'_, AppService>, id: i64) -> CmdResult<String> {
    let path = service.export_image(id)?;
    Ok(path.to_string_lossy().to_string())
}

// --- Copy / Share ---

#[tauri::command]
pub fn copy_qr(service: State<'_, AppService>, id: i64) -> CmdResult<String> {
    Ok(service.copy_to_clipboard(id)?)
}

#[tauri::command]
pub fn share_qr(service: State<'_, AppService>, id: i64) -> CmdResult<String> {
    Ok(service.share_text(id)?)
}

// --- Settings ---

#[tauri::command]
pub fn get_settings(service: State<'_, AppService>) -> CmdResult<AppSettings> {
    Ok(service.get_settings()?)
}

#[tauri::command]
pub fn update_settings(service: State<'_, AppService>, settings: AppSettings) -> CmdResult<()> {
    service.update_settings(settings)?;
    Ok(())
}
