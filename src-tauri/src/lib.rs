mod commands;
mod events;

use qc_core::infra::storage::Storage;
use qc_core::usecase::app_service::AppService;

/// DB パスを決める（QC_DB_PATH があれば優先）
fn resolve_db_path() -> String {
    std::env::var("QC_DB_PATH").unwrap_or_else(|_| {
        let dir = dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("QrCraft");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("データディレクトリ作成失敗 {}: {e}", dir.display());
        }
        dir.join("qr_craft.db").to_string_lossy().to_string()
    })
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let db_path = resolve_db_path();
    let storage = Storage::open(&db_path).expect("SQLite の初期化に失敗しました");
    let app_service = AppService::new(storage);

    tauri::Builder::default()
        .plugin(tauri_plugin_log::Builder::default().build())
        .manage(app_service)
        .invoke_handler(tauri::generate_handler![
            commands::scan_qr,
            commands::scan_qr_image,
            commands::create_qr,
            commands::get_history,
            commands::get_qr,
            commands::rename_qr,
            commands::set_favourite,
            commands::toggle_favourite,
            commands::delete_qr,
            commands::render_qr_png,
            commands::render_qr_svg,
            commands::export_qr_image,
            commands::copy_qr,
            commands::share_qr,
            commands::get_settings,
            commands::update_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
