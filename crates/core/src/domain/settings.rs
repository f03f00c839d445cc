use serde::{Deserialize, Serialize};

use crate::domain::types::HistoryKind;

/// アプリケーション設定
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// QR画像の最小辺（px）
    pub qr_image_size: u32,
    /// クワイエットゾーン（余白）を付けるか
    pub qr_quiet_zone: bool,
    /// 画像の保存先（None = ピクチャフォルダ/QrCraft）
    pub export_dir: Option<String>,
    /// 履歴画面を開いたときのタブ
    pub default_history_tab: HistoryKind,
    /// コピー時に生データではなく表示用テキストを使う
    pub copy_formatted: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            qr_image_size: 512,
            qr_quiet_zone: true,
            export_dir: None,
            default_history_tab: HistoryKind::Scanned,
            copy_formatted: false,
        }
    }
}
