use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::content::QrContent;
use crate::domain::parser;

/// カスタムタイトルの最大文字数
pub const TITLE_MAX_LEN: usize = 32;

const LABEL_FORMAT: &str = "%d %b %Y, %H:%M";

/// 履歴レコード（スキャン/生成したQRの永続化単位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 未保存の間は 0
    pub id: i64,
    pub custom_title: Option<String>,
    pub raw_data: String,
    pub is_favourite: bool,
    pub is_scanned: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl HistoryRecord {
    pub fn scanned(raw_data: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(raw_data.into(), true, now)
    }

    pub fn generated(raw_data: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new(raw_data.into(), false, now)
    }

    fn new(raw_data: String, is_scanned: bool, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            custom_title: None,
            raw_data,
            is_favourite: false,
            is_scanned,
            created_at: now,
            last_updated_at: now,
        }
    }

    pub fn kind(&self) -> HistoryKind {
        if self.is_scanned {
            HistoryKind::Scanned
        } else {
            HistoryKind::Generated
        }
    }
}

/// 履歴タブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    Scanned,
    Generated,
}

/// QRの種別（作成画面の選択肢・一覧のアイコン）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrKind {
    Text,
    Link,
    Contact,
    Phone,
    GeoLocation,
    Wifi,
}

impl QrKind {
    pub const ALL: [QrKind; 6] = [
        QrKind::Text,
        QrKind::Link,
        QrKind::Contact,
        QrKind::Phone,
        QrKind::GeoLocation,
        QrKind::Wifi,
    ];

    pub fn title(self) -> &'static str {
        match self {
            QrKind::Text => "Text",
            QrKind::Link => "Link",
            QrKind::Contact => "Contact",
            QrKind::Phone => "Phone Number",
            QrKind::GeoLocation => "Geolocation",
            QrKind::Wifi => "Wi-Fi",
        }
    }
}

/// 一覧・詳細画面に渡す表示モデル
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub id: i64,
    pub custom_title: Option<String>,
    pub kind: QrKind,
    pub kind_title: String,
    pub created_at_label: String,
    pub last_updated_label: String,
    pub is_scanned: bool,
    pub is_favourite: bool,
    pub content: QrContent,
    pub formatted_content: String,
}

impl HistoryItem {
    pub fn from_record(record: &HistoryRecord) -> Self {
        let content = parser::classify(&record.raw_data);
        let kind = content.kind();
        Self {
            id: record.id,
            custom_title: record.custom_title.clone(),
            kind,
            kind_title: kind.title().to_string(),
            created_at_label: format_label(record.created_at),
            last_updated_label: format_label(record.last_updated_at),
            is_scanned: record.is_scanned,
            is_favourite: record.is_favourite,
            formatted_content: content.formatted_content(),
            content,
        }
    }

    /// タイトル未設定なら種別名
    pub fn display_title(&self) -> &str {
        self.custom_title.as_deref().unwrap_or(&self.kind_title)
    }
}

fn format_label(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(LABEL_FORMAT).to_string()
}

/// タイトル入力を正規化する。空白のみなら None。
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(TITLE_MAX_LEN).collect())
}
