use serde::{Deserialize, Serialize};

use crate::domain::formatter;
use crate::domain::types::QrKind;

/// QRペイロードの型付き表現
///
/// スキャン時は [`crate::domain::parser::classify`] が生成し、
/// 作成時はフォームの入力から組み立てる。構築後は変更しない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QrContent {
    Text {
        text: String,
    },
    Url {
        url: String,
    },
    Contact {
        name: String,
        phone: Option<String>,
        email: Option<String>,
    },
    GeoLocation {
        latitude: f64,
        longitude: f64,
    },
    Wifi {
        ssid: String,
        password: String,
        encryption_type: Option<String>,
    },
    Phone {
        phone_number: String,
    },
}

impl QrContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// 正規形のペイロード文字列（保存・QR画像生成に使う）
    pub fn raw_value(&self) -> String {
        formatter::format(self)
    }

    pub fn kind(&self) -> QrKind {
        match self {
            Self::Text { .. } => QrKind::Text,
            Self::Url { .. } => QrKind::Link,
            Self::Contact { .. } => QrKind::Contact,
            Self::GeoLocation { .. } => QrKind::GeoLocation,
            Self::Wifi { .. } => QrKind::Wifi,
            Self::Phone { .. } => QrKind::Phone,
        }
    }

    /// 詳細画面・共有用の表示テキスト
    pub fn formatted_content(&self) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Url { url } => url.clone(),
            Self::Contact { name, phone, email } => {
                let mut out = format!("{name}\n");
                if let Some(phone) = phone {
                    out.push_str(phone);
                    out.push('\n');
                }
                if let Some(email) = email {
                    out.push_str(email);
                }
                out
            }
            Self::GeoLocation {
                latitude,
                longitude,
            } => format!("{latitude}, {longitude}"),
            Self::Wifi {
                ssid,
                password,
                encryption_type,
            } => format!(
                "SSID: {ssid}\nPassword: {password}\nEncryption type: {}",
                encryption_type.as_deref().unwrap_or_default()
            ),
            Self::Phone { phone_number } => phone_number.clone(),
        }
    }
}
