//! [`QrContent`] から正規形のQRペイロード文字列を組み立てる。
//!
//! [`crate::domain::parser::classify`] が読む語彙と対になっている。

use crate::domain::content::QrContent;

/// 作成フローで暗号化方式が未入力のときに使う値
pub const DEFAULT_ENCRYPTION_TYPE: &str = "WPA";

pub fn format(content: &QrContent) -> String {
    match content {
        QrContent::Text { text } => text.clone(),
        QrContent::Url { url } => url.clone(),
        QrContent::Contact { name, phone, email } => {
            let mut parts = vec![format!("MECARD:N:{name}")];
            if let Some(phone) = non_empty(phone) {
                parts.push(format!("TEL:{phone}"));
            }
            if let Some(email) = non_empty(email) {
                parts.push(format!("EMAIL:{email}"));
            }
            parts.join(";") + ";"
        }
        QrContent::GeoLocation {
            latitude,
            longitude,
        } => format!("geo:{latitude},{longitude}"),
        QrContent::Wifi {
            ssid,
            password,
            encryption_type,
        } => format!(
            "WIFI:S:{ssid};T:{};P:{password};;",
            encryption_type.as_deref().unwrap_or_default()
        ),
        QrContent::Phone { phone_number } => format!("tel:{phone_number}"),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
