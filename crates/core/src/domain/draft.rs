use serde::Deserialize;

use crate::domain::content::QrContent;
use crate::domain::error::AppError;
use crate::domain::formatter::DEFAULT_ENCRYPTION_TYPE;
use crate::domain::validator;

/// 作成フォームの入力（未検証のまま受け取る）
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QrDraft {
    Text {
        text: String,
    },
    Link {
        url: String,
    },
    Contact {
        name: String,
        #[serde(default)]
        phone: String,
        #[serde(default)]
        email: String,
    },
    Phone {
        phone_number: String,
    },
    GeoLocation {
        latitude: String,
        longitude: String,
    },
    Wifi {
        ssid: String,
        password: String,
        #[serde(default)]
        encryption_type: String,
    },
}

impl QrDraft {
    /// 入力チェックを通過したものだけを [`QrContent`] にする
    pub fn into_content(self) -> Result<QrContent, AppError> {
        match self {
            QrDraft::Text { text } => {
                let text = required(&text, "テキスト")?;
                Ok(QrContent::text(text))
            }
            QrDraft::Link { url } => Ok(QrContent::Url {
                url: normalize_link(&url)?,
            }),
            QrDraft::Contact { name, phone, email } => {
                let name = required(&name, "名前")?;
                ensure_no_separator(&name, "名前")?;
                let phone = optional(&phone);
                let email = optional(&email);
                if phone.is_none() && email.is_none() {
                    return Err(AppError::validation("電話番号かメールアドレスが必要です"));
                }
                if let Some(ref p) = phone {
                    ensure_phone(p)?;
                }
                if let Some(ref e) = email {
                    if !validator::validate_email(e) {
                        return Err(AppError::validation(format!("メールアドレスが不正: {e}")));
                    }
                }
                Ok(QrContent::Contact { name, phone, email })
            }
            QrDraft::Phone { phone_number } => {
                let phone_number = required(&phone_number, "電話番号")?;
                ensure_phone(&phone_number)?;
                Ok(QrContent::Phone { phone_number })
            }
            QrDraft::GeoLocation {
                latitude,
                longitude,
            } => {
                let (lat, lon) = (latitude.trim(), longitude.trim());
                if !validator::validate_latitude(lat) {
                    return Err(AppError::validation(format!("緯度が不正: {lat}")));
                }
                if !validator::validate_longitude(lon) {
                    return Err(AppError::validation(format!("経度が不正: {lon}")));
                }
                let latitude = lat
                    .parse()
                    .map_err(|e| AppError::validation(format!("緯度が不正: {e}")))?;
                let longitude = lon
                    .parse()
                    .map_err(|e| AppError::validation(format!("経度が不正: {e}")))?;
                Ok(QrContent::GeoLocation {
                    latitude,
                    longitude,
                })
            }
            QrDraft::Wifi {
                ssid,
                password,
                encryption_type,
            } => {
                let ssid = required(&ssid, "SSID")?;
                ensure_no_separator(&ssid, "SSID")?;
                let password = required(&password, "パスワード")?;
                ensure_no_separator(&password, "パスワード")?;
                let encryption_type = match encryption_type.trim() {
                    "" => DEFAULT_ENCRYPTION_TYPE.to_string(),
                    t if validator::validate_encryption_type(t) => t.to_uppercase(),
                    t => {
                        return Err(AppError::validation(format!("暗号化方式が不正: {t}")));
                    }
                };
                Ok(QrContent::Wifi {
                    ssid,
                    password,
                    encryption_type: Some(encryption_type),
                })
            }
        }
    }
}

fn required(value: &str, field: &str) -> Result<String, AppError> {
    optional(value).ok_or_else(|| AppError::validation(format!("{field}は必須です")))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// スキームを http/https の小文字に揃える。スキーム無しは https://
fn normalize_link(url: &str) -> Result<String, AppError> {
    let url = url.trim();
    let normalized = match url.split_once("://") {
        Some((scheme, rest)) if is_scheme(scheme) => {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(AppError::validation(format!(
                    "リンクは http/https のみ対応: {url}"
                )));
            }
            format!("{scheme}://{rest}")
        }
        _ => format!("https://{url}"),
    };
    if !validator::validate_url(&normalized) {
        return Err(AppError::validation(format!("URLが不正: {url}")));
    }
    Ok(normalized)
}

fn is_scheme(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// MECARD / WIFI の区切り文字 `;` は値に含められない
fn ensure_no_separator(value: &str, field: &str) -> Result<(), AppError> {
    if value.contains(';') {
        Err(AppError::validation(format!("{field}に「;」は使えません")))
    } else {
        Ok(())
    }
}

fn ensure_phone(phone: &str) -> Result<(), AppError> {
    if validator::validate_phone_number(phone) {
        Ok(())
    } else {
        Err(AppError::validation(format!("電話番号が不正: {phone}")))
    }
}
