//! 生のQRペイロード文字列を [`QrContent`] に分類する。
//!
//! 判定は先頭一致の順序付きルールで、最初に一致したものを採用する。
//! どのルールにも当てはまらない、または形式が壊れている場合は
//! 元の文字列をそのまま `Text` として返す（失敗しない）。

use crate::domain::content::QrContent;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";
const VCARD_PREFIX: &str = "BEGIN:VCARD";
const MECARD_PREFIX: &str = "MECARD:";
const WIFI_PREFIX: &str = "WIFI:";
const TEL_PREFIX: &str = "TEL";
const GEO_PREFIX: &str = "GEO:";

pub const UNKNOWN_SSID: &str = "Unknown SSID";
pub const NO_PASSWORD: &str = "No password";
pub const NO_ENCRYPTION: &str = "No encryption";

/// 生ペイロードを分類する
pub fn classify(raw: &str) -> QrContent {
    let raw = raw.trim();

    if raw.starts_with(HTTP_PREFIX) || raw.starts_with(HTTPS_PREFIX) {
        QrContent::Url {
            url: raw.to_string(),
        }
    } else if raw.starts_with(VCARD_PREFIX) {
        parse_contact(raw, raw.split('\n'))
    } else if starts_with_ignore_case(raw, MECARD_PREFIX) {
        parse_contact(raw, raw[MECARD_PREFIX.len()..].split(';'))
    } else if starts_with_ignore_case(raw, WIFI_PREFIX) {
        parse_wifi(&raw[WIFI_PREFIX.len()..])
    } else if starts_with_ignore_case(raw, TEL_PREFIX) {
        // "tel:" / "TEL:" の4文字を落とす
        QrContent::Phone {
            phone_number: drop_chars(raw, TEL_PREFIX.len() + 1).trim().to_string(),
        }
    } else if starts_with_ignore_case(raw, GEO_PREFIX) {
        parse_geo(raw)
    } else {
        QrContent::text(raw)
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// 先頭から `n` 文字（バイトではなく文字単位）を除いた残り
fn drop_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

/// 先頭に一致した最初の値だけを採用する
fn take_first(slot: &mut Option<String>, part: &str, prefix: &str) {
    if slot.is_none() {
        if let Some(value) = part.strip_prefix(prefix) {
            *slot = Some(value.trim().to_string());
        }
    }
}

// BEGIN:VCARD
// VERSION:3.0
// N:Olivia Schmidt
// TEL:+1 (555) 284-7390
// EMAIL:olivia.schmidt@example.com
// END:VCARD
//
// MECARD:N:Olivia Schmidt;TEL:+1 (555) 284-7390;EMAIL:olivia.schmidt@example.com;
fn parse_contact<'a>(raw: &str, parts: impl Iterator<Item = &'a str>) -> QrContent {
    let mut name = None;
    let mut phone = None;
    let mut email = None;

    for part in parts {
        take_first(&mut name, part, "N:");
        take_first(&mut phone, part, "TEL:");
        take_first(&mut email, part, "EMAIL:");
    }

    match name {
        Some(name) if phone.is_some() || email.is_some() => QrContent::Contact {
            name,
            phone: Some(phone.unwrap_or_default()),
            email: Some(email.unwrap_or_default()),
        },
        _ => {
            log::warn!("連絡先ペイロードの形式が不正: {raw}");
            QrContent::text(raw)
        }
    }
}

// WIFI:S:DevHub_WiFi;T:WPA;P:QrCraft2025;H:false;;
fn parse_wifi(body: &str) -> QrContent {
    let mut ssid = None;
    let mut password = None;
    let mut encryption_type = None;

    for part in body.split(';') {
        take_first(&mut ssid, part, "S:");
        take_first(&mut password, part, "P:");
        take_first(&mut encryption_type, part, "T:");
    }

    QrContent::Wifi {
        ssid: ssid.unwrap_or_else(|| UNKNOWN_SSID.to_string()),
        password: password.unwrap_or_else(|| NO_PASSWORD.to_string()),
        encryption_type: Some(encryption_type.unwrap_or_else(|| NO_ENCRYPTION.to_string())),
    }
}

// geo:50.4501,30.5234
fn parse_geo(raw: &str) -> QrContent {
    let coordinates: Vec<&str> = raw[GEO_PREFIX.len()..].split(',').collect();

    if let [lat, lon] = coordinates.as_slice() {
        if let (Some(latitude), Some(longitude)) = (parse_coordinate(lat), parse_coordinate(lon)) {
            return QrContent::GeoLocation {
                latitude,
                longitude,
            };
        }
    }

    log::warn!("GEOペイロードの形式が不正: {raw}");
    QrContent::text(raw)
}

fn parse_coordinate(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_is_text() {
        for raw in [
            "hello world",
            "Meeting notes:\n- Review UI components",
            "ftp://files.example.com",
            "",
        ] {
            assert_eq!(classify(raw), QrContent::text(raw));
        }
    }

    #[test]
    fn test_https_keeps_full_url() {
        assert_eq!(
            classify("https://example.com"),
            QrContent::Url {
                url: "https://example.com".into()
            }
        );
    }

    #[test]
    fn test_http_keeps_full_url() {
        assert_eq!(
            classify("http://pl-coding.mymemberspot.io"),
            QrContent::Url {
                url: "http://pl-coding.mymemberspot.io".into()
            }
        );
    }

    #[test]
    fn test_scheme_match_is_case_sensitive() {
        assert_eq!(classify("HTTPS://EXAMPLE.COM"), QrContent::text("HTTPS://EXAMPLE.COM"));
    }

    #[test]
    fn test_input_is_trimmed() {
        assert_eq!(
            classify("  https://example.com \n"),
            QrContent::Url {
                url: "https://example.com".into()
            }
        );
    }

    #[test]
    fn test_tel() {
        assert_eq!(
            classify("tel:+1234567890"),
            QrContent::Phone {
                phone_number: "+1234567890".into()
            }
        );
        assert_eq!(
            classify("TEL:+49 170 1234567"),
            QrContent::Phone {
                phone_number: "+49 170 1234567".into()
            }
        );
    }

    #[test]
    fn test_tel_without_colon_drops_four_chars() {
        assert_eq!(
            classify("TEL 555"),
            QrContent::Phone {
                phone_number: "555".into()
            }
        );
        assert_eq!(
            classify("tel"),
            QrContent::Phone {
                phone_number: String::new()
            }
        );
    }

    #[test]
    fn test_geo() {
        assert_eq!(
            classify("GEO:50.4501,30.5234"),
            QrContent::GeoLocation {
                latitude: 50.4501,
                longitude: 30.5234
            }
        );
        assert_eq!(
            classify("geo:-33.8688,151.2093"),
            QrContent::GeoLocation {
                latitude: -33.8688,
                longitude: 151.2093
            }
        );
    }

    #[test]
    fn test_geo_without_range_check() {
        assert_eq!(
            classify("geo:120,500"),
            QrContent::GeoLocation {
                latitude: 120.0,
                longitude: 500.0
            }
        );
    }

    #[test]
    fn test_geo_fallbacks() {
        for raw in [
            "GEO:abc,30.5",
            "GEO:50.1",
            "GEO:1,2,3",
            "geo:NaN,1",
            "geo:inf,1",
            "geo:",
        ] {
            assert_eq!(classify(raw), QrContent::text(raw), "{raw}");
        }
    }

    #[test]
    fn test_wifi() {
        assert_eq!(
            classify("WIFI:S:Home;T:WPA;P:secret;;"),
            QrContent::Wifi {
                ssid: "Home".into(),
                password: "secret".into(),
                encryption_type: Some("WPA".into()),
            }
        );
    }

    #[test]
    fn test_wifi_defaults() {
        assert_eq!(
            classify("WIFI:S:Home;;"),
            QrContent::Wifi {
                ssid: "Home".into(),
                password: NO_PASSWORD.into(),
                encryption_type: Some(NO_ENCRYPTION.into()),
            }
        );
        assert_eq!(
            classify("wifi:"),
            QrContent::Wifi {
                ssid: UNKNOWN_SSID.into(),
                password: NO_PASSWORD.into(),
                encryption_type: Some(NO_ENCRYPTION.into()),
            }
        );
    }

    #[test]
    fn test_wifi_first_match_wins() {
        let content = classify("WIFI:S:first;S:second;T:WEP;H:false;P:pw;;");
        assert_eq!(
            content,
            QrContent::Wifi {
                ssid: "first".into(),
                password: "pw".into(),
                encryption_type: Some("WEP".into()),
            }
        );
    }

    #[test]
    fn test_vcard() {
        let raw = "BEGIN:VCARD\nVERSION:3.0\nN:Olivia Schmidt\nTEL:+1 (555) 284-7390\nEMAIL:olivia.schmidt@example.com\nEND:VCARD";
        assert_eq!(
            classify(raw),
            QrContent::Contact {
                name: "Olivia Schmidt".into(),
                phone: Some("+1 (555) 284-7390".into()),
                email: Some("olivia.schmidt@example.com".into()),
            }
        );
    }

    #[test]
    fn test_vcard_crlf_and_missing_email() {
        let raw = "BEGIN:VCARD\r\nN:Jane\r\nTEL:123\r\nEND:VCARD";
        assert_eq!(
            classify(raw),
            QrContent::Contact {
                name: "Jane".into(),
                phone: Some("123".into()),
                email: Some(String::new()),
            }
        );
    }

    #[test]
    fn test_vcard_without_name_is_text() {
        let raw = "BEGIN:VCARD\nTEL:123\nEND:VCARD";
        assert_eq!(classify(raw), QrContent::text(raw));
    }

    #[test]
    fn test_vcard_name_only_is_text() {
        let raw = "BEGIN:VCARD\nN:Jane\nEND:VCARD";
        assert_eq!(classify(raw), QrContent::text(raw));
    }

    #[test]
    fn test_mecard() {
        assert_eq!(
            classify("MECARD:N:Jane;TEL:123;EMAIL:jane@example.com;"),
            QrContent::Contact {
                name: "Jane".into(),
                phone: Some("123".into()),
                email: Some("jane@example.com".into()),
            }
        );
    }

    #[test]
    fn test_mecard_without_contact_fields_is_text() {
        let raw = "MECARD:N:Jane;;";
        assert_eq!(classify(raw), QrContent::text(raw));
    }

    #[test]
    fn test_multibyte_text_is_safe() {
        let raw = "テレビ番組";
        assert_eq!(classify(raw), QrContent::text(raw));
        assert_eq!(
            classify("TEL:電話"),
            QrContent::Phone {
                phone_number: "電話".into()
            }
        );
    }
}
