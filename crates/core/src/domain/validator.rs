//! 作成フォームの入力チェック（副作用なしの述語）

use std::sync::OnceLock;

use regex::Regex;

pub const ENCRYPTION_TYPES: [&str; 4] = ["WEP", "WPA", "WPA2-EAP", "NOPASS"];

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$";

const PHONE_PATTERN: &str = r"^(\+[0-9]+[\- .]*)?(\([0-9]+\)[\- .]*)?([0-9][0-9\- .]+[0-9])$";

const URL_PATTERN: &str = r"(?i)^((https?|rtsp)://)?([^\s:@/]+(:[^\s@/]*)?@)?((([a-z0-9]([a-z0-9\-]{0,61}[a-z0-9])?)\.)+[a-z]{2,63}|([0-9]{1,3}\.){3}[0-9]{1,3})(:[0-9]{1,5})?([/?#]\S*)?$";

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static pattern compiles"))
}

pub fn validate_email(email: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, EMAIL_PATTERN).is_match(email)
}

pub fn validate_phone_number(phone: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, PHONE_PATTERN).is_match(phone)
}

pub fn validate_url(url: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, URL_PATTERN).is_match(url)
}

pub fn validate_latitude(value: &str) -> bool {
    value
        .parse::<f64>()
        .is_ok_and(|lat| (-90.0..=90.0).contains(&lat))
}

pub fn validate_longitude(value: &str) -> bool {
    value
        .parse::<f64>()
        .is_ok_and(|lon| (-180.0..=180.0).contains(&lon))
}

pub fn validate_encryption_type(value: &str) -> bool {
    ENCRYPTION_TYPES.contains(&value.to_uppercase().as_str())
}
