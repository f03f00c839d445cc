mod directory;

pub use directory::DirectoryImageSaver;

use std::path::PathBuf;

use crate::domain::error::AppError;

/// 画像保存先 trait
pub trait ImageSaver: Send + Sync {
    /// PNGバイト列を `name` で保存し、保存先パスを返す
    fn save(&self, png: &[u8], name: &str) -> Result<PathBuf, AppError>;
    fn name(&self) -> &str;
}

/// ファイル名に使えない文字を落とす。空なら既定名。
pub fn sanitize_file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "qr_code".to_string()
    } else {
        stem.to_string()
    }
}
