use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use super::{sanitize_file_stem, ImageSaver};
use crate::domain::error::AppError;

/// 同名ファイルがある場合に試す連番の上限
const MAX_SUFFIX: u32 = 1000;

/// ディレクトリへのPNG保存
pub struct DirectoryImageSaver {
    dir: PathBuf,
}

impl DirectoryImageSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// ピクチャフォルダ/QrCraft（取得できなければカレント）
    pub fn default_dir() -> PathBuf {
        dirs::picture_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("QrCraft")
    }

    fn candidate(&self, stem: &str, n: u32) -> PathBuf {
        if n == 0 {
            self.dir.join(format!("{stem}.png"))
        } else {
            self.dir.join(format!("{stem}-{n}.png"))
        }
    }
}

impl ImageSaver for DirectoryImageSaver {
    fn save(&self, png: &[u8], name: &str) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::export(format!("保存先の作成に失敗 {}: {e}", self.dir.display()))
        })?;

        let stem = sanitize_file_stem(name);
        for n in 0..=MAX_SUFFIX {
            let path = self.candidate(&stem, n);
            // create_new で既存ファイルの上書きを避ける
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(AppError::export(format!(
                        "ファイル作成失敗 {}: {e}",
                        path.display()
                    )))
                }
            };
            file.write_all(png).map_err(|e| {
                AppError::export(format!("書き込み失敗 {}: {e}", path.display()))
            })?;
            log::info!("QR画像を保存: {}", path.display());
            return Ok(path);
        }

        Err(AppError::export(format!(
            "空いているファイル名がありません: {stem}"
        )))
    }

    fn name(&self) -> &str {
        "directory"
    }
}
