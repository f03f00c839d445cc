//! 画像からQRコードを読み取る（ギャラリー取り込み用）

use image::GrayImage;

use crate::domain::error::AppError;

/// 読み取りエラー
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("no QR code found")]
    NotFound,
    #[error("QR decode failed: {0}")]
    Decode(#[from] rqrr::DeQRError),
}

impl From<DecodeError> for AppError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::Image(e) => AppError::validation(format!("画像を読み込めません: {e}")),
            DecodeError::NotFound | DecodeError::Decode(_) => {
                AppError::validation("QRコードが検出されませんでした")
            }
        }
    }
}

pub struct QrDecoder;

impl QrDecoder {
    /// PNG / JPEG のバイト列から最初に読めたコードの中身を返す
    pub fn decode(bytes: &[u8]) -> Result<String, DecodeError> {
        let image = image::load_from_memory(bytes)?.to_luma8();
        Self::decode_luma(&image)
    }

    pub fn decode_luma(image: &GrayImage) -> Result<String, DecodeError> {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            image.width() as usize,
            image.height() as usize,
            |x, y| image.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        log::debug!(
            "QR検出: {}x{} → {} 件",
            image.width(),
            image.height(),
            grids.len()
        );

        let mut last_err = None;
        for grid in grids {
            match grid.decode() {
                Ok((_, content)) => return Ok(content),
                Err(e) => {
                    log::warn!("QR読み取り失敗: {e}");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.map_or(DecodeError::NotFound, DecodeError::Decode))
    }
}
