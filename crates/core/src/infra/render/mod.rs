//! QRコード画像の生成（PNG / SVG）

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::QrCode;

use crate::domain::error::AppError;

/// 描画エラー
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("QR data is empty")]
    Empty,
    #[error("QR encode failed: {0}")]
    Encode(#[from] QrError),
    #[error("PNG encode failed: {0}")]
    Png(#[from] image::ImageError),
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::render(e.to_string())
    }
}

/// 描画オプション
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// 最小辺（px）。モジュール単位で拡大するため実寸はこれ以上になる
    pub size: u32,
    pub quiet_zone: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 512,
            quiet_zone: true,
        }
    }
}

pub struct QrRenderer;

impl QrRenderer {
    fn encode(data: &str) -> Result<QrCode, RenderError> {
        if data.is_empty() {
            return Err(RenderError::Empty);
        }
        Ok(QrCode::new(data.as_bytes())?)
    }

    /// グレースケール画像（黒=0, 白=255）
    pub fn render(data: &str, opts: RenderOptions) -> Result<GrayImage, RenderError> {
        let code = Self::encode(data)?;
        let image = code
            .render::<Luma<u8>>()
            .min_dimensions(opts.size, opts.size)
            .quiet_zone(opts.quiet_zone)
            .build();
        log::debug!(
            "QR描画: {} 文字 → {}x{}",
            data.len(),
            image.width(),
            image.height()
        );
        Ok(image)
    }

    pub fn render_png(data: &str, opts: RenderOptions) -> Result<Vec<u8>, RenderError> {
        let image = Self::render(data, opts)?;
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn render_svg(data: &str, opts: RenderOptions) -> Result<String, RenderError> {
        let code = Self::encode(data)?;
        Ok(code
            .render::<svg::Color>()
            .min_dimensions(opts.size, opts.size)
            .quiet_zone(opts.quiet_zone)
            .build())
    }
}
