mod clipboard;

pub use clipboard::ClipboardOutput;

use crate::domain::error::AppError;

/// 出力先 trait
pub trait OutputTarget: Send + Sync {
    fn deliver(&self, text: &str) -> Result<(), AppError>;
    fn name(&self) -> &str;
}

/// 出力ルーター: コピー/共有テキストを出力先へ渡す
pub struct OutputRouter {
    clipboard: Box<dyn OutputTarget>,
}

impl OutputRouter {
    pub fn new() -> Self {
        Self::with_clipboard(Box::new(ClipboardOutput::new()))
    }

    /// 出力先を差し替える（テスト・モバイル用）
    pub fn with_clipboard(clipboard: Box<dyn OutputTarget>) -> Self {
        Self { clipboard }
    }

    pub fn deliver_clipboard(&self, text: &str) -> Result<(), AppError> {
        self.clipboard.deliver(text)
    }
}

impl Default for OutputRouter {
    fn default() -> Self {
        Self::new()
    }
}
