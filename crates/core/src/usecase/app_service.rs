use std::path::PathBuf;

use parking_lot::Mutex;

use crate::domain::draft::QrDraft;
use crate::domain::error::AppError;
use crate::domain::parser;
use crate::domain::settings::AppSettings;
use crate::domain::types::{normalize_title, HistoryItem, HistoryKind, HistoryRecord};
use crate::infra::decode::QrDecoder;
use crate::infra::export::{DirectoryImageSaver, ImageSaver};
use crate::infra::output::OutputRouter;
use crate::infra::render::{QrRenderer, RenderOptions};
use crate::infra::storage::Storage;

/// QR画像サイズの上限（px）
pub const MAX_IMAGE_SIZE: u32 = 4096;

/// アプリケーションサービス（Tauri State として管理される）
pub struct AppService {
    storage: Mutex<Storage>,
    output_router: OutputRouter,
    /// None なら設定の保存先ディレクトリを使う
    saver: Option<Box<dyn ImageSaver>>,
}

impl AppService {
    pub fn new(storage: Storage) -> Self {
        Self::with_outputs(storage, OutputRouter::new(), None)
    }

    pub fn with_outputs(
        storage: Storage,
        output_router: OutputRouter,
        saver: Option<Box<dyn ImageSaver>>,
    ) -> Self {
        Self {
            storage: Mutex::new(storage),
            output_router,
            saver,
        }
    }

    // ==================== Scan / Create ====================

    /// デコード済みの文字列をスキャン履歴に保存する
    pub fn scan(&self, raw: &str) -> Result<HistoryItem, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::validation("QRコードが検出されませんでした"));
        }

        let content = parser::classify(raw);
        let mut record = HistoryRecord::scanned(raw, chrono::Utc::now());
        record.id = self.storage.lock().insert_record(&record)?;

        log::info!("スキャン保存: id={} kind={:?}", record.id, content.kind());
        Ok(HistoryItem::from_record(&record))
    }

    /// ギャラリー画像（PNG / JPEG）から読み取ってスキャン履歴に保存する
    pub fn scan_image(&self, bytes: &[u8]) -> Result<HistoryItem, AppError> {
        let raw = QrDecoder::decode(bytes)?;
        self.scan(&raw)
    }

    /// フォーム入力を検証し、正規形のペイロードを生成履歴に保存する
    pub fn create(&self, draft: QrDraft) -> Result<HistoryItem, AppError> {
        let content = draft.into_content()?;
        let mut record = HistoryRecord::generated(content.raw_value(), chrono::Utc::now());
        record.id = self.storage.lock().insert_record(&record)?;

        log::info!("QR生成保存: id={} kind={:?}", record.id, content.kind());
        Ok(HistoryItem::from_record(&record))
    }

    // ==================== History ====================

    pub fn history(&self, kind: HistoryKind) -> Result<Vec<HistoryItem>, AppError> {
        let records = self.storage.lock().list_records(kind)?;
        Ok(records.iter().map(HistoryItem::from_record).collect())
    }

    pub fn get_item(&self, id: i64) -> Result<HistoryItem, AppError> {
        Ok(HistoryItem::from_record(&self.record(id)?))
    }

    /// タイトル変更（空白のみは不可、現在と同じなら何もしない）
    pub fn rename(&self, id: i64, title: &str) -> Result<HistoryItem, AppError> {
        let title = normalize_title(title)
            .ok_or_else(|| AppError::validation("タイトルが空です"))?;

        let storage = self.storage.lock();
        let record = Self::find(&storage, id)?;
        if record.custom_title.as_deref() == Some(title.as_str()) {
            return Ok(HistoryItem::from_record(&record));
        }

        storage.update_title(id, &title, chrono::Utc::now())?;
        let updated = Self::find(&storage, id)?;
        Ok(HistoryItem::from_record(&updated))
    }

    pub fn set_favourite(&self, id: i64, is_favourite: bool) -> Result<HistoryItem, AppError> {
        let storage = self.storage.lock();
        if !storage.update_favourite(id, is_favourite, chrono::Utc::now())? {
            return Err(Self::missing(id));
        }
        let updated = Self::find(&storage, id)?;
        Ok(HistoryItem::from_record(&updated))
    }

    /// お気に入りを反転し、新しい状態を返す
    pub fn toggle_favourite(&self, id: i64) -> Result<bool, AppError> {
        let storage = self.storage.lock();
        let next = !Self::find(&storage, id)?.is_favourite;
        storage.update_favourite(id, next, chrono::Utc::now())?;
        Ok(next)
    }

    pub fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.storage.lock().delete_record(id)? {
            return Err(Self::missing(id));
        }
        log::info!("履歴削除: id={id}");
        Ok(())
    }

    // ==================== Image ====================

    pub fn render_png(&self, id: i64) -> Result<Vec<u8>, AppError> {
        let record = self.record(id)?;
        let opts = self.render_options()?;
        Ok(QrRenderer::render_png(&record.raw_data, opts)?)
    }

    pub fn render_svg(&self, id: i64) -> Result<String, AppError> {
        let record = self.record(id)?;
        let opts = self.render_options()?;
        Ok(QrRenderer::render_svg(&record.raw_data, opts)?)
    }

    /// PNGとして保存する。ファイル名はタイトル、無ければ「種別名_ID」
    pub fn export_image(&self, id: i64) -> Result<PathBuf, AppError> {
        let item = self.get_item(id)?;
        let png = self.render_png(id)?;
        let name = match item.custom_title {
            Some(ref title) => title.clone(),
            None => format!("{}_{}", item.kind_title, item.id),
        };

        match self.saver {
            Some(ref saver) => saver.save(&png, &name),
            None => {
                let settings = self.get_settings()?;
                let dir = settings
                    .export_dir
                    .map(PathBuf::from)
                    .unwrap_or_else(DirectoryImageSaver::default_dir);
                DirectoryImageSaver::new(dir).save(&png, &name)
            }
        }
    }

    // ==================== Copy / Share ====================

    /// クリップボードにコピーし、コピーしたテキストを返す
    pub fn copy_to_clipboard(&self, id: i64) -> Result<String, AppError> {
        let settings = self.get_settings()?;
        let text = if settings.copy_formatted {
            self.get_item(id)?.formatted_content
        } else {
            self.record(id)?.raw_data
        };
        self.output_router.deliver_clipboard(&text)?;
        Ok(text)
    }

    /// 共有シートに渡すテキスト
    pub fn share_text(&self, id: i64) -> Result<String, AppError> {
        Ok(self.get_item(id)?.formatted_content)
    }

    // ==================== Settings ====================

    pub fn get_settings(&self) -> Result<AppSettings, AppError> {
        self.storage.lock().get_settings()
    }

    pub fn update_settings(&self, settings: AppSettings) -> Result<(), AppError> {
        if settings.qr_image_size == 0 || settings.qr_image_size > MAX_IMAGE_SIZE {
            return Err(AppError::validation(format!(
                "QR画像サイズは 1〜{MAX_IMAGE_SIZE} px: {}",
                settings.qr_image_size
            )));
        }
        self.storage.lock().save_settings(&settings)
    }

    // ==================== Helpers ====================

    fn render_options(&self) -> Result<RenderOptions, AppError> {
        let settings = self.get_settings()?;
        Ok(RenderOptions {
            size: settings.qr_image_size,
            quiet_zone: settings.qr_quiet_zone,
        })
    }

    fn record(&self, id: i64) -> Result<HistoryRecord, AppError> {
        Self::find(&self.storage.lock(), id)
    }

    fn find(storage: &Storage, id: i64) -> Result<HistoryRecord, AppError> {
        storage.get_record(id)?.ok_or_else(|| Self::missing(id))
    }

    fn missing(id: i64) -> AppError {
        AppError::not_found(format!("履歴が見つかりません: id={id}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::content::QrContent;
    use crate::domain::error::ErrorCode;
    use crate::domain::types::QrKind;
    use crate::infra::output::OutputTarget;

    /// 出力内容を記録するだけのクリップボード
    #[derive(Clone, Default)]
    struct RecordingClipboard {
        texts: Arc<parking_lot::Mutex<Vec<String>>>,
    }

    impl OutputTarget for RecordingClipboard {
        fn deliver(&self, text: &str) -> Result<(), AppError> {
            self.texts.lock().push(text.to_string());
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn service() -> (AppService, RecordingClipboard) {
        let clipboard = RecordingClipboard::default();
        let service = AppService::with_outputs(
            Storage::open_in_memory().unwrap(),
            OutputRouter::with_clipboard(Box::new(clipboard.clone())),
            None,
        );
        (service, clipboard)
    }

    #[test]
    fn test_scan_classifies_and_persists() {
        let (service, _) = service();
        let item = service.scan("  GEO:50.4501,30.5234 ").unwrap();
        assert!(item.id > 0);
        assert!(item.is_scanned);
        assert_eq!(item.kind, QrKind::GeoLocation);
        assert_eq!(
            item.content,
            QrContent::GeoLocation {
                latitude: 50.4501,
                longitude: 30.5234
            }
        );

        let history = service.history(HistoryKind::Scanned).unwrap();
        assert_eq!(history.len(), 1);
        assert!(service.history(HistoryKind::Generated).unwrap().is_empty());
    }

    #[test]
    fn test_scan_empty_is_rejected() {
        let (service, _) = service();
        let err = service.scan("   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
    }

    #[test]
    fn test_create_stores_canonical_payload() {
        let (service, _) = service();
        let item = service
            .create(QrDraft::Wifi {
                ssid: "Home".into(),
                password: "secret".into(),
                encryption_type: String::new(),
            })
            .unwrap();
        assert!(!item.is_scanned);
        assert_eq!(item.kind, QrKind::Wifi);
        assert_eq!(item.content.raw_value(), "WIFI:S:Home;T:WPA;P:secret;;");

        let generated = service.history(HistoryKind::Generated).unwrap();
        assert_eq!(generated[0].id, item.id);
    }

    #[test]
    fn test_create_link_is_read_back_as_link() {
        let (service, _) = service();
        for url in ["example.com", "HTTPS://EXAMPLE.COM"] {
            let item = service.create(QrDraft::Link { url: url.into() }).unwrap();
            assert_eq!(item.kind, QrKind::Link, "{url}");
            assert_eq!(service.get_item(item.id).unwrap().kind, QrKind::Link);
        }

        let err = service
            .create(QrDraft::Link {
                url: "rtsp://cam.example.com".into(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(service.history(HistoryKind::Generated).unwrap().len(), 2);
    }

    #[test]
    fn test_create_contact_with_separator_is_rejected() {
        let (service, _) = service();
        let err = service
            .create(QrDraft::Contact {
                name: "Doe; John".into(),
                phone: "123-4567".into(),
                email: String::new(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert!(service.history(HistoryKind::Generated).unwrap().is_empty());
    }

    #[test]
    fn test_scan_image_reads_rendered_code() {
        let (service, _) = service();
        let png = QrRenderer::render_png(
            "tel:+1234567890",
            RenderOptions::default(),
        )
        .unwrap();

        let item = service.scan_image(&png).unwrap();
        assert!(item.is_scanned);
        assert_eq!(item.kind, QrKind::Phone);
        assert_eq!(item.content.raw_value(), "tel:+1234567890");
    }

    #[test]
    fn test_scan_image_without_code_is_rejected() {
        let (service, _) = service();
        let err = service.scan_image(b"not an image").unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert!(service.history(HistoryKind::Scanned).unwrap().is_empty());
    }

    #[test]
    fn test_create_invalid_draft_is_not_persisted() {
        let (service, _) = service();
        let err = service
            .create(QrDraft::GeoLocation {
                latitude: "91".into(),
                longitude: "0".into(),
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Validation);
        assert!(service.history(HistoryKind::Generated).unwrap().is_empty());
    }

    #[test]
    fn test_rename() {
        let (service, _) = service();
        let id = service.scan("hello").unwrap().id;

        let item = service.rename(id, "  Greeting  ").unwrap();
        assert_eq!(item.custom_title.as_deref(), Some("Greeting"));
        assert_eq!(item.display_title(), "Greeting");

        let long = "a".repeat(50);
        let item = service.rename(id, &long).unwrap();
        assert_eq!(item.custom_title.unwrap().len(), 32);

        assert_eq!(
            service.rename(id, " ").unwrap_err().code,
            ErrorCode::Validation
        );
        assert_eq!(
            service.rename(999, "x").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_favourite() {
        let (service, _) = service();
        let id = service.scan("tel:+1234567890").unwrap().id;

        assert!(service.toggle_favourite(id).unwrap());
        assert!(service.get_item(id).unwrap().is_favourite);
        assert!(!service.toggle_favourite(id).unwrap());

        let item = service.set_favourite(id, true).unwrap();
        assert!(item.is_favourite);

        assert_eq!(
            service.set_favourite(999, true).unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_delete() {
        let (service, _) = service();
        let id = service.scan("bye").unwrap().id;
        service.delete(id).unwrap();
        assert_eq!(service.get_item(id).unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(service.delete(id).unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_copy_raw_and_formatted() {
        let (service, clipboard) = service();
        let id = service.scan("WIFI:S:Home;T:WPA;P:secret;;").unwrap().id;

        let copied = service.copy_to_clipboard(id).unwrap();
        assert_eq!(copied, "WIFI:S:Home;T:WPA;P:secret;;");

        let mut settings = service.get_settings().unwrap();
        settings.copy_formatted = true;
        service.update_settings(settings).unwrap();

        let copied = service.copy_to_clipboard(id).unwrap();
        assert!(copied.starts_with("SSID: Home"));
        assert_eq!(clipboard.texts.lock().len(), 2);
    }

    #[test]
    fn test_share_text() {
        let (service, _) = service();
        let id = service
            .scan("MECARD:N:Jane;TEL:123;EMAIL:jane@example.com;")
            .unwrap()
            .id;
        assert_eq!(
            service.share_text(id).unwrap(),
            "Jane\n123\njane@example.com"
        );
    }

    #[test]
    fn test_render_uses_settings() {
        let (service, _) = service();
        let id = service.scan("https://example.com").unwrap().id;

        let png = service.render_png(id).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert!(service.render_svg(id).unwrap().contains("<svg"));
    }

    #[test]
    fn test_update_settings_rejects_bad_size() {
        let (service, _) = service();
        let mut settings = AppSettings::default();
        settings.qr_image_size = 0;
        assert_eq!(
            service.update_settings(settings).unwrap_err().code,
            ErrorCode::Validation
        );
    }

    #[test]
    fn test_export_image_to_configured_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let (service, _) = service();
        let mut settings = AppSettings::default();
        settings.export_dir = Some(tmp.path().to_string_lossy().to_string());
        service.update_settings(settings).unwrap();

        let id = service.scan("https://example.com").unwrap().id;
        let path = service.export_image(id).unwrap();
        assert_eq!(path, tmp.path().join(format!("Link_{id}.png")));

        service.rename(id, "My Site").unwrap();
        let path = service.export_image(id).unwrap();
        assert_eq!(path.file_name().unwrap(), "My Site.png");
    }

    #[test]
    fn test_export_image_with_custom_saver() {
        let tmp = tempfile::tempdir().unwrap();
        let service = AppService::with_outputs(
            Storage::open_in_memory().unwrap(),
            OutputRouter::with_clipboard(Box::new(RecordingClipboard::default())),
            Some(Box::new(DirectoryImageSaver::new(tmp.path()))),
        );
        let id = service.scan("tel:+1234567890").unwrap().id;
        let path = service.export_image(id).unwrap();
        assert!(path.starts_with(tmp.path()));
        assert!(path.exists());
    }
}
