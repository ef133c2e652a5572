//! OCR pipeline: cached `DetectDocumentText`, then one printed line per `LINE` block.

use std::io::Write;

use anyhow::Result;
use cloudsight_core::RecognitionService;
use cloudsight_understanding::{extract_lines, load_document_text, ResponseCache};
use tracing::info;

use crate::settings::Settings;

/// Run the pipeline once; returns the number of lines written to `out`.
///
/// A cold cache in warm-only mode, or a failed service call, yields zero lines.
pub async fn run(
    settings: &Settings,
    service: &dyn RecognitionService,
    out: &mut impl Write,
) -> Result<usize> {
    let cache = ResponseCache::new(&settings.cache_path, settings.cache_mode);
    let response = load_document_text(&cache, service, &settings.document).await?;

    let lines = extract_lines(&response);
    for line in &lines {
        writeln!(out, "{}", line)?;
    }

    info!(
        document = %settings.document.display(),
        cache = %settings.cache_path.display(),
        lines = lines.len(),
        "OCR run finished"
    );
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsight_config::{apply_all_defaults, CloudsightConfig};
    use cloudsight_core::{Block, BlockType, CacheMode, DetectDocumentTextResponse};
    use cloudsight_understanding::MockVisionService;
    use std::path::Path;

    fn settings_in(dir: &Path, mode: CacheMode) -> Settings {
        let mut settings = Settings::from_config(&apply_all_defaults(CloudsightConfig::default()));
        settings.document = dir.join("lista-material-escolar.jpeg");
        settings.cache_path = dir.join("response.json");
        settings.cache_mode = mode;
        std::fs::write(&settings.document, b"\xFF\xD8\xFF\xE0").unwrap();
        settings
    }

    fn service() -> MockVisionService {
        MockVisionService::default().with_document(DetectDocumentTextResponse {
            blocks: vec![
                Block::new(BlockType::Page, ""),
                Block::new(BlockType::Line, "Lista de material"),
                Block::new(BlockType::Word, "Lista"),
                Block::new(BlockType::Line, "2 cadernos"),
            ],
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn first_run_warms_cache_second_run_prints() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), CacheMode::WarmOnly);
        let service = service();

        let mut first = Vec::new();
        assert_eq!(run(&settings, &service, &mut first).await.unwrap(), 0);
        assert!(first.is_empty());

        let mut second = Vec::new();
        assert_eq!(run(&settings, &service, &mut second).await.unwrap(), 2);
        assert_eq!(String::from_utf8(second).unwrap(), "Lista de material\n2 cadernos\n");
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn return_fetched_prints_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), CacheMode::ReturnFetched);
        let service = service();

        let mut out = Vec::new();
        assert_eq!(run(&settings, &service, &mut out).await.unwrap(), 2);
        assert!(String::from_utf8(out).unwrap().starts_with("Lista de material\n"));
    }

    #[tokio::test]
    async fn cold_cache_without_credentials_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), CacheMode::WarmOnly);
        let client = settings.build_client_with(None);

        let mut out = Vec::new();
        let err = run(&settings, &client, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("AWS_ACCESS_KEY_ID"));
        assert!(!settings.cache_path.exists());
    }

    #[tokio::test]
    async fn warm_cache_needs_no_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), CacheMode::WarmOnly);
        std::fs::write(
            &settings.cache_path,
            r#"{"Blocks":[{"BlockType":"LINE","Text":"Lápis"}]}"#,
        )
        .unwrap();
        let client = settings.build_client_with(None);

        let mut out = Vec::new();
        assert_eq!(run(&settings, &client, &mut out).await.unwrap(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Lápis\n");
    }

    #[tokio::test]
    async fn service_failure_prints_nothing_and_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path(), CacheMode::ReturnFetched);
        let service = MockVisionService::default().failing("AccessDeniedException", "nope");

        let mut out = Vec::new();
        assert_eq!(run(&settings, &service, &mut out).await.unwrap(), 0);
        assert!(out.is_empty());
        assert!(!settings.cache_path.exists());
    }
}
