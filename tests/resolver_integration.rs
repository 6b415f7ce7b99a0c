//! Integration tests for the resolver and resolution pipeline.
//!
//! Drives the full extract flow against a mock model API.

use std::time::Duration;

use civitai_core::resolver::ResolveErrorKind;
use civitai_core::{
    AppendLog, ModelType, OutputLists, ProcessedStore, ResolutionPipeline, UrlResolver,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::{api_for, config_for, lines};

#[tokio::test]
async fn test_version_url_routes_lora_and_records_origin() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let config = config_for(workspace.path(), &server);

    Mock::given(method("GET"))
        .and(path("/api/v1/model-versions/5678"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"model": {"type": "LORA"}})))
        .expect(1)
        .mount(&server)
        .await;

    let origin = "https://civitai.com/models/1234?modelVersionId=5678";
    std::fs::write(&config.pending_file, format!("{origin}\n")).unwrap();

    let pipeline = ResolutionPipeline::new(
        UrlResolver::new(api_for(&server)),
        &config.pending_file,
        OutputLists::from_config(&config),
    );
    let mut processed = AppendLog::open(&config.processed_log).unwrap();
    let summary = pipeline.run(&mut processed).await.unwrap();

    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.loras, 1);
    assert_eq!(
        lines(&workspace.path().join("loras.txt")),
        vec![format!("{}/api/download/models/5678", server.uri())]
    );
    assert_eq!(lines(&config.processed_log), vec![origin.to_string()]);
    assert!(lines(&config.pending_file).is_empty());
}

#[tokio::test]
async fn test_all_processed_makes_no_remote_calls() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let config = config_for(workspace.path(), &server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let urls = [
        "https://civitai.com/models/1?modelVersionId=10",
        "https://civitai.com/models/2",
    ];
    std::fs::write(&config.pending_file, urls.join("\n")).unwrap();
    std::fs::write(&config.processed_log, urls.join("\n")).unwrap();
    let loras = workspace.path().join("loras.txt");
    std::fs::write(&loras, "existing\n").unwrap();

    let pipeline = ResolutionPipeline::new(
        UrlResolver::new(api_for(&server)),
        &config.pending_file,
        OutputLists::from_config(&config),
    );
    let mut processed = AppendLog::open(&config.processed_log).unwrap();
    let summary = pipeline.run(&mut processed).await.unwrap();

    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.resolved, 0);
    assert_eq!(std::fs::read_to_string(&loras).unwrap(), "existing\n");
    assert!(!workspace.path().join("checkpoints.txt").exists());
}

#[tokio::test]
async fn test_model_only_url_uses_first_version() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/models/4201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4201,
            "type": "Checkpoint",
            "modelVersions": [{"id": 130072}, {"id": 120000}]
        })))
        .mount(&server)
        .await;

    let resolver = UrlResolver::new(api_for(&server));
    let resolved = resolver
        .resolve("https://civitai.com/models/4201/realistic-vision")
        .await
        .unwrap();

    assert_eq!(resolved.model_type, ModelType::Checkpoint);
    assert_eq!(
        resolved.download_url,
        format!("{}/api/download/models/130072", server.uri())
    );
}

#[tokio::test]
async fn test_download_url_ignores_other_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/model-versions/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"model": {}})))
        .mount(&server)
        .await;

    let resolved = UrlResolver::new(api_for(&server))
        .resolve("https://civitai.com/models/7?utm_source=x&modelVersionId=99&tab=files")
        .await
        .unwrap();

    assert_eq!(resolved.model_type, ModelType::Unknown);
    assert_eq!(
        resolved.download_url,
        format!("{}/api/download/models/99", server.uri())
    );
}

#[tokio::test]
async fn test_resolution_errors_are_classified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/models/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"modelVersions": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models/3"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models/4"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resolver = UrlResolver::new(api_for(&server));
    let cases = [
        ("https://civitai.com/models/1", ResolveErrorKind::NotFound),
        ("https://civitai.com/models/2", ResolveErrorKind::Malformed),
        ("https://civitai.com/models/3", ResolveErrorKind::Network),
        ("https://civitai.com/models/4", ResolveErrorKind::NotFound),
        ("https://civitai.com/user/someone", ResolveErrorKind::InvalidReference),
    ];

    for (url, expected) in cases {
        let error = resolver.resolve(url).await.unwrap_err();
        assert_eq!(error.kind(), expected, "{url}: {error}");
    }
}

#[tokio::test]
async fn test_failed_urls_stay_pending_and_unprocessed() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let config = config_for(workspace.path(), &server);

    Mock::given(method("GET"))
        .and(path("/api/v1/model-versions/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/model-versions/2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"model": {"type": "Checkpoint"}})),
        )
        .mount(&server)
        .await;

    let failing = "https://civitai.com/models/9?modelVersionId=1";
    let invalid = "https://example.com/not-a-model";
    let ok = "https://civitai.com/models/9?modelVersionId=2";
    std::fs::write(&config.pending_file, format!("{failing}\n\n{invalid}\n{ok}\n")).unwrap();

    let pipeline = ResolutionPipeline::new(
        UrlResolver::new(api_for(&server)),
        &config.pending_file,
        OutputLists::from_config(&config),
    );
    let mut processed = AppendLog::open(&config.processed_log).unwrap();
    let summary = pipeline.run(&mut processed).await.unwrap();

    assert_eq!(summary.failed, 2);
    assert_eq!(summary.checkpoints, 1);
    assert_eq!(summary.remaining, 2);
    assert_eq!(lines(&config.pending_file), vec![failing, invalid]);
    assert!(!processed.contains(failing));
    assert!(processed.contains(ok));
}

#[tokio::test]
async fn test_bounded_concurrency_preserves_list_order() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let config = config_for(workspace.path(), &server);

    // Earlier entries answer slower, so completion order is reversed.
    for (id, delay_ms) in [(1, 300), (2, 200), (3, 100), (4, 0)] {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/model-versions/{id}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"model": {"type": "LORA"}}))
                    .set_delay(Duration::from_millis(delay_ms)),
            )
            .mount(&server)
            .await;
    }

    let urls: Vec<String> = (1..=4)
        .map(|id| format!("https://civitai.com/models/5?modelVersionId={id}"))
        .collect();
    std::fs::write(&config.pending_file, urls.join("\n")).unwrap();

    let pipeline = ResolutionPipeline::new(
        UrlResolver::new(api_for(&server)),
        &config.pending_file,
        OutputLists::from_config(&config),
    )
    .with_concurrency(4);
    let mut processed = AppendLog::open(&config.processed_log).unwrap();
    pipeline.run(&mut processed).await.unwrap();

    let expected: Vec<String> = (1..=4)
        .map(|id| format!("{}/api/download/models/{id}", server.uri()))
        .collect();
    assert_eq!(lines(&workspace.path().join("loras.txt")), expected);
    assert_eq!(lines(&config.processed_log), urls);
}

#[tokio::test]
async fn test_duplicate_pending_url_resolved_once() {
    let server = MockServer::start().await;
    let workspace = TempDir::new().unwrap();
    let config = config_for(workspace.path(), &server);

    Mock::given(method("GET"))
        .and(path("/api/v1/model-versions/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"model": {"type": "Other"}})))
        .expect(1)
        .mount(&server)
        .await;

    let url = "https://civitai.com/models/3?modelVersionId=8";
    std::fs::write(&config.pending_file, format!("{url}\n{url}\n")).unwrap();

    let pipeline = ResolutionPipeline::new(
        UrlResolver::new(api_for(&server)),
        &config.pending_file,
        OutputLists::from_config(&config),
    );
    let mut processed = AppendLog::open(&config.processed_log).unwrap();
    let summary = pipeline.run(&mut processed).await.unwrap();

    assert_eq!(summary.resolved, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(lines(&workspace.path().join("none.txt")).len(), 1);
}
