//! Attachment upload tests.
//!
//! Files are written to a temporary directory and uploaded to a wiremock
//! server, which keeps the raw multipart body for inspection.

use std::path::PathBuf;

use procore_api::{
    AccessToken, ClientConfig, DirectCost, DirectCostKey, ProcoreClient, ProcoreError,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIRECT_COST_PATH: &str = "/rest/v1.1/projects/2783683/direct_costs/95483758";

fn client_for(server: &MockServer) -> ProcoreClient {
    ProcoreClient::new(
        AccessToken::new("test-token"),
        &ClientConfig::with_base_urls(&server.uri(), &server.uri()),
    )
    .unwrap()
}

fn key() -> DirectCostKey {
    DirectCostKey::new(8089, 2783683, 95483758)
}

fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_attach_sends_indexed_parts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(DIRECT_COST_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header("procore-company-id", "8089"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 95483758,
            "attachments": [
                { "id": 1, "name": "photo.png" },
                { "id": 2, "name": "invoice.pdf" },
                { "id": 3, "name": "blob.bin" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = vec![
        write_file(
            &dir,
            "photo.png",
            &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D],
        ),
        write_file(&dir, "invoice.pdf", b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n1 0 obj\n"),
        write_file(&dir, "blob.bin", &[0x00, 0xFF, 0x13, 0x37, 0x00]),
    ];

    let client = client_for(&mock_server);
    let record = DirectCost::attach(&client, key(), &files).await.unwrap();
    assert_eq!(record["id"], 95483758);
    assert_eq!(record["attachments"].as_array().map(Vec::len), Some(3));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("multipart/form-data; boundary="),
        "content-type: {content_type}"
    );

    let body = String::from_utf8_lossy(&request.body);
    let expected = [
        ("attachments[0]", "photo.png", "image/png"),
        ("attachments[1]", "invoice.pdf", "application/pdf"),
        ("attachments[2]", "blob.bin", "application/octet-stream"),
    ];

    let mut last_offset = 0;
    for (field, file_name, mime) in expected {
        let disposition = format!("name=\"{field}\"; filename=\"{file_name}\"");
        let offset = body
            .find(&disposition)
            .unwrap_or_else(|| panic!("missing part {disposition} in body"));
        assert!(offset >= last_offset, "parts out of order at {field}");
        last_offset = offset;

        let part_headers = &body[offset..];
        let header_end = part_headers.find("\r\n\r\n").unwrap();
        assert!(
            part_headers[..header_end].contains(&format!("Content-Type: {mime}")),
            "wrong content type for {file_name}: {}",
            &part_headers[..header_end]
        );
    }
}

#[tokio::test]
async fn test_attach_plain_text_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(DIRECT_COST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 95483758 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "costs.csv", b"date,amount\n2024-03-15,12.50\n");

    let client = client_for(&mock_server);
    DirectCost::attach(&client, key(), &[csv]).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"attachments[0]\"; filename=\"costs.csv\""));
    assert!(body.contains("Content-Type: text/plain"));
    assert!(body.contains("2024-03-15,12.50"));
}

#[tokio::test]
async fn test_attach_keeps_file_name_unencoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(DIRECT_COST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 95483758 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let receipt = write_file(&dir, "reçu mars.txt", b"total 12.50");

    let client = client_for(&mock_server);
    DirectCost::attach(&client, key(), &[receipt]).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(
        body.contains("name=\"attachments[0]\"; filename=\"reçu mars.txt\""),
        "body: {body}"
    );
    assert!(!body.contains("filename*="));
}

#[tokio::test]
async fn test_attach_without_files_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let no_files: Vec<PathBuf> = Vec::new();
    let err = DirectCost::attach(&client, key(), &no_files)
        .await
        .unwrap_err();

    assert!(matches!(err, ProcoreError::InvalidArgument(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_attach_missing_file_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let dir = TempDir::new().unwrap();
    let present = write_file(&dir, "present.txt", b"hello");
    let missing = dir.path().join("missing.pdf");

    let err = DirectCost::attach(&client, key(), &[present, missing.clone()])
        .await
        .unwrap_err();

    match err {
        ProcoreError::AttachmentError { path, .. } => assert_eq!(path, missing),
        other => panic!("expected attachment error, got {other:?}"),
    }
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_attach_non_object_response_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(DIRECT_COST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "note.txt", b"receipt");

    let client = client_for(&mock_server);
    let err = DirectCost::attach(&client, key(), &[file]).await.unwrap_err();

    assert!(err.is_malformed_response(), "got {err:?}");
}

#[tokio::test]
async fn test_attach_rejected_by_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(DIRECT_COST_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": { "attachments": ["is too large"] }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "huge.txt", b"pretend this is large");

    let client = client_for(&mock_server);
    let err = DirectCost::attach(&client, key(), &[file]).await.unwrap_err();

    assert_eq!(err.status_code(), Some(422));
    assert!(err.to_string().contains("is too large"), "got {err}");
}
