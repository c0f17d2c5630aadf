use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webos_http::ReqwestExecutor;
use webos_shell::Shell;
use webos_vfs::{path, FileSystem, MemoryBackend};

async fn shell(api: &str) -> Shell {
    let fs = FileSystem::open(Arc::new(MemoryBackend::new())).await.unwrap();
    let executor = Arc::new(ReqwestExecutor::new(None).unwrap());
    Shell::open(fs, executor, api).await.unwrap()
}

#[tokio::test]
async fn test_wget_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("one\ntwo"))
        .expect(1)
        .mount(&server)
        .await;

    let mut shell = shell(&server.uri()).await;
    let url = format!("{}/notes.txt", server.uri());
    let outcome = shell.execute(&format!("wget {} notes.txt", url)).await;

    assert_eq!(
        outcome.outputs.last().unwrap().text,
        format!("Content from '{}' saved to 'notes.txt'.", url)
    );
    assert_eq!(
        shell
            .file_system()
            .read_file(&path!("root/notes.txt"))
            .await
            .unwrap(),
        "one\ntwo"
    );
}

#[tokio::test]
async fn test_clone_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"default_branch": "pages"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/site/git/trees/pages"))
        .and(query_param("recursive", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tree": [
                {"path": "docs", "type": "tree", "url": format!("{}/trees/docs", server.uri())},
                {"path": "docs/index.md", "type": "blob", "url": format!("{}/blobs/index", server.uri())}
            ],
            "truncated": false
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/blobs/index"))
        .and(header("Accept", "application/vnd.github.v3.raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Site"))
        .expect(1)
        .mount(&server)
        .await;

    let mut shell = shell(&server.uri()).await;
    let outcome = shell.execute("clone https://github.com/octo/site").await;
    let lines: Vec<&str> = outcome.outputs.iter().map(|o| o.text.as_str()).collect();

    assert_eq!(
        lines,
        vec![
            "Cloning repository 'https://github.com/octo/site'...",
            "Created directory: docs",
            "Fetched file: docs/index.md",
            "Repository 'https://github.com/octo/site' cloned into 'site'.",
        ]
    );
    assert_eq!(
        shell
            .file_system()
            .read_file(&path!("root/site/docs/index.md"))
            .await
            .unwrap(),
        "# Site"
    );
}

#[tokio::test]
async fn test_clone_metadata_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/private"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut shell = shell(&server.uri()).await;
    let outcome = shell.execute("clone https://github.com/octo/private").await;

    assert_eq!(
        outcome.outputs.last().unwrap().text,
        "Error: Failed to fetch repository metadata: 404 Not Found"
    );
    assert!(!shell
        .file_system()
        .exists(&path!("root/private"))
        .await
        .unwrap());
}
