//! Integration tests for the classification REST API.
//!
//! Each test spins up an Axum server on a random port and drives it with
//! reqwest, exercising the real HTTP contract.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use email_triage::api::{AppState, api_routes};
use email_triage::classifier::EmailClassifier;
use email_triage::classifier::prompts::CLASSIFY_SYSTEM_PROMPT;
use email_triage::config::ServerConfig;
use email_triage::error::LlmError;
use email_triage::llm::provider::{CompletionRequest, CompletionResponse, LlmProvider, Role};
use email_triage::reply::templates::{PRODUCTIVE_FALLBACK_REPLY, UNPRODUCTIVE_FALLBACK_REPLY};
use email_triage::reply::{GeneratorConfig, ResponseGenerator};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

const STUB_REPLY: &str = "Prezado(a), recebemos sua mensagem. Equipe de Atendimento";

/// Stub LLM: answers the classifier with a fixed verdict and the
/// generator with a fixed draft (no real API calls).
struct StubLlm {
    verdict: &'static str,
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let is_classification = request
            .messages
            .iter()
            .any(|m| m.role == Role::System && m.content == CLASSIFY_SYSTEM_PROMPT);

        let content = if is_classification {
            self.verdict
        } else {
            STUB_REPLY
        };

        Ok(CompletionResponse {
            content: content.to_string(),
            input_tokens: 0,
            output_tokens: 0,
        })
    }
}

/// Every call fails, as with a revoked key or an unreachable provider.
struct FailingLlm;

#[async_trait]
impl LlmProvider for FailingLlm {
    fn model_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::RequestFailed {
            provider: "failing".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

/// Start an Axum server on a random port, return its base URL.
async fn start_server(llm: Option<Arc<dyn LlmProvider>>) -> String {
    start_server_with(llm, ServerConfig::default()).await
}

async fn start_server_with(llm: Option<Arc<dyn LlmProvider>>, server: ServerConfig) -> String {
    let state = AppState::new(
        EmailClassifier::new(llm.clone()),
        ResponseGenerator::new(llm, GeneratorConfig::default()),
    );
    let app = api_routes(state, &server);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://127.0.0.1:{port}")
}

async fn post_json(url: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn post_file(url: &str, file_name: &str, bytes: &[u8]) -> (StatusCode, Value) {
    let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
    let form = Form::new().part("file", part);
    let response = reqwest::Client::new()
        .post(url)
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

fn confidence(body: &Value) -> f64 {
    body["confidence"].as_f64().expect("confidence is a number")
}

#[tokio::test]
async fn health_reports_heuristic_mode() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(None).await;

        let response = reqwest::get(format!("{base}/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["llm_enabled"], false);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn productive_email_without_llm_gets_canned_reply() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(None).await;

        let (status, body) = post_json(
            &format!("{base}/api/classify"),
            json!({ "text": "Preciso de ajuda com um problema no sistema." }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Produtivo");
        let c = confidence(&body);
        assert!(c > 0.6 && c <= 0.9 + 1e-6, "confidence {c}");
        assert_eq!(body["suggested_response"], PRODUCTIVE_FALLBACK_REPLY);
        assert_eq!(body["processed_text_length"], 44);
        assert!(body["keywords"].is_array());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unproductive_email_without_llm_gets_canned_reply() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(None).await;

        let (status, body) = post_json(
            &format!("{base}/api/classify/text"),
            json!({ "text": "Feliz Natal! Obrigado por tudo." }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Improdutivo");
        assert!((confidence(&body) - 0.8).abs() < 1e-6);
        assert_eq!(body["suggested_response"], UNPRODUCTIVE_FALLBACK_REPLY);
        // The text-only endpoint omits the extras.
        assert!(body.get("processed_text_length").is_none());
        assert!(body.get("keywords").is_none());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn llm_verdict_and_draft_are_returned() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(Some(Arc::new(StubLlm {
            verdict: "Improdutivo 0.87",
        })))
        .await;

        let (status, body) = post_json(
            &format!("{base}/api/classify"),
            json!({ "text": "Preciso de ajuda urgente" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Improdutivo");
        assert!((confidence(&body) - 0.87).abs() < 1e-6);
        assert_eq!(body["suggested_response"], STUB_REPLY);

        let health: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["llm_enabled"], true);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn failing_llm_falls_back_to_heuristic() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(Some(Arc::new(FailingLlm))).await;

        let (status, body) = post_json(
            &format!("{base}/api/classify/text"),
            json!({ "text": "Feliz Natal! Obrigado por tudo." }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Improdutivo");
        assert_eq!(body["suggested_response"], UNPRODUCTIVE_FALLBACK_REPLY);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn missing_or_blank_text_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(None).await;

        let (status, body) = post_json(&format!("{base}/api/classify"), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Envie um texto ou arquivo para classificação");

        let (status, body) =
            post_json(&format!("{base}/api/classify"), json!({ "text": "   \n" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Texto do email está vazio");

        let (status, body) = post_json(&format!("{base}/api/classify/text"), json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Campo \"text\" é obrigatório");

        let (status, body) =
            post_json(&format!("{base}/api/classify/text"), json!({ "text": "" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Texto do email está vazio");

        let (status, body) =
            post_json(&format!("{base}/api/classify/text"), json!({ "text": null })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Texto do email está vazio");

        let (status, body) =
            post_json(&format!("{base}/api/classify"), json!({ "text": null })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Envie um texto ou arquivo para classificação");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn txt_upload_is_cleaned_and_classified() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(None).await;

        let (status, body) = post_file(
            &format!("{base}/api/classify"),
            "pedido.txt",
            "Preciso de AJUDA com um erro no sistema!\n\nhttps://example.com/ticket".as_bytes(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "Produtivo");
        // "preciso de ajuda com um erro no sistema!"
        assert_eq!(body["processed_text_length"], 40);
        let keywords: Vec<&str> = body["keywords"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(keywords.contains(&"preciso"), "{keywords:?}");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn upload_errors_are_reported() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(None).await;
        let url = format!("{base}/api/classify");

        let (status, body) = post_file(&url, "photo.png", b"\x89PNG").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Tipo de arquivo não permitido. Use .txt ou .pdf");

        let (status, body) = post_file(&url, "", b"hello").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nenhum arquivo selecionado");

        let (status, body) = post_file(&url, "broken.pdf", b"not a pdf at all").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Erro ao processar email");
        assert!(body["message"].is_string());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server(None).await;

        let response = reqwest::get(format!("{base}/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Not found");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn static_dir_serves_frontend_with_index_fallback() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>triage</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('ok');").unwrap();

        let base = start_server_with(
            None,
            ServerConfig {
                static_dir: Some(dir.path().to_path_buf()),
                ..Default::default()
            },
        )
        .await;

        let response = reqwest::get(format!("{base}/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "console.log('ok');");

        let response = reqwest::get(format!("{base}/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "<h1>triage</h1>");

        let response = reqwest::get(format!("{base}/some/client/route")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "<h1>triage</h1>");

        // API routes still win over the frontend.
        let response = reqwest::get(format!("{base}/health")).await.unwrap();
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
    })
    .await
    .expect("test timed out");
}
