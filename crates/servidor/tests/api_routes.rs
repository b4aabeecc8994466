// End-to-end route behavior through the full middleware stack

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use catalogo::{genericos::RETAILERS, Catalogs};
use conversa::{ChatBackend, Discussion};
use serde_json::{json, Value};
use servidor::{build_app, AppState, ServerConfig};
use std::sync::Arc;
use tower::ServiceExt;

struct EchoBackend {
    fail: bool,
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn complete(&self, prompt: &str) -> conversa::Result<String> {
        if self.fail {
            return Err(conversa::Error::Upstream {
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(format!("eco ({} chars)", prompt.len()))
    }

    fn model(&self) -> &str {
        "echo"
    }
}

fn state() -> AppState {
    AppState::new(Catalogs::embedded().unwrap(), ServerConfig::default())
}

fn app() -> Router {
    build_app(state())
}

fn app_with_backend(fail: bool) -> Router {
    let discussion = Discussion::new(Arc::new(EchoBackend { fail })).unwrap();
    build_app(state().with_discussion(discussion))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn ids(results: &Value) -> Vec<&str> {
    results["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_and_status() {
    let app = app();
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["records"], 91);

    let (status, body) = get(&app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["claude_configurado"], false);
    assert_eq!(body["sessoes_ativas"], 0);
    assert_eq!(body["catalogos"]["psiquiatria"], 20);
}

#[tokio::test]
async fn test_formulary_routes() {
    let app = app();

    for uri in ["/api/genericos", "/api/genericos/"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 39);
        assert!(body["fontes"]["pfpb_pdf"]["url"].is_string());
    }

    let (_, body) = get(&app, "/api/genericos/search?q=sinvastatina%2020%20mg&limit=3").await;
    assert_eq!(body["count"], 3);
    assert_eq!(ids(&body)[0], "sinvastatina-20mg");

    let (_, body) = get(&app, "/api/genericos/search?grupo=glaucoma&gratuito=TRUE").await;
    assert_eq!(ids(&body), vec!["timolol-2-5mg", "timolol-5mg"]);

    let (_, body) = get(&app, "/api/genericos/search?gratuito=sim").await;
    assert_eq!(body["count"], 0);

    let (status, body) = get(&app, "/api/genericos/sources").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (_, body) = get(&app, "/api/genericos/grupos").await;
    assert_eq!(body["glaucoma"], 2);

    let (status, body) = get(&app, "/api/genericos/timolol-5mg/links").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["compra"].as_array().unwrap().len(), RETAILERS.len());

    let (status, body) = get(&app, "/api/genericos/nao-existe/resumo").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_psych_routes() {
    let app = app();

    let (_, body) = get(&app, "/api/psiq/").await;
    assert_eq!(body["totais"]["total"], 20);
    assert_eq!(body["observacoes"].as_array().unwrap().len(), 3);

    let (_, body) = get(&app, "/api/psiq/search?q=N05A").await;
    assert_eq!(body["count"], 8);

    let (_, body) = get(&app, "/api/psiq/search?componente=especializado&limit=abc").await;
    assert_eq!(body["count"], 6);

    let (_, body) = get(&app, "/api/psiq/fluoxetina-20mg/links").await;
    assert_eq!(
        body["links"]["drogasil"],
        "https://www.drogasil.com.br/busca?q=fluoxetina+20+mg"
    );

    let (status, _) = get(&app, "/api/psiq/nao-existe").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bibliography_routes() {
    let app = app();

    let (_, body) = get(&app, "/api/referencias").await;
    assert_eq!(body["total"], 32);
    assert!(body["categorias"]["fenomenologica"]["total"].as_u64().unwrap() > 0);

    let (_, body) = get(
        &app,
        "/api/referencias/search?category=fenomenologica&yearFrom=1900&yearTo=1950",
    )
    .await;
    assert_eq!(ids(&body), vec!["binswanger-1942", "jaspers-1913", "minkowski-1933"]);

    let (status, body) = get(&app, "/api/referencias/search?category=outra").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 32);

    let (status, _) = get(&app, "/api/referencias/search?yearFrom=antigo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/api/referencias/strings/integrativa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categoria"], "integrativa");
    assert_eq!(body["total"], body["referencias"].as_array().unwrap().len());

    let (status, _) = get(&app, "/api/referencias/strings/outra").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = get(&app, "/api/referencias/json").await;
    assert!(body["cientifica"].is_array());

    let (_, body) = get(&app, "/api/referencias/json/flat").await;
    assert_eq!(body.as_array().unwrap().len(), 32);
    assert!(body[0]["first_author_sort"].is_string());

    let (_, body) = get(&app, "/api/referencias/jaspers-1913/citation").await;
    assert!(body["citation"].as_str().unwrap().starts_with("Jaspers, K. (1913)."));
}

#[tokio::test]
async fn test_session_without_backend() {
    let app = app();

    let (status, _) = post(&app, "/api/iniciar-sessao", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(
        &app,
        "/api/iniciar-sessao",
        json!({"nome": "Ana", "topico": "catatonia"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipo"], "discussao_clinica");
    assert!(body["mensagem"].as_str().unwrap().contains("catatonia"));
    let session_id = body["sessaoId"].as_str().unwrap().to_string();

    let (status, _) = post(&app, "/api/conversar", json!({"sessaoId": session_id})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/conversar",
        json!({"sessaoId": "nao-existe", "mensagem": "Oi"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = post(
        &app,
        "/api/conversar",
        json!({"sessaoId": session_id, "mensagem": "Oi"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_full_discussion() {
    let app = app_with_backend(false);

    let (_, body) = post(&app, "/api/iniciar-sessao", json!({"nome": "Paulo"})).await;
    let session_id = body["sessaoId"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/api/conversar",
        json!({"sessaoId": session_id, "mensagem": "Qual a conduta na crise?"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["resposta"].as_str().unwrap().starts_with("eco"));
    assert_eq!(body["categorias"], json!(["manejo_pratico"]));

    let (_, body) = get(&app, &format!("/api/sessao/{session_id}")).await;
    assert_eq!(body["totalMensagens"], 2);
    assert_eq!(body["topicos_discutidos"], json!(["manejo_pratico"]));

    let (_, body) = get(&app, &format!("/api/sessao/{session_id}/historico")).await;
    assert_eq!(body["historico"][0]["tipo"], "colega");
    assert_eq!(body["historico"][1]["tipo"], "assistente");
    assert_eq!(body["colega"]["nome"], "Paulo");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/sessao/{session_id}/exportar"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        format!("attachment; filename=\"discussao_{session_id}.txt\"").as_str()
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let transcript = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(transcript.starts_with("DISCUSSÃO CLÍNICA - "));
    assert!(transcript.contains("Dr(a). Paulo: Qual a conduta na crise?"));

    let (status, body) = post(
        &app,
        "/api/finalizar-sessao",
        json!({"sessaoId": session_id, "resumo": "Caso discutido"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resumo"]["totalMensagens"], 2);
    assert_eq!(body["resumo"]["texto"], "Caso discutido");
    assert_eq!(body["resumo"]["participantes"]["colega"], "Dr(a). Paulo");

    let (status, body) = post(
        &app,
        "/api/conversar",
        json!({"sessaoId": session_id, "mensagem": "Mais uma"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_backend_failure_is_bad_gateway() {
    let app = app_with_backend(true);
    let (_, body) = post(&app, "/api/iniciar-sessao", json!({"nome": "Ana"})).await;
    let session_id = body["sessaoId"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/api/conversar",
        json!({"sessaoId": session_id, "mensagem": "Oi"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body["error"].as_str().unwrap().contains("boom"));
}

#[tokio::test]
async fn test_session_lookup_errors() {
    let app = app();
    let (status, _) = get(&app, "/api/sessao/nao-existe").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(&app, "/api/finalizar-sessao", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/api/finalizar-sessao", json!({"sessaoId": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reading_suggestions() {
    let app = app();

    let (status, _) = post(&app, "/api/buscar-referencias", json!({"tipo": "cientifica"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(
        &app,
        "/api/buscar-referencias",
        json!({"topico": "esquizofrenia", "tipo": "desconhecida"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tipo"], "integrativa");
    assert!(!body["referencias"].as_array().unwrap().is_empty());

    let (_, body) = post(
        &app,
        "/api/buscar-referencias",
        json!({"topico": "psicopatologia", "tipo": "fenomenologica"}),
    )
    .await;
    assert_eq!(body["tipo"], "fenomenologica");
}
