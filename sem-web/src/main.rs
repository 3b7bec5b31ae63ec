//! Servidor web Axum que expõe o renderizador de anotações em HTML com abas

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use sem_core::{
    corpus::{demo_corpus, demo_mapping},
    Corpus, Document, ExportConfig, HtmlExporter, RenderError, RenderedPage, DEFAULT_CSS,
    TABS_CSS,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Estado compartilhado da aplicação
struct AppState {
    /// Configuração usada quando a requisição não traz a sua
    exporter: HtmlExporter,
}

#[derive(Deserialize)]
struct RenderDocumentRequest {
    document: Document,
    #[serde(default)]
    config: Option<ExportConfig>,
}

#[derive(Deserialize)]
struct RenderCorpusRequest {
    corpus: Corpus,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    config: Option<ExportConfig>,
}

/// Erro de renderização convertido em resposta JSON
struct ApiError(RenderError);

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RenderError::UnsupportedEncoding(_) | RenderError::Json(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        };
        warn!("requisição rejeitada: {}", self.0);
        (status, Json(serde_json::json!({"error": self.0.to_string()}))).into_response()
    }
}

/// Configuração padrão do servidor: camadas do corpus de demonstração e folha de
/// idioma definida por `SEM_LANG_STYLE`.
fn default_config() -> ExportConfig {
    let mut config = ExportConfig::default().with_layers(demo_mapping());
    if let Ok(lang) = std::env::var("SEM_LANG_STYLE") {
        config.stylesheets.lang = lang;
    }
    config
}

fn app(exporter: HtmlExporter) -> Router {
    let state = Arc::new(AppState { exporter });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/tabs.css", get(tabs_css_handler))
        .route("/default.css", get(default_css_handler))
        .route("/render/document", post(render_document_handler))
        .route("/render/corpus", post(render_corpus_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("SEM_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let exporter = HtmlExporter::new(default_config());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Servidor iniciado em http://{addr}");
    axum::serve(listener, app(exporter)).await
}

/// Converte a página para a codificação declarada
fn html_response(page: RenderedPage) -> Result<Response, ApiError> {
    let bytes = page.to_bytes()?;
    let content_type = format!("text/html; charset={}", page.charset);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Página de demonstração com as três camadas
async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let page = state.exporter.corpus_to_html(&demo_corpus(), Some("Demonstração"))?;
    Ok(Html(page.html))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

async fn tabs_css_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], TABS_CSS)
}

async fn default_css_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], DEFAULT_CSS)
}

/// Renderiza um documento anotado por offsets
async fn render_document_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderDocumentRequest>,
) -> Result<Response, ApiError> {
    info!(
        "Renderizando documento {:?}: {} chars, {} camadas",
        req.document.name,
        req.document.content.chars().count(),
        req.document.annotations.len()
    );
    let page = match req.config {
        Some(config) => HtmlExporter::new(config).document_to_html(&req.document)?,
        None => state.exporter.document_to_html(&req.document)?,
    };
    html_response(page)
}

/// Renderiza um corpus tokenizado com colunas de tags
async fn render_corpus_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RenderCorpusRequest>,
) -> Result<Response, ApiError> {
    info!(
        "Renderizando corpus: {} sentenças, campos {:?}",
        req.corpus.len(),
        req.corpus.fields
    );
    let name = req.name.as_deref();
    let page = match req.config {
        Some(config) => HtmlExporter::new(config).corpus_to_html(&req.corpus, name)?,
        None => state.exporter.corpus_to_html(&req.corpus, name)?,
    };
    html_response(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(HtmlExporter::new(
            ExportConfig::default().with_layers(demo_mapping()),
        ))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn post_json(uri: &str, json: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_renders_demo() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<title>Demonstração</title>"));
        assert!(html.contains(r#"<label for="tab3">Named Entity</label>"#));
    }

    #[tokio::test]
    async fn test_tabs_css() {
        let response = test_app()
            .oneshot(Request::builder().uri("/tabs.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
        assert_eq!(body_string(response).await, TABS_CSS);
    }

    #[tokio::test]
    async fn test_render_corpus() {
        let request = post_json(
            "/render/corpus",
            serde_json::json!({
                "name": "Teste",
                "corpus": {
                    "fields": ["word", "ner"],
                    "sentences": [[["John", "B-PER"], ["likes", "O"], ["Paris", "B-LOC"]]]
                },
                "config": {"layers": {"NER": "ner"}}
            }),
        );
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=UTF-8"
        );
        let html = body_string(response).await;
        assert!(html.contains(r#"<span id="PER" title="PER">John</span> likes <span id="LOC" title="LOC">Paris</span>"#));
        assert!(html.contains(r#"checked="true""#));
    }

    #[tokio::test]
    async fn test_render_document_rejects_overlap() {
        let request = post_json(
            "/render/document",
            serde_json::json!({
                "document": {
                    "name": "doc",
                    "content": "abcdef",
                    "annotations": {
                        "ner": {"name": "ner", "annotations": [
                            {"lower": 0, "upper": 3, "value": "A"},
                            {"lower": 2, "upper": 5, "value": "B"}
                        ]}
                    }
                }
            }),
        );
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_string(response).await.contains("se sobrepõem"));
    }

    #[tokio::test]
    async fn test_render_document_with_latin1() {
        let request = post_json(
            "/render/document",
            serde_json::json!({
                "document": {
                    "name": "doc",
                    "content": "Ação",
                    "annotations": {
                        "ner": {"name": "ner", "annotations": [{"lower": 0, "upper": 4, "value": "MISC"}]}
                    }
                },
                "config": {"layers": {"ner": "ner"}, "encoding": "latin1"}
            }),
        );
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=windows-1252"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.windows(2).any(|w| w == [0xE7, 0xE3]));
    }

    #[tokio::test]
    async fn test_unknown_encoding_is_bad_request() {
        let request = post_json(
            "/render/corpus",
            serde_json::json!({
                "corpus": {"fields": ["word"], "sentences": []},
                "config": {"encoding": "klingon"}
            }),
        );
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
