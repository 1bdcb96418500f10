//! Integration test module
//!
//! End-to-end tests through the real OpenAI provider against a mock upstream

#[cfg(test)]
mod integration_tests {
    use crate::config::*;
    use crate::handlers::create_router;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use httpmock::prelude::*;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Create test settings pointing at the mock upstream
    fn create_test_settings(base_url: String) -> Settings {
        Settings {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8083,
                max_request_size: 1024 * 1024,
            },
            openai: OpenAIConfig {
                api_key: "sk-test-key-for-testing".to_string(),
                base_url,
                timeout: 5,
            },
            models: ModelSettings::default(),
            pricing: PricingConfig::default(),
            llmobs: ObservabilityConfig {
                sink: SinkKind::None,
                ..ObservabilityConfig::default()
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "text".to_string(),
            },
        }
    }

    fn completion(content: &str, prompt_tokens: u32, completion_tokens: u32) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1715000000,
            "model": "gpt-4",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": prompt_tokens, "completion_tokens": completion_tokens}
        })
    }

    async fn mock_upstream(server: &MockServer, evaluation: &str) {
        let cases = [
            ("Sos un abogado experto", completion("Un contrato es un acuerdo.", 200, 100)),
            ("evaluador experto", completion(evaluation, 100, 20)),
            ("'sentimiento'", completion(r#"{"sentimiento": "neutral"}"#, 30, 5)),
            ("'toxico'", completion(r#"{"toxico": false}"#, 30, 5)),
        ];

        for (marker, body) in cases {
            server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/v1/chat/completions")
                        .body_contains(marker);
                    then.status(200).json_body(body);
                })
                .await;
        }
    }

    fn consulta(pregunta: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/consultas")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "pregunta": pregunta }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_consulta_end_to_end() {
        let server = MockServer::start_async().await;
        mock_upstream(
            &server,
            r#"{"evaluation_score": 0.9, "hallucination": false, "comentario": "Correcta."}"#,
        )
        .await;

        let app = create_router(create_test_settings(server.url("/v1")))
            .expect("Failed to create router");
        let response = app.oneshot(consulta("¿Qué es un contrato?")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["pregunta"], "¿Qué es un contrato?");
        assert_eq!(body["respuesta"], "Un contrato es un acuerdo.");
        assert_eq!(body["modelo_respuesta"], "gpt-4");
        assert_eq!(body["input_tokens"], 300);
        assert_eq!(body["output_tokens"], 120);
        // 300 * 0.00001 + 120 * 0.00003
        assert!((body["estimated_cost_usd"].as_f64().unwrap() - 0.0066).abs() < 1e-9);
        assert_eq!(body["input_sentiment"], "neutral");
        assert_eq!(body["output_toxicity"], false);
    }

    #[tokio::test]
    async fn test_evaluation_with_prose_is_bad_gateway() {
        let server = MockServer::start_async().await;
        mock_upstream(&server, "La respuesta parece correcta.").await;

        let app = create_router(create_test_settings(server.url("/v1")))
            .expect("Failed to create router");
        let response = app.oneshot(consulta("¿Qué es un contrato?")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["call_site"], "evaluation");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let server = MockServer::start_async().await;
        let app = create_router(create_test_settings(server.url("/v1")))
            .expect("Failed to create router");

        let request = Request::builder()
            .uri("/v1/messages")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
