//! Consultation pipeline tests against a scripted provider

mod common;

use common::*;
use legal_llmobs::models::Query;
use legal_llmobs::services::prompts::TRIGGER_QUESTION;
use legal_llmobs::utils::error::{AppError, CallSite, ParseErrorKind};
use std::sync::Arc;

const ORDINARY: &str = "¿Cuáles son los requisitos legales para constituir una sociedad anónima en Argentina?";

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn test_ordinary_question_uses_primary_path() {
    let provider = Arc::new(ScriptedProvider::happy_path("Se requieren dos socios.", EVALUATION_OK));
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider.clone(), sink.clone());

    let result = pipeline.consulta_legal(&Query::new(ORDINARY)).await.unwrap();

    assert_eq!(result.model, "gpt-4");
    assert_eq!(result.answer, "Se requieren dos socios.");
    assert_eq!(result.question, ORDINARY);
    assert!(close(result.evaluation_score, 0.85));
    assert!(!result.hallucination);
    assert_eq!(result.comment, "Respuesta correcta.");
    assert_eq!(result.input_sentiment, "neutral");
    assert_eq!(result.output_sentiment, "positivo");
    assert!(!result.input_toxicity);
    assert!(!result.output_toxicity);

    let requests = provider.requests();
    assert_eq!(requests[0].model, "gpt-4");
    assert_eq!(requests[0].temperature, 0.2);
    assert!(requests[0].prompt.starts_with("Sos un abogado experto."));
}

#[tokio::test]
async fn test_trigger_question_uses_fallback_path() {
    let provider = Arc::new(ScriptedProvider::happy_path(
        "Según el artículo 7 de la Ley 27456...",
        EVALUATION_FABRICATED,
    ));
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider.clone(), sink.clone());

    let query = Query::new(format!("  {}  ", TRIGGER_QUESTION.to_uppercase()));
    let result = pipeline.consulta_legal(&query).await.unwrap();

    assert_eq!(result.model, "gpt-3.5-turbo");
    assert!(result.hallucination);

    let requests = provider.requests();
    assert_eq!(requests[0].model, "gpt-3.5-turbo");
    assert_eq!(requests[0].temperature, 0.7);
    assert!(requests[0].prompt.contains("INVENTA algo ficticio"));
    // The evaluator stays on its own model regardless of the answering path
    assert_eq!(requests[1].model, "gpt-4");
}

#[tokio::test]
async fn test_calls_are_issued_in_order() {
    let provider = Arc::new(ScriptedProvider::happy_path("Respuesta.", EVALUATION_OK));
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider.clone(), sink);

    pipeline.consulta_legal(&Query::new(ORDINARY)).await.unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 6);
    assert_eq!(provider.remaining(), 0);

    assert_eq!(requests[1].temperature, 0.1);
    assert!(requests[1].prompt.contains(&format!("Pregunta: {}", ORDINARY)));
    assert!(requests[1].prompt.contains("Respuesta: Respuesta."));

    for request in &requests[2..] {
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.temperature, 0.0);
    }
    assert!(requests[2].prompt.contains("'sentimiento'"));
    assert!(requests[2].prompt.contains(&format!("Texto: {}", ORDINARY)));
    assert!(requests[3].prompt.contains("'sentimiento'"));
    assert!(requests[3].prompt.contains("Texto: Respuesta."));
    assert!(requests[4].prompt.contains("'toxico'"));
    assert!(requests[4].prompt.contains(&format!("Texto: {}", ORDINARY)));
    assert!(requests[5].prompt.contains("'toxico'"));
    assert!(requests[5].prompt.contains("Texto: Respuesta."));
}

#[tokio::test]
async fn test_cost_counts_answer_and_evaluation_only() {
    let provider = Arc::new(ScriptedProvider::happy_path("Respuesta.", EVALUATION_OK));
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider, sink);

    let result = pipeline.consulta_legal(&Query::new(ORDINARY)).await.unwrap();

    assert_eq!(result.input_tokens, 1300);
    assert_eq!(result.output_tokens, 550);
    // 1300 * 0.00001 + 550 * 0.00003
    assert!(close(result.estimated_cost_usd, 0.0295));
}

#[tokio::test]
async fn test_provider_maximum_usage_does_not_overflow() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply("Respuesta.", u32::MAX, u32::MAX)
            .reply(EVALUATION_OK, u32::MAX, 1)
            .reply(sentiment("neutral"), u32::MAX, u32::MAX)
            .reply(sentiment("neutral"), u32::MAX, u32::MAX)
            .reply(toxicity(false), u32::MAX, u32::MAX)
            .reply(toxicity(false), u32::MAX, u32::MAX),
    );
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider, sink);

    let result = pipeline.consulta_legal(&Query::new(ORDINARY)).await.unwrap();

    let max = u64::from(u32::MAX);
    assert_eq!(result.input_tokens, 2 * max);
    assert_eq!(result.output_tokens, max + 1);
    let expected = 2.0 * max as f64 * 0.00001 + (max + 1) as f64 * 0.00003;
    assert!((result.estimated_cost_usd - expected).abs() < 1e-3);
}

#[tokio::test]
async fn test_annotation_emitted_once() {
    let provider = Arc::new(ScriptedProvider::happy_path("Respuesta.", EVALUATION_OK));
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider, sink.clone());

    let query = Query::new(ORDINARY)
        .with_user_type("demo_user")
        .with_session_id("session_1");
    pipeline.consulta_legal(&query).await.unwrap();

    let annotations = sink.annotations();
    assert_eq!(annotations.len(), 1);

    let annotation = &annotations[0];
    assert!(annotation.input_data.starts_with("Sos un abogado experto."));
    assert!(annotation.input_data.ends_with(ORDINARY));
    assert_eq!(annotation.output_data, "Respuesta.");
    assert_eq!(annotation.metadata.len(), 14);
    assert_eq!(annotation.metadata["session_id"], "session_1");
    assert_eq!(annotation.metadata["prompt_name"], "consulta_legal_v1");
    assert_eq!(annotation.metadata["input_tokens"], 1300);
    assert_eq!(annotation.tags["entorno"], "demo");
    assert_eq!(annotation.tags["modelo"], "gpt-4");
    assert_eq!(annotation.tags["hallucination"], "false");
    assert_eq!(annotation.tags["user_type"], "demo_user");
}

#[tokio::test]
async fn test_unlisted_sentiment_passes_through() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply("Depende.", 10, 10)
            .reply(EVALUATION_OK, 10, 10)
            .reply(sentiment("mixto"), 1, 1)
            .reply(sentiment("negativo"), 1, 1)
            .reply(toxicity(true), 1, 1)
            .reply(toxicity(false), 1, 1),
    );
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider, sink);

    let result = pipeline
        .consulta_legal(&Query::new("¿Por qué los abogados corruptos deberían ir a la cárcel?"))
        .await
        .unwrap();

    assert_eq!(result.input_sentiment, "mixto");
    assert_eq!(result.output_sentiment, "negativo");
    assert!(result.input_toxicity);
    assert!(!result.output_toxicity);
}

/// Script where the reply at `bad_index` is malformed
fn script_with_bad_reply(bad_index: usize) -> ScriptedProvider {
    let good = [
        "Respuesta.".to_string(),
        EVALUATION_OK.to_string(),
        sentiment("neutral"),
        sentiment("neutral"),
        toxicity(false),
        toxicity(false),
    ];

    good.iter()
        .enumerate()
        .fold(ScriptedProvider::new(), |provider, (i, text)| {
            if i == bad_index {
                provider.reply("Claro, aquí está el JSON pedido.", 1, 1)
            } else {
                provider.reply(text.as_str(), 1, 1)
            }
        })
}

#[tokio::test]
async fn test_malformed_output_names_its_call_site() {
    let cases = [
        (1, CallSite::Evaluation),
        (2, CallSite::InputSentiment),
        (3, CallSite::OutputSentiment),
        (4, CallSite::InputToxicity),
        (5, CallSite::OutputToxicity),
    ];

    for (bad_index, expected_site) in cases {
        let provider = Arc::new(script_with_bad_reply(bad_index));
        let sink = Arc::new(RecordingSink::default());
        let pipeline = pipeline(provider.clone(), sink.clone());

        let err = pipeline.consulta_legal(&Query::new(ORDINARY)).await.unwrap_err();
        match err {
            AppError::Parse(parse) => {
                assert_eq!(parse.site, expected_site);
                assert!(matches!(parse.kind, ParseErrorKind::InvalidJson(_)));
            }
            other => panic!("expected parse error, got {:?}", other),
        }

        // Later calls are never issued and nothing is annotated
        assert_eq!(provider.requests().len(), bad_index + 1);
        assert!(sink.annotations().is_empty());
    }
}

#[tokio::test]
async fn test_missing_evaluation_key() {
    let provider = Arc::new(
        ScriptedProvider::new()
            .reply("Respuesta.", 1, 1)
            .reply(r#"{"evaluation_score": 0.5, "comentario": "ok"}"#, 1, 1),
    );
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider, sink);

    let err = pipeline.consulta_legal(&Query::new(ORDINARY)).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Model output parse error: evaluation: missing key 'hallucination'"
    );
}

#[tokio::test]
async fn test_provider_error_aborts_query() {
    let provider = Arc::new(ScriptedProvider::new().fail(AppError::RateLimit));
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider.clone(), sink.clone());

    let err = pipeline.consulta_legal(&Query::new(ORDINARY)).await.unwrap_err();
    assert!(matches!(err, AppError::RateLimit));
    assert_eq!(provider.requests().len(), 1);
    assert!(sink.annotations().is_empty());
}

#[tokio::test]
async fn test_demo_batch_stops_at_first_failure() {
    let provider = Arc::new(
        ScriptedProvider::happy_path("Respuesta.", EVALUATION_OK).fail(AppError::Timeout),
    );
    let sink = Arc::new(RecordingSink::default());
    let pipeline = pipeline(provider.clone(), sink.clone());

    let mut seen = Vec::new();
    let err = legal_llmobs::demo::run_demo(&pipeline, |i, _, _| seen.push(i))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Timeout));
    assert_eq!(seen, vec![1]);
    assert_eq!(sink.annotations().len(), 1);
    assert_eq!(provider.requests().len(), 7);
}
