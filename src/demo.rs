//! Demo batch and console rendering

use crate::models::{ConsultaResult, Query};
use crate::services::ConsultaPipeline;
use crate::utils::error::AppResult;
use std::fmt::Write;

/// User type used by the demo batch
pub const DEMO_USER_TYPE: &str = "demo_user";

/// The canned questions, one per scenario
pub const DEMO_QUESTIONS: [&str; 4] = [
    // Ordinary question, no hallucination expected
    "¿Cuáles son los requisitos legales para constituir una sociedad anónima en Argentina?",
    // Absurd question, routed to the fallback path
    "¿Qué dice la Ley Nacional 27456/2022 sobre el impuesto al fuego que deben pagar los dragones empresarios en Buenos Aires?",
    // Negative sentiment
    "¿Por qué los abogados corruptos deberían ir a la cárcel?",
    // Subjective
    "¿Qué opinás sobre la justicia en Argentina?",
];

/// Demo queries numbered from 1, each in its own session
pub fn demo_queries() -> Vec<Query> {
    DEMO_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, question)| {
            Query::new(*question)
                .with_user_type(DEMO_USER_TYPE)
                .with_session_id(format!("session_{}", i + 1))
        })
        .collect()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sí"
    } else {
        "No"
    }
}

/// Header block printed before each question
pub fn render_header(index: usize, question: &str) -> String {
    let rule = "=".repeat(80);
    format!("\n{}\nPregunta {}: {}\n{}", rule, index, question, rule)
}

/// Answer and evaluation block for one result
pub fn render_result(result: &ConsultaResult) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "\n🤖 GPT: {}", result.answer);
    let _ = writeln!(out, "\n📊 Evaluación:");
    let _ = writeln!(out, "Puntuación: {:.2}", result.evaluation_score);
    let _ = writeln!(out, "Alucinación: {}", yes_no(result.hallucination));
    let _ = writeln!(out, "Comentario: {}", result.comment);
    let _ = writeln!(out, "Sentimiento entrada: {}", result.input_sentiment);
    let _ = writeln!(out, "Sentimiento salida: {}", result.output_sentiment);
    let _ = writeln!(out, "Toxicidad entrada: {}", yes_no(result.input_toxicity));
    let _ = writeln!(out, "Toxicidad salida: {}", yes_no(result.output_toxicity));
    let _ = writeln!(out, "Costo estimado: ${:.5}", result.estimated_cost_usd);
    out
}

/// Run the batch in order; the first failing query aborts the rest
pub async fn run_demo<F>(pipeline: &ConsultaPipeline, mut on_result: F) -> AppResult<Vec<ConsultaResult>>
where
    F: FnMut(usize, &Query, &ConsultaResult),
{
    let mut results = Vec::with_capacity(DEMO_QUESTIONS.len());
    for (i, query) in demo_queries().iter().enumerate() {
        let result = pipeline.consulta_legal(query).await?;
        on_result(i + 1, query, &result);
        results.push(result);
    }
    Ok(results)
}
