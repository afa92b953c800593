//! Medcode batch entrypoint.
//!
//! Loads a concept dictionary and an input CSV, runs the configured
//! retrieve-then-infer pipeline once per input row, and writes the
//! results with their audit trails as JSON.
//!
//! Usage: `medcode <concepts.csv> <inputs.csv> [output.json]`
//!
//! Strategy selection and tunables come from `MEDCODE_*` environment
//! variables; see [`Config`].

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;

use medcode::audit::AuditTrail;
use medcode::config::{Config, InferenceKind, RetrieverKind};
use medcode::dictionary::{CsvSchema, InputCsvSchema, InputRecord};
use medcode::embedding::{EmbeddingConfig, OpenAiEmbeddingClient};
use medcode::hashing::hash_input_bytes;
use medcode::inference::{CodeInference, InferredCode, LlmCodeInference, MockCodeInference};
use medcode::pipeline::{CodePipeline, PipelineConfig};
use medcode::retriever::{EmbeddingRetriever, Retriever, TokenRetriever};

/// One output row of a batch run.
#[derive(Debug, Serialize)]
struct BatchRecord {
    id: String,
    name: String,
    inferred_codes: Vec<InferredCode>,
    audit: AuditTrail,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (concepts_path, inputs_path, output_path) = match args.as_slice() {
        [concepts, inputs] => (concepts.clone(), inputs.clone(), None),
        [concepts, inputs, output] => (concepts.clone(), inputs.clone(), Some(output.clone())),
        _ => anyhow::bail!("usage: medcode <concepts.csv> <inputs.csv> [output.json]"),
    };

    let concept_schema = CsvSchema::default();
    let concepts_bytes = std::fs::read(&concepts_path)
        .with_context(|| format!("reading concept dictionary from {concepts_path}"))?;
    let dictionary_hash = hash_input_bytes(&concepts_bytes);
    let concepts_text = String::from_utf8(concepts_bytes)
        .with_context(|| format!("concept dictionary {concepts_path} is not valid UTF-8"))?;
    let concepts = medcode::dictionary::load_concepts_from_str(&concepts_text, &concept_schema)
        .with_context(|| format!("loading concept dictionary from {concepts_path}"))?;
    let inputs = medcode::dictionary::load_inputs_from_csv(&inputs_path, &InputCsvSchema::default())
        .with_context(|| format!("loading inputs from {inputs_path}"))?;

    tracing::info!(
        concepts = concepts.len(),
        inputs = inputs.len(),
        retriever = ?config.retriever,
        inference = ?config.inference,
        "medcode batch starting"
    );

    let retriever: Arc<dyn Retriever> = match config.retriever {
        RetrieverKind::Token => Arc::new(TokenRetriever::new()),
        RetrieverKind::Embedding => {
            let client = OpenAiEmbeddingClient::new(EmbeddingConfig {
                api_key: config.api_key.clone(),
                endpoint: config.embedding_endpoint.clone(),
                model: config.embedding_model.clone(),
            })?;
            Arc::new(EmbeddingRetriever::with_batch_size(
                client,
                config.embedding_batch_size,
            ))
        }
    };

    let dictionary_rows = concepts.len();
    retriever
        .index(concepts)
        .await
        .context("indexing concept dictionary")?;

    let mut model_params = BTreeMap::new();
    let model: Arc<dyn CodeInference> = match config.inference {
        InferenceKind::Mock => Arc::new(MockCodeInference::new()),
        InferenceKind::Llm => {
            model_params.insert("chat_model".to_string(), config.chat_model.clone());
            Arc::new(LlmCodeInference::new(&config.chat_model))
        }
    };

    let pipeline_config = PipelineConfig {
        top_k: config.top_k,
        min_retrieval_score: config.min_retrieval_score,
    };
    let pipeline =
        CodePipeline::new(retriever, model, pipeline_config)?.with_model_params(model_params);

    let mut records = Vec::with_capacity(inputs.len());
    for input in &inputs {
        records.push(
            run_one(
                &pipeline,
                input,
                dictionary_rows,
                &concept_schema,
                &dictionary_hash,
            )
            .await?,
        );
    }

    let json = serde_json::to_string_pretty(&records)?;
    match output_path {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("writing results to {path}"))?;
            tracing::info!(path, records = records.len(), "batch results written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

async fn run_one(
    pipeline: &CodePipeline<Arc<dyn Retriever>, Arc<dyn CodeInference>>,
    input: &InputRecord,
    dictionary_rows: usize,
    schema: &CsvSchema,
    dictionary_hash: &str,
) -> anyhow::Result<BatchRecord> {
    let mut trail = AuditTrail::for_input(&input.text)
        .with_dictionary(dictionary_rows, schema.columns())
        .with_environment("dictionary_hash", dictionary_hash);

    let result = pipeline
        .run(&input.text, Some(&mut trail))
        .await
        .with_context(|| format!("pipeline run failed for input {}", input.id))?;

    tracing::info!(
        input_id = %input.id,
        inferred = result.inferred.len(),
        "input processed"
    );

    Ok(BatchRecord {
        id: input.id.clone(),
        name: input.name.clone(),
        inferred_codes: result.inferred,
        audit: trail,
    })
}
