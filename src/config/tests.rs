use super::*;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_medcode_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var(Config::ENV_RETRIEVER);
        env::remove_var(Config::ENV_INFERENCE);
        env::remove_var(Config::ENV_API_KEY);
        env::remove_var(Config::ENV_EMBEDDING_ENDPOINT);
        env::remove_var(Config::ENV_EMBEDDING_MODEL);
        env::remove_var(Config::ENV_EMBEDDING_BATCH_SIZE);
        env::remove_var(Config::ENV_CHAT_MODEL);
        env::remove_var(Config::ENV_TOP_K);
        env::remove_var(Config::ENV_MIN_RETRIEVAL_SCORE);
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.retriever, RetrieverKind::Token);
    assert_eq!(config.inference, InferenceKind::Mock);
    assert!(config.api_key.is_none());
    assert_eq!(config.embedding_batch_size, 128);
    assert_eq!(config.top_k, 15);
    assert_eq!(config.min_retrieval_score, 0.05);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_medcode_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.retriever, RetrieverKind::Token);
    assert_eq!(config.inference, InferenceKind::Mock);
    assert_eq!(config.top_k, 15);
}

#[test]
#[serial]
fn test_from_env_retriever_and_inference_kinds() {
    clear_medcode_env();

    with_env_vars(
        &[
            (Config::ENV_RETRIEVER, "embedding"),
            (Config::ENV_INFERENCE, "llm"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.retriever, RetrieverKind::Embedding);
            assert_eq!(config.inference, InferenceKind::Llm);
        },
    );
}

#[test]
#[serial]
fn test_kind_parsing_is_case_insensitive() {
    clear_medcode_env();

    with_env_vars(&[(Config::ENV_RETRIEVER, "  Token ")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.retriever, RetrieverKind::Token);
    });
}

#[test]
#[serial]
fn test_invalid_retriever_kind() {
    clear_medcode_env();

    with_env_vars(&[(Config::ENV_RETRIEVER, "vector")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRetrieverKind { .. }));
        assert!(err.to_string().contains("vector"));
    });
}

#[test]
#[serial]
fn test_invalid_inference_kind() {
    clear_medcode_env();

    with_env_vars(&[(Config::ENV_INFERENCE, "gpt")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInferenceKind { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_top_k_not_number() {
    clear_medcode_env();

    with_env_vars(&[(Config::ENV_TOP_K, "many")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::IntParseError { .. }));
        assert!(err.to_string().contains("MEDCODE_TOP_K"));
    });
}

#[test]
#[serial]
fn test_invalid_min_score_not_number() {
    clear_medcode_env();

    with_env_vars(&[(Config::ENV_MIN_RETRIEVAL_SCORE, "low")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::FloatParseError { .. }));
    });
}

#[test]
#[serial]
fn test_blank_api_key_treated_as_unset() {
    clear_medcode_env();

    with_env_vars(&[(Config::ENV_API_KEY, "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.api_key.is_none());
    });
}

#[test]
fn test_validate_rejects_zero_top_k() {
    let config = Config {
        top_k: 0,
        ..Default::default()
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_validate_rejects_zero_batch_size() {
    let config = Config {
        embedding_batch_size: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_negative_min_score() {
    let config = Config {
        min_retrieval_score: -1.0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_embedding_retriever_requires_api_key() {
    let config = Config {
        retriever: RetrieverKind::Embedding,
        api_key: None,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar { .. }));
    assert!(err.to_string().contains("MEDCODE_API_KEY"));

    let config = Config {
        retriever: RetrieverKind::Embedding,
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    };
    config.validate().unwrap();
}

#[test]
#[serial]
fn test_full_config_parse() {
    clear_medcode_env();

    with_env_vars(
        &[
            (Config::ENV_RETRIEVER, "embedding"),
            (Config::ENV_INFERENCE, "llm"),
            (Config::ENV_API_KEY, "sk-test"),
            (Config::ENV_EMBEDDING_ENDPOINT, "http://localhost:9999/v1/embeddings"),
            (Config::ENV_EMBEDDING_MODEL, "text-embedding-3-large"),
            (Config::ENV_EMBEDDING_BATCH_SIZE, "64"),
            (Config::ENV_CHAT_MODEL, "gpt-4.1"),
            (Config::ENV_TOP_K, "25"),
            (Config::ENV_MIN_RETRIEVAL_SCORE, "0.1"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");
            config.validate().expect("should validate");

            assert_eq!(config.retriever, RetrieverKind::Embedding);
            assert_eq!(config.inference, InferenceKind::Llm);
            assert_eq!(config.api_key.as_deref(), Some("sk-test"));
            assert_eq!(
                config.embedding_endpoint,
                "http://localhost:9999/v1/embeddings"
            );
            assert_eq!(config.embedding_model, "text-embedding-3-large");
            assert_eq!(config.embedding_batch_size, 64);
            assert_eq!(config.chat_model, "gpt-4.1");
            assert_eq!(config.top_k, 25);
            assert_eq!(config.min_retrieval_score, 0.1);
        },
    );
}
