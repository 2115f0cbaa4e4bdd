//! Property tests for URL normalization, envelope decoding and chunk defaults

use proptest::prelude::*;
use ragflow_core::models::{Chunk, ConnectionConfig};
use ragflow_core::Envelope;
use serde_json::{json, Map, Value};

proptest! {
    #[test]
    fn normalized_base_url_never_ends_with_slash(
        host in "[a-z]{1,12}",
        port in 1u16..,
        slashes in 0usize..4,
    ) {
        let raw = format!("http://{}:{}{}", host, port, "/".repeat(slashes));
        let config = ConnectionConfig::new(&raw, "key");

        prop_assert!(!config.base_url().ends_with('/'));
        prop_assert_eq!(config.base_url(), format!("http://{}:{}", host, port));
        prop_assert_eq!(
            config.endpoint("/api/v1/system/health"),
            format!("http://{}:{}/api/v1/system/health", host, port)
        );
    }

    #[test]
    fn nonzero_code_always_fails_with_server_message(
        code in any::<i64>().prop_filter("non-zero", |c| *c != 0),
        message in "[ -~]{0,40}",
    ) {
        let body = json!({"code": code, "message": message, "data": []});
        let err = Envelope::decode(&body).into_result().unwrap_err();
        prop_assert_eq!(err.message(), format!("API Error: {}", message));
    }

    #[test]
    fn zero_code_returns_data_unchanged(
        items in proptest::collection::vec("[a-z0-9]{1,8}", 0..10),
    ) {
        let data: Vec<Value> = items.iter().map(|id| json!({"id": id, "name": id})).collect();
        let body = json!({"code": 0, "data": data.clone()});
        prop_assert_eq!(Envelope::decode(&body).into_result().unwrap(), Value::Array(data));
    }

    #[test]
    fn missing_scores_default_to_zero(
        keep_similarity in any::<bool>(),
        keep_vector in any::<bool>(),
        keep_term in any::<bool>(),
        keep_keyword in any::<bool>(),
        score in 0.0f64..=1.0,
    ) {
        let mut element = Map::new();
        element.insert("content".into(), json!("text"));
        if keep_similarity {
            element.insert("similarity".into(), json!(score));
        }
        if keep_vector {
            element.insert("vector_similarity".into(), json!(score));
        }
        if keep_term {
            element.insert("term_similarity".into(), json!(score));
        }
        if keep_keyword {
            element.insert("document_keyword".into(), json!("guide.md"));
        }

        let chunk = Chunk::from_value(&Value::Object(element));

        prop_assert_eq!(chunk.similarity, if keep_similarity { score } else { 0.0 });
        prop_assert_eq!(chunk.vector_similarity, if keep_vector { score } else { 0.0 });
        prop_assert_eq!(chunk.term_similarity, if keep_term { score } else { 0.0 });
        prop_assert_eq!(
            chunk.document_name.as_str(),
            if keep_keyword { "guide.md" } else { "Unknown" }
        );
    }
}
