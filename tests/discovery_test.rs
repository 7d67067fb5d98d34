//! End-to-end discovery tests against in-memory stores

mod common;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use common::*;
use coursescout::api::build_app;
use coursescout::api::handlers::AppState;
use coursescout::config::DiscoveryConfig;
use coursescout::models::DiscoveryRequest;
use coursescout::models::RequirementLink;
use coursescout::CourseScoutError;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn query(text: &str) -> DiscoveryRequest {
    DiscoveryRequest {
        query: Some(text.to_string()),
        ..DiscoveryRequest::default()
    }
}

/// Fifty courses rated 3.0 to 4.96 in steps of 0.04
fn catalog() -> Vec<coursescout::models::CourseMetricRecord> {
    (0..50)
        .map(|i| {
            course(
                &format!("COMP_SCI {:03}", 300 + i),
                Some(3.0 + f64::from(i) / 25.0),
                Some("4 - 7"),
            )
        })
        .collect()
}

// ====== Scenarios ======

#[tokio::test]
async fn test_rating_filter_with_query_returns_top_three() {
    let records = catalog();
    let mut chunks = Vec::new();
    for (i, record) in records.iter().enumerate() {
        // Every course has evidence; higher indices are more relevant
        let sim = 0.46 + (i as f32) * 0.01;
        chunks.push(chunk(record, sim));
        chunks.push(chunk(record, sim - 0.005));
    }
    let h = Harness::with_data(records, chunks);

    let response = h
        .service
        .discover(&DiscoveryRequest {
            min_course_rating: Some(4.0),
            ..query("easy class that teaches PyTorch")
        })
        .await
        .unwrap();

    assert_eq!(response.total_candidates, 25);
    assert!(response.courses.len() <= 3);
    assert!(!response.courses.is_empty());
    for course in &response.courses {
        assert!(course.course_rating_avg.unwrap() >= 4.0);
        assert!(course.similarity_score.unwrap() >= 0.5);
        assert!(!course.matching_snippets.is_empty());
    }
    // Highest-indexed course is the most relevant
    assert_eq!(response.courses[0].code, "COMP_SCI 349");
    let scores: Vec<f64> = response
        .courses
        .iter()
        .filter_map(|c| c.similarity_score)
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(h.embed_calls(), 1);
    assert_eq!(h.chunk_calls(), 1);
}

#[tokio::test]
async fn test_no_candidates_short_circuits_before_embedding() {
    let h = Harness::with_data(catalog(), vec![]);

    let response = h
        .service
        .discover(&DiscoveryRequest {
            min_course_rating: Some(4.99),
            ..query("anything at all")
        })
        .await
        .unwrap();

    assert!(response.courses.is_empty());
    assert_eq!(response.total_candidates, 0);
    assert_eq!(h.embed_calls(), 0);
    assert_eq!(h.chunk_calls(), 0);
}

#[tokio::test]
async fn test_blank_query_reports_candidate_count_only() {
    let h = Harness::with_data(catalog(), vec![]);

    for q in [None, Some(String::new()), Some("   ".to_string())] {
        let response = h
            .service
            .discover(&DiscoveryRequest {
                query: q,
                min_course_rating: Some(4.0),
                ..DiscoveryRequest::default()
            })
            .await
            .unwrap();

        assert!(response.courses.is_empty());
        assert_eq!(response.total_candidates, 25);
    }
    assert_eq!(h.embed_calls(), 0);
}

#[tokio::test]
async fn test_no_chunks_above_floor_returns_empty_list() {
    let records = catalog();
    let chunks = records.iter().map(|r| chunk(r, 0.30)).collect();
    let h = Harness::with_data(records, chunks);

    let response = h.service.discover(&query("quantum basket weaving")).await.unwrap();

    assert!(response.courses.is_empty());
    assert_eq!(response.total_candidates, 50);
    assert_eq!(h.embed_calls(), 1);
}

// ====== Query-less Slice ======

#[tokio::test]
async fn test_rating_sorted_slice_when_configured() {
    let records = vec![
        course("A 100", None, None),
        course("B 100", Some(3.5), None),
        course("C 100", Some(4.5), None),
        course("D 100", Some(4.0), None),
    ];
    let h = Harness::new(
        FakeFilterStore {
            records,
            ..Default::default()
        },
        FakeRequirementIndex::default(),
        FakeEmbedder::default(),
        FakeChunkStore::default(),
        DiscoveryConfig {
            no_query_result_limit: 10,
            ..DiscoveryConfig::default()
        },
    );

    let response = h.service.discover(&DiscoveryRequest::default()).await.unwrap();

    let codes: Vec<&str> = response.courses.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["C 100", "D 100", "B 100", "A 100"]);
    assert!(response.courses.iter().all(|c| c.similarity_score.is_none()));
    assert_eq!(h.embed_calls(), 0);
}

// ====== Requirement Filtering ======

#[tokio::test]
async fn test_requirements_use_and_semantics() {
    let records = vec![
        course("HIST 101", Some(4.0), None),
        course("HIST 102", Some(4.0), None),
        course("HIST 103", Some(4.0), None),
    ];
    let (r1, r2) = (Uuid::new_v4(), Uuid::new_v4());
    let links = vec![
        RequirementLink { course_id: records[0].course_id, requirement_id: r1 },
        RequirementLink { course_id: records[0].course_id, requirement_id: r2 },
        RequirementLink { course_id: records[1].course_id, requirement_id: r1 },
        RequirementLink { course_id: records[2].course_id, requirement_id: r2 },
    ];
    let h = Harness::new(
        FakeFilterStore {
            records,
            ..Default::default()
        },
        FakeRequirementIndex {
            links,
            ..Default::default()
        },
        FakeEmbedder::default(),
        FakeChunkStore::default(),
        DiscoveryConfig::default(),
    );

    let response = h
        .service
        .discover(&DiscoveryRequest {
            requirement_ids: vec![r1.to_string(), r2.to_string()],
            ..DiscoveryRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total_candidates, 1);
    assert_eq!(h.requirement_calls(), 1);
}

#[tokio::test]
async fn test_requirement_index_failure_skips_filter() {
    let h = Harness::new(
        FakeFilterStore {
            records: catalog(),
            ..Default::default()
        },
        FakeRequirementIndex {
            behavior: Behavior::Fail,
            ..Default::default()
        },
        FakeEmbedder::default(),
        FakeChunkStore::default(),
        DiscoveryConfig::default(),
    );

    let response = h
        .service
        .discover(&DiscoveryRequest {
            requirement_ids: vec![Uuid::new_v4().to_string()],
            ..DiscoveryRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total_candidates, 50);
    assert_eq!(h.requirement_calls(), 1);
}

#[tokio::test]
async fn test_requirement_index_timeout_skips_filter() {
    let h = Harness::new(
        FakeFilterStore {
            records: catalog(),
            ..Default::default()
        },
        FakeRequirementIndex {
            behavior: Behavior::Hang,
            ..Default::default()
        },
        FakeEmbedder::default(),
        FakeChunkStore::default(),
        DiscoveryConfig {
            remote_call_timeout_ms: 50,
            ..DiscoveryConfig::default()
        },
    );

    let response = h
        .service
        .discover(&DiscoveryRequest {
            requirement_ids: vec![Uuid::new_v4().to_string()],
            ..DiscoveryRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total_candidates, 50);
}

// ====== Failure Semantics ======

#[tokio::test]
async fn test_filter_store_failure_is_retrieval_error() {
    let h = Harness::new(
        FakeFilterStore {
            records: catalog(),
            behavior: Behavior::Fail,
            ..Default::default()
        },
        FakeRequirementIndex::default(),
        FakeEmbedder::default(),
        FakeChunkStore::default(),
        DiscoveryConfig::default(),
    );

    let err = h.service.discover(&query("databases")).await.unwrap_err();

    assert!(matches!(err, CourseScoutError::Retrieval(_)));
    assert_eq!(err.kind(), "retrieval_error");
    assert_eq!(h.embed_calls(), 0);
}

#[tokio::test]
async fn test_chunk_store_failure_is_retrieval_error() {
    let records = catalog();
    let h = Harness::new(
        FakeFilterStore {
            records,
            ..Default::default()
        },
        FakeRequirementIndex::default(),
        FakeEmbedder::default(),
        FakeChunkStore {
            behavior: Behavior::Fail,
            ..Default::default()
        },
        DiscoveryConfig::default(),
    );

    let err = h.service.discover(&query("databases")).await.unwrap_err();
    assert_eq!(err.kind(), "retrieval_error");
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_embedding_failure_does_not_fall_back() {
    let h = Harness::new(
        FakeFilterStore {
            records: catalog(),
            ..Default::default()
        },
        FakeRequirementIndex::default(),
        FakeEmbedder {
            behavior: Behavior::Fail,
            ..Default::default()
        },
        FakeChunkStore::default(),
        DiscoveryConfig {
            no_query_result_limit: 5,
            ..DiscoveryConfig::default()
        },
    );

    let err = h.service.discover(&query("machine learning")).await.unwrap_err();

    assert_eq!(err.kind(), "embedding_provider_error");
    assert_eq!(err.status_code(), 502);
    assert_eq!(h.embed_calls(), 1);
    assert_eq!(h.chunk_calls(), 0);
}

#[tokio::test]
async fn test_embedding_timeout() {
    let h = Harness::new(
        FakeFilterStore {
            records: catalog(),
            ..Default::default()
        },
        FakeRequirementIndex::default(),
        FakeEmbedder {
            behavior: Behavior::Hang,
            ..Default::default()
        },
        FakeChunkStore::default(),
        DiscoveryConfig {
            remote_call_timeout_ms: 50,
            ..DiscoveryConfig::default()
        },
    );

    let err = h.service.discover(&query("machine learning")).await.unwrap_err();

    assert_eq!(err.kind(), "timeout");
    assert_eq!(err.status_code(), 504);
    assert_eq!(h.chunk_calls(), 0);
}

#[tokio::test]
async fn test_invalid_input_makes_no_calls() {
    let h = Harness::with_data(catalog(), vec![]);

    let bad_requests = [
        DiscoveryRequest {
            hours_buckets: vec!["a lot".to_string()],
            ..query("x")
        },
        DiscoveryRequest {
            requirement_ids: vec!["not-a-uuid".to_string()],
            ..query("x")
        },
        DiscoveryRequest {
            min_course_rating: Some(f64::NAN),
            ..query("x")
        },
        query(&"a".repeat(1001)),
    ];

    for request in &bad_requests {
        let err = h.service.discover(request).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_request");
    }
    assert_eq!(h.filter_calls(), 0);
    assert_eq!(h.embed_calls(), 0);
}

#[tokio::test]
async fn test_control_only_query_behaves_like_blank() {
    let h = Harness::with_data(catalog(), vec![]);

    let response = h
        .service
        .discover(&DiscoveryRequest {
            min_course_rating: Some(4.0),
            ..query("\u{0007}\u{0000}")
        })
        .await
        .unwrap();

    assert!(response.courses.is_empty());
    assert_eq!(response.total_candidates, 25);
    assert_eq!(h.filter_calls(), 1);
    assert_eq!(h.embed_calls(), 0);
    assert_eq!(h.chunk_calls(), 0);
}

// ====== Determinism ======

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let records = catalog();
    // Equal scores force the tie-break on course code
    let chunks = records.iter().map(|r| chunk(r, 0.8)).collect();
    let h = Harness::with_data(records, chunks);
    let request = query("operating systems");

    let first = h.service.discover(&request).await.unwrap();
    let second = h.service.discover(&request).await.unwrap();

    assert_eq!(first, second);
    let codes: Vec<&str> = first.courses.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["COMP_SCI 300", "COMP_SCI 301", "COMP_SCI 302"]);
}

#[tokio::test]
async fn test_hours_filter() {
    let records = vec![
        course("LIGHT 100", Some(4.0), Some("3 or fewer")),
        course("HEAVY 100", Some(4.0), Some("20 or more")),
        course("UNKNOWN 100", Some(4.0), None),
    ];
    let h = Harness::with_data(records, vec![]);

    let response = h
        .service
        .discover(&DiscoveryRequest {
            hours_buckets: vec!["3 or fewer".to_string(), "4 - 7".to_string()],
            ..DiscoveryRequest::default()
        })
        .await
        .unwrap();

    assert_eq!(response.total_candidates, 1);
}

// ====== HTTP API ======

fn app(h: Harness) -> axum::Router {
    build_app(
        AppState {
            discovery: Arc::new(h.service),
        },
        false,
        8,
    )
}

async fn post_discover(app: axum::Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/discover")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_api_discover_success_envelope() {
    let records = catalog();
    let chunks = vec![chunk(&records[0], 0.91234)];
    let h = Harness::with_data(records, chunks);

    let (status, json) = post_discover(app(h), r#"{"query": "compilers"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["total_candidates"], 50);
    assert_eq!(json["data"]["courses"][0]["similarity_score"], 0.912);
    assert_eq!(
        json["data"]["courses"][0]["matching_snippets"][0]["similarity"],
        0.912
    );
}

#[tokio::test]
async fn test_api_invalid_request_is_400() {
    let h = Harness::with_data(catalog(), vec![]);

    let (status, json) = post_discover(app(h), r#"{"hours_buckets": ["lots"]}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["kind"], "invalid_request");
}

#[tokio::test]
async fn test_api_malformed_body_is_400() {
    let h = Harness::with_data(catalog(), vec![]);

    let (status, json) = post_discover(app(h), r#"{"query": 42}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["kind"], "invalid_request");
}

#[tokio::test]
async fn test_api_embedding_failure_is_502() {
    let h = Harness::new(
        FakeFilterStore {
            records: catalog(),
            ..Default::default()
        },
        FakeRequirementIndex::default(),
        FakeEmbedder {
            behavior: Behavior::Fail,
            ..Default::default()
        },
        FakeChunkStore::default(),
        DiscoveryConfig::default(),
    );

    let (status, json) = post_discover(app(h), r#"{"query": "compilers"}"#).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["kind"], "embedding_provider_error");
}

#[tokio::test]
async fn test_api_hours_buckets() {
    let h = Harness::with_data(vec![], vec![]);
    let response = app(h)
        .oneshot(
            Request::builder()
                .uri("/api/hours-buckets")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let labels: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|b| b["label"].as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["3 or fewer", "4 - 7", "8 - 11", "12 - 15", "16 - 19", "20 or more"]
    );
}
