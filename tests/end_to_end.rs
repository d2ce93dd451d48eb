// tests/end_to_end.rs
//
// Full runs through the public API against the in-memory store.

use serde_json::{json, Map, Value};
use std::sync::Arc;

use tmdb_indexer::{IndexService, IndexerConfig, InMemoryStore, PartitionOutcome, RemoteStore};

fn snapshot(platforms: &[(&str, usize)]) -> Value {
    let mut latest = Map::new();
    for (platform, count) in platforms {
        let content: Map<String, Value> = (0..*count)
            .map(|i| {
                (
                    format!("{:06}", i),
                    json!({
                        "ExternalIds": {"0": {"Provider": "tmdb", "ID": 1000 + i}},
                        "Deeplinks": {"web": format!("https://{}/{}", platform, i)},
                        "Title": format!("{} title {}", platform, i),
                        "Year": "2019",
                        "PlatformCode": platform,
                        "PlatformCountry": "es"
                    }),
                )
            })
            .collect();
        latest.insert(format!("{}_jsonl", platform), json!({ "content": content }));
    }
    json!({"documents": {"Content": {"latest": latest}}})
}

fn config() -> IndexerConfig {
    IndexerConfig {
        database_url: "memory://end-to-end".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn rebuilds_every_platform() {
    let store = Arc::new(InMemoryStore::with_root(snapshot(&[
        ("amazon", 12),
        ("disney", 0),
        ("hbo", 1200),
        ("netflix", 5),
    ])));

    let report = IndexService::new(store.clone() as Arc<dyn RemoteStore>, config())
        .run()
        .await
        .unwrap();

    assert_eq!(report.partitions.len(), 4);
    assert_eq!(report.records_written(), 12 + 1200 + 5);
    assert_eq!(report.outcome_for("disney"), Some(&PartitionOutcome::Empty));
    assert_eq!(
        report.outcome_for("hbo"),
        Some(&PartitionOutcome::Written {
            records: 1200,
            chunks: 3
        })
    );

    assert_eq!(
        store.get("tmdb_index/netflix/1003"),
        Some(json!({
            "deeplinks": {"web": "https://netflix/3"},
            "title": "netflix title 3",
            "year": 2019,
            "platformCode": "netflix",
            "platformCountry": "es"
        }))
    );
    assert!(store.get("tmdb_index/disney").is_none());
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let store = Arc::new(InMemoryStore::with_root(snapshot(&[("amazon", 30)])));

    IndexService::new(store.clone(), config()).run().await.unwrap();
    let first = store.get("tmdb_index");

    IndexService::new(store.clone(), config()).run().await.unwrap();
    assert_eq!(store.get("tmdb_index"), first);
}

#[tokio::test]
async fn failed_partition_is_reported_and_run_completes() {
    let store = Arc::new(InMemoryStore::with_root(snapshot(&[
        ("amazon", 2),
        ("hbo", 2),
        ("netflix", 2),
    ])));
    store.fail_writes_under("tmdb_index/amazon");

    let report = IndexService::new(store.clone(), config()).run().await.unwrap();

    assert!(report.has_failures());
    assert_eq!(report.failed_partitions()[0].name, "amazon");
    assert!(store.get("tmdb_index/hbo/1000").is_some());
    assert!(store.get("tmdb_index/netflix/1001").is_some());
}
