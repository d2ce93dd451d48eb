// src/services/index_service_tests.rs
//
// Index Service Tests
//
// Full runs against the in-memory store: partition ordering, writeback
// isolation, fatal reads, resume and dry run.

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};
    use std::sync::Arc;

    use crate::config::IndexerConfig;
    use crate::domain::Cursor;
    use crate::repositories::InMemoryStore;
    use crate::services::index_service::IndexService;
    use crate::services::index_types::PartitionOutcome;

    // ========================================================================
    // TEST HELPERS
    // ========================================================================

    fn config() -> IndexerConfig {
        IndexerConfig {
            database_url: "memory://test".to_string(),
            ..Default::default()
        }
    }

    fn entry(tmdb_id: &str, title: &str) -> Value {
        json!({
            "ExternalIds": [{"Provider": "tmdb", "ID": tmdb_id}],
            "Deeplinks": {"web": format!("https://watch/{}", tmdb_id)},
            "Title": title
        })
    }

    fn content(entries: Vec<Value>) -> Value {
        let map: Map<String, Value> = entries
            .into_iter()
            .enumerate()
            .map(|(i, e)| (format!("{:05}", i), e))
            .collect();
        json!({ "content": map })
    }

    fn store_with(partitions: Vec<(&str, Value)>) -> Arc<InMemoryStore> {
        let source: Map<String, Value> = partitions
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        Arc::new(InMemoryStore::with_root(json!({
            "documents": {"Content": {"latest": source}}
        })))
    }

    // ========================================================================
    // END TO END
    // ========================================================================

    #[tokio::test]
    async fn test_two_partition_example() {
        let store = store_with(vec![
            (
                "amazon_jsonl",
                content(vec![json!({
                    "ExternalIds": [{"Provider": "tmdb", "ID": "42"}],
                    "Deeplinks": {"web": "https://x"},
                    "Title": "Foo",
                    "Year": 2020
                })]),
            ),
            (
                "netflix_jsonl",
                content(vec![json!({"Deeplinks": {"web": "https://y"}, "Title": "Bar"})]),
            ),
        ]);

        let report = IndexService::new(store.clone(), config()).run().await.unwrap();

        assert_eq!(
            store.get("tmdb_index/amazon"),
            Some(json!({
                "42": {
                    "deeplinks": {"web": "https://x"},
                    "title": "Foo",
                    "year": 2020,
                    "platformCode": "",
                    "platformCountry": ""
                }
            }))
        );
        assert!(store.get("tmdb_index/netflix").is_none());

        assert_eq!(
            report.outcome_for("amazon"),
            Some(&PartitionOutcome::Written { records: 1, chunks: 1 })
        );
        assert_eq!(report.outcome_for("netflix"), Some(&PartitionOutcome::Empty));
        assert_eq!(report.cursor, Cursor::after("netflix_jsonl"));
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_partitions_processed_in_key_order() {
        let store = store_with(vec![
            ("netflix_jsonl", content(vec![entry("1", "A")])),
            ("amazon_jsonl", content(vec![entry("2", "B")])),
            ("hbo_jsonl", content(vec![entry("3", "C")])),
            ("disney_jsonl", content(vec![entry("4", "D")])),
        ]);

        let report = IndexService::new(store.clone(), config()).run().await.unwrap();

        let names: Vec<&str> = report.partitions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["amazon", "disney", "hbo", "netflix"]);

        let written: Vec<String> = store
            .merges()
            .into_iter()
            .flat_map(|m| m.values.into_iter().map(|(name, _)| name))
            .collect();
        assert_eq!(written, vec!["amazon", "disney", "hbo", "netflix"]);
    }

    #[tokio::test]
    async fn test_rerun_drops_ids_that_no_longer_qualify() {
        let mut root = json!({
            "documents": {"Content": {"latest": {
                "amazon_jsonl": content(vec![
                    entry("42", "Foo"),
                    json!({
                        "ExternalIds": [{"Provider": "tmdb", "ID": "7"}],
                        "Deeplinks": {},
                        "Title": "Gone"
                    }),
                ])
            }}}
        });
        root["tmdb_index"] = json!({
            "amazon": {"7": {"deeplinks": {"web": "https://old"}, "title": "Gone"}}
        });
        let store = Arc::new(InMemoryStore::with_root(root));

        IndexService::new(store.clone(), config()).run().await.unwrap();

        assert!(store.get("tmdb_index/amazon/42").is_some());
        assert!(store.get("tmdb_index/amazon/7").is_none());
    }

    #[tokio::test]
    async fn test_large_partition_is_chunked() {
        let entries = (0..1500).map(|i| entry(&i.to_string(), "Title")).collect();
        let store = store_with(vec![("amazon_jsonl", content(entries))]);

        let report = IndexService::new(store.clone(), config()).run().await.unwrap();

        assert_eq!(
            report.outcome_for("amazon"),
            Some(&PartitionOutcome::Written {
                records: 1500,
                chunks: 3
            })
        );
        assert_eq!(report.entries_scanned(), 1500);
        assert_eq!(
            store.get("tmdb_index/amazon").unwrap().as_object().unwrap().len(),
            1500
        );
    }

    // ========================================================================
    // FAILURE HANDLING
    // ========================================================================

    #[tokio::test]
    async fn test_write_failure_does_not_stop_later_partitions() {
        let store = store_with(vec![
            ("amazon_jsonl", content(vec![entry("1", "A")])),
            ("hbo_jsonl", content(vec![entry("2", "B")])),
            ("netflix_jsonl", content(vec![entry("3", "C")])),
        ]);
        store.fail_writes_under("tmdb_index/hbo");

        let report = IndexService::new(store.clone(), config()).run().await.unwrap();

        assert!(store.get("tmdb_index/amazon/1").is_some());
        assert!(store.get("tmdb_index/hbo").is_none());
        assert!(store.get("tmdb_index/netflix/3").is_some());

        assert!(report.has_failures());
        let failed = report.failed_partitions();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].name, "hbo");
        assert!(matches!(
            report.outcome_for("netflix"),
            Some(PartitionOutcome::Written { .. })
        ));
    }

    #[tokio::test]
    async fn test_entry_read_failure_ends_run() {
        let store = store_with(vec![
            ("amazon_jsonl", content(vec![entry("1", "A")])),
            ("hbo_jsonl", content(vec![entry("2", "B")])),
            ("netflix_jsonl", content(vec![entry("3", "C")])),
        ]);
        store.fail_reads_under("documents/Content/latest/hbo_jsonl");

        let err = IndexService::new(store.clone(), config()).run().await.unwrap_err();

        assert!(err.is_transport());
        assert!(store.get("tmdb_index/amazon/1").is_some());
        assert!(store.get("tmdb_index/netflix").is_none());
    }

    #[tokio::test]
    async fn test_partition_read_failure_ends_run() {
        let store = store_with(vec![("amazon_jsonl", content(vec![entry("1", "A")]))]);
        store.fail_reads_under("documents/Content/latest");

        let err = IndexService::new(store.clone(), config()).run().await.unwrap_err();

        assert!(err.is_transport());
        assert!(store.merges().is_empty());
    }

    // ========================================================================
    // RUN OPTIONS
    // ========================================================================

    #[tokio::test]
    async fn test_resume_after_skips_done_partitions() {
        let store = store_with(vec![
            ("amazon_jsonl", content(vec![entry("1", "A")])),
            ("hbo_jsonl", content(vec![entry("2", "B")])),
            ("netflix_jsonl", content(vec![entry("3", "C")])),
        ]);
        let config = IndexerConfig {
            resume_after: Some("amazon_jsonl".to_string()),
            partition_page_size: 1,
            ..config()
        };

        let report = IndexService::new(store.clone(), config).run().await.unwrap();

        assert_eq!(report.partitions.len(), 2);
        assert!(store.get("tmdb_index/amazon").is_none());
        assert!(store.get("tmdb_index/hbo/2").is_some());
        assert!(store.get("tmdb_index/netflix/3").is_some());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let store = store_with(vec![(
            "amazon_jsonl",
            content(vec![entry("1", "A"), entry("2", "B")]),
        )]);
        let config = IndexerConfig {
            dry_run: true,
            ..config()
        };

        let report = IndexService::new(store.clone(), config).run().await.unwrap();

        assert!(store.merges().is_empty());
        assert_eq!(
            report.outcome_for("amazon"),
            Some(&PartitionOutcome::Skipped { records: 2 })
        );
    }

    #[tokio::test]
    async fn test_small_pages_give_same_index() {
        let entries: Vec<Value> = (0..37).map(|i| entry(&(i % 30).to_string(), "T")).collect();

        let big_pages = store_with(vec![("amazon_jsonl", content(entries.clone()))]);
        IndexService::new(big_pages.clone(), config()).run().await.unwrap();

        let small_pages = store_with(vec![("amazon_jsonl", content(entries))]);
        let config = IndexerConfig {
            entry_page_size: 1,
            partition_page_size: 1,
            stop_on_short_page: false,
            ..config()
        };
        IndexService::new(small_pages.clone(), config).run().await.unwrap();

        assert_eq!(
            big_pages.get("tmdb_index/amazon"),
            small_pages.get("tmdb_index/amazon")
        );
        assert_eq!(
            small_pages.get("tmdb_index/amazon").unwrap().as_object().unwrap().len(),
            30
        );
    }
}
