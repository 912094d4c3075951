// End-to-end tests for the split-days pipeline
//
// These tests run the full manifest → partition → merge → write flow
// against in-memory object stores.

mod harness;

use harness::*;
use s2inventory::config::MismatchPolicy;
use s2inventory::{split_days, SplitError};

const MARKER_A: &str = "tiles/33/T/WN/2023/3/5/productInfo.json";

#[tokio::test]
async fn test_two_listings_same_date_merge_into_one_object() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/a.csv", "inv/b.csv"]).await;
    seed_listing(&source, "inv/a.csv", &[row("sentinel-s2-l1c", MARKER_A, 10)]).await;
    seed_listing(&source, "inv/b.csv", &[row("sentinel-s2-l2a", MARKER_A, 20)]).await;

    let summary = split_days(&source, &sink, &request(8))
        .await
        .expect("split should succeed");

    assert_eq!(summary.listing_files, 2);
    assert_eq!(summary.written, vec!["daily/2023/03/05/data.csv".to_string()]);

    let body = sink.read("daily/2023/03/05/data.csv").await.unwrap();
    assert_eq!(
        String::from_utf8(body).unwrap(),
        format!(
            "sentinel-s2-l1c,{k},10,2023-03-05T10:00:00.000Z\n\
             sentinel-s2-l2a,{k},20,2023-03-05T10:00:00.000Z\n",
            k = MARKER_A
        )
    );
}

#[tokio::test]
async fn test_missing_manifest_is_not_found_and_writes_nothing() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    let err = split_days(&source, &sink, &request(8)).await.unwrap_err();

    match &err {
        SplitError::NotFound { path, .. } => {
            assert!(path.ends_with("sentinel-s2-l1c-inventory/2023-03-05T00-00Z/manifest.json"))
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(!sink.exists("daily/2023/03/05/data.csv").await.unwrap());
}

#[tokio::test]
async fn test_output_is_independent_of_worker_count() {
    let source = memory_store("sentinel-inventory");

    let keys: Vec<String> = (0..6).map(|i| format!("inv/part-{i}.csv")).collect();
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    seed_manifest(&source, &key_refs).await;

    for (i, key) in keys.iter().enumerate() {
        let lines: Vec<String> = (0..5)
            .map(|j| {
                let day = 1 + (i + j) % 3;
                row(
                    "sentinel-s2-l1c",
                    &format!("tiles/3{j}/T/WN/2023/4/{day}/{i}/productInfo.json"),
                    (i * 10 + j) as u64,
                )
            })
            .chain(std::iter::once(row(
                "sentinel-s2-l1c",
                &format!("tiles/33/T/WN/2023/4/1/{i}/B01.jp2"),
                1,
            )))
            .collect();
        seed_listing(&source, key, &lines).await;
    }

    let single = memory_store("output-1");
    let many = memory_store("output-8");
    let one_worker = split_days(&source, &single, &request(1)).await.unwrap();
    let eight_workers = split_days(&source, &many, &request(8)).await.unwrap();

    assert_eq!(one_worker.written, eight_workers.written);
    assert_eq!(one_worker.written.len(), 3);
    assert_eq!(one_worker.marker_rows, 30);
    for path in &one_worker.written {
        assert_eq!(
            single.read(path).await.unwrap(),
            many.read(path).await.unwrap(),
            "{path} differs between worker counts"
        );
    }

    let mut total = 0;
    for path in &one_worker.written {
        total += sorted_lines(&single, path).await.len();
    }
    assert_eq!(total, 30, "every marker row lands in exactly one file");
}

#[tokio::test]
async fn test_rerun_overwrites_with_identical_bytes() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/a.csv"]).await;
    seed_listing(
        &source,
        "inv/a.csv",
        &[
            row("sentinel-s2-l1c", MARKER_A, 1),
            row("sentinel-s2-l1c", "tiles/33/T/WN/2023/12/9/0/productInfo.json", 2),
        ],
    )
    .await;

    let first = split_days(&source, &sink, &request(2)).await.unwrap();
    let before = sink.read("daily/2023/12/09/data.csv").await.unwrap();
    let second = split_days(&source, &sink, &request(2)).await.unwrap();
    let after = sink.read("daily/2023/12/09/data.csv").await.unwrap();

    assert_eq!(first.written, second.written);
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_listing_without_markers_contributes_nothing() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/empty.csv", "inv/no-markers.csv", "inv/a.csv"]).await;
    seed_listing(&source, "inv/empty.csv", &[]).await;
    seed_listing(
        &source,
        "inv/no-markers.csv",
        &[row("sentinel-s2-l1c", "tiles/33/T/WN/2023/6/1/0/B02.jp2", 5)],
    )
    .await;
    seed_listing(&source, "inv/a.csv", &[row("sentinel-s2-l1c", MARKER_A, 1)]).await;

    let summary = split_days(&source, &sink, &request(3)).await.unwrap();

    assert_eq!(summary.listing_files, 3);
    assert_eq!(summary.written, vec!["daily/2023/03/05/data.csv".to_string()]);
    assert!(!sink.exists("daily/2023/06/01/data.csv").await.unwrap());
}

#[tokio::test]
async fn test_take_limits_processed_listings() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/a.csv", "inv/b.csv"]).await;
    seed_listing(&source, "inv/a.csv", &[row("sentinel-s2-l1c", MARKER_A, 1)]).await;
    seed_listing(
        &source,
        "inv/b.csv",
        &[row("sentinel-s2-l1c", "tiles/33/T/WN/2023/7/7/0/productInfo.json", 1)],
    )
    .await;

    let mut req = request(4);
    req.take = Some(1);
    let summary = split_days(&source, &sink, &req).await.unwrap();

    assert_eq!(summary.listing_files, 1);
    assert_eq!(summary.written, vec!["daily/2023/03/05/data.csv".to_string()]);

    req.take = Some(0);
    let summary = split_days(&source, &memory_store("empty"), &req).await.unwrap();
    assert_eq!(summary.listing_files, 0);
    assert!(summary.written.is_empty());
}

#[tokio::test]
async fn test_gzip_listings_are_decoded() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/a.csv.gz"]).await;
    seed_listing(
        &source,
        "inv/a.csv.gz",
        &[
            row("sentinel-s2-l1c", MARKER_A, 1),
            row("sentinel-s2-l1c", "tiles/33/T/WN/2023/3/5/0/B01.jp2", 2),
        ],
    )
    .await;

    let summary = split_days(&source, &sink, &request(1)).await.unwrap();

    assert_eq!(summary.rows_read, 2);
    assert_eq!(summary.marker_rows, 1);
    assert_eq!(
        sorted_lines(&sink, "daily/2023/03/05/data.csv").await,
        vec![format!("sentinel-s2-l1c,{},1,2023-03-05T10:00:00.000Z", MARKER_A)]
    );
}

#[tokio::test]
async fn test_mismatched_markers_skip_or_fail() {
    let source = memory_store("sentinel-inventory");

    seed_manifest(&source, &["inv/a.csv"]).await;
    seed_listing(
        &source,
        "inv/a.csv",
        &[
            row("sentinel-s2-l1c", MARKER_A, 1),
            row("sentinel-s2-l1c", "tiles/33/T/WN/2023/2/30/0/productInfo.json", 2),
        ],
    )
    .await;

    let skip_sink = memory_store("output");
    let summary = split_days(&source, &skip_sink, &request(1)).await.unwrap();
    assert_eq!(summary.mismatched, 1);
    assert_eq!(summary.written.len(), 1);
    assert_eq!(
        sorted_lines(&skip_sink, "daily/2023/03/05/data.csv").await.len(),
        1
    );

    let fail_sink = memory_store("output");
    let mut req = request(1);
    req.partition.on_pattern_mismatch = MismatchPolicy::Fail;
    let err = split_days(&source, &fail_sink, &req).await.unwrap_err();
    assert!(matches!(err, SplitError::PatternMismatch { .. }), "{err}");
    assert!(!fail_sink.exists("daily/2023/03/05/data.csv").await.unwrap());
}

#[tokio::test]
async fn test_worker_failure_aborts_the_run() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/a.csv", "inv/missing.csv"]).await;
    seed_listing(&source, "inv/a.csv", &[row("sentinel-s2-l1c", MARKER_A, 1)]).await;

    let err = split_days(&source, &sink, &request(2)).await.unwrap_err();

    assert!(matches!(err, SplitError::NotFound { .. }), "{err}");
    assert!(!sink.exists("daily/2023/03/05/data.csv").await.unwrap());
}

#[tokio::test]
async fn test_malformed_listing_is_a_parse_error() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/a.csv"]).await;
    seed_listing(&source, "inv/a.csv", &["only,three,columns\n".to_string()]).await;

    let err = split_days(&source, &sink, &request(1)).await.unwrap_err();
    assert!(matches!(err, SplitError::Parse { .. }), "{err}");
}

#[tokio::test]
async fn test_zero_workers_is_rejected() {
    let source = memory_store("sentinel-inventory");
    let sink = memory_store("output");

    seed_manifest(&source, &["inv/a.csv"]).await;
    seed_listing(&source, "inv/a.csv", &[row("sentinel-s2-l1c", MARKER_A, 1)]).await;

    let err = split_days(&source, &sink, &request(0)).await.unwrap_err();
    assert!(matches!(err, SplitError::InvalidConfig { .. }), "{err}");
}

#[tokio::test]
async fn test_failed_upload_is_transfer_error_and_keeps_earlier_dates() {
    let source = memory_store("sentinel-inventory");
    seed_manifest(&source, &["inv/a.csv"]).await;
    seed_listing(
        &source,
        "inv/a.csv",
        &[
            row("sentinel-s2-l1c", MARKER_A, 1),
            row("sentinel-s2-l1c", "tiles/33/T/WN/2023/12/9/0/productInfo.json", 2),
        ],
    )
    .await;

    // A plain file where the December directory should be
    let root = tempfile::tempdir().unwrap();
    let blocked = root.path().join("out/daily/2023/12");
    std::fs::create_dir_all(blocked.parent().unwrap()).unwrap();
    std::fs::write(&blocked, b"not a directory").unwrap();
    let sink = s2inventory::ObjectStore::new_fs(&root.path().to_string_lossy(), "out").unwrap();

    let err = split_days(&source, &sink, &request(1)).await.unwrap_err();

    match &err {
        SplitError::Transfer { path, .. } => {
            assert_eq!(path, "out/daily/2023/12/09/data.csv")
        }
        other => panic!("expected Transfer, got {other:?}"),
    }
    assert!(sink.exists("daily/2023/03/05/data.csv").await.unwrap());
    assert!(root.path().join("out/daily/2023/03/05/data.csv").is_file());
}
