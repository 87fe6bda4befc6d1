//! Pipeline integration tests
//!
//! Full runs against a fake rename engine and a mocked Plex server.

mod common;

use common::{create_files, test_config, test_context, FakeEngine};
use postdrop::fallback::Stage;
use postdrop::notifications::PlexNotifier;
use postdrop::pipeline::Pipeline;
use postdrop_common::{Error, MediaCategory};
use postdrop_engine::MetadataSource;
use std::sync::Arc;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn refresh(section: u32) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!("/library/sections/{}/refresh", section)))
        .and(header("X-Plex-Token", "test-token"))
        .respond_with(ResponseTemplate::new(200))
}

fn pipeline(
    config: postdrop::config::Config,
    engine: Arc<FakeEngine>,
    dry_run: bool,
) -> Pipeline {
    let scanner = Arc::new(PlexNotifier::new(&config.plex));
    Pipeline::new(test_context(config, None, dry_run), engine, scanner)
}

#[tokio::test]
async fn test_tv_download_is_cleaned_organized_pruned_and_rescanned() {
    let server = MockServer::start().await;
    refresh(2).expect(1).mount(&server).await;
    refresh(1).expect(0).mount(&server).await;

    let downloads = tempdir().unwrap();
    let library = tempdir().unwrap();
    let source = downloads.path().join("The.Show.S01E01");
    create_files(&source, &["video.mkv", "sample.txt", "Extras/info.nfo"]);

    let engine = Arc::new(FakeEngine::new(
        library.path(),
        vec![Some(MetadataSource::TheTvDb)],
    ));
    let config = test_config(&server.uri(), library.path());
    let report = pipeline(config, engine.clone(), false)
        .run(&source)
        .await
        .unwrap();

    assert!(!source.join("sample.txt").exists());
    assert!(!source.join("Extras").exists());
    assert!(!source.join("video.mkv").exists());
    assert!(library.path().join("video.mkv").exists());

    assert_eq!(report.category, MediaCategory::Tv);
    assert_eq!(report.rename.files_affected(), 1);
    assert_eq!(report.junk_removed.len(), 2);
    assert_eq!(report.dirs_pruned, vec![source.join("Extras")]);
    assert_eq!(report.rescanned, Some(true));

    let winner = report.rename.winner().unwrap();
    assert_eq!(winner.strategy.source, Some(MetadataSource::TheTvDb));
}

#[tokio::test]
async fn test_text_only_download_fails_before_engine() {
    let server = MockServer::start().await;
    let downloads = tempdir().unwrap();
    let library = tempdir().unwrap();
    let source = downloads.path().join("Not.A.Video");
    create_files(&source, &["readme.txt"]);

    let engine = Arc::new(FakeEngine::new(library.path(), vec![None]));
    let config = test_config(&server.uri(), library.path());
    let err = pipeline(config, engine.clone(), false)
        .run(&source)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::EmptyBatch { .. }));
    assert!(engine.calls().is_empty());
    assert!(source.join("readme.txt").exists());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_episode_matched_only_by_first_tv_source() {
    let server = MockServer::start().await;
    refresh(2).expect(1).mount(&server).await;

    let downloads = tempdir().unwrap();
    let library = tempdir().unwrap();
    let source = downloads.path().join("Show");
    create_files(&source, &["Show.S01E01.mkv"]);

    let engine = Arc::new(FakeEngine::new(
        library.path(),
        vec![Some(MetadataSource::TheTvDb)],
    ));
    let config = test_config(&server.uri(), library.path());
    let report = pipeline(config, engine, false).run(&source).await.unwrap();

    let tv: Vec<_> = report.rename.attempts_in(Stage::TvChain).collect();
    assert_eq!(tv.len(), 1);
    assert!(tv[0].succeeded());
    assert_eq!(report.rename.attempts.len(), 2);
    assert_eq!(
        report.rename.classification.map(|c| c.category),
        Some(MediaCategory::Tv)
    );
}

#[tokio::test]
async fn test_unidentifiable_download_exhausts_every_strategy() {
    let server = MockServer::start().await;
    let downloads = tempdir().unwrap();
    let library = tempdir().unwrap();
    let log_dir = tempdir().unwrap();
    let log_file = log_dir.path().join("postdrop.log");
    let source = downloads.path().join("xyz");
    create_files(&source, &["random_name.mkv", "junk.txt"]);

    let engine = Arc::new(FakeEngine::new(library.path(), Vec::new()));
    let config = test_config(&server.uri(), library.path());
    let scanner = Arc::new(PlexNotifier::new(&config.plex));
    let pipeline = Pipeline::new(
        test_context(config, Some(log_file.clone()), false),
        engine.clone(),
        scanner,
    );

    let err = pipeline.run(&source).await.unwrap_err();
    match err {
        Error::ChainExhausted { attempts, .. } => assert_eq!(attempts, 7),
        other => panic!("unexpected error: {:?}", other),
    }

    let calls = engine.calls();
    assert_eq!(calls.len(), 7);
    assert_eq!(calls.iter().filter(|r| r.metadata_source.is_some()).count(), 5);
    assert!(!calls.last().unwrap().non_strict);

    // cleanup ran, the video stayed, nobody was told to rescan
    assert!(!source.join("junk.txt").exists());
    assert!(source.join("random_name.mkv").exists());
    assert!(server.received_requests().await.unwrap().is_empty());

    let log = std::fs::read_to_string(&log_file).unwrap();
    assert_eq!(log.matches("Failed to identify or process any files").count(), 7);
}

#[tokio::test]
async fn test_dry_run_simulates_and_changes_nothing() {
    let server = MockServer::start().await;
    let downloads = tempdir().unwrap();
    let library = tempdir().unwrap();
    let source = downloads.path().join("Movie.2019");
    create_files(&source, &["Movie.2019.1080p.mkv", "sample.txt", "Sub/x.nfo"]);

    let engine = Arc::new(FakeEngine::new(
        library.path(),
        vec![Some(MetadataSource::TheMovieDb)],
    ));
    let config = test_config(&server.uri(), library.path());
    let report = pipeline(config, engine.clone(), true)
        .run(&source)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.rename.files_affected(), 1);
    assert_eq!(report.category, MediaCategory::Movie);
    assert_eq!(report.rescanned, None);
    assert!(source.join("Movie.2019.1080p.mkv").exists());
    assert!(source.join("sample.txt").exists());
    assert!(source.join("Sub").join("x.nfo").exists());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rescan_failure_does_not_fail_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let downloads = tempdir().unwrap();
    let library = tempdir().unwrap();
    let source = downloads.path().join("Movie");
    create_files(&source, &["Movie.2019.mkv"]);

    let engine = Arc::new(FakeEngine::new(library.path(), vec![None]));
    let config = test_config(&server.uri(), library.path());
    let report = pipeline(config, engine, false).run(&source).await.unwrap();

    assert_eq!(report.category, MediaCategory::Movie);
    assert_eq!(report.rescanned, Some(false));
    assert!(library.path().join("Movie.2019.mkv").exists());
}
