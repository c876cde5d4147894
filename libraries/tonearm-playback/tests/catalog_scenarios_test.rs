//! Category playback through the asynchronous catalog

mod common;

use common::{ids, source, tracks, Harness};
use std::time::Duration;
use tonearm_core::CatalogCategory;
use tonearm_playback::{PlaySource, PlaybackState, SessionUpdate};

/// Wait until `count` lookups are parked on the catalog gate
async fn lookups_started(h: &Harness, count: usize) {
    for _ in 0..400 {
        if h.catalog.lookups() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("catalog lookups never started");
}

/// Give a released lookup time to reach the service loop
async fn settle(h: &Harness) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    h.status().await;
}

#[tokio::test]
async fn play_from_album_replaces_queue_and_plays() {
    let h = Harness::start();
    h.catalog
        .insert(CatalogCategory::Album("kob".into()), tracks(&["x", "y", "z"]));

    h.handle.play_from(PlaySource::Album("kob".into())).unwrap();
    let status = h
        .wait_for("album playback", |s| s.state == PlaybackState::Playing)
        .await;

    assert_eq!(ids(&status.queue), vec!["x", "y", "z"]);
    assert_eq!(status.cursor, Some(0));
    assert_eq!(h.engine.loads(), vec![source("x")]);
    assert_eq!(
        ids(&h.store.get("playingQueue").unwrap().tracks),
        vec!["x", "y", "z"]
    );
}

#[tokio::test]
async fn play_from_artist_while_playing_switches_queue() {
    let h = Harness::start();
    h.catalog
        .insert(CatalogCategory::Artist("miles".into()), tracks(&["m1", "m2"]));
    h.start_playing(&["a", "b"]).await;

    h.handle.play_from(PlaySource::Artist("miles".into())).unwrap();
    let status = h
        .wait_for("artist playback", |s| {
            s.current.as_ref().is_some_and(|t| t.id.as_str() == "m1")
                && s.state == PlaybackState::Playing
        })
        .await;

    assert_eq!(ids(&status.queue), vec!["m1", "m2"]);
}

#[tokio::test]
async fn stop_before_lookup_completes_stays_stopped() {
    let h = Harness::start();
    h.catalog
        .insert(CatalogCategory::Album("1".into()), tracks(&["x", "y"]));
    let gate = h.catalog.hold();

    h.handle.play_from(PlaySource::Album("1".into())).unwrap();
    lookups_started(&h, 1).await;
    h.handle.stop().unwrap();
    h.status().await;

    gate.notify_waiters();
    settle(&h).await;

    let status = h.status().await;
    assert_eq!(status.state, PlaybackState::Stopped);
    assert!(status.queue.is_empty());
    assert_eq!(h.engine.attempts(), 0);
}

#[tokio::test]
async fn newer_request_supersedes_older() {
    let h = Harness::start();
    h.catalog
        .insert(CatalogCategory::Album("old".into()), tracks(&["o1", "o2"]));
    h.catalog
        .insert(CatalogCategory::Album("new".into()), tracks(&["n1", "n2"]));
    let gate = h.catalog.hold();

    h.handle.play_from(PlaySource::Album("old".into())).unwrap();
    h.handle.play_from(PlaySource::Album("new".into())).unwrap();
    lookups_started(&h, 2).await;
    gate.notify_waiters();

    let status = h
        .wait_for("newest album", |s| s.state == PlaybackState::Playing)
        .await;
    settle(&h).await;

    let status_after = h.status().await;
    assert_eq!(ids(&status.queue), vec!["n1", "n2"]);
    assert_eq!(ids(&status_after.queue), vec!["n1", "n2"]);
    assert_eq!(h.engine.loads(), vec![source("n1")]);
}

#[tokio::test]
async fn replace_queue_cancels_pending_lookup() {
    let h = Harness::start();
    h.catalog
        .insert(CatalogCategory::Genre("jazz".into()), tracks(&["j1"]));
    let gate = h.catalog.hold();

    h.handle.play_from(PlaySource::Genre("jazz".into())).unwrap();
    lookups_started(&h, 1).await;
    h.load_queue(&["mine"]).await;

    gate.notify_waiters();
    settle(&h).await;

    let status = h.status().await;
    assert_eq!(ids(&status.queue), vec!["mine"]);
    assert_eq!(status.state, PlaybackState::Stopped);
}

#[tokio::test]
async fn shuffle_all_plays_every_track() {
    let h = Harness::start();
    let names: Vec<String> = (0..25).map(|i| format!("t{i}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    h.catalog.insert(CatalogCategory::AllTracks, tracks(&refs));

    h.handle.play_from(PlaySource::ShuffleAll).unwrap();
    let status = h
        .wait_for("shuffled library", |s| s.state == PlaybackState::Playing)
        .await;

    let mut queued = ids(&status.queue);
    queued.sort();
    let mut expected = names;
    expected.sort();
    assert_eq!(queued, expected);
    assert_eq!(status.cursor, Some(0));
}

#[tokio::test]
async fn queue_index_source_skips_catalog() {
    let h = Harness::start();
    h.load_queue(&["a", "b", "c"]).await;

    h.handle.play_from(PlaySource::QueueIndex(1)).unwrap();
    let status = h.status().await;

    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.current.unwrap().id.as_str(), "b");
    assert_eq!(h.catalog.lookups(), 0);
}

#[tokio::test]
async fn failed_lookup_reports_and_keeps_queue() {
    let mut h = Harness::start();
    h.catalog.fail();
    h.load_queue(&["a"]).await;
    h.drain();

    h.handle.play_from(PlaySource::Playlist("p".into())).unwrap();
    lookups_started(&h, 1).await;
    settle(&h).await;

    let status = h.status().await;
    assert_eq!(ids(&status.queue), vec!["a"]);
    assert_eq!(status.state, PlaybackState::Stopped);
    assert!(h.drain().contains(&SessionUpdate::Error {
        message: "Couldn't load tracks".to_string()
    }));
}

#[tokio::test]
async fn empty_category_leaves_queue_alone() {
    let h = Harness::start();
    h.load_queue(&["a"]).await;

    h.handle.play_from(PlaySource::Album("missing".into())).unwrap();
    lookups_started(&h, 1).await;
    settle(&h).await;

    let status = h.status().await;
    assert_eq!(ids(&status.queue), vec!["a"]);
    assert_eq!(h.engine.attempts(), 0);
}
