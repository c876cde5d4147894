//! Audio focus interactions

mod common;

use common::{source, Harness, HostCall};
use tonearm_core::{FocusChange, FocusResponse};
use tonearm_playback::{FocusGrant, PlaybackConfig, PlaybackState};

#[tokio::test]
async fn transient_loss_then_gain_resumes_without_reload() {
    let mut h = Harness::start();
    h.start_playing(&["a", "b"]).await;
    h.drain();

    h.focus.emit(FocusChange::TransientLoss);
    let status = h.status().await;
    assert_eq!(status.state, PlaybackState::Paused);
    assert!(status.resume_on_gain);
    assert_eq!(status.focus, FocusGrant::None);
    assert!(!h.engine.is_rendering());

    h.focus.emit(FocusChange::Gained);
    let status = h.status().await;
    assert_eq!(status.state, PlaybackState::Playing);
    assert!(!status.resume_on_gain);
    assert_eq!(status.current.unwrap().id.as_str(), "a");

    assert_eq!(h.engine.loads(), vec![source("a")]);
    assert!(h.engine.is_rendering());
    assert_eq!(
        h.published_states(),
        vec![PlaybackState::Paused, PlaybackState::Playing]
    );
}

#[tokio::test]
async fn duckable_loss_attenuates_then_restores() {
    let h = Harness::start();
    h.start_playing(&["a"]).await;

    h.focus.emit(FocusChange::TransientLossCanDuck);
    let status = h.status().await;
    assert_eq!(status.state, PlaybackState::Playing);
    assert_eq!(status.focus, FocusGrant::HeldWithDuckRequest);
    assert_eq!(h.engine.volume(), 0.2);

    h.focus.emit(FocusChange::Gained);
    let status = h.status().await;
    assert_eq!(status.focus, FocusGrant::Held);
    assert_eq!(h.engine.volume(), 1.0);
}

#[tokio::test]
async fn duck_volume_is_configurable() {
    let h = Harness::with_config(PlaybackConfig {
        duck_volume: 0.5,
        ..PlaybackConfig::default()
    });
    h.start_playing(&["a"]).await;

    h.focus.emit(FocusChange::TransientLossCanDuck);
    h.status().await;
    assert_eq!(h.engine.volume(), 0.5);
}

#[tokio::test]
async fn permanent_loss_pauses_and_gives_focus_back() {
    let h = Harness::start();
    h.start_playing(&["a"]).await;

    h.focus.emit(FocusChange::Loss);
    let status = h.status().await;

    assert_eq!(status.state, PlaybackState::Paused);
    assert_eq!(status.focus, FocusGrant::None);
    assert!(!status.resume_on_gain);
    assert_eq!(h.focus.abandons(), 1);
    assert!(!h.focus.is_registered());
}

#[tokio::test]
async fn denied_focus_leaves_track_paused() {
    let h = Harness::start();
    h.focus.script(FocusResponse::Denied);
    h.load_queue(&["a"]).await;

    h.handle.play().unwrap();
    let status = h.status().await;
    assert_eq!(status.state, PlaybackState::Paused);
    assert!(!h.engine.is_rendering());

    // Next request is granted; the loaded handle is reused
    h.handle.play().unwrap();
    assert_eq!(h.state().await, PlaybackState::Playing);
    assert_eq!(h.engine.loads(), vec![source("a")]);
    assert_eq!(h.focus.requests(), 2);
}

#[tokio::test]
async fn delayed_focus_starts_on_grant() {
    let h = Harness::start();
    h.focus.script(FocusResponse::Delayed);
    h.load_queue(&["a"]).await;

    h.handle.play().unwrap();
    let status = h.status().await;
    assert_eq!(status.state, PlaybackState::Paused);
    assert!(status.resume_on_gain);
    assert!(!h.engine.is_rendering());
    // Nothing shown before the service has been started
    assert!(h.host.calls().is_empty());

    h.focus.emit(FocusChange::Gained);
    let status = h.status().await;
    assert_eq!(status.state, PlaybackState::Playing);
    assert!(h.engine.is_rendering());
    assert_eq!(h.host.calls()[0], HostCall::Start);
    assert!(matches!(h.host.calls()[1], HostCall::Foreground(_)));
}

#[tokio::test]
async fn user_pause_abandons_focus() {
    let h = Harness::start();
    h.start_playing(&["a"]).await;

    h.handle.pause().unwrap();
    let status = h.status().await;

    assert_eq!(status.focus, FocusGrant::None);
    assert_eq!(h.focus.abandons(), 1);
}

#[tokio::test]
async fn user_pause_can_keep_focus() {
    let h = Harness::with_config(PlaybackConfig {
        abandon_focus_on_pause: false,
        ..PlaybackConfig::default()
    });
    h.start_playing(&["a"]).await;

    h.handle.pause().unwrap();
    let status = h.status().await;

    assert_eq!(status.focus, FocusGrant::Held);
    assert_eq!(h.focus.abandons(), 0);
}

#[tokio::test]
async fn gain_after_user_pause_does_not_resume() {
    let h = Harness::with_config(PlaybackConfig {
        abandon_focus_on_pause: false,
        ..PlaybackConfig::default()
    });
    h.start_playing(&["a"]).await;
    h.handle.pause().unwrap();

    h.focus.emit(FocusChange::Gained);
    assert_eq!(h.state().await, PlaybackState::Paused);
}
