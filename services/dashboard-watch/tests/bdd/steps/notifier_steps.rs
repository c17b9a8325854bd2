//! BDD step definitions for emergency presentation feature

use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when};

use dashboard_watch::notifier::{Emergency, EmergencyNotifier, Notifier};

use crate::world::{TestSound, WatchWorld};

#[given("a working alert sound")]
fn working_sound(world: &mut WatchWorld) {
    world.sound = Some(Arc::new(TestSound::default()));
}

#[given("an alert sound that is blocked on the first attempt")]
fn blocked_once(world: &mut WatchWorld) {
    world.sound = Some(Arc::new(TestSound::failing(1)));
}

#[given("an alert sound that always fails")]
fn always_fails(world: &mut WatchWorld) {
    world.sound = Some(Arc::new(TestSound::failing(u32::MAX)));
}

#[when(
    expr = "an emergency {string} with description {string} is presented with a {int} ms dismissal window"
)]
async fn present(world: &mut WatchWorld, kind: String, description: String, window_ms: u64) {
    let sound = world.sound.clone().expect("sound not set");
    let notifier = EmergencyNotifier::new(
        world.display(),
        sound,
        Duration::from_millis(window_ms),
    );
    let handle = notifier
        .notify(&Emergency { kind, description })
        .await;
    world.dismissal = Some(handle);
}

#[when("the dismissal window elapses")]
async fn window_elapses(world: &mut WatchWorld) {
    let handle = world.dismissal.take().expect("nothing presented");
    tokio::time::timeout(Duration::from_secs(5), handle.wait())
        .await
        .expect("dismissal did not run");
}

#[then(expr = "the emergency modal should show type {string} and description {string}")]
async fn modal_content(world: &mut WatchWorld, kind: String, description: String) {
    let state = world.state();
    let state = state.read().await;
    assert!(state.modal.shown);
    assert_eq!(state.modal.kind, kind);
    assert_eq!(state.modal.description, description);
}

#[then("the emergency modal should be closed")]
async fn modal_closed(world: &mut WatchWorld) {
    let state = world.state();
    assert!(!state.read().await.modal.shown);
}

#[then(expr = "the alert sound should have been played {int} time(s)")]
fn sound_played(world: &mut WatchWorld, times: u32) {
    let sound = world.sound.as_ref().expect("sound not set");
    assert_eq!(sound.plays(), times);
}

#[then("the alert sound should have been stopped")]
fn sound_stopped(world: &mut WatchWorld) {
    let sound = world.sound.as_ref().expect("sound not set");
    assert_eq!(sound.stops(), 1);
}
