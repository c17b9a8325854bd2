//! BDD step definitions for status polling feature

use std::sync::Arc;

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use dashboard_watch::config::AlertsConfig;
use dashboard_watch::poller::StatusPoller;
use dashboard_watch::state::LabelStyle;

use crate::world::{RecordingNotifier, WatchWorld};

fn style_name(style: LabelStyle) -> &'static str {
    match style {
        LabelStyle::Normal => "normal",
        LabelStyle::Active => "active",
        LabelStyle::Error => "error",
        LabelStyle::Muted => "muted",
    }
}

fn build_poller(world: &mut WatchWorld) {
    if world.poller.is_some() {
        return;
    }
    let http = world.http();
    let display = world.display();
    let recorder = Arc::new(RecordingNotifier::default());
    world.recorder = Some(Arc::clone(&recorder));
    world.poller = Some(StatusPoller::new(
        "http://dashboard.test",
        http,
        display,
        recorder,
        &AlertsConfig::default(),
    ));
}

#[given("the status endpoint returns:")]
fn status_returns(world: &mut WatchWorld, step: &Step) {
    let body = step.docstring.as_ref().expect("docstring missing");
    world.http().push_ok(body);
}

#[given("the status endpoint is unreachable")]
fn status_unreachable(world: &mut WatchWorld) {
    world.http().push_unreachable();
}

#[when("the dashboard polls the status")]
async fn poll_once(world: &mut WatchWorld) {
    build_poller(world);
    world.poller.as_mut().unwrap().poll_once().await;
}

#[when(expr = "the dashboard polls the status {int} times")]
async fn poll_times(world: &mut WatchWorld, times: u32) {
    build_poller(world);
    let poller = world.poller.as_mut().unwrap();
    for _ in 0..times {
        poller.poll_once().await;
    }
}

#[then(expr = "the temperature label should read {string}")]
async fn temperature_reads(world: &mut WatchWorld, text: String) {
    let state = world.state();
    assert_eq!(state.read().await.temperature.text, text);
}

#[then(expr = "the dashboard alert label should have style {string}")]
async fn alert_style(world: &mut WatchWorld, style: String) {
    let state = world.state();
    assert_eq!(style_name(state.read().await.alert.style), style);
}

#[then("no emergency should be presented")]
fn no_emergency(world: &mut WatchWorld) {
    let recorder = world.recorder.as_ref().expect("poller not built");
    assert!(recorder.presented().is_empty());
}

#[then(expr = "an emergency of type {string} with description {string} should be presented")]
fn emergency_presented(world: &mut WatchWorld, kind: String, description: String) {
    let recorder = world.recorder.as_ref().expect("poller not built");
    let presented = recorder.presented();
    assert_eq!(presented.len(), 1);
    assert_eq!(presented[0].kind, kind);
    assert_eq!(presented[0].description, description);
}

#[then(expr = "the notice {string} should appear {int} time(s)")]
async fn notice_appears(world: &mut WatchWorld, message: String, times: usize) {
    let state = world.state();
    assert_eq!(state.read().await.notice_count(&message), times);
}

#[then(expr = "the status request should go to {string}")]
fn status_request_url(world: &mut WatchWorld, url: String) {
    let requests = world.http().requests();
    assert!(requests.iter().all(|r| r == &url), "{requests:?}");
    assert!(!requests.is_empty());
}
