//! BDD step definitions for alert deduplication feature

use cucumber::{given, then, when};

use dashboard_watch::config::NORMAL_OPERATION_MESSAGE;
use dashboard_watch::dedup::AlertDeduplicator;
use dashboard_watch::status::{AlertError, AlertInfo};

use crate::world::WatchWorld;

fn evaluate(world: &mut WatchWorld, alert: AlertInfo) {
    let dedup = world.dedup.as_mut().expect("deduplicator not set");
    let outcome = dedup.evaluate(&alert);
    if outcome.emergency().is_some() {
        world.presented += 1;
    }
    world.last_outcome = Some(outcome);
}

#[given("a fresh alert deduplicator")]
fn fresh_dedup(world: &mut WatchWorld) {
    world.dedup = Some(AlertDeduplicator::new(NORMAL_OPERATION_MESSAGE));
    world.presented = 0;
}

#[when(expr = "the backend reports alert {string}")]
fn reports_alert(world: &mut WatchWorld, message: String) {
    evaluate(
        world,
        AlertInfo {
            hay_alerta: true,
            mensaje: message,
            tipo: Some("Alerta Sismica".to_string()),
            descripcion: Some("Magnitud 5.0".to_string()),
            ..Default::default()
        },
    );
}

#[when(expr = "the backend reports normal operation with message {string}")]
fn reports_normal(world: &mut WatchWorld, message: String) {
    evaluate(
        world,
        AlertInfo {
            mensaje: message,
            ..Default::default()
        },
    );
}

#[when(expr = "the backend reports an alert error {string}")]
fn reports_error(world: &mut WatchWorld, error: String) {
    evaluate(
        world,
        AlertInfo {
            hay_alerta: true,
            mensaje: "Sismo".to_string(),
            error: Some(AlertError::Message(error)),
            ..Default::default()
        },
    );
}

#[then(expr = "the emergency should have been presented {int} time(s)")]
fn presented_times(world: &mut WatchWorld, times: u32) {
    assert_eq!(world.presented, times);
}

#[then("the alert should be active")]
fn alert_active(world: &mut WatchWorld) {
    let dedup = world.dedup.as_ref().expect("deduplicator not set");
    assert!(dedup.alert_active());
}

#[then("the alert should not be active")]
fn alert_not_active(world: &mut WatchWorld) {
    let dedup = world.dedup.as_ref().expect("deduplicator not set");
    assert!(!dedup.alert_active());
    let outcome = world.last_outcome.as_ref().expect("no outcome");
    assert!(!outcome.is_active());
}

#[then(expr = "the alert label should read {string}")]
fn alert_label_reads(world: &mut WatchWorld, text: String) {
    let outcome = world.last_outcome.as_ref().expect("no outcome");
    assert_eq!(outcome.label().text, text);
}
