//! BDD step definitions for event feed feature

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use dashboard_watch::events::{DateFilter, EventFeedLoader, EventQuery, LoadOutcome, RowStyle};

use crate::world::WatchWorld;

async fn load(world: &mut WatchWorld, query: EventQuery) {
    let loader = EventFeedLoader::new("http://dashboard.test", world.http(), world.display());
    world.load_outcome = Some(loader.load(&query).await);
}

fn row_style(name: &str) -> RowStyle {
    match name {
        "temperature" => RowStyle::Temperature,
        "seismic-alert" => RowStyle::SeismicAlert,
        "fire" => RowStyle::Fire,
        "pedestrian-traffic" => RowStyle::PedestrianTraffic,
        "plain" => RowStyle::Plain,
        other => panic!("unknown row style {other}"),
    }
}

#[given("the event endpoints return:")]
fn events_return(world: &mut WatchWorld, step: &Step) {
    let body = step.docstring.as_ref().expect("docstring missing");
    world.http().push_ok(body);
}

#[given("the event endpoints are unreachable")]
fn events_unreachable(world: &mut WatchWorld) {
    world.http().push_unreachable();
}

#[when("the dashboard loads all events")]
async fn load_all(world: &mut WatchWorld) {
    load(world, EventQuery::All).await;
}

#[when(expr = "the dashboard loads events of type {string}")]
async fn load_by_type(world: &mut WatchWorld, tipo: String) {
    load(world, EventQuery::by_type(tipo)).await;
}

#[when(expr = "the dashboard searches events for year {int} and month {int}")]
async fn search_year_month(world: &mut WatchWorld, year: i32, month: u32) {
    let filter = DateFilter {
        year: Some(year),
        month: Some(month),
        day: None,
    };
    load(world, EventQuery::DateRange(filter)).await;
}

#[when("the dashboard searches events without any date criteria")]
async fn search_empty(world: &mut WatchWorld) {
    load(world, EventQuery::DateRange(DateFilter::default())).await;
}

#[then(expr = "the event table should have {int} row(s)")]
async fn table_rows(world: &mut WatchWorld, count: usize) {
    let state = world.state();
    assert_eq!(state.read().await.rows.len(), count);
}

#[then(expr = "row {int} should be at {string} with style {string}")]
async fn row_is(world: &mut WatchWorld, index: usize, location: String, style: String) {
    let state = world.state();
    let state = state.read().await;
    let row = &state.rows[index - 1];
    assert_eq!(row.record.ubicacion, location);
    assert_eq!(row.style, row_style(&style));
}

#[then(expr = "the latest notice should be {string}")]
async fn latest_notice(world: &mut WatchWorld, message: String) {
    let state = world.state();
    let state = state.read().await;
    let notice = state.notices.back().expect("no notice shown");
    assert_eq!(notice.message, message);
}

#[then("no event request should have been made")]
fn no_request(world: &mut WatchWorld) {
    assert!(world.http().requests().is_empty());
    assert_eq!(world.load_outcome, Some(LoadOutcome::Rejected));
}

#[then(expr = "the last event request should go to {string}")]
fn last_request(world: &mut WatchWorld, url: String) {
    let requests = world.http().requests();
    assert_eq!(requests.last(), Some(&url));
}
