//! Historical event feed: fetch, classify and render event rows

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::display::Display;
use crate::io::HttpClient;
use crate::state::Notice;

pub const EVENTS_PATH: &str = "/obtener_eventos";
pub const FILTERED_EVENTS_PATH: &str = "/eventos_filtrados";
pub const EVENTS_BY_TYPE_PATH: &str = "/eventos_por_tipo";

/// Type filter value that selects every event
pub const ALL_TYPES: &str = "Todos";

/// One event as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub fecha: String,
    #[serde(default)]
    pub ubicacion: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub descripcion: String,
}

/// Display style of an event row, derived from the event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Temperature,
    SeismicAlert,
    Fire,
    PedestrianTraffic,
    Plain,
}

impl RowStyle {
    pub fn for_type(tipo: &str) -> Self {
        match tipo {
            "Temperatura" => RowStyle::Temperature,
            "Alerta Sismica" => RowStyle::SeismicAlert,
            "Incendio" => RowStyle::Fire,
            "Trafico Peatonal" => RowStyle::PedestrianTraffic,
            _ => RowStyle::Plain,
        }
    }
}

impl fmt::Display for RowStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStyle::Temperature => write!(f, "temperature"),
            RowStyle::SeismicAlert => write!(f, "seismic-alert"),
            RowStyle::Fire => write!(f, "fire"),
            RowStyle::PedestrianTraffic => write!(f, "pedestrian-traffic"),
            RowStyle::Plain => write!(f, "plain"),
        }
    }
}

/// A rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub record: EventRecord,
    pub style: RowStyle,
}

impl EventRow {
    pub fn classify(record: EventRecord) -> Self {
        let style = RowStyle::for_type(&record.tipo);
        Self { record, style }
    }
}

/// Date criteria for a filtered search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl DateFilter {
    /// The notice to show when this filter cannot be searched, if any
    pub fn rejection(&self) -> Option<Notice> {
        if self.year.is_none() && self.month.is_none() && self.day.is_none() {
            return Some(Notice::warning(
                "Enter at least one date criterion to filter",
            ));
        }
        let month_invalid = self.month.is_some_and(|m| !(1..=12).contains(&m));
        let day_invalid = self.day.is_some_and(|d| !(1..=31).contains(&d));
        if month_invalid || day_invalid {
            return Some(Notice::danger("Invalid date values"));
        }
        None
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(year) = self.year {
            params.push(("anio", year.to_string()));
        }
        if let Some(month) = self.month {
            params.push(("mes", month.to_string()));
        }
        if let Some(day) = self.day {
            params.push(("dia", day.to_string()));
        }
        params
    }
}

/// Which events to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventQuery {
    All,
    DateRange(DateFilter),
    ByType(String),
}

impl EventQuery {
    /// Query for one event type; [`ALL_TYPES`] selects every event
    pub fn by_type(tipo: impl Into<String>) -> Self {
        let tipo = tipo.into();
        if tipo == ALL_TYPES {
            EventQuery::All
        } else {
            EventQuery::ByType(tipo)
        }
    }

    /// Whether a transport failure schedules another attempt
    pub fn retries_on_failure(&self) -> bool {
        matches!(self, EventQuery::All)
    }

    pub fn url(&self, base_url: &str) -> crate::Result<Url> {
        let base = base_url.trim_end_matches('/');
        let invalid = |e: &dyn fmt::Display| {
            crate::WatchError::Config(format!("Invalid server URL {:?}: {}", base_url, e))
        };

        match self {
            EventQuery::All => {
                Url::parse(&format!("{}{}", base, EVENTS_PATH)).map_err(|e| invalid(&e))
            }
            EventQuery::DateRange(filter) => Url::parse_with_params(
                &format!("{}{}", base, FILTERED_EVENTS_PATH),
                filter.params(),
            )
            .map_err(|e| invalid(&e)),
            EventQuery::ByType(tipo) => {
                let mut url = Url::parse(&format!("{}{}", base, EVENTS_BY_TYPE_PATH))
                    .map_err(|e| invalid(&e))?;
                url.path_segments_mut()
                    .map_err(|_| invalid(&"cannot be a base URL"))?
                    .push(tipo);
                Ok(url)
            }
        }
    }

    fn outcome_notice(&self, outcome: &LoadOutcome) -> Option<Notice> {
        let notice = match (self, outcome) {
            (_, LoadOutcome::Rejected) => return None,
            (_, LoadOutcome::ServerError(error)) => Notice::danger(format!("Error: {}", error)),

            (EventQuery::All, LoadOutcome::Loaded(count)) => {
                Notice::success(format!("Loaded {} events", count))
            }
            (EventQuery::All, LoadOutcome::Empty) => {
                Notice::warning("No events found in the database")
            }
            (EventQuery::All, LoadOutcome::TransportFailure(_)) => {
                Notice::danger("Database connection error. Retrying...")
            }

            (EventQuery::DateRange(_), LoadOutcome::Loaded(count)) => {
                Notice::success(format!("Found {} events matching the filters", count))
            }
            (EventQuery::DateRange(_), LoadOutcome::Empty) => {
                Notice::warning("No events found matching the filters")
            }
            (EventQuery::DateRange(_), LoadOutcome::TransportFailure(_)) => {
                Notice::danger("Connection error while searching events. Try again later.")
            }

            (EventQuery::ByType(tipo), LoadOutcome::Loaded(count)) => {
                Notice::success(format!("Found {} events of type '{}'", count, tipo))
            }
            (EventQuery::ByType(tipo), LoadOutcome::Empty) => {
                Notice::warning(format!("No events found of type '{}'", tipo))
            }
            (EventQuery::ByType(_), LoadOutcome::TransportFailure(_)) => {
                Notice::danger("Connection error while filtering events. Try again later.")
            }
        };
        Some(notice)
    }
}

impl fmt::Display for EventQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventQuery::All => write!(f, "all events"),
            EventQuery::DateRange(filter) => write!(
                f,
                "events for year={:?} month={:?} day={:?}",
                filter.year, filter.month, filter.day
            ),
            EventQuery::ByType(tipo) => write!(f, "events of type '{}'", tipo),
        }
    }
}

/// Event list payload: rows, or an application error
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EventsPayload {
    Events(Vec<EventRecord>),
    Error { error: String },
}

/// Result of one load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Empty,
    /// The backend answered with an `error` payload
    ServerError(String),
    /// The request did not complete
    TransportFailure(String),
    /// The query was invalid and no request was issued
    Rejected,
}

impl LoadOutcome {
    /// Whether the load ended without a result to show
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            LoadOutcome::ServerError(_) | LoadOutcome::TransportFailure(_) | LoadOutcome::Rejected
        )
    }
}

/// Loads event lists into the dashboard table
pub struct EventFeedLoader {
    base_url: String,
    http: Arc<dyn HttpClient>,
    display: Arc<dyn Display>,
}

impl std::fmt::Debug for EventFeedLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventFeedLoader")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl EventFeedLoader {
    pub fn new(
        base_url: impl Into<String>,
        http: Arc<dyn HttpClient>,
        display: Arc<dyn Display>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            display,
        }
    }

    async fn fetch(&self, query: &EventQuery) -> crate::Result<EventsPayload> {
        let url = query.url(&self.base_url)?;
        let response = self.http.get(url.as_str()).await?;
        if !response.is_success() {
            return Err(crate::WatchError::Http(format!(
                "GET {} returned status {}",
                url, response.status
            )));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Load one query, render the rows and report the outcome as a notice
    pub async fn load(&self, query: &EventQuery) -> LoadOutcome {
        if let EventQuery::DateRange(filter) = query {
            if let Some(notice) = filter.rejection() {
                tracing::debug!("Rejected {}: {}", query, notice.message);
                self.display.show_notice(notice).await;
                return LoadOutcome::Rejected;
            }
        }

        let outcome = match self.fetch(query).await {
            Ok(EventsPayload::Events(records)) => {
                tracing::debug!("Received {} rows for {}", records.len(), query);
                let count = records.len();
                let mut rows: Vec<EventRow> = records.into_iter().map(EventRow::classify).collect();
                rows.sort_by(|a, b| b.record.fecha.cmp(&a.record.fecha));
                self.display.show_events(rows).await;
                if count == 0 {
                    LoadOutcome::Empty
                } else {
                    LoadOutcome::Loaded(count)
                }
            }
            Ok(EventsPayload::Error { error }) => {
                tracing::warn!("Backend error loading {}: {}", query, error);
                LoadOutcome::ServerError(error)
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", query, e);
                LoadOutcome::TransportFailure(e.to_string())
            }
        };

        if let Some(notice) = query.outcome_notice(&outcome) {
            self.display.show_notice(notice).await;
        }
        outcome
    }

    /// Load a query, retrying after `retry_delay` on transport failure when
    /// the query allows it. Returns early when `cancel` fires.
    pub async fn load_with_retry(
        &self,
        query: &EventQuery,
        retry_delay: Duration,
        cancel: &CancellationToken,
    ) -> LoadOutcome {
        loop {
            let outcome = self.load(query).await;
            if !matches!(outcome, LoadOutcome::TransportFailure(_)) || !query.retries_on_failure() {
                return outcome;
            }

            tokio::select! {
                _ = tokio::time::sleep(retry_delay) => {
                    tracing::debug!("Retrying {}", query);
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("Retry of {} cancelled", query);
                    return outcome;
                }
            }
        }
    }
}
