//! Stale-result suppression for lookups that may resolve out of order.
//!
//! Every lookup takes a [`Ticket`] from a shared, monotonically increasing
//! counter when it is issued. When its result arrives, it is handed to the
//! [`ReportView`] only if no newer ticket has been issued in the meantime;
//! otherwise the result (or failure) is dropped as [`LookupError::Superseded`].

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{
    error::{LookupError, Notice},
    location::{LocationProvider, startup_query},
    model::{LocationQuery, WeatherReport},
    service::WeatherSource,
};

/// Generation tag of one issued lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Generations {
    latest: AtomicU64,
}

impl Generations {
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// The display boundary. Implementations hold whatever presents the weather.
pub trait ReportView: Send + Sync {
    fn apply(&self, report: &WeatherReport);

    fn notify(&self, notice: Notice);
}

/// Runs lookups against a source and applies only the newest result to a view.
pub struct WeatherSession<S: ?Sized, V: ?Sized> {
    source: Arc<S>,
    view: Arc<V>,
    generations: Arc<Generations>,
    // Serialises the freshness check with the apply call.
    apply_lock: Arc<Mutex<()>>,
    default_query: LocationQuery,
}

impl<S: ?Sized, V: ?Sized> Clone for WeatherSession<S, V> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            view: Arc::clone(&self.view),
            generations: Arc::clone(&self.generations),
            apply_lock: Arc::clone(&self.apply_lock),
            default_query: self.default_query.clone(),
        }
    }
}

impl<S, V> WeatherSession<S, V>
where
    S: WeatherSource + ?Sized,
    V: ReportView + ?Sized,
{
    pub fn new(source: Arc<S>, view: Arc<V>, default_query: LocationQuery) -> Self {
        Self {
            source,
            view,
            generations: Arc::new(Generations::default()),
            apply_lock: Arc::new(Mutex::new(())),
            default_query,
        }
    }

    pub fn default_query(&self) -> &LocationQuery {
        &self.default_query
    }

    /// Tag a lookup now; the request is sent when the returned value is run.
    pub fn begin(&self, query: LocationQuery) -> PendingLookup<S, V> {
        let ticket = self.generations.issue();
        debug!(ticket = ticket.value(), %query, "lookup issued");

        PendingLookup {
            session: self.clone(),
            ticket,
            query,
        }
    }

    pub async fn lookup(&self, query: LocationQuery) -> Result<WeatherReport, LookupError> {
        self.begin(query).run().await
    }

    /// Automatic lookup at startup: the device location if known, else the default query.
    pub async fn start<L>(&self, location: &L) -> Result<WeatherReport, LookupError>
    where
        L: LocationProvider + ?Sized,
    {
        let fix = location.last_known().await;
        self.lookup(startup_query(fix, &self.default_query)).await
    }

    fn deliver(
        &self,
        ticket: Ticket,
        result: Result<WeatherReport, LookupError>,
    ) -> Result<WeatherReport, LookupError> {
        let _guard = self.apply_lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.generations.is_current(ticket) {
            debug!(ticket = ticket.value(), "discarding superseded lookup result");
            return Err(LookupError::Superseded);
        }

        match &result {
            Ok(report) => self.view.apply(report),
            Err(err) => {
                if let Some(notice) = err.notice() {
                    self.view.notify(notice);
                }
            }
        }

        result
    }
}

/// A lookup that has been tagged but not yet sent.
pub struct PendingLookup<S: ?Sized, V: ?Sized> {
    session: WeatherSession<S, V>,
    ticket: Ticket,
    query: LocationQuery,
}

impl<S, V> PendingLookup<S, V>
where
    S: WeatherSource + ?Sized,
    V: ReportView + ?Sized,
{
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn query(&self) -> &LocationQuery {
        &self.query
    }

    pub async fn run(self) -> Result<WeatherReport, LookupError> {
        let result = self.session.source.lookup(&self.query).await;
        self.session.deliver(self.ticket, result)
    }
}
