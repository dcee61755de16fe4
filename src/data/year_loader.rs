use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::loader::{load_year, FlightSource};
use super::model::FlightDataset;

// ---------------------------------------------------------------------------
// Background year loading with a stale-response guard
// ---------------------------------------------------------------------------

/// Finished load, tagged with the request that started it.
struct LoadOutcome {
    generation: u64,
    dataset: FlightDataset,
}

type Notify = Arc<dyn Fn() + Send + Sync>;

/// Runs one load per year selection off the UI thread.
///
/// Every request gets a new generation number. Only the outcome of the
/// latest request is ever handed back; earlier ones are dropped when they
/// arrive, whatever order the worker threads finish in.
pub struct YearLoader {
    source: Arc<dyn FlightSource>,
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
    generation: u64,
    pending_year: Option<String>,
    notify: Option<Notify>,
}

impl YearLoader {
    pub fn new(source: Arc<dyn FlightSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            generation: 0,
            pending_year: None,
            notify: None,
        }
    }

    /// Called from the worker thread after each load completes.
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Swap the resource; takes effect from the next request.
    pub fn set_source(&mut self, source: Arc<dyn FlightSource>) {
        self.source = source;
    }

    /// Start loading `year`, superseding any load still in flight.
    pub fn request(&mut self, year: &str) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        self.pending_year = Some(year.to_string());

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let notify = self.notify.clone();
        let year = year.to_string();

        log::debug!("Requesting {year} (generation {generation})");
        thread::spawn(move || {
            let dataset = load_year(source.as_ref(), &year);
            // Receiver gone means the loader was dropped; nothing to do.
            let _ = tx.send(LoadOutcome {
                generation,
                dataset,
            });
            if let Some(notify) = notify {
                notify();
            }
        });
        generation
    }

    /// Year of the request still waiting for its outcome.
    pub fn pending_year(&self) -> Option<&str> {
        self.pending_year.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending_year.is_some()
    }

    /// Non-blocking: the current request's dataset if it has arrived.
    pub fn poll(&mut self) -> Option<FlightDataset> {
        let mut latest = None;
        while let Ok(outcome) = self.rx.try_recv() {
            if let Some(ds) = self.accept(outcome) {
                latest = Some(ds);
            }
        }
        latest
    }

    /// Block until the current request completes or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<FlightDataset> {
        if !self.is_pending() {
            return None;
        }
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    if let Some(ds) = self.accept(outcome) {
                        return Some(ds);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None;
                }
            }
        }
    }

    fn accept(&mut self, outcome: LoadOutcome) -> Option<FlightDataset> {
        if outcome.generation != self.generation {
            log::debug!(
                "Discarding stale load of {} (generation {}, current {})",
                outcome.dataset.year(),
                outcome.generation,
                self.generation
            );
            return None;
        }
        self.pending_year = None;
        Some(outcome.dataset)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use anyhow::Result;

    use super::*;

    /// Serves a fixed CSV per year; "2020" blocks until the gate opens.
    struct GatedSource {
        gate: Mutex<Receiver<()>>,
    }

    impl FlightSource for GatedSource {
        fn fetch(&self, year: &str) -> Result<Vec<u8>> {
            if year == "2020" {
                let gate = self.gate.lock().unwrap();
                gate.recv()?;
            }
            Ok(format!(
                "Entity,Week,Day,Flights\nGermany,1,01/01/{year},{year}\n"
            )
            .into_bytes())
        }
    }

    fn gated() -> (Arc<GatedSource>, Sender<()>) {
        let (open, gate) = mpsc::channel();
        (
            Arc::new(GatedSource {
                gate: Mutex::new(gate),
            }),
            open,
        )
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn latest_request_wins_when_older_finishes_last() {
        let (source, open) = gated();
        let mut loader = YearLoader::new(source);

        loader.request("2020");
        loader.request("2021");
        assert_eq!(loader.pending_year(), Some("2021"));

        let ds = loader.wait(WAIT).expect("2021 should load");
        assert_eq!(ds.year(), "2021");
        assert_eq!(ds.records()[0].flights, 2021);
        assert!(!loader.is_pending());

        // Let the superseded 2020 load finish now; it must be ignored.
        open.send(()).unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(loader.poll().is_none());
    }

    #[test]
    fn latest_request_wins_when_older_finishes_first() {
        let (source, open) = gated();
        let mut loader = YearLoader::new(source);

        open.send(()).unwrap();
        loader.request("2020");
        thread::sleep(Duration::from_millis(100));
        loader.request("2021");

        let ds = loader.wait(WAIT).expect("2021 should load");
        assert_eq!(ds.year(), "2021");
        assert!(loader.poll().is_none());
    }

    #[test]
    fn notify_fires_per_completed_load() {
        let (source, _open) = gated();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let mut loader = YearLoader::new(source).with_notify(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        loader.request("2022");
        assert!(loader.wait(WAIT).is_some());
        thread::sleep(Duration::from_millis(50));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn wait_without_request_returns_immediately() {
        let (source, _open) = gated();
        let mut loader = YearLoader::new(source);
        assert!(loader.wait(WAIT).is_none());
        assert!(loader.poll().is_none());
    }
}
