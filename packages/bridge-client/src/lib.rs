use std::{
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};

use tokio::{
	sync::{mpsc, watch},
	task::JoinHandle,
};

use bridge_domain::SearchResult;

pub type Result<T, E = Error> = std::result::Result<T, E>;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
}

/// Thin caller for the aggregation endpoint.
#[derive(Clone)]
pub struct SearchClient {
	http: reqwest::Client,
	base_url: String,
}
impl SearchClient {
	pub fn new(base_url: impl Into<String>) -> Result<Self> {
		let http = reqwest::Client::builder().build()?;

		Ok(Self { http, base_url: base_url.into() })
	}

	pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
		let url = format!("{}/api/search", self.base_url);
		let response =
			self.http.get(url).query(&[("q", query)]).send().await?.error_for_status()?;

		Ok(response.json().await?)
	}
}

/// What the feed last published. `seq` increases with every issued query, so
/// consumers can tell stale renders apart.
#[derive(Clone, Debug, Default)]
pub struct SearchSnapshot {
	pub seq: u64,
	pub query: String,
	pub results: Vec<SearchResult>,
}

/// Debounced, supersession-safe search input. Push raw keystrokes with
/// [`SearchFeed::input`]; the worker waits out the debounce window, issues
/// one request per settled query, and publishes a snapshot only while that
/// request is still the latest issued. A slow early response can never
/// overwrite a faster later one.
pub struct SearchFeed {
	input_tx: mpsc::UnboundedSender<String>,
	snapshot_rx: watch::Receiver<SearchSnapshot>,
	worker: JoinHandle<()>,
}
impl SearchFeed {
	pub fn spawn(client: SearchClient) -> Self {
		Self::spawn_with_debounce(client, DEFAULT_DEBOUNCE)
	}

	pub fn spawn_with_debounce(client: SearchClient, debounce: Duration) -> Self {
		let (input_tx, input_rx) = mpsc::unbounded_channel();
		let (snapshot_tx, snapshot_rx) = watch::channel(SearchSnapshot::default());
		let worker = tokio::spawn(run(client, debounce, input_rx, snapshot_tx));

		Self { input_tx, snapshot_rx, worker }
	}

	/// Feeds the current input text. Calls made inside one debounce window
	/// coalesce into a single request for the last value.
	pub fn input(&self, query: impl Into<String>) {
		let _ = self.input_tx.send(query.into());
	}

	pub fn snapshot(&self) -> SearchSnapshot {
		self.snapshot_rx.borrow().clone()
	}

	pub fn watch(&self) -> watch::Receiver<SearchSnapshot> {
		self.snapshot_rx.clone()
	}
}
impl Drop for SearchFeed {
	fn drop(&mut self) {
		self.worker.abort();
	}
}

async fn run(
	client: SearchClient,
	debounce: Duration,
	mut input_rx: mpsc::UnboundedReceiver<String>,
	snapshot_tx: watch::Sender<SearchSnapshot>,
) {
	let latest = Arc::new(AtomicU64::new(0));
	let mut pending: Option<String> = None;

	loop {
		let settled = match pending.take() {
			Some(query) => {
				tokio::select! {
					received = input_rx.recv() => match received {
						Some(newer) => {
							pending = Some(newer);

							continue;
						},
						None => return,
					},
					() = tokio::time::sleep(debounce) => query,
				}
			},
			None => match input_rx.recv().await {
				Some(query) => {
					pending = Some(query);

					continue;
				},
				None => return,
			},
		};

		issue(&client, &latest, &snapshot_tx, settled);
	}
}

fn issue(
	client: &SearchClient,
	latest: &Arc<AtomicU64>,
	snapshot_tx: &watch::Sender<SearchSnapshot>,
	query: String,
) {
	let query = query.trim().to_string();
	let seq = latest.fetch_add(1, Ordering::SeqCst) + 1;

	// An empty query resolves locally, but still claims a sequence number so
	// in-flight responses from before the clear are dropped.
	if query.is_empty() {
		publish(snapshot_tx, latest, SearchSnapshot { seq, query, results: Vec::new() });

		return;
	}

	let client = client.clone();
	let latest = latest.clone();
	let snapshot_tx = snapshot_tx.clone();

	tokio::spawn(async move {
		let results = match client.search(&query).await {
			Ok(results) => results,
			Err(err) => {
				tracing::warn!(error = %err, "Search request failed; publishing no results.");

				Vec::new()
			},
		};

		publish(&snapshot_tx, &latest, SearchSnapshot { seq, query, results });
	});
}

fn publish(
	snapshot_tx: &watch::Sender<SearchSnapshot>,
	latest: &AtomicU64,
	snapshot: SearchSnapshot,
) {
	snapshot_tx.send_if_modified(|current| {
		// Stale on either axis: a newer query was issued, or a newer snapshot
		// already landed.
		if snapshot.seq != latest.load(Ordering::SeqCst) || snapshot.seq <= current.seq {
			return false;
		}

		*current = snapshot;

		true
	});
}
