use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use axum::{Json, Router, extract::Query, extract::State, routing::get};
use tokio::sync::watch;

use bridge_client::{SearchClient, SearchFeed, SearchSnapshot};

struct StubApi {
	hits: Arc<AtomicUsize>,
}

/// Serves `/api/search` with one canned result echoing the query. Queries
/// starting with "slow" stall before answering.
async fn spawn_api() -> (String, Arc<AtomicUsize>) {
	let hits = Arc::new(AtomicUsize::new(0));
	let state = Arc::new(StubApi { hits: hits.clone() });
	let router = Router::new()
		.route(
			"/api/search",
			get(
				|State(state): State<Arc<StubApi>>, Query(params): Query<HashMap<String, String>>| async move {
					state.hits.fetch_add(1, Ordering::SeqCst);

					let query = params.get("q").cloned().unwrap_or_default();

					if query.starts_with("slow") {
						tokio::time::sleep(Duration::from_millis(400)).await;
					}

					Json(serde_json::json!([{
						"id": format!("task-{query}"),
						"type": "task",
						"title": query,
						"snippet": "Open",
						"date": null,
						"icon": "📝",
					}]))
				},
			),
		)
		.with_state(state);
	let listener =
		tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind stub API.");
	let addr = listener.local_addr().expect("Failed to read stub API address.");

	tokio::spawn(async move {
		let _ = axum::serve(listener, router).await;
	});

	(format!("http://{addr}"), hits)
}

async fn wait_for(
	rx: &mut watch::Receiver<SearchSnapshot>,
	predicate: impl Fn(&SearchSnapshot) -> bool,
) -> SearchSnapshot {
	tokio::time::timeout(Duration::from_secs(3), async {
		loop {
			{
				let snapshot = rx.borrow_and_update();

				if predicate(&snapshot) {
					return snapshot.clone();
				}
			}

			rx.changed().await.expect("Feed worker dropped the snapshot channel.");
		}
	})
	.await
	.expect("Timed out waiting for a snapshot.")
}

#[tokio::test]
async fn rapid_keystrokes_coalesce_into_one_request() {
	let (base_url, hits) = spawn_api().await;
	let client = SearchClient::new(base_url).expect("Failed to build client.");
	let feed = SearchFeed::spawn_with_debounce(client, Duration::from_millis(50));
	let mut rx = feed.watch();

	feed.input("r");
	feed.input("ra");
	feed.input("rag");

	let snapshot = wait_for(&mut rx, |snapshot| snapshot.query == "rag").await;

	assert_eq!(snapshot.results.len(), 1);
	assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn later_query_wins_over_a_slow_earlier_response() {
	let (base_url, _hits) = spawn_api().await;
	let client = SearchClient::new(base_url).expect("Failed to build client.");
	let feed = SearchFeed::spawn_with_debounce(client, Duration::from_millis(10));
	let mut rx = feed.watch();

	feed.input("slow draft");

	// Let the debounce fire so the slow request is actually in flight.
	tokio::time::sleep(Duration::from_millis(100)).await;

	feed.input("fast");

	let snapshot = wait_for(&mut rx, |snapshot| snapshot.query == "fast").await;

	assert_eq!(snapshot.results[0].title, "fast");

	// The slow response lands afterwards and must be dropped.
	tokio::time::sleep(Duration::from_millis(600)).await;

	assert_eq!(feed.snapshot().query, "fast");
}

#[tokio::test]
async fn whitespace_input_clears_without_a_request() {
	let (base_url, hits) = spawn_api().await;
	let client = SearchClient::new(base_url).expect("Failed to build client.");
	let feed = SearchFeed::spawn_with_debounce(client, Duration::from_millis(10));
	let mut rx = feed.watch();

	feed.input("   ");

	let snapshot = wait_for(&mut rx, |snapshot| snapshot.seq > 0).await;

	assert_eq!(snapshot.query, "");
	assert!(snapshot.results.is_empty());
	assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn clearing_input_drops_an_in_flight_response() {
	let (base_url, _hits) = spawn_api().await;
	let client = SearchClient::new(base_url).expect("Failed to build client.");
	let feed = SearchFeed::spawn_with_debounce(client, Duration::from_millis(10));
	let mut rx = feed.watch();

	feed.input("slow draft");
	tokio::time::sleep(Duration::from_millis(100)).await;
	feed.input("");

	let snapshot = wait_for(&mut rx, |snapshot| snapshot.seq >= 2).await;

	assert_eq!(snapshot.query, "");

	tokio::time::sleep(Duration::from_millis(600)).await;

	assert_eq!(feed.snapshot().query, "");
}
