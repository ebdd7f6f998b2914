//! Lookup call statistics.
//!
//! [`RegistryStats`] counts successful `get` calls per key path, normalized
//! scope set and caller. Counters never leave the tracker; readers receive
//! owned [`RegistryStatistics`] snapshots or plain totals.

use indexmap::IndexMap;
use locus_primitives::{Client, Kta, Scopes};
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;

#[cfg(test)]
mod tests;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Calls per client for one `(kta, scopes)` pair. `None` is unidentified.
type ClientCounts = FxIndexMap<Option<Client>, u64>;

#[derive(Debug, Default)]
struct StatsState {
	calls: FxIndexMap<Kta, FxIndexMap<Scopes, ClientCounts>>,
}

/// Tracks `get` calls by `(kta, scopes, client)`.
#[derive(Debug, Default)]
pub struct RegistryStats {
	state: Mutex<StatsState>,
}

/// Calls attributed to one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCallCount {
	/// The caller, or `None` for unidentified calls.
	pub client: Option<Client>,
	/// Number of calls.
	pub count: u64,
}

/// Aggregated calls for one key path and scope set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateCallRecord {
	/// Requested key path.
	pub kta: Kta,
	/// Requested scopes.
	pub scopes: Scopes,
	/// Total calls for this pair.
	pub count: u64,
	/// Per-client breakdown in first-call order.
	pub client_calls: Vec<ClientCallCount>,
}

/// Calls grouped by caller kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSummary {
	/// Calls made by registered services.
	pub service_calls: u64,
	/// Calls made by application code.
	pub application_calls: u64,
	/// Calls without a client.
	pub unidentified_calls: u64,
}

/// Owned snapshot of a tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStatistics {
	/// Sum of every recorded call.
	pub total_get_calls: u64,
	/// One record per `(kta, scopes)` pair in first-call order.
	pub coordinate_call_records: Vec<CoordinateCallRecord>,
	/// Calls grouped by caller kind.
	pub client_summary: ClientSummary,
}

impl RegistryStatistics {
	/// Returns the record for `kta` and `scopes`, if any call was recorded.
	pub fn record(&self, kta: &Kta, scopes: &Scopes) -> Option<&CoordinateCallRecord> {
		self.coordinate_call_records
			.iter()
			.find(|r| &r.kta == kta && &r.scopes == scopes)
	}
}

impl RegistryStats {
	/// Creates an empty tracker.
	pub fn new() -> Self {
		Self::default()
	}

	/// Counts one `get` call.
	pub fn record_get_call(&self, kta: &Kta, scopes: &Scopes, client: Option<&Client>) {
		tracing::trace!(
			kta = %kta,
			scopes = %scopes,
			client = client.map(tracing::field::display),
			"recording get call",
		);

		let mut state = self.state.lock();
		*state
			.calls
			.entry(kta.clone())
			.or_default()
			.entry(scopes.clone())
			.or_default()
			.entry(client.cloned())
			.or_insert(0) += 1;
	}

	/// Builds a snapshot of every counter.
	///
	/// Each call allocates new containers; snapshots never alias each other
	/// or the tracker.
	pub fn get_statistics(&self) -> RegistryStatistics {
		let state = self.state.lock();
		let mut stats = RegistryStatistics::default();

		for (kta, by_scope) in &state.calls {
			for (scopes, by_client) in by_scope {
				let mut record = CoordinateCallRecord {
					kta: kta.clone(),
					scopes: scopes.clone(),
					count: 0,
					client_calls: Vec::with_capacity(by_client.len()),
				};

				for (client, &count) in by_client {
					record.count += count;
					match client {
						Some(Client::Service { .. }) => stats.client_summary.service_calls += count,
						Some(Client::Application(_)) => {
							stats.client_summary.application_calls += count
						}
						None => stats.client_summary.unidentified_calls += count,
					}
					record.client_calls.push(ClientCallCount {
						client: client.clone(),
						count,
					});
				}

				stats.total_get_calls += record.count;
				stats.coordinate_call_records.push(record);
			}
		}

		stats
	}

	/// Returns calls recorded for `kta` and `scopes` across all clients.
	pub fn get_call_count(&self, kta: &Kta, scopes: &Scopes) -> u64 {
		self.state
			.lock()
			.calls
			.get(kta)
			.and_then(|by_scope| by_scope.get(scopes))
			.map_or(0, |by_client| by_client.values().sum())
	}

	/// Returns calls recorded for `kta` and `scopes` from one client.
	pub fn get_call_count_by_client(
		&self,
		kta: &Kta,
		scopes: &Scopes,
		client: Option<&Client>,
	) -> u64 {
		let key = client.cloned();
		self.state
			.lock()
			.calls
			.get(kta)
			.and_then(|by_scope| by_scope.get(scopes))
			.and_then(|by_client| by_client.get(&key))
			.copied()
			.unwrap_or(0)
	}

	/// Returns calls recorded for `kta` across all scopes and clients.
	pub fn get_total_calls_for_kta(&self, kta: &Kta) -> u64 {
		self.state.lock().calls.get(kta).map_or(0, |by_scope| {
			by_scope
				.values()
				.flat_map(|by_client| by_client.values())
				.sum()
		})
	}

	/// Returns every key path with at least one recorded call.
	pub fn get_called_kta_paths(&self) -> Vec<Kta> {
		self.state.lock().calls.keys().cloned().collect()
	}

	/// Clears every counter.
	pub fn reset(&self) {
		self.state.lock().calls.clear();
	}
}
