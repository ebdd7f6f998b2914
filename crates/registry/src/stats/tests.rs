use locus_primitives::Coordinate;
use pretty_assertions::assert_eq;

use super::*;

fn service() -> Client {
	Client::service("users", Coordinate::new(["user", "repo"], Scopes::none()))
}

#[test]
fn identical_calls_accumulate() {
	let stats = RegistryStats::new();
	let kta = Kta::from(["auth", "session"]);
	let scopes = Scopes::from("prod");

	for _ in 0..5 {
		stats.record_get_call(&kta, &scopes, None);
	}

	assert_eq!(stats.get_call_count(&kta, &scopes), 5);
	assert_eq!(stats.get_call_count_by_client(&kta, &scopes, None), 5);
	assert_eq!(stats.get_total_calls_for_kta(&kta), 5);
	assert_eq!(stats.get_statistics().total_get_calls, 5);
}

#[test]
fn scope_order_does_not_split_counters() {
	let stats = RegistryStats::new();
	let kta = Kta::from("auth");

	stats.record_get_call(&kta, &Scopes::from(["prod", "eu"]), None);
	stats.record_get_call(&kta, &Scopes::from(["eu", "prod"]), None);
	stats.record_get_call(&kta, &Scopes::none(), None);

	assert_eq!(stats.get_call_count(&kta, &Scopes::from(["eu", "prod"])), 2);
	assert_eq!(stats.get_call_count(&kta, &Scopes::none()), 1);
	assert_eq!(stats.get_statistics().coordinate_call_records.len(), 2);
}

#[test]
fn clients_are_distinguished_and_summarized() {
	let stats = RegistryStats::new();
	let kta = Kta::from("auth");
	let none = Scopes::none();
	let app = Client::application("cli");
	let svc = service();

	stats.record_get_call(&kta, &none, Some(&app));
	stats.record_get_call(&kta, &none, Some(&app));
	stats.record_get_call(&kta, &none, Some(&svc));
	stats.record_get_call(&kta, &none, None);

	assert_eq!(stats.get_call_count_by_client(&kta, &none, Some(&app)), 2);
	assert_eq!(stats.get_call_count_by_client(&kta, &none, Some(&svc)), 1);
	assert_eq!(stats.get_call_count_by_client(&kta, &none, None), 1);
	assert_eq!(
		stats.get_call_count_by_client(&kta, &none, Some(&Client::application("other"))),
		0
	);

	let snapshot = stats.get_statistics();
	assert_eq!(
		snapshot.client_summary,
		ClientSummary {
			service_calls: 1,
			application_calls: 2,
			unidentified_calls: 1,
		}
	);
	assert_eq!(
		snapshot.record(&kta, &none).unwrap().client_calls,
		vec![
			ClientCallCount {
				client: Some(app),
				count: 2
			},
			ClientCallCount {
				client: Some(svc),
				count: 1
			},
			ClientCallCount {
				client: None,
				count: 1
			},
		]
	);
}

#[test]
fn read_throughs_agree_with_snapshot() {
	let stats = RegistryStats::new();
	let calls = [
		(Kta::from("a"), Scopes::none()),
		(Kta::from(["a", "b"]), Scopes::from("x")),
		(Kta::from("a"), Scopes::from("y")),
		(Kta::from("a"), Scopes::none()),
	];
	for (kta, scopes) in &calls {
		stats.record_get_call(kta, scopes, None);
	}

	let snapshot = stats.get_statistics();
	for record in &snapshot.coordinate_call_records {
		assert_eq!(stats.get_call_count(&record.kta, &record.scopes), record.count);
	}
	for kta in stats.get_called_kta_paths() {
		let from_snapshot: u64 = snapshot
			.coordinate_call_records
			.iter()
			.filter(|r| r.kta == kta)
			.map(|r| r.count)
			.sum();
		assert_eq!(stats.get_total_calls_for_kta(&kta), from_snapshot);
	}
	assert_eq!(
		stats.get_called_kta_paths(),
		vec![Kta::from("a"), Kta::from(["a", "b"])]
	);
	assert_eq!(snapshot.total_get_calls, calls.len() as u64);
}

#[test]
fn snapshots_are_independent() {
	let stats = RegistryStats::new();
	let kta = Kta::from("auth");
	stats.record_get_call(&kta, &Scopes::none(), None);

	let mut first = stats.get_statistics();
	first.coordinate_call_records[0].count = 99;
	first.coordinate_call_records.clear();
	first.total_get_calls = 0;

	let second = stats.get_statistics();
	assert_eq!(second.total_get_calls, 1);
	assert_eq!(second.coordinate_call_records.len(), 1);
	assert_eq!(second.coordinate_call_records[0].count, 1);
	assert_ne!(first, second);
}

#[test]
fn reset_clears_counters() {
	let stats = RegistryStats::new();
	stats.record_get_call(&Kta::from("a"), &Scopes::none(), None);
	stats.reset();
	assert_eq!(stats.get_statistics(), RegistryStatistics::default());
	assert!(stats.get_called_kta_paths().is_empty());
}
