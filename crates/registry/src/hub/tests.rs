use locus_primitives::Scopes;
use pretty_assertions::assert_eq;

use super::*;
use crate::error::ErrorKind;

fn with_service(registry: &Arc<Registry>, kta: &[&str], scopes: &[&str]) {
	registry
		.create_instance(kta, scopes, |_, ctx| Ok(ctx.instance(())))
		.unwrap();
}

fn plain_factory(registry_type: &str, _: &Arc<RegistryHub>) -> Result<Arc<Registry>> {
	Registry::new(registry_type)
}

#[test]
fn create_registry_stamps_hub() {
	let hub = RegistryHub::new();
	let users = hub.create_registry("users", plain_factory).unwrap();

	assert!(users.is_affiliated());
	assert!(Arc::ptr_eq(&users.hub().unwrap(), &hub));
	assert!(Arc::ptr_eq(&hub.get_registry("users").unwrap(), &users));
	assert_eq!(hub.get_registered_types(), vec!["users".to_owned()]);
}

#[test]
fn duplicate_types_are_rejected() {
	let hub = RegistryHub::new();
	let first = Registry::new("users").unwrap();
	hub.register_registry(Arc::clone(&first)).unwrap();

	let err = hub
		.register_registry(Registry::new("users").unwrap())
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::DuplicateRegistryType);
	assert!(Arc::ptr_eq(&hub.get_registry("users").unwrap(), &first));

	let err = hub
		.register_registry(Arc::clone(&first))
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::DuplicateRegistryType);
	assert_eq!(hub.len(), 1);
}

#[test]
fn create_registry_checks_duplicates_before_running_factory() {
	let hub = RegistryHub::new();
	hub.create_registry("users", plain_factory).unwrap();

	let err = hub
		.create_registry("users", |_, _| -> Result<Arc<Registry>> {
			panic!("factory must not run for a duplicate type")
		})
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::DuplicateRegistryType);
}

#[test]
fn factory_failures_are_wrapped() {
	let hub = RegistryHub::new();
	let err = hub.create_registry("  ", plain_factory).unwrap_err();

	match err {
		RegistryError::RegistryFactory {
			registry_type,
			source,
		} => {
			assert_eq!(registry_type, "  ");
			assert_eq!(source.kind(), ErrorKind::RegistryCreation);
		}
		other => panic!("expected RegistryFactory, got {other:?}"),
	}
	assert!(hub.is_empty());
}

#[test]
fn factory_must_return_requested_type() {
	let hub = RegistryHub::new();
	let err = hub
		.create_registry("users", |_, _| Registry::new("billing"))
		.unwrap_err();

	assert_eq!(err.kind(), ErrorKind::InvalidRegistryFactoryResult);
	assert!(hub.get_registry("users").is_none());
	assert!(hub.get_registry("billing").is_none());
}

#[test]
fn factories_may_use_the_hub() {
	let hub = RegistryHub::new();
	hub.create_registry("users", plain_factory).unwrap();

	let billing = hub
		.create_registry("billing", |ty, hub| {
			assert_eq!(hub.get_registered_types(), vec!["users".to_owned()]);
			Registry::with_config(ty, hub.registry_config())
		})
		.unwrap();
	assert_eq!(billing.registry_type(), "billing");
}

#[test]
fn hub_config_reaches_factories() {
	let hub = RegistryHub::with_config(RegistryConfig::strict());
	let users = hub
		.create_registry("users", |ty, hub| Registry::with_config(ty, hub.registry_config()))
		.unwrap();
	assert_eq!(*users.config(), RegistryConfig::strict());
}

#[test]
fn get_delegates_to_member() {
	let hub = RegistryHub::new();
	let users = hub.create_registry("users", plain_factory).unwrap();
	with_service(&users, &["user", "repo"], &["prod"]);

	let via_hub = hub
		.get("users", ["user", "repo"], GetOptions::scoped("prod"))
		.unwrap();
	let direct = users
		.get(["user", "repo"], GetOptions::scoped("prod"))
		.unwrap();
	assert!(via_hub.ptr_eq(&direct));

	let hub_err = hub
		.get("users", ["user", "repo"], GetOptions::scoped("dev"))
		.unwrap_err();
	let direct_err = users
		.get(["user", "repo"], GetOptions::scoped("dev"))
		.unwrap_err();
	assert_eq!(hub_err.kind(), ErrorKind::ScopeNotFound);
	assert_eq!(hub_err.to_string(), direct_err.to_string());
}

#[test]
fn unknown_type_lists_available() {
	let hub = RegistryHub::new();
	hub.create_registry("users", plain_factory).unwrap();
	hub.create_registry("billing", plain_factory).unwrap();

	match hub.get("orders", "order", GetOptions::new()).unwrap_err() {
		RegistryError::RegistryTypeNotFound {
			registry_type,
			available,
		} => {
			assert_eq!(registry_type, "orders");
			assert_eq!(available, vec!["users".to_owned(), "billing".to_owned()]);
		}
		other => panic!("expected RegistryTypeNotFound, got {other:?}"),
	}
}

#[test]
fn unregister_only_touches_directory() {
	let hub = RegistryHub::new();
	let users = hub.create_registry("users", plain_factory).unwrap();
	with_service(&users, &["user"], &[]);

	assert!(hub.unregister_registry("users"));
	assert!(!hub.unregister_registry("users"));
	assert!(hub.get_registry("users").is_none());

	// The registry keeps its instances and its affiliation.
	assert_eq!(users.len(), 1);
	assert!(users.is_affiliated());
	assert_eq!(
		hub.get("users", "user", GetOptions::new()).unwrap_err().kind(),
		ErrorKind::RegistryTypeNotFound
	);

	// Re-registering the same registry is allowed once the slot is free.
	hub.register_registry(Arc::clone(&users)).unwrap();
	assert!(hub.get("users", "user", GetOptions::new()).is_ok());
}

#[test]
fn affiliation_happens_once() {
	let first = RegistryHub::new();
	let second = RegistryHub::new();
	let users = Registry::new("users").unwrap();

	first.register_registry(Arc::clone(&users)).unwrap();
	second.register_registry(Arc::clone(&users)).unwrap();

	assert!(Arc::ptr_eq(&users.hub().unwrap(), &first));
	assert!(second.get_registry("users").is_some());
}

#[test]
fn all_coordinates_are_tagged_and_flattened() {
	let hub = RegistryHub::new();
	let users = hub.create_registry("users", plain_factory).unwrap();
	let billing = hub.create_registry("billing", plain_factory).unwrap();
	with_service(&users, &["user", "repo"], &["prod"]);
	with_service(&users, &["user"], &[]);
	with_service(&billing, &["invoice"], &[]);

	assert_eq!(
		hub.get_all_coordinates(),
		vec![
			HubCoordinate {
				registry_type: "users".into(),
				coordinate: Coordinate::new("user", Scopes::none()),
			},
			HubCoordinate {
				registry_type: "users".into(),
				coordinate: Coordinate::new(["user", "repo"], ["prod"]),
			},
			HubCoordinate {
				registry_type: "billing".into(),
				coordinate: Coordinate::new("invoice", Scopes::none()),
			},
		]
	);
}

#[test]
fn all_statistics_cover_members() {
	let hub = RegistryHub::new();
	let users = hub.create_registry("users", plain_factory).unwrap();
	hub.create_registry("billing", plain_factory).unwrap();
	with_service(&users, &["user"], &[]);
	hub.get("users", "user", GetOptions::new()).unwrap();

	let stats = hub.get_all_statistics();
	assert_eq!(stats.len(), 2);
	assert_eq!(stats[0].0, "users");
	assert_eq!(stats[0].1.total_get_calls, 1);
	assert_eq!(stats[1].0, "billing");
	assert_eq!(stats[1].1.total_get_calls, 0);
}
