//! Arena-backed instance tree keyed by key path tokens.
//!
//! Every node holds the instances registered exactly at its path plus an
//! optional map of child tokens. All nodes live in one `Vec` owned by the
//! tree; children refer to each other by [`NodeId`], so the structure has no
//! pointer cycles. Node 0 is the root and never holds instances.

use indexmap::IndexMap;
use locus_primitives::{Coordinate, Kta, Scopes};
use rustc_hash::FxBuildHasher;

use crate::error::RegistryError;
use crate::instance::Instance;


type ChildMap = IndexMap<String, NodeId, FxBuildHasher>;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
	const ROOT: NodeId = NodeId(0);

	#[inline]
	fn index(self) -> usize {
		self.0 as usize
	}
}

/// An instance together with the scopes it was registered under.
#[derive(Debug, Clone)]
pub struct ScopedInstance {
	/// Scopes used for lookup matching.
	pub scopes: Scopes,
	/// The registered instance.
	pub instance: Instance,
}

#[derive(Debug, Default)]
struct Node {
	instances: Vec<ScopedInstance>,
	children: Option<ChildMap>,
}

/// Result of inserting into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
	/// No earlier entry at the path had the same scopes.
	Inserted,
	/// An earlier entry with identical scopes already wins every lookup.
	Shadowed,
}

/// Why a lookup failed, before it is attributed to a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupMiss {
	/// The tree holds nothing at all.
	Empty,
	/// The node for `segment` has no child subtree.
	NoChildren { segment: String },
	/// An existing subtree lacks `segment`.
	NotFound { segment: String },
	/// The terminal node holds no instances.
	NoInstances,
	/// No instance at the terminal node carries the requested scopes.
	Scope { available: Vec<Scopes> },
}

impl LookupMiss {
	/// Converts the miss into the registry error for `kta` and `requested`.
	pub fn into_error(self, registry_type: &str, kta: &Kta, requested: &Scopes) -> RegistryError {
		let kta = kta.clone();
		match self {
			Self::Empty => RegistryError::NoInstancesAvailable {
				registry_type: registry_type.to_owned(),
				kta,
			},
			Self::NoChildren { segment } => RegistryError::NoChildrenAvailable { kta, segment },
			Self::NotFound { segment } => RegistryError::InstanceNotFound { kta, segment },
			Self::NoInstances => RegistryError::NoInstancesRegistered { kta },
			Self::Scope { available } => RegistryError::ScopeNotFound {
				kta,
				requested: requested.clone(),
				available,
			},
		}
	}
}

/// Token-keyed tree of registered instances.
#[derive(Debug)]
pub struct InstanceTree {
	nodes: Vec<Node>,
}

impl Default for InstanceTree {
	fn default() -> Self {
		Self::new()
	}
}

impl InstanceTree {
	/// Creates a tree holding only the root node.
	pub fn new() -> Self {
		Self {
			nodes: vec![Node::default()],
		}
	}

	fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.index()]
	}

	fn child_or_insert(&mut self, parent: NodeId, token: &str) -> NodeId {
		if let Some(&id) = self.nodes[parent.index()]
			.children
			.as_ref()
			.and_then(|children| children.get(token))
		{
			return id;
		}

		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(Node::default());
		self.nodes[parent.index()]
			.children
			.get_or_insert_with(ChildMap::default)
			.insert(token.to_owned(), id);
		id
	}

	/// Appends `instance` at `kta`, creating missing nodes along the way.
	///
	/// Entries at a path keep their registration order.
	pub fn insert(&mut self, kta: &Kta, scopes: Scopes, instance: Instance) -> InsertOutcome {
		debug_assert!(!kta.is_empty(), "insert requires a non-empty key path");

		let mut current = NodeId::ROOT;
		for token in kta.iter() {
			current = self.child_or_insert(current, token);
		}

		let node = &mut self.nodes[current.index()];
		let outcome = if node.instances.iter().any(|e| e.scopes == scopes) {
			InsertOutcome::Shadowed
		} else {
			InsertOutcome::Inserted
		};
		node.instances.push(ScopedInstance { scopes, instance });
		outcome
	}

	/// Resolves the instance at `kta` matching `requested`.
	///
	/// An empty request selects the first entry at the path; otherwise the
	/// first entry whose scopes contain every requested scope wins.
	pub fn resolve(&self, kta: &Kta, requested: &Scopes) -> Result<&Instance, LookupMiss> {
		let mut current = NodeId::ROOT;
		for (depth, token) in kta.iter().enumerate() {
			let Some(children) = self.node(current).children.as_ref() else {
				return Err(match depth {
					0 => LookupMiss::Empty,
					_ => LookupMiss::NoChildren {
						segment: kta.tokens()[depth - 1].clone(),
					},
				});
			};
			current = *children.get(token).ok_or_else(|| LookupMiss::NotFound {
				segment: token.to_owned(),
			})?;
		}

		let instances = &self.node(current).instances;
		if instances.is_empty() {
			return Err(LookupMiss::NoInstances);
		}

		instances
			.iter()
			.find(|entry| entry.scopes.contains_all(requested))
			.map(|entry| &entry.instance)
			.ok_or_else(|| LookupMiss::Scope {
				available: instances.iter().map(|e| e.scopes.clone()).collect(),
			})
	}

	/// Returns every entry registered exactly at `kta`, in registration order.
	pub fn entries_at(&self, kta: &Kta) -> &[ScopedInstance] {
		let mut current = NodeId::ROOT;
		for token in kta.iter() {
			match self
				.node(current)
				.children
				.as_ref()
				.and_then(|children| children.get(token))
			{
				Some(&id) => current = id,
				None => return &[],
			}
		}
		&self.node(current).instances
	}

	/// Collects the coordinate of every instance, depth first.
	///
	/// A node's own instances come before its children; siblings keep the
	/// order in which their tokens were first registered.
	pub fn coordinates(&self) -> Vec<Coordinate> {
		let mut out = Vec::with_capacity(self.len());
		self.collect_coordinates(NodeId::ROOT, &mut out);
		out
	}

	fn collect_coordinates(&self, id: NodeId, out: &mut Vec<Coordinate>) {
		let node = self.node(id);
		out.extend(node.instances.iter().map(|e| e.instance.coordinate().clone()));
		if let Some(children) = &node.children {
			for &child in children.values() {
				self.collect_coordinates(child, out);
			}
		}
	}

	/// Returns the total number of registered instances.
	pub fn len(&self) -> usize {
		self.nodes.iter().map(|n| n.instances.len()).sum()
	}

	/// Returns true if nothing has been registered.
	pub fn is_empty(&self) -> bool {
		self.node(NodeId::ROOT).children.is_none()
	}
}
