//! Namespace-scoped registry of element kinds.
//!
//! A dialect is a [`Namespace`]: a URI plus the element kinds it
//! contributes, each as an [`ElementConstructor`]. The
//! [`NamespaceRegistry`] keeps at most one active namespace per URI. The
//! orchestrator owns one registry for its lifetime; there is no global
//! instance.
//!
//! # Example
//!
//! ```
//! # use std::rc::Rc;
//! # use trellis::registry::{Namespace, NamespaceRegistry};
//! # use trellis::dialect::graphml::GraphmlNode;
//! let first = Rc::new(Namespace::new("urn:example").with_kind::<GraphmlNode>("node"));
//! let second = Rc::new(Namespace::new("urn:example"));
//!
//! let mut registry = NamespaceRegistry::new();
//! assert!(registry.activate(&first, false));
//! assert!(!registry.activate(&second, false));
//! assert!(first.is_active());
//!
//! assert!(registry.activate(&second, true));
//! assert!(!first.is_active());
//! assert!(second.is_active());
//! ```

use std::{cell::Cell, rc::Rc};

use indexmap::IndexMap;
use log::{debug, info, warn};

use trellis_core::identifier::Id;
use trellis_markup::error::{Diagnostic, ErrorCode, Parsed};

use crate::{
    dialect,
    element::{Element, ElementKind, Representation},
};

/// Creates an element of one kind, given its identifier and kind name.
pub type ElementConstructor = fn(Id, &'static str) -> Box<dyn Element>;

/// A dialect: a namespace URI and the element kinds registered under it.
#[derive(Debug)]
pub struct Namespace {
    identifier: Id,
    kinds: IndexMap<&'static str, ElementConstructor>,
    active: Cell<bool>,
}

impl Namespace {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: Id::new(identifier),
            kinds: IndexMap::new(),
            active: Cell::new(false),
        }
    }

    /// Registers `K` under `name` (builder style).
    pub fn with_kind<K: ElementKind>(mut self, name: &'static str) -> Self {
        self.register(name, Representation::<K>::construct);
        self
    }

    /// Registers a constructor, replacing any previous one of the same name.
    pub fn register(&mut self, name: &'static str, constructor: ElementConstructor) {
        self.kinds.insert(name, constructor);
    }

    pub fn identifier(&self) -> Id {
        self.identifier
    }

    /// Whether this object is the one currently installed in a registry.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn has_kind(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Kind names in registration order.
    pub fn kind_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.keys().copied()
    }

    /// Instantiates the kind `name` for element `id`.
    pub fn construct(&self, name: &str, id: Id) -> Option<Box<dyn Element>> {
        let (name, constructor) = self.kinds.get_key_value(name)?;
        Some(constructor(id, name))
    }
}

impl PartialEq for Namespace {
    /// Namespaces are equal when their identifiers are.
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Namespace {}

/// The table of active namespaces.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    active: IndexMap<Id, Rc<Namespace>>,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the GraphML and yWorks dialects active.
    pub fn with_builtin_dialects() -> Self {
        let mut registry = Self::new();
        registry.activate(&Rc::new(dialect::graphml::namespace()), false);
        registry.activate(&Rc::new(dialect::yworks::namespace()), false);
        registry
    }

    /// The active namespace for `identifier`, if any.
    pub fn lookup(&self, identifier: &str) -> Option<Rc<Namespace>> {
        self.lookup_id(Id::new(identifier))
    }

    pub fn lookup_id(&self, identifier: Id) -> Option<Rc<Namespace>> {
        self.active.get(&identifier).cloned()
    }

    /// Installs `namespace` under its identifier.
    ///
    /// Returns true if it is active afterwards. Activating the object that
    /// is already installed is a no-op. If another object holds the
    /// identifier, activation fails unless `overwrite` is set, in which case
    /// the incumbent is deactivated first.
    pub fn activate(&mut self, namespace: &Rc<Namespace>, overwrite: bool) -> bool {
        let identifier = namespace.identifier();
        if let Some(incumbent) = self.active.get(&identifier) {
            if Rc::ptr_eq(incumbent, namespace) {
                return true;
            }
            if !overwrite {
                warn!(namespace = identifier.to_string(); "Namespace already active, not replacing");
                return false;
            }
            info!(namespace = identifier.to_string(); "Replacing active namespace");
            incumbent.active.set(false);
        }

        namespace.active.set(true);
        self.active.insert(identifier, Rc::clone(namespace));
        debug!(
            namespace = identifier.to_string(),
            kinds = namespace.kinds.len();
            "Namespace activated"
        );
        true
    }

    /// Like [`activate`](Self::activate), reporting a refusal as a diagnostic.
    pub fn install(&mut self, namespace: &Rc<Namespace>, overwrite: bool) -> Parsed<bool> {
        if self.activate(namespace, overwrite) {
            return Parsed::clean(true);
        }
        Parsed::clean(false).with_diagnostic(
            Diagnostic::error(format!(
                "namespace `{}` is already provided by another dialect",
                namespace.identifier()
            ))
            .with_code(ErrorCode::E400)
            .with_help("install it with overwrite to replace the active dialect"),
        )
    }

    /// Removes `namespace` if it is the one registered under its identifier.
    ///
    /// Calling it for a namespace that is not installed does nothing, even
    /// when another namespace holds the same identifier.
    pub fn deactivate(&mut self, namespace: &Namespace) {
        let identifier = namespace.identifier();
        let installed = self
            .active
            .get(&identifier)
            .is_some_and(|incumbent| std::ptr::eq(Rc::as_ptr(incumbent), namespace));
        if !installed {
            debug!(namespace = identifier.to_string(); "Namespace not installed, nothing to deactivate");
            return;
        }
        if let Some(removed) = self.active.shift_remove(&identifier) {
            removed.active.set(false);
            debug!(namespace = identifier.to_string(); "Namespace deactivated");
        }
    }

    /// Active namespaces in activation order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Rc<Namespace>> {
        self.active.values()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
