//! Service instantiation inside one resolution scope.
//!
//! [`Instances`] is a forward-only lazy sequence: descriptor errors are
//! yielded first, then one item per distinct implementation identifier in
//! descriptor order. An identifier is only looked up and constructed when
//! the caller asks for the next item, so abandoning the iterator early skips
//! the remaining constructors. A failing identifier yields an error item and
//! iteration continues with the next one.

use std::any::Any;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::ops::Deref;
use std::panic;
use std::sync::Arc;

use hangar_sdk::{CapabilityContract, ServiceFactory};
use tracing::debug;

use crate::descriptor::Resolution;
use crate::error::{DiscoveryError, InstantiationFailure};
use crate::module::LoadedModule;

/// Tracing target for instantiation.
const INSTANTIATE_TARGET: &str = "hangar_plugins::instantiate";

/// A factory found in a scope, together with the module that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSymbol<'a> {
    factory: ServiceFactory,
    module: &'a Arc<LoadedModule>,
}

impl<'a> ResolvedSymbol<'a> {
    /// Pairs a factory with its owning module.
    #[must_use]
    pub const fn new(factory: ServiceFactory, module: &'a Arc<LoadedModule>) -> Self {
        Self { factory, module }
    }
}

/// A resolution scope mapping implementation identifiers to factories.
pub trait SymbolScope {
    /// Name used in diagnostics and recorded on instances.
    fn scope_name(&self) -> &str;

    /// Looks up `identifier`, following the scope's delegation chain.
    fn lookup(&self, identifier: &str) -> Option<ResolvedSymbol<'_>>;
}

/// A live service created inside one isolation scope.
///
/// The instance keeps the module that produced it loaded, and dereferences
/// to the contract's service type.
pub struct ServiceInstance<C: CapabilityContract> {
    service: Box<C::Service>,
    identifier: String,
    scope: String,
    _module: Arc<LoadedModule>,
}

impl<C: CapabilityContract> ServiceInstance<C> {
    /// Returns the implementation identifier the instance was built from.
    #[must_use]
    pub const fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Returns the name of the scope (archive) that created the instance.
    #[must_use]
    pub const fn scope(&self) -> &str {
        self.scope.as_str()
    }
}

impl<C: CapabilityContract> Deref for ServiceInstance<C> {
    type Target = C::Service;

    fn deref(&self) -> &C::Service {
        &self.service
    }
}

impl<C: CapabilityContract> std::fmt::Debug for ServiceInstance<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("contract", &C::ID)
            .field("identifier", &self.identifier)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Builds the implementation registered under `identifier` in `scope`.
///
/// # Errors
///
/// Returns [`DiscoveryError::Instantiation`] if the identifier is unknown,
/// the factory fails or panics, or the service does not satisfy `C`.
pub fn construct<C: CapabilityContract>(
    scope: &dyn SymbolScope,
    identifier: &str,
) -> Result<ServiceInstance<C>, DiscoveryError> {
    let fail = |failure: InstantiationFailure| {
        DiscoveryError::instantiation(scope.scope_name(), identifier, failure)
    };

    let symbol = scope
        .lookup(identifier)
        .ok_or_else(|| fail(InstantiationFailure::NotFound))?;

    let object = match panic::catch_unwind(symbol.factory) {
        Ok(Ok(object)) => object,
        Ok(Err(error)) => {
            return Err(fail(InstantiationFailure::Constructor {
                message: error.to_string(),
            }));
        }
        Err(payload) => {
            return Err(fail(InstantiationFailure::Panicked {
                message: panic_message(&*payload),
            }));
        }
    };

    let provided = object.contract_id();
    let service = object.downcast::<C>().map_err(|_| {
        fail(InstantiationFailure::NonConformant {
            expected: C::ID.to_owned(),
            provided: provided.to_owned(),
        })
    })?;

    debug!(
        target: INSTANTIATE_TARGET,
        scope = scope.scope_name(),
        identifier,
        contract = C::ID,
        "instantiated service"
    );
    Ok(ServiceInstance {
        service,
        identifier: identifier.to_owned(),
        scope: scope.scope_name().to_owned(),
        _module: Arc::clone(symbol.module),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("non-string panic payload")
    }
}

/// Lazy sequence of the services a scope declares for contract `C`.
pub struct Instances<'a, C: CapabilityContract> {
    scope: &'a dyn SymbolScope,
    errors: std::vec::IntoIter<DiscoveryError>,
    identifiers: std::vec::IntoIter<String>,
    seen: HashSet<String>,
    _contract: PhantomData<fn() -> C>,
}

impl<'a, C: CapabilityContract> Instances<'a, C> {
    /// Creates the sequence for the identifiers of `resolution`.
    #[must_use]
    pub fn new(scope: &'a dyn SymbolScope, resolution: Resolution) -> Self {
        let (identifiers, errors) = resolution.into_parts();
        Self {
            scope,
            errors: errors.into_iter(),
            identifiers: identifiers.into_iter(),
            seen: HashSet::new(),
            _contract: PhantomData,
        }
    }
}

impl<C: CapabilityContract> Iterator for Instances<'_, C> {
    type Item = Result<ServiceInstance<C>, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.errors.next() {
            return Some(Err(error));
        }
        for identifier in self.identifiers.by_ref() {
            if !self.seen.insert(identifier.clone()) {
                debug!(
                    target: INSTANTIATE_TARGET,
                    scope = self.scope.scope_name(),
                    identifier = identifier.as_str(),
                    "skipping repeated identifier"
                );
                continue;
            }
            return Some(construct::<C>(self.scope, &identifier));
        }
        None
    }
}

impl<C: CapabilityContract> std::fmt::Debug for Instances<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instances")
            .field("scope", &self.scope.scope_name())
            .field("pending", &self.identifiers.len())
            .finish_non_exhaustive()
    }
}
