//! Capability contracts and the type-erased objects plugins hand back.
//!
//! A [`CapabilityContract`] names a capability and fixes the trait object an
//! implementation must produce. Factories return a [`ServiceObject`], which
//! records the contract it was built for and is only unwrapped by a typed
//! downcast, so an implementation built for one contract can never be handed
//! out as another.

use std::any::Any;
use std::error::Error;

/// Identifies a polymorphic capability and the service shape it requires.
///
/// # Example
///
/// ```
/// use hangar_sdk::CapabilityContract;
///
/// trait Clock {
///     fn now(&self) -> u64;
/// }
///
/// struct ClockContract;
///
/// impl CapabilityContract for ClockContract {
///     const ID: &'static str = "Clock";
///     type Service = dyn Clock;
/// }
///
/// assert_eq!(ClockContract::ID, "Clock");
/// ```
pub trait CapabilityContract: 'static {
    /// Contract identifier used as the suffix of descriptor keys.
    const ID: &'static str;

    /// The service type (usually a trait object) implementations provide.
    type Service: ?Sized + 'static;
}

/// Error returned by a factory that could not build its service.
pub type ConstructError = Box<dyn Error + Send + Sync>;

/// No-argument constructor registered under an implementation identifier.
pub type ServiceFactory = fn() -> Result<ServiceObject, ConstructError>;

/// A constructed service whose concrete contract is checked on unwrap.
#[derive(Debug)]
pub struct ServiceObject {
    contract: &'static str,
    inner: Box<dyn Any>,
}

impl ServiceObject {
    /// Wraps a service built for contract `C`.
    ///
    /// # Example
    ///
    /// ```
    /// use hangar_sdk::{DemoContract, DemoService, ServiceObject};
    ///
    /// struct Quiet;
    ///
    /// impl DemoService for Quiet {
    ///     fn demo_test(&self, _message: &str) -> String {
    ///         String::new()
    ///     }
    /// }
    ///
    /// let object = ServiceObject::new::<DemoContract>(Box::new(Quiet));
    /// assert_eq!(object.contract_id(), "DemoService");
    /// ```
    #[must_use]
    pub fn new<C: CapabilityContract>(service: Box<C::Service>) -> Self {
        Self {
            contract: C::ID,
            inner: Box::new(service),
        }
    }

    /// Returns the identifier of the contract the object was built for.
    #[must_use]
    pub const fn contract_id(&self) -> &'static str {
        self.contract
    }

    /// Unwraps the service if it was built for contract `C`.
    ///
    /// # Errors
    ///
    /// Returns the untouched object when it does not hold a `C::Service`.
    pub fn downcast<C: CapabilityContract>(self) -> Result<Box<C::Service>, Self> {
        let Self { contract, inner } = self;
        match inner.downcast::<Box<C::Service>>() {
            Ok(service) => Ok(*service),
            Err(original) => Err(Self {
                contract,
                inner: original,
            }),
        }
    }
}
