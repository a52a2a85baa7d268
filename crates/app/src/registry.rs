//! Trigger type registry — the ordered, append-only catalogue.
//!
//! Hosts persist catalogue positions inside their saved rules, so the
//! registration order *is* the catalogue order: entries are appended, never
//! reordered, compacted or removed.
//!
//! Registration takes `&mut self`. Once startup is done the host wraps the
//! registry in an `Arc` and it becomes read-only, so concurrent dispatch
//! reads it without locking.

use std::collections::HashMap;

use triggerhub_domain::descriptor::TriggerTypeDescriptor;
use triggerhub_domain::error::{HandlerError, MissingPart, RegistrationError};
use triggerhub_domain::id::TypePosition;

use crate::ports::{BoxedHandler, ConstructArgs, TriggerHandler, TriggerType};

type DefaultFactory = Box<dyn Fn() -> BoxedHandler + Send + Sync>;
type DescriptorFactory =
    Box<dyn Fn(ConstructArgs) -> Result<BoxedHandler, HandlerError> + Send + Sync>;

/// A trigger type offered for registration.
///
/// Both construction paths must be supplied; [`TriggerTypeRegistry::register`]
/// rejects the registration otherwise.
pub struct HandlerRegistration {
    name: String,
    default: Option<DefaultFactory>,
    from_descriptor: Option<DescriptorFactory>,
}

impl HandlerRegistration {
    /// Start a registration under a unique, fully-qualified type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            from_descriptor: None,
        }
    }

    /// Build a complete registration from a compile-time trigger type.
    #[must_use]
    pub fn of<T: TriggerType>() -> Self {
        Self::new(T::TYPE_NAME)
            .with_default(T::new_default)
            .with_descriptor(T::from_descriptor)
    }

    /// Supply the zero-argument construction path.
    #[must_use]
    pub fn with_default<F, H>(mut self, factory: F) -> Self
    where
        F: Fn() -> H + Send + Sync + 'static,
        H: TriggerHandler + 'static,
    {
        self.default = Some(Box::new(move || Box::new(factory()) as BoxedHandler));
        self
    }

    /// Supply the from-descriptor construction path.
    #[must_use]
    pub fn with_descriptor<F, H>(mut self, factory: F) -> Self
    where
        F: Fn(ConstructArgs) -> Result<H, HandlerError> + Send + Sync + 'static,
        H: TriggerHandler + 'static,
    {
        self.from_descriptor = Some(Box::new(move |args| {
            factory(args).map(|handler| Box::new(handler) as BoxedHandler)
        }));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for HandlerRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistration")
            .field("name", &self.name)
            .field("has_default", &self.default.is_some())
            .field("has_descriptor", &self.from_descriptor.is_some())
            .finish()
    }
}

/// An accepted registration.
pub struct RegisteredType {
    descriptor: TriggerTypeDescriptor,
    default: DefaultFactory,
    from_descriptor: DescriptorFactory,
}

impl RegisteredType {
    #[must_use]
    pub fn descriptor(&self) -> &TriggerTypeDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Run the zero-argument factory.
    #[must_use]
    pub fn construct_default(&self) -> BoxedHandler {
        (self.default)()
    }

    /// Run the from-descriptor factory.
    ///
    /// # Errors
    ///
    /// Propagates whatever the handler's constructor reports.
    pub fn construct(&self, args: ConstructArgs) -> Result<BoxedHandler, HandlerError> {
        (self.from_descriptor)(args)
    }
}

/// Ordered catalogue of trigger types, addressed by 1-based [`TypePosition`].
#[derive(Default)]
pub struct TriggerTypeRegistry {
    entries: Vec<RegisteredType>,
    positions: HashMap<String, TypePosition>,
}

impl std::fmt::Debug for TriggerTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerTypeRegistry")
            .field("count", &self.entries.len())
            .field(
                "names",
                &self.entries.iter().map(RegisteredType::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl TriggerTypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trigger type at the next position.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::InvalidHandlerShape`] when the name or either
    ///   construction path is missing
    /// - [`RegistrationError::DuplicateHandlerName`] when the name is taken
    ///
    /// The catalogue is unchanged on error.
    pub fn register(
        &mut self,
        registration: HandlerRegistration,
    ) -> Result<TriggerTypeDescriptor, RegistrationError> {
        let HandlerRegistration {
            name,
            default,
            from_descriptor,
        } = registration;

        if name.trim().is_empty() {
            return Err(RegistrationError::InvalidHandlerShape {
                name,
                missing: MissingPart::Name,
            });
        }
        let Some(default) = default else {
            return Err(RegistrationError::InvalidHandlerShape {
                name,
                missing: MissingPart::DefaultConstructor,
            });
        };
        let Some(from_descriptor) = from_descriptor else {
            return Err(RegistrationError::InvalidHandlerShape {
                name,
                missing: MissingPart::DescriptorConstructor,
            });
        };
        if let Some(&position) = self.positions.get(&name) {
            return Err(RegistrationError::DuplicateHandlerName { name, position });
        }
        let position = TypePosition::from_index(self.entries.len())
            .ok_or(RegistrationError::CatalogueFull)?;

        let descriptor = TriggerTypeDescriptor { position, name };
        self.positions.insert(descriptor.name.clone(), position);
        self.entries.push(RegisteredType {
            descriptor: descriptor.clone(),
            default,
            from_descriptor,
        });

        tracing::debug!(%position, name = %descriptor.name, "trigger type registered");
        Ok(descriptor)
    }

    /// Register a compile-time trigger type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateHandlerName`] when `T::TYPE_NAME`
    /// is already registered.
    pub fn register_type<T: TriggerType>(
        &mut self,
    ) -> Result<TriggerTypeDescriptor, RegistrationError> {
        self.register(HandlerRegistration::of::<T>())
    }

    /// Number of registered trigger types.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalogue entries in position order.
    pub fn descriptors(&self) -> impl Iterator<Item = &TriggerTypeDescriptor> {
        self.entries.iter().map(RegisteredType::descriptor)
    }

    /// Position of a type by its fully-qualified name.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<TypePosition> {
        self.positions.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Registered type at a 1-based position.
    #[must_use]
    pub fn get(&self, position: TypePosition) -> Option<&RegisteredType> {
        self.entries.get(position.index()?)
    }
}
