use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::errors::{ActivationError, BoxError, Result};
use crate::token::TypeToken;

/// A scenario-local activated object.
pub type Instance = Rc<dyn Any>;

type Factory = Arc<dyn Fn() -> Result<Instance> + Send + Sync>;

/// Describes a plain context type: its identity and how to build it with
/// no arguments.
#[derive(Clone)]
pub struct ContextType {
    token: TypeToken,
    factory: Factory,
}

impl ContextType {
    /// Context built through `Default`.
    pub fn of<T: Default + 'static>() -> Self {
        Self {
            token: TypeToken::of::<T>(),
            factory: Arc::new(|| Ok(Rc::new(T::default()) as Instance)),
        }
    }

    /// Context built by a fallible zero-argument factory.
    pub fn with_factory<T, E, F>(factory: F) -> Self
    where
        T: 'static,
        E: Into<BoxError>,
        F: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
    {
        Self {
            token: TypeToken::of::<T>(),
            factory: Arc::new(move || {
                factory()
                    .map(|value| Rc::new(value) as Instance)
                    .map_err(ActivationError::construction)
            }),
        }
    }

    pub fn token(&self) -> TypeToken {
        self.token
    }

    pub(crate) fn create(&self) -> Result<Instance> {
        (self.factory)()
    }
}

impl fmt::Debug for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextType").field("token", &self.token).finish()
    }
}
