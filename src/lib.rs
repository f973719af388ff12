//! Per-scenario object activation.
//!
//! A [`ScopedActivator`] lives for one test scenario. Context objects are
//! built on first request and shared afterwards; binding objects are built
//! from their context dependencies, passed as positional constructor
//! arguments.

pub mod errors;
pub mod token;
pub mod context;
pub mod binding;
pub mod config;
pub mod scenario;
pub mod properties;
pub mod activator;
pub mod registry;

pub use activator::ScopedActivator;
pub use binding::{Arguments, BindingType, Constructor, MAX_ARITY};
pub use config::ActivatorOptions;
pub use context::{ContextType, Instance};
pub use errors::{ActivationError, BoxError, Result};
pub use properties::Properties;
pub use registry::{Registration, Registry};
pub use scenario::{ScenarioContext, ScenarioInfo};
pub use token::TypeToken;
