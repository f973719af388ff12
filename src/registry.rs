use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::activator::ScopedActivator;
use crate::binding::BindingType;
use crate::context::{ContextType, Instance};
use crate::errors::{ActivationError, Result};
use crate::token::TypeToken;

/// A binding together with the context types its constructor takes.
#[derive(Clone, Debug)]
pub struct Registration {
    pub binding: BindingType,
    pub contexts: Vec<ContextType>,
}

/// Thread-safe binding registry, shared by every scenario.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<TypeToken, Arc<Registration>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `binding` with its ordered `contexts`, replacing any previous
    /// registration of the same type.
    pub fn register(&mut self, binding: BindingType, contexts: Vec<ContextType>) {
        let token = binding.token();
        debug!(
            binding = %token,
            contexts = %contexts.iter().map(|c| c.token()).join(", "),
            "binding registered"
        );
        let map = Arc::make_mut(&mut self.inner);
        map.insert(token, Arc::new(Registration { binding, contexts }));
    }

    pub fn get(&self, token: TypeToken) -> Option<Arc<Registration>> {
        self.inner.get(&token).cloned()
    }

    /// Look a binding up by its full type name, or by its short name when
    /// that short name belongs to exactly one registered type.
    pub fn find(&self, name: &str) -> Result<Arc<Registration>> {
        if let Some(reg) = self.inner.iter().find(|(token, _)| token.name() == name) {
            return Ok(Arc::clone(reg.1));
        }

        let matches = self
            .inner
            .iter()
            .filter(|(token, _)| token.short_name() == name)
            .collect::<Vec<_>>();
        match matches.as_slice() {
            [] => Err(ActivationError::UnregisteredBinding(name.to_string())),
            [(_, reg)] => Ok(Arc::clone(*reg)),
            _ => Err(ActivationError::AmbiguousBinding {
                name: name.to_string(),
                candidates: matches.iter().map(|(token, _)| token.name()).sorted().collect(),
            }),
        }
    }

    /// Sorted binding names; a short name shared by several types is listed
    /// by each type's full name instead.
    pub fn names(&self) -> Vec<String> {
        let counts = self.inner.keys().map(|t| t.short_name()).counts();
        self.inner
            .keys()
            .map(|t| {
                let short = t.short_name();
                if counts[&short] > 1 {
                    t.name().to_string()
                } else {
                    short
                }
            })
            .sorted()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Activate a registered binding in `scope` using its recorded contexts.
    pub fn activate(&self, scope: &mut ScopedActivator, token: TypeToken) -> Result<Instance> {
        let reg = self
            .get(token)
            .ok_or_else(|| ActivationError::UnregisteredBinding(token.name().to_string()))?;
        scope.get_or_activate_binding(&reg.binding, &reg.contexts)
    }
}
