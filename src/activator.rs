use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::binding::{Arguments, BindingType};
use crate::config::ActivatorOptions;
use crate::context::{ContextType, Instance};
use crate::errors::{ActivationError, Result};
use crate::properties::Properties;
use crate::scenario::{ScenarioContext, ScenarioInfo};
use crate::token::TypeToken;

/// Lazily constructs context and binding objects, at most once each, for
/// the lifetime of one scenario.
pub struct ScopedActivator {
    info: ScenarioInfo,
    options: ActivatorOptions,
    active: HashMap<TypeToken, Instance>,
    properties: Properties,
}

impl ScopedActivator {
    pub fn new(title: impl Into<String>, tags: Vec<String>) -> Self {
        Self::with_options(ScenarioInfo::new(title, tags), ActivatorOptions::default())
    }

    pub fn with_options(info: ScenarioInfo, options: ActivatorOptions) -> Self {
        debug!(scenario = %info.title(), tags = ?info.tags(), "scenario scope opened");
        Self {
            info,
            options,
            active: HashMap::new(),
            properties: Properties::new(),
        }
    }

    pub fn options(&self) -> &ActivatorOptions {
        &self.options
    }

    pub fn is_active(&self, token: TypeToken) -> bool {
        self.active.contains_key(&token)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Return the cached instance of `context`, constructing it on first use.
    pub fn get_or_activate(&mut self, context: &ContextType) -> Result<Instance> {
        let token = context.token();
        if let Some(instance) = self.active.get(&token) {
            trace!(context = %token, "context reused");
            return Ok(Rc::clone(instance));
        }

        let instance = context.create()?;
        debug!(context = %token, "context activated");
        self.active.insert(token, Rc::clone(&instance));
        Ok(instance)
    }

    /// Return the cached instance of `binding`, or resolve `dependencies` in
    /// order and construct it with them as positional arguments.
    ///
    /// A cached binding is returned without looking at `dependencies`.
    pub fn get_or_activate_binding(&mut self, binding: &BindingType, dependencies: &[ContextType]) -> Result<Instance> {
        let token = binding.token();
        if let Some(instance) = self.active.get(&token) {
            trace!(binding = %token, "binding reused");
            return Ok(Rc::clone(instance));
        }

        let max = self.options.max_arity();
        if dependencies.len() > max {
            return Err(ActivationError::UnsupportedArity {
                arity: dependencies.len(),
                max,
            });
        }
        if let Some(expected) = binding.arity() {
            if expected != dependencies.len() {
                return Err(ActivationError::ArityMismatch {
                    binding: token.name(),
                    expected,
                    actual: dependencies.len(),
                });
            }
        }

        let resolved = dependencies
            .iter()
            .map(|context| self.get_or_activate(context))
            .collect::<Result<Vec<_>>>()?;

        let instance = binding.construct(&Arguments::new(resolved))?;
        debug!(
            binding = %token,
            dependencies = %dependencies.iter().map(|c| c.token()).join(", "),
            "binding activated"
        );
        self.active.insert(token, Rc::clone(&instance));
        Ok(instance)
    }

    /// Typed [`get_or_activate`](Self::get_or_activate).
    pub fn get_or_activate_as<T: 'static>(&mut self, context: &ContextType) -> Result<Rc<T>> {
        let token = context.token();
        downcast(self.get_or_activate(context)?, token)
    }

    /// Typed [`get_or_activate_binding`](Self::get_or_activate_binding).
    pub fn get_or_activate_binding_as<T: 'static>(
        &mut self,
        binding: &BindingType,
        dependencies: &[ContextType],
    ) -> Result<Rc<T>> {
        let token = binding.token();
        downcast(self.get_or_activate_binding(binding, dependencies)?, token)
    }

    /// Shorthand for a `Default`-constructed context.
    pub fn context<T: Default + 'static>(&mut self) -> Result<Rc<T>> {
        self.get_or_activate_as(&ContextType::of::<T>())
    }

    /// End the scenario. Cached instances are dropped without any teardown
    /// hook.
    pub fn dispose(self) {
        debug!(
            scenario = %self.info.title(),
            abandoned = self.active.len(),
            "scenario scope disposed"
        );
    }
}

fn downcast<T: 'static>(instance: Rc<dyn Any>, token: TypeToken) -> Result<Rc<T>> {
    instance.downcast::<T>().map_err(|_| ActivationError::TypeMismatch {
        expected: std::any::type_name::<T>(),
        found: token.name(),
    })
}

impl ScenarioContext for ScopedActivator {
    fn scenario_info(&self) -> &ScenarioInfo {
        &self.info
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BoxError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct SessionContext {
        user: RefCell<Option<String>>,
    }

    struct LoginSteps {
        session: Rc<SessionContext>,
    }

    fn login_steps() -> BindingType {
        BindingType::new(|session: Rc<SessionContext>| Ok::<_, BoxError>(LoginSteps { session }))
    }

    #[test]
    fn binding_reuses_context_activated_earlier() {
        let mut scope = ScopedActivator::new("Login succeeds", vec!["@smoke".into()]);
        let session = scope.context::<SessionContext>().unwrap();
        session.user.replace(Some("ada".into()));

        let steps = scope
            .get_or_activate_binding_as::<LoginSteps>(&login_steps(), &[ContextType::of::<SessionContext>()])
            .unwrap();
        assert!(Rc::ptr_eq(&steps.session, &session));
        assert_eq!(steps.session.user.borrow().as_deref(), Some("ada"));
        assert_eq!(scope.active_count(), 2);
        assert_eq!(scope.scenario_info().tags(), ["@smoke".to_string()]);
    }

    #[test]
    fn typed_access_with_wrong_type_fails() {
        let mut scope = ScopedActivator::new("Typed", vec![]);
        let err = scope
            .get_or_activate_as::<LoginSteps>(&ContextType::of::<SessionContext>())
            .err()
            .unwrap();
        assert!(matches!(err, ActivationError::TypeMismatch { .. }));
        assert!(scope.is_active(TypeToken::of::<SessionContext>()));
    }

    #[test]
    fn arity_mismatch_constructs_nothing() {
        let mut scope = ScopedActivator::new("Mismatch", vec![]);
        let err = scope.get_or_activate_binding(&login_steps(), &[]).err().unwrap();
        assert!(matches!(
            err,
            ActivationError::ArityMismatch { expected: 1, actual: 0, .. }
        ));
        assert_eq!(scope.active_count(), 0);
    }

    #[test]
    fn lowered_limit_applies() {
        let options = ActivatorOptions::new().with_max_arity(0).unwrap();
        let mut scope = ScopedActivator::with_options(ScenarioInfo::new("Limited", vec![]), options);
        let err = scope
            .get_or_activate_binding(&login_steps(), &[ContextType::of::<SessionContext>()])
            .err()
            .unwrap();
        assert!(matches!(err, ActivationError::UnsupportedArity { arity: 1, max: 0 }));
    }

    thread_local! {
        static DROPPED: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
    }

    #[derive(Default)]
    struct Fixture;

    impl Drop for Fixture {
        fn drop(&mut self) {
            DROPPED.with(|d| d.set(d.get() + 1));
        }
    }

    fn dropped() -> usize {
        DROPPED.with(|d| d.get())
    }

    #[test]
    fn dispose_releases_instances_held_only_by_the_scope() {
        let before = dropped();
        let mut scope = ScopedActivator::new("Teardown", vec![]);
        scope.context::<Fixture>().unwrap();
        assert_eq!(dropped(), before);

        scope.dispose();
        assert_eq!(dropped(), before + 1);
    }

    #[test]
    fn dispose_leaves_caller_held_instances_alive() {
        let before = dropped();
        let mut scope = ScopedActivator::new("Teardown", vec![]);
        let fixture = scope.context::<Fixture>().unwrap();
        assert_eq!(Rc::strong_count(&fixture), 2);

        scope.dispose();
        assert_eq!(dropped(), before);
        assert_eq!(Rc::strong_count(&fixture), 1);

        drop(fixture);
        assert_eq!(dropped(), before + 1);
    }

    #[test]
    fn properties_live_beside_the_cache() {
        let mut scope = ScopedActivator::new("Props", vec![]);
        scope.properties_mut().insert("attempts", 2).unwrap();
        assert_eq!(scope.properties().get::<u32>("attempts").unwrap(), Some(2));
        assert_eq!(scope.active_count(), 0);
        scope.dispose();
    }
}
