use scenario_scope as scope;
use scope::{ActivationError, BindingType, BoxError, ContextType, ScopedActivator, TypeToken};
use std::error::Error;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct PortInUse(u16);

impl fmt::Display for PortInUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port {} already in use", self.0)
    }
}

impl Error for PortInUse {}

#[derive(Default)]
struct Clock;
struct Server;
struct ApiSteps;

fn server() -> ContextType {
    ContextType::with_factory(|| Err::<Server, _>(PortInUse(8080)))
}

fn api_steps() -> BindingType {
    BindingType::new(|_: Rc<Clock>, _: Rc<Server>| Ok::<_, BoxError>(ApiSteps))
}

#[test]
fn factory_error_surfaces_unchanged() {
    let mut scope = ScopedActivator::new("Server", vec![]);
    let err = scope.get_or_activate(&server()).err().unwrap();

    assert_eq!(err.to_string(), "port 8080 already in use");
    match err {
        ActivationError::Construction(inner) => {
            let original = inner.downcast_ref::<PortInUse>().unwrap();
            assert_eq!(original.0, 8080);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(scope.active_count(), 0);
}

#[test]
fn failed_dependency_leaves_no_binding() {
    let mut scope = ScopedActivator::new("Api", vec![]);
    let deps = [ContextType::of::<Clock>(), server()];

    assert!(scope.get_or_activate_binding(&api_steps(), &deps).is_err());
    assert!(!scope.is_active(TypeToken::of::<ApiSteps>()));
    // Dependencies resolved before the failure stay cached.
    assert!(scope.is_active(TypeToken::of::<Clock>()));

    // A second request retries the activation rather than returning a stale value.
    assert!(scope.get_or_activate_binding(&api_steps(), &deps).is_err());
    assert_eq!(scope.active_count(), 1);
}

#[test]
fn constructor_error_leaves_no_binding() {
    let failing = BindingType::new(|_: Rc<Clock>| Err::<ApiSteps, _>("fixture offline"));
    let mut scope = ScopedActivator::new("Api", vec![]);

    let err = scope
        .get_or_activate_binding(&failing, &[ContextType::of::<Clock>()])
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "fixture offline");
    assert!(!scope.is_active(TypeToken::of::<ApiSteps>()));
}

#[test]
fn wrong_dependency_type_is_reported_by_position() {
    let mut scope = ScopedActivator::new("Api", vec![]);
    let swapped = [
        ContextType::with_factory(|| Ok::<_, BoxError>(Server)),
        ContextType::of::<Clock>(),
    ];
    let err = scope.get_or_activate_binding(&api_steps(), &swapped).err().unwrap();
    assert!(matches!(err, ActivationError::ArgumentType { position: 0, .. }));
    assert!(!scope.is_active(TypeToken::of::<ApiSteps>()));
}
