use std::any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::context::Instance;
use crate::errors::{ActivationError, BoxError, Result};
use crate::token::TypeToken;

/// Largest number of positional arguments a binding constructor may take.
pub const MAX_ARITY: usize = 10;

/// Positional constructor arguments, in dependency order.
pub struct Arguments {
    values: Vec<Instance>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument at `position`, downcast to `T`.
    pub fn get<T: 'static>(&self, position: usize) -> Result<Rc<T>> {
        let mismatch = || ActivationError::ArgumentType {
            position,
            expected: any::type_name::<T>(),
        };
        let value = self.values.get(position).ok_or_else(mismatch)?;
        Rc::clone(value).downcast::<T>().map_err(|_| mismatch())
    }

    pub fn instances(&self) -> &[Instance] {
        &self.values
    }
}

/// A constructor taking a fixed number of positional arguments.
///
/// Implemented for every `Fn(Rc<A0>, .., Rc<An>) -> Result<B, E>` up to
/// [`MAX_ARITY`] arguments. `Marker` only disambiguates the impls.
pub trait Constructor<Marker>: Send + Sync + 'static {
    type Output: 'static;
    const ARITY: usize;

    fn construct(&self, args: &Arguments) -> Result<Self::Output>;
}

macro_rules! impl_constructor {
    ($arity:expr; $($arg:ident => $pos:expr),*) => {
        impl<F, B, E, $($arg,)*> Constructor<fn($($arg,)*) -> std::result::Result<B, E>> for F
        where
            F: Fn($(Rc<$arg>,)*) -> std::result::Result<B, E> + Send + Sync + 'static,
            B: 'static,
            E: Into<BoxError>,
            $($arg: 'static,)*
        {
            type Output = B;
            const ARITY: usize = $arity;

            #[allow(unused_variables)]
            fn construct(&self, args: &Arguments) -> Result<B> {
                (self)($(args.get::<$arg>($pos)?,)*).map_err(ActivationError::construction)
            }
        }
    };
}

impl_constructor!(0;);
impl_constructor!(1; A0 => 0);
impl_constructor!(2; A0 => 0, A1 => 1);
impl_constructor!(3; A0 => 0, A1 => 1, A2 => 2);
impl_constructor!(4; A0 => 0, A1 => 1, A2 => 2, A3 => 3);
impl_constructor!(5; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4);
impl_constructor!(6; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5);
impl_constructor!(7; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6);
impl_constructor!(8; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7);
impl_constructor!(9; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7, A8 => 8);
impl_constructor!(10; A0 => 0, A1 => 1, A2 => 2, A3 => 3, A4 => 4, A5 => 5, A6 => 6, A7 => 7, A8 => 8, A9 => 9);

type Invoke = Arc<dyn Fn(&Arguments) -> Result<Instance> + Send + Sync>;

/// Describes a binding type: its identity and its constructor.
#[derive(Clone)]
pub struct BindingType {
    token: TypeToken,
    arity: Option<usize>,
    invoke: Invoke,
}

impl BindingType {
    pub fn new<M, C>(ctor: C) -> Self
    where
        C: Constructor<M>,
    {
        Self {
            token: TypeToken::of::<C::Output>(),
            arity: Some(C::ARITY),
            invoke: Arc::new(move |args: &Arguments| ctor.construct(args).map(|b| Rc::new(b) as Instance)),
        }
    }

    /// Binding whose constructor takes however many arguments it is given.
    pub fn variadic<B, E, F>(ctor: F) -> Self
    where
        B: 'static,
        E: Into<BoxError>,
        F: Fn(&Arguments) -> std::result::Result<B, E> + Send + Sync + 'static,
    {
        Self {
            token: TypeToken::of::<B>(),
            arity: None,
            invoke: Arc::new(move |args: &Arguments| {
                ctor(args)
                    .map(|b| Rc::new(b) as Instance)
                    .map_err(ActivationError::construction)
            }),
        }
    }

    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// Declared argument count; `None` for variadic constructors.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    pub(crate) fn construct(&self, args: &Arguments) -> Result<Instance> {
        (self.invoke)(args)
    }
}

impl fmt::Debug for BindingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingType")
            .field("token", &self.token)
            .field("arity", &self.arity)
            .finish()
    }
}
