// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registrable value types and their lock-free storage.
//!
//! A type can be stored in a parameter only if it implements [`ParamValue`]:
//! it must convert to and from [`Variant`], and it must name a [`ValueSlot`]
//! that publishes new values to the real-time context without locking.
//!
//! Scalars are stored in atomics ([`AtomicSlot`], [`AtomicFloatSlot`]).
//! Strings and sequences are stored behind an [`ArcSwap`] ([`SharedSlot`]),
//! so readers can borrow the current value without locking or allocating.
//!
//! Types that cannot round-trip through a `Variant` have no `ParamValue`
//! impl, so registering them fails to compile:
//!
//! ```compile_fail
//! use understory_param::{ParamRegistry, UiMetadata};
//!
//! let mut registry = ParamRegistry::new();
//! // `u64` does not fit `Variant::Int`.
//! registry.add("Samples", 0_u64, UiMetadata::default()).unwrap();
//! ```

use std::any::type_name;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool, AtomicI8, AtomicI16, AtomicI32, AtomicI64, AtomicU8, AtomicU16, AtomicU32,
    AtomicU64, Ordering,
};

use arc_swap::ArcSwap;

use crate::error::ConversionError;
use crate::variant::Variant;

/// A value type that can live in a parameter.
///
/// Implementations must satisfy the round-trip contract:
/// `T::from_variant(&v.to_variant()) == Ok(v)` for every value `v`, except
/// that floating-point types may yield the nearest representable value.
pub trait ParamValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Storage used to publish values of this type.
    type Slot: ValueSlot<Self>;

    /// Converts the value into its interchange representation.
    fn to_variant(&self) -> Variant;

    /// Converts an interchange value back into this type.
    fn from_variant(variant: &Variant) -> Result<Self, ConversionError>;
}

/// Single-writer storage readable from any thread without locks.
///
/// `store` is called only from the control context. `load` and `with` may be
/// called from any thread and never block.
pub trait ValueSlot<T>: Send + Sync + 'static {
    /// Creates a slot holding `value`.
    fn new(value: T) -> Self
    where
        Self: Sized;

    /// Returns a copy of the current value.
    fn load(&self) -> T;

    /// Publishes a new value.
    fn store(&self, value: T);

    /// Calls `f` with a borrow of the current value.
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R;
}

/// A slot backed by a single atomic.
///
/// Used for `bool` and the integer types up to 64 bits.
#[derive(Debug)]
pub struct AtomicSlot<A> {
    atomic: A,
}

/// A slot storing `f32` or `f64` as the bit pattern in an unsigned atomic.
#[derive(Debug)]
pub struct AtomicFloatSlot<A> {
    bits: A,
}

/// A slot that publishes whole values through an [`ArcSwap`].
///
/// Readers borrow the current value with [`ValueSlot::with`]; the writer swaps
/// in a freshly allocated value.
#[derive(Debug)]
pub struct SharedSlot<T> {
    current: ArcSwap<T>,
}

impl<T: Clone + Send + Sync + 'static> ValueSlot<T> for SharedSlot<T> {
    fn new(value: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(value),
        }
    }

    fn load(&self) -> T {
        T::clone(&self.current.load())
    }

    fn store(&self, value: T) {
        self.current.store(Arc::new(value));
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.current.load())
    }
}

macro_rules! atomic_integers {
    ($($ty:ty => $atomic:ty),* $(,)?) => {$(
        impl ValueSlot<$ty> for AtomicSlot<$atomic> {
            #[inline]
            fn new(value: $ty) -> Self {
                Self { atomic: <$atomic>::new(value) }
            }

            #[inline]
            fn load(&self) -> $ty {
                self.atomic.load(Ordering::Acquire)
            }

            #[inline]
            fn store(&self, value: $ty) {
                self.atomic.store(value, Ordering::Release);
            }

            #[inline]
            fn with<R>(&self, f: impl FnOnce(&$ty) -> R) -> R {
                f(&self.load())
            }
        }

        impl ParamValue for $ty {
            type Slot = AtomicSlot<$atomic>;

            fn to_variant(&self) -> Variant {
                Variant::Int(i64::from(*self))
            }

            fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
                integer_from_variant(variant)
            }
        }
    )*};
}

atomic_integers!(
    i8 => AtomicI8,
    i16 => AtomicI16,
    i32 => AtomicI32,
    i64 => AtomicI64,
    u8 => AtomicU8,
    u16 => AtomicU16,
    u32 => AtomicU32,
);

macro_rules! atomic_floats {
    ($($ty:ty => $atomic:ty),* $(,)?) => {$(
        impl ValueSlot<$ty> for AtomicFloatSlot<$atomic> {
            #[inline]
            fn new(value: $ty) -> Self {
                Self { bits: <$atomic>::new(value.to_bits()) }
            }

            #[inline]
            fn load(&self) -> $ty {
                <$ty>::from_bits(self.bits.load(Ordering::Acquire))
            }

            #[inline]
            fn store(&self, value: $ty) {
                self.bits.store(value.to_bits(), Ordering::Release);
            }

            #[inline]
            fn with<R>(&self, f: impl FnOnce(&$ty) -> R) -> R {
                f(&self.load())
            }
        }
    )*};
}

atomic_floats!(f32 => AtomicU32, f64 => AtomicU64);

impl ValueSlot<bool> for AtomicSlot<AtomicBool> {
    #[inline]
    fn new(value: bool) -> Self {
        Self {
            atomic: AtomicBool::new(value),
        }
    }

    #[inline]
    fn load(&self) -> bool {
        self.atomic.load(Ordering::Acquire)
    }

    #[inline]
    fn store(&self, value: bool) {
        self.atomic.store(value, Ordering::Release);
    }

    #[inline]
    fn with<R>(&self, f: impl FnOnce(&bool) -> R) -> R {
        f(&self.load())
    }
}

impl ParamValue for bool {
    type Slot = AtomicSlot<AtomicBool>;

    fn to_variant(&self) -> Variant {
        Variant::Bool(*self)
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Bool(b) => Ok(*b),
            Variant::Int(i) => Ok(*i != 0),
            Variant::Float(x) if x.is_finite() => Ok(*x != 0.0),
            Variant::Float(x) => Err(out_of_range::<Self>(x)),
            Variant::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") || s == "1" {
                    Ok(true)
                } else if s.eq_ignore_ascii_case("false") || s == "0" {
                    Ok(false)
                } else {
                    Err(unparsable::<Self>(s))
                }
            }
            Variant::Array(_) => Err(wrong_kind::<Self>(variant)),
        }
    }
}

impl ParamValue for f32 {
    type Slot = AtomicFloatSlot<AtomicU32>;

    fn to_variant(&self) -> Variant {
        Variant::Float(f64::from(*self))
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Float(x) => narrow_f32(*x),
            Variant::Int(i) => Ok(*i as Self),
            Variant::String(s) => narrow_f32(parse::<Self, f64>(s)?),
            _ => Err(wrong_kind::<Self>(variant)),
        }
    }
}

impl ParamValue for f64 {
    type Slot = AtomicFloatSlot<AtomicU64>;

    fn to_variant(&self) -> Variant {
        Variant::Float(*self)
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::Float(x) => Ok(*x),
            Variant::Int(i) => Ok(*i as Self),
            Variant::String(s) => parse::<Self, Self>(s),
            _ => Err(wrong_kind::<Self>(variant)),
        }
    }
}

impl ParamValue for String {
    type Slot = SharedSlot<Self>;

    fn to_variant(&self) -> Variant {
        Variant::String(self.clone())
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        match variant {
            Variant::String(s) => Ok(s.clone()),
            Variant::Array(_) => Err(wrong_kind::<Self>(variant)),
            scalar => Ok(scalar.to_string()),
        }
    }
}

impl<T: ParamValue> ParamValue for Vec<T> {
    type Slot = SharedSlot<Self>;

    fn to_variant(&self) -> Variant {
        self.iter().map(T::to_variant).collect()
    }

    fn from_variant(variant: &Variant) -> Result<Self, ConversionError> {
        let Variant::Array(items) = variant else {
            return Err(wrong_kind::<Self>(variant));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::from_variant(item).map_err(|source| ConversionError::Element {
                    index,
                    source: Box::new(source),
                })
            })
            .collect()
    }
}

/// Integers accept `Int`, integral finite `Float`s and numeric strings.
fn integer_from_variant<T>(variant: &Variant) -> Result<T, ConversionError>
where
    T: TryFrom<i64>,
{
    let wide = match variant {
        Variant::Int(i) => *i,
        Variant::Float(x) => integral(*x).ok_or_else(|| out_of_range::<T>(x))?,
        Variant::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => i,
            Err(_) => {
                let x = parse::<T, f64>(s)?;
                integral(x).ok_or_else(|| out_of_range::<T>(x))?
            }
        },
        _ => return Err(wrong_kind::<T>(variant)),
    };
    T::try_from(wide).map_err(|_| out_of_range::<T>(wide))
}

/// Returns `x` as an `i64` if it is finite, has no fractional part and fits.
fn integral(x: f64) -> Option<i64> {
    // 2^63 is exactly representable; every float below it fits an i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if !(x.is_finite() && x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x)) {
        return None;
    }
    #[expect(clippy::cast_possible_truncation, reason = "range checked above")]
    let whole = x as i64;
    Some(whole)
}

/// Narrows to the nearest `f32`; finite values beyond `f32::MAX` do not fit.
fn narrow_f32(x: f64) -> Result<f32, ConversionError> {
    if x.is_finite() && x.abs() > f64::from(f32::MAX) {
        return Err(out_of_range::<f32>(x));
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range checked above; narrowing yields the nearest f32"
    )]
    let narrowed = x as f32;
    Ok(narrowed)
}

/// Parses `text` as a `U`, reporting failures against the target type `T`.
fn parse<T, U: FromStr>(text: &str) -> Result<U, ConversionError> {
    text.trim().parse().map_err(|_| unparsable::<T>(text))
}

fn wrong_kind<T>(variant: &Variant) -> ConversionError {
    ConversionError::WrongKind {
        target: type_name::<T>(),
        found: variant.kind(),
    }
}

fn out_of_range<T>(value: impl fmt::Display) -> ConversionError {
    ConversionError::OutOfRange {
        target: type_name::<T>(),
        value: value.to_string(),
    }
}

fn unparsable<T>(text: &str) -> ConversionError {
    ConversionError::Unparsable {
        target: type_name::<T>(),
        text: text.into(),
    }
}
