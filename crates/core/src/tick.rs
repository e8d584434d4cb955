//! Tick source adapter.
//!
//! The clock reads the current tick either from a memory location or by calling a function.
//! The choice is made once, when the [`TickSource`] is handed over to the clock.

use core::{
    cell::Cell,
    fmt::Debug,
    marker::PhantomData,
    sync::atomic::{AtomicU16, AtomicU32, AtomicU8, Ordering},
};

use crate::engine::Tick;

/// A memory location that holds the current tick value, such as a counter updated by an
/// interrupt handler.
pub trait TickCounter<T: Tick> {
    /// Returns the value stored in the counter.
    fn current(&self) -> T;
}

macro_rules! impl_atomic_counter {
    ($atomic:ty, $ty:ty) => {
        impl TickCounter<$ty> for $atomic {
            #[inline]
            fn current(&self) -> $ty {
                self.load(Ordering::Relaxed)
            }
        }
    };
}

impl_atomic_counter!(AtomicU8, u8);
impl_atomic_counter!(AtomicU16, u16);
impl_atomic_counter!(AtomicU32, u32);
#[cfg(target_has_atomic = "64")]
impl_atomic_counter!(core::sync::atomic::AtomicU64, u64);

impl<T: Tick> TickCounter<T> for Cell<T> {
    #[inline]
    fn current(&self) -> T {
        self.get()
    }
}

/// Pointer to a hardware counter register, read with volatile semantics.
#[derive(Clone, Copy)]
pub struct RegisterPtr<'a, T> {
    ptr: *const T,
    _marker: PhantomData<&'a T>,
}

impl<'a, T: Tick> RegisterPtr<'a, T> {
    /// Returns `true` if the register address is null.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Returns the register address.
    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    #[inline]
    fn read(&self) -> T {
        if self.ptr.is_null() {
            return T::ZERO;
        }
        // SAFETY: the constructor contract guarantees that a non-null pointer is aligned and
        // valid for reads during `'a`.
        unsafe { self.ptr.read_volatile() }
    }
}

/// The source of the current tick value.
#[derive(Clone, Copy)]
pub enum TickSource<'a, T: Tick> {
    /// The tick is stored in a variable, typically an atomic updated by an interrupt handler.
    Variable(&'a dyn TickCounter<T>),
    /// The tick is read from a memory-mapped counter register.
    Register(RegisterPtr<'a, T>),
    /// The tick is returned by a function.
    Function(fn() -> T),
}

impl<'a, T: Tick> TickSource<'a, T> {
    /// Creates a tick source backed by a variable.
    pub fn variable<C: TickCounter<T>>(counter: &'a C) -> Self {
        Self::Variable(counter)
    }

    /// Creates a tick source backed by a function.
    pub fn function(tick_fn: fn() -> T) -> Self {
        Self::Function(tick_fn)
    }

    /// Creates a tick source backed by a memory-mapped counter register.
    ///
    /// A null address is accepted here, but it is rejected by the clock initialization.
    ///
    /// # Safety
    ///
    /// If `ptr` is not null, it must be properly aligned and valid for volatile reads for the
    /// whole lifetime `'a`.
    pub unsafe fn register(ptr: *const T) -> Self {
        Self::Register(RegisterPtr {
            ptr,
            _marker: PhantomData,
        })
    }

    /// Returns `true` if this source is a register with a null address.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Register(register) => register.is_null(),
            _ => false,
        }
    }

    /// Reads the current tick value.
    ///
    /// A null register reads as zero.
    #[inline]
    pub fn read(&self) -> T {
        match self {
            Self::Variable(counter) => counter.current(),
            Self::Register(register) => register.read(),
            Self::Function(tick_fn) => tick_fn(),
        }
    }
}

impl<'a, T: Tick> Debug for TickSource<'a, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Variable(_) => f.write_str("Variable"),
            Self::Register(register) => f
                .debug_tuple("Register")
                .field(&register.as_ptr())
                .finish(),
            Self::Function(tick_fn) => f
                .debug_tuple("Function")
                .field(&(*tick_fn as *const ()))
                .finish(),
        }
    }
}
