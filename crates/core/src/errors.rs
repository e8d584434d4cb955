use displaydoc::Display;
use serde::{Deserialize, Serialize};

/// A specialized result type for the clock initialization.
pub type Result<T> = core::result::Result<T, InitError>;

/// Code returned by a successful initialization.
pub const INIT_OK: u8 = 0;

/// Errors that can occur when initializing a [`Clock`](crate::Clock).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum InitError {
    /// The tick top value must be greater than zero.
    TickTopZero = 1,
    /// The tick to nanoseconds coefficient must be greater than zero.
    TickToNsZero = 2,
    /// The tick source points to a null address.
    TickPtrError = 3,
}

impl InitError {
    /// Decodes an initialization status code.
    ///
    /// Returns `None` for the [`INIT_OK`] code and for codes the initialization never produces.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::TickTopZero),
            2 => Some(Self::TickToNsZero),
            3 => Some(Self::TickPtrError),

            _ => None,
        }
    }

    /// Returns the status code of the error.
    pub fn into_code(self) -> u8 {
        match self {
            InitError::TickTopZero => 1,
            InitError::TickToNsZero => 2,
            InitError::TickPtrError => 3,
        }
    }

    /// Encodes the initialization result into a status code.
    pub fn result_code(result: Result<()>) -> u8 {
        match result {
            Ok(()) => INIT_OK,
            Err(err) => err.into_code(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InitError {}
