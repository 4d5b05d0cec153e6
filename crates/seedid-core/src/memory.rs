//! Secret handling
//!
//! Private material leaves this crate in two forms:
//!
//! 1. **[`SecretBytes`]**: a fixed-size heap buffer that overwrites itself
//!    with zeros on drop and never prints its contents.
//!
//! 2. **Raw slices** handed out by `SigningKey::private_key()`. Callers that
//!    copy these into their own buffers wipe them with [`zeroize`] as soon as
//!    signing is complete.
//!
//! Both are best-effort. The compiler, allocator and OS may still have made
//! copies (moves, reallocations, swapped pages) that nothing here can reach.
//! Processes that hold secrets for long can additionally call
//! [`disable_core_dumps`] so a crash does not write them to disk.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use zeroize::Zeroize;

/// Overwrite every byte of `buffer` with zero, in place.
///
/// # Example
/// ```
/// let mut scalar = [0xAAu8; 32];
/// seedid_core::memory::zeroize(&mut scalar);
/// assert!(scalar.iter().all(|&b| b == 0));
/// ```
pub fn zeroize(buffer: &mut [u8]) {
    buffer.zeroize();
}

/// A fixed-size secret that is zeroed when dropped.
///
/// The bytes live in a `Box` so moving the wrapper around does not leave
/// stack copies of the secret behind.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBytes<const N: usize> {
    bytes: Box<[u8; N]>,
}

impl<const N: usize> SecretBytes<N> {
    /// Copy `bytes` into the secret and zero the source.
    ///
    /// Arrays are `Copy`, so the source is taken by `&mut` to reach the
    /// caller's buffer rather than a temporary.
    pub fn new(bytes: &mut [u8; N]) -> Self {
        let mut boxed = Box::new([0u8; N]);
        boxed.copy_from_slice(bytes);
        bytes.zeroize();
        Self { bytes: boxed }
    }

    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != N {
            return None;
        }
        let mut bytes = Box::new([0u8; N]);
        bytes.copy_from_slice(slice);
        Some(Self { bytes })
    }

    pub fn expose(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Zero the contents now rather than waiting for drop.
    pub fn wipe(&mut self) {
        self.bytes.zeroize();
    }

    pub fn is_wiped(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl<const N: usize> Drop for SecretBytes<N> {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBytes<{}>([REDACTED])", N)
    }
}

/// Track whether core dumps have been disabled (call only once)
static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable core dumps for the current process.
///
/// Returns `true` if core dumps are disabled after the call.
///
/// # Example
/// ```
/// seedid_core::memory::disable_core_dumps();
/// ```
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.swap(true, Ordering::SeqCst) {
        return true;
    }

    #[cfg(unix)]
    {
        let disabled = unix::disable_core_dumps_impl();
        if !disabled {
            CORE_DUMPS_DISABLED.store(false, Ordering::SeqCst);
        }
        disabled
    }

    #[cfg(not(unix))]
    {
        CORE_DUMPS_DISABLED.store(false, Ordering::SeqCst);
        log::warn!("core dump prevention is not supported on this platform");
        false
    }
}

#[cfg(unix)]
mod unix {
    pub fn disable_core_dumps_impl() -> bool {
        let rlim = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: setrlimit only reads the struct we pass by reference.
        let result = unsafe { libc::setrlimit(libc::RLIMIT_CORE, &rlim) };
        if result != 0 {
            log::warn!(
                "failed to disable core dumps: {}",
                std::io::Error::last_os_error()
            );
            return false;
        }
        log::debug!("core dumps disabled");
        true
    }
}
