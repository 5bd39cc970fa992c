//! Scoped control of the processor's floating-point rounding direction.
//!
//! The rounding direction is part of the thread's floating-point environment,
//! shared by everything running on that thread. [`RoundingGuard`] is therefore
//! neither `Send` nor `Sync`, and can only live on the stack of the thread
//! whose environment it changed.

use std::marker::PhantomData;
use std::os::raw::c_int;

use log::{debug, error};

use crate::error::RoundingModeError;

#[cfg_attr(all(unix, not(target_vendor = "apple")), link(name = "m"))]
extern "C" {
    fn fegetround() -> c_int;
    fn fesetround(round: c_int) -> c_int;
}

/// IEEE-754 rounding directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    ToNearest,
    Downward,
    Upward,
    TowardZero,
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(target_env = "msvc")))]
mod consts {
    use std::os::raw::c_int;
    pub const TO_NEAREST: Option<c_int> = Some(0x000);
    pub const DOWNWARD: Option<c_int> = Some(0x400);
    pub const UPWARD: Option<c_int> = Some(0x800);
    pub const TOWARD_ZERO: Option<c_int> = Some(0xc00);
}

#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_env = "msvc"))]
mod consts {
    use std::os::raw::c_int;
    pub const TO_NEAREST: Option<c_int> = Some(0x000);
    pub const DOWNWARD: Option<c_int> = Some(0x100);
    pub const UPWARD: Option<c_int> = Some(0x200);
    pub const TOWARD_ZERO: Option<c_int> = Some(0x300);
}

#[cfg(any(target_arch = "arm", target_arch = "aarch64"))]
mod consts {
    use std::os::raw::c_int;
    pub const TO_NEAREST: Option<c_int> = Some(0x000000);
    pub const UPWARD: Option<c_int> = Some(0x400000);
    pub const DOWNWARD: Option<c_int> = Some(0x800000);
    pub const TOWARD_ZERO: Option<c_int> = Some(0xc00000);
}

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
mod consts {
    use std::os::raw::c_int;
    pub const TO_NEAREST: Option<c_int> = Some(0);
    pub const TOWARD_ZERO: Option<c_int> = Some(1);
    pub const DOWNWARD: Option<c_int> = Some(2);
    pub const UPWARD: Option<c_int> = Some(3);
}

#[cfg(any(target_arch = "powerpc", target_arch = "powerpc64"))]
mod consts {
    use std::os::raw::c_int;
    pub const TO_NEAREST: Option<c_int> = Some(0);
    pub const TOWARD_ZERO: Option<c_int> = Some(1);
    pub const UPWARD: Option<c_int> = Some(2);
    pub const DOWNWARD: Option<c_int> = Some(3);
}

#[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "arm",
    target_arch = "aarch64",
    target_arch = "riscv32",
    target_arch = "riscv64",
    target_arch = "powerpc",
    target_arch = "powerpc64",
)))]
mod consts {
    use std::os::raw::c_int;
    pub const TO_NEAREST: Option<c_int> = None;
    pub const DOWNWARD: Option<c_int> = None;
    pub const UPWARD: Option<c_int> = None;
    pub const TOWARD_ZERO: Option<c_int> = None;
}

impl RoundingMode {
    /// The platform's `FE_*` constant for this mode, if it has one.
    fn code(self) -> Option<c_int> {
        match self {
            RoundingMode::ToNearest => consts::TO_NEAREST,
            RoundingMode::Downward => consts::DOWNWARD,
            RoundingMode::Upward => consts::UPWARD,
            RoundingMode::TowardZero => consts::TOWARD_ZERO,
        }
    }

    fn from_code(code: c_int) -> Option<RoundingMode> {
        [
            RoundingMode::ToNearest,
            RoundingMode::Downward,
            RoundingMode::Upward,
            RoundingMode::TowardZero,
        ]
        .into_iter()
        .find(|mode| mode.code() == Some(code))
    }

    /// The rounding direction currently active on this thread, or `None` if
    /// the platform reports a direction this type does not know about.
    pub fn current() -> Option<RoundingMode> {
        // SAFETY: fegetround only reads the calling thread's FP environment.
        RoundingMode::from_code(unsafe { fegetround() })
    }
}

/// Switches the rounding direction for as long as it is alive.
///
/// On construction the previous direction is captured; it is restored on
/// drop, including during unwinding. Guards nest: each one restores exactly
/// the direction that was active when it was created.
///
/// All interval arithmetic in this crate requires a [`RoundingMode::Downward`]
/// guard to be alive on the calling thread. Only building intervals from
/// values that are already doubles (or exact integers/rationals) works
/// without one.
#[must_use = "the previous rounding mode is restored as soon as the guard is dropped"]
pub struct RoundingGuard {
    old: c_int,
    mode: RoundingMode,
    changed: bool,
    _thread_local: PhantomData<*const ()>,
}

impl RoundingGuard {
    pub fn new(mode: RoundingMode) -> Result<RoundingGuard, RoundingModeError> {
        let code = mode.code().ok_or(RoundingModeError::Unsupported { mode })?;
        // SAFETY: fegetround only reads the calling thread's FP environment,
        // and the guard is pinned to this thread.
        let old = unsafe { fegetround() };
        let changed = old != code;
        if changed {
            set_raw(code).map_err(|r| RoundingModeError::Rejected { mode, code: r })?;
            debug!(
                "rounding mode {:?} -> {:?}",
                RoundingMode::from_code(old),
                mode
            );
        }
        Ok(RoundingGuard {
            old,
            mode,
            changed,
            _thread_local: PhantomData,
        })
    }

    /// Guard for round-toward-negative-infinity, the mode interval
    /// arithmetic runs under.
    pub fn downward() -> Result<RoundingGuard, RoundingModeError> {
        RoundingGuard::new(RoundingMode::Downward)
    }

    pub fn mode(&self) -> RoundingMode {
        self.mode
    }
}

impl Drop for RoundingGuard {
    fn drop(&mut self) {
        if !self.changed {
            return;
        }
        match set_raw(self.old) {
            Ok(()) => debug!(
                "rounding mode {:?} restored to {:?}",
                self.mode,
                RoundingMode::from_code(self.old)
            ),
            Err(r) => error!(
                "failed to restore rounding mode {:#x} after {:?}: fesetround returned {}",
                self.old, self.mode, r
            ),
        }
    }
}

/// `fesetround` with its status turned into a `Result`.
fn set_raw(code: c_int) -> Result<(), c_int> {
    // SAFETY: fesetround only touches the calling thread's FP environment.
    match unsafe { fesetround(code) } {
        0 => Ok(()),
        r => Err(r),
    }
}

/// Runs `f` with the rounding direction set to downward.
pub fn round_down<T, F: FnOnce() -> T>(f: F) -> Result<T, RoundingModeError> {
    let _guard = RoundingGuard::downward()?;
    Ok(f())
}

/// Hides `x` from the optimizer, so arithmetic on it happens at run time
/// under the rounding mode active then, and is not folded at compile time
/// under round-to-nearest.
#[inline(always)]
pub(crate) fn opaque(x: f64) -> f64 {
    std::hint::black_box(x)
}

#[inline]
pub(crate) fn debug_assert_round_down() {
    debug_assert_eq!(
        RoundingMode::current(),
        Some(RoundingMode::Downward),
        "interval arithmetic requires a downward RoundingGuard"
    );
}
