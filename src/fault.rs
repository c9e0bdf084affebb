//! Fault state management for TouchAlarm.
//!
//! Two kinds of fault exist:
//! - an undefined security mode, recovered on the spot by resetting to
//!   Disarmed (recorded, then cleared)
//! - a peripheral that cannot be configured at boot, which is fatal: the
//!   firmware stops before the foreground loop starts

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// Stored security mode was undefined and has been reset.
    /// Data carries the bad mode byte.
    InvalidMode = 1,

    /// Sample timer could not be configured.
    TimerInit = 2,

    /// Analog output could not be configured.
    OutputInit = 3,

    /// LED or input pins could not be configured.
    GpioInit = 4,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => FaultCode::InvalidMode,
            2 => FaultCode::TimerInit,
            3 => FaultCode::OutputInit,
            4 => FaultCode::GpioInit,
            _ => FaultCode::None,
        }
    }

    /// True for faults the firmware cannot continue after.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            FaultCode::TimerInit | FaultCode::OutputInit | FaultCode::GpioInit
        )
    }
}

/// Thread-safe fault state.
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// if let Err(e) = hal::tone::start(..) {
///     FAULT.set(FaultCode::TimerInit, 0);
///     halt();
/// }
/// ```
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (e.g. the bad mode byte).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Record a fault and mark it active.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Record a fault that has already been handled.
    ///
    /// Code, data and count are kept for diagnostics; the active flag stays clear.
    #[inline]
    pub fn record_recovered(&self, code: FaultCode, data: u32) {
        self.set(code, data);
        self.clear();
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get the last fault code.
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear the active flag. The counter is not reset.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
