//! Scoped device binding: routes kernel invocations to a named device for
//! the lifetime of the guard, released on every exit path including panics.

use std::cell::RefCell;

thread_local! {
    static CURRENT_DEVICE: RefCell<Option<String>> = RefCell::new(None);
}

/// Identifies a logical device by name (`accelerators` config key, or the
/// `memory_device`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device(pub String);

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Device(name.into())
    }

    /// Binds `self` as the current device for the returned guard's lifetime.
    pub fn enter(&self) -> DeviceGuard {
        let previous = CURRENT_DEVICE.with(|cell| cell.replace(Some(self.0.clone())));
        DeviceGuard { previous }
    }
}

/// Releases the device binding when dropped, restoring whatever was bound
/// before (RAII equivalent of `leave(device)`).
pub struct DeviceGuard {
    previous: Option<String>,
}

impl Drop for DeviceGuard {
    fn drop(&mut self) {
        CURRENT_DEVICE.with(|cell| *cell.borrow_mut() = self.previous.take());
    }
}

/// Returns the name of the currently-bound device, if any.
pub fn current() -> Option<String> {
    CURRENT_DEVICE.with(|cell| cell.borrow().clone())
}
