//! Shared I2C bus
//!
//! The PCA9685 and the SSD1306 sit on the same two wires. Each driver owns
//! an `I2c` handle, so the bus is wrapped once and every driver receives a
//! [`BusDevice`] that runs its transactions inside a critical section.
//! A glyph upload can therefore never be split by a PWM write.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::i2c::I2c;
use embedded_hal_bus::i2c::CriticalSectionDevice;

/// Per-driver handle onto a [`SharedBus`]
pub type BusDevice<'a, I2C> = CriticalSectionDevice<'a, I2C>;

/// An I2C bus shared between several drivers
pub struct SharedBus<I2C> {
    bus: Mutex<RefCell<I2C>>,
}

impl<I2C> SharedBus<I2C> {
    /// Wrap a bus for sharing
    pub const fn new(i2c: I2C) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(i2c)),
        }
    }

    /// Release the underlying bus
    pub fn into_inner(self) -> I2C {
        self.bus.into_inner().into_inner()
    }
}

impl<I2C: I2c> SharedBus<I2C> {
    /// Create a device handle for one driver
    pub fn device(&self) -> BusDevice<'_, I2C> {
        CriticalSectionDevice::new(&self.bus)
    }
}
