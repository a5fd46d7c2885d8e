//! EFI Battery - battery telemetry from an EFI-resident power controller
//!
//! This crate exposes one battery's state through a property-query interface:
//! presence, state of charge, time estimates, current, voltage, temperature
//! and cycle count. Raw values come from the command/register protocol spoken
//! with the embedded power-management controller; the transport itself stays
//! behind the [`chip::EfiChip`] trait so the crate runs identically over real
//! hardware, a bus bridge, or the bundled [`chip::FakeChip`].
//!
//! # Features
//!
//! - **Presence gating**: message commands are only issued while a pack is
//!   fitted. A command sent to an empty bay can hang the controller, so
//!   absence short-circuits to a default value instead of touching the bus.
//! - **Unit conversion**: controller-native units (minutes, 0.1 K,
//!   milli-units) are converted to seconds, 0.1 °C and micro-units at the
//!   edge.
//! - **Read-only dispatch**: `get` queries route through one property table;
//!   `set` is refused for every property.
//! - **Registration shim**: the [`supply`] module carries the capability
//!   descriptor and callbacks across the host framework boundary.
//!
//! # Examples
//!
//! ```rust
//! use efi_battery::chip::{registers, FakeChip};
//! use efi_battery::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let chip = FakeChip::new()
//!         .with_register(registers::REG_PWR_SRC_STATUS, registers::PWR_SRC_BAT1_VALID)
//!         .with_register(registers::REG_BAT1_RSOC, 87);
//!
//!     let battery = Battery::bat1(Box::new(chip));
//!     assert!(battery.is_present()?);
//!     assert_eq!(battery.get_property(BatteryProperty::Capacity)?, 87);
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`error::Result`]. Transport failures are
//! surfaced to the caller unchanged; the crate never retries or masks them.
//! An absent battery is not an error: gated reads report their default value.
//!
//! # Thread Safety
//!
//! Queries are synchronous and issue at most one transport exchange each.
//! A [`battery::Battery`] is not designed for concurrent callers; wrap it in
//! your own synchronization if queries can arrive in parallel. Serializing
//! access to the physical controller is the [`chip::EfiChip`] implementor's
//! concern.

pub mod battery;
pub mod chip;
pub mod error;
pub mod supply;

pub use error::{Error, Result};

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::battery::{Battery, BatteryProperty, BatterySnapshot};
    pub use crate::chip::EfiChip;
    pub use crate::error::{Error, Result};
    pub use crate::supply::{PropertySource, SupplyHandle, SupplyRegistry};
}
