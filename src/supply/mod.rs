//! Registration boundary to the host power-supply framework.
//!
//! The framework itself lives outside this crate; what crosses the boundary
//! is a capability descriptor, the [`PropertySource`] callbacks the framework
//! drives after registration, and the opaque [`SupplyHandle`] it returns.
//! A registry refusal is fatal for the attach and surfaces unchanged.

use std::fmt::Debug;

#[cfg(test)]
use mockall::automock;

use crate::battery::{Battery, BatteryProperty};
use crate::chip::EfiChip;
use crate::error::Result;

/// The class of supply a source registers as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyType {
    Battery,
}

/// Capability descriptor handed to the framework at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyInfo {
    pub name: &'static str,
    pub supply_type: SupplyType,
    pub properties: &'static [BatteryProperty],
}

/// Opaque identifier of a registered supply, issued by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupplyHandle(pub u32);

/// Query callbacks the framework drives after registration.
pub trait PropertySource: Debug + Send {
    /// Capability descriptor for this source.
    fn info(&self) -> SupplyInfo;

    /// Answer a read query.
    fn get_property(&self, property: BatteryProperty) -> Result<i32>;

    /// Apply a write query.
    fn set_property(&self, property: BatteryProperty, value: i32) -> Result<()>;

    /// Whether the property accepts writes.
    fn property_is_writable(&self, property: BatteryProperty) -> bool;
}

impl PropertySource for Battery {
    fn info(&self) -> SupplyInfo {
        let desc = self.descriptor();
        SupplyInfo {
            name: desc.name,
            supply_type: SupplyType::Battery,
            properties: desc.properties,
        }
    }

    fn get_property(&self, property: BatteryProperty) -> Result<i32> {
        Battery::get_property(self, property)
    }

    fn set_property(&self, property: BatteryProperty, value: i32) -> Result<()> {
        Battery::set_property(self, property, value)
    }

    fn property_is_writable(&self, property: BatteryProperty) -> bool {
        Battery::property_is_writable(self, property)
    }
}

/// Host framework boundary: accepts a supply and returns its handle.
#[cfg_attr(test, automock)]
pub trait SupplyRegistry {
    fn register(&mut self, supply: Box<dyn PropertySource>) -> Result<SupplyHandle>;
}

/// Attach the BAT1 battery over `chip` and register it with the framework.
pub fn register_bat1(
    registry: &mut dyn SupplyRegistry,
    chip: Box<dyn EfiChip>,
) -> Result<SupplyHandle> {
    let battery = Battery::bat1(chip);
    let name = battery.descriptor().name;
    match registry.register(Box::new(battery)) {
        Ok(handle) => {
            log::debug!("{name}: registered as {handle:?}");
            Ok(handle)
        }
        Err(e) => {
            log::error!("{name}: failed to register power supply: {e}");
            Err(e)
        }
    }
}
