//! Battery telemetry over the controller's command/register protocol.
//!
//! One [`Battery`] serves one physical slot, described by a static
//! [`BatteryDescriptor`]. Presence is re-read from the shared power-source
//! status register on every query; message commands are only issued while the
//! pack is present, because a message sent to an empty bay can hang the
//! controller indefinitely. Absence is therefore a normal "no data" outcome
//! (the property reads as its default), distinct from a transport failure,
//! which always surfaces to the caller unchanged.
//!
//! Raw controller units are converted at the edge: minutes to seconds for the
//! time estimates, milli- to micro-units for current and voltage, and tenths
//! of a kelvin to tenths of a degree Celsius for the pack temperature.

mod properties;

pub use properties::BatteryProperty;

use serde::Serialize;

use crate::chip::{registers, EfiChip};
use crate::error::{Error, Result};

/// Static per-slot configuration for one physical battery bay.
#[derive(Debug)]
pub struct BatteryDescriptor {
    /// Supply name the slot registers under.
    pub name: &'static str,
    /// This slot's presence flag within the shared power-source status
    /// register.
    pub validity_bit: u16,
    /// Properties the slot answers. Must stay in sync with the dispatch in
    /// [`Battery::get_property`].
    pub properties: &'static [BatteryProperty],
}

/// Properties served by the BAT1 slot.
pub const BAT1_PROPERTIES: &[BatteryProperty] = &[
    BatteryProperty::Present,
    BatteryProperty::Capacity,
    BatteryProperty::TimeToEmptyNow,
    BatteryProperty::TimeToEmptyAvg,
    BatteryProperty::TimeToFullAvg,
    BatteryProperty::CurrentNow,
    BatteryProperty::CurrentAvg,
    BatteryProperty::VoltageNow,
    BatteryProperty::Temperature,
    BatteryProperty::CycleCount,
];

/// The controller's first (and only) battery bay.
pub static BAT1: BatteryDescriptor = BatteryDescriptor {
    name: "efi-bat1",
    validity_bit: registers::PWR_SRC_BAT1_VALID,
    properties: BAT1_PROPERTIES,
};

/// Battery telemetry interface over one controller slot.
///
/// Owns its transport handle exclusively. Queries are synchronous and issue
/// at most one command exchange each; callers that query concurrently must
/// synchronize externally.
#[derive(Debug)]
pub struct Battery {
    chip: Box<dyn EfiChip>,
    desc: &'static BatteryDescriptor,
}

impl Battery {
    /// Create a battery bound to the given slot descriptor.
    pub fn new(chip: Box<dyn EfiChip>, desc: &'static BatteryDescriptor) -> Self {
        Self { chip, desc }
    }

    /// Create a battery for the BAT1 slot.
    pub fn bat1(chip: Box<dyn EfiChip>) -> Self {
        Self::new(chip, &BAT1)
    }

    /// Slot descriptor this instance serves.
    pub fn descriptor(&self) -> &'static BatteryDescriptor {
        self.desc
    }

    /// Check whether a pack is physically present in the slot.
    ///
    /// Reads the shared status register on every call; the presence bit can
    /// change between calls when a pack is swapped.
    pub fn is_present(&self) -> Result<bool> {
        let status = self.chip.read_register(registers::REG_PWR_SRC_STATUS)?;
        let present = status & self.desc.validity_bit != 0;
        log::debug!("{}: present={present} (status={status:#06x})", self.desc.name);
        Ok(present)
    }

    /// Relative state of charge in percent, as reported by the pack.
    ///
    /// RSOC is a plain register; reading it is safe with no pack fitted, so
    /// this path skips the presence gate.
    pub fn capacity(&self) -> Result<i32> {
        let value = self.chip.read_register(registers::REG_BAT1_RSOC)?;
        log::debug!("{}: capacity={value}", self.desc.name);
        Ok(i32::from(value))
    }

    /// One presence-gated message read.
    ///
    /// A message command sent while the bay is empty can hang the controller,
    /// so absence short-circuits to `default` without touching the command
    /// interface. Presence-check failures and command failures both propagate
    /// unchanged.
    fn read_message(&self, command: u16, default: u16) -> Result<u16> {
        let present = match self.is_present() {
            Ok(present) => present,
            Err(e) => {
                log::warn!(
                    "{}: command {command:#04x}: presence check failed: {e}",
                    self.desc.name
                );
                return Err(e);
            }
        };
        if !present {
            log::debug!(
                "{}: command {command:#04x}: battery not present, default {default}",
                self.desc.name
            );
            return Ok(default);
        }

        match self
            .chip
            .generic_command(registers::CMD_BAT1_READ_MSG | command, 0)
        {
            Ok(raw) => {
                log::debug!("{}: command {command:#04x}: value {raw}", self.desc.name);
                Ok(raw)
            }
            Err(e) => {
                log::warn!(
                    "{}: command {command:#04x}: command failed: {e}",
                    self.desc.name
                );
                Err(e)
            }
        }
    }

    fn read_time_min(&self, command: u16) -> Result<i32> {
        let minutes = self.read_message(command, 0)?;
        Ok(i32::from(minutes) * 60)
    }

    fn read_micro_unit(&self, command: u16) -> Result<i32> {
        let milli = self.read_message(command, 0)?;
        Ok(i32::from(milli) * 1000)
    }

    /// Estimated seconds until empty at the present rate of drain.
    pub fn time_to_empty_now(&self) -> Result<i32> {
        self.read_time_min(registers::BAT_MSG_RUN_TIME_TO_EMPTY)
    }

    /// Estimated seconds until empty at the rolling-average rate of drain.
    pub fn time_to_empty_avg(&self) -> Result<i32> {
        self.read_time_min(registers::BAT_MSG_AVERAGE_TIME_TO_EMPTY)
    }

    /// Estimated seconds until full at the rolling-average charge rate.
    pub fn time_to_full_avg(&self) -> Result<i32> {
        self.read_time_min(registers::BAT_MSG_AVERAGE_TIME_TO_FULL)
    }

    /// Instantaneous current in microamps.
    pub fn current_now(&self) -> Result<i32> {
        self.read_micro_unit(registers::BAT_MSG_CURRENT)
    }

    /// Rolling-average current in microamps.
    pub fn current_avg(&self) -> Result<i32> {
        self.read_micro_unit(registers::BAT_MSG_AVERAGE_CURRENT)
    }

    /// Terminal voltage in microvolts.
    pub fn voltage_now(&self) -> Result<i32> {
        self.read_micro_unit(registers::BAT_MSG_VOLTAGE)
    }

    /// Pack temperature in tenths of a degree Celsius.
    ///
    /// The pack reports tenths of a kelvin. The offset applies to the
    /// absent-battery default too, so an empty bay reads as -2732.
    pub fn temperature(&self) -> Result<i32> {
        let raw = self.read_message(registers::BAT_MSG_TEMPERATURE, 0)?;
        Ok(i32::from(raw) - 2732)
    }

    /// Charge/discharge cycles accumulated by the pack.
    pub fn cycle_count(&self) -> Result<i32> {
        let raw = self.read_message(registers::BAT_MSG_CYCLE_COUNT, 0)?;
        Ok(i32::from(raw))
    }

    /// Answer a property query.
    ///
    /// Properties outside the slot's supported list fail with
    /// [`Error::Unsupported`]; everything else delegates to the matching
    /// reader and surfaces its result verbatim.
    pub fn get_property(&self, property: BatteryProperty) -> Result<i32> {
        if !self.desc.properties.contains(&property) {
            return Err(Error::unsupported(format!(
                "{}: {property}",
                self.desc.name
            )));
        }
        match property {
            BatteryProperty::Present => Ok(self.is_present()? as i32),
            BatteryProperty::Capacity => self.capacity(),
            BatteryProperty::TimeToEmptyNow => self.time_to_empty_now(),
            BatteryProperty::TimeToEmptyAvg => self.time_to_empty_avg(),
            BatteryProperty::TimeToFullAvg => self.time_to_full_avg(),
            BatteryProperty::CurrentNow => self.current_now(),
            BatteryProperty::CurrentAvg => self.current_avg(),
            BatteryProperty::VoltageNow => self.voltage_now(),
            BatteryProperty::Temperature => self.temperature(),
            BatteryProperty::CycleCount => self.cycle_count(),
        }
    }

    /// Writes are refused for every property; the device is read-only.
    pub fn set_property(&self, property: BatteryProperty, _value: i32) -> Result<()> {
        Err(Error::unsupported(format!(
            "{}: {property} is read-only",
            self.desc.name
        )))
    }

    /// The device is read-only; no property accepts writes.
    pub fn property_is_writable(&self, _property: BatteryProperty) -> bool {
        false
    }

    /// Read every supported property through the dispatch table into one
    /// snapshot. The first failing read aborts the snapshot with that error.
    pub fn snapshot(&self) -> Result<BatterySnapshot> {
        Ok(BatterySnapshot {
            present: self.get_property(BatteryProperty::Present)? != 0,
            capacity: self.get_property(BatteryProperty::Capacity)?,
            time_to_empty_now: self.get_property(BatteryProperty::TimeToEmptyNow)?,
            time_to_empty_avg: self.get_property(BatteryProperty::TimeToEmptyAvg)?,
            time_to_full_avg: self.get_property(BatteryProperty::TimeToFullAvg)?,
            current_now: self.get_property(BatteryProperty::CurrentNow)?,
            current_avg: self.get_property(BatteryProperty::CurrentAvg)?,
            voltage_now: self.get_property(BatteryProperty::VoltageNow)?,
            temperature: self.get_property(BatteryProperty::Temperature)?,
            cycle_count: self.get_property(BatteryProperty::CycleCount)?,
        })
    }
}

/// One reading of every BAT1 property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatterySnapshot {
    pub present: bool,
    /// State of charge in percent.
    pub capacity: i32,
    /// Seconds until empty at the present drain.
    pub time_to_empty_now: i32,
    /// Seconds until empty at the rolling-average drain.
    pub time_to_empty_avg: i32,
    /// Seconds until full at the rolling-average charge rate.
    pub time_to_full_avg: i32,
    /// Microamps.
    pub current_now: i32,
    /// Microamps.
    pub current_avg: i32,
    /// Microvolts.
    pub voltage_now: i32,
    /// Tenths of a degree Celsius.
    pub temperature: i32,
    pub cycle_count: i32,
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::chip::{registers, FakeChip, MockEfiChip};

    const GATED_PROPERTIES: &[BatteryProperty] = &[
        BatteryProperty::TimeToEmptyNow,
        BatteryProperty::TimeToEmptyAvg,
        BatteryProperty::TimeToFullAvg,
        BatteryProperty::CurrentNow,
        BatteryProperty::CurrentAvg,
        BatteryProperty::VoltageNow,
        BatteryProperty::Temperature,
        BatteryProperty::CycleCount,
    ];

    fn present_chip() -> FakeChip {
        FakeChip::new().with_register(
            registers::REG_PWR_SRC_STATUS,
            registers::PWR_SRC_BAT1_VALID,
        )
    }

    #[test]
    fn test_presence_follows_validity_bit() {
        let chip = present_chip();
        let handle = chip.clone();
        let battery = Battery::bat1(Box::new(chip));

        assert!(battery.is_present().unwrap());

        handle.set_register(registers::REG_PWR_SRC_STATUS, 0x0000);
        assert!(!battery.is_present().unwrap());

        // Another supply's bit does not count as ours.
        handle.set_register(registers::REG_PWR_SRC_STATUS, 0x0004);
        assert!(!battery.is_present().unwrap());
    }

    #[test]
    fn test_absent_battery_reads_defaults_without_commands() {
        for &property in GATED_PROPERTIES {
            let mut mock = MockEfiChip::new();
            mock.expect_read_register()
                .with(eq(registers::REG_PWR_SRC_STATUS))
                .returning(|_| Ok(0x0000));
            mock.expect_generic_command().times(0);

            let battery = Battery::bat1(Box::new(mock));
            let expected = if property == BatteryProperty::Temperature {
                -2732
            } else {
                0
            };
            assert_eq!(battery.get_property(property).unwrap(), expected);
        }
    }

    #[test]
    fn test_presence_failure_propagates_without_commands() {
        for &property in GATED_PROPERTIES {
            let mut mock = MockEfiChip::new();
            mock.expect_read_register()
                .with(eq(registers::REG_PWR_SRC_STATUS))
                .returning(|_| Err(Error::chip("bus timeout")));
            mock.expect_generic_command().times(0);

            let battery = Battery::bat1(Box::new(mock));
            assert!(matches!(
                battery.get_property(property),
                Err(Error::Chip(_))
            ));
        }
    }

    #[test]
    fn test_command_failure_propagates() {
        let chip = present_chip().with_command_fault();
        let battery = Battery::bat1(Box::new(chip));
        assert!(matches!(battery.cycle_count(), Err(Error::Chip(_))));
    }

    #[test]
    fn test_time_properties_convert_minutes_to_seconds() {
        let chip = present_chip()
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_RUN_TIME_TO_EMPTY,
                5,
            )
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_AVERAGE_TIME_TO_EMPTY,
                5,
            )
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_AVERAGE_TIME_TO_FULL,
                5,
            );
        let battery = Battery::bat1(Box::new(chip));

        assert_eq!(battery.time_to_empty_now().unwrap(), 300);
        assert_eq!(battery.time_to_empty_avg().unwrap(), 300);
        assert_eq!(battery.time_to_full_avg().unwrap(), 300);
    }

    #[test]
    fn test_electrical_properties_convert_milli_to_micro() {
        let chip = present_chip()
            .with_reply(registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_CURRENT, 250)
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_AVERAGE_CURRENT,
                250,
            )
            .with_reply(registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_VOLTAGE, 250);
        let battery = Battery::bat1(Box::new(chip));

        assert_eq!(battery.current_now().unwrap(), 250_000);
        assert_eq!(battery.current_avg().unwrap(), 250_000);
        assert_eq!(battery.voltage_now().unwrap(), 250_000);
    }

    #[test]
    fn test_temperature_converts_decikelvin_to_decicelsius() {
        let chip = present_chip().with_reply(
            registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_TEMPERATURE,
            2982,
        );
        let battery = Battery::bat1(Box::new(chip));
        assert_eq!(battery.temperature().unwrap(), 250);
    }

    #[test]
    fn test_cycle_count_is_unconverted() {
        let chip = present_chip().with_reply(
            registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_CYCLE_COUNT,
            3,
        );
        let battery = Battery::bat1(Box::new(chip));
        assert_eq!(battery.cycle_count().unwrap(), 3);
    }

    #[test]
    fn test_capacity_bypasses_presence_gate() {
        // Empty bay, but RSOC still answers: the read must go through and
        // return the raw register value.
        let chip = FakeChip::new()
            .with_register(registers::REG_PWR_SRC_STATUS, 0x0000)
            .with_register(registers::REG_BAT1_RSOC, 87);
        let handle = chip.clone();
        let battery = Battery::bat1(Box::new(chip));

        assert_eq!(battery.capacity().unwrap(), 87);
        assert_eq!(handle.commands_issued(), 0);
    }

    #[test]
    fn test_unsupported_property_is_rejected() {
        static PRESENCE_ONLY: BatteryDescriptor = BatteryDescriptor {
            name: "test-bat",
            validity_bit: 0x0001,
            properties: &[BatteryProperty::Present],
        };
        let chip = FakeChip::new().with_register(registers::REG_PWR_SRC_STATUS, 0x0001);
        let battery = Battery::new(Box::new(chip), &PRESENCE_ONLY);

        assert_eq!(battery.get_property(BatteryProperty::Present).unwrap(), 1);
        assert!(matches!(
            battery.get_property(BatteryProperty::Capacity),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_every_supported_property_dispatches() {
        let chip = present_chip()
            .with_register(registers::REG_BAT1_RSOC, 55)
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_TEMPERATURE,
                2982,
            )
            .with_reply(registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_VOLTAGE, 7400)
            .with_reply(registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_CURRENT, 1200)
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_AVERAGE_CURRENT,
                1100,
            )
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_RUN_TIME_TO_EMPTY,
                90,
            )
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_AVERAGE_TIME_TO_EMPTY,
                95,
            )
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_AVERAGE_TIME_TO_FULL,
                0,
            )
            .with_reply(
                registers::CMD_BAT1_READ_MSG | registers::BAT_MSG_CYCLE_COUNT,
                42,
            );
        let battery = Battery::bat1(Box::new(chip));

        for &property in BAT1.properties {
            battery.get_property(property).unwrap();
        }
    }

    #[test]
    fn test_writes_are_rejected_for_every_property() {
        let battery = Battery::bat1(Box::new(present_chip()));
        for &property in BAT1.properties {
            assert!(matches!(
                battery.set_property(property, 1),
                Err(Error::Unsupported(_))
            ));
            assert!(!battery.property_is_writable(property));
        }
    }
}
