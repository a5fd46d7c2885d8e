//! Register addresses and command opcodes of the EFI power controller.
//!
//! This module centralizes the controller's protocol constants used
//! throughout the crate: directly addressable registers, the generic-command
//! opcode namespace, and the battery message sub-commands the controller
//! proxies from the pack's Smart Battery data set.

//------------------------------------------------------------------------------
// Directly addressable registers
//------------------------------------------------------------------------------

/// Power-source status register, shared by every supply the controller knows.
pub const REG_PWR_SRC_STATUS: u8 = 0x30;

/// Relative state of charge of the BAT1 pack, in percent.
pub const REG_BAT1_RSOC: u8 = 0x31;

/// BAT1 presence flag within [`REG_PWR_SRC_STATUS`].
pub const PWR_SRC_BAT1_VALID: u16 = 0x0002;

//------------------------------------------------------------------------------
// Generic-command opcodes
//------------------------------------------------------------------------------

/// Message-read opcode for the BAT1 slot; OR the message sub-command into
/// the low byte.
pub const CMD_BAT1_READ_MSG: u16 = 0x0b00;

// Battery message sub-commands (Smart Battery data set, as proxied by the
// controller). Raw units: temperature in 0.1 K, voltage in mV, currents in
// mA, times in minutes.
pub const BAT_MSG_TEMPERATURE: u16 = 0x08;
pub const BAT_MSG_VOLTAGE: u16 = 0x09;
pub const BAT_MSG_CURRENT: u16 = 0x0a;
pub const BAT_MSG_AVERAGE_CURRENT: u16 = 0x0b;
pub const BAT_MSG_RUN_TIME_TO_EMPTY: u16 = 0x11;
pub const BAT_MSG_AVERAGE_TIME_TO_EMPTY: u16 = 0x12;
pub const BAT_MSG_AVERAGE_TIME_TO_FULL: u16 = 0x13;
pub const BAT_MSG_CYCLE_COUNT: u16 = 0x17;
