use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::EfiChip;
use crate::error::{Error, Result};

/// Scripted in-memory controller for tests and hardware-free development.
///
/// Registers and command replies are plain maps populated through the
/// `with_*` builders; reading an unscripted address fails the way a dead bus
/// would. Clones share state, so a test can keep a handle to flip registers
/// mid-scenario (e.g. a battery swap) or to count the exchanges a code path
/// actually issued.
#[derive(Debug, Clone, Default)]
pub struct FakeChip {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    registers: HashMap<u8, u16>,
    replies: HashMap<u16, u16>,
    register_fault: bool,
    command_fault: bool,
    register_reads: u32,
    commands_issued: u32,
}

impl FakeChip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a register value.
    pub fn with_register(self, address: u8, value: u16) -> Self {
        self.state.lock().registers.insert(address, value);
        self
    }

    /// Script the reply to a generic-command opcode.
    pub fn with_reply(self, opcode: u16, value: u16) -> Self {
        self.state.lock().replies.insert(opcode, value);
        self
    }

    /// Make every register read fail.
    pub fn with_register_fault(self) -> Self {
        self.state.lock().register_fault = true;
        self
    }

    /// Make every generic command fail.
    pub fn with_command_fault(self) -> Self {
        self.state.lock().command_fault = true;
        self
    }

    /// Rewrite a register after construction.
    pub fn set_register(&self, address: u8, value: u16) {
        self.state.lock().registers.insert(address, value);
    }

    /// Number of register reads served (or failed) so far.
    pub fn register_reads(&self) -> u32 {
        self.state.lock().register_reads
    }

    /// Number of generic commands issued so far.
    pub fn commands_issued(&self) -> u32 {
        self.state.lock().commands_issued
    }
}

impl EfiChip for FakeChip {
    fn read_register(&self, address: u8) -> Result<u16> {
        let mut state = self.state.lock();
        state.register_reads += 1;
        if state.register_fault {
            return Err(Error::chip(format!("register {address:#04x}: bus fault")));
        }
        state
            .registers
            .get(&address)
            .copied()
            .ok_or_else(|| Error::chip(format!("register {address:#04x}: no reply")))
    }

    fn generic_command(&self, opcode: u16, _payload: u16) -> Result<u16> {
        let mut state = self.state.lock();
        state.commands_issued += 1;
        if state.command_fault {
            return Err(Error::chip(format!("command {opcode:#06x}: bus fault")));
        }
        state
            .replies
            .get(&opcode)
            .copied()
            .ok_or_else(|| Error::chip(format!("command {opcode:#06x}: no reply")))
    }
}
