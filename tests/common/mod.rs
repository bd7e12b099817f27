//! Register-file fake for MPQ421x tests: one shared log of bus accesses and delays.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use mpq421x_rs::registers::{REGISTER_COUNT, addr};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    Read(u8),
    Write(u8, u8),
    DelayNs(u64),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub struct FakeBus {
    pub address: u8,
    pub regs: [u8; REGISTER_COUNT],
    pointer: u8,
    log: Log,
    /// Reads of this register fail with a NACK.
    pub fail_reads_of: Option<u8>,
}

impl FakeBus {
    pub fn new(address: u8, regs: [u8; REGISTER_COUNT]) -> (Self, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let bus = Self {
            address,
            regs,
            pointer: 0,
            log: log.clone(),
            fail_reads_of: None,
        };
        (bus, log)
    }

    fn store(&mut self, reg: u8, value: u8) {
        if reg == addr::INT_STATUS {
            self.regs[reg as usize] &= !value;
        } else {
            self.regs[reg as usize] = value;
        }
    }
}

impl ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let Some((&reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = reg;
                    for (i, &value) in data.iter().enumerate() {
                        let r = reg + i as u8;
                        self.log.borrow_mut().push(Event::Write(r, value));
                        self.store(r, value);
                    }
                }
                Operation::Read(buf) => {
                    for (i, slot) in buf.iter_mut().enumerate() {
                        let r = self.pointer + i as u8;
                        if self.fail_reads_of == Some(r) {
                            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                        }
                        self.log.borrow_mut().push(Event::Read(r));
                        *slot = self.regs[r as usize];
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for FakeBus {
    async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        I2c::transaction(self, address, operations)
    }
}

/// Delay that records requested time into the bus log instead of sleeping.
pub struct FakeDelay {
    log: Log,
}

impl FakeDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::DelayNs(us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ms as u64 * 1_000_000));
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        DelayNs::delay_ns(self, ns);
    }

    async fn delay_us(&mut self, us: u32) {
        DelayNs::delay_us(self, us);
    }

    async fn delay_ms(&mut self, ms: u32) {
        DelayNs::delay_ms(self, ms);
    }
}

/// Writes in log order, dropping reads and delays.
pub fn writes(log: &Log) -> Vec<(u8, u8)> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            Event::Write(r, v) => Some((*r, *v)),
            _ => None,
        })
        .collect()
}
