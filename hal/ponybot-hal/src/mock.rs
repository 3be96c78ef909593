//! Recording bus and delay doubles for host tests
//!
//! [`MockI2c`] is a cheap clone around shared state: hand one clone to the
//! driver under test and keep the other to inspect what went over the wire.

extern crate std;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

/// One recorded bus operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Bytes written to a device
    Write { address: u8, bytes: Vec<u8> },
    /// Bytes read from a device
    Read { address: u8, len: usize },
}

/// Error returned when a failure was injected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MockError;

impl embedded_hal::i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct State {
    log: Vec<Transaction>,
    reads: VecDeque<u8>,
    fail_next: bool,
}

/// Recording I2C bus
#[derive(Debug, Clone, Default)]
pub struct MockI2c {
    state: Rc<RefCell<State>>,
}

impl MockI2c {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a byte to be returned by the next read (reads default to 0)
    pub fn queue_read(&self, byte: u8) {
        self.state.borrow_mut().reads.push_back(byte);
    }

    /// Make the next transaction fail with [`MockError`]
    pub fn fail_next(&self) {
        self.state.borrow_mut().fail_next = true;
    }

    /// Everything recorded so far
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.borrow().log.clone()
    }

    /// Payloads of all writes to `address`, in order
    pub fn writes_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .log
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { address: a, bytes } if *a == address => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded transactions
    pub fn clear(&self) {
        self.state.borrow_mut().log.clear();
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail_next {
            state.fail_next = false;
            return Err(MockError);
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => state.log.push(Transaction::Write {
                    address,
                    bytes: bytes.to_vec(),
                }),
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = state.reads.pop_front().unwrap_or(0);
                    }
                    state.log.push(Transaction::Read {
                        address,
                        len: buf.len(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Delay that only accumulates the requested time
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    /// Total requested delay in nanoseconds
    pub total_ns: u64,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in microseconds
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.total_ns += u64::from(us) * 1_000;
    }
}
