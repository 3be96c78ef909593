//! Stepper coil waveforms
//!
//! A stepper pair is driven by four channels running free at the bank
//! frequency. Each coil gets a fixed phase-shifted (on, off) window; the
//! direction is chosen by which channel receives which phase. The PCA9685
//! steps the motor by itself once the waveforms are loaded.

use super::router::{ChannelPlan, ChannelWrite};
use super::types::{Direction, StepperModel, StepperPair};

/// Phase windows (on, off) for the 28BYJ-48
const BYJ28_PHASES: [(u16, u16); 4] = [(2047, 4095), (1, 2047), (1023, 3071), (3071, 1023)];

/// Phase windows (on, off) for the 42 mm bipolar motor
const NEMA42_PHASES: [(u16, u16); 4] = [(3071, 1023), (1023, 3071), (4095, 2047), (2047, 4095)];

const A: usize = 0;
const B: usize = 1;
const C: usize = 2;
const D: usize = 3;

/// (channel offset from the pair base, phase) in write order
type Sequence = [(u8, usize); 4];

const BYJ28_CW: Sequence = [(0, A), (2, B), (1, C), (3, D)];
const BYJ28_CCW: Sequence = [(3, A), (1, B), (2, C), (0, D)];
const NEMA42_CW: Sequence = [(3, A), (2, B), (1, C), (0, D)];
const NEMA42_CCW: Sequence = [(3, C), (2, D), (1, A), (0, B)];

/// Load the coil waveforms for one stepper
pub fn stepper_plan(pair: StepperPair, model: StepperModel, direction: Direction) -> ChannelPlan {
    let (phases, sequence) = match (model, direction) {
        (StepperModel::Byj28, Direction::Clockwise) => (&BYJ28_PHASES, &BYJ28_CW),
        (StepperModel::Byj28, Direction::CounterClockwise) => (&BYJ28_PHASES, &BYJ28_CCW),
        (StepperModel::Nema42, Direction::Clockwise) => (&NEMA42_PHASES, &NEMA42_CW),
        (StepperModel::Nema42, Direction::CounterClockwise) => (&NEMA42_PHASES, &NEMA42_CCW),
    };

    let base = pair.base_channel();
    sequence
        .iter()
        .map(|&(offset, phase)| {
            let (on, off) = phases[phase];
            ChannelWrite::new(base + offset, on, off)
        })
        .collect()
}
