//! Contains the building blocks of a training session.
//!
//! The `Countdown` drains time and reports zero-crossings; the sequencer
//! decides what comes next. The `Session` controller in the crate root glues
//! the two together and owns their state.

pub mod countdown;
pub mod sequencer;
