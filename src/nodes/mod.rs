//! Channel sources and decoder implementations
//!
//! - **SignalChannel**: acquisition channel fed by the capture side
//! - **Decoders**: built-in decoders on top of the resampling helpers
//!
//! # Examples
//!
//! ```
//! use scopedecode::{Channel, ParallelDecoder, Decoder, SignalChannel, SignalType};
//! use std::rc::Rc;
//!
//! let clk = Rc::new(SignalChannel::new("CH1", "#ffff00", SignalType::Digital));
//! let bus = Rc::new(Decoder::new(ParallelDecoder::new(), "#336699"));
//! bus.set_input_by_name("clk", Some(clk)).unwrap();
//! bus.refresh_if_dirty();
//! ```

pub mod decoders;
mod signal;

pub use signal::SignalChannel;
