#![cfg_attr(not(test), no_std)]

//! mitsu_ac
//!
//! Reverse-engineered protocol implementation for some Mitsubishi heat pumps
//! (aka air conditioners) with CN105 connectors. Based heavily on the work in
//! [SwiCago/HeatPump](https://github.com/SwiCago/HeatPump).
//!
//! It is intended for use on embedded hardware, and as such is `no_std`.
//!
//! The CN105 serial connection operates at 2400 baud, 8 bits per byte, even
//! parity with 1 stop bit (2400 8E1). You should configure your serial
//! peripheral as such ([`BAUD_RATE`]) and hand it to a [`MitsubishiDevice`],
//! or use the [`protocol`] module directly to parse/encode data on that line.
//!
//! ## General Usage
//!
//! Drive a unit over any `embedded-hal` serial port:
//!
//! ```ignore
//! use core::sync::atomic::AtomicBool;
//! use mitsu_ac::{MitsubishiDevice, WantedState};
//!
//! static STOP: AtomicBool = AtomicBool::new(false);
//!
//! let mut device = MitsubishiDevice::new(serial, clock, delay);
//! device.set(&WantedState::default().with("temp", "21.5")?)?;
//! device.run(&STOP)?;
//! ```
//!
//! Read from the serial line:
//!
//! ```
//! use mitsu_ac::{DeviceState, FrameAssembler, FrameData};
//!
//! let line: &[u8] = &[0x42, 0x00, 0xfc, 0x7a, 0x01, 0x30, 0x01, 0x00, 0x54];
//! let mut assembler = FrameAssembler::new();
//! let mut state = DeviceState::new();
//!
//! for byte in line {
//!     // Junk before the start of a frame comes back as `FrameError::Desync`.
//!     if let Ok(Some(frame)) = assembler.push(*byte) {
//!         assert_eq!(FrameData::parse(&frame), FrameData::ConnectResponse);
//!         state.apply(&FrameData::parse(&frame));
//!     }
//! }
//!
//! assert!(state.is_connected());
//! ```
//!
//! Encode a packet for writing to the serial line:
//!
//! ```
//! use mitsu_ac::packets::info_request;
//! use mitsu_ac::InfoType;
//!
//! let frame = info_request(InfoType::Settings);
//!
//! assert_eq!(
//!     // Frame Header
//!     //
//!     //       ---- DataType::GetInfoRequest = 0x42
//!     //       ||||              ---- datalen = 0x10
//!     //       ||||              ||||
//!     &[ 0xfc, 0x42, 0x01, 0x30, 0x10,
//!
//!     // Frame Data (0x10 bytes  ^^^^)
//!     //
//!     // ---- InfoType::Settings = 0x02
//!     // ||||
//!        0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//!        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//!
//!     // Frame Footer (Checksum byte)
//!     //
//!     // ---- Checksum = 0xfc - SUM(frame_bytes) & 0xff
//!     // ||||
//!        0x7b ],
//!     frame.as_bytes());
//! ```
//!
//! Work out what to send to reach a wanted state:
//!
//! ```
//! use mitsu_ac::packets::diff;
//! use mitsu_ac::{DeviceState, Setpoint, WantedState};
//!
//! let mut current = DeviceState::new();
//! current.set_setpoint(Setpoint::whole(24));
//!
//! let wanted = WantedState { setpoint: Some(Setpoint::with_half(22)), ..WantedState::default() };
//! let frame = diff(&current, &wanted).unwrap().unwrap();
//! // Only the setpoint flag is raised.
//! assert_eq!(frame.data()[1], 0x04);
//!
//! current.set_setpoint(Setpoint::with_half(22));
//! assert_eq!(diff(&current, &wanted), Ok(None));
//! ```

pub mod config;
mod interface;
pub mod protocol;
pub mod state;

pub use config::{Config, BAUD_RATE};
pub use interface::{Clock, Error, MitsubishiDevice};
pub use state::{DeviceState, WantedState};

#[doc(inline)]
pub use protocol::*;
