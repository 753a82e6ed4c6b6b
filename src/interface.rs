use core::fmt::Debug;
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::serial::{Read, Write};
use heapless::FnvIndexMap;
use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::config::Config;
use crate::protocol::packets::{self, INFO_ROTATION};
use crate::protocol::{Frame, FrameAssembler, FrameData, FrameError, UnknownSymbol};
use crate::state::{DeviceState, WantedState};

/// Number of distinct frame kinds remembered for duplicate suppression.
const HISTORY_SIZE: usize = 16;

/// Monotonic time source, in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error("serial port error: {0:?}")]
    Serial(E),
}

type WriteError<S> = <S as Write<u8>>::Error;

/// Drives one unit over a CN105 serial link.
///
/// The device owns the serial port for the whole session. It keeps the
/// reported [`DeviceState`] up to date from whatever the unit sends, and once
/// per [`Config::info_interval_ms`] transmits either a set request (while the
/// [`WantedState`] differs from the reported one) or the next info request.
pub struct MitsubishiDevice<S, C, D> {
    serial: S,
    clock: C,
    delay: D,
    config: Config,
    assembler: FrameAssembler,
    state: DeviceState,
    wanted: WantedState,
    history: FnvIndexMap<u16, Frame, HISTORY_SIZE>,
    info_index: usize,
    last_send: Option<u64>,
}

impl<S, C, D> MitsubishiDevice<S, C, D>
where
    S: Read<u8> + Write<u8>,
    <S as Read<u8>>::Error: Debug,
    C: Clock,
    D: DelayMs<u32>,
{
    pub fn new(serial: S, clock: C, delay: D) -> Self {
        Self::with_config(serial, clock, delay, Config::default())
    }

    pub fn with_config(serial: S, clock: C, delay: D, config: Config) -> Self {
        MitsubishiDevice {
            serial,
            clock,
            delay,
            config,
            assembler: FrameAssembler::new(),
            state: DeviceState::new(),
            wanted: WantedState::default(),
            history: FnvIndexMap::new(),
            info_index: 0,
            last_send: None,
        }
    }

    /// Gives back the serial port, clock and delay.
    pub fn release(self) -> (S, C, D) {
        (self.serial, self.clock, self.delay)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_state(&self) -> DeviceState {
        self.state.clone()
    }

    /// Reports whether the state changed since the last call.
    pub fn state_changed(&mut self) -> bool {
        let dirty = self.state.is_dirty();
        self.state.clear_dirty();
        dirty
    }

    pub fn wanted_state(&self) -> &WantedState {
        &self.wanted
    }

    /// Merges `wanted` into the pending request. Values without a wire code
    /// are rejected and leave the pending request untouched.
    pub fn set(&mut self, wanted: &WantedState) -> Result<(), UnknownSymbol> {
        wanted.validate()?;
        self.wanted.merge(wanted);
        debug!("Wanted state: {:?}", self.wanted);
        Ok(())
    }

    pub fn connect(&mut self) -> Result<(), Error<WriteError<S>>> {
        info!("Connecting");
        self.send(&packets::connect_request())
    }

    /// One polling cycle: drain what the port has, then transmit if the
    /// interval has passed.
    pub fn poll(&mut self) -> Result<(), Error<WriteError<S>>> {
        self.receive();

        if !self.transmit_due(self.clock.now_ms()) {
            return Ok(());
        }

        if !self.wanted.is_empty() {
            match packets::diff(&self.state, &self.wanted) {
                Ok(Some(frame)) => {
                    debug!(
                        "Sending packet: 0x{:02x} : {:02x?} : 0x{:02x}",
                        frame.type_byte(),
                        frame.data(),
                        frame.checksum()
                    );
                    self.send(&frame)?;
                    self.info_index = 0;
                    self.delay.delay_ms(self.config.settle_delay_ms);
                }
                Ok(None) => {
                    info!("Reached wanted state");
                    self.wanted = WantedState::default();
                }
                Err(e) => {
                    warn!("Dropping wanted state: {}", e);
                    self.wanted = WantedState::default();
                }
            }
        }

        let info_type = INFO_ROTATION[self.info_index];
        trace!("Requesting {:?}", info_type);
        self.send(&packets::info_request(info_type))?;
        self.info_index = (self.info_index + 1) % INFO_ROTATION.len();
        Ok(())
    }

    /// Connects, then polls until `stop` is set. The flag is only looked at
    /// between cycles.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<(), Error<WriteError<S>>> {
        self.connect()?;
        while !stop.load(Ordering::Relaxed) {
            self.poll()?;
            self.delay.delay_ms(self.config.idle_delay_ms);
        }
        info!("Stopped");
        Ok(())
    }

    fn transmit_due(&self, now: u64) -> bool {
        match self.last_send {
            Some(last_send) => {
                now.saturating_sub(last_send) >= u64::from(self.config.info_interval_ms)
            }
            None => true,
        }
    }

    fn receive(&mut self) {
        for _ in 0..self.config.read_batch {
            let byte = match self.serial.read() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => {
                    warn!("Serial read failed: {:?}", e);
                    self.assembler.reset();
                    continue;
                }
            };

            match self.assembler.push(byte) {
                Ok(Some(frame)) => self.handle_frame(frame),
                Ok(None) => {}
                Err(FrameError::Desync(byte)) => trace!("No packet! Skipping 0x{:02x}", byte),
                Err(e) => warn!("HP Packet Invalid: {}", e),
            }
        }
    }

    fn handle_frame(&mut self, frame: Frame) {
        // The unit repeats identical status frames; only log new ones.
        if self.remember(&frame) {
            debug!(
                "HP Packet: 0x{:02x} : {:02x?} : 0x{:02x}",
                frame.type_byte(),
                frame.data(),
                frame.checksum()
            );
        }

        let data = FrameData::parse(&frame);
        let was_connected = self.state.is_connected();
        if self.state.apply(&data) {
            info!("State changed: {:?}", self.state);
        }
        match data {
            FrameData::ConnectResponse if !was_connected => info!("Connected"),
            FrameData::SetResponse => debug!("Set request acknowledged"),
            _ => {}
        }
    }

    /// Records `frame` as the last one seen of its kind (type byte and first
    /// data byte). Returns false when it repeats the recorded frame exactly.
    fn remember(&mut self, frame: &Frame) -> bool {
        let info_byte = frame.data().first().copied().unwrap_or_default();
        let kind = (u16::from(frame.type_byte()) << 8) | u16::from(info_byte);
        if self.history.get(&kind) == Some(frame) {
            return false;
        }

        if let Err((kind, frame)) = self.history.insert(kind, frame.clone()) {
            self.history.clear();
            let _ = self.history.insert(kind, frame);
        }
        true
    }

    fn send(&mut self, frame: &Frame) -> Result<(), Error<WriteError<S>>> {
        for byte in frame.as_bytes() {
            nb::block!(self.serial.write(*byte)).map_err(Error::Serial)?;
        }
        nb::block!(self.serial.flush()).map_err(Error::Serial)?;
        self.last_send = Some(self.clock.now_ms());
        Ok(())
    }
}
