/// Line speed the unit talks at. The serial peripheral must also be set up
/// for 8 data bits, even parity and one stop bit (2400 8E1).
pub const BAUD_RATE: u32 = 2400;

/// Timing and buffering knobs for [`crate::MitsubishiDevice`].
///
/// The defaults are what the unit is known to tolerate; at 2400 baud a
/// 22 byte frame alone takes close to 100ms on the wire.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Minimum time between two transmissions.
    pub info_interval_ms: u32,
    /// Quiet time after a set request before anything else is sent.
    pub settle_delay_ms: u32,
    /// Pause between two polling cycles in [`crate::MitsubishiDevice::run`].
    pub idle_delay_ms: u32,
    /// Most bytes drained from the serial port per polling cycle.
    pub read_batch: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            info_interval_ms: 1000,
            settle_delay_ms: 1000,
            idle_delay_ms: 100,
            read_batch: 22,
        }
    }
}
