use core::fmt;
use core::str::FromStr;

use super::encoding::{LookupTable, Symbol, UnknownSymbol};

symbol_enum! {
    pub enum Power in POWER ("power") {
        Off = 0x00 => "OFF",
        On  = 0x01 => "ON",
    }
}

symbol_enum! {
    pub enum Mode in MODE ("mode") {
        Heat = 0x01 => "HEAT",
        Dry  = 0x02 => "DRY",
        Cool = 0x03 => "COOL",
        Fan  = 0x07 => "FAN",
        Auto = 0x08 => "AUTO",
    }
}

symbol_enum! {
    pub enum Fan in FAN ("fan") {
        Auto  = 0x00 => "AUTO",
        Quiet = 0x01 => "QUIET",
        F1    = 0x02 => "1",
        F2    = 0x03 => "2",
        F3    = 0x05 => "3",
        F4    = 0x06 => "4",
    }
}

symbol_enum! {
    /// Vertical vane position.
    pub enum Vane in VANE ("vane") {
        Auto  = 0x00 => "AUTO",
        V1    = 0x01 => "1",
        V2    = 0x02 => "2",
        V3    = 0x03 => "3",
        V4    = 0x04 => "4",
        V5    = 0x05 => "5",
        Swing = 0x07 => "SWING",
    }
}

symbol_enum! {
    /// Horizontal airflow direction.
    ///
    /// `NotApplicable` (0x00) is reported by units without a wide vane.
    pub enum WideVane in WIDE_VANE ("dir") {
        NotApplicable = 0x00 => "NA",
        LL     = 0x01 => "<<",
        L      = 0x02 => "<",
        Center = 0x03 => "|",
        R      = 0x04 => ">",
        RR     = 0x05 => ">>",
        LR     = 0x08 => "<>",
        Swing  = 0x0c => "SWING",
    }
}

/// Target temperature, stored in half degrees Celsius.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "f32", try_from = "f32"))]
pub struct Setpoint(u8);

impl Setpoint {
    pub const fn whole(celsius: u8) -> Self {
        Setpoint(celsius.saturating_mul(2))
    }

    /// `celsius` + 0.5 degrees.
    pub const fn with_half(celsius: u8) -> Self {
        Setpoint(celsius.saturating_mul(2).saturating_add(1))
    }

    pub const fn from_half_degrees(half_degrees: u8) -> Self {
        Setpoint(half_degrees)
    }

    pub const fn half_degrees(&self) -> u8 {
        self.0
    }
}

// Whole degrees count down from 0x00, half degrees from 0x10.
pub static SETPOINT: LookupTable<Setpoint> = LookupTable::new(
    "temp",
    &[
        (Setpoint::whole(31), 0x00),
        (Setpoint::whole(30), 0x01),
        (Setpoint::whole(29), 0x02),
        (Setpoint::whole(28), 0x03),
        (Setpoint::whole(27), 0x04),
        (Setpoint::whole(26), 0x05),
        (Setpoint::whole(25), 0x06),
        (Setpoint::whole(24), 0x07),
        (Setpoint::whole(23), 0x08),
        (Setpoint::whole(22), 0x09),
        (Setpoint::whole(21), 0x0a),
        (Setpoint::whole(20), 0x0b),
        (Setpoint::whole(19), 0x0c),
        (Setpoint::whole(18), 0x0d),
        (Setpoint::whole(17), 0x0e),
        (Setpoint::whole(16), 0x0f),
        (Setpoint::with_half(31), 0x10),
        (Setpoint::with_half(30), 0x11),
        (Setpoint::with_half(29), 0x12),
        (Setpoint::with_half(28), 0x13),
        (Setpoint::with_half(27), 0x14),
        (Setpoint::with_half(26), 0x15),
        (Setpoint::with_half(25), 0x16),
        (Setpoint::with_half(24), 0x17),
        (Setpoint::with_half(23), 0x18),
        (Setpoint::with_half(22), 0x19),
        (Setpoint::with_half(21), 0x1a),
        (Setpoint::with_half(20), 0x1b),
        (Setpoint::with_half(19), 0x1c),
        (Setpoint::with_half(18), 0x1d),
        (Setpoint::with_half(17), 0x1e),
        (Setpoint::with_half(16), 0x1f),
    ],
);

impl Symbol for Setpoint {
    fn table() -> &'static LookupTable<Self> {
        &SETPOINT
    }
}

impl fmt::Display for Setpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

/// Accepts `"24"`, `"24.0"` and `"24.5"`. Anything that is not in the
/// setpoint table is rejected.
impl FromStr for Setpoint {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = UnknownSymbol { table: SETPOINT.name() };
        let s = s.trim();
        let (whole, half) = match s.split_once('.') {
            None => (s, false),
            Some((whole, "0")) | Some((whole, "00")) => (whole, false),
            Some((whole, "5")) | Some((whole, "50")) => (whole, true),
            Some(_) => return Err(unknown),
        };
        let celsius: u8 = whole.parse().map_err(|_| unknown)?;
        let setpoint = match (celsius.checked_mul(2), half) {
            (Some(doubled), false) => Setpoint(doubled),
            (Some(doubled), true) => Setpoint(doubled.checked_add(1).ok_or(unknown)?),
            (None, _) => return Err(unknown),
        };
        SETPOINT.encode(setpoint)?;
        Ok(setpoint)
    }
}

impl TryFrom<f32> for Setpoint {
    type Error = UnknownSymbol;

    fn try_from(celsius: f32) -> Result<Self, Self::Error> {
        let doubled = celsius * 2.0;
        let half_degrees = doubled as u8;
        let setpoint = Setpoint(half_degrees);
        if half_degrees as f32 != doubled {
            return Err(UnknownSymbol { table: SETPOINT.name() });
        }
        SETPOINT.encode(setpoint)?;
        Ok(setpoint)
    }
}

impl From<Setpoint> for f32 {
    fn from(setpoint: Setpoint) -> f32 {
        setpoint.0 as f32 / 2.0
    }
}

/// Room temperature as reported by the unit, in whole degrees Celsius.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoomTemp(pub u8);

pub static ROOM_TEMP: LookupTable<RoomTemp> = LookupTable::new(
    "room_temp",
    &[
        (RoomTemp(10), 0x00),
        (RoomTemp(11), 0x01),
        (RoomTemp(12), 0x02),
        (RoomTemp(13), 0x03),
        (RoomTemp(14), 0x04),
        (RoomTemp(15), 0x05),
        (RoomTemp(16), 0x06),
        (RoomTemp(17), 0x07),
        (RoomTemp(18), 0x08),
        (RoomTemp(19), 0x09),
        (RoomTemp(20), 0x0a),
        (RoomTemp(21), 0x0b),
        (RoomTemp(22), 0x0c),
        (RoomTemp(23), 0x0d),
        (RoomTemp(24), 0x0e),
        (RoomTemp(25), 0x0f),
        (RoomTemp(26), 0x10),
        (RoomTemp(27), 0x11),
        (RoomTemp(28), 0x12),
        (RoomTemp(29), 0x13),
        (RoomTemp(30), 0x14),
        (RoomTemp(31), 0x15),
        (RoomTemp(32), 0x16),
        (RoomTemp(33), 0x17),
        (RoomTemp(34), 0x18),
        (RoomTemp(35), 0x19),
        (RoomTemp(36), 0x1a),
        (RoomTemp(37), 0x1b),
        (RoomTemp(38), 0x1c),
        (RoomTemp(39), 0x1d),
        (RoomTemp(40), 0x1e),
        (RoomTemp(41), 0x1f),
    ],
);

impl Symbol for RoomTemp {
    fn table() -> &'static LookupTable<Self> {
        &ROOM_TEMP
    }
}

impl fmt::Display for RoomTemp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fields a set request can change.
///
/// Each field owns a flag bit in byte 1 of the set request data and the data
/// offset of its value. Settings responses carry the values at the same
/// offsets.
//
//  0   1   2   3   4   5   6   7   8   9  10  11  12  13  14  15
// ID  FL  xx  PW  MO  TM  FA  VA  xx  xx  WV  xx  xx  xx  xx  xx
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ControlField {
    Power,
    Mode,
    Temp,
    Fan,
    Vane,
    WideVane,
}

impl ControlField {
    pub const ALL: [ControlField; 6] = [
        ControlField::Power,
        ControlField::Mode,
        ControlField::Temp,
        ControlField::Fan,
        ControlField::Vane,
        ControlField::WideVane,
    ];

    pub const fn flag(self) -> u8 {
        match self {
            ControlField::Power    => 0x01,
            ControlField::Mode     => 0x02,
            ControlField::Temp     => 0x04,
            ControlField::Fan      => 0x08,
            ControlField::Vane     => 0x10,
            ControlField::WideVane => 0x80,
        }
    }

    pub const fn offset(self) -> usize {
        match self {
            ControlField::Power    => 3,
            ControlField::Mode     => 4,
            ControlField::Temp     => 5,
            ControlField::Fan      => 6,
            ControlField::Vane     => 7,
            ControlField::WideVane => 10,
        }
    }

    pub fn table_name(self) -> &'static str {
        match self {
            ControlField::Power    => POWER.name(),
            ControlField::Mode     => MODE.name(),
            ControlField::Temp     => SETPOINT.name(),
            ControlField::Fan      => FAN.name(),
            ControlField::Vane     => VANE.name(),
            ControlField::WideVane => WIDE_VANE.name(),
        }
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for ControlField {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ControlField::ALL
            .into_iter()
            .find(|field| field.table_name().eq_ignore_ascii_case(s))
            .ok_or(UnknownSymbol { table: "field" })
    }
}
