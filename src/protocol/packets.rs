use super::encoding::{Symbol, UnknownSymbol};
use super::frame::{DataType, Frame};
use super::types::ControlField;
use crate::state::{DeviceState, WantedState};

const CONNECT_REQUEST_DATA: [u8; 2] = [0xca, 0x01];

pub const INFO_REQUEST_LEN: usize = 0x10;
pub const SET_REQUEST_LEN: usize = 0x10;

const SET_REQUEST_ID: u8 = 0x01;

/// Has to go out once before the unit answers anything else.
pub fn connect_request() -> Frame {
    Frame::with_data(DataType::ConnectRequest, &CONNECT_REQUEST_DATA)
}

#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InfoType {
    Settings     = 0x02,
    RoomTemp     = 0x03,
    Type4        = 0x04,
    Timers       = 0x05,
    Status       = 0x06,
    MaybeStandby = 0x09,
    Unknown      = 0xff,
}

impl From<u8> for InfoType {
    fn from(byte: u8) -> Self {
        match byte {
            0x02 => InfoType::Settings,
            0x03 => InfoType::RoomTemp,
            0x04 => InfoType::Type4,
            0x05 => InfoType::Timers,
            0x06 => InfoType::Status,
            0x09 => InfoType::MaybeStandby,
            _ => InfoType::Unknown,
        }
    }
}

/// What the poller asks for, in turn, while it has nothing to set.
pub const INFO_ROTATION: [InfoType; 2] = [InfoType::Settings, InfoType::RoomTemp];

pub fn info_request(info_type: InfoType) -> Frame {
    let mut data = [0u8; INFO_REQUEST_LEN];
    data[0] = info_type as u8;
    Frame::with_data(DataType::GetInfoRequest, &data)
}

/// Data of a set request. Only fields that were written are flagged in
/// byte 1; the unit leaves every other field alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SetRequestData {
    data: [u8; SET_REQUEST_LEN],
}

impl Default for SetRequestData {
    fn default() -> Self {
        Self::new()
    }
}

impl SetRequestData {
    pub fn new() -> Self {
        let mut data = [0u8; SET_REQUEST_LEN];
        data[0] = SET_REQUEST_ID;
        Self { data }
    }

    fn write<S: Symbol>(&mut self, field: ControlField, value: S) -> Result<(), UnknownSymbol> {
        self.data[field.offset()] = value.encoded_as_byte()?;
        self.data[1] |= field.flag();
        Ok(())
    }

    pub fn flags(&self) -> u8 {
        self.data[1]
    }

    pub fn is_empty(&self) -> bool {
        self.flags() == 0
    }

    pub fn data(&self) -> &[u8; SET_REQUEST_LEN] {
        &self.data
    }

    pub fn to_frame(&self) -> Frame {
        Frame::with_data(DataType::SetRequest, &self.data)
    }
}

/// Writes `wanted` into `request` when it is set and differs from `current`.
fn write_changed<S: Symbol>(
    request: &mut SetRequestData,
    field: ControlField,
    current: Option<S>,
    wanted: Option<S>,
) -> Result<(), UnknownSymbol> {
    match wanted {
        Some(value) if current != Some(value) => request.write(field, value),
        _ => Ok(()),
    }
}

/// Collects every field where `wanted` asks for something the unit does not
/// report yet.
pub fn set_request_data(
    current: &DeviceState,
    wanted: &WantedState,
) -> Result<SetRequestData, UnknownSymbol> {
    let mut request = SetRequestData::new();
    let r = &mut request;
    for field in ControlField::ALL {
        match field {
            ControlField::Power => write_changed(r, field, current.power(), wanted.power)?,
            ControlField::Mode => write_changed(r, field, current.mode(), wanted.mode)?,
            ControlField::Temp => write_changed(r, field, current.setpoint(), wanted.setpoint)?,
            ControlField::Fan => write_changed(r, field, current.fan(), wanted.fan)?,
            ControlField::Vane => write_changed(r, field, current.vane(), wanted.vane)?,
            ControlField::WideVane => {
                write_changed(r, field, current.wide_vane(), wanted.wide_vane)?
            }
        }
    }
    Ok(request)
}

/// The set request that moves `current` towards `wanted`, or `None` once
/// nothing differs.
pub fn diff(current: &DeviceState, wanted: &WantedState) -> Result<Option<Frame>, UnknownSymbol> {
    let request = set_request_data(current, wanted)?;
    if request.is_empty() {
        Ok(None)
    } else {
        Ok(Some(request.to_frame()))
    }
}
