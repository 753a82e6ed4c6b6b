use log::warn;

use super::encoding::Symbol;
use super::frame::{DataType, Frame};
use super::packets::InfoType;
use super::types::{ControlField, Fan, Mode, Power, RoomTemp, Setpoint, Vane, WideVane};

const ROOM_TEMP_OFFSET: usize = 3;

/// What a validated frame carries, as far as the device state is concerned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FrameData {
    Settings(Settings),
    RoomTemp(Option<RoomTemp>),
    ConnectResponse,
    SetResponse,
    /// One of our own requests, looped back on the line.
    Echo(DataType),
    Other(DataType, InfoType),
}

impl FrameData {
    pub fn parse(frame: &Frame) -> Self {
        let data_type = frame.data_type();
        let data = frame.data();
        let info_type = InfoType::from(data.first().copied().unwrap_or(InfoType::Unknown as u8));

        match (data_type, info_type) {
            (DataType::ConnectResponse, _) => FrameData::ConnectResponse,
            (DataType::SetResponse, _) => FrameData::SetResponse,
            (t, _) if t.is_request() => FrameData::Echo(t),
            (_, InfoType::Settings) => FrameData::Settings(Settings::parse(data)),
            (_, InfoType::RoomTemp) => FrameData::RoomTemp(field(data, ROOM_TEMP_OFFSET)),
            (t, info) => FrameData::Other(t, info),
        }
    }
}

/// Control fields from a settings response. A field is `None` when its code
/// was unknown or the data was too short to hold it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Settings {
    pub power: Option<Power>,
    pub mode: Option<Mode>,
    pub setpoint: Option<Setpoint>,
    pub fan: Option<Fan>,
    pub vane: Option<Vane>,
    pub wide_vane: Option<WideVane>,
}

impl Settings {
    fn parse(data: &[u8]) -> Self {
        Self {
            power: field(data, ControlField::Power.offset()),
            mode: field(data, ControlField::Mode.offset()),
            setpoint: field(data, ControlField::Temp.offset()),
            fan: field(data, ControlField::Fan.offset()),
            vane: field(data, ControlField::Vane.offset()),
            wide_vane: field(data, ControlField::WideVane.offset()),
        }
    }
}

fn field<S: Symbol>(data: &[u8], offset: usize) -> Option<S> {
    match data.get(offset) {
        Some(code) => S::decoded_from_byte(*code),
        None => {
            warn!("No {} in {} data bytes", S::table().name(), data.len());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_frame(data_type: u8) -> Frame {
        Frame::build(data_type, &[
            0x02, 0x00, 0x00, 0x01, 0x03, 0x07, 0x00, 0x07,
            0x00, 0x00, 0x03, 0x94, 0x00, 0x00, 0x00, 0x00,
        ]).unwrap()
    }

    #[test]
    fn settings_test() {
        assert_eq!(
            FrameData::parse(&settings_frame(0x62)),
            FrameData::Settings(Settings {
                power: Some(Power::On),
                mode: Some(Mode::Cool),
                setpoint: Some(Setpoint::whole(24)),
                fan: Some(Fan::Auto),
                vane: Some(Vane::Swing),
                wide_vane: Some(WideVane::Center),
            })
        );
    }

    #[test]
    fn settings_unknown_code_test() {
        let frame = Frame::build(0x62, &[
            0x02, 0x00, 0x00, 0x01, 0x03, 0x07, 0x04, 0x07,
            0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]).unwrap();
        match FrameData::parse(&frame) {
            FrameData::Settings(settings) => {
                assert_eq!(settings.fan, None);
                assert_eq!(settings.power, Some(Power::On));
                assert_eq!(settings.wide_vane, Some(WideVane::Center));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn short_settings_test() {
        let frame = Frame::build(0x62, &[0x02, 0x00, 0x00, 0x00, 0x08]).unwrap();
        assert_eq!(
            FrameData::parse(&frame),
            FrameData::Settings(Settings {
                power: Some(Power::Off),
                mode: Some(Mode::Auto),
                ..Settings::default()
            })
        );
    }

    #[test]
    fn room_temp_test() {
        let frame = Frame::build(0x62, &[0x03, 0x00, 0x00, 0x0b, 0x00]).unwrap();
        assert_eq!(FrameData::parse(&frame), FrameData::RoomTemp(Some(RoomTemp(21))));

        let frame = Frame::build(0x62, &[0x03, 0x00, 0x00, 0x42]).unwrap();
        assert_eq!(FrameData::parse(&frame), FrameData::RoomTemp(None));
    }

    #[test]
    fn responses_test() {
        let connected = Frame::build(0x7a, &[0x00]).unwrap();
        assert_eq!(FrameData::parse(&connected), FrameData::ConnectResponse);
        assert_eq!(FrameData::parse(&settings_frame(0x61)), FrameData::SetResponse);
    }

    #[test]
    fn echo_test() {
        assert_eq!(
            FrameData::parse(&settings_frame(0x42)),
            FrameData::Echo(DataType::GetInfoRequest)
        );
    }

    #[test]
    fn other_test() {
        let timers = Frame::build(0x62, &[0x05, 0x00]).unwrap();
        assert_eq!(
            FrameData::parse(&timers),
            FrameData::Other(DataType::GetInfoResponse, InfoType::Timers)
        );
        let empty = Frame::build(0x62, &[]).unwrap();
        assert_eq!(
            FrameData::parse(&empty),
            FrameData::Other(DataType::GetInfoResponse, InfoType::Unknown)
        );
    }
}
