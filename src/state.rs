use crate::protocol::{
    ControlField, Fan, FrameData, Mode, Power, RoomTemp, Settings, Setpoint, Symbol, UnknownSymbol,
    Vane, WideVane,
};

/// Stores `value` in `slot`, returning whether that changed anything.
fn assign<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        false
    } else {
        *slot = Some(value);
        true
    }
}

/// The last state the unit reported.
///
/// Every field starts out unset and is only filled in from frames the unit
/// sends. `dirty` is raised by any setter that changes a value and stays up
/// until [`DeviceState::clear_dirty`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviceState {
    power: Option<Power>,
    mode: Option<Mode>,
    setpoint: Option<Setpoint>,
    fan: Option<Fan>,
    vane: Option<Vane>,
    wide_vane: Option<WideVane>,
    room_temp: Option<RoomTemp>,
    #[cfg_attr(feature = "serde", serde(skip))]
    dirty: bool,
    connected: bool,
}

macro_rules! tracked_field {
    ($field:ident, $setter:ident, $ty:ty) => {
        pub fn $field(&self) -> Option<$ty> {
            self.$field
        }

        pub fn $setter(&mut self, value: $ty) -> bool {
            let changed = assign(&mut self.$field, value);
            self.dirty |= changed;
            changed
        }
    };
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    tracked_field!(power, set_power, Power);
    tracked_field!(mode, set_mode, Mode);
    tracked_field!(setpoint, set_setpoint, Setpoint);
    tracked_field!(fan, set_fan, Fan);
    tracked_field!(vane, set_vane, Vane);
    tracked_field!(wide_vane, set_wide_vane, WideVane);
    tracked_field!(room_temp, set_room_temp, RoomTemp);

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Every tracked field has been reported at least once.
    pub fn is_valid(&self) -> bool {
        self.power.is_some()
            && self.mode.is_some()
            && self.setpoint.is_some()
            && self.fan.is_some()
            && self.vane.is_some()
            && self.wide_vane.is_some()
            && self.room_temp.is_some()
    }

    /// Whether the unit has answered the connect request.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Applies decoded frame data. Fields the frame could not decode keep
    /// their previous value. Returns whether any tracked field changed.
    pub fn apply(&mut self, data: &FrameData) -> bool {
        match data {
            FrameData::Settings(settings) => self.apply_settings(settings),
            FrameData::RoomTemp(Some(room_temp)) => self.set_room_temp(*room_temp),
            FrameData::ConnectResponse => {
                self.connected = true;
                false
            }
            _ => false,
        }
    }

    fn apply_settings(&mut self, settings: &Settings) -> bool {
        let mut changed = false;
        if let Some(power) = settings.power {
            changed |= self.set_power(power);
        }
        if let Some(mode) = settings.mode {
            changed |= self.set_mode(mode);
        }
        if let Some(setpoint) = settings.setpoint {
            changed |= self.set_setpoint(setpoint);
        }
        if let Some(fan) = settings.fan {
            changed |= self.set_fan(fan);
        }
        if let Some(vane) = settings.vane {
            changed |= self.set_vane(vane);
        }
        if let Some(wide_vane) = settings.wide_vane {
            changed |= self.set_wide_vane(wide_vane);
        }
        changed
    }
}

/// Control values an operator asked for. Unset fields are left to whatever
/// the unit currently does.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WantedState {
    pub power: Option<Power>,
    pub mode: Option<Mode>,
    pub setpoint: Option<Setpoint>,
    pub fan: Option<Fan>,
    pub vane: Option<Vane>,
    pub wide_vane: Option<WideVane>,
}

fn check<S: Symbol>(value: Option<S>) -> Result<(), UnknownSymbol> {
    match value {
        Some(value) => value.encoded_as_byte().map(|_| ()),
        None => Ok(()),
    }
}

impl WantedState {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites the fields `other` sets.
    pub fn merge(&mut self, other: &WantedState) {
        self.power = other.power.or(self.power);
        self.mode = other.mode.or(self.mode);
        self.setpoint = other.setpoint.or(self.setpoint);
        self.fan = other.fan.or(self.fan);
        self.vane = other.vane.or(self.vane);
        self.wide_vane = other.wide_vane.or(self.wide_vane);
    }

    /// Fails for any set value that has no wire code.
    pub fn validate(&self) -> Result<(), UnknownSymbol> {
        check(self.power)?;
        check(self.mode)?;
        check(self.setpoint)?;
        check(self.fan)?;
        check(self.vane)?;
        check(self.wide_vane)
    }

    /// Sets one field from its textual form, e.g. `("temp", "21.5")` or
    /// `("dir", "<<")`.
    pub fn with(mut self, field: &str, value: &str) -> Result<Self, UnknownSymbol> {
        match field.parse::<ControlField>()? {
            ControlField::Power => self.power = Some(value.parse()?),
            ControlField::Mode => self.mode = Some(value.parse()?),
            ControlField::Temp => self.setpoint = Some(value.parse()?),
            ControlField::Fan => self.fan = Some(value.parse()?),
            ControlField::Vane => self.vane = Some(value.parse()?),
            ControlField::WideVane => self.wide_vane = Some(value.parse()?),
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Frame;

    fn settings_frame(fan: u8) -> Frame {
        Frame::build(0x62, &[
            0x02, 0x00, 0x00, 0x01, 0x03, 0x07, fan, 0x00,
            0x00, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]).unwrap()
    }

    #[test]
    fn dirty_test() {
        let mut state = DeviceState::new();
        assert!(!state.is_dirty());

        assert!(state.set_power(Power::On));
        assert!(state.is_dirty());

        state.clear_dirty();
        assert!(!state.set_power(Power::On));
        assert!(!state.is_dirty());

        assert!(state.set_power(Power::Off));
        assert!(state.is_dirty());
    }

    #[test]
    fn valid_test() {
        let mut state = DeviceState::new();
        state.apply(&FrameData::parse(&settings_frame(0x00)));
        assert!(!state.is_valid());

        state.set_room_temp(RoomTemp(22));
        assert!(state.is_valid());
    }

    #[test]
    fn apply_settings_test() {
        let mut state = DeviceState::new();
        assert!(state.apply(&FrameData::parse(&settings_frame(0x03))));
        assert_eq!(state.power(), Some(Power::On));
        assert_eq!(state.mode(), Some(Mode::Cool));
        assert_eq!(state.setpoint(), Some(Setpoint::whole(24)));
        assert_eq!(state.fan(), Some(Fan::F2));
        assert_eq!(state.vane(), Some(Vane::Auto));
        assert_eq!(state.wide_vane(), Some(WideVane::Center));
        assert_eq!(state.room_temp(), None);

        state.clear_dirty();
        assert!(!state.apply(&FrameData::parse(&settings_frame(0x03))));
        assert!(!state.is_dirty());
    }

    #[test]
    fn unknown_code_keeps_previous_value_test() {
        let mut state = DeviceState::new();
        state.apply(&FrameData::parse(&settings_frame(0x03)));

        let frame = Frame::build(0x62, &[
            0x02, 0x00, 0x00, 0x00, 0x01, 0x0a, 0x0f, 0x05,
            0x00, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]).unwrap();
        assert!(state.apply(&FrameData::parse(&frame)));

        assert_eq!(state.fan(), Some(Fan::F2));
        assert_eq!(state.power(), Some(Power::Off));
        assert_eq!(state.mode(), Some(Mode::Heat));
        assert_eq!(state.setpoint(), Some(Setpoint::whole(21)));
        assert_eq!(state.vane(), Some(Vane::V5));
        assert_eq!(state.wide_vane(), Some(WideVane::Swing));
    }

    #[test]
    fn apply_room_temp_test() {
        let mut state = DeviceState::new();
        let frame = Frame::build(0x62, &[0x03, 0x00, 0x00, 0x0c]).unwrap();
        assert!(state.apply(&FrameData::parse(&frame)));
        assert_eq!(state.room_temp(), Some(RoomTemp(22)));
        assert_eq!(state.power(), None);
    }

    #[test]
    fn apply_connect_response_test() {
        let mut state = DeviceState::new();
        let frame = Frame::build(0x7a, &[0x00]).unwrap();
        assert!(!state.apply(&FrameData::parse(&frame)));
        assert!(state.is_connected());
        assert!(!state.is_dirty());
    }

    #[test]
    fn merge_test() {
        let mut wanted = WantedState {
            power: Some(Power::On),
            mode: Some(Mode::Heat),
            ..WantedState::default()
        };
        wanted.merge(&WantedState {
            mode: Some(Mode::Cool),
            setpoint: Some(Setpoint::whole(22)),
            ..WantedState::default()
        });
        assert_eq!(wanted, WantedState {
            power: Some(Power::On),
            mode: Some(Mode::Cool),
            setpoint: Some(Setpoint::whole(22)),
            ..WantedState::default()
        });
        assert!(!wanted.is_empty());
        assert!(WantedState::default().is_empty());
    }

    #[test]
    fn validate_test() {
        let wanted = WantedState {
            setpoint: Some(Setpoint::whole(22)),
            ..WantedState::default()
        };
        assert_eq!(wanted.validate(), Ok(()));

        let wanted = WantedState {
            setpoint: Some(Setpoint::from_half_degrees(90)),
            ..WantedState::default()
        };
        assert_eq!(wanted.validate(), Err(UnknownSymbol { table: "temp" }));
    }

    #[test]
    fn with_test() {
        let wanted = WantedState::default()
            .with("power", "ON").unwrap()
            .with("temp", "21.5").unwrap()
            .with("dir", "<<").unwrap()
            .with("fan", "quiet").unwrap();
        assert_eq!(wanted, WantedState {
            power: Some(Power::On),
            setpoint: Some(Setpoint::with_half(21)),
            wide_vane: Some(WideVane::LL),
            fan: Some(Fan::Quiet),
            ..WantedState::default()
        });

        let unset = WantedState::default();
        assert_eq!(unset.with("mode", "BLOW"), Err(UnknownSymbol { table: "mode" }));
        assert_eq!(unset.with("isee", "ON"), Err(UnknownSymbol { table: "field" }));
        assert_eq!(WantedState::default().with("temp", "12"), Err(UnknownSymbol { table: "temp" }));
    }
}
