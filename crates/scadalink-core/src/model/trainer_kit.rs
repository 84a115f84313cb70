use serde::Serialize;

use super::{GroupProfile, GroupState, TagUpdate, assign, coerce_bool, coerce_int};

/// Indicator lamps, buttons, switches and two analog channels of the
/// training kit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct TrainerKitState {
    pub red_lamp: bool,
    pub yellow_lamp: bool,
    pub green_lamp: bool,
    pub buzzer_lamp: bool,
    pub fan: bool,
    pub red_button: bool,
    pub green_button: bool,
    pub switch1: bool,
    pub switch2: bool,
    pub thermo_couple: i32,
    pub current_injector: i32,
}

impl GroupState for TrainerKitState {
    const TAGS: &'static [&'static str] = &[
        "BuzzerLamp",
        "currentInjector",
        "Fan",
        "greenButton",
        "greenLamp",
        "redButton",
        "redLamp",
        "switch1",
        "switch2",
        "thermoCople",
        "yellowLamp",
    ];

    fn default_profile() -> GroupProfile {
        GroupProfile::new("trainer-kit", "TrainerKit", "express", Self::TAGS)
    }

    fn apply_reading(&mut self, name: &str, value: f64) -> TagUpdate {
        match name {
            "BuzzerLamp" => assign(&mut self.buzzer_lamp, coerce_bool(value)),
            "Fan" => assign(&mut self.fan, coerce_bool(value)),
            "greenButton" => assign(&mut self.green_button, coerce_bool(value)),
            "greenLamp" => assign(&mut self.green_lamp, coerce_bool(value)),
            "redButton" => assign(&mut self.red_button, coerce_bool(value)),
            "redLamp" => assign(&mut self.red_lamp, coerce_bool(value)),
            "switch1" => assign(&mut self.switch1, coerce_bool(value)),
            "switch2" => assign(&mut self.switch2, coerce_bool(value)),
            "yellowLamp" => assign(&mut self.yellow_lamp, coerce_bool(value)),
            "thermoCople" => assign(&mut self.thermo_couple, coerce_int(value)),
            "currentInjector" => assign(&mut self.current_injector, coerce_int(value)),
            _ => TagUpdate::Unknown,
        }
    }
}
