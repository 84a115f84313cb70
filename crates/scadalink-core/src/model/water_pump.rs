use serde::Serialize;

use super::{GroupProfile, GroupState, TagUpdate, assign, coerce_bool};

/// Only the four pumps accept commands; status and sensor tags are read-only.
pub const PUMP_TAGS: &[&str] = &["Pump1_1", "Pump1_2", "Pump2_1", "Pump2_2"];

/// Flow, level, pressure, temperature and vibration readings of the
/// two-line pump station, plus pump run and status bits.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct WaterPumpState {
    pub flow1: f64,
    pub flow2: f64,
    pub level1: f64,
    pub level2: f64,
    pub pressure1: f64,
    pub pressure2: f64,
    pub pressure3: f64,
    pub pressure4: f64,
    pub temp1_1: f64,
    pub temp1_2: f64,
    pub temp2_1: f64,
    pub temp2_2: f64,
    pub temp_vibration: f64,
    pub x_axis: f64,
    pub y_axis: f64,
    pub z_axis: f64,

    pub pump1_1: bool,
    pub pump1_2: bool,
    pub pump2_1: bool,
    pub pump2_2: bool,
    pub status1_1: bool,
    pub status1_2: bool,
    pub status2_1: bool,
    pub status2_2: bool,
}

impl GroupState for WaterPumpState {
    const TAGS: &'static [&'static str] = &[
        "Flow_1",
        "Flow_2",
        "Level_1",
        "Level_2",
        "Pressure_1",
        "Pressure_2",
        "Pressure_3",
        "Pressure_4",
        "Temp1_1",
        "Temp1_2",
        "Temp2_1",
        "Temp2_2",
        "Temp_Vibration",
        "X_Axis",
        "Y_Axis",
        "Z_Axis",
        "Pump1_1",
        "Pump1_2",
        "Pump2_1",
        "Pump2_2",
        "Status1_1",
        "Status1_2",
        "Status2_1",
        "Status2_2",
    ];

    fn default_profile() -> GroupProfile {
        GroupProfile::new("water-pump", "WaterPump", "express", Self::TAGS)
            .with_controllable(PUMP_TAGS)
    }

    fn apply_reading(&mut self, name: &str, value: f64) -> TagUpdate {
        match name {
            "Flow_1" => assign(&mut self.flow1, value),
            "Flow_2" => assign(&mut self.flow2, value),
            "Level_1" => assign(&mut self.level1, value),
            "Level_2" => assign(&mut self.level2, value),
            "Pressure_1" => assign(&mut self.pressure1, value),
            "Pressure_2" => assign(&mut self.pressure2, value),
            "Pressure_3" => assign(&mut self.pressure3, value),
            "Pressure_4" => assign(&mut self.pressure4, value),
            "Temp1_1" => assign(&mut self.temp1_1, value),
            "Temp1_2" => assign(&mut self.temp1_2, value),
            "Temp2_1" => assign(&mut self.temp2_1, value),
            "Temp2_2" => assign(&mut self.temp2_2, value),
            "Temp_Vibration" => assign(&mut self.temp_vibration, value),
            "X_Axis" => assign(&mut self.x_axis, value),
            "Y_Axis" => assign(&mut self.y_axis, value),
            "Z_Axis" => assign(&mut self.z_axis, value),
            "Pump1_1" => assign(&mut self.pump1_1, coerce_bool(value)),
            "Pump1_2" => assign(&mut self.pump1_2, coerce_bool(value)),
            "Pump2_1" => assign(&mut self.pump2_1, coerce_bool(value)),
            "Pump2_2" => assign(&mut self.pump2_2, coerce_bool(value)),
            "Status1_1" => assign(&mut self.status1_1, coerce_bool(value)),
            "Status1_2" => assign(&mut self.status1_2, coerce_bool(value)),
            "Status2_1" => assign(&mut self.status2_1, coerce_bool(value)),
            "Status2_2" => assign(&mut self.status2_2, coerce_bool(value)),
            _ => TagUpdate::Unknown,
        }
    }
}
