use serde::{Deserialize, Serialize};
use strum_macros::Display;

pub const DEFAULT_TLE: [&str; 2] = [
    "1 47456U 21006AV  22146.88271796  .00014504  00000+0  76123-3 0  9993",
    "2 47456  97.4467 206.6372 0010079   0.1840 359.9395 15.15793776 74006",
];

// 10 m ADCS module on a 3U bus without panels.
const DEFAULT_ADCS_MODULE: &str = "100";
const DEFAULT_BUS_SIZE: u32 = 3;
const DEFAULT_BUS_TYPE: u32 = 206;
const DEFAULT_INERTIA: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0];
const DEFAULT_FRONT_AREA: f64 = 99.0;
const DEFAULT_STEP_SIZE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, clap::ValueEnum)]
#[strum(serialize_all = "snake_case")]
pub enum Maneuver {
    #[serde(rename = "1")]
    Detumbling,
    #[serde(rename = "2")]
    SunPointing,
    #[serde(rename = "3")]
    Nadir,
    #[serde(rename = "4")]
    TargetTracking,
    #[serde(rename = "5")]
    FinePointing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, clap::ValueEnum)]
pub enum AlignmentAxis {
    #[serde(rename = "1")]
    #[strum(to_string = "+X")]
    PosX,
    #[serde(rename = "2")]
    #[strum(to_string = "-X")]
    NegX,
    #[serde(rename = "3")]
    #[strum(to_string = "+Y")]
    PosY,
    #[serde(rename = "4")]
    #[strum(to_string = "-Y")]
    NegY,
    #[serde(rename = "5")]
    #[strum(to_string = "+Z")]
    PosZ,
    #[serde(rename = "6")]
    #[strum(to_string = "-Z")]
    NegZ,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub size: u32,
    #[serde(rename = "type")]
    pub kind: u32,
    /// Row-major inertia matrix followed by the front area.
    pub content: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    /// The two TLE lines.
    pub content: [String; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOptions {
    pub maneuver: Maneuver,
    /// Simulated time span, minutes.
    pub span: u32,
    #[serde(rename = "step size")]
    pub step_size: f64,
    #[serde(rename = "alignment axis")]
    pub alignment_axis: AlignmentAxis,
    #[serde(rename = "initial omega")]
    pub initial_omega: f64,
    #[serde(rename = "fine cmd")]
    pub fine_cmd: Vec<String>,
}

/// Request body for the simulation service, in its wire field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub name: String,
    #[serde(rename = "adcs module")]
    pub adcs_module: String,
    pub bus: Bus,
    pub orbit: Orbit,
    #[serde(rename = "simulation option")]
    pub options: SimulationOptions,
}

impl SimulationConfig {
    pub fn new(name: &str, maneuver: Maneuver, span_minutes: u32, alignment_axis: AlignmentAxis) -> Self {
        let mut content = DEFAULT_INERTIA.to_vec();
        content.push(DEFAULT_FRONT_AREA);
        Self {
            name: name.to_string(),
            adcs_module: DEFAULT_ADCS_MODULE.to_string(),
            bus: Bus {
                size: DEFAULT_BUS_SIZE,
                kind: DEFAULT_BUS_TYPE,
                content,
            },
            orbit: Orbit {
                content: DEFAULT_TLE.map(str::to_string),
            },
            options: SimulationOptions {
                maneuver,
                span: span_minutes,
                step_size: DEFAULT_STEP_SIZE,
                alignment_axis,
                initial_omega: 0.0,
                fine_cmd: vec![String::new(); 4],
            },
        }
    }

    pub fn tle(&self) -> &[String; 2] {
        &self.orbit.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_names() {
        let config = SimulationConfig::new("Test", Maneuver::Nadir, 10, AlignmentAxis::PosX);
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["name"], "Test");
        assert_eq!(json["adcs module"], "100");
        assert_eq!(json["bus"]["type"], 206);
        assert_eq!(json["bus"]["content"].as_array().unwrap().len(), 10);
        assert_eq!(json["orbit"]["content"][0], DEFAULT_TLE[0]);

        let options = &json["simulation option"];
        assert_eq!(options["maneuver"], "3");
        assert_eq!(options["span"], 10);
        assert_eq!(options["step size"], 0.01);
        assert_eq!(options["alignment axis"], "1");
        assert_eq!(options["fine cmd"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn reads_back_enum_codes() {
        let config = SimulationConfig::new("Back", Maneuver::FinePointing, 3, AlignmentAxis::NegZ);
        let text = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert!(text.contains("\"maneuver\":\"5\""));
        assert!(text.contains("\"alignment axis\":\"6\""));
    }

    #[test]
    fn display_names() {
        assert_eq!(Maneuver::SunPointing.to_string(), "sun_pointing");
        assert_eq!(AlignmentAxis::NegY.to_string(), "-Y");
    }
}
