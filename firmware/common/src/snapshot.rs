//! Status snapshot model and its JSON wire format.
//!
//! One line of JSON describes the whole farm. Decoding uses `serde` derives on
//! private wire structs that mirror the JSON exactly, then converts them into
//! the model types the layout draws from. Parsing goes through
//! `serde-json-core`, so it never allocates.
//!
//! ```json
//! {"machines":[{"machine":"N1","is_online":true,
//!               "build":"Health: Rel PS5","changelist":24302,
//!               "step":"Deploy-Playstation","duration":5580}],
//!  "recent":{"build":"Deploy: x","changelist":1,"age":0,"result":"SUCCESS"}}
//! ```
//!
//! A frame is rejected as a whole when it is malformed, misses a required
//! field, has a string longer than its capacity or lists more than
//! `MAX_MACHINES` machines.

use core::fmt;

use heapless::{String, Vec};
use serde::{Deserialize, Deserializer, de};

use crate::config::{BUILD_NAME_LEN, MACHINE_NAME_LEN, MAX_MACHINES, STEP_NAME_LEN, UNESCAPE_LEN};

pub type MachineName = String<MACHINE_NAME_LEN>;
pub type BuildName = String<BUILD_NAME_LEN>;
pub type StepName = String<STEP_NAME_LEN>;

// =============================================================================
// Model
// =============================================================================

/// How a finished build ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BuildResult {
    Success,
    Aborted,
    /// Anything that is not a success or an abort.
    Failure,
}

impl BuildResult {
    /// `"SUCCESS"` and `"ABORTED"` are recognized; every other string is a failure.
    pub fn from_wire(text: &str) -> Self {
        match text {
            "SUCCESS" => Self::Success,
            "ABORTED" => Self::Aborted,
            _ => Self::Failure,
        }
    }
}

impl<'de> Deserialize<'de> for BuildResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResultVisitor;

        impl de::Visitor<'_> for ResultVisitor {
            type Value = BuildResult;

            fn expecting(
                &self,
                f: &mut fmt::Formatter<'_>,
            ) -> fmt::Result {
                f.write_str("a build result string")
            }

            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<BuildResult, E> {
                Ok(BuildResult::from_wire(value))
            }
        }

        deserializer.deserialize_str(ResultVisitor)
    }
}

/// A build running on a machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildInfo {
    /// Build name, optionally led by a `Category:` label.
    pub name: BuildName,
    pub changelist: Option<u32>,
    pub step: Option<StepName>,
    /// Seconds elapsed when the snapshot was produced.
    pub duration_secs: Option<u32>,
}

/// One build machine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "WireMachine")]
pub struct MachineStatus {
    pub name: MachineName,
    pub online: bool,
    /// `None` while the machine is idle.
    pub build: Option<BuildInfo>,
}

impl MachineStatus {
    #[inline]
    pub fn is_building(&self) -> bool { self.build.is_some() }
}

/// The most recently finished build.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "WireRecent")]
pub struct RecentBuild {
    pub name: BuildName,
    pub changelist: u32,
    /// Seconds since it finished, when the snapshot was produced.
    pub age_secs: u32,
    pub result: BuildResult,
}

/// Full farm state. Each accepted snapshot replaces the previous one.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    pub machines: Vec<MachineStatus, MAX_MACHINES>,
    pub recent: RecentBuild,
}

impl StatusSnapshot {
    /// Decode one trimmed JSON line. Escape sequences in strings are decoded.
    pub fn parse(line: &str) -> Result<Self, SnapshotError> {
        let mut unescaped = [0u8; UNESCAPE_LEN];
        let (snapshot, _consumed) =
            serde_json_core::from_str_escaped::<Self>(line, &mut unescaped).map_err(SnapshotError::Json)?;
        Ok(snapshot)
    }
}

// =============================================================================
// Wire Format
// =============================================================================

#[derive(Deserialize)]
struct WireMachine {
    machine: MachineName,
    is_online: bool,
    #[serde(default)]
    build: Option<BuildName>,
    #[serde(default)]
    changelist: Option<u32>,
    #[serde(default)]
    step: Option<StepName>,
    #[serde(default)]
    duration: Option<f32>,
}

impl From<WireMachine> for MachineStatus {
    fn from(wire: WireMachine) -> Self {
        // Build details only mean something while a build is running
        let build = wire.build.map(|name| BuildInfo {
            name,
            changelist: wire.changelist,
            step: wire.step,
            duration_secs: wire.duration.map(whole_secs),
        });
        Self {
            name: wire.machine,
            online: wire.is_online,
            build,
        }
    }
}

#[derive(Deserialize)]
struct WireRecent {
    build: BuildName,
    changelist: u32,
    age: f32,
    result: BuildResult,
}

impl From<WireRecent> for RecentBuild {
    fn from(wire: WireRecent) -> Self {
        Self {
            name: wire.build,
            changelist: wire.changelist,
            age_secs: whole_secs(wire.age),
            result: wire.result,
        }
    }
}

/// Whole seconds. Negative and NaN become 0, huge values saturate.
#[inline]
fn whole_secs(value: f32) -> u32 { value as u32 }

// =============================================================================
// Errors
// =============================================================================

/// Why a line was not accepted as a snapshot.
#[derive(Debug, PartialEq, Eq)]
pub enum SnapshotError {
    /// Not valid JSON, a required field is missing, or a capacity was exceeded.
    Json(serde_json_core::de::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "bad snapshot: {err}"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SnapshotError {
    fn format(
        &self,
        f: defmt::Formatter,
    ) {
        defmt::write!(f, "{}", defmt::Display2Format(self));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"{"machines":[{"machine":"N1","is_online":true,"build":"Health: Rel PS5","changelist":24302,"step":"Deploy-Playstation","duration":5580}],"recent":{"build":"Deploy: x","changelist":1,"age":0,"result":"SUCCESS"}}"#;

    const IDLE: &str = r#"{"machines":[{"machine":"N1","is_online":true}],"recent":{"build":"Deploy: x","changelist":1,"age":0,"result":"SUCCESS"}}"#;

    fn recent_with_result(result: &str) -> std::string::String {
        std::format!(
            r#"{{"machines":[],"recent":{{"build":"b","changelist":7,"age":12,"result":"{result}"}}}}"#
        )
    }

    #[test]
    fn test_parse_building_machine() {
        let snapshot = StatusSnapshot::parse(EXAMPLE).unwrap();
        assert_eq!(snapshot.machines.len(), 1);

        let machine = &snapshot.machines[0];
        assert_eq!(machine.name.as_str(), "N1");
        assert!(machine.online);
        assert!(machine.is_building());

        let build = machine.build.as_ref().unwrap();
        assert_eq!(build.name.as_str(), "Health: Rel PS5");
        assert_eq!(build.changelist, Some(24302));
        assert_eq!(build.step.as_deref(), Some("Deploy-Playstation"));
        assert_eq!(build.duration_secs, Some(5580));
    }

    #[test]
    fn test_parse_recent_build() {
        let snapshot = StatusSnapshot::parse(EXAMPLE).unwrap();
        assert_eq!(snapshot.recent.name.as_str(), "Deploy: x");
        assert_eq!(snapshot.recent.changelist, 1);
        assert_eq!(snapshot.recent.age_secs, 0);
        assert_eq!(snapshot.recent.result, BuildResult::Success);
    }

    #[test]
    fn test_parse_idle_machine() {
        let snapshot = StatusSnapshot::parse(IDLE).unwrap();
        let machine = &snapshot.machines[0];
        assert!(machine.online);
        assert_eq!(machine.build, None);
    }

    #[test]
    fn test_build_details_without_build_are_ignored() {
        let line = r#"{"machines":[{"machine":"N2","is_online":false,"step":"Sync","duration":10}],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}}"#;
        let snapshot = StatusSnapshot::parse(line).unwrap();
        assert!(!snapshot.machines[0].online);
        assert_eq!(snapshot.machines[0].build, None);
    }

    #[test]
    fn test_missing_optional_build_fields() {
        let line = r#"{"machines":[{"machine":"N3","is_online":true,"build":"Nightly: Full"}],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}}"#;
        let build = StatusSnapshot::parse(line).unwrap().machines[0].build.clone().unwrap();
        assert_eq!(build.changelist, None);
        assert_eq!(build.step, None);
        assert_eq!(build.duration_secs, None);
    }

    #[test]
    fn test_result_strings() {
        let parse = |result| StatusSnapshot::parse(&recent_with_result(result)).unwrap().recent.result;
        assert_eq!(parse("SUCCESS"), BuildResult::Success);
        assert_eq!(parse("ABORTED"), BuildResult::Aborted);
        assert_eq!(parse("FAILURE"), BuildResult::Failure);
        assert_eq!(parse("UNSTABLE"), BuildResult::Failure);
        assert_eq!(parse("success"), BuildResult::Failure);
    }

    #[test]
    fn test_fractional_and_negative_times() {
        let line = r#"{"machines":[{"machine":"N1","is_online":true,"build":"b","duration":-3.5}],"recent":{"build":"b","changelist":1,"age":61.9,"result":"SUCCESS"}}"#;
        let snapshot = StatusSnapshot::parse(line).unwrap();
        assert_eq!(snapshot.machines[0].build.as_ref().unwrap().duration_secs, Some(0));
        assert_eq!(snapshot.recent.age_secs, 61);
    }

    #[test]
    fn test_escaped_strings_are_decoded() {
        let line = r#"{"machines":[{"machine":"caf\u00e9","is_online":true,"build":"Health: say \"hi\" \\ ok","step":"a\/b"}],"recent":{"build":"Deploy: \u00e9t\u00e9","changelist":1,"age":0,"result":"SUCCESS"}}"#;
        let snapshot = StatusSnapshot::parse(line).unwrap();

        let machine = &snapshot.machines[0];
        assert_eq!(machine.name.as_str(), "café");
        let build = machine.build.as_ref().unwrap();
        assert_eq!(build.name.as_str(), r#"Health: say "hi" \ ok"#);
        assert_eq!(build.step.as_deref(), Some("a/b"));
        assert_eq!(snapshot.recent.name.as_str(), "Deploy: été");
    }

    #[test]
    fn test_escaped_unknown_field_is_ignored() {
        let line = r#"{"note":"line\nbreak \"quoted\"","machines":[],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}}"#;
        assert!(StatusSnapshot::parse(line).is_ok());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let line = r#"{"version":2,"machines":[{"machine":"N1","pool":"ps5","is_online":true}],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS","url":"http://ci"}}"#;
        assert!(StatusSnapshot::parse(line).is_ok());
    }

    #[test]
    fn test_missing_is_online_is_rejected() {
        let line = r#"{"machines":[{"machine":"N1"}],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}}"#;
        assert!(StatusSnapshot::parse(line).is_err());
    }

    #[test]
    fn test_missing_recent_is_rejected() {
        assert!(StatusSnapshot::parse(r#"{"machines":[]}"#).is_err());
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(StatusSnapshot::parse("{not json").is_err());
        assert!(StatusSnapshot::parse("").is_err());
        assert!(StatusSnapshot::parse(r#"{"machines":[],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}"#).is_err());
    }

    #[test]
    fn test_too_many_machines_is_rejected() {
        let mut line = std::string::String::from(r#"{"machines":["#);
        for i in 0..=MAX_MACHINES {
            if i > 0 {
                line.push(',');
            }
            line.push_str(&std::format!(r#"{{"machine":"N{i}","is_online":true}}"#));
        }
        line.push_str(r#"],"recent":{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}}"#);
        assert!(StatusSnapshot::parse(&line).is_err());
    }

    #[test]
    fn test_overlong_name_is_rejected() {
        let name = "x".repeat(MACHINE_NAME_LEN + 1);
        let line = std::format!(
            r#"{{"machines":[{{"machine":"{name}","is_online":true}}],"recent":{{"build":"b","changelist":1,"age":0,"result":"SUCCESS"}}}}"#
        );
        assert!(StatusSnapshot::parse(&line).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = StatusSnapshot::parse("[").unwrap_err();
        let text = std::format!("{err}");
        assert!(text.starts_with("bad snapshot: "));
    }
}
