//! Slicer job descriptions and the handles backends return for them.
//!
//! The slicer is invoked as
//! `<executable> <left> <bottom> <right> <top> <email> <level>`; this
//! positional layout is the one bit-exact contract with the external program.

use serde::{Deserialize, Serialize};

use crate::decimal::canonical_decimal;
use crate::selection::SelectionRequest;

/// An executable invocation handed to a job backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    executable: String,
    arguments: Vec<String>,
}

impl JobDescription {
    #[must_use]
    pub fn new(executable: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            arguments,
        }
    }

    /// Renders an admitted selection into a slicer invocation.
    ///
    /// Argument order is fixed: `[min_x, min_y, max_x, max_y, email, level]`.
    /// Coordinates use [`canonical_decimal`]; the level is a plain integer.
    /// Performs no validation: callers only build jobs for admitted requests.
    #[must_use]
    pub fn for_selection(executable: impl Into<String>, request: &SelectionRequest) -> Self {
        let arguments = vec![
            canonical_decimal(request.min_x()),
            canonical_decimal(request.min_y()),
            canonical_decimal(request.max_x()),
            canonical_decimal(request.max_y()),
            request.email().to_string(),
            request.level().to_string(),
        ];
        Self::new(executable, arguments)
    }

    #[must_use]
    pub fn executable(&self) -> &str {
        &self.executable
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Space-joined command line, for logging only.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.executable.clone();
        for arg in &self.arguments {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Opaque identifier a backend assigns to a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const SLICER: &str = "/usr/bin/ahn-laz-slicer";

    fn delft() -> SelectionRequest {
        SelectionRequest::new(
            124_931.360,
            484_567.840,
            126_241.760,
            485_730.400,
            "someone@example.com",
            13,
        )
        .unwrap()
    }

    #[test]
    fn renders_arguments_in_slicer_order() {
        let job = JobDescription::for_selection(SLICER, &delft());

        assert_eq!(job.executable(), SLICER);
        assert_eq!(
            job.arguments(),
            [
                "124931.36",
                "484567.84",
                "126241.76",
                "485730.4",
                "someone@example.com",
                "13",
            ]
        );
    }

    #[test]
    fn level_has_no_decimal_point() {
        let request = SelectionRequest::new(0.5, 0.5, 2.0, 3.0, "a@b.nl", 0).unwrap();
        let job = JobDescription::for_selection(SLICER, &request);
        assert_eq!(job.arguments(), ["0.5", "0.5", "2", "3", "a@b.nl", "0"]);
    }

    #[test]
    fn command_line_joins_with_spaces() {
        let job = JobDescription::new("/bin/slice", vec!["1".into(), "x@y.z".into()]);
        assert_eq!(job.command_line(), "/bin/slice 1 x@y.z");
    }

    #[test]
    fn serializes_for_remote_backends() {
        let job = JobDescription::for_selection(SLICER, &delft());
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["executable"], SLICER);
        assert_eq!(json["arguments"][3], "485730.4");
        assert_eq!(json["arguments"][5], "13");
    }

    #[test]
    fn handle_displays_its_id() {
        let handle = JobHandle::new("local-42");
        assert_eq!(handle.id(), "local-42");
        assert_eq!(handle.to_string(), "local-42");
    }

    proptest! {
        #[test]
        fn building_is_deterministic(
            x in -1.0e6f64..1.0e6,
            y in -1.0e6f64..1.0e6,
            w in 0.001f64..1.0e4,
            h in 0.001f64..1.0e4,
            level in 0u32..32,
        ) {
            let request = SelectionRequest::new(x, y, x + w, y + h, "p@q.nl", level).unwrap();
            let first = JobDescription::for_selection(SLICER, &request);
            let second = JobDescription::for_selection(SLICER, &request);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(
                serde_json::to_vec(&first).unwrap(),
                serde_json::to_vec(&second).unwrap()
            );
            prop_assert_eq!(first.arguments().len(), 6);
            prop_assert_eq!(&first.arguments()[5], &level.to_string());
        }
    }
}
