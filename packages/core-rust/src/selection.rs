use serde::{Deserialize, Serialize};

/// Coordinate axis, used to report which extent of a selection is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Reasons a selection is refused at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("coordinate `{field}` must be a finite number")]
    NonFiniteCoordinate { field: &'static str },
    #[error("selection has an empty {axis} extent: minimum must be less than maximum")]
    EmptyExtent { axis: Axis },
    #[error("contact email must not be empty")]
    EmptyEmail,
}

/// A validated rectangular selection of the point cloud.
///
/// Immutable once constructed: fields are private and there are no setters,
/// so the value seen by admission is the value rendered into the job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSelection", into = "RawSelection")]
pub struct SelectionRequest {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
    email: String,
    level: u32,
}

impl SelectionRequest {
    /// Validates and builds a selection.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a coordinate is not finite, if either
    /// extent is empty or inverted, or if `email` is blank.
    pub fn new(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        email: impl Into<String>,
        level: u32,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [
            ("left", min_x),
            ("bottom", min_y),
            ("right", max_x),
            ("top", max_y),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteCoordinate { field });
            }
        }
        if min_x >= max_x {
            return Err(ValidationError::EmptyExtent { axis: Axis::X });
        }
        if min_y >= max_y {
            return Err(ValidationError::EmptyExtent { axis: Axis::Y });
        }
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
            email,
            level,
        })
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    /// Address the finished file is delivered to.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Requested octree level. Lower levels are coarser and hold fewer points.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// Wire shape of a selection, named after the web client's fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSelection {
    left: f64,
    bottom: f64,
    right: f64,
    top: f64,
    email: String,
    level: u32,
}

impl TryFrom<RawSelection> for SelectionRequest {
    type Error = ValidationError;

    fn try_from(raw: RawSelection) -> Result<Self, Self::Error> {
        Self::new(raw.left, raw.bottom, raw.right, raw.top, raw.email, raw.level)
    }
}

impl From<SelectionRequest> for RawSelection {
    fn from(request: SelectionRequest) -> Self {
        Self {
            left: request.min_x,
            bottom: request.min_y,
            right: request.max_x,
            top: request.max_y,
            email: request.email,
            level: request.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_selection() {
        let request = SelectionRequest::new(
            124_931.360,
            484_567.840,
            126_241.760,
            485_730.400,
            "someone@example.com",
            13,
        )
        .unwrap();

        assert_eq!(request.min_x(), 124_931.36);
        assert_eq!(request.max_y(), 485_730.4);
        assert_eq!(request.email(), "someone@example.com");
        assert_eq!(request.level(), 13);
        assert!((request.width() - 1310.4).abs() < 1e-6);
        assert!((request.height() - 1162.56).abs() < 1e-6);
    }

    #[test]
    fn rejects_inverted_x_extent() {
        let err = SelectionRequest::new(10.0, 0.0, 5.0, 1.0, "a@b.nl", 0).unwrap_err();
        assert_eq!(err, ValidationError::EmptyExtent { axis: Axis::X });
    }

    #[test]
    fn rejects_zero_height() {
        let err = SelectionRequest::new(0.0, 3.0, 1.0, 3.0, "a@b.nl", 0).unwrap_err();
        assert_eq!(err, ValidationError::EmptyExtent { axis: Axis::Y });
    }

    #[test]
    fn rejects_non_finite_coordinate() {
        let err = SelectionRequest::new(0.0, f64::NAN, 1.0, 1.0, "a@b.nl", 0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonFiniteCoordinate { field: "bottom" }
        );

        let err =
            SelectionRequest::new(0.0, 0.0, f64::INFINITY, 1.0, "a@b.nl", 0).unwrap_err();
        assert_eq!(err, ValidationError::NonFiniteCoordinate { field: "right" });
    }

    #[test]
    fn rejects_blank_email() {
        let err = SelectionRequest::new(0.0, 0.0, 1.0, 1.0, "   ", 0).unwrap_err();
        assert_eq!(err, ValidationError::EmptyEmail);
    }

    #[test]
    fn deserializes_from_client_json() {
        let json = r#"{
            "left": 124931.36, "bottom": 484567.84,
            "right": 126241.76, "top": 485730.4,
            "email": "someone@example.com", "level": 13
        }"#;
        let request: SelectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.min_y(), 484_567.84);
        assert_eq!(request.level(), 13);
    }

    #[test]
    fn deserialization_runs_validation() {
        let json = r#"{
            "left": 5, "bottom": 0, "right": 1, "top": 1,
            "email": "someone@example.com", "level": 0
        }"#;
        let err = serde_json::from_str::<SelectionRequest>(json).unwrap_err();
        assert!(err.to_string().contains("empty x extent"));
    }

    #[test]
    fn deserialization_rejects_negative_level() {
        let json = r#"{
            "left": 0, "bottom": 0, "right": 1, "top": 1,
            "email": "someone@example.com", "level": -1
        }"#;
        assert!(serde_json::from_str::<SelectionRequest>(json).is_err());
    }

    #[test]
    fn serializes_with_client_field_names() {
        let request = SelectionRequest::new(1.0, 2.0, 3.0, 4.0, "a@b.nl", 7).unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["left"], 1.0);
        assert_eq!(value["top"], 4.0);
        assert_eq!(value["level"], 7);
    }
}
