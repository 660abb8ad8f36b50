//! Validation of incoming emergency reports. A draft is checked before any
//! row is written, so a rejected submission leaves no trace.

use super::lifecycle::{EmergencyType, Priority};

pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Raw submission as received from the client. Location is optional on the
/// wire because the client may not have a GPS fix yet; validation refuses to
/// let that through.
#[derive(Debug, Clone, Default)]
pub struct ReportDraft {
    pub emergency_type: String,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
}

/// A validated report, ready to be persisted as a new `active` alert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub emergency_type: EmergencyType,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub priority: Priority,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("unknown emergency type `{0}`")]
    UnknownEmergencyType(String),
    /// No GPS fix was supplied. Submission must be blocked rather than
    /// recorded with a placeholder location.
    #[error("no location fix available")]
    LocationUnavailable,
    #[error("coordinates out of range")]
    CoordinatesOutOfRange,
    #[error("description longer than {} characters", MAX_DESCRIPTION_LEN)]
    DescriptionTooLong,
}

impl ReportDraft {
    pub fn validate(self) -> Result<NewReport, SubmitError> {
        let emergency_type = EmergencyType::parse(&self.emergency_type)
            .ok_or(SubmitError::UnknownEmergencyType(self.emergency_type))?;

        let (latitude, longitude) = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(SubmitError::LocationUnavailable),
        };
        if !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
            || latitude.is_nan()
            || longitude.is_nan()
        {
            return Err(SubmitError::CoordinatesOutOfRange);
        }

        let description = match self.description.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(d) if d.len() > MAX_DESCRIPTION_LEN => {
                return Err(SubmitError::DescriptionTooLong)
            }
            Some(d) => Some(d.to_string()),
        };

        Ok(NewReport {
            emergency_type,
            description,
            latitude,
            longitude,
            address: self.address,
            priority: emergency_type.default_priority(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ReportDraft {
        ReportDraft {
            emergency_type: "fire".to_string(),
            description: Some("smoke on the second floor".to_string()),
            latitude: Some(12.97),
            longitude: Some(77.59),
            address: Some("Current Location".to_string()),
        }
    }

    #[test]
    fn valid_draft_becomes_a_report() {
        let report = draft().validate().unwrap();
        assert_eq!(report.emergency_type, EmergencyType::Fire);
        assert_eq!(report.priority, Priority::Critical);
        assert_eq!(report.latitude, 12.97);
        assert_eq!(report.longitude, 77.59);
        assert_eq!(
            report.description.as_deref(),
            Some("smoke on the second floor")
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut d = draft();
        d.emergency_type = "earthquake".to_string();
        assert_eq!(
            d.validate(),
            Err(SubmitError::UnknownEmergencyType("earthquake".to_string()))
        );
    }

    #[test]
    fn empty_type_is_rejected() {
        let mut d = draft();
        d.emergency_type = String::new();
        assert!(matches!(
            d.validate(),
            Err(SubmitError::UnknownEmergencyType(_))
        ));
    }

    #[test]
    fn missing_fix_blocks_submission() {
        let mut d = draft();
        d.latitude = None;
        assert_eq!(d.validate(), Err(SubmitError::LocationUnavailable));

        let mut d = draft();
        d.longitude = None;
        assert_eq!(d.validate(), Err(SubmitError::LocationUnavailable));

        let mut d = draft();
        d.latitude = None;
        d.longitude = None;
        assert_eq!(d.validate(), Err(SubmitError::LocationUnavailable));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut d = draft();
        d.latitude = Some(91.0);
        assert_eq!(d.validate(), Err(SubmitError::CoordinatesOutOfRange));

        let mut d = draft();
        d.longitude = Some(-181.0);
        assert_eq!(d.validate(), Err(SubmitError::CoordinatesOutOfRange));
    }

    #[test]
    fn description_is_optional_and_trimmed() {
        let mut d = draft();
        d.description = None;
        assert_eq!(d.validate().unwrap().description, None);

        let mut d = draft();
        d.description = Some("   ".to_string());
        assert_eq!(d.validate().unwrap().description, None);

        let mut d = draft();
        d.description = Some("  help  ".to_string());
        assert_eq!(d.validate().unwrap().description.as_deref(), Some("help"));
    }

    #[test]
    fn oversized_description_is_rejected() {
        let mut d = draft();
        d.description = Some("x".repeat(MAX_DESCRIPTION_LEN + 1));
        assert_eq!(d.validate(), Err(SubmitError::DescriptionTooLong));

        let mut d = draft();
        d.description = Some("x".repeat(MAX_DESCRIPTION_LEN));
        assert!(d.validate().is_ok());
    }
}
