//! OSRM API response types for the Table service.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#table-service>

use serde::Deserialize;

/// OSRM Table API response.
///
/// The response contains duration and, when requested, distance matrices on
/// success or an error message on failure. The `code` field indicates the
/// response status.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"InvalidQuery"` - Invalid query parameters
    /// - `"InvalidOptions"` - Invalid option combination
    /// - `"NoTable"` - Table computation failed
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    pub message: Option<String>,

    /// Matrix of durations in seconds; `None` cells have no route.
    pub durations: Option<Vec<Vec<Option<f64>>>>,

    /// Matrix of distances in metres; `None` cells have no route.
    #[serde(default)]
    pub distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "code": "Ok",
            "durations": [[0.0, 754.3], [760.1, 0.0]],
            "distances": [[0.0, 9120.4], [9188.0, 0.0]]
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let durations = response.durations.expect("should have durations");
        assert_eq!(durations[0][1], Some(754.3));
        let distances = response.distances.expect("should have distances");
        assert_eq!(distances[1][0], Some(9188.0));
    }

    #[test]
    fn deserialise_error_response() {
        let json = r#"{
            "code": "InvalidQuery",
            "message": "Coordinates are invalid"
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(!response.is_ok());
        assert_eq!(response.message.as_deref(), Some("Coordinates are invalid"));
        assert!(response.durations.is_none());
        assert!(response.distances.is_none());
    }

    #[test]
    fn deserialise_response_with_nulls() {
        let json = r#"{
            "code": "Ok",
            "durations": [[0.0, null], [null, 0.0]]
        }"#;

        let response: TableResponse = serde_json::from_str(json).expect("should deserialise");

        let durations = response.durations.expect("should have durations");
        assert_eq!(durations[0][1], None);
        assert_eq!(durations[1][0], None);
    }
}
