use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How sure the model is about the identification.
#[derive(Serialize, Deserialize, Display, EnumString, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Poisoning severity scale. `None` doubles as the default for
/// non-toxic plants and for the no-plant record.
#[derive(Serialize, Deserialize, Display, EnumString, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
    Fatal,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlantName {
    pub common: String,
    pub scientific: String,
    pub family: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Toxicity {
    pub is_toxic: bool,
    pub toxic_to: Vec<String>,
    pub dangerous_parts: Vec<String>,
    pub symptoms: Vec<String>,
    pub severity: Severity,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Edibility {
    pub is_edible: bool,
    pub edible_parts: Vec<String>,
    /// Empty when the plant is not edible.
    pub preparation: String,
    pub warnings: Vec<String>,
}

/// One identification result, produced per analyzed image.
///
/// When `not_a_plant` is true the remaining fields carry schema-valid
/// defaults and must not be interpreted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Plant {
    pub identified: bool,
    pub not_a_plant: bool,
    pub confidence: Confidence,
    pub name: PlantName,
    pub description: String,
    pub toxicity: Toxicity,
    pub edibility: Edibility,
}

/// Body of `POST /api/identify`. `image` is raw base64 without the
/// data-URI prefix. Fields default to empty so a missing field is
/// reported by the handler's own validation instead of a serde error.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct IdentifyRequest {
    #[serde(default)]
    pub image: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct IdentifyResponse {
    pub plant: Plant,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

/// Mime types the endpoint accepts, matching what Gemini takes inline.
pub const ACCEPTED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "identified": true,
            "not_a_plant": false,
            "confidence": "high",
            "name": {
                "common": "Samambaia",
                "scientific": "Nephrolepis exaltata",
                "family": "Nephrolepidaceae"
            },
            "description": "Uma samambaia comum de interiores.",
            "toxicity": {
                "is_toxic": false,
                "toxic_to": [],
                "dangerous_parts": [],
                "symptoms": [],
                "severity": "none"
            },
            "edibility": {
                "is_edible": false,
                "edible_parts": [],
                "preparation": "",
                "warnings": []
            }
        }"#
    }

    #[test]
    fn plant_deserializes_from_model_output() {
        let plant: Plant = serde_json::from_str(sample_json()).unwrap();
        assert!(plant.identified);
        assert!(!plant.not_a_plant);
        assert_eq!(plant.confidence, Confidence::High);
        assert_eq!(plant.name.common, "Samambaia");
        assert_eq!(plant.toxicity.severity, Severity::None);
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let doc = sample_json().replace("\"none\"", "\"catastrophic\"");
        assert!(serde_json::from_str::<Plant>(&doc).is_err());
    }

    #[test]
    fn unknown_confidence_is_rejected() {
        let doc = sample_json().replace("\"high\"", "\"certain\"");
        assert!(serde_json::from_str::<Plant>(&doc).is_err());
    }

    #[test]
    fn missing_required_section_is_rejected() {
        let mut value: serde_json::Value = serde_json::from_str(sample_json()).unwrap();
        value.as_object_mut().unwrap().remove("toxicity");
        assert!(serde_json::from_value::<Plant>(value).is_err());
    }

    #[test]
    fn plant_roundtrips_unchanged() {
        let plant: Plant = serde_json::from_str(sample_json()).unwrap();
        let encoded = serde_json::to_string(&plant).unwrap();
        let decoded: Plant = serde_json::from_str(&encoded).unwrap();
        assert_eq!(plant, decoded);
    }

    #[test]
    fn identify_request_defaults_missing_fields_to_empty() {
        let req: IdentifyRequest = serde_json::from_str(r#"{"image": "abc"}"#).unwrap();
        assert_eq!(req.image, "abc");
        assert!(req.mime_type.is_empty());
    }

    #[test]
    fn enum_wire_forms_are_lowercase() {
        assert_eq!(Confidence::High.to_string(), "high");
        assert_eq!(Severity::Fatal.to_string(), "fatal");
        assert_eq!("moderate".parse::<Severity>().unwrap(), Severity::Moderate);
    }
}
