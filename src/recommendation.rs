use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::catalog::{Occasion, Weather};
use crate::error::{StylistError, StylistResult};

/// The four-part answer the model returns. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub outfit: String,
    pub footwear: String,
    pub accessories: String,
    #[serde(rename = "stylingTips")]
    pub styling_tips: String,
}

/// A recommendation together with the selection it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLook {
    pub occasion: Occasion,
    pub weather: Weather,
    pub recommendation: Recommendation,
}

// Templates need the display labels alongside the slugs.
impl Serialize for StyledLook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut look = serializer.serialize_struct("StyledLook", 5)?;
        look.serialize_field("occasion", &self.occasion)?;
        look.serialize_field("occasion_label", self.occasion.label())?;
        look.serialize_field("weather", &self.weather)?;
        look.serialize_field("weather_label", self.weather.label())?;
        look.serialize_field("recommendation", &self.recommendation)?;
        look.end()
    }
}

pub const REQUIRED_FIELDS: [&str; 4] = ["outfit", "footwear", "accessories", "stylingTips"];

/// `responseSchema` sent with every recommendation request. Uses Gemini's
/// OpenAPI subset, where type names are upper case.
pub fn response_schema() -> Value {
    let properties: serde_json::Map<String, Value> = REQUIRED_FIELDS
        .iter()
        .map(|field| ((*field).to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": REQUIRED_FIELDS,
    })
}

impl Recommendation {
    /// Parses the raw model text. The JSON mime type usually gives a bare
    /// object, but a fenced block is accepted too.
    pub fn parse(raw: &str) -> StylistResult<Self> {
        let body = strip_code_fence(raw.trim());
        if body.is_empty() {
            return Err(StylistError::EmptyResponse);
        }

        let parsed: Recommendation = serde_json::from_str(body)
            .map_err(|e| StylistError::MalformedRecommendation(e.to_string()))?;

        if let Some(field) = parsed.blank_field() {
            return Err(StylistError::MalformedRecommendation(format!(
                "field '{}' is empty",
                field
            )));
        }

        Ok(parsed)
    }

    fn blank_field(&self) -> Option<&'static str> {
        [
            ("outfit", &self.outfit),
            ("footwear", &self.footwear),
            ("accessories", &self.accessories),
            ("stylingTips", &self.styling_tips),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    pub fn to_json(&self) -> String {
        // Serializing four strings can't fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"outfit":"Navy suit","footwear":"Leather oxfords","accessories":"Umbrella","stylingTips":"Layer for rain"}"#;

    #[test]
    fn test_parse_plain_object() {
        let rec = Recommendation::parse(SAMPLE).unwrap();
        assert_eq!(rec.outfit, "Navy suit");
        assert_eq!(rec.footwear, "Leather oxfords");
        assert_eq!(rec.accessories, "Umbrella");
        assert_eq!(rec.styling_tips, "Layer for rain");
    }

    #[test]
    fn test_parse_fenced_object() {
        let fenced = format!("```json\n{}\n```\n", SAMPLE);
        let rec = Recommendation::parse(&fenced).unwrap();
        assert_eq!(rec.outfit, "Navy suit");
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let err = Recommendation::parse(r#"{"outfit":"Jeans","footwear":"Sneakers","accessories":"Cap"}"#)
            .unwrap_err();
        assert!(matches!(err, StylistError::MalformedRecommendation(msg) if msg.contains("stylingTips")));
    }

    #[test]
    fn test_parse_rejects_non_string_field() {
        let err = Recommendation::parse(
            r#"{"outfit":["Jeans"],"footwear":"Sneakers","accessories":"Cap","stylingTips":"Relax"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StylistError::MalformedRecommendation(_)));
    }

    #[test]
    fn test_parse_rejects_blank_field() {
        let err = Recommendation::parse(
            r#"{"outfit":"Jeans","footwear":"  ","accessories":"Cap","stylingTips":"Relax"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StylistError::MalformedRecommendation(msg) if msg.contains("footwear")));
    }

    #[test]
    fn test_parse_rejects_prose_and_empty() {
        assert!(matches!(
            Recommendation::parse("Wear something nice!"),
            Err(StylistError::MalformedRecommendation(_))
        ));
        assert!(matches!(Recommendation::parse("   "), Err(StylistError::EmptyResponse)));
    }

    #[test]
    fn test_schema_requires_all_fields() {
        let schema = response_schema();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(schema["required"], json!(["outfit", "footwear", "accessories", "stylingTips"]));
        for field in REQUIRED_FIELDS {
            assert_eq!(schema["properties"][field]["type"], "STRING");
        }
    }

    #[test]
    fn test_styled_look_carries_labels() {
        let look = StyledLook {
            occasion: Occasion::DateNight,
            weather: Weather::Rainy,
            recommendation: Recommendation::parse(SAMPLE).unwrap(),
        };
        let value = serde_json::to_value(&look).unwrap();
        assert_eq!(value["occasion"], "date-night");
        assert_eq!(value["occasion_label"], "Date Night");
        assert_eq!(value["weather_label"], "Rainy");
        assert_eq!(value["recommendation"]["outfit"], "Navy suit");
    }

    #[test]
    fn test_to_json_uses_wire_names() {
        let rec = Recommendation::parse(SAMPLE).unwrap();
        let json = rec.to_json();
        assert!(json.contains("\"stylingTips\":\"Layer for rain\""));
    }
}
