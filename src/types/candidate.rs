// src/types/candidate.rs
//! Ranked candidate data as exchanged with the scoring and export services

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One candidate as ranked by the scoring service.
///
/// Numbers keep their wire representation and fields the client does not
/// type are kept in `extra`, so an export sends back what the service
/// produced. Experience lives there too, under whichever key the service used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub rank: u32,
    pub name: String,
    pub filename: String,
    /// Match score in percent, 0 to 100. The service rounds to two decimals.
    pub score: Number,
    #[serde(default, deserialize_with = "skills_or_empty")]
    pub skills: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RankedResult {
    pub fn new(rank: u32, name: &str, filename: &str, score: f64) -> Self {
        Self {
            rank,
            name: name.to_string(),
            filename: filename.to_string(),
            score: to_number(score),
            skills: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_experience(mut self, years: f64) -> Self {
        let key = self.experience_key().unwrap_or(EXPERIENCE_KEYS[0]);
        self.extra.insert(key.to_string(), Value::Number(to_number(years)));
        self
    }

    pub fn score(&self) -> f64 {
        self.score.as_f64().unwrap_or(0.0)
    }

    /// Years of experience; `None` when the key is missing, null or not a number.
    pub fn experience(&self) -> Option<f64> {
        self.experience_key()
            .and_then(|key| self.extra.get(key))
            .and_then(Value::as_f64)
    }

    fn experience_key(&self) -> Option<&'static str> {
        EXPERIENCE_KEYS
            .iter()
            .copied()
            .find(|key| self.extra.contains_key(*key))
    }
}

/// Keys the scoring service has used for years of experience.
const EXPERIENCE_KEYS: [&str; 3] = ["experience", "experienceYears", "experience_years"];

// Whole values become integers, like the service sends them.
fn to_number(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Number::from(value as i64)
    } else {
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}

// `"skills": null` shows up for resumes where extraction found nothing.
fn skills_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Ranked candidates for one submission, in the order the service returned them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    results: Vec<RankedResult>,
}

impl ResultSet {
    pub fn new(results: Vec<RankedResult>) -> Self {
        Self { results }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn as_slice(&self) -> &[RankedResult] {
        &self.results
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedResult> {
        self.results.iter()
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a RankedResult;
    type IntoIter = std::slice::Iter<'a, RankedResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_shape() {
        let raw = r#"{
            "rank": 1,
            "name": "Jane Roe",
            "filename": "jane.pdf",
            "score": 87.35,
            "skills": ["python", "sql"],
            "experience": 6,
            "match_percentage": 87.4
        }"#;
        let result: RankedResult = serde_json::from_str(raw).unwrap();

        assert_eq!(result.rank, 1);
        assert_eq!(result.score(), 87.35);
        assert_eq!(result.skills, vec!["python", "sql"]);
        assert_eq!(result.experience(), Some(6.0));
        assert_eq!(result.extra.get("match_percentage"), Some(&serde_json::json!(87.4)));
    }

    #[test]
    fn test_experience_aliases_and_nulls() {
        let camel: RankedResult = serde_json::from_str(
            r#"{"rank":2,"name":"A","filename":"a.doc","score":50,"skills":null,"experienceYears":3}"#,
        )
        .unwrap();
        assert_eq!(camel.experience(), Some(3.0));
        assert!(camel.skills.is_empty());

        let missing: RankedResult = serde_json::from_str(
            r#"{"rank":3,"name":"B","filename":"b.doc","score":10,"experience":null}"#,
        )
        .unwrap();
        assert_eq!(missing.experience(), None);
        assert!(missing.skills.is_empty());
    }

    #[test]
    fn test_experience_key_survives_serialization() {
        let camel = serde_json::json!({
            "rank": 1, "name": "A", "filename": "a.pdf", "score": 92,
            "skills": ["sql"], "experienceYears": 5
        });
        let result: RankedResult = serde_json::from_value(camel.clone()).unwrap();
        assert_eq!(result.experience(), Some(5.0));
        assert_eq!(serde_json::to_value(&result).unwrap(), camel);

        let absent = serde_json::json!({
            "rank": 2, "name": "B", "filename": "b.pdf", "score": 40, "skills": []
        });
        let result: RankedResult = serde_json::from_value(absent.clone()).unwrap();
        assert_eq!(result.experience(), None);
        assert_eq!(serde_json::to_value(&result).unwrap(), absent);
    }

    #[test]
    fn test_with_experience_reuses_existing_key() {
        let result: RankedResult = serde_json::from_str(
            r#"{"rank":1,"name":"A","filename":"a.pdf","score":80,"experience_years":null}"#,
        )
        .unwrap();
        let result = result.with_experience(4.0);

        assert_eq!(result.experience(), Some(4.0));
        assert_eq!(result.extra.get("experience_years"), Some(&serde_json::json!(4)));
        assert!(!result.extra.contains_key("experience"));
    }

    #[test]
    fn test_serialize_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "rank": 1, "name": "A", "filename": "a.pdf", "score": 92,
            "skills": ["sql"], "experience": 5.5, "match_percentage": 92.0
        });
        let result: RankedResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }

    #[test]
    fn test_builder_numbers() {
        let result = RankedResult::new(1, "A", "a.pdf", 92.0).with_experience(2.5);
        assert_eq!(result.score, Number::from(92));
        assert_eq!(result.experience(), Some(2.5));
    }
}
