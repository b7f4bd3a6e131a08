use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row from the `supplements` table. Every display field is optional;
/// a missing field degrades to its documented placeholder, never to a
/// blank render.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Supplement {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub chemical_formula: Option<String>,
    #[serde(default)]
    pub molar_mass: Option<String>,
    #[serde(default)]
    pub evidence_level: Option<String>,
    #[serde(default)]
    pub safety_rating: Option<String>,
    #[serde(default)]
    pub standard_dose: Option<String>,
    #[serde(default)]
    pub timing: Option<String>,
    #[serde(default)]
    pub loading_phase: Option<String>,
    #[serde(default)]
    pub cost_per_serving: Option<String>,
    #[serde(default)]
    pub primary_uses: Option<String>,
    #[serde(default)]
    pub contraindications: Option<String>,
    #[serde(default)]
    pub drug_interactions: Option<String>,
    #[serde(default)]
    pub studies_count: Option<i64>,
    #[serde(default)]
    pub overview: Option<String>,
    // Structured sections: either proper JSON or a text encoding of it.
    #[serde(default)]
    pub mechanism: Option<Value>,
    #[serde(default)]
    pub benefits: Option<Value>,
    #[serde(default)]
    pub key_studies: Option<Value>,
    #[serde(default)]
    pub dosage_table: Option<Value>,
    #[serde(default)]
    pub safety_notes: Option<Value>,
    #[serde(default)]
    pub combinations: Option<Value>,
    #[serde(default)]
    pub references: Option<Value>,
}

impl Supplement {
    pub fn page_title(&self) -> String {
        format!("{} - Scientific Evidence | WhatSupp", self.name)
    }

    pub fn overview_text(&self) -> &str {
        self.overview
            .as_deref()
            .unwrap_or("No overview available for this supplement.")
    }

    /// Spotlight description: the overview, or a generated sentence when
    /// the record has none.
    pub fn spotlight_description(&self) -> String {
        self.overview.clone().unwrap_or_else(|| {
            format!(
                "{} - Detailed scientific information and research available.",
                self.name
            )
        })
    }

    /// Price line for the spotlight, only when the record carries a cost.
    pub fn price_line(&self) -> Option<String> {
        self.cost_per_serving
            .as_ref()
            .map(|cost| format!("{}/serving", cost))
    }
}

/// Decode a structured field into a list of records.
///
/// The backend stores these columns either as jsonb (arrives structured)
/// or as text holding a JSON encoding. Anything that is not, or does not
/// decode to, a JSON array yields `None` — the caller renders that
/// section's "no data" state and the rest of the page is unaffected.
pub fn decode_records<T: serde::de::DeserializeOwned>(field: Option<&Value>) -> Option<Vec<T>> {
    let value = match field? {
        Value::String(text) => serde_json::from_str(text).ok()?,
        other => other.clone(),
    };
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// One mechanism entry is an arbitrary {heading: detail} map.
pub type MechanismEntry = serde_json::Map<String, Value>;

/// Render a JSON value as display text without quoting plain strings.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Benefit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub effect_size: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Study {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DosageRow {
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DosageRow {
    /// Row dosage, falling back to the record's standard dose.
    pub fn dosage_or<'a>(&'a self, standard_dose: Option<&'a str>) -> &'a str {
        self.dosage
            .as_deref()
            .or(standard_dose)
            .unwrap_or("As needed")
    }
}

/// Safety notes arrive either as `{"note": "..."}` records or bare strings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SafetyNote {
    Entry { note: String },
    Text(String),
}

impl SafetyNote {
    pub fn text(&self) -> &str {
        match self {
            SafetyNote::Entry { note } => note,
            SafetyNote::Text(text) => text,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Combination {
    #[serde(default)]
    pub combo: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
}

/// References arrive either as `{"citation": "..."}` records or bare strings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Entry { citation: String },
    Text(String),
}

impl Reference {
    pub fn citation(&self) -> &str {
        match self {
            Reference::Entry { citation } => citation,
            Reference::Text(text) => text,
        }
    }
}

// ============ INFO BOX ============

#[derive(Clone, Debug, PartialEq)]
pub struct InfoRow {
    pub label: &'static str,
    pub value: String,
    pub class: &'static str,
}

/// CSS class for an evidence level value.
pub fn evidence_class(level: Option<&str>) -> &'static str {
    let Some(level) = level else { return "" };
    let lower = level.to_lowercase();
    if lower.contains("high") {
        "highlight"
    } else if lower.contains("low") {
        "warning"
    } else {
        ""
    }
}

/// CSS class for a safety rating value. "unsafe" is checked before
/// "safe" since the latter is a substring of the former.
pub fn safety_class(rating: Option<&str>) -> &'static str {
    let Some(rating) = rating else { return "" };
    let lower = rating.to_lowercase();
    if lower.contains("unsafe") {
        "danger"
    } else if lower.contains("safe") {
        "highlight"
    } else if lower.contains("caution") {
        "warning"
    } else {
        ""
    }
}

/// The fixed info-box projection: twelve labeled rows, each with its
/// display fallback and styling class.
pub fn info_rows(s: &Supplement) -> Vec<InfoRow> {
    fn row(label: &'static str, value: &Option<String>, fallback: &str, class: &'static str) -> InfoRow {
        InfoRow {
            label,
            value: value.clone().unwrap_or_else(|| fallback.to_string()),
            class,
        }
    }

    vec![
        row("Chemical Formula", &s.chemical_formula, "N/A", ""),
        row("Molar Mass", &s.molar_mass, "N/A", ""),
        row(
            "Evidence Level",
            &s.evidence_level,
            "Unknown",
            evidence_class(s.evidence_level.as_deref()),
        ),
        row(
            "Safety Rating",
            &s.safety_rating,
            "Unknown",
            safety_class(s.safety_rating.as_deref()),
        ),
        row("Standard Dose", &s.standard_dose, "Varies", ""),
        row("Timing", &s.timing, "Anytime", ""),
        row("Loading Phase", &s.loading_phase, "N/A", ""),
        row("Cost/Serving", &s.cost_per_serving, "Unknown", "highlight"),
        row("Primary Uses", &s.primary_uses, "General health", ""),
        row("Contraindications", &s.contraindications, "None known", "warning"),
        row("Drug Interactions", &s.drug_interactions, "None known", "highlight"),
        InfoRow {
            label: "Studies",
            value: format!("{}+ published", s.studies_count.unwrap_or(0)),
            class: "",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(name: &str) -> Supplement {
        Supplement {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn malformed_structured_field_yields_no_data() {
        let field = Value::String("not valid json".to_string());
        assert_eq!(decode_records::<Benefit>(Some(&field)), None);
    }

    #[test]
    fn structured_field_decodes_from_json_text() {
        let field = Value::String(
            r#"[{"title": "Strength", "description": "Increased power output"}]"#.to_string(),
        );
        let benefits = decode_records::<Benefit>(Some(&field)).unwrap();
        assert_eq!(benefits.len(), 1);
        assert_eq!(benefits[0].title.as_deref(), Some("Strength"));
        assert_eq!(benefits[0].effect_size, None);
    }

    #[test]
    fn structured_field_passes_through_when_already_decoded() {
        let field = json!([{"protocol": "Loading", "dosage": "20g/day"}]);
        let rows = decode_records::<DosageRow>(Some(&field)).unwrap();
        assert_eq!(rows[0].protocol.as_deref(), Some("Loading"));
    }

    #[test]
    fn non_array_structured_field_yields_no_data() {
        let field = json!({"title": "not a list"});
        assert_eq!(decode_records::<Benefit>(Some(&field)), None);
        assert_eq!(decode_records::<Benefit>(None), None);
    }

    #[test]
    fn safety_notes_accept_records_and_bare_strings() {
        let field = json!([{"note": "Stay hydrated"}, "Consult a physician"]);
        let notes = decode_records::<SafetyNote>(Some(&field)).unwrap();
        assert_eq!(notes[0].text(), "Stay hydrated");
        assert_eq!(notes[1].text(), "Consult a physician");
    }

    #[test]
    fn references_accept_records_and_bare_strings() {
        let field = json!(["Smith et al. 2020", {"citation": "Jones 2021"}]);
        let refs = decode_records::<Reference>(Some(&field)).unwrap();
        assert_eq!(refs[0].citation(), "Smith et al. 2020");
        assert_eq!(refs[1].citation(), "Jones 2021");
    }

    #[test]
    fn page_title_and_price_line() {
        let mut s = named("Creatine Monohydrate");
        s.cost_per_serving = Some("$0.33".to_string());
        assert_eq!(
            s.page_title(),
            "Creatine Monohydrate - Scientific Evidence | WhatSupp"
        );
        assert_eq!(s.price_line().as_deref(), Some("$0.33/serving"));

        s.cost_per_serving = None;
        assert_eq!(s.price_line(), None);
    }

    #[test]
    fn missing_fields_fall_back_to_placeholders() {
        let rows = info_rows(&named("Creatine Monohydrate"));
        let value_of = |label: &str| {
            rows.iter()
                .find(|r| r.label == label)
                .map(|r| r.value.clone())
                .unwrap()
        };
        assert_eq!(value_of("Chemical Formula"), "N/A");
        assert_eq!(value_of("Standard Dose"), "Varies");
        assert_eq!(value_of("Timing"), "Anytime");
        assert_eq!(value_of("Contraindications"), "None known");
        assert_eq!(value_of("Primary Uses"), "General health");
        assert_eq!(value_of("Studies"), "0+ published");
    }

    #[test]
    fn evidence_and_safety_classes() {
        assert_eq!(evidence_class(Some("Very High")), "highlight");
        assert_eq!(evidence_class(Some("low")), "warning");
        assert_eq!(evidence_class(Some("Moderate")), "");
        assert_eq!(evidence_class(None), "");

        assert_eq!(safety_class(Some("Very Safe")), "highlight");
        assert_eq!(safety_class(Some("Unsafe")), "danger");
        assert_eq!(safety_class(Some("Use with caution")), "warning");
        assert_eq!(safety_class(None), "");
    }

    #[test]
    fn dosage_row_falls_back_to_standard_dose() {
        let row = DosageRow::default();
        assert_eq!(row.dosage_or(Some("5g daily")), "5g daily");
        assert_eq!(row.dosage_or(None), "As needed");

        let row = DosageRow {
            dosage: Some("20g/day".to_string()),
            ..Default::default()
        };
        assert_eq!(row.dosage_or(Some("5g daily")), "20g/day");
    }

    #[test]
    fn overview_and_spotlight_fallbacks() {
        let s = named("Fish Oil");
        assert_eq!(s.overview_text(), "No overview available for this supplement.");
        assert_eq!(
            s.spotlight_description(),
            "Fish Oil - Detailed scientific information and research available."
        );

        let mut s = s;
        s.overview = Some("Omega-3 fatty acids.".to_string());
        assert_eq!(s.spotlight_description(), "Omega-3 fatty acids.");
    }
}
