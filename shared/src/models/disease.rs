//! Crop disease rules and weather-based disease prediction

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::risk::RiskLevel;

/// Condition on a single weather variable
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// No constraint
    Any,
    /// Strictly greater than the bound
    Above(f64),
    /// Inclusive on both ends
    Between(f64, f64),
}

impl Threshold {
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            Threshold::Any => true,
            Threshold::Above(bound) => value > bound,
            Threshold::Between(low, high) => low <= value && value <= high,
        }
    }
}

/// Weather window in which a disease is expected to develop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TriggerCondition {
    pub temperature: Threshold,
    pub humidity: Threshold,
    pub rainfall: Threshold,
}

impl TriggerCondition {
    pub fn is_met(&self, temperature_celsius: f64, humidity_percent: f64, rainfall_mm: f64) -> bool {
        self.temperature.admits(temperature_celsius)
            && self.humidity.admits(humidity_percent)
            && self.rainfall.admits(rainfall_mm)
    }
}

/// One (crop, disease) rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropDiseaseRule {
    pub crop: String,
    pub disease: String,
    pub trigger: TriggerCondition,
    pub conditions: String,
    pub prevention: String,
}

impl CropDiseaseRule {
    pub fn new(
        crop: &str,
        disease: &str,
        trigger: TriggerCondition,
        conditions: &str,
        prevention: &str,
    ) -> Self {
        Self {
            crop: crop.to_string(),
            disease: disease.to_string(),
            trigger,
            conditions: conditions.to_string(),
            prevention: prevention.to_string(),
        }
    }
}

/// A disease the weather currently favours
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseasePrediction {
    pub disease: String,
    /// Always `HIGH`: only triggered rules are reported
    pub risk: RiskLevel,
    pub conditions: String,
    pub prevention: String,
}

impl From<&CropDiseaseRule> for DiseasePrediction {
    fn from(rule: &CropDiseaseRule) -> Self {
        DiseasePrediction {
            disease: rule.disease.clone(),
            risk: RiskLevel::High,
            conditions: rule.conditions.clone(),
            prevention: rule.prevention.clone(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleTableError {
    #[error("duplicate rule for crop '{crop}' and disease '{disease}'")]
    DuplicateRule { crop: String, disease: String },
}

/// Immutable rule set grouped by crop, in definition order
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    crops: Vec<(String, Vec<CropDiseaseRule>)>,
}

impl RuleTable {
    /// Build a table from rules, keeping first-seen crop order
    pub fn from_rules(rules: Vec<CropDiseaseRule>) -> Result<Self, RuleTableError> {
        let mut crops: Vec<(String, Vec<CropDiseaseRule>)> = Vec::new();

        for rule in rules {
            let position = match crops.iter().position(|(crop, _)| *crop == rule.crop) {
                Some(position) => position,
                None => {
                    crops.push((rule.crop.clone(), Vec::new()));
                    crops.len() - 1
                }
            };

            let group = &mut crops[position].1;
            if group.iter().any(|existing| existing.disease == rule.disease) {
                return Err(RuleTableError::DuplicateRule {
                    crop: rule.crop,
                    disease: rule.disease,
                });
            }
            group.push(rule);
        }

        Ok(Self { crops })
    }

    /// The agronomic rule set served by the platform
    pub fn standard() -> Self {
        use Threshold::{Above, Any, Between};

        let rule = |crop, disease, temperature, humidity, rainfall, conditions, prevention| {
            CropDiseaseRule::new(
                crop,
                disease,
                TriggerCondition {
                    temperature,
                    humidity,
                    rainfall,
                },
                conditions,
                prevention,
            )
        };

        let rules = vec![
            rule(
                "Rice",
                "Blast",
                Between(25.0, 30.0),
                Above(80.0),
                Above(5.0),
                "High humidity (>80%) + Temperature 25-30°C",
                "Apply Tricyclazole fungicide, Avoid excessive nitrogen, Ensure proper drainage",
            ),
            rule(
                "Rice",
                "Bacterial Leaf Blight",
                Between(25.0, 34.0),
                Above(70.0),
                Above(10.0),
                "Temperature 25-34°C + High humidity (>70%) + Rainfall",
                "Use copper-based bactericides, Remove infected plants",
            ),
            rule(
                "Rice",
                "Sheath Blight",
                Above(30.0),
                Above(85.0),
                Any,
                "High temperature (>30°C) + High humidity (>85%)",
                "Apply Validamycin, Maintain proper spacing",
            ),
            rule(
                "Wheat",
                "Rust",
                Between(15.0, 25.0),
                Above(70.0),
                Any,
                "Temperature 15-25°C + High humidity (>70%)",
                "Spray Propiconazole, Use resistant varieties",
            ),
            rule(
                "Wheat",
                "Powdery Mildew",
                Between(15.0, 22.0),
                Between(50.0, 70.0),
                Any,
                "Cool temperature (15-22°C) + Moderate humidity",
                "Apply Sulfur or Triadimefon",
            ),
            rule(
                "Tomato",
                "Late Blight",
                Between(15.0, 25.0),
                Above(90.0),
                Above(2.0),
                "Cool temperature (15-25°C) + High humidity (>90%) + Rain",
                "Apply Metalaxyl + Mancozeb, Remove infected plants",
            ),
            rule(
                "Tomato",
                "Early Blight",
                Between(25.0, 30.0),
                Above(80.0),
                Above(1.0),
                "Temperature 25-30°C + High humidity (>80%)",
                "Spray Chlorothalonil or Mancozeb",
            ),
            rule(
                "Potato",
                "Late Blight",
                Between(15.0, 25.0),
                Above(90.0),
                Above(5.0),
                "Temperature 15-25°C + High humidity (>90%) + Rainfall",
                "Apply Metalaxyl + Mancozeb immediately",
            ),
            rule(
                "Cotton",
                "Wilt",
                Above(30.0),
                Any,
                Above(5.0),
                "High temperature (>30°C) + Moderate rainfall",
                "Use Carbendazim as soil drench, Practice crop rotation",
            ),
            rule(
                "Cotton",
                "Boll Rot",
                Between(25.0, 30.0),
                Above(85.0),
                Above(15.0),
                "High rainfall + High humidity (>85%)",
                "Improve drainage, Apply Carbendazim + Mancozeb",
            ),
            rule(
                "Sugarcane",
                "Red Rot",
                Above(30.0),
                Above(80.0),
                Above(10.0),
                "High temperature (>30°C) + High humidity (>80%)",
                "Use disease-free setts, Apply Carbendazim",
            ),
            rule(
                "Maize",
                "Blight",
                Between(20.0, 28.0),
                Above(80.0),
                Above(3.0),
                "Temperature 20-28°C + High humidity (>80%)",
                "Apply Mancozeb, Use resistant hybrids",
            ),
        ];

        Self::from_rules(rules).expect("standard rule table has unique keys")
    }

    /// Rules registered for a crop (exact name match)
    pub fn rules_for(&self, crop: &str) -> Option<&[CropDiseaseRule]> {
        self.crops
            .iter()
            .find(|(name, _)| name == crop)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn crops(&self) -> impl Iterator<Item = &str> {
        self.crops.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.crops.iter().map(|(_, rules)| rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Diseases the given weather favours for a crop, in rule order.
    ///
    /// Unknown crops yield an empty list.
    pub fn predict(
        &self,
        crop: &str,
        temperature_celsius: f64,
        humidity_percent: f64,
        rainfall_mm: f64,
    ) -> Vec<DiseasePrediction> {
        let Some(rules) = self.rules_for(crop) else {
            return Vec::new();
        };

        rules
            .iter()
            .filter(|rule| {
                rule.trigger
                    .is_met(temperature_celsius, humidity_percent, rainfall_mm)
            })
            .map(DiseasePrediction::from)
            .collect()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(predictions: &[DiseasePrediction]) -> Vec<&str> {
        predictions.iter().map(|p| p.disease.as_str()).collect()
    }

    #[test]
    fn test_standard_table_shape() {
        let table = RuleTable::standard();
        assert_eq!(table.len(), 12);
        assert_eq!(
            table.crops().collect::<Vec<_>>(),
            vec!["Rice", "Wheat", "Tomato", "Potato", "Cotton", "Sugarcane", "Maize"]
        );
    }

    #[test]
    fn test_rice_blast_without_sheath_blight() {
        let table = RuleTable::standard();
        let predictions = table.predict("Rice", 27.0, 85.0, 6.0);
        assert_eq!(names(&predictions), vec!["Blast"]);
        assert_eq!(predictions[0].risk, RiskLevel::High);
        assert_eq!(
            predictions[0].prevention,
            "Apply Tricyclazole fungicide, Avoid excessive nitrogen, Ensure proper drainage"
        );
    }

    #[test]
    fn test_unregistered_crop_is_empty() {
        let table = RuleTable::standard();
        assert!(table.predict("Banana", 30.0, 90.0, 10.0).is_empty());
    }

    #[test]
    fn test_crop_lookup_is_case_sensitive() {
        let table = RuleTable::standard();
        assert!(table.predict("rice", 27.0, 85.0, 6.0).is_empty());
    }

    #[test]
    fn test_multiple_rules_fire_in_definition_order() {
        let table = RuleTable::standard();
        // 30°C, 90%, 12mm satisfies Blast and Bacterial Leaf Blight; Sheath Blight needs >30
        let predictions = table.predict("Rice", 30.0, 90.0, 12.0);
        assert_eq!(names(&predictions), vec!["Blast", "Bacterial Leaf Blight"]);

        let predictions = table.predict("Rice", 31.0, 90.0, 12.0);
        assert_eq!(names(&predictions), vec!["Bacterial Leaf Blight", "Sheath Blight"]);
    }

    #[test]
    fn test_wheat_powdery_mildew_inclusive_humidity() {
        let table = RuleTable::standard();
        assert_eq!(names(&table.predict("Wheat", 20.0, 50.0, 0.0)), vec!["Powdery Mildew"]);
        assert_eq!(names(&table.predict("Wheat", 20.0, 70.0, 0.0)), vec!["Powdery Mildew"]);
        assert_eq!(names(&table.predict("Wheat", 20.0, 71.0, 0.0)), vec!["Rust"]);
    }

    #[test]
    fn test_cotton_wilt_ignores_humidity() {
        let table = RuleTable::standard();
        assert_eq!(names(&table.predict("Cotton", 32.0, 10.0, 6.0)), vec!["Wilt"]);
        assert!(table.predict("Cotton", 30.0, 10.0, 6.0).is_empty());
    }

    #[test]
    fn test_same_disease_name_on_two_crops() {
        let table = RuleTable::standard();
        assert_eq!(names(&table.predict("Tomato", 20.0, 95.0, 3.0)), vec!["Late Blight"]);
        // Potato needs more rain than tomato for the same disease
        assert!(table.predict("Potato", 20.0, 95.0, 3.0).is_empty());
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let trigger = TriggerCondition {
            temperature: Threshold::Any,
            humidity: Threshold::Above(50.0),
            rainfall: Threshold::Any,
        };
        let rules = vec![
            CropDiseaseRule::new("Okra", "Mosaic", trigger, "Humid", "Rogue plants"),
            CropDiseaseRule::new("Okra", "Mosaic", trigger, "Humid", "Rogue plants"),
        ];

        assert_eq!(
            RuleTable::from_rules(rules),
            Err(RuleTableError::DuplicateRule {
                crop: "Okra".to_string(),
                disease: "Mosaic".to_string(),
            })
        );
    }

    #[test]
    fn test_custom_table_predicts() {
        let trigger = TriggerCondition {
            temperature: Threshold::Between(18.0, 26.0),
            humidity: Threshold::Above(75.0),
            rainfall: Threshold::Any,
        };
        let table = RuleTable::from_rules(vec![CropDiseaseRule::new(
            "Grape",
            "Downy Mildew",
            trigger,
            "Mild and humid",
            "Apply copper",
        )])
        .unwrap();

        assert_eq!(names(&table.predict("Grape", 22.0, 80.0, 0.0)), vec!["Downy Mildew"]);
        assert!(table.predict("Grape", 27.0, 80.0, 0.0).is_empty());
    }

    #[test]
    fn test_threshold_semantics() {
        assert!(Threshold::Any.admits(f64::MIN));
        assert!(!Threshold::Above(5.0).admits(5.0));
        assert!(Threshold::Between(25.0, 30.0).admits(25.0));
        assert!(Threshold::Between(25.0, 30.0).admits(30.0));
        assert!(!Threshold::Between(25.0, 30.0).admits(30.01));
    }
}
