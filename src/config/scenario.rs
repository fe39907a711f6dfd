use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{Crop, CropSummary, Diagnosis, FarmerProfile, Location, Product, UserProfile};
use crate::error::SeedError;

pub const DEFAULT_USER_ID: &str = "test-user-uid-1";

/// The set of sample entities one seeding run writes
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeedScenario {
    pub user: UserProfile,
    pub farmer: FarmerProfile,
    pub crop: Crop,
    pub diagnosis: Diagnosis,
    pub product: Product,
}

impl Default for SeedScenario {
    fn default() -> Self {
        Self {
            user: UserProfile {
                id: DEFAULT_USER_ID.to_string(),
                name: "Test Farmer".to_string(),
                email: "testfarmer@example.com".to_string(),
                phone: "+91-9000000000".to_string(),
                role: "farmer".to_string(),
            },
            farmer: FarmerProfile {
                farm_name: "Green Valley Farm".to_string(),
                address: "Village X, Taluka Y".to_string(),
                location: Location {
                    latitude: 18.5204,
                    longitude: 73.8567,
                },
                area: 2.5,
                phone: "+91-9000000000".to_string(),
                crops: vec![CropSummary {
                    name: "Grape".to_string(),
                    area: 1.5,
                }],
            },
            crop: Crop {
                name: "Grape".to_string(),
                variety: "Thompson Seedless".to_string(),
                status: "healthy".to_string(),
                area: 1.5,
            },
            diagnosis: Diagnosis {
                issue: "Powdery mildew".to_string(),
                severity: "medium".to_string(),
                notes: "White powder on leaves; treat with recommended fungicide.".to_string(),
                image_urls: vec![],
            },
            product: Product {
                title: "Organic Fertilizer 500ml".to_string(),
                category: "Fertilizers".to_string(),
                price: 190,
                unit: "500 millilitre".to_string(),
                description: "Organic fertilizer by GAPL".to_string(),
                image_url: String::new(),
            },
        }
    }
}

impl SeedScenario {
    /// Load the scenario from `path`, or the built-in one when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    SeedError::Scenario(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_yaml(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(contents: &str) -> Result<Self, SeedError> {
        let scenario: SeedScenario =
            serde_yaml::from_str(contents).map_err(|e| SeedError::Scenario(e.to_string()))?;

        if scenario.user.id.is_empty() || scenario.user.id.contains('/') {
            return Err(SeedError::Scenario(format!(
                "user id '{}' is not a valid document id",
                scenario.user.id
            )));
        }

        Ok(scenario)
    }
}
