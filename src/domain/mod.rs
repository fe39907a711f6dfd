// Domain entities written by the seeder

pub mod ids;

use serde::{Deserialize, Serialize};

use crate::store::{Document, FieldValue, GeoPoint};

pub use ids::{CropId, DiagnosisId, FarmerId, ProductId, UserId};

pub const USERS: &str = "users";
pub const FARMERS: &str = "farmers";
pub const CROPS: &str = "crops";
pub const DIAGNOSES: &str = "diagnoses";
pub const PRODUCTS: &str = "products";

/// Account profile stored at a caller-chosen id
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

impl UserProfile {
    pub fn user_id(&self) -> UserId {
        UserId::new(&self.id)
    }

    pub fn to_document(&self) -> Document {
        Document::new()
            .with("name", self.name.as_str())
            .with("email", self.email.as_str())
            .with("phone", self.phone.as_str())
            .with("role", self.role.as_str())
            .with("createdAt", FieldValue::ServerTimestamp)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Location> for GeoPoint {
    fn from(value: Location) -> Self {
        GeoPoint::new(value.latitude, value.longitude)
    }
}

/// Crop summary embedded in a farmer profile
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CropSummary {
    pub name: String,
    pub area: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FarmerProfile {
    pub farm_name: String,
    pub address: String,
    pub location: Location,
    pub area: f64,
    pub phone: String,
    #[serde(default)]
    pub crops: Vec<CropSummary>,
}

impl FarmerProfile {
    pub fn to_document(&self, owner: &UserId) -> Document {
        let crops: Vec<Document> = self
            .crops
            .iter()
            .map(|c| Document::new().with("name", c.name.as_str()).with("area", c.area))
            .collect();

        Document::new()
            .with("userId", owner.as_str())
            .with("farmName", self.farm_name.as_str())
            .with("address", self.address.as_str())
            .with("location", GeoPoint::from(self.location))
            .with("area", self.area)
            .with("phone", self.phone.as_str())
            .with("crops", crops)
            .with("createdAt", FieldValue::ServerTimestamp)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Crop {
    pub name: String,
    pub variety: String,
    pub status: String,
    pub area: f64,
}

impl Crop {
    // plantedOn takes the commit time, same as createdAt
    pub fn to_document(&self, farmer: &FarmerId) -> Document {
        Document::new()
            .with("farmerId", farmer.as_str())
            .with("name", self.name.as_str())
            .with("variety", self.variety.as_str())
            .with("plantedOn", FieldValue::ServerTimestamp)
            .with("status", self.status.as_str())
            .with("area", self.area)
            .with("createdAt", FieldValue::ServerTimestamp)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub issue: String,
    pub severity: String,
    pub notes: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl Diagnosis {
    pub fn to_document(&self, farmer: &FarmerId, crop: &CropId, reporter: &UserId) -> Document {
        Document::new()
            .with("farmerId", farmer.as_str())
            .with("cropId", crop.as_str())
            .with("reportedByUid", reporter.as_str())
            .with("issue", self.issue.as_str())
            .with("severity", self.severity.as_str())
            .with("notes", self.notes.as_str())
            .with("imageUrls", self.image_urls.clone())
            .with("createdAt", FieldValue::ServerTimestamp)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub title: String,
    pub category: String,
    pub price: i64,
    pub unit: String,
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    pub fn to_document(&self, seller: &UserId) -> Document {
        Document::new()
            .with("sellerUid", seller.as_str())
            .with("title", self.title.as_str())
            .with("category", self.category.as_str())
            .with("price", self.price)
            .with("unit", self.unit.as_str())
            .with("description", self.description.as_str())
            .with("imageUrl", self.image_url.as_str())
            .with("createdAt", FieldValue::ServerTimestamp)
    }
}
