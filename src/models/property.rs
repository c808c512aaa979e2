use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Stored property document (`properties` collection).
#[skip_serializing_none]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Property {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub slug: String,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub display_order: i32,
    pub nightly_rate: f64,
    pub cleaning_fee: Option<f64>,
    pub parking_fee: Option<f64>,
    pub admin_fee_percent: Option<f64>,
    pub max_guests: u32,
    pub min_nights: Option<u32>,
    pub max_nights: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Pricing snapshot used for a single booking session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPricing {
    pub nightly_rate: f64,
    #[serde(default)]
    pub cleaning_fee: f64,
    #[serde(default)]
    pub parking_fee: f64,
    #[serde(default)]
    pub admin_fee_percent: f64,
    pub max_guests: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_nights: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_nights: Option<u32>,
}

impl Property {
    pub fn pricing(&self) -> PropertyPricing {
        PropertyPricing {
            nightly_rate: self.nightly_rate,
            cleaning_fee: self.cleaning_fee.unwrap_or(0.0),
            parking_fee: self.parking_fee.unwrap_or(0.0),
            admin_fee_percent: self.admin_fee_percent.unwrap_or(0.0),
            max_guests: self.max_guests.max(1),
            min_nights: self.min_nights,
            max_nights: self.max_nights,
        }
    }
}

/// Public representation returned by `GET /api/properties/{slug}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(flatten)]
    pub pricing: PropertyPricing,
}

impl From<Property> for PropertyDetails {
    fn from(property: Property) -> Self {
        let pricing = property.pricing();
        Self {
            id: property.id.map(|id| id.to_hex()).unwrap_or_default(),
            slug: property.slug,
            name: property.name,
            location: property.location,
            description: property.description,
            amenities: property.amenities,
            featured: property.featured,
            pricing,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub location: Option<String>,
    pub featured: bool,
    pub nightly_rate: f64,
    pub max_guests: u32,
}

impl From<Property> for PropertySummary {
    fn from(property: Property) -> Self {
        Self {
            id: property.id.map(|id| id.to_hex()).unwrap_or_default(),
            slug: property.slug,
            name: property.name,
            location: property.location,
            featured: property.featured,
            nightly_rate: property.nightly_rate,
            max_guests: property.max_guests,
        }
    }
}

/// Admin toggle body for `PATCH /api/admin/properties/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFlagsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}
