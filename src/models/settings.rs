use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Site-wide settings shown on public pages (`site_settings` collection).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(rename = "_id", default, skip_serializing)]
    pub id: Option<ObjectId>,
    pub site_name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub hero_title: Option<String>,
    #[serde(default)]
    pub hero_subtitle: Option<String>,
}
