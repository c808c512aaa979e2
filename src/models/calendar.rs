use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEventType {
    Blocked,
    Maintenance,
    Note,
}

impl CalendarEventType {
    pub fn blocks_night(&self) -> bool {
        matches!(self, CalendarEventType::Blocked | CalendarEventType::Maintenance)
    }
}

/// Manually managed calendar entry (`calendar_events` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub property_id: ObjectId,
    pub event_date: NaiveDate,
    pub event_type: CalendarEventType,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub blocked_dates: Vec<NaiveDate>,
}
