use log::{info, warn};
use mongodb::{
    bson::doc,
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{
    bookings::Booking, calendar::CalendarEvent, property::Property, settings::SiteSettings,
};

pub const PROPERTIES: &str = "properties";
pub const BOOKINGS: &str = "bookings";
pub const CALENDAR_EVENTS: &str = "calendar_events";
pub const SITE_SETTINGS: &str = "site_settings";

pub async fn create_mongo_client(uri: &str) -> Result<Arc<Client>, mongodb::error::Error> {
    info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.app_name = Some("cozy-condo-api".to_string());
    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    Ok(Arc::new(Client::with_options(client_options)?))
}

/// Handle to the site database shared by every handler.
#[derive(Clone)]
pub struct Database {
    client: Arc<Client>,
    name: String,
}

impl Database {
    pub fn new(client: Arc<Client>, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
        }
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.client
            .database(&self.name)
            .run_command(doc! {"ping": 1})
            .await
            .map(|_| ())
    }

    /// Logs instead of failing so the API can start while Mongo is still coming up.
    pub async fn verify_connection(&self) {
        match self.ping().await {
            Ok(_) => info!("Successfully connected to MongoDB and verified with ping command"),
            Err(e) => {
                warn!("Connected to MongoDB but ping test failed: {}", e);
                warn!("The API may still work, but some functionality might be impaired");
            }
        }
    }

    /// Unique slugs, and at most one booking per idempotency key.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        let slug = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.properties().create_index(slug).await?;

        let idempotency = IndexModel::builder()
            .keys(doc! { "idempotency_key": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "idempotency_key": { "$type": "string" } })
                    .build(),
            )
            .build();
        self.bookings().create_index(idempotency).await?;

        let stays = IndexModel::builder()
            .keys(doc! { "property_id": 1, "check_in": 1 })
            .build();
        self.bookings().create_index(stays).await?;

        Ok(())
    }

    pub fn properties(&self) -> Collection<Property> {
        self.client.database(&self.name).collection(PROPERTIES)
    }

    pub fn bookings(&self) -> Collection<Booking> {
        self.client.database(&self.name).collection(BOOKINGS)
    }

    pub fn calendar_events(&self) -> Collection<CalendarEvent> {
        self.client.database(&self.name).collection(CALENDAR_EVENTS)
    }

    pub fn site_settings(&self) -> Collection<SiteSettings> {
        self.client.database(&self.name).collection(SITE_SETTINGS)
    }
}
