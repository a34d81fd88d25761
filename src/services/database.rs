use log::info;
use mongodb::{Client, Database};

use crate::config::Config;

pub async fn connect_to_database(config: &Config) -> mongodb::error::Result<Database> {
    let client = Client::with_uri_str(&config.mongo_uri).await?;
    info!("Connected to MongoDB");
    info!("Using database {}", config.db_name);
    Ok(client.database(&config.db_name))
}
