use mongodb::{Client, Database, options::ClientOptions};
use rosterline_config::DatabaseSettings;
use tracing::info;

const APP_NAME: &str = "rosterline";

pub async fn connect(database: &DatabaseSettings) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&database.url).await?;
    client_options.app_name = Some(APP_NAME.to_string());
    client_options.max_pool_size = database.max_pool_size.or(client_options.max_pool_size);
    client_options.min_pool_size = database.min_pool_size.or(client_options.min_pool_size);

    let client = Client::with_options(client_options)?;

    client
        .database(&database.name)
        .run_command(bson::doc! { "ping": 1 })
        .await?;

    info!(
        db = %database.name,
        max_pool = ?database.max_pool_size,
        "Connected to MongoDB"
    );

    Ok(client.database(&database.name))
}
