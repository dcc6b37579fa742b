use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{Activity, Award, Event, Message, Team, TeamMetric, User};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    create_indexes(
        db,
        User::COLLECTION,
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index(bson::doc! { "teams": 1 }),
        ],
    )
    .await?;

    create_indexes(
        db,
        Team::COLLECTION,
        vec![
            index(bson::doc! { "name": 1 }),
            index(bson::doc! { "join_requests.user_id": 1, "join_requests.status": 1 }),
        ],
    )
    .await?;

    create_indexes(
        db,
        Event::COLLECTION,
        vec![index(bson::doc! { "team_id": 1, "start_time": 1 })],
    )
    .await?;

    create_indexes(
        db,
        Message::COLLECTION,
        vec![index(bson::doc! { "team_id": 1, "created_at": -1 })],
    )
    .await?;

    create_indexes(
        db,
        Activity::COLLECTION,
        vec![index(bson::doc! { "team_id": 1, "created_at": -1 })],
    )
    .await?;

    create_indexes(
        db,
        Award::COLLECTION,
        vec![index(bson::doc! { "team_id": 1 })],
    )
    .await?;

    create_indexes(
        db,
        TeamMetric::COLLECTION,
        vec![index(bson::doc! { "computed_at": -1 })],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
