pub mod category;
pub mod product;
pub mod user;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use crate::entities::{
    category::Entity as Category,
    product::Entity as Product,
    user::Entity as User,
};

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, Category).await?;
    create_table(db, Product).await?;
    create_table(db, User).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let table = entity.table_name().to_owned();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(backend.build(&statement)).await?;
    tracing::debug!(table = %table, "Table is ready");
    Ok(())
}
