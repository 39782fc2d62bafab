//! `SeaORM` Entity for shops table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use papa_core::DBDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "shops")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Shopify domain, e.g. `example.myshopify.com`
    #[sea_orm(unique)]
    pub shop_domain: String,
    pub created_at: DBDateTime,
    pub updated_at: DBDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::popups::Entity")]
    Popups,
    #[sea_orm(has_many = "super::popup_events::Entity")]
    PopupEvents,
    #[sea_orm(has_many = "super::collected_emails::Entity")]
    CollectedEmails,
}

impl Related<super::popups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Popups.def()
    }
}

impl Related<super::popup_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PopupEvents.def()
    }
}

impl Related<super::collected_emails::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectedEmails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
