//! `SeaORM` Entity for the append-only popup_events table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use papa_core::DBDateTime;

use crate::event_type::EventType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "popup_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shop_id: String,
    pub popup_id: Option<String>,
    pub event_type: EventType,
    pub step_number: Option<i32>,
    pub timestamp: DBDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shops::Entity",
        from = "Column::ShopId",
        to = "super::shops::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Shop,
    #[sea_orm(
        belongs_to = "super::popups::Entity",
        from = "Column::PopupId",
        to = "super::popups::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Popup,
}

impl Related<super::shops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shop.def()
    }
}

impl Related<super::popups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Popup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
