use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use papa_core::DBDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "collected_emails")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub shop_id: String,
    pub popup_id: Option<String>,
    pub email: String,
    pub created_at: DBDateTime,
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
