use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use papa_core::DBDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "popup_steps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub popup_id: String,
    /// 1-based, unique per popup
    pub step_number: i32,
    pub step_type: String, // question, email_capture, ...
    pub created_at: DBDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::popups::Entity",
        from = "Column::PopupId",
        to = "super::popups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Popup,
}

impl Related<super::popups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Popup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
