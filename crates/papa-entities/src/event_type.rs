//! Event types reported by the storefront popup widget

use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    ToSchema,
    DeriveActiveEnum,
    EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// The popup became visible to a visitor
    #[sea_orm(string_value = "impression")]
    Impression,
    #[sea_orm(string_value = "click")]
    Click,
    #[sea_orm(string_value = "close")]
    Close,
    /// The visitor finished the whole popup flow
    #[sea_orm(string_value = "complete")]
    Complete,
    #[sea_orm(string_value = "step_view")]
    StepView,
    #[sea_orm(string_value = "step_complete")]
    StepComplete,
    #[sea_orm(string_value = "button_click")]
    ButtonClick,
}

impl EventType {
    /// Event types that count towards the click total
    pub const CLICK_LIKE: [EventType; 3] = [
        EventType::Click,
        EventType::StepComplete,
        EventType::ButtonClick,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Impression => "impression",
            EventType::Click => "click",
            EventType::Close => "close",
            EventType::Complete => "complete",
            EventType::StepView => "step_view",
            EventType::StepComplete => "step_complete",
            EventType::ButtonClick => "button_click",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "impression" => Ok(EventType::Impression),
            "click" => Ok(EventType::Click),
            "close" => Ok(EventType::Close),
            "complete" => Ok(EventType::Complete),
            "step_view" => Ok(EventType::StepView),
            "step_complete" => Ok(EventType::StepComplete),
            "button_click" => Ok(EventType::ButtonClick),
            other => Err(format!("unknown event type '{}'", other)),
        }
    }
}
