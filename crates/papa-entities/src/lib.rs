pub mod event_type;
pub mod shops;
pub mod popups;
pub mod popup_steps;
pub mod popup_events;
pub mod collected_emails;

pub use event_type::EventType;
