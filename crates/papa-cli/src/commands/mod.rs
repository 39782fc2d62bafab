pub mod database;
pub mod report;
pub mod serve;

pub use database::DatabaseArgs;
pub use report::ReportCommand;
pub use serve::ServeCommand;
