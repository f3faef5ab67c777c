pub mod health_handlers;
pub mod report_handlers;
pub mod upload_handlers;

pub use health_handlers::health_handler;
pub use report_handlers::{download_csv, download_excel, report_page};
pub use upload_handlers::{upload_csv, upload_excel};
