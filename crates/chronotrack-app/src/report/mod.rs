mod manager;

pub use manager::{Report, ReportData, ReportManager};
