pub mod csv_report;
pub mod fs;
