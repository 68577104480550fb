pub mod patch_source;
pub mod report_sink;

pub use patch_source::PatchSource;
pub use report_sink::{PatchReportRow, ReportSink, TakesReportRow};
