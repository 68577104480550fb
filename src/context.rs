use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{PatchSource, ReportSink};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub patch_source: Arc<dyn PatchSource>,
    pub report_sink: Arc<dyn ReportSink>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        patch_source: Arc<dyn PatchSource>,
        report_sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            config,
            patch_source,
            report_sink,
        }
    }
}
