use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Unknown report type '{0}'")]
    UnknownReport(String),

    #[error("Unknown trade filter '{0}'")]
    UnknownFilter(String),
}
