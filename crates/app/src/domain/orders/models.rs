//! Order Models

/// Backend answer to a status change
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusUpdated {
    /// Backend message, if any
    pub message: Option<String>,
}
