use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum FacadeError {
    #[error("connection error :: {0}")]
    Connection(#[from] Arc<crate::connection::Error>),
}
