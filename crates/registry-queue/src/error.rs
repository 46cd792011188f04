use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Receipt handle not found: {0}")]
    NotFound(String),

    #[error("Queue is stopped")]
    Stopped,

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(feature = "amqp")]
impl From<lapin::Error> for QueueError {
    fn from(e: lapin::Error) -> Self {
        QueueError::Broker(e.to_string())
    }
}
