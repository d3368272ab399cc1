/// Local durable queue of payloads awaiting upload.
pub mod fallback_queue;
/// Persistence gateway abstraction and its remote implementation.
pub mod gateway;
/// Persisted document definitions.
pub mod models;
/// Storage error types shared by every gateway.
pub mod storage;
