pub mod errors;
pub mod models;
pub mod ports;
pub mod registry;

pub use errors::KeyError;
pub use models::KeyId;
pub use models::SigningKey;
pub use models::SECRET_LENGTH;
pub use ports::KeyIdGenerator;
pub use ports::OsRandomSource;
pub use ports::RandomSource;
pub use ports::UuidKeyIdGenerator;
pub use registry::InMemoryKeyRegistry;
pub use registry::KeyRegistry;
