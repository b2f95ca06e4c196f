mod artwork;
mod client;
mod credentials;
mod parser;
mod types;

pub use client::{SoundCloudConfig, SoundCloudExtractor};
pub use credentials::CLIENT_ID_KEY;
