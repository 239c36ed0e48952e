pub mod client;
pub mod encoding;
pub mod ini;
pub mod launcher;
pub mod store;

pub use client::SandboxClient;
pub use ini::{Config, SandboxProfile};
pub use store::ConfigStore;
