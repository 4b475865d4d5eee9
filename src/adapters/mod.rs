// Adapters layer: concrete implementations of the domain ports (http, audio, wallet).

pub mod audio;
pub mod http;
pub mod wallet;
