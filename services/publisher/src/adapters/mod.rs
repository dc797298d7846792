pub mod latency;
pub mod secrets;
pub mod session_file;

pub use latency::SimulatedLatency;
pub use secrets::Argon2Secrets;
pub use session_file::JsonFileSessionStorage;
