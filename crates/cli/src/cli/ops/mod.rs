pub mod get;
pub mod inspect;
pub mod put;
pub mod version;

pub use get::Get;
pub use inspect::Inspect;
pub use put::Put;
pub use version::Version;
