pub mod host;
pub mod page;

pub use host::DomHost;
