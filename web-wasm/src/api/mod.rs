pub mod backend;

pub use backend::HttpBackend;
