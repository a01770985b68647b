pub mod migrations;
pub mod port;
pub mod repository;

pub use port::SharedStore;
pub use repository::SqliteStore;
