pub mod dates;
pub mod error;
pub mod identity;
pub mod merge;
pub mod storage;
pub mod text;
pub mod types;

pub use error::Error;
pub use storage::ArticleStore;
pub use types::{Article, ArticleImage, DetailRecord, ImageInfo, Stub, DEFAULT_AUTHOR};
pub type Result<T> = std::result::Result<T, Error>;
