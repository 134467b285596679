pub mod articles;
pub mod traits;

pub use traits::ArticleRepository;
