pub mod model;
pub mod query;
pub mod repository;
pub mod search;
pub mod tags;

pub use model::{Post, PostsPage};
pub use repository::PostRepository;
pub use search::{parse_search, SearchCriteria};
