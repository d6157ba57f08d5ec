use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::comments::CommentRepository;
use crate::config::Config;
use crate::images::ImageStore;
use crate::posts::PostRepository;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub posts: PostRepository,
    pub comments: CommentRepository,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let images = ImageStore::new(config.uploads_path().clone());
        Self {
            posts: PostRepository::new(db.clone()),
            comments: CommentRepository::new(db.clone()),
            images,
            db,
            config,
        }
    }
}
