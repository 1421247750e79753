//! In-memory content store with JSON snapshot persistence.
//!
//! The maps in memory are the source of truth. Every mutation rewrites the
//! whole snapshot file while still holding the write lock, so snapshots never
//! interleave and read-modify-write updates cannot lose increments.

mod comments;
mod persist;
mod posts;
mod seed;
mod users;

use persist::{LoadOutcome, SnapshotFile};

use std::collections::HashMap;
use std::path::Path;

use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{BlogComment, BlogPost, Snapshot, User, UserRecord};

/// Everything the store holds, keyed by id.
#[derive(Debug, Clone, Default)]
struct StoreData {
    users: HashMap<String, User>,
    posts: HashMap<String, BlogPost>,
    comments: HashMap<String, BlogComment>,
}

impl StoreData {
    /// Build the maps from a loaded snapshot. The flag is set when legacy
    /// user records were upgraded and the file should be rewritten.
    async fn from_snapshot(snapshot: Snapshot) -> Result<(Self, bool), AppError> {
        let (users, upgraded) = users::users_from_records(snapshot.users).await?;
        let data = Self {
            users,
            posts: snapshot
                .blog_posts
                .unwrap_or_default()
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            comments: snapshot
                .blog_comments
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect(),
        };
        Ok((data, upgraded))
    }

    /// Snapshot with entities in creation order so the file diffs cleanly.
    fn to_snapshot(&self) -> Snapshot {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut posts: Vec<BlogPost> = self.posts.values().cloned().collect();
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut comments: Vec<BlogComment> = self.comments.values().cloned().collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Snapshot {
            users: users.into_iter().map(UserRecord::from).collect(),
            blog_posts: Some(posts),
            blog_comments: comments,
        }
    }
}

/// Store of posts, comments and users shared by all handlers.
pub struct ContentStore {
    data: RwLock<StoreData>,
    file: Option<SnapshotFile>,
}

impl ContentStore {
    /// Open the store over a snapshot file, seeding sample posts when the
    /// file is missing, corrupt, or has no posts section.
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let file = SnapshotFile::new(path);

        let (snapshot, needs_seed) = match file.load().await? {
            LoadOutcome::Loaded(snapshot) => {
                let needs_seed = snapshot.blog_posts.is_none();
                (snapshot, needs_seed)
            }
            LoadOutcome::Missing => {
                tracing::info!("No data file at {:?}, starting fresh", path);
                (Snapshot::default(), true)
            }
            LoadOutcome::Corrupt => (Snapshot::default(), true),
        };

        let (mut data, upgraded) = StoreData::from_snapshot(snapshot).await?;
        if needs_seed {
            for post in seed::sample_posts() {
                data.posts.insert(post.id.clone(), post);
            }
            tracing::info!("Seeded {} sample posts", data.posts.len());
        }

        let store = Self {
            data: RwLock::new(data),
            file: Some(file),
        };

        if needs_seed || upgraded {
            let data = store.data.read().await;
            store.persist(&data).await?;
        }

        {
            let data = store.data.read().await;
            tracing::info!(
                "Loaded {} posts, {} comments, {} users",
                data.posts.len(),
                data.comments.len(),
                data.users.len()
            );
        }

        Ok(store)
    }

    /// An empty store that never touches the disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            file: None,
        }
    }

    /// Write the full snapshot. Callers hold the lock that produced `data`.
    async fn persist(&self, data: &StoreData) -> Result<(), AppError> {
        match &self.file {
            Some(file) => file.save(&data.to_snapshot()).await,
            None => Ok(()),
        }
    }

    /// Apply `change` to a copy of `data`, save the copy, and only then
    /// make it live. A failed save leaves `data` untouched.
    async fn commit<T>(
        &self,
        data: &mut StoreData,
        change: impl FnOnce(&mut StoreData) -> T,
    ) -> Result<T, AppError> {
        let mut next = data.clone();
        let value = change(&mut next);
        self.persist(&next).await?;
        *data = next;
        Ok(value)
    }
}
