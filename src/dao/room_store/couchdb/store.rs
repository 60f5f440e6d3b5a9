use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::warn;
use uuid::Uuid;

use crate::dao::{
    models::{RoomEntity, RoomListItemEntity, WordSetEntity},
    room_store::{RoomStore, RoomUpdates},
    storage::{StorageError, StorageResult},
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{
        AllDocsResponse, CouchRoomDocument, CouchWordSetDocument, END_SUFFIX, PutResponse,
        ROOM_PREFIX, WORD_SET_PREFIX, room_doc_id, word_set_doc_id,
    },
};

/// CouchDB-backed room store.
///
/// Tracks the `_rev` observed for each document version so optimistic writes
/// can present the matching revision; a stale revision (or a competing
/// writer) surfaces as a storage conflict.
#[derive(Clone)]
pub struct CouchRoomStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
    revisions: Arc<DashMap<String, (u64, String)>>,
    poll_interval: Duration,
}

impl CouchRoomStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
            revisions: Arc::new(DashMap::new()),
            poll_interval: config.poll_interval,
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}/{}", self.base_url, self.database, path);
        let builder = self.client.request(method, url);
        if let Some((ref user, ref pass)) = self.auth {
            builder.basic_auth(user.as_ref(), Some(pass.as_ref()))
        } else {
            builder
        }
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let url = format!("{}/{}", self.base_url, self.database);
        let mut builder = self.client.get(&url);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
        }

        let response = builder
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let mut builder = self.client.put(&url);
                if let Some((ref user, ref pass)) = self.auth {
                    builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
                }
                let create =
                    builder
                        .send()
                        .await
                        .map_err(|source| CouchDaoError::DatabaseCreate {
                            database: database.clone(),
                            source,
                        })?;
                if create.status().is_success() {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<PutResponse>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::CONFLICT => Err(CouchDaoError::Conflict {
                doc_id: doc_id.to_string(),
            }),
            status if status.is_success() => {
                response
                    .json::<PutResponse>()
                    .await
                    .map_err(|source| CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn delete_document(&self, doc_id: &str, rev: &str) -> CouchResult<bool> {
        let response = self
            .request(Method::DELETE, doc_id)
            .query(&[("rev", rev)])
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            StatusCode::CONFLICT => Err(CouchDaoError::Conflict {
                doc_id: doc_id.to_string(),
            }),
            status if status.is_success() => Ok(true),
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn list_documents<T>(&self, prefix: &str) -> CouchResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        const ALL_DOCS: &str = "_all_docs";
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .request(Method::GET, ALL_DOCS)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            }
        })?;

        let mut documents = Vec::new();
        for row in payload.rows {
            if let Some(doc) = row.doc {
                let parsed = from_value(doc).map_err(|source| CouchDaoError::DeserializeValue {
                    path: ALL_DOCS.to_string(),
                    source,
                })?;
                documents.push(parsed);
            }
        }

        Ok(documents)
    }

    /// Fetch a room document, refreshing the revision cache on the way.
    async fn fetch_room(&self, code: &str) -> CouchResult<Option<RoomEntity>> {
        let doc_id = room_doc_id(code);
        let Some(doc) = self.get_document::<CouchRoomDocument>(&doc_id).await? else {
            self.revisions.remove(&doc_id);
            return Ok(None);
        };

        if let Some(rev) = doc.rev.clone() {
            self.revisions.insert(doc_id, (doc.room.version, rev));
        }

        doc.try_into_entity().map(Some)
    }

    /// Resolve the `_rev` matching the version a writer read, falling back
    /// to the live document when the cache has moved on.
    async fn room_revision_for(&self, doc_id: &str, version: u64) -> CouchResult<String> {
        if let Some(entry) = self.revisions.get(doc_id) {
            let (known_version, rev) = entry.value();
            if *known_version == version {
                return Ok(rev.clone());
            }
        }

        let Some(doc) = self.get_document::<CouchRoomDocument>(doc_id).await? else {
            return Err(CouchDaoError::Conflict {
                doc_id: doc_id.to_string(),
            });
        };

        if doc.room.version != version {
            return Err(CouchDaoError::Conflict {
                doc_id: doc_id.to_string(),
            });
        }

        doc.rev.ok_or(CouchDaoError::Conflict {
            doc_id: doc_id.to_string(),
        })
    }
}

impl RoomStore for CouchRoomStore {
    fn create_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = room_doc_id(&room.id);
            let version = room.version;
            let doc = CouchRoomDocument::from((room, None));
            match store.put_document(&doc_id, &doc).await {
                Ok(put) => {
                    store.revisions.insert(doc_id, (version, put.rev));
                    Ok(true)
                }
                Err(CouchDaoError::Conflict { .. }) => Ok(false),
                Err(err) => Err(err.into()),
            }
        })
    }

    fn find_room(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        let id = id.to_string();
        Box::pin(async move { store.fetch_room(&id).await.map_err(Into::into) })
    }

    fn put_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = room_doc_id(&room.id);
            let rev = store.room_revision_for(&doc_id, room.version).await?;

            let mut next = room;
            next.version += 1;
            let next_version = next.version;
            let doc = CouchRoomDocument::from((next, Some(rev)));

            match store.put_document(&doc_id, &doc).await {
                Ok(put) => {
                    store.revisions.insert(doc_id, (next_version, put.rev));
                    Ok(())
                }
                Err(err @ CouchDaoError::Conflict { .. }) => {
                    // Another writer won; forget the stale revision so the
                    // next attempt consults the live document.
                    store.revisions.remove(&doc_id);
                    Err(err.into())
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    fn delete_room(&self, id: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        let id = id.to_string();
        Box::pin(async move {
            let doc_id = room_doc_id(&id);
            let Some(doc) = store.get_document::<CouchRoomDocument>(&doc_id).await? else {
                return Ok(false);
            };
            let Some(rev) = doc.rev else {
                return Ok(false);
            };

            let deleted = store.delete_document(&doc_id, &rev).await?;
            store.revisions.remove(&doc_id);
            Ok(deleted)
        })
    }

    fn list_rooms(
        &self,
        creator_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<RoomListItemEntity>>> {
        let store = self.clone();
        let creator_id = creator_id.to_string();
        Box::pin(async move {
            let docs = store
                .list_documents::<CouchRoomDocument>(ROOM_PREFIX)
                .await?;

            let mut items = Vec::new();
            for doc in docs {
                let entity = doc.try_into_entity()?;
                if entity.creator_id == creator_id {
                    items.push((&entity).into());
                }
            }
            items.sort_by(|a: &RoomListItemEntity, b: &RoomListItemEntity| {
                a.created_at.cmp(&b.created_at)
            });
            Ok(items)
        })
    }

    fn watch_room(&self, id: &str) -> BoxFuture<'static, StorageResult<RoomUpdates>> {
        let store = self.clone();
        let id = id.to_string();
        Box::pin(async move {
            let initial = store.fetch_room(&id).await.map_err(StorageError::from)?;
            let mut last_version = initial.as_ref().map(|room| room.version);
            let (publisher, receiver) = watch::channel(initial);

            tokio::spawn(async move {
                let mut ticker = interval(store.poll_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    ticker.tick().await;
                    if publisher.is_closed() {
                        break;
                    }

                    match store.fetch_room(&id).await {
                        Ok(current) => {
                            let version = current.as_ref().map(|room| room.version);
                            if version == last_version {
                                continue;
                            }
                            last_version = version;
                            let deleted = current.is_none();
                            if publisher.send(current).is_err() || deleted {
                                break;
                            }
                        }
                        Err(err) => {
                            warn!(room = %id, error = %err, "room watch poll failed");
                        }
                    }
                }
            });

            Ok(receiver)
        })
    }

    fn save_word_set(&self, set: WordSetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = word_set_doc_id(set.id);
            let mut doc = CouchWordSetDocument::from((set, None));
            if let Some(existing) = store.get_document::<CouchWordSetDocument>(&doc_id).await? {
                doc.rev = existing.rev;
            }
            store
                .put_document(&doc_id, &doc)
                .await
                .map(|_| ())
                .map_err(Into::into)
        })
    }

    fn find_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<WordSetEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = word_set_doc_id(id);
            let maybe_doc = store.get_document::<CouchWordSetDocument>(&doc_id).await?;
            match maybe_doc {
                Some(doc) => Ok(Some(doc.try_into()?)),
                None => Ok(None),
            }
        })
    }

    fn list_word_sets(
        &self,
        owner_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<WordSetEntity>>> {
        let store = self.clone();
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let docs = store
                .list_documents::<CouchWordSetDocument>(WORD_SET_PREFIX)
                .await?;

            let mut sets = Vec::new();
            for doc in docs {
                let entity: WordSetEntity = doc.try_into()?;
                if entity.owner_id == owner_id {
                    sets.push(entity);
                }
            }
            sets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(sets)
        })
    }

    fn delete_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = word_set_doc_id(id);
            let Some(doc) = store.get_document::<CouchWordSetDocument>(&doc_id).await? else {
                return Ok(false);
            };
            let Some(rev) = doc.rev else {
                return Ok(false);
            };
            store
                .delete_document(&doc_id, &rev)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let url = format!("{}/{}", store.base_url, store.database);
            let mut builder = store.client.get(&url);
            if let Some((ref user, ref pass)) = store.auth {
                builder = builder.basic_auth(user.as_ref(), Some(pass.as_ref()));
            }

            let response = builder
                .send()
                .await
                .map_err(|source| CouchDaoError::RequestSend {
                    path: url.clone(),
                    source,
                })?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(CouchDaoError::RequestStatus {
                    path: url,
                    status: response.status(),
                }
                .into())
            }
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
