use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dao::{
    models::{
        ApprovalEntity, GridEntity, PlayerEntity, RoomEntity, RoomStatus, WordSetEntity,
    },
    room_store::couchdb::error::CouchDaoError,
};

pub const ROOM_PREFIX: &str = "room::";
pub const WORD_SET_PREFIX: &str = "wordset::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[serde(default)]
    pub doc: Option<Value>,
}

/// Body returned by CouchDB on a successful document write.
#[derive(Debug, Deserialize)]
pub struct PutResponse {
    pub rev: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchRoomDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub room: RoomBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomBody {
    pub open: bool,
    pub status: RoomStatus,
    pub grid_size: u8,
    pub creator_id: String,
    pub created_at: SystemTime,
    pub started_at: Option<SystemTime>,
    pub words: Vec<String>,
    pub players: Vec<PlayerEntity>,
    pub player_grids: IndexMap<String, GridEntity>,
    pub pending_approvals: Vec<ApprovalEntity>,
    pub bingo_winners: Vec<String>,
    pub called_out_words: Vec<String>,
    pub version: u64,
}

impl From<(RoomEntity, Option<String>)> for CouchRoomDocument {
    fn from((entity, rev): (RoomEntity, Option<String>)) -> Self {
        Self {
            id: room_doc_id(&entity.id),
            rev,
            room: RoomBody {
                open: entity.open,
                status: entity.status,
                grid_size: entity.grid_size,
                creator_id: entity.creator_id,
                created_at: entity.created_at,
                started_at: entity.started_at,
                words: entity.words,
                players: entity.players,
                player_grids: entity.player_grids,
                pending_approvals: entity.pending_approvals,
                bingo_winners: entity.bingo_winners,
                called_out_words: entity.called_out_words,
                version: entity.version,
            },
        }
    }
}

impl CouchRoomDocument {
    pub fn try_into_entity(self) -> Result<RoomEntity, CouchDaoError> {
        let code = extract_key(&self.id, ROOM_PREFIX)?;
        Ok(RoomEntity {
            id: code.to_string(),
            open: self.room.open,
            status: self.room.status,
            grid_size: self.room.grid_size,
            creator_id: self.room.creator_id,
            created_at: self.room.created_at,
            started_at: self.room.started_at,
            words: self.room.words,
            players: self.room.players,
            player_grids: self.room.player_grids,
            pending_approvals: self.room.pending_approvals,
            bingo_winners: self.room.bingo_winners,
            called_out_words: self.room.called_out_words,
            version: self.room.version,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchWordSetDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub word_set: WordSetBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSetBody {
    pub owner_id: String,
    pub name: String,
    pub items: Vec<String>,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl From<(WordSetEntity, Option<String>)> for CouchWordSetDocument {
    fn from((entity, rev): (WordSetEntity, Option<String>)) -> Self {
        Self {
            id: word_set_doc_id(entity.id),
            rev,
            word_set: WordSetBody {
                owner_id: entity.owner_id,
                name: entity.name,
                items: entity.items,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
        }
    }
}

impl TryFrom<CouchWordSetDocument> for WordSetEntity {
    type Error = CouchDaoError;

    fn try_from(doc: CouchWordSetDocument) -> Result<Self, Self::Error> {
        let key = extract_key(&doc.id, WORD_SET_PREFIX)?;
        let id = Uuid::parse_str(key).map_err(|_| CouchDaoError::InvalidDocId {
            doc_id: doc.id.clone(),
            kind: "invalid UUID",
        })?;

        Ok(Self {
            id,
            owner_id: doc.word_set.owner_id,
            name: doc.word_set.name,
            items: doc.word_set.items,
            created_at: doc.word_set.created_at,
            updated_at: doc.word_set.updated_at,
        })
    }
}

pub fn room_doc_id(code: &str) -> String {
    format!("{}{}", ROOM_PREFIX, code)
}

pub fn word_set_doc_id(id: Uuid) -> String {
    format!("{}{}", WORD_SET_PREFIX, id)
}

fn extract_key<'a>(doc_id: &'a str, prefix: &str) -> Result<&'a str, CouchDaoError> {
    doc_id
        .strip_prefix(prefix)
        .ok_or_else(|| CouchDaoError::InvalidDocId {
            doc_id: doc_id.to_string(),
            kind: "missing prefix",
        })
}
