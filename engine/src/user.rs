use {
    crate::{
        error::EngineError,
        snapshot::{self, SourceStatus},
    },
    serde::{Deserialize, Deserializer, Serialize},
    serde_json::Value,
};

/// One registered member, as published in the user snapshot.
///
/// Only `user_id` and `referrer_id` take part in aggregation; the remaining
/// fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Wallet address; unique across the snapshot.
    pub user_id: String,

    /// Upline wallet. Roots point at a sentinel wallet or at themselves.
    #[serde(default)]
    pub referrer_id: String,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub user_created: Option<String>,

    /// Either a date string or `{dateTime, POL, rateTHBPOL}`; kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_a: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_b: Option<Value>,
}

impl UserRecord {
    pub fn new(user_id: impl Into<String>, referrer_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            referrer_id: referrer_id.into(),
            ..Self::default()
        }
    }

    /// Records without a usable wallet never become tree nodes.
    pub fn has_wallet(&self) -> bool {
        !self.user_id.trim().is_empty()
    }

    fn from_row(index: usize, row: Value) -> Result<Self, EngineError> {
        let user: UserRecord =
            serde_json::from_value(row).map_err(|err| EngineError::MalformedRecord {
                index,
                reason: err.to_string(),
            })?;
        if !user.has_wallet() {
            return Err(EngineError::MalformedRecord {
                index,
                reason: "blank userId".to_string(),
            });
        }
        Ok(user)
    }
}

/// Accept strings, numbers or booleans; published snapshots are not
/// consistent about `tokenId` in particular.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A point-in-time copy of the member list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserSnapshot {
    users: Vec<UserRecord>,
    malformed: usize,
    status: SourceStatus,
}

impl UserSnapshot {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            malformed: 0,
            status: SourceStatus::Loaded,
        }
    }

    /// Stand-in for a snapshot whose fetch failed.
    pub fn unavailable() -> Self {
        Self {
            users: Vec::new(),
            malformed: 0,
            status: SourceStatus::Unavailable,
        }
    }

    /// Parse a JSON array of user rows. Rows that cannot be read, or that
    /// have a blank `userId`, are skipped and counted.
    pub fn parse(json: &str) -> Result<Self, EngineError> {
        let rows = snapshot::parse_rows(json)?;
        let (users, malformed) = snapshot::ingest_rows("users", rows, UserRecord::from_row);
        Ok(Self {
            users,
            malformed,
            status: SourceStatus::Loaded,
        })
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn into_users(self) -> Vec<UserRecord> {
        self.users
    }

    pub fn malformed(&self) -> usize {
        self.malformed
    }

    pub fn status(&self) -> SourceStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Exact-match lookup by wallet.
    pub fn find(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.user_id == user_id)
    }
}
