use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AnalyticsError, Result};
use crate::schema::TableKind;

#[derive(Debug, Deserialize)]
struct UserRecord {
    username: String,
    password: String,
}

/// Credentials gate in front of the dashboard: exact username/password
/// match against the users CSV.
#[derive(Debug, Clone, Default)]
pub struct UserTable {
    users: HashMap<String, String>,
}

impl UserTable {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AnalyticsError::DataUnavailable {
                table: TableKind::Users,
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut users = HashMap::new();
        for record in reader.deserialize() {
            let record: UserRecord = record?;
            users.insert(record.username, record.password);
        }
        Ok(Self { users })
    }

    pub fn from_pairs<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: pairs
                .into_iter()
                .map(|(user, pass)| (user.into(), pass.into()))
                .collect(),
        }
    }

    pub fn check(&self, username: &str, password: &str) -> bool {
        if username.is_empty() || password.is_empty() {
            return false;
        }
        self.users
            .get(username)
            .is_some_and(|stored| stored == password)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
