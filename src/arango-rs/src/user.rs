//! Server user accounts (`/user`).

use std::collections::BTreeMap;

use arango_core::{UserInfo, UserOptions, UserRecord, DEFAULT_DATABASE};
use serde::Serialize;

use crate::arango::Arango;
use crate::error::Result;

#[derive(Serialize)]
struct UserBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    passwd: Option<&'a str>,
    #[serde(flatten)]
    options: &'a UserOptions,
}

impl Arango {
    /// Every account, keyed by user name.
    pub async fn users(&self) -> Result<BTreeMap<String, UserInfo>> {
        let records: Vec<UserRecord> = self
            .conn
            .get(DEFAULT_DATABASE, "/user")
            .send()
            .await?
            .ok_or("list users")?
            .into_field("result")?;
        Ok(records
            .into_iter()
            .map(|record| (record.user, record.info))
            .collect())
    }

    pub async fn user(&self, username: &str) -> Result<UserInfo> {
        self.conn
            .get(DEFAULT_DATABASE, format!("/user/{}", username))
            .send()
            .await?
            .ok_or("get user")?
            .into_body()
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        options: &UserOptions,
    ) -> Result<UserInfo> {
        self.conn
            .post(DEFAULT_DATABASE, "/user")
            .json(&UserBody {
                user: Some(username),
                passwd: Some(password),
                options,
            })
            .send()
            .await?
            .ok_or("create user")?
            .into_body()
    }

    /// Changes the given attributes; `None` keeps the current password.
    pub async fn update_user(
        &self,
        username: &str,
        password: Option<&str>,
        options: &UserOptions,
    ) -> Result<UserInfo> {
        self.conn
            .patch(DEFAULT_DATABASE, format!("/user/{}", username))
            .json(&UserBody {
                user: None,
                passwd: password,
                options,
            })
            .send()
            .await?
            .ok_or("update user")?
            .into_body()
    }

    pub async fn replace_user(
        &self,
        username: &str,
        password: &str,
        options: &UserOptions,
    ) -> Result<UserInfo> {
        self.conn
            .put(DEFAULT_DATABASE, format!("/user/{}", username))
            .json(&UserBody {
                user: None,
                passwd: Some(password),
                options,
            })
            .send()
            .await?
            .ok_or("replace user")?
            .into_body()
    }

    /// Deletes an account; with `safe_delete` a missing user is not an error.
    pub async fn delete_user(&self, username: &str, safe_delete: bool) -> Result<()> {
        let response = self
            .conn
            .delete(DEFAULT_DATABASE, format!("/user/{}", username))
            .send()
            .await?;
        if !(safe_delete && response.status_code == 404) {
            response.ok_or("delete user")?;
        }
        Ok(())
    }
}
