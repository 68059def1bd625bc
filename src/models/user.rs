use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Candidate,
    Company,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Candidate => "candidate",
            AccountKind::Company => "company",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(AccountKind::Candidate),
            "company" => Ok(AccountKind::Company),
            other => Err(format!("Unknown account kind: {}", other)),
        }
    }
}

/// Stored account. `password` holds the argon2 hash and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl User {
    pub fn is_company(&self) -> bool {
        self.kind == AccountKind::Company
    }

    pub fn is_candidate(&self) -> bool {
        self.kind == AccountKind::Candidate
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub kind: AccountKind,
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

impl UserChanges {
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(company) = self.company {
            user.company = Some(company);
        }
        if let Some(title) = self.title {
            user.title = Some(title);
        }
        if let Some(location) = self.location {
            user.location = Some(location);
        }
        if let Some(bio) = self.bio {
            user.bio = Some(bio);
        }
        if let Some(avatar) = self.avatar {
            user.avatar = Some(avatar);
        }
    }
}
