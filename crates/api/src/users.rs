use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ApiError, Result};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_RESULTS: i64 = 10;

/// Pagination parameters for a single user list request.
///
/// Values are forwarded to the server untouched; zero and negative numbers
/// are the server's problem to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserQuery {
    pub page: i64,
    pub results: i64,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            results: DEFAULT_RESULTS,
        }
    }
}

impl UserQuery {
    pub fn new(page: i64, results: i64) -> Self {
        Self { page, results }
    }

    pub fn query_string(&self) -> String {
        format!("page={}&results={}", self.page, self.results)
    }
}

/// Body returned by the user list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub results: Vec<User>,
    pub info: Info,
    // Fields not modelled above, kept so the value round-trips unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    /// Checks the constraints the type system can't express. Called on every
    /// decoded body before it is handed back to the caller.
    pub fn validate(&self) -> Result<()> {
        for (index, user) in self.results.iter().enumerate() {
            if user.email.trim().is_empty() {
                return Err(ApiError::InvalidResponse(format!(
                    "user at index {index} has an empty email"
                )));
            }
            if user.name.first.trim().is_empty() && user.name.last.trim().is_empty() {
                return Err(ApiError::InvalidResponse(format!(
                    "user at index {index} has no name"
                )));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: Name,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<Login>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<DateOfBirth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<Picture>,
    // Location shape varies between API versions (numeric vs string postcodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name.first, self.name.last)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub first: String,
    pub last: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Login {
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateOfBirth {
    pub date: String,
    pub age: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub large: String,
    pub medium: String,
    pub thumbnail: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
