//! Member model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::rental::DATE_FORMAT;

/// A registered member. The password is stored as plaintext in the
/// member store, matching the original application's file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub registered_on: NaiveDate,
}

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterMember {
    #[validate(length(min = 1))]
    pub name: String,
    pub phone: String,
    #[validate(email)]
    pub email: String,
    pub address: String,
    #[validate(length(min = 4))]
    pub password: String,
}

/// Update member request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateMember {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(length(min = 4))]
    pub password: Option<String>,
}

impl Member {
    /// Serialize to the 7-field store row
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.address.clone(),
            self.password.clone(),
            self.registered_on.format(DATE_FORMAT).to_string(),
        ]
    }

    /// Parse a store row back into a member record
    pub fn from_record(record: &csv::StringRecord) -> AppResult<Self> {
        if record.len() != 7 {
            return Err(AppError::Parse(format!(
                "member row has {} fields, expected 7",
                record.len()
            )));
        }
        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        let registered_on = NaiveDate::parse_from_str(field(6), DATE_FORMAT)
            .map_err(|e| AppError::Parse(format!("bad date '{}': {}", field(6), e)))?;

        Ok(Self {
            id: field(0).to_string(),
            name: field(1).to_string(),
            phone: field(2).to_string(),
            email: field(3).to_string(),
            address: field(4).to_string(),
            password: field(5).to_string(),
            registered_on,
        })
    }
}
