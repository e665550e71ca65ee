//! Member registry service: registration, login, profile maintenance

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::member::{Member, RegisterMember, UpdateMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn list_members(&self) -> Vec<Member> {
        self.repository.members.list()
    }

    pub fn get_member(&self, id: &str) -> AppResult<Member> {
        self.repository.members.get_by_id(id)
    }

    /// Register a new member with a generated id and today's date
    pub fn register(&self, req: RegisterMember) -> AppResult<Member> {
        req.validate()?;
        if self.repository.members.email_exists(&req.email, None) {
            return Err(AppError::Conflict(format!(
                "email {} is already registered",
                req.email
            )));
        }
        self.repository.members.insert(Member {
            id: String::new(), // assigned by the repository
            name: req.name,
            phone: req.phone,
            email: req.email,
            address: req.address,
            password: req.password,
            registered_on: Utc::now().date_naive(),
        })
    }

    /// Login with member id and password. The store keeps plaintext
    /// passwords, so this is a plain comparison.
    pub fn login(&self, member_id: &str, password: &str) -> AppResult<Member> {
        let member = self
            .repository
            .members
            .find_by_id(member_id)
            .ok_or_else(|| AppError::Authentication(format!("unknown member {}", member_id)))?;
        if member.password != password {
            return Err(AppError::Authentication(format!(
                "wrong password for member {}",
                member_id
            )));
        }
        Ok(member)
    }

    pub fn update_member(&self, id: &str, req: UpdateMember) -> AppResult<Member> {
        req.validate()?;
        let mut member = self.repository.members.get_by_id(id)?;
        if let Some(ref email) = req.email {
            if self.repository.members.email_exists(email, Some(id)) {
                return Err(AppError::Conflict(format!(
                    "email {} is already registered",
                    email
                )));
            }
        }
        if let Some(name) = req.name {
            member.name = name;
        }
        if let Some(phone) = req.phone {
            member.phone = phone;
        }
        if let Some(email) = req.email {
            member.email = email;
        }
        if let Some(address) = req.address {
            member.address = address;
        }
        if let Some(password) = req.password {
            member.password = password;
        }
        self.repository.members.update(member)
    }

    /// Delete a member. Refused while the member still has open
    /// rentals, so every open rental keeps a valid member id.
    pub fn delete_member(&self, id: &str) -> AppResult<()> {
        self.repository.members.get_by_id(id)?;
        if self.repository.rentals.has_open_rentals_for_member(id) {
            return Err(AppError::Conflict(format!(
                "member {} still has open rentals",
                id
            )));
        }
        self.repository.members.delete(id)
    }
}
