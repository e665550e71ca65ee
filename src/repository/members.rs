//! Members repository: the member registry store

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::error::{AppError, AppResult};
use crate::models::member::Member;
use crate::repository::{read_guard, read_rows, write_guard, write_rows};

const HEADER: &str = "memberId,name,phone,email,address,password,registeredOn";

#[derive(Clone)]
pub struct MembersRepository {
    path: PathBuf,
    members: Arc<RwLock<Vec<Member>>>,
}

impl MembersRepository {
    /// Load the member store, skipping malformed rows with a warning.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let mut members = Vec::new();
        for record in read_rows(&path)? {
            match Member::from_record(&record) {
                Ok(member) => members.push(member),
                Err(e) => tracing::warn!("{}: skipping member row: {}", path.display(), e),
            }
        }
        tracing::info!("{}: loaded {} members", path.display(), members.len());
        Ok(Self {
            path,
            members: Arc::new(RwLock::new(members)),
        })
    }

    fn persist(&self, members: &[Member]) -> AppResult<()> {
        let rows: Vec<Vec<String>> = members.iter().map(Member::to_record).collect();
        write_rows(&self.path, HEADER, &rows)
    }

    fn next_id(members: &[Member]) -> String {
        let max = members
            .iter()
            .filter_map(|m| m.id.strip_prefix('M').and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0);
        format!("M{:03}", max + 1)
    }

    pub fn list(&self) -> Vec<Member> {
        read_guard(&self.members).clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Member> {
        read_guard(&self.members)
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    pub fn get_by_id(&self, id: &str) -> AppResult<Member> {
        self.find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Case-insensitive email lookup
    pub fn find_by_email(&self, email: &str) -> Option<Member> {
        read_guard(&self.members)
            .iter()
            .find(|m| m.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// Check if an email is already registered, optionally excluding one id
    pub fn email_exists(&self, email: &str, exclude_id: Option<&str>) -> bool {
        read_guard(&self.members)
            .iter()
            .any(|m| m.email.eq_ignore_ascii_case(email) && Some(m.id.as_str()) != exclude_id)
    }

    /// Insert a member with a freshly generated id
    pub fn insert(&self, mut member: Member) -> AppResult<Member> {
        let mut members = write_guard(&self.members);
        member.id = Self::next_id(&members);

        let mut next = members.clone();
        next.push(member.clone());
        self.persist(&next)?;
        *members = next;

        tracing::info!("registered member {} ({})", member.id, member.name);
        Ok(member)
    }

    /// Replace an existing member record in full
    pub fn update(&self, member: Member) -> AppResult<Member> {
        let mut members = write_guard(&self.members);
        let mut next = members.clone();

        let slot = next
            .iter_mut()
            .find(|m| m.id == member.id)
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", member.id)))?;
        *slot = member.clone();

        self.persist(&next)?;
        *members = next;
        Ok(member)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        let mut members = write_guard(&self.members);
        if !members.iter().any(|m| m.id == id) {
            return Err(AppError::NotFound(format!("Member with id {} not found", id)));
        }

        let next: Vec<Member> = members.iter().filter(|m| m.id != id).cloned().collect();
        self.persist(&next)?;
        *members = next;

        tracing::info!("deleted member {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, email: &str) -> Member {
        Member {
            id: String::new(),
            name: name.into(),
            phone: "555-0101".into(),
            email: email.into(),
            address: "3 Carnival Way".into(),
            password: "sesame".into(),
            registered_on: "2025-01-15".parse().unwrap(),
        }
    }

    #[test]
    fn insert_generates_ids_and_email_lookup_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("members.csv");
        let repo = MembersRepository::open(&path).unwrap();

        let a = repo.insert(sample("Ada", "ada@example.org")).unwrap();
        assert_eq!(a.id, "M001");
        assert!(repo.email_exists("ADA@example.org", None));
        assert!(!repo.email_exists("ada@example.org", Some("M001")));
        assert_eq!(repo.find_by_email("Ada@Example.org").unwrap().id, "M001");

        let reloaded = MembersRepository::open(&path).unwrap();
        assert_eq!(reloaded.get_by_id("M001").unwrap().name, "Ada");
    }

    #[test]
    fn delete_requires_an_existing_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = MembersRepository::open(dir.path().join("members.csv")).unwrap();
        assert!(matches!(repo.delete("M009"), Err(AppError::NotFound(_))));
    }
}
