//! Costumes repository: the catalog store

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::error::{AppError, AppResult};
use crate::models::costume::Costume;
use crate::repository::{read_guard, read_rows, write_guard, write_rows};

const HEADER: &str = "costumeId,costumeName,eventCategory,price,size:stock...,imagePath";

/// Catalog store access. The rental engine only reads from here; the
/// admin screens go through the catalog service for mutations.
#[derive(Clone)]
pub struct CostumesRepository {
    path: PathBuf,
    costumes: Arc<RwLock<Vec<Costume>>>,
}

impl CostumesRepository {
    /// Load the catalog store, skipping malformed rows with a warning.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let mut costumes = Vec::new();
        for record in read_rows(&path)? {
            match Costume::from_record(&record) {
                Ok(costume) => costumes.push(costume),
                Err(e) => tracing::warn!("{}: skipping costume row: {}", path.display(), e),
            }
        }
        tracing::info!("{}: loaded {} costumes", path.display(), costumes.len());
        Ok(Self {
            path,
            costumes: Arc::new(RwLock::new(costumes)),
        })
    }

    fn persist(&self, costumes: &[Costume]) -> AppResult<()> {
        let rows: Vec<Vec<String>> = costumes.iter().map(Costume::to_record).collect();
        write_rows(&self.path, HEADER, &rows)
    }

    fn next_id(costumes: &[Costume]) -> String {
        let max = costumes
            .iter()
            .filter_map(|c| c.id.strip_prefix('C').and_then(|n| n.parse::<u32>().ok()))
            .max()
            .unwrap_or(0);
        format!("C{:03}", max + 1)
    }

    pub fn list(&self) -> Vec<Costume> {
        read_guard(&self.costumes).clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Costume> {
        read_guard(&self.costumes)
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    pub fn get_by_id(&self, id: &str) -> AppResult<Costume> {
        self.find_by_id(id)
            .ok_or_else(|| AppError::NotFound(format!("Costume with id {} not found", id)))
    }

    /// Fixed stock ceiling for a costume/size pair; 0 when either is unknown
    pub fn stock_for(&self, costume_id: &str, size: &str) -> u32 {
        read_guard(&self.costumes)
            .iter()
            .find(|c| c.id == costume_id)
            .map(|c| c.stock_for(size))
            .unwrap_or(0)
    }

    /// Insert a costume with a freshly generated id
    pub fn insert(&self, mut costume: Costume) -> AppResult<Costume> {
        let mut costumes = write_guard(&self.costumes);
        costume.id = Self::next_id(&costumes);

        let mut next = costumes.clone();
        next.push(costume.clone());
        self.persist(&next)?;
        *costumes = next;

        tracing::info!("created costume {} ({})", costume.id, costume.name);
        Ok(costume)
    }

    /// Replace an existing costume record in full
    pub fn update(&self, costume: Costume) -> AppResult<Costume> {
        let mut costumes = write_guard(&self.costumes);
        let mut next = costumes.clone();

        let slot = next
            .iter_mut()
            .find(|c| c.id == costume.id)
            .ok_or_else(|| AppError::NotFound(format!("Costume with id {} not found", costume.id)))?;
        *slot = costume.clone();

        self.persist(&next)?;
        *costumes = next;
        Ok(costume)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        let mut costumes = write_guard(&self.costumes);
        if !costumes.iter().any(|c| c.id == id) {
            return Err(AppError::NotFound(format!("Costume with id {} not found", id)));
        }

        let next: Vec<Costume> = costumes.iter().filter(|c| c.id != id).cloned().collect();
        self.persist(&next)?;
        *costumes = next;

        tracing::info!("deleted costume {}", id);
        Ok(())
    }
}
