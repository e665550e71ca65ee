//! Catalog management service (admin screens)

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::costume::{Costume, CreateCostume, EventCategory, UpdateCostume},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn list_costumes(&self) -> Vec<Costume> {
        self.repository.costumes.list()
    }

    pub fn costumes_by_category(&self, category: EventCategory) -> Vec<Costume> {
        self.repository
            .costumes
            .list()
            .into_iter()
            .filter(|c| c.category == category)
            .collect()
    }

    pub fn get_costume(&self, id: &str) -> AppResult<Costume> {
        self.repository.costumes.get_by_id(id)
    }

    pub fn create_costume(&self, req: CreateCostume) -> AppResult<Costume> {
        req.validate()?;
        self.repository.costumes.insert(Costume {
            id: String::new(), // assigned by the repository
            name: req.name,
            category: req.category,
            price: req.price,
            sizes: req.sizes,
            image_path: req.image_path,
        })
    }

    pub fn update_costume(&self, id: &str, req: UpdateCostume) -> AppResult<Costume> {
        req.validate()?;
        let mut costume = self.repository.costumes.get_by_id(id)?;
        if let Some(name) = req.name {
            costume.name = name;
        }
        if let Some(category) = req.category {
            costume.category = category;
        }
        if let Some(price) = req.price {
            costume.price = price;
        }
        if let Some(sizes) = req.sizes {
            costume.sizes = sizes;
        }
        if let Some(image_path) = req.image_path {
            costume.image_path = image_path;
        }
        self.repository.costumes.update(costume)
    }

    /// Delete a costume. Refused while any of its rentals is still
    /// open, so existing bookings keep a valid catalog reference.
    pub fn delete_costume(&self, id: &str) -> AppResult<()> {
        self.repository.costumes.get_by_id(id)?;
        if self.repository.rentals.has_open_rentals_for_costume(id) {
            return Err(AppError::Conflict(format!(
                "costume {} still has open rentals",
                id
            )));
        }
        self.repository.costumes.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::models::rental::CreateRental;
    use std::collections::BTreeMap;

    fn setup(dir: &tempfile::TempDir) -> (Repository, CatalogService) {
        let config = StoreConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let repository = Repository::open(&config).unwrap();
        let service = CatalogService::new(repository.clone());
        (repository, service)
    }

    fn create_request(name: &str) -> CreateCostume {
        CreateCostume {
            name: name.into(),
            category: EventCategory::Theatre,
            price: 25.0,
            sizes: BTreeMap::from([("M".into(), 1)]),
            image_path: "images/mask.png".into(),
        }
    }

    #[test]
    fn create_update_and_filter_by_category() {
        let dir = tempfile::tempdir().unwrap();
        let (_, service) = setup(&dir);

        let created = service.create_costume(create_request("Phantom Mask")).unwrap();
        assert_eq!(created.id, "C001");

        let updated = service
            .update_costume(
                "C001",
                UpdateCostume {
                    price: Some(30.0),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price, 30.0);
        assert_eq!(updated.name, "Phantom Mask");

        assert_eq!(service.costumes_by_category(EventCategory::Theatre).len(), 1);
        assert!(service.costumes_by_category(EventCategory::Halloween).is_empty());
    }

    #[test]
    fn negative_price_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let (_, service) = setup(&dir);

        let mut req = create_request("Broken");
        req.price = -1.0;
        assert!(matches!(
            service.create_costume(req),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn delete_is_refused_while_rentals_are_open() {
        let dir = tempfile::tempdir().unwrap();
        let (repository, service) = setup(&dir);

        let costume = service.create_costume(create_request("Phantom Mask")).unwrap();
        let rental = repository
            .rentals
            .create(
                &CreateRental {
                    member_id: "M001".into(),
                    costume_id: costume.id.clone(),
                    size: "M".into(),
                    rental_date: "2025-07-01".parse().unwrap(),
                    return_date: "2025-07-03".parse().unwrap(),
                },
                75.0,
            )
            .unwrap();

        assert!(matches!(
            service.delete_costume(&costume.id),
            Err(AppError::Conflict(_))
        ));

        repository
            .rentals
            .return_rental(&rental.id, "2025-07-03".parse().unwrap())
            .unwrap();
        service.delete_costume(&costume.id).unwrap();
        assert!(service.list_costumes().is_empty());
    }
}
