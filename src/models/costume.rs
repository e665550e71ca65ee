//! Costume model and related types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Event tags used to group the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventCategory {
    Halloween,
    Christmas,
    Carnival,
    Masquerade,
    Cosplay,
    Theatre,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Halloween => "HALLOWEEN",
            EventCategory::Christmas => "CHRISTMAS",
            EventCategory::Carnival => "CARNIVAL",
            EventCategory::Masquerade => "MASQUERADE",
            EventCategory::Cosplay => "COSPLAY",
            EventCategory::Theatre => "THEATRE",
            EventCategory::Other => "OTHER",
        }
    }

    pub fn all() -> &'static [EventCategory] {
        &[
            EventCategory::Halloween,
            EventCategory::Christmas,
            EventCategory::Carnival,
            EventCategory::Masquerade,
            EventCategory::Cosplay,
            EventCategory::Theatre,
            EventCategory::Other,
        ]
    }
}

impl From<&str> for EventCategory {
    fn from(s: &str) -> Self {
        match s {
            "HALLOWEEN" => EventCategory::Halloween,
            "CHRISTMAS" => EventCategory::Christmas,
            "CARNIVAL" => EventCategory::Carnival,
            "MASQUERADE" => EventCategory::Masquerade,
            "COSPLAY" => EventCategory::Cosplay,
            "THEATRE" => EventCategory::Theatre,
            _ => EventCategory::Other,
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A catalog entry. The per-size stock counts are the fixed ceiling for
/// concurrent reservations; nothing ever mutates them during the rental
/// lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Costume {
    pub id: String,
    pub name: String,
    pub category: EventCategory,
    /// Per-day rate
    pub price: f64,
    /// Size label -> stock count, kept ordered for stable store rows
    pub sizes: BTreeMap<String, u32>,
    /// Opaque path for the UI layer; never interpreted here
    pub image_path: String,
}

/// Create costume request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCostume {
    #[validate(length(min = 1))]
    pub name: String,
    pub category: EventCategory,
    #[validate(range(min = 0.0))]
    pub price: f64,
    pub sizes: BTreeMap<String, u32>,
    #[serde(default)]
    pub image_path: String,
}

/// Update costume request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCostume {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub category: Option<EventCategory>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub sizes: Option<BTreeMap<String, u32>>,
    pub image_path: Option<String>,
}

impl Costume {
    /// Stock ceiling for a size label; 0 for unknown sizes
    pub fn stock_for(&self, size: &str) -> u32 {
        self.sizes.get(size).copied().unwrap_or(0)
    }

    /// Serialize to the flexible catalog row:
    /// `id,name,CATEGORY,price,size:stock,...,imagePath`
    pub fn to_record(&self) -> Vec<String> {
        let mut fields = vec![
            self.id.clone(),
            self.name.clone(),
            self.category.to_string(),
            format!("{:.2}", self.price),
        ];
        for (size, stock) in &self.sizes {
            fields.push(format!("{}:{}", size, stock));
        }
        fields.push(self.image_path.clone());
        fields
    }

    /// Parse a catalog row. The size list is variable length; the last
    /// field is always the image path.
    pub fn from_record(record: &csv::StringRecord) -> AppResult<Self> {
        if record.len() < 5 {
            return Err(AppError::Parse(format!(
                "costume row has {} fields, expected at least 5",
                record.len()
            )));
        }
        let field = |i: usize| record.get(i).unwrap_or_default().trim();

        let price: f64 = field(3)
            .parse()
            .map_err(|e| AppError::Parse(format!("bad price '{}': {}", field(3), e)))?;
        if price < 0.0 {
            return Err(AppError::Parse(format!("negative price '{}'", field(3))));
        }

        let mut sizes = BTreeMap::new();
        for i in 4..record.len() - 1 {
            let entry = field(i);
            let (size, stock) = entry.split_once(':').ok_or_else(|| {
                AppError::Parse(format!("bad size entry '{}', expected size:stock", entry))
            })?;
            let stock: u32 = stock
                .trim()
                .parse()
                .map_err(|e| AppError::Parse(format!("bad stock in '{}': {}", entry, e)))?;
            sizes.insert(size.trim().to_string(), stock);
        }

        Ok(Self {
            id: field(0).to_string(),
            name: field(1).to_string(),
            category: EventCategory::from(field(2)),
            price,
            sizes,
            image_path: field(record.len() - 1).to_string(),
        })
    }
}
