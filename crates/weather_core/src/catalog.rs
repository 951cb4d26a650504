use std::collections::HashMap;

use thiserror::Error;

use crate::models::LocationRecord;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("City {city_name} appears more than once in the catalog")]
    DuplicateCity { city_name: String },
    #[error("Could not parse the location catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// (city name, location name, observation station)
#[rustfmt::skip]
const TAIWAN_LOCATIONS: [(&str, &str, &str); 16] = [
    ("臺北市", "臺北", "466920"),
    ("新北市", "板橋", "466880"),
    ("桃園市", "新屋", "467050"),
    ("臺中市", "臺中", "467490"),
    ("臺南市", "臺南", "467410"),
    ("高雄市", "高雄", "467440"),
    ("基隆市", "基隆", "466940"),
    ("新竹縣", "新竹", "467571"),
    ("嘉義市", "嘉義", "467480"),
    ("屏東縣", "恆春", "467590"),
    ("宜蘭縣", "宜蘭", "467080"),
    ("花蓮縣", "花蓮", "466990"),
    ("臺東縣", "臺東", "467660"),
    ("澎湖縣", "澎湖", "467350"),
    ("金門縣", "金門", "467110"),
    ("連江縣", "馬祖", "467990"),
];

/// Read-only mapping from a user-facing city name to its location record.
#[derive(Debug, Clone)]
pub struct LocationCatalog {
    records: Vec<LocationRecord>,
    by_city: HashMap<String, usize>,
}

impl LocationCatalog {
    pub fn builtin() -> Self {
        let records = TAIWAN_LOCATIONS
            .iter()
            .map(|(city, location, station)| LocationRecord::new(city, location, station))
            .collect::<Vec<_>>();
        let by_city = records
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.city_name.clone(), idx))
            .collect();
        LocationCatalog { records, by_city }
    }

    pub fn from_records(records: Vec<LocationRecord>) -> Result<Self, CatalogError> {
        let mut by_city = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if by_city.insert(record.city_name.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateCity {
                    city_name: record.city_name.clone(),
                });
            }
        }
        Ok(LocationCatalog { records, by_city })
    }

    /// Parse a JSON array of location records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<LocationRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Find the record for `city_name`.
    ///
    /// `None` is an ordinary outcome for blank or unknown input; callers fall
    /// back to [`LocationRecord::default`].
    pub fn find_location(&self, city_name: &str) -> Option<&LocationRecord> {
        let found = self
            .by_city
            .get(city_name.trim())
            .map(|&idx| &self.records[idx]);
        if found.is_none() {
            tracing::debug!("City {:?} is not in the catalog", city_name);
        }
        found
    }

    /// City names in catalog order.
    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.city_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for LocationCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
