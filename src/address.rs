use crate::LabelError;
use std::collections::HashMap;
use std::path::Path;

/// One recipient, assembled from a row of the address table. Missing columns
/// default to empty strings; formatting decides later which of them matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressRecord {
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub address3: String,
    pub postalcode: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

impl AddressRecord {
    /// Look a field up by the name format strings use
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "address1" => Some(&self.address1),
            "address2" => Some(&self.address2),
            "address3" => Some(&self.address3),
            "postalcode" => Some(&self.postalcode),
            "city" => Some(&self.city),
            "state" => Some(&self.state),
            "country" => Some(&self.country),
            _ => None,
        }
    }

    /// Build a record from one input row, where `header` holds the canonical
    /// field name of each column. The name is the `fullname` column when
    /// present, otherwise first and last name joined with a space.
    pub fn from_row(header: &[String], row: &csv::StringRecord) -> AddressRecord {
        let field = |name: &str| -> String {
            header
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .unwrap_or("")
                .to_string()
        };

        let mut name = field("fullname");
        if name.is_empty() {
            name = format!("{} {}", field("firstname"), field("lastname"));
        }

        AddressRecord {
            name,
            address1: field("address1"),
            address2: field("address2"),
            address3: field("address3"),
            postalcode: field("postalcode"),
            city: field("city"),
            state: field("state"),
            country: field("country"),
        }
    }
}

/// Translates the header tokens of an address table into the canonical field
/// names format strings use. Loaded from a JSON object of
/// `input token -> canonical name`; tokens are matched lower-cased with
/// spaces stripped, and unmapped tokens pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct FieldMapping(HashMap<String, String>);

impl FieldMapping {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<FieldMapping, LabelError> {
        let file = std::fs::File::open(path)?;
        let map: HashMap<String, String> = serde_json::from_reader(file)?;
        Ok(FieldMapping(map))
    }

    /// The canonical field name for an input header token
    pub fn canonical(&self, header: &str) -> String {
        let token = header.to_lowercase().replace(' ', "");
        self.0.get(&token).cloned().unwrap_or(token)
    }
}

impl FromIterator<(String, String)> for FieldMapping {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        FieldMapping(iter.into_iter().collect())
    }
}
