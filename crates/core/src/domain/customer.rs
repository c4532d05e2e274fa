use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

/// A residential customer. All contact fields are optional free text; the
/// admin tool accepts partially filled records and staff complete them later.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for CustomerId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Customer {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CustomerId(Uuid::new_v4()),
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at: now,
            updated_at: now,
            ..Self::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Single-line mailing address: line1, optional line2, then
    /// `city, state zip` with literal comma separators.
    pub fn full_address(&self) -> String {
        let mut address = self.address_line1.clone();
        if !self.address_line2.is_empty() {
            address.push_str(", ");
            address.push_str(&self.address_line2);
        }
        address.push_str(", ");
        address.push_str(&self.city);
        address.push_str(", ");
        address.push_str(&self.state);
        address.push(' ');
        address.push_str(&self.zip_code);
        address
    }
}
