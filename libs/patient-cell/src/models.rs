use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Formal patient profile. Patient identifiers are soft references: rows in
/// the appointment tables may point at ids that have no profile here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

/// A roster entry is either a resolved profile or a placeholder synthesized
/// from the appointment row that referenced the id. The placeholder carries
/// the captured patient name, an explicit "N/A" email marker and null
/// everything else, so the roster always has exactly one entry per distinct
/// patient id.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RosterEntry {
    Registered(Patient),
    Placeholder(PlaceholderPatient),
}

impl RosterEntry {
    pub fn patient_id(&self) -> &str {
        match self {
            RosterEntry::Registered(p) => &p.id,
            RosterEntry::Placeholder(p) => &p.id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceholderPatient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
}

impl PlaceholderPatient {
    pub fn from_appointment(patient_id: String, patient_name: Option<String>) -> Self {
        Self {
            id: patient_id,
            name: patient_name.unwrap_or_else(|| "Unknown Patient".to_string()),
            email: "N/A".to_string(),
            contact_number: None,
            address: None,
            date_of_birth: None,
            gender: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_fills_not_available_markers() {
        let entry = PlaceholderPatient::from_appointment("p9".to_string(), None);
        assert_eq!(entry.name, "Unknown Patient");
        assert_eq!(entry.email, "N/A");
        assert!(entry.contact_number.is_none());
    }

    #[test]
    fn roster_entries_serialize_with_the_same_shape() {
        let placeholder = RosterEntry::Placeholder(PlaceholderPatient::from_appointment(
            "p9".to_string(),
            Some("Pat".to_string()),
        ));
        let value = serde_json::to_value(&placeholder).unwrap();
        assert_eq!(value["id"], "p9");
        assert_eq!(value["email"], "N/A");
        assert!(value["date_of_birth"].is_null());
    }
}
