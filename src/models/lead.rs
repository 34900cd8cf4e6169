use serde::{Deserialize, Deserializer, Serialize};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Call statuses that close a lead. Editing a lead into one of these only
/// requires remarks.
pub const CLOSED_CALL_STATUSES: [&str; 6] = [
    "Not Interested With Reason",
    "No Response-Lead Closed",
    "Not Qualified",
    "Number Not Answered-1",
    "Number Not Answered-2",
    "Number Not Answered-3",
];

pub fn is_closed_status(status: &str) -> bool {
    CLOSED_CALL_STATUSES.contains(&status.trim())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Lead {
    #[serde(rename = "_id", alias = "id", deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(rename = "FirstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "LastName", default)]
    pub last_name: Option<String>,
    #[serde(rename = "Email", default)]
    pub email: Option<String>,
    #[serde(rename = "ContactNumber", default, deserialize_with = "opt_text_or_number")]
    pub contact_number: Option<String>,
    #[serde(rename = "callstatus", default)]
    pub call_status: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(rename = "followUpDate", default)]
    pub follow_up_date: Option<String>,
    #[serde(rename = "productname", default)]
    pub product_name: Option<String>,
    #[serde(rename = "unittype", default)]
    pub unit_type: Option<String>,
    #[serde(default, deserialize_with = "opt_text_or_number")]
    pub budget: Option<String>,
    #[serde(rename = "assignedTo", default)]
    pub assigned_to: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Lead {
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }

    pub fn status(&self) -> &str {
        self.call_status.as_deref().unwrap_or("")
    }

    /// `tel:` link for the call action, `None` when the lead has no dialable number.
    pub fn tel_uri(&self) -> Option<String> {
        self.contact_number.as_deref().and_then(tel_uri)
    }

    /// Follow-up date trimmed to `YYYY-MM-DD` for date inputs.
    pub fn follow_up_day(&self) -> String {
        self.follow_up_date
            .as_deref()
            .map(|d| d.chars().take(10).collect())
            .unwrap_or_default()
    }
}

/// Builds a `tel:` URI from a free-form phone number, keeping digits only.
pub fn tel_uri(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("tel:{}", digits))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Remarks are required")]
    RemarksRequired,
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Editable field set sent with `PUT /leads/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LeadUpdate {
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "ContactNumber")]
    pub contact_number: String,
    #[serde(rename = "callstatus")]
    pub call_status: String,
    pub remarks: String,
    #[serde(rename = "followUpDate")]
    pub follow_up_date: String,
    #[serde(rename = "productname")]
    pub product_name: String,
    #[serde(rename = "unittype")]
    pub unit_type: String,
    pub budget: String,
    #[serde(rename = "assignedTo")]
    pub assigned_to: String,
}

impl LeadUpdate {
    pub fn from_lead(lead: &Lead) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        LeadUpdate {
            first_name: text(&lead.first_name),
            last_name: text(&lead.last_name),
            email: text(&lead.email),
            contact_number: text(&lead.contact_number),
            call_status: text(&lead.call_status),
            remarks: text(&lead.remarks),
            follow_up_date: lead.follow_up_day(),
            product_name: text(&lead.product_name),
            unit_type: text(&lead.unit_type),
            budget: text(&lead.budget),
            assigned_to: text(&lead.assigned_to),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let blank = |v: &str| v.trim().is_empty();

        if is_closed_status(&self.call_status) {
            return if blank(&self.remarks) {
                Err(ValidationError::RemarksRequired)
            } else {
                Ok(())
            };
        }

        let missing: Vec<&'static str> = [
            ("First Name", &self.first_name),
            ("Contact Number", &self.contact_number),
            ("Call Status", &self.call_status),
            ("Remarks", &self.remarks),
            ("Follow Up Date", &self.follow_up_date),
        ]
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<RawText> for String {
    fn from(raw: RawText) -> Self {
        match raw {
            RawText::Text(s) => s,
            RawText::Integer(n) => n.to_string(),
            RawText::Float(f) => f.to_string(),
        }
    }
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawText::deserialize(deserializer).map(String::from)
}

fn opt_text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawText>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_update() -> LeadUpdate {
        LeadUpdate {
            first_name: "Asha".into(),
            contact_number: "9876543210".into(),
            call_status: "Warm".into(),
            remarks: "Call back after Diwali".into(),
            follow_up_date: "2024-11-02".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_closed_status_only_needs_remarks() {
        let update = LeadUpdate {
            call_status: "Not Qualified".into(),
            remarks: "Budget too low".into(),
            ..Default::default()
        };
        assert_eq!(update.validate(), Ok(()));
    }

    #[test]
    fn test_closed_status_without_remarks_fails() {
        let update = LeadUpdate {
            call_status: "Number Not Answered-2".into(),
            first_name: "Ravi".into(),
            ..Default::default()
        };
        assert_eq!(update.validate(), Err(ValidationError::RemarksRequired));
    }

    #[test]
    fn test_open_status_requires_first_name() {
        let update = LeadUpdate {
            first_name: "   ".into(),
            ..complete_update()
        };
        assert_eq!(
            update.validate(),
            Err(ValidationError::MissingFields(vec!["First Name"]))
        );
    }

    #[test]
    fn test_open_status_lists_every_missing_field() {
        let err = LeadUpdate::default().validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![
                "First Name",
                "Contact Number",
                "Call Status",
                "Remarks",
                "Follow Up Date",
            ])
        );
        assert!(err.to_string().starts_with("Please fill in all required fields"));
    }

    #[test]
    fn test_complete_update_passes() {
        assert!(complete_update().validate().is_ok());
    }

    #[test]
    fn test_tel_uri_strips_formatting() {
        assert_eq!(tel_uri("+91 (987) 654-3210").as_deref(), Some("tel:919876543210"));
        assert_eq!(tel_uri("n/a"), None);
    }

    #[test]
    fn test_lead_accepts_numeric_id_and_contact() {
        let lead: Lead = serde_json::from_value(serde_json::json!({
            "id": 1,
            "FirstName": "A",
            "ContactNumber": 9876543210u64,
            "callstatus": "Warm",
            "budget": 7500000
        }))
        .unwrap();

        assert_eq!(lead.id, "1");
        assert_eq!(lead.contact_number.as_deref(), Some("9876543210"));
        assert_eq!(lead.budget.as_deref(), Some("7500000"));
        assert_eq!(lead.status(), "Warm");
        assert_eq!(lead.full_name(), "A");
    }

    #[test]
    fn test_update_from_lead_trims_follow_up_date() {
        let lead = Lead {
            id: "abc".into(),
            first_name: Some("Meera".into()),
            follow_up_date: Some("2024-12-01T00:00:00.000Z".into()),
            ..Default::default()
        };
        let update = LeadUpdate::from_lead(&lead);
        assert_eq!(update.follow_up_date, "2024-12-01");
        assert_eq!(update.first_name, "Meera");
    }
}
