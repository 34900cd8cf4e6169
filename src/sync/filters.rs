use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::models::{Lead, LeadQuery, SearchRequest};

/// A dropdown selection where `All` disables the filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub const ALL: &'static str = "All";

    /// Parses a `<select>` value; empty and `"All"` both mean no filter.
    pub fn from_value(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == Self::ALL {
            Choice::All
        } else {
            Choice::Only(value.to_string())
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            Choice::All => Self::ALL,
            Choice::Only(value) => value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => value.map(str::trim) == Some(expected.as_str()),
        }
    }
}

impl Serialize for Choice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_param())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub call_status: Choice,
    pub product_name: Choice,
    pub mobile_search: String,
}

impl FilterState {
    /// Changing the status always drops the dependent product filter.
    /// Returns whether anything changed.
    pub fn set_call_status(&mut self, status: Choice) -> bool {
        let changed = self.call_status != status || !self.product_name.is_all();
        self.call_status = status;
        self.product_name = Choice::All;
        changed
    }

    pub fn set_product_name(&mut self, product: Choice) -> bool {
        replace_if_changed(&mut self.product_name, product)
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
        let a = replace_if_changed(&mut self.start_date, start);
        let b = replace_if_changed(&mut self.end_date, end);
        a || b
    }

    pub fn set_mobile_search(&mut self, term: &str) -> bool {
        replace_if_changed(&mut self.mobile_search, term.trim().to_string())
    }

    pub fn to_query(&self, callby: &str, page: u32, limit: u32) -> LeadQuery {
        let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
        LeadQuery {
            callby: callby.to_string(),
            start_date: date(self.start_date),
            end_date: date(self.end_date),
            page,
            limit,
            call_status: self.call_status.as_param().to_string(),
            product_name: self.product_name.as_param().to_string(),
            mobile_search: self.mobile_search.clone(),
        }
    }

    /// In-memory version of the server-side filter, used on search results.
    /// The date range is checked against the lead's creation day.
    pub fn matches(&self, lead: &Lead) -> bool {
        if !self.call_status.matches(lead.call_status.as_deref()) {
            return false;
        }
        if !self.product_name.matches(lead.product_name.as_deref()) {
            return false;
        }
        if !self.mobile_search.is_empty() {
            let number = lead.contact_number.as_deref().unwrap_or("");
            let wanted = digits(&self.mobile_search);
            let digit_hit = !wanted.is_empty() && digits(number).contains(&wanted);
            if !digit_hit && !number.contains(&self.mobile_search) {
                return false;
            }
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            let Some(created) = lead.created_at.map(|t| t.date_naive()) else {
                return false;
            };
            if self.start_date.is_some_and(|start| created < start) {
                return false;
            }
            if self.end_date.is_some_and(|end| created > end) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, leads: &[Lead]) -> Vec<Lead> {
        leads.iter().filter(|lead| self.matches(lead)).cloned().collect()
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Product names offered for `status`.
///
/// For a specific status this only looks at the leads currently loaded, so
/// the list reflects the visible page rather than the whole dataset. Result
/// is kept in the order of `known`; when `known` is empty the loaded leads'
/// own product names are used in first-seen order.
pub fn product_options(status: &Choice, loaded: &[Lead], known: &[String]) -> Vec<String> {
    if status.is_all() {
        return known.to_vec();
    }

    let mut seen: Vec<String> = Vec::new();
    for lead in loaded.iter().filter(|lead| status.matches(lead.call_status.as_deref())) {
        if let Some(product) = lead.product_name.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            if !seen.iter().any(|p| p == product) {
                seen.push(product.to_string());
            }
        }
    }

    if known.is_empty() {
        seen
    } else {
        known.iter().filter(|p| seen.contains(p)).cloned().collect()
    }
}

/// Name / contact search, independent of the filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SearchState {
    pub name: String,
    pub contact_number: String,
}

impl SearchState {
    pub fn new(name: &str, contact_number: &str) -> Self {
        SearchState {
            name: name.trim().to_string(),
            contact_number: contact_number.trim().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.contact_number.is_empty()
    }

    pub fn to_request(&self, page: u32, limit: u32) -> SearchRequest {
        SearchRequest {
            name: self.name.clone(),
            contact_number: self.contact_number.clone(),
            page,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn lead(id: &str, status: &str, product: &str, phone: &str) -> Lead {
        Lead {
            id: id.into(),
            call_status: Some(status.into()),
            product_name: Some(product.into()),
            contact_number: Some(phone.into()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(Choice::from_value("All"), Choice::All);
        assert_eq!(Choice::from_value(""), Choice::All);
        assert_eq!(Choice::from_value(" Warm "), Choice::Only("Warm".into()));
        assert_eq!(serde_json::to_string(&Choice::All).unwrap(), "\"All\"");
    }

    #[test]
    fn test_call_status_resets_product() {
        let mut filters = FilterState::default();
        filters.set_product_name(Choice::Only("Skyline Towers".into()));

        assert!(filters.set_call_status(Choice::Only("Warm".into())));
        assert_eq!(filters.product_name, Choice::All);

        // Same status again with product already cleared is a no-op
        assert!(!filters.set_call_status(Choice::Only("Warm".into())));

        filters.set_product_name(Choice::Only("Palm Grove".into()));
        assert!(filters.set_call_status(Choice::Only("Warm".into())));
        assert_eq!(filters.product_name, Choice::All);
    }

    #[test]
    fn test_query_sends_every_key() {
        let mut filters = FilterState::default();
        filters.set_date_range(NaiveDate::from_ymd_opt(2024, 1, 1), None);
        filters.set_call_status(Choice::Only("Site Visit Done".into()));

        let query = filters.to_query("ravi", 3, 20);
        assert_eq!(query.start_date, "2024-01-01");
        assert_eq!(query.end_date, "");
        assert_eq!(query.call_status, "Site Visit Done");
        assert_eq!(query.product_name, "All");
        assert_eq!(query.page, 3);
    }

    #[test]
    fn test_in_memory_filtering() {
        let leads = vec![
            lead("1", "Warm", "Skyline Towers", "+91 98765-43210"),
            lead("2", "Cold", "Skyline Towers", "9123456789"),
            lead("3", "Warm", "Palm Grove", "9988776655"),
        ];

        let mut filters = FilterState::default();
        filters.set_call_status(Choice::Only("Warm".into()));
        assert_eq!(filters.apply(&leads).len(), 2);

        filters.set_mobile_search("98765");
        let hits = filters.apply(&leads);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
    }

    #[test]
    fn test_date_range_uses_creation_day() {
        let leads = vec![lead("1", "Warm", "Skyline Towers", "1")];
        let mut filters = FilterState::default();

        filters.set_date_range(NaiveDate::from_ymd_opt(2024, 5, 10), NaiveDate::from_ymd_opt(2024, 5, 10));
        assert_eq!(filters.apply(&leads).len(), 1);

        filters.set_date_range(NaiveDate::from_ymd_opt(2024, 5, 11), None);
        assert!(filters.apply(&leads).is_empty());

        let undated = Lead { created_at: None, ..leads[0].clone() };
        assert!(!filters.matches(&undated));
    }

    #[test]
    fn test_product_options_follow_loaded_leads() {
        let leads = vec![
            lead("1", "Warm", "Palm Grove", "1"),
            lead("2", "Cold", "Skyline Towers", "2"),
            lead("3", "Warm", "Lake View", "3"),
            lead("4", "Warm", "Palm Grove", "4"),
        ];
        let known: Vec<String> = ["Lake View", "Palm Grove", "Skyline Towers"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert_eq!(product_options(&Choice::All, &leads, &known), known);
        assert_eq!(
            product_options(&Choice::Only("Warm".into()), &leads, &known),
            vec!["Lake View".to_string(), "Palm Grove".to_string()]
        );
        assert_eq!(
            product_options(&Choice::Only("Warm".into()), &leads, &[]),
            vec!["Palm Grove".to_string(), "Lake View".to_string()]
        );
        assert!(product_options(&Choice::Only("Booked".into()), &leads, &known).is_empty());
    }

    #[test]
    fn test_search_state() {
        assert!(SearchState::new("  ", "").is_empty());
        let search = SearchState::new(" Anil ", "");
        assert!(!search.is_empty());
        let request = search.to_request(1, 20);
        assert_eq!(request.name, "Anil");
        assert_eq!(request.limit, 20);
    }
}
