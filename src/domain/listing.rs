pub const SENTINEL: &str = "N/A";

pub const HEADER: [&str; 4] = ["Job Title", "Company Name", "Location", "Job Link"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingField {
    Title,
    CompanyName,
    Location,
    JobLink,
}

impl ListingField {
    pub const ALL: [ListingField; 4] = [
        ListingField::Title,
        ListingField::CompanyName,
        ListingField::Location,
        ListingField::JobLink,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            ListingField::Title => HEADER[0],
            ListingField::CompanyName => HEADER[1],
            ListingField::Location => HEADER[2],
            ListingField::JobLink => HEADER[3],
        }
    }
}

/// Outcome of looking up a single field inside a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    NotFound,
}

impl Lookup {
    /// Blank captures are treated the same as a missing element.
    pub fn from_raw(raw: Option<String>) -> Self {
        match raw {
            Some(value) => match value.trim() {
                "" => Lookup::NotFound,
                trimmed => Lookup::Found(trimmed.to_string()),
            },
            None => Lookup::NotFound,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Lookup::Found(value) => value,
            Lookup::NotFound => SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub job_link: String,
}

impl JobListing {
    pub fn unresolved() -> Self {
        JobListing {
            title: SENTINEL.to_string(),
            company_name: SENTINEL.to_string(),
            location: SENTINEL.to_string(),
            job_link: SENTINEL.to_string(),
        }
    }

    pub fn set(&mut self, field: ListingField, lookup: Lookup) {
        let value = lookup.into_value();
        match field {
            ListingField::Title => self.title = value,
            ListingField::CompanyName => self.company_name = value,
            ListingField::Location => self.location = value,
            ListingField::JobLink => self.job_link = value,
        }
    }

    pub fn get(&self, field: ListingField) -> &str {
        match field {
            ListingField::Title => &self.title,
            ListingField::CompanyName => &self.company_name,
            ListingField::Location => &self.location,
            ListingField::JobLink => &self.job_link,
        }
    }

    /// Values in `HEADER` order.
    pub fn as_row(&self) -> [&str; 4] {
        ListingField::ALL.map(|field| self.get(field))
    }
}
