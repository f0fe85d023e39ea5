use url::Url;

use crate::{
    configuration::SelectorSettings,
    domain::{JobListing, ListingField, Lookup},
};

use super::page_session::{PageElement, SessionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadMode {
    Text,
    Attribute(String),
}

/// Where a field lives inside a card and what to read from it.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: ListingField,
    pub selector: String,
    pub read: ReadMode,
}

pub struct ListingExtractor {
    rules: Vec<FieldRule>,
    base_url: Option<Url>,
}

impl ListingExtractor {
    pub fn new(selectors: &SelectorSettings, base_url: Option<Url>) -> Self {
        let rules = vec![
            FieldRule {
                field: ListingField::Title,
                selector: selectors.title.clone(),
                read: ReadMode::Text,
            },
            FieldRule {
                field: ListingField::CompanyName,
                selector: selectors.company.clone(),
                read: ReadMode::Text,
            },
            FieldRule {
                field: ListingField::Location,
                selector: selectors.location.clone(),
                read: ReadMode::Text,
            },
            FieldRule {
                field: ListingField::JobLink,
                selector: selectors.link.clone(),
                read: ReadMode::Attribute(selectors.link_attribute.clone()),
            },
        ];

        ListingExtractor { rules, base_url }
    }

    #[cfg(test)]
    pub(crate) fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Never fails: a field that cannot be read becomes the sentinel and the
    /// remaining fields are still looked up.
    pub async fn extract<E: PageElement>(&self, card: &E) -> JobListing {
        let mut listing = JobListing::unresolved();

        for rule in &self.rules {
            let lookup = match self.lookup(card, rule).await {
                Ok(lookup) => lookup,
                Err(e) => {
                    log::debug!("Could not read {} from card: {}", rule.field.header(), e);
                    Lookup::NotFound
                }
            };
            listing.set(rule.field, lookup);
        }

        listing
    }

    async fn lookup<E: PageElement>(
        &self,
        card: &E,
        rule: &FieldRule,
    ) -> Result<Lookup, SessionError> {
        let element = card.find(&rule.selector).await?;

        let raw = match &rule.read {
            ReadMode::Text => Some(element.text().await?),
            ReadMode::Attribute(name) => element.attribute(name).await?,
        };

        Ok(match (Lookup::from_raw(raw), rule.field) {
            (Lookup::Found(link), ListingField::JobLink) => Lookup::Found(self.resolve(link)),
            (lookup, _) => lookup,
        })
    }

    fn resolve(&self, link: String) -> String {
        match &self.base_url {
            Some(base) => match base.join(&link) {
                Ok(url) => url.to_string(),
                Err(_) => link,
            },
            None => link,
        }
    }
}
