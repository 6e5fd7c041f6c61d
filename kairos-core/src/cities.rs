//! City selection list
//!
//! The settings screen scrolls over a fixed list of cities the weather
//! producer can be pointed at. The list is built once at startup from the
//! configured default city, the built-in candidates, and an optional extra
//! city, then never mutated; changing the selection only changes which index
//! the weather producer queries.

use heapless::{String, Vec};

/// Built-in city candidates, always offered after the configured default
pub const BUILT_IN_CITIES: [&str; 3] = ["Rotterdam", "London", "Amsterdam"];

/// Upper bound on list size (default + built-ins + extra, with headroom)
pub const MAX_CITIES: usize = 8;

/// Maximum city name length the UI and request builder accept
pub const MAX_CITY_LEN: usize = 24;

pub type CityName = String<MAX_CITY_LEN>;

/// City list construction errors (fatal at startup)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CityListError {
    /// The configured default city is empty
    EmptyDefault,
    /// A city name exceeds `MAX_CITY_LEN`
    NameTooLong,
}

/// Immutable, ordered list of selectable cities
///
/// Index 0 is the configured default and the initially queried city.
/// Duplicates are removed keeping the first occurrence, so the configured
/// city appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitySelectionList {
    names: Vec<CityName, MAX_CITIES>,
}

impl CitySelectionList {
    /// Build the list from configuration
    pub fn build(default_city: &str, extra_city: Option<&str>) -> Result<Self, CityListError> {
        let default_city = default_city.trim();
        if default_city.is_empty() {
            return Err(CityListError::EmptyDefault);
        }

        let mut names: Vec<CityName, MAX_CITIES> = Vec::new();
        push_unique(&mut names, default_city)?;
        for city in BUILT_IN_CITIES {
            push_unique(&mut names, city)?;
        }
        if let Some(extra) = extra_city {
            let extra = extra.trim();
            if !extra.is_empty() {
                push_unique(&mut names, extra)?;
            }
        }

        Ok(Self { names })
    }

    /// Number of cities in the list
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the list holds no cities (never happens after `build`)
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// City name at `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|name| name.as_str())
    }

    /// Iterate over the city names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_str())
    }
}

fn push_unique(
    names: &mut Vec<CityName, MAX_CITIES>,
    city: &str,
) -> Result<(), CityListError> {
    if names.iter().any(|existing| existing.as_str() == city) {
        return Ok(());
    }
    let name = CityName::try_from(city).map_err(|_| CityListError::NameTooLong)?;
    // Capacity covers default + built-ins + extra; a full list drops the rest.
    let _ = names.push(name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_city_leads_the_list() {
        let list = CitySelectionList::build("Berlin", None).unwrap();
        let cities: alloc::vec::Vec<&str> = list.iter().collect();
        assert_eq!(cities, ["Berlin", "Rotterdam", "London", "Amsterdam"]);
        assert_eq!(list.get(0), Some("Berlin"));
    }

    #[test]
    fn test_duplicate_of_built_in_collapses() {
        let list = CitySelectionList::build("London", None).unwrap();
        let cities: alloc::vec::Vec<&str> = list.iter().collect();
        assert_eq!(cities, ["London", "Rotterdam", "Amsterdam"]);
    }

    #[test]
    fn test_extra_city_appended() {
        let list = CitySelectionList::build("Berlin", Some("Paris")).unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list.get(4), Some("Paris"));
    }

    #[test]
    fn test_extra_city_duplicate_is_dropped() {
        let list = CitySelectionList::build("Berlin", Some("London")).unwrap();
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_empty_default_is_fatal() {
        assert_eq!(
            CitySelectionList::build("  ", None),
            Err(CityListError::EmptyDefault)
        );
    }

    #[test]
    fn test_overlong_name_is_fatal() {
        let err = CitySelectionList::build("Llanfairpwllgwyngyllgogerychwyrn", None);
        assert_eq!(err, Err(CityListError::NameTooLong));
    }
}
