//! Typed filter specification and the store-agnostic listing query built
//! from it.
//!
//! Constraints are AND-combined; categories match when the listing's set
//! overlaps the requested one. Exactly one sort key is active. Rows with
//! equal sort keys come back in the store's natural order, which is not
//! guaranteed to be stable across stores.

use std::cmp::Ordering;

use crate::{
    auth::Caller,
    error::ServiceError,
    models::listing::{Listing, ListingQueryParams},
    services::pagination::PageRange,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Popular,
    Rating,
}

impl SortOrder {
    /// Unknown or missing values fall back to `Newest`.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("popular") => SortOrder::Popular,
            Some("rating") => SortOrder::Rating,
            _ => SortOrder::Newest,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortOrder::Newest => "created_at",
            SortOrder::Popular => "reviews",
            SortOrder::Rating => "rating",
        }
    }

    /// Descending comparison on the sort key.
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Popular => b.reviews.cmp(&a.reviews),
            SortOrder::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

/// Validated list filters. Built from query-string values by [`FilterSpec::parse`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub categories: Vec<String>,
    pub min_rating: Option<f64>,
    pub min_sentiment: Option<f64>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub sort: SortOrder,
}

impl FilterSpec {
    pub fn parse(params: &ListingQueryParams) -> Result<Self, ServiceError> {
        Ok(Self {
            categories: parse_categories(params.categories.as_deref()),
            min_rating: parse_number("rating", params.rating.as_deref())?,
            min_sentiment: parse_number("sentimentScore", params.sentiment_score.as_deref())?,
            active: parse_flag("active", params.active.as_deref())?,
            featured: parse_flag("featured", params.featured.as_deref())?,
            sort: SortOrder::from_param(params.sort.as_deref()),
        })
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_categories(raw: Option<&str>) -> Vec<String> {
    present(raw)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_number(name: &str, raw: Option<&str>) -> Result<Option<f64>, ServiceError> {
    let Some(value) = present(raw) else {
        return Ok(None);
    };
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(Some(n)),
        _ => {
            log::warn!("rejected {name} filter value {value:?}");
            Err(ServiceError::invalid(format!("{name} must be a number")))
        }
    }
}

fn parse_flag(name: &str, raw: Option<&str>) -> Result<Option<bool>, ServiceError> {
    match present(raw) {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(v) => {
            log::warn!("rejected {name} filter value {v:?}");
            Err(ServiceError::invalid(format!("{name} must be true or false")))
        }
    }
}

/// An executable listing query: constraints, one sort key and a row range.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub categories: Vec<String>,
    pub min_rating: Option<f64>,
    pub min_sentiment: Option<f64>,
    pub active: Option<bool>,
    pub featured: Option<bool>,
    pub sort: SortOrder,
    pub range: PageRange,
}

impl ListingQuery {
    /// Non-admin callers only ever see active listings, whatever they asked for.
    pub fn build(spec: &FilterSpec, caller: &Caller, range: PageRange) -> Self {
        let active = if caller.is_admin() {
            spec.active
        } else {
            Some(true)
        };

        Self {
            categories: spec.categories.clone(),
            min_rating: spec.min_rating,
            min_sentiment: spec.min_sentiment,
            active,
            featured: spec.featured,
            sort: spec.sort,
            range,
        }
    }

    /// Evaluates the constraints against one row, ignoring sort and range.
    pub fn matches(&self, listing: &Listing) -> bool {
        if !self.categories.is_empty() && !overlaps(&listing.categories, &self.categories) {
            return false;
        }
        if let Some(min) = self.min_rating {
            if listing.rating < min {
                return false;
            }
        }
        if let Some(min) = self.min_sentiment {
            match listing.avg_sentiment_score {
                Some(score) if f64::from(score) >= min => {}
                _ => return false,
            }
        }
        if let Some(active) = self.active {
            if listing.active != active {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if listing.is_featured != featured {
                return false;
            }
        }
        true
    }
}

pub fn overlaps(a: &[String], b: &[String]) -> bool {
    a.iter().any(|x| b.contains(x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::pagination::range, test_support::listing};

    fn params(pairs: &[(&str, &str)]) -> ListingQueryParams {
        let mut p = ListingQueryParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "categories" => p.categories = v,
                "rating" => p.rating = v,
                "sentimentScore" => p.sentiment_score = v,
                "sort" => p.sort = v,
                "active" => p.active = v,
                "featured" => p.featured = v,
                _ => unreachable!(),
            }
        }
        p
    }

    #[test]
    fn empty_params_mean_no_constraints() {
        let spec = FilterSpec::parse(&ListingQueryParams::default()).unwrap();
        assert_eq!(spec, FilterSpec::default());
        assert_eq!(spec.sort, SortOrder::Newest);
    }

    #[test]
    fn categories_are_split_and_trimmed() {
        let spec = FilterSpec::parse(&params(&[("categories", "Beach, Nature,,")])).unwrap();
        assert_eq!(spec.categories, vec!["Beach", "Nature"]);
    }

    #[test]
    fn numeric_filters_parse() {
        let spec =
            FilterSpec::parse(&params(&[("rating", "4.5"), ("sentimentScore", "80")])).unwrap();
        assert_eq!(spec.min_rating, Some(4.5));
        assert_eq!(spec.min_sentiment, Some(80.0));
    }

    #[test]
    fn malformed_values_are_rejected() {
        for pair in [
            ("rating", "high"),
            ("sentimentScore", "NaN"),
            ("active", "yes"),
            ("featured", "1"),
        ] {
            assert!(
                matches!(
                    FilterSpec::parse(&params(&[pair])),
                    Err(ServiceError::InvalidArgument(_))
                ),
                "{pair:?} should be rejected"
            );
        }
    }

    #[test]
    fn blank_values_are_absent() {
        let spec = FilterSpec::parse(&params(&[("rating", " "), ("active", "")])).unwrap();
        assert_eq!(spec.min_rating, None);
        assert_eq!(spec.active, None);
    }

    #[test]
    fn sort_falls_back_to_newest() {
        assert_eq!(SortOrder::from_param(Some("popular")), SortOrder::Popular);
        assert_eq!(SortOrder::from_param(Some("rating")), SortOrder::Rating);
        assert_eq!(SortOrder::from_param(Some("oldest")), SortOrder::Newest);
        assert_eq!(SortOrder::from_param(None), SortOrder::Newest);
    }

    #[test]
    fn non_admins_are_forced_to_active_rows() {
        let spec = FilterSpec {
            active: Some(false),
            ..FilterSpec::default()
        };
        let query = ListingQuery::build(&spec, &Caller::anonymous(), range(1, 10));
        assert_eq!(query.active, Some(true));

        let query = ListingQuery::build(&spec, &Caller::user("u"), range(1, 10));
        assert_eq!(query.active, Some(true));

        let query = ListingQuery::build(&spec, &Caller::admin("a"), range(1, 10));
        assert_eq!(query.active, Some(false));

        let query = ListingQuery::build(&FilterSpec::default(), &Caller::admin("a"), range(1, 10));
        assert_eq!(query.active, None);
    }

    #[test]
    fn constraints_are_and_combined() {
        let mut row = listing("a");
        row.categories = vec!["Beach".into(), "Nature".into()];
        row.rating = 4.2;
        row.avg_sentiment_score = Some(85);

        let spec = FilterSpec {
            categories: vec!["Nature".into(), "City".into()],
            min_rating: Some(4.0),
            min_sentiment: Some(80.0),
            ..FilterSpec::default()
        };
        let query = ListingQuery::build(&spec, &Caller::anonymous(), range(1, 10));
        assert!(query.matches(&row));

        row.rating = 3.9;
        assert!(!query.matches(&row));
        row.rating = 4.2;

        row.avg_sentiment_score = None;
        assert!(!query.matches(&row));
        row.avg_sentiment_score = Some(85);

        row.categories = vec!["City Break".into()];
        assert!(!query.matches(&row));
        row.categories = vec!["City".into()];

        row.active = false;
        assert!(!query.matches(&row));
    }

    #[test]
    fn featured_is_exact_match() {
        let mut row = listing("a");
        let spec = FilterSpec {
            featured: Some(true),
            ..FilterSpec::default()
        };
        let query = ListingQuery::build(&spec, &Caller::admin("a"), range(1, 10));
        assert!(!query.matches(&row));
        row.is_featured = true;
        assert!(query.matches(&row));
    }

    #[test]
    fn sort_compares_descending() {
        let mut low = listing("low");
        let mut high = listing("high");
        low.rating = 3.0;
        high.rating = 4.5;
        low.reviews = 1;
        high.reviews = 9;
        assert_eq!(SortOrder::Rating.compare(&high, &low), Ordering::Less);
        assert_eq!(SortOrder::Popular.compare(&low, &high), Ordering::Greater);

        high.created_at = low.created_at + chrono::Duration::days(1);
        assert_eq!(SortOrder::Newest.compare(&high, &low), Ordering::Less);
    }
}
