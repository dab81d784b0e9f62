//! Related listings: other active places sharing at least one category with
//! the source, best rated first.

use crate::{
    models::listing::Listing,
    services::listing_query::overlaps,
    store::{ListingStore, StoreError},
};

pub const SIMILAR_LIMIT: i64 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarQuery {
    pub place_id: String,
    pub categories: Vec<String>,
    pub limit: i64,
}

impl SimilarQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        listing.active
            && listing.place_id != self.place_id
            && overlaps(&listing.categories, &self.categories)
    }
}

/// An unknown source or one without categories yields an empty list.
pub async fn resolve<S>(store: &S, place_id: &str) -> Result<Vec<Listing>, StoreError>
where
    S: ListingStore + ?Sized,
{
    let categories = match store.find_categories(place_id).await? {
        Some(categories) if !categories.is_empty() => categories,
        _ => return Ok(Vec::new()),
    };

    let query = SimilarQuery {
        place_id: place_id.to_string(),
        categories,
        limit: SIMILAR_LIMIT,
    };

    let mut rows = store.find_similar(&query).await?;
    rows.retain(|row| row.place_id != place_id);
    rows.truncate(SIMILAR_LIMIT as usize);
    Ok(rows)
}
