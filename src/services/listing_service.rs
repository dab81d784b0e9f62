//! Listing orchestration: input clamping, query building, pagination
//! metadata, admin mutations and stats.

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::Caller,
    error::ServiceError,
    models::listing::{
        Listing, ListingPage, ListingQueryParams, ListingStats, NewListing, NewListingRequest,
    },
    services::{
        listing_query::{FilterSpec, ListingQuery},
        pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest, parse_or_default},
        similar,
    },
    store::{ListingStore, StatsWindow, StoreError},
    utils::generate_slug,
};

pub const RECENT_WINDOW_DAYS: i64 = 7;
pub const SLUG_INSERT_ATTEMPTS: usize = 5;

pub async fn list_locations<S>(
    store: &S,
    caller: &Caller,
    page: i64,
    limit: i64,
    filters: &FilterSpec,
) -> Result<ListingPage, ServiceError>
where
    S: ListingStore + ?Sized,
{
    let request = PageRequest::new(page, limit);
    let query = ListingQuery::build(filters, caller, request.range());
    log::debug!("listing query: {:?}", query);

    let slice = store
        .find_listings(&query)
        .await
        .map_err(|e| ServiceError::fetch_failed("list_locations", e))?;

    let info = request.page_info(slice.total);
    Ok(ListingPage {
        data: slice.rows,
        next_page: info.next_page,
        has_more: info.has_more,
        total: slice.total,
    })
}

/// Parses raw query-string values, then lists.
pub async fn list_from_params<S>(
    store: &S,
    caller: &Caller,
    params: &ListingQueryParams,
) -> Result<ListingPage, ServiceError>
where
    S: ListingStore + ?Sized,
{
    let filters = FilterSpec::parse(params)?;
    let page = parse_or_default(params.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_or_default(params.limit.as_deref(), DEFAULT_LIMIT);
    list_locations(store, caller, page, limit, &filters).await
}

fn require_id(id: &str) -> Result<&str, ServiceError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ServiceError::invalid("Place id is required"));
    }
    Ok(id)
}

/// Inactive listings resolve only for admins.
pub async fn get_by_id<S>(store: &S, caller: &Caller, id: &str) -> Result<Listing, ServiceError>
where
    S: ListingStore + ?Sized,
{
    let id = require_id(id)?;
    let listing = store
        .find_listing(id)
        .await
        .map_err(|e| ServiceError::fetch_failed("get_by_id", e))?;

    match listing {
        Some(listing) if listing.active || caller.is_admin() => Ok(listing),
        _ => Err(ServiceError::NotFound("Place not found".into())),
    }
}

pub async fn get_similar<S>(store: &S, id: &str) -> Result<Vec<Listing>, ServiceError>
where
    S: ListingStore + ?Sized,
{
    let id = require_id(id)?;
    similar::resolve(store, id)
        .await
        .map_err(|e| ServiceError::fetch_failed("get_similar", e))
}

pub async fn set_active<S>(store: &S, id: &str, active: bool) -> Result<Listing, ServiceError>
where
    S: ListingStore + ?Sized,
{
    let id = require_id(id)?;
    let updated = store
        .set_active(id, active)
        .await
        .map_err(|e| ServiceError::update_failed("set_active", e))?;

    match updated {
        Some(listing) => {
            log::info!("listing {} active set to {}", listing.place_id, active);
            Ok(listing)
        }
        None => {
            log::warn!("set_active on unknown listing {}", id);
            Err(ServiceError::UpdateFailed("Failed to update".into()))
        }
    }
}

pub fn stats_window(now: DateTime<Utc>) -> StatsWindow {
    let today = now.date_naive();
    let this_month = today.with_day(1).unwrap_or(today);
    let last_month = this_month
        .checked_sub_months(Months::new(1))
        .unwrap_or(this_month);

    StatsWindow {
        recent_since: now - Duration::days(RECENT_WINDOW_DAYS),
        this_month_start: this_month.and_time(NaiveTime::MIN).and_utc(),
        last_month_start: last_month.and_time(NaiveTime::MIN).and_utc(),
    }
}

pub async fn get_stats<S>(store: &S, now: DateTime<Utc>) -> Result<ListingStats, ServiceError>
where
    S: ListingStore + ?Sized,
{
    let counts = store
        .count_listings(&stats_window(now))
        .await
        .map_err(|e| ServiceError::fetch_failed("get_stats", e))?;

    let total = counts.total.unwrap_or(0);
    let active = counts.active.unwrap_or(0);
    let this_month = counts.this_month.unwrap_or(0);
    let last_month = counts.last_month.unwrap_or(0);

    Ok(ListingStats {
        total,
        active,
        inactive: total - active,
        featured: counts.featured.unwrap_or(0),
        recent: counts.recent.unwrap_or(0),
        this_month,
        last_month,
        monthly_change: this_month - last_month,
    })
}

/// `base`, then `base-1`, `base-2`, ... until the store reports no collision.
pub async fn generate_unique_slug<S>(store: &S, name: &str) -> Result<String, StoreError>
where
    S: ListingStore + ?Sized,
{
    let base = generate_slug(name);
    let mut slug = base.clone();
    let mut counter = 1;

    while store.slug_exists(&slug).await? {
        slug = format!("{base}-{counter}");
        counter += 1;
    }

    Ok(slug)
}

/// Trims, drops blanks and removes case-insensitive duplicates, keeping the
/// first spelling in its original position.
pub fn normalize_categories(raw: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();

    for category in raw.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
        let key = category.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            out.push(category.to_string());
        }
    }
    out
}

pub async fn create_listing<S>(
    store: &S,
    request: NewListingRequest,
    now: DateTime<Utc>,
) -> Result<Listing, ServiceError>
where
    S: ListingStore + ?Sized,
{
    request.validate()?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServiceError::invalid("Name is required"));
    }

    let categories = normalize_categories(&request.categories);
    let images: Vec<String> = request
        .images
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(String::from)
        .collect();

    // A concurrent insert can claim the slug between the check and the insert.
    for attempt in 1..=SLUG_INSERT_ATTEMPTS {
        let slug = generate_unique_slug(store, name)
            .await
            .map_err(|e| ServiceError::fetch_failed("generate_unique_slug", e))?;

        let new = NewListing {
            place_id: Uuid::new_v4().to_string(),
            slug,
            name: name.to_string(),
            location: request.location.trim().to_string(),
            images: images.clone(),
            categories: categories.clone(),
            description: request.description.trim().to_string(),
            lat: request.lat,
            lon: request.lon,
            active: request.active.unwrap_or(true),
            is_featured: request.is_featured.unwrap_or(false),
            created_at: now,
        };

        match store.insert_listing(&new).await {
            Ok(listing) => {
                log::info!("created listing {} ({})", listing.place_id, listing.slug);
                return Ok(listing);
            }
            Err(StoreError::UniqueViolation(detail)) => {
                log::warn!(
                    "slug {} collided on insert, attempt {}: {}",
                    new.slug,
                    attempt,
                    detail
                );
            }
            Err(e) => return Err(ServiceError::update_failed("create_listing", e)),
        }
    }

    Err(ServiceError::Conflict(
        "Could not allocate a unique slug, try again".into(),
    ))
}
