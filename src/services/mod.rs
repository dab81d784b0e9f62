pub mod favorite_service;
pub mod listing_query;
pub mod listing_service;
pub mod pagination;
pub mod review_service;
pub mod similar;
pub mod user_service;
