pub mod product_request;
pub mod recommendation_route;
pub mod search_route;
