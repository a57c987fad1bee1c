pub mod health_route;
