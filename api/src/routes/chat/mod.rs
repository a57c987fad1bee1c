pub mod chat_request;
pub mod chat_route;
pub mod reset_chat_route;
