pub mod faq_response;
pub mod faq_routes;
