pub mod admin_faq_request;
pub mod admin_faq_routes;
