pub mod catalog_routes;
