pub mod progress_routes;
