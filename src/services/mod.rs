pub mod tracker_service;
pub mod upload_service;
