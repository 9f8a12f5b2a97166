pub mod auth;
pub mod site_config_request;
pub mod tenant;
