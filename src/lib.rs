pub mod client;
pub mod config;
pub mod content;
pub mod image_url;
pub mod load_query;
pub mod logger;
pub mod presentation;
pub mod queries;
pub mod schema;
pub mod view;

#[cfg(test)]
mod test_data;
