pub mod url_mapping;
