pub mod db_utils;
pub mod error;
pub mod i18n;
pub mod query_cache;
pub mod responses;

#[cfg(test)]
pub mod test_fixtures;
