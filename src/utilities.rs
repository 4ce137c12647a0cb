pub mod config;

#[cfg(test)]
pub mod test_fixtures;
