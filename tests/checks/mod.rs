//! Analysis tests
//!
//! Rules, smells and hotspots over parsed fixtures and hand-built models,
//! plus configuration loading.

mod tests_config;
mod tests_properties;
mod tests_scale;
mod tests_scenarios;
