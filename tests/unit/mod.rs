mod registry_tests;
mod service_tests;
