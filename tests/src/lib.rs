mod db;
pub use db::{Db, MappedClass, Row};

pub use setup::{
    document_fixture, document_fixture_with, document_value, nested_fixture, nested_value,
    pages_fixture, pages_value, Fixture, NestedFixture, AUTHOR, BOOK,
};

/// Initializes logging for test output. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
