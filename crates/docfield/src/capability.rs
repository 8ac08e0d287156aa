#[derive(Debug)]
pub struct Capability {
    /// When true, the engine uses a SQL-based query language.
    pub sql: bool,

    /// Column storage types supported by the engine
    pub storage_types: StorageTypes,
}

#[derive(Debug)]
pub struct StorageTypes {
    /// When true, the engine has a first-class structured JSON column type;
    /// otherwise documents are stored in a plain text column.
    pub json: bool,

    /// When `Some` the engine supports varchar types with the specified upper
    /// limit.
    pub varchar: Option<u64>,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        storage_types: StorageTypes::SQLITE,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        storage_types: StorageTypes::POSTGRESQL,
        ..Self::SQLITE
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        storage_types: StorageTypes::MYSQL,
        ..Self::SQLITE
    };
}

impl StorageTypes {
    /// SQLite storage types
    pub const SQLITE: StorageTypes = StorageTypes {
        // SQLite's JSON support is function-level only; a "JSON" column is
        // just TEXT affinity, so documents bind as text.
        json: false,

        // SQLite ignores the length specifier of VARCHAR(N); the only hard
        // limit is SQLITE_MAX_LENGTH, 1 billion by default.
        varchar: Some(1_000_000_000),
    };

    pub const POSTGRESQL: StorageTypes = StorageTypes {
        json: true,

        // The maximum n you can specify is 10 485 760 characters.
        varchar: Some(10_485_760),
    };

    pub const MYSQL: StorageTypes = StorageTypes {
        json: true,

        // Subject to the 65,535-byte row size shared among all columns.
        varchar: Some(65_535),
    };
}
