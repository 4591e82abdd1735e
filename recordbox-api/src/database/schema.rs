//! Table definitions. The service normally runs against tables created
//! out-of-band; `database.create_schema = true` applies these at startup.

pub const CREATE_FILES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS files (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        file BYTEA NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT now()
    )
"#;

pub const CREATE_MESSAGES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        id SERIAL PRIMARY KEY,
        message TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT now()
    )
"#;

pub const ALL_TABLES: &[&str] = &[CREATE_FILES_TABLE, CREATE_MESSAGES_TABLE];
