//! Connection descriptor text codec.
//!
//! Two backend shapes share one `key=value;` wire format: the networked
//! MySQL shape (`Server=…; Port=…; Database=…; Uid=…; Pwd=…;`) and the
//! embedded SQLite shape (`Data Source=…;Version=…;`). Parse and generate
//! round-trip for any valid descriptor; anything else fails hard with
//! [`MapError::MalformedConnectionString`].

use crate::error::{MapError, MapResult};
use serde::Serialize;
use std::collections::HashMap;

const MYSQL_FIELDS: [&str; 5] = ["Server", "Port", "Database", "Uid", "Pwd"];
const SQLITE_FIELDS: [&str; 2] = ["Data Source", "Version"];

/// Networked backend descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MySqlDescriptor {
    server: String,
    port: u16,
    database: String,
    uid: String,
    /// Contains sensitive data - never log
    #[serde(skip_serializing)]
    pwd: String,
}

impl MySqlDescriptor {
    /// Create a descriptor, validating every field.
    pub fn new(
        server: impl Into<String>,
        port: u16,
        database: impl Into<String>,
        uid: impl Into<String>,
        pwd: impl Into<String>,
    ) -> MapResult<Self> {
        let server = server.into();
        let database = database.into();
        let uid = uid.into();
        let pwd = pwd.into();

        if server.trim().is_empty() {
            return Err(MapError::validation("server address required"));
        }
        if port == 0 {
            return Err(MapError::validation("valid port required"));
        }
        if database.trim().is_empty() {
            return Err(MapError::validation("database name required"));
        }
        if uid.trim().is_empty() {
            return Err(MapError::validation("username required"));
        }
        if pwd.trim().is_empty() {
            return Err(MapError::validation("password required"));
        }

        Ok(Self {
            server,
            port,
            database,
            uid,
            pwd,
        })
    }

    /// Parse the textual form.
    pub fn parse(text: &str) -> MapResult<Self> {
        let fields = parse_fields(text, &MYSQL_FIELDS)?;
        let port = parse_numeric_field(&fields, "Port", 1..=u32::from(u16::MAX))? as u16;

        Ok(Self {
            server: fields["Server"].clone(),
            port,
            database: fields["Database"].clone(),
            uid: fields["Uid"].clone(),
            pwd: fields["Pwd"].clone(),
        })
    }

    /// Generate the textual form, fixed key order with trailing separator.
    pub fn generate(&self) -> String {
        format!(
            "Server={}; Port={}; Database={}; Uid={}; Pwd={};",
            self.server, self.port, self.database, self.uid, self.pwd
        )
    }

    /// The server's address.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// The server's port (usually 3306).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The name of the target schema.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// The username.
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// The password.
    pub fn pwd(&self) -> &str {
        &self.pwd
    }
}

/// Embedded backend descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqliteDescriptor {
    data_source: String,
    version: u8,
}

impl SqliteDescriptor {
    /// Create a descriptor, validating every field.
    pub fn new(data_source: impl Into<String>, version: u8) -> MapResult<Self> {
        let data_source = data_source.into();
        if data_source.trim().is_empty() {
            return Err(MapError::validation("data source required"));
        }
        if !(1..=3).contains(&version) {
            return Err(MapError::validation("valid version number required"));
        }
        Ok(Self {
            data_source,
            version,
        })
    }

    /// Parse the textual form.
    pub fn parse(text: &str) -> MapResult<Self> {
        let fields = parse_fields(text, &SQLITE_FIELDS)?;
        let version = parse_numeric_field(&fields, "Version", 1..=3)? as u8;

        Ok(Self {
            data_source: fields["Data Source"].clone(),
            version,
        })
    }

    /// Generate the textual form, fixed key order with trailing separator.
    pub fn generate(&self) -> String {
        format!(
            "Data Source={};Version={};",
            self.data_source, self.version
        )
    }

    /// The database's data source (i.e. filename).
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// The SQLite version in use (latest is 3).
    pub fn version(&self) -> u8 {
        self.version
    }
}

/// Either backend shape, detected from the leading key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConnectionDescriptor {
    MySql(MySqlDescriptor),
    Sqlite(SqliteDescriptor),
}

impl ConnectionDescriptor {
    /// Parse descriptor text, dispatching on the leading key.
    pub fn parse(text: &str) -> MapResult<Self> {
        if text.trim_start().starts_with("Data Source=") {
            SqliteDescriptor::parse(text).map(Self::Sqlite)
        } else {
            MySqlDescriptor::parse(text).map(Self::MySql)
        }
    }

    /// Generate the textual form for whichever shape this is.
    pub fn generate(&self) -> String {
        match self {
            Self::MySql(descriptor) => descriptor.generate(),
            Self::Sqlite(descriptor) => descriptor.generate(),
        }
    }
}

/// Split descriptor text into its fields and verify the declared key set.
fn parse_fields(text: &str, required: &[&str]) -> MapResult<HashMap<String, String>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MapError::malformed_connection_string(
            "connection string is empty",
        ));
    }

    let segments: Vec<&str> = text.split(';').collect();
    // The trailing separator yields one empty segment beyond the fields.
    if segments.len() != required.len() + 1 {
        return Err(MapError::malformed_connection_string(format!(
            "expected {} fields, found {} segments",
            required.len(),
            segments.len().saturating_sub(1)
        )));
    }

    let mut fields = HashMap::new();
    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once('=') else {
            return Err(MapError::malformed_connection_string(format!(
                "segment '{}' is missing '='",
                segment
            )));
        };
        fields.insert(key.trim().to_string(), value.trim().to_string());
    }

    for key in required {
        match fields.get(*key) {
            None => {
                return Err(MapError::malformed_connection_string(format!(
                    "missing field '{}'",
                    key
                )));
            }
            Some(value) if value.is_empty() => {
                return Err(MapError::malformed_connection_string(format!(
                    "field '{}' is empty",
                    key
                )));
            }
            _ => {}
        }
    }

    Ok(fields)
}

/// Coerce a numeric field, enforcing its declared range.
fn parse_numeric_field(
    fields: &HashMap<String, String>,
    key: &str,
    range: std::ops::RangeInclusive<u32>,
) -> MapResult<u32> {
    let value: u32 = fields[key].parse().map_err(|_| {
        MapError::malformed_connection_string(format!("field '{}' is not numeric", key))
    })?;
    if !range.contains(&value) {
        return Err(MapError::malformed_connection_string(format!(
            "field '{}' is out of range",
            key
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_generate_exact_form() {
        let descriptor = MySqlDescriptor::new("db1", 3306, "app", "root", "secret").unwrap();
        assert_eq!(
            descriptor.generate(),
            "Server=db1; Port=3306; Database=app; Uid=root; Pwd=secret;"
        );
    }

    #[test]
    fn test_sqlite_generate_exact_form() {
        let descriptor = SqliteDescriptor::new("file.db", 3).unwrap();
        assert_eq!(descriptor.generate(), "Data Source=file.db;Version=3;");
    }

    #[test]
    fn test_mysql_round_trip() {
        let descriptor = MySqlDescriptor::new("db1", 3306, "app", "root", "secret").unwrap();
        let parsed = MySqlDescriptor::parse(&descriptor.generate()).unwrap();
        assert_eq!(parsed, descriptor);
    }

    #[test]
    fn test_sqlite_round_trip() {
        let descriptor = SqliteDescriptor::new("data/library.db", 2).unwrap();
        let parsed = SqliteDescriptor::parse(&descriptor.generate()).unwrap();
        assert_eq!(parsed, descriptor);
    }

    #[test]
    fn test_dispatch_on_leading_key() {
        let mysql =
            ConnectionDescriptor::parse("Server=db1; Port=3306; Database=app; Uid=root; Pwd=s;")
                .unwrap();
        assert!(matches!(mysql, ConnectionDescriptor::MySql(_)));

        let sqlite = ConnectionDescriptor::parse("Data Source=file.db;Version=3;").unwrap();
        assert!(matches!(sqlite, ConnectionDescriptor::Sqlite(_)));
    }

    #[test]
    fn test_enum_round_trip() {
        let descriptor = ConnectionDescriptor::parse("Data Source=file.db;Version=3;").unwrap();
        assert_eq!(descriptor.generate(), "Data Source=file.db;Version=3;");
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        let err = MySqlDescriptor::parse("Server=db1; Port=3306;").unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));

        let err = SqliteDescriptor::parse("Data Source=a;Version=3;Extra=1;").unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_key_set() {
        let err =
            MySqlDescriptor::parse("Host=db1; Port=3306; Database=app; Uid=root; Pwd=secret;")
                .unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));
    }

    #[test]
    fn test_parse_rejects_empty_value() {
        let err = MySqlDescriptor::parse("Server=; Port=3306; Database=app; Uid=root; Pwd=s;")
            .unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));
    }

    #[test]
    fn test_parse_rejects_non_numeric_port() {
        let err =
            MySqlDescriptor::parse("Server=db1; Port=abc; Database=app; Uid=root; Pwd=s;")
                .unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));
    }

    #[test]
    fn test_parse_rejects_out_of_range_numerics() {
        let err = MySqlDescriptor::parse("Server=db1; Port=0; Database=app; Uid=root; Pwd=s;")
            .unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));

        let err = SqliteDescriptor::parse("Data Source=file.db;Version=4;").unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));

        // Too large for any port; fails as the same error kind.
        let err = MySqlDescriptor::parse("Server=db1; Port=70000; Database=app; Uid=root; Pwd=s;")
            .unwrap_err();
        assert!(matches!(err, MapError::MalformedConnectionString { .. }));
    }

    #[test]
    fn test_new_validates_fields() {
        assert!(MySqlDescriptor::new("", 3306, "app", "root", "s").is_err());
        assert!(MySqlDescriptor::new("db1", 0, "app", "root", "s").is_err());
        assert!(MySqlDescriptor::new("db1", 3306, "app", "", "s").is_err());
        assert!(SqliteDescriptor::new("", 3).is_err());
        assert!(SqliteDescriptor::new("file.db", 0).is_err());
        assert!(SqliteDescriptor::new("file.db", 4).is_err());
    }
}
