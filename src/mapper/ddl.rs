//! CREATE TABLE statement generation.

use crate::equivalence::TypeEquivalence;
use crate::error::{MapError, MapResult};
use crate::models::schema::Entity;

/// Generates DDL from registered type schemas.
pub struct SchemaGenerator;

impl SchemaGenerator {
    /// Build a CREATE TABLE statement whose columns mirror `T`'s properties
    /// in declared order.
    ///
    /// Fails with [`MapError::NoTypeMapping`] when a property's declared type
    /// has no column equivalent instead of emitting broken DDL.
    pub fn create_table_statement<T: Entity>(
        types: &TypeEquivalence,
        table: &str,
    ) -> MapResult<String> {
        if table.trim().is_empty() {
            return Err(MapError::validation("table name required"));
        }

        let schema = T::schema();
        let mut columns = Vec::with_capacity(schema.properties().len());
        for property in schema.properties() {
            let column_type = types
                .column_type(&property.value_type)
                .ok_or_else(|| MapError::no_type_mapping(property.name))?;
            columns.push(format!("{} {}", property.name, column_type));
        }

        Ok(format!("CREATE TABLE {} ({});", table, columns.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::{Arguments, ConstructorTag, TypeSchema};
    use crate::models::value::{ElementType, Value, ValueType};
    use std::sync::LazyLock;

    struct Sensor {
        id: i32,
        label: String,
        readings: Vec<Value>,
    }

    static SENSOR_SCHEMA: LazyLock<TypeSchema> = LazyLock::new(|| {
        TypeSchema::builder("Sensor")
            .property("id", ValueType::Int32)
            .property("label", ValueType::Text)
            .property("readings", ValueType::List(ElementType::Float))
            .constructor([
                ("id", ValueType::Int32),
                ("label", ValueType::Text),
                ("readings", ValueType::List(ElementType::Float)),
            ])
            .build()
    });

    impl Entity for Sensor {
        const NAME: &'static str = "Sensor";

        fn schema() -> &'static TypeSchema {
            &SENSOR_SCHEMA
        }

        fn construct(_tag: ConstructorTag, args: Vec<Value>) -> crate::error::MapResult<Self> {
            let mut args = Arguments::new(Self::NAME, args);
            let sensor = Sensor {
                id: args.int32()?,
                label: args.text()?,
                readings: args.list()?,
            };
            args.finish()?;
            Ok(sensor)
        }

        fn assign(&mut self, property: &str, _value: Value) -> crate::error::MapResult<()> {
            Err(crate::error::MapError::construction(
                Self::NAME,
                format!("no manual property '{}'", property),
            ))
        }

        fn properties(&self) -> Vec<(&'static str, Value)> {
            vec![
                ("id", Value::Int32(self.id)),
                ("label", Value::Text(self.label.clone())),
                ("readings", Value::List(self.readings.clone())),
            ]
        }
    }

    struct Odd;

    static ODD_SCHEMA: LazyLock<TypeSchema> = LazyLock::new(|| {
        TypeSchema::builder("Odd")
            .property("payload", ValueType::Custom("Blob".to_string()))
            .constructor([("payload", ValueType::Custom("Blob".to_string()))])
            .build()
    });

    impl Entity for Odd {
        const NAME: &'static str = "Odd";

        fn schema() -> &'static TypeSchema {
            &ODD_SCHEMA
        }

        fn construct(_tag: ConstructorTag, _args: Vec<Value>) -> crate::error::MapResult<Self> {
            Ok(Odd)
        }

        fn assign(&mut self, property: &str, _value: Value) -> crate::error::MapResult<()> {
            Err(crate::error::MapError::construction(
                Self::NAME,
                format!("no manual property '{}'", property),
            ))
        }

        fn properties(&self) -> Vec<(&'static str, Value)> {
            vec![("payload", Value::Null)]
        }
    }

    #[test]
    fn test_create_table_statement() {
        let types = TypeEquivalence::new();
        let sql = SchemaGenerator::create_table_statement::<Sensor>(&types, "sensors").unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE sensors (id INTEGER, label TEXT, readings TEXT);"
        );
    }

    #[test]
    fn test_unmapped_property_type_fails() {
        let types = TypeEquivalence::new();
        let err = SchemaGenerator::create_table_statement::<Odd>(&types, "odd").unwrap_err();
        assert!(matches!(err, MapError::NoTypeMapping { .. }));
    }

    #[test]
    fn test_empty_table_name_fails() {
        let types = TypeEquivalence::new();
        let err = SchemaGenerator::create_table_statement::<Sensor>(&types, "  ").unwrap_err();
        assert!(matches!(err, MapError::Validation { .. }));
    }
}
