//! Per-type schema descriptors and the registration trait.
//!
//! Domain types register a [`TypeSchema`] describing their properties and
//! constructor candidates once per process (typically behind
//! `std::sync::LazyLock`). The mapper reads the schema to resolve a
//! constructor against the available columns and then drives the type's
//! builder through the [`Entity`] trait.

use crate::error::{MapError, MapResult};
use crate::models::value::{Value, ValueType};
use chrono::{DateTime, Utc};

/// Identifies one registered constructor of a type.
///
/// The resolver hands this tag back to [`Entity::construct`] so each type can
/// dispatch to a concrete builder instead of a generic invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstructorTag(pub usize);

/// One constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: &'static str,
    pub value_type: ValueType,
}

/// A named, typed parameter list eligible to build an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorCandidate {
    tag: ConstructorTag,
    params: Vec<Parameter>,
    explicit: bool,
}

impl ConstructorCandidate {
    /// Tag identifying this constructor's builder.
    pub fn tag(&self) -> ConstructorTag {
        self.tag
    }

    /// Parameters in declared order.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Number of declared parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Check if the type pinned this constructor explicitly.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

/// One public property of a registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub value_type: ValueType,
    manual: bool,
    column: Option<&'static str>,
}

impl Property {
    /// Check if the property is set by direct assignment after construction.
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Column the property is bound to. Manual properties may declare a
    /// column name different from the property name.
    pub fn column_name(&self) -> &'static str {
        self.column.unwrap_or(self.name)
    }
}

/// Cached schema descriptor for a registered type.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    type_name: &'static str,
    properties: Vec<Property>,
    constructors: Vec<ConstructorCandidate>,
}

impl TypeSchema {
    /// Start building a schema for `type_name`.
    pub fn builder(type_name: &'static str) -> TypeSchemaBuilder {
        TypeSchemaBuilder {
            type_name,
            properties: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Name of the registered type; doubles as the default table name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Properties in declared order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Constructor candidates in declared order.
    pub fn constructors(&self) -> &[ConstructorCandidate] {
        &self.constructors
    }

    /// Properties flagged for direct post-construction assignment.
    pub fn manual_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_manual())
    }

    /// The explicitly pinned constructor, if the type declared one.
    pub fn explicit_constructor(&self) -> Option<&ConstructorCandidate> {
        self.constructors.iter().find(|c| c.is_explicit())
    }
}

/// Builder for [`TypeSchema`].
pub struct TypeSchemaBuilder {
    type_name: &'static str,
    properties: Vec<Property>,
    constructors: Vec<ConstructorCandidate>,
}

impl TypeSchemaBuilder {
    /// Declare a property assigned through a constructor parameter.
    pub fn property(mut self, name: &'static str, value_type: ValueType) -> Self {
        self.properties.push(Property {
            name,
            value_type,
            manual: false,
            column: None,
        });
        self
    }

    /// Declare a property set by direct assignment after construction.
    pub fn manual_property(mut self, name: &'static str, value_type: ValueType) -> Self {
        self.properties.push(Property {
            name,
            value_type,
            manual: true,
            column: None,
        });
        self
    }

    /// Declare a manual property bound to a differently-named column.
    pub fn manual_property_as(
        mut self,
        name: &'static str,
        value_type: ValueType,
        column: &'static str,
    ) -> Self {
        self.properties.push(Property {
            name,
            value_type,
            manual: true,
            column: Some(column),
        });
        self
    }

    /// Declare a constructor candidate. The tag handed to
    /// [`Entity::construct`] is the declaration index.
    pub fn constructor(
        mut self,
        params: impl IntoIterator<Item = (&'static str, ValueType)>,
    ) -> Self {
        let tag = ConstructorTag(self.constructors.len());
        self.constructors.push(ConstructorCandidate {
            tag,
            params: params
                .into_iter()
                .map(|(name, value_type)| Parameter { name, value_type })
                .collect(),
            explicit: false,
        });
        self
    }

    /// Declare the constructor the resolver must always use.
    ///
    /// # Panics
    ///
    /// Panics if the schema already declares an explicit constructor; a type
    /// may pin at most one.
    pub fn explicit_constructor(
        mut self,
        params: impl IntoIterator<Item = (&'static str, ValueType)>,
    ) -> Self {
        assert!(
            self.constructors.iter().all(|c| !c.is_explicit()),
            "type '{}' declares more than one explicit constructor",
            self.type_name
        );
        let tag = ConstructorTag(self.constructors.len());
        self.constructors.push(ConstructorCandidate {
            tag,
            params: params
                .into_iter()
                .map(|(name, value_type)| Parameter { name, value_type })
                .collect(),
            explicit: true,
        });
        self
    }

    /// Finish the schema.
    pub fn build(self) -> TypeSchema {
        TypeSchema {
            type_name: self.type_name,
            properties: self.properties,
            constructors: self.constructors,
        }
    }
}

/// Registration contract for mappable domain types.
pub trait Entity: Sized {
    /// Type name; doubles as the default table name for the serialize path.
    const NAME: &'static str;

    /// The cached schema descriptor, built once per process.
    fn schema() -> &'static TypeSchema;

    /// Build an instance from the constructor identified by `tag` with the
    /// positional arguments assembled by the mapper. Argument count can fall
    /// short of the declared parameter count when columns are missing; the
    /// builder surfaces that as a [`MapError::Construction`] error.
    fn construct(tag: ConstructorTag, args: Vec<Value>) -> MapResult<Self>;

    /// Instance returned for an empty result set. `None` when the type has
    /// no no-argument constructor.
    fn default_instance() -> Option<Self> {
        None
    }

    /// Assign a manually-flagged property directly, bypassing constructors.
    fn assign(&mut self, property: &str, value: Value) -> MapResult<()>;

    /// Property values in declared order for the serialize path.
    fn properties(&self) -> Vec<(&'static str, Value)>;
}

/// Positional argument cursor used by [`Entity::construct`] implementations.
///
/// Each accessor pops the next argument and converts it, reporting arity and
/// type mismatches as [`MapError::Construction`].
pub struct Arguments {
    type_name: &'static str,
    values: std::vec::IntoIter<Value>,
}

impl Arguments {
    /// Wrap the argument list assembled by the mapper.
    pub fn new(type_name: &'static str, args: Vec<Value>) -> Self {
        Self {
            type_name,
            values: args.into_iter(),
        }
    }

    fn next(&mut self, expected: &str) -> MapResult<Value> {
        self.values.next().ok_or_else(|| {
            MapError::construction(
                self.type_name,
                format!("missing argument (expected {})", expected),
            )
        })
    }

    fn mismatch(&self, expected: &str, got: &Value) -> MapError {
        MapError::construction(
            self.type_name,
            format!("expected {} argument, got {}", expected, got.type_name()),
        )
    }

    /// Pop the next argument as a 32-bit integer.
    pub fn int32(&mut self) -> MapResult<i32> {
        match self.next("int32")? {
            Value::Int32(v) => Ok(v),
            other => Err(self.mismatch("int32", &other)),
        }
    }

    /// Pop the next argument as text.
    pub fn text(&mut self) -> MapResult<String> {
        match self.next("text")? {
            Value::Text(v) => Ok(v),
            other => Err(self.mismatch("text", &other)),
        }
    }

    /// Pop the next argument as a boolean.
    pub fn boolean(&mut self) -> MapResult<bool> {
        match self.next("bool")? {
            Value::Bool(v) => Ok(v),
            other => Err(self.mismatch("bool", &other)),
        }
    }

    /// Pop the next argument as a float.
    pub fn float(&mut self) -> MapResult<f32> {
        match self.next("float")? {
            Value::Float(v) => Ok(v),
            other => Err(self.mismatch("float", &other)),
        }
    }

    /// Pop the next argument as a UTC date/time.
    pub fn date_time(&mut self) -> MapResult<DateTime<Utc>> {
        match self.next("datetime")? {
            Value::DateTime(v) => Ok(v),
            other => Err(self.mismatch("datetime", &other)),
        }
    }

    /// Pop the next argument as a decoded list.
    pub fn list(&mut self) -> MapResult<Vec<Value>> {
        match self.next("list")? {
            Value::List(v) => Ok(v),
            other => Err(self.mismatch("list", &other)),
        }
    }

    /// Assert every argument was consumed.
    pub fn finish(mut self) -> MapResult<()> {
        match self.values.next() {
            None => Ok(()),
            Some(extra) => Err(MapError::construction(
                self.type_name,
                format!("unexpected extra {} argument", extra.type_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_schema() -> TypeSchema {
        TypeSchema::builder("Point")
            .property("x", ValueType::Int32)
            .property("y", ValueType::Int32)
            .constructor([("x", ValueType::Int32), ("y", ValueType::Int32)])
            .build()
    }

    #[test]
    fn test_schema_shape() {
        let schema = point_schema();
        assert_eq!(schema.type_name(), "Point");
        assert_eq!(schema.properties().len(), 2);
        assert_eq!(schema.constructors().len(), 1);
        assert_eq!(schema.constructors()[0].tag(), ConstructorTag(0));
        assert!(schema.explicit_constructor().is_none());
    }

    #[test]
    fn test_manual_property_column_binding() {
        let schema = TypeSchema::builder("User")
            .property("id", ValueType::Int32)
            .manual_property("role", ValueType::Text)
            .manual_property_as("joined", ValueType::DateTime, "joined_at")
            .constructor([("id", ValueType::Int32)])
            .build();

        let manual: Vec<_> = schema.manual_properties().collect();
        assert_eq!(manual.len(), 2);
        assert_eq!(manual[0].column_name(), "role");
        assert_eq!(manual[1].column_name(), "joined_at");
    }

    #[test]
    fn test_explicit_constructor_lookup() {
        let schema = TypeSchema::builder("Reading")
            .constructor([("id", ValueType::Int32)])
            .explicit_constructor([("id", ValueType::Int32), ("label", ValueType::Text)])
            .build();

        let explicit = schema.explicit_constructor().unwrap();
        assert_eq!(explicit.tag(), ConstructorTag(1));
        assert_eq!(explicit.param_count(), 2);
    }

    #[test]
    #[should_panic(expected = "more than one explicit constructor")]
    fn test_second_explicit_constructor_panics() {
        let _ = TypeSchema::builder("Bad")
            .explicit_constructor([("a", ValueType::Int32)])
            .explicit_constructor([("b", ValueType::Int32)]);
    }

    #[test]
    fn test_arguments_cursor() {
        let mut args = Arguments::new(
            "Point",
            vec![Value::Int32(3), Value::Text("label".to_string())],
        );
        assert_eq!(args.int32().unwrap(), 3);
        assert_eq!(args.text().unwrap(), "label");
        assert!(args.finish().is_ok());
    }

    #[test]
    fn test_arguments_arity_mismatch() {
        let mut args = Arguments::new("Point", vec![Value::Int32(3)]);
        args.int32().unwrap();
        let err = args.int32().unwrap_err();
        assert!(matches!(err, MapError::Construction { .. }));
    }

    #[test]
    fn test_arguments_type_mismatch() {
        let mut args = Arguments::new("Point", vec![Value::Text("3".to_string())]);
        let err = args.int32().unwrap_err();
        assert!(matches!(err, MapError::Construction { .. }));
    }

    #[test]
    fn test_arguments_extra_argument() {
        let args = Arguments::new("Point", vec![Value::Int32(1)]);
        assert!(args.finish().is_err());
    }
}
