//! Integration tests for the networked (MySQL) backend.
//!
//! These require a running MySQL server. Set TEST_MYSQL_DESCRIPTOR to run
//! them, e.g.:
//! TEST_MYSQL_DESCRIPTOR="Server=127.0.0.1; Port=3306; Database=test; Uid=root; Pwd=root;"

use rowmap::{
    Arguments, ConnectionDescriptor, ConstructorTag, DbPool, Entity, MapError, MapResult,
    ObjectMapper, Query, TypeSchema, Value, ValueType,
};
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

static POINT_SCHEMA: LazyLock<TypeSchema> = LazyLock::new(|| {
    TypeSchema::builder("Point")
        .property("x", ValueType::Int32)
        .property("y", ValueType::Int32)
        .constructor([("x", ValueType::Int32), ("y", ValueType::Int32)])
        .build()
});

impl Entity for Point {
    const NAME: &'static str = "Point";

    fn schema() -> &'static TypeSchema {
        &POINT_SCHEMA
    }

    fn construct(_tag: ConstructorTag, args: Vec<Value>) -> MapResult<Self> {
        let mut args = Arguments::new(Self::NAME, args);
        let point = Point {
            x: args.int32()?,
            y: args.int32()?,
        };
        args.finish()?;
        Ok(point)
    }

    fn assign(&mut self, property: &str, _value: Value) -> MapResult<()> {
        Err(MapError::construction(
            Self::NAME,
            format!("no manual property '{}'", property),
        ))
    }

    fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![("x", Value::Int32(self.x)), ("y", Value::Int32(self.y))]
    }
}

#[tokio::test]
async fn test_mysql_round_trip() {
    let descriptor_text = match std::env::var("TEST_MYSQL_DESCRIPTOR") {
        Ok(text) => text,
        Err(_) => {
            eprintln!("Skipping test: TEST_MYSQL_DESCRIPTOR not set");
            return;
        }
    };

    let descriptor = ConnectionDescriptor::parse(&descriptor_text).expect("valid descriptor");
    let pool = DbPool::connect(&descriptor).await.expect("connect");
    let mapper = ObjectMapper::new(pool);

    mapper
        .pool()
        .execute("DROP TABLE IF EXISTS points", &[])
        .await
        .expect("drop");
    let ddl = mapper
        .create_table_statement::<Point>("points")
        .expect("ddl");
    mapper.pool().execute(&ddl, &[]).await.expect("create table");

    let point = Point { x: 3, y: 4 };
    mapper.serialize_as(&point, "points").await.expect("insert");

    let loaded: Point = mapper
        .deserialize(&Query::new("SELECT x, y FROM points"))
        .await
        .expect("select");
    assert_eq!(loaded, point);

    mapper
        .pool()
        .execute("DROP TABLE points", &[])
        .await
        .expect("cleanup");
    mapper.pool().close().await;
}
