//! Tests for database, table, view and function DDL.

mod common;

use common::*;
use oxide_spark_sql::ast::{
    DataType, FileFormat, FunctionResourceType, HivePartitionColumns, PropertyValue, RowFormat,
    StatementKind,
};

// ===================================================================
// Databases
// ===================================================================

#[test]
fn create_database_with_clauses() {
    let kind = parse_kind(
        "CREATE DATABASE IF NOT EXISTS sales COMMENT 'c' LOCATION '/db' WITH DBPROPERTIES ('owner' = 'me')",
    );
    let StatementKind::CreateDatabase {
        if_not_exists,
        name,
        comment,
        location,
        properties,
    } = kind
    else {
        panic!("Expected CREATE DATABASE");
    };
    assert!(if_not_exists);
    assert_eq!(name.value(), "sales");
    assert_eq!(comment.as_deref(), Some("c"));
    assert_eq!(location.as_deref(), Some("/db"));
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].key, "owner");
}

#[test]
fn database_clauses_in_any_order() {
    assert!(matches!(
        parse_kind("CREATE DATABASE d LOCATION '/x' COMMENT 'y'"),
        StatementKind::CreateDatabase { .. }
    ));
}

#[test]
fn duplicate_database_location() {
    assert_eq!(
        syntax_message("CREATE DATABASE d LOCATION '/a' LOCATION '/b'"),
        "Found duplicate clauses: LOCATION"
    );
}

#[test]
fn alter_database_properties() {
    assert!(matches!(
        parse_kind("ALTER DATABASE d SET DBPROPERTIES ('a' = '1', 'b' = '2')"),
        StatementKind::SetDatabaseProperties { ref properties, .. } if properties.len() == 2
    ));
}

#[test]
fn database_properties_need_values() {
    assert_eq!(
        unsupported_command("ALTER DATABASE d SET DBPROPERTIES ('a', 'b' = '2')"),
        "Values must be specified for key(s): [a]"
    );
}

#[test]
fn drop_database() {
    assert!(matches!(
        parse_kind("DROP DATABASE IF EXISTS d CASCADE"),
        StatementKind::DropDatabase {
            if_exists: true,
            cascade: true,
            ..
        }
    ));
    assert!(matches!(
        parse_kind("DROP DATABASE d RESTRICT"),
        StatementKind::DropDatabase {
            if_exists: false,
            cascade: false,
            ..
        }
    ));
}

#[test]
fn use_database() {
    assert!(matches!(
        parse_kind("USE analytics"),
        StatementKind::Use { ref database } if database.value() == "analytics"
    ));
}

// ===================================================================
// Data source tables
// ===================================================================

#[test]
fn create_data_source_table() {
    let kind = parse_kind(
        "CREATE TABLE IF NOT EXISTS db.t (id BIGINT, name STRING COMMENT 'n') USING parquet \
         OPTIONS ('compression' 'snappy') PARTITIONED BY (id) \
         CLUSTERED BY (name) SORTED BY (name ASC) INTO 4 BUCKETS \
         LOCATION '/data' COMMENT 'table' TBLPROPERTIES ('k' = 'v')",
    );
    let StatementKind::CreateTable(table) = kind else {
        panic!("Expected data source table");
    };
    assert!(table.header.if_not_exists);
    assert_eq!(table.header.table.to_string(), "db.t");
    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[0].data_type, DataType::Long);
    assert_eq!(table.columns[1].comment.as_deref(), Some("n"));
    assert_eq!(table.provider.parts[0].value(), "parquet");
    assert_eq!(table.options.len(), 1);
    assert_eq!(table.partition_columns.len(), 1);
    let bucket = table.bucket.expect("bucket");
    assert_eq!(bucket.num_buckets, 4);
    assert_eq!(bucket.sorted_by.len(), 1);
    assert_eq!(table.location.as_deref(), Some("/data"));
    assert_eq!(table.comment.as_deref(), Some("table"));
    assert_eq!(table.properties.len(), 1);
    assert!(table.query.is_none());
}

#[test]
fn create_table_as_select() {
    let kind = parse_kind("CREATE TABLE t USING parquet AS SELECT * FROM s");
    let StatementKind::CreateTable(table) = kind else {
        panic!("Expected data source table");
    };
    assert!(table.query.is_some());

    // AS is optional.
    let kind = parse_kind("CREATE TABLE t USING parquet SELECT * FROM s");
    assert!(matches!(kind, StatementKind::CreateTable(ref t) if t.query.is_some()));
}

#[test]
fn ctas_with_schema_is_unsupported() {
    assert_eq!(
        unsupported_command("CREATE TABLE t (a INT) USING parquet AS SELECT 1"),
        "Schema may not be specified in a Create Table As Select (CTAS) statement"
    );
}

#[test]
fn external_data_source_table_is_unsupported() {
    assert_eq!(
        unsupported_command("CREATE EXTERNAL TABLE t (a INT) USING parquet"),
        "CREATE EXTERNAL TABLE ... USING"
    );
}

#[test]
fn sorted_desc_is_unsupported() {
    assert_eq!(
        unsupported_command(
            "CREATE TABLE t (a INT) USING parquet CLUSTERED BY (a) SORTED BY (a DESC) INTO 2 BUCKETS"
        ),
        "Column ordering must be ASC, was 'DESC'"
    );
}

#[test]
fn temporary_data_source_table_variants() {
    assert_eq!(
        unsupported_command("CREATE TEMPORARY TABLE t USING csv AS SELECT 1"),
        "CREATE TEMPORARY TABLE ... USING ... AS query"
    );
    assert_eq!(
        unsupported_command("CREATE TEMPORARY TABLE IF NOT EXISTS t USING csv"),
        "CREATE TEMPORARY TABLE IF NOT EXISTS"
    );
}

#[test]
fn option_values_may_be_literals() {
    let kind = parse_kind("CREATE TABLE t USING csv OPTIONS (header true, sep ',', n 3)");
    let StatementKind::CreateTable(table) = kind else {
        panic!("Expected data source table");
    };
    assert_eq!(table.options.len(), 3);
    assert!(table.options.iter().all(|o| o.value.is_some()));
    assert!(matches!(table.options[1].value, Some(PropertyValue::String(ref s)) if s == ","));
}

#[test]
fn create_table_like() {
    let kind = parse_kind("CREATE TABLE IF NOT EXISTS t2 LIKE t1 LOCATION '/x'");
    assert!(matches!(
        kind,
        StatementKind::CreateTableLike {
            if_not_exists: true,
            location: Some(_),
            ..
        }
    ));
    assert_eq!(
        syntax_message("CREATE EXTERNAL TABLE t2 LIKE t1"),
        "CREATE EXTERNAL TABLE ... LIKE is not supported"
    );
}

// ===================================================================
// Hive tables
// ===================================================================

#[test]
fn create_hive_table() {
    let kind = parse_kind(
        "CREATE EXTERNAL TABLE logs (line STRING) COMMENT 'raw' PARTITIONED BY (ds STRING) \
         ROW FORMAT DELIMITED FIELDS TERMINATED BY '\\t' STORED AS TEXTFILE LOCATION '/logs'",
    );
    let StatementKind::CreateHiveTable(table) = kind else {
        panic!("Expected Hive table");
    };
    assert!(table.header.external);
    assert_eq!(table.comment.as_deref(), Some("raw"));
    assert!(matches!(
        table.partition_columns,
        Some(HivePartitionColumns::Typed(_))
    ));
    assert!(matches!(
        table.row_format,
        Some(RowFormat::Delimited {
            fields_terminated_by: Some(ref sep),
            ..
        }) if sep == "\t"
    ));
    assert!(matches!(table.file_format, Some(FileFormat::Named(_))));
    assert_eq!(table.location.as_deref(), Some("/logs"));
}

#[test]
fn hive_table_with_serde_and_input_format() {
    let kind = parse_kind(
        "CREATE TABLE t (a INT) ROW FORMAT SERDE 'org.S' WITH SERDEPROPERTIES ('k' = 'v') \
         STORED AS INPUTFORMAT 'in.F' OUTPUTFORMAT 'out.F'",
    );
    let StatementKind::CreateHiveTable(table) = kind else {
        panic!("Expected Hive table");
    };
    assert!(matches!(
        table.row_format,
        Some(RowFormat::Serde { ref class, ref properties }) if class == "org.S" && properties.len() == 1
    ));
    assert!(matches!(
        table.file_format,
        Some(FileFormat::InputOutput { .. })
    ));
}

#[test]
fn plain_create_table_is_hive() {
    assert!(matches!(
        parse_kind("CREATE TABLE t (a INT, b ARRAY<STRING>)"),
        StatementKind::CreateHiveTable(_)
    ));
}

#[test]
fn external_hive_table_needs_location() {
    assert_eq!(
        unsupported_command("CREATE EXTERNAL TABLE t (a INT) STORED AS ORC"),
        "CREATE EXTERNAL TABLE must be accompanied by LOCATION"
    );
}

#[test]
fn skewed_table_is_unsupported() {
    assert_eq!(
        unsupported_command("CREATE TABLE t (a INT) SKEWED BY (a) ON (1, 2) STORED AS DIRECTORIES"),
        "CREATE TABLE ... SKEWED BY"
    );
}

#[test]
fn serde_with_self_describing_format() {
    assert_eq!(
        unsupported_command("CREATE TABLE t (a INT) ROW FORMAT SERDE 'x' STORED AS PARQUET"),
        "ROW FORMAT SERDE is incompatible with format 'parquet', which also specifies a serde"
    );
}

#[test]
fn hive_ctas_with_partition_names() {
    let kind = parse_kind("CREATE TABLE t PARTITIONED BY (ds) STORED AS ORC AS SELECT * FROM s");
    let StatementKind::CreateHiveTable(table) = kind else {
        panic!("Expected Hive table");
    };
    assert!(matches!(
        table.partition_columns,
        Some(HivePartitionColumns::Names(ref names)) if names.len() == 1
    ));
    assert!(table.query.is_some());
}

#[test]
fn hive_ctas_with_typed_partitions_is_unsupported() {
    let command = unsupported_command(
        "CREATE TABLE t PARTITIONED BY (ds STRING) STORED AS ORC AS SELECT * FROM s",
    );
    assert!(command.starts_with(
        "A Create Table As Select (CTAS) statement is not allowed to create a partitioned table using Hive's file formats."
    ));
}

#[test]
fn partition_names_without_query() {
    assert_eq!(
        syntax_message("CREATE TABLE t (a INT) PARTITIONED BY (ds)"),
        "Must specify a data type for each partition column while creating Hive partitioned table."
    );
}

#[test]
fn mixed_partition_columns() {
    assert_eq!(
        syntax_message("CREATE TABLE t (a INT) PARTITIONED BY (ds STRING, hr)"),
        "PARTITIONED BY columns must either all have a data type or none"
    );
}

#[test]
fn duplicate_hive_clause() {
    assert_eq!(
        syntax_message("CREATE TABLE t (a INT) STORED AS ORC STORED AS PARQUET"),
        "Found duplicate clauses: STORED AS/BY"
    );
}

#[test]
fn stored_by_is_unsupported() {
    assert_eq!(
        unsupported_command("CREATE TABLE t (a INT) STORED BY 'handler'"),
        "STORED BY"
    );
}

#[test]
fn temporary_hive_table() {
    assert_eq!(
        syntax_message("CREATE TEMPORARY TABLE t (a INT) STORED AS ORC"),
        "CREATE TEMPORARY TABLE is not supported yet. Please use CREATE TEMPORARY VIEW as an alternative."
    );
}

#[test]
fn lines_terminated_by_must_be_newline() {
    let message = syntax_message(
        "CREATE TABLE t (a INT) ROW FORMAT DELIMITED LINES TERMINATED BY ',' STORED AS TEXTFILE",
    );
    assert!(message.starts_with("LINES TERMINATED BY only supports newline"));
}

// ===================================================================
// ALTER TABLE / ALTER VIEW
// ===================================================================

#[test]
fn rename_table_and_view() {
    assert!(matches!(
        parse_kind("ALTER TABLE a RENAME TO b"),
        StatementKind::RenameTable { is_view: false, .. }
    ));
    assert!(matches!(
        parse_kind("ALTER VIEW db.a RENAME TO db.b"),
        StatementKind::RenameTable { is_view: true, .. }
    ));
}

#[test]
fn set_and_unset_table_properties() {
    assert!(matches!(
        parse_kind("ALTER TABLE t SET TBLPROPERTIES ('a' = '1')"),
        StatementKind::SetTableProperties { is_view: false, .. }
    ));
    let kind = parse_kind("ALTER VIEW v UNSET TBLPROPERTIES IF EXISTS ('a', 'b.c')");
    let StatementKind::UnsetTableProperties {
        keys,
        if_exists,
        is_view,
        ..
    } = kind
    else {
        panic!("Expected UNSET TBLPROPERTIES");
    };
    assert!(if_exists);
    assert!(is_view);
    assert_eq!(keys, vec![String::from("a"), String::from("b.c")]);
}

#[test]
fn unset_with_values_is_unsupported() {
    assert_eq!(
        unsupported_command("ALTER TABLE t UNSET TBLPROPERTIES ('a' = '1')"),
        "Values should not be specified for key(s): [a]"
    );
}

#[test]
fn dotted_property_keys() {
    let kind = parse_kind("ALTER TABLE t SET TBLPROPERTIES (a.b.c = 'x')");
    let StatementKind::SetTableProperties { properties, .. } = kind else {
        panic!("Expected SET TBLPROPERTIES");
    };
    assert_eq!(properties[0].key, "a.b.c");
}

#[test]
fn add_columns() {
    assert!(matches!(
        parse_kind("ALTER TABLE t ADD COLUMNS (x INT, y STRING COMMENT 'c')"),
        StatementKind::AddTableColumns { ref columns, .. } if columns.len() == 2
    ));
}

#[test]
fn add_partitions() {
    let kind = parse_kind(
        "ALTER TABLE t ADD IF NOT EXISTS PARTITION (ds = '1') LOCATION '/a' PARTITION (ds = '2')",
    );
    let StatementKind::AddTablePartition {
        if_not_exists,
        partitions,
        ..
    } = kind
    else {
        panic!("Expected ADD PARTITION");
    };
    assert!(if_not_exists);
    assert_eq!(partitions.len(), 2);
    assert_eq!(partitions[0].location.as_deref(), Some("/a"));
    assert!(partitions[1].location.is_none());
}

#[test]
fn partition_values_are_required() {
    assert_eq!(
        unsupported_command("ALTER TABLE t ADD PARTITION (ds)"),
        "Found an empty partition key 'ds'."
    );
}

#[test]
fn drop_partitions() {
    assert!(matches!(
        parse_kind("ALTER TABLE t DROP IF EXISTS PARTITION (ds = '1'), PARTITION (ds = '2') PURGE"),
        StatementKind::DropTablePartitions {
            if_exists: true,
            purge: true,
            ref partitions,
            ..
        } if partitions.len() == 2
    ));
}

#[test]
fn rename_partition() {
    assert!(matches!(
        parse_kind("ALTER TABLE t PARTITION (ds = '1') RENAME TO PARTITION (ds = '2')"),
        StatementKind::RenameTablePartition { .. }
    ));
}

#[test]
fn recover_partitions() {
    assert!(matches!(
        parse_kind("ALTER TABLE t RECOVER PARTITIONS"),
        StatementKind::RecoverPartitions { .. }
    ));
}

#[test]
fn change_column() {
    let kind = parse_kind("ALTER TABLE t CHANGE COLUMN a b BIGINT COMMENT 'renamed'");
    let StatementKind::ChangeColumn {
        column, new_column, ..
    } = kind
    else {
        panic!("Expected CHANGE COLUMN");
    };
    assert_eq!(column.value(), "a");
    assert_eq!(new_column.name.value(), "b");
    assert_eq!(new_column.data_type, DataType::Long);
    assert_eq!(new_column.comment.as_deref(), Some("renamed"));
}

#[test]
fn change_column_in_partition_is_unsupported() {
    assert_eq!(
        unsupported_command("ALTER TABLE t PARTITION (ds = '1') CHANGE a a INT"),
        "ALTER TABLE table PARTITION partition_spec CHANGE COLUMN"
    );
}

#[test]
fn set_serde_and_location() {
    assert!(matches!(
        parse_kind("ALTER TABLE t SET SERDE 'org.S' WITH SERDEPROPERTIES ('a' = '1')"),
        StatementKind::SetTableSerDe {
            serde: Some(_),
            partition: None,
            ..
        }
    ));
    assert!(matches!(
        parse_kind("ALTER TABLE t PARTITION (ds = '1') SET SERDEPROPERTIES ('a' = '1')"),
        StatementKind::SetTableSerDe {
            serde: None,
            partition: Some(_),
            ..
        }
    ));
    assert!(matches!(
        parse_kind("ALTER TABLE t PARTITION (ds = '1') SET LOCATION '/new'"),
        StatementKind::SetTableLocation {
            partition: Some(_),
            ..
        }
    ));
}

#[test]
fn alter_view_query() {
    assert!(matches!(
        parse_kind("ALTER VIEW v AS SELECT 1"),
        StatementKind::AlterViewQuery { .. }
    ));
    assert!(matches!(
        parse_kind("ALTER VIEW v SELECT 1"),
        StatementKind::AlterViewQuery { .. }
    ));
}

#[test]
fn alter_view_drop_partition_is_unsupported() {
    assert_eq!(
        unsupported_command("ALTER VIEW v DROP PARTITION (a = 1)"),
        "ALTER VIEW ... DROP PARTITION"
    );
}

#[test]
fn drop_table_and_view() {
    assert!(matches!(
        parse_kind("DROP TABLE IF EXISTS t PURGE"),
        StatementKind::DropTable {
            if_exists: true,
            is_view: false,
            purge: true,
            ..
        }
    ));
    assert!(matches!(
        parse_kind("DROP VIEW v"),
        StatementKind::DropTable {
            is_view: true,
            purge: false,
            ..
        }
    ));
    assert!(parse_err("DROP VIEW v PURGE").position().column > 1);
}

// ===================================================================
// Views
// ===================================================================

#[test]
fn create_view() {
    let kind = parse_kind(
        "CREATE OR REPLACE VIEW v (a COMMENT 'first', b) COMMENT 'view' TBLPROPERTIES ('k' = 'v') AS SELECT 1, 2",
    );
    let StatementKind::CreateView(view) = kind else {
        panic!("Expected CREATE VIEW");
    };
    assert!(view.replace);
    assert!(!view.temporary);
    assert_eq!(view.columns.len(), 2);
    assert_eq!(view.columns[0].comment.as_deref(), Some("first"));
    assert_eq!(view.comment.as_deref(), Some("view"));
    assert_eq!(view.properties.len(), 1);
}

#[test]
fn global_temporary_view() {
    let kind = parse_kind("CREATE GLOBAL TEMPORARY VIEW v AS SELECT 1");
    assert!(matches!(
        kind,
        StatementKind::CreateView(ref v) if v.global && v.temporary
    ));
    assert!(parse_err("CREATE GLOBAL VIEW v AS SELECT 1")
        .to_string()
        .contains("TEMPORARY"));
}

#[test]
fn temporary_view_using() {
    let kind = parse_kind(
        "CREATE OR REPLACE TEMPORARY VIEW v (a INT) USING csv OPTIONS (path '/x', header 'true')",
    );
    let StatementKind::CreateTempViewUsing {
        replace,
        global,
        columns,
        options,
        ..
    } = kind
    else {
        panic!("Expected temporary view using");
    };
    assert!(replace);
    assert!(!global);
    assert_eq!(columns.len(), 1);
    assert_eq!(options.len(), 2);
}

#[test]
fn temporary_view_with_column_names_and_query() {
    let kind = parse_kind("CREATE TEMPORARY VIEW v (a, b) AS SELECT 1, 2");
    assert!(matches!(kind, StatementKind::CreateView(ref v) if v.columns.len() == 2));
}

#[test]
fn partitioned_view_is_unsupported() {
    assert_eq!(
        unsupported_command("CREATE VIEW v PARTITIONED ON (a) AS SELECT 1 AS a"),
        "CREATE VIEW ... PARTITIONED ON"
    );
}

// ===================================================================
// Functions
// ===================================================================

#[test]
fn create_function_with_resources() {
    let kind = parse_kind(
        "CREATE FUNCTION IF NOT EXISTS db.f AS 'com.example.F' USING JAR '/a.jar', FILE '/b.txt', ARCHIVE '/c.zip'",
    );
    let StatementKind::CreateFunction {
        if_not_exists,
        name,
        class_name,
        resources,
        ..
    } = kind
    else {
        panic!("Expected CREATE FUNCTION");
    };
    assert!(if_not_exists);
    assert_eq!(name.to_string(), "db.f");
    assert_eq!(class_name, "com.example.F");
    let types: Vec<_> = resources.iter().map(|r| r.resource_type).collect();
    assert_eq!(
        types,
        vec![
            FunctionResourceType::Jar,
            FunctionResourceType::File,
            FunctionResourceType::Archive
        ]
    );
}

#[test]
fn unknown_function_resource() {
    assert_eq!(
        unsupported_command("CREATE FUNCTION f AS 'C' USING PYFILE '/a.py'"),
        "CREATE FUNCTION with resource type 'pyfile'"
    );
}

#[test]
fn function_modifier_conflicts() {
    assert_eq!(
        syntax_message("CREATE OR REPLACE FUNCTION IF NOT EXISTS f AS 'C'"),
        "CREATE FUNCTION with both IF NOT EXISTS and REPLACE is not allowed."
    );
    assert_eq!(
        syntax_message("CREATE TEMPORARY FUNCTION IF NOT EXISTS f AS 'C'"),
        "It is not allowed to define a TEMPORARY function with IF NOT EXISTS."
    );
}

#[test]
fn drop_function() {
    assert!(matches!(
        parse_kind("DROP TEMPORARY FUNCTION IF EXISTS f"),
        StatementKind::DropFunction {
            temporary: true,
            if_exists: true,
            ..
        }
    ));
    assert_eq!(
        syntax_message("DROP TEMPORARY FUNCTION db.f"),
        "Specifying a database in DROP TEMPORARY FUNCTION is not allowed: 'db'"
    );
}
