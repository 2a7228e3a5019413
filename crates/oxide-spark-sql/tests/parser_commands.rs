//! Tests for catalog, cache, maintenance and session statements.

mod common;

use common::*;
use oxide_spark_sql::ast::{
    AnalyzeMode, DescribeFunctionName, DescribeOption, ExplainMode, FunctionPattern,
    FunctionScope, Literal, PropertyValue, ResourceOp, ResourceType, SetCommand, StatementKind,
};
use oxide_spark_sql::ParseError;

#[test]
fn use_database() {
    let StatementKind::Use { database } = parse_kind("USE analytics") else {
        panic!("Expected USE");
    };
    assert_eq!(database.value(), "analytics");
}

#[test]
fn analyze_modes() {
    let StatementKind::Analyze {
        table,
        partition,
        mode,
    } = parse_kind("ANALYZE TABLE db.t COMPUTE STATISTICS")
    else {
        panic!("Expected ANALYZE");
    };
    assert_eq!(table.to_string(), "db.t");
    assert!(partition.is_none());
    assert_eq!(mode, AnalyzeMode::Full);

    let StatementKind::Analyze { mode, .. } = parse_kind("ANALYZE TABLE t COMPUTE STATISTICS noscan")
    else {
        panic!("Expected ANALYZE");
    };
    assert_eq!(mode, AnalyzeMode::NoScan);

    let StatementKind::Analyze {
        partition, mode, ..
    } = parse_kind("ANALYZE TABLE t PARTITION (ds='2020', hr) COMPUTE STATISTICS FOR COLUMNS a, b")
    else {
        panic!("Expected ANALYZE");
    };
    let partition = partition.expect("partition");
    assert_eq!(partition.values.len(), 2);
    assert!(partition.values[1].value.is_none());
    let AnalyzeMode::Columns(columns) = mode else {
        panic!("Expected column statistics");
    };
    assert_eq!(columns.len(), 2);
}

#[test]
fn analyze_rejects_unknown_option() {
    assert_eq!(
        syntax_message("ANALYZE TABLE t COMPUTE STATISTICS fast"),
        "Expected `NOSCAN` instead of `fast`"
    );
}

#[test]
fn explain_modes() {
    for (sql, expected) in [
        ("EXPLAIN SELECT 1", ExplainMode::Simple),
        ("EXPLAIN EXTENDED SELECT 1", ExplainMode::Extended),
        ("EXPLAIN CODEGEN SELECT 1", ExplainMode::Codegen),
        ("EXPLAIN COST SELECT 1", ExplainMode::Cost),
    ] {
        let StatementKind::Explain { mode, statement } = parse_kind(sql) else {
            panic!("Expected EXPLAIN for {sql}");
        };
        assert_eq!(mode, expected, "{sql}");
        assert!(statement.as_query().is_some());
    }
}

#[test]
fn explain_wraps_any_statement() {
    let StatementKind::Explain { statement, .. } = parse_kind("EXPLAIN SHOW TABLES") else {
        panic!("Expected EXPLAIN");
    };
    assert!(matches!(statement.kind, StatementKind::ShowTables { .. }));
}

#[test]
fn show_tables() {
    assert_eq!(
        parse_kind("SHOW TABLES"),
        StatementKind::ShowTables {
            database: None,
            pattern: None
        }
    );

    let StatementKind::ShowTables { database, pattern } =
        parse_kind("SHOW TABLES IN sales LIKE 'order*'")
    else {
        panic!("Expected SHOW TABLES");
    };
    assert_eq!(database.expect("database").value(), "sales");
    assert_eq!(pattern.as_deref(), Some("order*"));

    let StatementKind::ShowTables { database, pattern } = parse_kind("SHOW TABLES 'tmp_*'") else {
        panic!("Expected SHOW TABLES");
    };
    assert!(database.is_none());
    assert_eq!(pattern.as_deref(), Some("tmp_*"));
}

#[test]
fn show_table_extended() {
    let StatementKind::ShowTableExtended {
        database,
        pattern,
        partition,
    } = parse_kind("SHOW TABLE EXTENDED FROM db LIKE 'events' PARTITION (ds='2021-01-01')")
    else {
        panic!("Expected SHOW TABLE EXTENDED");
    };
    assert_eq!(database.expect("database").value(), "db");
    assert_eq!(pattern, "events");
    let partition = partition.expect("partition");
    assert_eq!(
        partition.values[0].value,
        Some(Literal::String(String::from("2021-01-01")))
    );
}

#[test]
fn show_table_extended_requires_like() {
    assert!(parse_statement_fails("SHOW TABLE EXTENDED 'events'"));
}

#[test]
fn show_databases() {
    assert_eq!(
        parse_kind("SHOW DATABASES LIKE 'prod_*'"),
        StatementKind::ShowDatabases {
            pattern: Some(String::from("prod_*"))
        }
    );
    assert_eq!(
        parse_kind("SHOW DATABASES"),
        StatementKind::ShowDatabases { pattern: None }
    );
}

#[test]
fn show_tblproperties() {
    let StatementKind::ShowTblProperties { table, key } =
        parse_kind("SHOW TBLPROPERTIES t (orc.compress)")
    else {
        panic!("Expected SHOW TBLPROPERTIES");
    };
    assert_eq!(table.table.value(), "t");
    assert_eq!(key.as_deref(), Some("orc.compress"));

    let StatementKind::ShowTblProperties { key, .. } =
        parse_kind("SHOW TBLPROPERTIES t ('comment')")
    else {
        panic!("Expected SHOW TBLPROPERTIES");
    };
    assert_eq!(key.as_deref(), Some("comment"));
}

#[test]
fn show_columns() {
    let StatementKind::ShowColumns { table, database } =
        parse_kind("SHOW COLUMNS IN t FROM sales")
    else {
        panic!("Expected SHOW COLUMNS");
    };
    assert_eq!(table.table.value(), "t");
    assert_eq!(database.expect("database").value(), "sales");

    assert!(matches!(
        parse_kind("SHOW COLUMNS FROM sales.t IN SALES"),
        StatementKind::ShowColumns { .. }
    ));
}

#[test]
fn show_columns_with_conflicting_databases() {
    assert_eq!(
        syntax_message("SHOW COLUMNS FROM db1.t IN db2"),
        "SHOW COLUMNS with conflicting databases: 'db2' != 'db1'"
    );
}

#[test]
fn show_partitions_and_create_table() {
    let StatementKind::ShowPartitions { table, partition } =
        parse_kind("SHOW PARTITIONS db.t PARTITION (ds='1')")
    else {
        panic!("Expected SHOW PARTITIONS");
    };
    assert_eq!(table.to_string(), "db.t");
    assert!(partition.is_some());

    let StatementKind::ShowCreateTable { table } = parse_kind("SHOW CREATE TABLE t") else {
        panic!("Expected SHOW CREATE TABLE");
    };
    assert_eq!(table.table.value(), "t");
}

#[test]
fn show_functions() {
    assert_eq!(
        parse_kind("SHOW FUNCTIONS"),
        StatementKind::ShowFunctions {
            scope: None,
            pattern: None
        }
    );

    let StatementKind::ShowFunctions { scope, pattern } =
        parse_kind("SHOW USER FUNCTIONS LIKE 'my_*'")
    else {
        panic!("Expected SHOW FUNCTIONS");
    };
    assert_eq!(scope, Some(FunctionScope::User));
    assert_eq!(pattern, Some(FunctionPattern::String(String::from("my_*"))));

    let StatementKind::ShowFunctions { scope, pattern } =
        parse_kind("SHOW system FUNCTIONS db.f")
    else {
        panic!("Expected SHOW FUNCTIONS");
    };
    assert_eq!(scope, Some(FunctionScope::System));
    let Some(FunctionPattern::Name(name)) = pattern else {
        panic!("Expected a name pattern");
    };
    assert_eq!(name.parts.len(), 2);

    assert!(matches!(
        parse_kind("SHOW ALL FUNCTIONS"),
        StatementKind::ShowFunctions {
            scope: Some(FunctionScope::All),
            ..
        }
    ));
}

#[test]
fn show_functions_with_unknown_scope() {
    assert_eq!(
        syntax_message("SHOW builtin FUNCTIONS"),
        "SHOW builtin FUNCTIONS not supported"
    );
}

#[test]
fn describe_function() {
    let StatementKind::DescribeFunction { extended, function } =
        parse_kind("DESCRIBE FUNCTION EXTENDED db.f")
    else {
        panic!("Expected DESCRIBE FUNCTION");
    };
    assert!(extended);
    let DescribeFunctionName::Qualified(name) = function else {
        panic!("Expected a qualified name");
    };
    assert_eq!(name.parts.len(), 2);

    assert_eq!(
        parse_kind("DESC FUNCTION 'upper'"),
        StatementKind::DescribeFunction {
            extended: false,
            function: DescribeFunctionName::String(String::from("upper")),
        }
    );
    assert_eq!(
        parse_kind("DESC FUNCTION +"),
        StatementKind::DescribeFunction {
            extended: false,
            function: DescribeFunctionName::Operator(String::from("+")),
        }
    );
}

#[test]
fn describe_function_named_extended() {
    let StatementKind::DescribeFunction { extended, function } =
        parse_kind("DESC FUNCTION extended")
    else {
        panic!("Expected DESCRIBE FUNCTION");
    };
    assert!(!extended);
    let DescribeFunctionName::Qualified(name) = function else {
        panic!("Expected a qualified name");
    };
    assert_eq!(name.parts[0].value(), "extended");
}

#[test]
fn describe_database() {
    let StatementKind::DescribeDatabase { extended, database } =
        parse_kind("DESC DATABASE EXTENDED sales")
    else {
        panic!("Expected DESCRIBE DATABASE");
    };
    assert!(extended);
    assert_eq!(database.value(), "sales");

    let StatementKind::DescribeDatabase { extended, .. } = parse_kind("DESCRIBE DATABASE sales")
    else {
        panic!("Expected DESCRIBE DATABASE");
    };
    assert!(!extended);
}

#[test]
fn describe_table() {
    let StatementKind::DescribeTable {
        option,
        table,
        partition,
        column,
    } = parse_kind("DESCRIBE t")
    else {
        panic!("Expected DESCRIBE TABLE");
    };
    assert!(option.is_none());
    assert_eq!(table.table.value(), "t");
    assert!(partition.is_none());
    assert!(column.is_none());

    let StatementKind::DescribeTable { option, column, .. } =
        parse_kind("DESC TABLE EXTENDED db.t col.field")
    else {
        panic!("Expected DESCRIBE TABLE");
    };
    assert_eq!(option, Some(DescribeOption::Extended));
    assert_eq!(column.expect("column").parts.len(), 2);

    let StatementKind::DescribeTable {
        option, partition, ..
    } = parse_kind("DESC FORMATTED t PARTITION (ds='1')")
    else {
        panic!("Expected DESCRIBE TABLE");
    };
    assert_eq!(option, Some(DescribeOption::Formatted));
    assert!(partition.is_some());
}

#[test]
fn describe_table_named_like_keywords() {
    let StatementKind::DescribeTable { option, table, .. } = parse_kind("DESC extended") else {
        panic!("Expected DESCRIBE TABLE");
    };
    assert!(option.is_none());
    assert_eq!(table.table.value(), "extended");
}

#[test]
fn describe_table_partition_errors() {
    assert_eq!(
        syntax_message("DESC t PARTITION (ds)"),
        "PARTITION specification is incomplete: `ds`"
    );
    assert_eq!(
        syntax_message("DESC t PARTITION (ds='1') col"),
        "DESC TABLE COLUMN for a specific partition is not supported"
    );
}

#[test]
fn refresh() {
    let StatementKind::RefreshTable { table } = parse_kind("REFRESH TABLE db.t") else {
        panic!("Expected REFRESH TABLE");
    };
    assert_eq!(table.to_string(), "db.t");

    assert_eq!(
        parse_kind("REFRESH '/data/events dir'"),
        StatementKind::RefreshResource {
            path: String::from("/data/events dir")
        }
    );
    assert_eq!(
        parse_kind("REFRESH /data/events"),
        StatementKind::RefreshResource {
            path: String::from("/data/events")
        }
    );
}

#[test]
fn refresh_path_errors() {
    assert_eq!(
        syntax_message("REFRESH"),
        "Resource paths cannot be empty in REFRESH statements. Use / to match everything"
    );
    assert!(syntax_message("REFRESH /data events").starts_with("REFRESH statements cannot contain"));
}

#[test]
fn cache_table() {
    let StatementKind::CacheTable {
        lazy,
        table,
        options,
        query,
    } = parse_kind("CACHE LAZY TABLE t OPTIONS ('storageLevel' 'DISK_ONLY') SELECT * FROM src")
    else {
        panic!("Expected CACHE TABLE");
    };
    assert!(lazy);
    assert_eq!(table.table.value(), "t");
    assert_eq!(options.len(), 1);
    assert_eq!(options[0].key, "storageLevel");
    assert_eq!(
        options[0].value,
        Some(PropertyValue::String(String::from("DISK_ONLY")))
    );
    assert!(query.is_some());

    let StatementKind::CacheTable { lazy, query, .. } = parse_kind("CACHE TABLE db.t") else {
        panic!("Expected CACHE TABLE");
    };
    assert!(!lazy);
    assert!(query.is_none());
}

#[test]
fn cache_table_as_select_rejects_database() {
    assert_eq!(
        syntax_message("CACHE TABLE db.t AS SELECT 1"),
        "It is not allowed to add database prefix `db` to the table name in CACHE TABLE AS SELECT"
    );
}

#[test]
fn uncache_and_clear_cache() {
    let StatementKind::UncacheTable { if_exists, table } =
        parse_kind("UNCACHE TABLE IF EXISTS t")
    else {
        panic!("Expected UNCACHE TABLE");
    };
    assert!(if_exists);
    assert_eq!(table.table.value(), "t");
    assert_eq!(parse_kind("CLEAR CACHE"), StatementKind::ClearCache);
}

#[test]
fn load_data() {
    let StatementKind::LoadData {
        local,
        path,
        overwrite,
        table,
        partition,
    } = parse_kind("LOAD DATA LOCAL INPATH '/tmp/data.csv' OVERWRITE INTO TABLE t PARTITION (ds='1')")
    else {
        panic!("Expected LOAD DATA");
    };
    assert!(local);
    assert_eq!(path, "/tmp/data.csv");
    assert!(overwrite);
    assert_eq!(table.table.value(), "t");
    assert!(partition.is_some());

    let StatementKind::LoadData {
        local, overwrite, ..
    } = parse_kind("LOAD DATA INPATH 'hdfs://x' INTO TABLE t")
    else {
        panic!("Expected LOAD DATA");
    };
    assert!(!local);
    assert!(!overwrite);
}

#[test]
fn truncate_and_repair() {
    let StatementKind::TruncateTable { table, partition } =
        parse_kind("TRUNCATE TABLE t PARTITION (ds='1')")
    else {
        panic!("Expected TRUNCATE TABLE");
    };
    assert_eq!(table.table.value(), "t");
    assert!(partition.is_some());

    let StatementKind::RepairTable { table } = parse_kind("MSCK REPAIR TABLE db.t") else {
        panic!("Expected MSCK REPAIR TABLE");
    };
    assert_eq!(table.to_string(), "db.t");
}

#[test]
fn add_and_list_resources() {
    assert_eq!(
        parse_kind("ADD JAR /tmp/udf.jar"),
        StatementKind::ManageResource {
            op: ResourceOp::Add,
            resource_type: ResourceType::Jar,
            paths: vec![String::from("/tmp/udf.jar")],
        }
    );
    assert_eq!(
        parse_kind("LIST FILES"),
        StatementKind::ManageResource {
            op: ResourceOp::List,
            resource_type: ResourceType::File,
            paths: Vec::new(),
        }
    );
    let StatementKind::ManageResource { paths, .. } = parse_kind("LIST JARS /a /b") else {
        panic!("Expected LIST");
    };
    assert_eq!(paths, vec![String::from("/a"), String::from("/b")]);
}

#[test]
fn add_and_list_unknown_resource_types() {
    assert_eq!(
        unsupported_command("ADD ARCHIVE /tmp/a"),
        "ADD with resource type 'archive'"
    );
    assert_eq!(
        unsupported_command("LIST ARCHIVES"),
        "LIST with resource type 'archives'"
    );
}

#[test]
fn set_configuration() {
    assert_eq!(
        parse_kind("SET"),
        StatementKind::SetConfiguration(SetCommand::ListAll)
    );
    assert_eq!(
        parse_kind("SET -v"),
        StatementKind::SetConfiguration(SetCommand::ListAllVerbose)
    );
    assert_eq!(
        parse_kind("SET spark.sql.shuffle.partitions"),
        StatementKind::SetConfiguration(SetCommand::Get(String::from(
            "spark.sql.shuffle.partitions"
        )))
    );
    assert_eq!(
        parse_kind("SET spark.sql.shuffle.partitions = 200"),
        StatementKind::SetConfiguration(SetCommand::Set {
            key: String::from("spark.sql.shuffle.partitions"),
            value: String::from("200"),
        })
    );
}

#[test]
fn lexer_errors_in_raw_commands_are_reported() {
    let err = parse_err("SET spark.app.name = 'open");
    let ParseError::InvalidToken { message, position } = err else {
        panic!("Expected invalid token, got {err:?}");
    };
    assert_eq!(message, "Unterminated string literal");
    assert_eq!(position.column, 22);

    let err = parse_err("ADD JAR /tmp/#udf.jar");
    let ParseError::InvalidToken { position, .. } = err else {
        panic!("Expected invalid token, got {err:?}");
    };
    assert_eq!(position.column, 14);
}

#[test]
fn set_configuration_requires_key() {
    assert!(syntax_message("SET = 1").starts_with("Expected format is 'SET', 'SET key'"));
}

#[test]
fn reset_configuration() {
    assert_eq!(parse_kind("RESET"), StatementKind::ResetConfiguration);
}

fn parse_statement_fails(sql: &str) -> bool {
    oxide_spark_sql::parse_statement(sql).is_err()
}
