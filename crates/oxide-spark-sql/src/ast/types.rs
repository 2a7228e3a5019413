//! Spark SQL data type definitions.

use core::fmt;

use serde::Serialize;

use super::Ident;

/// Spark SQL data types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// `BOOLEAN`
    Boolean,
    /// `TINYINT` / `BYTE`
    Byte,
    /// `SMALLINT` / `SHORT`
    Short,
    /// `INT` / `INTEGER`
    Int,
    /// `BIGINT` / `LONG`
    Long,
    /// `FLOAT`
    Float,
    /// `DOUBLE`
    Double,
    /// `DATE`
    Date,
    /// `TIMESTAMP`
    Timestamp,
    /// `STRING`
    String,
    /// `BINARY`
    Binary,
    /// `DECIMAL[(precision[, scale])]`
    Decimal {
        /// Total number of digits.
        precision: Option<u32>,
        /// Number of digits after decimal point.
        scale: Option<u32>,
    },
    /// `CHAR(n)`
    Char(u32),
    /// `VARCHAR(n)`
    Varchar(u32),
    /// `ARRAY<element>`
    Array(Box<DataType>),
    /// `MAP<key, value>`
    Map(Box<DataType>, Box<DataType>),
    /// `STRUCT<name: type, ...>`
    Struct(Vec<StructField>),
}

impl DataType {
    /// Resolves a primitive type name and its integer parameters.
    ///
    /// Returns `None` for names (or parameter counts) the dialect does not
    /// support.
    #[must_use]
    pub fn primitive(name: &str, params: &[u32]) -> Option<Self> {
        let ty = match (name.to_ascii_lowercase().as_str(), params) {
            ("boolean", []) => Self::Boolean,
            ("tinyint" | "byte", []) => Self::Byte,
            ("smallint" | "short", []) => Self::Short,
            ("int" | "integer", []) => Self::Int,
            ("bigint" | "long", []) => Self::Long,
            ("float", []) => Self::Float,
            ("double", []) => Self::Double,
            ("date", []) => Self::Date,
            ("timestamp", []) => Self::Timestamp,
            ("string", []) => Self::String,
            ("binary", []) => Self::Binary,
            ("char", [n]) => Self::Char(*n),
            ("varchar", [n]) => Self::Varchar(*n),
            ("decimal", []) => Self::Decimal {
                precision: None,
                scale: None,
            },
            ("decimal", [p]) => Self::Decimal {
                precision: Some(*p),
                scale: None,
            },
            ("decimal", [p, s]) => Self::Decimal {
                precision: Some(*p),
                scale: Some(*s),
            },
            _ => return None,
        };
        Some(ty)
    }

    /// Returns true if `name` starts a primitive type the dialect knows.
    #[must_use]
    pub fn is_primitive_name(name: &str) -> bool {
        matches!(
            name.to_ascii_lowercase().as_str(),
            "boolean"
                | "tinyint"
                | "byte"
                | "smallint"
                | "short"
                | "int"
                | "integer"
                | "bigint"
                | "long"
                | "float"
                | "double"
                | "date"
                | "timestamp"
                | "string"
                | "binary"
                | "char"
                | "varchar"
                | "decimal"
        )
    }

    /// Returns the SQL representation of the data type.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Boolean => String::from("BOOLEAN"),
            Self::Byte => String::from("TINYINT"),
            Self::Short => String::from("SMALLINT"),
            Self::Int => String::from("INT"),
            Self::Long => String::from("BIGINT"),
            Self::Float => String::from("FLOAT"),
            Self::Double => String::from("DOUBLE"),
            Self::Date => String::from("DATE"),
            Self::Timestamp => String::from("TIMESTAMP"),
            Self::String => String::from("STRING"),
            Self::Binary => String::from("BINARY"),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => format!("DECIMAL({p},{s})"),
                (Some(p), None) => format!("DECIMAL({p})"),
                _ => String::from("DECIMAL"),
            },
            Self::Char(n) => format!("CHAR({n})"),
            Self::Varchar(n) => format!("VARCHAR({n})"),
            Self::Array(element) => format!("ARRAY<{}>", element.to_sql()),
            Self::Map(key, value) => format!("MAP<{},{}>", key.to_sql(), value.to_sql()),
            Self::Struct(fields) => {
                let fields: Vec<String> = fields
                    .iter()
                    .map(|f| format!("{}:{}", f.name, f.data_type.to_sql()))
                    .collect();
                format!("STRUCT<{}>", fields.join(","))
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// A field of a `STRUCT` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructField {
    /// Field name.
    pub name: Ident,
    /// Field type.
    pub data_type: DataType,
    /// Optional `COMMENT`.
    pub comment: Option<String>,
}

/// A column definition: `name type [COMMENT 'text']`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    /// Column name.
    pub name: Ident,
    /// Data type.
    pub data_type: DataType,
    /// Optional `COMMENT`.
    pub comment: Option<String>,
}
