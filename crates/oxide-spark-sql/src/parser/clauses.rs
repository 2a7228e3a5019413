//! Clauses shared between queries and DDL: property lists, partition
//! specs, Hive row and file formats.

use super::error::ParseError;
use super::Parser;
use crate::ast::{
    FileFormat, PartitionSpec, PartitionValue, PropertyValue, RowFormat, TableProperty,
};
use crate::lexer::{Keyword, Token, TokenKind};

/// Formats accepted by `STORED AS name`.
pub(super) const HIVE_FILE_FORMATS: &[&str] =
    &["sequencefile", "rcfile", "orc", "parquet", "textfile", "avro"];

impl Parser {
    /// `identifier (. identifier)* | 'string'`
    pub(super) fn parse_property_key(&mut self) -> Result<String, ParseError> {
        if self.check_string() {
            return self.parse_string();
        }
        let mut parts = vec![self.parse_identifier()?.value().to_string()];
        while self.eat(&TokenKind::Dot) {
            parts.push(self.parse_identifier()?.value().to_string());
        }
        Ok(parts.join("."))
    }

    /// `key [=] [value]`
    fn parse_property(&mut self) -> Result<TableProperty, ParseError> {
        let key = self.parse_property_key()?;
        self.eat(&TokenKind::Eq);

        let value = match self.current().kind.clone() {
            TokenKind::IntegerValue(v) => Some(PropertyValue::Integer(v)),
            TokenKind::DecimalValue(v) => Some(PropertyValue::Decimal(v)),
            TokenKind::Keyword(Keyword::True) => Some(PropertyValue::Boolean(true)),
            TokenKind::Keyword(Keyword::False) => Some(PropertyValue::Boolean(false)),
            TokenKind::String(v) => Some(PropertyValue::String(v)),
            _ => None,
        };
        if value.is_some() {
            self.bump();
        }
        Ok(TableProperty { key, value })
    }

    /// `( property (, property)* )` with optional values.
    pub(super) fn parse_property_list(&mut self) -> Result<Vec<TableProperty>, ParseError> {
        self.parse_parenthesized_list(Self::parse_property)
    }

    /// A property list in which every key must carry a value.
    pub(super) fn parse_property_list_with_values(
        &mut self,
    ) -> Result<Vec<TableProperty>, ParseError> {
        let at = self.current().clone();
        let properties = self.parse_property_list()?;
        let missing: Vec<&str> = properties
            .iter()
            .filter(|p| p.value.is_none())
            .map(|p| p.key.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ParseError::unsupported(
                format!("Values must be specified for key(s): [{}]", missing.join(",")),
                &at,
            ));
        }
        Ok(properties)
    }

    /// A property list of bare keys, as used by `UNSET`.
    pub(super) fn parse_property_keys(&mut self) -> Result<Vec<String>, ParseError> {
        let at = self.current().clone();
        let properties = self.parse_property_list()?;
        let valued: Vec<&str> = properties
            .iter()
            .filter(|p| p.value.is_some())
            .map(|p| p.key.as_str())
            .collect();
        if !valued.is_empty() {
            return Err(ParseError::unsupported(
                format!("Values should not be specified for key(s): [{}]", valued.join(",")),
                &at,
            ));
        }
        Ok(properties.into_iter().map(|p| p.key).collect())
    }

    /// `PARTITION ( col [= constant] (, ...)* )`
    pub(super) fn parse_partition_spec(&mut self) -> Result<PartitionSpec, ParseError> {
        self.expect_keyword(Keyword::Partition)?;
        let values = self.parse_parenthesized_list(|p| {
            let column = p.parse_identifier()?;
            let value = if p.eat(&TokenKind::Eq) {
                Some(p.parse_constant()?)
            } else {
                None
            };
            Ok(PartitionValue { column, value })
        })?;
        Ok(PartitionSpec { values })
    }

    pub(super) fn parse_optional_partition_spec(
        &mut self,
    ) -> Result<Option<PartitionSpec>, ParseError> {
        if self.check_keyword(Keyword::Partition) {
            self.parse_partition_spec().map(Some)
        } else {
            Ok(None)
        }
    }

    /// A partition spec in which every column must have a value.
    pub(super) fn parse_non_optional_partition_spec(
        &mut self,
    ) -> Result<PartitionSpec, ParseError> {
        let at = self.current().clone();
        let spec = self.parse_partition_spec()?;
        Self::require_partition_values(spec, &at)
    }

    /// Rejects a partition spec with a column that has no value.
    pub(super) fn require_partition_values(
        spec: PartitionSpec,
        at: &Token,
    ) -> Result<PartitionSpec, ParseError> {
        if let Some(empty) = spec.values.iter().find(|v| v.value.is_none()) {
            return Err(ParseError::unsupported(
                format!("Found an empty partition key '{}'.", empty.column.value()),
                at,
            ));
        }
        Ok(spec)
    }

    pub(super) fn parse_optional_complete_partition_spec(
        &mut self,
    ) -> Result<Option<PartitionSpec>, ParseError> {
        if self.check_keyword(Keyword::Partition) {
            self.parse_non_optional_partition_spec().map(Some)
        } else {
            Ok(None)
        }
    }

    /// `ROW FORMAT SERDE ... | ROW FORMAT DELIMITED ...`
    pub(super) fn parse_optional_row_format(&mut self) -> Result<Option<RowFormat>, ParseError> {
        if !self.eat_keywords(&[Keyword::Row, Keyword::Format]) {
            return Ok(None);
        }

        if self.eat_keyword(Keyword::Serde) {
            let class = self.parse_string()?;
            let properties = if self.eat_keywords(&[Keyword::With, Keyword::Serdeproperties]) {
                self.parse_property_list_with_values()?
            } else {
                Vec::new()
            };
            return Ok(Some(RowFormat::Serde { class, properties }));
        }

        self.expect_keyword(Keyword::Delimited)?;
        let mut fields_terminated_by = None;
        let mut escaped_by = None;
        if self.eat_keywords(&[Keyword::Fields, Keyword::Terminated, Keyword::By]) {
            fields_terminated_by = Some(self.parse_string()?);
            if self.eat_keywords(&[Keyword::Escaped, Keyword::By]) {
                escaped_by = Some(self.parse_string()?);
            }
        }
        let collection_items_terminated_by = if self.eat_keywords(&[
            Keyword::Collection,
            Keyword::Items,
            Keyword::Terminated,
            Keyword::By,
        ]) {
            Some(self.parse_string()?)
        } else {
            None
        };
        let map_keys_terminated_by =
            if self.eat_keywords(&[Keyword::Map, Keyword::Keys, Keyword::Terminated, Keyword::By])
            {
                Some(self.parse_string()?)
            } else {
                None
            };
        let lines_terminated_by =
            if self.eat_keywords(&[Keyword::Lines, Keyword::Terminated, Keyword::By]) {
                let at = self.current().clone();
                let value = self.parse_string()?;
                if value != "\n" {
                    return Err(self.syntax_error_at(
                        format!("LINES TERMINATED BY only supports newline '\\n' right now: {value}"),
                        &at,
                    ));
                }
                Some(value)
            } else {
                None
            };
        let null_defined_as =
            if self.eat_keywords(&[Keyword::Null, Keyword::Defined, Keyword::As]) {
                Some(self.parse_string()?)
            } else {
                None
            };

        Ok(Some(RowFormat::Delimited {
            fields_terminated_by,
            escaped_by,
            collection_items_terminated_by,
            map_keys_terminated_by,
            lines_terminated_by,
            null_defined_as,
        }))
    }

    /// `STORED AS name | STORED AS INPUTFORMAT 'a' OUTPUTFORMAT 'b'`
    pub(super) fn parse_optional_file_format(&mut self) -> Result<Option<FileFormat>, ParseError> {
        if !self.check_keyword(Keyword::Stored) {
            return Ok(None);
        }
        let stored = self.bump();
        if self.check_keyword(Keyword::By) {
            return Err(ParseError::unsupported("STORED BY", &stored));
        }
        self.expect_keyword(Keyword::As)?;
        if self.eat_keyword(Keyword::Inputformat) {
            let input = self.parse_string()?;
            self.expect_keyword(Keyword::Outputformat)?;
            let output = self.parse_string()?;
            return Ok(Some(FileFormat::InputOutput { input, output }));
        }
        let at = self.current().clone();
        let name = self.parse_identifier()?;
        if !HIVE_FILE_FORMATS.contains(&name.value().to_ascii_lowercase().as_str()) {
            return Err(ParseError::unsupported(
                format!("STORED AS with file format '{}'", name.value()),
                &at,
            ));
        }
        Ok(Some(FileFormat::Named(name)))
    }
}
