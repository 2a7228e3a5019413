//! Data type and column list parsing.

use super::error::ParseError;
use super::Parser;
use crate::ast::{ColumnDef, DataType, StructField};
use crate::lexer::{Keyword, TokenKind};

impl Parser {
    /// `ARRAY<t>`, `MAP<k, v>`, `STRUCT<name: t, ...>` or a primitive type
    /// with optional integer parameters.
    pub(super) fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        self.nested(Self::parse_data_type_inner)
    }

    fn parse_data_type_inner(&mut self) -> Result<DataType, ParseError> {
        let complex = match self.peek_keyword(0) {
            Some(kw @ (Keyword::Array | Keyword::Map | Keyword::Struct))
                if self.peek(1).kind == TokenKind::Lt =>
            {
                Some(kw)
            }
            Some(Keyword::Struct) if self.peek(1).kind == TokenKind::NotEq => Some(Keyword::Struct),
            _ => None,
        };

        match complex {
            Some(Keyword::Array) => {
                self.bump();
                self.expect(&TokenKind::Lt)?;
                let element = self.parse_data_type()?;
                self.expect(&TokenKind::Gt)?;
                Ok(DataType::Array(Box::new(element)))
            }
            Some(Keyword::Map) => {
                self.bump();
                self.expect(&TokenKind::Lt)?;
                let key = self.parse_data_type()?;
                self.expect(&TokenKind::Comma)?;
                let value = self.parse_data_type()?;
                self.expect(&TokenKind::Gt)?;
                Ok(DataType::Map(Box::new(key), Box::new(value)))
            }
            Some(_) => {
                self.bump();
                // `STRUCT<>` lexes as STRUCT followed by `<>`.
                if self.eat(&TokenKind::NotEq) {
                    return Ok(DataType::Struct(Vec::new()));
                }
                self.expect(&TokenKind::Lt)?;
                let fields = if self.check(&TokenKind::Gt) {
                    Vec::new()
                } else {
                    self.parse_comma_separated(Self::parse_struct_field)?
                };
                self.expect(&TokenKind::Gt)?;
                Ok(DataType::Struct(fields))
            }
            None => self.parse_primitive_type(),
        }
    }

    fn parse_primitive_type(&mut self) -> Result<DataType, ParseError> {
        self.expecting("data type");
        let at = self.current().clone();
        let name = self.parse_identifier()?;
        let params = if self.eat(&TokenKind::LeftParen) {
            let params = self.parse_comma_separated(Self::parse_u32)?;
            self.expect(&TokenKind::RightParen)?;
            params
        } else {
            Vec::new()
        };

        DataType::primitive(name.value(), &params).ok_or_else(|| {
            let lowered = name.value().to_ascii_lowercase();
            let rendered = if params.is_empty() {
                lowered
            } else {
                let joined: Vec<String> = params.iter().map(u32::to_string).collect();
                format!("{lowered}({})", joined.join(","))
            };
            self.syntax_error_at(format!("DataType {rendered} is not supported."), &at)
        })
    }

    /// `name [:] type [COMMENT 'text']`
    fn parse_struct_field(&mut self) -> Result<StructField, ParseError> {
        let name = self.parse_identifier()?;
        self.eat(&TokenKind::Colon);
        let data_type = self.parse_data_type()?;
        let comment = if self.eat_keyword(Keyword::Comment) {
            Some(self.parse_string()?)
        } else {
            None
        };
        Ok(StructField {
            name,
            data_type,
            comment,
        })
    }

    /// `name type [COMMENT 'text']`
    pub(super) fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.parse_identifier()?;
        let data_type = self.parse_data_type()?;
        let comment = if self.eat_keyword(Keyword::Comment) {
            Some(self.parse_string()?)
        } else {
            None
        };
        Ok(ColumnDef {
            name,
            data_type,
            comment,
        })
    }

    /// `column (, column)*`
    pub(super) fn parse_column_list(&mut self) -> Result<Vec<ColumnDef>, ParseError> {
        self.parse_comma_separated(Self::parse_column_def)
    }

    /// `( column (, column)* )`
    pub(super) fn parse_parenthesized_columns(&mut self) -> Result<Vec<ColumnDef>, ParseError> {
        self.parse_parenthesized_list(Self::parse_column_def)
    }
}
