//! Query parsing: CTEs, set operations, specifications, relations and
//! query organization.

use super::error::ParseError;
use super::pratt::token_to_set_operator;
use super::Parser;
use crate::ast::{
    Aggregation, DataType, FromClause, GroupByModifier, Hint, InlineTable, InsertInto, Join,
    JoinCriteria, JoinType, LateralView, MultiInsertBody, NamedQuery, NamedWindow, Pivot, Query,
    QueryBody, QueryOrganization, QueryPrimary, QuerySpecification, QueryTerm, Relation,
    RelationPrimary, RowLimit, Sample, BucketOn, SelectSpec, TableAlias, TransformKind,
    TransformOutput, TransformSpec, Expr,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser {
    /// `[WITH cte (, cte)*] queryNoWith`
    pub(super) fn parse_query(&mut self) -> Result<Query, ParseError> {
        self.nested(|p| {
            let start = p.checkpoint();
            let ctes = if p.check_keyword(Keyword::With) {
                p.parse_ctes()?
            } else {
                Vec::new()
            };
            let body = p.parse_query_body()?;
            Ok(Query {
                ctes,
                body,
                span: p.span_since(start),
            })
        })
    }

    fn parse_ctes(&mut self) -> Result<Vec<NamedQuery>, ParseError> {
        let with = self.expect_keyword(Keyword::With)?;
        let ctes = self.parse_comma_separated(|p| {
            let name = p.parse_identifier()?;
            p.eat_keyword(Keyword::As);
            p.expect(&TokenKind::LeftParen)?;
            let query = p.parse_query()?;
            p.expect(&TokenKind::RightParen)?;
            Ok(NamedQuery { name, query })
        })?;

        let mut duplicates: Vec<&str> = Vec::new();
        for (i, cte) in ctes.iter().enumerate() {
            let name = cte.name.value();
            if ctes[..i].iter().any(|c| c.name.value() == name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        if !duplicates.is_empty() {
            return Err(self.syntax_error_at(
                format!(
                    "CTE definition can't have duplicate names: '{}'.",
                    duplicates.join("', '")
                ),
                &with,
            ));
        }
        Ok(ctes)
    }

    /// Single-insert or multi-insert query body.
    ///
    /// A body starting with `FROM` is ambiguous between a from-first
    /// specification and a multi-insert query. The single form is tried
    /// first; if it stops in front of another insert body, the multi-insert
    /// form is parsed from the same start. When both fail, the error that
    /// got further wins.
    fn parse_query_body(&mut self) -> Result<QueryBody, ParseError> {
        if !self.check_keyword(Keyword::From) {
            return self.parse_single_insert_body();
        }

        let start = self.checkpoint();
        let single = self.parse_single_insert_body();
        let continues = matches!(
            self.peek_keyword(0),
            Some(Keyword::Insert | Keyword::Select | Keyword::Map | Keyword::Reduce)
        );
        let single_err = match single {
            Ok(body) if !continues => return Ok(body),
            Err(err) if err.is_fatal() => return Err(err),
            Ok(_) => None,
            Err(err) => Some(err),
        };

        self.rollback(start);
        match self.parse_multi_insert_body() {
            Ok(body) => Ok(body),
            Err(multi_err) => match single_err {
                Some(single_err)
                    if !multi_err.is_fatal()
                        && single_err.position().span.start > multi_err.position().span.start =>
                {
                    Err(single_err)
                }
                _ => Err(multi_err),
            },
        }
    }

    fn parse_single_insert_body(&mut self) -> Result<QueryBody, ParseError> {
        let insert = if self.check_keyword(Keyword::Insert) {
            Some(self.parse_insert_into()?)
        } else {
            None
        };
        let term = self.parse_query_term(0)?;
        let organization = self.parse_query_organization()?;
        Ok(QueryBody::Single {
            insert,
            term,
            organization,
        })
    }

    fn parse_multi_insert_body(&mut self) -> Result<QueryBody, ParseError> {
        let from = self.parse_from_clause()?;
        let mut bodies = Vec::new();
        loop {
            let insert = if self.check_keyword(Keyword::Insert) {
                Some(self.parse_insert_into()?)
            } else {
                None
            };
            let specification = self.parse_query_specification()?;
            let organization = self.parse_query_organization()?;
            bodies.push(MultiInsertBody {
                insert,
                specification,
                organization,
            });
            if !matches!(
                self.peek_keyword(0),
                Some(Keyword::Insert | Keyword::Select | Keyword::Map | Keyword::Reduce)
            ) {
                break;
            }
        }
        Ok(QueryBody::MultiInsert { from, bodies })
    }

    /// `INSERT INTO|OVERWRITE ...`
    pub(super) fn parse_insert_into(&mut self) -> Result<InsertInto, ParseError> {
        self.expect_keyword(Keyword::Insert)?;

        if self.eat_keyword(Keyword::Into) {
            self.eat_keyword(Keyword::Table);
            let table = self.parse_table_identifier()?;
            let partition = self.parse_optional_partition_spec()?;
            return Ok(InsertInto::Table {
                overwrite: false,
                table,
                partition,
                if_not_exists: false,
            });
        }

        self.expect_keyword(Keyword::Overwrite)?;
        if self.eat_keyword(Keyword::Table) {
            let table = self.parse_table_identifier()?;
            let partition = self.parse_optional_partition_spec()?;
            let mut if_not_exists = false;
            if let Some(spec) = &partition {
                let at = self.current().clone();
                if self.eat_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]) {
                    if_not_exists = true;
                    let dynamic: Vec<&str> = spec
                        .values
                        .iter()
                        .filter(|v| v.value.is_none())
                        .map(|v| v.column.value())
                        .collect();
                    if !dynamic.is_empty() {
                        return Err(self.syntax_error_at(
                            format!(
                                "Dynamic partitions do not support IF NOT EXISTS. Specified partitions with value: [{}]",
                                dynamic.join(",")
                            ),
                            &at,
                        ));
                    }
                }
            }
            return Ok(InsertInto::Table {
                overwrite: true,
                table,
                partition,
                if_not_exists,
            });
        }

        let local_token = self.current().clone();
        let local = self.eat_keyword(Keyword::Local);
        self.expect_keyword(Keyword::Directory)?;
        let path = self.parse_optional_string()?;

        if self.check_keyword(Keyword::Using) {
            if local {
                return Err(self.syntax_error_at(
                    "LOCAL is not supported in INSERT OVERWRITE DIRECTORY to data source",
                    &local_token,
                ));
            }
            let using = self.bump();
            let provider = self.parse_qualified_name()?;
            let options = if self.eat_keyword(Keyword::Options) {
                self.parse_property_list_with_values()?
            } else {
                Vec::new()
            };
            if path.is_some() && options.iter().any(|o| o.key.eq_ignore_ascii_case("path")) {
                return Err(self.syntax_error_at(
                    "Directory path and 'path' in OPTIONS should be specified one, but not both",
                    &using,
                ));
            }
            return Ok(InsertInto::Directory {
                path,
                provider,
                options,
            });
        }

        let Some(path) = path else {
            return Err(self.error_here());
        };
        let row_format = self.parse_optional_row_format()?;
        let file_format = self.parse_optional_file_format()?;
        Ok(InsertInto::HiveDirectory {
            local,
            path,
            row_format,
            file_format,
        })
    }

    /// Precedence-climbing loop over set operators.
    ///
    /// Every operator at or above `min_prec` extends the chain to the left;
    /// the right operand only absorbs operators that bind strictly tighter.
    fn parse_query_term(&mut self, min_prec: u8) -> Result<QueryTerm, ParseError> {
        let mut left = self.parse_query_primary()?;
        let legacy = self.config().legacy_setops_precedence;

        loop {
            let Some(op) = token_to_set_operator(&self.current().kind) else {
                break;
            };
            let prec = op.precedence(legacy);
            if prec < min_prec {
                break;
            }
            self.bump();
            let quantifier = self.parse_set_quantifier();
            let right = self.parse_query_term(prec + 1)?;
            left = QueryTerm::SetOperation {
                op,
                quantifier,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_query_primary(&mut self) -> Result<QueryTerm, ParseError> {
        let primary = if self.check(&TokenKind::LeftParen) {
            self.bump();
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            QueryPrimary::Subquery(Box::new(query))
        } else if self.check_keyword(Keyword::Table)
            && Self::is_identifier_token(self.peek(1), false)
        {
            self.bump();
            QueryPrimary::Table(self.parse_table_identifier()?)
        } else if self.check_keyword(Keyword::Values) {
            QueryPrimary::InlineTable(self.parse_inline_table()?)
        } else {
            QueryPrimary::Specification(self.parse_query_specification()?)
        };
        Ok(QueryTerm::Primary(Box::new(primary)))
    }

    /// `VALUES expr (, expr)* [alias]`
    fn parse_inline_table(&mut self) -> Result<InlineTable, ParseError> {
        self.expect_keyword(Keyword::Values)?;
        let rows = self.parse_comma_separated(Self::parse_expression)?;
        let alias = self.parse_table_alias()?;
        Ok(InlineTable { rows, alias })
    }

    /// `[AS] strictIdentifier [(col, ...)]`
    pub(super) fn parse_table_alias(&mut self) -> Result<Option<TableAlias>, ParseError> {
        let name = if self.eat_keyword(Keyword::As) || self.at_implicit_alias() {
            self.parse_strict_identifier()?
        } else {
            return Ok(None);
        };
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            Vec::new()
        };
        Ok(Some(TableAlias { name, columns }))
    }

    // ------------------------------------------------------------------
    // Specifications
    // ------------------------------------------------------------------

    pub(super) fn parse_query_specification(&mut self) -> Result<QuerySpecification, ParseError> {
        match self.peek_keyword(0) {
            Some(Keyword::Select)
                if self.peek_keyword(1) == Some(Keyword::Transform)
                    && self.peek(2).kind == TokenKind::LeftParen =>
            {
                // `SELECT transform(x) FROM t` is also an ordinary call.
                if let Some(spec) = self.attempt(Self::parse_transform_spec)? {
                    return Ok(QuerySpecification::Transform(Box::new(spec)));
                }
            }
            Some(Keyword::Map | Keyword::Reduce) => {
                let spec = self.parse_transform_spec()?;
                return Ok(QuerySpecification::Transform(Box::new(spec)));
            }
            _ => {}
        }
        Ok(QuerySpecification::Select(Box::new(self.parse_select_spec()?)))
    }

    fn parse_select_spec(&mut self) -> Result<SelectSpec, ParseError> {
        let mut spec = SelectSpec::default();

        if self.check_keyword(Keyword::From) {
            spec.from = Some(self.parse_from_clause()?);
            spec.from_first = true;
            if self.eat_keyword(Keyword::Select) {
                spec.quantifier = self.parse_set_quantifier();
                spec.projection = Some(self.parse_named_expression_seq()?);
            }
        } else {
            self.expect_keyword(Keyword::Select)?;
            spec.hints = self.parse_hints()?;
            spec.quantifier = self.parse_set_quantifier();
            spec.projection = Some(self.parse_named_expression_seq()?);
            if self.check_keyword(Keyword::From) {
                spec.from = Some(self.parse_from_clause()?);
            }
        }

        spec.lateral_views = self.parse_lateral_views()?;
        if self.eat_keyword(Keyword::Where) {
            spec.selection = Some(self.parse_expression()?);
        }
        if self.check_keyword(Keyword::Group) {
            spec.aggregation = Some(self.parse_aggregation()?);
        }
        if self.eat_keyword(Keyword::Having) {
            spec.having = Some(self.parse_expression()?);
        }
        if self.check_keyword(Keyword::Window) {
            spec.windows = self.parse_window_clause()?;
        }
        Ok(spec)
    }

    /// `/*+ hint [,] hint ... */`, repeated.
    fn parse_hints(&mut self) -> Result<Vec<Hint>, ParseError> {
        let mut hints = Vec::new();
        while self.eat(&TokenKind::HintStart) {
            hints.push(self.parse_hint_statement()?);
            while !self.check(&TokenKind::HintEnd) {
                self.eat(&TokenKind::Comma);
                hints.push(self.parse_hint_statement()?);
            }
            self.expect(&TokenKind::HintEnd)?;
        }
        Ok(hints)
    }

    fn parse_hint_statement(&mut self) -> Result<Hint, ParseError> {
        let name = self.parse_identifier()?;
        let parameters = if self.check(&TokenKind::LeftParen) {
            self.parse_parenthesized_list(Self::parse_primary)?
        } else {
            Vec::new()
        };
        Ok(Hint { name, parameters })
    }

    /// `SELECT TRANSFORM(...)`, `MAP ...` or `REDUCE ...` with row formats,
    /// `USING 'script'` and an optional output schema.
    fn parse_transform_spec(&mut self) -> Result<TransformSpec, ParseError> {
        let (kind, expressions) = if self.eat_keyword(Keyword::Select) {
            self.expect_keyword(Keyword::Transform)?;
            self.expect(&TokenKind::LeftParen)?;
            let expressions = self.parse_named_expression_seq()?;
            self.expect(&TokenKind::RightParen)?;
            (TransformKind::Transform, expressions)
        } else if self.eat_keyword(Keyword::Map) {
            (TransformKind::Map, self.parse_named_expression_seq()?)
        } else {
            self.expect_keyword(Keyword::Reduce)?;
            (TransformKind::Reduce, self.parse_named_expression_seq()?)
        };

        let input_row_format = self.parse_optional_row_format()?;
        let record_writer = if self.eat_keyword(Keyword::Recordwriter) {
            Some(self.parse_string()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::Using)?;
        let script = self.parse_string()?;
        let output = if self.eat_keyword(Keyword::As) {
            Some(self.parse_transform_output()?)
        } else {
            None
        };
        let output_row_format = self.parse_optional_row_format()?;
        let record_reader = if self.eat_keyword(Keyword::Recordreader) {
            Some(self.parse_string()?)
        } else {
            None
        };
        let from = if self.check_keyword(Keyword::From) {
            Some(self.parse_from_clause()?)
        } else {
            None
        };
        let selection = if self.eat_keyword(Keyword::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(TransformSpec {
            kind,
            expressions,
            input_row_format,
            record_writer,
            script,
            output,
            output_row_format,
            record_reader,
            from,
            selection,
        })
    }

    /// Returns true if a column type starts `k` tokens ahead.
    fn column_type_at(&self, k: usize) -> bool {
        match &self.peek(k).kind {
            TokenKind::Keyword(Keyword::Array | Keyword::Map) => {
                self.peek(k + 1).kind == TokenKind::Lt
            }
            TokenKind::Keyword(Keyword::Struct) => {
                matches!(self.peek(k + 1).kind, TokenKind::Lt | TokenKind::NotEq)
            }
            TokenKind::Identifier(name) => DataType::is_primitive_name(name),
            _ => false,
        }
    }

    /// `names | columns | (names) | (columns)`
    fn parse_transform_output(&mut self) -> Result<TransformOutput, ParseError> {
        let parenthesized = self.eat(&TokenKind::LeftParen);
        let output = if self.column_type_at(1) {
            TransformOutput::Columns(self.parse_column_list()?)
        } else {
            TransformOutput::Names(self.parse_identifier_seq()?)
        };
        if parenthesized {
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(output)
    }

    // ------------------------------------------------------------------
    // FROM clause and relations
    // ------------------------------------------------------------------

    /// `FROM relation (, relation)* lateralView* [pivot]`
    pub(super) fn parse_from_clause(&mut self) -> Result<FromClause, ParseError> {
        self.expect_keyword(Keyword::From)?;
        let relations = self.parse_comma_separated(Self::parse_relation)?;
        let lateral_views = self.parse_lateral_views()?;
        let pivot = if self.check_keyword(Keyword::Pivot) {
            Some(self.parse_pivot()?)
        } else {
            None
        };
        Ok(FromClause {
            relations,
            lateral_views,
            pivot,
        })
    }

    fn parse_relation(&mut self) -> Result<Relation, ParseError> {
        let primary = self.parse_relation_primary()?;
        let mut joins = Vec::new();
        while let Some(join) = self.parse_join()? {
            joins.push(join);
        }
        Ok(Relation { primary, joins })
    }

    fn parse_join(&mut self) -> Result<Option<Join>, ParseError> {
        self.expecting("JOIN");
        if !matches!(
            self.peek_keyword(0),
            Some(
                Keyword::Join
                    | Keyword::Inner
                    | Keyword::Cross
                    | Keyword::Left
                    | Keyword::Right
                    | Keyword::Full
                    | Keyword::Anti
                    | Keyword::Natural
            )
        ) {
            return Ok(None);
        }

        let natural = self.eat_keyword(Keyword::Natural);
        let join_type = if self.eat_keyword(Keyword::Inner) {
            JoinType::Inner
        } else if self.eat_keyword(Keyword::Cross) {
            JoinType::Cross
        } else if self.eat_keyword(Keyword::Left) {
            if self.eat_keyword(Keyword::Semi) {
                JoinType::LeftSemi
            } else if self.eat_keyword(Keyword::Anti) {
                JoinType::LeftAnti
            } else {
                self.eat_keyword(Keyword::Outer);
                JoinType::LeftOuter
            }
        } else if self.eat_keyword(Keyword::Right) {
            self.eat_keyword(Keyword::Outer);
            JoinType::RightOuter
        } else if self.eat_keyword(Keyword::Full) {
            self.eat_keyword(Keyword::Outer);
            JoinType::FullOuter
        } else if self.eat_keyword(Keyword::Anti) {
            JoinType::LeftAnti
        } else {
            JoinType::Inner
        };
        self.expect_keyword(Keyword::Join)?;
        let relation = self.parse_relation_primary()?;

        let criteria = if natural || join_type == JoinType::Cross {
            None
        } else if self.eat_keyword(Keyword::On) {
            Some(JoinCriteria::On(self.parse_expression()?))
        } else if self.eat_keyword(Keyword::Using) {
            Some(JoinCriteria::Using(self.parse_identifier_list()?))
        } else {
            None
        };

        Ok(Some(Join {
            natural,
            join_type,
            relation,
            criteria,
        }))
    }

    fn parse_relation_primary(&mut self) -> Result<RelationPrimary, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            return self.nested(Self::parse_parenthesized_relation);
        }

        if self.peek_keyword(0) == Some(Keyword::Values)
            && !matches!(
                self.peek(1).kind,
                TokenKind::Eof | TokenKind::Comma | TokenKind::RightParen | TokenKind::Dot
            )
        {
            return Ok(RelationPrimary::InlineTable(self.parse_inline_table()?));
        }

        if Self::is_identifier_token(self.current(), false)
            && self.peek(1).kind == TokenKind::LeftParen
        {
            let name = self.parse_identifier()?;
            self.expect(&TokenKind::LeftParen)?;
            let args = if self.check(&TokenKind::RightParen) {
                Vec::new()
            } else {
                self.parse_comma_separated(Self::parse_expression)?
            };
            self.expect(&TokenKind::RightParen)?;
            let alias = self.parse_table_alias()?;
            return Ok(RelationPrimary::TableValuedFunction { name, args, alias });
        }

        let name = self.parse_table_identifier()?;
        let sample = self.parse_optional_sample()?;
        let alias = self.parse_table_alias()?;
        Ok(RelationPrimary::Table {
            name,
            sample,
            alias,
        })
    }

    /// `( query )` or `( relation )`, each with sample and alias.
    ///
    /// `((` may open either a nested query or a nested relation; the query
    /// is tried first.
    fn parse_parenthesized_relation(&mut self) -> Result<RelationPrimary, ParseError> {
        if self.query_starts_at(1) {
            return self.parse_aliased_query();
        }
        if self.peek(1).kind == TokenKind::LeftParen {
            if let Some(relation) = self.attempt(Self::parse_aliased_query)? {
                return Ok(relation);
            }
        }

        self.expect(&TokenKind::LeftParen)?;
        let relation = self.parse_relation()?;
        self.expect(&TokenKind::RightParen)?;
        let sample = self.parse_optional_sample()?;
        let alias = self.parse_table_alias()?;
        Ok(RelationPrimary::AliasedRelation {
            relation: Box::new(relation),
            sample,
            alias,
        })
    }

    fn parse_aliased_query(&mut self) -> Result<RelationPrimary, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.expect(&TokenKind::RightParen)?;
        let sample = self.parse_optional_sample()?;
        let alias = self.parse_table_alias()?;
        Ok(RelationPrimary::AliasedQuery {
            query: Box::new(query),
            sample,
            alias,
        })
    }

    /// `TABLESAMPLE ( method )`
    fn parse_optional_sample(&mut self) -> Result<Option<Sample>, ParseError> {
        if !self.check_keyword(Keyword::Tablesample) {
            return Ok(None);
        }
        let keyword = self.bump();
        self.expect(&TokenKind::LeftParen)?;
        if self.current().kind == TokenKind::RightParen {
            return Err(self.syntax_error_at("TABLESAMPLE does not accept empty inputs.", &keyword));
        }

        let percent_at = usize::from(self.current().kind == TokenKind::Minus);
        let is_percent = matches!(
            self.peek(percent_at).kind,
            TokenKind::IntegerValue(_) | TokenKind::DecimalValue(_)
        ) && self.peek_keyword(percent_at + 1) == Some(Keyword::Percent);

        let sample = if is_percent {
            let negative = self.eat(&TokenKind::Minus);
            let value = match self.bump().kind {
                TokenKind::IntegerValue(v) | TokenKind::DecimalValue(v) => v,
                _ => return Err(self.error_here()),
            };
            self.bump();
            Sample::Percent { negative, value }
        } else if self.eat_keyword(Keyword::Bucket) {
            let numerator = self.parse_integer_text()?;
            self.expect_keywords(&[Keyword::Out, Keyword::Of])?;
            let denominator = self.parse_integer_text()?;
            let on = if self.eat_keyword(Keyword::On) {
                let name = self.parse_qualified_name()?;
                if self.eat(&TokenKind::LeftParen) {
                    self.expect(&TokenKind::RightParen)?;
                    Some(BucketOn::Function(name))
                } else {
                    match <[_; 1]>::try_from(name.parts) {
                        Ok([column]) => Some(BucketOn::Column(column)),
                        Err(_) => return Err(self.error_here()),
                    }
                }
            } else {
                None
            };
            Sample::Bucket {
                numerator,
                denominator,
                on,
            }
        } else {
            let expr = self.parse_expression()?;
            if self.eat_keyword(Keyword::Rows) {
                Sample::Rows(expr)
            } else {
                Sample::Bytes(expr)
            }
        };

        self.expect(&TokenKind::RightParen)?;
        Ok(Some(sample))
    }

    fn parse_integer_text(&mut self) -> Result<String, ParseError> {
        self.expecting("integer");
        match self.current().kind.clone() {
            TokenKind::IntegerValue(digits) => {
                self.bump();
                Ok(digits)
            }
            _ => Err(self.error_here()),
        }
    }

    fn parse_lateral_views(&mut self) -> Result<Vec<LateralView>, ParseError> {
        let mut views = Vec::new();
        while self.check_keyword(Keyword::Lateral) {
            views.push(self.parse_lateral_view()?);
        }
        Ok(views)
    }

    /// `LATERAL VIEW [OUTER] f(args) table [AS] col (, col)*`
    fn parse_lateral_view(&mut self) -> Result<LateralView, ParseError> {
        self.expect_keywords(&[Keyword::Lateral, Keyword::View])?;
        let outer = self.eat_keyword(Keyword::Outer);
        let function = self.parse_qualified_name()?;
        self.expect(&TokenKind::LeftParen)?;
        let args = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_comma_separated(Self::parse_expression)?
        };
        self.expect(&TokenKind::RightParen)?;
        let table = self.parse_identifier()?;
        let columns = if self.eat_keyword(Keyword::As) || self.at_implicit_alias() {
            self.parse_identifier_seq()?
        } else {
            Vec::new()
        };
        Ok(LateralView {
            outer,
            function,
            args,
            table,
            columns,
        })
    }

    /// `PIVOT ( aggregates FOR column(s) IN ( value [AS alias], ... ) )`
    fn parse_pivot(&mut self) -> Result<Pivot, ParseError> {
        self.expect_keyword(Keyword::Pivot)?;
        self.expect(&TokenKind::LeftParen)?;
        let aggregates = self.parse_named_expression_seq()?;
        self.expect_keyword(Keyword::For)?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            vec![self.parse_identifier()?]
        };
        self.expect_keyword(Keyword::In)?;
        let values = self.parse_parenthesized_list(Self::parse_named_expression)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Pivot {
            aggregates,
            columns,
            values,
        })
    }

    // ------------------------------------------------------------------
    // Aggregation, windows and organization
    // ------------------------------------------------------------------

    fn parse_aggregation(&mut self) -> Result<Aggregation, ParseError> {
        self.expect_keywords(&[Keyword::Group, Keyword::By])?;

        if matches!(self.peek_keyword(0), Some(Keyword::Cube | Keyword::Rollup))
            && self.peek(1).kind == TokenKind::LeftParen
        {
            // `GROUP BY cube(a), b` groups by a call instead.
            let analytic = self.attempt(|p| {
                let keyword = p.bump().as_keyword();
                let expressions = p.parse_parenthesized_list(Self::parse_expression)?;
                if p.check(&TokenKind::Comma) {
                    return Err(p.error_here());
                }
                Ok(if keyword == Some(Keyword::Cube) {
                    Aggregation::Cube(expressions)
                } else {
                    Aggregation::Rollup(expressions)
                })
            })?;
            if let Some(aggregation) = analytic {
                return Ok(aggregation);
            }
        }

        if self.peek_keyword(0) == Some(Keyword::Grouping)
            && self.peek_keyword(1) == Some(Keyword::Sets)
        {
            return Ok(Aggregation::GroupBy {
                expressions: Vec::new(),
                modifier: Some(self.parse_grouping_sets()?),
            });
        }

        let expressions = self.parse_comma_separated(Self::parse_expression)?;
        let modifier = if self.eat_keywords(&[Keyword::With, Keyword::Rollup]) {
            Some(GroupByModifier::WithRollup)
        } else if self.eat_keywords(&[Keyword::With, Keyword::Cube]) {
            Some(GroupByModifier::WithCube)
        } else if self.check_keyword(Keyword::Grouping) {
            Some(self.parse_grouping_sets()?)
        } else {
            None
        };
        Ok(Aggregation::GroupBy {
            expressions,
            modifier,
        })
    }

    fn parse_grouping_sets(&mut self) -> Result<GroupByModifier, ParseError> {
        self.expect_keywords(&[Keyword::Grouping, Keyword::Sets])?;
        let sets = self.parse_parenthesized_list(Self::parse_grouping_set)?;
        Ok(GroupByModifier::GroupingSets(sets))
    }

    /// `( [expr (, expr)*] )` or a single expression.
    fn parse_grouping_set(&mut self) -> Result<Vec<Expr>, ParseError> {
        if self.check(&TokenKind::LeftParen) {
            let list = self.attempt(|p| {
                p.bump();
                let items = if p.check(&TokenKind::RightParen) {
                    Vec::new()
                } else {
                    p.parse_comma_separated(Self::parse_expression)?
                };
                p.expect(&TokenKind::RightParen)?;
                if !matches!(p.current().kind, TokenKind::Comma | TokenKind::RightParen) {
                    return Err(p.error_here());
                }
                Ok(items)
            })?;
            if let Some(list) = list {
                return Ok(list);
            }
        }
        Ok(vec![self.parse_expression()?])
    }

    /// `WINDOW name AS spec (, name AS spec)*`
    fn parse_window_clause(&mut self) -> Result<Vec<NamedWindow>, ParseError> {
        self.expect_keyword(Keyword::Window)?;
        self.parse_comma_separated(|p| {
            let name = p.parse_identifier()?;
            p.expect_keyword(Keyword::As)?;
            let spec = p.parse_window_spec()?;
            Ok(NamedWindow { name, spec })
        })
    }

    /// `[ORDER BY ..] [CLUSTER BY ..] [DISTRIBUTE BY ..] [SORT BY ..]
    /// [WINDOW ..] [LIMIT ALL|expr] [OFFSET ALL|expr]`
    pub(super) fn parse_query_organization(&mut self) -> Result<QueryOrganization, ParseError> {
        let mut organization = QueryOrganization::default();
        if self.eat_keywords(&[Keyword::Order, Keyword::By]) {
            organization.order_by = self.parse_comma_separated(Self::parse_sort_item)?;
        }
        if self.eat_keywords(&[Keyword::Cluster, Keyword::By]) {
            organization.cluster_by = self.parse_comma_separated(Self::parse_expression)?;
        }
        if self.eat_keywords(&[Keyword::Distribute, Keyword::By]) {
            organization.distribute_by = self.parse_comma_separated(Self::parse_expression)?;
        }
        if self.eat_keywords(&[Keyword::Sort, Keyword::By]) {
            organization.sort_by = self.parse_comma_separated(Self::parse_sort_item)?;
        }
        if self.check_keyword(Keyword::Window) {
            organization.windows = self.parse_window_clause()?;
        }
        if self.eat_keyword(Keyword::Limit) {
            organization.limit = Some(self.parse_row_limit()?);
        }
        if self.eat_keyword(Keyword::Offset) {
            organization.offset = Some(self.parse_row_limit()?);
        }
        Ok(organization)
    }

    fn parse_row_limit(&mut self) -> Result<RowLimit, ParseError> {
        if self.eat_keyword(Keyword::All) {
            Ok(RowLimit::All)
        } else {
            Ok(RowLimit::Count(self.parse_expression()?))
        }
    }
}
