//! Alias and column reference extraction for `SELECT` scopes.
//!
//! Walks a statement and yields one [`SelectScope`] per `SELECT`, carrying the
//! table aliases introduced by its `FROM`/`JOIN` clauses, the column
//! references written in its own clauses, its explicit column aliases, and the
//! columns named in `USING` joins. Nested subqueries are never flattened into
//! the enclosing scope; each one produces its own scope with a handle to the
//! select that contains it.

use std::fmt;

use sqlparser::ast::TableAlias as AstTableAlias;
use sqlparser::ast::*;

use super::helpers::token_span_to_offsets;
use crate::types::Span;

/// Whether a column reference carries a table/alias prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Qualification {
    Qualified,
    Unqualified,
}

impl Qualification {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qualified => "qualified",
            Self::Unqualified => "unqualified",
        }
    }

    /// The kind with a leading capital, as used at the start of messages.
    pub const fn capitalized(self) -> &'static str {
        match self {
            Self::Qualified => "Qualified",
            Self::Unqualified => "Unqualified",
        }
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A column reference as written in the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    /// Surface text, e.g. `foo.b`, `b` or `foo.*`.
    pub raw_text: String,
    /// True when a table or alias prefix was written.
    pub is_qualified: bool,
    /// True for `*` and `prefix.*`.
    pub is_wildcard: bool,
    /// Byte range in the source SQL, when the parser recorded one.
    pub span: Option<Span>,
}

impl ColumnReference {
    pub fn new(raw_text: impl Into<String>, is_qualified: bool, is_wildcard: bool) -> Self {
        Self {
            raw_text: raw_text.into(),
            is_qualified,
            is_wildcard,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    pub fn qualification(&self) -> Qualification {
        if self.is_qualified {
            Qualification::Qualified
        } else {
            Qualification::Unqualified
        }
    }
}

/// A table source introduced by `FROM` or `JOIN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAlias {
    /// Explicit alias, or the last part of the table name when none was given.
    pub name: String,
    /// True when written with an explicit alias.
    pub is_explicit: bool,
    pub span: Option<Span>,
}

/// Everything a per-select reference check needs, for one `SELECT`.
#[derive(Debug)]
pub struct SelectScope<'a> {
    pub select: &'a Select,
    /// The select containing this one, for subqueries.
    pub parent_select: Option<&'a Select>,
    pub aliases: Vec<TableAlias>,
    pub references: Vec<ColumnReference>,
    /// Names introduced by `expr AS alias` in the projection.
    pub col_aliases: Vec<String>,
    /// Column names listed in `JOIN ... USING (...)`.
    pub using_cols: Vec<String>,
}

/// Calls `visitor` for every `SELECT` scope in `statement`, outermost first.
///
/// `sql` must be the text the statement was parsed from; it is used to
/// recover the surface text and byte span of each reference.
pub fn visit_select_scopes<'a, F>(statement: &'a Statement, sql: &str, visitor: &mut F)
where
    F: FnMut(SelectScope<'a>),
{
    let mut walker = ScopeWalker { sql, visitor };
    walker.statement(statement, None);
}

/// Collects every scope of `statement` into a vector.
pub fn select_scopes<'a>(statement: &'a Statement, sql: &str) -> Vec<SelectScope<'a>> {
    let mut scopes = Vec::new();
    visit_select_scopes(statement, sql, &mut |scope| scopes.push(scope));
    scopes
}

struct ScopeWalker<'s, 'v, F> {
    sql: &'s str,
    visitor: &'v mut F,
}

impl<'a, F> ScopeWalker<'_, '_, F>
where
    F: FnMut(SelectScope<'a>),
{
    fn statement(&mut self, statement: &'a Statement, parent: Option<&'a Select>) {
        match statement {
            Statement::Query(query) => self.query(query, parent),
            Statement::Insert(insert) => {
                if let Some(source) = &insert.source {
                    self.query(source, parent);
                }
            }
            Statement::CreateView { query, .. } => self.query(query, parent),
            Statement::CreateTable(create) => {
                if let Some(query) = &create.query {
                    self.query(query, parent);
                }
            }
            _ => {}
        }
    }

    fn query(&mut self, query: &'a Query, parent: Option<&'a Select>) {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.query(&cte.query, parent);
            }
        }

        match query.body.as_ref() {
            SetExpr::Select(select) => {
                let order_by = query
                    .order_by
                    .as_ref()
                    .and_then(|order_by| match &order_by.kind {
                        OrderByKind::Expressions(exprs) => Some(exprs.as_slice()),
                        OrderByKind::All(_) => None,
                    })
                    .unwrap_or_default();
                self.select(select, order_by, parent);
            }
            body => self.set_expr(body, parent),
        }
    }

    fn set_expr(&mut self, set_expr: &'a SetExpr, parent: Option<&'a Select>) {
        match set_expr {
            SetExpr::Select(select) => self.select(select, &[], parent),
            SetExpr::Query(query) => self.query(query, parent),
            SetExpr::SetOperation { left, right, .. } => {
                self.set_expr(left, parent);
                self.set_expr(right, parent);
            }
            SetExpr::Insert(statement)
            | SetExpr::Update(statement)
            | SetExpr::Delete(statement)
            | SetExpr::Merge(statement) => self.statement(statement, parent),
            _ => {}
        }
    }

    fn select(
        &mut self,
        select: &'a Select,
        order_by: &'a [OrderByExpr],
        parent: Option<&'a Select>,
    ) {
        let mut collector = ReferenceCollector::new(self.sql);
        let mut aliases = Vec::new();
        let mut using_cols = Vec::new();
        let mut derived = Vec::new();

        for item in &select.projection {
            collector.select_item(item);
        }

        for table in &select.from {
            collect_table_with_joins(
                table,
                self.sql,
                &mut aliases,
                &mut using_cols,
                &mut derived,
                &mut collector,
            );
        }

        for expr in select_clause_exprs(select) {
            collector.expr(expr);
        }
        for NamedWindowDefinition(_, window) in &select.named_window {
            if let NamedWindowExpr::WindowSpec(window) = window {
                collector.window_spec(window);
            }
        }
        for order_expr in order_by {
            collector.expr(&order_expr.expr);
        }

        let ReferenceCollector {
            mut references,
            subqueries,
            ..
        } = collector;
        // Clauses are visited in a fixed order; report in source order.
        references.sort_by_key(|reference| reference.span.map_or(usize::MAX, |span| span.start));

        (self.visitor)(SelectScope {
            select,
            parent_select: parent,
            aliases,
            references,
            col_aliases: projection_aliases(select),
            using_cols,
        });

        for query in derived.into_iter().chain(subqueries) {
            self.query(query, Some(select));
        }
    }
}

/// Expressions of a select's own clauses other than the projection and join conditions.
fn select_clause_exprs(select: &Select) -> Vec<&Expr> {
    let mut exprs = Vec::new();

    exprs.extend(select.prewhere.as_ref());
    exprs.extend(select.selection.as_ref());
    if let GroupByExpr::Expressions(group_exprs, _) = &select.group_by {
        exprs.extend(group_exprs.iter());
    }
    exprs.extend(select.having.as_ref());
    exprs.extend(select.qualify.as_ref());
    exprs.extend(select.sort_by.iter().map(|sort| &sort.expr));

    exprs
}

fn projection_aliases(select: &Select) -> Vec<String> {
    select
        .projection
        .iter()
        .filter_map(|item| match item {
            SelectItem::ExprWithAlias { alias, .. } => Some(alias.value.clone()),
            _ => None,
        })
        .collect()
}

fn collect_table_with_joins<'a>(
    table: &'a TableWithJoins,
    sql: &str,
    aliases: &mut Vec<TableAlias>,
    using_cols: &mut Vec<String>,
    derived: &mut Vec<&'a Query>,
    collector: &mut ReferenceCollector<'a, '_>,
) {
    collect_table_factor(
        &table.relation,
        sql,
        aliases,
        using_cols,
        derived,
        collector,
    );

    for join in &table.joins {
        collect_table_factor(&join.relation, sql, aliases, using_cols, derived, collector);
        match join_constraint(&join.join_operator) {
            Some(JoinConstraint::On(expr)) => collector.expr(expr),
            Some(JoinConstraint::Using(names)) => {
                using_cols.extend(names.iter().map(ToString::to_string));
            }
            _ => {}
        }
    }
}

fn collect_table_factor<'a>(
    table_factor: &'a TableFactor,
    sql: &str,
    aliases: &mut Vec<TableAlias>,
    using_cols: &mut Vec<String>,
    derived: &mut Vec<&'a Query>,
    collector: &mut ReferenceCollector<'a, '_>,
) {
    match table_factor {
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => {
            collect_table_with_joins(
                table_with_joins,
                sql,
                aliases,
                using_cols,
                derived,
                collector,
            );
            return;
        }
        TableFactor::Derived { subquery, .. } => derived.push(subquery),
        _ => {}
    }

    aliases.push(table_alias(table_factor, sql));
}

fn table_alias(table_factor: &TableFactor, sql: &str) -> TableAlias {
    if let Some(alias) = table_factor_alias(table_factor) {
        return TableAlias {
            name: alias.name.value.clone(),
            is_explicit: true,
            span: token_span_to_offsets(sql, &alias.name.span),
        };
    }

    match table_factor {
        TableFactor::Table { name, .. } => TableAlias {
            name: name
                .0
                .last()
                .and_then(ObjectNamePart::as_ident)
                .map(|ident| ident.value.clone())
                .unwrap_or_else(|| name.to_string()),
            is_explicit: false,
            span: token_span_to_offsets(sql, &name.span()),
        },
        other => TableAlias {
            name: String::new(),
            is_explicit: false,
            span: token_span_to_offsets(sql, &other.span()),
        },
    }
}

fn table_factor_alias(table_factor: &TableFactor) -> Option<&AstTableAlias> {
    match table_factor {
        TableFactor::Table { alias, .. }
        | TableFactor::Derived { alias, .. }
        | TableFactor::TableFunction { alias, .. }
        | TableFactor::Function { alias, .. }
        | TableFactor::UNNEST { alias, .. }
        | TableFactor::JsonTable { alias, .. }
        | TableFactor::OpenJsonTable { alias, .. }
        | TableFactor::NestedJoin { alias, .. }
        | TableFactor::Pivot { alias, .. }
        | TableFactor::Unpivot { alias, .. }
        | TableFactor::MatchRecognize { alias, .. }
        | TableFactor::XmlTable { alias, .. }
        | TableFactor::SemanticView { alias, .. } => alias.as_ref(),
    }
}

fn join_constraint(join_operator: &JoinOperator) -> Option<&JoinConstraint> {
    match join_operator {
        JoinOperator::Join(constraint)
        | JoinOperator::Inner(constraint)
        | JoinOperator::Left(constraint)
        | JoinOperator::LeftOuter(constraint)
        | JoinOperator::Right(constraint)
        | JoinOperator::RightOuter(constraint)
        | JoinOperator::FullOuter(constraint)
        | JoinOperator::CrossJoin(constraint)
        | JoinOperator::Semi(constraint)
        | JoinOperator::LeftSemi(constraint)
        | JoinOperator::RightSemi(constraint)
        | JoinOperator::Anti(constraint)
        | JoinOperator::LeftAnti(constraint)
        | JoinOperator::RightAnti(constraint)
        | JoinOperator::StraightJoin(constraint) => Some(constraint),
        JoinOperator::AsOf { constraint, .. } => Some(constraint),
        JoinOperator::CrossApply | JoinOperator::OuterApply => None,
    }
}

/// Gathers column references from expressions of a single scope, setting
/// aside subqueries so they can be walked as scopes of their own.
struct ReferenceCollector<'a, 's> {
    sql: &'s str,
    references: Vec<ColumnReference>,
    subqueries: Vec<&'a Query>,
}

impl<'a, 's> ReferenceCollector<'a, 's> {
    fn new(sql: &'s str) -> Self {
        Self {
            sql,
            references: Vec::new(),
            subqueries: Vec::new(),
        }
    }

    fn select_item(&mut self, item: &'a SelectItem) {
        match item {
            SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                self.expr(expr)
            }
            SelectItem::Wildcard(_) => self.push_unqualified_wildcard(),
            SelectItem::QualifiedWildcard(kind, _) => match kind {
                SelectItemQualifiedWildcardKind::ObjectName(name) => {
                    let span = self.wildcard_span(&name.span());
                    self.push_qualified_wildcard(name, span);
                }
                SelectItemQualifiedWildcardKind::Expr(expr) => {
                    let span = self.wildcard_span(&expr.span());
                    self.push_qualified_wildcard(expr, span);
                }
            },
        }
    }

    fn expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Identifier(ident) => {
                self.push_reference(expr, false, &ident.span);
            }
            Expr::CompoundIdentifier(parts) => {
                self.push_reference(expr, parts.len() > 1, &expr.span());
            }
            Expr::Wildcard(_) => self.push_unqualified_wildcard(),
            Expr::QualifiedWildcard(name, _) => {
                let span = self.wildcard_span(&name.span());
                self.push_qualified_wildcard(name, span);
            }
            Expr::MatchAgainst { columns, .. } => {
                for column in columns {
                    self.push_reference(column, column.0.len() > 1, &column.span());
                }
            }

            // Single expression wrappers
            Expr::UnaryOp { expr: inner, .. }
            | Expr::Nested(inner)
            | Expr::IsNull(inner)
            | Expr::IsNotNull(inner)
            | Expr::IsTrue(inner)
            | Expr::IsFalse(inner)
            | Expr::IsNotTrue(inner)
            | Expr::IsNotFalse(inner)
            | Expr::IsUnknown(inner)
            | Expr::IsNotUnknown(inner)
            | Expr::IsNormalized { expr: inner, .. }
            | Expr::Cast { expr: inner, .. }
            | Expr::Collate { expr: inner, .. }
            | Expr::Extract { expr: inner, .. }
            | Expr::Ceil { expr: inner, .. }
            | Expr::Floor { expr: inner, .. }
            | Expr::Prefixed { value: inner, .. }
            | Expr::Named { expr: inner, .. }
            | Expr::OuterJoin(inner)
            | Expr::Prior(inner) => self.expr(inner),
            Expr::Interval(interval) => self.expr(&interval.value),
            Expr::Lambda(lambda) => self.expr(&lambda.body),

            // Two expression patterns
            Expr::BinaryOp { left, right, .. }
            | Expr::AnyOp { left, right, .. }
            | Expr::AllOp { left, right, .. }
            | Expr::IsDistinctFrom(left, right)
            | Expr::IsNotDistinctFrom(left, right)
            | Expr::Position {
                expr: left,
                r#in: right,
            }
            | Expr::AtTimeZone {
                timestamp: left,
                time_zone: right,
            }
            | Expr::InUnnest {
                expr: left,
                array_expr: right,
                ..
            }
            | Expr::Like {
                expr: left,
                pattern: right,
                ..
            }
            | Expr::ILike {
                expr: left,
                pattern: right,
                ..
            }
            | Expr::SimilarTo {
                expr: left,
                pattern: right,
                ..
            }
            | Expr::RLike {
                expr: left,
                pattern: right,
                ..
            } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::MemberOf(member) => {
                self.expr(&member.value);
                self.expr(&member.array);
            }

            Expr::Between {
                expr, low, high, ..
            } => {
                self.expr(expr);
                self.expr(low);
                self.expr(high);
            }
            Expr::Substring {
                expr,
                substring_from,
                substring_for,
                ..
            } => {
                self.expr(expr);
                self.opt_expr(substring_from.as_deref());
                self.opt_expr(substring_for.as_deref());
            }
            Expr::Trim {
                expr,
                trim_what,
                trim_characters,
                ..
            } => {
                self.opt_expr(trim_what.as_deref());
                self.expr(expr);
                for item in trim_characters.iter().flatten() {
                    self.expr(item);
                }
            }
            Expr::Overlay {
                expr,
                overlay_what,
                overlay_from,
                overlay_for,
            } => {
                self.expr(expr);
                self.expr(overlay_what);
                self.expr(overlay_from);
                self.opt_expr(overlay_for.as_deref());
            }
            Expr::Convert { expr, styles, .. } => {
                self.expr(expr);
                for style in styles {
                    self.expr(style);
                }
            }
            Expr::Case {
                operand,
                conditions,
                else_result,
                ..
            } => {
                self.opt_expr(operand.as_deref());
                for when in conditions {
                    self.expr(&when.condition);
                    self.expr(&when.result);
                }
                self.opt_expr(else_result.as_deref());
            }

            // Field names after `.` and JSON path keys are not column references.
            Expr::CompoundFieldAccess { root, access_chain } => {
                self.expr(root);
                for access in access_chain {
                    if let AccessExpr::Subscript(subscript) = access {
                        self.subscript(subscript);
                    }
                }
            }
            Expr::JsonAccess { value, path } => {
                self.expr(value);
                for elem in &path.path {
                    if let JsonPathElem::Bracket { key } = elem {
                        self.expr(key);
                    }
                }
            }

            // List patterns
            Expr::InList { expr, list, .. } => {
                self.expr(expr);
                self.exprs(list);
            }
            Expr::Tuple(items) | Expr::Struct { values: items, .. } => self.exprs(items),
            Expr::Array(array) => self.exprs(&array.elem),
            Expr::GroupingSets(sets) | Expr::Cube(sets) | Expr::Rollup(sets) => {
                for set in sets {
                    self.exprs(set);
                }
            }
            Expr::Dictionary(fields) => {
                for field in fields {
                    self.expr(&field.value);
                }
            }
            Expr::Map(map) => {
                for entry in &map.entries {
                    self.expr(&entry.key);
                    self.expr(&entry.value);
                }
            }

            Expr::Function(function) => self.function(function),
            Expr::InSubquery { expr, subquery, .. } => {
                self.expr(expr);
                self.subqueries.push(subquery);
            }
            Expr::Subquery(query)
            | Expr::Exists {
                subquery: query, ..
            } => self.subqueries.push(query),

            Expr::Value(_) | Expr::TypedString(_) => {}
        }
    }

    fn opt_expr(&mut self, expr: Option<&'a Expr>) {
        if let Some(expr) = expr {
            self.expr(expr);
        }
    }

    fn exprs(&mut self, exprs: &'a [Expr]) {
        for expr in exprs {
            self.expr(expr);
        }
    }

    fn subscript(&mut self, subscript: &'a Subscript) {
        match subscript {
            Subscript::Index { index } => self.expr(index),
            Subscript::Slice {
                lower_bound,
                upper_bound,
                stride,
            } => {
                self.opt_expr(lower_bound.as_ref());
                self.opt_expr(upper_bound.as_ref());
                self.opt_expr(stride.as_ref());
            }
        }
    }

    fn function(&mut self, function: &'a Function) {
        self.function_arguments(&function.parameters);
        self.function_arguments(&function.args);

        if let Some(filter) = &function.filter {
            self.expr(filter);
        }

        for order_expr in &function.within_group {
            self.expr(&order_expr.expr);
        }

        if let Some(WindowType::WindowSpec(window)) = &function.over {
            self.window_spec(window);
        }
    }

    fn function_arguments(&mut self, arguments: &'a FunctionArguments) {
        let arguments = match arguments {
            FunctionArguments::None => return,
            FunctionArguments::Subquery(query) => {
                self.subqueries.push(query);
                return;
            }
            FunctionArguments::List(arguments) => arguments,
        };

        for arg in &arguments.args {
            let arg_expr = match arg {
                FunctionArg::Unnamed(arg_expr)
                | FunctionArg::Named { arg: arg_expr, .. }
                | FunctionArg::ExprNamed { arg: arg_expr, .. } => arg_expr,
            };
            match arg_expr {
                FunctionArgExpr::Expr(expr) => self.expr(expr),
                FunctionArgExpr::QualifiedWildcard(name) => {
                    let span = self.wildcard_span(&name.span());
                    self.push_qualified_wildcard(name, span);
                }
                FunctionArgExpr::Wildcard => self.push_unqualified_wildcard(),
            }
        }

        for clause in &arguments.clauses {
            match clause {
                FunctionArgumentClause::OrderBy(order_exprs) => {
                    for order_expr in order_exprs {
                        self.expr(&order_expr.expr);
                    }
                }
                FunctionArgumentClause::Limit(expr)
                | FunctionArgumentClause::Having(HavingBound(_, expr)) => self.expr(expr),
                FunctionArgumentClause::OnOverflow(ListAggOnOverflow::Truncate {
                    filler, ..
                }) => self.opt_expr(filler.as_deref()),
                _ => {}
            }
        }
    }

    fn window_spec(&mut self, window: &'a WindowSpec) {
        self.exprs(&window.partition_by);
        for order_expr in &window.order_by {
            self.expr(&order_expr.expr);
        }
        if let Some(frame) = &window.window_frame {
            for bound in std::iter::once(&frame.start_bound).chain(frame.end_bound.as_ref()) {
                if let WindowFrameBound::Preceding(Some(offset))
                | WindowFrameBound::Following(Some(offset)) = bound
                {
                    self.expr(offset);
                }
            }
        }
    }

    fn push_reference(
        &mut self,
        expr: &impl fmt::Display,
        is_qualified: bool,
        token_span: &sqlparser::tokenizer::Span,
    ) {
        let span = token_span_to_offsets(self.sql, token_span);
        let raw_text = span
            .and_then(|span| self.sql.get(span.start..span.end))
            .map(str::to_string)
            .unwrap_or_else(|| expr.to_string());
        self.references
            .push(ColumnReference::new(raw_text, is_qualified, false).with_span(span));
    }

    fn push_unqualified_wildcard(&mut self) {
        self.references.push(ColumnReference::new("*", false, true));
    }

    fn push_qualified_wildcard(&mut self, prefix: &impl fmt::Display, span: Option<Span>) {
        let raw_text = span
            .and_then(|span| self.sql.get(span.start..span.end))
            .map(str::to_string)
            .unwrap_or_else(|| format!("{prefix}.*"));
        self.references
            .push(ColumnReference::new(raw_text, true, true).with_span(span));
    }

    /// Extends the span of a wildcard's prefix over the trailing `.*`.
    fn wildcard_span(&self, prefix_span: &sqlparser::tokenizer::Span) -> Option<Span> {
        let prefix = token_span_to_offsets(self.sql, prefix_span)?;
        let rest = self.sql.get(prefix.end..)?;
        let after_dot = rest.trim_start().strip_prefix('.')?;
        let after_star = after_dot.trim_start().strip_prefix('*')?;
        let end = self.sql.len() - after_star.len();
        Some(Span::new(prefix.start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_sql;

    fn scopes_of(sql: &str) -> Vec<(usize, Vec<(String, bool, bool)>)> {
        let statements = parse_sql(sql).expect("parse");
        let mut out = Vec::new();
        for statement in &statements {
            visit_select_scopes(statement, sql, &mut |scope| {
                out.push((
                    scope.aliases.len(),
                    scope
                        .references
                        .iter()
                        .map(|r| (r.raw_text.clone(), r.is_qualified, r.is_wildcard))
                        .collect(),
                ));
            });
        }
        out
    }

    fn reference(raw: &str, qualified: bool, wildcard: bool) -> (String, bool, bool) {
        (raw.to_string(), qualified, wildcard)
    }

    #[test]
    fn extracts_mixed_references_in_source_order() {
        let scopes = scopes_of("SELECT a, foo.b FROM foo WHERE c > 1");
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].0, 1);
        assert_eq!(
            scopes[0].1,
            vec![
                reference("a", false, false),
                reference("foo.b", true, false),
                reference("c", false, false),
            ]
        );
    }

    #[test]
    fn keeps_surface_text_of_quoted_identifiers() {
        let scopes = scopes_of("SELECT \"Foo\".\"Bar\" FROM foo AS \"Foo\"");
        assert_eq!(scopes[0].1, vec![reference("\"Foo\".\"Bar\"", true, false)]);
    }

    #[test]
    fn extracts_wildcards() {
        let scopes = scopes_of("SELECT *, foo.*, COUNT(*) FROM foo");
        let refs = &scopes[0].1;
        assert!(refs.contains(&reference("*", false, true)));
        assert!(refs.contains(&reference("foo.*", true, true)));
        assert_eq!(refs.iter().filter(|r| r.0 == "*").count(), 2);
    }

    #[test]
    fn counts_one_alias_per_source() {
        assert_eq!(scopes_of("SELECT a FROM foo AS f")[0].0, 1);
        assert_eq!(scopes_of("SELECT a FROM foo, bar")[0].0, 2);
        assert_eq!(
            scopes_of("SELECT a FROM foo JOIN bar ON foo.id = bar.id")[0].0,
            2
        );
        assert_eq!(scopes_of("SELECT 1")[0].0, 0);
    }

    #[test]
    fn subqueries_are_separate_scopes() {
        let sql = "SELECT x FROM (SELECT foo.a AS x FROM foo) AS sub WHERE x IN (SELECT b FROM bar)";
        let statements = parse_sql(sql).unwrap();
        let scopes = select_scopes(&statements[0], sql);

        assert_eq!(scopes.len(), 3);
        assert!(scopes[0].parent_select.is_none());
        assert!(scopes[1].parent_select.is_some());
        assert!(scopes[2].parent_select.is_some());
        assert_eq!(scopes[0].references.len(), 2);
        assert_eq!(scopes[1].references[0].raw_text, "foo.a");
        assert_eq!(scopes[1].col_aliases, vec!["x".to_string()]);
        assert_eq!(scopes[2].references[0].raw_text, "b");
    }

    #[test]
    fn collects_using_columns() {
        let sql = "SELECT a FROM foo JOIN bar USING (id)";
        let statements = parse_sql(sql).unwrap();
        let scopes = select_scopes(&statements[0], sql);
        assert_eq!(scopes[0].using_cols, vec!["id".to_string()]);
    }

    #[test]
    fn includes_query_order_by() {
        let scopes = scopes_of("SELECT foo.a FROM foo ORDER BY b");
        assert_eq!(
            scopes[0].1,
            vec![reference("foo.a", true, false), reference("b", false, false)]
        );
    }

    #[test]
    fn walks_ctes_and_set_operations() {
        let scopes = scopes_of(
            "WITH c AS (SELECT a FROM foo) SELECT c.a FROM c UNION ALL SELECT b FROM bar",
        );
        assert_eq!(scopes.len(), 3);
    }

    #[test]
    fn reference_spans_point_at_source_text() {
        let sql = "SELECT\n  a,\n  foo.b\nFROM foo";
        let statements = parse_sql(sql).unwrap();
        let scopes = select_scopes(&statements[0], sql);
        for reference in &scopes[0].references {
            let span = reference.span.expect("span");
            assert_eq!(&sql[span.start..span.end], reference.raw_text);
        }
    }

    #[test]
    fn qualification_renders_lowercase_and_capitalized() {
        let reference = ColumnReference::new("foo.b", true, false);
        assert_eq!(reference.qualification(), Qualification::Qualified);
        assert_eq!(reference.qualification().to_string(), "qualified");
        assert_eq!(Qualification::Unqualified.capitalized(), "Unqualified");
    }
}
