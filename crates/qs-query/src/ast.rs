//! Condition tree produced by the parser.
//!
//! A [`Condition`] is a strict tree: every child is exclusively owned by its
//! parent. Chains of the same binary operator are right-leaning, so
//! `a OR b OR c` is `Or(a, Or(b, c))`.
//!
//! A flat query of many words yields a spine as long as the query, so drop,
//! equality, printing and the tree walks below use an explicit stack instead of
//! recursion.

use std::{fmt, mem};

use serde::{Deserialize, Serialize};

use crate::lexer::{is_delimiter, is_reserved};

/// A parsed query condition.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Matches a value, either in a named field or (with an empty field) in any field.
    Match {
        /// Field name; empty means any field.
        field: String,
        /// Value to match.
        value: String,
    },

    /// Both sides must hold.
    And {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },

    /// Either side holds.
    Or {
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },

    /// The inner condition must not hold.
    Not {
        /// Negated condition.
        inner: Box<Self>,
    },

    /// Bounded or half-open range over a field's value.
    TimeRange {
        /// Field name.
        field: String,
        /// Lower bound; `None` is unbounded.
        start: Option<String>,
        /// Upper bound; `None` is unbounded.
        end: Option<String>,
        /// Whether the lower bound itself matches.
        include_start: bool,
        /// Whether the upper bound itself matches.
        include_end: bool,
    },
}

impl Condition {
    /// Creates an unscoped match on a bare term.
    pub fn term(value: impl Into<String>) -> Self {
        Self::matching("", value)
    }

    /// Creates a match scoped to a field.
    pub fn matching(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Match {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a negation.
    pub fn negate(inner: Self) -> Self {
        Self::Not {
            inner: Box::new(inner),
        }
    }

    /// Creates a range condition.
    pub fn time_range(
        field: impl Into<String>,
        start: Option<&str>,
        end: Option<&str>,
        include_start: bool,
        include_end: bool,
    ) -> Self {
        Self::TimeRange {
            field: field.into(),
            start: start.map(String::from),
            end: end.map(String::from),
            include_start,
            include_end,
        }
    }

    /// Joins operands into a right-leaning `And` chain.
    ///
    /// Returns `None` for no operands and the operand itself for one.
    pub fn and_chain(operands: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut operands = operands.into_iter();
        let first = operands.next()?;
        Some(fold_right(first, operands.collect(), Self::and))
    }

    /// Joins operands into a right-leaning `Or` chain.
    ///
    /// Returns `None` for no operands and the operand itself for one.
    pub fn or_chain(operands: impl IntoIterator<Item = Self>) -> Option<Self> {
        let mut operands = operands.into_iter();
        let first = operands.next()?;
        Some(fold_right(first, operands.collect(), Self::or))
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            match node {
                Self::Match { .. } | Self::TimeRange { .. } => {}
                Self::Not { inner } => pending.push((&**inner, level + 1)),
                Self::And { left, right } | Self::Or { left, right } => {
                    pending.push((&**left, level + 1));
                    pending.push((&**right, level + 1));
                }
            }
        }
        deepest
    }

    /// Returns the distinct field names referenced, in first-seen order.
    ///
    /// Unscoped matches contribute nothing.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Self::Match { field, .. } | Self::TimeRange { field, .. } => {
                    if !field.is_empty() && !fields.contains(&field.as_str()) {
                        fields.push(field);
                    }
                }
                Self::Not { inner } => pending.push(inner),
                Self::And { left, right } | Self::Or { left, right } => {
                    pending.push(right);
                    pending.push(left);
                }
            }
        }
        fields
    }

    /// Formats the condition as a query string that parses back to the same tree.
    ///
    /// Operators are always written explicitly: `a b` comes back as `a OR b`.
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![QueryPiece::Node(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                QueryPiece::Text(text) => out.push_str(text),
                QueryPiece::Node(node) => node.write_query(&mut out, &mut pending),
            }
        }
        out
    }

    /// Writes a leaf directly, or schedules an operator's parts on `pending`.
    ///
    /// Parts are pushed in reverse so they pop in reading order.
    fn write_query<'a>(&'a self, out: &mut String, pending: &mut Vec<QueryPiece<'a>>) {
        match self {
            Self::Match { field, value } => {
                write_field_prefix(out, field);
                write_value(out, value);
            }
            Self::Or { left, right } => {
                pending.push(QueryPiece::Node(&**right));
                pending.push(QueryPiece::Text(" OR "));
                push_operand(pending, left, matches!(**left, Self::Or { .. }));
            }
            Self::And { left, right } => {
                push_operand(pending, right, matches!(**right, Self::Or { .. }));
                pending.push(QueryPiece::Text(" AND "));
                push_operand(pending, left, matches!(**left, Self::Or { .. } | Self::And { .. }));
            }
            Self::Not { inner } => {
                push_operand(pending, inner, matches!(**inner, Self::Or { .. } | Self::And { .. }));
                pending.push(QueryPiece::Text("NOT "));
            }
            Self::TimeRange {
                field,
                start,
                end,
                include_start,
                include_end,
            } => {
                write_field_prefix(out, field);
                out.push(if *include_start { '[' } else { '{' });
                write_bound(out, start.as_deref());
                out.push_str(" TO ");
                write_bound(out, end.as_deref());
                out.push(if *include_end { ']' } else { '}' });
            }
        }
    }

    /// Writes one tree line for this node and schedules its children.
    fn fmt_node<'a>(
        &'a self,
        f: &mut fmt::Formatter<'_>,
        indent: usize,
        pending: &mut Vec<(&'a Self, usize)>,
    ) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Match { field, value } if field.is_empty() => {
                writeln!(f, "{prefix}Match({value:?})")
            }
            Self::Match { field, value } => writeln!(f, "{prefix}Match({field}: {value:?})"),
            Self::And { left, right } => {
                pending.push((&**right, indent + 1));
                pending.push((&**left, indent + 1));
                writeln!(f, "{prefix}And")
            }
            Self::Or { left, right } => {
                pending.push((&**right, indent + 1));
                pending.push((&**left, indent + 1));
                writeln!(f, "{prefix}Or")
            }
            Self::Not { inner } => {
                pending.push((&**inner, indent + 1));
                writeln!(f, "{prefix}Not")
            }
            Self::TimeRange {
                field,
                start,
                end,
                include_start,
                include_end,
            } => {
                let open = if *include_start { '[' } else { '{' };
                let close = if *include_end { ']' } else { '}' };
                let start = start.as_deref().map_or("*".to_string(), |s| format!("{s:?}"));
                let end = end.as_deref().map_or("*".to_string(), |s| format!("{s:?}"));
                writeln!(f, "{prefix}TimeRange({field}: {open}{start} TO {end}{close})")
            }
        }
    }

    /// Moves the boxed children onto `pending`, leaving empty leaves behind.
    fn take_children(&mut self, pending: &mut Vec<Self>) {
        match self {
            Self::Match { .. } | Self::TimeRange { .. } => {}
            Self::Not { inner } => pending.push(mem::replace(&mut **inner, Self::empty())),
            Self::And { left, right } | Self::Or { left, right } => {
                pending.push(mem::replace(&mut **left, Self::empty()));
                pending.push(mem::replace(&mut **right, Self::empty()));
            }
        }
    }

    /// A leaf that owns no heap memory.
    fn empty() -> Self {
        Self::Match {
            field: String::new(),
            value: String::new(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self, 0)];
        while let Some((node, indent)) = pending.pop() {
            node.fmt_node(f, indent, &mut pending)?;
        }
        Ok(())
    }
}

impl Drop for Condition {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.take_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.take_children(&mut pending);
        }
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (
                    Self::Match { field, value },
                    Self::Match {
                        field: other_field,
                        value: other_value,
                    },
                ) => {
                    if field != other_field || value != other_value {
                        return false;
                    }
                }
                (
                    Self::And { left, right },
                    Self::And {
                        left: other_left,
                        right: other_right,
                    },
                )
                | (
                    Self::Or { left, right },
                    Self::Or {
                        left: other_left,
                        right: other_right,
                    },
                ) => {
                    pending.push((&**left, &**other_left));
                    pending.push((&**right, &**other_right));
                }
                (Self::Not { inner }, Self::Not { inner: other_inner }) => {
                    pending.push((&**inner, &**other_inner));
                }
                (
                    Self::TimeRange {
                        field,
                        start,
                        end,
                        include_start,
                        include_end,
                    },
                    Self::TimeRange {
                        field: other_field,
                        start: other_start,
                        end: other_end,
                        include_start: other_include_start,
                        include_end: other_include_end,
                    },
                ) => {
                    if field != other_field
                        || start != other_start
                        || end != other_end
                        || include_start != other_include_start
                        || include_end != other_include_end
                    {
                        return false;
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

/// Pending output of the query printer.
enum QueryPiece<'a> {
    /// A node still to be written.
    Node(&'a Condition),
    /// Literal text such as an operator or a parenthesis.
    Text(&'static str),
}

/// Schedules `node`, wrapped in parentheses when `group` is set.
fn push_operand<'a>(pending: &mut Vec<QueryPiece<'a>>, node: &'a Condition, group: bool) {
    if group {
        pending.push(QueryPiece::Text(")"));
        pending.push(QueryPiece::Node(node));
        pending.push(QueryPiece::Text("("));
    } else {
        pending.push(QueryPiece::Node(node));
    }
}

/// Folds `first` and `rest` into a right-leaning chain joined by `join`.
pub(crate) fn fold_right(
    first: Condition,
    mut rest: Vec<Condition>,
    join: fn(Condition, Condition) -> Condition,
) -> Condition {
    let Some(mut acc) = rest.pop() else {
        return first;
    };
    while let Some(left) = rest.pop() {
        acc = join(left, acc);
    }
    join(first, acc)
}

/// Writes `field:` with word-breaking characters escaped, or nothing for an empty field.
fn write_field_prefix(out: &mut String, field: &str) {
    if field.is_empty() {
        return;
    }

    // An escape anywhere keeps keywords and `*` from being recognized.
    let escape_first = is_reserved(field);
    for (idx, ch) in field.chars().enumerate() {
        if is_delimiter(ch) || ch == '\\' || (idx == 0 && escape_first) {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(':');
}

/// Writes a value bare when it lexes as a plain word, quoted otherwise.
fn write_value(out: &mut String, value: &str) {
    let bare = !value.is_empty()
        && !is_reserved(value)
        && !value.chars().any(|ch| is_delimiter(ch) || ch == '\\');

    if bare {
        out.push_str(value);
        return;
    }

    out.push('"');
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
}

/// Writes a range bound, `*` for unbounded.
fn write_bound(out: &mut String, bound: Option<&str>) {
    match bound {
        Some(value) => write_value(out, value),
        None => out.push('*'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> Condition {
        Condition::term(s)
    }

    #[test]
    fn or_chain_is_right_leaning() {
        let chain = Condition::or_chain(vec![term("a"), term("b"), term("c")]).unwrap();
        assert_eq!(
            chain,
            Condition::or(term("a"), Condition::or(term("b"), term("c")))
        );
    }

    #[test]
    fn and_chain_is_right_leaning() {
        let chain = Condition::and_chain(vec![term("a"), term("b"), term("c")]).unwrap();
        assert_eq!(
            chain,
            Condition::and(term("a"), Condition::and(term("b"), term("c")))
        );
    }

    #[test]
    fn chain_single_element_unwraps() {
        assert_eq!(Condition::or_chain(vec![term("a")]), Some(term("a")));
    }

    #[test]
    fn chain_empty_is_none() {
        assert_eq!(Condition::and_chain(Vec::new()), None);
    }

    #[test]
    fn depth_counts_longest_path() {
        let cond = Condition::or(term("a"), Condition::negate(Condition::and(term("b"), term("c"))));
        assert_eq!(cond.depth(), 4);
        assert_eq!(term("a").depth(), 1);
    }

    #[test]
    fn fields_in_first_seen_order() {
        let cond = Condition::and(
            Condition::matching("title", "x"),
            Condition::or(
                term("free"),
                Condition::and(
                    Condition::time_range("date", Some("a"), None, true, false),
                    Condition::matching("title", "y"),
                ),
            ),
        );
        assert_eq!(cond.fields(), vec!["title", "date"]);
    }

    #[test]
    fn deep_trees_are_walked_without_recursion() {
        let levels = 100_000;
        let negated = |times: usize| {
            let mut cond = term("x");
            for _ in 0..times {
                cond = Condition::negate(cond);
            }
            cond
        };
        let cond = negated(levels);

        assert_eq!(cond.depth(), levels + 1);
        let printed = cond.to_query_string();
        assert!(printed.starts_with("NOT NOT "));
        assert!(printed.ends_with("NOT x"));
        assert!(cond == negated(levels));
        assert!(cond != negated(levels - 1));
        drop(cond);
    }

    #[test]
    fn equality_compares_structure() {
        let a = Condition::or(term("a"), Condition::negate(term("b")));
        assert_eq!(a, Condition::or(term("a"), Condition::negate(term("b"))));
        assert_ne!(a, Condition::and(term("a"), Condition::negate(term("b"))));
        assert_ne!(a, Condition::or(term("a"), term("b")));
        assert_ne!(
            Condition::time_range("d", Some("1"), None, true, false),
            Condition::time_range("d", Some("1"), None, true, true)
        );
    }

    #[test]
    fn query_string_operators() {
        let cond = Condition::or(
            term("a"),
            Condition::and(term("b"), Condition::negate(term("c"))),
        );
        assert_eq!(cond.to_query_string(), "a OR b AND NOT c");
    }

    #[test]
    fn query_string_groups_where_needed() {
        let cond = Condition::or(
            Condition::or(term("a"), term("b")),
            Condition::and(
                Condition::and(term("c"), term("d")),
                Condition::or(term("e"), term("f")),
            ),
        );
        assert_eq!(
            cond.to_query_string(),
            "(a OR b) OR (c AND d) AND (e OR f)"
        );
    }

    #[test]
    fn query_string_negated_group() {
        let cond = Condition::negate(Condition::or(term("b"), term("c")));
        assert_eq!(cond.to_query_string(), "NOT (b OR c)");
    }

    #[test]
    fn query_string_quotes_values() {
        assert_eq!(term("a b").to_query_string(), "\"a b\"");
        assert_eq!(term("").to_query_string(), "\"\"");
        assert_eq!(term("or").to_query_string(), "\"or\"");
        assert_eq!(term("*").to_query_string(), "\"*\"");
        assert_eq!(term("say \"hi\"").to_query_string(), r#""say \"hi\"""#);
        assert_eq!(term("a\\b").to_query_string(), r#""a\\b""#);
        assert_eq!(term("plain-word").to_query_string(), "plain-word");
    }

    #[test]
    fn query_string_escapes_fields() {
        assert_eq!(
            Condition::matching("my field", "v").to_query_string(),
            "my\\ field:v"
        );
        assert_eq!(
            Condition::matching("NOT", "v").to_query_string(),
            "\\NOT:v"
        );
    }

    #[test]
    fn query_string_ranges() {
        let cond = Condition::time_range("date", Some("2020-01-01"), None, true, false);
        assert_eq!(cond.to_query_string(), "date:[2020-01-01 TO *}");

        let cond = Condition::time_range("date", Some("*"), Some("a b"), false, true);
        assert_eq!(cond.to_query_string(), "date:{\"*\" TO \"a b\"]");
    }

    #[test]
    fn tree_display() {
        let cond = Condition::or(
            Condition::matching("title", "guide"),
            Condition::negate(Condition::time_range("date", None, Some("2020"), true, false)),
        );
        assert_eq!(
            cond.to_string(),
            "Or\n  Match(title: \"guide\")\n  Not\n    TimeRange(date: [* TO \"2020\"})\n"
        );
    }

    #[test]
    fn serde_shape() {
        let cond = Condition::and(
            term("a"),
            Condition::time_range("d", Some("x"), None, true, false),
        );
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(json["type"], "and");
        assert_eq!(json["left"]["type"], "match");
        assert_eq!(json["left"]["field"], "");
        assert_eq!(json["right"]["type"], "time_range");
        assert_eq!(json["right"]["start"], "x");
        assert!(json["right"]["end"].is_null());

        let back: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(back, cond);
    }
}
