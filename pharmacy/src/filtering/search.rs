use sea_orm::{
    ColumnTrait, Condition,
    sea_query::{Expr, Func, SimpleExpr},
};

/// Search terms are cut to this many characters before escaping to bound matching cost
pub const MAX_SEARCH_QUERY_LENGTH: usize = 128;

const REGEX_METACHARACTERS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Escape every regex metacharacter so the result matches `input` literally.
///
/// The output is safe to embed in a "contains" pattern: `a.b*c` becomes
/// `a\.b\*c`, and a string made only of metacharacters stays a literal.
#[must_use]
pub fn escape_literal_for_contains_match(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if REGEX_METACHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape LIKE wildcards to prevent wildcard injection attacks
/// Escapes: % (match any) and _ (match single char)
fn escape_like_wildcards(input: &str) -> String {
    input
        .replace('\\', "\\\\") // Escape backslash first
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// A condition no row satisfies
fn match_nothing() -> Condition {
    Condition::all().add(Expr::val(1).eq(0))
}

/// A case-insensitive "substring present" match condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainsPattern {
    /// Matches no rows. Produced for empty search terms.
    Nothing,
    /// Matches rows whose column contains `literal`, ignoring case.
    Literal {
        /// The truncated search term, verbatim
        literal: String,
        /// `literal` with regex metacharacters escaped
        regex: String,
    },
}

impl ContainsPattern {
    /// The escaped regex form of the pattern, or `None` for [`ContainsPattern::Nothing`]
    #[must_use]
    pub fn regex(&self) -> Option<&str> {
        match self {
            Self::Nothing => None,
            Self::Literal { regex, .. } => Some(regex),
        }
    }

    #[must_use]
    pub fn matches_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Build `UPPER(column) LIKE UPPER('%literal%') ESCAPE '\'` for one column.
    ///
    /// The literal is bound as a value and its wildcards are escaped, so the
    /// search term can neither inject SQL nor widen the match. Both sides go
    /// through the store's `UPPER`, so they fold identically even where the
    /// store only folds ASCII.
    #[must_use]
    pub fn like_condition<C: ColumnTrait>(&self, column: C) -> Condition {
        match self {
            Self::Nothing => match_nothing(),
            Self::Literal { literal, .. } => {
                let pattern = format!("%{}%", escape_like_wildcards(literal));
                let haystack: SimpleExpr = Func::upper(Expr::col((column.entity_name(), column))).into();
                let needle: SimpleExpr = Func::upper(Expr::val(pattern)).into();
                Condition::all().add(Expr::cust_with_exprs("$1 LIKE $2 ESCAPE '\\'", [haystack, needle]))
            }
        }
    }
}

/// Build a contains predicate from an untrusted search term.
///
/// The term is truncated to [`MAX_SEARCH_QUERY_LENGTH`] characters, then
/// escaped. An empty result fails closed: the predicate matches nothing.
#[must_use]
pub fn build_contains_predicate(input: &str) -> ContainsPattern {
    let literal: String = input.chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
    let regex = escape_literal_for_contains_match(&literal);
    if regex.is_empty() {
        return ContainsPattern::Nothing;
    }
    ContainsPattern::Literal { literal, regex }
}

/// A text search across several columns: a row matches if ANY column contains the term.
#[derive(Debug, Clone)]
pub struct TextSearch<C> {
    pub columns: Vec<C>,
    pub pattern: ContainsPattern,
}

impl<C: ColumnTrait> TextSearch<C> {
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        if self.pattern.matches_nothing() || self.columns.is_empty() {
            return match_nothing();
        }
        self.columns
            .iter()
            .fold(Condition::any(), |any, column| {
                any.add(self.pattern.like_condition(*column))
            })
    }
}

/// Build the OR of one contains predicate per column.
///
/// An absent query means "no text constraint" and returns `None`. A present
/// query always yields a search, even when it is empty (which then matches nothing).
#[must_use]
pub fn make_text_search_or<C: ColumnTrait>(query: Option<&str>, columns: &[C]) -> Option<TextSearch<C>> {
    let query = query?;
    Some(TextSearch {
        columns: columns.to_vec(),
        pattern: build_contains_predicate(query),
    })
}
