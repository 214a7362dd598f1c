/// A compiled boolean query.
///
/// `And(vec![])` is the empty conjunction produced by a blank query; it is
/// vacuously true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A single unquoted term, possibly containing `*` wildcards.
    Term(String),
    /// A quoted span matched as a contiguous word sequence.
    Phrase(String),
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Not(Box<Expression>),
}

impl Expression {
    /// Build a conjunction, flattening nested conjunctions.
    #[must_use]
    pub fn and(children: Vec<Expression>) -> Self {
        Self::flatten(children, true)
    }

    /// Build a disjunction, flattening nested disjunctions.
    #[must_use]
    pub fn or(children: Vec<Expression>) -> Self {
        Self::flatten(children, false)
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(child: Expression) -> Self {
        Self::Not(Box::new(child))
    }

    fn flatten(children: Vec<Expression>, conjunction: bool) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match (child, conjunction) {
                (Expression::And(inner), true) | (Expression::Or(inner), false)
                    if !inner.is_empty() =>
                {
                    flat.extend(inner);
                }
                (other, _) => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        if conjunction {
            Expression::And(flat)
        } else {
            Expression::Or(flat)
        }
    }

    /// Whether this is the match-everything expression of a blank query.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        matches!(self, Expression::And(children) if children.is_empty())
    }

    /// Number of term and phrase leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Expression::Term(_) | Expression::Phrase(_) => 1,
            Expression::And(children) | Expression::Or(children) => {
                children.iter().map(Expression::leaf_count).sum()
            }
            Expression::Not(child) => child.leaf_count(),
        }
    }
}

fn fmt_child(f: &mut std::fmt::Formatter<'_>, child: &Expression, wrap: bool) -> std::fmt::Result {
    if wrap {
        write!(f, "({child})")
    } else {
        write!(f, "{child}")
    }
}

fn is_compound(expr: &Expression) -> bool {
    matches!(expr, Expression::And(c) | Expression::Or(c) if c.len() > 1)
}

/// Canonical form; parsing it yields the same expression.
impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Term(term) => f.write_str(term),
            Expression::Phrase(phrase) => write!(f, "\"{phrase}\""),
            Expression::Not(child) => {
                f.write_str("NOT ")?;
                fmt_child(f, child, is_compound(child))
            }
            Expression::And(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    fmt_child(f, child, matches!(child, Expression::Or(c) if c.len() > 1))?;
                }
                Ok(())
            }
            Expression::Or(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    fmt_child(f, child, false)?;
                }
                Ok(())
            }
        }
    }
}
