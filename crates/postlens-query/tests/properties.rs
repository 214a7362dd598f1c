//! Algebraic properties of normalization and query evaluation.

use postlens_query::{compile, evaluate, normalize, Expression, MatchOptions, Matcher};
use proptest::prelude::*;

fn options() -> impl Strategy<Value = MatchOptions> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(ignore_case, ignore_accent, match_word)| {
        MatchOptions {
            ignore_case,
            ignore_accent,
            match_word,
        }
    })
}

/// Short texts drawn from a vocabulary with case and accent variants, so that
/// generated queries actually hit.
fn text() -> impl Strategy<Value = String> {
    let word = prop::sample::select(vec![
        "macron", "Macron", "MACRON", "réforme", "Reforme", "retraites", "Élysée", "elysee",
        "paris", "Kyiv", "İstanbul", "covid-19", "été",
    ]);
    let sep = prop::sample::select(vec![" ", ", ", "! ", " (", ") ", "-"]);
    prop::collection::vec((word, sep), 0..8).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(w, s)| format!("{w}{s}"))
            .collect::<String>()
    })
}

fn leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        prop::sample::select(vec!["macron", "reforme", "Élysée", "paris", "macro*", "covid-19"])
            .prop_map(|t| Expression::Term(t.to_string())),
        prop::sample::select(vec!["réforme retraites", "macron paris"])
            .prop_map(|p| Expression::Phrase(p.to_string())),
    ]
}

fn expression() -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Expression::And),
            prop::collection::vec(inner.clone(), 2..4).prop_map(Expression::Or),
            inner.prop_map(Expression::not),
        ]
    })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in any::<String>(), ic in any::<bool>(), ia in any::<bool>()) {
        let once = normalize(&s, ic, ia);
        prop_assert_eq!(normalize(&once, ic, ia), once);
    }

    #[test]
    fn normalized_vocabulary_is_idempotent(s in text(), ic in any::<bool>(), ia in any::<bool>()) {
        let once = normalize(&s, ic, ia);
        prop_assert_eq!(normalize(&once, ic, ia), once);
    }

    #[test]
    fn evaluation_is_normalization_consistent(expr in expression(), t in text(), opts in options()) {
        let normalized = normalize(&t, opts.ignore_case, opts.ignore_accent);
        prop_assert_eq!(evaluate(&expr, &t, opts), evaluate(&expr, &normalized, opts));
    }

    #[test]
    fn double_negation_is_identity(expr in expression(), t in text(), opts in options()) {
        let doubled = Expression::not(Expression::not(expr.clone()));
        prop_assert_eq!(evaluate(&doubled, &t, opts), evaluate(&expr, &t, opts));
    }

    #[test]
    fn self_conjunction_is_identity(expr in expression(), t in text(), opts in options()) {
        let both = Expression::And(vec![expr.clone(), expr.clone()]);
        prop_assert_eq!(evaluate(&both, &t, opts), evaluate(&expr, &t, opts));
    }

    #[test]
    fn display_reparses_to_equivalent_matcher(expr in expression(), t in text(), opts in options()) {
        let reparsed = compile(&expr.to_string()).unwrap();
        prop_assert_eq!(
            Matcher::new(&reparsed, opts).matches(&t),
            Matcher::new(&expr, opts).matches(&t)
        );
    }

    #[test]
    fn compile_never_panics(q in any::<String>()) {
        let _ = compile(&q);
    }
}
