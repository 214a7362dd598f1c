use postlens_query::compile;

/// Compile `query` and print its canonical form.
///
/// # Errors
///
/// Returns the syntax error after printing the query with a caret under the
/// offending position.
pub(crate) fn run_check_query(query: &str) -> anyhow::Result<()> {
    match compile(query) {
        Ok(expr) if expr.is_match_all() => {
            println!("(blank query: matches every post with text)");
            Ok(())
        }
        Ok(expr) => {
            println!("{expr}");
            println!("{} term(s)", expr.leaf_count());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.pointer());
            Err(e.into())
        }
    }
}
