//! Positional placeholder handling for insert statements.
//!
//! Product lists written for psycopg use `%s` placeholders while the Postgres
//! wire protocol binds `$1..$n`. Either style is accepted, but not both in one
//! statement; `%s` is rewritten. Text inside single-quoted literals and
//! double-quoted identifiers is left alone.

/// Rewrite `%s` placeholders to `$1..$n`.
///
/// # Examples
/// ```
/// use points2postgis::utils::to_positional;
///
/// assert_eq!(
///     to_positional("INSERT INTO t VALUES (%s, %s)"),
///     "INSERT INTO t VALUES ($1, $2)"
/// );
/// ```
pub fn to_positional(statement: &str) -> String {
    let mut out = String::with_capacity(statement.len() + 8);
    let mut index = 0;
    let mut quote: Option<char> = None;
    let mut chars = statement.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
            }
            '%' => match chars.peek() {
                Some('s') => {
                    chars.next();
                    index += 1;
                    out.push_str(&format!("${}", index));
                }
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    out
}

/// Number of `%s` placeholders outside quoted text. `%%` is not one.
pub fn count_format_placeholders(statement: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    let mut chars = statement.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '%' => match chars.peek() {
                Some('s') => {
                    chars.next();
                    count += 1;
                }
                Some('%') => {
                    chars.next();
                }
                _ => {}
            },
            _ => {}
        }
    }

    count
}

/// Number of distinct positional parameters referenced by a `$n` statement.
pub fn count_placeholders(statement: &str) -> usize {
    let mut highest = 0;
    let mut quote: Option<char> = None;
    let mut chars = statement.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '$' => {
                let mut digits = String::new();
                while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(*d);
                    chars.next();
                }
                if let Ok(n) = digits.parse::<usize>() {
                    highest = highest.max(n);
                }
            }
            _ => {}
        }
    }

    highest
}
